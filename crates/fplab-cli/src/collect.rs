//! Command handlers for `collect` and `behaviour`.

use std::{path::Path, sync::Arc, time::Duration};

use anyhow::Context;
use chrono::Utc;
use fplab_collector::{
    CollectorConfig, DeliveryPolicy, HostEnvironment, Orchestrator, SubmissionClient,
};
use fplab_core::{BehaviourSubmission, RunConfig, TestingSubmission};

use crate::{BehaviourArgs, CollectArgs, TimingArgs};

pub(crate) fn collector_config(timing: &TimingArgs) -> CollectorConfig {
    let mut config = CollectorConfig::default();
    if let Some(ms) = timing.settle_delay_ms {
        config.settle_delay = Duration::from_millis(ms);
    }
    if let Some(ms) = timing.bounded_timeout_ms {
        config.bounded_timeout = Duration::from_millis(ms);
    }
    config
}

fn delivery_policy(require_delivery: bool) -> DeliveryPolicy {
    if require_delivery {
        DeliveryPolicy::Required
    } else {
        DeliveryPolicy::BestEffort
    }
}

fn host_orchestrator(timing: &TimingArgs) -> Orchestrator {
    Orchestrator::new(
        Arc::new(HostEnvironment::from_process_env()),
        collector_config(timing),
    )
}

/// Write `submission` as pretty JSON to `path`.
pub(crate) async fn write_output(path: &Path, submission: &TestingSubmission) -> anyhow::Result<()> {
    let json = serde_json::to_vec_pretty(submission).context("failed to serialize record")?;
    tokio::fs::write(path, json)
        .await
        .with_context(|| format!("failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), "record written");
    Ok(())
}

/// Run one pass on the host, write the record to `--output`, and POST it
/// when a server is given.
pub(crate) async fn run_collect(args: &CollectArgs) -> anyhow::Result<()> {
    let run_config = RunConfig {
        browser: args.browser.clone(),
        privacy_max: args.privacy_max,
        incognito: args.incognito,
        extensions: args.extensions.clone(),
    };
    tracing::info!(
        browser = %run_config.browser,
        privacy_max = run_config.privacy_max,
        incognito = run_config.incognito,
        extensions = run_config.extensions.len(),
        "starting collection pass"
    );

    let record = host_orchestrator(&args.timing).collect().await;
    let submission = TestingSubmission::new(run_config, record, Utc::now());

    write_output(&args.output, &submission).await?;

    if let Some(server) = &args.server {
        let client = SubmissionClient::new(server, delivery_policy(args.require_delivery))?;
        client.submit_testing(&submission).await?;
    }

    Ok(())
}

/// Read the stored counter for `key` (absent or unreadable counts as 0),
/// add `bump`, and store the result.
pub(crate) async fn bump_behaviour(
    client: &SubmissionClient,
    key: &str,
    bump: i64,
) -> anyhow::Result<i64> {
    let current = match client.fetch_behaviour(key).await {
        Ok(stored) => stored.unwrap_or(0),
        Err(e) => {
            tracing::warn!(error = %e, "behaviour lookup failed, starting from 0");
            0
        }
    };
    let behaviour = current.saturating_add(bump);

    client
        .submit_behaviour(&BehaviourSubmission {
            fingerprint_id: key.to_string(),
            behaviour,
        })
        .await?;
    Ok(behaviour)
}

/// Run a pass, wait out the settle delay, then bump the counter keyed by the
/// canvas hash.
pub(crate) async fn run_behaviour(args: &BehaviourArgs) -> anyhow::Result<()> {
    let client = SubmissionClient::new(&args.server, delivery_policy(args.require_delivery))?;

    let pass = host_orchestrator(&args.timing).run().await;
    pass.settle().await;
    let key = pass.behaviour_key();

    let behaviour = bump_behaviour(&client, &key, args.bump).await?;
    tracing::info!(behaviour, "behaviour submitted");
    println!("{key}: {behaviour}");
    Ok(())
}

#[cfg(test)]
#[path = "collect_test.rs"]
mod tests;
