//! Runs every collector for one pass and assembles the feature record.

use std::{sync::Arc, time::Duration};

use fplab_core::{behaviour_key, FeatureRecord, Signal, SignalValue};
use futures::future::{join_all, BoxFuture, FutureExt};
use tokio::{task::JoinHandle, time::Instant};

use crate::{
    collectors::{bounded, events, immediate, Entries, RecordSlots},
    config::CollectorConfig,
    environment::ClientEnvironment,
};

/// Extra time granted past the hard ceiling before `finish` stops waiting.
const FINISH_GRACE: Duration = Duration::from_millis(250);

pub struct Orchestrator {
    env: Arc<dyn ClientEnvironment>,
    config: CollectorConfig,
}

impl Orchestrator {
    #[must_use]
    pub fn new(env: Arc<dyn ClientEnvironment>, config: CollectorConfig) -> Self {
        Self { env, config }
    }

    /// Start a pass.
    ///
    /// Event-driven listeners are spawned first so they attach before any
    /// other work. Returns once every immediate and bounded collector has
    /// settled; listeners keep writing into the pass until their ceilings.
    pub async fn run(&self) -> CollectionPass {
        let started = Instant::now();
        let slots = Arc::new(RecordSlots::default());
        let listeners = events::spawn_all(&self.env, &self.config, &slots);

        let env = self.env.as_ref();
        let budget = self.config.bounded_timeout;
        let collectors: Vec<BoxFuture<'_, Entries>> = vec![
            bounded::canvas(env, budget).boxed(),
            bounded::webgl(env, budget).boxed(),
            futures::future::lazy(move |_| immediate::collect_all(env)).boxed(),
            bounded::media_devices(env, budget).boxed(),
            bounded::audio(env, budget).boxed(),
            bounded::wasm(env, budget).boxed(),
        ];

        for entries in join_all(collectors).await {
            slots.offer_all(entries);
        }

        tracing::debug!(
            elapsed_ms = started.elapsed().as_millis(),
            "immediate and bounded collectors settled"
        );

        CollectionPass {
            slots,
            listeners,
            started,
            config: self.config,
        }
    }

    /// Run a pass to completion.
    pub async fn collect(&self) -> FeatureRecord {
        self.run().await.finish().await
    }
}

/// A pass whose event-driven listeners may still be running.
pub struct CollectionPass {
    slots: Arc<RecordSlots>,
    listeners: Vec<JoinHandle<()>>,
    started: Instant,
    config: CollectorConfig,
}

impl CollectionPass {
    /// Values written so far, in declaration order. `None` marks signals
    /// whose listener has not finalized yet.
    #[must_use]
    pub fn snapshot(&self) -> Vec<(Signal, Option<SignalValue>)> {
        self.slots.snapshot()
    }

    /// The canvas hash, or `"Blocked"` if canvas collection did not produce one.
    #[must_use]
    pub fn behaviour_key(&self) -> String {
        behaviour_key(self.slots.get(Signal::CanvasFingerprint).as_ref())
    }

    /// Wait out the configured settle delay, measured from the start of the
    /// pass.
    pub async fn settle(&self) {
        tokio::time::sleep_until(self.started + self.config.settle_delay).await;
    }

    /// Wait for every listener and return the complete record. Signals with
    /// no value by then are marked `Timeout`.
    ///
    /// Listeners always get at least the grace period from this call, so a
    /// pass whose collectors held the runtime past the hard ceiling still
    /// finalizes the samples that were accumulated.
    pub async fn finish(self) -> FeatureRecord {
        let deadline = (self.started + self.config.hard_ceiling() + FINISH_GRACE)
            .max(Instant::now() + FINISH_GRACE);
        for listener in self.listeners {
            let abort = listener.abort_handle();
            if tokio::time::timeout_at(deadline, listener).await.is_err() {
                abort.abort();
            }
        }

        let record = self.slots.to_record();
        let unavailable = record.unavailable_signals();
        tracing::info!(
            unavailable = unavailable.len(),
            elapsed_ms = self.started.elapsed().as_millis(),
            "collection pass finished"
        );
        for (signal, reason) in unavailable {
            tracing::debug!(signal = %signal, reason = %reason, "signal unavailable");
        }
        record
    }
}
