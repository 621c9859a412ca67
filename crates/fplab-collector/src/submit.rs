//! HTTP client for the ingestion service.

use std::time::Duration;

use fplab_core::{BehaviourSubmission, TestingSubmission};
use reqwest::{Client, StatusCode};
use serde_json::Value;

use crate::error::SubmitError;

const REQUEST_TIMEOUT_SECS: u64 = 10;

/// What to do when a submission cannot be delivered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DeliveryPolicy {
    /// Log the failure and carry on. Data from the pass is lost.
    #[default]
    BestEffort,
    /// Return the failure to the caller.
    Required,
}

pub struct SubmissionClient {
    client: Client,
    base_url: reqwest::Url,
    policy: DeliveryPolicy,
}

impl SubmissionClient {
    /// # Errors
    ///
    /// Returns [`SubmitError::InvalidUrl`] if `base_url` does not parse, or
    /// [`SubmitError::Http`] if the HTTP client cannot be built.
    pub fn new(base_url: &str, policy: DeliveryPolicy) -> Result<Self, SubmitError> {
        let mut base_url = reqwest::Url::parse(base_url).map_err(|e| SubmitError::InvalidUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        // `Url::join` replaces the last path segment unless the base ends in `/`.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(concat!("fplab/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base_url,
            policy,
        })
    }

    fn endpoint(&self, path: &str) -> Result<reqwest::Url, SubmitError> {
        self.base_url.join(path).map_err(|e| SubmitError::InvalidUrl {
            url: format!("{}{path}", self.base_url),
            reason: e.to_string(),
        })
    }

    /// POST a finished record to `/api/testing`.
    ///
    /// # Errors
    ///
    /// Under [`DeliveryPolicy::Required`], returns the transport or status
    /// error. Under [`DeliveryPolicy::BestEffort`] failures are logged and
    /// `Ok(())` is returned.
    pub async fn submit_testing(&self, submission: &TestingSubmission) -> Result<(), SubmitError> {
        let result = self.post_json("api/testing", submission).await;
        self.apply_policy("testing", result)
    }

    /// POST a behaviour counter to `/api/fingerprint`.
    ///
    /// # Errors
    ///
    /// Same policy handling as [`SubmissionClient::submit_testing`].
    pub async fn submit_behaviour(
        &self,
        submission: &BehaviourSubmission,
    ) -> Result<(), SubmitError> {
        let result = self.post_json("api/fingerprint", submission).await;
        self.apply_policy("behaviour", result)
    }

    /// GET the stored behaviour counter for `fingerprint_id`. `Ok(None)` when
    /// the server has no entry.
    ///
    /// Not subject to the delivery policy; callers decide how to treat a
    /// failed lookup.
    ///
    /// # Errors
    ///
    /// - [`SubmitError::Http`] on transport failure.
    /// - [`SubmitError::UnexpectedStatus`] for any status other than 200/404.
    /// - [`SubmitError::MalformedResponse`] if `behaviour` is missing or not an integer.
    pub async fn fetch_behaviour(&self, fingerprint_id: &str) -> Result<Option<i64>, SubmitError> {
        let url = self.endpoint("api/fingerprint")?;
        let response = self
            .client
            .get(url.clone())
            .query(&[("fingerprintId", fingerprint_id)])
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => {
                let body: Value = response.json().await?;
                body.get("behaviour")
                    .and_then(Value::as_i64)
                    .map(Some)
                    .ok_or_else(|| SubmitError::MalformedResponse {
                        url: url.to_string(),
                        reason: "missing integer `behaviour`".to_string(),
                    })
            }
            status => Err(SubmitError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            }),
        }
    }

    async fn post_json<T: serde::Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<(), SubmitError> {
        let url = self.endpoint(path)?;
        let response = self.client.post(url.clone()).json(body).send().await?;
        let status = response.status();
        if status.is_success() {
            tracing::debug!(url = %url, status = status.as_u16(), "submission accepted");
            Ok(())
        } else {
            Err(SubmitError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            })
        }
    }

    fn apply_policy(&self, what: &str, result: Result<(), SubmitError>) -> Result<(), SubmitError> {
        match (result, self.policy) {
            (Ok(()), _) => Ok(()),
            (Err(e), DeliveryPolicy::BestEffort) => {
                tracing::warn!(submission = what, error = %e, "submission failed, continuing");
                Ok(())
            }
            (Err(e), DeliveryPolicy::Required) => {
                tracing::error!(submission = what, error = %e, "submission failed");
                Err(e)
            }
        }
    }
}
