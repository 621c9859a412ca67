use axum::{body::Bytes, extract::State, Extension, Json};
use chrono::Utc;
use fplab_db::NewTestRow;
use serde_json::Value;

use super::{map_db_error, ApiError, AppState, StatusMessage};
use crate::{middleware::RequestId, validate::validate_submission};

/// `POST /api/testing`: validate one run's record and append it.
///
/// The body is taken as raw bytes so malformed JSON is reported in the same
/// `{success, message}` shape as schema violations.
pub(super) async fn submit_test(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Bytes,
) -> Result<Json<StatusMessage>, ApiError> {
    let body: Value = serde_json::from_slice(&body).map_err(|e| {
        tracing::debug!(request_id = %req_id.0, error = %e, "rejecting malformed body");
        ApiError::BadRequest(format!("malformed JSON body: {e}"))
    })?;

    let valid = validate_submission(&body).map_err(|e| {
        tracing::debug!(request_id = %req_id.0, constraint = %e, "rejecting submission");
        ApiError::BadRequest(e.constraint)
    })?;

    let browser = valid.config.browser.clone();
    let row = NewTestRow {
        received_at: Utc::now(),
        timestamp: valid.timestamp,
        config: valid.config,
        flags: valid.flags,
        features: valid.features,
    };

    let id = fplab_db::append_test_row(&state.pool, &row)
        .await
        .map_err(|e| map_db_error(&req_id.0, &e, "Failed to save test data"))?;

    tracing::info!(request_id = %req_id.0, id, browser = %browser, "test data saved");
    Ok(Json(StatusMessage::ok("Test data saved")))
}
