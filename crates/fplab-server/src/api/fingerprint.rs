use axum::{
    body::Bytes,
    extract::{Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{map_db_error, ApiError, AppState, StatusMessage};
use crate::middleware::RequestId;

#[derive(Debug, Deserialize)]
pub(super) struct LookupParams {
    #[serde(rename = "fingerprintId")]
    fingerprint_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct BehaviourItem {
    #[serde(rename = "fingerprintId")]
    fingerprint_id: String,
    behaviour: i64,
}

/// `GET /api/fingerprint?fingerprintId=<id>`
pub(super) async fn get_behaviour(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(params): Query<LookupParams>,
) -> Result<Json<BehaviourItem>, ApiError> {
    let fingerprint_id = params
        .fingerprint_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::BadRequest("FingerprintId is required.".to_string()))?;

    let behaviour = fplab_db::get_behaviour(&state.pool, &fingerprint_id)
        .await
        .map_err(|e| map_db_error(&req_id.0, &e, "Failed to retrieve behaviour"))?
        .ok_or_else(|| {
            ApiError::NotFound("No stored behaviour for fingerprintId.".to_string())
        })?;

    Ok(Json(BehaviourItem {
        fingerprint_id,
        behaviour,
    }))
}

/// `POST /api/fingerprint` with `{fingerprintId, behaviour}`. Overwrites any
/// stored counter.
pub(super) async fn post_behaviour(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Bytes,
) -> Result<Json<StatusMessage>, ApiError> {
    let body: Value = serde_json::from_slice(&body)
        .map_err(|e| ApiError::BadRequest(format!("malformed JSON body: {e}")))?;
    let (fingerprint_id, behaviour) = parse_behaviour_body(&body)?;

    fplab_db::upsert_behaviour(&state.pool, &fingerprint_id, behaviour)
        .await
        .map_err(|e| map_db_error(&req_id.0, &e, "Failed to add fingerprintId"))?;

    tracing::info!(request_id = %req_id.0, behaviour, "behaviour stored");
    Ok(Json(StatusMessage::ok(
        "FingerprintId and behaviour saved correctly!",
    )))
}

/// Pull `fingerprintId` and `behaviour` out of a request body. The counter
/// may arrive as a JSON integer or as its decimal text.
fn parse_behaviour_body(body: &Value) -> Result<(String, i64), ApiError> {
    let required = || ApiError::BadRequest("FingerprintId and behaviour are required.".to_string());

    let fingerprint_id = body
        .get("fingerprintId")
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
        .ok_or_else(required)?;

    let behaviour = match body.get("behaviour") {
        None | Some(Value::Null) => return Err(required()),
        Some(Value::String(text)) if text.trim().is_empty() => return Err(required()),
        Some(Value::String(text)) => text.trim().parse::<i64>().ok(),
        Some(value) => value.as_i64(),
    }
    .ok_or_else(|| ApiError::BadRequest("behaviour must be an integer.".to_string()))?;

    Ok((fingerprint_id.to_string(), behaviour))
}
