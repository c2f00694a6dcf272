//! Creative API Handlers
//!
//! Creation and status endpoints of the stub service.

use adforge_core::domain::job::JobId;
use adforge_core::dto::job::{CreateCreative, JobDescriptor, SubmitResponse};
use axum::{
    Json,
    body::Bytes,
    extract::{Path, State},
};

use crate::api::error::{ApiError, ApiResult};
use crate::state::MockState;

/// POST /create
/// Start one render from a JSON payload, or a batch when the body is empty
pub async fn create(State(state): State<MockState>, body: Bytes) -> ApiResult<Json<SubmitResponse>> {
    if body.iter().all(u8::is_ascii_whitespace) {
        let size = state.config().batch_size;
        tracing::info!("Creating batch of {} jobs", size);

        let mut descriptors = Vec::with_capacity(size);
        for _ in 0..size {
            descriptors.push(state.create_job(None).await);
        }
        return Ok(Json(SubmitResponse::Many(descriptors)));
    }

    let creative: CreateCreative = serde_json::from_slice(&body)
        .map_err(|e| ApiError::BadRequest(format!("Invalid creative payload: {}", e)))?;

    let descriptor = state.create_job(Some(&creative)).await;
    Ok(Json(SubmitResponse::One(descriptor)))
}

/// GET /create/image/{uid}
/// Report the status of a render job
pub async fn image_status(
    State(state): State<MockState>,
    Path(uid): Path<String>,
) -> ApiResult<Json<JobDescriptor>> {
    tracing::debug!("Polling job: {}", uid);

    let descriptor = state
        .poll_job(&JobId::new(uid.clone()))
        .await
        .ok_or(ApiError::UnknownJob(uid))?;

    Ok(Json(descriptor))
}
