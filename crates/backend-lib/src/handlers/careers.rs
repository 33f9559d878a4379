//! Career application endpoint. Applications are acknowledged, not stored.
use airavat_common::{ApplicationAck, JobApplication};
use axum::{extract::rejection::JsonRejection, http::StatusCode, Json};
use metrics::counter;
use tracing::info;

use super::json_body;
use crate::metrics::APPLICATION_RECEIVED;
use crate::{error::AppError, validation};

pub const APPLICATION_ACK_MESSAGE: &str =
    "Application submitted successfully! Our HR team will contact you soon.";

/// `POST /api/careers/apply`
pub async fn apply(
    payload: Result<Json<JobApplication>, JsonRejection>,
) -> Result<(StatusCode, Json<ApplicationAck>), AppError> {
    let application = json_body(payload)?;
    let position = validation::validate_application(&application)?;

    counter!(APPLICATION_RECEIVED, "position" => position.as_str()).increment(1);
    info!(position = position.as_str(), "career application received");

    Ok((
        StatusCode::ACCEPTED,
        Json(ApplicationAck {
            success: true,
            message: APPLICATION_ACK_MESSAGE.to_string(),
        }),
    ))
}
