//! Genealogy collaborator routes.
//!
//! Each handler decodes its body, hands off to [`crate::services::genealogy`],
//! and maps failures to an [`ErrorBody`] with a status:
//! 400 for bad input, 503 without an LLM, 502 when the AI side fails.

use std::sync::Arc;

use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use lineage::member::FamilyMember;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ErrorBody, ErrorCode};
use crate::llm::LlmChat;
use crate::services::genealogy::{self, GenealogyError};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ParseRequest {
    pub story: String,
}

#[derive(Debug, Deserialize)]
pub struct DocumentRequest {
    pub image_base64: String,
    pub mime_type: String,
}

#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    pub member: FamilyMember,
}

#[derive(Debug, Serialize)]
pub struct MembersResponse {
    pub members: Vec<FamilyMember>,
}

#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub text: String,
}

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("invalid request body: {0}")]
    BadRequest(String),
    #[error("AI features are not configured on this server")]
    LlmNotConfigured,
    #[error(transparent)]
    Genealogy(#[from] GenealogyError),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl ErrorCode for ApiError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "E_BAD_REQUEST",
            Self::LlmNotConfigured => "E_LLM_NOT_CONFIGURED",
            Self::Genealogy(e) => e.error_code(),
        }
    }

    fn retryable(&self) -> bool {
        match self {
            Self::Genealogy(e) => e.retryable(),
            Self::BadRequest(_) | Self::LlmNotConfigured => false,
        }
    }
}

impl ApiError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_)
            | Self::Genealogy(GenealogyError::EmptyInput(_) | GenealogyError::InvalidImage(_)) => {
                StatusCode::BAD_REQUEST
            }
            Self::LlmNotConfigured => StatusCode::SERVICE_UNAVAILABLE,
            Self::Genealogy(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            warn!(error = %self, code = self.error_code(), "genealogy: request failed");
        }
        (status, Json(ErrorBody::from_error(&self))).into_response()
    }
}

// =============================================================================
// HANDLERS
// =============================================================================

/// `POST /api/lineage/parse` — family story to members.
pub async fn parse(
    State(state): State<AppState>,
    body: Result<Json<ParseRequest>, JsonRejection>,
) -> Result<Json<MembersResponse>, ApiError> {
    let Json(body) = body?;
    let llm = require_llm(&state)?;
    let members = genealogy::parse_narrative(llm.as_ref(), state.max_tokens, &body.story).await?;
    Ok(Json(MembersResponse { members }))
}

/// `POST /api/lineage/document` — record scan to members.
pub async fn document(
    State(state): State<AppState>,
    body: Result<Json<DocumentRequest>, JsonRejection>,
) -> Result<Json<MembersResponse>, ApiError> {
    let Json(body) = body?;
    let llm = require_llm(&state)?;
    let members =
        genealogy::analyze_document(llm.as_ref(), state.max_tokens, &body.image_base64, &body.mime_type).await?;
    Ok(Json(MembersResponse { members }))
}

/// `POST /api/lineage/verify` — archival research summary for one member.
pub async fn verify(
    State(state): State<AppState>,
    body: Result<Json<VerifyRequest>, JsonRejection>,
) -> Result<Json<VerifyResponse>, ApiError> {
    let Json(body) = body?;
    let llm = require_llm(&state)?;
    let text = genealogy::verify_member(llm.as_ref(), state.max_tokens, &body.member).await?;
    Ok(Json(VerifyResponse { text }))
}

fn require_llm(state: &AppState) -> Result<Arc<dyn LlmChat>, ApiError> {
    state.llm.clone().ok_or(ApiError::LlmNotConfigured)
}

#[cfg(test)]
#[path = "genealogy_test.rs"]
mod tests;
