use async_trait::async_trait;
use axum::{
    extract::{FromRequest, Multipart, Path, Request, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::warn;

use crate::adapters::http::state::HttpState;
use crate::application::dto::{AssessRequest, AssessmentResponse, OkResponse};
use crate::domain::{
    errors::{DomainError, DomainResult},
    profiles::DRAINAGE,
};

/// Cuerpo de una evaluación: JSON (`AssessRequest`) o `multipart/form-data`
/// con la imagen en el campo `file` y un campo opcional `annotate`.
pub enum AssessInput {
    Json(AssessRequest),
    Upload { image: Vec<u8>, annotate: bool },
}

#[async_trait]
impl<S: Send + Sync> FromRequest<S> for AssessInput {
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("multipart/form-data"));

        if !is_multipart {
            let Json(body) = Json::<AssessRequest>::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            return Ok(AssessInput::Json(body));
        }

        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(IntoResponse::into_response)?;
        let mut image = None;
        let mut annotate = true;
        while let Some(field) = multipart.next_field().await.map_err(IntoResponse::into_response)? {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "file" => {
                    let bytes = field.bytes().await.map_err(IntoResponse::into_response)?;
                    image = Some(bytes.to_vec());
                }
                "annotate" => {
                    let text = field.text().await.map_err(IntoResponse::into_response)?;
                    annotate = !text.trim().eq_ignore_ascii_case("false");
                }
                _ => {}
            }
        }

        match image {
            Some(image) if !image.is_empty() => Ok(AssessInput::Upload { image, annotate }),
            _ => Err(error_response(DomainError::InvalidInput(
                "falta el campo 'file' con la imagen".into(),
            ))),
        }
    }
}

fn status_for(e: &DomainError) -> StatusCode {
    match e {
        DomainError::InvalidBox { .. }
        | DomainError::InvalidConfidence(_)
        | DomainError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        DomainError::NotFound(_) => StatusCode::NOT_FOUND,
        DomainError::OperationFailed(_) => StatusCode::BAD_GATEWAY,
        DomainError::UnknownGroup(_) | DomainError::DuplicateLabel { .. } => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn error_response(e: DomainError) -> Response {
    let code = status_for(&e);
    if code.is_server_error() {
        warn!("assessment failed: {}", e);
    }
    (code, Json(json!({ "error": e.to_string() }))).into_response()
}

pub async fn health() -> impl IntoResponse {
    Json(OkResponse { ok: true })
}

pub async fn list_domains(State(st): State<HttpState>) -> impl IntoResponse {
    Json(json!({
        "domains": st.assessment.domains(),
        "detector": st.assessment.has_detector(),
    }))
}

pub async fn assess(
    State(st): State<HttpState>,
    Path(domain): Path<String>,
    input: AssessInput,
) -> Response {
    respond(run(&st, &domain, input).await)
}

pub async fn detect_drainage(State(st): State<HttpState>, input: AssessInput) -> Response {
    respond(run(&st, DRAINAGE, input).await)
}

async fn run(st: &HttpState, domain: &str, input: AssessInput) -> DomainResult<AssessmentResponse> {
    match input {
        AssessInput::Json(req) => st.assessment.assess(domain, req).await,
        AssessInput::Upload { image, annotate } => {
            st.assessment.assess_image(domain, image, annotate).await
        }
    }
}

fn respond(result: DomainResult<AssessmentResponse>) -> Response {
    match result {
        Ok(resp) => Json(resp).into_response(),
        Err(e) => error_response(e),
    }
}
