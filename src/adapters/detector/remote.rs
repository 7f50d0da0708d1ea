use std::time::Duration;

use async_trait::async_trait;
use base64::{prelude::BASE64_STANDARD, Engine};
use tracing::{debug, error};

use crate::application::dto::{into_detections, DetectorRequest, DetectorResponse};
use crate::application::ports::DetectorPort;
use crate::domain::{
    detection::Detection,
    errors::{DomainError, DomainResult},
};

/// Cliente del servicio de inferencia YOLO: `POST {url}` con `{ "image": <base64> }`,
/// respuesta `{ "detections": [{ "class", "confidence", "box" }] }`.
pub struct RemoteDetector {
    client: reqwest::Client,
    url: String,
}

impl RemoteDetector {
    pub fn new(url: impl Into<String>, timeout: Duration) -> DomainResult<Self> {
        let url = url.into();
        if url.trim().is_empty() {
            return Err(DomainError::InvalidInput("URL del detector vacía".into()));
        }
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DomainError::OperationFailed(format!("cliente http: {}", e)))?;
        Ok(Self::with_client(client, url))
    }

    pub fn with_client(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self { client, url: url.into() }
    }
}

#[async_trait]
impl DetectorPort for RemoteDetector {
    async fn detect(&self, image: &[u8]) -> DomainResult<Vec<Detection>> {
        let body = DetectorRequest { image: BASE64_STANDARD.encode(image) };

        let res = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!("❌ Detector unreachable at {}: {}", self.url, e);
                DomainError::OperationFailed(format!("fallo en la petición al detector: {}", e))
            })?;

        let status = res.status();
        if !status.is_success() {
            return Err(DomainError::OperationFailed(format!("el detector respondió {}", status)));
        }

        let parsed: DetectorResponse = res
            .json()
            .await
            .map_err(|e| DomainError::OperationFailed(format!("respuesta del detector no reconocida: {}", e)))?;

        debug!(count = parsed.detections.len(), "detector returned detections");
        // Una caja mal formada del detector es un fallo del detector, no del cliente.
        into_detections(parsed.detections)
            .map_err(|e| DomainError::OperationFailed(format!("el detector devolvió una detección inválida: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::post, Json, Router};
    use serde_json::{json, Value};

    async fn serve(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/detect", addr)
    }

    fn local_detector(url: String) -> RemoteDetector {
        let client = reqwest::Client::builder().no_proxy().build().unwrap();
        RemoteDetector::with_client(client, url)
    }

    #[test]
    fn empty_url_is_rejected() {
        assert!(RemoteDetector::new("  ", Duration::from_secs(1)).is_err());
    }

    #[tokio::test]
    async fn parses_detector_response() {
        let app = Router::new().route(
            "/detect",
            post(|Json(body): Json<Value>| async move {
                assert!(body["image"].as_str().is_some());
                Json(json!({
                    "detections": [
                        {"class": "drain", "confidence": 0.91, "box": [0.0, 0.0, 100.0, 100.0]},
                        {"class": "trash", "confidence": 0.55, "box": [10.0, 10.0, 20.0, 20.0]}
                    ]
                }))
            }),
        );
        let det = local_detector(serve(app).await);
        let out = det.detect(b"jpeg bytes").await.unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[1].label, "trash");
    }

    #[tokio::test]
    async fn server_error_is_an_operation_failure() {
        let app = Router::new().route("/detect", post(|| async { StatusCode::INTERNAL_SERVER_ERROR }));
        let det = local_detector(serve(app).await);
        let err = det.detect(b"x").await.unwrap_err();
        assert!(matches!(err, DomainError::OperationFailed(_)));
    }

    #[tokio::test]
    async fn malformed_box_from_detector_is_an_operation_failure() {
        let app = Router::new().route(
            "/detect",
            post(|| async {
                Json(json!({"detections": [{"class": "trash", "confidence": 0.5, "box": [9.0, 0.0, 1.0, 5.0]}]}))
            }),
        );
        let det = local_detector(serve(app).await);
        let err = det.detect(b"x").await.unwrap_err();
        assert!(matches!(err, DomainError::OperationFailed(_)));
    }
}
