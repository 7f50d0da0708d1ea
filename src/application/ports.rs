use async_trait::async_trait;
use crate::domain::{detection::Detection, errors::DomainResult};

/// Detector externo: recibe la imagen codificada y devuelve sus detecciones.
#[async_trait]
pub trait DetectorPort: Send + Sync {
    async fn detect(&self, image: &[u8]) -> DomainResult<Vec<Detection>>;
}

/// Dibuja las cajas sobre la imagen; devuelve el JPEG anotado en base64.
#[async_trait]
pub trait RendererPort: Send + Sync {
    async fn render(&self, image: &[u8], detections: &[Detection]) -> DomainResult<String>;
}
