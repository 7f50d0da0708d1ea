use std::sync::Arc;
use crate::application::services::AssessmentService;

/// Estado compartido para los manejadores HTTP de Axum.
/// Siguiendo la Arquitectura Hexagonal, el estado contiene los servicios (Casos de Uso).
#[derive(Clone)]
pub struct HttpState {
    /// Servicio que agrupa detecciones y decide el estado de cada dominio.
    pub assessment: Arc<AssessmentService>,
    /// Límite del cuerpo de las peticiones; las imágenes en base64 superan el valor por defecto de Axum.
    pub max_body_bytes: usize,
}
