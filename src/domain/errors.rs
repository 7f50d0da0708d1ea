use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    #[error("Caja inválida [{x1}, {y1}, {x2}, {y2}]: {reason}")]
    InvalidBox {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        reason: &'static str,
    },
    #[error("Confianza fuera de rango [0, 1]: {0}")]
    InvalidConfidence(f32),
    #[error("Grupo desconocido en la configuración: {0}")]
    UnknownGroup(String),
    #[error("Etiqueta '{label}' asignada a '{first}' y '{second}'")]
    DuplicateLabel {
        label: String,
        first: String,
        second: String,
    },
    #[error("No encontrado: {0}")]
    NotFound(String),
    #[error("Entrada inválida: {0}")]
    InvalidInput(String),
    #[error("Error de operación: {0}")]
    OperationFailed(String),
}

pub type DomainResult<T> = Result<T, DomainError>;
