use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{
    detection::{BoundingBox, Detection},
    errors::{DomainError, DomainResult},
    profiles::Assessment,
};

/// Detección en el formato del cable: `{ "class", "confidence", "box": [x1, y1, x2, y2] }`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DetectionDto {
    pub class: String,
    pub confidence: f32,
    #[serde(rename = "box")]
    pub bbox: [f64; 4],
}

impl TryFrom<DetectionDto> for Detection {
    type Error = DomainError;

    fn try_from(d: DetectionDto) -> DomainResult<Self> {
        let [x1, y1, x2, y2] = d.bbox;
        Detection::new(d.class, d.confidence, BoundingBox::new(x1, y1, x2, y2)?)
    }
}

impl From<&Detection> for DetectionDto {
    fn from(d: &Detection) -> Self {
        Self {
            class: d.label.clone(),
            confidence: d.confidence,
            bbox: d.bbox.to_array(),
        }
    }
}

pub fn into_detections(dtos: Vec<DetectionDto>) -> DomainResult<Vec<Detection>> {
    dtos.into_iter().map(Detection::try_from).collect()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssessRequest {
    /// Detecciones ya calculadas; si faltan se usa el detector con `image`.
    #[serde(default)]
    pub detections: Option<Vec<DetectionDto>>,
    /// Imagen codificada (JPEG/PNG) en base64.
    #[serde(default)]
    pub image: Option<String>,
    /// Incluir `annotated_image` en la respuesta (por defecto sí, si hay imagen).
    #[serde(default)]
    pub annotate: Option<bool>,
}

/// Envelope de respuesta. Los contadores se aplanan con el nombre propio del
/// dominio (`drainage_count`, `person_count`, ...).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssessmentResponse {
    pub domain: String,
    pub status: String,
    #[serde(flatten)]
    pub summary: BTreeMap<String, usize>,
    pub counts: BTreeMap<String, usize>,
    pub unrecognized: usize,
    pub boxes: Vec<DetectionDto>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotated_image: Option<String>,
}

impl From<Assessment> for AssessmentResponse {
    fn from(a: Assessment) -> Self {
        Self {
            boxes: a.detections.iter().map(DetectionDto::from).collect(),
            domain: a.domain,
            status: a.status,
            summary: a.fields,
            counts: a.counts,
            unrecognized: a.unrecognized,
            annotated_image: None,
        }
    }
}

/// Formato de respuesta que se espera del detector remoto.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorResponse {
    pub detections: Vec<DetectionDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorRequest {
    pub image: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OkResponse {
    pub ok: bool,
}
