use std::collections::BTreeMap;
use std::sync::Arc;

use base64::{prelude::BASE64_STANDARD, Engine};
use tracing::{debug, info, warn};

use crate::{
    application::{
        dto::{into_detections, AssessRequest, AssessmentResponse, DetectionDto},
        ports::{DetectorPort, RendererPort},
    },
    domain::{
        detection::Detection,
        errors::{DomainError, DomainResult},
        profiles::{Assessor, ProfileInfo},
    },
};

/// Caso de uso principal: convierte las detecciones de una imagen en el
/// estado del dominio pedido (drenaje, ocupación, o perfiles cargados de fichero).
#[derive(Clone, Default)]
pub struct AssessmentService {
    profiles: BTreeMap<String, Arc<dyn Assessor>>,
    detector: Option<Arc<dyn DetectorPort>>,
    renderer: Option<Arc<dyn RendererPort>>,
}

impl AssessmentService {
    pub fn new(
        detector: Option<Arc<dyn DetectorPort>>,
        renderer: Option<Arc<dyn RendererPort>>,
    ) -> Self {
        Self {
            profiles: BTreeMap::new(),
            detector,
            renderer,
        }
    }

    /// Registra un perfil; los nombres de dominio son únicos.
    pub fn register(&mut self, profile: Arc<dyn Assessor>) -> DomainResult<()> {
        let name = profile.name().to_string();
        if self.profiles.contains_key(&name) {
            return Err(DomainError::InvalidInput(format!("dominio '{}' registrado dos veces", name)));
        }
        debug!(domain = %name, "profile registered");
        self.profiles.insert(name, profile);
        Ok(())
    }

    pub fn with_profile(mut self, profile: Arc<dyn Assessor>) -> DomainResult<Self> {
        self.register(profile)?;
        Ok(self)
    }

    pub fn domains(&self) -> Vec<ProfileInfo> {
        self.profiles.values().map(|p| p.info()).collect()
    }

    pub fn has_detector(&self) -> bool {
        self.detector.is_some()
    }

    /// Evalúa una petición JSON: detecciones (directas o vía detector),
    /// clasificación y, si hay imagen, la versión anotada.
    pub async fn assess(&self, domain: &str, req: AssessRequest) -> DomainResult<AssessmentResponse> {
        let image = req
            .image
            .as_deref()
            .map(|b64| {
                BASE64_STANDARD
                    .decode(b64.trim())
                    .map_err(|e| DomainError::InvalidInput(format!("la imagen no es base64 válido: {}", e)))
            })
            .transpose()?;

        self.evaluate(domain, req.detections, image, req.annotate.unwrap_or(true))
            .await
    }

    /// Evalúa una imagen subida en bruto (multipart); siempre pasa por el detector.
    pub async fn assess_image(
        &self,
        domain: &str,
        image: Vec<u8>,
        annotate: bool,
    ) -> DomainResult<AssessmentResponse> {
        self.evaluate(domain, None, Some(image), annotate).await
    }

    async fn evaluate(
        &self,
        domain: &str,
        detections: Option<Vec<DetectionDto>>,
        image: Option<Vec<u8>>,
        annotate: bool,
    ) -> DomainResult<AssessmentResponse> {
        let profile = self
            .profiles
            .get(domain)
            .ok_or_else(|| DomainError::NotFound(format!("dominio '{}'", domain)))?;

        let detections = match (detections, image.as_deref()) {
            (Some(dtos), _) => into_detections(dtos)?,
            (None, Some(bytes)) => self.detect(bytes).await?,
            (None, None) => {
                return Err(DomainError::InvalidInput(
                    "la petición necesita 'detections' o 'image'".into(),
                ))
            }
        };

        let assessment = profile.assess(&detections);
        info!(
            domain = %assessment.domain,
            status = %assessment.status,
            detections = detections.len(),
            unrecognized = assessment.unrecognized,
            "assessment done: {}",
            assessment.summary
        );

        let mut response = AssessmentResponse::from(assessment);
        if let Some(bytes) = image.as_deref() {
            if annotate {
                response.annotated_image = self.annotate(bytes, &detections).await;
            }
        }
        Ok(response)
    }

    async fn detect(&self, image: &[u8]) -> DomainResult<Vec<Detection>> {
        let detector = self.detector.as_ref().ok_or_else(|| {
            DomainError::InvalidInput("no hay detector configurado; envíe 'detections'".into())
        })?;
        detector.detect(image).await
    }

    // La imagen anotada es opcional: un fallo del renderer no invalida la evaluación.
    async fn annotate(&self, image: &[u8], detections: &[Detection]) -> Option<String> {
        let renderer = self.renderer.as_ref()?;
        match renderer.render(image, detections).await {
            Ok(encoded) => Some(encoded),
            Err(e) => {
                warn!("renderer failed, answering without annotated image: {}", e);
                None
            }
        }
    }
}
