use std::sync::Arc;

use anyhow::Context;
use tower_http::services::ServeDir;
use tracing_subscriber::EnvFilter;

use detection_assessor::{
    adapters::{
        detector::remote::RemoteDetector,
        http::{router, state::HttpState},
        render::annotate::BoxAnnotator,
    },
    application::{
        ports::{DetectorPort, RendererPort},
        services::AssessmentService,
    },
    config::{load_profiles, AppConfig},
    domain::profiles::{drainage_profile, occupancy_profile},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Inicializar logs (RUST_LOG=info por defecto)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cfg = AppConfig::from_env()?;
    tracing::info!("🔧 Configuración cargada: {:?}", cfg);

    // 2. Instanciar Adaptadores (Capa de Infraestructura)
    let detector: Option<Arc<dyn DetectorPort>> = match &cfg.detector_url {
        Some(url) => {
            tracing::info!("🛰️ Detector remoto en {}", url);
            Some(Arc::new(RemoteDetector::new(url.clone(), cfg.detector_timeout)?))
        }
        None => {
            tracing::warn!("Sin ASSESS_DETECTOR_URL: solo se aceptan peticiones con 'detections'");
            None
        }
    };
    let renderer: Option<Arc<dyn RendererPort>> = Some(Arc::new(BoxAnnotator::default()));

    // 3. Instanciar Servicios (Capa de Aplicación - Casos de Uso)
    let mut service = AssessmentService::new(detector, renderer)
        .with_profile(Arc::new(drainage_profile(cfg.overlap_threshold)?))?
        .with_profile(Arc::new(occupancy_profile(cfg.overlap_threshold)?))?;

    if let Some(path) = &cfg.profiles_path {
        for profile in load_profiles(path, cfg.overlap_threshold)? {
            service
                .register(Arc::new(profile))
                .with_context(|| format!("registrando perfiles de {}", path.display()))?;
        }
    }
    for info in service.domains() {
        tracing::info!("📋 Dominio '{}': grupos {:?}", info.name, info.groups);
    }

    // 4. Configurar el Estado de la API
    let state = HttpState {
        assessment: Arc::new(service),
        max_body_bytes: cfg.max_body_bytes,
    };

    // 5. Configurar el Router de Axum y Archivos Estáticos
    let app = match &cfg.static_dir {
        Some(dir) => {
            tracing::info!("📂 Archivos estáticos servidos desde {}", dir.display());
            router(state).fallback_service(ServeDir::new(dir))
        }
        None => router(state),
    };

    // 6. Lanzar el Servidor
    tracing::info!("🚀 Servidor de evaluación iniciado en http://{}", cfg.addr);
    let listener = tokio::net::TcpListener::bind(&cfg.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
