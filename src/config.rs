use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::domain::geometry::DEFAULT_OVERLAP_THRESHOLD;
use crate::domain::profiles::{DomainProfile, ProfileSpec};

const DEFAULT_ADDR: &str = "0.0.0.0:8090";
const DEFAULT_DETECTOR_TIMEOUT_SECS: u64 = 30;
// Una foto de móvil en base64 ronda los 5-8 MiB.
const DEFAULT_MAX_BODY_BYTES: usize = 20 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub addr: String,
    pub overlap_threshold: f64,
    pub detector_url: Option<String>,
    pub detector_timeout: Duration,
    pub profiles_path: Option<PathBuf>,
    pub static_dir: Option<PathBuf>,
    /// Tamaño máximo del cuerpo de una petición (JSON o multipart).
    pub max_body_bytes: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_ADDR.to_string(),
            overlap_threshold: DEFAULT_OVERLAP_THRESHOLD,
            detector_url: None,
            detector_timeout: Duration::from_secs(DEFAULT_DETECTOR_TIMEOUT_SECS),
            profiles_path: None,
            static_dir: None,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Igual que [`AppConfig::from_env`] pero con la fuente de variables inyectable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let mut cfg = Self::default();

        if let Some(addr) = get("ASSESS_ADDR") {
            cfg.addr = addr;
        }
        if let Some(raw) = get("ASSESS_OVERLAP_THRESHOLD") {
            let value: f64 = raw
                .parse()
                .with_context(|| format!("ASSESS_OVERLAP_THRESHOLD no es un número: {}", raw))?;
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(anyhow!("ASSESS_OVERLAP_THRESHOLD debe estar en [0, 1], recibido {}", value));
            }
            cfg.overlap_threshold = value;
        }
        cfg.detector_url = get("ASSESS_DETECTOR_URL");
        if let Some(raw) = get("ASSESS_DETECTOR_TIMEOUT_SECS") {
            let secs: u64 = raw
                .parse()
                .with_context(|| format!("ASSESS_DETECTOR_TIMEOUT_SECS no es un entero: {}", raw))?;
            cfg.detector_timeout = Duration::from_secs(secs);
        }
        cfg.profiles_path = get("ASSESS_PROFILES").map(PathBuf::from);
        cfg.static_dir = get("ASSESS_STATIC_DIR").map(PathBuf::from);
        if let Some(raw) = get("ASSESS_MAX_BODY_BYTES") {
            let bytes: usize = raw
                .parse()
                .with_context(|| format!("ASSESS_MAX_BODY_BYTES no es un entero: {}", raw))?;
            if bytes == 0 {
                return Err(anyhow!("ASSESS_MAX_BODY_BYTES debe ser mayor que 0"));
            }
            cfg.max_body_bytes = bytes;
        }

        Ok(cfg)
    }
}

/// Lee un array JSON de perfiles de dominio.
pub fn load_profiles(path: &Path, default_threshold: f64) -> Result<Vec<DomainProfile<String>>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("leyendo el fichero de perfiles {}", path.display()))?;
    let specs: Vec<ProfileSpec> = serde_json::from_str(&contents)
        .with_context(|| format!("interpretando el fichero de perfiles {}", path.display()))?;

    specs
        .into_iter()
        .map(|spec| {
            let name = spec.name.clone();
            spec.build(default_threshold)
                .with_context(|| format!("perfil '{}' en {}", name, path.display()))
        })
        .collect()
}
