use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::aggregation::StatusEngine;
use super::detection::Detection;
use super::errors::{DomainError, DomainResult};
use super::rules::{Comparison, GroupCounts, Predicate, Rule, RuleTable, StatusLabel};
use super::status::{DrainageStatus, OccupancyStatus};
use super::taxonomy::GroupTaxonomy;

pub const DRAINAGE: &str = "drainage";
pub const OCCUPANCY: &str = "occupancy";

/// Claves fijas de la respuesta; ningún campo de conteo puede pisarlas.
pub const RESERVED_FIELDS: [&str; 6] = ["status", "domain", "counts", "boxes", "unrecognized", "annotated_image"];

/// Resultado de una agregación, independiente del dominio y listo para transporte.
#[derive(Debug, Clone, PartialEq)]
pub struct Assessment {
    pub domain: String,
    pub status: String,
    pub counts: GroupCounts,
    /// Conteos con el nombre de campo del dominio (`drainage_count`, ...).
    pub fields: BTreeMap<String, usize>,
    pub detections: Vec<Detection>,
    pub unrecognized: usize,
    /// Línea "1 drain, 0 obstruction" para los logs.
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileInfo {
    pub name: String,
    pub groups: Vec<String>,
    pub gates: Vec<(String, String)>,
    pub count_fields: BTreeMap<String, String>,
    pub overlap_threshold: f64,
}

/// Cara object-safe de un [`DomainProfile`]: perfiles con distintos tipos de
/// estado comparten un mismo registro.
pub trait Assessor: Send + Sync {
    fn name(&self) -> &str;
    fn info(&self) -> ProfileInfo;
    fn assess(&self, detections: &[Detection]) -> Assessment;
}

#[derive(Debug, Clone)]
pub struct DomainProfile<S> {
    name: String,
    engine: StatusEngine<S>,
    count_fields: BTreeMap<String, String>,
}

impl<S: StatusLabel> DomainProfile<S> {
    /// `count_fields` asocia grupo -> campo de la respuesta. Los grupos omitidos usan `<group>_count`.
    /// Los nombres de campo deben ser únicos y no coincidir con [`RESERVED_FIELDS`].
    pub fn new(
        name: impl Into<String>,
        engine: StatusEngine<S>,
        count_fields: BTreeMap<String, String>,
    ) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::InvalidInput("nombre de perfil vacío".into()));
        }
        if let Some(group) = count_fields.keys().find(|g| !engine.taxonomy().contains_group(g)) {
            return Err(DomainError::UnknownGroup(group.clone()));
        }
        let count_fields: BTreeMap<String, String> = engine
            .taxonomy()
            .groups()
            .map(|g| {
                let field = count_fields
                    .get(g)
                    .cloned()
                    .unwrap_or_else(|| format!("{}_count", g));
                (g.to_string(), field)
            })
            .collect();

        let mut seen = BTreeSet::new();
        for field in count_fields.values() {
            if RESERVED_FIELDS.contains(&field.as_str()) {
                return Err(DomainError::InvalidInput(format!(
                    "el campo '{}' está reservado en la respuesta",
                    field
                )));
            }
            if !seen.insert(field.as_str()) {
                return Err(DomainError::InvalidInput(format!(
                    "el campo '{}' se asigna a más de un grupo",
                    field
                )));
            }
        }
        Ok(Self { name, engine, count_fields })
    }
}

impl<S: StatusLabel> Assessor for DomainProfile<S> {
    fn name(&self) -> &str {
        &self.name
    }

    fn info(&self) -> ProfileInfo {
        let taxonomy = self.engine.taxonomy();
        ProfileInfo {
            name: self.name.clone(),
            groups: taxonomy.groups().map(str::to_string).collect(),
            gates: taxonomy
                .gates()
                .iter()
                .map(|g| (g.dependent.clone(), g.reference.clone()))
                .collect(),
            count_fields: self.count_fields.clone(),
            overlap_threshold: self.engine.overlap_threshold(),
        }
    }

    fn assess(&self, detections: &[Detection]) -> Assessment {
        let result = self.engine.aggregate(detections);
        let fields = result
            .counts
            .iter()
            .filter_map(|(group, count)| self.count_fields.get(group).map(|f| (f.clone(), *count)))
            .collect();

        Assessment {
            domain: self.name.clone(),
            status: result.status.label().to_string(),
            summary: result.summary(),
            unrecognized: result.unrecognized.len(),
            counts: result.counts,
            fields,
            detections: result.all,
        }
    }
}

fn fields(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs.iter().map(|(g, f)| (g.to_string(), f.to_string())).collect()
}

pub fn drainage_taxonomy() -> DomainResult<GroupTaxonomy> {
    GroupTaxonomy::builder()
        .group("drain", ["drain", "drains", "drainage", "drainages"])
        .group("obstruction", ["trash", "leaves", "rocks", "silt", "cracks", "manhole"])
        .gate("obstruction", "drain")
        .build()
}

pub fn drainage_rules() -> RuleTable<DrainageStatus> {
    RuleTable::new(DrainageStatus::Clear)
        .rule(Predicate::count("drain", Comparison::Eq, 0), DrainageStatus::NoDrainageDetected)
        .rule(Predicate::count("obstruction", Comparison::Gt, 2), DrainageStatus::Clogged)
        .rule(Predicate::count("obstruction", Comparison::Gt, 0), DrainageStatus::PartiallyBlocked)
}

pub fn occupancy_taxonomy() -> DomainResult<GroupTaxonomy> {
    GroupTaxonomy::builder()
        .group("person", ["person", "people"])
        .group("bench", ["bench"])
        .build()
}

pub fn occupancy_rules() -> RuleTable<OccupancyStatus> {
    let nobody_or_no_bench = Predicate::Any {
        of: vec![
            Predicate::count("person", Comparison::Eq, 0),
            Predicate::count("bench", Comparison::Eq, 0),
        ],
    };
    RuleTable::new(OccupancyStatus::PartiallyFull)
        .rule(nobody_or_no_bench, OccupancyStatus::Empty)
        .rule(Predicate::groups("person", Comparison::Ge, "bench"), OccupancyStatus::Full)
}

pub fn drainage_profile(overlap_threshold: f64) -> DomainResult<DomainProfile<DrainageStatus>> {
    let engine = StatusEngine::with_threshold(drainage_taxonomy()?, drainage_rules(), overlap_threshold)?;
    DomainProfile::new(
        DRAINAGE,
        engine,
        fields(&[("drain", "drainage_count"), ("obstruction", "obstruction_count")]),
    )
}

pub fn occupancy_profile(overlap_threshold: f64) -> DomainResult<DomainProfile<OccupancyStatus>> {
    let engine = StatusEngine::with_threshold(occupancy_taxonomy()?, occupancy_rules(), overlap_threshold)?;
    DomainProfile::new(
        OCCUPANCY,
        engine,
        fields(&[("person", "person_count"), ("bench", "bench_count")]),
    )
}

/// Perfil tal como se escribe en el fichero de perfiles; los estados son cadenas libres.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileSpec {
    pub name: String,
    pub groups: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub gates: Vec<GateSpec>,
    #[serde(default)]
    pub count_fields: BTreeMap<String, String>,
    #[serde(default)]
    pub rules: Vec<Rule<String>>,
    pub fallback: String,
    pub overlap_threshold: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GateSpec {
    pub dependent: String,
    pub reference: String,
}

impl ProfileSpec {
    pub fn build(self, default_threshold: f64) -> DomainResult<DomainProfile<String>> {
        let mut builder = GroupTaxonomy::builder();
        for (group, labels) in self.groups {
            builder = builder.group(group, labels);
        }
        for gate in self.gates {
            builder = builder.gate(gate.dependent, gate.reference);
        }
        let rules = RuleTable { rules: self.rules, fallback: self.fallback };
        let threshold = self.overlap_threshold.unwrap_or(default_threshold);
        let engine = StatusEngine::with_threshold(builder.build()?, rules, threshold)?;
        DomainProfile::new(self.name, engine, self.count_fields)
    }
}
