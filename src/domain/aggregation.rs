use std::collections::BTreeMap;

use super::counting::conditional_count;
use super::detection::Detection;
use super::errors::{DomainError, DomainResult};
use super::geometry::DEFAULT_OVERLAP_THRESHOLD;
use super::rules::{GroupCounts, RuleTable, StatusLabel};
use super::taxonomy::GroupTaxonomy;

#[derive(Debug, Clone, PartialEq)]
pub struct AggregationResult<S> {
    pub counts: GroupCounts,
    pub status: S,
    pub groups: BTreeMap<String, Vec<Detection>>,
    pub all: Vec<Detection>,
    pub unrecognized: Vec<Detection>,
}

impl<S> AggregationResult<S> {
    /// Línea legible "2 drain, 1 obstruction" para los logs.
    pub fn summary(&self) -> String {
        self.counts
            .iter()
            .map(|(group, count)| format!("{} {}", count, group))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Agregación puntual sobre una configuración sin validar.
pub fn aggregate<S: StatusLabel>(
    detections: &[Detection],
    taxonomy: &GroupTaxonomy,
    rules: &RuleTable<S>,
    overlap_threshold: f64,
) -> AggregationResult<S> {
    let grouping = taxonomy.partition(detections);

    let counts: GroupCounts = grouping
        .groups
        .iter()
        .map(|(group, members)| {
            let count = match taxonomy.gate_for(group) {
                Some(gate) => {
                    let references = grouping
                        .groups
                        .get(&gate.reference)
                        .map(Vec::as_slice)
                        .unwrap_or_default();
                    conditional_count(members, references, overlap_threshold)
                }
                None => members.len(),
            };
            (group.clone(), count)
        })
        .collect();

    let status = rules.classify(&counts).clone();

    AggregationResult {
        counts,
        status,
        groups: grouping.groups,
        all: detections.to_vec(),
        unrecognized: grouping.unrecognized,
    }
}

/// Taxonomía, reglas y umbral validados entre sí una sola vez y reutilizados
/// en cada petición.
#[derive(Debug, Clone)]
pub struct StatusEngine<S> {
    taxonomy: GroupTaxonomy,
    rules: RuleTable<S>,
    overlap_threshold: f64,
}

impl<S: StatusLabel> StatusEngine<S> {
    pub fn new(taxonomy: GroupTaxonomy, rules: RuleTable<S>) -> DomainResult<Self> {
        Self::with_threshold(taxonomy, rules, DEFAULT_OVERLAP_THRESHOLD)
    }

    pub fn with_threshold(
        taxonomy: GroupTaxonomy,
        rules: RuleTable<S>,
        overlap_threshold: f64,
    ) -> DomainResult<Self> {
        if !overlap_threshold.is_finite() || !(0.0..=1.0).contains(&overlap_threshold) {
            return Err(DomainError::InvalidInput(format!(
                "el umbral de solape debe estar en [0, 1], recibido {}",
                overlap_threshold
            )));
        }
        if let Some(unknown) = rules.referenced_groups().find(|g| !taxonomy.contains_group(g)) {
            return Err(DomainError::UnknownGroup(unknown.to_string()));
        }
        Ok(Self { taxonomy, rules, overlap_threshold })
    }

    pub fn taxonomy(&self) -> &GroupTaxonomy {
        &self.taxonomy
    }

    pub fn overlap_threshold(&self) -> f64 {
        self.overlap_threshold
    }

    pub fn aggregate(&self, detections: &[Detection]) -> AggregationResult<S> {
        aggregate(detections, &self.taxonomy, &self.rules, self.overlap_threshold)
    }
}
