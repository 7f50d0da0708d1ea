use std::collections::{BTreeMap, BTreeSet};

use super::detection::Detection;
use super::errors::{DomainError, DomainResult};

/// Grupo dependiente cuyos miembros solo cuentan si solapan un grupo de referencia.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gate {
    pub dependent: String,
    pub reference: String,
}

/// Asocia etiquetas del detector (sin distinguir mayúsculas) a grupos semánticos.
#[derive(Debug, Clone, Default)]
pub struct GroupTaxonomy {
    labels: BTreeMap<String, String>,
    groups: BTreeSet<String>,
    gates: Vec<Gate>,
}

/// Detecciones repartidas por grupo, más las de etiqueta desconocida.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grouping {
    pub groups: BTreeMap<String, Vec<Detection>>,
    pub unrecognized: Vec<Detection>,
}

impl GroupTaxonomy {
    pub fn builder() -> GroupTaxonomyBuilder {
        GroupTaxonomyBuilder::default()
    }

    pub fn group_of(&self, label: &str) -> Option<&str> {
        self.labels.get(&label.to_lowercase()).map(String::as_str)
    }

    pub fn contains_group(&self, group: &str) -> bool {
        self.groups.contains(group)
    }

    pub fn groups(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(String::as_str)
    }

    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    pub fn gate_for(&self, dependent: &str) -> Option<&Gate> {
        self.gates.iter().find(|g| g.dependent == dependent)
    }

    /// Cada detección cae en exactamente una lista de grupo o en `unrecognized`.
    /// Dentro de cada lista se conserva el orden de entrada.
    pub fn partition(&self, detections: &[Detection]) -> Grouping {
        let mut groups: BTreeMap<String, Vec<Detection>> = self
            .groups
            .iter()
            .map(|g| (g.clone(), Vec::new()))
            .collect();
        let mut unrecognized = Vec::new();

        for det in detections {
            match self.group_of(&det.label).and_then(|g| groups.get_mut(g)) {
                Some(members) => members.push(det.clone()),
                None => unrecognized.push(det.clone()),
            }
        }

        Grouping { groups, unrecognized }
    }
}

#[derive(Debug, Default)]
pub struct GroupTaxonomyBuilder {
    groups: Vec<(String, Vec<String>)>,
    gates: Vec<Gate>,
}

impl GroupTaxonomyBuilder {
    /// Declara `group` y las etiquetas que le corresponden.
    pub fn group<I, L>(mut self, group: impl Into<String>, labels: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<String>,
    {
        self.groups
            .push((group.into(), labels.into_iter().map(Into::into).collect()));
        self
    }

    /// Los miembros de `dependent` solo cuentan si solapan un miembro de `reference`.
    pub fn gate(mut self, dependent: impl Into<String>, reference: impl Into<String>) -> Self {
        self.gates.push(Gate {
            dependent: dependent.into(),
            reference: reference.into(),
        });
        self
    }

    pub fn build(self) -> DomainResult<GroupTaxonomy> {
        let mut labels: BTreeMap<String, String> = BTreeMap::new();
        let mut groups = BTreeSet::new();

        for (group, raw_labels) in self.groups {
            if group.trim().is_empty() {
                return Err(DomainError::InvalidInput("nombre de grupo vacío".into()));
            }
            for raw in raw_labels {
                let key = raw.trim().to_lowercase();
                if let Some(existing) = labels.get(&key) {
                    if *existing != group {
                        return Err(DomainError::DuplicateLabel {
                            label: key,
                            first: existing.clone(),
                            second: group,
                        });
                    }
                    continue;
                }
                labels.insert(key, group.clone());
            }
            groups.insert(group);
        }

        for gate in &self.gates {
            for name in [&gate.dependent, &gate.reference] {
                if !groups.contains(name) {
                    return Err(DomainError::UnknownGroup(name.clone()));
                }
            }
            if gate.dependent == gate.reference {
                return Err(DomainError::InvalidInput(format!(
                    "el grupo '{}' no puede depender de sí mismo",
                    gate.dependent
                )));
            }
        }
        for (i, gate) in self.gates.iter().enumerate() {
            if self.gates[..i].iter().any(|g| g.dependent == gate.dependent) {
                return Err(DomainError::InvalidInput(format!(
                    "el grupo '{}' tiene más de una dependencia",
                    gate.dependent
                )));
            }
        }

        Ok(GroupTaxonomy {
            labels,
            groups,
            gates: self.gates,
        })
    }
}
