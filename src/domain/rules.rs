use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Nombre de grupo -> conteo, tal como lo recibe la tabla de reglas.
pub type GroupCounts = BTreeMap<String, usize>;

/// Cualquier valor en el que puede resolverse una tabla de reglas.
pub trait StatusLabel: Clone + fmt::Debug + Send + Sync + 'static {
    fn label(&self) -> &str;
}

impl StatusLabel for String {
    fn label(&self) -> &str {
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
}

impl Comparison {
    pub fn apply(self, left: usize, right: usize) -> bool {
        match self {
            Comparison::Eq => left == right,
            Comparison::Ne => left != right,
            Comparison::Gt => left > right,
            Comparison::Ge => left >= right,
            Comparison::Lt => left < right,
            Comparison::Le => left <= right,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Predicate {
    Always,
    /// `counts[group] <cmp> value`
    Compare {
        group: String,
        cmp: Comparison,
        value: usize,
    },
    /// `counts[left] <cmp> counts[right]`
    CompareGroups {
        left: String,
        cmp: Comparison,
        right: String,
    },
    Any { of: Vec<Predicate> },
    All { of: Vec<Predicate> },
}

impl Predicate {
    pub fn count(group: impl Into<String>, cmp: Comparison, value: usize) -> Self {
        Predicate::Compare { group: group.into(), cmp, value }
    }

    pub fn groups(left: impl Into<String>, cmp: Comparison, right: impl Into<String>) -> Self {
        Predicate::CompareGroups { left: left.into(), cmp, right: right.into() }
    }

    /// Los grupos ausentes valen cero.
    pub fn eval(&self, counts: &GroupCounts) -> bool {
        let get = |g: &str| counts.get(g).copied().unwrap_or(0);
        match self {
            Predicate::Always => true,
            Predicate::Compare { group, cmp, value } => cmp.apply(get(group), *value),
            Predicate::CompareGroups { left, cmp, right } => cmp.apply(get(left), get(right)),
            Predicate::Any { of } => of.iter().any(|p| p.eval(counts)),
            Predicate::All { of } => of.iter().all(|p| p.eval(counts)),
        }
    }

    /// Grupos que lee este predicado.
    pub fn referenced_groups(&self) -> Vec<&str> {
        match self {
            Predicate::Always => Vec::new(),
            Predicate::Compare { group, .. } => vec![group.as_str()],
            Predicate::CompareGroups { left, right, .. } => vec![left.as_str(), right.as_str()],
            Predicate::Any { of } | Predicate::All { of } => {
                of.iter().flat_map(Predicate::referenced_groups).collect()
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule<S> {
    pub when: Predicate,
    pub status: S,
}

/// Reglas en orden; gana la primera que se cumple. `fallback` recoge el resto,
/// así que toda tabla produce un estado.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleTable<S> {
    pub rules: Vec<Rule<S>>,
    pub fallback: S,
}

impl<S: StatusLabel> RuleTable<S> {
    pub fn new(fallback: S) -> Self {
        Self { rules: Vec::new(), fallback }
    }

    pub fn rule(mut self, when: Predicate, status: S) -> Self {
        self.rules.push(Rule { when, status });
        self
    }

    pub fn classify(&self, counts: &GroupCounts) -> &S {
        self.rules
            .iter()
            .find(|r| r.when.eval(counts))
            .map(|r| &r.status)
            .unwrap_or(&self.fallback)
    }

    pub fn referenced_groups(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().flat_map(|r| r.when.referenced_groups())
    }
}
