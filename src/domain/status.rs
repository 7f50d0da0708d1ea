use std::fmt;

use serde::{Deserialize, Serialize};

use super::rules::StatusLabel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DrainageStatus {
    #[serde(rename = "No Drainage Detected")]
    NoDrainageDetected,
    Clogged,
    #[serde(rename = "Partially Blocked")]
    PartiallyBlocked,
    Clear,
}

impl StatusLabel for DrainageStatus {
    fn label(&self) -> &str {
        match self {
            DrainageStatus::NoDrainageDetected => "No Drainage Detected",
            DrainageStatus::Clogged => "Clogged",
            DrainageStatus::PartiallyBlocked => "Partially Blocked",
            DrainageStatus::Clear => "Clear",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OccupancyStatus {
    Empty,
    Full,
    #[serde(rename = "Partially Full")]
    PartiallyFull,
}

impl StatusLabel for OccupancyStatus {
    fn label(&self) -> &str {
        match self {
            OccupancyStatus::Empty => "Empty",
            OccupancyStatus::Full => "Full",
            OccupancyStatus::PartiallyFull => "Partially Full",
        }
    }
}

impl fmt::Display for DrainageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl fmt::Display for OccupancyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
