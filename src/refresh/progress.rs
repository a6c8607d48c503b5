//! Cosmetic progress labels shown while a refresh runs
//!
//! The labels follow a fixed schedule and say nothing about real
//! progress. The refresh itself may finish before or after the last one.

use serde::Serialize;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressStage {
    pub offset: Duration,
    pub label: String,
}

impl ProgressStage {
    pub fn new(offset_ms: u64, label: impl Into<String>) -> Self {
        Self {
            offset: Duration::from_millis(offset_ms),
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgressSchedule {
    stages: Vec<ProgressStage>,
}

impl ProgressSchedule {
    const FALLBACK_LABEL: &'static str = "Refreshing prices...";

    /// Stages are kept ordered by offset
    pub fn new(mut stages: Vec<ProgressStage>) -> Self {
        stages.sort_by_key(|s| s.offset);
        Self { stages }
    }

    /// Label shown the moment a refresh starts
    pub fn initial_label(&self) -> &str {
        self.stages
            .first()
            .map(|s| s.label.as_str())
            .unwrap_or(Self::FALLBACK_LABEL)
    }

    /// Stages after the initial one
    pub fn later_stages(&self) -> &[ProgressStage] {
        self.stages.get(1..).unwrap_or(&[])
    }
}

impl Default for ProgressSchedule {
    fn default() -> Self {
        Self::new(vec![
            ProgressStage::new(0, "Starting price refresh..."),
            ProgressStage::new(500, "Fetching prices from Top Gold..."),
            ProgressStage::new(6_000, "Fetching prices from Tavex..."),
            ProgressStage::new(12_000, "Fetching prices from iGold..."),
        ])
    }
}
