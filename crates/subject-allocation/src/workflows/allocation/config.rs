use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

/// Per-deployment allocation settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationSettings {
    /// Tag stamped on every allocation. Defaults to the calendar year of the run.
    pub academic_year: Option<String>,
}

impl AllocationSettings {
    pub fn academic_year_for(&self, run_at: DateTime<Utc>) -> String {
        self.academic_year
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| run_at.year().to_string())
    }
}
