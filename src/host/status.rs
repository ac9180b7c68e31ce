// ABOUTME: Workload status values understood by the host.

use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkloadStatus {
    /// Work in progress; the unit is not serving yet.
    Maintenance,
    /// Serving.
    Active,
    /// Idle until something external happens.
    Waiting,
}

impl fmt::Display for WorkloadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            WorkloadStatus::Maintenance => "maintenance",
            WorkloadStatus::Active => "active",
            WorkloadStatus::Waiting => "waiting",
        })
    }
}
