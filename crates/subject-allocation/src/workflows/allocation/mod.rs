//! Subject allocation: eligibility rules, seniority ranking, the greedy
//! allocation engine, and the service that commits its results.

pub mod config;
pub mod domain;
pub mod eligibility;
pub mod engine;
pub(crate) mod preferences;
pub mod repository;
pub mod router;
pub mod seniority;
pub mod service;
pub mod stats;

#[cfg(test)]
mod tests;

pub use config::AllocationSettings;
pub use domain::{
    Allocation, AllocationId, AllocationStatus, Department, Designation, FacultyId,
    FacultyMember, Subject, SubjectId, SubjectType,
};
pub use eligibility::EligibilityFilter;
pub use engine::{AllocationEngine, AllocationPlan, Assignment, CatalogSnapshot, DepartmentOutcome};
pub use preferences::PreferenceRejection;
pub use repository::{
    AllocationStore, AllocationView, FacultyDirectory, RepositoryError, SubjectCatalog,
};
pub use router::allocation_router;
pub use service::{AllocationRunOutcome, AllocationService, AllocationServiceError};
pub use stats::AllocationStats;
