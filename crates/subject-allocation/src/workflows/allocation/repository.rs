use chrono::{DateTime, Utc};
use serde::Serialize;

use super::domain::{Allocation, Department, FacultyId, FacultyMember, Subject, SubjectId};

/// Read side of the faculty identity store, plus the single write used by
/// preference submission.
pub trait FacultyDirectory: Send + Sync {
    fn all(&self) -> Result<Vec<FacultyMember>, RepositoryError>;

    fn fetch(&self, id: &FacultyId) -> Result<Option<FacultyMember>, RepositoryError>;

    /// Store a first submission. Must return `RepositoryError::Conflict` when the
    /// member already has submitted preferences, checked under the same lock as
    /// the write.
    fn record_preferences(
        &self,
        id: &FacultyId,
        preferences: Vec<SubjectId>,
        submitted_at: DateTime<Utc>,
    ) -> Result<FacultyMember, RepositoryError>;

    fn active_with_submitted_preferences(&self) -> Result<Vec<FacultyMember>, RepositoryError> {
        Ok(self
            .all()?
            .into_iter()
            .filter(FacultyMember::is_allocation_candidate)
            .collect())
    }
}

/// Subject catalog collaborator.
pub trait SubjectCatalog: Send + Sync {
    fn by_department(&self, department: Department) -> Result<Vec<Subject>, RepositoryError>;

    fn fetch(&self, id: &SubjectId) -> Result<Option<Subject>, RepositoryError>;

    fn count(&self) -> Result<usize, RepositoryError> {
        let mut total = 0;
        for department in Department::ordered() {
            total += self.by_department(department)?.len();
        }
        Ok(total)
    }
}

/// Persistence for allocation results. `replace_all` must behave as one
/// delete-then-insert from the caller's point of view.
pub trait AllocationStore: Send + Sync {
    fn replace_all(&self, allocations: Vec<Allocation>) -> Result<(), RepositoryError>;

    fn for_faculty(&self, id: &FacultyId) -> Result<Option<Allocation>, RepositoryError>;

    fn all(&self) -> Result<Vec<Allocation>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("record was already written")]
    Conflict,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Allocation joined with its subject for faculty-facing display.
#[derive(Debug, Clone, Serialize)]
pub struct AllocationView {
    pub faculty_id: FacultyId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub faculty_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub designation: Option<&'static str>,
    pub subject_id: SubjectId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject_code: Option<String>,
    pub department: &'static str,
    pub academic_year: String,
    pub semester: u8,
    pub allocated_at: DateTime<Utc>,
    pub status: &'static str,
}

impl AllocationView {
    pub fn new(allocation: &Allocation, subject: Option<&Subject>) -> Self {
        Self {
            faculty_id: allocation.faculty_id.clone(),
            faculty_name: None,
            designation: None,
            subject_id: allocation.subject_id.clone(),
            subject_name: subject.map(|subject| subject.name.clone()),
            subject_code: subject.map(|subject| subject.code.clone()),
            department: allocation.department.label(),
            academic_year: allocation.academic_year.clone(),
            semester: allocation.semester,
            allocated_at: allocation.allocated_at,
            status: allocation.status.label(),
        }
    }

    pub fn with_faculty(mut self, member: &FacultyMember) -> Self {
        self.faculty_name = Some(member.name.clone());
        self.designation = Some(member.designation.label());
        self
    }
}
