use std::collections::HashMap;
use std::sync::{Arc, Barrier, Mutex};

use axum::response::Response;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde_json::Value;

use crate::workflows::allocation::domain::{
    Allocation, Department, Designation, FacultyId, FacultyMember, Subject, SubjectId,
    SubjectType,
};
use crate::workflows::allocation::repository::{
    AllocationStore, FacultyDirectory, RepositoryError, SubjectCatalog,
};
use crate::workflows::allocation::{allocation_router, AllocationService, AllocationSettings};

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub(super) fn run_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 7, 1, 10, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn subject(id: &str, department: Department, semester: u8) -> Subject {
    let designation = if semester <= 4 {
        Designation::Professor
    } else {
        Designation::AssistantProfessor
    };
    Subject {
        id: SubjectId(id.to_string()),
        name: format!("Subject {id}"),
        code: id.to_ascii_uppercase(),
        department,
        year: (semester + 1) / 2,
        semester,
        credits: 3,
        subject_type: SubjectType::Core,
        eligible_for: vec![designation],
    }
}

pub(super) fn faculty(
    id: &str,
    department: Department,
    designation: Designation,
    joined: NaiveDate,
    registration_seq: u64,
    preferences: &[&str],
) -> FacultyMember {
    FacultyMember {
        id: FacultyId(id.to_string()),
        name: format!("Faculty {id}"),
        department,
        designation,
        joining_date: joined,
        registration_seq,
        active: true,
        preferences: preferences
            .iter()
            .map(|id| SubjectId(id.to_string()))
            .collect(),
        preferences_submitted: !preferences.is_empty(),
        submitted_at: None,
    }
}

pub(super) fn professor(id: &str, joined_year: i32, seq: u64, preferences: &[&str]) -> FacultyMember {
    faculty(
        id,
        Department::ComputerScience,
        Designation::Professor,
        date(joined_year, 7, 1),
        seq,
        preferences,
    )
}

pub(super) fn assistant(id: &str, joined_year: i32, seq: u64, preferences: &[&str]) -> FacultyMember {
    faculty(
        id,
        Department::ComputerScience,
        Designation::AssistantProfessor,
        date(joined_year, 7, 1),
        seq,
        preferences,
    )
}

/// Small CSE catalog: cs-1..cs-4 for professors, cs-5..cs-8 for assistant professors.
pub(super) fn cse_catalog() -> Vec<Subject> {
    (1..=8)
        .map(|semester| subject(&format!("cs-{semester}"), Department::ComputerScience, semester))
        .collect()
}

#[derive(Default, Clone)]
pub(super) struct MemoryDirectory {
    pub(super) members: Arc<Mutex<Vec<FacultyMember>>>,
}

impl MemoryDirectory {
    pub(super) fn with(members: Vec<FacultyMember>) -> Self {
        Self {
            members: Arc::new(Mutex::new(members)),
        }
    }
}

impl FacultyDirectory for MemoryDirectory {
    fn all(&self) -> Result<Vec<FacultyMember>, RepositoryError> {
        Ok(self.members.lock().expect("directory mutex poisoned").clone())
    }

    fn fetch(&self, id: &FacultyId) -> Result<Option<FacultyMember>, RepositoryError> {
        let guard = self.members.lock().expect("directory mutex poisoned");
        Ok(guard.iter().find(|member| &member.id == id).cloned())
    }

    fn record_preferences(
        &self,
        id: &FacultyId,
        preferences: Vec<SubjectId>,
        submitted_at: DateTime<Utc>,
    ) -> Result<FacultyMember, RepositoryError> {
        let mut guard = self.members.lock().expect("directory mutex poisoned");
        let member = guard
            .iter_mut()
            .find(|member| &member.id == id)
            .ok_or(RepositoryError::NotFound)?;
        if member.preferences_submitted {
            return Err(RepositoryError::Conflict);
        }
        member.preferences = preferences;
        member.preferences_submitted = true;
        member.submitted_at = Some(submitted_at);
        Ok(member.clone())
    }
}

/// Holds every `fetch` at a barrier so concurrent submissions read the same
/// pre-submission state before either one writes.
pub(super) struct GatedDirectory {
    pub(super) inner: MemoryDirectory,
    pub(super) gate: Arc<Barrier>,
}

impl FacultyDirectory for GatedDirectory {
    fn all(&self) -> Result<Vec<FacultyMember>, RepositoryError> {
        self.inner.all()
    }

    fn fetch(&self, id: &FacultyId) -> Result<Option<FacultyMember>, RepositoryError> {
        let member = self.inner.fetch(id);
        self.gate.wait();
        member
    }

    fn record_preferences(
        &self,
        id: &FacultyId,
        preferences: Vec<SubjectId>,
        submitted_at: DateTime<Utc>,
    ) -> Result<FacultyMember, RepositoryError> {
        self.inner.record_preferences(id, preferences, submitted_at)
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryCatalog {
    subjects: Arc<Vec<Subject>>,
}

impl MemoryCatalog {
    pub(super) fn with(subjects: Vec<Subject>) -> Self {
        Self {
            subjects: Arc::new(subjects),
        }
    }
}

impl SubjectCatalog for MemoryCatalog {
    fn by_department(&self, department: Department) -> Result<Vec<Subject>, RepositoryError> {
        Ok(self
            .subjects
            .iter()
            .filter(|subject| subject.department == department)
            .cloned()
            .collect())
    }

    fn fetch(&self, id: &SubjectId) -> Result<Option<Subject>, RepositoryError> {
        Ok(self.subjects.iter().find(|subject| &subject.id == id).cloned())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryStore {
    allocations: Arc<Mutex<HashMap<FacultyId, Allocation>>>,
    writes: Arc<Mutex<usize>>,
}

impl MemoryStore {
    pub(super) fn seeded(allocations: Vec<Allocation>) -> Self {
        let store = Self::default();
        {
            let mut guard = store.allocations.lock().expect("store mutex poisoned");
            for allocation in allocations {
                guard.insert(allocation.faculty_id.clone(), allocation);
            }
        }
        store
    }

    pub(super) fn writes(&self) -> usize {
        *self.writes.lock().expect("store mutex poisoned")
    }

    /// Sorted (faculty, subject) pairs for order-independent comparisons.
    pub(super) fn pairs(&self) -> Vec<(String, String)> {
        let guard = self.allocations.lock().expect("store mutex poisoned");
        let mut pairs: Vec<_> = guard
            .values()
            .map(|allocation| {
                (
                    allocation.faculty_id.0.clone(),
                    allocation.subject_id.0.clone(),
                )
            })
            .collect();
        pairs.sort();
        pairs
    }
}

impl AllocationStore for MemoryStore {
    fn replace_all(&self, allocations: Vec<Allocation>) -> Result<(), RepositoryError> {
        let replacement: HashMap<_, _> = allocations
            .into_iter()
            .map(|allocation| (allocation.faculty_id.clone(), allocation))
            .collect();
        *self.allocations.lock().expect("store mutex poisoned") = replacement;
        *self.writes.lock().expect("store mutex poisoned") += 1;
        Ok(())
    }

    fn for_faculty(&self, id: &FacultyId) -> Result<Option<Allocation>, RepositoryError> {
        let guard = self.allocations.lock().expect("store mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn all(&self) -> Result<Vec<Allocation>, RepositoryError> {
        let guard = self.allocations.lock().expect("store mutex poisoned");
        Ok(guard.values().cloned().collect())
    }
}

pub(super) struct UnavailableCatalog;

impl SubjectCatalog for UnavailableCatalog {
    fn by_department(&self, _department: Department) -> Result<Vec<Subject>, RepositoryError> {
        Err(RepositoryError::Unavailable("catalog offline".to_string()))
    }

    fn fetch(&self, _id: &SubjectId) -> Result<Option<Subject>, RepositoryError> {
        Err(RepositoryError::Unavailable("catalog offline".to_string()))
    }
}

pub(super) struct ReadOnlyStore;

impl AllocationStore for ReadOnlyStore {
    fn replace_all(&self, _allocations: Vec<Allocation>) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }

    fn for_faculty(&self, _id: &FacultyId) -> Result<Option<Allocation>, RepositoryError> {
        Ok(None)
    }

    fn all(&self) -> Result<Vec<Allocation>, RepositoryError> {
        Ok(Vec::new())
    }
}

pub(super) type MemoryService = AllocationService<MemoryDirectory, MemoryCatalog, MemoryStore>;

pub(super) fn build_service(
    members: Vec<FacultyMember>,
    subjects: Vec<Subject>,
) -> (MemoryService, MemoryDirectory, MemoryStore) {
    let directory = MemoryDirectory::with(members);
    let store = MemoryStore::default();
    let service = AllocationService::new(
        Arc::new(directory.clone()),
        Arc::new(MemoryCatalog::with(subjects)),
        Arc::new(store.clone()),
        AllocationSettings::default(),
    );
    (service, directory, store)
}

pub(super) fn router_with_service(service: MemoryService) -> axum::Router {
    allocation_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
