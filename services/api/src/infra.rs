use chrono::{DateTime, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use subject_allocation::workflows::allocation::{
    Allocation, AllocationService, AllocationSettings, AllocationStore, Department,
    FacultyDirectory, FacultyId, FacultyMember, RepositoryError, Subject, SubjectCatalog,
    SubjectId,
};
use subject_allocation::workflows::roster::Roster;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) type InMemoryAllocationService =
    AllocationService<InMemoryFacultyDirectory, InMemorySubjectCatalog, InMemoryAllocationStore>;

/// Wire a service over in-memory collaborators seeded from `roster`.
pub(crate) fn in_memory_service(
    roster: Roster,
    settings: AllocationSettings,
) -> InMemoryAllocationService {
    AllocationService::new(
        Arc::new(InMemoryFacultyDirectory::new(roster.faculty)),
        Arc::new(InMemorySubjectCatalog::new(roster.subjects)),
        Arc::new(InMemoryAllocationStore::default()),
        settings,
    )
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryFacultyDirectory {
    members: Arc<Mutex<Vec<FacultyMember>>>,
}

impl InMemoryFacultyDirectory {
    pub(crate) fn new(members: Vec<FacultyMember>) -> Self {
        Self {
            members: Arc::new(Mutex::new(members)),
        }
    }
}

impl FacultyDirectory for InMemoryFacultyDirectory {
    fn all(&self) -> Result<Vec<FacultyMember>, RepositoryError> {
        let guard = self.members.lock().expect("directory mutex poisoned");
        Ok(guard.clone())
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

#[derive(Default, Clone)]
pub(crate) struct InMemorySubjectCatalog {
    subjects: Arc<Vec<Subject>>,
}

impl InMemorySubjectCatalog {
    pub(crate) fn new(subjects: Vec<Subject>) -> Self {
        Self {
            subjects: Arc::new(subjects),
        }
    }
}

impl SubjectCatalog for InMemorySubjectCatalog {
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

    fn count(&self) -> Result<usize, RepositoryError> {
        Ok(self.subjects.len())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryAllocationStore {
    records: Arc<Mutex<HashMap<FacultyId, Allocation>>>,
}

impl AllocationStore for InMemoryAllocationStore {
    fn replace_all(&self, allocations: Vec<Allocation>) -> Result<(), RepositoryError> {
        let replacement: HashMap<_, _> = allocations
            .into_iter()
            .map(|allocation| (allocation.faculty_id.clone(), allocation))
            .collect();
        let mut guard = self.records.lock().expect("store mutex poisoned");
        *guard = replacement;
        Ok(())
    }

    fn for_faculty(&self, id: &FacultyId) -> Result<Option<Allocation>, RepositoryError> {
        let guard = self.records.lock().expect("store mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn all(&self) -> Result<Vec<Allocation>, RepositoryError> {
        let guard = self.records.lock().expect("store mutex poisoned");
        let mut records: Vec<_> = guard.values().cloned().collect();
        records.sort_by(|left, right| left.faculty_id.cmp(&right.faculty_id));
        Ok(records)
    }
}

/// Accepts `2026` or `2026-27` style academic year tags.
pub(crate) fn parse_academic_year(raw: &str) -> Result<String, String> {
    let value = raw.trim();
    let (start, end) = match value.split_once('-') {
        Some((start, end)) => (start, Some(end)),
        None => (value, None),
    };
    let start_ok = start.len() == 4 && start.chars().all(|ch| ch.is_ascii_digit());
    let end_ok = end.map_or(true, |end| {
        (end.len() == 2 || end.len() == 4) && end.chars().all(|ch| ch.is_ascii_digit())
    });
    if start_ok && end_ok {
        Ok(value.to_string())
    } else {
        Err(format!("'{raw}' is not an academic year like 2026 or 2026-27"))
    }
}
