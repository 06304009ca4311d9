use std::cmp;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use super::config::AllocationSettings;
use super::domain::{
    Allocation, AllocationId, AllocationStatus, Department, FacultyId, FacultyMember, Subject,
    SubjectId,
};
use super::eligibility::EligibilityFilter;
use super::engine::{AllocationEngine, AllocationPlan, CatalogSnapshot, DepartmentOutcome};
use super::preferences::{validate_submission, PreferenceRejection};
use super::repository::{
    AllocationStore, AllocationView, FacultyDirectory, RepositoryError, SubjectCatalog,
};
use super::seniority;
use super::stats::{self, AllocationStats};

/// Service composing the faculty directory, subject catalog, and allocation store.
pub struct AllocationService<F, S, A> {
    directory: Arc<F>,
    catalog: Arc<S>,
    store: Arc<A>,
    engine: AllocationEngine,
    filter: EligibilityFilter,
    settings: AllocationSettings,
}

static ALLOCATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_allocation_id() -> AllocationId {
    let id = ALLOCATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    AllocationId(format!("alloc-{id:06}"))
}

/// Result handed back to whoever triggered a run.
#[derive(Debug, Clone, Serialize)]
pub struct AllocationRunOutcome {
    pub success: bool,
    pub message: String,
    pub count: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub departments: Vec<DepartmentOutcome>,
}

impl AllocationRunOutcome {
    fn committed(plan: AllocationPlan) -> Self {
        let count = plan.count();
        let unmatched = plan.unmatched().count();
        let mut message = format!(
            "Allocation completed across all departments. {count} subjects allocated by designation and joining date priority."
        );
        if unmatched > 0 {
            message.push_str(&format!(
                " {unmatched} faculty could not be matched to any of their preferences."
            ));
        }

        Self {
            success: true,
            message,
            count,
            departments: plan.departments,
        }
    }

    pub fn failed(error: &AllocationServiceError) -> Self {
        Self {
            success: false,
            message: error.to_string(),
            count: 0,
            departments: Vec::new(),
        }
    }
}

impl<F, S, A> AllocationService<F, S, A>
where
    F: FacultyDirectory + 'static,
    S: SubjectCatalog + 'static,
    A: AllocationStore + 'static,
{
    pub fn new(
        directory: Arc<F>,
        catalog: Arc<S>,
        store: Arc<A>,
        settings: AllocationSettings,
    ) -> Self {
        Self {
            directory,
            catalog,
            store,
            engine: AllocationEngine::new(),
            filter: EligibilityFilter::new(),
            settings,
        }
    }

    /// Run allocation for the whole institution. Failures are folded into the outcome.
    pub fn run_allocation(&self) -> AllocationRunOutcome {
        match self.try_run_allocation(Utc::now()) {
            Ok(outcome) => outcome,
            Err(error) => AllocationRunOutcome::failed(&error),
        }
    }

    /// Snapshot collaborators, compute the plan, then replace the store in one write.
    /// Nothing is written unless every read succeeded.
    pub fn try_run_allocation(
        &self,
        run_at: DateTime<Utc>,
    ) -> Result<AllocationRunOutcome, AllocationServiceError> {
        let faculty: Vec<FacultyMember> = self
            .directory
            .active_with_submitted_preferences()
            .map_err(|source| AllocationServiceError::CollaboratorRead {
                collaborator: "faculty directory",
                source,
            })?
            .into_iter()
            .filter(FacultyMember::is_allocation_candidate)
            .collect();

        if faculty.is_empty() {
            warn!("allocation aborted: no faculty with submitted preferences");
            return Err(AllocationServiceError::NoEligibleInput);
        }

        let mut snapshot = CatalogSnapshot::new();
        for department in Department::ordered() {
            let subjects = self.catalog.by_department(department).map_err(|source| {
                AllocationServiceError::CollaboratorRead {
                    collaborator: "subject catalog",
                    source,
                }
            })?;
            snapshot.insert(department, subjects);
        }

        info!(
            faculty = faculty.len(),
            subjects = snapshot.len(),
            "starting allocation run"
        );

        let plan = self.engine.allocate(&faculty, &snapshot);
        let academic_year = self.settings.academic_year_for(run_at);
        let allocations: Vec<Allocation> = plan
            .assignments
            .iter()
            .map(|assignment| Allocation {
                id: next_allocation_id(),
                faculty_id: assignment.faculty_id.clone(),
                subject_id: assignment.subject_id.clone(),
                department: assignment.department,
                academic_year: academic_year.clone(),
                semester: assignment.semester,
                allocated_at: run_at,
                status: AllocationStatus::Allocated,
            })
            .collect();

        self.store
            .replace_all(allocations)
            .map_err(AllocationServiceError::Store)?;

        let outcome = AllocationRunOutcome::committed(plan);
        info!(
            count = outcome.count,
            academic_year = %academic_year,
            "allocation run committed"
        );
        Ok(outcome)
    }

    /// Current allocation for a faculty member, joined with its subject.
    pub fn allocation_for_faculty(
        &self,
        faculty_id: &FacultyId,
    ) -> Result<Option<AllocationView>, AllocationServiceError> {
        let Some(allocation) = self.store.for_faculty(faculty_id)? else {
            return Ok(None);
        };
        let subject = self.catalog.fetch(&allocation.subject_id)?;
        Ok(Some(AllocationView::new(&allocation, subject.as_ref())))
    }

    /// Committed allocations joined with faculty and subject records, ordered
    /// by department, then tier, then seniority. Allocations whose faculty
    /// record is gone sort last within their department.
    pub fn allocations(&self) -> Result<Vec<AllocationView>, AllocationServiceError> {
        let faculty: HashMap<FacultyId, FacultyMember> = self
            .directory
            .all()?
            .into_iter()
            .map(|member| (member.id.clone(), member))
            .collect();
        let mut allocations = self.store.all()?;
        allocations.sort_by(|left, right| {
            left.department.cmp(&right.department).then_with(|| {
                match (faculty.get(&left.faculty_id), faculty.get(&right.faculty_id)) {
                    (Some(a), Some(b)) => a
                        .designation
                        .cmp(&b.designation)
                        .then_with(|| seniority::compare_seniority(a, b)),
                    (Some(_), None) => cmp::Ordering::Less,
                    (None, Some(_)) => cmp::Ordering::Greater,
                    (None, None) => left.faculty_id.cmp(&right.faculty_id),
                }
            })
        });

        let mut views = Vec::with_capacity(allocations.len());
        for allocation in &allocations {
            let subject = self.catalog.fetch(&allocation.subject_id)?;
            let view = AllocationView::new(allocation, subject.as_ref());
            views.push(match faculty.get(&allocation.faculty_id) {
                Some(member) => view.with_faculty(member),
                None => view,
            });
        }
        Ok(views)
    }

    pub fn subject(&self, subject_id: &SubjectId) -> Result<Option<Subject>, AllocationServiceError> {
        Ok(self.catalog.fetch(subject_id)?)
    }

    /// Subjects the faculty member may rank, in catalog order.
    pub fn eligible_subjects(
        &self,
        faculty_id: &FacultyId,
    ) -> Result<Vec<Subject>, AllocationServiceError> {
        let member = self.member(faculty_id)?;
        let catalog = self.catalog.by_department(member.department)?;
        Ok(self
            .filter
            .eligible_for_member(&catalog, &member)
            .into_iter()
            .cloned()
            .collect())
    }

    /// Record a ranked preference list. Lists are write-once.
    pub fn submit_preferences(
        &self,
        faculty_id: &FacultyId,
        preferences: Vec<SubjectId>,
    ) -> Result<FacultyMember, AllocationServiceError> {
        let member = self.member(faculty_id)?;
        let catalog = self.catalog.by_department(member.department)?;
        validate_submission(&member, &catalog, &self.filter, &preferences)?;

        let stored = self
            .directory
            .record_preferences(faculty_id, preferences, Utc::now())
            .map_err(|error| match error {
                RepositoryError::Conflict => {
                    AllocationServiceError::Preferences(PreferenceRejection::AlreadySubmitted)
                }
                other => AllocationServiceError::Repository(other),
            })?;
        info!(
            faculty_id = %faculty_id,
            ranked = stored.preferences.len(),
            "preferences submitted"
        );
        Ok(stored)
    }

    pub fn stats(&self) -> Result<AllocationStats, AllocationServiceError> {
        let faculty = self.directory.all()?;
        let total_subjects = self.catalog.count()?;
        let allocations = self.store.all()?;
        Ok(stats::aggregate(&faculty, total_subjects, &allocations))
    }

    fn member(&self, faculty_id: &FacultyId) -> Result<FacultyMember, AllocationServiceError> {
        self.directory
            .fetch(faculty_id)?
            .ok_or_else(|| AllocationServiceError::FacultyNotFound(faculty_id.clone()))
    }
}

/// Error raised by the allocation service.
#[derive(Debug, thiserror::Error)]
pub enum AllocationServiceError {
    #[error("No faculty with submitted preferences found")]
    NoEligibleInput,
    #[error("failed to read {collaborator}: {source}")]
    CollaboratorRead {
        collaborator: &'static str,
        #[source]
        source: RepositoryError,
    },
    #[error("failed to store allocations: {0}")]
    Store(#[source] RepositoryError),
    #[error("faculty {0} not found")]
    FacultyNotFound(FacultyId),
    #[error(transparent)]
    Preferences(#[from] PreferenceRejection),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
