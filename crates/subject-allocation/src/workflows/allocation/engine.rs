use std::collections::{BTreeMap, HashMap, HashSet};

use serde::Serialize;
use tracing::debug;

use super::domain::{Department, Designation, FacultyId, FacultyMember, Subject, SubjectId};
use super::eligibility::EligibilityFilter;
use super::seniority;

/// Department-keyed view of the subject catalog captured at the start of a run.
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    departments: BTreeMap<Department, Vec<Subject>>,
}

impl CatalogSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, department: Department, subjects: Vec<Subject>) {
        self.departments.insert(department, subjects);
    }

    pub fn subjects(&self, department: Department) -> &[Subject] {
        self.departments
            .get(&department)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.departments.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FromIterator<Subject> for CatalogSnapshot {
    fn from_iter<T: IntoIterator<Item = Subject>>(iter: T) -> Self {
        let mut departments: BTreeMap<Department, Vec<Subject>> = BTreeMap::new();
        for subject in iter {
            departments
                .entry(subject.department)
                .or_default()
                .push(subject);
        }
        Self { departments }
    }
}

/// A claim produced by the engine, before it is stamped and persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Assignment {
    pub faculty_id: FacultyId,
    pub subject_id: SubjectId,
    pub department: Department,
    pub designation: Designation,
    pub semester: u8,
    /// 1-based position of the claimed subject in the faculty member's list.
    pub preference_rank: usize,
}

/// Per-department result of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepartmentOutcome {
    pub department: Department,
    pub considered: usize,
    pub allocated: usize,
    /// Faculty whose whole preference list was already claimed.
    pub unmatched: Vec<FacultyId>,
}

impl DepartmentOutcome {
    fn new(department: Department) -> Self {
        Self {
            department,
            considered: 0,
            allocated: 0,
            unmatched: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AllocationPlan {
    pub assignments: Vec<Assignment>,
    pub departments: Vec<DepartmentOutcome>,
}

impl AllocationPlan {
    pub fn count(&self) -> usize {
        self.assignments.len()
    }

    pub fn unmatched(&self) -> impl Iterator<Item = &FacultyId> {
        self.departments
            .iter()
            .flat_map(|outcome| outcome.unmatched.iter())
    }
}

/// Stateless greedy matcher: departments in fixed order, professors before
/// assistant professors, seniority order within a tier, first unclaimed
/// eligible preference wins.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllocationEngine {
    filter: EligibilityFilter,
}

impl AllocationEngine {
    pub fn new() -> Self {
        Self {
            filter: EligibilityFilter::new(),
        }
    }

    pub fn allocate(&self, faculty: &[FacultyMember], catalog: &CatalogSnapshot) -> AllocationPlan {
        let mut plan = AllocationPlan::default();
        let mut claimed: HashSet<SubjectId> = HashSet::new();

        for department in Department::ordered() {
            let members: Vec<&FacultyMember> = faculty
                .iter()
                .filter(|member| member.department == department)
                .filter(|member| member.is_allocation_candidate())
                .collect();

            if members.is_empty() {
                debug!(department = department.code(), "no candidates, skipping");
                continue;
            }

            let index: HashMap<&SubjectId, &Subject> = catalog
                .subjects(department)
                .iter()
                .map(|subject| (&subject.id, subject))
                .collect();
            let mut outcome = DepartmentOutcome::new(department);

            for designation in Designation::ordered() {
                let ranked = seniority::rank(
                    members
                        .iter()
                        .copied()
                        .filter(|member| member.designation == designation),
                );

                for member in ranked {
                    outcome.considered += 1;
                    match self.first_claimable(member, &index, &claimed) {
                        Some((rank, subject)) => {
                            claimed.insert(subject.id.clone());
                            outcome.allocated += 1;
                            plan.assignments.push(Assignment {
                                faculty_id: member.id.clone(),
                                subject_id: subject.id.clone(),
                                department,
                                designation,
                                semester: subject.semester,
                                preference_rank: rank,
                            });
                        }
                        None => outcome.unmatched.push(member.id.clone()),
                    }
                }
            }

            debug!(
                department = department.code(),
                considered = outcome.considered,
                allocated = outcome.allocated,
                unmatched = outcome.unmatched.len(),
                "department allocated"
            );
            plan.departments.push(outcome);
        }

        plan
    }

    fn first_claimable<'c>(
        &self,
        member: &FacultyMember,
        index: &HashMap<&SubjectId, &'c Subject>,
        claimed: &HashSet<SubjectId>,
    ) -> Option<(usize, &'c Subject)> {
        member
            .preferences
            .iter()
            .enumerate()
            .filter_map(|(position, id)| index.get(id).map(|subject| (position + 1, *subject)))
            .find(|(_, subject)| {
                !claimed.contains(&subject.id)
                    && self
                        .filter
                        .permits(subject, member.department, member.designation)
            })
    }
}
