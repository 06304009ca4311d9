use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::domain::{Allocation, Designation, FacultyMember};

/// Dashboard counters derived from current store contents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationStats {
    pub total_faculty: usize,
    pub total_subjects: usize,
    pub total_allocations: usize,
    pub professors: usize,
    pub assistant_professors: usize,
    pub submitted_preferences: usize,
    pub pending_allocations: usize,
}

pub fn aggregate(
    faculty: &[FacultyMember],
    total_subjects: usize,
    allocations: &[Allocation],
) -> AllocationStats {
    let count_tier = |designation: Designation| {
        faculty
            .iter()
            .filter(|member| member.designation == designation)
            .count()
    };

    let submitted: HashSet<_> = faculty
        .iter()
        .filter(|member| member.has_submitted_preferences())
        .map(|member| &member.id)
        .collect();
    let allocated: HashSet<_> = allocations
        .iter()
        .map(|allocation| &allocation.faculty_id)
        .collect();

    AllocationStats {
        total_faculty: faculty.len(),
        total_subjects,
        total_allocations: allocations.len(),
        professors: count_tier(Designation::Professor),
        assistant_professors: count_tier(Designation::AssistantProfessor),
        submitted_preferences: submitted.len(),
        pending_allocations: submitted.len().saturating_sub(allocated.len()),
    }
}
