use std::collections::HashSet;

use super::domain::{FacultyMember, Subject, SubjectId};
use super::eligibility::EligibilityFilter;

/// Reasons a preference submission is refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PreferenceRejection {
    #[error("faculty account is deactivated")]
    Inactive,
    #[error("preferences were already submitted and cannot be changed")]
    AlreadySubmitted,
    #[error("at least one subject preference is required")]
    Empty,
    #[error("subject {0} is listed more than once")]
    Duplicate(SubjectId),
    #[error("subject {0} is not open to this faculty member")]
    Ineligible(SubjectId),
}

/// Checks a ranked list against the member's state and the department catalog.
pub(crate) fn validate_submission(
    member: &FacultyMember,
    catalog: &[Subject],
    filter: &EligibilityFilter,
    preferences: &[SubjectId],
) -> Result<(), PreferenceRejection> {
    if !member.active {
        return Err(PreferenceRejection::Inactive);
    }
    if member.preferences_submitted {
        return Err(PreferenceRejection::AlreadySubmitted);
    }
    if preferences.is_empty() {
        return Err(PreferenceRejection::Empty);
    }

    let eligible: HashSet<&SubjectId> = filter
        .eligible_for_member(catalog, member)
        .into_iter()
        .map(|subject| &subject.id)
        .collect();
    let mut seen = HashSet::new();

    for id in preferences {
        if !seen.insert(id) {
            return Err(PreferenceRejection::Duplicate(id.clone()));
        }
        if !eligible.contains(id) {
            return Err(PreferenceRejection::Ineligible(id.clone()));
        }
    }

    Ok(())
}
