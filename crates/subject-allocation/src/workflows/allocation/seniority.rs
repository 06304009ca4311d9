use std::cmp::Ordering;

use super::domain::FacultyMember;

/// Total order used for allocation priority within a tier: earliest joining
/// date first, then registration sequence, then id.
pub fn compare_seniority(left: &FacultyMember, right: &FacultyMember) -> Ordering {
    left.joining_date
        .cmp(&right.joining_date)
        .then_with(|| left.registration_seq.cmp(&right.registration_seq))
        .then_with(|| left.id.cmp(&right.id))
}

/// Returns the group ordered by allocation priority.
pub fn rank<'a>(group: impl IntoIterator<Item = &'a FacultyMember>) -> Vec<&'a FacultyMember> {
    let mut ranked: Vec<&FacultyMember> = group.into_iter().collect();
    ranked.sort_by(|left, right| compare_seniority(left, right));
    ranked
}
