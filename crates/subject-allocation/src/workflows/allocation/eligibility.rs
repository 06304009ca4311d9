use std::ops::RangeInclusive;

use super::domain::{Department, Designation, FacultyMember, Subject};

/// Semesters each tier may teach. Professors take the first half of the
/// program, assistant professors the second.
pub fn semester_window(designation: Designation) -> RangeInclusive<u8> {
    match designation {
        Designation::Professor => 1..=4,
        Designation::AssistantProfessor => 5..=8,
    }
}

/// Decides which catalog subjects a tier may list as preferences.
#[derive(Debug, Clone, Copy, Default)]
pub struct EligibilityFilter;

impl EligibilityFilter {
    pub fn new() -> Self {
        Self
    }

    /// Whether `subject` may be listed by a member of `department` holding `designation`.
    pub fn permits(
        &self,
        subject: &Subject,
        department: Department,
        designation: Designation,
    ) -> bool {
        subject.department == department
            && subject.is_open_to(designation)
            && semester_window(designation).contains(&subject.semester)
    }

    /// Subset of a department catalog open to the given tier, in catalog order.
    pub fn eligible<'a>(
        &self,
        catalog: &'a [Subject],
        department: Department,
        designation: Designation,
    ) -> Vec<&'a Subject> {
        catalog
            .iter()
            .filter(|subject| self.permits(subject, department, designation))
            .collect()
    }

    pub fn eligible_for_member<'a>(
        &self,
        catalog: &'a [Subject],
        member: &FacultyMember,
    ) -> Vec<&'a Subject> {
        self.eligible(catalog, member.department, member.designation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::allocation::domain::{SubjectId, SubjectType};

    fn subject(id: &str, semester: u8, eligible_for: Vec<Designation>) -> Subject {
        Subject {
            id: SubjectId(id.to_string()),
            name: format!("Subject {id}"),
            code: id.to_ascii_uppercase(),
            department: Department::ComputerScience,
            year: (semester + 1) / 2,
            semester,
            credits: 3,
            subject_type: SubjectType::Core,
            eligible_for,
        }
    }

    #[test]
    fn filters_by_designation_and_semester_window() {
        let both = vec![Designation::Professor, Designation::AssistantProfessor];
        let catalog = vec![
            subject("s1", 1, both.clone()),
            subject("s2", 4, vec![Designation::Professor]),
            subject("s3", 5, both.clone()),
            subject("s4", 3, vec![Designation::AssistantProfessor]),
            subject("s5", 8, vec![Designation::AssistantProfessor]),
        ];
        let filter = EligibilityFilter::new();

        let professor: Vec<_> = filter
            .eligible(&catalog, Department::ComputerScience, Designation::Professor)
            .into_iter()
            .map(|subject| subject.id.0.as_str())
            .collect();
        assert_eq!(professor, vec!["s1", "s2"]);

        let assistant: Vec<_> = filter
            .eligible(
                &catalog,
                Department::ComputerScience,
                Designation::AssistantProfessor,
            )
            .into_iter()
            .map(|subject| subject.id.0.as_str())
            .collect();
        assert_eq!(assistant, vec!["s3", "s5"]);
    }

    #[test]
    fn rejects_subjects_from_other_departments() {
        let mut foreign = subject("e1", 2, vec![Designation::Professor]);
        foreign.department = Department::ElectronicsAndCommunication;
        let filter = EligibilityFilter::new();
        assert!(!filter.permits(&foreign, Department::ComputerScience, Designation::Professor));
        assert!(filter.permits(
            &foreign,
            Department::ElectronicsAndCommunication,
            Designation::Professor
        ));
    }
}
