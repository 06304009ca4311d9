use crate::workflows::allocation::{
    Department, Designation, FacultyId, FacultyMember, Subject, SubjectId, SubjectType,
};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use std::io::Read;

use super::RosterImportError;

fn reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader)
}

pub(crate) fn parse_faculty<R: Read>(input: R) -> Result<Vec<FacultyMember>, RosterImportError> {
    let mut csv_reader = reader(input);
    let mut members = Vec::new();

    for (index, record) in csv_reader.deserialize::<FacultyRow>().enumerate() {
        let row = record?;
        members.push(row.into_member(index + 2)?);
    }

    Ok(members)
}

pub(crate) fn parse_subjects<R: Read>(input: R) -> Result<Vec<Subject>, RosterImportError> {
    let mut csv_reader = reader(input);
    let mut subjects = Vec::new();

    for (index, record) in csv_reader.deserialize::<SubjectRow>().enumerate() {
        let row = record?;
        subjects.push(row.into_subject(index + 2)?);
    }

    Ok(subjects)
}

#[derive(Debug, Deserialize)]
struct FacultyRow {
    #[serde(rename = "Faculty ID")]
    id: String,
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Department")]
    department: String,
    #[serde(rename = "Designation")]
    designation: String,
    #[serde(rename = "Joining Date")]
    joining_date: String,
    #[serde(rename = "Registration Seq")]
    registration_seq: u64,
    #[serde(rename = "Active", default = "default_true", deserialize_with = "flag_default_true")]
    active: bool,
    #[serde(rename = "Preferences", default)]
    preferences: String,
    #[serde(rename = "Submitted", default, deserialize_with = "flag_default_false")]
    submitted: bool,
}

impl FacultyRow {
    fn into_member(self, row: usize) -> Result<FacultyMember, RosterImportError> {
        let invalid = |reason: String| RosterImportError::InvalidRow { row, reason };

        if self.id.is_empty() {
            return Err(invalid("faculty id is required".to_string()));
        }
        let department = Department::from_label(&self.department)
            .ok_or_else(|| invalid(format!("unknown department '{}'", self.department)))?;
        let designation = Designation::from_label(&self.designation)
            .ok_or_else(|| invalid(format!("unknown designation '{}'", self.designation)))?;
        let joining_date = NaiveDate::parse_from_str(&self.joining_date, "%Y-%m-%d")
            .map_err(|_| invalid(format!("joining date '{}' is not YYYY-MM-DD", self.joining_date)))?;
        let mut preferences: Vec<SubjectId> = Vec::new();
        for id in split_list(&self.preferences) {
            let id = SubjectId(id.to_string());
            if preferences.contains(&id) {
                return Err(invalid(format!("subject {id} is listed more than once")));
            }
            preferences.push(id);
        }

        Ok(FacultyMember {
            id: FacultyId(self.id),
            name: self.name,
            department,
            designation,
            joining_date,
            registration_seq: self.registration_seq,
            active: self.active,
            preferences,
            preferences_submitted: self.submitted,
            submitted_at: None,
        })
    }
}

#[derive(Debug, Deserialize)]
struct SubjectRow {
    #[serde(rename = "Subject ID")]
    id: String,
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Code")]
    code: String,
    #[serde(rename = "Department")]
    department: String,
    #[serde(rename = "Year")]
    year: u8,
    #[serde(rename = "Semester")]
    semester: u8,
    #[serde(rename = "Credits", default = "default_credits")]
    credits: u8,
    #[serde(rename = "Type", default)]
    subject_type: String,
    #[serde(rename = "Eligible For", default)]
    eligible_for: String,
}

impl SubjectRow {
    fn into_subject(self, row: usize) -> Result<Subject, RosterImportError> {
        let invalid = |reason: String| RosterImportError::InvalidRow { row, reason };

        if self.id.is_empty() {
            return Err(invalid("subject id is required".to_string()));
        }
        let department = Department::from_label(&self.department)
            .ok_or_else(|| invalid(format!("unknown department '{}'", self.department)))?;
        let subject_type = if self.subject_type.is_empty() {
            SubjectType::Core
        } else {
            SubjectType::from_label(&self.subject_type)
                .ok_or_else(|| invalid(format!("unknown subject type '{}'", self.subject_type)))?
        };
        if !(1..=4).contains(&self.year) {
            return Err(invalid(format!("year {} outside 1-4", self.year)));
        }
        if !(1..=8).contains(&self.semester) {
            return Err(invalid(format!("semester {} outside 1-8", self.semester)));
        }

        let mut eligible_for = Vec::new();
        for label in split_list(&self.eligible_for) {
            let designation = Designation::from_label(label)
                .ok_or_else(|| invalid(format!("unknown designation '{label}'")))?;
            if !eligible_for.contains(&designation) {
                eligible_for.push(designation);
            }
        }
        if eligible_for.is_empty() {
            eligible_for = Designation::ordered().to_vec();
        }

        Ok(Subject {
            id: SubjectId(self.id),
            name: self.name,
            code: self.code.to_ascii_uppercase(),
            department,
            year: self.year,
            semester: self.semester,
            credits: self.credits,
            subject_type,
            eligible_for,
        })
    }
}

fn split_list(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(';').map(str::trim).filter(|item| !item.is_empty())
}

fn default_true() -> bool {
    true
}

fn default_credits() -> u8 {
    3
}

fn flag_default_true<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    parse_flag(&String::deserialize(deserializer)?, true).map_err(serde::de::Error::custom)
}

fn flag_default_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    parse_flag(&String::deserialize(deserializer)?, false).map_err(serde::de::Error::custom)
}

fn parse_flag(raw: &str, empty: bool) -> Result<bool, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "" => Ok(empty),
        "false" | "no" | "n" | "0" => Ok(false),
        "true" | "yes" | "y" | "1" => Ok(true),
        other => Err(format!("expected yes/no flag, got '{other}'")),
    }
}
