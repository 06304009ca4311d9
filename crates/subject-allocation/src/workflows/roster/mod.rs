//! CSV loading for faculty and subject rosters.

mod parser;

use crate::workflows::allocation::{FacultyMember, Subject};
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

#[derive(Debug)]
pub enum RosterImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    InvalidRow { row: usize, reason: String },
    DuplicateId { kind: &'static str, id: String },
}

impl std::fmt::Display for RosterImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RosterImportError::Io(err) => write!(f, "failed to read roster file: {}", err),
            RosterImportError::Csv(err) => write!(f, "invalid roster CSV data: {}", err),
            RosterImportError::InvalidRow { row, reason } => {
                write!(f, "roster row {}: {}", row, reason)
            }
            RosterImportError::DuplicateId { kind, id } => {
                write!(f, "duplicate {} id '{}' in roster", kind, id)
            }
        }
    }
}

impl std::error::Error for RosterImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RosterImportError::Io(err) => Some(err),
            RosterImportError::Csv(err) => Some(err),
            RosterImportError::InvalidRow { .. } | RosterImportError::DuplicateId { .. } => None,
        }
    }
}

impl From<std::io::Error> for RosterImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for RosterImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Faculty and subject records loaded together.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    pub faculty: Vec<FacultyMember>,
    pub subjects: Vec<Subject>,
}

pub struct RosterImporter;

impl RosterImporter {
    pub fn from_paths<P: AsRef<Path>, Q: AsRef<Path>>(
        faculty_csv: P,
        subjects_csv: Q,
    ) -> Result<Roster, RosterImportError> {
        let faculty = std::fs::File::open(faculty_csv)?;
        let subjects = std::fs::File::open(subjects_csv)?;
        Self::from_readers(faculty, subjects)
    }

    pub fn from_readers<F: Read, S: Read>(
        faculty: F,
        subjects: S,
    ) -> Result<Roster, RosterImportError> {
        let faculty = Self::faculty_from_reader(faculty)?;
        let subjects = Self::subjects_from_reader(subjects)?;
        Ok(Roster { faculty, subjects })
    }

    pub fn faculty_from_reader<R: Read>(reader: R) -> Result<Vec<FacultyMember>, RosterImportError> {
        let faculty = parser::parse_faculty(reader)?;
        ensure_unique("faculty", faculty.iter().map(|member| member.id.0.as_str()))?;
        Ok(faculty)
    }

    pub fn subjects_from_reader<R: Read>(reader: R) -> Result<Vec<Subject>, RosterImportError> {
        let subjects = parser::parse_subjects(reader)?;
        ensure_unique("subject", subjects.iter().map(|subject| subject.id.0.as_str()))?;
        Ok(subjects)
    }
}

fn ensure_unique<'a>(
    kind: &'static str,
    ids: impl Iterator<Item = &'a str>,
) -> Result<(), RosterImportError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(RosterImportError::DuplicateId {
                kind,
                id: id.to_string(),
            });
        }
    }
    Ok(())
}
