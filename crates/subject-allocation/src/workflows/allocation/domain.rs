use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier wrapper for faculty records.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FacultyId(pub String);

/// Identifier wrapper for catalog subjects.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SubjectId(pub String);

impl fmt::Display for FacultyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier wrapper for persisted allocations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AllocationId(pub String);

/// Departments taking part in the allocation round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Department {
    #[serde(rename = "Computer Science and Engineering", alias = "CSE")]
    ComputerScience,
    #[serde(rename = "Electronics and Communication Engineering", alias = "ECE")]
    ElectronicsAndCommunication,
    #[serde(rename = "Instrumentation and Control Engineering", alias = "ICE")]
    InstrumentationAndControl,
}

impl Department {
    /// Processing order for allocation runs.
    pub fn ordered() -> [Department; 3] {
        [
            Department::ComputerScience,
            Department::ElectronicsAndCommunication,
            Department::InstrumentationAndControl,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Department::ComputerScience => "Computer Science and Engineering",
            Department::ElectronicsAndCommunication => "Electronics and Communication Engineering",
            Department::InstrumentationAndControl => "Instrumentation and Control Engineering",
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Department::ComputerScience => "CSE",
            Department::ElectronicsAndCommunication => "ECE",
            Department::InstrumentationAndControl => "ICE",
        }
    }

    /// Accepts either the full department name or its short code.
    pub fn from_label(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ordered().into_iter().find(|department| {
            department.label().eq_ignore_ascii_case(value)
                || department.code().eq_ignore_ascii_case(value)
        })
    }
}

/// Designation tier. Variant order is allocation precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Designation {
    Professor,
    #[serde(rename = "Assistant Professor", alias = "AssistantProfessor")]
    AssistantProfessor,
}

impl Designation {
    pub fn ordered() -> [Designation; 2] {
        [Designation::Professor, Designation::AssistantProfessor]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Designation::Professor => "Professor",
            Designation::AssistantProfessor => "Assistant Professor",
        }
    }

    pub fn from_label(value: &str) -> Option<Self> {
        let normalized: String = value
            .chars()
            .filter(|ch| !ch.is_whitespace())
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "professor" => Some(Designation::Professor),
            "assistantprofessor" => Some(Designation::AssistantProfessor),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubjectType {
    Core,
    Elective,
    Lab,
    Project,
}

impl SubjectType {
    pub fn label(&self) -> &'static str {
        match self {
            SubjectType::Core => "Core",
            SubjectType::Elective => "Elective",
            SubjectType::Lab => "Lab",
            SubjectType::Project => "Project",
        }
    }

    pub fn from_label(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "core" => Some(SubjectType::Core),
            "elective" => Some(SubjectType::Elective),
            "lab" | "laboratory" => Some(SubjectType::Lab),
            "project" => Some(SubjectType::Project),
            _ => None,
        }
    }
}

/// Faculty record as read from the directory at the start of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacultyMember {
    pub id: FacultyId,
    pub name: String,
    pub department: Department,
    pub designation: Designation,
    pub joining_date: NaiveDate,
    /// Monotonic registration order, used to break joining-date ties.
    pub registration_seq: u64,
    pub active: bool,
    pub preferences: Vec<SubjectId>,
    pub preferences_submitted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<DateTime<Utc>>,
}

impl FacultyMember {
    /// True when the member takes part in an allocation run.
    pub fn has_submitted_preferences(&self) -> bool {
        self.preferences_submitted && !self.preferences.is_empty()
    }

    pub fn is_allocation_candidate(&self) -> bool {
        self.active && self.has_submitted_preferences()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub id: SubjectId,
    pub name: String,
    pub code: String,
    pub department: Department,
    pub year: u8,
    pub semester: u8,
    pub credits: u8,
    #[serde(rename = "type")]
    pub subject_type: SubjectType,
    pub eligible_for: Vec<Designation>,
}

impl Subject {
    pub fn is_open_to(&self, designation: Designation) -> bool {
        self.eligible_for.contains(&designation)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AllocationStatus {
    Allocated,
    Pending,
    Swapped,
}

impl AllocationStatus {
    pub fn label(&self) -> &'static str {
        match self {
            AllocationStatus::Allocated => "Allocated",
            AllocationStatus::Pending => "Pending",
            AllocationStatus::Swapped => "Swapped",
        }
    }
}

/// One faculty member paired with one subject.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    pub id: AllocationId,
    pub faculty_id: FacultyId,
    pub subject_id: SubjectId,
    pub department: Department,
    pub academic_year: String,
    pub semester: u8,
    pub allocated_at: DateTime<Utc>,
    pub status: AllocationStatus,
}
