use crate::infra::{in_memory_service, parse_academic_year, InMemoryAllocationService};
use chrono::Utc;
use clap::Args;
use std::path::PathBuf;
use subject_allocation::config::AppConfig;
use subject_allocation::error::AppError;
use subject_allocation::workflows::allocation::{
    AllocationRunOutcome, AllocationSettings, Department, FacultyId, FacultyMember, SubjectId,
};
use subject_allocation::workflows::roster::{Roster, RosterImporter};

const DEMO_FACULTY: &str = "\
Faculty ID,Name,Department,Designation,Joining Date,Registration Seq,Active,Preferences,Submitted
cse-p1,Anita Rao,CSE,Professor,2011-06-01,1,yes,cse-201;cse-101;cse-301,yes
cse-p2,Ravi Kumar,CSE,Professor,2014-01-10,2,yes,cse-201;cse-202,yes
cse-p3,Sunita Menon,CSE,Professor,2014-01-10,3,yes,cse-202;cse-201,yes
cse-a1,Meera Iyer,CSE,Assistant Professor,2018-07-01,4,yes,cse-501;cse-601,yes
cse-a2,Farhan Ali,CSE,Assistant Professor,2020-08-17,5,yes,,no
ece-p1,Lakshmi Nair,ECE,Professor,2009-03-15,6,yes,ece-101;ece-301,yes
ece-a1,Deepak Sen,ECE,Assistant Professor,2019-08-01,7,yes,ece-601;ece-701,yes
ece-a2,Priya Shah,ECE,Assistant Professor,2022-01-03,8,no,ece-601,yes
ice-p1,Suresh Babu,ICE,Professor,2013-02-01,9,yes,ice-101,yes
ice-a1,Kavya Reddy,ICE,Assistant Professor,2021-07-12,10,yes,ice-501,yes
";

const DEMO_SUBJECTS: &str = "\
Subject ID,Name,Code,Department,Year,Semester,Credits,Type,Eligible For
cse-101,Computer Programming,CSE-101,CSE,1,1,4,Core,Professor
cse-201,Data Structures,CSE-201,CSE,1,2,4,Core,Professor
cse-202,Discrete Mathematics,CSE-202,CSE,1,2,3,Core,Professor
cse-301,Computer Organization,CSE-301,CSE,2,3,3,Core,Professor
cse-501,Operating Systems,CSE-501,CSE,3,5,4,Core,Assistant Professor
cse-601,Compiler Design,CSE-601,CSE,3,6,4,Core,Assistant Professor
cse-701,Machine Learning,CSE-701,CSE,4,7,3,Elective,Assistant Professor
cse-801,Capstone Project,CSE-801,CSE,4,8,6,Project,Assistant Professor
ece-101,Network Analysis,ECE-101,ECE,1,1,3,Core,Professor
ece-301,Signals and Systems,ECE-301,ECE,2,3,4,Core,Professor
ece-601,VLSI Design,ECE-601,ECE,3,6,3,Elective,Assistant Professor
ece-701,Embedded Systems Lab,ECE-701,ECE,4,7,2,Lab,Assistant Professor
ice-101,Sensors and Transducers,ICE-101,ICE,1,1,3,Core,Professor
ice-501,Process Control,ICE-501,ICE,3,5,4,Core,Assistant Professor
";

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Academic year tag stamped on the demo allocations.
    #[arg(long, value_parser = parse_academic_year)]
    pub(crate) academic_year: Option<String>,
    /// Skip the live preference submission step.
    #[arg(long)]
    pub(crate) skip_submission: bool,
}

#[derive(Args, Debug)]
pub(crate) struct AllocateArgs {
    /// Faculty roster CSV
    #[arg(long)]
    pub(crate) faculty_csv: PathBuf,
    /// Subject catalog CSV
    #[arg(long)]
    pub(crate) subjects_csv: PathBuf,
    /// Academic year tag (defaults to ALLOCATION_ACADEMIC_YEAR, then the current year)
    #[arg(long, value_parser = parse_academic_year)]
    pub(crate) academic_year: Option<String>,
    /// Print every faculty member's allocation after the run.
    #[arg(long)]
    pub(crate) list_allocations: bool,
}

pub(crate) fn demo_roster() -> Result<Roster, AppError> {
    Ok(RosterImporter::from_readers(
        DEMO_FACULTY.as_bytes(),
        DEMO_SUBJECTS.as_bytes(),
    )?)
}

pub(crate) fn run_allocate(args: AllocateArgs) -> Result<(), AppError> {
    let AllocateArgs {
        faculty_csv,
        subjects_csv,
        academic_year,
        list_allocations,
    } = args;

    let config = AppConfig::load()?;
    let roster = RosterImporter::from_paths(&faculty_csv, &subjects_csv)?;
    let faculty = roster.faculty.clone();
    let settings = AllocationSettings {
        academic_year: academic_year.or(config.allocation.academic_year),
    };

    println!(
        "Loaded {} faculty from {} and {} subjects from {}",
        roster.faculty.len(),
        faculty_csv.display(),
        roster.subjects.len(),
        subjects_csv.display()
    );

    let service = in_memory_service(roster, settings);
    let outcome = service.try_run_allocation(Utc::now())?;
    render_outcome(&outcome);
    if list_allocations {
        render_allocations(&service, &faculty)?;
    }
    render_stats(&service)
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        academic_year,
        skip_submission,
    } = args;

    let roster = demo_roster()?;
    let faculty = roster.faculty.clone();
    let service = in_memory_service(roster, AllocationSettings { academic_year });

    println!("Subject allocation demo");
    println!(
        "- {} faculty across {} departments",
        faculty.len(),
        Department::ordered().len()
    );

    if !skip_submission {
        let late = FacultyId("cse-a2".to_string());
        let eligible = service.eligible_subjects(&late)?;
        println!("\nPreference submission for {}", late);
        println!(
            "  Eligible subjects: {}",
            eligible
                .iter()
                .map(|subject| subject.code.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
        let ranked: Vec<SubjectId> = eligible
            .iter()
            .rev()
            .take(2)
            .map(|subject| subject.id.clone())
            .collect();
        match service.submit_preferences(&late, ranked) {
            Ok(member) => println!(
                "  Submitted {} ranked preferences",
                member.preferences.len()
            ),
            Err(err) => println!("  Submission rejected: {}", err),
        }
    }

    let outcome = service.run_allocation();
    render_outcome(&outcome);
    if outcome.success {
        render_allocations(&service, &faculty)?;
    }
    render_stats(&service)
}

fn render_outcome(outcome: &AllocationRunOutcome) {
    println!("\nAllocation run");
    println!("  {}", outcome.message);
    for department in &outcome.departments {
        println!(
            "  - {}: {} considered | {} allocated | {} unmatched",
            department.department.code(),
            department.considered,
            department.allocated,
            department.unmatched.len()
        );
        for faculty_id in &department.unmatched {
            println!("      unmatched: {}", faculty_id);
        }
    }
}

fn render_allocations(
    service: &InMemoryAllocationService,
    faculty: &[FacultyMember],
) -> Result<(), AppError> {
    println!("\nAllocations");
    for member in faculty {
        match service.allocation_for_faculty(&member.id)? {
            Some(view) => println!(
                "  - {} ({}, {}): {} {} | semester {} | {}",
                member.name,
                member.designation.label(),
                member.department.code(),
                view.subject_code.as_deref().unwrap_or("?"),
                view.subject_name.as_deref().unwrap_or(view.subject_id.0.as_str()),
                view.semester,
                view.academic_year
            ),
            None => println!(
                "  - {} ({}, {}): not allocated",
                member.name,
                member.designation.label(),
                member.department.code()
            ),
        }
    }
    Ok(())
}

fn render_stats(service: &InMemoryAllocationService) -> Result<(), AppError> {
    let stats = service.stats()?;
    println!("\nDashboard");
    println!(
        "  Faculty: {} ({} professors / {} assistant professors)",
        stats.total_faculty, stats.professors, stats.assistant_professors
    );
    println!("  Subjects: {}", stats.total_subjects);
    println!(
        "  Preferences submitted: {} | allocations: {} | pending: {}",
        stats.submitted_preferences, stats.total_allocations, stats.pending_allocations
    );
    Ok(())
}
