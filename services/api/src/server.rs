use crate::cli::ServeArgs;
use crate::demo::demo_roster;
use crate::infra::{in_memory_service, AppState};
use crate::routes::with_allocation_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use subject_allocation::config::AppConfig;
use subject_allocation::error::AppError;
use subject_allocation::telemetry;
use subject_allocation::workflows::roster::{Roster, RosterImporter};
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let roster = seed_roster(&config)?;
    info!(
        faculty = roster.faculty.len(),
        subjects = roster.subjects.len(),
        "roster loaded"
    );
    let allocation_service = Arc::new(in_memory_service(roster, config.allocation.clone()));

    let app = with_allocation_routes(allocation_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "subject allocation service ready");

    axum::serve(listener, app).await?;
    Ok(())
}

fn seed_roster(config: &AppConfig) -> Result<Roster, AppError> {
    match (&config.roster.faculty_csv, &config.roster.subjects_csv) {
        (Some(faculty), Some(subjects)) => Ok(RosterImporter::from_paths(faculty, subjects)?),
        _ => {
            info!("FACULTY_CSV/SUBJECTS_CSV not set, seeding with the demo roster");
            demo_roster()
        }
    }
}
