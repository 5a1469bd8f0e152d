use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use anyhow::Context as _;
use chrono::{Local, NaiveDate};
use tracing::{info, warn};

use crate::sim::{ApiClient, ApiError, RunConfig, SimulationResult};

use super::Scene;

pub(super) type Pending<T, E = ApiError> = Receiver<Result<T, E>>;

pub(super) struct RunOutcome {
    pub(super) result: Arc<SimulationResult>,
    pub(super) scene: Scene,
    pub(super) config: RunConfig,
}

fn spawn_request<T, E, F>(work: F) -> Pending<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
    F: FnOnce() -> Result<T, E> + Send + 'static,
{
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        let _ = tx.send(work());
    });

    rx
}

pub(super) fn poll_request<T, E>(slot: &mut Option<Pending<T, E>>) -> Option<Result<T, E>>
where
    E: From<ApiError>,
{
    let rx = slot.take()?;
    match rx.try_recv() {
        Ok(reply) => Some(reply),
        Err(TryRecvError::Empty) => {
            *slot = Some(rx);
            None
        }
        Err(TryRecvError::Disconnected) => Some(Err(ApiError::Disconnected.into())),
    }
}

pub(super) fn spawn_login(client: ApiClient, username: String, password: String) -> Pending<String> {
    spawn_request(move || client.login(&username, &password))
}

pub(super) fn spawn_run(client: ApiClient, token: String, config: RunConfig) -> Pending<RunOutcome> {
    info!(
        nodes = config.num_nodes,
        seeds = config.seed_nodes,
        blocked = config.blocked_node_ids.len(),
        custom_graph = config.has_dataset(),
        "dispatching simulation run"
    );

    spawn_request(move || -> Result<RunOutcome, ApiError> {
        let result = client.simulate(&token, &config)?;
        let scene = Scene::build(&result.graph_topology);
        if scene.graph.dangling_edge_count() > 0 {
            warn!(
                dangling = scene.graph.dangling_edge_count(),
                "simulation topology has edges to unknown nodes"
            );
        }

        Ok(RunOutcome {
            result: Arc::new(result),
            scene,
            config,
        })
    })
}

pub(super) fn spawn_report(
    client: ApiClient,
    result: Arc<SimulationResult>,
    config: RunConfig,
    report_dir: PathBuf,
) -> Pending<PathBuf, anyhow::Error> {
    spawn_request(move || -> anyhow::Result<PathBuf> {
        let bytes = client.generate_report(&result, &config)?;
        save_report(&report_dir, Local::now().date_naive(), &bytes)
    })
}

fn report_file_name(date: NaiveDate) -> String {
    format!("SCFCE_Report_{}.pdf", date.format("%Y-%m-%d"))
}

fn save_report(report_dir: &Path, date: NaiveDate, bytes: &[u8]) -> anyhow::Result<PathBuf> {
    fs::create_dir_all(report_dir)
        .with_context(|| format!("failed to create report directory {}", report_dir.display()))?;

    let path = report_dir.join(report_file_name(date));
    fs::write(&path, bytes).with_context(|| format!("failed to write report {}", path.display()))?;

    info!(path = %path.display(), size = bytes.len(), "report saved");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use super::*;

    fn wait_for<T, E: From<ApiError>>(slot: &mut Option<Pending<T, E>>) -> Result<T, E> {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            if let Some(reply) = poll_request(slot) {
                return reply;
            }
            assert!(Instant::now() < deadline, "worker never replied");
            thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn report_name_uses_iso_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(report_file_name(date), "SCFCE_Report_2024-03-09.pdf");
    }

    #[test]
    fn poll_returns_the_worker_reply_once() {
        let mut slot = Some(spawn_request(|| Ok::<_, ApiError>(7)));
        assert_eq!(wait_for(&mut slot).unwrap(), 7);
        assert!(slot.is_none());
        assert!(poll_request(&mut slot).is_none());
    }

    #[test]
    fn dropped_worker_reads_as_disconnected() {
        let (tx, rx) = mpsc::channel::<Result<u8, ApiError>>();
        drop(tx);
        let mut slot = Some(rx);
        assert!(matches!(
            poll_request(&mut slot),
            Some(Err(ApiError::Disconnected))
        ));
    }

    #[test]
    fn save_report_writes_dated_file() {
        let dir = std::env::temp_dir().join(format!("contagion-lens-report-{}", std::process::id()));
        let date = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();

        let path = save_report(&dir, date, b"%PDF-1.4").unwrap();
        assert_eq!(path.file_name().unwrap(), "SCFCE_Report_2025-01-02.pdf");
        assert_eq!(fs::read(&path).unwrap(), b"%PDF-1.4");

        fs::remove_dir_all(&dir).unwrap();
    }
}
