use std::path::PathBuf;
use std::time::Duration;

use eframe::egui::{self, Context, Vec2};
use tracing::{info, warn};

use crate::engine::{BlockList, PlaybackController, RenderGraph};
use crate::sim::{ApiClient, RunConfig, load_dataset};

use requests::{Pending, RunOutcome};

mod graph;
mod render_utils;
mod requests;
mod ui;

#[derive(Clone)]
pub struct Settings {
    pub api_url: String,
    pub username: String,
    pub password: String,
    pub dataset: Option<PathBuf>,
    pub playback_interval: Duration,
    pub report_dir: PathBuf,
    pub request_timeout: Duration,
}

pub struct ContagionApp {
    settings: Settings,
    state: AppState,
}

enum AppState {
    SignedOut(LoginForm),
    Ready(Box<ViewModel>),
    Error(String),
}

struct LoginForm {
    client: ApiClient,
    username: String,
    password: String,
    pending: Option<Pending<String>>,
    error: Option<String>,
}

struct Scene {
    graph: RenderGraph,
    positions: Vec<Vec2>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum NoticeKind {
    Info,
    Warning,
    Error,
}

#[derive(Clone, Debug)]
struct Notice {
    kind: NoticeKind,
    message: String,
}

struct ViewModel {
    client: ApiClient,
    token: String,
    config: RunConfig,
    dataset_name: Option<String>,
    block_list: BlockList,
    playback: PlaybackController,
    scene: Option<Scene>,
    last_run_config: Option<RunConfig>,
    pending_run: Option<Pending<RunOutcome>>,
    pending_report: Option<Pending<PathBuf, anyhow::Error>>,
    notices: Vec<Notice>,
    dataset_path: String,
    report_dir: PathBuf,
    search: String,
    pan: Vec2,
    zoom: f32,
    fit_pending: bool,
}

impl ContagionApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, settings: Settings) -> Self {
        let state = Self::signed_out(&settings, None);
        Self { settings, state }
    }

    fn signed_out(settings: &Settings, error: Option<String>) -> AppState {
        match ApiClient::new(settings.api_url.clone(), settings.request_timeout) {
            Ok(client) => AppState::SignedOut(LoginForm {
                client,
                username: settings.username.clone(),
                password: settings.password.clone(),
                pending: None,
                error,
            }),
            Err(error) => AppState::Error(error.to_string()),
        }
    }
}

impl eframe::App for ContagionApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::SignedOut(form) => {
                if let Some(token) = form.show(ctx) {
                    info!(api = form.client.base_url(), "session started");
                    let model = ViewModel::new(form.client.clone(), token, &self.settings);
                    transition = Some(AppState::Ready(Box::new(model)));
                }
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Could not start the simulation client");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        transition = Some(Self::signed_out(&self.settings, None));
                    }
                });
            }
            AppState::Ready(model) => {
                let mut session_expired = false;
                model.show(ctx, &mut session_expired);
                if session_expired {
                    warn!("session rejected by the service, signing out");
                    transition = Some(Self::signed_out(
                        &self.settings,
                        Some("Session expired. Please sign in again.".to_owned()),
                    ));
                }
            }
        }

        if let Some(next_state) = transition {
            self.state = next_state;
        }
    }
}

impl ViewModel {
    fn new(client: ApiClient, token: String, settings: &Settings) -> Self {
        let mut model = Self {
            client,
            token,
            config: RunConfig::default(),
            dataset_name: None,
            block_list: BlockList::default(),
            playback: PlaybackController::new(settings.playback_interval),
            scene: None,
            last_run_config: None,
            pending_run: None,
            pending_report: None,
            notices: Vec::new(),
            dataset_path: String::new(),
            report_dir: settings.report_dir.clone(),
            search: String::new(),
            pan: Vec2::ZERO,
            zoom: 1.0,
            fit_pending: false,
        };

        if let Some(path) = &settings.dataset {
            model.dataset_path = path.display().to_string();
            model.load_dataset_from_path();
        }

        model
    }

    fn notify(&mut self, kind: NoticeKind, message: impl Into<String>) {
        self.notices.push(Notice {
            kind,
            message: message.into(),
        });
    }

    fn load_dataset_from_path(&mut self) {
        let path = PathBuf::from(self.dataset_path.trim());
        match load_dataset(&path) {
            Ok(topology) => {
                let nodes = topology.node_count();
                let edges = topology.edge_count();
                info!(path = %path.display(), nodes, edges, "dataset loaded");
                self.config.attach_dataset(topology);
                self.dataset_name = path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned());
                self.notify(
                    NoticeKind::Info,
                    format!("Dataset loaded: {nodes} nodes, {edges} links."),
                );
            }
            Err(error) => {
                warn!(path = %path.display(), %error, "dataset rejected");
                self.notify(NoticeKind::Error, error.to_string());
            }
        }
    }

    fn clear_dataset(&mut self) {
        self.config.clear_dataset();
        self.dataset_name = None;
        self.dataset_path.clear();
        info!("custom dataset cleared");
    }

    fn start_run(&mut self) {
        if self.pending_run.is_some() {
            return;
        }
        let config = self.config.for_run(self.block_list.snapshot());
        self.pending_run = Some(requests::spawn_run(
            self.client.clone(),
            self.token.clone(),
            config,
        ));
    }

    fn start_report(&mut self) {
        if self.pending_report.is_some() {
            return;
        }
        let (Some(result), Some(config)) = (self.playback.shared_result(), &self.last_run_config)
        else {
            return;
        };
        self.pending_report = Some(requests::spawn_report(
            self.client.clone(),
            result,
            config.clone(),
            self.report_dir.clone(),
        ));
    }

    fn reset_session(&mut self) {
        self.playback.reset();
        self.block_list.clear();
    }

    fn poll_requests(&mut self, now: Duration) -> bool {
        let mut session_expired = false;

        match requests::poll_request(&mut self.pending_run) {
            Some(Ok(outcome)) => {
                let RunOutcome {
                    result,
                    scene,
                    config,
                } = outcome;
                info!(
                    steps = result.step_count(),
                    nodes = scene.graph.node_count(),
                    "simulation run received"
                );
                if result.step_count() == 0 {
                    self.notify(NoticeKind::Warning, "The simulation returned no steps.");
                }
                self.scene = Some(scene);
                self.fit_pending = true;
                self.last_run_config = Some(config);
                self.playback.load(result, now);
            }
            Some(Err(error)) => {
                warn!(%error, "simulation run failed");
                session_expired = error.is_auth();
                self.notify(NoticeKind::Error, format!("Simulation failed: {error}"));
            }
            None => {}
        }

        match requests::poll_request(&mut self.pending_report) {
            Some(Ok(path)) => {
                self.notify(
                    NoticeKind::Info,
                    format!("Report saved to {}", path.display()),
                );
            }
            Some(Err(error)) => {
                warn!(error = %format!("{error:#}"), "report generation failed");
                self.notify(NoticeKind::Error, format!("Report failed: {error:#}"));
            }
            None => {}
        }

        session_expired
    }
}
