mod app;
mod engine;
mod layout;
mod sim;
mod util;

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Desktop client for replaying simulated information propagation.
#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Base URL of the simulation service.
    #[arg(long, env = "CONTAGION_API_URL", default_value = "http://localhost:8000")]
    api_url: String,

    #[arg(long, default_value = "admin")]
    username: String,

    #[arg(
        long,
        env = "CONTAGION_PASSWORD",
        default_value = "admin123",
        hide_env_values = true,
        hide_default_value = true
    )]
    password: String,

    /// JSON network file to attach as the custom graph on sign-in.
    #[arg(long)]
    dataset: Option<PathBuf>,

    /// Delay between playback steps.
    #[arg(long, default_value_t = 1500)]
    playback_ms: u64,

    /// Directory PDF reports are written to.
    #[arg(long, default_value = ".")]
    report_dir: PathBuf,

    #[arg(long, default_value_t = 60)]
    timeout_secs: u64,
}

impl From<Args> for app::Settings {
    fn from(args: Args) -> Self {
        Self {
            api_url: args.api_url,
            username: args.username,
            password: args.password,
            dataset: args.dataset,
            playback_interval: Duration::from_millis(args.playback_ms.max(50)),
            report_dir: args.report_dir,
            request_timeout: Duration::from_secs(args.timeout_secs.max(1)),
        }
    }
}

fn main() -> eframe::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("contagion_lens=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = app::Settings::from(Args::parse());
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1480.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "contagion-lens",
        options,
        Box::new(move |cc| Ok(Box::new(app::ContagionApp::new(cc, settings)))),
    )
}
