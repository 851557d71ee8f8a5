pub mod app;
pub mod callback;
pub mod catalog;
pub mod config;
pub mod input;
pub mod outbox;
pub mod registration;
pub mod testimonials;
pub mod timer;
pub mod types;
pub mod ui;
pub mod validation;

use anyhow::{Context, Result};
use clap::Parser;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use app::App;
use catalog::{Catalog, CourseId};
use config::{load_config, save_config, Config, DeliveryMode, LogConfig};
use outbox::{Dispatcher, EnquirySink, FileOutbox, LogSink};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Config file (default: ./enroll-desk.yaml, then the user config dir)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Open the registration wizard for this course on start
    #[arg(long)]
    course: Option<String>,

    /// Append enquiries to this JSONL outbox instead of the log
    #[arg(long, env = "ENROLL_DESK_OUTBOX")]
    outbox: Option<PathBuf>,

    /// Debug logging unless RUST_LOG says otherwise
    #[arg(short, long)]
    verbose: bool,

    /// Print the course catalog and exit
    #[arg(long)]
    list_courses: bool,

    /// Write the default config to the user config dir and exit
    #[arg(long)]
    write_default_config: bool,
}

/// Log to a file; the terminal belongs to the TUI
fn init_logging(log: &LogConfig, verbose: bool) -> Result<PathBuf> {
    let path = log.file_path();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("opening log file {}", path.display()))?;

    let fallback = if verbose { "debug" } else { log.level.as_str() };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false),
        )
        .init();
    Ok(path)
}

fn load_catalog(path: Option<&Path>) -> Result<Catalog> {
    match path {
        Some(path) => Catalog::load(path),
        None => Ok(Catalog::builtin()),
    }
}

fn build_sink(config: &Config) -> Arc<dyn EnquirySink> {
    match config.delivery.mode {
        DeliveryMode::Log => Arc::new(LogSink),
        DeliveryMode::Outbox => {
            let outbox = FileOutbox::new(config.delivery.outbox_path());
            tracing::info!(path = %outbox.path().display(), "writing enquiries to outbox");
            Arc::new(outbox)
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut config = load_config(args.config.as_deref())?;

    if args.write_default_config {
        let path = save_config(&Config::default())?;
        println!("Wrote {}", path.display());
        return Ok(());
    }

    let catalog = load_catalog(config.catalog_path.as_deref())?;
    if args.list_courses {
        for course in catalog.courses() {
            println!("{:<28} {}", course.id.as_str(), course.title);
        }
        return Ok(());
    }

    if let Some(path) = args.outbox {
        config.delivery.mode = DeliveryMode::Outbox;
        config.delivery.outbox_path = Some(path);
    }

    let log_path = init_logging(&config.log, args.verbose)?;
    let sink = build_sink(&config);
    tracing::info!(
        log = %log_path.display(),
        sink = sink.name(),
        courses = catalog.len(),
        "starting"
    );

    let dispatcher = Dispatcher::new(sink, tokio::runtime::Handle::current());
    let mut app = App::new(config, catalog, dispatcher, Instant::now());
    if let Some(course) = args.course.as_deref() {
        app.open_wizard_for(&CourseId::parse(course));
    }

    let terminal = ratatui::init();
    let app_result = app.run(terminal);
    ratatui::restore();

    app.finish_deliveries().await;
    app_result
}
