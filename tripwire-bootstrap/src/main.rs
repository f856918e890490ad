use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "tripwire")]
#[command(about = "Tripwire behavioral anomaly engine", long_about = None)]
struct Args {
    /// Path to config file
    #[arg(short, long)]
    config: Option<String>,

    /// Also write service logs to a daily rolling file in this directory
    #[arg(long)]
    service_log_dir: Option<PathBuf>,
}

fn init_tracing(service_log_dir: Option<&PathBuf>) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let (file_layer, guard) = match service_log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "tripwire.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .with(file_layer)
        .init();
    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let _guard = init_tracing(args.service_log_dir.as_ref());

    if let Some(config) = args.config {
        std::env::set_var(tripwire_infrastructure::CONFIG_PATH_ENV, config);
    }

    tripwire_bootstrap::run_standalone().await
}
