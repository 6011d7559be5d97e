//! Daily arXiv digest binary.

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use arxivcast_models::BackendMode;
use arxivcast_pipeline::{run_pipeline, PipelineConfig, RunOutcome};

#[derive(Parser, Debug)]
#[command(name = "arxivcast", version, about = "Turn today's arXiv papers into a narrated video digest")]
struct Args {
    /// arXiv category to fetch
    #[arg(short, long, default_value = "cs.AI")]
    category: String,

    /// Maximum papers per run
    #[arg(short = 'n', long, default_value_t = 10)]
    max_papers: usize,

    /// Backend tiers to use ("full" or "fallback-only")
    #[arg(long, default_value = "full")]
    backend_mode: BackendMode,

    /// Output root directory
    #[arg(short, long, default_value = "output")]
    output_dir: PathBuf,
}

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Colored output for dev, JSON for production
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::from_default_env()
        .add_directive("arxivcast_pipeline=info".parse().unwrap())
        .add_directive("arxivcast_media=info".parse().unwrap());

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }

    let args = Args::parse();
    info!(
        "Starting arxivcast ({})",
        args.backend_mode.description()
    );

    let config = PipelineConfig {
        category: args.category,
        max_papers: args.max_papers,
        backend_mode: args.backend_mode,
        output_dir: args.output_dir,
        ..PipelineConfig::from_env()
    };

    match run_pipeline(&config).await {
        Ok(RunOutcome::Completed(summary)) => {
            info!(
                fetched = summary.fetched,
                combined = summary.combined,
                dropped = summary.dropped,
                degraded_stages = summary.degraded_stages,
                "Daily report ready at {}",
                summary.report.display()
            );
        }
        Ok(RunOutcome::NothingToDo) => {
            info!("No new papers; nothing to do");
        }
        Ok(RunOutcome::NoVideos { fetched }) => {
            error!("Fetched {} papers but produced no clips", fetched);
            std::process::exit(1);
        }
        Ok(RunOutcome::CombineFailed { clips, reason, .. }) => {
            error!(
                "Failed to combine {} clips: {}; per-item clips kept on disk",
                clips.len(),
                reason
            );
            std::process::exit(1);
        }
        Err(e) => {
            error!("Pipeline failed: {}", e);
            std::process::exit(1);
        }
    }
}
