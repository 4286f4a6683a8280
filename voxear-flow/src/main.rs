//! voxear - command-line front end for the deepfake analysis workflow
//!
//! Selects a video, runs the analysis screen with live progress, then shows
//! the results screen.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use voxear_common::config::CONFIG_ENV_VAR;
use voxear_flow::config::{CliOverrides, FlowConfig};
use voxear_flow::render::{render_failure, render_results, TerminalRenderer};
use voxear_flow::{AppState, RunReport, Workflow};

const DEFAULT_LOG_FILTER: &str = "voxear=info,voxear_flow=info";

/// Command-line arguments for voxear
#[derive(Parser, Debug)]
#[command(name = "voxear")]
#[command(about = "Check a video for deepfake manipulation")]
#[command(version)]
struct Args {
    /// Video file to analyze
    file: PathBuf,

    /// Base URL of the analysis service
    #[arg(long)]
    service_url: Option<String>,

    /// Dwell per simulated progress step, in milliseconds
    #[arg(long)]
    step_dwell_ms: Option<u64>,

    /// How long the final step list stays visible, in milliseconds
    #[arg(long)]
    grace_ms: Option<u64>,

    /// Give up on the service after this many seconds (0 waits forever)
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// TOML configuration file
    #[arg(long, env = CONFIG_ENV_VAR)]
    config: Option<PathBuf>,
}

impl Args {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            config_path: self.config.clone(),
            service_url: self.service_url.clone(),
            step_dwell_ms: self.step_dwell_ms,
            grace_ms: self.grace_ms,
            analysis_timeout_secs: self.timeout_secs,
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();

    // Resolved before logging starts so the TOML log level can apply.
    let config = FlowConfig::resolve(&args.overrides())
        .context("Failed to load configuration")?;

    let default_filter = config.log_level.as_deref().unwrap_or(DEFAULT_LOG_FILTER);
    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(default_filter))
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with(stderr_layer)
        .init();

    info!(
        "Starting voxear v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    info!(
        service_url = %config.service_url,
        step_dwell_ms = config.timing.step_dwell.as_millis() as u64,
        grace_ms = config.timing.grace.as_millis() as u64,
        timeout_secs = config.timing.analysis_timeout.map(|t| t.as_secs()).unwrap_or(0),
        "Configuration"
    );

    let state = AppState::from_config(&config)
        .context("Failed to initialize analysis client")?;
    let render_stop = CancellationToken::new();
    let renderer = TerminalRenderer::new(&state.event_bus).spawn(render_stop.clone());
    let mut workflow = Workflow::new(state);

    let cancel = CancellationToken::new();
    let ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            info!("Received Ctrl+C, stopping analysis");
            ctrl_c.cancel();
        }
    });

    let outcome = workflow.run(&args.file, cancel).await;

    // Queued progress is printed before the final screen.
    render_stop.cancel();
    if let Err(e) = renderer.await {
        warn!(error = %e, "Renderer task ended abnormally");
    }

    let report = outcome
        .with_context(|| format!("Cannot analyze {}", args.file.display()))?;
    let exit_code = match &report {
        RunReport::Completed(view) => {
            println!("\n{}", render_results(view));
            ExitCode::SUCCESS
        }
        RunReport::Failed(view) => {
            println!("\n{}", render_failure(view));
            println!("Run voxear again with another file to try again.");
            // Leaving the failed screen takes the recovery path.
            workflow.try_again(view).await;
            ExitCode::FAILURE
        }
        RunReport::Cancelled => {
            println!("\nAnalysis cancelled.");
            ExitCode::FAILURE
        }
        RunReport::Redirected => {
            println!("\nNo file to analyze.");
            ExitCode::FAILURE
        }
    };

    let elapsed = Utc::now() - workflow.state().startup_time;
    info!(elapsed_ms = elapsed.num_milliseconds(), "voxear session ended");

    Ok(exit_code)
}
