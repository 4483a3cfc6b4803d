// xUnit Pipeline - command line entry point

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use xunit_core::{RunContext, StderrSink};
use xunit_pipeline::{
    load_pipeline_config, LocalNode, NodeHandler, ProcessOutcome, ReportProcessor, RunHistory,
};

#[derive(Parser, Debug)]
#[command(name = "xunit-pipeline")]
#[command(version, about = "Convert test reports and compute the build verdict")]
struct Cli {
    /// Pipeline configuration (TOML)
    #[arg(long)]
    config: PathBuf,

    /// Workspace the tool patterns are resolved against
    #[arg(long, default_value = ".")]
    workspace: PathBuf,

    /// Identifier of the run being recorded
    #[arg(long)]
    run_id: String,

    /// Directory holding the run history
    #[arg(long, default_value = ".xunit-history")]
    history_dir: PathBuf,

    /// Extra environment variable for pattern macros (KEY=VALUE)
    #[arg(long = "env", value_name = "KEY=VALUE", action = clap::ArgAction::Append)]
    env: Vec<String>,

    /// Mark the run as completed once recorded
    #[arg(long)]
    complete: bool,
}

fn parse_env_pair(pair: &str) -> Result<(String, String)> {
    let (key, value) = pair
        .split_once('=')
        .ok_or_else(|| anyhow!("Invalid --env value '{}', expected KEY=VALUE", pair))?;
    if key.trim().is_empty() {
        return Err(anyhow!("Invalid --env value '{}', empty key", pair));
    }
    Ok((key.trim().to_string(), value.to_string()))
}

fn build_env(cli: &Cli, workspace: &std::path::Path) -> Result<HashMap<String, String>> {
    let mut env: HashMap<String, String> = std::env::vars().collect();
    for pair in &cli.env {
        let (key, value) = parse_env_pair(pair)?;
        env.insert(key, value);
    }
    env.insert("WORKSPACE".to_string(), workspace.display().to_string());
    env.insert("RUN_ID".to_string(), cli.run_id.clone());
    Ok(env)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = load_pipeline_config(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    let workspace = std::fs::canonicalize(&cli.workspace)
        .with_context(|| format!("workspace {}", cli.workspace.display()))?;
    let env = build_env(&cli, &workspace)?;

    let history = RunHistory::open(&cli.history_dir)?;
    tracing::debug!(history = %history.dir().display(), "run history opened");
    let started_at_ms = history
        .load(&cli.run_id)?
        .map(|record| record.started_at_ms)
        .unwrap_or_else(|| chrono::Utc::now().timestamp_millis());
    let context = RunContext::new(
        cli.run_id.clone(),
        workspace.clone(),
        started_at_ms,
        Arc::new(StderrSink),
    )
    .with_env(env);
    let mut run = history.prepare_run(context)?;

    let node = Arc::new(LocalNode::new(NodeHandler::new(workspace)));
    let processor = ReportProcessor::new(config, node)?;
    tracing::debug!(namespace = processor.namespace(), "processor ready");

    let outcome = processor.process(&mut run).await;
    history.store_run(&run, cli.complete)?;

    match outcome? {
        ProcessOutcome::Skipped => println!("SKIPPED"),
        ProcessOutcome::Recorded {
            verdict,
            passed,
            failed,
            skipped,
        } => println!(
            "{} passed={} failed={} skipped={}",
            verdict, passed, failed, skipped
        ),
    }
    Ok(())
}
