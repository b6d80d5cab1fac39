//! Command-line surface

use crate::render::{render, Format};
use analysis_client::{AnalysisClient, ClientConfig, RaceState};
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use shared_types::ApiResult;
use span_engine::{summary_pills, SpanEngine};
use std::io::Read;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "termshift")]
#[command(version, about = "Flag risky clauses in terms-of-service documents")]
pub struct Cli {
    /// Analysis service base URL (overrides TERMSHIFT_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Bearer token (overrides TERMSHIFT_API_TOKEN)
    #[arg(long, global = true)]
    pub token: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Analyze a document, pasted text or stdin
    Analyze(AnalyzeArgs),
    /// Render a saved analysis result against its source text
    Render(RenderArgs),
    /// Check that the analysis service is up
    Health,
}

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Document to analyze; stdin is read when neither FILE nor --text is given
    pub file: Option<PathBuf>,

    /// Text to analyze
    #[arg(long, conflicts_with = "file")]
    pub text: Option<String>,

    /// Send the text as a raw text/plain body
    #[arg(long)]
    pub plain: bool,

    /// Print a fast summary while the full analysis runs
    #[arg(long, conflicts_with = "plain")]
    pub preview: bool,

    #[arg(long, value_enum, default_value_t = Format::Ansi)]
    pub format: Format,

    /// Also save the raw result as JSON (usable with `render`)
    #[arg(long)]
    pub save_result: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Source text the result was computed from
    #[arg(long)]
    pub input: PathBuf,

    /// Saved result JSON
    #[arg(long)]
    pub result: PathBuf,

    #[arg(long, value_enum, default_value_t = Format::Ansi)]
    pub format: Format,
}

/// Run a command and return what should go to stdout
pub async fn run(cli: Cli) -> Result<String> {
    match &cli.command {
        Command::Analyze(args) => analyze(&build_client(&cli)?, args).await,
        Command::Render(args) => render_saved(args),
        Command::Health => health(&build_client(&cli)?).await,
    }
}

fn build_client(cli: &Cli) -> Result<AnalysisClient> {
    let mut config = ClientConfig::from_env()?;
    if let Some(url) = &cli.api_url {
        config = config.with_api_base(url)?;
    }
    if let Some(token) = &cli.token {
        config = config.with_token(token.clone());
    }
    tracing::debug!("Using analysis service at {}", config.api_base);
    Ok(AnalysisClient::new(config))
}

/// Document text for display; undecodable bytes are replaced
fn read_text(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

async fn analyze(client: &AnalysisClient, args: &AnalyzeArgs) -> Result<String> {
    let text = match (&args.text, &args.file) {
        (Some(text), _) => text.clone(),
        (None, Some(path)) => read_text(path)?,
        (None, None) => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            buf
        }
    };

    let result: ApiResult = match (&args.file, args.text.is_some()) {
        (Some(path), false) if !args.plain && !args.preview => {
            tracing::info!("Analyzing {}", path.display());
            client.analyze_file(path).await?
        }
        _ if args.preview => {
            client
                .analyze_with_preview(&text, |state| {
                    if let RaceState::PreviewArrived(summary) = state {
                        let (risks, highest) = summary_pills(Some(summary));
                        eprintln!("Preview: {} · {}", risks, highest);
                    }
                })
                .await?
        }
        _ if args.plain => client.analyze_plain(&text).await?,
        _ => client.analyze_text(&text).await?,
    };

    if let Some(scan_id) = &result.scan_id {
        tracing::info!("Scan id: {}", scan_id);
    }
    if let Some(path) = &args.save_result {
        std::fs::write(path, serde_json::to_string_pretty(&result)?)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }

    let report = SpanEngine::new().highlight(&text, &result);
    render(&report, args.format)
}

fn render_saved(args: &RenderArgs) -> Result<String> {
    let text = read_text(&args.input)?;
    let raw = std::fs::read_to_string(&args.result)
        .with_context(|| format!("Failed to read {}", args.result.display()))?;
    let result: ApiResult = serde_json::from_str(&raw)
        .with_context(|| format!("{} is not an analysis result", args.result.display()))?;

    let report = SpanEngine::new().highlight(&text, &result);
    render(&report, args.format)
}

async fn health(client: &AnalysisClient) -> Result<String> {
    let health = client.health().await?;
    if !health.is_ok() {
        anyhow::bail!("Analysis service unhealthy: {} {}", health.status, health.body);
    }
    Ok(format!("{} {}", health.status, health.body))
}
