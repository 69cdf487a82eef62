//! CLI binary for oas2docs.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `PipelineConfig` and prints results.

use anyhow::{bail, Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use oas2docs::{
    check, generate, generate_to_file, Oas2DocsError, ObserverCallback, PipelineConfig,
    PipelineObserver, PipelineState, RawInput,
};
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── CLI observer using indicatif ─────────────────────────────────────────────

/// Terminal observer: renders a live spinner whose message tracks the
/// pipeline state, so the user always sees which stage a slow run is in.
struct CliObserver {
    bar: ProgressBar,
}

impl CliObserver {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
        bar.set_style(style);
        bar.set_prefix("Generating");
        bar.enable_steady_tick(Duration::from_millis(80));
        Arc::new(Self { bar })
    }

    fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl PipelineObserver for CliObserver {
    fn on_state_change(&self, state: &PipelineState) {
        match state {
            PipelineState::Validating => self.bar.set_message("validating document…"),
            PipelineState::Converting => self.bar.set_message("waiting for conversion service…"),
            PipelineState::Ready(_) | PipelineState::Failed(_) | PipelineState::Idle => {}
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Convert an OpenAPI file (model JSON to stdout)
  oas2docs petstore.json

  # Write the model to a file
  oas2docs petstore.json -o docs-model.json

  # Paste mode — document passed inline
  oas2docs --text '{"openapi":"3.0.0","info":{"title":"x","version":"1"},"paths":{}}'

  # Read the document from stdin
  cat petstore.json | oas2docs -

  # Validate only, no network call
  oas2docs --check petstore.json

  # Use a different conversion service
  oas2docs --endpoint https://converter.internal/convert petstore.json

EXIT CODES:
  0  document converted (or --check passed)
  1  validation failed, conversion failed, or I/O error

ENVIRONMENT VARIABLES:
  OAS2DOCS_ENDPOINT     Conversion service endpoint
  OAS2DOCS_API_TIMEOUT  Per-exchange timeout in seconds (0 = none)
  RUST_LOG              Tracing filter (overrides -v / -q)
"#;

/// Convert OpenAPI 3.0 documents into documentation models.
#[derive(Parser, Debug)]
#[command(
    name = "oas2docs",
    version,
    about = "Validate OpenAPI 3.0 documents and convert them into documentation models",
    long_about = "Validate an OpenAPI 3.0.x document (from a file, inline text, or stdin) and \
convert it into a render-ready documentation model via a conversion service. Validation \
runs locally; only documents that pass reach the network.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// OpenAPI document file, or '-' to read stdin.
    input: Option<String>,

    /// Document passed inline (paste modality); mutually exclusive with a file.
    #[arg(long, conflicts_with = "input")]
    text: Option<String>,

    /// Write the model JSON to this file instead of stdout.
    #[arg(short, long, env = "OAS2DOCS_OUTPUT")]
    output: Option<PathBuf>,

    /// Conversion service endpoint.
    #[arg(long, env = "OAS2DOCS_ENDPOINT", default_value = oas2docs::DEFAULT_CONVERT_URL)]
    endpoint: String,

    /// Per-exchange timeout in seconds (0 = no timeout).
    #[arg(long, env = "OAS2DOCS_API_TIMEOUT", default_value_t = 60)]
    api_timeout: u64,

    /// Retries on transport failure (service rejections are never retried).
    #[arg(long, env = "OAS2DOCS_MAX_RETRIES", default_value_t = 2)]
    max_retries: u32,

    /// Initial retry delay in milliseconds (exponential backoff).
    #[arg(long, env = "OAS2DOCS_RETRY_BACKOFF_MS", default_value_t = 500)]
    retry_backoff_ms: u64,

    /// Validate only; do not contact the conversion service.
    #[arg(long)]
    check: bool,

    /// Compact JSON output (default is pretty-printed).
    #[arg(long)]
    compact: bool,

    /// Disable the progress spinner.
    #[arg(long, env = "OAS2DOCS_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "OAS2DOCS_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors and the model itself.
    #[arg(short, long, env = "OAS2DOCS_QUIET")]
    quiet: bool,
}

/// Acquire the input in the modality the flags select.
fn acquire_input(cli: &Cli) -> Result<RawInput> {
    if let Some(ref text) = cli.text {
        return RawInput::from_text(text.clone()).map_err(Into::into);
    }

    match cli.input.as_deref() {
        Some("-") => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read document from stdin")?;
            // Stdin is the paste modality: text that never touched a file
            // handle on our side.
            RawInput::from_text(buf).map_err(Into::into)
        }
        Some(path) => RawInput::from_file(path).map_err(Into::into),
        None => Err(Oas2DocsError::NoInputSelected.into()),
    }
}

fn render_model(model: &oas2docs::NormalizedModel, compact: bool) -> Result<String> {
    let rendered = if compact {
        serde_json::to_string(model.as_json())
    } else {
        serde_json::to_string_pretty(model.as_json())
    };
    rendered.context("Failed to serialise model")
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the spinner is active; the
    // spinner provides all the feedback that matters to the user.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.check;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let input = acquire_input(&cli)?;
    let modality = input.modality();

    // ── Check-only mode ──────────────────────────────────────────────────
    if cli.check {
        match check(&input) {
            Ok(doc) => {
                if !cli.quiet {
                    let version = doc.as_json()["openapi"].as_str().unwrap_or("?");
                    let title = doc.as_json()["info"]["title"].as_str().unwrap_or("?");
                    let path_count = doc.as_json()["paths"]
                        .as_object()
                        .map(|m| m.len())
                        .unwrap_or(0);
                    eprintln!(
                        "{} {} — OpenAPI {} ({} paths)",
                        green("✔"),
                        bold(title),
                        version,
                        path_count
                    );
                }
                return Ok(());
            }
            Err(e) => {
                eprintln!("{} {}", red("✘"), e);
                std::process::exit(1);
            }
        }
    }

    // ── Build config ─────────────────────────────────────────────────────
    let observer: Option<Arc<CliObserver>> = show_progress.then(CliObserver::new);

    let mut builder = PipelineConfig::builder()
        .convert_url(&cli.endpoint)
        .max_retries(cli.max_retries)
        .retry_backoff_ms(cli.retry_backoff_ms);
    if cli.api_timeout > 0 {
        builder = builder.api_timeout(Duration::from_secs(cli.api_timeout));
    }
    if let Some(ref obs) = observer {
        builder = builder.observer(Arc::clone(obs) as ObserverCallback);
    }
    let config = builder.build()?;

    // ── Run the pipeline ─────────────────────────────────────────────────
    let result = if let Some(ref output_path) = cli.output {
        generate_to_file(input, output_path, &config).await
    } else {
        generate(input, &config).await
    };

    if let Some(ref obs) = observer {
        obs.finish();
    }

    let output = match result {
        Ok(output) => output,
        Err(e) => {
            eprintln!("{} {}", red("✘"), e);
            bail!("generation failed");
        }
    };

    if let Some(ref output_path) = cli.output {
        if !cli.quiet {
            eprintln!(
                "{}  {} input  {}ms  →  {}",
                green("✔"),
                modality,
                output.stats.total_duration_ms,
                bold(&output_path.display().to_string()),
            );
            eprintln!(
                "   {} validation  /  {} conversion",
                dim(&format!("{}ms", output.stats.validate_duration_ms)),
                dim(&format!("{}ms", output.stats.convert_duration_ms)),
            );
        }
    } else {
        let rendered = render_model(&output.model, cli.compact)?;
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(rendered.as_bytes())
            .context("Failed to write to stdout")?;
        if !rendered.ends_with('\n') {
            handle.write_all(b"\n").ok();
        }
        if !cli.quiet {
            eprintln!(
                "{}  ready in {}ms ({}ms conversion)",
                green("✔"),
                output.stats.total_duration_ms,
                output.stats.convert_duration_ms
            );
        }
    }

    Ok(())
}
