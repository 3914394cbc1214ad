//! CLI binary for papercast.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `PodcastConfig` and writes the resulting audio file.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use papercast::{
    extract_only, generate, generate_to_file, Complexity, ConversionSession, PipelineStage,
    PodcastConfig, PodcastProgressCallback, ProgressCallback, DEFAULT_VOICE_ID,
};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: a live bar tracking the pipeline stages, with
/// per-chunk log lines during summarization. Chunk completions may arrive
/// out-of-order (concurrent mode); the session behind the mutex keeps the
/// displayed stage strictly forward.
struct CliProgressCallback {
    bar: ProgressBar,
    session: Mutex<ConversionSession>,
    summary_times: Mutex<Vec<Option<Instant>>>,
}

impl CliProgressCallback {
    fn new(input: &str, complexity: Complexity) -> Arc<Self> {
        let bar = ProgressBar::new(PipelineStage::ALL.len() as u64);
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  [{bar:32.green/238}] {pos}/{len} stages  {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
        bar.set_style(style);
        bar.set_prefix("Converting");
        bar.enable_steady_tick(Duration::from_millis(80));

        let mut session = ConversionSession::new();
        session.set_complexity(complexity);
        // select_file and start cannot fail on a fresh session
        let _ = session.select_file(input);
        let _ = session.start();

        Arc::new(Self {
            bar,
            session: Mutex::new(session),
            summary_times: Mutex::new(Vec::new()),
        })
    }
}

impl PodcastProgressCallback for CliProgressCallback {
    fn on_stage_start(&self, stage: PipelineStage) {
        if let Ok(mut session) = self.session.lock() {
            let _ = session.advance(stage);
        }
        self.bar.set_message(stage.to_string());
    }

    fn on_stage_complete(&self, stage: PipelineStage) {
        self.bar.inc(1);
        if stage == PipelineStage::Summarizing {
            self.bar.set_message("summaries done");
        }
    }

    fn on_summary_start(&self, index: usize, total: usize) {
        let mut times = match self.summary_times.lock() {
            Ok(t) => t,
            Err(_) => return,
        };
        times.resize(total, None);
        times[index - 1] = Some(Instant::now());
        self.bar.set_message(format!("chunk {index}/{total}"));
    }

    fn on_summary_complete(&self, index: usize, total: usize, summary_len: usize) {
        let elapsed_ms = self
            .summary_times
            .lock()
            .ok()
            .and_then(|t| t.get(index - 1).copied().flatten())
            .map(|t| t.elapsed().as_millis())
            .unwrap_or(0);

        self.bar.println(format!(
            "  {} Chunk {:>3}/{:<3}  {:<10}  {}",
            green("✓"),
            index,
            total,
            dim(&format!("{summary_len:>5} chars")),
            dim(&format!("{:.1}s", elapsed_ms as f64 / 1000.0)),
        ));
    }

    fn on_pipeline_complete(&self, chunk_count: usize, audio_bytes: usize) {
        self.bar.finish_and_clear();
        eprintln!(
            "{} {} chunks narrated, {} of audio",
            green("✔"),
            bold(&chunk_count.to_string()),
            bold(&format!("{:.1} MB", audio_bytes as f64 / 1_048_576.0)),
        );
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Basic conversion
  papercast paper.pdf -o paper.mp3

  # Convert from URL at beginner level
  papercast https://arxiv.org/pdf/1706.03762 --complexity beginner -o attention.mp3

  # Use a specific voice and keep the transcript
  papercast paper.pdf --voice JBFqnCBsd6RMkjVDRZzb --transcript-out paper.txt -o paper.mp3

  # Use a specific model pair
  papercast --model gpt-4o-mini --transcript-model gpt-4o paper.pdf -o paper.mp3

  # Extract the text only (no API keys needed)
  papercast --extract-only paper.pdf

  # JSON stats and transcript to stdout, audio to a file
  papercast --json paper.pdf -o paper.mp3 > run.json

  # Run the HTTP server
  papercast --serve --addr 0.0.0.0:3000

ENVIRONMENT VARIABLES:
  OPENAI_API_KEY        OpenAI API key (summaries and transcript)
  ANTHROPIC_API_KEY     Anthropic API key (alternative provider)
  ELEVENLABS_API_KEY    ElevenLabs API key (speech synthesis)

SETUP:
  1. Set API keys:   export OPENAI_API_KEY=sk-...
                     export ELEVENLABS_API_KEY=...
  2. Convert:        papercast paper.pdf -o paper.mp3
"#;

/// Turn research papers (PDF) into narrated podcasts.
#[derive(Parser, Debug)]
#[command(
    name = "papercast",
    version,
    about = "Turn research papers (PDF) into narrated podcasts",
    long_about = "Convert a research paper (local PDF or URL) into a spoken podcast narration. \
Text is extracted, split into chunks, summarized concurrently with a language model, composed \
into a flowing script, and synthesized to MP3 via ElevenLabs.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local PDF file path or HTTP/HTTPS URL. Required unless --serve.
    input: Option<String>,

    /// Write the MP3 audio to this file.
    #[arg(short, long, env = "PAPERCAST_OUTPUT")]
    output: Option<PathBuf>,

    /// Summarization depth: beginner, intermediate, advanced.
    #[arg(long, env = "PAPERCAST_COMPLEXITY", default_value = "intermediate")]
    complexity: String,

    /// ElevenLabs voice identifier.
    #[arg(long, env = "PAPERCAST_VOICE", default_value = DEFAULT_VOICE_ID)]
    voice: String,

    /// Maximum chunk length in characters.
    #[arg(long, env = "PAPERCAST_CHUNK_SIZE", default_value_t = 1700)]
    chunk_size: usize,

    /// Overlap between neighbouring chunks in characters.
    #[arg(long, env = "PAPERCAST_CHUNK_OVERLAP", default_value_t = 20)]
    chunk_overlap: usize,

    /// Number of concurrent chunk-summary API calls.
    #[arg(short, long, env = "PAPERCAST_CONCURRENCY", default_value_t = 8)]
    concurrency: usize,

    /// Model for per-chunk summaries.
    #[arg(long, env = "PAPERCAST_MODEL", default_value = "gpt-4o-mini")]
    model: String,

    /// Model for the transcript composition call.
    #[arg(long, env = "PAPERCAST_TRANSCRIPT_MODEL", default_value = "gpt-4o")]
    transcript_model: String,

    /// LLM provider: openai, anthropic, gemini, ollama.
    /// Auto-detected from API key env vars if not set.
    #[arg(long, env = "PAPERCAST_PROVIDER")]
    provider: Option<String>,

    /// LLM temperature (0.0–2.0).
    #[arg(long, env = "PAPERCAST_TEMPERATURE", default_value_t = 0.7)]
    temperature: f32,

    /// Max LLM output tokens per call.
    #[arg(long, env = "PAPERCAST_MAX_TOKENS", default_value_t = 4096)]
    max_tokens: usize,

    /// Also write the composed transcript to this file.
    #[arg(long, env = "PAPERCAST_TRANSCRIPT_OUT")]
    transcript_out: Option<PathBuf>,

    /// Print the extracted text only, no summarization or synthesis.
    #[arg(long)]
    extract_only: bool,

    /// Output run statistics and transcript as JSON on stdout.
    #[arg(long, env = "PAPERCAST_JSON")]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "PAPERCAST_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PAPERCAST_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PAPERCAST_QUIET")]
    quiet: bool,

    /// Run the HTTP server instead of converting a file.
    #[cfg(feature = "server")]
    #[arg(long)]
    serve: bool,

    /// Address for the HTTP server.
    #[cfg(feature = "server")]
    #[arg(long, env = "PAPERCAST_ADDR", default_value = "127.0.0.1:3000")]
    addr: std::net::SocketAddr,

    /// HTTP download timeout in seconds.
    #[arg(long, env = "PAPERCAST_DOWNLOAD_TIMEOUT", default_value_t = 120)]
    download_timeout: u64,

    /// Per-request LLM/synthesis timeout in seconds.
    #[arg(long, env = "PAPERCAST_API_TIMEOUT", default_value_t = 120)]
    api_timeout: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the progress bar is active;
    // the bar provides all the feedback that matters to the user.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
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

    // ── Server mode ──────────────────────────────────────────────────────
    #[cfg(feature = "server")]
    if cli.serve {
        let config = build_config(&cli, None)?;
        papercast::server::serve(cli.addr, config)
            .await
            .context("Server failed")?;
        return Ok(());
    }

    let input = cli
        .input
        .as_deref()
        .context("No input given. Pass a PDF path or URL, or run with --serve.")?;

    // ── Extract-only mode ────────────────────────────────────────────────
    if cli.extract_only {
        let text = extract_only(input)
            .await
            .context("Failed to extract text")?;
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(text.as_bytes())
            .context("Failed to write to stdout")?;
        if !text.ends_with('\n') {
            handle.write_all(b"\n").ok();
        }
        return Ok(());
    }

    // ── Build config ─────────────────────────────────────────────────────
    let complexity: Complexity = cli
        .complexity
        .parse()
        .context("Invalid --complexity value")?;

    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new(input, complexity) as ProgressCallback)
    } else {
        None
    };

    let config = build_config(&cli, progress_cb)?;

    // ── Run conversion ───────────────────────────────────────────────────
    if let Some(ref output_path) = cli.output {
        if cli.transcript_out.is_some() || cli.json {
            // Needs the full output, not just stats.
            let output = generate(input, &config).await.context("Conversion failed")?;
            write_audio(output_path, &output.audio).await?;
            if let Some(ref t_path) = cli.transcript_out {
                tokio::fs::write(t_path, &output.transcript)
                    .await
                    .with_context(|| format!("Failed to write transcript to {t_path:?}"))?;
            }
            if cli.json {
                let json = serde_json::to_string_pretty(&output)
                    .context("Failed to serialise output")?;
                println!("{json}");
            }
            summary_line(&cli, output.stats.total_duration_ms, output_path);
        } else {
            let stats = generate_to_file(input, output_path, &config)
                .await
                .context("Conversion failed")?;
            summary_line(&cli, stats.total_duration_ms, output_path);
        }
    } else {
        // No audio destination: run the pipeline and report, keeping the
        // transcript if requested. Refuse to dump MP3 bytes to a terminal.
        let output = generate(input, &config).await.context("Conversion failed")?;
        if let Some(ref t_path) = cli.transcript_out {
            tokio::fs::write(t_path, &output.transcript)
                .await
                .with_context(|| format!("Failed to write transcript to {t_path:?}"))?;
        }
        if cli.json {
            let json =
                serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
            println!("{json}");
        } else if !cli.quiet {
            eprintln!(
                "{} audio generated ({} bytes) but no --output given; pass -o to save it",
                cyan("⚠"),
                output.stats.audio_bytes
            );
        }
    }

    Ok(())
}

/// Map CLI args to `PodcastConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<PodcastConfig> {
    let complexity: Complexity = cli
        .complexity
        .parse()
        .context("Invalid --complexity value")?;

    let mut builder = PodcastConfig::builder()
        .chunk_size(cli.chunk_size)
        .chunk_overlap(cli.chunk_overlap)
        .complexity(complexity)
        .concurrency(cli.concurrency)
        .summary_model(cli.model.clone())
        .transcript_model(cli.transcript_model.clone())
        .temperature(cli.temperature)
        .max_tokens(cli.max_tokens)
        .voice_id(cli.voice.clone())
        .download_timeout_secs(cli.download_timeout)
        .api_timeout_secs(cli.api_timeout);

    if let Some(ref provider) = cli.provider {
        builder = builder.provider_name(provider.clone());
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

async fn write_audio(path: &PathBuf, audio: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create {parent:?}"))?;
        }
    }
    tokio::fs::write(path, audio)
        .await
        .with_context(|| format!("Failed to write audio to {path:?}"))
}

fn summary_line(cli: &Cli, duration_ms: u64, output_path: &PathBuf) {
    if !cli.quiet {
        eprintln!(
            "{}  {}ms  →  {}",
            green("✔"),
            duration_ms,
            bold(&output_path.display().to_string()),
        );
    }
}
