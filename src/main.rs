// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]
// Add other lints specific to this module that you want to allow but not auto-fix

use anyhow::Result;
use clap::{Args, CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, debug, error};
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;

use clipsub::app_config::{Config, LogLevel};
use clipsub::errors::AppError;
use clipsub::session::{ErrorReport, RenderRequest};
use clipsub::styles::{NO_SUBTITLES, SubtitleStyle};
use clipsub::Controller;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => LogLevel::Error,
            CliLogLevel::Warn => LogLevel::Warn,
            CliLogLevel::Info => LogLevel::Info,
            CliLogLevel::Debug => LogLevel::Debug,
            CliLogLevel::Trace => LogLevel::Trace,
        }
    }
}

/// Options shared by every subcommand
#[derive(Args, Debug)]
struct GlobalOptions {
    /// Configuration file path
    #[arg(short, long, global = true, default_value = "conf.json")]
    config_path: PathBuf,

    /// Set logging level
    #[arg(short, long, global = true, value_enum)]
    log_level: Option<CliLogLevel>,

    /// Override the sessions directory from the configuration
    #[arg(long, global = true, env = "CLIPSUB_SESSIONS_DIR")]
    sessions_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Store a transcript as a session and print the analysis report
    Analyze(AnalyzeArgs),

    /// Render one clip of a session with karaoke subtitles
    Render(RenderArgs),

    /// List stored sessions
    Sessions,

    /// List the available subtitle styles
    Styles,

    /// Generate shell completions for clipsub
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Args, Debug)]
struct AnalyzeArgs {
    /// Transcription engine output (JSON with segments and words)
    #[arg(value_name = "TRANSCRIPT")]
    transcript: PathBuf,

    /// Session id to store under (generated when omitted)
    #[arg(short, long)]
    session_id: Option<String>,

    /// Source video to copy into the session
    #[arg(short, long)]
    media: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct RenderArgs {
    /// Session to render from
    #[arg(value_name = "SESSION_ID")]
    session_id: String,

    /// Clip start in seconds
    #[arg(long)]
    start: f64,

    /// Clip end in seconds
    #[arg(long)]
    end: f64,

    /// Subtitle style, or 'none' for no subtitles
    #[arg(long)]
    style: Option<String>,

    /// File name of the rendered clip inside the session directory
    #[arg(short, long, default_value = "clip.mp4")]
    output_filename: String,

    /// Character budget of one subtitle line
    #[arg(long)]
    max_chars: Option<usize>,

    /// Write the subtitle track and job description without running ffmpeg
    #[arg(long)]
    skip_encode: bool,
}

/// clipsub - karaoke subtitles for short video clips
///
/// Stores word-level transcripts once per session and renders any number of
/// clips from them with styled, word-timed ASS subtitles.
#[derive(Parser, Debug)]
#[command(name = "clipsub")]
#[command(version)]
#[command(about = "Karaoke subtitle synthesis for video clips")]
#[command(long_about = "clipsub stores word-level transcripts as sessions and renders clips with karaoke subtitles.

EXAMPLES:
    clipsub analyze transcript.json -m video.mp4        # Store a session, print its analysis
    clipsub render SESSION --start 12 --end 42          # Render a clip in the default style
    clipsub render SESSION --start 0 --end 30 --style Clean
    clipsub render SESSION --start 0 --end 30 --style none --skip-encode
    clipsub sessions                                    # List stored sessions
    clipsub completions bash > clipsub.bash             # Generate bash completions

Reports are printed to stdout as JSON; logs go to stderr.

CONFIGURATION:
    Configuration is stored in conf.json by default. If the config file doesn't
    exist, a default one will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,

    #[command(flatten)]
    global: GlobalOptions,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI colour for log level
    fn colour_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");

            // stdout carries the JSON reports, logs always go to stderr
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {:<5} {}\x1B[0m",
                Self::colour_for_level(record.level()),
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Info until the config is loaded, the level is updated afterwards
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    match run(cli).await {
        Ok(()) => Ok(()),
        Err(e) => {
            error!("{}", e);
            print_json(&ErrorReport::new(e.code(), e.to_string()))?;
            std::process::exit(1);
        }
    }
}

async fn run(cli: CommandLineOptions) -> Result<(), AppError> {
    if let Some(cmd_log_level) = &cli.global.log_level {
        let level: LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    // These need neither a config nor a session store
    match &cli.command {
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(*shell, &mut cmd, "clipsub", &mut std::io::stdout());
            return Ok(());
        }
        Commands::Styles => {
            let names: Vec<&str> = SubtitleStyle::ALL
                .iter()
                .map(|style| style.name())
                .chain(std::iter::once(NO_SUBTITLES))
                .collect();
            return print_json(&names);
        }
        _ => {}
    }

    let config = load_config(&cli.global)?;
    let controller = Controller::with_config(config)?;
    debug!("Session store at {}", controller.store().root().display());

    match cli.command {
        Commands::Analyze(args) => {
            let report = controller.analyze_file(
                &args.transcript,
                args.session_id.as_deref(),
                args.media.as_deref(),
            )?;
            print_json(&report)
        }
        Commands::Render(args) => {
            let style = args
                .style
                .unwrap_or_else(|| controller.config().subtitles.default_style.name().to_string());
            let request = RenderRequest::new(args.session_id, args.start, args.end, style)
                .with_output_filename(args.output_filename);

            let report = match args.max_chars {
                Some(max_chars) => {
                    let mut config = controller.config().clone();
                    config.subtitles.max_chars_per_line = max_chars;
                    Controller::with_config(config)?
                        .render(&request, args.skip_encode)
                        .await?
                }
                None => controller.render(&request, args.skip_encode).await?,
            };
            print_json(&report)
        }
        Commands::Sessions => {
            let sessions = controller.store().list()?;
            print_json(&sessions)
        }
        Commands::Styles | Commands::Completions { .. } => Ok(()),
    }
}

fn load_config(options: &GlobalOptions) -> Result<Config, AppError> {
    let mut config = Config::load_or_create(&options.config_path)
        .map_err(|e| AppError::Config(format!("{:#}", e)))?;

    if let Some(sessions_dir) = &options.sessions_dir {
        config.sessions_dir = sessions_dir.clone();
    }

    match &options.log_level {
        Some(log_level) => config.log_level = log_level.clone().into(),
        None => log::set_max_level(config.log_level.to_level_filter()),
    }

    Ok(config)
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| AppError::Unknown(format!("Failed to serialize report: {}", e)))?;
    println!("{}", json);
    Ok(())
}
