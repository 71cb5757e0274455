use clap::Parser;
use clap::error::ErrorKind;
use reminder_cli::cli::{Cli, Command, collect_overrides, normalize_parse_error};
use reminder_cli::commands::{Session, execute};
use reminder_cli::daemon;
use reminder_core::clock;
use reminder_core::config::{self, palette_for_theme};
use reminder_core::error::AppError;
use reminder_core::motivation::SystemRandom;
use reminder_core::reminder::Assistant;
use reminder_core::speech::speaker_from_env;
use reminder_core::storage::json_store;
use time::UtcOffset;
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run_command(cli: Cli, offset: UtcOffset) -> Result<(), AppError> {
    let overrides = collect_overrides(&cli.config_override)?;
    let loaded = config::load_config_with_fallback();
    if let Some(err) = &loaded.error {
        warn!(error = %err, "using default configuration");
    }
    let config = config::merge_overrides(&loaded.config, &overrides);
    debug!(?config, "configuration loaded");

    let session = Session {
        offset,
        palette: palette_for_theme(config.theme.as_deref()),
        json: cli.json,
    };

    let command = cli.command.unwrap_or(Command::Run { seed: None });
    let random = match &command {
        Command::Run { seed: Some(seed) } => SystemRandom::seeded(*seed),
        _ => SystemRandom::from_entropy(),
    };
    let mut assistant = Assistant::load(
        json_store::store_path()?,
        speaker_from_env(&config),
        Box::new(random),
    );

    match command {
        Command::Run { .. } => daemon::run(assistant, session),
        command => execute(command, &mut assistant, &session),
    }
}

fn main() {
    // Before any thread exists.
    let offset = clock::local_offset();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(err) => {
            eprintln!("ERROR: {}", normalize_parse_error(err));
            std::process::exit(1);
        }
    };

    init_logging(cli.verbose);

    if let Err(err) = run_command(cli, offset) {
        eprintln!("ERROR: {err}");
        std::process::exit(1);
    }
}
