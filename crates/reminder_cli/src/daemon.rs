use crate::cli::{Cli, normalize_parse_error, split_command_line};
use crate::commands::{Session, execute};
use clap::{CommandFactory, Parser};
use reminder_core::clock::Moment;
use reminder_core::error::AppError;
use reminder_core::reminder::Assistant;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{MissedTickBehavior, interval};
use tracing::{debug, info, warn};

const TICK_PERIOD: Duration = Duration::from_secs(1);
// Stdin is read on a blocking thread that cannot be interrupted.
const SHUTDOWN_GRACE: Duration = Duration::from_millis(200);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

pub fn run(assistant: Assistant, session: Session) -> Result<(), AppError> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let result = runtime.block_on(run_loop(assistant, session));
    runtime.shutdown_timeout(SHUTDOWN_GRACE);
    result
}

async fn run_loop(mut assistant: Assistant, session: Session) -> Result<(), AppError> {
    info!(
        store = %assistant.store_path().display(),
        tasks = assistant.tasks().len(),
        "reminder loop started"
    );
    assistant.greet();

    let mut ticker = interval(TICK_PERIOD);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let report = assistant.tick(Moment::now(session.offset));
                for text in &report.spoken {
                    info!(task_id = ?report.current_task_id, offset = ?report.offset, "{text}");
                }
            }
            line = lines.next_line(), if stdin_open => match line {
                Ok(Some(line)) => {
                    if handle_line(&mut assistant, &session, &line) == Flow::Quit {
                        break;
                    }
                }
                Ok(None) => {
                    debug!("stdin closed, running until interrupted");
                    stdin_open = false;
                }
                Err(err) => {
                    warn!(error = %err, "stdin unreadable, ignoring further input");
                    stdin_open = false;
                }
            },
            signal = &mut shutdown => {
                if let Err(err) = signal {
                    warn!(error = %err, "failed to listen for Ctrl-C");
                }
                break;
            }
        }
    }

    info!("reminder loop stopped");
    Ok(())
}

fn print_help() {
    let mut cmd = Cli::command();
    let help = cmd.render_help();
    println!("{help}");
}

fn handle_line(assistant: &mut Assistant, session: &Session, line: &str) -> Flow {
    let line = line.trim();
    if line.is_empty() {
        return Flow::Continue;
    }

    if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
        return Flow::Quit;
    }

    if line == "help" || line == "?" {
        print_help();
        return Flow::Continue;
    }

    if let Err(err) = run_line(assistant, session, line) {
        eprintln!("ERROR: {err}");
    }
    Flow::Continue
}

fn run_line(assistant: &mut Assistant, session: &Session, line: &str) -> Result<(), AppError> {
    let args = split_command_line(line)?;
    if args.is_empty() {
        return Ok(());
    }

    let mut argv = Vec::with_capacity(args.len() + 1);
    argv.push("reminder".to_string());
    argv.extend(args);

    let cli = Cli::try_parse_from(argv).map_err(normalize_parse_error)?;
    let Some(command) = cli.command else {
        return Ok(());
    };

    let session = Session {
        json: session.json || cli.json,
        ..session.clone()
    };
    execute(command, assistant, &session)
}
