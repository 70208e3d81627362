use scrubbed_core::{
    format_modified, format_size, media_kind, sanitize_user_path, CommitResult, Decision,
    DirectoryStorage, SessionController, SessionState, TRASH_FOLDER_NAME,
};
use std::env;
use std::fmt::{self, Display, Formatter};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Clone, Copy)]
enum Action {
    Run,
    PrintVersion,
}

#[derive(Debug)]
struct CliConfig {
    action: Action,
    dir: Option<PathBuf>,
    assume_yes: bool,
}

#[derive(Debug)]
struct CliError(String);

impl Display for CliError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Outcome classes mapped onto process exit codes.
#[derive(Debug, Clone, Copy)]
enum ExitStatus {
    Clean,
    Partial,
    Error,
}

impl ExitStatus {
    fn as_code(self) -> i32 {
        match self {
            Self::Clean => 0,
            Self::Partial => 2,
            Self::Error => 1,
        }
    }
}

fn print_help(prog: &str) {
    println!(
        "\
usage: {prog} [-h] [--version] [--yes] DIR

Triage the files in DIR one at a time, then move the ones marked for
deletion into a {trash} subfolder.

options:
  -h, --help     show this help message and exit
  --version      show program's version number and exit
  -y, --yes      skip the confirmation prompt before moving files

commands during triage:
  k  keep the current file        u  undo the last decision
  d  mark the current file        f  finish early and review
     for deletion                 q  quit without moving anything
",
        prog = prog,
        trash = TRASH_FOLDER_NAME
    );
}

fn parse_args(args: &[String]) -> Result<CliConfig, CliError> {
    let mut config = CliConfig {
        action: Action::Run,
        dir: None,
        assume_yes: false,
    };

    for arg in args {
        match arg.as_str() {
            "--help" | "-h" => return Err(CliError("help".to_string())),
            "--version" => config.action = Action::PrintVersion,
            "--yes" | "-y" => config.assume_yes = true,
            other if other.starts_with('-') => {
                return Err(CliError(format!("unrecognized option: {other}")));
            }
            other => {
                if config.dir.is_some() {
                    return Err(CliError("only one DIR may be given".to_string()));
                }
                config.dir = Some(PathBuf::from(other));
            }
        }
    }

    Ok(config)
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("SCRUB_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    init_logging();

    let mut raw_args: Vec<String> = env::args().collect();
    let prog = raw_args
        .first()
        .map(|arg| {
            Path::new(arg)
                .file_name()
                .and_then(|name| name.to_str())
                .unwrap_or("scrub")
                .to_string()
        })
        .unwrap_or_else(|| "scrub".to_string());
    if !raw_args.is_empty() {
        raw_args.remove(0);
    }

    let config = match parse_args(&raw_args) {
        Ok(config) => config,
        Err(CliError(message)) if message == "help" => {
            print_help(&prog);
            std::process::exit(0);
        }
        Err(err) => {
            eprintln!("{prog}: {err}");
            std::process::exit(ExitStatus::Error.as_code());
        }
    };

    let status = match config.action {
        Action::PrintVersion => {
            println!("{prog} {VERSION}");
            ExitStatus::Clean
        }
        Action::Run => run(&prog, &config),
    };
    std::process::exit(status.as_code());
}

fn run(prog: &str, config: &CliConfig) -> ExitStatus {
    let Some(dir) = &config.dir else {
        print_help(prog);
        return ExitStatus::Error;
    };

    let mut controller = SessionController::new(DirectoryStorage::new(dir));
    match controller.select_folder() {
        Ok(true) => {}
        Ok(false) => {
            println!("No folder selected.");
            return ExitStatus::Clean;
        }
        Err(err) => {
            eprintln!("{prog}: {err}");
            return ExitStatus::Error;
        }
    }
    debug!(dir = %sanitize_user_path(dir), "triage session started");

    let stdin = io::stdin();
    let mut input = stdin.lock().lines();

    loop {
        match controller.state() {
            SessionState::Triaging => match triage_step(&mut controller, &mut input) {
                StepOutcome::Continue => {}
                StepOutcome::Quit => return ExitStatus::Clean,
            },
            SessionState::Reviewing => {
                match review_step(prog, &mut controller, &mut input, config.assume_yes) {
                    ReviewOutcome::Committed(status) => return status,
                    ReviewOutcome::BackToTriage => {}
                    ReviewOutcome::Quit => return ExitStatus::Clean,
                }
            }
            // select_folder and confirm_commit never leave the controller in
            // any other state between prompts.
            _ => return ExitStatus::Clean,
        }
    }
}

enum StepOutcome {
    Continue,
    Quit,
}

fn triage_step<I>(
    controller: &mut SessionController<DirectoryStorage>,
    input: &mut I,
) -> StepOutcome
where
    I: Iterator<Item = io::Result<String>>,
{
    let card = controller.current().map(|entry| {
        format!(
            "{}  {}  {}  {}",
            entry.name,
            format_size(entry.size),
            media_kind(&entry.media_type, &entry.name),
            format_modified(&entry.modified)
        )
    });
    let Some(stats) = controller.stats() else {
        return StepOutcome::Quit;
    };

    match &card {
        Some(line) => {
            println!("[{}/{}] {}", stats.position + 1, stats.total, line);
            print_prompt("(k)eep / (d)elete / (u)ndo / (f)inish / (q)uit > ");
        }
        None => {
            println!(
                "All {} files sorted: {} to delete, {} to keep.",
                stats.total, stats.deleted, stats.kept
            );
            print_prompt("(u)ndo / (f)inish / (q)uit > ");
        }
    }

    let Some(command) = read_command(input) else {
        return StepOutcome::Quit;
    };
    match command.as_str() {
        "k" | "keep" => {
            let _ = controller.record_decision(Decision::Keep);
        }
        "d" | "delete" => {
            let _ = controller.record_decision(Decision::Delete);
        }
        "u" | "undo" => {
            let _ = controller.undo();
        }
        "f" | "finish" => {
            let _ = controller.finish();
        }
        "q" | "quit" => return StepOutcome::Quit,
        "" => {}
        other => println!("unknown command: {other}"),
    }
    StepOutcome::Continue
}

enum ReviewOutcome {
    Committed(ExitStatus),
    BackToTriage,
    Quit,
}

fn review_step<I>(
    prog: &str,
    controller: &mut SessionController<DirectoryStorage>,
    input: &mut I,
    assume_yes: bool,
) -> ReviewOutcome
where
    I: Iterator<Item = io::Result<String>>,
{
    let (to_delete, bytes_to_free) = match controller.session() {
        Some(session) => {
            let names: Vec<(String, u64)> = session
                .delete_set()
                .iter()
                .map(|entry| (entry.name.clone(), entry.size))
                .collect();
            (names, session.stats().bytes_to_free)
        }
        None => (Vec::new(), 0),
    };

    println!();
    if to_delete.is_empty() {
        println!("Nothing marked for deletion.");
    } else {
        println!(
            "{} files marked for deletion ({} to free):",
            to_delete.len(),
            format_size(bytes_to_free)
        );
        for (name, size) in &to_delete {
            println!("  {name}  {}", format_size(*size));
        }
    }

    if !assume_yes && !to_delete.is_empty() {
        print_prompt(&format!(
            "Move {} files into {}? (y)es / (b)ack / (q)uit > ",
            to_delete.len(),
            TRASH_FOLDER_NAME
        ));
        let Some(answer) = read_command(input) else {
            return ReviewOutcome::Quit;
        };
        match answer.as_str() {
            "y" | "yes" => {}
            "b" | "back" => {
                let _ = controller.resume_triage();
                return ReviewOutcome::BackToTriage;
            }
            _ => return ReviewOutcome::Quit,
        }
    }

    match controller.confirm_commit() {
        Ok(result) => ReviewOutcome::Committed(report(&result, &to_delete)),
        Err(err) => {
            // Systemic failure: nothing was moved.
            eprintln!("{prog}: {err}");
            ReviewOutcome::Committed(ExitStatus::Error)
        }
    }
}

fn report(result: &CommitResult, to_delete: &[(String, u64)]) -> ExitStatus {
    for failure in &result.failed {
        eprintln!("failed: {} ({})", failure.name, failure.cause);
    }
    for name in &result.residues {
        eprintln!("copied but original left in place: {name}");
    }

    let freed: u64 = to_delete
        .iter()
        .filter(|(name, _)| result.relocated.contains(name) && !result.residues.contains(name))
        .map(|(_, size)| size)
        .sum();
    println!(
        "Moved {} files to {}, freed {}.",
        result.relocated.len(),
        TRASH_FOLDER_NAME,
        format_size(freed)
    );

    if result.failed.is_empty() {
        ExitStatus::Clean
    } else {
        ExitStatus::Partial
    }
}

fn print_prompt(prompt: &str) {
    print!("{prompt}");
    let _ = io::stdout().flush();
}

fn read_command<I>(input: &mut I) -> Option<String>
where
    I: Iterator<Item = io::Result<String>>,
{
    match input.next() {
        Some(Ok(line)) => Some(line.trim().to_ascii_lowercase()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_args_accepts_dir_and_flags() {
        let config = parse_args(&[
            "--yes".to_string(),
            "/tmp/photos".to_string(),
        ])
        .unwrap();
        assert!(config.assume_yes);
        assert_eq!(config.dir.as_deref(), Some(Path::new("/tmp/photos")));
        assert!(matches!(config.action, Action::Run));
    }

    #[test]
    fn parse_args_rejects_unknown_options_and_extra_dirs() {
        assert!(parse_args(&["--frobnicate".to_string()]).is_err());
        assert!(parse_args(&["a".to_string(), "b".to_string()]).is_err());
    }

    #[test]
    fn parse_args_help_short_circuits() {
        let err = parse_args(&["-h".to_string(), "dir".to_string()]).unwrap_err();
        assert_eq!(err.0, "help");
    }
}
