use std::fmt;
use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use services::{AppServices, Clock};
use storage::JsonFileStore;

mod repl;

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
        }
    }
}

impl std::error::Error for ArgsError {}

#[derive(Debug)]
enum Command {
    Run,
    Import { file: PathBuf },
}

#[derive(Debug)]
struct Args {
    data_path: PathBuf,
    name: Option<String>,
    command: Command,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  quizbank [run]                     launch the interactive study loop");
    eprintln!("  quizbank import <file.csv> [--name <library>]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --data <path>   snapshot file (default: quizbank.json)");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  QUIZBANK_DATA   overrides the default snapshot path");
}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn parse_args(argv: Vec<String>) -> Result<Args, ArgsError> {
    let mut data_path = std::env::var("QUIZBANK_DATA")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("quizbank.json"));
    let mut name = None;
    let mut command = None;

    let mut iter = argv.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--data" => data_path = PathBuf::from(require_value(&mut iter, "--data")?),
            "--name" => name = Some(require_value(&mut iter, "--name")?),
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            "run" if command.is_none() => command = Some(Command::Run),
            "import" if command.is_none() => {
                let file = PathBuf::from(require_value(&mut iter, "import")?);
                command = Some(Command::Import { file });
            }
            other => return Err(ArgsError::UnknownArg(other.to_owned())),
        }
    }

    Ok(Args {
        data_path,
        name,
        command: command.unwrap_or(Command::Run),
    })
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = parse_args(std::env::args().skip(1).collect()).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    tracing::debug!(path = %args.data_path.display(), "using snapshot file");
    let store = Arc::new(JsonFileStore::new(&args.data_path));
    let services = AppServices::new(store, Clock::default_clock())?;

    match args.command {
        Command::Run => repl::run(&services)?,
        Command::Import { file } => {
            let name = args.name.unwrap_or_else(|| {
                file.file_stem()
                    .map(|stem| stem.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "imported".to_owned())
            });
            let reader = File::open(&file)?;
            let count = services.import_csv(&name, reader)?;
            println!("Imported {count} questions into \"{name}\"");
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::from(2)
        }
    }
}
