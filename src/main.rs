use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::LevelFilter;

use git_internals::{Inspector, InspectorConfig};

#[derive(Parser)]
#[command(name = "git-internals")]
#[command(author = "Git Internals Team")]
#[command(version)]
#[command(about = "Inspect the objects, branches and history of a Git repository", long_about = None)]
struct Cli {
    /// Path to the .git directory (or a working tree containing one)
    git_dir: PathBuf,

    /// One of: cat-file, list-branches, log, commit-tree
    command: String,

    /// Object hash for cat-file/commit-tree, branch name for log
    argument: Option<String>,

    /// Configuration file (defaults to the user config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable debug logging on stderr
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if verbose {
        builder.filter_level(LevelFilter::Debug);
    }
    if let Err(e) = builder.try_init() {
        eprintln!("Failed to initialize logger: {}", e);
    }
}

fn run(cli: &Cli) -> Result<String, Box<dyn std::error::Error>> {
    let config = InspectorConfig::load(cli.config.as_deref())?;
    let inspector = Inspector::open(&cli.git_dir, config)?;
    Ok(inspector.execute_command(&cli.command, cli.argument.as_deref())?)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
