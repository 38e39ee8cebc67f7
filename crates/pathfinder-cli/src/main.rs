//! pathfinder CLI: take the career assessment, browse careers, and talk to
//! the guidance back end.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

use commands::Settings;

#[derive(Parser)]
#[command(
    name = "pathfinder",
    version,
    about = "Career assessment quiz and guidance client"
)]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Back end base URL (overrides the config file and PATHFINDER_API_BASE_URL)
    #[arg(long, global = true)]
    api_base: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a starter config, assessment, and career catalog
    Init,

    /// Validate assessment TOML files
    Validate {
        /// Path to an assessment file or directory
        #[arg(long)]
        quiz: PathBuf,
    },

    /// Take an assessment interactively
    Take {
        /// Assessment file (defaults to `default_quiz` from the config)
        #[arg(long)]
        quiz: Option<PathBuf>,

        /// Resume from a saved snapshot
        #[arg(long)]
        resume: Option<PathBuf>,

        /// Where `s` and `q` save the snapshot
        #[arg(long)]
        save: Option<PathBuf>,

        /// Accept answers that are not among a question's options
        #[arg(long)]
        permissive: bool,

        /// Send the answers for a recommendation once finished
        #[arg(long)]
        submit: bool,

        /// Career goals sent with the submission
        #[arg(long, default_value = "")]
        goals: String,

        /// Bearer token (defaults to the configured token)
        #[arg(long)]
        token: Option<String>,

        /// Per-attempt submission timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,
    },

    /// Browse career recommendations
    Recommendations {
        /// Career catalog file (defaults to `default_catalog` from the config)
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Only show careers in this category
        #[arg(long)]
        category: Option<String>,

        /// Show the full details of one career
        #[arg(long)]
        show: Option<u32>,

        /// Career ids to save, comma-separated
        #[arg(long)]
        shortlist: Option<String>,
    },

    /// Create an account
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Sign in and print the issued token
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },

    /// Show the account behind a token
    Me {
        #[arg(long)]
        token: Option<String>,
    },

    /// Upload a resume document
    UploadResume {
        /// Resume file
        #[arg(long)]
        file: PathBuf,

        #[arg(long)]
        token: Option<String>,
    },

    /// Request a recommendation from a saved snapshot
    Recommend {
        /// Assessment the snapshot was taken from
        #[arg(long)]
        quiz: Option<PathBuf>,

        /// Snapshot written by `take --save`
        #[arg(long)]
        snapshot: PathBuf,

        #[arg(long, default_value = "")]
        goals: String,

        #[arg(long)]
        token: Option<String>,
    },

    /// Record an analytics event
    Event {
        /// Event name
        name: String,

        /// Event metadata as a JSON object
        #[arg(long)]
        metadata: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("pathfinder=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let settings = || Settings::load(cli.config.as_deref(), cli.api_base.as_deref());

    match cli.command {
        Commands::Init => commands::init::execute(),
        Commands::Validate { quiz } => commands::validate::execute(&quiz),
        Commands::Take {
            quiz,
            resume,
            save,
            permissive,
            submit,
            goals,
            token,
            timeout,
        } => {
            let args = commands::take::TakeArgs {
                quiz,
                resume,
                save,
                permissive,
                submit,
                goals,
                token,
                timeout,
            };
            commands::take::execute(&settings()?, args).await
        }
        Commands::Recommendations {
            catalog,
            category,
            show,
            shortlist,
        } => commands::recommendations::execute(&settings()?, catalog, category, show, shortlist),
        Commands::Register {
            name,
            email,
            password,
        } => commands::account::register(&settings()?, name, email, password).await,
        Commands::Login { email, password } => {
            commands::account::login(&settings()?, email, password).await
        }
        Commands::Me { token } => commands::account::me(&settings()?, token).await,
        Commands::UploadResume { file, token } => {
            commands::upload::execute(&settings()?, file, token).await
        }
        Commands::Recommend {
            quiz,
            snapshot,
            goals,
            token,
        } => commands::recommend::execute(&settings()?, quiz, snapshot, goals, token).await,
        Commands::Event { name, metadata } => {
            commands::event::execute(&settings()?, name, metadata).await
        }
    }
}
