use crate::console::Console;
use crate::menu;
use clap::{Args, Parser, Subcommand};
use std::io;
use std::path::PathBuf;
use tracing::info;
use vacancy_scout::config::AppConfig;
use vacancy_scout::error::AppError;
use vacancy_scout::postings::JsonFileStore;
use vacancy_scout::sources::HeadHunterClient;
use vacancy_scout::telemetry;

#[derive(Parser, Debug)]
#[command(
    name = "vacancy-scout",
    about = "Collect HeadHunter job postings into a local file and filter them",
    version
)]
struct Cli {
    /// Override the configured posting file (VACANCY_STORE_PATH)
    #[arg(long, global = true)]
    store: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive menu (default command)
    Menu,
    /// Search HeadHunter and store every valid posting
    Fetch {
        /// Search query sent to the API
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
    /// Delete every stored posting with the given numeric id
    Delete { id: String },
    /// Show postings whose description contains any of the keywords
    Search {
        /// Keywords; none lists everything
        words: Vec<String>,
    },
    /// Show postings with a salary inside MIN-MAX (inclusive)
    Salary { range: String },
    /// Show every stored posting
    List,
    /// Show the best-paid postings first
    Top(TopArgs),
    /// Write postings to a CSV file
    Export(ExportArgs),
}

#[derive(Args, Debug)]
struct TopArgs {
    /// Number of postings to show
    #[arg(long, default_value_t = 10)]
    limit: usize,
}

#[derive(Args, Debug)]
struct ExportArgs {
    /// Destination CSV file
    output: PathBuf,
    /// Only export postings matching any of these keywords
    words: Vec<String>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let mut config = AppConfig::load()?;
    if let Some(path) = cli.store {
        config.store.path = path;
    }

    telemetry::init(&config.telemetry)?;
    info!(?config.environment, store = %config.store.path.display(), "vacancy scout starting");

    let store = JsonFileStore::open(&config.store.path)?;
    let client = HeadHunterClient::new(config.source.clone());
    let mut console = Console::new(&client, &store, io::stdout());

    match cli.command.unwrap_or(Command::Menu) {
        Command::Menu => menu::run(&mut console, io::stdin().lock()).await?,
        Command::Fetch { query } => console.fetch(&query.join(" ")).await?,
        Command::Delete { id } => console.delete(&id)?,
        Command::Search { words } => console.search(&words)?,
        Command::Salary { range } => console.salary(&range)?,
        Command::List => console.list()?,
        Command::Top(args) => console.top(args.limit)?,
        Command::Export(args) => console.export(&args.output, &args.words)?,
    }

    Ok(())
}
