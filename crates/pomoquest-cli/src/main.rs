use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "pomoquest-cli", version, about = "Pomoquest CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the pomodoro cycle in the terminal
    Play(commands::play::PlayArgs),
    /// Print level, coins and session state as JSON
    Status,
    /// List characters, or pick one to start a session
    Character {
        /// Character name (omit to list the roster)
        name: Option<String>,
    },
    /// Task management
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// Spend coins
    Shop {
        #[command(subcommand)]
        action: commands::shop::ShopAction,
    },
    /// Toggle the music mute flag
    Mute,
    /// Saved session state
    State {
        #[command(subcommand)]
        action: commands::state::StateAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Generate shell completions
    Completions {
        shell: clap_complete::Shell,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("pomoquest_core=warn,pomoquest_cli=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Play(args) => commands::play::run(args),
        Commands::Status => commands::state::status(),
        Commands::Character { name } => commands::state::character(name),
        Commands::Task { action } => commands::task::run(action),
        Commands::Shop { action } => commands::shop::run(action),
        Commands::Mute => commands::state::mute(),
        Commands::State { action } => commands::state::run(action),
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "pomoquest-cli", &mut std::io::stdout());
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
