use clap::{
    CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use spotigen::{cli, config, error};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Authorize with Spotify API
    Auth,

    /// Create popular and deep-cut playlists from an artist list
    Artists(ArtistsOptions),

    /// Create or update today's setlist playlist from a CSV file
    Setlist(SetlistOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct ArtistsOptions {
    /// Path to text file containing artist names (one per line)
    pub file: String,

    /// Number of popular tracks per artist
    #[clap(long, default_value_t = 3)]
    pub popular_limit: usize,

    /// Number of deep cuts per artist
    #[clap(long, default_value_t = 3)]
    pub deep_limit: usize,

    /// Country code for popularity metrics
    #[clap(long, default_value = "US")]
    pub country: String,

    /// Name for the popular tracks playlist
    #[clap(long, default_value = "Most Popular Tracks")]
    pub popular_name: String,

    /// Name for the deep cuts playlist
    #[clap(long, default_value = "Deep Cuts Collection")]
    pub deep_name: String,
}

#[derive(Parser, Debug, Clone)]
pub struct SetlistOptions {
    /// Path to CSV file with 'artist' and 'song' columns
    pub file: String,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Command::Auth => cli::auth().await,

        Command::Artists(opt) => {
            cli::artists(
                opt.file,
                cli::ArtistFlowOptions {
                    popular_limit: opt.popular_limit,
                    deep_limit: opt.deep_limit,
                    country: opt.country,
                    popular_name: opt.popular_name,
                    deep_name: opt.deep_name,
                },
            )
            .await
        }

        Command::Setlist(opt) => cli::setlist(opt.file).await,

        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
