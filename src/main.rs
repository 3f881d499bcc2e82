use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use my_next_movie::{
    models::{PosterCard, Selection},
    Config, Session,
};

#[derive(Parser, Debug)]
#[command(name = "my-next-movie", about = "Find your next movie", version)]
struct Cli {
    /// Emit JSON instead of plain text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List catalog titles with their posters
    Browse {
        /// Number of catalog pages to load
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },
    /// Search titles; an empty query lists the first catalog page
    Search {
        #[arg(default_value = "")]
        query: String,
    },
    /// Show recommendations for a title
    Recommend { title: String },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "my_next_movie=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::from_env()?;
    tracing::debug!(?config, "Configuration loaded");

    match cli.command {
        Command::Browse { pages } => {
            let session = Session::from_config(&config)?;
            for _ in 0..pages {
                if session.load_more().await?.is_none() {
                    break;
                }
            }
            let titles = session.catalog_titles().await;
            print_cards(&session.cards(&titles).await, cli.json)?;
        }
        Command::Search { query } => {
            let session = Session::open(&config).await?;
            let options = session.search(&query).await;
            print_options(&options, cli.json)?;
        }
        Command::Recommend { title } => {
            let session = Session::from_config(&config)?;
            session.select(Some(Selection::from_title(title))).await;
            session.recommend().await;
            print_cards(&session.recommendation_cards().await, cli.json)?;
        }
    }

    Ok(())
}

fn print_cards(cards: &[PosterCard], json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(cards)?);
    } else if cards.is_empty() {
        println!("No titles.");
    } else {
        for card in cards {
            println!(
                "{}\n  poster: {}\n  details: {}",
                card.title, card.poster.poster_url, card.poster.detail_link
            );
        }
    }
    Ok(())
}

fn print_options(options: &[Selection], json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(options)?);
    } else {
        for option in options {
            println!("{}", option.label);
        }
    }
    Ok(())
}
