//! Walk a listing page by page and print what the catalog would serve.
//! Usage:
//!   cargo run --bin catalog_walk -- movie
//!   cargo run --bin catalog_walk -- tv latest 18 --pages 3
//! Requires TMDB_API_KEY in the environment (.env supported).

use anyhow::{Context, Result};
use cinecatalog::catalog::CatalogFetcher;
use cinecatalog::config::Config;
use cinecatalog::feed::{CatalogFeed, ListKey, LoadOutcome};
use cinecatalog::models::MediaKind;
use cinecatalog::sort::SortKey;
use cinecatalog::tmdb::{TmdbApi, TmdbClient};
use cinecatalog::utils::image_url;
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;
use std::sync::Arc;

const DEFAULT_PAGES: u32 = 2;

struct Args {
    kind: MediaKind,
    sort: SortKey,
    genre: Option<i64>,
    pages: u32,
}

fn parse_args(raw: &[String]) -> Result<Args> {
    let mut positional = Vec::new();
    let mut pages = DEFAULT_PAGES;
    let mut iter = raw.iter();
    while let Some(arg) = iter.next() {
        if arg == "--pages" {
            pages = iter
                .next()
                .ok_or_else(|| anyhow::anyhow!("--pages needs a value"))?
                .parse()
                .context("--pages must be a positive integer")?;
        } else {
            positional.push(arg.as_str());
        }
    }

    let kind = MediaKind::from_str(
        positional
            .first()
            .ok_or_else(|| anyhow::anyhow!("missing media kind"))?,
    )?;
    let sort = match positional.get(1) {
        Some(value) => SortKey::parse(kind, value)
            .ok_or_else(|| anyhow::anyhow!("unknown sort '{}' for {}", value, kind))?,
        None => SortKey::default(),
    };
    let genre = positional
        .get(2)
        .map(|g| g.parse::<i64>().context("genre must be an integer id"))
        .transpose()?;

    Ok(Args {
        kind,
        sort,
        genre,
        pages: pages.max(1),
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let raw: Vec<String> = env::args().skip(1).collect();
    if raw.is_empty() {
        eprintln!("Usage: cargo run --bin catalog_walk -- <movie|tv> [sort] [genre_id] [--pages N]");
        std::process::exit(1);
    }
    let args = parse_args(&raw)?;

    let config = Config::from_env()?;
    let tmdb: Arc<dyn TmdbApi> = Arc::new(TmdbClient::new(&config)?);
    let fetcher = CatalogFetcher::new(tmdb);

    if let Some(genre) = args.genre {
        let name = fetcher
            .genres(args.kind)
            .await
            .into_iter()
            .find(|g| g.id == genre)
            .map(|g| g.name)
            .unwrap_or_else(|| "unknown genre".to_string());
        println!("Genre {}: {}", genre, name);
    }
    println!("Sort: {} ({})", args.sort.label(), args.sort.value(args.kind));

    let feed = CatalogFeed::new(fetcher, ListKey::new(args.kind, args.genre, args.sort));
    for _ in 0..args.pages {
        let before = feed.len();
        match feed.load_more().await {
            LoadOutcome::Appended { page, added } => {
                println!("--- page {} ({} items) ---", page, added);
                for item in feed.items().iter().skip(before) {
                    let core = item.core();
                    println!(
                        "{:>8}  {:<40}  {:<6}  {:>4.1}  {}",
                        core.id,
                        core.title,
                        core.content_rating,
                        core.vote_average,
                        item.date().unwrap_or("-")
                    );
                    if let Some(poster) = core.poster_path.as_deref() {
                        println!("          {}", image_url(poster, "w342"));
                    }
                }
            }
            LoadOutcome::Exhausted => {
                println!("--- no more pages ---");
                break;
            }
            other => println!("--- load skipped: {:?} ---", other),
        }
    }
    println!("Loaded {} items across {} pages", feed.len(), feed.page());
    Ok(())
}
