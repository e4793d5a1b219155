use anyhow::{Context, Result};
use pricecard::{retry::refresh_with_retry, Catalog, Config, CsvLoader, Record};
use reqwest::Client;
use std::{env, fmt::Write as _, path::PathBuf};
use tokio::io::{self, AsyncBufReadExt, BufReader};
use tracing::{error, info, Level};
use tracing_subscriber::{fmt, EnvFilter};

const HELP: &str = "type to search, `:exact <name>`, `:json <query>`, `:reload`, `:quit`";

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::default().add_directive(log_level.parse().unwrap_or(Level::INFO.into()))
    });
    fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    // ─── 2) configuration ────────────────────────────────────────────
    let cfg_path = env::args().nth(1).map(PathBuf::from);
    let cfg = Config::load(cfg_path.as_deref()).context("loading configuration")?;
    info!(url = %cfg.data_url, cache_bust = cfg.cache_bust, "startup");

    let client = Client::builder()
        .build()
        .context("building HTTP client")?;
    let loader = CsvLoader::from_config(client, &cfg);
    let catalog = Catalog::new(cfg.duplicates);

    // ─── 3) initial load ─────────────────────────────────────────────
    if let Err(e) = refresh(&catalog, &loader, &cfg).await {
        println!("Could not load data\n{}", e);
        return Err(e).context("initial load");
    }
    println!("{} products loaded. {}", catalog.len(), HELP);

    // ─── 4) query loop ───────────────────────────────────────────────
    let mut lines = BufReader::new(io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        match line.split_once(' ').unwrap_or((line, "")) {
            (":quit", _) | (":q", _) => break,
            (":reload", _) => match refresh(&catalog, &loader, &cfg).await {
                Ok(()) => println!("{} products loaded.", catalog.len()),
                Err(e) => println!("Could not load data: {} (keeping previous data)", e),
            },
            (":exact", name) => match catalog.exact_by_name(name.trim()) {
                Some(rec) => print!("{}", render_card(&rec)),
                None => println!("No product named {:?}", name.trim()),
            },
            (":json", query) => {
                let hit = catalog.first_match(&query.trim().to_lowercase());
                println!("{}", serde_json::to_string_pretty(&hit)?);
            }
            _ => {
                let query = line.to_lowercase();
                if query.is_empty() {
                    continue;
                }
                let suggestions = catalog.search(&query, cfg.search_limit);
                print!("{}", render_suggestions(&suggestions));
                if let Some(rec) = catalog.first_match(&query) {
                    print!("{}", render_card(&rec));
                }
            }
        }
    }

    info!("bye");
    Ok(())
}

async fn refresh(
    catalog: &Catalog,
    loader: &CsvLoader,
    cfg: &Config,
) -> Result<(), pricecard::LoadError> {
    refresh_with_retry(
        catalog,
        loader,
        &cfg.data_url,
        cfg.retries,
        cfg.retry_backoff(),
    )
    .await
    .map(|outcome| info!(?outcome, "refresh done"))
    .map_err(|e| {
        error!(error = %e, "refresh failed");
        e
    })
}

fn render_suggestions(matches: &[Record]) -> String {
    let mut out = String::new();
    if matches.is_empty() {
        out.push_str("  (no matches)\n");
    }
    for m in matches {
        let _ = writeln!(out, "  {}", m.name);
    }
    out
}

fn render_card(rec: &Record) -> String {
    let dash = |s: &str| if s.is_empty() { "-".to_string() } else { s.to_string() };
    let image = if rec.has_image() {
        rec.image_url.as_str()
    } else {
        "Image Not Available"
    };

    let mut out = String::new();
    let _ = writeln!(out, "┌ {}", rec.name);
    let _ = writeln!(out, "│ 30mm  {}", dash(&rec.price_tier_30));
    let _ = writeln!(out, "│ 20mm  {}", dash(&rec.price_tier_20));
    let _ = writeln!(out, "└ {}", image);
    out
}
