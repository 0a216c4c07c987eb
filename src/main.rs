mod discover;
mod export;
mod extract;
mod fetch;
mod run;
mod seeds;

use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "event_scraper",
    about = "Scrape event listing pages and save the results to a spreadsheet"
)]
struct Cli {
    /// File with seed URLs, one per line
    #[arg(short = 'u', long, value_name = "FILE")]
    seeds: PathBuf,
    /// Output CSV file
    #[arg(short = 'o', long, value_name = "FILE")]
    output: PathBuf,
    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 15)]
    timeout: u64,
    /// Delay between requests in seconds
    #[arg(short = 'd', long, default_value_t = 1.0)]
    delay: f64,
    /// Max detail links to follow per seed page
    #[arg(long, default_value_t = 25)]
    max_links: usize,
    /// Extract from the seed pages only, without following detail links
    #[arg(long)]
    no_follow: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let t0 = Instant::now();
    let cli = Cli::parse();

    let seed_list = seeds::load(&cli.seeds)?;
    let fetcher = fetch::Fetcher::new(Duration::from_secs(cli.timeout))?;
    let opts = run::Options {
        follow: !cli.no_follow,
        max_links: cli.max_links,
        delay: Duration::from_secs_f64(cli.delay.max(0.0)),
    };

    println!("Scraping {} seed URLs...", seed_list.len());
    let (records, stats) = run::collect(&fetcher, &seed_list, &opts).await;
    println!(
        "Fetched {} pages ({} ok, {} errors), followed {} detail links.",
        stats.fetched, stats.ok, stats.errors, stats.followed
    );

    export::write_csv(&records, &cli.output)?;
    println!("Saved {} events to {}", stats.events, cli.output.display());

    let elapsed = t0.elapsed();
    if elapsed.as_secs() >= 1 {
        println!("\nDone in {}", format_duration(elapsed));
    }

    Ok(())
}

fn format_duration(d: Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{:.1}s", d.as_secs_f64())
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}
