use std::collections::HashSet;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use crate::discover;
use crate::extract::{self, EventRecord};
use crate::fetch::{FetchOutcome, Fetcher};
use crate::seeds::Seed;

pub struct Options {
    pub follow: bool,
    pub max_links: usize,
    pub delay: Duration,
}

#[derive(Debug, Default)]
pub struct RunStats {
    /// Fetch attempts, seeds and followed links together.
    pub fetched: usize,
    pub ok: usize,
    pub errors: usize,
    /// Detail links followed off listing pages.
    pub followed: usize,
    /// Final record count after within-run dedup.
    pub events: usize,
}

/// Records and discovered detail links from one fetched page.
pub struct Harvest {
    pub records: Vec<EventRecord>,
    pub links: Vec<String>,
}

/// Per-page step over one fetch outcome: extraction plus link discovery.
/// A failed fetch contributes zero records and zero links; it never stops
/// the run.
pub fn harvest(outcome: &FetchOutcome, opts: &Options) -> Harvest {
    match outcome {
        FetchOutcome::Failed { .. } => Harvest {
            records: Vec::new(),
            links: Vec::new(),
        },
        FetchOutcome::Page { url, body, .. } => {
            let records = extract::page_events(body, url);
            let mut links = if opts.follow {
                discover::event_links(body, url)
            } else {
                Vec::new()
            };
            if links.len() > opts.max_links {
                info!(
                    "Capping followed links on {} ({} found, following {})",
                    url,
                    links.len(),
                    opts.max_links
                );
                links.truncate(opts.max_links);
            }
            Harvest { records, links }
        }
    }
}

/// Drop records repeating an earlier (title, source URL) pair, keeping
/// first occurrences and their order.
pub fn dedup(records: Vec<EventRecord>) -> Vec<EventRecord> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|r| {
            seen.insert((
                r.title.as_deref().unwrap_or_default().to_lowercase(),
                r.source_url.clone(),
            ))
        })
        .collect()
}

/// Run the whole pipeline over the seed list, sequentially and in order:
/// fetch each seed, extract, optionally follow discovered detail links,
/// and accumulate records. Only the final record list leaves this function;
/// nothing is persisted along the way.
pub async fn collect(fetcher: &Fetcher, seeds: &[Seed], opts: &Options) -> (Vec<EventRecord>, RunStats) {
    let pb = ProgressBar::new(seeds.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} ({per_sec}, eta {eta})")
            .unwrap()
            .progress_chars("=> "),
    );

    let mut all = Vec::new();
    let mut stats = RunStats::default();
    let mut first = true;

    for seed in seeds {
        if !first {
            tokio::time::sleep(opts.delay).await;
        }
        first = false;

        let outcome = fetcher.get(&seed.url).await;
        stats.fetched += 1;
        match &outcome {
            FetchOutcome::Page { status, .. } => {
                stats.ok += 1;
                debug!("Seed on line {} fetched (HTTP {})", seed.line, status);
            }
            FetchOutcome::Failed { .. } => {
                stats.errors += 1;
                debug!("Seed on line {} produced no page", seed.line);
            }
        }

        let h = harvest(&outcome, opts);
        all.extend(h.records);

        for link in h.links {
            tokio::time::sleep(opts.delay).await;
            let outcome = fetcher.get(&link).await;
            stats.fetched += 1;
            stats.followed += 1;
            match outcome {
                FetchOutcome::Page { url, body, .. } => {
                    stats.ok += 1;
                    if let Some(record) = extract::detail_event(&body, &url) {
                        all.push(record);
                    }
                }
                FetchOutcome::Failed { .. } => stats.errors += 1,
            }
        }

        pb.inc(1);
    }
    pb.finish_and_clear();

    let before = all.len();
    let records = dedup(all);
    if records.len() < before {
        info!("Dropped {} duplicate records", before - records.len());
    }
    stats.events = records.len();
    (records, stats)
}
