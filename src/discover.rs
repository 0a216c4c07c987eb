use std::collections::HashSet;
use std::sync::LazyLock;

use scraper::{Html, Selector};
use tracing::{debug, warn};
use url::Url;

static ANCHOR_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a[href]").unwrap());

/// Keywords that mark a link as event-like on sites without a known
/// URL shape.
const GENERIC_KEYWORDS: &[&str] = &["event", "meetup", "networking", "tickets", "/e/"];

/// Event-detail links on a listing page, resolved against the page URL and
/// returned in document order without duplicates. Known hosts get their
/// specific URL shape; everything else falls back to keyword matching.
pub fn event_links(html: &str, page_url: &str) -> Vec<String> {
    let base = match Url::parse(page_url) {
        Ok(u) => u,
        Err(e) => {
            warn!("Cannot resolve links against {}: {}", page_url, e);
            return Vec::new();
        }
    };
    let host = base.host_str().unwrap_or_default().to_lowercase();
    let doc = Html::parse_document(html);

    let mut seen = HashSet::new();
    let mut links = Vec::new();
    for anchor in doc.select(&ANCHOR_SEL) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        if !event_like(&host, href) {
            continue;
        }
        let Ok(mut resolved) = base.join(href) else {
            continue;
        };
        if !matches!(resolved.scheme(), "http" | "https") {
            continue;
        }
        resolved.set_fragment(None);
        let resolved = resolved.to_string();
        if resolved == page_url || !seen.insert(resolved.clone()) {
            continue;
        }
        links.push(resolved);
    }

    debug!("Discovered {} event links on {}", links.len(), page_url);
    links
}

fn event_like(host: &str, href: &str) -> bool {
    let href = href.to_lowercase();
    if host.contains("eventbrite") {
        href.contains("/e/")
    } else if host.contains("meetup") {
        href.contains("/events/")
    } else {
        GENERIC_KEYWORDS.iter().any(|kw| href.contains(kw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn eventbrite_listing_links() {
        let html = fs::read_to_string("tests/fixtures/listing.html").unwrap();
        let links = event_links(&html, "https://www.eventbrite.com/d/md--baltimore/events/");
        assert_eq!(
            links,
            vec![
                "https://www.eventbrite.com/e/harbor-jazz-night-1",
                "https://www.eventbrite.com/e/soup-swap-2",
                "https://www.eventbrite.com/e/federal-hill-5k-3",
            ]
        );
    }

    #[test]
    fn meetup_links_match_events_path() {
        let html = r#"<html><body>
            <a href="/run-club/events/301">Tuesday run</a>
            <a href="/run-club/members/">Members</a>
        </body></html>"#;
        let links = event_links(html, "https://www.meetup.com/run-club/");
        assert_eq!(links, vec!["https://www.meetup.com/run-club/events/301"]);
    }

    #[test]
    fn generic_host_uses_keywords() {
        let html = r#"<html><body>
            <a href="/calendar/spring-gala-tickets">Gala</a>
            <a href="/news/annual-report">Report</a>
            <a href="/community/events/cleanup">Cleanup day</a>
        </body></html>"#;
        let links = event_links(html, "https://library.example.org/");
        assert_eq!(
            links,
            vec![
                "https://library.example.org/calendar/spring-gala-tickets",
                "https://library.example.org/community/events/cleanup",
            ]
        );
    }

    #[test]
    fn duplicates_and_non_http_schemes_drop_out() {
        let html = r#"<html><body>
            <a href="/e/1">first</a>
            <a href="/e/1">again</a>
            <a href="/e/1#tickets">fragment</a>
            <a href="mailto:events@example.org">mail</a>
            <a href="javascript:void(0)">event popup</a>
        </body></html>"#;
        let links = event_links(html, "https://www.eventbrite.com/d/somewhere/");
        assert_eq!(links, vec!["https://www.eventbrite.com/e/1"]);
    }

    #[test]
    fn unparseable_base_yields_nothing() {
        assert!(event_links("<html></html>", "not a url").is_empty());
    }
}
