pub mod assemble;
pub mod candidates;
pub mod date;
pub mod jsonld;

use std::collections::HashSet;
use std::sync::LazyLock;

use scraper::{Html, Selector};
use tracing::debug;

use candidates::Field;

static OG_TITLE_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"meta[property="og:title"]"#).unwrap());
static H1_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h1").unwrap());

/// One candidate event. Only the source URL is guaranteed; every other
/// field is heuristic and may be missing. `snippet` carries surrounding
/// markup text for diagnostics and is never exported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRecord {
    pub title: Option<String>,
    pub date: Option<String>,
    pub location: Option<String>,
    pub source_url: String,
    pub snippet: Option<String>,
}

/// Extract every candidate event from a page: structured JSON-LD events
/// first, then title-anchored markup heuristics for titles not already
/// covered. A page with no matches yields an empty list, not an error.
pub fn page_events(html: &str, source_url: &str) -> Vec<EventRecord> {
    let doc = Html::parse_document(html);

    let mut seen: HashSet<String> = HashSet::new();
    let mut out = Vec::new();

    for ev in jsonld::events(&doc) {
        let Some(name) = ev.name else { continue };
        if !seen.insert(name.to_lowercase()) {
            continue;
        }
        out.push(EventRecord {
            title: Some(name),
            date: ev.start_date.as_deref().map(date::clean),
            location: ev.location,
            source_url: source_url.to_string(),
            snippet: None,
        });
    }

    let spotted = candidates::scan(&doc);
    for rec in assemble::records(&spotted, source_url) {
        let key = rec.title.as_deref().unwrap_or_default().to_lowercase();
        if seen.insert(key) {
            out.push(rec);
        }
    }

    if out.is_empty() {
        debug!("No event candidates on {}", source_url);
    }
    out
}

/// Single best record for an event detail page. Title precedence is
/// og:title, then the first h1, then a structured-data name; date and
/// location prefer structured data over markup candidates. Returns None
/// when nothing at all was recognized.
pub fn detail_event(html: &str, source_url: &str) -> Option<EventRecord> {
    let doc = Html::parse_document(html);

    let ld = jsonld::events(&doc).into_iter().next();
    let (ld_name, ld_date, ld_location) = match ld {
        Some(ev) => (ev.name, ev.start_date, ev.location),
        None => (None, None, None),
    };

    let og_title = doc
        .select(&OG_TITLE_SEL)
        .next()
        .and_then(|m| m.value().attr("content"))
        .map(|s| s.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|s| !s.is_empty());
    let h1 = doc
        .select(&H1_SEL)
        .next()
        .map(|el| el.text().collect::<Vec<_>>().join(" "))
        .map(|s| s.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|s| !s.is_empty());

    let spotted = candidates::scan(&doc);
    let markup_date = spotted
        .iter()
        .find_map(|s| match &s.field {
            Field::Date { text, from_markup } if *from_markup => Some(text.clone()),
            _ => None,
        })
        .or_else(|| {
            spotted.iter().find_map(|s| match &s.field {
                Field::Date { text, .. } => Some(text.clone()),
                _ => None,
            })
        });
    let markup_location = spotted.iter().find_map(|s| match &s.field {
        Field::Location { text } => Some(text.clone()),
        _ => None,
    });

    let title = og_title.or(h1).or(ld_name);
    let date = ld_date.or(markup_date);
    let location = ld_location.or(markup_location);

    if title.is_none() && date.is_none() && location.is_none() {
        debug!("Nothing recognized on detail page {}", source_url);
        return None;
    }

    Some(EventRecord {
        title,
        date: date.as_deref().map(date::clean),
        location,
        source_url: source_url.to_string(),
        snippet: None,
    })
}
