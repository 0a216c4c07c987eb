use std::collections::HashSet;

use super::candidates::{Field, Spotted};
use super::{date, EventRecord};

/// Build one candidate record per independently-discovered title, attaching
/// the nearest date and location candidates in document order. Nothing is
/// validated; attachment is pure markup proximity. Repeated titles on the
/// same page collapse to the first occurrence.
pub fn records(spotted: &[Spotted], source_url: &str) -> Vec<EventRecord> {
    let dates: Vec<(usize, &str)> = spotted
        .iter()
        .filter_map(|s| match &s.field {
            Field::Date { text, .. } => Some((s.pos, text.as_str())),
            _ => None,
        })
        .collect();
    let locations: Vec<(usize, &str)> = spotted
        .iter()
        .filter_map(|s| match &s.field {
            Field::Location { text } => Some((s.pos, text.as_str())),
            _ => None,
        })
        .collect();

    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for s in spotted {
        let Field::Title { text, context } = &s.field else {
            continue;
        };
        if !seen.insert(text.to_lowercase()) {
            continue;
        }
        out.push(EventRecord {
            title: Some(text.clone()),
            date: nearest(&dates, s.pos).map(date::clean),
            location: nearest(&locations, s.pos).map(str::to_string),
            source_url: source_url.to_string(),
            snippet: context.clone(),
        });
    }
    out
}

/// Nearest candidate by node distance; following candidates win over
/// preceding ones at equal distance.
fn nearest<'a>(items: &[(usize, &'a str)], pos: usize) -> Option<&'a str> {
    items
        .iter()
        .min_by_key(|(p, _)| if *p >= pos { (*p - pos) * 2 } else { (pos - *p) * 2 + 1 })
        .map(|(_, text)| *text)
}
