use std::sync::LazyLock;

use scraper::{Html, Selector};
use serde_json::Value;
use tracing::debug;

static LD_JSON_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"script[type*="ld+json"]"#).unwrap());

/// Event fields pulled from a JSON-LD payload. All optional; records built
/// from these are still subject to the usual best-effort rules.
#[derive(Debug, Clone)]
pub struct LdEvent {
    pub name: Option<String>,
    pub start_date: Option<String>,
    pub location: Option<String>,
}

/// Collect every Event-typed object from the page's JSON-LD scripts,
/// including ones nested in @graph and itemListElement wrappers.
/// Payloads that fail to parse as JSON are skipped with a diagnostic.
pub fn events(doc: &Html) -> Vec<LdEvent> {
    let mut out = Vec::new();
    for script in doc.select(&LD_JSON_SEL) {
        let raw = script.text().collect::<String>();
        let value: Value = match serde_json::from_str(raw.trim()) {
            Ok(v) => v,
            Err(e) => {
                debug!("Skipping unparseable JSON-LD block: {}", e);
                continue;
            }
        };
        collect(&value, &mut out);
    }
    out
}

fn collect(value: &Value, out: &mut Vec<LdEvent>) {
    match value {
        Value::Array(items) => {
            for item in items {
                collect(item, out);
            }
        }
        Value::Object(map) => {
            for key in ["@graph", "itemListElement", "item"] {
                if let Some(nested) = map.get(key) {
                    collect(nested, out);
                }
            }
            if is_event(value) {
                let start_date = str_field(value, "startDate")
                    .or_else(|| str_field(value, "start_date"))
                    .or_else(|| str_field(value, "date"));
                out.push(LdEvent {
                    name: str_field(value, "name"),
                    start_date,
                    location: location_field(map.get("location")),
                });
            }
        }
        _ => {}
    }
}

/// "@type": "Event" or any subtype like "MusicEvent"; also accepts a list
/// of types.
fn is_event(value: &Value) -> bool {
    match value.get("@type") {
        Some(Value::String(t)) => t.ends_with("Event"),
        Some(Value::Array(types)) => types
            .iter()
            .any(|t| t.as_str().is_some_and(|s| s.ends_with("Event"))),
        _ => false,
    }
}

fn str_field(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)?
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// A location may be a bare string, or a Place with a name and/or a nested
/// postal address.
fn location_field(location: Option<&Value>) -> Option<String> {
    let location = location?;
    if let Some(s) = location.as_str() {
        let s = s.trim();
        return (!s.is_empty()).then(|| s.to_string());
    }
    if let Some(name) = str_field(location, "name") {
        return Some(name);
    }
    match location.get("address") {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Some(addr @ Value::Object(_)) => {
            let parts: Vec<String> = ["streetAddress", "addressLocality", "addressRegion"]
                .iter()
                .filter_map(|k| str_field(addr, k))
                .collect();
            (!parts.is_empty()).then(|| parts.join(", "))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn events_in(html: &str) -> Vec<LdEvent> {
        events(&Html::parse_document(html))
    }

    #[test]
    fn single_event_object() {
        let html = r#"<html><head><script type="application/ld+json">
            {"@type": "Event", "name": "Harbor Jazz Night",
             "startDate": "2026-09-18T19:30:00",
             "location": {"@type": "Place", "name": "The Harborview Room"}}
        </script></head><body></body></html>"#;
        let evs = events_in(html);
        assert_eq!(evs.len(), 1);
        assert_eq!(evs[0].name.as_deref(), Some("Harbor Jazz Night"));
        assert_eq!(evs[0].start_date.as_deref(), Some("2026-09-18T19:30:00"));
        assert_eq!(evs[0].location.as_deref(), Some("The Harborview Room"));
    }

    #[test]
    fn event_subtype_and_type_list() {
        let html = r#"<html><head><script type="application/ld+json">
            [{"@type": "MusicEvent", "name": "A"},
             {"@type": ["Thing", "Event"], "name": "B"},
             {"@type": "Organization", "name": "not an event"}]
        </script></head><body></body></html>"#;
        let names: Vec<_> = events_in(html).into_iter().filter_map(|e| e.name).collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn item_list_nesting() {
        let html = r#"<html><head><script type="application/ld+json">
            {"@type": "ItemList", "itemListElement": [
                {"@type": "ListItem", "item":
                    {"@type": "Event", "name": "Nested", "startDate": "2026-07-04"}}
            ]}
        </script></head><body></body></html>"#;
        let evs = events_in(html);
        assert_eq!(evs.len(), 1);
        assert_eq!(evs[0].name.as_deref(), Some("Nested"));
    }

    #[test]
    fn address_object_location() {
        let html = r#"<html><head><script type="application/ld+json">
            {"@type": "Event", "name": "X", "location":
                {"address": {"streetAddress": "400 Light St", "addressLocality": "Baltimore"}}}
        </script></head><body></body></html>"#;
        let evs = events_in(html);
        assert_eq!(evs[0].location.as_deref(), Some("400 Light St, Baltimore"));
    }

    #[test]
    fn broken_json_is_skipped() {
        let html = r#"<html><head><script type="application/ld+json">
            {"@type": "Event", "name": oops
        </script></head><body></body></html>"#;
        assert!(events_in(html).is_empty());
    }

    #[test]
    fn page_without_structured_data() {
        assert!(events_in("<html><body><p>hello</p></body></html>").is_empty());
    }
}
