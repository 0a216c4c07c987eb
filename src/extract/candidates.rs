use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html};

use super::date;

static DATE_HINT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)date|time|when|dtstart|start").unwrap());
static LOCATION_HINT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)venue|location|address|where|event-details").unwrap());
static TITLE_HINT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)event|title|summary").unwrap());

const MAX_TITLE_LEN: usize = 120;
const MAX_DATE_LEN: usize = 80;
const MAX_LOCATION_LEN: usize = 160;
const MAX_SNIPPET_LEN: usize = 160;

/// One field candidate spotted during the document walk.
#[derive(Debug, Clone)]
pub enum Field {
    Title { text: String, context: Option<String> },
    Date { text: String, from_markup: bool },
    Location { text: String },
}

#[derive(Debug, Clone)]
pub struct Spotted {
    /// Document-order position, used for nearest-proximity attachment.
    pub pos: usize,
    pub field: Field,
}

/// Walk the document tree in order and classify elements into typed field
/// candidates. Best-effort: containers and oversized text are skipped, and
/// an element contributes at most one candidate.
pub fn scan(doc: &Html) -> Vec<Spotted> {
    let mut spotted = Vec::new();
    for (pos, node) in doc.root_element().descendants().enumerate() {
        let Some(el) = ElementRef::wrap(node) else { continue };
        if matches!(el.value().name(), "script" | "style" | "noscript" | "template") {
            continue;
        }
        classify(pos, el, &mut spotted);
    }
    spotted
}

fn classify(pos: usize, el: ElementRef, out: &mut Vec<Spotted>) {
    let name = el.value().name();
    let hints = attr_hints(el);

    // ── Headings anchor titles directly ──
    if matches!(name, "h1" | "h2" | "h3" | "h4") {
        if let Some(text) = short_text(el, MAX_TITLE_LEN) {
            out.push(Spotted {
                pos,
                field: Field::Title {
                    text,
                    context: parent_snippet(el),
                },
            });
        }
        return;
    }

    // ── <time>: prefer the machine-readable datetime attribute ──
    if name == "time" {
        let text = el
            .value()
            .attr("datetime")
            .map(str::to_string)
            .filter(|t| !t.trim().is_empty())
            .or_else(|| short_text(el, MAX_DATE_LEN));
        if let Some(text) = text {
            out.push(Spotted {
                pos,
                field: Field::Date {
                    text,
                    from_markup: true,
                },
            });
        }
        return;
    }

    // ── <meta> carries its value in the content attribute ──
    if name == "meta" {
        let keys = [
            el.value().attr("property"),
            el.value().attr("name"),
            el.value().attr("itemprop"),
        ]
        .iter()
        .flatten()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(" ");
        if DATE_HINT_RE.is_match(&keys) {
            if let Some(content) = el.value().attr("content") {
                let content = squash_ws(content);
                if !content.is_empty() && content.chars().count() <= MAX_DATE_LEN {
                    out.push(Spotted {
                        pos,
                        field: Field::Date {
                            text: content,
                            from_markup: true,
                        },
                    });
                }
            }
        }
        return;
    }

    // ── Named hints: location before date before title, since class names
    //    like "event-date" match more than one pattern ──
    if el.value().attr("data-venue-name").is_some() || LOCATION_HINT_RE.is_match(&hints) {
        if let Some(text) = short_text(el, MAX_LOCATION_LEN) {
            out.push(Spotted {
                pos,
                field: Field::Location { text },
            });
        }
        return;
    }

    if DATE_HINT_RE.is_match(&hints) {
        if let Some(text) = short_text(el, MAX_DATE_LEN) {
            out.push(Spotted {
                pos,
                field: Field::Date {
                    text,
                    from_markup: true,
                },
            });
        }
        return;
    }

    if TITLE_HINT_RE.is_match(&hints) {
        if let Some(text) = short_text(el, MAX_TITLE_LEN) {
            out.push(Spotted {
                pos,
                field: Field::Title {
                    text,
                    context: parent_snippet(el),
                },
            });
        }
        return;
    }

    // ── Lexical fallback: date-like substrings in leaf text ──
    if is_leaf(el) {
        if let Some(text) = short_text(el, 300) {
            if let Some(found) = date::find(&text) {
                out.push(Spotted {
                    pos,
                    field: Field::Date {
                        text: found,
                        from_markup: false,
                    },
                });
            }
        }
    }
}

/// class + id + itemprop joined, the attributes naming conventions live in.
fn attr_hints(el: ElementRef) -> String {
    [
        el.value().attr("class"),
        el.value().attr("id"),
        el.value().attr("itemprop"),
    ]
    .iter()
    .flatten()
    .copied()
    .collect::<Vec<_>>()
    .join(" ")
}

/// Collapsed text of an element, rejected when it looks like a container
/// (more than two child elements) or exceeds `max` characters.
fn short_text(el: ElementRef, max: usize) -> Option<String> {
    let child_elements = el.children().filter(|c| c.value().is_element()).count();
    if child_elements > 2 {
        return None;
    }
    let text = squash_ws(&el.text().collect::<Vec<_>>().join(" "));
    if text.is_empty() || text.chars().count() > max {
        None
    } else {
        Some(text)
    }
}

fn is_leaf(el: ElementRef) -> bool {
    el.children().all(|c| !c.value().is_element())
}

fn parent_snippet(el: ElementRef) -> Option<String> {
    let parent = el.parent().and_then(ElementRef::wrap)?;
    let text = squash_ws(&parent.text().collect::<Vec<_>>().join(" "));
    if text.is_empty() {
        return None;
    }
    Some(truncate_chars(&text, MAX_SNIPPET_LEN))
}

fn squash_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn truncate_chars(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        s.chars().take(max).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan_html(html: &str) -> Vec<Spotted> {
        scan(&Html::parse_document(html))
    }

    #[test]
    fn heading_is_a_title_candidate() {
        let spotted = scan_html("<html><body><h2>Harbor Jazz Night</h2></body></html>");
        assert!(spotted
            .iter()
            .any(|s| matches!(&s.field, Field::Title { text, .. } if text == "Harbor Jazz Night")));
    }

    #[test]
    fn classed_element_is_a_title_candidate() {
        let spotted =
            scan_html(r#"<html><body><div class="event-title">Soup Swap</div></body></html>"#);
        assert!(spotted
            .iter()
            .any(|s| matches!(&s.field, Field::Title { text, .. } if text == "Soup Swap")));
    }

    #[test]
    fn time_datetime_attribute_wins_over_text() {
        let spotted = scan_html(
            r#"<html><body><time datetime="2026-09-18T19:30:00">Friday night</time></body></html>"#,
        );
        let dates: Vec<_> = spotted
            .iter()
            .filter_map(|s| match &s.field {
                Field::Date { text, from_markup } => Some((text.as_str(), *from_markup)),
                _ => None,
            })
            .collect();
        assert_eq!(dates, vec![("2026-09-18T19:30:00", true)]);
    }

    #[test]
    fn date_class_beats_title_pattern() {
        // "event-date" contains both "event" and "date"; it must classify as a date.
        let spotted =
            scan_html(r#"<html><body><span class="event-date">Sep 18</span></body></html>"#);
        assert!(spotted
            .iter()
            .any(|s| matches!(&s.field, Field::Date { text, .. } if text == "Sep 18")));
        assert!(!spotted
            .iter()
            .any(|s| matches!(&s.field, Field::Title { .. })));
    }

    #[test]
    fn venue_attribute_is_a_location_candidate() {
        let spotted = scan_html(
            r#"<html><body><p data-venue-name="x">The Harborview Room</p></body></html>"#,
        );
        assert!(spotted.iter().any(
            |s| matches!(&s.field, Field::Location { text } if text == "The Harborview Room")
        ));
    }

    #[test]
    fn lexical_date_in_plain_text() {
        let spotted =
            scan_html("<html><body><p>Next show: September 18, 2026 at the pier</p></body></html>");
        assert!(spotted.iter().any(
            |s| matches!(&s.field, Field::Date { text, from_markup } if text == "September 18, 2026" && !*from_markup)
        ));
    }

    #[test]
    fn containers_are_skipped() {
        let html = r#"<html><body><div class="event">
            <h3>One</h3><p>two</p><p>three</p><p>four</p>
        </div></body></html>"#;
        let spotted = scan_html(html);
        // The wrapping div has four child elements; only the heading anchors.
        let titles: Vec<_> = spotted
            .iter()
            .filter(|s| matches!(&s.field, Field::Title { .. }))
            .collect();
        assert_eq!(titles.len(), 1);
    }

    #[test]
    fn script_and_style_contribute_nothing() {
        let html = r#"<html><body>
            <script>var when = "July 4, 2026";</script>
            <style>.date { color: red }</style>
        </body></html>"#;
        assert!(scan_html(html).is_empty());
    }

    #[test]
    fn plain_page_yields_no_candidates() {
        let html = "<html><body><p>We bake fresh bread every morning.</p></body></html>";
        assert!(scan_html(html).is_empty());
    }
}
