//! Normalizers for the individual cells of a schedule table row.

use crate::types::{pair_time, PairInfo, Room, Teacher, WeekType};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use url::Url;

static PAIR_LABEL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+)\s*пара").unwrap());
static TIME_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b(\d{1,2}:\d{2})\b").unwrap());
static WHITESPACE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

static LINK_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a[href]").unwrap());
static PARAGRAPH_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("p").unwrap());
static TEACHER_TITLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("span.prepod-title").unwrap());
static EVENT_TYPE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("span.event-type").unwrap());
static SUBGROUP_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("span.event-subgroup").unwrap());
static DATE_RANGE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("strong").unwrap());
static MOBILE_BLOCK_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div.visible-xs").unwrap());

/// What the discipline cell says about a lesson.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Discipline {
    pub subject: Option<String>,
    pub lesson_type: Option<String>,
    pub lesson_type_full: Option<String>,
    pub date_range: Option<String>,
    pub subgroups: Vec<String>,
}

/// Parses the text of a pair/time cell, e.g. "3 пара 11:50".
///
/// A pair number from the fixed timetable overrides any time found in the
/// text.
pub fn parse_pair(text: &str) -> PairInfo {
    let text = WHITESPACE_REGEX.replace_all(text.trim(), " ").into_owned();
    let number = PAIR_LABEL_REGEX
        .captures(&text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string());
    let scraped_start = TIME_REGEX
        .captures(&text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string());

    let mut pair = PairInfo {
        label: non_empty(text),
        number,
        start: scraped_start,
        end: None,
        time_range: None,
    };

    if let Some((start, end)) = pair.number.as_deref().and_then(pair_time) {
        pair.start = Some(start.to_string());
        pair.end = Some(end.to_string());
        pair.time_range = Some(format!("{start} - {end}"));
    } else {
        pair.time_range = pair.start.clone();
    }

    pair
}

/// Normalizes a week-type marker ("ч.", "Знам", ...).
pub fn normalize_week_type(raw: &str) -> Option<WeekType> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    let key: String = raw
        .chars()
        .filter(|c| *c != '.' && !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect();
    Some(match key.as_str() {
        "ч" | "чс" | "числ" => WeekType::Numerator,
        "з" | "зн" | "знам" => WeekType::Denominator,
        _ => WeekType::Other(raw.to_string()),
    })
}

/// One room per link; a cell without links is a single unlinked room.
pub fn parse_rooms(cell: ElementRef, base: &Url) -> Vec<Room> {
    let mut rooms: Vec<Room> = cell
        .select(&LINK_SELECTOR)
        .filter_map(|link| {
            let name = stripped_text(link, "");
            if name.is_empty() {
                return None;
            }
            Some(Room {
                name,
                url: link.value().attr("href").map(|href| resolve(base, href)),
            })
        })
        .collect();

    if rooms.is_empty() {
        let text = stripped_text(cell, " ");
        if !text.is_empty() {
            rooms.push(Room {
                name: text,
                url: None,
            });
        }
    }

    rooms
}

/// One teacher per paragraph, or one for the whole cell if it has none.
pub fn parse_teachers(cell: ElementRef, base: &Url) -> Vec<Teacher> {
    let mut paragraphs: Vec<ElementRef> = cell.select(&PARAGRAPH_SELECTOR).collect();
    if paragraphs.is_empty() {
        paragraphs.push(cell);
    }

    paragraphs
        .into_iter()
        .filter(|paragraph| !stripped_text(*paragraph, "").is_empty())
        .map(|paragraph| {
            let mut fragment = Html::parse_fragment(&paragraph.inner_html());
            let title = take(&mut fragment, &TEACHER_TITLE_SELECTOR, Some(1))
                .into_iter()
                .next()
                .map(|removed| removed.text);

            let link = fragment.select(&LINK_SELECTOR).next();
            let (name, url) = match link {
                Some(link) => (
                    stripped_text(link, ""),
                    link.value().attr("href").map(|href| resolve(base, href)),
                ),
                None => (stripped_text(fragment.root_element(), ""), None),
            };

            Teacher {
                name,
                title: title.and_then(non_empty),
                url,
            }
        })
        .collect()
}

/// Splits a discipline cell into subject, lesson type, subgroups and dates.
///
/// Works on a private copy of the cell, from which the recognized parts are
/// removed until only the subject text is left.
pub fn parse_discipline(cell: ElementRef) -> Discipline {
    let mut fragment = Html::parse_fragment(&cell.inner_html());

    let event_type = take(&mut fragment, &EVENT_TYPE_SELECTOR, Some(1))
        .into_iter()
        .next();
    let subgroups = take(&mut fragment, &SUBGROUP_SELECTOR, None)
        .into_iter()
        .map(|removed| removed.text)
        .filter(|text| !text.is_empty())
        .collect();
    let date_range = take(&mut fragment, &DATE_RANGE_SELECTOR, Some(1))
        .into_iter()
        .next()
        .and_then(|removed| non_empty(removed.text));
    take(&mut fragment, &MOBILE_BLOCK_SELECTOR, Some(1));

    let (lesson_type, lesson_type_full) = match event_type {
        Some(removed) => (non_empty(removed.text), removed.title.and_then(non_empty)),
        None => (None, None),
    };

    Discipline {
        subject: non_empty(stripped_text(fragment.root_element(), " ")),
        lesson_type,
        lesson_type_full,
        date_range,
        subgroups,
    }
}

/// An element cut out of a fragment.
struct Removed {
    text: String,
    title: Option<String>,
}

/// Detaches up to `limit` elements matching `selector` from the fragment.
fn take(fragment: &mut Html, selector: &Selector, limit: Option<usize>) -> Vec<Removed> {
    let matched: Vec<_> = fragment
        .select(selector)
        .take(limit.unwrap_or(usize::MAX))
        .map(|el| {
            let removed = Removed {
                text: stripped_text(el, ""),
                title: el.value().attr("title").map(str::to_string),
            };
            (el.id(), removed)
        })
        .collect();

    matched
        .into_iter()
        .map(|(id, removed)| {
            if let Some(mut node) = fragment.tree.get_mut(id) {
                node.detach();
            }
            removed
        })
        .collect()
}

/// Text nodes of `el`, trimmed, empty ones dropped, joined by `separator`.
pub(crate) fn stripped_text(el: ElementRef, separator: &str) -> String {
    el.text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(separator)
}

fn resolve(base: &Url, href: &str) -> String {
    base.join(href.trim())
        .map(|url| url.to_string())
        .unwrap_or_else(|_| href.to_string())
}

fn non_empty(text: String) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}
