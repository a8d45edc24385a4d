/// Schedule table parsing for the togudv.ru group pages
mod cells;

pub use cells::{normalize_week_type, parse_discipline, parse_pair, parse_rooms, parse_teachers, Discipline};

use crate::types::{Day, Group, Lesson, PairInfo, WeekType};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::collections::BTreeMap;
use std::sync::LazyLock;
use tracing::debug;
use url::Url;

use cells::stripped_text;

// Static selectors for parsing - compiled once
static CONTAINER_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("#all_weeks").unwrap());
static DAY_HEADING_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h3.rasp-weekday-title").unwrap());
static ROW_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tr").unwrap());
static TIME_CELL_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td.time-hour").unwrap());
static WEEK_CELL_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td.time-weektype").unwrap());
static DISCIPLINE_CELL_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td.time-discipline").unwrap());
static ROOM_CELL_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td.time-room").unwrap());
static TEACHER_CELL_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td.time-prepod").unwrap());
static GROUP_LINK_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").unwrap());
static GROUP_HREF_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+/$").unwrap());

/// Extracts the label → id mapping from the group listing page.
///
/// Group links look like `<a href="1234/">ПИ(б)-21</a>`.
pub fn parse_group_listing(html: &str) -> BTreeMap<String, String> {
    let document = Html::parse_document(html);
    let mut groups = BTreeMap::new();

    for link in document.select(&GROUP_LINK_SELECTOR) {
        let Some(href) = link.value().attr("href").map(str::trim) else {
            continue;
        };
        if !GROUP_HREF_REGEX.is_match(href) {
            continue;
        }
        let label = stripped_text(link, "");
        if !label.is_empty() {
            groups.insert(label, href.trim_end_matches('/').to_string());
        }
    }

    groups
}

/// Turns a label → id mapping into listed groups, sorted by label.
pub fn listing_to_groups(listing: &BTreeMap<String, String>) -> Vec<Group> {
    listing
        .iter()
        .map(|(label, id)| Group {
            display_name: label.clone(),
            internal_id: id.clone(),
            direction: None,
        })
        .collect()
}

/// Values shared by consecutive rows of a day table.
///
/// The source merges the pair and week-type cells across rows, so a row
/// without them inherits the last ones seen.
#[derive(Debug, Default)]
struct CarriedCells {
    pair: Option<PairInfo>,
    week_type: Option<WeekType>,
}

impl CarriedCells {
    fn absorb(&mut self, row: ElementRef) {
        if let Some(cell) = row.select(&TIME_CELL_SELECTOR).next() {
            self.pair = Some(parse_pair(&stripped_text(cell, " ")));
        }
        // A present but empty week-type cell clears the carried value.
        if let Some(cell) = row.select(&WEEK_CELL_SELECTOR).next() {
            self.week_type = normalize_week_type(&stripped_text(cell, " "));
        }
    }
}

/// Parses a group schedule page into days.
///
/// `base` resolves relative room and teacher links. A page without the
/// `#all_weeks` container has no days.
pub fn parse_schedule_page(html: &str, base: &Url) -> Vec<Day> {
    let document = Html::parse_document(html);
    let Some(container) = document.select(&CONTAINER_SELECTOR).next() else {
        debug!("Schedule container not found");
        return Vec::new();
    };

    container
        .select(&DAY_HEADING_SELECTOR)
        .map(|heading| {
            let name = stripped_text(heading, "");
            let lessons = next_table(heading)
                .map(|table| parse_day_table(table, base))
                .unwrap_or_default();
            debug!(day = %name, lessons = lessons.len(), "Parsed day");
            Day { name, lessons }
        })
        .collect()
}

/// The first `<table>` following `heading` on the same level.
fn next_table(heading: ElementRef) -> Option<ElementRef> {
    heading
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "table")
}

fn parse_day_table(table: ElementRef, base: &Url) -> Vec<Lesson> {
    let mut carried = CarriedCells::default();
    let mut lessons = Vec::new();

    for row in table.select(&ROW_SELECTOR) {
        carried.absorb(row);

        let discipline_cell = row.select(&DISCIPLINE_CELL_SELECTOR).next();
        let room_cell = row.select(&ROOM_CELL_SELECTOR).next();
        let teacher_cell = row.select(&TEACHER_CELL_SELECTOR).next();

        let discipline = discipline_cell.map(parse_discipline).unwrap_or_default();
        // Structural rows (headers, spacers) carry none of the lesson cells.
        if discipline.subject.is_none() && room_cell.is_none() && teacher_cell.is_none() {
            continue;
        }

        lessons.push(Lesson {
            pair: carried.pair.clone().unwrap_or_default(),
            week_type: carried.week_type.clone(),
            subject: discipline.subject,
            lesson_type: discipline.lesson_type,
            lesson_type_full: discipline.lesson_type_full,
            date_range: discipline.date_range,
            subgroups: discipline.subgroups,
            rooms: room_cell.map(|cell| parse_rooms(cell, base)).unwrap_or_default(),
            teachers: teacher_cell
                .map(|cell| parse_teachers(cell, base))
                .unwrap_or_default(),
        });
    }

    lessons
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
<html><body>
<div id="all_weeks">
  <h3 class="rasp-weekday-title">Понедельник</h3>
  <p>пояснение</p>
  <table>
    <tr><th>Время</th><th>Неделя</th><th>Дисциплина</th><th>Ауд.</th><th>Преподаватель</th></tr>
    <tr>
      <td class="time-hour" rowspan="2">1 пара<br>08:30</td>
      <td class="time-weektype">ч.</td>
      <td class="time-discipline"><span class="event-type" title="Лекция">Лек</span>Матанализ</td>
      <td class="time-room"><a href="/rasp/rooms/1/">1-105</a></td>
      <td class="time-prepod"><p><a href="/rasp/prepods/7/">Иванов И. И.</a></p></td>
    </tr>
    <tr>
      <td class="time-weektype">знам.</td>
      <td class="time-discipline">Физика</td>
      <td class="time-room">2-201</td>
      <td class="time-prepod">Петров П. П.</td>
    </tr>
    <tr>
      <td class="time-discipline">Химия</td>
    </tr>
    <tr>
      <td class="time-hour">2 пара</td>
      <td class="time-weektype"></td>
      <td class="time-room">3-301</td>
    </tr>
    <tr><td class="time-discipline">  </td></tr>
  </table>
  <h3 class="rasp-weekday-title">Вторник</h3>
  <table></table>
  <h3 class="rasp-weekday-title">Среда</h3>
</div>
</body></html>"#;

    fn base() -> Url {
        Url::parse("https://togudv.ru/rasp/groups/").unwrap()
    }

    #[test]
    fn test_days_in_page_order() {
        let days = parse_schedule_page(PAGE, &base());
        let names: Vec<&str> = days.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Понедельник", "Вторник", "Среда"]);
        assert!(days[1].lessons.is_empty());
        assert!(days[2].lessons.is_empty());
    }

    #[test]
    fn test_structural_rows_are_dropped() {
        let days = parse_schedule_page(PAGE, &base());
        let subjects: Vec<Option<&str>> = days[0]
            .lessons
            .iter()
            .map(|l| l.subject.as_deref())
            .collect();
        assert_eq!(
            subjects,
            vec![Some("Матанализ"), Some("Физика"), Some("Химия"), None]
        );
    }

    #[test]
    fn test_pair_and_week_type_carry_forward() {
        let days = parse_schedule_page(PAGE, &base());
        let lessons = &days[0].lessons;

        assert_eq!(lessons[0].pair.number.as_deref(), Some("1"));
        assert_eq!(lessons[0].pair.time_range.as_deref(), Some("08:30 - 10:00"));
        assert_eq!(lessons[0].week_type, Some(WeekType::Numerator));

        assert_eq!(lessons[1].pair, lessons[0].pair);
        assert_eq!(lessons[1].week_type, Some(WeekType::Denominator));

        assert_eq!(lessons[2].pair, lessons[0].pair);
        assert_eq!(lessons[2].week_type, Some(WeekType::Denominator));

        // Room-only row: new pair, week type cleared by the empty cell.
        assert_eq!(lessons[3].pair.number.as_deref(), Some("2"));
        assert_eq!(lessons[3].week_type, None);
        assert_eq!(lessons[3].rooms[0].name, "3-301");
        assert!(lessons[3].teachers.is_empty());
    }

    #[test]
    fn test_lesson_cells_are_normalized() {
        let days = parse_schedule_page(PAGE, &base());
        let first = &days[0].lessons[0];
        assert_eq!(first.lesson_type.as_deref(), Some("Лек"));
        assert_eq!(first.lesson_type_full.as_deref(), Some("Лекция"));
        assert_eq!(
            first.rooms[0].url.as_deref(),
            Some("https://togudv.ru/rasp/rooms/1/")
        );
        assert_eq!(first.teachers[0].name, "Иванов И. И.");

        let second = &days[0].lessons[1];
        assert_eq!(second.rooms[0].url, None);
        assert_eq!(second.teachers[0].name, "Петров П. П.");
    }

    #[test]
    fn test_rows_before_any_pair_get_empty_pair() {
        let page = r#"<div id="all_weeks"><h3 class="rasp-weekday-title">Пятница</h3>
            <table><tr><td class="time-discipline">Семинар</td></tr></table></div>"#;
        let days = parse_schedule_page(page, &base());
        assert_eq!(days[0].lessons[0].pair, PairInfo::default());
        assert_eq!(days[0].lessons[0].week_type, None);
    }

    #[test]
    fn test_page_without_container() {
        assert!(parse_schedule_page("<html><body>Нет данных</body></html>", &base()).is_empty());
    }

    #[test]
    fn test_group_listing_keeps_numeric_links() {
        let html = r#"
            <a href="1234/">ПИ(б)-21</a>
            <a href=" 77/ "> ИВТ-21б </a>
            <a href="/news/">Новости</a>
            <a href="99/"></a>
            <a href="12a/">Ошибка</a>"#;
        let listing = parse_group_listing(html);
        assert_eq!(listing.len(), 2);
        assert_eq!(listing["ПИ(б)-21"], "1234");
        assert_eq!(listing["ИВТ-21б"], "77");

        let groups = listing_to_groups(&listing);
        assert_eq!(groups[0].display_name, "ИВТ-21б");
        assert_eq!(groups[1].internal_id, "1234");
    }
}
