//! Human-readable rendering of schedules.

use crate::types::{Lesson, Schedule, ScheduleData};
use serde_json::Value;
use std::fmt::Write;

/// Class name the embedded source uses for empty note slots.
const NOTE_PLACEHOLDER: &str = "Место для заметок";

pub fn render_schedule(data: &ScheduleData) -> String {
    match data {
        ScheduleData::Table(schedule) => render_table(schedule),
        ScheduleData::Embedded(value) => render_embedded(value),
    }
}

fn rule() -> String {
    "─".repeat(30)
}

fn render_table(schedule: &Schedule) -> String {
    let mut out = format!("📅 Расписание: {}\n\n", schedule.group);
    let _ = writeln!(out, "🔗 Источник: {}\n", schedule.source);

    for day in schedule.days.iter().filter(|d| !d.lessons.is_empty()) {
        let _ = writeln!(out, "\n📆 {}", day.name);
        let _ = writeln!(out, "{}", rule());
        for lesson in &day.lessons {
            render_lesson(&mut out, lesson);
        }
    }

    out
}

fn render_lesson(out: &mut String, lesson: &Lesson) {
    let Some(subject) = &lesson.subject else {
        return;
    };

    if let Some(time) = lesson.pair.time_range.as_ref().or(lesson.pair.start.as_ref()) {
        let _ = writeln!(out, "⏰ {time}");
    }
    let _ = writeln!(out, "📚 {subject}");
    if let Some(kind) = &lesson.lesson_type {
        let _ = writeln!(out, "   Тип: {kind}");
    }
    if !lesson.teachers.is_empty() {
        let names: Vec<&str> = lesson.teachers.iter().map(|t| t.name.as_str()).collect();
        let _ = writeln!(out, "👤 {}", names.join(", "));
    }
    if !lesson.rooms.is_empty() {
        let names: Vec<&str> = lesson.rooms.iter().map(|r| r.name.as_str()).collect();
        let _ = writeln!(out, "🏢 {}", names.join(", "));
    }
    if let Some(week) = &lesson.week_type {
        let _ = writeln!(out, "📌 Неделя: {week}");
    }
    out.push('\n');
}

/// Renders the raw `scheduleData` array: days of time slots with classes.
fn render_embedded(value: &Value) -> String {
    let mut out = String::from("📅 Расписание\n\n");
    let Some(days) = value.as_array() else {
        return out;
    };

    for slots in days.iter().filter_map(Value::as_array) {
        let Some(first) = slots.first() else {
            continue;
        };
        if let Some(date) = first.get("date").and_then(Value::as_str) {
            let _ = write!(out, "\n📆 {date}");
            if let Some(week) = first.get("week").and_then(Value::as_str) {
                let _ = write!(out, " ({week})");
            }
            let _ = writeln!(out, "\n{}", rule());
        }

        for slot in slots {
            let classes = match slot.get("classes").and_then(Value::as_array) {
                Some(classes) if !classes.is_empty() => classes,
                _ => continue,
            };
            if let Some(time) = slot.get("time").and_then(Value::as_str) {
                let _ = writeln!(out, "⏰ {time}");
            }
            for class in classes {
                let field = |key: &str| class.get(key).and_then(Value::as_str).filter(|s| !s.is_empty());
                if let Some(name) = field("name").filter(|name| *name != NOTE_PLACEHOLDER) {
                    let _ = writeln!(out, "📚 {name}");
                }
                if let Some(teacher) = field("teacher") {
                    let _ = writeln!(out, "👤 {teacher}");
                }
                if let Some(place) = field("place") {
                    let _ = writeln!(out, "🏢 {place}");
                }
            }
            out.push('\n');
        }
    }

    out
}
