//! Extraction of JSON literals assigned to script variables, e.g.
//! `let scheduleData = [[...], ...];` inside a page's inline `<script>`.

use crate::error::{Result, ScheduleError};
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;
use tracing::debug;

static GROUPS_ASSIGNMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"let\s+groups\s*=\s*").unwrap());
static SCHEDULE_ASSIGNMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"let\s+scheduleData\s*=\s*").unwrap());
static INFO_ASSIGNMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"let\s+info\s*=\s*").unwrap());

/// Script variables known to carry data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptVariable {
    /// `let groups = [...]`
    Groups,
    /// `let scheduleData = [...]`
    Schedule,
    /// `let info = {...}`
    Info,
}

impl ScriptVariable {
    pub fn name(self) -> &'static str {
        match self {
            ScriptVariable::Groups => "groups",
            ScriptVariable::Schedule => "scheduleData",
            ScriptVariable::Info => "info",
        }
    }

    fn opener(self) -> char {
        match self {
            ScriptVariable::Groups | ScriptVariable::Schedule => '[',
            ScriptVariable::Info => '{',
        }
    }

    fn assignment(self) -> &'static Regex {
        match self {
            ScriptVariable::Groups => &GROUPS_ASSIGNMENT,
            ScriptVariable::Schedule => &SCHEDULE_ASSIGNMENT,
            ScriptVariable::Info => &INFO_ASSIGNMENT,
        }
    }
}

/// Extracts the literal assigned to `variable` and parses it as JSON.
///
/// Returns `Ok(None)` when the page has no such assignment or its literal
/// never closes, and [`ScheduleError::MalformedData`] when a complete literal
/// is not valid JSON.
pub fn extract(page: &str, variable: ScriptVariable) -> Result<Option<Value>> {
    let Some(literal) = find_literal(page, variable) else {
        debug!(variable = variable.name(), "No complete script assignment found");
        return Ok(None);
    };

    serde_json::from_str(literal)
        .map(Some)
        .map_err(|e| ScheduleError::MalformedData {
            variable: variable.name().to_string(),
            message: e.to_string(),
        })
}

/// Like [`extract`], but an undecodable literal is treated as absent.
///
/// Used for the advisory `info` object.
pub fn extract_lenient(page: &str, variable: ScriptVariable) -> Option<Value> {
    match extract(page, variable) {
        Ok(value) => value,
        Err(e) => {
            debug!(variable = variable.name(), error = %e, "Ignoring undecodable script data");
            None
        }
    }
}

/// Finds the literal of the first assignment of `variable` whose value
/// starts with the expected bracket. `None` if that literal never closes.
fn find_literal(page: &str, variable: ScriptVariable) -> Option<&str> {
    let opener = variable.opener();
    let rest = variable
        .assignment()
        .find_iter(page)
        .map(|m| &page[m.end()..])
        .find(|rest| rest.starts_with(opener))?;
    literal_len(rest).map(|len| &rest[..len])
}

/// Length in bytes of the bracketed literal at the start of `text`.
///
/// Brackets inside string literals are ignored.
fn literal_len(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;

    for (idx, ch) in text.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == q {
                quote = None;
            }
            continue;
        }

        match ch {
            '"' | '\'' => quote = Some(ch),
            '[' | '{' => depth += 1,
            ']' | '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(idx + ch.len_utf8());
                }
            }
            _ => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extracts_groups_array() {
        let page = r#"<script>let groups = [{"number":"А-101"}];</script>"#;
        let groups = extract(page, ScriptVariable::Groups).unwrap();
        assert_eq!(groups, Some(json!([{"number": "А-101"}])));
    }

    #[test]
    fn test_invalid_literal_is_malformed() {
        let page = "<script>let groups = [invalid json];</script>";
        let err = extract(page, ScriptVariable::Groups).unwrap_err();
        assert!(matches!(err, ScheduleError::MalformedData { .. }));
    }

    #[test]
    fn test_missing_assignment_is_none() {
        let page = "<script>let other = [1, 2];</script>";
        assert_eq!(extract(page, ScriptVariable::Groups).unwrap(), None);
    }

    #[test]
    fn test_nested_literal_spanning_lines() {
        let page = "let scheduleData = [\n  [{\"time\": \"08:30\", \"classes\": [{\"name\": \"a]b;\"}]}],\n  []\n];\nlet info = {};";
        let schedule = extract(page, ScriptVariable::Schedule).unwrap().unwrap();
        assert_eq!(schedule[0][0]["classes"][0]["name"], "a]b;");
        assert_eq!(schedule.as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_first_bracketed_assignment_wins() {
        let page = "let groups = null; let groups = [1]; let groups = [2];";
        assert_eq!(extract(page, ScriptVariable::Groups).unwrap(), Some(json!([1])));
    }

    #[test]
    fn test_truncated_literal_is_absent() {
        let page = "let scheduleData = [[1, 2]";
        assert_eq!(extract(page, ScriptVariable::Schedule).unwrap(), None);
    }

    #[test]
    fn test_info_degrades_to_none() {
        let page = "let info = {url: 'https://example.org'};";
        assert_eq!(extract_lenient(page, ScriptVariable::Info), None);

        let page = r#"let info = {"url": "https://example.org"};"#;
        let info = extract_lenient(page, ScriptVariable::Info).unwrap();
        assert_eq!(info["url"], "https://example.org");
    }
}
