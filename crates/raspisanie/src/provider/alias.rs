//! University names users type, mapped to source ids.

/// Lower-cased alias and the source id it stands for.
const UNIVERSITY_ALIASES: &[(&str, &str)] = &[
    ("тогу", "togu"),
    ("togu", "togu"),
    ("тогу дв", "togu"),
    ("тогу-дв", "togu"),
    ("дальневосточный государственный университет", "togu"),
    ("дальневосточный госуниверситет", "togu"),
    ("мгу", "msu"),
    ("msu", "msu"),
    ("московский государственный университет", "msu"),
    ("мгу им. ломоносова", "msu"),
    ("псковгу", "pskovgu"),
    ("pskovgu", "pskovgu"),
    ("псковский государственный университет", "pskovgu"),
    ("петргу", "petrsu"),
    ("petrsu", "petrsu"),
    ("петрозаводский государственный университет", "petrsu"),
    ("мгимо", "mgimo"),
    ("mgimo", "mgimo"),
    ("московский государственный институт международных отношений", "mgimo"),
    ("мгту", "bmstu"),
    ("bmstu", "bmstu"),
    ("бауманка", "bmstu"),
    ("мгту им. баумана", "bmstu"),
    ("спбгу", "spbu"),
    ("spbu", "spbu"),
    ("санкт-петербургский государственный университет", "spbu"),
    ("лгу", "spbu"),
    ("мифи", "mephi"),
    ("mephi", "mephi"),
    ("национальный исследовательский ядерный университет", "mephi"),
    ("мфти", "mipt"),
    ("mipt", "mipt"),
    ("московский физико-технический институт", "mipt"),
    ("физтех", "mipt"),
    ("вшэ", "hse"),
    ("hse", "hse"),
    ("высшая школа экономики", "hse"),
    ("мгюа", "msulaw"),
    ("msulaw", "msulaw"),
    ("московский государственный юридический университет", "msulaw"),
    ("тпу", "tpu"),
    ("tpu", "tpu"),
    ("томский политехнический университет", "tpu"),
    ("нгу", "nsu"),
    ("nsu", "nsu"),
    ("новосибирский государственный университет", "nsu"),
    ("урфу", "urfu"),
    ("urfu", "urfu"),
    ("уральский федеральный университет", "urfu"),
    ("кфу", "kfu"),
    ("kfu", "kfu"),
    ("казанский федеральный университет", "kfu"),
    ("сфу", "sibfu"),
    ("sibfu", "sibfu"),
    ("сибирский федеральный университет", "sibfu"),
];

/// Maps what the user typed to a source id.
///
/// Tries an exact alias, then an alias contained in the input (or containing
/// it), then accepts the input as-is if it already looks like an id. Returns
/// `None` for anything else.
pub fn source_slug(name: &str) -> Option<String> {
    let normalized = name.trim().to_lowercase();
    if normalized.is_empty() {
        return None;
    }

    if let Some((_, slug)) = UNIVERSITY_ALIASES
        .iter()
        .find(|(alias, _)| *alias == normalized)
    {
        return Some(slug.to_string());
    }

    if let Some((_, slug)) = UNIVERSITY_ALIASES
        .iter()
        .find(|(alias, _)| normalized.contains(alias) || alias.contains(normalized.as_str()))
    {
        return Some(slug.to_string());
    }

    let looks_like_slug = normalized
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
    looks_like_slug.then_some(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_alias() {
        assert_eq!(source_slug("ТОГУ").as_deref(), Some("togu"));
        assert_eq!(source_slug("  ПсковГУ ").as_deref(), Some("pskovgu"));
        assert_eq!(source_slug("Физтех").as_deref(), Some("mipt"));
    }

    #[test]
    fn test_alias_within_longer_name() {
        assert_eq!(
            source_slug("Томский политехнический университет (ТПУ)").as_deref(),
            Some("tpu")
        );
        assert_eq!(source_slug("бауман").as_deref(), Some("bmstu"));
    }

    #[test]
    fn test_plain_ids_pass_through() {
        assert_eq!(source_slug("PSKOVGU").as_deref(), Some("pskovgu"));
        assert_eq!(source_slug("vvsu").as_deref(), Some("vvsu"));
    }

    #[test]
    fn test_unknown_name_has_no_slug() {
        assert_eq!(source_slug("Неизвестный институт"), None);
        assert_eq!(source_slug("   "), None);
    }
}
