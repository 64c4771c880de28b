use std::{borrow::Cow, ops::Deref};

use chrono::NaiveDate;
use serde::{de, ser::SerializeMap, Deserialize, Deserializer, Serialize, Serializer};
use validator::ValidationError;

const MAX_TAGS: usize = 20;
const MAX_TAG_LENGTH: usize = 50;

/// Splits comma-separated form input into trimmed, non-empty tags, keeping order.
pub fn split_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// Renders stored tags back into the text a form field shows.
pub fn join_tags(tags: &[String]) -> String {
    tags.join(", ")
}

/// A stored tag column. Flattened into a row it serialises as `tags` plus
/// `tags_text`, the comma-separated text the edit form is filled with.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagList(pub Vec<String>);

impl From<Vec<String>> for TagList {
    fn from(tags: Vec<String>) -> Self {
        TagList(tags)
    }
}

impl Deref for TagList {
    type Target = [String];

    fn deref(&self) -> &[String] {
        &self.0
    }
}

impl Serialize for TagList {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("tags", &self.0)?;
        map.serialize_entry("tags_text", &join_tags(&self.0))?;
        map.end()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TagsInput {
    Text(String),
    List(Vec<String>),
}

/// Accepts `"a, b"`, `["a", "b"]` or `null`.
pub fn deserialize_tags<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let tags = match Option::<TagsInput>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(TagsInput::Text(raw)) => split_tags(&raw),
        Some(TagsInput::List(items)) => items
            .iter()
            .flat_map(|item| split_tags(item))
            .collect(),
    };
    Ok(tags)
}

/// Trims text input; blank strings become `None`.
pub fn deserialize_optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.and_then(|v| {
        let trimmed = v.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    }))
}

pub fn deserialize_trimmed<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.map(|v| v.trim().to_string()).unwrap_or_default())
}

/// Accepts `YYYY-MM-DD` or a month picker's `YYYY-MM`; blank means no date.
pub fn deserialize_optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = deserialize_optional_text(deserializer)? else {
        return Ok(None);
    };
    NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(&format!("{raw}-01"), "%Y-%m-%d"))
        .map(Some)
        .map_err(|_| de::Error::custom(format!("invalid date: {raw}")))
}

/// An ongoing entry has no end date; otherwise the end must not precede the start.
pub fn check_date_range(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    current: bool,
) -> Result<(), ValidationError> {
    if current {
        return Ok(());
    }
    match (start, end) {
        (Some(start), Some(end)) if end < start => {
            let mut err = new_validation_error("date_range", "End date cannot be before start date");
            err.add_param(Cow::Borrowed("field"), &"end_date");
            Err(err)
        }
        _ => Ok(()),
    }
}

pub fn effective_end_date(end: Option<NaiveDate>, current: bool) -> Option<NaiveDate> {
    if current { None } else { end }
}

pub fn validate_tags(tags: &[String]) -> Result<(), ValidationError> {
    if tags.len() > MAX_TAGS {
        return Err(new_validation_error("too_many_tags", "Too many tags provided"));
    }
    if tags.iter().any(|tag| tag.chars().count() > MAX_TAG_LENGTH) {
        return Err(new_validation_error("tag_too_long", "Each tag must be at most 50 characters"));
    }
    Ok(())
}

pub fn new_validation_error(code: &'static str, msg: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(msg));
    err
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Form {
        #[serde(default, deserialize_with = "deserialize_tags")]
        tags: Vec<String>,
        #[serde(default, deserialize_with = "deserialize_optional_text")]
        note: Option<String>,
    }

    #[test]
    fn comma_separated_tags_round_trip() {
        let tags = split_tags("A, B, C");
        assert_eq!(tags, vec!["A", "B", "C"]);
        assert_eq!(join_tags(&tags), "A, B, C");
    }

    #[test]
    fn tag_lists_serialise_with_their_form_text() {
        #[derive(Serialize)]
        struct Row {
            title: &'static str,
            #[serde(flatten)]
            tags: TagList,
        }

        let row = Row { title: "Folio", tags: TagList::from(split_tags("Rust, actix, sqlx")) };
        let value = serde_json::to_value(&row).unwrap();

        assert_eq!(value["tags"], serde_json::json!(["Rust", "actix", "sqlx"]));
        assert_eq!(value["tags_text"], "Rust, actix, sqlx");
        assert_eq!(value["title"], "Folio");
    }

    #[test]
    fn split_drops_blanks_and_keeps_order() {
        assert_eq!(split_tags(" rust ,, web ,  "), vec!["rust", "web"]);
        assert!(split_tags("").is_empty());
    }

    #[test]
    fn tags_accept_text_list_or_null() {
        let text: Form = serde_json::from_str(r#"{"tags": "x, y"}"#).unwrap();
        let list: Form = serde_json::from_str(r#"{"tags": [" x ", "y"]}"#).unwrap();
        let null: Form = serde_json::from_str(r#"{"tags": null}"#).unwrap();
        let missing: Form = serde_json::from_str("{}").unwrap();

        assert_eq!(text.tags, vec!["x", "y"]);
        assert_eq!(list.tags, vec!["x", "y"]);
        assert!(null.tags.is_empty());
        assert!(missing.tags.is_empty());
    }

    #[test]
    fn blank_text_becomes_none() {
        let form: Form = serde_json::from_str(r#"{"note": "   "}"#).unwrap();
        assert_eq!(form.note, None);

        let form: Form = serde_json::from_str(r#"{"note": " hi "}"#).unwrap();
        assert_eq!(form.note.as_deref(), Some("hi"));
    }

    #[test]
    fn dates_accept_day_or_month_precision() {
        #[derive(Deserialize)]
        struct Dates {
            #[serde(default, deserialize_with = "deserialize_optional_date")]
            at: Option<NaiveDate>,
        }

        let day: Dates = serde_json::from_str(r#"{"at": "2024-03-15"}"#).unwrap();
        let month: Dates = serde_json::from_str(r#"{"at": "2024-03"}"#).unwrap();
        let blank: Dates = serde_json::from_str(r#"{"at": ""}"#).unwrap();

        assert_eq!(day.at, NaiveDate::from_ymd_opt(2024, 3, 15));
        assert_eq!(month.at, NaiveDate::from_ymd_opt(2024, 3, 1));
        assert_eq!(blank.at, None);
        assert!(serde_json::from_str::<Dates>(r#"{"at": "soon"}"#).is_err());
    }

    #[test]
    fn end_before_start_is_rejected_unless_current() {
        let start = NaiveDate::from_ymd_opt(2024, 5, 1);
        let end = NaiveDate::from_ymd_opt(2023, 1, 1);

        assert!(check_date_range(start, end, false).is_err());
        assert!(check_date_range(start, end, true).is_ok());
        assert_eq!(effective_end_date(end, true), None);
        assert_eq!(effective_end_date(end, false), end);
    }

    #[test]
    fn tag_limits_are_enforced() {
        let many: Vec<String> = (0..21).map(|i| format!("t{i}")).collect();
        assert!(validate_tags(&many).is_err());
        assert!(validate_tags(&["x".repeat(51)]).is_err());
        assert!(validate_tags(&["ok".to_string()]).is_ok());
    }
}
