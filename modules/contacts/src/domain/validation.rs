//! Validation of untyped form fields into typed contact inputs.
//!
//! Every field is checked and every violation is reported; nothing stops at
//! the first error.

use url::Url;

use crate::contract::model::{ContactPatch, FieldErrors, NewContact, RawContactFields};

/// Minimum length, in characters, of every required text field.
pub const MIN_LEN: usize = 2;

pub const MSG_REQUIRED: &str = "Required";
pub const MSG_INVALID_URL: &str = "Invalid url";
pub const MSG_INVALID_FLAG: &str = "Expected true or false";

pub fn msg_too_short(min: usize) -> String {
    format!("String must contain at least {min} character(s)")
}

pub fn msg_too_long(max: usize) -> String {
    format!("String must contain at most {max} character(s)")
}

pub const FIELD_AVATAR: &str = "avatar";
pub const FIELD_FIRST: &str = "first";
pub const FIELD_LAST: &str = "last";
pub const FIELD_TWITTER: &str = "twitter";
pub const FIELD_NOTES: &str = "notes";
pub const FIELD_FAVORITE: &str = "favorite";
pub const FIELD_QUERY: &str = "q";
/// Older create forms submit notes under this name.
const FIELD_NOTES_LEGACY: &str = "note";

#[derive(Clone, Copy, PartialEq, Eq)]
enum Rule {
    Text,
    Url,
}

/// Required fields of the create form, in schema order.
const SCHEMA: [(&str, Rule); 4] = [
    (FIELD_AVATAR, Rule::Url),
    (FIELD_FIRST, Rule::Text),
    (FIELD_LAST, Rule::Text),
    (FIELD_TWITTER, Rule::Text),
];

fn check(field: &str, value: &str, rule: Rule, errors: &mut FieldErrors) {
    if rule == Rule::Url && Url::parse(value).is_err() {
        errors.push(field, MSG_INVALID_URL);
    }
    if value.chars().count() < MIN_LEN {
        errors.push(field, msg_too_short(MIN_LEN));
    }
}

/// Parse an HTML-form boolean.
pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "on" => Some(true),
        "false" | "off" => Some(false),
        _ => None,
    }
}

fn notes_of(raw: &RawContactFields) -> Option<String> {
    raw.get(FIELD_NOTES)
        .or_else(|| raw.get(FIELD_NOTES_LEGACY))
        .cloned()
}

fn favorite_of(raw: &RawContactFields, errors: &mut FieldErrors) -> Option<bool> {
    let value = raw.get(FIELD_FAVORITE)?;
    let flag = parse_flag(value);
    if flag.is_none() {
        errors.push(FIELD_FAVORITE, MSG_INVALID_FLAG);
    }
    flag
}

/// Reject search queries longer than `max` characters. Queries are never shortened.
pub fn validate_query(query: &str, max: usize) -> Result<(), FieldErrors> {
    if query.chars().count() <= max {
        return Ok(());
    }
    let mut errors = FieldErrors::new();
    errors.push(FIELD_QUERY, msg_too_long(max));
    Err(errors)
}

/// Validate a create submission.
///
/// `avatar`, `first`, `last` and `twitter` are required (min length 2, avatar
/// must be an absolute URL); `notes` and `favorite` are optional.
pub fn validate_new_contact(raw: &RawContactFields) -> Result<NewContact, FieldErrors> {
    let mut errors = FieldErrors::new();
    for (field, rule) in SCHEMA {
        match raw.get(field) {
            None => errors.push(field, MSG_REQUIRED),
            Some(value) => check(field, value, rule, &mut errors),
        }
    }
    let favorite = favorite_of(raw, &mut errors);

    if !errors.is_empty() {
        return Err(errors);
    }

    let take = |field: &str| raw.get(field).cloned().unwrap_or_default();
    Ok(NewContact {
        avatar: take(FIELD_AVATAR),
        first: take(FIELD_FIRST),
        last: take(FIELD_LAST),
        twitter: take(FIELD_TWITTER),
        notes: notes_of(raw),
        favorite,
    })
}

/// Validate an edit submission into a merge patch.
///
/// Only submitted fields are checked. An empty value clears the field; any
/// other value must pass the create rule for that field. Unknown keys are
/// ignored.
pub fn validate_contact_patch(raw: &RawContactFields) -> Result<ContactPatch, FieldErrors> {
    let mut errors = FieldErrors::new();
    let mut patch = ContactPatch::default();

    for (field, rule) in SCHEMA {
        let Some(value) = raw.get(field) else {
            continue;
        };
        if !value.is_empty() {
            check(field, value, rule, &mut errors);
        }
        let slot = match field {
            FIELD_AVATAR => &mut patch.avatar,
            FIELD_FIRST => &mut patch.first,
            FIELD_LAST => &mut patch.last,
            _ => &mut patch.twitter,
        };
        *slot = Some(value.clone());
    }
    patch.notes = notes_of(raw);
    patch.favorite = favorite_of(raw, &mut errors);

    if errors.is_empty() {
        Ok(patch)
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn over_long_query_is_rejected_not_cut() {
        assert!(validate_query("", 3).is_ok());
        assert!(validate_query("abc", 3).is_ok());
        assert!(validate_query("äöü", 3).is_ok());

        let errors = validate_query("abcd", 3).unwrap_err();
        assert_eq!(
            errors.get(FIELD_QUERY),
            Some(&["String must contain at most 3 character(s)".to_string()][..])
        );
    }

    fn raw(pairs: &[(&str, &str)]) -> RawContactFields {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn accepts_complete_create_form() {
        let new = validate_new_contact(&raw(&[
            ("first", "Jane"),
            ("last", "Doe"),
            ("twitter", "@jane"),
            ("avatar", "https://example.com/a.png"),
            ("note", "met at a conference"),
        ]))
        .unwrap();

        assert_eq!(new.first, "Jane");
        assert_eq!(new.avatar, "https://example.com/a.png");
        assert_eq!(new.notes.as_deref(), Some("met at a conference"));
        assert_eq!(new.favorite, None);
    }

    #[test]
    fn reports_every_violation_at_once() {
        let errors = validate_new_contact(&raw(&[
            ("avatar", "not-a-url"),
            ("first", "A"),
            ("last", "B"),
            ("twitter", "x"),
        ]))
        .unwrap_err();

        assert_eq!(errors.get("avatar").unwrap(), [MSG_INVALID_URL]);
        assert_eq!(errors.get("first").unwrap(), [msg_too_short(2)]);
        assert_eq!(errors.get("last").unwrap(), [msg_too_short(2)]);
        assert_eq!(errors.get("twitter").unwrap(), [msg_too_short(2)]);
        assert_eq!(
            errors.fields().collect::<Vec<_>>(),
            vec!["avatar", "first", "last", "twitter"]
        );
    }

    #[test]
    fn missing_fields_are_required() {
        let errors = validate_new_contact(&raw(&[("first", "Jane")])).unwrap_err();
        assert_eq!(errors.get("avatar").unwrap(), [MSG_REQUIRED]);
        assert_eq!(errors.get("last").unwrap(), [MSG_REQUIRED]);
        assert_eq!(errors.get("twitter").unwrap(), [MSG_REQUIRED]);
        assert!(errors.get("first").is_none());
    }

    #[test]
    fn empty_avatar_collects_messages_in_order() {
        let errors = validate_new_contact(&raw(&[
            ("avatar", ""),
            ("first", "Jane"),
            ("last", "Doe"),
            ("twitter", "@jane"),
        ]))
        .unwrap_err();
        assert_eq!(
            errors.get("avatar").unwrap(),
            [MSG_INVALID_URL.to_string(), msg_too_short(2)]
        );
    }

    #[test]
    fn relative_urls_are_rejected() {
        let errors = validate_new_contact(&raw(&[
            ("avatar", "/img/a.png"),
            ("first", "Jane"),
            ("last", "Doe"),
            ("twitter", "@jane"),
        ]))
        .unwrap_err();
        assert_eq!(errors.get("avatar").unwrap(), [MSG_INVALID_URL]);
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        // "É" is two bytes but a single character
        let errors = validate_new_contact(&raw(&[
            ("avatar", "https://example.com/a.png"),
            ("first", "É"),
            ("last", "Zoë"),
            ("twitter", "@z"),
        ]))
        .unwrap_err();
        assert!(errors.get("first").is_some());
        assert!(errors.get("last").is_none());
    }

    #[test]
    fn patch_keeps_only_submitted_fields() {
        let patch = validate_contact_patch(&raw(&[("first", "Janet"), ("notes", "")])).unwrap();
        assert_eq!(patch.first.as_deref(), Some("Janet"));
        assert_eq!(patch.notes.as_deref(), Some(""));
        assert_eq!(patch.last, None);
        assert_eq!(patch.avatar, None);
        assert_eq!(patch.favorite, None);
    }

    #[test]
    fn patch_empty_value_clears_without_error() {
        let patch = validate_contact_patch(&raw(&[("twitter", ""), ("avatar", "")])).unwrap();
        assert_eq!(patch.twitter.as_deref(), Some(""));
        assert_eq!(patch.avatar.as_deref(), Some(""));
    }

    #[test]
    fn patch_checks_non_empty_values() {
        let errors =
            validate_contact_patch(&raw(&[("avatar", "nope"), ("last", "X"), ("favorite", "maybe")]))
                .unwrap_err();
        assert_eq!(errors.get("avatar").unwrap(), [MSG_INVALID_URL]);
        assert_eq!(errors.get("last").unwrap(), [msg_too_short(2)]);
        assert_eq!(errors.get("favorite").unwrap(), [MSG_INVALID_FLAG]);
    }

    #[test]
    fn patch_ignores_unknown_keys() {
        let patch = validate_contact_patch(&raw(&[("id", "hijack"), ("createdAt", "x")])).unwrap();
        assert!(patch.is_empty());
    }

    #[test]
    fn flag_parsing() {
        assert_eq!(parse_flag("true"), Some(true));
        assert_eq!(parse_flag("on"), Some(true));
        assert_eq!(parse_flag("FALSE"), Some(false));
        assert_eq!(parse_flag("yes"), None);
    }
}
