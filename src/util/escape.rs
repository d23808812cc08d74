//! Percent-escaping applied to user text fields before they are validated,
//! stored or compared against stored values.
//!
//! Everything outside `A-Z a-z 0-9 - _ . ~` is encoded as `%XX`, so a space
//! becomes `%20`.

/// Escapes a free-text value.
pub fn escape_field(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// Escapes a value that may hold an email address; `@` is left as is.
pub fn escape_email(value: &str) -> String {
    escape_field(value).replace("%40", "@")
}
