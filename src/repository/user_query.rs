//! Translation of the `GET /users` filters into a MongoDB filter document
//! and find options.

use bson::{doc, oid::ObjectId, Document};
use chrono::{DateTime, Utc};
use mongodb::options::FindOptions;

use crate::dto::user_dto::UserListParams;
use crate::util::error::ServiceError;
use crate::util::escape::{escape_email, escape_field};

/// Fields searched by the free-text `text` parameter.
pub const SEARCHABLE_FIELDS: [&str; 6] = [
    "first_name",
    "last_name",
    "nickname",
    "password",
    "email",
    "country",
];

/// Inclusive bounds on a timestamp field.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DateRange {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

/// A parsed listing request. Text values are already escaped the way
/// stored values are.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserQuery {
    pub text: Option<String>,
    pub id: Option<ObjectId>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub nickname: Option<String>,
    pub password: Option<String>,
    pub email: Option<String>,
    pub country: Option<String>,
    pub created: DateRange,
    pub updated: DateRange,
    /// Zero-based page number.
    pub page: u64,
    /// Zero means no limit.
    pub page_size: u64,
}

impl UserQuery {
    /// Parses raw query parameters. Empty values count as absent.
    ///
    /// Dates are checked first, then `page`, `page_size` and `id`; the first
    /// malformed one is reported as `InputFormat`.
    pub fn from_params(params: &UserListParams) -> Result<Self, ServiceError> {
        let created = DateRange {
            start: parse_date("startdcreated", &params.startdcreated)?,
            end: parse_date("enddcreated", &params.enddcreated)?,
        };
        let updated = DateRange {
            start: parse_date("startdupdated", &params.startdupdated)?,
            end: parse_date("enddupdated", &params.enddupdated)?,
        };
        let page = parse_count("page", &params.page)?;
        let page_size = parse_count("page_size", &params.page_size)?;
        check_page_window(page, page_size)?;
        let id = match present(&params.id) {
            Some(raw) => Some(ObjectId::parse_str(raw).map_err(|_| {
                ServiceError::InputFormat(format!("id '{}' is not a valid identifier", raw))
            })?),
            None => None,
        };

        Ok(UserQuery {
            text: present(&params.text).map(escape_email),
            id,
            first_name: present(&params.first_name).map(escape_field),
            last_name: present(&params.last_name).map(escape_field),
            nickname: present(&params.nickname).map(escape_field),
            password: present(&params.password).map(escape_field),
            email: present(&params.email).map(escape_email),
            country: present(&params.country).map(escape_field),
            created,
            updated,
            page,
            page_size,
        })
    }

    fn field_values(&self) -> [(&'static str, Option<&str>); 6] {
        [
            ("first_name", self.first_name.as_deref()),
            ("last_name", self.last_name.as_deref()),
            ("nickname", self.nickname.as_deref()),
            ("password", self.password.as_deref()),
            ("email", self.email.as_deref()),
            ("country", self.country.as_deref()),
        ]
    }

    /// Builds the filter: every present condition is AND'd, and `text`
    /// contributes a single OR group over [`SEARCHABLE_FIELDS`].
    ///
    /// An absent `text` adds no OR group at all, so it restricts nothing.
    pub fn filter(&self) -> Document {
        let mut conditions: Vec<Document> = Vec::new();

        if let Some(id) = self.id {
            conditions.push(doc! { "_id": id });
        }

        for (field, value) in self.field_values() {
            if let Some(value) = value {
                conditions.push(contains(field, value));
            }
        }

        if let Some(ref text) = self.text {
            let any_field: Vec<Document> = SEARCHABLE_FIELDS
                .iter()
                .map(|field| contains(field, text))
                .collect();
            conditions.push(doc! { "$or": any_field });
        }

        push_range(&mut conditions, "created_at", &self.created);
        push_range(&mut conditions, "updated_at", &self.updated);

        if conditions.is_empty() {
            doc! {}
        } else {
            doc! { "$and": conditions }
        }
    }

    /// Newest first, `skip = page * page_size`, `limit = page_size`.
    pub fn find_options(&self) -> FindOptions {
        let (skip, limit) = if self.page_size == 0 {
            (None, None)
        } else {
            (
                Some(self.page.saturating_mul(self.page_size)),
                Some(i64::try_from(self.page_size).unwrap_or(i64::MAX)),
            )
        };
        FindOptions::builder()
            .sort(doc! { "created_at": -1 })
            .skip(skip)
            .limit(limit)
            .build()
    }
}

// The server takes skip and limit as signed 64-bit integers.
fn check_page_window(page: u64, page_size: u64) -> Result<(), ServiceError> {
    let max = i64::MAX as u64;
    match page.checked_mul(page_size) {
        Some(skip) if skip <= max && page_size <= max => Ok(()),
        _ => Err(ServiceError::InputFormat(format!(
            "page {} with page_size {} is out of range",
            page, page_size
        ))),
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

fn parse_date(name: &str, value: &Option<String>) -> Result<Option<DateTime<Utc>>, ServiceError> {
    present(value)
        .map(|raw| {
            DateTime::parse_from_rfc3339(raw)
                .map(|date| date.with_timezone(&Utc))
                .map_err(|_| {
                    ServiceError::InputFormat(format!("{} '{}' is not an RFC 3339 date", name, raw))
                })
        })
        .transpose()
}

fn parse_count(name: &str, value: &Option<String>) -> Result<u64, ServiceError> {
    match present(value) {
        Some(raw) => raw.parse::<u64>().map_err(|_| {
            ServiceError::InputFormat(format!("{} '{}' is not a non-negative integer", name, raw))
        }),
        None => Ok(0),
    }
}

fn on_field(field: &str, condition: Document) -> Document {
    let mut doc = Document::new();
    doc.insert(field, condition);
    doc
}

// Case-sensitive substring match.
fn contains(field: &str, value: &str) -> Document {
    on_field(field, doc! { "$regex": regex::escape(value) })
}

fn push_range(conditions: &mut Vec<Document>, field: &str, range: &DateRange) {
    if let Some(start) = range.start {
        conditions.push(on_field(field, doc! { "$gte": bson::DateTime::from_chrono(start) }));
    }
    if let Some(end) = range.end {
        conditions.push(on_field(field, doc! { "$lte": bson::DateTime::from_chrono(end) }));
    }
}
