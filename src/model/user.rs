use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::util::escape::{escape_email, escape_field};

/// A user document as stored in the `users` collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub first_name: String,
    pub last_name: String,
    pub nickname: String,
    pub password: String,
    #[validate(email)]
    pub email: String,
    pub country: String,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// A user carrying nothing but its identifier, used for delete notifications.
    pub fn identified_by(id: ObjectId) -> Self {
        User {
            id: Some(id),
            ..Default::default()
        }
    }

    /// Percent-escapes every free-text field. `@` survives in the email.
    pub fn escaped(mut self) -> Self {
        self.first_name = escape_field(&self.first_name);
        self.last_name = escape_field(&self.last_name);
        self.nickname = escape_field(&self.nickname);
        self.password = escape_field(&self.password);
        self.email = escape_email(&self.email);
        self.country = escape_field(&self.country);
        self
    }

    /// True when all six text fields match, ignoring id and timestamps.
    pub fn is_soft_equal(&self, other: &User) -> bool {
        self.first_name == other.first_name
            && self.last_name == other.last_name
            && self.nickname == other.nickname
            && self.password == other.password
            && self.email == other.email
            && self.country == other.country
    }
}
