use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::model::user::User;

/// Body accepted by `POST /users` and `PUT /users/{userID}`.
///
/// Any `id`, `created_at` or `updated_at` sent by the client is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UserRequest {
    #[serde(deserialize_with = "null_as_empty")]
    pub first_name: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub last_name: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub nickname: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub password: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub email: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub country: String,
}

// `null` reads as an empty string so validation reports the missing field.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl From<UserRequest> for User {
    fn from(req: UserRequest) -> Self {
        User {
            id: None,
            first_name: req.first_name,
            last_name: req.last_name,
            nickname: req.nickname,
            password: req.password,
            email: req.email,
            country: req.country,
            ..Default::default()
        }
    }
}

/// Raw query string of `GET /users`; parsed by `UserQuery::from_params`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserListParams {
    pub text: Option<String>,
    pub id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub nickname: Option<String>,
    pub password: Option<String>,
    pub email: Option<String>,
    pub country: Option<String>,
    pub startdcreated: Option<String>,
    pub enddcreated: Option<String>,
    pub startdupdated: Option<String>,
    pub enddupdated: Option<String>,
    pub page: Option<String>,
    pub page_size: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserDto {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub nickname: String,
    pub password: String,
    pub email: String,
    pub country: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        UserDto {
            id: user.id.map(|id| id.to_hex()).unwrap_or_default(),
            first_name: user.first_name,
            last_name: user.last_name,
            nickname: user.nickname,
            password: user.password,
            email: user.email,
            country: user.country,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub success: bool,
    #[serde(flatten)]
    pub user: UserDto,
}

impl UserResponse {
    pub fn new(user: User) -> Self {
        UserResponse { success: true, user: user.into() }
    }
}

#[derive(Debug, Serialize)]
pub struct UserListResponse {
    pub success: bool,
    pub users: Vec<UserDto>,
    pub count: usize,
}

impl UserListResponse {
    pub fn new(users: Vec<User>, count: usize) -> Self {
        UserListResponse {
            success: true,
            users: users.into_iter().map(UserDto::from).collect(),
            count,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DeleteUserResponse {
    pub success: bool,
    pub id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::error::ServiceError;
    use crate::util::user_validation::validate_user;
    use bson::oid::ObjectId;
    use serde_json::json;

    #[test]
    fn test_request_ignores_client_id_and_timestamps() {
        let req: UserRequest = serde_json::from_value(json!({
            "id": "61e41ed578752c5997718aff",
            "first_name": "FirstName",
            "email": "Email@email.com",
            "created_at": "2020-01-01T00:00:00Z"
        }))
        .unwrap();
        let user = User::from(req);
        assert!(user.id.is_none());
        assert_eq!(user.first_name, "FirstName");
        assert_eq!(user.email, "Email@email.com");
        assert!(user.last_name.is_empty());
        assert_eq!(user.created_at, DateTime::<Utc>::default());
    }

    #[test]
    fn test_null_fields_read_as_empty() {
        let req: UserRequest = serde_json::from_value(json!({
            "first_name": null,
            "last_name": "LastName",
            "nickname": "Nickname",
            "password": "Password",
            "email": "Email@email.com",
            "country": null
        }))
        .unwrap();
        assert!(req.first_name.is_empty());
        assert!(req.country.is_empty());
        assert_eq!(
            validate_user(&User::from(req)),
            Err(ServiceError::RequiredField("first_name"))
        );
    }

    #[test]
    fn test_non_string_field_is_rejected() {
        let result = serde_json::from_value::<UserRequest>(json!({ "first_name": 42 }));
        assert!(result.is_err());
    }

    #[test]
    fn test_user_response_is_flat() {
        let id = ObjectId::new();
        let user = User {
            id: Some(id),
            first_name: "FirstName".to_string(),
            email: "Email@email.com".to_string(),
            ..Default::default()
        };
        let body = serde_json::to_value(UserResponse::new(user)).unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["id"], id.to_hex());
        assert_eq!(body["first_name"], "FirstName");
        assert_eq!(body["email"], "Email@email.com");
        assert!(body.get("user").is_none());
    }

    #[test]
    fn test_list_response_shape() {
        let users = vec![User::identified_by(ObjectId::new()), User::identified_by(ObjectId::new())];
        let body = serde_json::to_value(UserListResponse::new(users, 2)).unwrap();
        assert_eq!(body["success"], true);
        assert_eq!(body["count"], 2);
        assert_eq!(body["users"].as_array().map(Vec::len), Some(2));
    }
}
