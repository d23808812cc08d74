use validator::Validate;

use crate::model::user::User;
use crate::util::error::ServiceError;

/// Checks a user record before it is written.
///
/// Required fields are checked in a fixed order and the first empty one is
/// reported. The email grammar is only checked once every field is present.
pub fn validate_user(user: &User) -> Result<(), ServiceError> {
    let required = [
        ("first_name", &user.first_name),
        ("last_name", &user.last_name),
        ("nickname", &user.nickname),
        ("password", &user.password),
        ("email", &user.email),
        ("country", &user.country),
    ];
    if let Some((field, _)) = required.iter().find(|(_, value)| value.is_empty()) {
        return Err(ServiceError::RequiredField(*field));
    }

    user.validate().map_err(|_| ServiceError::InvalidEmail)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_user() -> User {
        User {
            first_name: "FirstName".to_string(),
            last_name: "LastName".to_string(),
            nickname: "Nickname".to_string(),
            password: "Password".to_string(),
            email: "Email@email.com".to_string(),
            country: "Country".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_user_passes() {
        assert!(validate_user(&valid_user()).is_ok());
    }

    #[test]
    fn test_each_missing_field_is_reported() {
        let cases: [(&str, fn(&mut User)); 6] = [
            ("first_name", |u| u.first_name.clear()),
            ("last_name", |u| u.last_name.clear()),
            ("nickname", |u| u.nickname.clear()),
            ("password", |u| u.password.clear()),
            ("email", |u| u.email.clear()),
            ("country", |u| u.country.clear()),
        ];
        for (field, clear) in cases {
            let mut user = valid_user();
            clear(&mut user);
            match validate_user(&user) {
                Err(ServiceError::RequiredField(name)) => assert_eq!(name, field),
                other => panic!("expected RequiredField({field}), got {other:?}"),
            }
        }
    }

    #[test]
    fn test_first_missing_field_wins() {
        let user = User {
            first_name: "FirstName".to_string(),
            email: "Email9@email.com".to_string(),
            country: "Country".to_string(),
            ..Default::default()
        };
        match validate_user(&user) {
            Err(ServiceError::RequiredField(name)) => assert_eq!(name, "last_name"),
            other => panic!("expected RequiredField(last_name), got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_email_is_rejected() {
        let mut user = valid_user();
        user.email = "not-an-email".to_string();
        assert!(matches!(validate_user(&user), Err(ServiceError::InvalidEmail)));

        user.email = "Emailemailcom".to_string();
        assert!(matches!(validate_user(&user), Err(ServiceError::InvalidEmail)));
    }

    #[test]
    fn test_missing_field_reported_before_bad_email() {
        let mut user = valid_user();
        user.email = "not-an-email".to_string();
        user.country.clear();
        assert!(matches!(
            validate_user(&user),
            Err(ServiceError::RequiredField("country"))
        ));
    }

    #[test]
    fn test_escaped_email_still_validates() {
        let user = User {
            email: "first last@example.com".to_string(),
            ..valid_user()
        }
        .escaped();
        assert_eq!(user.email, "first%20last@example.com");
        assert!(validate_user(&user).is_ok());
    }
}
