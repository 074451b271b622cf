//! Core identity types: the session token and the account model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque bearer credential proving a successful login.
///
/// The token value is deliberately excluded from `Debug` output so it never
/// ends up in logs or error reports.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionToken(String);

impl SessionToken {
    /// Wrap a raw token string
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token value, for use in `Authorization` headers
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the token and return the raw value
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl From<String> for SessionToken {
    fn from(token: String) -> Self {
        Self(token)
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(***)")
    }
}

/// Genders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gender {
    /// Female
    Female,
    /// Male
    Male,
    /// Other
    Other,
    /// Not specified
    #[default]
    #[serde(other)]
    Unspecified,
}

/// Account information returned by the identity service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// The unique account identifier
    #[serde(default)]
    pub uid: Option<String>,

    /// The unique public account identifier
    #[serde(default)]
    pub public_uid: Option<String>,

    /// The account display name
    #[serde(default)]
    pub display_name: Option<String>,

    /// The email address associated with the account
    #[serde(default)]
    pub email_address: Option<String>,

    /// The user first name
    #[serde(default)]
    pub first_name: Option<String>,

    /// The user last name
    #[serde(default)]
    pub last_name: Option<String>,

    /// The user gender
    #[serde(default, deserialize_with = "deserialize_gender")]
    pub gender: Gender,

    /// The user birthdate
    #[serde(default)]
    pub birthdate: Option<NaiveDate>,

    /// `true` iff the account has been verified
    #[serde(default)]
    pub verified: bool,
}

// Servers emit `"gender": null` for accounts that never set one
fn deserialize_gender<'de, D>(deserializer: D) -> Result<Gender, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let gender: Option<Gender> = Option::deserialize(deserializer)?;
    Ok(gender.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_token_debug_is_redacted() {
        let token = SessionToken::new("s3cret");
        assert_eq!(format!("{:?}", token), "SessionToken(***)");
        assert_eq!(token.as_str(), "s3cret");
    }

    #[test]
    fn account_deserializes_from_camel_case() {
        let json = serde_json::json!({
            "uid": "1234",
            "publicUid": "ab-cd",
            "displayName": "Jane D.",
            "emailAddress": "jane@example.test",
            "firstName": "Jane",
            "lastName": "Doe",
            "gender": "FEMALE",
            "birthdate": "1990-04-12",
            "verified": true,
        });

        let account: Account = serde_json::from_value(json).unwrap();
        assert_eq!(account.uid.as_deref(), Some("1234"));
        assert_eq!(account.public_uid.as_deref(), Some("ab-cd"));
        assert_eq!(account.gender, Gender::Female);
        assert_eq!(
            account.birthdate,
            Some(NaiveDate::from_ymd_opt(1990, 4, 12).unwrap())
        );
        assert!(account.verified);
    }

    #[test]
    fn account_tolerates_missing_and_unknown_fields() {
        let json = serde_json::json!({
            "displayName": "Anonymous",
            "gender": "SOMETHING_NEW",
        });

        let account: Account = serde_json::from_value(json).unwrap();
        assert_eq!(account.display_name.as_deref(), Some("Anonymous"));
        assert_eq!(account.gender, Gender::Unspecified);
        assert_eq!(account.uid, None);
        assert!(!account.verified);
    }

    #[test]
    fn account_accepts_null_gender() {
        let json = serde_json::json!({ "gender": null });
        let account: Account = serde_json::from_value(json).unwrap();
        assert_eq!(account.gender, Gender::Unspecified);
    }
}
