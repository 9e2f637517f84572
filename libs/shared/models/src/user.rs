use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserType {
    Pregnant,
    SupportNetwork,
}

impl Default for UserType {
    fn default() -> Self {
        UserType::Pregnant
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserType::Pregnant => write!(f, "PREGNANT"),
            UserType::SupportNetwork => write!(f, "SUPPORT_NETWORK"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, sqlx::Type)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LinkStatus {
    Active,
    Inactive,
}

impl fmt::Display for LinkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkStatus::Active => write!(f, "ACTIVE"),
            LinkStatus::Inactive => write!(f, "INACTIVE"),
        }
    }
}

impl FromStr for LinkStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVE" => Ok(LinkStatus::Active),
            "INACTIVE" => Ok(LinkStatus::Inactive),
            other => Err(format!("Unknown link status: {}", other)),
        }
    }
}

/// Full `users` row, including the password hash. Never serialized.
#[derive(Debug, Clone, FromRow)]
pub struct UserRecord {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub phone: Option<String>,
    pub user_type: UserType,
    pub share_code: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: String,
    pub email: String,
    pub name: String,
    pub phone: Option<String>,
    pub user_type: UserType,
    pub share_code: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<UserRecord> for PublicUser {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.id,
            email: record.email,
            name: record.name,
            phone: record.phone,
            user_type: record.user_type,
            share_code: record.share_code,
            created_at: record.created_at,
        }
    }
}

/// Contact card of the other side of a support link.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct UserContact {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_type_wire_format() {
        assert_eq!(serde_json::to_value(UserType::SupportNetwork).unwrap(), "SUPPORT_NETWORK");
        let parsed: UserType = serde_json::from_value(serde_json::json!("PREGNANT")).unwrap();
        assert_eq!(parsed, UserType::Pregnant);
        assert_eq!(UserType::default(), UserType::Pregnant);
    }

    #[test]
    fn test_link_status_parse() {
        assert_eq!("INACTIVE".parse::<LinkStatus>().unwrap(), LinkStatus::Inactive);
        assert!("PAUSED".parse::<LinkStatus>().is_err());
    }
}
