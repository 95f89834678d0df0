//! Explicit request context handed to the marketplace service.
//!
//! Callers build a [`SessionContext`] per request instead of reaching for a
//! global "current user" or "current language".

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Employer,
    Student,
}

impl Role {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::Employer => "Employer",
            Self::Student => "Student",
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "employer" | "company" => Ok(Self::Employer),
            "student" => Ok(Self::Student),
            other => Err(format!("unknown role '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentUser {
    pub id: String,
    pub email: String,
    pub role: Role,
    /// Company the user posts on behalf of; only meaningful for employers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    pub user: Option<CurrentUser>,
    pub locale: String,
    /// Reference date for date windows, deadlines and "ship by today".
    pub as_of: NaiveDate,
}

impl SessionContext {
    pub fn anonymous(as_of: NaiveDate) -> Self {
        Self {
            user: None,
            locale: "en".to_string(),
            as_of,
        }
    }

    pub fn for_user(user: CurrentUser, as_of: NaiveDate) -> Self {
        Self {
            user: Some(user),
            locale: "en".to_string(),
            as_of,
        }
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    pub fn role(&self) -> Option<Role> {
        self.user.as_ref().map(|user| user.role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_parse_case_insensitively() {
        assert_eq!("Student".parse::<Role>(), Ok(Role::Student));
        assert_eq!(" company ".parse::<Role>(), Ok(Role::Employer));
        assert!("guest".parse::<Role>().is_err());
    }

    #[test]
    fn anonymous_session_has_no_role() {
        let as_of = NaiveDate::from_ymd_opt(2024, 1, 15).expect("valid date");
        let session = SessionContext::anonymous(as_of).with_locale("hi-IN");
        assert_eq!(session.role(), None);
        assert_eq!(session.locale, "hi-IN");
        assert_eq!(session.as_of, as_of);
    }
}
