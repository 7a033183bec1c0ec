//! Demo roster: sample accounts usable without the auth service.
//!
//! Loaded from a JSON array of [`DemoAccount`] or taken from the built-in set.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{ClientError, ValidationError};
use crate::types::{Enrollment, Grade, Role, UserProfile};

/// One sample account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemoAccount {
    pub username: String,
    pub email: String,
    pub password: String,
    pub name: String,
    pub role: Role,
    #[serde(default)]
    pub grade: Option<u8>,
    #[serde(default)]
    pub school: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub xp: u32,
    #[serde(default = "default_level")]
    pub level: u32,
    #[serde(default)]
    pub badges: Vec<String>,
    #[serde(default)]
    pub streak: u32,
}

fn default_level() -> u32 {
    1
}

/// Fixed creation time for demo profiles so the synthesized profile is the
/// same on every sign-in.
fn demo_epoch() -> DateTime<Utc> {
    DateTime::from_timestamp(1_717_200_000, 0).unwrap_or_default()
}

impl DemoAccount {
    fn enrollment(&self) -> Result<Enrollment, ValidationError> {
        match self.role {
            Role::Student => {
                let grade = self.grade.ok_or(ValidationError::Required("grade"))?;
                Ok(Enrollment::Student {
                    grade: Grade::try_from(grade)?,
                })
            }
            Role::Teacher => Ok(Enrollment::Teacher),
        }
    }

    /// Deterministic profile for this account (id `demo-<username>`)
    pub fn to_profile(&self) -> Result<UserProfile, ValidationError> {
        let mut profile = UserProfile::new(
            format!("demo-{}", self.username),
            &self.name,
            &self.username,
            &self.email,
            self.enrollment()?,
            demo_epoch(),
        )
        .with_school(&self.school)
        .with_avatar(&self.avatar);

        profile.xp = self.xp;
        profile.level = self.level.max(1);
        profile.badges = self.badges.iter().cloned().collect();
        profile.streak = self.streak;
        Ok(profile)
    }

    fn matches(&self, identifier: &str, secret: &str) -> bool {
        (self.username == identifier || self.email == identifier) && self.password == secret
    }
}

/// Injected set of demo accounts
#[derive(Debug, Clone, Default)]
pub struct DemoRoster {
    accounts: Vec<DemoAccount>,
}

impl DemoRoster {
    /// Roster from explicit accounts. Every account must yield a valid profile.
    pub fn new(accounts: Vec<DemoAccount>) -> Result<Self, ValidationError> {
        for account in &accounts {
            account.to_profile()?;
        }
        Ok(Self { accounts })
    }

    /// No demo accounts; tier 2 never matches
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn builtin() -> Self {
        let account = |username: &str,
                       email: &str,
                       password: &str,
                       name: &str,
                       role: Role,
                       grade: Option<u8>,
                       xp: u32,
                       level: u32,
                       badges: &[&str],
                       streak: u32| DemoAccount {
            username: username.into(),
            email: email.into(),
            password: password.into(),
            name: name.into(),
            role,
            grade,
            school: "Delhi Public School".into(),
            avatar: format!("avatars/{}.png", username),
            xp,
            level,
            badges: badges.iter().map(|b| b.to_string()).collect(),
            streak,
        };

        Self {
            accounts: vec![
                account(
                    "aarav.demo",
                    "aarav.demo@lamad.app",
                    "demo123",
                    "Aarav Kumar",
                    Role::Student,
                    Some(8),
                    1250,
                    5,
                    &["first-steps", "math-whiz", "streak-7"],
                    7,
                ),
                account(
                    "ms.sharma",
                    "sharma@lamad.app",
                    "teach123",
                    "Anita Sharma",
                    Role::Teacher,
                    None,
                    0,
                    1,
                    &[],
                    0,
                ),
                account(
                    "priya.demo",
                    "priya.demo@lamad.app",
                    "demo123",
                    "Priya Nair",
                    Role::Student,
                    Some(11),
                    3400,
                    9,
                    &["science-star", "streak-30"],
                    30,
                ),
            ],
        }
    }

    /// Load a JSON array of accounts
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ClientError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ClientError::Config(format!("Failed to read roster {}: {}", path.display(), e))
        })?;
        let accounts: Vec<DemoAccount> = serde_json::from_str(&content).map_err(|e| {
            ClientError::Config(format!("Invalid roster {}: {}", path.display(), e))
        })?;
        Ok(Self::new(accounts)?)
    }

    /// Account whose username or email equals `identifier` and whose password
    /// equals `secret`. Both comparisons are exact.
    pub fn find(&self, identifier: &str, secret: &str) -> Option<&DemoAccount> {
        self.accounts.iter().find(|a| a.matches(identifier, secret))
    }

    pub fn by_username(&self, username: &str) -> Option<&DemoAccount> {
        self.accounts.iter().find(|a| a.username == username)
    }

    pub fn accounts(&self) -> &[DemoAccount] {
        &self.accounts
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}
