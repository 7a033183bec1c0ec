//! User profile and enrollment types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;

use crate::error::ValidationError;

/// Account role. Fixed when the account is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Teacher,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Teacher => "teacher",
        }
    }
}

impl FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "student" => Ok(Role::Student),
            "teacher" => Ok(Role::Teacher),
            other => Err(ValidationError::UnknownRole(other.to_string())),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// School grade, 6 through 12 inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Grade(u8);

impl Grade {
    pub const MIN: u8 = 6;
    pub const MAX: u8 = 12;

    pub fn get(&self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Grade {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Grade(value))
        } else {
            Err(ValidationError::GradeOutOfRange(value))
        }
    }
}

impl From<Grade> for u8 {
    fn from(grade: Grade) -> Self {
        grade.0
    }
}

impl std::fmt::Display for Grade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Role plus the data only that role carries.
///
/// Students always have a grade and teachers never do; serialized flat as
/// `"role": "student", "grade": 8`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Enrollment {
    Student { grade: Grade },
    Teacher,
}

impl Enrollment {
    pub fn role(&self) -> Role {
        match self {
            Enrollment::Student { .. } => Role::Student,
            Enrollment::Teacher => Role::Teacher,
        }
    }

    pub fn grade(&self) -> Option<Grade> {
        match self {
            Enrollment::Student { grade } => Some(*grade),
            Enrollment::Teacher => None,
        }
    }
}

/// Identity and progression record of a signed-in user.
///
/// `id`, enrollment (role and grade) and creation time are fixed once the
/// profile exists and are only readable through accessors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    id: String,
    pub name: String,
    pub username: String,
    pub email: String,
    #[serde(flatten)]
    enrollment: Enrollment,
    #[serde(default)]
    pub school: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub xp: u32,
    #[serde(default = "default_level")]
    pub level: u32,
    #[serde(default)]
    pub badges: BTreeSet<String>,
    #[serde(default)]
    pub streak: u32,
    created_at: DateTime<Utc>,
    pub last_login_at: DateTime<Utc>,
}

fn default_level() -> u32 {
    1
}

impl UserProfile {
    /// Create a fresh profile with zeroed progression
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        username: impl Into<String>,
        email: impl Into<String>,
        enrollment: Enrollment,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            username: username.into(),
            email: email.into(),
            enrollment,
            school: String::new(),
            avatar: String::new(),
            xp: 0,
            level: default_level(),
            badges: BTreeSet::new(),
            streak: 0,
            created_at: now,
            last_login_at: now,
        }
    }

    pub fn with_school(mut self, school: impl Into<String>) -> Self {
        self.school = school.into();
        self
    }

    pub fn with_avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = avatar.into();
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn enrollment(&self) -> Enrollment {
        self.enrollment
    }

    pub fn role(&self) -> Role {
        self.enrollment.role()
    }

    pub fn grade(&self) -> Option<Grade> {
        self.enrollment.grade()
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Stamp a successful sign-in
    pub fn touch_login(&mut self, at: DateTime<Utc>) {
        self.last_login_at = at;
    }

    /// Identifier match used by the offline tier: username exactly, email
    /// ignoring case.
    pub fn matches_identifier(&self, identifier: &str) -> bool {
        if identifier.is_empty() {
            return false;
        }
        self.username == identifier
            || (!self.email.is_empty() && self.email.eq_ignore_ascii_case(identifier))
    }

    /// Identity fields present (guards against half-written records)
    pub fn is_well_formed(&self) -> bool {
        !self.id.is_empty() && !self.username.is_empty()
    }
}

/// User record as returned by the remote auth service.
///
/// Everything is optional on the wire; [`ProfileFields::into_profile`]
/// enforces the profile invariants.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileFields {
    pub id: String,
    pub name: String,
    pub username: String,
    pub email: String,
    pub role: Option<String>,
    pub grade: Option<u8>,
    #[serde(alias = "schoolName")]
    pub school: String,
    #[serde(alias = "avatarUrl")]
    pub avatar: String,
    #[serde(alias = "experiencePoints")]
    pub xp: u32,
    pub level: Option<u32>,
    pub badges: Vec<String>,
    pub streak: u32,
    pub created_at: Option<DateTime<Utc>>,
    pub last_login_at: Option<DateTime<Utc>>,
}

impl ProfileFields {
    /// Convert into a validated profile, filling timestamps with `now`
    pub fn into_profile(self, now: DateTime<Utc>) -> Result<UserProfile, ValidationError> {
        if self.id.trim().is_empty() {
            return Err(ValidationError::Required("id"));
        }
        if self.username.trim().is_empty() {
            return Err(ValidationError::Required("username"));
        }

        let role = self
            .role
            .as_deref()
            .ok_or(ValidationError::Required("role"))?
            .parse::<Role>()?;

        let enrollment = match role {
            Role::Student => {
                let grade = self.grade.ok_or(ValidationError::Required("grade"))?;
                Enrollment::Student {
                    grade: Grade::try_from(grade)?,
                }
            }
            Role::Teacher => Enrollment::Teacher,
        };

        let name = if self.name.trim().is_empty() {
            self.username.clone()
        } else {
            self.name
        };

        Ok(UserProfile {
            id: self.id,
            name,
            username: self.username,
            email: self.email,
            enrollment,
            school: self.school,
            avatar: self.avatar,
            xp: self.xp,
            level: self.level.unwrap_or_else(default_level).max(1),
            badges: self.badges.into_iter().collect(),
            streak: self.streak,
            created_at: self.created_at.unwrap_or(now),
            last_login_at: self.last_login_at.unwrap_or(now),
        })
    }
}
