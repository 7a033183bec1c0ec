//! Sign-up form and its local validation

use chrono::{DateTime, Utc};
use uuid::Uuid;
use zeroize::Zeroizing;

use crate::error::ValidationError;
use crate::remote::RegistrationRequest;
use crate::types::{Enrollment, Grade, Language, Role, UserProfile};

pub const MIN_PASSWORD_LEN: usize = 6;
const USERNAME_LEN: std::ops::RangeInclusive<usize> = 3..=20;

/// What the user typed on the sign-up screen.
///
/// `grade` is read for students only, `teacher_code` for teachers only. The
/// teacher code goes to the service and is never kept in the profile.
#[derive(Clone, Default)]
pub struct SignUpForm {
    pub name: String,
    pub username: String,
    pub email: String,
    pub password: Zeroizing<String>,
    pub grade: Option<u8>,
    pub school: String,
    pub teacher_code: Option<String>,
}

impl SignUpForm {
    /// Shape checks for `role`. Errors stay on the device.
    pub fn validate(&self, role: Role) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::Required("name"));
        }

        let username = self.username.trim();
        if !USERNAME_LEN.contains(&username.chars().count())
            || !username
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        {
            return Err(ValidationError::InvalidUsername);
        }

        let email = self.email.trim();
        if email.is_empty() {
            return Err(ValidationError::Required("email"));
        }
        if !is_email_shaped(email) {
            return Err(ValidationError::InvalidEmail);
        }

        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ValidationError::PasswordTooShort {
                min: MIN_PASSWORD_LEN,
            });
        }

        self.enrollment(role).map(|_| ())
    }

    fn enrollment(&self, role: Role) -> Result<Enrollment, ValidationError> {
        match role {
            Role::Student => {
                let grade = self.grade.ok_or(ValidationError::Required("grade"))?;
                Ok(Enrollment::Student {
                    grade: Grade::try_from(grade)?,
                })
            }
            Role::Teacher => {
                let has_code = self
                    .teacher_code
                    .as_deref()
                    .is_some_and(|code| !code.trim().is_empty());
                if has_code {
                    Ok(Enrollment::Teacher)
                } else {
                    Err(ValidationError::MissingTeacherCode)
                }
            }
        }
    }

    /// Validated registration payload
    pub fn to_request(
        &self,
        role: Role,
        language: Language,
    ) -> Result<RegistrationRequest, ValidationError> {
        self.validate(role)?;
        Ok(RegistrationRequest {
            name: self.name.trim().to_string(),
            username: self.username.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password.clone(),
            role: role.as_str().to_string(),
            grade: match role {
                Role::Student => self.grade,
                Role::Teacher => None,
            },
            school: self.school.trim().to_string(),
            teacher_code: match role {
                Role::Teacher => self.teacher_code.as_ref().map(|c| c.trim().to_string()),
                Role::Student => None,
            },
            language,
        })
    }

    /// Profile built from the form when the service accepts the account but
    /// returns no user: fresh id, zero XP, level 1.
    pub fn mint_profile(&self, role: Role, now: DateTime<Utc>) -> Result<UserProfile, ValidationError> {
        self.validate(role)?;
        Ok(UserProfile::new(
            Uuid::new_v4().to_string(),
            self.name.trim(),
            self.username.trim(),
            self.email.trim(),
            self.enrollment(role)?,
            now,
        )
        .with_school(self.school.trim()))
    }
}

fn is_email_shaped(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.chars().any(char::is_whitespace)
}

impl std::fmt::Debug for SignUpForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignUpForm")
            .field("name", &self.name)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("grade", &self.grade)
            .field("school", &self.school)
            .field("teacher_code", &self.teacher_code.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
