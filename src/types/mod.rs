//! Core data types shared by every component

mod credentials;
mod language;
mod profile;

pub use credentials::Credentials;
pub use language::Language;
pub use profile::{Enrollment, Grade, ProfileFields, Role, UserProfile};
