//! Session - process-wide state of who is signed in and what is on screen
//!
//! [`Session`] holds the language plus either an onboarding flow or a signed-in
//! profile with its current activity. [`reduce`] is the only code that
//! changes it; [`SessionController`] feeds it events and applies the durable
//! [`SessionEffect`]s it returns.

mod controller;
mod reducer;
mod state;

pub use controller::{ActiveView, SessionController};
pub use reducer::{reduce, SessionEffect, SessionEvent};
pub use state::{Phase, Session, MAX_HISTORY};
