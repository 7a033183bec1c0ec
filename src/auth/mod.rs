//! Sign-in: demo roster, in-flight lock and the tiered credential resolver

mod guard;
mod resolver;
mod roster;

pub use guard::{InFlight, InFlightPermit};
pub use resolver::{AuthTier, CredentialResolver, Resolution, ResolutionStats, ResolverConfig};
pub use roster::{DemoAccount, DemoRoster};
