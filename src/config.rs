//! Configuration for the Lamad client
//!
//! CLI arguments and environment variables via clap. Every flag has an
//! environment fallback so a `.env` file is enough to configure a device.

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::auth::{DemoRoster, ResolverConfig};
use crate::error::{ClientError, Result};
use crate::remote::{AuthService, HttpAuthService, OfflineAuthService};
use crate::router::{ActivityCatalogue, ActivityRouter};

/// Lamad - gamified learning for grades 6 to 12
#[derive(Parser, Debug, Clone)]
#[command(name = "lamad")]
#[command(about = "Lamad learning client session shell")]
pub struct Args {
    /// Base URL of the auth service (e.g. "https://auth.lamad.app").
    /// Unset runs offline: demo roster and cached profile only.
    #[arg(long, env = "LAMAD_AUTH_URL")]
    pub auth_url: Option<String>,

    /// Directory holding the profile store
    #[arg(long, env = "LAMAD_DATA_DIR", default_value = ".lamad")]
    pub data_dir: PathBuf,

    /// Activity catalogue JSON (built-in vocabulary when unset)
    #[arg(long, env = "LAMAD_CATALOGUE")]
    pub catalogue: Option<PathBuf>,

    /// Demo roster JSON (built-in accounts when unset)
    #[arg(long, env = "LAMAD_ROSTER")]
    pub roster: Option<PathBuf>,

    /// Disable demo accounts entirely
    #[arg(long, env = "LAMAD_DISABLE_DEMO", default_value = "false")]
    pub disable_demo_roster: bool,

    /// Auth service request timeout in milliseconds
    #[arg(long, env = "LAMAD_REQUEST_TIMEOUT_MS", default_value = "10000")]
    pub request_timeout_ms: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl Args {
    /// Validate configuration
    pub fn validate(&self) -> std::result::Result<(), String> {
        if let Some(url) = &self.auth_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(format!("LAMAD_AUTH_URL must be an http(s) URL, got '{}'", url));
            }
        }

        if self.request_timeout_ms == 0 {
            return Err("LAMAD_REQUEST_TIMEOUT_MS must be greater than zero".to_string());
        }

        if self.disable_demo_roster && self.roster.is_some() {
            return Err("LAMAD_ROSTER cannot be combined with LAMAD_DISABLE_DEMO".to_string());
        }

        Ok(())
    }

    pub fn store_path(&self) -> PathBuf {
        self.data_dir.join("profile.json")
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn resolver_config(&self) -> ResolverConfig {
        ResolverConfig {
            remote_timeout: self.request_timeout(),
        }
    }

    pub fn auth_service(&self) -> Result<Arc<dyn AuthService>> {
        match &self.auth_url {
            Some(url) => Ok(Arc::new(HttpAuthService::new(url, self.request_timeout())?)),
            None => Ok(Arc::new(OfflineAuthService)),
        }
    }

    pub fn demo_roster(&self) -> Result<DemoRoster> {
        if self.disable_demo_roster {
            return Ok(DemoRoster::empty());
        }
        match &self.roster {
            Some(path) => DemoRoster::from_file(path),
            None => Ok(DemoRoster::builtin()),
        }
    }

    pub fn router(&self) -> Result<ActivityRouter> {
        match &self.catalogue {
            Some(path) => ActivityRouter::new(ActivityCatalogue::from_file(path)?),
            None => Ok(ActivityRouter::builtin()),
        }
    }

    /// `validate` as a [`ClientError`]
    pub fn check(&self) -> Result<()> {
        self.validate().map_err(ClientError::Config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["lamad"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_defaults_are_offline_and_valid() {
        let args = args(&[]);
        assert!(args.validate().is_ok());
        assert_eq!(args.store_path(), PathBuf::from(".lamad/profile.json"));
        assert_eq!(args.resolver_config().remote_timeout, Duration::from_secs(10));
        assert_eq!(args.demo_roster().unwrap().len(), 3);
    }

    #[test]
    fn test_rejects_non_http_auth_url() {
        let args = args(&["--auth-url", "ftp://auth.lamad.app"]);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let args = args(&["--request-timeout-ms", "0"]);
        assert!(matches!(args.check(), Err(ClientError::Config(_))));
    }

    #[test]
    fn test_disable_demo_gives_empty_roster() {
        let args = args(&["--disable-demo-roster"]);
        assert!(args.demo_roster().unwrap().is_empty());
    }
}
