//! Per-request route gating based on the presence of a session.
//!
//! The gate only looks at whether a session token is present. Validating the
//! token is the identity provider's job.

use std::collections::HashSet;

use regex::RegexSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod session;

pub use session::{cookie_value, session_present};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateDecision {
    Allow,
    RedirectToPublic,
    RedirectToProtectedHome,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    pub public_paths: Vec<String>,
    pub public_landing: String,
    pub protected_home: String,
    pub bypass_patterns: Vec<String>,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            public_paths: vec!["/".into()],
            public_landing: "/".into(),
            protected_home: "/dashboard".into(),
            bypass_patterns: vec![
                "^/api/auth".into(),
                "^/_next/static".into(),
                "^/_next/image".into(),
                r"^/favicon\.ico".into(),
                "^/healthz$".into(),
            ],
        }
    }
}

#[derive(Debug, Error)]
pub enum GateConfigError {
    #[error("invalid bypass pattern: {0}")]
    InvalidBypassPattern(#[from] regex::Error),
    #[error("public landing '{0}' must be a public or bypassed path")]
    LandingNotPublic(String),
    #[error("protected home '{0}' must not be a public path")]
    HomeIsPublic(String),
}

#[derive(Debug, Clone)]
pub struct AccessGate {
    public_paths: HashSet<String>,
    public_landing: String,
    protected_home: String,
    bypass: RegexSet,
}

impl AccessGate {
    /// Compiles the bypass patterns and rejects configurations that would redirect in a loop.
    pub fn new(config: GateConfig) -> Result<Self, GateConfigError> {
        let gate = Self {
            public_paths: config.public_paths.into_iter().collect(),
            bypass: RegexSet::new(&config.bypass_patterns)?,
            public_landing: config.public_landing,
            protected_home: config.protected_home,
        };

        if !gate.is_public(&gate.public_landing) && !gate.is_bypassed(&gate.public_landing) {
            return Err(GateConfigError::LandingNotPublic(gate.public_landing));
        }
        if gate.is_public(&gate.protected_home) {
            return Err(GateConfigError::HomeIsPublic(gate.protected_home));
        }
        Ok(gate)
    }

    pub fn is_public(&self, path: &str) -> bool {
        self.public_paths.contains(path)
    }

    pub fn is_bypassed(&self, path: &str) -> bool {
        self.bypass.is_match(path)
    }

    pub fn decide(&self, path: &str, has_session: bool) -> GateDecision {
        let public = self.is_public(path);
        match (has_session, public) {
            (false, false) => GateDecision::RedirectToPublic,
            (true, true) => GateDecision::RedirectToProtectedHome,
            _ => GateDecision::Allow,
        }
    }

    /// `None` when the path is excluded from gating altogether.
    pub fn evaluate(&self, path: &str, has_session: bool) -> Option<GateDecision> {
        if self.is_bypassed(path) {
            return None;
        }
        Some(self.decide(path, has_session))
    }

    pub fn redirect_target(&self, decision: GateDecision) -> Option<&str> {
        match decision {
            GateDecision::Allow => None,
            GateDecision::RedirectToPublic => Some(&self.public_landing),
            GateDecision::RedirectToProtectedHome => Some(&self.protected_home),
        }
    }

    pub fn protected_home(&self) -> &str {
        &self.protected_home
    }

    pub fn public_landing(&self) -> &str {
        &self.public_landing
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
