//! Blue-collar / white-collar classification from an email address.

use regex::Regex;
use serde::Serialize;

use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkerClass {
    /// Shop-floor account (`<digits>@<domain>`); the supervisor fills stage 1 in.
    BlueCollar,
    WhiteCollar,
}

/// Email pattern identifying blue-collar accounts.
#[derive(Debug, Clone)]
pub struct BlueCollarRule {
    domain: String,
    pattern: Regex,
}

impl BlueCollarRule {
    pub fn new(domain: &str) -> Result<Self> {
        let domain = domain.trim().to_lowercase();
        let pattern = Regex::new(&format!(r"(?i)^\d+@{}$", regex::escape(&domain)))?;
        Ok(Self { domain, pattern })
    }

    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Missing or malformed addresses classify as white-collar.
    pub fn classify(&self, email: Option<&str>) -> WorkerClass {
        match email {
            Some(email) if self.pattern.is_match(email.trim()) => WorkerClass::BlueCollar,
            _ => WorkerClass::WhiteCollar,
        }
    }

    pub fn is_blue_collar(&self, email: Option<&str>) -> bool {
        self.classify(email) == WorkerClass::BlueCollar
    }
}
