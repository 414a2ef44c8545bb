use std::fmt;

use serde::{Deserialize, Serialize};

/// Why a candidate was rejected. Exactly one per rejected candidate: the
/// first rule that fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    InvalidFormat,
    UnlikelyValid,
    RoleBased,
    DisposableDomain,
    NoMailExchanger,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFormat => f.write_str("invalid email format"),
            Self::UnlikelyValid => f.write_str("unlikely valid email"),
            Self::RoleBased => f.write_str("role-based email"),
            Self::DisposableDomain => f.write_str("disposable email domain"),
            Self::NoMailExchanger => f.write_str("no MX records found"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub address: String,
    pub valid: bool,
    pub reason: Option<RejectReason>,
}

impl ValidationResult {
    pub fn accepted(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            valid: true,
            reason: None,
        }
    }

    pub fn rejected(address: impl Into<String>, reason: RejectReason) -> Self {
        Self {
            address: address.into(),
            valid: false,
            reason: Some(reason),
        }
    }
}

/// Emitted once per completed candidate, in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progress {
    pub processed: usize,
    pub total: usize,
    pub result: ValidationResult,
}

impl Progress {
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.processed as f64 / self.total as f64
        }
    }
}

/// Ordered results of one batch.
///
/// `cancelled` is set when the caller aborted the run; `results` then holds
/// only the candidates finished before the abort.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchOutcome {
    pub results: Vec<ValidationResult>,
    pub cancelled: bool,
}

impl BatchOutcome {
    pub fn valid(&self) -> impl Iterator<Item = &ValidationResult> {
        self.results.iter().filter(|r| r.valid)
    }

    pub fn invalid(&self) -> impl Iterator<Item = &ValidationResult> {
        self.results.iter().filter(|r| !r.valid)
    }

    /// Valid addresses, newline separated, input order.
    pub fn valid_text(&self) -> String {
        join_addresses(self.valid())
    }

    /// Rejected addresses, newline separated, input order.
    pub fn invalid_text(&self) -> String {
        join_addresses(self.invalid())
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

fn join_addresses<'a>(rows: impl Iterator<Item = &'a ValidationResult>) -> String {
    rows.map(|r| r.address.as_str()).collect::<Vec<_>>().join("\n")
}
