use serde::{Deserialize, Serialize};

/// Per-run toggles. Everything defaults to `false`, the strict setting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleConfig {
    pub allow_roles: bool,
    pub allow_disposable: bool,
    pub allow_unlikely: bool,
}

/// The config flag that can switch a rule off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waiver {
    Roles,
    Disposable,
    Unlikely,
}

impl RuleConfig {
    pub fn strict() -> Self {
        Self::default()
    }

    pub fn permissive() -> Self {
        Self {
            allow_roles: true,
            allow_disposable: true,
            allow_unlikely: true,
        }
    }

    /// Whether a rule governed by `waiver` is skipped under this config.
    /// Rules without a waiver always run.
    pub fn waives(&self, waiver: Option<Waiver>) -> bool {
        match waiver {
            None => false,
            Some(Waiver::Roles) => self.allow_roles,
            Some(Waiver::Disposable) => self.allow_disposable,
            Some(Waiver::Unlikely) => self.allow_unlikely,
        }
    }
}
