//! Static-data heuristics: placeholder patterns, role accounts and disposable
//! providers.
//!
//! All three checks are pure predicates. Whether a match rejects an address
//! is decided by the pipeline from its [`RuleConfig`](crate::RuleConfig).

mod data;
mod error;

use std::collections::HashSet;
use std::path::Path;

pub use error::ReferenceDataError;

use data::{DISPOSABLE_DOMAINS, ROLE_LOCAL_PARTS, UNLIKELY_PATTERNS};

/// A read-only, case-insensitive set of reference entries.
#[derive(Debug, Clone)]
pub enum Dataset {
    Builtin(&'static phf::Set<&'static str>),
    Custom(HashSet<String>),
}

impl Dataset {
    /// Builds a custom dataset; entries are trimmed and lowercased, blanks dropped.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let set = entries
            .into_iter()
            .map(|e| e.as_ref().trim().to_ascii_lowercase())
            .filter(|e| !e.is_empty())
            .collect();
        Self::Custom(set)
    }

    /// Parses a list with one entry per line; `#` starts a comment.
    pub fn parse(text: &str) -> Self {
        Self::from_entries(
            text.lines()
                .map(|line| line.split_once('#').map_or(line, |(head, _)| head)),
        )
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ReferenceDataError> {
        let path = path.as_ref();
        let text =
            std::fs::read_to_string(path).map_err(|err| ReferenceDataError::read(path, err))?;
        let dataset = Self::parse(&text);
        tracing::debug!(path = %path.display(), entries = dataset.len(), "loaded reference list");
        Ok(dataset)
    }

    pub fn contains(&self, key: &str) -> bool {
        let key = key.to_ascii_lowercase();
        match self {
            Self::Builtin(set) => set.contains(key.as_str()),
            Self::Custom(set) => set.contains(&key),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Builtin(set) => set.len(),
            Self::Custom(set) => set.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Role-based local parts and disposable domains shared by every validation
/// of a pipeline.
#[derive(Debug, Clone)]
pub struct ReferenceData {
    roles: Dataset,
    disposable: Dataset,
}

impl Default for ReferenceData {
    fn default() -> Self {
        Self::builtin()
    }
}

impl ReferenceData {
    /// The lists compiled into the crate.
    pub fn builtin() -> Self {
        Self {
            roles: Dataset::Builtin(&ROLE_LOCAL_PARTS),
            disposable: Dataset::Builtin(&DISPOSABLE_DOMAINS),
        }
    }

    pub fn new(roles: Dataset, disposable: Dataset) -> Self {
        Self { roles, disposable }
    }

    pub fn with_roles(mut self, roles: Dataset) -> Self {
        self.roles = roles;
        self
    }

    pub fn with_disposable(mut self, disposable: Dataset) -> Self {
        self.disposable = disposable;
        self
    }

    pub fn roles(&self) -> &Dataset {
        &self.roles
    }

    pub fn disposable(&self) -> &Dataset {
        &self.disposable
    }

    pub fn is_role_based(&self, local: &str) -> bool {
        self.roles.contains(local)
    }

    pub fn is_disposable_domain(&self, domain: &str) -> bool {
        self.disposable.contains(domain)
    }
}

/// True when `local@domain` looks like a placeholder (`test@example.com`,
/// `nospam@...`). Case and punctuation never matter: only ASCII letters
/// survive before matching.
pub fn is_unlikely_valid(local: &str, domain: &str) -> bool {
    let squeezed: String = local
        .chars()
        .chain(domain.chars())
        .filter(|c| c.is_ascii_alphabetic())
        .map(|c| c.to_ascii_lowercase())
        .collect();
    UNLIKELY_PATTERNS.iter().any(|p| squeezed.contains(p))
}

/// Role-based check against the built-in list.
pub fn is_role_based(local: &str) -> bool {
    ROLE_LOCAL_PARTS.contains(local.to_ascii_lowercase().as_str())
}

/// Disposable-provider check against the built-in list.
pub fn is_disposable_domain(domain: &str) -> bool {
    DISPOSABLE_DOMAINS.contains(domain.to_ascii_lowercase().as_str())
}
