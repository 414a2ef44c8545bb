use std::time::Duration;

use thiserror::Error;

/// Reasons an MX lookup could not produce an answer.
///
/// These never leave a batch: [`DomainVerifier`](super::DomainVerifier) logs
/// them and resolves the domain as having no mail exchanger.
#[derive(Debug, Error)]
pub enum MxError {
    #[error("domain is empty")]
    EmptyDomain,
    #[error("domain IDNA conversion failed")]
    IdnaConversion {
        #[source]
        source: idna::Errors,
    },
    #[error("HTTP client initialization failed: {source}")]
    ClientInit {
        #[source]
        source: reqwest::Error,
    },
    #[error("DoH request for {domain} failed: {source}")]
    Request {
        domain: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("DoH endpoint answered HTTP {code} for {domain}")]
    Status { domain: String, code: u16 },
    #[error("malformed DoH payload for {domain}: {source}")]
    Malformed {
        domain: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("MX lookup for {domain} timed out after {}ms", .limit.as_millis())]
    Timeout { domain: String, limit: Duration },
    #[cfg(feature = "with-system-dns")]
    #[error("resolver initialization failed: {source}")]
    ResolverInit {
        #[source]
        source: trust_dns_resolver::error::ResolveError,
    },
    #[cfg(feature = "with-system-dns")]
    #[error("MX lookup for {domain} failed: {source}")]
    Lookup {
        domain: String,
        #[source]
        source: trust_dns_resolver::error::ResolveError,
    },
}

impl MxError {
    pub(crate) fn idna(source: idna::Errors) -> Self {
        Self::IdnaConversion { source }
    }

    pub(crate) fn client_init(source: reqwest::Error) -> Self {
        Self::ClientInit { source }
    }

    pub(crate) fn request(domain: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Request {
            domain: domain.into(),
            source,
        }
    }

    pub(crate) fn status(domain: impl Into<String>, code: u16) -> Self {
        Self::Status {
            domain: domain.into(),
            code,
        }
    }

    pub(crate) fn malformed(domain: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Malformed {
            domain: domain.into(),
            source,
        }
    }

    pub(crate) fn timeout(domain: impl Into<String>, limit: Duration) -> Self {
        Self::Timeout {
            domain: domain.into(),
            limit,
        }
    }

    #[cfg(feature = "with-system-dns")]
    pub(crate) fn resolver_init(source: trust_dns_resolver::error::ResolveError) -> Self {
        Self::ResolverInit { source }
    }

    #[cfg(feature = "with-system-dns")]
    pub(crate) fn lookup(
        domain: impl Into<String>,
        source: trust_dns_resolver::error::ResolveError,
    ) -> Self {
        Self::Lookup {
            domain: domain.into(),
            source,
        }
    }
}
