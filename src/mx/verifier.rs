use std::time::Duration;

use tracing::{debug, warn};

use super::resolver::{cache_key, normalize_domain};
use super::{Error, LookupCache, LookupMx};

/// Cached, fail-closed MX check.
///
/// Borrows the batch's [`LookupCache`] mutably, so only one verifier can use a
/// cache at a time.
pub struct DomainVerifier<'a, R: ?Sized> {
    resolver: &'a R,
    cache: &'a mut LookupCache,
    timeout: Option<Duration>,
}

impl<'a, R> DomainVerifier<'a, R>
where
    R: LookupMx + ?Sized,
{
    pub fn new(resolver: &'a R, cache: &'a mut LookupCache) -> Self {
        Self {
            resolver,
            cache,
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// True iff `domain` publishes at least one MX record.
    ///
    /// A cache hit returns without I/O. Lookup failures (network, HTTP status,
    /// payload, timeout, IDNA) are logged and cached as `false`.
    pub async fn has_mail_exchanger(&mut self, domain: &str) -> bool {
        let key = cache_key(domain);
        if let Some(verdict) = self.cache.lookup(&key) {
            debug!(domain = %key, verdict, "MX cache hit");
            return verdict;
        }

        let verdict = match self.resolve(&key).await {
            Ok(verdict) => {
                debug!(domain = %key, verdict, "MX lookup resolved");
                verdict
            }
            Err(err) => {
                warn!(domain = %key, error = %err, "MX lookup failed, treating domain as unroutable");
                false
            }
        };
        self.cache.store(key, verdict);
        verdict
    }

    pub(crate) async fn resolve(&self, key: &str) -> Result<bool, Error> {
        let ascii = normalize_domain(key)?;
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.resolver.has_mx(&ascii))
                .await
                .map_err(|_| Error::timeout(key, limit))?,
            None => self.resolver.has_mx(&ascii).await,
        }
    }
}
