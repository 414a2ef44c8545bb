use async_trait::async_trait;

use super::Error;

/// Resolver seam: answers whether an ASCII domain publishes MX records.
///
/// `Ok(false)` means the lookup succeeded and found none. Any `Err` is a
/// verification failure and is resolved fail-closed by the caller.
#[async_trait]
pub trait LookupMx: Send + Sync {
    async fn has_mx(&self, ascii_domain: &str) -> Result<bool, Error>;
}

#[async_trait]
impl<T> LookupMx for std::sync::Arc<T>
where
    T: LookupMx + ?Sized,
{
    async fn has_mx(&self, ascii_domain: &str) -> Result<bool, Error> {
        (**self).has_mx(ascii_domain).await
    }
}

/// Lowercased cache key for `domain`.
pub(crate) fn cache_key(domain: &str) -> String {
    domain.trim().to_lowercase()
}

/// Name sent on the wire: IDNA/ASCII form of the domain.
pub(crate) fn normalize_domain(domain: &str) -> Result<String, Error> {
    let trimmed = domain.trim().trim_end_matches('.');
    if trimmed.is_empty() {
        return Err(Error::EmptyDomain);
    }
    idna::domain_to_ascii(trimmed).map_err(Error::idna)
}
