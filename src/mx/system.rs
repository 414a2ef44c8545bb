use async_trait::async_trait;
use trust_dns_resolver::TokioAsyncResolver;
use trust_dns_resolver::error::ResolveErrorKind;

use super::{Error, LookupMx};

/// MX lookups through the host's resolver configuration (`with-system-dns`).
///
/// An alternative to [`DohResolver`](super::DohResolver), never a fallback.
pub struct SystemResolver {
    inner: TokioAsyncResolver,
}

impl SystemResolver {
    pub fn from_system_conf() -> Result<Self, Error> {
        let inner = TokioAsyncResolver::tokio_from_system_conf().map_err(Error::resolver_init)?;
        Ok(Self { inner })
    }
}

#[async_trait]
impl LookupMx for SystemResolver {
    async fn has_mx(&self, ascii_domain: &str) -> Result<bool, Error> {
        match self.inner.mx_lookup(ascii_domain).await {
            Ok(lookup) => Ok(lookup.iter().next().is_some()),
            Err(err) => match err.kind() {
                ResolveErrorKind::NoRecordsFound { .. } => Ok(false),
                _ => Err(Error::lookup(ascii_domain, err)),
            },
        }
    }
}
