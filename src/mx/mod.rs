//! Mail-exchanger verification.
//!
//! [`DomainVerifier`] answers "does this domain publish MX records?" through a
//! [`LookupMx`] backend, memoizing every verdict in a batch-scoped
//! [`LookupCache`]. The default backend is [`DohResolver`] (JSON
//! DNS-over-HTTPS); `with-system-dns` adds [`SystemResolver`].

mod cache;
mod doh;
mod error;
mod options;
mod resolver;
#[cfg(feature = "with-system-dns")]
mod system;
mod types;
mod verifier;

pub use cache::LookupCache;
pub use doh::DohResolver;
pub use error::MxError as Error;
pub use options::{DEFAULT_DOH_ENDPOINT, ResolverOptions};
pub use resolver::LookupMx;
#[cfg(feature = "with-system-dns")]
pub use system::SystemResolver;
pub use types::MX_RECORD_TYPE;
pub use verifier::DomainVerifier;

#[cfg(test)]
pub(crate) mod tests;
