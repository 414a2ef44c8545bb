#![forbid(unsafe_code)]
//! mailsift — bulk classification of e-mail address lists.
//!
//! Raw text goes in, one verdict per candidate comes out: format check,
//! offline heuristics (placeholder, role account, disposable provider), then
//! an MX lookup over DNS-over-HTTPS with a per-batch cache.

pub mod extract;
pub mod heuristics;
pub mod mx;
pub mod pipeline;
pub mod validator;

pub use extract::extract;
pub use heuristics::{
    Dataset, ReferenceData, ReferenceDataError, is_disposable_domain, is_role_based,
    is_unlikely_valid,
};
pub use mx::{
    DohResolver, DomainVerifier, Error as MxError, LookupCache, LookupMx, ResolverOptions,
};
#[cfg(feature = "with-system-dns")]
pub use mx::SystemResolver;
pub use pipeline::{
    BatchContext, BatchError, BatchOutcome, CancelHandle, Pipeline, Progress, RejectReason,
    RuleConfig, ValidationResult,
};
pub use validator::{is_valid_format, split_address};
