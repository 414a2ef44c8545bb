//! Batch classification.
//!
//! [`Pipeline::validate_batch`] extracts candidates from raw text and
//! classifies them one at a time, in input order. Per candidate, the offline
//! [`DEFAULT_RULES`] run first (format, placeholder, role, disposable; first
//! hit wins), then the MX check. The MX lookup is the only await point, so at
//! most one request is in flight and progress is strictly monotonic.

mod config;
mod error;
mod rules;
mod types;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tracing::{debug, info};

pub use config::{RuleConfig, Waiver};
pub use error::BatchError;
pub use rules::{Candidate, DEFAULT_RULES, Rule, RuleCheck, first_rejection};
pub use types::{BatchOutcome, Progress, RejectReason, ValidationResult};

use crate::extract::extract;
use crate::heuristics::ReferenceData;
use crate::mx::{self, DohResolver, DomainVerifier, LookupCache, LookupMx, ResolverOptions};

/// Signals an in-flight batch to stop before its next candidate.
#[derive(Debug, Clone)]
pub struct CancelHandle(Arc<watch::Sender<bool>>);

impl CancelHandle {
    pub fn cancel(&self) {
        self.0.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.0.borrow()
    }
}

/// State owned by a single batch run: its lookup cache plus the optional
/// progress subscriber and cancel signal.
///
/// [`Pipeline::validate_batch`] builds a fresh one per call. Pass your own
/// to observe progress or to re-run a batch against a warm cache.
#[derive(Debug, Default)]
pub struct BatchContext {
    cache: LookupCache,
    progress: Option<mpsc::UnboundedSender<Progress>>,
    cancel: Option<watch::Receiver<bool>>,
}

impl BatchContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cache(mut self, cache: LookupCache) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_progress(mut self, sender: mpsc::UnboundedSender<Progress>) -> Self {
        self.progress = Some(sender);
        self
    }

    /// Arms cancellation and returns the handle that triggers it.
    pub fn cancel_handle(&mut self) -> CancelHandle {
        let (tx, rx) = watch::channel(false);
        self.cancel = Some(rx);
        CancelHandle(Arc::new(tx))
    }

    pub fn cache(&self) -> &LookupCache {
        &self.cache
    }

    pub fn into_cache(self) -> LookupCache {
        self.cache
    }
}

/// Reusable classifier: resolver, reference data and rule table.
pub struct Pipeline<R = DohResolver> {
    resolver: R,
    reference: ReferenceData,
    rules: Vec<Rule>,
    lookup_timeout: Option<Duration>,
}

impl Pipeline<DohResolver> {
    /// DoH-backed pipeline with built-in reference data.
    pub fn from_options(options: &ResolverOptions) -> Result<Self, mx::Error> {
        let resolver = DohResolver::new(options)?;
        Ok(Self::new(resolver).with_lookup_timeout(options.timeout()))
    }
}

impl<R> Pipeline<R>
where
    R: LookupMx,
{
    pub fn new(resolver: R) -> Self {
        Self {
            resolver,
            reference: ReferenceData::builtin(),
            rules: DEFAULT_RULES.to_vec(),
            lookup_timeout: None,
        }
    }

    pub fn with_reference_data(mut self, reference: ReferenceData) -> Self {
        self.reference = reference;
        self
    }

    /// Replaces the offline rule table. Keep a format rule first.
    pub fn with_rules(mut self, rules: Vec<Rule>) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_lookup_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.lookup_timeout = timeout;
        self
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    pub fn reference_data(&self) -> &ReferenceData {
        &self.reference
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Offline part of the classification, no I/O.
    pub fn check_rules(&self, address: &str, config: &RuleConfig) -> Option<RejectReason> {
        first_rejection(
            &self.rules,
            &Candidate::new(address),
            config,
            &self.reference,
        )
    }

    /// Classifies every candidate of `raw` with a fresh lookup cache.
    ///
    /// Fails only with [`BatchError::EmptyBatch`], before any lookup.
    pub async fn validate_batch(
        &self,
        raw: &str,
        config: RuleConfig,
    ) -> Result<BatchOutcome, BatchError> {
        let mut ctx = BatchContext::new();
        self.validate_batch_with(raw, config, &mut ctx).await
    }

    /// Like [`validate_batch`](Self::validate_batch) but runs inside `ctx`,
    /// reusing its cache and feeding its progress/cancel channels.
    pub async fn validate_batch_with(
        &self,
        raw: &str,
        config: RuleConfig,
        ctx: &mut BatchContext,
    ) -> Result<BatchOutcome, BatchError> {
        let candidates = extract(raw);
        if candidates.is_empty() {
            return Err(BatchError::EmptyBatch);
        }

        let total = candidates.len();
        info!(total, ?config, "batch started");

        let mut verifier =
            DomainVerifier::new(&self.resolver, &mut ctx.cache).with_timeout(self.lookup_timeout);
        let mut outcome = BatchOutcome {
            results: Vec::with_capacity(total),
            cancelled: false,
        };

        for address in candidates {
            if ctx.cancel.as_ref().is_some_and(|rx| *rx.borrow()) {
                info!(processed = outcome.results.len(), total, "batch cancelled");
                outcome.cancelled = true;
                break;
            }

            let result = self.classify(address, &config, &mut verifier).await;
            debug!(address = %result.address, valid = result.valid, reason = ?result.reason, "classified");
            outcome.results.push(result.clone());

            if let Some(tx) = &ctx.progress {
                let progress = Progress {
                    processed: outcome.results.len(),
                    total,
                    result,
                };
                if tx.send(progress).is_err() {
                    debug!("progress receiver dropped");
                }
            }
        }

        info!(
            processed = outcome.results.len(),
            valid = outcome.valid().count(),
            cancelled = outcome.cancelled,
            "batch finished"
        );
        Ok(outcome)
    }

    async fn classify(
        &self,
        address: String,
        config: &RuleConfig,
        verifier: &mut DomainVerifier<'_, R>,
    ) -> ValidationResult {
        let candidate = Candidate::new(&address);
        if let Some(reason) = first_rejection(&self.rules, &candidate, config, &self.reference) {
            return ValidationResult::rejected(address, reason);
        }
        if !verifier.has_mail_exchanger(candidate.domain).await {
            return ValidationResult::rejected(address, RejectReason::NoMailExchanger);
        }
        ValidationResult::accepted(address)
    }
}
