use crate::heuristics::{ReferenceData, is_unlikely_valid};
use crate::validator::{is_valid_format, split_address};

use super::{RejectReason, RuleConfig, Waiver};

/// A candidate split once for all rules.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    pub address: &'a str,
    pub local: &'a str,
    pub domain: &'a str,
}

impl<'a> Candidate<'a> {
    pub fn new(address: &'a str) -> Self {
        let (local, domain) = split_address(address);
        Self {
            address,
            local,
            domain,
        }
    }
}

pub type RuleCheck = fn(&Candidate<'_>, &ReferenceData) -> bool;

/// A named offline check. `check` returns `true` when the rule fires, i.e.
/// when the candidate must be rejected with `reason`.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    pub reason: RejectReason,
    pub waiver: Option<Waiver>,
    check: RuleCheck,
}

impl Rule {
    pub const fn new(
        name: &'static str,
        reason: RejectReason,
        waiver: Option<Waiver>,
        check: RuleCheck,
    ) -> Self {
        Self {
            name,
            reason,
            waiver,
            check,
        }
    }

    pub fn fires(&self, candidate: &Candidate<'_>, data: &ReferenceData) -> bool {
        (self.check)(candidate, data)
    }
}

/// Offline rules in evaluation order. The format rule must stay first: the
/// others assume a well-formed `local@domain` split.
pub static DEFAULT_RULES: [Rule; 4] = [
    Rule::new("format", RejectReason::InvalidFormat, None, |c, _| {
        !is_valid_format(c.address)
    }),
    Rule::new(
        "unlikely",
        RejectReason::UnlikelyValid,
        Some(Waiver::Unlikely),
        |c, _| is_unlikely_valid(c.local, c.domain),
    ),
    Rule::new(
        "role",
        RejectReason::RoleBased,
        Some(Waiver::Roles),
        |c, data| data.is_role_based(c.local),
    ),
    Rule::new(
        "disposable",
        RejectReason::DisposableDomain,
        Some(Waiver::Disposable),
        |c, data| data.is_disposable_domain(c.domain),
    ),
];

/// Short-circuit reducer: the reason of the first enabled rule that fires.
pub fn first_rejection(
    rules: &[Rule],
    candidate: &Candidate<'_>,
    config: &RuleConfig,
    data: &ReferenceData,
) -> Option<RejectReason> {
    rules
        .iter()
        .filter(|rule| !config.waives(rule.waiver))
        .find(|rule| rule.fires(candidate, data))
        .map(|rule| rule.reason)
}
