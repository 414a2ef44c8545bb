use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use mailsift::mx::DEFAULT_DOH_ENDPOINT;
use mailsift::{Dataset, ReferenceData, ResolverOptions, RuleConfig};

#[derive(Parser)]
#[command(name = "mailsift-cli", version, about = "Sort an address list into valid / invalid")]
pub struct Cli {
    /// read addresses from this file instead of stdin (one per line, `Name <addr>` ok)
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// write report to file (json/ndjson/csv)
    #[arg(long)]
    pub out: Option<String>,

    /// format: human|json|ndjson|csv
    #[arg(long, default_value = "human")]
    pub format: String,

    /// keep role accounts (admin@, support@, ...)
    #[arg(long)]
    pub allow_roles: bool,

    /// keep disposable-provider domains
    #[arg(long)]
    pub allow_disposable: bool,

    /// keep placeholder-looking addresses (test@example.com, nospam@...)
    #[arg(long)]
    pub allow_unlikely: bool,

    /// DNS-over-HTTPS JSON endpoint
    #[arg(long, default_value = DEFAULT_DOH_ENDPOINT)]
    pub endpoint: String,

    /// per-lookup timeout in ms (0 = none)
    #[arg(long = "timeout", default_value_t = 5_000)]
    pub timeout_ms: u64,

    /// replace the built-in role list (one local part per line, `#` comments)
    #[arg(long)]
    pub roles_file: Option<PathBuf>,

    /// replace the built-in disposable domain list
    #[arg(long)]
    pub disposable_file: Option<PathBuf>,

    /// no progress counter on stderr
    #[arg(long)]
    pub quiet: bool,

    /// resolve MX through the system resolver instead of DoH
    #[cfg(feature = "with-system-dns")]
    #[arg(long)]
    pub system_dns: bool,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn rule_config(&self) -> RuleConfig {
        RuleConfig {
            allow_roles: self.allow_roles,
            allow_disposable: self.allow_disposable,
            allow_unlikely: self.allow_unlikely,
        }
    }

    pub fn resolver_options(&self) -> ResolverOptions {
        ResolverOptions {
            endpoint: self.endpoint.clone(),
            timeout_ms: self.timeout_ms,
        }
    }

    pub fn reference_data(&self) -> Result<ReferenceData> {
        let mut data = ReferenceData::builtin();
        if let Some(path) = &self.roles_file {
            data = data.with_roles(Dataset::load(path).context("--roles-file")?);
        }
        if let Some(path) = &self.disposable_file {
            data = data.with_disposable(Dataset::load(path).context("--disposable-file")?);
        }
        Ok(data)
    }
}
