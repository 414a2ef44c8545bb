use async_trait::async_trait;
use reqwest::{Client, header};

use super::types::DohResponse;
use super::{Error, LookupMx, ResolverOptions};

/// MX lookups over a JSON DNS-over-HTTPS endpoint.
#[derive(Debug, Clone)]
pub struct DohResolver {
    client: Client,
    endpoint: String,
}

impl DohResolver {
    /// The client carries no request deadline of its own:
    /// [`DomainVerifier::with_timeout`](super::DomainVerifier::with_timeout)
    /// owns it, so an expired lookup surfaces as [`Error::Timeout`].
    pub fn new(options: &ResolverOptions) -> Result<Self, Error> {
        let client = Client::builder().build().map_err(Error::client_init)?;
        Ok(Self::with_client(client, options.endpoint.clone()))
    }

    /// Uses a caller-built client (proxies, custom TLS roots).
    pub fn with_client(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl LookupMx for DohResolver {
    async fn has_mx(&self, ascii_domain: &str) -> Result<bool, Error> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("name", ascii_domain), ("type", "MX")])
            .header(header::ACCEPT, "application/dns-json")
            .send()
            .await
            .map_err(|err| Error::request(ascii_domain, err))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::status(ascii_domain, status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|err| Error::request(ascii_domain, err))?;
        parse_answer(ascii_domain, &body)
    }
}

/// Interprets a DoH JSON body. A missing `Answer` section means no MX.
pub(crate) fn parse_answer(ascii_domain: &str, body: &[u8]) -> Result<bool, Error> {
    let payload: DohResponse =
        serde_json::from_slice(body).map_err(|err| Error::malformed(ascii_domain, err))?;
    if payload.status != 0 {
        tracing::debug!(domain = ascii_domain, rcode = payload.status, "non-zero DNS status");
    }
    Ok(payload.has_mx())
}
