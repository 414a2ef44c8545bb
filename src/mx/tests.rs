use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use super::doh::parse_answer;
use super::resolver::normalize_domain;
use super::{DohResolver, DomainVerifier, Error, LookupCache, LookupMx};

type LookupFn = dyn Fn(&str) -> Result<bool, Error> + Send + Sync;

pub(crate) struct StubResolver {
    on_lookup: Box<LookupFn>,
    calls: AtomicUsize,
    seen: std::sync::Mutex<Vec<String>>,
}

impl StubResolver {
    pub(crate) fn new<F>(f: F) -> Self
    where
        F: Fn(&str) -> Result<bool, Error> + Send + Sync + 'static,
    {
        Self {
            on_lookup: Box::new(f),
            calls: AtomicUsize::new(0),
            seen: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// Every listed domain has MX records, everything else has none.
    pub(crate) fn with_mx(domains: &'static [&'static str]) -> Self {
        Self::new(move |domain| Ok(domains.iter().any(|d| *d == domain)))
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn seen(&self) -> Vec<String> {
        self.seen.lock().expect("lock").clone()
    }
}

#[async_trait]
impl LookupMx for StubResolver {
    async fn has_mx(&self, ascii_domain: &str) -> Result<bool, Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().expect("lock").push(ascii_domain.to_string());
        (self.on_lookup)(ascii_domain)
    }
}

struct SlowResolver;

#[async_trait]
impl LookupMx for SlowResolver {
    async fn has_mx(&self, _ascii_domain: &str) -> Result<bool, Error> {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Ok(true)
    }
}

#[tokio::test]
async fn second_lookup_is_served_from_cache() {
    let stub = StubResolver::with_mx(&["real.com"]);
    let mut cache = LookupCache::new();
    let mut verifier = DomainVerifier::new(&stub, &mut cache);

    assert!(verifier.has_mail_exchanger("real.com").await);
    assert!(verifier.has_mail_exchanger("real.com").await);
    assert!(!verifier.has_mail_exchanger("nomx.org").await);
    assert!(!verifier.has_mail_exchanger("nomx.org").await);

    assert_eq!(stub.calls(), 2);
    assert_eq!(cache.len(), 2);
    assert_eq!(cache.hits(), 2);
    assert_eq!(cache.misses(), 2);
    assert_eq!(cache.peek("real.com"), Some(true));
    assert_eq!(cache.peek("nomx.org"), Some(false));
}

#[tokio::test]
async fn cache_key_is_case_insensitive() {
    let stub = StubResolver::with_mx(&["real.com"]);
    let mut cache = LookupCache::new();
    let mut verifier = DomainVerifier::new(&stub, &mut cache);

    assert!(verifier.has_mail_exchanger("Real.COM").await);
    assert!(verifier.has_mail_exchanger("real.com").await);
    assert_eq!(stub.calls(), 1);
    assert_eq!(stub.seen(), vec!["real.com"]);
    assert_eq!(cache.peek("REAL.com"), Some(true));
}

#[tokio::test]
async fn resolver_failure_fails_closed_and_is_cached() {
    let stub = StubResolver::new(|domain| Err(Error::status(domain, 503)));
    let mut cache = LookupCache::new();
    let mut verifier = DomainVerifier::new(&stub, &mut cache);

    assert!(!verifier.has_mail_exchanger("flaky.net").await);
    assert!(!verifier.has_mail_exchanger("flaky.net").await);
    assert_eq!(stub.calls(), 1);
    assert_eq!(cache.peek("flaky.net"), Some(false));
}

#[tokio::test]
async fn timeout_fails_closed() {
    let mut cache = LookupCache::new();
    let mut verifier = DomainVerifier::new(&SlowResolver, &mut cache)
        .with_timeout(Some(Duration::from_millis(20)));

    assert!(!verifier.has_mail_exchanger("slow.io").await);
    assert_eq!(cache.peek("slow.io"), Some(false));
}

#[tokio::test]
async fn idn_domain_is_queried_in_ascii_form() {
    let stub = StubResolver::with_mx(&["xn--bcher-kva.example"]);
    let mut cache = LookupCache::new();
    let mut verifier = DomainVerifier::new(&stub, &mut cache);

    assert!(verifier.has_mail_exchanger("Bücher.example").await);
    assert_eq!(stub.seen(), vec!["xn--bcher-kva.example"]);
    assert_eq!(cache.peek("bücher.example"), Some(true));
}

#[tokio::test]
async fn empty_domain_never_reaches_resolver() {
    let stub = StubResolver::with_mx(&[]);
    let mut cache = LookupCache::new();
    let mut verifier = DomainVerifier::new(&stub, &mut cache);

    assert!(!verifier.has_mail_exchanger("  ").await);
    assert_eq!(stub.calls(), 0);
}

#[tokio::test]
async fn shared_resolver_through_arc() {
    let stub = Arc::new(StubResolver::with_mx(&["real.com"]));
    let mut cache = LookupCache::new();
    let mut verifier = DomainVerifier::new(&stub, &mut cache);
    assert!(verifier.has_mail_exchanger("real.com").await);
    assert_eq!(stub.calls(), 1);
}

#[test]
fn normalize_domain_rejects_empty() {
    let err = normalize_domain("").expect_err("empty domain should fail");
    assert!(matches!(err, Error::EmptyDomain));
}

#[test]
fn normalize_domain_strips_trailing_dot() {
    assert_eq!(normalize_domain("real.com.").expect("ascii"), "real.com");
}

#[test]
fn answer_with_mx_record() {
    let body = br#"{"Status":0,"Answer":[
        {"name":"real.com.","type":15,"TTL":300,"data":"10 mx1.real.com."},
        {"name":"real.com.","type":15,"TTL":300,"data":"20 mx2.real.com."}]}"#;
    assert!(parse_answer("real.com", body).expect("valid payload"));
}

#[test]
fn answer_without_mx_records() {
    let cname_only = br#"{"Status":0,"Answer":[{"name":"a.com.","type":5,"data":"b.com."}]}"#;
    assert!(!parse_answer("a.com", cname_only).expect("valid payload"));

    let nxdomain = br#"{"Status":3,"Authority":[{"name":"com.","type":6}]}"#;
    assert!(!parse_answer("nope.com", nxdomain).expect("valid payload"));
}

#[test]
fn malformed_answer_is_an_error() {
    let err = parse_answer("real.com", b"<html>oops</html>").expect_err("not json");
    assert!(matches!(err, Error::Malformed { .. }));

    let err = parse_answer("real.com", br#"{"Answer":[{"type":"MX"}]}"#).expect_err("bad type");
    assert!(matches!(err, Error::Malformed { .. }));
}

/// Serves one canned HTTP response and hands back the raw request head.
async fn serve_once(status: &'static str, body: &'static str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.expect("accept");
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut buf).await.expect("read");
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }
        let response = format!(
            "HTTP/1.1 {status}\r\ncontent-type: application/dns-json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.expect("write");
        socket.shutdown().await.ok();
        String::from_utf8_lossy(&request).into_owned()
    });
    (format!("http://{addr}/resolve"), handle)
}

fn local_resolver(endpoint: String) -> DohResolver {
    let client = reqwest::Client::builder()
        .no_proxy()
        .build()
        .expect("client");
    DohResolver::with_client(client, endpoint)
}

#[tokio::test]
async fn doh_query_carries_name_and_type() {
    let (url, server) = serve_once("200 OK", r#"{"Status":0,"Answer":[{"type":15}]}"#).await;
    let resolver = local_resolver(url);

    assert!(resolver.has_mx("real.com").await.expect("lookup succeeds"));

    let request = server.await.expect("server task");
    let request_line = request.lines().next().expect("request line");
    assert!(request_line.starts_with("GET /resolve?"), "{request_line}");
    assert!(request_line.contains("name=real.com"), "{request_line}");
    assert!(request_line.contains("type=MX"), "{request_line}");
    assert!(
        request
            .to_ascii_lowercase()
            .contains("accept: application/dns-json")
    );
}

#[tokio::test]
async fn doh_non_success_status_is_an_error() {
    let (url, server) = serve_once("503 Service Unavailable", "").await;
    let resolver = local_resolver(url);

    let err = resolver.has_mx("real.com").await.expect_err("503");
    assert!(matches!(err, Error::Status { code: 503, .. }), "{err}");
    server.await.expect("server task");
}

#[tokio::test]
async fn doh_malformed_body_is_an_error() {
    let (url, server) = serve_once("200 OK", "{not json").await;
    let resolver = local_resolver(url);

    let err = resolver.has_mx("real.com").await.expect_err("malformed");
    assert!(matches!(err, Error::Malformed { .. }), "{err}");
    server.await.expect("server task");
}

#[tokio::test]
async fn stalled_endpoint_reports_timeout() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let server = tokio::spawn(async move {
        let (socket, _) = listener.accept().await.expect("accept");
        tokio::time::sleep(Duration::from_secs(5)).await;
        drop(socket);
    });

    let resolver = local_resolver(format!("http://{addr}/resolve"));
    let mut cache = LookupCache::new();
    let verifier =
        DomainVerifier::new(&resolver, &mut cache).with_timeout(Some(Duration::from_millis(50)));
    let err = verifier.resolve("real.com").await.expect_err("stalled");
    assert!(
        matches!(err, Error::Timeout { ref domain, limit } if domain == "real.com" && limit == Duration::from_millis(50)),
        "{err}"
    );
    server.abort();
}

#[tokio::test]
async fn unreachable_endpoint_fails_closed_through_verifier() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let resolver = local_resolver(format!("http://{addr}/resolve"));
    let mut cache = LookupCache::new();
    let mut verifier = DomainVerifier::new(&resolver, &mut cache);
    assert!(!verifier.has_mail_exchanger("real.com").await);
    assert_eq!(cache.peek("real.com"), Some(false));
}
