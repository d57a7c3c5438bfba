//! Integration Tests for the Cached Dialer
//!
//! Connects through a scripted resolver to loopback listeners, covering
//! cache reuse, per-address retry, resolver-failure fallback, and IP
//! literal handling.

use std::future::Future;
use std::io;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::Once;
use std::time::Duration;

use tokio::net::TcpListener;

use dialcache::{CachedDialer, CachingResolver, DialConfig, ResolveHost};

// == Helpers ==

fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "dialcache=debug".into()),
            )
            .with(tracing_subscriber::fmt::layer().with_test_writer())
            .init();
    });
}

/// Scripted resolver that always answers with a fixed address list.
struct ScriptedResolver {
    addrs: Vec<IpAddr>,
    fail: bool,
}

impl ScriptedResolver {
    fn returning(addrs: Vec<IpAddr>) -> Self {
        Self { addrs, fail: false }
    }

    fn failing() -> Self {
        Self {
            addrs: Vec::new(),
            fail: true,
        }
    }
}

impl ResolveHost for ScriptedResolver {
    fn lookup_host(&self, _host: &str) -> impl Future<Output = io::Result<Vec<IpAddr>>> + Send {
        let answer = if self.fail {
            Err(io::Error::new(io::ErrorKind::NotFound, "no such host"))
        } else {
            Ok(self.addrs.clone())
        };
        async move { answer }
    }
}

async fn loopback_listener() -> (TcpListener, u16) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    (listener, port)
}

fn dialer_with(
    resolver: ScriptedResolver,
    timeout: Duration,
) -> CachedDialer<ScriptedResolver> {
    let resolver = CachingResolver::new(resolver, 16, Duration::from_secs(60)).unwrap();
    CachedDialer::with_resolver(resolver, timeout)
}

const LOOPBACK: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

// == Connect Tests ==

#[tokio::test]
async fn test_connect_through_scripted_resolver() {
    init_tracing();
    let (listener, port) = loopback_listener().await;
    let dialer = dialer_with(
        ScriptedResolver::returning(vec![LOOPBACK]),
        Duration::from_secs(5),
    );

    let accept = tokio::spawn(async move { listener.accept().await.unwrap().1 });
    let stream = dialer.connect(&format!("service.local:{port}")).await.unwrap();
    let peer = accept.await.unwrap();

    assert_eq!(stream.peer_addr().unwrap().port(), port);
    assert_eq!(peer.ip(), LOOPBACK);
}

#[tokio::test]
async fn test_second_dial_uses_cached_resolution() {
    init_tracing();
    let (listener, port) = loopback_listener().await;
    let dialer = dialer_with(
        ScriptedResolver::returning(vec![LOOPBACK]),
        Duration::from_secs(5),
    );

    let accept = tokio::spawn(async move {
        listener.accept().await.unwrap();
        listener.accept().await.unwrap();
    });

    let address = format!("service.local:{port}");
    dialer.connect(&address).await.unwrap();
    dialer.connect(&address).await.unwrap();
    accept.await.unwrap();

    let stats = dialer.cache_stats();
    assert_eq!(stats.hits, 1, "second dial should hit the host cache");
    assert_eq!(stats.misses, 1);
}

#[tokio::test]
async fn test_unreachable_address_falls_through_to_next() {
    init_tracing();
    let (listener, port) = loopback_listener().await;
    // 192.0.2.1 (TEST-NET-1) never answers; the attempt times out and the
    // dialer moves on to loopback.
    let unreachable: IpAddr = "192.0.2.1".parse().unwrap();
    let dialer = dialer_with(
        ScriptedResolver::returning(vec![unreachable, LOOPBACK]),
        Duration::from_millis(250),
    );

    let accept = tokio::spawn(async move { listener.accept().await.unwrap() });
    let stream = dialer.connect(&format!("service.local:{port}")).await.unwrap();
    accept.await.unwrap();

    assert_eq!(stream.peer_addr().unwrap().ip(), LOOPBACK);
}

#[tokio::test]
async fn test_resolver_failure_falls_back_to_direct_dial() {
    init_tracing();
    let (listener, port) = loopback_listener().await;
    let dialer = dialer_with(ScriptedResolver::failing(), Duration::from_secs(5));

    let accept = tokio::spawn(async move { listener.accept().await.unwrap() });
    // "localhost" still connects because the fallback hands the address to
    // the system dialer untouched.
    let stream = dialer.connect(&format!("localhost:{port}")).await.unwrap();
    accept.await.unwrap();

    assert!(stream.peer_addr().unwrap().ip().is_loopback());
}

#[tokio::test]
async fn test_ip_literal_bypasses_resolver() {
    init_tracing();
    let (listener, port) = loopback_listener().await;
    let resolver = ScriptedResolver::returning(vec![LOOPBACK]);
    let dialer = dialer_with(resolver, Duration::from_secs(5));

    let accept = tokio::spawn(async move { listener.accept().await.unwrap() });
    dialer.connect(&format!("127.0.0.1:{port}")).await.unwrap();
    accept.await.unwrap();

    let stats = dialer.cache_stats();
    assert_eq!(stats.hits + stats.misses, 0, "cache must not see IP literals");
}

#[tokio::test]
async fn test_v6_literal_address() {
    init_tracing();
    let listener = match TcpListener::bind("[::1]:0").await {
        Ok(listener) => listener,
        // Environment without IPv6 loopback
        Err(_) => return,
    };
    let port = listener.local_addr().unwrap().port();
    let dialer = CachedDialer::new(&DialConfig::default()).unwrap();

    let accept = tokio::spawn(async move { listener.accept().await.unwrap() });
    let stream = dialer.connect(&format!("[::1]:{port}")).await.unwrap();
    accept.await.unwrap();

    assert!(stream.peer_addr().unwrap().ip().is_loopback());
}

#[tokio::test]
async fn test_connection_refused_surfaces_after_fallback() {
    init_tracing();
    // Bind then drop to get a port that refuses connections.
    let (listener, port) = loopback_listener().await;
    drop(listener);

    let resolver = ScriptedResolver::returning(vec![LOOPBACK]);
    let dialer = dialer_with(resolver, Duration::from_secs(1));

    let result = dialer.connect(&format!("service.local:{port}")).await;
    assert!(result.is_err(), "dial of a closed port must fail");
    // The resolver was consulted exactly once despite attempt + fallback.
    assert_eq!(dialer.cache_stats().misses, 1);
}
