use std::future::Future;
use std::net::IpAddr;
use std::sync::atomic::{AtomicU16, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use log::debug;
use surge_ping::{Client, Config, ICMP, PingIdentifier, PingSequence, SurgeError};

use crate::dns_cache::DnsCache;
use crate::error::PingError;
use crate::ping::ProbeReport;

const PAYLOAD: [u8; 56] = [0; 56];

/// Sends exactly one echo request and reports what came back.
///
/// A reply that never arrives within `timeout` is a normal report with zero
/// packets received. `Err` is reserved for probes that could not be sent.
pub trait Prober: Send + Sync + 'static {
    fn probe(
        &self,
        target: &str,
        timeout: Duration,
    ) -> impl Future<Output = Result<ProbeReport, PingError>> + Send;
}

/// Keep only the characters a hostname can contain, dropping any `:port`.
/// Returns None if the result is empty.
fn sanitize_hostname(hostname: &str) -> Option<String> {
    let hostname = hostname.split(':').next().unwrap_or(hostname);

    let sanitized: String = hostname
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '.' || *c == '-')
        .collect();

    if sanitized.is_empty() {
        None
    } else {
        Some(sanitized)
    }
}

/// ICMP prober backed by `surge-ping`.
pub struct SurgeProber {
    dns_cache: Mutex<DnsCache>,
    identifier: PingIdentifier,
    sequence: AtomicU16,
}

impl Default for SurgeProber {
    fn default() -> Self {
        Self::new()
    }
}

impl SurgeProber {
    pub fn new() -> Self {
        Self {
            dns_cache: Mutex::new(DnsCache::default()),
            identifier: PingIdentifier(std::process::id() as u16),
            sequence: AtomicU16::new(0),
        }
    }

    fn cached_ip(&self, host: &str) -> Option<IpAddr> {
        self.dns_cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get_valid_ip(host)
    }

    fn remember_ip(&self, host: &str, ip: IpAddr) {
        self.dns_cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(host, ip);
    }

    async fn resolve_target(&self, target: &str) -> Result<IpAddr, PingError> {
        if let Ok(ip) = target.parse::<IpAddr>() {
            return Ok(ip);
        }

        let host = sanitize_hostname(target).ok_or_else(|| PingError::Resolve {
            host: target.to_string(),
            source: None,
        })?;

        if let Some(ip) = self.cached_ip(&host) {
            debug!("dns cache hit for {host}: {ip}");
            return Ok(ip);
        }

        let mut addrs = tokio::net::lookup_host((host.as_str(), 0))
            .await
            .map_err(|e| PingError::Resolve {
                host: host.clone(),
                source: Some(e),
            })?;
        let ip = addrs
            .next()
            .map(|addr| addr.ip())
            .ok_or_else(|| PingError::Resolve {
                host: host.clone(),
                source: None,
            })?;

        debug!("resolved {host} to {ip}");
        self.remember_ip(&host, ip);
        Ok(ip)
    }

    async fn execute_ping(&self, ip: IpAddr, timeout: Duration) -> Result<ProbeReport, PingError> {
        let config = match ip {
            IpAddr::V4(_) => Config::default(),
            IpAddr::V6(_) => Config::builder().kind(ICMP::V6).build(),
        };
        let client = Client::new(&config).map_err(PingError::Client)?;

        let mut pinger = client.pinger(ip, self.identifier).await;
        pinger.timeout(timeout);

        let seq = PingSequence(self.sequence.fetch_add(1, Ordering::Relaxed));
        match pinger.ping(seq, &PAYLOAD).await {
            Ok((_packet, rtt)) => Ok(ProbeReport::received(rtt)),
            Err(SurgeError::Timeout { .. }) => Ok(ProbeReport::lost()),
            Err(e) => Err(PingError::Send {
                target: ip.to_string(),
                reason: e.to_string(),
            }),
        }
    }
}

impl Prober for SurgeProber {
    async fn probe(&self, target: &str, timeout: Duration) -> Result<ProbeReport, PingError> {
        let ip = self.resolve_target(target).await?;
        self.execute_ping(ip, timeout).await
    }
}
