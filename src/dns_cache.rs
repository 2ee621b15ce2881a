use std::collections::HashMap;
use std::net::IpAddr;
use std::time::{Duration, Instant};

pub const DNS_CACHE_TTL: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
pub struct DnsCacheEntry {
    ip_address: IpAddr,
    cached_at: Instant,
}

impl DnsCacheEntry {
    pub fn new(ip_address: IpAddr) -> Self {
        Self {
            ip_address,
            cached_at: Instant::now(),
        }
    }

    pub fn is_expired(&self, ttl: Duration) -> bool {
        self.cached_at.elapsed() > ttl
    }

    pub fn ip_address(&self) -> IpAddr {
        self.ip_address
    }
}

/// Resolved addresses keyed by the hostname the user typed.
///
/// The session re-probes every half second; without this every cycle would
/// pay for a lookup.
#[derive(Debug)]
pub struct DnsCache {
    cache: HashMap<String, DnsCacheEntry>,
    ttl: Duration,
}

impl Default for DnsCache {
    fn default() -> Self {
        Self::new(DNS_CACHE_TTL)
    }
}

impl DnsCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            cache: HashMap::new(),
            ttl,
        }
    }

    pub fn insert(&mut self, hostname: &str, ip_address: IpAddr) {
        self.cache
            .insert(hostname.to_string(), DnsCacheEntry::new(ip_address));
    }

    /// Cached address for `hostname`, evicting the entry if it has expired.
    pub fn get_valid_ip(&mut self, hostname: &str) -> Option<IpAddr> {
        let entry = self.cache.get(hostname)?;
        if entry.is_expired(self.ttl) {
            self.cache.remove(hostname);
            return None;
        }
        Some(entry.ip_address())
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}
