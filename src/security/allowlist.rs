//! Source address allowlist for trigger requests.

use std::net::Ipv4Addr;

use crate::config::AllowlistConfig;
use crate::security::cidr::{CidrParseError, CidrRange};

/// Loopback forms accepted verbatim.
pub const LOCALHOST_ADDRESSES: [&str; 2] = ["::1", "127.0.0.1"];

/// Bitbucket webhook sender ranges.
pub const BITBUCKET_RANGES: [&str; 3] = ["131.103.20.160/27", "165.254.145.0/26", "104.192.143.0/24"];

/// GitHub webhook sender ranges.
pub const GITHUB_RANGES: [&str; 1] = ["192.30.252.0/22"];

/// Addresses allowed to trigger deployments.
///
/// A client is allowed if its address equals one of the exact entries or
/// falls in any of the ranges.
#[derive(Debug, Clone)]
pub struct Allowlist {
    exact: Vec<String>,
    ranges: Vec<CidrRange>,
}

impl Allowlist {
    pub fn new(exact: Vec<String>, ranges: Vec<CidrRange>) -> Self {
        Self { exact, ranges }
    }

    /// Build from configuration. Fails on the first unparseable range.
    pub fn from_config(config: &AllowlistConfig) -> Result<Self, CidrParseError> {
        let ranges = config
            .ranges
            .iter()
            .map(|r| r.parse::<CidrRange>())
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::new(config.exact.clone(), ranges))
    }

    pub fn is_allowed(&self, ip: &str) -> bool {
        if self.exact.iter().any(|e| e == ip) {
            return true;
        }

        match ip.parse::<Ipv4Addr>() {
            Ok(addr) => self.ranges.iter().any(|r| r.contains(addr)),
            Err(_) => false,
        }
    }

    pub fn ranges(&self) -> &[CidrRange] {
        &self.ranges
    }
}

impl Default for Allowlist {
    fn default() -> Self {
        let exact = LOCALHOST_ADDRESSES.iter().map(|s| s.to_string()).collect();
        let ranges = BITBUCKET_RANGES
            .iter()
            .chain(GITHUB_RANGES.iter())
            .filter_map(|r| r.parse().ok())
            .collect();
        Self::new(exact, ranges)
    }
}
