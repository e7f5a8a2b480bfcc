//! IPv4 CIDR range matching.
//!
//! # Responsibilities
//! - Parse `address/prefix` notation (prefix defaults to /32)
//! - Test whether an address falls inside a range
//!
//! # Design Decisions
//! - Masks are computed on `u32` so the complement never sign-extends
//! - String-level helpers are permissive: anything unparseable is "no match"
//! - IPv4 only; IPv6 literals never match a range

use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

/// Error returned when a CIDR string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CidrParseError {
    #[error("invalid IPv4 address: {0:?}")]
    Address(String),
    #[error("invalid prefix length: {0:?}")]
    Prefix(String),
}

/// A contiguous IPv4 range in CIDR notation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CidrRange {
    base: Ipv4Addr,
    prefix: u8,
}

impl CidrRange {
    /// Create a range. Prefixes above 32 are rejected.
    pub fn new(base: Ipv4Addr, prefix: u8) -> Result<Self, CidrParseError> {
        if prefix > 32 {
            return Err(CidrParseError::Prefix(prefix.to_string()));
        }
        Ok(Self { base, prefix })
    }

    /// A single-host range (/32).
    pub fn host(base: Ipv4Addr) -> Self {
        Self { base, prefix: 32 }
    }

    pub fn base(&self) -> Ipv4Addr {
        self.base
    }

    pub fn prefix(&self) -> u8 {
        self.prefix
    }

    /// Network mask for this prefix.
    ///
    /// `wildcard = 2^(32 - prefix) - 1`, `netmask = !wildcard`, all in `u32`.
    pub fn netmask(&self) -> u32 {
        let wildcard = u32::MAX.checked_shr(u32::from(self.prefix)).unwrap_or(0);
        !wildcard
    }

    /// Returns true if `ip` lies inside this range.
    pub fn contains(&self, ip: Ipv4Addr) -> bool {
        let mask = self.netmask();
        (u32::from(ip) & mask) == (u32::from(self.base) & mask)
    }
}

impl FromStr for CidrRange {
    type Err = CidrParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (addr, prefix) = match s.split_once('/') {
            Some((addr, prefix)) => {
                let prefix: u8 = prefix
                    .parse()
                    .map_err(|_| CidrParseError::Prefix(prefix.to_string()))?;
                (addr, prefix)
            }
            None => (s, 32),
        };

        let base: Ipv4Addr = addr
            .parse()
            .map_err(|_| CidrParseError::Address(addr.to_string()))?;

        Self::new(base, prefix)
    }
}

impl fmt::Display for CidrRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.prefix)
    }
}

/// Check whether `ip` falls inside `range` (CIDR notation, prefix optional).
///
/// A malformed address or range yields `false` rather than an error.
pub fn in_range(ip: &str, range: &str) -> bool {
    let Ok(ip) = ip.parse::<Ipv4Addr>() else {
        return false;
    };
    range
        .parse::<CidrRange>()
        .map(|r| r.contains(ip))
        .unwrap_or(false)
}

/// Short-circuiting OR of [`in_range`] over several ranges.
pub fn in_any_range<S: AsRef<str>>(ip: &str, ranges: &[S]) -> bool {
    ranges.iter().any(|range| in_range(ip, range.as_ref()))
}
