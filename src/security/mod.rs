//! Trigger source authentication.
//!
//! # Data Flow
//! ```text
//! Incoming trigger:
//!     → client_ip.rs (headers in precedence order, then socket peer)
//!     → allowlist.rs (exact localhost forms OR any CIDR range)
//!         → cidr.rs (u32 mask arithmetic)
//!     → Pass to dispatcher or reject with 403
//! ```
//!
//! # Design Decisions
//! - Trust model is address-only; no payload signatures
//! - Proxy headers are trusted as sent
//! - Fail closed: unparseable addresses never match a range

pub mod allowlist;
pub mod cidr;
pub mod client_ip;

pub use allowlist::Allowlist;
pub use cidr::{in_any_range, in_range, CidrParseError, CidrRange};
pub use client_ip::{resolve_client_ip, ClientIp, UNKNOWN_CLIENT};
