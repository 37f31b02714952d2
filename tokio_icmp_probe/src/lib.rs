//! A single-destination ICMP echo probe.
//!
//! A [`Session`] sends one Echo Request per interval to a target, matches Echo Replies
//! against a fixed table of outstanding probes and reports loss and latency once it is
//! stopped.

pub mod config;
pub mod error;
pub mod net;
pub mod ping;
pub mod session;

pub use config::SessionConfig;
pub use error::{DecodeError, Error, Result};
pub use net::{RawSocket, Transport};
pub use session::{Session, Statistics};
