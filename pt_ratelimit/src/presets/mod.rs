//! Pre-configured rate limiters for the APIs this workspace talks to
//!
//! # Supported APIs
//!
//! - **Riot Games**: per-key application limits (short and long window)

pub mod riot;
