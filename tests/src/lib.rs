//! # Sortic Hub Test Suite
//!
//! Unified test crate exercising the communication controller through the
//! real runtime adapters (command bus, in-memory broker), end to end.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── negotiation.rs   # Box reservation happy paths and fallbacks
//!     ├── recovery.rs      # Fault, resume, and reset flows
//!     └── scheduler.rs     # Runtime tick loop against the wall clock
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p sortic-tests
//! ```

pub mod integration;
