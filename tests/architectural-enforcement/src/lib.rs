//! Architectural Enforcement Tests
//!
//! Source-level checks that keep the engine honest:
//! - No blocking sleep in production code; the driver's timer cadences
//!   are the only scheduling mechanism.
//! - The engine core stays synchronous; only the driver and the binary
//!   may touch the async runtime.

use std::path::PathBuf;

/// Root of the engine crate's source tree
pub fn core_src() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../deskpet/core/src")
}
