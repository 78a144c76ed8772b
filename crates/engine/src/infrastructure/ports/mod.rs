//! Port traits for infrastructure boundaries.
//!
//! These are the only abstractions in the engine. Everything else is concrete
//! types. Ports exist for:
//! - Narrative generation (the prose source is an opaque collaborator)
//! - Clock (for testing)

mod error;
mod external;
mod testing;

// =============================================================================
// External Service Ports
// =============================================================================
pub use error::NarrativeError;
pub use external::{NarrativePort, NarrativeRequest};

#[cfg(test)]
pub use external::MockNarrativePort;

// =============================================================================
// Testing Ports
// =============================================================================
pub use testing::ClockPort;
