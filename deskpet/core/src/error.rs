//! Error Taxonomy
//!
//! Two families of failures cross module boundaries:
//!
//! - [`CatalogError`]: a malformed animation table. This is a fatal
//!   configuration defect caught when the catalog is validated at
//!   construction, never at runtime mid-transition.
//! - [`SurfaceError`]: the render surface could not display a frame.
//!   Recoverable: the engine logs it and substitutes the cached idle
//!   fallback frame.
//!
//! Probe failures (window enumeration, audio sampling) never surface as
//! errors at all; probes degrade to "no result" for that cycle.

use thiserror::Error;

use crate::state::PetState;

/// Defects in the static animation catalog
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// A state has no animation entry at all
    #[error("state {0:?} has no animation entry")]
    MissingEntry(PetState),

    /// A finite animation names a successor that does not exist
    #[error("successor {next:?} of {state:?} has no animation entry")]
    MissingSuccessor { state: PetState, next: PetState },

    /// Following successors from a transition state never settles
    #[error("transition chain from {state:?} does not reach a core state within {max_hops} hops")]
    UnterminatedChain { state: PetState, max_hops: usize },
}

/// Failures reported by a render surface
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SurfaceError {
    /// The referenced frame asset could not be resolved
    #[error("frame asset could not be resolved: {path}")]
    AssetUnavailable { path: String },

    /// The surface refused the frame for another reason
    #[error("surface rejected frame: {reason}")]
    Rejected { reason: String },
}
