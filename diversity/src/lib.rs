//! diversity
//!
//! Similarity-sensitive (Hill / Rényi / Leinster-Cobbold) diversity
//! measures for populations partitioned into subcommunities, after Reeve
//! et al., "How to partition diversity". The same six measures (alpha,
//! beta and gamma, raw and normalised) and their ecosystem-level
//! aggregates run unmodified whether types are entirely distinct
//! ([`UniqueTypes`]), related by an explicit similarity matrix
//! ([`GeneralTypes`]) or supplied by an external provider implementing
//! [`Types`].
//!
//! One open behaviour carried over from prior art: proportions that do not
//! sum to one are rescaled with a logged warning rather than rejected.
//! This is convenient but can mask caller bugs; a stricter error-returning
//! mode is a candidate for a future revision.
#![deny(missing_docs)]

use ndarray::NdFloat;
use num_traits::FromPrimitive;

pub mod compat;
mod error;
pub mod measures;
pub mod metacommunity;
pub mod partition;
pub mod types;

pub use crate::error::DiversityError;
pub use crate::measures::{
    diversity, ecosystem_diversity, qd, qdz, subcommunity_diversity, DiversityRequest,
    DiversityResult, Measure,
};
pub use crate::metacommunity::{check_compatibility, Metacommunity};
pub use crate::partition::{OneCommunity, Partition, Subcommunities};
pub use crate::types::{GeneralTypes, Types, UniqueTypes};

/// Tolerance for "sums to approximately one" checks.
pub(crate) fn float_tolerance<F>() -> F
where
    F: NdFloat + FromPrimitive,
{
    F::from_f64(1e-9).unwrap()
}
