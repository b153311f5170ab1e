//! Abundance, types and partition composed into a single queryable entity.

use crate::error::DiversityError;
use crate::float_tolerance;
use crate::measures::{self, Measure};
use crate::partition::Partition;
use crate::types::Types;
use ndarray::{Array1, Array2, ArrayView2, Axis, NdFloat};
use num_traits::FromPrimitive;
use std::sync::OnceLock;

/// A population's abundance matrix composed with its types and partition.
///
/// Rows of the abundance matrix are types, columns are subcommunities, and
/// the whole matrix sums to one once constructed. The matrix is immutable
/// for the object's lifetime; the ordinariness accessor memoizes its result
/// on first use, with idempotent initialization so concurrent first access
/// is safe.
pub struct Metacommunity<F, T, P> {
    raw_abundance: Array2<F>,
    processed_abundance: Array2<F>,
    types: T,
    partition: P,
    ordinariness: OnceLock<Array2<F>>,
}

impl<F, T, P> Metacommunity<F, T, P>
where
    F: NdFloat + FromPrimitive,
    T: Types<F>,
    P: Partition,
{
    /// Compose an abundance matrix with its types and partition.
    ///
    /// The raw-type count must match the row count and the subcommunity
    /// count the column count. An abundance sum away from one is not an
    /// error: the matrix is rescaled to sum to one with a logged warning.
    pub fn new(abundance: Array2<F>, types: T, partition: P) -> Result<Self, DiversityError> {
        if abundance.nrows() != types.num_raw_types() {
            return Err(DiversityError::AbundanceRows {
                rows: abundance.nrows(),
                types: types.num_raw_types(),
            });
        }
        if abundance.ncols() != partition.num_subcommunities() {
            return Err(DiversityError::AbundanceColumns {
                cols: abundance.ncols(),
                subcommunities: partition.num_subcommunities(),
            });
        }
        let total = abundance.sum();
        let raw_abundance = if (total - F::one()).abs() > float_tolerance::<F>() {
            log::warn!("abundance sums to {total}, not one; rescaling");
            abundance / total
        } else {
            abundance
        };
        let (processed_abundance, _) = types.resolve_abundance(raw_abundance.view());
        if processed_abundance.nrows() != types.num_processed_types() {
            return Err(DiversityError::AbundanceRows {
                rows: processed_abundance.nrows(),
                types: types.num_processed_types(),
            });
        }
        Ok(Metacommunity {
            raw_abundance,
            processed_abundance,
            types,
            partition,
            ordinariness: OnceLock::new(),
        })
    }

    /// The abundance matrix, in raw-type or processed-type space.
    pub fn abundance(&self, raw: bool) -> ArrayView2<'_, F> {
        if raw {
            self.raw_abundance.view()
        } else {
            self.processed_abundance.view()
        }
    }

    /// Per-type total abundance across all subcommunities.
    pub fn meta_abundance(&self, raw: bool) -> Array1<F> {
        self.abundance(raw).sum_axis(Axis(1))
    }

    /// Per-subcommunity total abundance (the subcommunity weights).
    pub fn weights(&self) -> Array1<F> {
        self.processed_abundance.sum_axis(Axis(0))
    }

    /// Similarity-weighted abundance, computed once and cached.
    pub fn ordinariness(&self) -> &Array2<F> {
        self.ordinariness.get_or_init(|| {
            self.types
                .ordinariness(self.raw_abundance.view(), self.types.scale())
        })
    }

    /// Ecosystem-level ordinariness: the per-type sum of ordinariness
    /// across subcommunities.
    pub fn meta_ordinariness(&self) -> Array1<F> {
        self.ordinariness().sum_axis(Axis(1))
    }

    /// The similarity rescaling factor of the underlying types.
    pub fn scale(&self) -> F {
        self.types.scale()
    }

    /// The types abstraction this metacommunity was built over.
    pub fn types(&self) -> &T {
        &self.types
    }

    /// The partition this metacommunity was built over.
    pub fn partition(&self) -> &P {
        &self.partition
    }

    /// Per-subcommunity diversity of the given measure, one row per
    /// subcommunity and one column per order, computed through the memoized
    /// ordinariness.
    pub fn subcommunity_diversity(
        &self,
        measure: Measure,
        qs: &[F],
    ) -> Result<Array2<F>, DiversityError> {
        measures::subcommunity_from_ordinariness(
            measure,
            self.processed_abundance.view(),
            self.ordinariness().view(),
            qs,
        )
    }

    /// Ecosystem-level diversity of the given measure, one value per order:
    /// the power mean of order `1 - q` of the subcommunity diversities,
    /// weighted by subcommunity weight.
    pub fn metacommunity_diversity(
        &self,
        measure: Measure,
        qs: &[F],
    ) -> Result<Array1<F>, DiversityError> {
        let sub = self.subcommunity_diversity(measure, qs)?;
        measures::ecosystem_from_subcommunity(sub.view(), qs, self.weights().view())
    }
}

/// Whether an abundance matrix, types and partition fit together: raw-type
/// count matches the row count, processed-type count matches the resolved
/// abundance's row count, subcommunity count matches the column count, and
/// the matrix sums to approximately one.
///
/// Incompatibility is reported as `false`, never as an error; the caller
/// decides whether it is fatal. Floating-point-type agreement needs no
/// runtime check since all three share the type parameter.
pub fn check_compatibility<F, T, P>(
    abundance: ArrayView2<'_, F>,
    types: &T,
    partition: &P,
) -> bool
where
    F: NdFloat + FromPrimitive,
    T: Types<F>,
    P: Partition,
{
    types.num_raw_types() == abundance.nrows()
        && partition.num_subcommunities() == abundance.ncols()
        && types.resolve_abundance(abundance).0.nrows() == types.num_processed_types()
        && (abundance.sum() - F::one()).abs() <= float_tolerance::<F>()
}
