//! Type abstractions: what the types are and how similar they are.

use crate::error::DiversityError;
use ndarray::{Array2, ArrayView2, CowArray, Ix2, NdFloat};
use num_traits::FromPrimitive;

/// What the types of a population are and how similar they are to one
/// another.
///
/// Implementors supply type names and a similarity matrix; everything the
/// diversity formulas need is derived from those through the default
/// methods. A similarity provider that reduces raw types to fewer processed
/// types (a phylogenetic tree collapsed onto its branches, say) overrides
/// [`Types::resolve_abundance`] and the processed-name accessors; the simple
/// kinds here leave raw and processed identical.
pub trait Types<F>
where
    F: NdFloat + FromPrimitive,
{
    /// Ordered names of the raw types, one per abundance row.
    fn raw_type_names(&self) -> &[String];

    /// Ordered names of the processed types similarity operates over.
    fn processed_type_names(&self) -> &[String] {
        self.raw_type_names()
    }

    /// Number of raw types.
    fn num_raw_types(&self) -> usize {
        self.raw_type_names().len()
    }

    /// Number of processed types; at most the raw-type count.
    fn num_processed_types(&self) -> usize {
        self.processed_type_names().len()
    }

    /// The resolved similarity matrix, square over the processed types.
    ///
    /// `scale` supports rescaling variants (phylogenetic branch-length
    /// scaling); the simple kinds ignore it. Implementors may memoize the
    /// matrix, which is why an owned-or-borrowed array comes back.
    fn similarity(&self, scale: F) -> CowArray<'_, F, Ix2>;

    /// Map a raw-type abundance matrix into processed-type space, returning
    /// the processed abundance and a scale factor. The default is the
    /// identity transform with factor one.
    fn resolve_abundance(&self, raw: ArrayView2<'_, F>) -> (Array2<F>, F) {
        (raw.to_owned(), F::one())
    }

    /// Similarity-weighted abundance, `Z · abundance`, one value per
    /// (processed type, subcommunity) pair. Foundational to every diversity
    /// formula.
    fn ordinariness(&self, raw: ArrayView2<'_, F>, scale: F) -> Array2<F> {
        let (processed, _) = self.resolve_abundance(raw);
        self.similarity(scale).dot(&processed)
    }

    /// Similarity rescaling factor, one for non-phylogenetic kinds.
    fn scale(&self) -> F {
        F::one()
    }

    /// Extra (name, value) output columns a reporting layer should attach to
    /// each result row for this kind of types; a phylogenetic provider
    /// reports its scale parameter here. Empty by default.
    fn extra_columns(&self) -> Vec<(&'static str, F)> {
        Vec::new()
    }
}

/// Types with no similarity structure: every type is entirely dissimilar to
/// every other, so the similarity matrix is the identity.
#[derive(Debug, Clone)]
pub struct UniqueTypes {
    names: Vec<String>,
}

impl UniqueTypes {
    /// Unique types with the given names.
    pub fn new(names: Vec<String>) -> Self {
        UniqueTypes { names }
    }

    /// `count` unique types named "1" through "count".
    pub fn numbered(count: usize) -> Self {
        UniqueTypes {
            names: (1..=count).map(|i| i.to_string()).collect(),
        }
    }
}

impl<F> Types<F> for UniqueTypes
where
    F: NdFloat + FromPrimitive,
{
    fn raw_type_names(&self) -> &[String] {
        &self.names
    }

    fn similarity(&self, _scale: F) -> CowArray<'_, F, Ix2> {
        Array2::eye(self.names.len()).into()
    }

    fn ordinariness(&self, raw: ArrayView2<'_, F>, _scale: F) -> Array2<F> {
        // Identity similarity: the product is the abundance itself.
        raw.to_owned()
    }
}

/// Types related by an explicit, caller-supplied similarity matrix.
///
/// Only the matrix's dimensions are validated; the semantic convention
/// (entries in [0, 1], unit diagonal) is the caller's responsibility.
#[derive(Debug, Clone)]
pub struct GeneralTypes<F> {
    names: Vec<String>,
    similarity: Array2<F>,
}

impl<F> GeneralTypes<F>
where
    F: NdFloat + FromPrimitive,
{
    /// Types with the given names and pairwise similarity matrix, which must
    /// be square with one row per type.
    pub fn new(names: Vec<String>, similarity: Array2<F>) -> Result<Self, DiversityError> {
        if similarity.nrows() != similarity.ncols() || similarity.nrows() != names.len() {
            return Err(DiversityError::SimilarityShape {
                rows: similarity.nrows(),
                cols: similarity.ncols(),
                types: names.len(),
            });
        }
        Ok(GeneralTypes { names, similarity })
    }
}

impl<F> Types<F> for GeneralTypes<F>
where
    F: NdFloat + FromPrimitive,
{
    fn raw_type_names(&self) -> &[String] {
        &self.names
    }

    fn similarity(&self, _scale: F) -> CowArray<'_, F, Ix2> {
        self.similarity.view().into()
    }
}
