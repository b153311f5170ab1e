use powermean::PowerMeanError;

/// Errors raised while assembling or consuming diversity inputs.
///
/// Shape disagreements are always fatal to the call: the caller must fix its
/// inputs. Degenerate numeric situations (for instance an all-zero
/// subcommunity) are never reported here; they propagate through the
/// computation as NaN instead.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum DiversityError {
    /// The similarity matrix is not square or is not sized to the raw types.
    #[error(
        "similarity matrix is {rows}x{cols} but must be square with one \
         row per type ({types} types)"
    )]
    SimilarityShape {
        /// Rows of the supplied matrix.
        rows: usize,
        /// Columns of the supplied matrix.
        cols: usize,
        /// Number of raw types it must match.
        types: usize,
    },

    /// The abundance matrix's row count disagrees with the types.
    #[error("abundance matrix has {rows} rows but the types expect {types}")]
    AbundanceRows {
        /// Rows of the abundance matrix.
        rows: usize,
        /// Raw-type count of the types abstraction.
        types: usize,
    },

    /// The abundance matrix's column count disagrees with the partition.
    #[error(
        "abundance matrix has {cols} columns but the partition expects \
         {subcommunities} subcommunities"
    )]
    AbundanceColumns {
        /// Columns of the abundance matrix.
        cols: usize,
        /// Subcommunity count of the partition.
        subcommunities: usize,
    },

    /// A power-mean reduction rejected its inputs.
    #[error(transparent)]
    PowerMean(#[from] PowerMeanError),
}
