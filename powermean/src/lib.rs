//! powermean
//!
//! Weighted generalized (power) means over vectors and matrices of column
//! vectors, parameterised by a real order including the limiting cases
//! order = 0 (geometric mean) and order = ±∞ (max/min).
#![deny(missing_docs)]

use itertools::izip;
use ndarray::{Array1, ArrayView1, ArrayView2, Axis, NdFloat};
use num_traits::FromPrimitive;

/// Errors from power-mean computations.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum PowerMeanError {
    /// The values and weights passed in disagree in shape.
    #[error("values and weights disagree in length: {values} vs {weights}")]
    DimensionMismatch {
        /// Number of values supplied.
        values: usize,
        /// Number of weights supplied.
        weights: usize,
    },
    /// A matrix of values and a matrix of weights disagree in column count.
    #[error("values and weights disagree in column count: {values} vs {weights}")]
    ColumnMismatch {
        /// Number of value columns supplied.
        values: usize,
        /// Number of weight columns supplied.
        weights: usize,
    },
}

/// Weighted power mean of `values` with the given real `order`.
///
/// Weights are normalised to sum to one; entries whose normalised weight is
/// approximately zero are dropped from the reduction so that a zero-weighted
/// non-finite (or zero-valued, negative-order) entry cannot poison the
/// result. A zero (or NaN) total weight yields NaN, the undefined-value
/// sentinel: callers propagate it rather than treating it as an error.
///
/// Order semantics: `+∞` is the maximum of the remaining values, `-∞` the
/// minimum, an order of approximately zero the weighted geometric mean
/// `∏ v_i^w_i`, and any other order `(Σ w_i v_i^order)^(1/order)`.
pub fn power_mean<F>(
    values: ArrayView1<'_, F>,
    order: F,
    weights: ArrayView1<'_, F>,
) -> Result<F, PowerMeanError>
where
    F: NdFloat + FromPrimitive,
{
    if values.len() != weights.len() {
        return Err(PowerMeanError::DimensionMismatch {
            values: values.len(),
            weights: weights.len(),
        });
    }
    let total = weights.sum();
    if !(total > F::zero()) {
        // Zero or NaN weight mass: undefined, propagated as NaN.
        return Ok(F::nan());
    }
    let pairs: Vec<(F, F)> = izip!(values, weights)
        .filter_map(|(&v, &w)| {
            let w = w / total;
            (w > F::epsilon()).then(|| (v, w))
        })
        .collect();

    // Float::max and Float::min discard NaN operands, so the extremum folds
    // must keep the undefined sentinel sticky once it appears.
    let result = if order == F::infinity() {
        pairs.iter().fold(F::neg_infinity(), |m, &(v, _)| {
            if m.is_nan() || v.is_nan() {
                F::nan()
            } else {
                m.max(v)
            }
        })
    } else if order == F::neg_infinity() {
        pairs.iter().fold(F::infinity(), |m, &(v, _)| {
            if m.is_nan() || v.is_nan() {
                F::nan()
            } else {
                m.min(v)
            }
        })
    } else if order.abs() <= F::epsilon() {
        pairs.iter().fold(F::one(), |acc, &(v, w)| acc * v.powf(w))
    } else {
        pairs
            .iter()
            .fold(F::zero(), |acc, &(v, w)| acc + w * v.powf(order))
            .powf(order.recip())
    };
    Ok(result)
}

/// Power mean of `values` at each of a sequence of `orders`, one result per
/// order.
pub fn power_mean_orders<F>(
    values: ArrayView1<'_, F>,
    orders: &[F],
    weights: ArrayView1<'_, F>,
) -> Result<Array1<F>, PowerMeanError>
where
    F: NdFloat + FromPrimitive,
{
    orders
        .iter()
        .map(|&order| power_mean(values, order, weights))
        .collect()
}

/// Unweighted power mean: every entry carries the same weight.
pub fn power_mean_unweighted<F>(values: ArrayView1<'_, F>, order: F) -> Result<F, PowerMeanError>
where
    F: NdFloat + FromPrimitive,
{
    let weights = Array1::ones(values.len());
    power_mean(values, order, weights.view())
}

/// Power mean applied independently per column: column i of `values` is
/// paired with column i of `weights`, returning one mean per column.
pub fn power_mean_columns<F>(
    values: ArrayView2<'_, F>,
    order: F,
    weights: ArrayView2<'_, F>,
) -> Result<Array1<F>, PowerMeanError>
where
    F: NdFloat + FromPrimitive,
{
    if values.ncols() != weights.ncols() {
        return Err(PowerMeanError::ColumnMismatch {
            values: values.ncols(),
            weights: weights.ncols(),
        });
    }
    izip!(values.axis_iter(Axis(1)), weights.axis_iter(Axis(1)))
        .map(|(v, w)| power_mean(v, order, w))
        .collect()
}
