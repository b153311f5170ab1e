//! The order-parameterised diversity measures and their general driver.

use crate::error::DiversityError;
use crate::float_tolerance;
use crate::types::Types;
use itertools::izip;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis, NdFloat};
use num_traits::FromPrimitive;
use powermean::power_mean;

/// The six subcommunity diversity measures of the Reeve et al. partitioning
/// framework: alpha, beta and gamma, each in a raw and a normalised variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Measure {
    /// Raw subcommunity alpha diversity.
    RawAlpha,
    /// Normalised subcommunity alpha diversity (ᾱ).
    NormalisedAlpha,
    /// Raw subcommunity beta diversity.
    RawBeta,
    /// Normalised subcommunity beta diversity (β̄).
    NormalisedBeta,
    /// Raw subcommunity gamma diversity.
    RawGamma,
    /// Normalised subcommunity gamma diversity (γ̄).
    NormalisedGamma,
}

impl Measure {
    /// Stable measure name for labelling result rows in reporting layers.
    pub fn name(self) -> &'static str {
        match self {
            Measure::RawAlpha => "raw alpha",
            Measure::NormalisedAlpha => "normalised alpha",
            Measure::RawBeta => "raw beta",
            Measure::NormalisedBeta => "normalised beta",
            Measure::RawGamma => "raw gamma",
            Measure::NormalisedGamma => "normalised gamma",
        }
    }

    /// Alpha and gamma are reciprocals of a power mean; beta is the mean
    /// itself.
    fn inverts_mean(self) -> bool {
        !matches!(self, Measure::RawBeta | Measure::NormalisedBeta)
    }
}

/// Flags selecting which outputs [`diversity`] computes.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiversityRequest {
    /// Compute the ecosystem-level diversity, one value per order.
    pub ecosystem: bool,
    /// Compute the per-subcommunity diversity matrix.
    pub subcommunity: bool,
    /// Report the subcommunity weights.
    pub weights: bool,
}

/// Outputs of [`diversity`]; each field is present iff it was requested.
#[derive(Debug, Clone)]
pub struct DiversityResult<F> {
    /// Ecosystem-level diversity indexed by order.
    pub ecosystem: Option<Array1<F>>,
    /// Subcommunity diversity, subcommunities × orders.
    pub subcommunity: Option<Array2<F>>,
    /// Per-subcommunity total abundance.
    pub weights: Option<Array1<F>>,
}

/// Rescale a proportions vector to sum to one if it does not already,
/// warning as we go. A zero-sum vector degenerates to NaN entries, the
/// undefined-value sentinel.
fn normalised_vector<F>(proportions: ArrayView1<'_, F>) -> Array1<F>
where
    F: NdFloat + FromPrimitive,
{
    let total = proportions.sum();
    if (total - F::one()).abs() > float_tolerance::<F>() {
        log::warn!("proportions sum to {total}, not one; rescaling");
        proportions.mapv(|v| v / total)
    } else {
        proportions.to_owned()
    }
}

/// Matrix counterpart of [`normalised_vector`]: the grand sum is rescaled
/// to one.
fn normalised_matrix<F>(proportions: ArrayView2<'_, F>) -> Array2<F>
where
    F: NdFloat + FromPrimitive,
{
    let total = proportions.sum();
    if (total - F::one()).abs() > float_tolerance::<F>() {
        log::warn!("proportions sum to {total}, not one; rescaling");
        proportions.mapv(|v| v / total)
    } else {
        proportions.to_owned()
    }
}

fn check_similarity_shape<F>(
    similarity: ArrayView2<'_, F>,
    num_types: usize,
) -> Result<(), DiversityError>
where
    F: NdFloat + FromPrimitive,
{
    if similarity.nrows() != similarity.ncols() || similarity.nrows() != num_types {
        return Err(DiversityError::SimilarityShape {
            rows: similarity.nrows(),
            cols: similarity.ncols(),
            types: num_types,
        });
    }
    Ok(())
}

/// Hill number of each order in `qs`: the effective number of equally-common
/// types, `power_mean(p, q - 1, p)^-1`.
///
/// Proportions not summing to one are rescaled with a warning first.
pub fn qd<F>(proportions: ArrayView1<'_, F>, qs: &[F]) -> Result<Array1<F>, DiversityError>
where
    F: NdFloat + FromPrimitive,
{
    let p = normalised_vector(proportions);
    qs.iter()
        .map(|&q| Ok(power_mean(p.view(), q - F::one(), p.view())?.recip()))
        .collect()
}

/// Similarity-sensitive diversity of a single population at each order:
/// `power_mean(Z·p, q - 1, p)^-1`.
///
/// With [`UniqueTypes`](crate::types::UniqueTypes) this equals [`qd`]
/// exactly, since the identity similarity leaves the proportions unchanged.
pub fn qdz<F, T>(
    proportions: ArrayView1<'_, F>,
    qs: &[F],
    types: &T,
) -> Result<Array1<F>, DiversityError>
where
    F: NdFloat + FromPrimitive,
    T: Types<F>,
{
    if proportions.len() != types.num_raw_types() {
        return Err(DiversityError::AbundanceRows {
            rows: proportions.len(),
            types: types.num_raw_types(),
        });
    }
    let p = normalised_vector(proportions);
    let column = p.view().insert_axis(Axis(1));
    let ordinariness = types.ordinariness(column, types.scale());
    qs.iter()
        .map(|&q| Ok(power_mean(ordinariness.column(0), q - F::one(), p.view())?.recip()))
        .collect()
}

/// The per-subcommunity diversity of `measure` from an abundance matrix and
/// its ordinariness, one row per subcommunity and one column per order.
///
/// With O the ordinariness matrix, ZP its row sums, w the column sums of the
/// abundance and T its grand sum, the value vector fed to the power mean of
/// order q - 1 (weighted by the subcommunity's abundance column) is:
/// O_j for raw alpha, O_j / w_j for normalised alpha, O_j / ZP for raw beta,
/// (O_j / w_j) / (ZP / T) for normalised beta, ZP for raw gamma and ZP / T
/// for normalised gamma. Alpha and gamma take the reciprocal of the mean.
pub(crate) fn subcommunity_from_ordinariness<F>(
    measure: Measure,
    abundance: ArrayView2<'_, F>,
    ordinariness: ArrayView2<'_, F>,
    qs: &[F],
) -> Result<Array2<F>, DiversityError>
where
    F: NdFloat + FromPrimitive,
{
    let meta_ordinariness = ordinariness.sum_axis(Axis(1));
    let weights = abundance.sum_axis(Axis(0));
    let total = abundance.sum();
    let mut out = Array2::zeros((abundance.ncols(), qs.len()));
    let columns = izip!(
        abundance.axis_iter(Axis(1)),
        ordinariness.axis_iter(Axis(1))
    );
    for (j, (p_j, o_j)) in columns.enumerate() {
        let w = weights[j];
        let values: Array1<F> = match measure {
            Measure::RawAlpha => o_j.to_owned(),
            Measure::NormalisedAlpha => o_j.mapv(|o| o / w),
            Measure::RawBeta => izip!(o_j, &meta_ordinariness)
                .map(|(&o, &m)| o / m)
                .collect(),
            Measure::NormalisedBeta => izip!(o_j, &meta_ordinariness)
                .map(|(&o, &m)| (o / w) / (m / total))
                .collect(),
            Measure::RawGamma => meta_ordinariness.clone(),
            Measure::NormalisedGamma => meta_ordinariness.mapv(|m| m / total),
        };
        for (k, &q) in qs.iter().enumerate() {
            let mean = power_mean(values.view(), q - F::one(), p_j)?;
            out[[j, k]] = if measure.inverts_mean() {
                mean.recip()
            } else {
                mean
            };
        }
    }
    Ok(out)
}

/// Ecosystem diversity from a subcommunity diversity matrix: per order q,
/// the power mean of order 1 - q of the subcommunity values, weighted by
/// subcommunity weight.
pub(crate) fn ecosystem_from_subcommunity<F>(
    subcommunity: ArrayView2<'_, F>,
    qs: &[F],
    weights: ArrayView1<'_, F>,
) -> Result<Array1<F>, DiversityError>
where
    F: NdFloat + FromPrimitive,
{
    qs.iter()
        .enumerate()
        .map(|(k, &q)| {
            Ok(power_mean(
                subcommunity.column(k),
                F::one() - q,
                weights,
            )?)
        })
        .collect()
}

/// Validate and normalise a proportions matrix and pair it with its
/// ordinariness under the given similarity (identity when `None`).
fn resolve_ordinariness<F>(
    proportions: ArrayView2<'_, F>,
    similarity: Option<ArrayView2<'_, F>>,
) -> Result<(Array2<F>, Array2<F>), DiversityError>
where
    F: NdFloat + FromPrimitive,
{
    if let Some(z) = similarity {
        check_similarity_shape(z, proportions.nrows())?;
    }
    let p = normalised_matrix(proportions);
    let ordinariness = match similarity {
        Some(z) => z.dot(&p),
        None => p.clone(),
    };
    Ok((p, ordinariness))
}

/// General diversity driver over a raw proportions matrix.
///
/// Computes exactly what `request` asks for: with neither diversity flag set
/// it short-circuits to the cheap weight-only computation; otherwise the
/// subcommunity diversity is computed first, then the weights, then the
/// ecosystem value from both. `similarity` of `None` means the identity
/// (every type fully distinct).
pub fn diversity<F>(
    measure: Measure,
    proportions: ArrayView2<'_, F>,
    qs: &[F],
    similarity: Option<ArrayView2<'_, F>>,
    request: DiversityRequest,
) -> Result<DiversityResult<F>, DiversityError>
where
    F: NdFloat + FromPrimitive,
{
    if !request.ecosystem && !request.subcommunity {
        if let Some(z) = similarity {
            check_similarity_shape(z, proportions.nrows())?;
        }
        let weights = request
            .weights
            .then(|| normalised_matrix(proportions).sum_axis(Axis(0)));
        return Ok(DiversityResult {
            ecosystem: None,
            subcommunity: None,
            weights,
        });
    }
    let (p, ordinariness) = resolve_ordinariness(proportions, similarity)?;
    let sub = subcommunity_from_ordinariness(measure, p.view(), ordinariness.view(), qs)?;
    let weights = p.sum_axis(Axis(0));
    let ecosystem = if request.ecosystem {
        Some(ecosystem_from_subcommunity(sub.view(), qs, weights.view())?)
    } else {
        None
    };
    Ok(DiversityResult {
        ecosystem,
        subcommunity: request.subcommunity.then_some(sub),
        weights: request.weights.then_some(weights),
    })
}

/// Per-subcommunity diversity of `measure`, subcommunities × orders.
pub fn subcommunity_diversity<F>(
    measure: Measure,
    proportions: ArrayView2<'_, F>,
    qs: &[F],
    similarity: Option<ArrayView2<'_, F>>,
) -> Result<Array2<F>, DiversityError>
where
    F: NdFloat + FromPrimitive,
{
    let (p, ordinariness) = resolve_ordinariness(proportions, similarity)?;
    subcommunity_from_ordinariness(measure, p.view(), ordinariness.view(), qs)
}

/// Ecosystem-level diversity of `measure`, one value per order.
pub fn ecosystem_diversity<F>(
    measure: Measure,
    proportions: ArrayView2<'_, F>,
    qs: &[F],
    similarity: Option<ArrayView2<'_, F>>,
) -> Result<Array1<F>, DiversityError>
where
    F: NdFloat + FromPrimitive,
{
    let (p, ordinariness) = resolve_ordinariness(proportions, similarity)?;
    let sub = subcommunity_from_ordinariness(measure, p.view(), ordinariness.view(), qs)?;
    let weights = p.sum_axis(Axis(0));
    ecosystem_from_subcommunity(sub.view(), qs, weights.view())
}

macro_rules! subcommunity_fn {
    ($(#[$doc:meta])* $name:ident, $measure:expr) => {
        $(#[$doc])*
        pub fn $name<F>(
            proportions: ArrayView2<'_, F>,
            qs: &[F],
            similarity: Option<ArrayView2<'_, F>>,
        ) -> Result<Array2<F>, DiversityError>
        where
            F: NdFloat + FromPrimitive,
        {
            subcommunity_diversity($measure, proportions, qs, similarity)
        }
    };
}

macro_rules! ecosystem_fn {
    ($(#[$doc:meta])* $name:ident, $measure:expr) => {
        $(#[$doc])*
        pub fn $name<F>(
            proportions: ArrayView2<'_, F>,
            qs: &[F],
            similarity: Option<ArrayView2<'_, F>>,
        ) -> Result<Array1<F>, DiversityError>
        where
            F: NdFloat + FromPrimitive,
        {
            ecosystem_diversity($measure, proportions, qs, similarity)
        }
    };
}

subcommunity_fn!(
    /// Raw subcommunity alpha diversity (α) per order.
    subcommunity_alpha,
    Measure::RawAlpha
);
subcommunity_fn!(
    /// Normalised subcommunity alpha diversity (ᾱ) per order.
    subcommunity_alpha_bar,
    Measure::NormalisedAlpha
);
subcommunity_fn!(
    /// Raw subcommunity beta diversity (β) per order.
    subcommunity_beta,
    Measure::RawBeta
);
subcommunity_fn!(
    /// Normalised subcommunity beta diversity (β̄) per order.
    subcommunity_beta_bar,
    Measure::NormalisedBeta
);
subcommunity_fn!(
    /// Raw subcommunity gamma diversity (γ) per order.
    subcommunity_gamma,
    Measure::RawGamma
);
subcommunity_fn!(
    /// Normalised subcommunity gamma diversity (γ̄) per order.
    subcommunity_gamma_bar,
    Measure::NormalisedGamma
);

ecosystem_fn!(
    /// Ecosystem raw alpha diversity (A) per order.
    ecosystem_a,
    Measure::RawAlpha
);
ecosystem_fn!(
    /// Ecosystem normalised alpha diversity (Ā) per order.
    ecosystem_a_bar,
    Measure::NormalisedAlpha
);
ecosystem_fn!(
    /// Ecosystem raw beta diversity (B) per order.
    ecosystem_b,
    Measure::RawBeta
);
ecosystem_fn!(
    /// Ecosystem normalised beta diversity (B̄) per order.
    ecosystem_b_bar,
    Measure::NormalisedBeta
);
ecosystem_fn!(
    /// Ecosystem raw gamma diversity (G) per order.
    ecosystem_g,
    Measure::RawGamma
);
ecosystem_fn!(
    /// Ecosystem normalised gamma diversity (Ḡ) per order.
    ecosystem_g_bar,
    Measure::NormalisedGamma
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{GeneralTypes, UniqueTypes};
    use assert_approx_eq::assert_approx_eq;
    use itertools::Itertools;
    use ndarray::{arr1, arr2};
    use std::sync::atomic::{AtomicUsize, Ordering};

    const TOL: f64 = 1e-9;

    static WARNING_COUNT: AtomicUsize = AtomicUsize::new(0);

    struct WarningCounter;

    impl log::Log for WarningCounter {
        fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
            metadata.level() <= log::Level::Warn
        }

        fn log(&self, record: &log::Record<'_>) {
            if record.level() == log::Level::Warn {
                WARNING_COUNT.fetch_add(1, Ordering::SeqCst);
            }
        }

        fn flush(&self) {}
    }

    static WARNING_LOGGER: WarningCounter = WarningCounter;

    #[test]
    fn test_qdz_with_unique_types_equals_qd() {
        let p: Array1<f64> = arr1(&[0.1, 0.2, 0.3, 0.4]);
        let qs = [-1.0, 0.0, 1.0, 2.0, f64::INFINITY];
        let types = UniqueTypes::numbered(4);
        let plain = qd(p.view(), &qs).unwrap();
        let sensitive = qdz(p.view(), &qs, &types).unwrap();
        for (a, b) in plain.iter().zip(sensitive.iter()) {
            assert_approx_eq!(a, b, TOL);
        }
    }

    #[test]
    fn test_order_one_is_exponential_shannon() {
        let p: Array1<f64> = arr1(&[0.5, 0.3, 0.2]);
        let shannon: f64 = -p.iter().map(|&x: &f64| x * x.ln()).sum::<f64>();
        let d = qd(p.view(), &[1.0]).unwrap();
        assert_approx_eq!(d[0], shannon.exp(), TOL);
        // And q -> 1 converges to the same limit from both sides.
        let near = qd(p.view(), &[1.0 - 1e-7, 1.0 + 1e-7]).unwrap();
        assert_approx_eq!(near[0], shannon.exp(), 1e-5);
        assert_approx_eq!(near[1], shannon.exp(), 1e-5);
    }

    #[test]
    fn test_order_zero_is_richness() {
        let p: Array1<f64> = arr1(&[0.5, 0.25, 0.25, 0.0]);
        let d = qd(p.view(), &[0.0]).unwrap();
        assert_approx_eq!(d[0], 3.0, TOL);
    }

    #[test]
    fn test_order_infinity_is_reciprocal_max() {
        let p: Array1<f64> = arr1(&[0.5, 0.3, 0.2]);
        let d = qd(p.view(), &[f64::INFINITY]).unwrap();
        assert_approx_eq!(d[0], 2.0, TOL);
    }

    #[test]
    fn test_hill_numbers_non_increasing_in_q() {
        let p: Array1<f64> = arr1(&[0.4, 0.3, 0.2, 0.1]);
        let qs = [
            -2.0,
            -1.0,
            0.0,
            0.5,
            1.0,
            2.0,
            5.0,
            f64::INFINITY,
        ];
        let d = qd(p.view(), &qs).unwrap();
        for (a, b) in d.iter().tuple_windows() {
            assert!(a >= b, "Hill numbers must be non-increasing in q");
        }
    }

    #[test]
    fn test_non_normalised_proportions_are_rescaled() {
        // set_logger only succeeds for the first caller in the process.
        log::set_logger(&WARNING_LOGGER).ok();
        log::set_max_level(log::LevelFilter::Warn);
        let short: Array1<f64> = arr1(&[0.2, 0.2]);
        let full: Array1<f64> = arr1(&[0.5, 0.5]);
        let before = WARNING_COUNT.load(Ordering::SeqCst);
        let a = qd(short.view(), &[1.0]).unwrap();
        assert!(
            WARNING_COUNT.load(Ordering::SeqCst) > before,
            "rescaling must emit a warning"
        );
        let b = qd(full.view(), &[1.0]).unwrap();
        assert_approx_eq!(a[0], b[0], TOL);
    }

    #[test]
    fn test_even_proportions_have_diversity_n() {
        let p: Array1<f64> = arr1(&[0.25; 4]);
        for &q in &[0.0, 1.0, 2.0, f64::INFINITY] {
            let d = qd(p.view(), &[q]).unwrap();
            assert_approx_eq!(d[0], 4.0, TOL);
        }
    }

    #[test]
    fn test_full_similarity_collapses_diversity_to_one() {
        let names = (1..=3).map(|i| i.to_string()).collect();
        let z: Array2<f64> = arr2(&[[1.0; 3]; 3]);
        let types = GeneralTypes::new(names, z).unwrap();
        let p: Array1<f64> = arr1(&[0.5, 0.3, 0.2]);
        for &q in &[0.0, 1.0, 2.0] {
            let d = qdz(p.view(), &[q], &types).unwrap();
            assert_approx_eq!(d[0], 1.0, TOL);
        }
    }

    fn even_proportions() -> Array2<f64> {
        arr2(&[[0.25, 0.125], [0.125, 0.25], [0.125, 0.125]])
    }

    #[test]
    fn test_ecosystem_a_is_weighted_power_mean_of_alphas() {
        let p = even_proportions();
        let qs = [0.0, 1.0, 2.0, f64::INFINITY];
        let alphas = subcommunity_alpha(p.view(), &qs, None).unwrap();
        let weights = p.sum_axis(Axis(0));
        let a = ecosystem_a(p.view(), &qs, None).unwrap();
        // The ecosystem value at order q is the power mean of order 1 - q of
        // the subcommunity alphas, weighted by subcommunity weight.
        for (k, &q) in qs.iter().enumerate() {
            let expected = power_mean(alphas.column(k), 1.0 - q, weights.view()).unwrap();
            assert_approx_eq!(a[k], expected, TOL);
        }
    }

    #[test]
    fn test_normalised_beta_is_one_for_identical_subcommunities() {
        // Two subcommunities with identical composition differ in nothing.
        let p: Array2<f64> = arr2(&[[0.3, 0.3], [0.2, 0.2]]);
        let beta = subcommunity_beta_bar(p.view(), &[0.0, 1.0, 2.0], None).unwrap();
        for &b in &beta {
            assert_approx_eq!(b, 1.0, TOL);
        }
        let b_bar = ecosystem_b_bar(p.view(), &[0.0, 1.0, 2.0], None).unwrap();
        for &b in &b_bar {
            assert_approx_eq!(b, 1.0, TOL);
        }
    }

    #[test]
    fn test_beta_of_identical_and_disjoint_subcommunities() {
        // Identical composition: raw beta equals the subcommunity weight.
        let same: Array2<f64> = arr2(&[[0.3, 0.3], [0.2, 0.2]]);
        let raw = subcommunity_beta(same.view(), &[1.0], None).unwrap();
        assert_approx_eq!(raw[[0, 0]], 0.5, TOL);
        assert_approx_eq!(raw[[1, 0]], 0.5, TOL);
        // Disjoint subcommunities: each is fully distinct from the whole,
        // so normalised beta sees two effective subcommunities.
        let disjoint: Array2<f64> = arr2(&[[0.5, 0.0], [0.0, 0.5]]);
        let norm = subcommunity_beta_bar(disjoint.view(), &[1.0], None).unwrap();
        assert_approx_eq!(norm[[0, 0]], 2.0, TOL);
        assert_approx_eq!(norm[[1, 0]], 2.0, TOL);
    }

    #[test]
    fn test_gamma_of_single_community_is_hill_number() {
        let p: Array2<f64> = arr2(&[[0.5], [0.3], [0.2]]);
        let gamma = subcommunity_gamma(p.view(), &[0.0, 1.0, 2.0], None).unwrap();
        let flat: Array1<f64> = arr1(&[0.5, 0.3, 0.2]);
        let hill = qd(flat.view(), &[0.0, 1.0, 2.0]).unwrap();
        for (g, h) in gamma.iter().zip(hill.iter()) {
            assert_approx_eq!(g, h, TOL);
        }
    }

    #[test]
    fn test_alpha_bar_of_even_metacommunity() {
        // Each subcommunity, normalised, has proportions summing to one over
        // three types; ᾱ at q = 0 is each one's richness.
        let p = even_proportions();
        let alpha = subcommunity_alpha_bar(p.view(), &[0.0], None).unwrap();
        assert_approx_eq!(alpha[[0, 0]], 3.0, TOL);
        assert_approx_eq!(alpha[[1, 0]], 3.0, TOL);
    }

    #[test]
    fn test_alpha_is_alpha_bar_over_weight() {
        let p = even_proportions();
        let qs = [0.0, 1.0, 2.0];
        let raw = subcommunity_alpha(p.view(), &qs, None).unwrap();
        let norm = subcommunity_alpha_bar(p.view(), &qs, None).unwrap();
        let weights = p.sum_axis(Axis(0));
        for j in 0..p.ncols() {
            for k in 0..qs.len() {
                assert_approx_eq!(raw[[j, k]], norm[[j, k]] / weights[j], TOL);
            }
        }
    }

    #[test]
    fn test_driver_weight_only_short_circuit() {
        let p = even_proportions();
        let request = DiversityRequest {
            weights: true,
            ..DiversityRequest::default()
        };
        let result = diversity(Measure::RawAlpha, p.view(), &[1.0], None, request).unwrap();
        assert!(result.ecosystem.is_none());
        assert!(result.subcommunity.is_none());
        let w = result.weights.unwrap();
        assert_approx_eq!(w[0], 0.5, TOL);
        assert_approx_eq!(w[1], 0.5, TOL);
    }

    #[test]
    fn test_driver_returns_all_requested_outputs() {
        let p = even_proportions();
        let request = DiversityRequest {
            ecosystem: true,
            subcommunity: true,
            weights: true,
        };
        let result =
            diversity(Measure::NormalisedGamma, p.view(), &[0.0, 2.0], None, request).unwrap();
        assert_eq!(result.ecosystem.unwrap().len(), 2);
        assert_eq!(result.subcommunity.unwrap().dim(), (2, 2));
        assert_eq!(result.weights.unwrap().len(), 2);
    }

    #[test]
    fn test_driver_rejects_similarity_shape() {
        let p = even_proportions();
        let z = Array2::<f64>::eye(2);
        let request = DiversityRequest {
            subcommunity: true,
            ..DiversityRequest::default()
        };
        assert!(matches!(
            diversity(Measure::RawAlpha, p.view(), &[1.0], Some(z.view()), request),
            Err(DiversityError::SimilarityShape { .. })
        ));
    }

    #[test]
    fn test_identity_similarity_changes_nothing() {
        let p = even_proportions();
        let z = Array2::<f64>::eye(3);
        let qs = [0.0, 1.0, 2.0];
        let without = subcommunity_gamma_bar(p.view(), &qs, None).unwrap();
        let with = subcommunity_gamma_bar(p.view(), &qs, Some(z.view())).unwrap();
        for (a, b) in without.iter().zip(with.iter()) {
            assert_approx_eq!(a, b, TOL);
        }
    }

    #[test]
    fn test_measure_names_are_stable() {
        assert_eq!(Measure::RawAlpha.name(), "raw alpha");
        assert_eq!(Measure::NormalisedBeta.name(), "normalised beta");
        assert_eq!(Measure::NormalisedGamma.name(), "normalised gamma");
    }

    #[test]
    fn test_empty_subcommunity_propagates_nan() {
        let p: Array2<f64> = arr2(&[[0.5, 0.0], [0.5, 0.0]]);
        let alpha = subcommunity_alpha_bar(p.view(), &[1.0], None).unwrap();
        assert!(alpha[[1, 0]].is_nan());
        // The empty subcommunity carries zero weight, so its NaN is dropped
        // from the ecosystem aggregate rather than contaminating it.
        let a_bar = ecosystem_a_bar(p.view(), &[1.0], None).unwrap();
        assert_approx_eq!(a_bar[0], 2.0, TOL);
    }
}
