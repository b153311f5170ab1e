//! Classic diversity indices expressed through the generalised engine.
//!
//! These reproduce the familiar single-number indices as special orders of
//! the normalised alpha and gamma measures, so callers migrating from older
//! tooling get bit-identical framing for free.

use crate::error::DiversityError;
use crate::measures::{ecosystem_diversity, subcommunity_diversity, Measure};
use ndarray::{Array1, ArrayView2, NdFloat};
use num_traits::FromPrimitive;

/// Species richness of each subcommunity: normalised alpha at order zero.
pub fn richness<F>(proportions: ArrayView2<'_, F>) -> Result<Array1<F>, DiversityError>
where
    F: NdFloat + FromPrimitive,
{
    let alpha = subcommunity_diversity(
        Measure::NormalisedAlpha,
        proportions,
        &[F::zero()],
        None,
    )?;
    Ok(alpha.column(0).to_owned())
}

/// Shannon entropy of each subcommunity: the log of normalised alpha at
/// order one.
pub fn shannon<F>(proportions: ArrayView2<'_, F>) -> Result<Array1<F>, DiversityError>
where
    F: NdFloat + FromPrimitive,
{
    let alpha =
        subcommunity_diversity(Measure::NormalisedAlpha, proportions, &[F::one()], None)?;
    Ok(alpha.column(0).mapv(F::ln))
}

/// Simpson concentration of each subcommunity: the reciprocal of normalised
/// alpha at order two.
pub fn simpson<F>(proportions: ArrayView2<'_, F>) -> Result<Array1<F>, DiversityError>
where
    F: NdFloat + FromPrimitive,
{
    let two = F::one() + F::one();
    let alpha = subcommunity_diversity(Measure::NormalisedAlpha, proportions, &[two], None)?;
    Ok(alpha.column(0).mapv(F::recip))
}

/// Similarity-sensitive richness of the whole ecosystem: normalised gamma
/// at order zero.
pub fn generalised_richness<F>(
    proportions: ArrayView2<'_, F>,
    similarity: ArrayView2<'_, F>,
) -> Result<F, DiversityError>
where
    F: NdFloat + FromPrimitive,
{
    let gamma = ecosystem_diversity(
        Measure::NormalisedGamma,
        proportions,
        &[F::zero()],
        Some(similarity),
    )?;
    Ok(gamma[0])
}

/// Similarity-sensitive Shannon entropy of the whole ecosystem: the log of
/// normalised gamma at order one.
pub fn generalised_shannon<F>(
    proportions: ArrayView2<'_, F>,
    similarity: ArrayView2<'_, F>,
) -> Result<F, DiversityError>
where
    F: NdFloat + FromPrimitive,
{
    let gamma = ecosystem_diversity(
        Measure::NormalisedGamma,
        proportions,
        &[F::one()],
        Some(similarity),
    )?;
    Ok(gamma[0].ln())
}

/// Similarity-sensitive Simpson concentration of the whole ecosystem: the
/// reciprocal of normalised gamma at order two.
pub fn generalised_simpson<F>(
    proportions: ArrayView2<'_, F>,
    similarity: ArrayView2<'_, F>,
) -> Result<F, DiversityError>
where
    F: NdFloat + FromPrimitive,
{
    let two = F::one() + F::one();
    let gamma = ecosystem_diversity(
        Measure::NormalisedGamma,
        proportions,
        &[two],
        Some(similarity),
    )?;
    Ok(gamma[0].recip())
}
