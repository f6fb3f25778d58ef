//! False Discovery Rate correction
//!
//! Step-up multiple-comparison correction:
//! - [`FdrMethod::Indep`]: Benjamini/Hochberg, for independent or positively
//!   correlated tests.
//! - [`FdrMethod::NegCorr`]: Benjamini/Yekutieli, for general or negatively
//!   correlated tests. The critical values are divided by the harmonic
//!   number `Σ_{i=1..n} 1/i`.
//!
//! A hypothesis at sorted position `k` (1-based) is rejected when
//! `p_(k) < ecdf(k) * alpha`; every hypothesis with a smaller p-value than
//! the largest rejected one is rejected too. Adjusted p-values are
//! `p_(k) / ecdf(k)`, made monotone from the largest rank down and clipped
//! at 1.

use std::cmp::Ordering;
use std::hash::Hash;
use std::str::FromStr;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::errors::{GeneRankError, Result};

/// Which dependence assumption the correction makes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FdrMethod {
    /// Benjamini/Hochberg
    #[default]
    Indep,
    /// Benjamini/Yekutieli
    NegCorr,
}

impl FromStr for FdrMethod {
    type Err = GeneRankError;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "i" | "indep" | "p" | "poscorr" => Ok(Self::Indep),
            "n" | "negcorr" => Ok(Self::NegCorr),
            other => Err(GeneRankError::InvalidMethod(other.to_string())),
        }
    }
}

/// Per-test outcome, in the caller's original order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FdrCorrection {
    /// `true` if the hypothesis is rejected at `alpha`
    pub reject: Vec<bool>,
    /// Adjusted p-values
    pub corrected: Vec<f64>,
}

impl FdrCorrection {
    /// Number of rejected hypotheses
    pub fn num_rejected(&self) -> usize {
        self.reject.iter().filter(|&&r| r).count()
    }
}

/// Correct `pvals` for multiple comparisons at error rate `alpha`.
pub fn fdr_correction(pvals: &[f64], alpha: f64, method: FdrMethod) -> Result<FdrCorrection> {
    if let Some((index, &value)) = pvals
        .iter()
        .enumerate()
        .find(|(_, &p)| !(0.0..=1.0).contains(&p))
    {
        return Err(GeneRankError::InvalidPValue { index, value });
    }

    let n = pvals.len();
    if n == 0 {
        return Ok(FdrCorrection {
            reject: vec![],
            corrected: vec![],
        });
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| pvals[a].partial_cmp(&pvals[b]).unwrap_or(Ordering::Equal));
    let sorted: Vec<f64> = order.iter().map(|&i| pvals[i]).collect();

    let correction: f64 = match method {
        FdrMethod::Indep => 1.0,
        FdrMethod::NegCorr => (1..=n).map(|i| 1.0 / i as f64).sum(),
    };
    let ecdf: Vec<f64> = (1..=n)
        .map(|k| k as f64 / n as f64 / correction)
        .collect();

    let mut reject: Vec<bool> = sorted
        .iter()
        .zip(&ecdf)
        .map(|(&p, &factor)| p < factor * alpha)
        .collect();
    if let Some(last) = reject.iter().rposition(|&r| r) {
        reject[..last].fill(true);
    }

    let mut adjusted: Vec<f64> = sorted
        .iter()
        .zip(&ecdf)
        .map(|(&p, &factor)| p / factor)
        .collect();
    for k in (0..n - 1).rev() {
        adjusted[k] = adjusted[k].min(adjusted[k + 1]);
    }
    for value in &mut adjusted {
        *value = value.min(1.0);
    }

    let mut out = FdrCorrection {
        reject: vec![false; n],
        corrected: vec![0.0; n],
    };
    for (k, &original) in order.iter().enumerate() {
        out.reject[original] = reject[k];
        out.corrected[original] = adjusted[k];
    }

    log_event!(
        debug,
        tests = n,
        rejected = out.num_rejected(),
        alpha,
        ?method,
        "fdr correction"
    );
    Ok(out)
}

/// Same as [`fdr_correction`] with the method given by name
/// (`"indep"`, `"negcorr"` and their short aliases).
pub fn fdr_correction_by_name(pvals: &[f64], alpha: f64, method: &str) -> Result<FdrCorrection> {
    fdr_correction(pvals, alpha, method.parse()?)
}

/// Identifiers whose test is rejected by Benjamini/Hochberg at `alpha`.
pub fn significant_ids<K, I>(p_values: I, alpha: f64) -> Result<FxHashSet<K>>
where
    K: Eq + Hash,
    I: IntoIterator<Item = (K, f64)>,
{
    let (ids, pvals): (Vec<K>, Vec<f64>) = p_values.into_iter().unzip();
    let correction = fdr_correction(&pvals, alpha, FdrMethod::Indep)?;

    Ok(ids
        .into_iter()
        .zip(correction.reject)
        .filter_map(|(id, rejected)| rejected.then_some(id))
        .collect())
}
