//! Kullback-Leibler divergence between discrete distributions.
//!
//! Both distributions are given as probability vectors over the same
//! support, aligned index by index (e.g., a `Prior` and a posterior
//! computed from the same `Channel`). Values are in bits.
//!
//! # Argument order
//!
//! `kl(reference, observed)` computes D(observed || reference):
//!
//! ```text
//! sum_i observed[i] * log2(observed[i] / reference[i])
//! ```
//!
//! where terms with `observed[i] == 0` contribute 0. The first argument is
//! the distribution one compares against (typically the prior), the second
//! the one driving the sum (typically a posterior).
use ndarray::prelude::*;
use serde::Deserialize;

use crate::errors::DivergenceError;

/// What to do when `reference[i] == 0` but `observed[i] != 0`,
/// in which case the divergence is infinite.
///
/// Deserializes from `"fail"` or `"propagate"` (case-insensitive on the
/// command line).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum ZeroReferencePolicy {
    /// Return `DivergenceError::ZeroReference`.
    Fail,
    /// Let the term be `f64::INFINITY`.
    Propagate,
}

/// Computes D(observed || reference) in bits.
///
/// Fails if some `reference[i]` is 0 where `observed[i]` is not.
///
/// ```
/// use ndarray::array;
/// use qleak::divergence::kl;
///
/// let prior = array![0.5, 0.5];
/// let posterior = array![1.0, 0.0];
/// assert_eq!(kl(&prior.view(), &posterior.view()), Ok(1.0));
/// ```
///
/// # Panics
///
/// If `reference` and `observed` have different lengths: the two must be
/// distributions over the same support.
pub fn kl(reference: &ArrayView1<f64>, observed: &ArrayView1<f64>)
        -> Result<f64, DivergenceError> {
    kl_with_policy(reference, observed, ZeroReferencePolicy::Fail)
}

/// Computes D(observed || reference) in bits, handling zero reference
/// probabilities according to `policy`.
pub fn kl_with_policy(reference: &ArrayView1<f64>, observed: &ArrayView1<f64>,
                      policy: ZeroReferencePolicy) -> Result<f64, DivergenceError> {
    assert_eq!(reference.len(), observed.len(),
               "distributions must be defined over the same support");

    let mut divergence = 0.;
    for (index, (&q, &p)) in reference.iter().zip(observed.iter()).enumerate() {
        if p == 0. {
            continue;
        }
        if q == 0. {
            match policy {
                ZeroReferencePolicy::Fail =>
                    return Err(DivergenceError::ZeroReference { index }),
                ZeroReferencePolicy::Propagate =>
                    return Ok(f64::INFINITY),
            }
        }
        divergence += p * (p / q).log2();
    }

    Ok(divergence)
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::from_data;
    use crate::dataset::Table;
    use float_cmp::approx_eq;
    use ndarray::array;

    #[test]
    fn test_same_distribution() {
        let p = array![0.5, 0.5];
        assert_eq!(kl(&p.view(), &p.view()), Ok(0.));

        let p = array![0.1, 0.2, 0.3, 0.4];
        assert!(approx_eq!(f64, kl(&p.view(), &p.view()).unwrap(), 0.));
    }

    #[test]
    fn test_certain_observation() {
        let reference = array![0.5, 0.5];
        let observed = array![1.0, 0.0];

        assert!(approx_eq!(f64, kl(&reference.view(), &observed.view()).unwrap(), 1.0));
    }

    #[test]
    fn test_argument_order() {
        // D(p || q) != D(q || p); the second argument drives the sum.
        let q = array![0.5, 0.25, 0.25];
        let p = array![0.25, 0.25, 0.5];

        // 0.25 * log2(0.5) + 0 + 0.5 * log2(2)
        assert!(approx_eq!(f64, kl(&q.view(), &p.view()).unwrap(), 0.25));

        let uniform = array![0.25, 0.25, 0.25, 0.25];
        let skewed = array![0.5, 0.5, 0., 0.];
        assert!(approx_eq!(f64, kl(&uniform.view(), &skewed.view()).unwrap(), 1.0));
        assert_eq!(kl(&skewed.view(), &uniform.view()),
                   Err(DivergenceError::ZeroReference { index: 2 }));
    }

    #[test]
    fn test_non_negative() {
        let distributions = vec![array![0.2, 0.3, 0.5],
                                 array![0.6, 0.3, 0.1],
                                 array![1. / 3., 1. / 3., 1. / 3.],
                                 array![0.05, 0.9, 0.05]];
        for q in &distributions {
            for p in &distributions {
                assert!(kl(&q.view(), &p.view()).unwrap() >= 0.);
            }
        }
    }

    #[test]
    fn test_zero_reference() {
        let reference = array![0.0, 1.0];
        let observed = array![0.5, 0.5];

        assert_eq!(kl(&reference.view(), &observed.view()),
                   Err(DivergenceError::ZeroReference { index: 0 }));
        assert_eq!(kl_with_policy(&reference.view(), &observed.view(),
                                  ZeroReferencePolicy::Propagate),
                   Ok(f64::INFINITY));

        // Both zero: the term vanishes.
        let reference = array![0.0, 1.0];
        let observed = array![0.0, 1.0];
        assert_eq!(kl(&reference.view(), &observed.view()), Ok(0.));
    }

    #[test]
    #[should_panic(expected = "same support")]
    fn test_length_mismatch() {
        let reference = array![0.5, 0.5];
        let observed = array![0.2, 0.3, 0.5];

        let _ = kl(&reference.view(), &observed.view());
    }

    #[test]
    fn test_prior_vs_posterior() {
        let mut records = vec![];
        records.extend(vec![vec!["A", "1"]; 3]);
        records.extend(vec![vec!["A", "2"]; 1]);
        records.extend(vec![vec!["B", "1"]; 2]);
        records.extend(vec![vec!["B", "2"]; 4]);
        let table = Table::from_records(&["secret", "qid"], records).unwrap();

        let (prior, channel) = from_data(&table, "secret", None).unwrap();
        let posterior = channel.posterior(&prior, &["1"]).unwrap();

        // Posterior is (0.6, 0.4) against a prior of (0.4, 0.6).
        let expected = 0.6 * (0.6f64 / 0.4).log2() + 0.4 * (0.4f64 / 0.6).log2();
        let gain = kl(&prior.probabilities(), &posterior.view()).unwrap();
        assert!(approx_eq!(f64, gain, expected, epsilon = 1e-12));
        assert!(gain > 0.);
    }
}
