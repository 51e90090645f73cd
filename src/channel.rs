//! Prior and channel matrix of a secret attribute, estimated from data.
//!
//! Given a dataset, a secret attribute and a set of quasi-identifiers
//! (QIDs), the prior is the empirical distribution of the secret, and the
//! channel gives, for each secret value x and each observed QID
//! combination y, the empirical conditional probability P(y | x).
//!
//! Both secret values and QID combinations are enumerated in ascending
//! order, and the channel is stored as a dense |Y| x |X| matrix; pairs
//! (y, x) that never occur together have probability 0.
use itertools::Itertools;
use float_cmp::approx_eq;
use log::{debug, trace};
use ndarray::prelude::*;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

use crate::dataset::Dataset;
use crate::errors::ChannelError;

/// Empirical distribution of the secret attribute.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prior<V> {
    secrets: Vec<V>,
    probabilities: Array1<f64>,
}

impl<V: Ord> Prior<V> {
    /// Secret values, in ascending order.
    pub fn secrets(&self) -> &[V] {
        &self.secrets
    }

    /// Probabilities, aligned with `secrets()`.
    pub fn probabilities(&self) -> ArrayView1<'_, f64> {
        self.probabilities.view()
    }

    pub fn index_of(&self, x: &V) -> Option<usize> {
        self.secrets.binary_search(x).ok()
    }

    /// Probability of secret value `x`, if it was observed.
    pub fn get(&self, x: &V) -> Option<f64> {
        self.index_of(x).map(|i| self.probabilities[i])
    }

    pub fn len(&self) -> usize {
        self.secrets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.secrets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&V, f64)> {
        self.secrets.iter().zip(self.probabilities.iter().cloned())
    }

    pub fn to_map(&self) -> HashMap<V, f64>
            where V: Clone + std::hash::Hash {
        self.iter()
            .map(|(x, p)| (x.clone(), p))
            .collect()
    }
}

/// Conditional probabilities P(y | x) of observing QID combination y
/// given secret value x.
///
/// Rows are indexed by QID combinations, columns by secret values.
/// Every column sums to 1.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Channel<V> {
    qids: Vec<String>,
    secrets: Vec<V>,
    observations: Vec<Vec<V>>,
    matrix: Array2<f64>,
}

impl<V: Ord> Channel<V> {
    /// Names of the QID attributes, in the order their values appear
    /// within an observation.
    pub fn qids(&self) -> &[String] {
        &self.qids
    }

    /// Secret values (columns), in ascending order.
    pub fn secrets(&self) -> &[V] {
        &self.secrets
    }

    /// QID combinations (rows), in ascending order.
    pub fn observations(&self) -> &[Vec<V>] {
        &self.observations
    }

    pub fn matrix(&self) -> ArrayView2<'_, f64> {
        self.matrix.view()
    }

    pub fn secret_index(&self, x: &V) -> Option<usize> {
        self.secrets.binary_search(x).ok()
    }

    pub fn observation_index(&self, y: &[V]) -> Option<usize> {
        self.observations
            .binary_search_by(|o| o.as_slice().cmp(y))
            .ok()
    }

    /// Returns P(y | x), or `None` if either `y` or `x` never occurred.
    pub fn get(&self, y: &[V], x: &V) -> Option<f64> {
        let i = self.observation_index(y)?;
        let j = self.secret_index(x)?;
        Some(self.matrix[[i, j]])
    }

    /// P(y | x) for every secret value x.
    pub fn row(&self, y: &[V]) -> Option<ArrayView1<'_, f64>> {
        self.observation_index(y)
            .map(|i| self.matrix.row(i))
    }

    /// Distribution over QID combinations given secret value `x`.
    pub fn column(&self, x: &V) -> Option<ArrayView1<'_, f64>> {
        self.secret_index(x)
            .map(|j| self.matrix.column(j))
    }

    /// Computes the posterior P(x | y) of the secret after observing `y`,
    /// aligned with `secrets()`.
    pub fn posterior(&self, prior: &Prior<V>, y: &[V])
            -> Result<Array1<f64>, ChannelError> {
        if prior.secrets() != self.secrets() {
            return Err(ChannelError::DomainMismatch);
        }
        let i = self.observation_index(y)
                    .ok_or(ChannelError::UnknownObservation)?;

        let joint = &prior.probabilities() * &self.matrix.row(i);
        let marginal = joint.sum();
        // Every observation in the channel occurred with some secret of
        // positive prior.
        assert!(!approx_eq!(f64, marginal, 0.),
                "observation has zero marginal probability");

        Ok(joint / marginal)
    }
}

/// Builds the prior and channel of a dataset.
///
/// By default, every attribute but the secret is a QID; this models an
/// adversary who knows all the attributes of a record except the secret.
#[derive(Debug, Clone)]
pub struct ChannelBuilder {
    secret: String,
    qids: Option<Vec<String>>,
}

impl ChannelBuilder {
    pub fn new(secret: &str) -> ChannelBuilder {
        ChannelBuilder {
            secret: secret.to_string(),
            qids: None,
        }
    }

    /// Restricts the QIDs to the given attributes.
    pub fn qids<S: AsRef<str>>(mut self, qids: &[S]) -> ChannelBuilder {
        self.qids = Some(qids.iter()
                             .map(|q| q.as_ref().to_string())
                             .collect());
        self
    }

    /// Returns the column index of the secret and of each QID.
    fn resolve<D: Dataset>(&self, dataset: &D)
            -> Result<(usize, Vec<usize>), ChannelError> {
        let s = dataset.attribute_index(&self.secret)
                       .ok_or_else(|| ChannelError::UnknownAttribute(self.secret.clone()))?;

        let qids: Vec<usize> = match &self.qids {
            None => (0..dataset.attributes().len())
                        .filter(|&j| j != s)
                        .collect(),
            Some(names) => {
                let mut seen = HashSet::new();
                names.iter()
                     .map(|name| {
                         if *name == self.secret {
                             return Err(ChannelError::SecretInQids(name.clone()));
                         }
                         let j = dataset.attribute_index(name)
                                        .ok_or_else(|| ChannelError::UnknownAttribute(name.clone()))?;
                         if !seen.insert(j) {
                             return Err(ChannelError::DuplicateAttribute(name.clone()));
                         }
                         Ok(j)
                     })
                     .collect::<Result<Vec<_>, _>>()?
            },
        };

        Ok((s, qids))
    }

    pub fn build<D: Dataset>(&self, dataset: &D)
            -> Result<(Prior<D::Value>, Channel<D::Value>), ChannelError> {
        let (s, qids) = self.resolve(dataset)?;

        let n = dataset.total_count();
        if n == 0 {
            return Err(ChannelError::EmptyDataset);
        }

        let count_x = dataset.count_by_attribute(&self.secret)?;

        // Count each (y, x) pair. Distinct records that only differ on
        // attributes outside the QIDs collapse into the same pair.
        let mut count_yx: HashMap<(Vec<D::Value>, D::Value), usize> = HashMap::new();
        for (record, count) in dataset.distinct_rows() {
            let y = qids.iter()
                        .map(|&j| record[j].clone())
                        .collect::<Vec<_>>();
            let x = record[s].clone();
            trace!("record {:?} -> y = {:?}, x = {:?} ({} times)", record, y, x, count);
            *count_yx.entry((y, x)).or_insert(0) += count;
        }

        let secrets = count_x.keys()
                             .cloned()
                             .sorted()
                             .collect::<Vec<_>>();
        let observations = count_yx.keys()
                                   .map(|(y, _)| y.clone())
                                   .unique()
                                   .sorted()
                                   .collect::<Vec<_>>();
        debug!("{} records: {} secret values, {} QID combinations",
               n, secrets.len(), observations.len());

        let secret_id: HashMap<&D::Value, usize> = secrets.iter()
                                                          .enumerate()
                                                          .map(|(j, x)| (x, j))
                                                          .collect();
        let observation_id: HashMap<&Vec<D::Value>, usize> = observations.iter()
                                                                         .enumerate()
                                                                         .map(|(i, y)| (y, i))
                                                                         .collect();

        let mut matrix = Array2::<f64>::zeros((observations.len(), secrets.len()));
        for ((y, x), count) in &count_yx {
            matrix[[observation_id[y], secret_id[x]]] = *count as f64 / count_x[x] as f64;
        }

        let probabilities = secrets.iter()
                                   .map(|x| count_x[x] as f64 / n as f64)
                                   .collect::<Array1<f64>>();

        let qid_names = qids.iter()
                            .map(|&j| dataset.attributes()[j].clone())
                            .collect();

        let prior = Prior {
            secrets: secrets.clone(),
            probabilities,
        };
        let channel = Channel {
            qids: qid_names,
            secrets,
            observations,
            matrix,
        };

        Ok((prior, channel))
    }
}

/// Estimates the prior of `secret` and the channel from `qids` (all the
/// other attributes if `None`) to it.
pub fn from_data<D: Dataset>(dataset: &D, secret: &str, qids: Option<&[&str]>)
        -> Result<(Prior<D::Value>, Channel<D::Value>), ChannelError> {
    let builder = ChannelBuilder::new(secret);
    match qids {
        Some(qids) => builder.qids(qids).build(dataset),
        None => builder.build(dataset),
    }
}
