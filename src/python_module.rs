//! A wrapper to allow calling qleak from Python.
//!
//! Datasets are passed as integer-coded 2D arrays (one column per
//! attribute), together with the attributes' names.
use numpy::*;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use std::collections::HashMap;

use crate::channel::from_data;
use crate::dataset::Table;
use crate::divergence::kl;

fn value_error<E: ToString>(e: E) -> PyErr {
    PyValueError::new_err(e.to_string())
}

/// qleak estimates the prior and channel of a secret attribute from a
/// table of records, and computes KL divergences between distributions.
#[pymodule(qleak)]
fn pyqleak(_py: Python, m: &PyModule) -> PyResult<()> {
    /// kl(reference, observed)
    /// --
    ///
    /// KL divergence D(observed || reference), in bits.
    ///
    /// Keyword arguments:
    /// reference : distribution compared against (e.g., the prior)
    /// observed : distribution driving the sum (e.g., a posterior)
    #[pyfn(m, "kl")]
    fn kl_py(_py: Python, reference: &PyArray1<f64>, observed: &PyArray1<f64>)
            -> PyResult<f64> {
        let reference = reference.as_array();
        let observed = observed.as_array();

        if reference.len() != observed.len() {
            return Err(value_error("distributions must be defined over the same support"));
        }
        kl(&reference, &observed).map_err(value_error)
    }

    /// from_data(data, attributes, secret, qids)
    /// --
    ///
    /// Estimate the prior of `secret` and the channel from `qids` to it.
    /// Returns (prior, observations, secrets, matrix), where the channel
    /// `matrix` has one row per QID combination in `observations` and one
    /// column per value in `secrets`.
    ///
    /// Keyword arguments:
    /// data : integer-coded records, one column per attribute
    /// attributes : names of the columns of `data`
    /// secret : name of the secret attribute
    /// qids : names of the QIDs; all other attributes if None
    #[pyfn(m, "from_data")]
    fn from_data_py(_py: Python, data: &PyArray2<i64>, attributes: Vec<String>,
                    secret: &str, qids: Option<Vec<String>>)
            -> PyResult<(HashMap<i64, f64>, Vec<Vec<i64>>, Vec<i64>, Vec<Vec<f64>>)> {
        let table = Table::new(&attributes[..], data.as_array().to_owned())
                          .map_err(value_error)?;

        let qids = qids.as_ref()
                       .map(|q| q.iter().map(|s| s.as_str()).collect::<Vec<_>>());
        let (prior, channel) = from_data(&table, secret, qids.as_deref())
                                        .map_err(value_error)?;

        let matrix = channel.matrix()
                            .outer_iter()
                            .map(|row| row.to_vec())
                            .collect();

        Ok((prior.to_map(), channel.observations().to_vec(),
            channel.secrets().to_vec(), matrix))
    }

    Ok(())
}
