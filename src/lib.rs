//! qleak builds a probabilistic model of how much a table of records
//! leaks about one of its attributes, and measures information gain
//! between distributions.
//!
//! Given a dataset, a _secret_ attribute and a set of _quasi-identifiers_
//! (QIDs, the attributes an adversary is assumed to know), it computes:
//!
//! - the prior distribution of the secret;
//! - the channel matrix, giving for each secret value x and each
//!   observed combination y of QID values the conditional probability
//!   P(y | x).
//!
//! When no QIDs are specified, every attribute except the secret is
//! considered known to the adversary.
//!
//! Separately, `divergence::kl()` computes the Kullback-Leibler divergence
//! (in bits) between two distributions over the same support, for example
//! between the prior and a posterior obtained from the channel.
//!
//! # Example
//!
//! ```
//! use qleak::channel::from_data;
//! use qleak::dataset::Table;
//! use qleak::divergence::kl;
//!
//! let table = Table::from_records(&["zip", "disease"],
//!                                 vec![vec![100, 0], vec![100, 1],
//!                                      vec![200, 1], vec![200, 1]]).unwrap();
//! let (prior, channel) = from_data(&table, "disease", None).unwrap();
//!
//! assert_eq!(prior.get(&1), Some(0.75));
//! assert_eq!(channel.get(&[100], &0), Some(1.0));
//!
//! let posterior = channel.posterior(&prior, &[200]).unwrap();
//! let gain = kl(&prior.probabilities(), &posterior.view()).unwrap();
//! assert!(gain > 0.);
//! ```
//!
//! # References
//!
//! [1] M. S. Alvim et al. "The Science of Quantitative Information Flow."
//!     Springer, 2020.
pub mod channel;
pub mod dataset;
pub mod divergence;
pub mod errors;

#[cfg(feature = "python-module")]
mod python_module;

pub use channel::{from_data, Channel, ChannelBuilder, Prior};
pub use dataset::{Dataset, Table};
pub use divergence::{kl, kl_with_policy, ZeroReferencePolicy};
pub use errors::{ChannelError, DataError, DivergenceError};
