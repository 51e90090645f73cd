//! Command line access to qleak's divergence measure.
//!
//! Distributions are passed as comma-separated probabilities, aligned
//! index by index:
//!
//! ```text
//! qleak kl 0.4,0.6 0.6,0.4
//! ```
//!
//! prints D(observed || reference) in bits, where the first distribution
//! is the reference (e.g., a prior) and the second the observed one
//! (e.g., a posterior).
//!
//! Set `RUST_LOG=debug` for diagnostic output.
use docopt::Docopt;
use log::debug;
use ndarray::prelude::*;
use serde::Deserialize;
use std::process;

use qleak::divergence::{kl_with_policy, ZeroReferencePolicy};


const USAGE: &str = "
Compute the KL divergence D(observed || reference), in bits.

Usage: qleak kl [options] <reference> <observed>
       qleak (--help | --version)

Options:
    --zero-reference=<policy>   What to do when the reference has probability
                                0 where the observed distribution does not:
                                \"fail\", or \"propagate\" to report an
                                infinite divergence [default: fail].
    -h, --help                  Show help.
    --version                   Show the version.
";

#[derive(Deserialize)]
struct Args {
    arg_reference: String,
    arg_observed: String,
    flag_zero_reference: ZeroReferencePolicy,
}

fn parse_args<I, S>(argv: I) -> Result<Args, docopt::Error>
        where I: IntoIterator<Item = S>, S: AsRef<str> {
    Docopt::new(USAGE)
           .and_then(|d| d.argv(argv)
                          .version(Some(env!("CARGO_PKG_VERSION").to_string()))
                          .deserialize())
}

/// Parses a distribution specified as comma-separated values.
fn parse_distribution(values: &str) -> Result<Array1<f64>, String> {
    values.split(',')
          .map(|s| s.trim()
                    .parse::<f64>()
                    .map_err(|e| format!("couldn't parse `{}`: {}", s, e)))
          .collect::<Result<Array1<f64>, _>>()
}

fn main() {
    env_logger::init();

    let args = parse_args(std::env::args()).unwrap_or_else(|e| e.exit());

    let (reference, observed) = match (parse_distribution(&args.arg_reference),
                                       parse_distribution(&args.arg_observed)) {
        (Ok(r), Ok(o)) => (r, o),
        (Err(e), _) | (_, Err(e)) => {
            eprintln!("[!] {}", e);
            process::exit(1);
        },
    };

    if reference.len() != observed.len() {
        eprintln!("[!] distributions have different lengths ({} and {})",
                  reference.len(), observed.len());
        process::exit(1);
    }

    let policy = args.flag_zero_reference;
    debug!("reference: {}, observed: {}, policy: {:?}", reference, observed, policy);

    match kl_with_policy(&reference.view(), &observed.view(), policy) {
        Ok(divergence) => println!("KL divergence: {}", divergence),
        Err(e) => {
            eprintln!("[!] {}", e);
            process::exit(1);
        },
    }
}
