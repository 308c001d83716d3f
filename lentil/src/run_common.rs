#![allow(dead_code)]

pub use clap::{Args, Parser, Subcommand};

pub use lentil::lentil_common::*;
pub use matrix_util::traits::{IoOps, MatOps, SampleOps};

/// `RUST_LOG=info` when verbose, then start the logger
pub fn init_logger(verbose: bool) {
    if verbose {
        std::env::set_var("RUST_LOG", "info");
    }
    env_logger::init();
}

/// `{hdr}.{suffix}.tsv`
pub fn output_file(hdr: &str, suffix: &str) -> String {
    format!("{}.{}.tsv", hdr, suffix)
}
