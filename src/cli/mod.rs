/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Command Line Interface (CLI) module
//!
//! Reads a factorization file, runs the selective inversion and writes the
//! result as JSON to a file or to stdout.

use crate::input::{self, SelectiveInverseRecord};
use crate::selinv::{SelInvConfig, SelectiveInversion};
use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;

/// Selective block inversion of an incomplete block LU factorization
#[derive(Parser, Debug)]
#[command(name = "selinv-rs")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Factorization file (JSON, 1-based indices)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Result file; stdout when absent
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Configuration file (JSON)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Only write the inverse diagonal D
    #[arg(long)]
    pub diagonal_only: bool,

    /// Include execution statistics in the result
    #[arg(long)]
    pub stats: bool,
}

/// Run the command described by `cli`
pub fn run(cli: &Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => input::load_config(path)
            .with_context(|| format!("failed to read configuration {}", path.display()))?,
        None => SelInvConfig::default(),
    };

    let (factor, scaling) = input::load_factorization(&cli.input)
        .with_context(|| format!("failed to read factorization {}", cli.input.display()))?;
    info!(
        "Loaded {} block columns of order {} from {}",
        factor.nblocks(),
        factor.order(),
        cli.input.display()
    );

    let inverse = SelectiveInversion::with_config(config)
        .run(&factor, &scaling)
        .context("selective inversion failed")?;

    let record = SelectiveInverseRecord::from_inverse(&inverse, cli.diagonal_only, cli.stats);
    match &cli.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            input::write_inverse(BufWriter::new(file), &record)?;
            info!("Wrote result to {}", path.display());
        }
        None => input::write_inverse(io::stdout().lock(), &record)?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_arguments() {
        let args = ["selinv-rs", "--input", "factor.json", "--diagonal-only", "-o", "out.json"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.input, PathBuf::from("factor.json"));
        assert_eq!(cli.output, Some(PathBuf::from("out.json")));
        assert!(cli.diagonal_only);
        assert!(!cli.stats);
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_input_is_required() {
        assert!(Cli::try_parse_from(["selinv-rs", "--stats"]).is_err());
    }
}
