/*
MIT License with FEFF10 Attribution

Copyright (c) 2025 Ameyanagi

Based on or developed using Distribution: FEFF10.0
Copyright (c) 2020 FEFF Project, University of Washington and SLAC National Accelerator Laboratory.
All rights reserved.
*/

//! Reading and writing factorization, configuration and result files
//!
//! All files are JSON. A factorization file holds the cell arrays `BL`,
//! `BD` and `BUT` together with `perm`, `Deltal` and `Deltar`:
//!
//! ```json
//! {
//!   "BL":  [{"J": [1, 2], "I": [3], "L": [[0.5, -1.0]], "D": [[1, 0], [0.25, 1]]}, ...],
//!   "BD":  [{"rows": [1, 2], "cols": [1, 2], "values": [4.0, 5.0]}, ...],
//!   "BUT": [{"J": [1, 2], "I": [4], "L": [[2.0, 1.0]], "D": [[1, 0], [-0.5, 1]]}, ...],
//!   "perm": [2, 1, 3, 4],
//!   "Deltal": [1, 1, 1, 1],
//!   "Deltar": [1, 1, 1, 1]
//! }
//! ```

pub mod errors;
pub mod model;

pub use errors::{InputError, Result};
pub use model::{
    BlockColumnRecord, DiagonalRecord, FactorizationRecord, InverseBlockRecord,
    InverseDiagonalRecord,
    SelectiveInverseRecord,
};

use crate::factor::{BlockFactorization, Scaling};
use crate::selinv::SelInvConfig;
use log::debug;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Read a factorization file
pub fn load_factorization<P: AsRef<Path>>(path: P) -> Result<(BlockFactorization, Scaling)> {
    let path = path.as_ref();
    debug!("Reading factorization from {}", path.display());
    let reader = BufReader::new(File::open(path)?);
    let record: FactorizationRecord = serde_json::from_reader(reader)?;
    record.into_model()
}

/// Write a factorization file
pub fn save_factorization<P: AsRef<Path>>(
    path: P,
    factor: &BlockFactorization,
    scaling: &Scaling,
) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, &FactorizationRecord::from_model(factor, scaling))?;
    writer.flush()?;
    Ok(())
}

/// Read a configuration file; missing fields take their default values
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<SelInvConfig> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

/// Write a result record as pretty-printed JSON
pub fn write_inverse<W: Write>(mut writer: W, record: &SelectiveInverseRecord) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, record)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}
