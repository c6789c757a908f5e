//! Dataset shuffling, splitting, and flat-binary serialization.
//!
//! The reduced entries are shuffled once, split at
//! `floor(train_split * N)`, and dumped as six headerless binary files, one
//! array per (partition, field) pair:
//!
//! ```text
//!   XTrain.bin    / XTest.bin      (HD+1) * 225 bytes per entry
//!   YTrainPol.bin / YTestPol.bin   225-byte one-hot move target
//!   YTrainVal.bin / YTestVal.bin   1 signed byte outcome target
//! ```
//!
//! Byte layout is the row-major dump of the in-memory arrays. Shape and
//! dtype are reconstructed by the consumer from the generation
//! configuration; the directory name is the only metadata channel.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

use crate::aggregate::CanonicalEntry;
use crate::record::{Move, CELLS};

pub const X_TRAIN_FILE: &str = "XTrain.bin";
pub const Y_TRAIN_POL_FILE: &str = "YTrainPol.bin";
pub const Y_TRAIN_VAL_FILE: &str = "YTrainVal.bin";
pub const X_TEST_FILE: &str = "XTest.bin";
pub const Y_TEST_POL_FILE: &str = "YTestPol.bin";
pub const Y_TEST_VAL_FILE: &str = "YTestVal.bin";

/// Partition sizes of a written dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatasetSummary {
    pub total: usize,
    pub train: usize,
    pub test: usize,
}

/// Train partition size for a given entry count and split fraction.
pub fn train_len(total: usize, train_split: f64) -> usize {
    (train_split * total as f64).floor() as usize
}

/// One-hot policy target over the flattened board.
pub fn move_target(m: Move) -> [u8; CELLS] {
    let mut target = [0u8; CELLS];
    target[m.index()] = 1;
    target
}

/// Shuffles, splits, and writes the dataset into `dir`, creating it as
/// needed.
pub fn write_dataset(
    mut entries: Vec<CanonicalEntry>,
    dir: &Path,
    train_split: f64,
    rng: &mut SmallRng,
) -> io::Result<DatasetSummary> {
    entries.shuffle(rng);
    let train = train_len(entries.len(), train_split);

    fs::create_dir_all(dir)?;
    write_partition(
        dir,
        &entries[..train],
        X_TRAIN_FILE,
        Y_TRAIN_POL_FILE,
        Y_TRAIN_VAL_FILE,
    )?;
    write_partition(
        dir,
        &entries[train..],
        X_TEST_FILE,
        Y_TEST_POL_FILE,
        Y_TEST_VAL_FILE,
    )?;

    Ok(DatasetSummary {
        total: entries.len(),
        train,
        test: entries.len() - train,
    })
}

fn write_partition(
    dir: &Path,
    entries: &[CanonicalEntry],
    x_name: &str,
    pol_name: &str,
    val_name: &str,
) -> io::Result<()> {
    let mut x = BufWriter::new(File::create(dir.join(x_name))?);
    let mut pol = BufWriter::new(File::create(dir.join(pol_name))?);
    let mut val = BufWriter::new(File::create(dir.join(val_name))?);

    for entry in entries {
        x.write_all(&entry.tensor)?;
        pol.write_all(&move_target(entry.next_move))?;
        val.write_all(&entry.outcome.to_le_bytes())?;
    }

    x.flush()?;
    pol.flush()?;
    val.flush()
}
