//! Renjugen library.
//!
//! Converts renju.net XML game databases into deduplicated, majority-vote
//! labeled policy/value training datasets. Exposes the record source,
//! symmetry augmentation, history encoding, aggregation, and dataset
//! writing modules for use by integration tests and the binary entry point.

pub mod aggregate;
pub mod config;
pub mod dataset;
pub mod encoding;
pub mod pipeline;
pub mod record;
pub mod source;
pub mod symmetry;
