//! Transformation module.
//!
//! - Reshape: wide yearly table to long records
//! - Dataset: filters and yearly means over the loaded records
//! - Change: index difference between two years
//! - Transition: regime transition matrices
//! - Pipeline: load a CSV file into a dataset

pub mod change;
pub mod dataset;
pub mod pipeline;
pub mod reshape;
pub mod transition;

pub use change::index_changes;
pub use dataset::{region_averages_of, world_average_of, Dataset};
pub use pipeline::*;
pub use reshape::{wide_to_long, WideLayout};
pub use transition::TransitionMatrix;
