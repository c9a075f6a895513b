//! Boundary data loading.

mod download;

pub use download::{LoadResult, TopologyChannel};

#[cfg(test)]
pub use download::decode;
