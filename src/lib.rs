//! Aggregator for the HMxml workspace; see the [`hmxml`] facade.

pub use hmxml::*;
