//! Version specifier parsing for package.json declarations
//!
//! This module provides:
//! - npm range evaluation on top of the semver crate
//! - Classification of declaration values (range / exact / unrecognized)

mod node;
mod range;

pub use node::NodeVersionParser;
pub use range::NpmRange;
