#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

pub mod error;
pub mod id;
pub mod navigation;
pub mod query;
pub mod recovery;
pub mod sequence;
pub mod state;
pub mod units;

#[cfg(test)]
mod fixtures;

pub use error::*;
pub use id::*;
pub use navigation::*;
pub use recovery::*;
pub use sequence::ItemShape;
pub use state::*;
pub use units::*;
