//! Wire types shared between the swap executor and the aggregator backend
#![deny(missing_docs)]
#![deny(clippy::missing_docs_in_private_items)]

mod types;
pub use types::*;
