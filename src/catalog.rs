//! Track catalog: the fixed, ordered list of songs for one session.
//!
//! Tracks come either from an explicit list in the config file or from a
//! directory scan. Order is significant; it defines next/previous.

mod model;
mod scan;

pub use model::*;
pub use scan::load_catalog;

#[cfg(test)]
mod tests;
