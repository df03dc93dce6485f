//! Read-only world seams.
//!
//! [`GridOracle`] exposes grid geometry without coupling consumers to the
//! concrete [`crate::state::Grid`], and [`RngOracle`] makes every random
//! draw reproducible from an explicit seed.
mod map;
mod rng;

pub use map::{GridDimensions, GridOracle};
pub use rng::{PcgRng, RngOracle, SampleStream, mix_seed};
