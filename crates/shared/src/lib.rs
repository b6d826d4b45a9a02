pub mod config;
pub mod dataset;
pub mod drawing;
pub mod error;
pub mod map_state;
pub mod models;
pub mod selection;
pub mod session;
pub mod style;
pub mod surface;
pub mod upload;

#[cfg(test)]
mod testing;

pub use error::{GeopalError, Result};
