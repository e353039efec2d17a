//! Resolving free text place names to positions.

mod nominatim;
mod worker;

pub use nominatim::*;
pub use worker::*;

use crate::Position;
use thiserror::Error;

/// A single candidate returned by a geocoding lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    pub label: String,
    pub center: Position,
}

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("service answered with status {0}")]
    Status(u16),
    #[error("could not read the service response: {0}")]
    Body(#[from] std::io::Error),
    #[error("could not parse the service response: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A blocking geocoding service.
///
/// Candidates are ordered by relevance, best match first. An empty list means nothing matched.
pub trait Geocoder: Send + Sync {
    fn geocode(&self, query: &str) -> Result<Vec<Place>, GeocodeError>;
}
