use thiserror::Error;

#[derive(Debug, Error)]
pub enum PositionError {
    #[error("latitude {0} is not a finite number")]
    Latitude(f64),
    #[error("longitude {0} is not a finite number")]
    Longitude(f64),
}

/// A geographic coordinate in degrees.
///
/// Only finiteness is checked. Values outside of the usual latitude and longitude
/// ranges are kept as they are and only clamped when projected onto the map.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Position {
    lat: f64,
    lng: f64,
}

impl Position {
    pub fn new(lat: f64, lng: f64) -> Result<Self, PositionError> {
        if !lat.is_finite() {
            return Err(PositionError::Latitude(lat));
        }
        if !lng.is_finite() {
            return Err(PositionError::Longitude(lng));
        }
        Ok(Self { lat, lng })
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lng(&self) -> f64 {
        self.lng
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lng)
    }
}

#[test]
fn rejects_non_finite_components() {
    assert!(matches!(
        Position::new(f64::NAN, 1.0),
        Err(PositionError::Latitude(_))
    ));
    assert!(matches!(
        Position::new(1.0, f64::INFINITY),
        Err(PositionError::Longitude(_))
    ));
}

#[test]
fn keeps_out_of_range_values() {
    let position = Position::new(91.0, 200.0).unwrap();
    assert_eq!(position.lat(), 91.0);
    assert_eq!(position.lng(), 200.0);
}
