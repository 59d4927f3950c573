use glam::DVec2;
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI, TAU};
use uuid::Uuid;

/// Angular tolerance in radians, roughly 0.06 degrees.
pub const EPSILON3: f64 = 0.001;

/// Unique identifier for a layer in a catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LayerId(pub Uuid);

impl LayerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// First eight hex digits, for log lines and debug output.
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }
}

impl Default for LayerId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for LayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Errors from constructing geographic extents.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExtentError {
    #[error("latitude {0} is outside [-π/2, π/2]")]
    LatitudeOutOfRange(f64),
    #[error("longitude {0} is outside [-π, π]")]
    LongitudeOutOfRange(f64),
    #[error("south {south} is north of north {north}")]
    Inverted { south: f64, north: f64 },
    #[error("non-finite coordinate")]
    NotFinite,
}

/// Axis-aligned geographic extent in radians.
///
/// `east < west` denotes an extent crossing the antimeridian.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rectangle {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl Rectangle {
    /// The whole world.
    pub const MAX_VALUE: Rectangle = Rectangle {
        west: -PI,
        south: -FRAC_PI_2,
        east: PI,
        north: FRAC_PI_2,
    };

    /// Build a rectangle from radians, validating ranges.
    pub fn new(west: f64, south: f64, east: f64, north: f64) -> Result<Self, ExtentError> {
        if ![west, south, east, north].iter().all(|v| v.is_finite()) {
            return Err(ExtentError::NotFinite);
        }
        for lon in [west, east] {
            if !(-PI..=PI).contains(&lon) {
                return Err(ExtentError::LongitudeOutOfRange(lon));
            }
        }
        for lat in [south, north] {
            if !(-FRAC_PI_2..=FRAC_PI_2).contains(&lat) {
                return Err(ExtentError::LatitudeOutOfRange(lat));
            }
        }
        if south > north {
            return Err(ExtentError::Inverted { south, north });
        }
        Ok(Self {
            west,
            south,
            east,
            north,
        })
    }

    /// Build a rectangle from degrees.
    pub fn from_degrees(west: f64, south: f64, east: f64, north: f64) -> Result<Self, ExtentError> {
        Self::new(
            west.to_radians(),
            south.to_radians(),
            east.to_radians(),
            north.to_radians(),
        )
    }

    /// Longitudinal span in radians, accounting for antimeridian crossing.
    pub fn width(&self) -> f64 {
        if self.east < self.west {
            self.east + TAU - self.west
        } else {
            self.east - self.west
        }
    }

    /// Latitudinal span in radians.
    pub fn height(&self) -> f64 {
        self.north - self.south
    }

    /// Center as (longitude, latitude) in radians.
    pub fn center(&self) -> DVec2 {
        let mut lon = self.west + self.width() * 0.5;
        if lon > PI {
            lon -= TAU;
        }
        DVec2::new(lon, (self.south + self.north) * 0.5)
    }

    /// Copy of this rectangle with every dimension narrower than `epsilon`
    /// widened by `epsilon` on both sides.
    pub fn padded(&self, epsilon: f64) -> Self {
        let mut out = *self;
        if out.width() < epsilon {
            out.east += epsilon;
            out.west -= epsilon;
        }
        if out.height() < epsilon {
            out.north += epsilon;
            out.south -= epsilon;
        }
        out
    }

    /// Convert to the degree-based bounds used by tile maps.
    pub fn to_lat_lng_bounds(&self) -> LatLngBounds {
        LatLngBounds {
            south_west: LatLng::new(self.south.to_degrees(), self.west.to_degrees()),
            north_east: LatLng::new(self.north.to_degrees(), self.east.to_degrees()),
        }
    }
}

impl Default for Rectangle {
    fn default() -> Self {
        Self::MAX_VALUE
    }
}

impl std::fmt::Display for Rectangle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[w={:.4} s={:.4} e={:.4} n={:.4}]",
            self.west, self.south, self.east, self.north
        )
    }
}

/// A geographic position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Degree-based bounds as consumed by 2D tile maps.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLngBounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl LatLngBounds {
    pub fn contains(&self, point: &LatLng) -> bool {
        point.lat >= self.south_west.lat
            && point.lat <= self.north_east.lat
            && point.lng >= self.south_west.lng
            && point.lng <= self.north_east.lng
    }

    /// Back to radians. Not validated: padded bounds may overshoot the poles.
    pub fn to_rectangle(&self) -> Rectangle {
        Rectangle {
            west: self.south_west.lng.to_radians(),
            south: self.south_west.lat.to_radians(),
            east: self.north_east.lng.to_radians(),
            north: self.north_east.lat.to_radians(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layer_id_uniqueness() {
        let a = LayerId::new();
        let b = LayerId::new();
        assert_ne!(a, b);
        assert_eq!(a.short().len(), 8);
    }

    #[test]
    fn default_rectangle_is_whole_world() {
        let r = Rectangle::default();
        assert_eq!(r, Rectangle::MAX_VALUE);
        assert!((r.width() - TAU).abs() < 1e-12);
        assert!((r.height() - PI).abs() < 1e-12);
    }

    #[test]
    fn new_rejects_inverted_latitudes() {
        let err = Rectangle::new(0.0, 0.5, 0.1, 0.2).unwrap_err();
        assert!(matches!(err, ExtentError::Inverted { .. }));
    }

    #[test]
    fn new_rejects_out_of_range() {
        assert!(matches!(
            Rectangle::new(-4.0, 0.0, 0.0, 0.1),
            Err(ExtentError::LongitudeOutOfRange(_))
        ));
        assert!(matches!(
            Rectangle::new(0.0, -2.0, 0.1, 0.1),
            Err(ExtentError::LatitudeOutOfRange(_))
        ));
        assert!(matches!(
            Rectangle::new(f64::NAN, 0.0, 0.1, 0.1),
            Err(ExtentError::NotFinite)
        ));
    }

    #[test]
    fn width_across_antimeridian() {
        let r = Rectangle::from_degrees(170.0, -10.0, -170.0, 10.0).unwrap();
        assert!((r.width() - 20f64.to_radians()).abs() < 1e-9);
        assert!((r.center().x.abs() - PI).abs() < 1e-9);
    }

    #[test]
    fn padded_widens_degenerate_dimensions() {
        let point = Rectangle::new(0.5, 0.2, 0.5, 0.2).unwrap();
        let p = point.padded(EPSILON3);
        assert!((p.width() - 2.0 * EPSILON3).abs() < 1e-12);
        assert!((p.height() - 2.0 * EPSILON3).abs() < 1e-12);
        assert!((p.center() - point.center()).length() < 1e-12);
    }

    #[test]
    fn padded_leaves_wide_rectangles_alone() {
        let r = Rectangle::new(0.0, 0.0, 0.2, 0.2).unwrap();
        assert_eq!(r.padded(EPSILON3), r);
    }

    #[test]
    fn lat_lng_bounds_conversion() {
        let r = Rectangle::from_degrees(110.0, -45.0, 155.0, -10.0).unwrap();
        let b = r.to_lat_lng_bounds();
        assert!((b.south_west.lat + 45.0).abs() < 1e-9);
        assert!((b.south_west.lng - 110.0).abs() < 1e-9);
        assert!((b.north_east.lat + 10.0).abs() < 1e-9);
        assert!((b.north_east.lng - 155.0).abs() < 1e-9);
        assert!(b.contains(&LatLng::new(-30.0, 135.0)));
        assert!(!b.contains(&LatLng::new(0.0, 135.0)));

        let back = b.to_rectangle();
        assert!((back.west - r.west).abs() < 1e-12);
        assert!((back.north - r.north).abs() < 1e-12);
    }
}
