//! Brightness lookups against a nighttime-lights raster.

use std::sync::Arc;

use crate::Coordinate;

/// Sample a radiance value at a coordinate.
///
/// Implementations return `None` for coordinates outside the raster, for
/// no-data cells and for any lookup failure; they never panic. Values may
/// still be negative or NaN, and callers filter those out.
///
/// # Examples
///
/// ```rust
/// use saferoute_core::{BrightnessRaster, Coordinate};
///
/// struct Uniform(f64);
///
/// impl BrightnessRaster for Uniform {
///     fn brightness(&self, _point: Coordinate) -> Option<f64> {
///         Some(self.0)
///     }
/// }
///
/// let point = Coordinate::new(0.0, 0.0).expect("valid coordinate");
/// assert_eq!(Uniform(12.0).brightness(point), Some(12.0));
/// ```
pub trait BrightnessRaster: Send + Sync {
    /// Return the radiance at `point`, or `None` when it is unavailable.
    fn brightness(&self, point: Coordinate) -> Option<f64>;
}

impl<T: BrightnessRaster + ?Sized> BrightnessRaster for Box<T> {
    fn brightness(&self, point: Coordinate) -> Option<f64> {
        (**self).brightness(point)
    }
}

impl<T: BrightnessRaster + ?Sized> BrightnessRaster for Arc<T> {
    fn brightness(&self, point: Coordinate) -> Option<f64> {
        (**self).brightness(point)
    }
}
