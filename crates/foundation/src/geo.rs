/// Geographic position in WGS84 degrees.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Finite and inside the WGS84 degree ranges.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }

    /// Component-wise comparison with an absolute tolerance in degrees.
    ///
    /// Viewport centers round-trip through floating point in most map SDKs, so
    /// exact equality is rarely what callers want.
    pub fn nearly_equal(&self, other: LatLng, eps: f64) -> bool {
        (self.lat - other.lat).abs() < eps && (self.lng - other.lng).abs() < eps
    }
}

impl From<(f64, f64)> for LatLng {
    fn from((lat, lng): (f64, f64)) -> Self {
        Self { lat, lng }
    }
}

#[cfg(test)]
mod tests {
    use super::LatLng;

    #[test]
    fn validates_ranges() {
        assert!(LatLng::new(18.4861, -69.9312).is_valid());
        assert!(LatLng::new(-90.0, 180.0).is_valid());
        assert!(!LatLng::new(90.5, 0.0).is_valid());
        assert!(!LatLng::new(0.0, -180.1).is_valid());
        assert!(!LatLng::new(f64::NAN, 0.0).is_valid());
    }

    #[test]
    fn nearly_equal_uses_tolerance() {
        let a = LatLng::new(18.4861, -69.9312);
        let b = LatLng::new(18.4861004, -69.9311996);
        assert!(a.nearly_equal(b, 1e-6));
        assert!(!a.nearly_equal(LatLng::new(18.49, -69.9312), 1e-6));
    }
}
