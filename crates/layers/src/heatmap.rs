use alerts::HeatmapPoint;

/// Display parameters for the weighted density overlay.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct HeatmapStyle {
    pub radius_px: u32,
    /// In `[0, 1]`.
    pub opacity: f32,
}

impl HeatmapStyle {
    pub const fn new(radius_px: u32, opacity: f32) -> Self {
        Self { radius_px, opacity }
    }
}

impl Default for HeatmapStyle {
    fn default() -> Self {
        Self {
            radius_px: 50,
            opacity: 0.6,
        }
    }
}

/// Points to install, or `None` when no layer should exist at all.
///
/// A hidden layer and an empty point set are the same thing: no layer.
pub fn layer_points(points: &[HeatmapPoint], visible: bool) -> Option<&[HeatmapPoint]> {
    if !visible || points.is_empty() {
        return None;
    }
    Some(points)
}

#[cfg(test)]
mod tests {
    use super::{HeatmapStyle, layer_points};
    use alerts::HeatmapPoint;

    #[test]
    fn default_style() {
        let s = HeatmapStyle::default();
        assert_eq!(s.radius_px, 50);
        assert_eq!(s.opacity, 0.6);
    }

    #[test]
    fn hidden_or_empty_means_no_layer() {
        let pts = [HeatmapPoint::new(18.5, -69.9, 0.5)];
        assert!(layer_points(&pts, false).is_none());
        assert!(layer_points(&[], true).is_none());
        assert_eq!(layer_points(&pts, true).map(|p| p.len()), Some(1));
    }
}
