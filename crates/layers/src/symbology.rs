use alerts::{AlertKind, Severity};

/// Opaque RGB color, rendered as `#RRGGBB`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Color(pub u8, pub u8, pub u8);

impl Color {
    pub const WHITE: Color = Color(0xFF, 0xFF, 0xFF);

    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

pub fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Critical => Color(0xDC, 0x26, 0x26),
        Severity::High => Color(0xEA, 0x58, 0x0C),
        Severity::Medium => Color(0xD9, 0x77, 0x06),
        Severity::Low => Color(0x16, 0xA3, 0x4A),
    }
}

pub fn kind_glyph(kind: AlertKind) -> &'static str {
    match kind {
        AlertKind::Flood => "💧",
        AlertKind::Collapse => "🏢",
        AlertKind::Incident => "⚠️",
        AlertKind::Fire => "🔥",
        AlertKind::Earthquake => "🌍",
    }
}

/// Marker visual: a filled circle colored by severity holding a glyph chosen by kind.
///
/// The encoding is a pure function of `(kind, severity)`, so two alerts with the
/// same classification always look identical.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct MarkerSymbol {
    pub fill: Color,
    pub stroke: Color,
    pub glyph: &'static str,
    pub size_px: u32,
}

impl MarkerSymbol {
    pub const SIZE_PX: u32 = 32;

    pub fn for_alert(kind: AlertKind, severity: Severity) -> Self {
        Self {
            fill: severity_color(severity),
            stroke: Color::WHITE,
            glyph: kind_glyph(kind),
            size_px: Self::SIZE_PX,
        }
    }

    /// Pixel offset that centers the icon on its geographic anchor.
    pub fn anchor_px(&self) -> (u32, u32) {
        (self.size_px / 2, self.size_px / 2)
    }

    pub fn to_svg(&self) -> String {
        let s = self.size_px;
        let c = s / 2;
        format!(
            concat!(
                r#"<svg width="{s}" height="{s}" viewBox="0 0 {s} {s}" xmlns="http://www.w3.org/2000/svg">"#,
                r#"<circle cx="{c}" cy="{c}" r="{r}" fill="{fill}" stroke="{stroke}" stroke-width="2"/>"#,
                r#"<text x="{c}" y="{ty}" text-anchor="middle" font-size="12" fill="{stroke}">{glyph}</text>"#,
                "</svg>"
            ),
            s = s,
            c = c,
            r = c.saturating_sub(4),
            ty = c + 4,
            fill = self.fill.to_hex(),
            stroke = self.stroke.to_hex(),
            glyph = self.glyph,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alerts::{AlertKind, Severity};
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;

    #[test]
    fn severity_colors_are_fixed_and_distinct() {
        assert_eq!(severity_color(Severity::Critical).to_hex(), "#DC2626");
        assert_eq!(severity_color(Severity::High).to_hex(), "#EA580C");
        assert_eq!(severity_color(Severity::Medium).to_hex(), "#D97706");
        assert_eq!(severity_color(Severity::Low).to_hex(), "#16A34A");
        let distinct: HashSet<_> = Severity::ALL.iter().map(|s| severity_color(*s)).collect();
        assert_eq!(distinct.len(), 4);
    }

    #[test]
    fn glyphs_are_distinct_per_kind() {
        let distinct: HashSet<_> = AlertKind::ALL.iter().map(|k| kind_glyph(*k)).collect();
        assert_eq!(distinct.len(), 5);
        assert_eq!(kind_glyph(AlertKind::Flood), "💧");
    }

    #[test]
    fn svg_contains_circle_and_glyph() {
        let sym = MarkerSymbol::for_alert(AlertKind::Fire, Severity::Critical);
        let svg = sym.to_svg();
        assert!(svg.starts_with("<svg width=\"32\" height=\"32\""));
        assert!(svg.contains(
            r##"<circle cx="16" cy="16" r="12" fill="#DC2626" stroke="#FFFFFF""##
        ));
        assert!(svg.contains(">🔥</text>"));
        assert_eq!(sym.anchor_px(), (16, 16));
    }
}
