//! Measurement units

/// Unit attached to a parsed number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum MeasurementUnit {
    /// Bare number; pixel or fraction, decided at resolve time
    #[default]
    Undefined,
    Percent,
    Pixel,
    Inch,
    Centimeter,
    Millimeter,
    Em,
    Ex,
    Point,
    Pica,
    Degree,
    Radian,
}

impl MeasurementUnit {
    /// Recognize a unit suffix (case-insensitive)
    pub fn from_suffix(suffix: &[u8]) -> Option<Self> {
        let mut buf = [0u8; 3];
        if suffix.is_empty() || suffix.len() > buf.len() {
            return None;
        }
        for (dst, src) in buf.iter_mut().zip(suffix) {
            *dst = src.to_ascii_lowercase();
        }
        Some(match &buf[..suffix.len()] {
            b"%" => MeasurementUnit::Percent,
            b"px" => MeasurementUnit::Pixel,
            b"in" => MeasurementUnit::Inch,
            b"cm" => MeasurementUnit::Centimeter,
            b"mm" => MeasurementUnit::Millimeter,
            b"em" => MeasurementUnit::Em,
            b"ex" => MeasurementUnit::Ex,
            b"pt" => MeasurementUnit::Point,
            b"pc" => MeasurementUnit::Pica,
            b"deg" => MeasurementUnit::Degree,
            b"rad" => MeasurementUnit::Radian,
            _ => return None,
        })
    }

    /// Scale factor to pixels for absolute units (96 dpi)
    pub fn pixels_per_unit(self) -> Option<f64> {
        match self {
            MeasurementUnit::Pixel => Some(1.0),
            MeasurementUnit::Inch => Some(96.0),
            MeasurementUnit::Centimeter => Some(96.0 / 2.54),
            MeasurementUnit::Millimeter => Some(96.0 / 25.4),
            MeasurementUnit::Point => Some(4.0 / 3.0),
            MeasurementUnit::Pica => Some(16.0),
            _ => None,
        }
    }

    /// Angular units
    pub fn is_angle(self) -> bool {
        matches!(self, MeasurementUnit::Degree | MeasurementUnit::Radian)
    }

    /// Units relative to the font size
    pub fn is_font_relative(self) -> bool {
        matches!(self, MeasurementUnit::Em | MeasurementUnit::Ex)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_suffix() {
        assert_eq!(MeasurementUnit::from_suffix(b"PX"), Some(MeasurementUnit::Pixel));
        assert_eq!(MeasurementUnit::from_suffix(b"Deg"), Some(MeasurementUnit::Degree));
        assert_eq!(MeasurementUnit::from_suffix(b"%"), Some(MeasurementUnit::Percent));
        assert_eq!(MeasurementUnit::from_suffix(b"zz"), None);
        assert_eq!(MeasurementUnit::from_suffix(b"pxpx"), None);
        assert_eq!(MeasurementUnit::from_suffix(b""), None);
    }

    #[test]
    fn test_pixels_per_unit() {
        assert_eq!(MeasurementUnit::Inch.pixels_per_unit(), Some(96.0));
        assert_eq!(MeasurementUnit::Pica.pixels_per_unit(), Some(16.0));
        assert_eq!(MeasurementUnit::Em.pixels_per_unit(), None);
        assert!(MeasurementUnit::Radian.is_angle());
        assert!(MeasurementUnit::Ex.is_font_relative());
    }
}
