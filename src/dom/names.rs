//! Element and attribute name dispatch
//!
//! Known names map to closed enums through their `name_hash`. The hash
//! constants are computed at compile time by the same function the
//! parser runs on names read from the document. A hash hit is confirmed
//! against the canonical name so a colliding unknown name falls through
//! to `Unknown`.

use crate::core::hash::name_hash;

macro_rules! name_table {
    (
        $(#[$meta:meta])*
        $vis:vis enum $ty:ident { $($variant:ident = $name:literal,)* }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        $vis enum $ty {
            $($variant,)*
            #[default]
            Unknown,
        }

        impl $ty {
            /// Every known variant with its canonical name
            pub const ALL: &'static [($ty, &'static str)] = &[$(($ty::$variant, $name),)*];

            /// Dispatch on a precomputed name hash alone
            pub fn from_hash(hash: u32) -> Self {
                #[allow(non_upper_case_globals)]
                mod hashes {
                    $(pub const $variant: u32 = $crate::core::hash::name_hash($name.as_bytes());)*
                }
                match hash {
                    $(hashes::$variant => $ty::$variant,)*
                    _ => $ty::Unknown,
                }
            }

            /// Canonical spelling; empty for `Unknown`
            pub fn name(self) -> &'static str {
                match self {
                    $($ty::$variant => $name,)*
                    $ty::Unknown => "",
                }
            }
        }
    };
}

name_table! {
    /// Element types the renderer distinguishes
    pub enum ElementKind {
        Svg = "svg",
        G = "g",
        Defs = "defs",
        Symbol = "symbol",
        Use = "use",
        Switch = "switch",
        A = "a",
        Path = "path",
        Rect = "rect",
        Circle = "circle",
        Ellipse = "ellipse",
        Line = "line",
        Polyline = "polyline",
        Polygon = "polygon",
        Text = "text",
        Tspan = "tspan",
        TextPath = "textPath",
        Style = "style",
        Image = "image",
        LinearGradient = "linearGradient",
        RadialGradient = "radialGradient",
        Stop = "stop",
        Pattern = "pattern",
        ClipPath = "clipPath",
        Mask = "mask",
        Marker = "marker",
        Title = "title",
        Desc = "desc",
        Metadata = "metadata",
    }
}

name_table! {
    /// Attributes (and style properties) the renderer distinguishes
    pub enum AttributeKind {
        Id = "id",
        Class = "class",
        Style = "style",
        Transform = "transform",
        D = "d",
        X = "x",
        Y = "y",
        X1 = "x1",
        Y1 = "y1",
        X2 = "x2",
        Y2 = "y2",
        Cx = "cx",
        Cy = "cy",
        R = "r",
        Rx = "rx",
        Ry = "ry",
        Fx = "fx",
        Fy = "fy",
        Width = "width",
        Height = "height",
        Points = "points",
        ViewBox = "viewBox",
        PreserveAspectRatio = "preserveAspectRatio",
        Href = "href",
        XlinkHref = "xlink:href",
        Fill = "fill",
        FillOpacity = "fill-opacity",
        FillRule = "fill-rule",
        Stroke = "stroke",
        StrokeWidth = "stroke-width",
        StrokeOpacity = "stroke-opacity",
        StrokeLinecap = "stroke-linecap",
        StrokeLinejoin = "stroke-linejoin",
        StrokeMiterlimit = "stroke-miterlimit",
        StrokeDasharray = "stroke-dasharray",
        StrokeDashoffset = "stroke-dashoffset",
        Opacity = "opacity",
        Color = "color",
        Display = "display",
        Visibility = "visibility",
        Offset = "offset",
        StopColor = "stop-color",
        StopOpacity = "stop-opacity",
        GradientUnits = "gradientUnits",
        GradientTransform = "gradientTransform",
        SpreadMethod = "spreadMethod",
        ClipPathRef = "clip-path",
        MaskRef = "mask",
        MarkerStart = "marker-start",
        MarkerMid = "marker-mid",
        MarkerEnd = "marker-end",
        FontFamily = "font-family",
        FontSize = "font-size",
        FontWeight = "font-weight",
        FontStyle = "font-style",
        TextAnchor = "text-anchor",
        Dx = "dx",
        Dy = "dy",
        StartOffset = "startOffset",
        Version = "version",
        Encoding = "encoding",
        Standalone = "standalone",
    }
}

impl ElementKind {
    /// Resolve a name read from the document
    pub fn from_name(name: &[u8]) -> Self {
        confirm(Self::from_hash(name_hash(name)), name, Self::name)
    }

    /// Text runs become anonymous children
    pub fn splits_text(self) -> bool {
        matches!(self, ElementKind::Text | ElementKind::Tspan)
    }

    /// Carries character content at all (text, tspan, textPath)
    pub fn is_text_content(self) -> bool {
        matches!(self, ElementKind::Text | ElementKind::Tspan | ElementKind::TextPath)
    }

    pub fn is_shape(self) -> bool {
        matches!(
            self,
            ElementKind::Path
                | ElementKind::Rect
                | ElementKind::Circle
                | ElementKind::Ellipse
                | ElementKind::Line
                | ElementKind::Polyline
                | ElementKind::Polygon
        )
    }
}

impl AttributeKind {
    /// Resolve a name read from the document
    pub fn from_name(name: &[u8]) -> Self {
        Self::from_hashed(name_hash(name), name)
    }

    /// Resolve a name whose hash the caller already computed
    pub fn from_hashed(hash: u32, name: &[u8]) -> Self {
        confirm(Self::from_hash(hash), name, Self::name)
    }
}

fn confirm<K: Copy + Default + PartialEq>(kind: K, name: &[u8], canonical: fn(K) -> &'static str) -> K {
    if kind != K::default() && canonical(kind).as_bytes().eq_ignore_ascii_case(name) {
        kind
    } else {
        K::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_no_hash_collisions() {
        let mut seen = HashSet::new();
        for (_, name) in ElementKind::ALL {
            assert!(seen.insert(name_hash(name.as_bytes())), "element {}", name);
        }
        let mut seen = HashSet::new();
        for (_, name) in AttributeKind::ALL {
            assert!(seen.insert(name_hash(name.as_bytes())), "attribute {}", name);
        }
    }

    #[test]
    fn test_round_trip_names() {
        for &(kind, name) in ElementKind::ALL {
            assert_eq!(ElementKind::from_name(name.as_bytes()), kind);
            assert_eq!(kind.name(), name);
        }
        for &(kind, name) in AttributeKind::ALL {
            assert_eq!(AttributeKind::from_name(name.as_bytes()), kind);
        }
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(ElementKind::from_name(b"RECT"), ElementKind::Rect);
        assert_eq!(ElementKind::from_name(b"textpath"), ElementKind::TextPath);
        assert_eq!(AttributeKind::from_name(b"VIEWBOX"), AttributeKind::ViewBox);
    }

    #[test]
    fn test_unknown() {
        assert_eq!(ElementKind::from_name(b"blink"), ElementKind::Unknown);
        assert_eq!(ElementKind::from_name(b""), ElementKind::Unknown);
        assert_eq!(AttributeKind::from_name(b"data-x"), AttributeKind::Unknown);
        assert_eq!(ElementKind::Unknown.name(), "");
    }

    #[test]
    fn test_text_kinds() {
        assert!(ElementKind::Tspan.splits_text());
        assert!(!ElementKind::TextPath.splits_text());
        assert!(ElementKind::TextPath.is_text_content());
        assert!(ElementKind::Polygon.is_shape());
    }
}
