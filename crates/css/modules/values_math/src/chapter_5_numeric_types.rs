//! CSS Values & Units Level 4 — §5 Numeric Data Types, §7 Other Quantities
//! Spec: <https://www.w3.org/TR/css-values-4/#numeric-types>
//!
//! Unit keywords, their absolute-conversion families and the fixed scale factors
//! used to move a value into its family's canonical unit.

use core::f64::consts::PI;

/// Every unit a numeric token can carry inside a math expression.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum UnitType {
    Number,
    Integer,
    Percentage,

    // §6.2 Absolute lengths
    Pixels,
    Centimeters,
    Millimeters,
    QuarterMillimeters,
    Inches,
    Points,
    Picas,

    // §6.1.1 Font-relative lengths
    Ems,
    RootEms,
    Exs,
    RootExs,
    Chs,
    RootChs,
    Ics,
    RootIcs,
    LineHeights,
    RootLineHeights,
    CapHeights,
    RootCapHeights,

    // §6.1.2 Viewport-percentage lengths
    ViewportWidth,
    ViewportHeight,
    ViewportInlineSize,
    ViewportBlockSize,
    ViewportMin,
    ViewportMax,
    SmallViewportWidth,
    SmallViewportHeight,
    SmallViewportInlineSize,
    SmallViewportBlockSize,
    SmallViewportMin,
    SmallViewportMax,
    LargeViewportWidth,
    LargeViewportHeight,
    LargeViewportInlineSize,
    LargeViewportBlockSize,
    LargeViewportMin,
    LargeViewportMax,
    DynamicViewportWidth,
    DynamicViewportHeight,
    DynamicViewportInlineSize,
    DynamicViewportBlockSize,
    DynamicViewportMin,
    DynamicViewportMax,

    // css-contain-3 container query lengths
    ContainerWidth,
    ContainerHeight,
    ContainerInlineSize,
    ContainerBlockSize,
    ContainerMin,
    ContainerMax,

    // §7.1 Angles
    Degrees,
    Radians,
    Gradians,
    Turns,

    // §7.2 Duration
    Seconds,
    Milliseconds,

    // §7.3 Frequency
    Hertz,
    Kilohertz,

    // §7.4 Resolution
    DotsPerPixel,
    DotsPerInch,
    DotsPerCentimeter,

    // css-grid flexible length; never valid inside a math function
    Fraction,
}

/// Absolute conversion family of a unit.
///
/// Two units in the same family (other than `Other`) convert into each other with a
/// fixed factor. Relative lengths are `Other`: they need a resolution context.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnitCategory {
    Number,
    Percent,
    Length,
    Angle,
    Time,
    Frequency,
    Resolution,
    Other,
}

const PIXELS_PER_INCH: f64 = 96.0;
const PIXELS_PER_CENTIMETER: f64 = PIXELS_PER_INCH / 2.54;
const PIXELS_PER_MILLIMETER: f64 = PIXELS_PER_INCH / 25.4;
const PIXELS_PER_QUARTER_MILLIMETER: f64 = PIXELS_PER_INCH / 101.6;
const PIXELS_PER_POINT: f64 = PIXELS_PER_INCH / 72.0;
const PIXELS_PER_PICA: f64 = PIXELS_PER_INCH / 6.0;

impl UnitType {
    /// Look up a dimension unit keyword (ASCII case-insensitive).
    ///
    /// Only dimension keywords are recognised; `Number`, `Integer` and `Percentage`
    /// come from their own token kinds.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        let lower = keyword.to_ascii_lowercase();
        let unit = match lower.as_str() {
            "px" => Self::Pixels,
            "cm" => Self::Centimeters,
            "mm" => Self::Millimeters,
            "q" => Self::QuarterMillimeters,
            "in" => Self::Inches,
            "pt" => Self::Points,
            "pc" => Self::Picas,
            "em" => Self::Ems,
            "rem" => Self::RootEms,
            "ex" => Self::Exs,
            "rex" => Self::RootExs,
            "ch" => Self::Chs,
            "rch" => Self::RootChs,
            "ic" => Self::Ics,
            "ric" => Self::RootIcs,
            "lh" => Self::LineHeights,
            "rlh" => Self::RootLineHeights,
            "cap" => Self::CapHeights,
            "rcap" => Self::RootCapHeights,
            "vw" => Self::ViewportWidth,
            "vh" => Self::ViewportHeight,
            "vi" => Self::ViewportInlineSize,
            "vb" => Self::ViewportBlockSize,
            "vmin" => Self::ViewportMin,
            "vmax" => Self::ViewportMax,
            "svw" => Self::SmallViewportWidth,
            "svh" => Self::SmallViewportHeight,
            "svi" => Self::SmallViewportInlineSize,
            "svb" => Self::SmallViewportBlockSize,
            "svmin" => Self::SmallViewportMin,
            "svmax" => Self::SmallViewportMax,
            "lvw" => Self::LargeViewportWidth,
            "lvh" => Self::LargeViewportHeight,
            "lvi" => Self::LargeViewportInlineSize,
            "lvb" => Self::LargeViewportBlockSize,
            "lvmin" => Self::LargeViewportMin,
            "lvmax" => Self::LargeViewportMax,
            "dvw" => Self::DynamicViewportWidth,
            "dvh" => Self::DynamicViewportHeight,
            "dvi" => Self::DynamicViewportInlineSize,
            "dvb" => Self::DynamicViewportBlockSize,
            "dvmin" => Self::DynamicViewportMin,
            "dvmax" => Self::DynamicViewportMax,
            "cqw" => Self::ContainerWidth,
            "cqh" => Self::ContainerHeight,
            "cqi" => Self::ContainerInlineSize,
            "cqb" => Self::ContainerBlockSize,
            "cqmin" => Self::ContainerMin,
            "cqmax" => Self::ContainerMax,
            "deg" => Self::Degrees,
            "rad" => Self::Radians,
            "grad" => Self::Gradians,
            "turn" => Self::Turns,
            "s" => Self::Seconds,
            "ms" => Self::Milliseconds,
            "hz" => Self::Hertz,
            "khz" => Self::Kilohertz,
            "dppx" | "x" => Self::DotsPerPixel,
            "dpi" => Self::DotsPerInch,
            "dpcm" => Self::DotsPerCentimeter,
            "fr" => Self::Fraction,
            _ => return None,
        };
        Some(unit)
    }

    /// Serialized unit suffix. Empty for numbers and integers.
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Number | Self::Integer => "",
            Self::Percentage => "%",
            Self::Pixels => "px",
            Self::Centimeters => "cm",
            Self::Millimeters => "mm",
            Self::QuarterMillimeters => "q",
            Self::Inches => "in",
            Self::Points => "pt",
            Self::Picas => "pc",
            Self::Ems => "em",
            Self::RootEms => "rem",
            Self::Exs => "ex",
            Self::RootExs => "rex",
            Self::Chs => "ch",
            Self::RootChs => "rch",
            Self::Ics => "ic",
            Self::RootIcs => "ric",
            Self::LineHeights => "lh",
            Self::RootLineHeights => "rlh",
            Self::CapHeights => "cap",
            Self::RootCapHeights => "rcap",
            Self::ViewportWidth => "vw",
            Self::ViewportHeight => "vh",
            Self::ViewportInlineSize => "vi",
            Self::ViewportBlockSize => "vb",
            Self::ViewportMin => "vmin",
            Self::ViewportMax => "vmax",
            Self::SmallViewportWidth => "svw",
            Self::SmallViewportHeight => "svh",
            Self::SmallViewportInlineSize => "svi",
            Self::SmallViewportBlockSize => "svb",
            Self::SmallViewportMin => "svmin",
            Self::SmallViewportMax => "svmax",
            Self::LargeViewportWidth => "lvw",
            Self::LargeViewportHeight => "lvh",
            Self::LargeViewportInlineSize => "lvi",
            Self::LargeViewportBlockSize => "lvb",
            Self::LargeViewportMin => "lvmin",
            Self::LargeViewportMax => "lvmax",
            Self::DynamicViewportWidth => "dvw",
            Self::DynamicViewportHeight => "dvh",
            Self::DynamicViewportInlineSize => "dvi",
            Self::DynamicViewportBlockSize => "dvb",
            Self::DynamicViewportMin => "dvmin",
            Self::DynamicViewportMax => "dvmax",
            Self::ContainerWidth => "cqw",
            Self::ContainerHeight => "cqh",
            Self::ContainerInlineSize => "cqi",
            Self::ContainerBlockSize => "cqb",
            Self::ContainerMin => "cqmin",
            Self::ContainerMax => "cqmax",
            Self::Degrees => "deg",
            Self::Radians => "rad",
            Self::Gradians => "grad",
            Self::Turns => "turn",
            Self::Seconds => "s",
            Self::Milliseconds => "ms",
            Self::Hertz => "hz",
            Self::Kilohertz => "khz",
            Self::DotsPerPixel => "dppx",
            Self::DotsPerInch => "dpi",
            Self::DotsPerCentimeter => "dpcm",
            Self::Fraction => "fr",
        }
    }

    /// Absolute conversion family (relative lengths report `Other`).
    pub const fn unit_category(self) -> UnitCategory {
        match self {
            Self::Number | Self::Integer => UnitCategory::Number,
            Self::Percentage => UnitCategory::Percent,
            Self::Pixels
            | Self::Centimeters
            | Self::Millimeters
            | Self::QuarterMillimeters
            | Self::Inches
            | Self::Points
            | Self::Picas => UnitCategory::Length,
            Self::Degrees | Self::Radians | Self::Gradians | Self::Turns => UnitCategory::Angle,
            Self::Seconds | Self::Milliseconds => UnitCategory::Time,
            Self::Hertz | Self::Kilohertz => UnitCategory::Frequency,
            Self::DotsPerPixel | Self::DotsPerInch | Self::DotsPerCentimeter => {
                UnitCategory::Resolution
            }
            _ => UnitCategory::Other,
        }
    }

    /// Whether this is a length that needs font metrics to resolve.
    pub const fn is_font_relative(self) -> bool {
        matches!(
            self,
            Self::Ems
                | Self::RootEms
                | Self::Exs
                | Self::RootExs
                | Self::Chs
                | Self::RootChs
                | Self::Ics
                | Self::RootIcs
                | Self::LineHeights
                | Self::RootLineHeights
                | Self::CapHeights
                | Self::RootCapHeights
        )
    }

    /// Whether this is one of the `v*`, `sv*`, `lv*` or `dv*` units.
    pub const fn is_viewport_percentage(self) -> bool {
        matches!(
            self,
            Self::ViewportWidth
                | Self::ViewportHeight
                | Self::ViewportInlineSize
                | Self::ViewportBlockSize
                | Self::ViewportMin
                | Self::ViewportMax
                | Self::SmallViewportWidth
                | Self::SmallViewportHeight
                | Self::SmallViewportInlineSize
                | Self::SmallViewportBlockSize
                | Self::SmallViewportMin
                | Self::SmallViewportMax
                | Self::LargeViewportWidth
                | Self::LargeViewportHeight
                | Self::LargeViewportInlineSize
                | Self::LargeViewportBlockSize
                | Self::LargeViewportMin
                | Self::LargeViewportMax
                | Self::DynamicViewportWidth
                | Self::DynamicViewportHeight
                | Self::DynamicViewportInlineSize
                | Self::DynamicViewportBlockSize
                | Self::DynamicViewportMin
                | Self::DynamicViewportMax
        )
    }

    /// Whether this is one of the `cq*` units.
    pub const fn is_container_percentage(self) -> bool {
        matches!(
            self,
            Self::ContainerWidth
                | Self::ContainerHeight
                | Self::ContainerInlineSize
                | Self::ContainerBlockSize
                | Self::ContainerMin
                | Self::ContainerMax
        )
    }

    /// Relative lengths cannot be resolved without a `LengthResolver`.
    pub const fn is_relative(self) -> bool {
        self.is_font_relative() || self.is_viewport_percentage() || self.is_container_percentage()
    }

    /// Factor that converts a value in this unit into its family's canonical unit.
    ///
    /// Units without an absolute family convert with a factor of 1.
    pub fn conversion_to_canonical_units_scale_factor(self) -> f64 {
        match self {
            Self::Centimeters => PIXELS_PER_CENTIMETER,
            Self::Millimeters => PIXELS_PER_MILLIMETER,
            Self::QuarterMillimeters => PIXELS_PER_QUARTER_MILLIMETER,
            Self::Inches => PIXELS_PER_INCH,
            Self::Points => PIXELS_PER_POINT,
            Self::Picas => PIXELS_PER_PICA,
            Self::Radians => 180.0 / PI,
            Self::Gradians => 0.9,
            Self::Turns => 360.0,
            Self::Milliseconds => 0.001,
            Self::Kilohertz => 1000.0,
            Self::DotsPerInch => 1.0 / PIXELS_PER_INCH,
            Self::DotsPerCentimeter => 1.0 / PIXELS_PER_CENTIMETER,
            _ => 1.0,
        }
    }
}

/// Canonical unit of an absolute conversion family.
pub const fn canonical_unit_for_category(category: UnitCategory) -> Option<UnitType> {
    match category {
        UnitCategory::Number => Some(UnitType::Number),
        UnitCategory::Percent => Some(UnitType::Percentage),
        UnitCategory::Length => Some(UnitType::Pixels),
        UnitCategory::Angle => Some(UnitType::Degrees),
        UnitCategory::Time => Some(UnitType::Seconds),
        UnitCategory::Frequency => Some(UnitType::Hertz),
        UnitCategory::Resolution => Some(UnitType::DotsPerPixel),
        UnitCategory::Other => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    /// Unit keywords are matched without regard to ASCII case, and `x` aliases `dppx`.
    fn keywords_are_case_insensitive() {
        assert_eq!(UnitType::from_keyword("PX"), Some(UnitType::Pixels));
        assert_eq!(UnitType::from_keyword("kHz"), Some(UnitType::Kilohertz));
        assert_eq!(UnitType::from_keyword("x"), Some(UnitType::DotsPerPixel));
        assert_eq!(UnitType::from_keyword("furlong"), None);
    }

    #[test]
    /// Relative lengths have no absolute family.
    fn relative_lengths_are_not_convertible() {
        assert_eq!(UnitType::Ems.unit_category(), UnitCategory::Other);
        assert_eq!(UnitType::ContainerWidth.unit_category(), UnitCategory::Other);
        assert!(UnitType::DynamicViewportMax.is_relative());
        assert!(!UnitType::Inches.is_relative());
    }

    #[test]
    /// Scale factors land in the canonical unit of each family.
    fn scale_factors_match_css_definitions() {
        assert!((UnitType::Inches.conversion_to_canonical_units_scale_factor() - 96.0).abs() < 1e-12);
        assert!((UnitType::Points.conversion_to_canonical_units_scale_factor() * 72.0 - 96.0).abs() < 1e-9);
        assert!((UnitType::Turns.conversion_to_canonical_units_scale_factor() - 360.0).abs() < 1e-12);
        assert!((UnitType::Radians.conversion_to_canonical_units_scale_factor() * PI - 180.0).abs() < 1e-9);
        assert!((UnitType::DotsPerInch.conversion_to_canonical_units_scale_factor() * 96.0 - 1.0).abs() < 1e-12);
    }
}
