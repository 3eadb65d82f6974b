//! CSS Values & Units Level 4 — §6 Distance Units
//! Spec: <https://www.w3.org/TR/css-values-4/#lengths>
//!
//! Resolution of relative lengths is delegated to a [`LengthResolver`] supplied by the
//! caller; this module only knows how each unit maps onto the metrics it asks for.

use crate::chapter_5_numeric_types::UnitType;

/// Font metric a font-relative unit is measured against (CSS pixels, unzoomed).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FontMetric {
    FontSize,
    RootFontSize,
    XHeight,
    RootXHeight,
    ZeroAdvance,
    RootZeroAdvance,
    IdeographicAdvance,
    RootIdeographicAdvance,
    LineHeight,
    RootLineHeight,
    CapHeight,
    RootCapHeight,
}

/// Which viewport size a viewport-percentage unit refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewportKind {
    /// `v*` units; UA-defined, treated as the large viewport.
    Default,
    Small,
    Large,
    Dynamic,
}

/// Viewport metrics used to evaluate viewport-relative units.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub width_px: u32,
    pub height_px: u32,
}

/// Resolution-time metrics for relative units.
///
/// Implementations hand back raw metrics; the engine never inspects anything else.
pub trait LengthResolver {
    /// Effective zoom applied to every resolved length.
    fn zoom(&self) -> f64;

    /// Size of the given font metric in CSS pixels.
    fn font_metric(&self, metric: FontMetric) -> f64;

    /// `(width, height)` of the requested viewport in CSS pixels.
    fn viewport_size(&self, kind: ViewportKind) -> (f64, f64);

    /// `(width, height)` of the nearest size query container, if any.
    fn container_size(&self) -> Option<(f64, f64)>;

    /// Whether the inline axis is horizontal.
    fn is_horizontal_writing_mode(&self) -> bool {
        true
    }

    /// Scale a CSS pixel value by the zoom factor.
    fn zoomed_pixels(&self, css_pixels: f64) -> f64 {
        css_pixels * self.zoom()
    }
}

fn font_metric_for(unit: UnitType) -> Option<FontMetric> {
    let metric = match unit {
        UnitType::Ems => FontMetric::FontSize,
        UnitType::RootEms => FontMetric::RootFontSize,
        UnitType::Exs => FontMetric::XHeight,
        UnitType::RootExs => FontMetric::RootXHeight,
        UnitType::Chs => FontMetric::ZeroAdvance,
        UnitType::RootChs => FontMetric::RootZeroAdvance,
        UnitType::Ics => FontMetric::IdeographicAdvance,
        UnitType::RootIcs => FontMetric::RootIdeographicAdvance,
        UnitType::LineHeights => FontMetric::LineHeight,
        UnitType::RootLineHeights => FontMetric::RootLineHeight,
        UnitType::CapHeights => FontMetric::CapHeight,
        UnitType::RootCapHeights => FontMetric::RootCapHeight,
        _ => return None,
    };
    Some(metric)
}

/// Axis selector shared by viewport and container units.
#[derive(Clone, Copy)]
enum Axis {
    Width,
    Height,
    Inline,
    Block,
    Min,
    Max,
}

fn viewport_axis(unit: UnitType) -> Option<(ViewportKind, Axis)> {
    let pair = match unit {
        UnitType::ViewportWidth => (ViewportKind::Default, Axis::Width),
        UnitType::ViewportHeight => (ViewportKind::Default, Axis::Height),
        UnitType::ViewportInlineSize => (ViewportKind::Default, Axis::Inline),
        UnitType::ViewportBlockSize => (ViewportKind::Default, Axis::Block),
        UnitType::ViewportMin => (ViewportKind::Default, Axis::Min),
        UnitType::ViewportMax => (ViewportKind::Default, Axis::Max),
        UnitType::SmallViewportWidth => (ViewportKind::Small, Axis::Width),
        UnitType::SmallViewportHeight => (ViewportKind::Small, Axis::Height),
        UnitType::SmallViewportInlineSize => (ViewportKind::Small, Axis::Inline),
        UnitType::SmallViewportBlockSize => (ViewportKind::Small, Axis::Block),
        UnitType::SmallViewportMin => (ViewportKind::Small, Axis::Min),
        UnitType::SmallViewportMax => (ViewportKind::Small, Axis::Max),
        UnitType::LargeViewportWidth => (ViewportKind::Large, Axis::Width),
        UnitType::LargeViewportHeight => (ViewportKind::Large, Axis::Height),
        UnitType::LargeViewportInlineSize => (ViewportKind::Large, Axis::Inline),
        UnitType::LargeViewportBlockSize => (ViewportKind::Large, Axis::Block),
        UnitType::LargeViewportMin => (ViewportKind::Large, Axis::Min),
        UnitType::LargeViewportMax => (ViewportKind::Large, Axis::Max),
        UnitType::DynamicViewportWidth => (ViewportKind::Dynamic, Axis::Width),
        UnitType::DynamicViewportHeight => (ViewportKind::Dynamic, Axis::Height),
        UnitType::DynamicViewportInlineSize => (ViewportKind::Dynamic, Axis::Inline),
        UnitType::DynamicViewportBlockSize => (ViewportKind::Dynamic, Axis::Block),
        UnitType::DynamicViewportMin => (ViewportKind::Dynamic, Axis::Min),
        UnitType::DynamicViewportMax => (ViewportKind::Dynamic, Axis::Max),
        _ => return None,
    };
    Some(pair)
}

fn container_axis(unit: UnitType) -> Option<Axis> {
    let axis = match unit {
        UnitType::ContainerWidth => Axis::Width,
        UnitType::ContainerHeight => Axis::Height,
        UnitType::ContainerInlineSize => Axis::Inline,
        UnitType::ContainerBlockSize => Axis::Block,
        UnitType::ContainerMin => Axis::Min,
        UnitType::ContainerMax => Axis::Max,
        _ => return None,
    };
    Some(axis)
}

fn pick_axis(size: (f64, f64), axis: Axis, horizontal: bool) -> f64 {
    let (width, height) = size;
    match axis {
        Axis::Width => width,
        Axis::Height => height,
        Axis::Inline => {
            if horizontal {
                width
            } else {
                height
            }
        }
        Axis::Block => {
            if horizontal {
                height
            } else {
                width
            }
        }
        Axis::Min => width.min(height),
        Axis::Max => width.max(height),
    }
}

/// Compute the zoomed pixel value of `value` expressed in the length `unit`.
///
/// - Absolute units use the fixed CSS ratios (96px per inch).
/// - Font-relative units scale by the resolver's font metrics.
/// - Viewport and container units are a percentage of the matching axis; with no
///   query container, `cq*` units fall back to the small viewport.
///
/// Returns `None` when `unit` is not a length.
pub fn compute_length_px(value: f64, unit: UnitType, resolver: &dyn LengthResolver) -> Option<f64> {
    let horizontal = resolver.is_horizontal_writing_mode();
    let css_pixels = if let Some(metric) = font_metric_for(unit) {
        value * resolver.font_metric(metric)
    } else if let Some((kind, axis)) = viewport_axis(unit) {
        value * pick_axis(resolver.viewport_size(kind), axis, horizontal) / 100.0
    } else if let Some(axis) = container_axis(unit) {
        let size = resolver
            .container_size()
            .unwrap_or_else(|| resolver.viewport_size(ViewportKind::Small));
        value * pick_axis(size, axis, horizontal) / 100.0
    } else {
        match unit {
            UnitType::Pixels
            | UnitType::Centimeters
            | UnitType::Millimeters
            | UnitType::QuarterMillimeters
            | UnitType::Inches
            | UnitType::Points
            | UnitType::Picas => value * unit.conversion_to_canonical_units_scale_factor(),
            _ => return None,
        }
    };
    Some(resolver.zoomed_pixels(css_pixels))
}

/// A resolver with fixed metrics, for callers that already know the environment.
///
/// Secondary font metrics are derived from the font size with the usual fallback
/// ratios (ex and ch at 0.5em, cap at 0.7em, ic at 1em, lh at 1.2em).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StaticLengthResolver {
    pub zoom: f64,
    pub font_size_px: f64,
    pub root_font_size_px: f64,
    pub viewport: Viewport,
    pub container: Option<Viewport>,
    pub horizontal_writing_mode: bool,
}

impl Default for StaticLengthResolver {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            font_size_px: 16.0,
            root_font_size_px: 16.0,
            viewport: Viewport {
                width_px: 800,
                height_px: 600,
            },
            container: None,
            horizontal_writing_mode: true,
        }
    }
}

impl LengthResolver for StaticLengthResolver {
    fn zoom(&self) -> f64 {
        self.zoom
    }

    fn font_metric(&self, metric: FontMetric) -> f64 {
        let (base, ratio) = match metric {
            FontMetric::FontSize => (self.font_size_px, 1.0),
            FontMetric::RootFontSize => (self.root_font_size_px, 1.0),
            FontMetric::XHeight | FontMetric::ZeroAdvance => (self.font_size_px, 0.5),
            FontMetric::RootXHeight | FontMetric::RootZeroAdvance => (self.root_font_size_px, 0.5),
            FontMetric::IdeographicAdvance => (self.font_size_px, 1.0),
            FontMetric::RootIdeographicAdvance => (self.root_font_size_px, 1.0),
            FontMetric::LineHeight => (self.font_size_px, 1.2),
            FontMetric::RootLineHeight => (self.root_font_size_px, 1.2),
            FontMetric::CapHeight => (self.font_size_px, 0.7),
            FontMetric::RootCapHeight => (self.root_font_size_px, 0.7),
        };
        base * ratio
    }

    fn viewport_size(&self, _kind: ViewportKind) -> (f64, f64) {
        (
            f64::from(self.viewport.width_px),
            f64::from(self.viewport.height_px),
        )
    }

    fn container_size(&self) -> Option<(f64, f64)> {
        self.container
            .map(|container| (f64::from(container.width_px), f64::from(container.height_px)))
    }

    fn is_horizontal_writing_mode(&self) -> bool {
        self.horizontal_writing_mode
    }
}
