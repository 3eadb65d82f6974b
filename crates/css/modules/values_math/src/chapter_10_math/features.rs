//! Feature gates and parser configuration.

use crate::chapter_5_numeric_types::UnitType;

/// Default bound on expression nesting; deeper input is rejected instead of recursing.
pub const MAX_EXPRESSION_DEPTH: usize = 100;

/// Which optional pieces of the math grammar are recognised.
///
/// A disabled function behaves exactly like an unknown one, and a disabled unit family
/// classifies as category `other`, so gated syntax is rejected at parse time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MathFeatures {
    /// `pow()`, `sqrt()`, `hypot()`, `log()`, `exp()`.
    pub exponential_functions: bool,
    /// `round()`, `mod()`, `rem()`.
    pub stepped_value_functions: bool,
    /// `abs()`, `sign()`.
    pub sign_functions: bool,
    /// `anchor()`, `anchor-size()`.
    pub anchor_positioning: bool,
    /// `progress()`, `media-progress()`, `container-progress()`.
    pub progress_notation: bool,
    /// `sin()` … `atan2()`.
    pub trigonometric_functions: bool,
    /// `vi`, `vb` and the `sv*`/`lv*`/`dv*` families.
    pub viewport_units_4: bool,
    /// `cqw` … `cqmax`.
    pub container_relative_units: bool,
    /// `rex`, `rch`, `ic`, `ric`, `lh`, `rlh`, `cap`, `rcap`.
    pub font_relative_units_4: bool,
}

impl Default for MathFeatures {
    fn default() -> Self {
        Self {
            exponential_functions: true,
            stepped_value_functions: true,
            sign_functions: true,
            anchor_positioning: true,
            progress_notation: true,
            trigonometric_functions: true,
            viewport_units_4: true,
            container_relative_units: true,
            font_relative_units_4: true,
        }
    }
}

impl MathFeatures {
    /// Only `calc()`, `min()`, `max()`, `clamp()` and CSS Values 3 units.
    pub const fn baseline() -> Self {
        Self {
            exponential_functions: false,
            stepped_value_functions: false,
            sign_functions: false,
            anchor_positioning: false,
            progress_notation: false,
            trigonometric_functions: false,
            viewport_units_4: false,
            container_relative_units: false,
            font_relative_units_4: false,
        }
    }

    /// Whether the unit's family is enabled.
    pub const fn allows_unit(&self, unit: UnitType) -> bool {
        match unit {
            UnitType::RootExs
            | UnitType::RootChs
            | UnitType::Ics
            | UnitType::RootIcs
            | UnitType::LineHeights
            | UnitType::RootLineHeights
            | UnitType::CapHeights
            | UnitType::RootCapHeights => self.font_relative_units_4,
            UnitType::ViewportWidth
            | UnitType::ViewportHeight
            | UnitType::ViewportMin
            | UnitType::ViewportMax => true,
            _ if unit.is_viewport_percentage() => self.viewport_units_4,
            _ if unit.is_container_percentage() => self.container_relative_units,
            _ => true,
        }
    }
}

/// Anchor functions the calling property accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AllowedAnchorQueries {
    /// `anchor()` (inset properties).
    pub anchor: bool,
    /// `anchor-size()` (sizing, margin and inset properties).
    pub anchor_size: bool,
}

impl AllowedAnchorQueries {
    pub const NONE: Self = Self {
        anchor: false,
        anchor_size: false,
    };
    pub const ALL: Self = Self {
        anchor: true,
        anchor_size: true,
    };
}

impl Default for AllowedAnchorQueries {
    fn default() -> Self {
        Self::NONE
    }
}

/// Everything a [`super::MathExpressionParser`] needs to know about its caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParserOptions {
    pub features: MathFeatures,
    pub allowed_anchor_queries: AllowedAnchorQueries,
    pub max_depth: usize,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            features: MathFeatures::default(),
            allowed_anchor_queries: AllowedAnchorQueries::NONE,
            max_depth: MAX_EXPRESSION_DEPTH,
        }
    }
}
