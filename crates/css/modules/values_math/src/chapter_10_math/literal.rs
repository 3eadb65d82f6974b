//! Numeric literal leaves.

use super::category::CalculationCategory;
use super::serialize::format_number;
use crate::chapter_5_numeric_types::{UnitCategory, UnitType, canonical_unit_for_category};

/// A value and its unit, canonical for absolute units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NumericLiteral {
    pub value: f64,
    pub unit: UnitType,
}

impl NumericLiteral {
    /// Build a literal, rewriting absolute units into their family's canonical unit.
    ///
    /// `number` and `integer` stay distinct; relative lengths keep their unit.
    pub fn new(value: f64, unit: UnitType) -> Self {
        let family = unit.unit_category();
        match (family, canonical_unit_for_category(family)) {
            (UnitCategory::Number | UnitCategory::Percent | UnitCategory::Other, _) | (_, None) => {
                Self { value, unit }
            }
            (_, Some(canonical)) => Self {
                value: value * unit.conversion_to_canonical_units_scale_factor(),
                unit: canonical,
            },
        }
    }

    pub const fn category(&self) -> CalculationCategory {
        CalculationCategory::of_unit(self.unit)
    }

    /// The stored value.
    pub const fn double_value(&self) -> f64 {
        self.value
    }

    /// Value in the canonical unit of its family, or `None` for relative lengths.
    pub fn compute_in_canonical_unit(&self) -> Option<f64> {
        if self.unit.unit_category() == UnitCategory::Other {
            return None;
        }
        Some(self.value * self.unit.conversion_to_canonical_units_scale_factor())
    }

    pub fn is_zero(&self) -> bool {
        self.value == 0.0
    }

    /// Serialized form, e.g. `3px`, `0.5`, `infinity * 1px`.
    pub fn css_text(&self) -> String {
        let keyword = self.unit.keyword();
        let number = format_number(self.value);
        if keyword.is_empty() {
            number
        } else if self.value.is_finite() {
            format!("{number}{keyword}")
        } else {
            format!("{number} * 1{keyword}")
        }
    }
}
