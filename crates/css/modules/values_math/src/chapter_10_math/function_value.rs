//! The value object a property holds after parsing a math function.

use std::rc::Rc;

use super::category::CalculationCategory;
use super::node::{MathExpressionNode, TreeScopeId};
use crate::calculation::{CalculationValue, ValueRange};
use crate::chapter_6_distance_units::LengthResolver;
use crate::clamping::clamp_double;

/// A parsed math function plus the range its property accepts.
#[derive(Clone, Debug, PartialEq)]
pub struct MathFunctionValue {
    expression: Rc<MathExpressionNode>,
    value_range: ValueRange,
}

impl MathFunctionValue {
    pub const fn new(expression: Rc<MathExpressionNode>, value_range: ValueRange) -> Self {
        Self {
            expression,
            value_range,
        }
    }

    pub const fn expression(&self) -> &Rc<MathExpressionNode> {
        &self.expression
    }

    pub const fn value_range(&self) -> ValueRange {
        self.value_range
    }

    pub fn category(&self) -> CalculationCategory {
        self.expression.category()
    }

    pub fn is_length(&self) -> bool {
        self.category() == CalculationCategory::Length
    }

    pub fn is_number(&self) -> bool {
        self.category() == CalculationCategory::Number
    }

    pub fn is_percentage(&self) -> bool {
        self.category() == CalculationCategory::Percent
    }

    /// Any percentage involvement, alone or mixed with lengths.
    pub fn has_percentage(&self) -> bool {
        matches!(
            self.category(),
            CalculationCategory::Percent | CalculationCategory::PercentLength
        )
    }

    pub fn is_angle(&self) -> bool {
        self.category() == CalculationCategory::Angle
    }

    pub fn is_time(&self) -> bool {
        self.category() == CalculationCategory::Time
    }

    pub fn is_frequency(&self) -> bool {
        self.category() == CalculationCategory::Frequency
    }

    pub fn is_resolution(&self) -> bool {
        self.category() == CalculationCategory::Resolution
    }

    /// Whether any comparison function appears in the tree.
    pub fn has_comparisons(&self) -> bool {
        self.expression.has_comparisons()
    }

    /// Serialized value; roots that are not themselves functions are wrapped in `calc()`.
    pub fn css_text(&self) -> String {
        let inner = self.expression.css_text();
        if self.expression.is_math_function() {
            inner
        } else {
            format!("calc({inner})")
        }
    }

    fn clamp_to_range(&self, value: f64) -> f64 {
        let clamped = clamp_double(value);
        match self.value_range {
            ValueRange::All => clamped,
            ValueRange::NonNegative => clamped.max(0.0),
        }
    }

    fn compute_category(
        &self,
        category: CalculationCategory,
        resolver: &dyn LengthResolver,
    ) -> Option<f64> {
        if self.category() != category {
            return None;
        }
        let value = self
            .expression
            .compute_value_in_canonical_unit()
            .or_else(|| self.expression.compute_value_with_resolver(resolver))?;
        Some(self.clamp_to_range(value))
    }

    /// Zoomed pixels.
    pub fn compute_length_px(&self, resolver: &dyn LengthResolver) -> Option<f64> {
        if !self.is_length() {
            return None;
        }
        let value = self.expression.compute_length_px(resolver)?;
        Some(self.clamp_to_range(value))
    }

    pub fn compute_degrees(&self, resolver: &dyn LengthResolver) -> Option<f64> {
        self.compute_category(CalculationCategory::Angle, resolver)
    }

    pub fn compute_seconds(&self, resolver: &dyn LengthResolver) -> Option<f64> {
        self.compute_category(CalculationCategory::Time, resolver)
    }

    pub fn compute_hertz(&self, resolver: &dyn LengthResolver) -> Option<f64> {
        self.compute_category(CalculationCategory::Frequency, resolver)
    }

    pub fn compute_dots_per_pixel(&self, resolver: &dyn LengthResolver) -> Option<f64> {
        self.compute_category(CalculationCategory::Resolution, resolver)
    }

    pub fn compute_number(&self, resolver: &dyn LengthResolver) -> Option<f64> {
        self.compute_category(CalculationCategory::Number, resolver)
    }

    /// Percentage value (in percent units) of a pure percentage tree.
    pub fn compute_percentage(&self) -> Option<f64> {
        if !self.is_percentage() {
            return None;
        }
        let value = self.expression.compute_value_in_canonical_unit()?;
        Some(self.clamp_to_range(value))
    }

    /// Layout-time value; negative percentage bases are only probed when the range
    /// allows negative results.
    pub fn to_calc_value(&self, resolver: &dyn LengthResolver) -> CalculationValue {
        self.expression.to_calc_value(
            resolver,
            self.value_range,
            self.value_range == ValueRange::All,
        )
    }

    /// Rebuild a math function from a resolved layout value.
    pub fn from_calculation_value(value: &CalculationValue) -> Option<Self> {
        let expression = MathExpressionNode::from_calculation_value(value)?;
        Some(Self::new(expression, value.range()))
    }

    /// Copy with every named anchor bound to `scope`.
    #[must_use]
    pub fn populate_with_tree_scope(&self, scope: TreeScopeId) -> Self {
        Self::new(self.expression.populate_with_tree_scope(scope), self.value_range)
    }
}
