//! §10.7 Type checking — calculation categories.
//! Spec: <https://www.w3.org/TR/css-values-4/#calc-type-checking>

use super::features::MathFeatures;
use crate::chapter_5_numeric_types::UnitType;

/// Compatibility class of a calculation.
///
/// `Other` is never the category of a built node: it only signals a failed type check.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CalculationCategory {
    Number,
    Length,
    Percent,
    PercentLength,
    Angle,
    Time,
    Frequency,
    Resolution,
    Identifier,
    Other,
}

impl CalculationCategory {
    /// Category of a unit, ignoring feature gates.
    pub const fn of_unit(unit: UnitType) -> Self {
        match unit {
            UnitType::Number | UnitType::Integer => Self::Number,
            UnitType::Percentage => Self::Percent,
            UnitType::Degrees | UnitType::Radians | UnitType::Gradians | UnitType::Turns => {
                Self::Angle
            }
            UnitType::Seconds | UnitType::Milliseconds => Self::Time,
            UnitType::Hertz | UnitType::Kilohertz => Self::Frequency,
            UnitType::DotsPerPixel | UnitType::DotsPerInch | UnitType::DotsPerCentimeter => {
                Self::Resolution
            }
            UnitType::Fraction => Self::Other,
            _ => Self::Length,
        }
    }

    /// Whether every value of this category can be compared in a single unit.
    pub const fn has_canonical_unit(self) -> bool {
        self.canonical_unit().is_some()
    }

    /// The unit folded results of this category are expressed in.
    pub const fn canonical_unit(self) -> Option<UnitType> {
        match self {
            Self::Number => Some(UnitType::Number),
            Self::Length => Some(UnitType::Pixels),
            Self::Percent => Some(UnitType::Percentage),
            Self::Angle => Some(UnitType::Degrees),
            Self::Time => Some(UnitType::Seconds),
            Self::Frequency => Some(UnitType::Hertz),
            Self::Resolution => Some(UnitType::DotsPerPixel),
            Self::PercentLength | Self::Identifier | Self::Other => None,
        }
    }
}

/// Category of `unit` under the given feature gates. Total: disabled or inapplicable
/// units map to `Other`.
pub const fn category_of(unit: UnitType, features: &MathFeatures) -> CalculationCategory {
    if !features.allows_unit(unit) {
        return CalculationCategory::Other;
    }
    CalculationCategory::of_unit(unit)
}

/// Result category of `a + b` / `a - b`.
pub const fn add_subtract_category(
    left: CalculationCategory,
    right: CalculationCategory,
) -> CalculationCategory {
    use CalculationCategory::{
        Angle, Frequency, Length, Number, Other, Percent, PercentLength, Resolution, Time,
    };
    match (left, right) {
        (Number, Number) => Number,
        (Length, Length) => Length,
        (Percent, Percent) => Percent,
        (Length | Percent | PercentLength, Length | Percent | PercentLength) => PercentLength,
        (Angle, Angle) => Angle,
        (Time, Time) => Time,
        (Frequency, Frequency) => Frequency,
        (Resolution, Resolution) => Resolution,
        _ => Other,
    }
}

/// Fold [`add_subtract_category`] across a list of categories.
pub fn common_category<I>(categories: I) -> CalculationCategory
where
    I: IntoIterator<Item = CalculationCategory>,
{
    let mut iter = categories.into_iter();
    let Some(first) = iter.next() else {
        return CalculationCategory::Other;
    };
    iter.try_fold(first, |acc, next| {
        let combined = add_subtract_category(acc, next);
        (combined != CalculationCategory::Other).then_some(combined)
    })
    .unwrap_or(CalculationCategory::Other)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    /// Lengths and percentages mix into percent-length; other mixes fail.
    fn add_subtract_table() {
        use CalculationCategory::*;
        assert_eq!(add_subtract_category(Length, Percent), PercentLength);
        assert_eq!(add_subtract_category(PercentLength, Length), PercentLength);
        assert_eq!(add_subtract_category(Length, Angle), Other);
        assert_eq!(add_subtract_category(Number, Length), Other);
        assert_eq!(add_subtract_category(Resolution, Resolution), Resolution);
        assert_eq!(add_subtract_category(Identifier, Identifier), Other);
    }

    #[test]
    /// Gated unit families classify as `other` when their feature is off.
    fn gated_units_are_other_when_disabled() {
        let baseline = MathFeatures::baseline();
        assert_eq!(category_of(UnitType::ContainerWidth, &baseline), CalculationCategory::Other);
        assert_eq!(category_of(UnitType::SmallViewportHeight, &baseline), CalculationCategory::Other);
        assert_eq!(category_of(UnitType::CapHeights, &baseline), CalculationCategory::Other);
        assert_eq!(category_of(UnitType::ViewportWidth, &baseline), CalculationCategory::Length);
        let all = MathFeatures::default();
        assert_eq!(category_of(UnitType::ContainerWidth, &all), CalculationCategory::Length);
        assert_eq!(category_of(UnitType::Fraction, &all), CalculationCategory::Other);
    }

    #[test]
    /// Folding stops at the first incompatible pair.
    fn common_category_folds_pairwise() {
        use CalculationCategory::*;
        assert_eq!(common_category([Length, Percent, Length]), PercentLength);
        assert_eq!(common_category([Length, Angle, Length]), Other);
        assert_eq!(common_category([]), Other);
    }
}
