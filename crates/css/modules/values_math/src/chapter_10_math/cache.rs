//! Per-session cache of small literal nodes.

use std::collections::HashMap;
use std::rc::Rc;

use super::node::MathExpressionNode;
use crate::chapter_5_numeric_types::UnitType;

/// Largest integral value that is cached.
const MAX_CACHED_VALUE: f64 = 255.0;

/// Reuses integral `px`, `%`, number and integer literals in `0..=255`.
///
/// Inserting a literal that is already cached keeps the first instance.
#[derive(Debug, Default)]
pub struct LiteralCache {
    entries: HashMap<(UnitType, u64), Rc<MathExpressionNode>>,
}

impl LiteralCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn is_cacheable(value: f64, unit: UnitType) -> bool {
        matches!(
            unit,
            UnitType::Pixels | UnitType::Percentage | UnitType::Number | UnitType::Integer
        ) && value >= 0.0
            && value <= MAX_CACHED_VALUE
            && value.is_sign_positive()
    }

    /// Shared literal node for `value` in `unit`.
    pub fn literal(&mut self, value: f64, unit: UnitType) -> Option<Rc<MathExpressionNode>> {
        if !Self::is_cacheable(value, unit) || value.fract() != 0.0 {
            return MathExpressionNode::new_literal(value, unit);
        }
        if let Some(cached) = self.entries.get(&(unit, value.to_bits())) {
            return Some(Rc::clone(cached));
        }
        let node = MathExpressionNode::new_literal(value, unit)?;
        let entry = self
            .entries
            .entry((unit, value.to_bits()))
            .or_insert_with(|| Rc::clone(&node));
        Some(Rc::clone(entry))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
