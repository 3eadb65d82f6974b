//! Expression tree nodes.
//!
//! Nodes are immutable once built and shared through `Rc`; every "edit" returns a
//! new node.

use std::rc::Rc;

use smallvec::SmallVec;

use super::category::CalculationCategory;
use super::literal::NumericLiteral;
use super::operator::MathOperator;
use crate::chapter_5_numeric_types::UnitType;

/// Identity of the tree scope a tree-scoped name was declared in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TreeScopeId(pub u32);

/// An author-defined name plus the tree scope it was bound in, once known.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScopedName {
    pub name: String,
    pub scope: Option<TreeScopeId>,
}

/// The anchor an `anchor()`/`anchor-size()` query targets.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AnchorSpecifier {
    /// No name: the element's default anchor.
    Default,
    Named(ScopedName),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnchorQueryType {
    Anchor,
    AnchorSize,
}

/// `<anchor-side>` keywords.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnchorSide {
    Inside,
    Outside,
    Top,
    Left,
    Right,
    Bottom,
    Start,
    End,
    SelfStart,
    SelfEnd,
    Center,
}

impl AnchorSide {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        let side = cssparser::match_ignore_ascii_case! { keyword,
            "inside" => Self::Inside,
            "outside" => Self::Outside,
            "top" => Self::Top,
            "left" => Self::Left,
            "right" => Self::Right,
            "bottom" => Self::Bottom,
            "start" => Self::Start,
            "end" => Self::End,
            "self-start" => Self::SelfStart,
            "self-end" => Self::SelfEnd,
            "center" => Self::Center,
            _ => return None,
        };
        Some(side)
    }

    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Inside => "inside",
            Self::Outside => "outside",
            Self::Top => "top",
            Self::Left => "left",
            Self::Right => "right",
            Self::Bottom => "bottom",
            Self::Start => "start",
            Self::End => "end",
            Self::SelfStart => "self-start",
            Self::SelfEnd => "self-end",
            Self::Center => "center",
        }
    }
}

/// `<anchor-size>` keywords; `Implicit` when the argument is omitted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnchorSizeValue {
    Implicit,
    Width,
    Height,
    Block,
    Inline,
    SelfBlock,
    SelfInline,
}

impl AnchorSizeValue {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        let size = cssparser::match_ignore_ascii_case! { keyword,
            "width" => Self::Width,
            "height" => Self::Height,
            "block" => Self::Block,
            "inline" => Self::Inline,
            "self-block" => Self::SelfBlock,
            "self-inline" => Self::SelfInline,
            _ => return None,
        };
        Some(size)
    }

    pub const fn keyword(self) -> Option<&'static str> {
        match self {
            Self::Implicit => None,
            Self::Width => Some("width"),
            Self::Height => Some("height"),
            Self::Block => Some("block"),
            Self::Inline => Some("inline"),
            Self::SelfBlock => Some("self-block"),
            Self::SelfInline => Some("self-inline"),
        }
    }
}

/// What an anchor query measures.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AnchorQueryValue {
    Side(AnchorSide),
    /// `anchor(<percentage>)`, stored in percent units.
    Percentage(f64),
    Size(AnchorSizeValue),
}

/// An `anchor()` or `anchor-size()` leaf.
#[derive(Clone, Debug, PartialEq)]
pub struct AnchorQuery {
    pub query_type: AnchorQueryType,
    pub specifier: AnchorSpecifier,
    pub value: AnchorQueryValue,
    pub fallback: Option<Rc<MathExpressionNode>>,
}

/// An operator applied to an ordered operand list.
#[derive(Clone, Debug, PartialEq)]
pub struct Operation {
    pub op: MathOperator,
    pub operands: SmallVec<Rc<MathExpressionNode>, 2>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    NumericLiteral(NumericLiteral),
    /// Bare keyword argument, e.g. the feature name of `media-progress()`.
    IdentifierLiteral(String),
    Operation(Operation),
    AnchorQuery(AnchorQuery),
}

/// One node of a parsed math expression.
#[derive(Clone, Debug, PartialEq)]
pub struct MathExpressionNode {
    kind: NodeKind,
    category: CalculationCategory,
    has_comparisons: bool,
    is_nested: bool,
    needs_tree_scope_population: bool,
}

impl MathExpressionNode {
    /// Literal leaf, or `None` for units that are never valid in a calculation.
    pub fn new_literal(value: f64, unit: UnitType) -> Option<Rc<Self>> {
        Self::from_numeric_literal(NumericLiteral::new(value, unit))
    }

    pub fn from_numeric_literal(literal: NumericLiteral) -> Option<Rc<Self>> {
        let category = literal.category();
        if category == CalculationCategory::Other {
            return None;
        }
        Some(Rc::new(Self {
            kind: NodeKind::NumericLiteral(literal),
            category,
            has_comparisons: false,
            is_nested: false,
            needs_tree_scope_population: false,
        }))
    }

    pub fn new_identifier(name: impl Into<String>) -> Rc<Self> {
        Rc::new(Self {
            kind: NodeKind::IdentifierLiteral(name.into()),
            category: CalculationCategory::Identifier,
            has_comparisons: false,
            is_nested: false,
            needs_tree_scope_population: false,
        })
    }

    /// Operation node with an already type-checked category.
    pub(crate) fn new_operation(
        op: MathOperator,
        operands: SmallVec<Rc<Self>, 2>,
        category: CalculationCategory,
    ) -> Rc<Self> {
        let has_comparisons =
            op.is_comparison() || operands.iter().any(|operand| operand.has_comparisons);
        let needs_tree_scope_population =
            operands.iter().any(|operand| operand.needs_tree_scope_population);
        Rc::new(Self {
            kind: NodeKind::Operation(Operation { op, operands }),
            category,
            has_comparisons,
            is_nested: false,
            needs_tree_scope_population,
        })
    }

    pub fn new_anchor_query(query: AnchorQuery) -> Rc<Self> {
        let unbound_name =
            matches!(&query.specifier, AnchorSpecifier::Named(name) if name.scope.is_none());
        let fallback_needs_scope = query
            .fallback
            .as_ref()
            .is_some_and(|fallback| fallback.needs_tree_scope_population);
        let has_comparisons = query
            .fallback
            .as_ref()
            .is_some_and(|fallback| fallback.has_comparisons);
        Rc::new(Self {
            kind: NodeKind::AnchorQuery(query),
            category: CalculationCategory::PercentLength,
            has_comparisons,
            is_nested: false,
            needs_tree_scope_population: unbound_name || fallback_needs_scope,
        })
    }

    pub const fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub const fn category(&self) -> CalculationCategory {
        self.category
    }

    pub const fn has_comparisons(&self) -> bool {
        self.has_comparisons
    }

    pub const fn is_nested(&self) -> bool {
        self.is_nested
    }

    pub const fn needs_tree_scope_population(&self) -> bool {
        self.needs_tree_scope_population
    }

    pub const fn as_literal(&self) -> Option<&NumericLiteral> {
        match &self.kind {
            NodeKind::NumericLiteral(literal) => Some(literal),
            _ => None,
        }
    }

    pub const fn as_operation(&self) -> Option<&Operation> {
        match &self.kind {
            NodeKind::Operation(operation) => Some(operation),
            _ => None,
        }
    }

    pub const fn is_numeric_literal(&self) -> bool {
        matches!(self.kind, NodeKind::NumericLiteral(_))
    }

    pub const fn is_operation(&self) -> bool {
        matches!(self.kind, NodeKind::Operation(_))
    }

    pub const fn is_anchor_query(&self) -> bool {
        matches!(self.kind, NodeKind::AnchorQuery(_))
    }

    /// Whether this node serializes as a function call rather than a bare value.
    pub fn is_math_function(&self) -> bool {
        match &self.kind {
            NodeKind::Operation(operation) => !operation.op.is_arithmetic(),
            NodeKind::AnchorQuery(_) => true,
            NodeKind::NumericLiteral(_) | NodeKind::IdentifierLiteral(_) => false,
        }
    }

    /// A numeric literal whose value is zero.
    pub fn is_zero(&self) -> bool {
        self.as_literal().is_some_and(NumericLiteral::is_zero)
    }

    /// Copy of this node with the nested flag set or cleared.
    pub fn with_nested(self: &Rc<Self>, nested: bool) -> Rc<Self> {
        if self.is_nested == nested {
            return Rc::clone(self);
        }
        Rc::new(Self {
            is_nested: nested,
            ..Self::clone(self)
        })
    }

    /// Unit the node's value is expressed in when it has a single one.
    pub fn resolved_unit_type(&self) -> Option<UnitType> {
        if let Some(literal) = self.as_literal() {
            return Some(literal.unit);
        }
        if let Some(operation) = self.as_operation()
            && operation.op.is_arithmetic()
            && let Some(first) = operation.operands.first()
            && first.category == self.category
        {
            let unit = first.resolved_unit_type()?;
            let shared = operation.operands.iter().all(|operand| {
                operand.category != self.category || operand.resolved_unit_type() == Some(unit)
            });
            if shared {
                return Some(unit);
            }
        }
        self.category.canonical_unit()
    }

    /// Numeric value of the node: the stored value of a literal, otherwise the
    /// canonical-unit value when the tree can be computed without context.
    pub fn double_value(&self) -> Option<f64> {
        match &self.kind {
            NodeKind::NumericLiteral(literal) => Some(literal.double_value()),
            _ => self.compute_value_in_canonical_unit(),
        }
    }

    /// New tree in which every named anchor specifier is bound to `scope`.
    pub fn populate_with_tree_scope(self: &Rc<Self>, scope: TreeScopeId) -> Rc<Self> {
        if !self.needs_tree_scope_population {
            return Rc::clone(self);
        }
        let kind = match &self.kind {
            NodeKind::Operation(operation) => NodeKind::Operation(Operation {
                op: operation.op,
                operands: operation
                    .operands
                    .iter()
                    .map(|operand| operand.populate_with_tree_scope(scope))
                    .collect(),
            }),
            NodeKind::AnchorQuery(query) => {
                let specifier = match &query.specifier {
                    AnchorSpecifier::Named(name) if name.scope.is_none() => {
                        AnchorSpecifier::Named(ScopedName {
                            name: name.name.clone(),
                            scope: Some(scope),
                        })
                    }
                    other => other.clone(),
                };
                NodeKind::AnchorQuery(AnchorQuery {
                    query_type: query.query_type,
                    specifier,
                    value: query.value,
                    fallback: query
                        .fallback
                        .as_ref()
                        .map(|fallback| fallback.populate_with_tree_scope(scope)),
                })
            }
            NodeKind::NumericLiteral(_) | NodeKind::IdentifierLiteral(_) => {
                return Rc::clone(self);
            }
        };
        log::trace!(target: "css::values::math", "[CALC-SCOPE] bound scope={scope:?}");
        Rc::new(Self {
            kind,
            needs_tree_scope_population: false,
            ..Self::clone(self)
        })
    }
}
