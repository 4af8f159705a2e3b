//! Depth-first traversal of predicate trees.

use crate::types::{ColumnName, RequestElement, Value};
use crate::Result;

/// Boolean connectives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalOperator {
    /// Every operand must hold.
    And,
    /// At least one operand must hold.
    Or,
}

/// Binary comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComparisonOperator {
    /// `=`
    Equal,
    /// `<>`
    NotEqual,
    /// `>`
    GreaterThan,
    /// `>=`
    GreaterThanOrEqual,
    /// `<`
    LowerThan,
    /// `<=`
    LowerThanOrEqual,
}

/// Set membership operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MembershipOperator {
    /// Column value is one of the listed values.
    In,
    /// Column value is none of the listed values.
    NotIn,
}

/// String-only match operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StringOperator {
    /// Substring match.
    Contains,
    /// Prefix match.
    StartsWith,
    /// Suffix match.
    EndsWith,
}

/// Callbacks invoked by [`walk`] for every node of a predicate.
///
/// Composite callbacks receive the node itself (for use as a
/// [`Context`](crate::Context) key) together with its parts. The callback
/// runs before the walker descends into the children, so a pass may seed a
/// parent before its operands are visited.
///
/// Leaves nested in `In`/`Contains`-style nodes are reported through
/// [`visit_column`](Visitor::visit_column) and
/// [`visit_value`](Visitor::visit_value) like free-standing leaves.
pub trait Visitor {
    /// Called for a column reference.
    fn visit_column(&mut self, column: &ColumnName) -> Result<()>;

    /// Called for a literal value.
    fn visit_value(&mut self, value: &Value) -> Result<()>;

    /// Called for `And`/`Or`.
    fn visit_logical(
        &mut self,
        node: &RequestElement,
        operator: LogicalOperator,
        operands: &[RequestElement],
    ) -> Result<()>;

    /// Called for binary comparisons.
    fn visit_comparison(
        &mut self,
        node: &RequestElement,
        operator: ComparisonOperator,
        left: &RequestElement,
        right: &RequestElement,
    ) -> Result<()>;

    /// Called for `In`/`NotIn`.
    fn visit_membership(
        &mut self,
        node: &RequestElement,
        operator: MembershipOperator,
        column: &ColumnName,
        values: &[Value],
    ) -> Result<()>;

    /// Called for `Contains`/`StartsWith`/`EndsWith`.
    fn visit_string_match(
        &mut self,
        node: &RequestElement,
        operator: StringOperator,
        column: &ColumnName,
        value: &Value,
        case_sensitive: bool,
    ) -> Result<()>;
}

/// Walks `element` in pre-order and returns the visitor.
///
/// Lists are visited in order and binary nodes left before right. The walk
/// never modifies the tree; every effect is accumulated in the visitor. The
/// first error returned by a callback aborts the walk.
///
/// # Example
///
/// ```rust
/// use datagate::query::{walk, NodeCounter};
/// use datagate::RequestElement as E;
///
/// let predicate = E::or([E::is_in("a", [1, 2]), E::column("b")]);
/// let counter = walk(&predicate, NodeCounter::default())?;
/// assert_eq!(counter.count(), 6);
/// # Ok::<(), datagate::Error>(())
/// ```
pub fn walk<V: Visitor>(element: &RequestElement, mut visitor: V) -> Result<V> {
    walk_element(element, &mut visitor)?;
    Ok(visitor)
}

fn walk_element<V: Visitor + ?Sized>(element: &RequestElement, visitor: &mut V) -> Result<()> {
    use RequestElement as E;

    match element {
        E::ColumnName(column) => visitor.visit_column(column),
        E::Value(value) => visitor.visit_value(value),
        E::And { operands } => walk_logical(element, LogicalOperator::And, operands, visitor),
        E::Or { operands } => walk_logical(element, LogicalOperator::Or, operands, visitor),
        E::Equal { left, right } => {
            walk_comparison(element, ComparisonOperator::Equal, left, right, visitor)
        },
        E::NotEqual { left, right } => {
            walk_comparison(element, ComparisonOperator::NotEqual, left, right, visitor)
        },
        E::GreaterThan { left, right } => {
            walk_comparison(element, ComparisonOperator::GreaterThan, left, right, visitor)
        },
        E::GreaterThanOrEqual { left, right } => walk_comparison(
            element,
            ComparisonOperator::GreaterThanOrEqual,
            left,
            right,
            visitor,
        ),
        E::LowerThan { left, right } => {
            walk_comparison(element, ComparisonOperator::LowerThan, left, right, visitor)
        },
        E::LowerThanOrEqual { left, right } => walk_comparison(
            element,
            ComparisonOperator::LowerThanOrEqual,
            left,
            right,
            visitor,
        ),
        E::In { column, values } => {
            walk_membership(element, MembershipOperator::In, column, values, visitor)
        },
        E::NotIn { column, values } => {
            walk_membership(element, MembershipOperator::NotIn, column, values, visitor)
        },
        E::Contains {
            column,
            value,
            case_sensitive,
        } => walk_string_match(
            element,
            StringOperator::Contains,
            column,
            value,
            *case_sensitive,
            visitor,
        ),
        E::StartsWith {
            column,
            value,
            case_sensitive,
        } => walk_string_match(
            element,
            StringOperator::StartsWith,
            column,
            value,
            *case_sensitive,
            visitor,
        ),
        E::EndsWith {
            column,
            value,
            case_sensitive,
        } => walk_string_match(
            element,
            StringOperator::EndsWith,
            column,
            value,
            *case_sensitive,
            visitor,
        ),
    }
}

fn walk_logical<V: Visitor + ?Sized>(
    node: &RequestElement,
    operator: LogicalOperator,
    operands: &[RequestElement],
    visitor: &mut V,
) -> Result<()> {
    visitor.visit_logical(node, operator, operands)?;
    for operand in operands {
        walk_element(operand, visitor)?;
    }
    Ok(())
}

fn walk_comparison<V: Visitor + ?Sized>(
    node: &RequestElement,
    operator: ComparisonOperator,
    left: &RequestElement,
    right: &RequestElement,
    visitor: &mut V,
) -> Result<()> {
    visitor.visit_comparison(node, operator, left, right)?;
    walk_element(left, visitor)?;
    walk_element(right, visitor)
}

fn walk_membership<V: Visitor + ?Sized>(
    node: &RequestElement,
    operator: MembershipOperator,
    column: &ColumnName,
    values: &[Value],
    visitor: &mut V,
) -> Result<()> {
    visitor.visit_membership(node, operator, column, values)?;
    visitor.visit_column(column)?;
    for value in values {
        visitor.visit_value(value)?;
    }
    Ok(())
}

fn walk_string_match<V: Visitor + ?Sized>(
    node: &RequestElement,
    operator: StringOperator,
    column: &ColumnName,
    value: &Value,
    case_sensitive: bool,
    visitor: &mut V,
) -> Result<()> {
    visitor.visit_string_match(node, operator, column, value, case_sensitive)?;
    visitor.visit_column(column)?;
    visitor.visit_value(value)
}

/// A visitor counting every node, leaves included.
///
/// Used to bound the inference fixpoint loop.
#[derive(Debug, Default, Clone, Copy)]
pub struct NodeCounter {
    count: usize,
}

impl NodeCounter {
    /// Returns the number of nodes visited.
    pub fn count(&self) -> usize {
        self.count
    }
}

impl Visitor for NodeCounter {
    fn visit_column(&mut self, _column: &ColumnName) -> Result<()> {
        self.count += 1;
        Ok(())
    }

    fn visit_value(&mut self, _value: &Value) -> Result<()> {
        self.count += 1;
        Ok(())
    }

    fn visit_logical(
        &mut self,
        _node: &RequestElement,
        _operator: LogicalOperator,
        _operands: &[RequestElement],
    ) -> Result<()> {
        self.count += 1;
        Ok(())
    }

    fn visit_comparison(
        &mut self,
        _node: &RequestElement,
        _operator: ComparisonOperator,
        _left: &RequestElement,
        _right: &RequestElement,
    ) -> Result<()> {
        self.count += 1;
        Ok(())
    }

    fn visit_membership(
        &mut self,
        _node: &RequestElement,
        _operator: MembershipOperator,
        _column: &ColumnName,
        _values: &[Value],
    ) -> Result<()> {
        self.count += 1;
        Ok(())
    }

    fn visit_string_match(
        &mut self,
        _node: &RequestElement,
        _operator: StringOperator,
        _column: &ColumnName,
        _value: &Value,
        _case_sensitive: bool,
    ) -> Result<()> {
        self.count += 1;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::{Error, Reason};
    use RequestElement as E;

    /// Records the order in which nodes are visited.
    #[derive(Default)]
    struct Trace(Vec<String>);

    impl Visitor for Trace {
        fn visit_column(&mut self, column: &ColumnName) -> Result<()> {
            self.0.push(format!("col:{}", column.name()));
            Ok(())
        }

        fn visit_value(&mut self, value: &Value) -> Result<()> {
            self.0.push(format!("val:{:?}", value.literal()));
            Ok(())
        }

        fn visit_logical(
            &mut self,
            _node: &RequestElement,
            operator: LogicalOperator,
            operands: &[RequestElement],
        ) -> Result<()> {
            self.0.push(format!("{:?}/{}", operator, operands.len()));
            Ok(())
        }

        fn visit_comparison(
            &mut self,
            _node: &RequestElement,
            operator: ComparisonOperator,
            _left: &RequestElement,
            _right: &RequestElement,
        ) -> Result<()> {
            self.0.push(format!("{:?}", operator));
            Ok(())
        }

        fn visit_membership(
            &mut self,
            _node: &RequestElement,
            operator: MembershipOperator,
            _column: &ColumnName,
            _values: &[Value],
        ) -> Result<()> {
            self.0.push(format!("{:?}", operator));
            Ok(())
        }

        fn visit_string_match(
            &mut self,
            _node: &RequestElement,
            operator: StringOperator,
            _column: &ColumnName,
            _value: &Value,
            case_sensitive: bool,
        ) -> Result<()> {
            self.0.push(format!("{:?}/{}", operator, case_sensitive));
            Ok(())
        }
    }

    #[test]
    fn test_pre_order_traversal() {
        let predicate = E::and([
            E::greater_than(E::column("a"), E::value(1)),
            E::not_in("b", ["x", "y"]),
            E::starts_with("c", "pre", true),
        ]);

        let trace = walk(&predicate, Trace::default()).unwrap();
        assert_eq!(
            trace.0,
            vec![
                "And/3",
                "GreaterThan",
                "col:a",
                "val:Long(1)",
                "NotIn",
                "col:b",
                "val:String(\"x\")",
                "val:String(\"y\")",
                "StartsWith/true",
                "col:c",
                "val:String(\"pre\")",
            ]
        );
    }

    #[test]
    fn test_every_comparison_maps_to_its_operator() {
        let cases = [
            (E::equal(E::column("a"), E::column("b")), ComparisonOperator::Equal),
            (E::not_equal(E::column("a"), E::column("b")), ComparisonOperator::NotEqual),
            (E::greater_than(E::column("a"), E::column("b")), ComparisonOperator::GreaterThan),
            (
                E::greater_than_or_equal(E::column("a"), E::column("b")),
                ComparisonOperator::GreaterThanOrEqual,
            ),
            (E::lower_than(E::column("a"), E::column("b")), ComparisonOperator::LowerThan),
            (
                E::lower_than_or_equal(E::column("a"), E::column("b")),
                ComparisonOperator::LowerThanOrEqual,
            ),
        ];

        for (predicate, operator) in cases {
            let trace = walk(&predicate, Trace::default()).unwrap();
            assert_eq!(trace.0[0], format!("{:?}", operator));
        }
    }

    #[test]
    fn test_node_counter() {
        let predicate = E::or([
            E::equal(E::column("a"), E::value(1)),
            E::contains("s", "x", false),
        ]);
        let counter = walk(&predicate, NodeCounter::default()).unwrap();
        assert_eq!(counter.count(), 7);
    }

    /// Fails on the first value it sees.
    struct FailOnValue(usize);

    impl Visitor for FailOnValue {
        fn visit_column(&mut self, _column: &ColumnName) -> Result<()> {
            self.0 += 1;
            Ok(())
        }

        fn visit_value(&mut self, _value: &Value) -> Result<()> {
            Err(Error::bad_parameter(Reason::UntypedElement, "stop"))
        }

        fn visit_logical(
            &mut self,
            _node: &RequestElement,
            _operator: LogicalOperator,
            _operands: &[RequestElement],
        ) -> Result<()> {
            Ok(())
        }

        fn visit_comparison(
            &mut self,
            _node: &RequestElement,
            _operator: ComparisonOperator,
            _left: &RequestElement,
            _right: &RequestElement,
        ) -> Result<()> {
            Ok(())
        }

        fn visit_membership(
            &mut self,
            _node: &RequestElement,
            _operator: MembershipOperator,
            _column: &ColumnName,
            _values: &[Value],
        ) -> Result<()> {
            Ok(())
        }

        fn visit_string_match(
            &mut self,
            _node: &RequestElement,
            _operator: StringOperator,
            _column: &ColumnName,
            _value: &Value,
            _case_sensitive: bool,
        ) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_error_aborts_walk() {
        let predicate = E::and([
            E::equal(E::column("a"), E::value(1)),
            E::equal(E::column("b"), E::column("c")),
        ]);
        let err = walk(&predicate, FailOnValue(0)).err().unwrap();
        assert_eq!(err.reason(), Some(Reason::UntypedElement));
    }
}
