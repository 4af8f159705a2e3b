//! Propagation pass run until the type map stops changing.

use std::collections::HashMap;

use super::walker::{
    ComparisonOperator, LogicalOperator, MembershipOperator, StringOperator, Visitor,
};
use crate::types::{ColumnName, DataType, RequestElement, Value};
use crate::{Error, Reason, Result};

/// One propagation walk over a seeded type map.
///
/// Counts every type it assigns; a walk that assigns nothing means the map
/// reached its fixpoint. Assignments are monotone (only untyped nodes are
/// ever written), so repeated walks terminate.
pub(crate) struct Enhancer<'a> {
    types: &'a mut HashMap<RequestElement, DataType>,
    changes: usize,
}

impl<'a> Enhancer<'a> {
    pub(crate) fn new(types: &'a mut HashMap<RequestElement, DataType>) -> Self {
        Self { types, changes: 0 }
    }

    /// Number of types assigned during this walk.
    pub(crate) fn changes(&self) -> usize {
        self.changes
    }

    fn assign(&mut self, node: &RequestElement, data_type: DataType) {
        self.types.insert(node.clone(), data_type);
        self.changes += 1;
    }

    /// Copies a known type onto the untyped side, or checks both are compatible.
    fn propagate(&mut self, left: &RequestElement, right: &RequestElement) -> Result<()> {
        let left_type = self.types.get(left).copied();
        let right_type = self.types.get(right).copied();

        match (left_type, right_type) {
            (Some(known), None) => self.assign(right, known),
            (None, Some(known)) => self.assign(left, known),
            (Some(l), Some(r)) if !l.is_compatible_with(r) => {
                return Err(Error::bad_parameter(
                    Reason::DifferentLeftRightType,
                    format!("cannot compare {} with {}", l, r),
                ));
            },
            _ => {},
        }
        Ok(())
    }
}

impl Visitor for Enhancer<'_> {
    fn visit_column(&mut self, _column: &ColumnName) -> Result<()> {
        Ok(())
    }

    fn visit_value(&mut self, _value: &Value) -> Result<()> {
        Ok(())
    }

    fn visit_logical(
        &mut self,
        _node: &RequestElement,
        operator: LogicalOperator,
        operands: &[RequestElement],
    ) -> Result<()> {
        let offending = operands
            .iter()
            .filter_map(|operand| self.types.get(operand))
            .find(|&&t| t != DataType::Boolean);

        match offending {
            Some(data_type) => Err(Error::bad_parameter(
                Reason::ChildrenNotBoolean,
                format!("{:?} operand is {}, expected BOOLEAN", operator, data_type),
            )),
            None => Ok(()),
        }
    }

    fn visit_comparison(
        &mut self,
        _node: &RequestElement,
        _operator: ComparisonOperator,
        left: &RequestElement,
        right: &RequestElement,
    ) -> Result<()> {
        self.propagate(left, right)
    }

    fn visit_membership(
        &mut self,
        _node: &RequestElement,
        _operator: MembershipOperator,
        column: &ColumnName,
        values: &[Value],
    ) -> Result<()> {
        let column = RequestElement::from(column.clone());
        for value in values {
            self.propagate(&column, &RequestElement::from(value.clone()))?;
        }
        Ok(())
    }

    fn visit_string_match(
        &mut self,
        _node: &RequestElement,
        operator: StringOperator,
        column: &ColumnName,
        value: &Value,
        _case_sensitive: bool,
    ) -> Result<()> {
        let column_key = RequestElement::from(column.clone());
        match self.types.get(&column_key) {
            Some(DataType::String) => {},
            other => {
                return Err(Error::bad_parameter(
                    Reason::ColumnNotString,
                    format!(
                        "{:?} requires a STRING column, '{}' is {}",
                        operator,
                        column.name(),
                        other.map_or("untyped", |t| t.as_str())
                    ),
                ));
            },
        }

        let value_key = RequestElement::from(value.clone());
        match self.types.get(&value_key).copied() {
            None => self.assign(&value_key, DataType::String),
            Some(DataType::String) => {},
            Some(other) => {
                return Err(Error::bad_parameter(
                    Reason::ValueNotString,
                    format!("{:?} requires a STRING value, got {}", operator, other),
                ));
            },
        }
        Ok(())
    }
}
