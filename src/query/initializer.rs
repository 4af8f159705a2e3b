//! First inference pass: seeds types from the schema and from literals.

use std::collections::HashMap;

use tracing::debug;

use super::walker::{
    ComparisonOperator, LogicalOperator, MembershipOperator, StringOperator, Visitor,
};
use crate::types::{ColumnName, DataType, Literal, RequestElement, Value};
use crate::{Error, Reason, Result};

/// Seeds the type map in a single walk.
///
/// - every boolean-producing node is BOOLEAN
/// - a column gets its declared type, or the walk fails with
///   [`Reason::UnknownColumn`]
/// - double and boolean literals get DOUBLE and BOOLEAN; integer and string
///   literals are left for the [`Enhancer`](super::enhancer::Enhancer)
pub(crate) struct Initializer<'a> {
    schema: &'a HashMap<String, DataType>,
    types: &'a mut HashMap<RequestElement, DataType>,
}

impl<'a> Initializer<'a> {
    pub(crate) fn new(
        schema: &'a HashMap<String, DataType>,
        types: &'a mut HashMap<RequestElement, DataType>,
    ) -> Self {
        Self { schema, types }
    }

    fn boolean(&mut self, node: &RequestElement) {
        self.types.insert(node.clone(), DataType::Boolean);
    }
}

impl Visitor for Initializer<'_> {
    fn visit_column(&mut self, column: &ColumnName) -> Result<()> {
        let Some(&data_type) = self.schema.get(column.name()) else {
            debug!(column = column.name(), "predicate references unknown column");
            return Err(Error::bad_parameter(
                Reason::UnknownColumn,
                format!("column '{}' is not defined", column.name()),
            ));
        };
        self.types
            .insert(RequestElement::from(column.clone()), data_type);
        Ok(())
    }

    fn visit_value(&mut self, value: &Value) -> Result<()> {
        let seeded = match value.literal() {
            Literal::Double(_) => Some(DataType::Double),
            Literal::Boolean(_) => Some(DataType::Boolean),
            Literal::Long(_) | Literal::String(_) => None,
        };
        if let Some(data_type) = seeded {
            self.types
                .insert(RequestElement::from(value.clone()), data_type);
        }
        Ok(())
    }

    fn visit_logical(
        &mut self,
        node: &RequestElement,
        _operator: LogicalOperator,
        _operands: &[RequestElement],
    ) -> Result<()> {
        self.boolean(node);
        Ok(())
    }

    fn visit_comparison(
        &mut self,
        node: &RequestElement,
        _operator: ComparisonOperator,
        _left: &RequestElement,
        _right: &RequestElement,
    ) -> Result<()> {
        self.boolean(node);
        Ok(())
    }

    fn visit_membership(
        &mut self,
        node: &RequestElement,
        _operator: MembershipOperator,
        _column: &ColumnName,
        _values: &[Value],
    ) -> Result<()> {
        self.boolean(node);
        Ok(())
    }

    fn visit_string_match(
        &mut self,
        node: &RequestElement,
        _operator: StringOperator,
        _column: &ColumnName,
        _value: &Value,
        _case_sensitive: bool,
    ) -> Result<()> {
        self.boolean(node);
        Ok(())
    }
}
