//! Type context of a predicate and the builder that infers it.

use std::collections::HashMap;

use tracing::{debug, trace};

use super::enhancer::Enhancer;
use super::initializer::Initializer;
use super::walker::{walk, NodeCounter};
use crate::types::{Column, ColumnName, DataType, RequestElement, Value};
use crate::{Error, Reason, Result};

/// The data type of every typed node of one predicate.
///
/// Keys are structural: identical sub-expressions share one entry. Nodes the
/// inference could not type are absent; see [`Context::require`].
///
/// Built by [`build_context`] or [`ContextBuilder::build`]; immutable
/// afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Context {
    types: HashMap<RequestElement, DataType>,
}

impl Context {
    /// Returns the type inferred for `node`.
    #[inline]
    pub fn get(&self, node: &RequestElement) -> Option<DataType> {
        self.types.get(node).copied()
    }

    /// Returns the type of a column reference.
    pub fn column_type(&self, column: &ColumnName) -> Option<DataType> {
        self.get(&RequestElement::from(column.clone()))
    }

    /// Returns the type inferred for a literal value.
    pub fn value_type(&self, value: &Value) -> Option<DataType> {
        self.get(&RequestElement::from(value.clone()))
    }

    /// Returns the type of `node`, failing if inference left it untyped.
    ///
    /// Query translators call this for nodes they must render with a
    /// concrete type, e.g. two literals compared only to each other.
    ///
    /// # Errors
    ///
    /// Returns a bad-parameter error with [`Reason::UntypedElement`].
    pub fn require(&self, node: &RequestElement) -> Result<DataType> {
        self.get(node).ok_or_else(|| {
            Error::bad_parameter(
                Reason::UntypedElement,
                format!("cannot infer a type for {:?}", node),
            )
        })
    }

    /// Returns the number of typed nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns `true` if no node is typed.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Iterates over every typed node.
    pub fn iter(&self) -> impl Iterator<Item = (&RequestElement, DataType)> {
        self.types.iter().map(|(node, t)| (node, *t))
    }
}

/// Infers [`Context`]s for predicates over one schema.
///
/// Build once per data provider and reuse it for every predicate; each
/// [`build`](ContextBuilder::build) call owns its own state, so the builder
/// can be shared across threads.
///
/// ## Algorithm
///
/// 1. One walk with the initializer seeds columns, predicates and
///    unambiguous literals, rejecting unknown columns.
/// 2. Enhancer walks propagate types across comparisons, memberships and
///    string matches until a walk assigns nothing. The loop is bounded by
///    the node count.
///
/// Propagation is not a constraint solver: two untyped leaves compared only
/// to each other remain untyped.
///
/// # Example
///
/// ```rust
/// use datagate::{Column, ContextBuilder, DataType, RequestElement as E};
///
/// let builder = ContextBuilder::new(&[Column::new("a", DataType::Long)]);
/// let predicate = E::equal(E::column("a"), E::value(5));
/// let context = builder.build(&predicate)?;
///
/// assert_eq!(context.get(&E::value(5)), Some(DataType::Long));
/// assert_eq!(context.get(&predicate), Some(DataType::Boolean));
/// # Ok::<(), datagate::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ContextBuilder {
    schema: HashMap<String, DataType>,
}

impl ContextBuilder {
    /// Creates a builder for the given schema.
    ///
    /// When a name is declared twice the first declaration wins.
    pub fn new(columns: &[Column]) -> Self {
        let mut schema = HashMap::with_capacity(columns.len());
        for column in columns {
            schema
                .entry(column.name().to_owned())
                .or_insert(column.data_type());
        }
        Self { schema }
    }

    /// Infers the context of `predicate`.
    ///
    /// # Errors
    ///
    /// Returns a bad-parameter error when the predicate references an unknown
    /// column or compares incompatible types.
    pub fn build(&self, predicate: &RequestElement) -> Result<Context> {
        let mut types = HashMap::new();
        walk(predicate, Initializer::new(&self.schema, &mut types))?;
        trace!(seeded = types.len(), "initializer pass complete");

        let max_passes = walk(predicate, NodeCounter::default())?.count() + 1;
        let mut pass = 0;
        loop {
            pass += 1;
            if pass > max_passes {
                return Err(Error::internal(format!(
                    "type inference did not converge after {} passes",
                    max_passes
                )));
            }

            let changes = walk(predicate, Enhancer::new(&mut types))?.changes();
            trace!(pass, changes, "enhancer pass complete");
            if changes == 0 {
                break;
            }
        }

        debug!(passes = pass, typed = types.len(), "built predicate context");
        Ok(Context { types })
    }
}

/// Infers the context of `predicate` against `columns`.
///
/// Convenience for `ContextBuilder::new(columns).build(predicate)`.
///
/// # Errors
///
/// See [`ContextBuilder::build`].
pub fn build_context(columns: &[Column], predicate: &RequestElement) -> Result<Context> {
    ContextBuilder::new(columns).build(predicate)
}
