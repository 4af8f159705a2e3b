//! The generic query engine.
//!
//! A client predicate is a [`RequestElement`](crate::RequestElement) tree.
//! Before a downstream translator can render it against a storage backend,
//! every node needs a [`DataType`](crate::DataType):
//!
//! - [`walk`] traverses a tree depth-first, dispatching to a [`Visitor`]
//! - [`ContextBuilder`] runs the seeding pass, then propagation passes until
//!   a fixpoint, producing a [`Context`]
//!
//! ```rust
//! use datagate::{build_context, Column, DataType, RequestElement as E};
//!
//! let columns = [Column::new("city", DataType::String)];
//! let predicate = E::starts_with("city", "Ber", false);
//!
//! let context = build_context(&columns, &predicate)?;
//! assert_eq!(context.get(&E::value("Ber")), Some(DataType::String));
//! # Ok::<(), datagate::Error>(())
//! ```

mod context;
mod enhancer;
mod initializer;
mod walker;

pub use context::{build_context, Context, ContextBuilder};
pub use walker::{
    walk, ComparisonOperator, LogicalOperator, MembershipOperator, NodeCounter, StringOperator,
    Visitor,
};
