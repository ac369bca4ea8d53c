//! The API model produced from rendered javadoc pages.
//!
//! Parsing a single page yields a mutable [`ClassPrototype`]. Freezing it
//! produces an immutable [`ClassModel`], and several models describing the
//! same fully qualified name are combined with [`ClassModel::merge`] (or
//! [`fold_models`] for a whole left fold). The final
//! [`ClassRegistry`] is what output backends consume.

#![forbid(unsafe_code)]

mod class;
mod error;
mod identity;
mod members;
mod merge;
mod prototype;
mod registry;
mod types;

pub use crate::class::ClassModel;
pub use crate::error::{MergeConflict, MergeError, ModelError, Result};
pub use crate::identity::StableId;
pub use crate::members::{
    classify_field, Argument, ClassifiedField, ConstantModel, ConstructorModel, FieldModel,
    MethodModel,
};
pub use crate::merge::{fold_models, FoldOutcome};
pub use crate::prototype::{ClassPrototype, ConstructorPrototype, FieldPrototype, MethodPrototype};
pub use crate::registry::{ClassRegistry, IdentityCollision};
pub use crate::types::{
    constant_type, is_primitive, ClassKind, ConstantType, MemberAccess, MemberFlags, TypeRef,
    ROOT_TYPE,
};
