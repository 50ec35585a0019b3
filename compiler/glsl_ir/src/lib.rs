//! GLSL IR - identifier and declaration primitives
//!
//! This crate contains the data the symbol table binds names to:
//! - Names for interned identifiers
//! - Typed handles for variable, type and function declarations
//! - The declaration arena that owns what those handles point at
//!
//! # Design Philosophy
//!
//! - **Intern Everything**: identifiers -> `Name(u32)`
//! - **Handles, not pointers**: declarations are referred to by
//!   `VariableId`/`TypeId`/`FunctionId` indices into a [`DeclArena`]
//!   that lives at least as long as every table holding its handles.

mod decl;
mod interner;
mod name;

pub use decl::{
    BaseType, DeclArena, Function, FunctionId, FunctionSignature, GlslType, TypeId, Variable,
    VariableId, VariableMode,
};
pub use interner::{InternError, SharedInterner, StringInterner, StringLookup};
pub use name::Name;
