//! Semantic analysis: scopes, symbols and identifier resolution
//!
//! Builds the scope tree and symbol table symbolic execution runs against.

pub mod binder;
pub mod scope;
pub mod symbols;

pub use binder::{SemanticModel, UnresolvedReference};
pub use scope::{Scope, ScopeId, ScopeKind, ScopeTree};
pub use symbols::{Symbol, SymbolId, SymbolTable, Usage, UsageKind};
