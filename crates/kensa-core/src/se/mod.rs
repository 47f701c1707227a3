//! Symbolic execution engine
//!
//! Tracks an abstract approximation of each value's possible runtime shape
//! through every reachable program point: a finite constraint lattice,
//! immutable program states, a polymorphic symbolic value hierarchy, a
//! hand-modeled standard library, and the worklist driver that walks the
//! control flow graph.

pub mod builtins;
pub mod constraint;
pub mod execution;
pub mod live_variables;
pub mod stack;
pub mod state;
pub mod value;

pub use constraint::{Constraint, Nullability, Truthiness};
pub use execution::{
    ArgumentMismatch, ConditionOutcome, ExecutionOutcome, SeCheck, SpanRange, SymbolicExecution,
};
pub use live_variables::LiveVariableAnalysis;
pub use stack::ExpressionStack;
pub use state::{Feasibility, ProgramState};
pub use value::{SymbolicValue, ValueId};
