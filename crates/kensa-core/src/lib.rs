//! Kensa core: a symbolic execution engine for JavaScript/TypeScript
//! static analysis
//!
//! The engine walks a control flow graph of a parsed source file and
//! tracks, for every reachable program point, a conservative bitset
//! approximation of each value's possible runtime shape (its
//! [`Constraint`](se::Constraint)). Branch conditions narrow constraints
//! per path, contradictory paths are pruned, and a hand-modeled standard
//! library gives `Array`, `String`, `Number`, `Object`, `Math`, `RegExp`,
//! `Date` and `Function` branch-sensitive semantics, so downstream rules
//! can flag dead branches, guaranteed null dereferences and misused
//! standard-library calls without running the program.
//!
//! Parsing is delegated to swc; the engine consumes its AST. Exploration
//! is bounded by a per-scope block-execution budget supplied through
//! [`config::Config`].

pub mod analysis;
pub mod cfg;
pub mod config;
pub mod parser;
pub mod se;
pub mod semantic;

pub use analysis::Analyzer;
pub use config::{Config, ConfigError, EngineConfig};
pub use parser::{Language, ParsedFile};
