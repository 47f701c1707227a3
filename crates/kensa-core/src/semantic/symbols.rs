//! Symbol table for declarations, references and usage bookkeeping
//!
//! Stores every declaration with its scope and records how each symbol is
//! used (declaration writes, plain writes, reads). Symbolic execution uses
//! the usage records to decide which variables are trackable and how
//! liveness flows through the CFG.

use std::collections::HashMap;

use id_arena::{Arena, Id};
use swc_common::Span;

use super::scope::{ScopeId, ScopeTree};

pub type SymbolId = Id<Symbol>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Variable,
    Constant,
    Function,
    Class,
    Parameter,
    Import,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationKind {
    Var,
    Let,
    Const,
    Function,
    Class,
    Parameter,
    CatchParameter,
    Import,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsageKind {
    /// Initialization at the declaration site.
    DeclarationWrite,
    Write,
    ReadWrite,
    Read,
}

impl UsageKind {
    pub fn is_read(self) -> bool {
        matches!(self, UsageKind::Read | UsageKind::ReadWrite)
    }

    pub fn is_write(self) -> bool {
        matches!(
            self,
            UsageKind::DeclarationWrite | UsageKind::Write | UsageKind::ReadWrite
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Usage {
    pub span: Span,
    pub kind: UsageKind,
}

#[derive(Debug)]
pub struct Symbol {
    pub id: SymbolId,
    pub name: String,
    pub kind: SymbolKind,
    pub declaration_kind: DeclarationKind,
    pub scope: ScopeId,
    pub span: Span,
    /// True when the symbol is referenced from a nested function; captured
    /// symbols cannot be tracked path-sensitively.
    pub captured: bool,
    pub usages: Vec<Usage>,
}

pub struct SymbolTable {
    arena: Arena<Symbol>,
    by_scope: HashMap<ScopeId, HashMap<String, SymbolId>>,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            by_scope: HashMap::new(),
        }
    }

    /// Declares `name` in `scope`. Re-declaring an existing name in the
    /// same scope (hoisted `var`s, later declarator visits) returns the
    /// existing symbol.
    pub fn declare(
        &mut self,
        name: &str,
        kind: SymbolKind,
        declaration_kind: DeclarationKind,
        scope: ScopeId,
        span: Span,
    ) -> SymbolId {
        if let Some(existing) = self.by_scope.get(&scope).and_then(|s| s.get(name)) {
            return *existing;
        }

        let id = self.arena.alloc_with_id(|id| Symbol {
            id,
            name: name.to_string(),
            kind,
            declaration_kind,
            scope,
            span,
            captured: false,
            usages: Vec::new(),
        });

        self.by_scope
            .entry(scope)
            .or_default()
            .insert(name.to_string(), id);

        id
    }

    /// Resolves `name` starting from `scope`, walking the scope chain.
    pub fn lookup(&self, name: &str, scope: ScopeId, scope_tree: &ScopeTree) -> Option<SymbolId> {
        if let Some(scope_symbols) = self.by_scope.get(&scope) {
            if let Some(&id) = scope_symbols.get(name) {
                return Some(id);
            }
        }

        if let Some(parent) = scope_tree.get(scope).parent {
            return self.lookup(name, parent, scope_tree);
        }

        None
    }

    pub fn get(&self, id: SymbolId) -> &Symbol {
        &self.arena[id]
    }

    pub fn add_usage(&mut self, id: SymbolId, span: Span, kind: UsageKind) {
        self.arena[id].usages.push(Usage { span, kind });
    }

    pub fn mark_captured(&mut self, id: SymbolId) {
        self.arena[id].captured = true;
    }

    pub fn symbols_in_scope(&self, scope: ScopeId) -> impl Iterator<Item = &Symbol> {
        self.by_scope
            .get(&scope)
            .into_iter()
            .flat_map(|symbols| symbols.values().map(|&id| &self.arena[id]))
    }

    pub fn all_symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.arena.iter().map(|(_, s)| s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semantic::scope::ScopeKind;
    use swc_common::DUMMY_SP;

    fn tree_with_global() -> (ScopeTree, ScopeId) {
        let mut tree = ScopeTree::new();
        let global = tree.create_scope(ScopeKind::Global, None, DUMMY_SP);
        (tree, global)
    }

    #[test]
    fn declares_and_resolves_in_scope() {
        let (tree, global) = tree_with_global();
        let mut table = SymbolTable::new();

        let x = table.declare("x", SymbolKind::Variable, DeclarationKind::Let, global, DUMMY_SP);

        assert_eq!(table.lookup("x", global, &tree), Some(x));
        assert_eq!(table.lookup("y", global, &tree), None);
        assert_eq!(table.get(x).name, "x");
    }

    #[test]
    fn lookup_walks_the_scope_chain() {
        let (mut tree, global) = tree_with_global();
        let func = tree.create_scope(ScopeKind::Function, Some(global), DUMMY_SP);
        let mut table = SymbolTable::new();

        let x = table.declare("x", SymbolKind::Variable, DeclarationKind::Var, global, DUMMY_SP);

        assert_eq!(table.lookup("x", func, &tree), Some(x));
    }

    #[test]
    fn inner_declaration_shadows_outer() {
        let (mut tree, global) = tree_with_global();
        let block = tree.create_scope(ScopeKind::Block, Some(global), DUMMY_SP);
        let mut table = SymbolTable::new();

        let outer = table.declare("x", SymbolKind::Variable, DeclarationKind::Let, global, DUMMY_SP);
        let inner = table.declare("x", SymbolKind::Variable, DeclarationKind::Let, block, DUMMY_SP);

        assert_ne!(outer, inner);
        assert_eq!(table.lookup("x", block, &tree), Some(inner));
        assert_eq!(table.lookup("x", global, &tree), Some(outer));
    }

    #[test]
    fn redeclaring_in_the_same_scope_reuses_the_symbol() {
        let (_, global) = tree_with_global();
        let mut table = SymbolTable::new();

        let first = table.declare("x", SymbolKind::Variable, DeclarationKind::Var, global, DUMMY_SP);
        let second = table.declare("x", SymbolKind::Variable, DeclarationKind::Var, global, DUMMY_SP);

        assert_eq!(first, second);
    }

    #[test]
    fn records_usages() {
        let (_, global) = tree_with_global();
        let mut table = SymbolTable::new();

        let x = table.declare("x", SymbolKind::Variable, DeclarationKind::Let, global, DUMMY_SP);
        table.add_usage(x, DUMMY_SP, UsageKind::DeclarationWrite);
        table.add_usage(x, DUMMY_SP, UsageKind::Read);

        let usages = &table.get(x).usages;
        assert_eq!(usages.len(), 2);
        assert!(usages[0].kind.is_write());
        assert!(usages[1].kind.is_read());
        assert!(!usages[1].kind.is_write());
    }

    #[test]
    fn captured_marking_is_sticky() {
        let (_, global) = tree_with_global();
        let mut table = SymbolTable::new();

        let x = table.declare("x", SymbolKind::Variable, DeclarationKind::Let, global, DUMMY_SP);
        assert!(!table.get(x).captured);

        table.mark_captured(x);
        assert!(table.get(x).captured);
    }
}
