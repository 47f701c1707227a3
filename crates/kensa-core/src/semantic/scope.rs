//! Scope tree for nested program scopes
//!
//! Represents the nesting of global, function and block scopes. Each scope
//! knows its parent; symbol lookup walks the parent chain.

use id_arena::{Arena, Id};
use swc_common::Span;

pub type ScopeId = Id<Scope>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Global,
    Function,
    ArrowFunction,
    Block,
    For,
    While,
    Switch,
    Catch,
    Class,
}

impl ScopeKind {
    /// True for scopes that form a closure boundary: variables declared
    /// inside are invisible to symbolic execution of enclosing functions,
    /// and captures across this boundary make a variable untrackable.
    pub fn is_function_boundary(self) -> bool {
        matches!(
            self,
            ScopeKind::Global | ScopeKind::Function | ScopeKind::ArrowFunction
        )
    }
}

#[derive(Debug)]
pub struct Scope {
    pub id: ScopeId,
    pub kind: ScopeKind,
    pub parent: Option<ScopeId>,
    pub children: Vec<ScopeId>,
    pub span: Span,
}

pub struct ScopeTree {
    arena: Arena<Scope>,
    root: Option<ScopeId>,
}

impl Default for ScopeTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeTree {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
        }
    }

    pub fn create_scope(&mut self, kind: ScopeKind, parent: Option<ScopeId>, span: Span) -> ScopeId {
        let id = self.arena.alloc_with_id(|id| Scope {
            id,
            kind,
            parent,
            children: Vec::new(),
            span,
        });

        if let Some(parent_id) = parent {
            self.arena[parent_id].children.push(id);
        }

        if self.root.is_none() {
            self.root = Some(id);
        }

        id
    }

    pub fn root(&self) -> Option<ScopeId> {
        self.root
    }

    pub fn get(&self, id: ScopeId) -> &Scope {
        &self.arena[id]
    }

    pub fn parent(&self, id: ScopeId) -> Option<&Scope> {
        self.arena[id].parent.map(|p| &self.arena[p])
    }

    pub fn ancestors(&self, id: ScopeId) -> AncestorIter<'_> {
        AncestorIter {
            tree: self,
            current: Some(id),
        }
    }

    /// The nearest enclosing closure boundary, including `scope` itself.
    pub fn function_root(&self, scope: ScopeId) -> ScopeId {
        self.ancestors(scope)
            .find(|s| s.kind.is_function_boundary())
            .map(|s| s.id)
            .unwrap_or(scope)
    }

    pub fn is_descendant_of(&self, scope: ScopeId, ancestor: ScopeId) -> bool {
        self.ancestors(scope).any(|s| s.id == ancestor)
    }
}

pub struct AncestorIter<'a> {
    tree: &'a ScopeTree,
    current: Option<ScopeId>,
}

impl<'a> Iterator for AncestorIter<'a> {
    type Item = &'a Scope;

    fn next(&mut self) -> Option<Self::Item> {
        let current_id = self.current?;
        let scope = &self.tree.arena[current_id];
        self.current = scope.parent;
        Some(scope)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use swc_common::DUMMY_SP;

    #[test]
    fn creates_nested_scopes_with_parent_links() {
        let mut tree = ScopeTree::new();
        let global = tree.create_scope(ScopeKind::Global, None, DUMMY_SP);
        let func = tree.create_scope(ScopeKind::Function, Some(global), DUMMY_SP);
        let block = tree.create_scope(ScopeKind::Block, Some(func), DUMMY_SP);

        assert_eq!(tree.root(), Some(global));
        assert_eq!(tree.get(block).parent, Some(func));
        assert_eq!(tree.parent(func).map(|s| s.id), Some(global));
        assert!(tree.parent(global).is_none());
        assert_eq!(tree.get(global).children, vec![func]);
    }

    #[test]
    fn ancestors_traverse_the_parent_chain() {
        let mut tree = ScopeTree::new();
        let global = tree.create_scope(ScopeKind::Global, None, DUMMY_SP);
        let func = tree.create_scope(ScopeKind::Function, Some(global), DUMMY_SP);
        let block = tree.create_scope(ScopeKind::Block, Some(func), DUMMY_SP);

        let kinds: Vec<ScopeKind> = tree.ancestors(block).map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![ScopeKind::Block, ScopeKind::Function, ScopeKind::Global]
        );
    }

    #[test]
    fn function_root_skips_block_scopes() {
        let mut tree = ScopeTree::new();
        let global = tree.create_scope(ScopeKind::Global, None, DUMMY_SP);
        let func = tree.create_scope(ScopeKind::Function, Some(global), DUMMY_SP);
        let for_scope = tree.create_scope(ScopeKind::For, Some(func), DUMMY_SP);
        let block = tree.create_scope(ScopeKind::Block, Some(for_scope), DUMMY_SP);

        assert_eq!(tree.function_root(block), func);
        assert_eq!(tree.function_root(func), func);
        assert_eq!(tree.function_root(global), global);
    }

    #[test]
    fn arrow_functions_are_closure_boundaries() {
        let mut tree = ScopeTree::new();
        let global = tree.create_scope(ScopeKind::Global, None, DUMMY_SP);
        let arrow = tree.create_scope(ScopeKind::ArrowFunction, Some(global), DUMMY_SP);
        let block = tree.create_scope(ScopeKind::Block, Some(arrow), DUMMY_SP);

        assert_eq!(tree.function_root(block), arrow);
    }

    #[test]
    fn is_descendant_of_checks_ancestry() {
        let mut tree = ScopeTree::new();
        let global = tree.create_scope(ScopeKind::Global, None, DUMMY_SP);
        let func = tree.create_scope(ScopeKind::Function, Some(global), DUMMY_SP);

        assert!(tree.is_descendant_of(func, global));
        assert!(!tree.is_descendant_of(global, func));
    }
}
