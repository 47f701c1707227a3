//! Immutable program states mapping tracked values to constraints
//!
//! A program state is the set of constraints currently believed true for
//! all tracked values at one point of the hypothetical execution, together
//! with the expression stack and the variable frame used by the CFG
//! walker. States are never mutated: every narrowing produces a new state,
//! and an infeasible narrowing produces no state at all.

use std::collections::HashMap;

use crate::se::constraint::{Constraint, Nullability};
use crate::se::stack::ExpressionStack;
use crate::se::value::{SymbolicValue, ValueId};
use crate::semantic::SymbolId;

/// Outcome of narrowing a program state.
///
/// `Infeasible` is not an error: it marks a self-contradictory path the
/// walker must stop exploring. Keeping it a dedicated type (rather than an
/// `Option`) keeps "no state" impossible to mistake for "empty but fine".
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub enum Feasibility {
    Feasible(ProgramState),
    Infeasible,
}

impl Feasibility {
    pub fn is_feasible(&self) -> bool {
        matches!(self, Feasibility::Feasible(_))
    }

    pub fn into_state(self) -> Option<ProgramState> {
        match self {
            Feasibility::Feasible(state) => Some(state),
            Feasibility::Infeasible => None,
        }
    }

    pub fn as_state(&self) -> Option<&ProgramState> {
        match self {
            Feasibility::Feasible(state) => Some(state),
            Feasibility::Infeasible => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProgramState {
    values: HashMap<SymbolId, SymbolicValue>,
    constraints: HashMap<ValueId, Constraint>,
    stack: ExpressionStack,
    next_value_id: u32,
}

impl PartialEq for ProgramState {
    /// Two states are interchangeable iff their frames, constraint maps
    /// and stacks are equal; the id allocator is bookkeeping only.
    fn eq(&self, other: &Self) -> bool {
        self.values == other.values
            && self.constraints == other.constraints
            && self.stack == other.stack
    }
}

impl ProgramState {
    pub fn empty_state() -> ProgramState {
        ProgramState::default()
    }

    /// Allocates a fresh tracked value, optionally with an initial
    /// constraint, without binding it to a symbol.
    pub fn allocate(&self, constraint: Option<Constraint>) -> (ProgramState, SymbolicValue) {
        let mut state = self.clone();
        let id = ValueId(state.next_value_id);
        state.next_value_id += 1;
        if let Some(constraint) = constraint {
            if constraint != Constraint::ANY_VALUE {
                state.constraints.insert(id, constraint);
            }
        }
        (state, SymbolicValue::Variable(id))
    }

    /// Binds `symbol` to a fresh tracked value, optionally constrained.
    pub fn new_symbolic_value(
        &self,
        symbol: SymbolId,
        constraint: Option<Constraint>,
    ) -> ProgramState {
        let (mut state, value) = self.allocate(constraint);
        state.values.insert(symbol, value);
        state
    }

    /// Binds `symbol` to an already-evaluated value, e.g. the right-hand
    /// side of an assignment taken from the expression stack.
    pub fn store(&self, symbol: SymbolId, value: SymbolicValue) -> ProgramState {
        let mut state = self.clone();
        state.values.insert(symbol, value);
        state
    }

    pub fn get_symbolic_value(&self, symbol: SymbolId) -> Option<&SymbolicValue> {
        self.values.get(&symbol)
    }

    /// Drops the binding and constraint knowledge for symbols rejected by
    /// `keep`. Dropping is a pure widening (absent values default to
    /// `ANY_VALUE`), used to forget dead variables at block entry.
    pub fn retain_symbols(&self, keep: impl Fn(SymbolId) -> bool) -> ProgramState {
        let mut state = self.clone();
        state.values.retain(|symbol, _| keep(*symbol));
        let live: Vec<ValueId> = state
            .values
            .values()
            .filter_map(|value| match value {
                SymbolicValue::Variable(id) => Some(*id),
                _ => None,
            })
            .collect();
        state.constraints.retain(|id, _| live.contains(id));
        state
    }

    /// The constraint currently recorded for a tracked value; unseen
    /// values default to `ANY_VALUE`.
    pub fn constraint_of(&self, id: ValueId) -> Constraint {
        self.constraints
            .get(&id)
            .copied()
            .unwrap_or(Constraint::ANY_VALUE)
    }

    pub fn get_constraint(&self, value: &SymbolicValue) -> Constraint {
        value.base_constraint(self)
    }

    pub fn get_nullability(&self, value: &SymbolicValue) -> Nullability {
        self.get_constraint(value).nullability()
    }

    /// Narrows `value` by `constraint`; see `SymbolicValue::constrain`.
    pub fn constrain(&self, value: &SymbolicValue, constraint: Constraint) -> Feasibility {
        value.constrain(self, constraint)
    }

    pub(crate) fn constrain_value(&self, id: ValueId, constraint: Constraint) -> Feasibility {
        let current = self.constraint_of(id);
        let narrowed = current & constraint;
        if narrowed.is_empty() {
            return Feasibility::Infeasible;
        }
        if narrowed == current {
            return Feasibility::Feasible(self.clone());
        }
        let mut state = self.clone();
        state.constraints.insert(id, narrowed);
        Feasibility::Feasible(state)
    }

    /// Joins two states reachable at the same program point: per tracked
    /// value the union of the two constraints, values absent from one side
    /// defaulting to `ANY_VALUE`. Bindings that disagree are re-allocated
    /// with the joined constraint. Both stacks must be equal.
    pub fn join(&self, other: &ProgramState) -> ProgramState {
        assert_eq!(
            self.stack, other.stack,
            "cannot join program states with different expression stacks"
        );

        let mut joined = ProgramState {
            values: HashMap::new(),
            constraints: HashMap::new(),
            stack: self.stack.clone(),
            next_value_id: self.next_value_id.max(other.next_value_id),
        };

        for (id, constraint) in &self.constraints {
            let merged = constraint.or(other.constraint_of(*id));
            if merged != Constraint::ANY_VALUE {
                joined.constraints.insert(*id, merged);
            }
        }

        let mut shared: Vec<(SymbolId, &SymbolicValue)> = self
            .values
            .iter()
            .filter(|(symbol, _)| other.values.contains_key(symbol))
            .map(|(symbol, value)| (*symbol, value))
            .collect();
        shared.sort_by_key(|(symbol, _)| symbol.index());

        for (symbol, value) in shared {
            let other_value = &other.values[&symbol];
            if value == other_value {
                joined.values.insert(symbol, value.clone());
            } else {
                let merged = self
                    .get_constraint(value)
                    .or(other.get_constraint(other_value));
                let id = ValueId(joined.next_value_id);
                joined.next_value_id += 1;
                if merged != Constraint::ANY_VALUE {
                    joined.constraints.insert(id, merged);
                }
                joined.values.insert(symbol, SymbolicValue::Variable(id));
            }
        }

        joined
    }

    pub fn push_to_stack(&self, value: SymbolicValue) -> ProgramState {
        let mut state = self.clone();
        state.stack = state.stack.push(value);
        state
    }

    /// Pops the top of the expression stack. Popping an empty stack yields
    /// the unknown value rather than failing, so unmodeled constructs
    /// degrade to "don't know".
    pub fn pop_stack(&self) -> (ProgramState, SymbolicValue) {
        let mut state = self.clone();
        let (stack, value) = state.stack.pop();
        state.stack = stack;
        (state, value)
    }

    pub fn peek_stack(&self) -> Option<&SymbolicValue> {
        self.stack.peek()
    }

    pub fn clear_stack(&self) -> ProgramState {
        let mut state = self.clone();
        state.stack = ExpressionStack::empty_stack();
        state
    }

    /// Evaluates a pure-stack expression kind; see `ExpressionStack::execute`.
    pub fn execute(&self, expr: &swc_ecma_ast::Expr) -> ProgramState {
        let mut state = self.clone();
        state.stack = self.stack.execute(expr, self);
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semantic::scope::{ScopeKind, ScopeTree};
    use crate::semantic::symbols::{DeclarationKind, SymbolKind, SymbolTable};
    use swc_common::DUMMY_SP;

    fn symbol_ids(count: usize) -> Vec<SymbolId> {
        let mut scopes = ScopeTree::new();
        let global = scopes.create_scope(ScopeKind::Global, None, DUMMY_SP);
        let mut table = SymbolTable::new();
        (0..count)
            .map(|i| {
                table.declare(
                    &format!("v{i}"),
                    SymbolKind::Variable,
                    DeclarationKind::Let,
                    global,
                    DUMMY_SP,
                )
            })
            .collect()
    }

    #[test]
    fn constrain_narrows_without_mutating_the_receiver() {
        let (state, value) = ProgramState::empty_state().allocate(None);

        let narrowed = state
            .constrain(&value, Constraint::TRUTHY)
            .into_state()
            .unwrap();

        assert_eq!(state.get_constraint(&value), Constraint::ANY_VALUE);
        assert_eq!(narrowed.get_constraint(&value), Constraint::TRUTHY);
    }

    #[test]
    fn constrain_by_any_value_is_a_no_op() {
        let (state, value) = ProgramState::empty_state().allocate(Some(Constraint::TRUTHY));

        let narrowed = state
            .constrain(&value, Constraint::ANY_VALUE)
            .into_state()
            .unwrap();

        assert_eq!(narrowed, state);
    }

    #[test]
    fn successive_narrowing_equals_combined_narrowing() {
        let (state, value) = ProgramState::empty_state().allocate(None);

        let twice = state
            .constrain(&value, Constraint::ANY_NUMBER)
            .into_state()
            .unwrap()
            .constrain(&value, Constraint::FALSY)
            .into_state()
            .unwrap();
        let once = state
            .constrain(&value, Constraint::ANY_NUMBER & Constraint::FALSY)
            .into_state()
            .unwrap();

        assert_eq!(twice, once);
        assert_eq!(
            twice.get_constraint(&value),
            Constraint::ZERO.or(Constraint::NAN)
        );
    }

    #[test]
    fn constraining_null_by_truthy_is_infeasible() {
        let (state, value) = ProgramState::empty_state().allocate(Some(Constraint::NULL));

        let result = state.constrain(&value, Constraint::TRUTHY);
        assert_eq!(result, Feasibility::Infeasible);
        assert!(result.as_state().is_none());
    }

    #[test]
    fn constraining_is_deterministic() {
        let (state, value) = ProgramState::empty_state().allocate(None);

        let first = state.constrain(&value, Constraint::OBJECT).into_state().unwrap();
        let second = state.constrain(&value, Constraint::OBJECT).into_state().unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn new_symbolic_value_tracks_the_symbol() {
        let symbols = symbol_ids(1);
        let state = ProgramState::empty_state()
            .new_symbolic_value(symbols[0], Some(Constraint::UNDEFINED));

        let value = state.get_symbolic_value(symbols[0]).unwrap().clone();
        assert_eq!(state.get_constraint(&value), Constraint::UNDEFINED);
        assert_eq!(state.get_nullability(&value), Nullability::Null);
    }

    #[test]
    fn store_replaces_the_binding_but_keeps_old_allocations() {
        let symbols = symbol_ids(1);
        let state = ProgramState::empty_state()
            .new_symbolic_value(symbols[0], Some(Constraint::NULL));
        let old = state.get_symbolic_value(symbols[0]).unwrap().clone();

        let stored = state.store(
            symbols[0],
            SymbolicValue::WithConstraint(Constraint::TRUTHY_NUMBER),
        );

        assert_eq!(stored.get_constraint(&old), Constraint::NULL);
        let new = stored.get_symbolic_value(symbols[0]).unwrap();
        assert_eq!(stored.get_constraint(new), Constraint::TRUTHY_NUMBER);
    }

    #[test]
    fn join_unions_constraints_of_shared_values() {
        let symbols = symbol_ids(1);
        let base = ProgramState::empty_state().new_symbolic_value(symbols[0], None);
        let value = base.get_symbolic_value(symbols[0]).unwrap().clone();

        let left = base.constrain(&value, Constraint::NULL).into_state().unwrap();
        let right = base
            .constrain(&value, Constraint::ARRAY)
            .into_state()
            .unwrap();

        let joined = left.join(&right);
        assert_eq!(
            joined.get_constraint(&value),
            Constraint::NULL.or(Constraint::ARRAY)
        );
    }

    #[test]
    fn join_defaults_missing_values_to_any_value() {
        let symbols = symbol_ids(1);
        let base = ProgramState::empty_state().new_symbolic_value(symbols[0], None);
        let value = base.get_symbolic_value(symbols[0]).unwrap().clone();

        let narrowed = base.constrain(&value, Constraint::NULL).into_state().unwrap();

        let joined = narrowed.join(&base);
        assert_eq!(joined.get_constraint(&value), Constraint::ANY_VALUE);
        assert_eq!(joined, base);
    }

    #[test]
    fn join_reallocates_disagreeing_bindings() {
        let symbols = symbol_ids(1);
        let base = ProgramState::empty_state();

        let left = base.store(
            symbols[0],
            SymbolicValue::WithConstraint(Constraint::TRUTHY_STRING),
        );
        let right = base.store(
            symbols[0],
            SymbolicValue::WithConstraint(Constraint::NULL),
        );

        let joined = left.join(&right);
        let merged = joined.get_symbolic_value(symbols[0]).unwrap();
        assert_eq!(
            joined.get_constraint(merged),
            Constraint::TRUTHY_STRING.or(Constraint::NULL)
        );
    }

    #[test]
    fn join_is_commutative_up_to_equality() {
        let symbols = symbol_ids(2);
        let base = ProgramState::empty_state()
            .new_symbolic_value(symbols[0], None)
            .new_symbolic_value(symbols[1], None);
        let v0 = base.get_symbolic_value(symbols[0]).unwrap().clone();
        let v1 = base.get_symbolic_value(symbols[1]).unwrap().clone();

        let left = base
            .constrain(&v0, Constraint::NULL)
            .into_state()
            .unwrap()
            .constrain(&v1, Constraint::ARRAY)
            .into_state()
            .unwrap();
        let right = base
            .constrain(&v0, Constraint::UNDEFINED)
            .into_state()
            .unwrap();

        assert_eq!(left.join(&right), right.join(&left));
    }

    #[test]
    #[should_panic(expected = "different expression stacks")]
    fn join_rejects_unequal_stacks() {
        let base = ProgramState::empty_state();
        let pushed = base.push_to_stack(SymbolicValue::Unknown);
        let _ = base.join(&pushed);
    }

    #[test]
    fn retain_symbols_widens_dropped_bindings() {
        let symbols = symbol_ids(2);
        let state = ProgramState::empty_state()
            .new_symbolic_value(symbols[0], Some(Constraint::NULL))
            .new_symbolic_value(symbols[1], Some(Constraint::ARRAY));

        let kept = symbols[0];
        let retained = state.retain_symbols(|s| s == kept);

        assert!(retained.get_symbolic_value(symbols[0]).is_some());
        assert!(retained.get_symbolic_value(symbols[1]).is_none());
    }

    #[test]
    fn stack_operations_are_persistent() {
        let state = ProgramState::empty_state();
        let pushed = state.push_to_stack(SymbolicValue::WithConstraint(Constraint::TRUE));

        assert!(state.peek_stack().is_none());
        assert_eq!(
            pushed.peek_stack(),
            Some(&SymbolicValue::WithConstraint(Constraint::TRUE))
        );

        let (popped, value) = pushed.pop_stack();
        assert_eq!(value, SymbolicValue::WithConstraint(Constraint::TRUE));
        assert!(popped.peek_stack().is_none());
        assert_eq!(popped, state);
    }

    #[test]
    fn popping_an_empty_stack_yields_unknown() {
        let state = ProgramState::empty_state();
        let (_, value) = state.pop_stack();
        assert_eq!(value, SymbolicValue::Unknown);
    }
}
