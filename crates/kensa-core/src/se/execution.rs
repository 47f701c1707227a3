//! The symbolic execution driver
//!
//! Walks the control flow graph with a worklist of (block, state) pairs,
//! replaying each block's evaluation elements against the program state.
//! Branch conditions narrow the state per successor; infeasible branches
//! are pruned, per-condition truthiness outcomes accumulate, and checks
//! observe the state around every element. The caller bounds the walk with
//! a block-execution budget to guarantee termination on pathological
//! control flow.

use std::collections::{HashMap, HashSet, VecDeque};

use serde::Serialize;
use swc_common::{Span, Spanned};
use swc_ecma_ast::{
    AssignOp, AssignTarget, AssignTargetPat, BinaryOp, Callee, Expr, Ident, Lit, MemberExpr,
    MemberProp, Pat, SimpleAssignTarget, UnaryOp,
};

use crate::cfg::{boolean_literal, BasicBlock, BasicBlockId, Branching, BranchingKind, ControlFlowGraph, Element};
use crate::se::builtins::registry;
use crate::se::constraint::{Constraint, Nullability, Truthiness};
use crate::se::live_variables::LiveVariableAnalysis;
use crate::se::state::{Feasibility, ProgramState};
use crate::se::value::SymbolicValue;
use crate::semantic::symbols::{DeclarationKind, SymbolKind};
use crate::semantic::{ScopeId, SemanticModel, SymbolId};

/// Default bound on the number of block executions per CFG.
pub const MAX_BLOCK_EXECUTIONS: usize = 1000;

/// A byte range in the analyzed source, serializable for reporters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct SpanRange {
    pub start: u32,
    pub end: u32,
}

impl From<Span> for SpanRange {
    fn from(span: Span) -> SpanRange {
        SpanRange {
            start: span.lo.0,
            end: span.hi.0,
        }
    }
}

/// Which truthiness outcomes a condition exhibited across all explored
/// paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConditionOutcome {
    pub span: SpanRange,
    pub truthy: bool,
    pub falsy: bool,
}

impl ConditionOutcome {
    /// The condition held on every explored path.
    pub fn is_always_truthy(&self) -> bool {
        self.truthy && !self.falsy
    }

    /// The condition failed on every explored path.
    pub fn is_always_falsy(&self) -> bool {
        self.falsy && !self.truthy
    }
}

/// A call argument that provably cannot satisfy the parameter's expected
/// constraint (or exceeds the accepted parameter count).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArgumentMismatch {
    pub span: SpanRange,
    pub callee: String,
    pub index: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ExecutionOutcome {
    /// False when the block-execution budget ran out before the worklist
    /// drained; partial results must not be used for "always" style rules.
    pub completed: bool,
    pub conditions: Vec<ConditionOutcome>,
    pub null_dereferences: Vec<SpanRange>,
    pub argument_mismatches: Vec<ArgumentMismatch>,
}

impl ExecutionOutcome {
    pub fn condition_at(&self, span: SpanRange) -> Option<&ConditionOutcome> {
        self.conditions.iter().find(|c| c.span == span)
    }
}

/// Hooks rule checks implement to observe an execution.
pub trait SeCheck {
    fn start_of_execution(&mut self, _scope: ScopeId) {}
    fn before_block_element(&mut self, _state: &ProgramState, _element: &Element<'_>) {}
    fn after_block_element(&mut self, _state: &ProgramState, _element: &Element<'_>) {}
    fn check_conditions(&mut self, _conditions: &[ConditionOutcome]) {}
    fn end_of_execution(&mut self, _scope: ScopeId) {}
}

#[derive(Debug, Clone, PartialEq)]
struct BlockExecution<'a> {
    block: BasicBlockId<'a>,
    state: ProgramState,
}

pub struct SymbolicExecution<'a, 'm> {
    cfg: &'m ControlFlowGraph<'a>,
    semantic: &'m SemanticModel,
    scope: ScopeId,
    tracked: HashSet<SymbolId>,
    liveness: LiveVariableAnalysis<'a>,
    max_block_executions: usize,
    work_list: VecDeque<BlockExecution<'a>>,
    processed: Vec<BlockExecution<'a>>,
    conditions: HashMap<Span, (bool, bool)>,
    null_dereferences: Vec<SpanRange>,
    argument_mismatches: Vec<ArgumentMismatch>,
}

impl<'a, 'm> SymbolicExecution<'a, 'm> {
    pub fn new(
        cfg: &'m ControlFlowGraph<'a>,
        semantic: &'m SemanticModel,
        scope: ScopeId,
    ) -> Self {
        Self::with_limit(cfg, semantic, scope, MAX_BLOCK_EXECUTIONS)
    }

    pub fn with_limit(
        cfg: &'m ControlFlowGraph<'a>,
        semantic: &'m SemanticModel,
        scope: ScopeId,
        max_block_executions: usize,
    ) -> Self {
        let tracked: HashSet<SymbolId> = semantic.trackable_symbols(scope).into_iter().collect();
        let liveness = LiveVariableAnalysis::for_symbolic_execution(cfg, semantic);
        SymbolicExecution {
            cfg,
            semantic,
            scope,
            tracked,
            liveness,
            max_block_executions,
            work_list: VecDeque::new(),
            processed: Vec::new(),
            conditions: HashMap::new(),
            null_dereferences: Vec::new(),
            argument_mismatches: Vec::new(),
        }
    }

    pub fn visit_cfg(&mut self, checks: &mut [&mut dyn SeCheck]) -> ExecutionOutcome {
        for check in checks.iter_mut() {
            check.start_of_execution(self.scope);
        }

        self.work_list.push_back(BlockExecution {
            block: self.cfg.entry(),
            state: self.initial_state(),
        });

        let mut executed = 0;
        while executed < self.max_block_executions {
            let Some(block_execution) = self.work_list.pop_front() else {
                break;
            };
            if self.processed.contains(&block_execution) {
                continue;
            }
            executed += 1;
            self.execute_block(&block_execution, checks);
            self.processed.push(block_execution);
        }

        let completed = self.work_list.is_empty();
        if !completed {
            tracing::debug!(executed, "block execution budget exhausted");
        }

        let outcome = self.build_outcome(completed);
        if completed {
            for check in checks.iter_mut() {
                check.check_conditions(&outcome.conditions);
                check.end_of_execution(self.scope);
            }
        }
        outcome
    }

    fn initial_state(&self) -> ProgramState {
        let mut state = ProgramState::empty_state();
        let mut symbols: Vec<SymbolId> = self.tracked.iter().copied().collect();
        symbols.sort_by_key(|id| id.index());

        for symbol_id in symbols {
            let symbol = self.semantic.symbol_table.get(symbol_id);
            let initial = if symbol.name == "arguments" {
                Some(Constraint::TRUTHY)
            } else if matches!(
                symbol.kind,
                SymbolKind::Function | SymbolKind::Class | SymbolKind::Import | SymbolKind::Parameter
            ) || symbol.declaration_kind == DeclarationKind::CatchParameter
            {
                None
            } else {
                // Not yet assigned when execution starts.
                Some(Constraint::UNDEFINED)
            };
            state = state.new_symbolic_value(symbol_id, initial);
        }
        state
    }

    fn execute_block(&mut self, block_execution: &BlockExecution<'a>, checks: &mut [&mut dyn SeCheck]) {
        let block = self.cfg.get(block_execution.block);
        let mut state = block_execution.state.clone();

        // Forget variables nothing downstream can observe.
        if let Some(live) = self.liveness.live_in(block.id) {
            let live = live.clone();
            state = state.retain_symbols(|symbol| live.contains(&symbol));
        }

        let mut stop_exploring = false;
        for element in &block.elements {
            for check in checks.iter_mut() {
                check.before_block_element(&state, element);
            }

            let (next_state, stop) = self.execute_element(state, element);
            state = next_state;
            stop_exploring = stop;

            for check in checks.iter_mut() {
                check.after_block_element(&state, element);
            }
            if stop_exploring {
                break;
            }
        }

        if !stop_exploring {
            self.handle_successors(block, state);
        }
    }

    fn execute_element(&mut self, state: ProgramState, element: &Element<'a>) -> (ProgramState, bool) {
        match *element {
            Element::StatementEnd => (state.clear_stack(), false),
            Element::Declarator(declarator) => (self.execute_declarator(state, declarator), false),
            Element::Bind(pattern) => (self.rebind_pattern(state, pattern), false),
            Element::Expr(expr) => self.execute_expr(state, expr),
        }
    }

    fn execute_expr(&mut self, state: ProgramState, expr: &'a Expr) -> (ProgramState, bool) {
        match expr {
            Expr::Ident(ident) => (self.load_identifier(state, ident), false),
            Expr::Assign(assign) => (self.execute_assignment(state, assign), false),
            Expr::Update(update) => (self.execute_update(state, update), false),
            Expr::Member(member) => self.execute_member(state, member),
            Expr::SuperProp(super_prop) => {
                let mut state = state;
                if matches!(super_prop.prop, swc_ecma_ast::SuperProp::Computed(_)) {
                    let (next, _) = state.pop_stack();
                    state = next;
                }
                (state.push_to_stack(SymbolicValue::Unknown), false)
            }
            Expr::Call(call) => (self.execute_call(state, call), false),
            Expr::New(new) => (self.execute_new(state, new), false),
            _ => (state.execute(expr), false),
        }
    }

    fn load_identifier(&self, state: ProgramState, ident: &Ident) -> ProgramState {
        let value = match self.semantic.resolve(ident.span) {
            Some(symbol) if self.tracked.contains(&symbol) => state
                .get_symbolic_value(symbol)
                .cloned()
                .unwrap_or(SymbolicValue::Unknown),
            Some(_) => SymbolicValue::Unknown,
            None => registry()
                .find(&ident.sym)
                .unwrap_or(SymbolicValue::Unknown),
        };
        state.push_to_stack(value)
    }

    fn execute_declarator(
        &self,
        state: ProgramState,
        declarator: &swc_ecma_ast::VarDeclarator,
    ) -> ProgramState {
        if declarator.init.is_none() {
            return state;
        }
        let (mut state, value) = state.pop_stack();
        match &declarator.name {
            Pat::Ident(binding) => {
                if let Some(symbol) = self.tracked_symbol(binding.id.span) {
                    let (next, value) = assigned_value(state, value);
                    state = next.store(symbol, value);
                }
            }
            pattern => {
                state = self.rebind_pattern(state, pattern);
            }
        }
        state
    }

    fn execute_assignment(&mut self, state: ProgramState, assign: &'a swc_ecma_ast::AssignExpr) -> ProgramState {
        match &assign.left {
            AssignTarget::Simple(SimpleAssignTarget::Ident(binding)) => {
                let (mut state, value) = state.pop_stack();
                let symbol = self.tracked_symbol(binding.id.span);
                if assign.op == AssignOp::Assign {
                    let value = match symbol {
                        Some(symbol) => {
                            let (next, value) = assigned_value(state, value);
                            state = next.store(symbol, value.clone());
                            value
                        }
                        None => value,
                    };
                    state.push_to_stack(value)
                } else {
                    // Compound assignment: the result shape is unknown and
                    // previous facts about the variable no longer hold.
                    if let Some(symbol) = symbol {
                        state = state.new_symbolic_value(symbol, None);
                    }
                    state.push_to_stack(SymbolicValue::Unknown)
                }
            }
            AssignTarget::Simple(SimpleAssignTarget::Member(member)) => {
                let (mut state, value) = state.pop_stack();
                if matches!(member.prop, MemberProp::Computed(_)) {
                    let (next, _) = state.pop_stack();
                    state = next;
                }
                let (mut state, object) = state.pop_stack();
                // Writing a property dereferences the object too.
                if let Feasibility::Feasible(narrowed) =
                    state.constrain(&object, Constraint::NOT_NULLY)
                {
                    state = narrowed;
                }
                state.push_to_stack(value)
            }
            AssignTarget::Simple(_) => {
                let (state, value) = state.pop_stack();
                state.push_to_stack(value)
            }
            AssignTarget::Pat(pattern) => {
                let (mut state, value) = state.pop_stack();
                state = self.rebind_assign_pattern(state, pattern);
                state.push_to_stack(value)
            }
        }
    }

    fn execute_update(&self, state: ProgramState, update: &swc_ecma_ast::UpdateExpr) -> ProgramState {
        let mut state = state;
        if let Expr::Ident(ident) = update.arg.as_ref() {
            if let Some(symbol) = self.tracked_symbol(ident.span) {
                state = state.new_symbolic_value(symbol, None);
            }
        }
        state.push_to_stack(SymbolicValue::WithConstraint(Constraint::NUMBER_PRIMITIVE))
    }

    fn execute_member(&mut self, state: ProgramState, member: &'a MemberExpr) -> (ProgramState, bool) {
        let mut state = state;
        if matches!(member.prop, MemberProp::Computed(_)) {
            let (next, _) = state.pop_stack();
            state = next;
        }
        let (mut state, object) = state.pop_stack();

        match state.get_nullability(&object) {
            Nullability::Null => {
                self.null_dereferences.push(member.obj.span().into());
                return (state, true);
            }
            Nullability::Unknown => match state.constrain(&object, Constraint::NOT_NULLY) {
                Feasibility::Feasible(narrowed) => state = narrowed,
                Feasibility::Infeasible => return (state, true),
            },
            Nullability::NotNull => {}
        }

        let value = match &member.prop {
            MemberProp::Ident(name) => self.resolve_property(&state, &object, &name.sym),
            _ => SymbolicValue::Unknown,
        };
        (state.push_to_stack(value), false)
    }

    /// Resolves a named property. Built-in objects walk their own chain;
    /// plain values of a known kind consult the prototype of that kind.
    /// Unlike a built-in's exhausted chain, a miss on a plain value yields
    /// the unknown value, since own properties are not tracked.
    fn resolve_property(
        &self,
        state: &ProgramState,
        object: &SymbolicValue,
        name: &str,
    ) -> SymbolicValue {
        match object {
            SymbolicValue::BuiltInObject(_) | SymbolicValue::BuiltInFunction(_) => {
                object.get_property_value(name, registry())
            }
            _ => {
                let constraint = object.base_constraint(state);
                registry()
                    .prototype_for(constraint)
                    .and_then(|prototype| registry().lookup_property(prototype, name))
                    .map(|property| property.as_symbolic_value())
                    .unwrap_or(SymbolicValue::Unknown)
            }
        }
    }

    fn execute_call(&mut self, state: ProgramState, call: &'a swc_ecma_ast::CallExpr) -> ProgramState {
        let mut state = state;
        let mut arguments = Vec::with_capacity(call.args.len());
        for _ in 0..call.args.len() {
            let (next, value) = state.pop_stack();
            state = next;
            arguments.push(value);
        }
        arguments.reverse();

        let callee = match &call.callee {
            Callee::Expr(_) => {
                let (next, value) = state.pop_stack();
                state = next;
                value
            }
            Callee::Super(_) | Callee::Import(_) => SymbolicValue::Unknown,
        };

        if let SymbolicValue::BuiltInFunction(method) = &callee {
            for (index, argument) in arguments.iter().enumerate() {
                let mismatch = match method.signature.expected(index) {
                    None => true,
                    Some(expected) => argument
                        .base_constraint(&state)
                        .is_incompatible_with(expected),
                };
                if mismatch {
                    self.argument_mismatches.push(ArgumentMismatch {
                        span: call.args[index].expr.span().into(),
                        callee: method.name.to_string(),
                        index,
                    });
                }
            }

            if method.has_side_effect {
                state = self.invalidate_receiver(state, call);
            }
        }

        let result = callee.call(arguments);
        state.push_to_stack(result)
    }

    /// After a mutating call, facts cached about the receiver variable no
    /// longer identify the same object state.
    fn invalidate_receiver(&self, state: ProgramState, call: &swc_ecma_ast::CallExpr) -> ProgramState {
        let Callee::Expr(callee) = &call.callee else {
            return state;
        };
        let Expr::Member(member) = callee.as_ref() else {
            return state;
        };
        let Expr::Ident(object) = member.obj.as_ref() else {
            return state;
        };
        let Some(symbol) = self.tracked_symbol(object.span) else {
            return state;
        };
        let constraint = state
            .get_symbolic_value(symbol)
            .map(|value| value.base_constraint(&state));
        state.new_symbolic_value(symbol, constraint)
    }

    fn execute_new(&self, state: ProgramState, new: &swc_ecma_ast::NewExpr) -> ProgramState {
        let mut state = state;
        let argument_count = new.args.as_ref().map(|args| args.len()).unwrap_or(0);
        for _ in 0..argument_count {
            let (next, _) = state.pop_stack();
            state = next;
        }
        let (state, callee) = state.pop_stack();
        let instance = callee.instantiate();
        state.push_to_stack(instance)
    }

    fn rebind_pattern(&self, state: ProgramState, pattern: &Pat) -> ProgramState {
        match pattern {
            Pat::Ident(binding) => match self.tracked_symbol(binding.id.span) {
                Some(symbol) => state.new_symbolic_value(symbol, None),
                None => state,
            },
            Pat::Array(array) => array
                .elems
                .iter()
                .flatten()
                .fold(state, |state, element| self.rebind_pattern(state, element)),
            Pat::Object(object) => object.props.iter().fold(state, |state, prop| match prop {
                swc_ecma_ast::ObjectPatProp::KeyValue(kv) => self.rebind_pattern(state, &kv.value),
                swc_ecma_ast::ObjectPatProp::Assign(assign) => {
                    match self.tracked_symbol(assign.key.id.span) {
                        Some(symbol) => state.new_symbolic_value(symbol, None),
                        None => state,
                    }
                }
                swc_ecma_ast::ObjectPatProp::Rest(rest) => self.rebind_pattern(state, &rest.arg),
            }),
            Pat::Assign(assign) => self.rebind_pattern(state, &assign.left),
            Pat::Rest(rest) => self.rebind_pattern(state, &rest.arg),
            Pat::Expr(_) | Pat::Invalid(_) => state,
        }
    }

    fn rebind_assign_pattern(&self, state: ProgramState, pattern: &AssignTargetPat) -> ProgramState {
        match pattern {
            AssignTargetPat::Array(array) => array
                .elems
                .iter()
                .flatten()
                .fold(state, |state, element| self.rebind_pattern(state, element)),
            AssignTargetPat::Object(object) => {
                object.props.iter().fold(state, |state, prop| match prop {
                    swc_ecma_ast::ObjectPatProp::KeyValue(kv) => {
                        self.rebind_pattern(state, &kv.value)
                    }
                    swc_ecma_ast::ObjectPatProp::Assign(assign) => {
                        match self.tracked_symbol(assign.key.id.span) {
                            Some(symbol) => state.new_symbolic_value(symbol, None),
                            None => state,
                        }
                    }
                    swc_ecma_ast::ObjectPatProp::Rest(rest) => {
                        self.rebind_pattern(state, &rest.arg)
                    }
                })
            }
            AssignTargetPat::Invalid(_) => state,
        }
    }

    fn tracked_symbol(&self, span: Span) -> Option<SymbolId> {
        self.semantic
            .resolve(span)
            .filter(|symbol| self.tracked.contains(symbol))
    }

    fn handle_successors(&mut self, block: &BasicBlock<'a>, state: ProgramState) {
        let Some(branching) = block.branching else {
            self.push_all_successors(block, state);
            return;
        };

        let condition_value = state.peek_stack().cloned();
        let state = if branching.is_statement {
            state.clear_stack()
        } else {
            state
        };

        match branching.kind {
            BranchingKind::ForIn | BranchingKind::ForOf => {
                let object_is_null = condition_value
                    .as_ref()
                    .map(|value| state.get_nullability(value) == Nullability::Null)
                    .unwrap_or(false);
                if object_is_null {
                    // Iterating null or undefined yields no iterations.
                    self.push_successor(branching.false_successor, state);
                } else {
                    self.push_successor(branching.true_successor, state.clone());
                    self.push_successor(branching.false_successor, state);
                }
            }
            _ => self.handle_condition(&branching, condition_value, state),
        }
    }

    fn handle_condition(
        &mut self,
        branching: &Branching<'a>,
        condition_value: Option<SymbolicValue>,
        state: ProgramState,
    ) {
        let Some(condition) = branching.condition else {
            self.push_successor(branching.true_successor, state.clone());
            self.push_successor(branching.false_successor, state);
            return;
        };

        if let Some(value) = boolean_literal(condition) {
            if !branching.kind.is_loop() {
                self.record_condition(
                    condition.span(),
                    if value {
                        Truthiness::Truthy
                    } else {
                        Truthiness::Falsy
                    },
                );
            }
            let successor = if value {
                branching.true_successor
            } else {
                branching.false_successor
            };
            self.push_successor(successor, state);
            return;
        }

        let condition_value = self
            .pattern_checker(condition, &state)
            .or(condition_value)
            .unwrap_or(SymbolicValue::Unknown);

        if let Feasibility::Feasible(truthy_state) =
            condition_value.constrain(&state, Constraint::TRUTHY)
        {
            self.record_condition(condition.span(), Truthiness::Truthy);
            self.push_successor(branching.true_successor, truthy_state);
        }
        if let Feasibility::Feasible(falsy_state) =
            condition_value.constrain(&state, Constraint::FALSY)
        {
            self.record_condition(condition.span(), Truthiness::Falsy);
            self.push_successor(branching.false_successor, falsy_state);
        }
    }

    /// Rebuilds the condition value from the syntax of well-known test
    /// patterns (`typeof x === "..."`, `x === null/undefined`, `x == null`)
    /// so that the branch can narrow the tested variable.
    fn pattern_checker(&self, condition: &Expr, state: &ProgramState) -> Option<SymbolicValue> {
        let Expr::Bin(bin) = unparenthesized(condition) else {
            return None;
        };

        let (negated, strict) = match bin.op {
            BinaryOp::EqEqEq => (false, true),
            BinaryOp::NotEqEq => (true, true),
            BinaryOp::EqEq => (false, false),
            BinaryOp::NotEq => (true, false),
            _ => return None,
        };

        let value = self
            .typeof_pattern(&bin.left, &bin.right, state)
            .or_else(|| self.typeof_pattern(&bin.right, &bin.left, state))
            .or_else(|| self.null_pattern(&bin.left, &bin.right, strict, state))
            .or_else(|| self.null_pattern(&bin.right, &bin.left, strict, state));

        value.map(|value| {
            if negated {
                SymbolicValue::logical_not(value)
            } else {
                value
            }
        })
    }

    /// `typeof x === "string-literal"`
    fn typeof_pattern(
        &self,
        left: &Expr,
        right: &Expr,
        state: &ProgramState,
    ) -> Option<SymbolicValue> {
        let unary = match unparenthesized(left) {
            Expr::Unary(unary) if unary.op == UnaryOp::TypeOf => unary,
            _ => return None,
        };
        let type_name = match unparenthesized(right) {
            Expr::Lit(Lit::Str(string)) => string.value.to_string(),
            _ => return None,
        };
        let operand = self.tracked_value(&unary.arg, state)?;
        Some(SymbolicValue::type_of_test(operand, type_name))
    }

    /// `x === null`, `x === undefined`, `x == null`
    fn null_pattern(
        &self,
        literal: &Expr,
        other: &Expr,
        strict: bool,
        state: &ProgramState,
    ) -> Option<SymbolicValue> {
        let constraint = Constraint::from_expr(unparenthesized(literal))?;
        if !constraint.is_stricter_or_equal_to(Constraint::NULL_OR_UNDEFINED) {
            return None;
        }
        let tested = if strict {
            constraint
        } else {
            // Loose equality conflates null and undefined.
            Constraint::NULL_OR_UNDEFINED
        };
        let operand = self.tracked_value(other, state)?;
        Some(SymbolicValue::equal_to(operand, tested))
    }

    fn tracked_value(&self, expr: &Expr, state: &ProgramState) -> Option<SymbolicValue> {
        match unparenthesized(expr) {
            Expr::Ident(ident) => {
                let symbol = self.tracked_symbol(ident.span)?;
                state.get_symbolic_value(symbol).cloned()
            }
            _ => None,
        }
    }

    fn record_condition(&mut self, span: Span, truthiness: Truthiness) {
        let entry = self.conditions.entry(span).or_insert((false, false));
        match truthiness {
            Truthiness::Truthy => entry.0 = true,
            Truthiness::Falsy => entry.1 = true,
            Truthiness::Unknown => {}
        }
    }

    fn push_all_successors(&mut self, block: &BasicBlock<'a>, state: ProgramState) {
        for (i, successor) in block.successors.iter().enumerate() {
            if i + 1 == block.successors.len() {
                self.push_successor(*successor, state);
                break;
            }
            self.push_successor(*successor, state.clone());
        }
    }

    fn push_successor(&mut self, block: BasicBlockId<'a>, state: ProgramState) {
        self.work_list.push_back(BlockExecution { block, state });
    }

    fn build_outcome(&self, completed: bool) -> ExecutionOutcome {
        let mut conditions: Vec<ConditionOutcome> = self
            .conditions
            .iter()
            .map(|(span, (truthy, falsy))| ConditionOutcome {
                span: (*span).into(),
                truthy: *truthy,
                falsy: *falsy,
            })
            .collect();
        conditions.sort_by_key(|outcome| outcome.span);

        ExecutionOutcome {
            completed,
            conditions,
            null_dereferences: self.null_dereferences.clone(),
            argument_mismatches: self.argument_mismatches.clone(),
        }
    }
}

fn unparenthesized(expr: &Expr) -> &Expr {
    match expr {
        Expr::Paren(paren) => unparenthesized(&paren.expr),
        _ => expr,
    }
}

/// The value a variable is bound to after an assignment. Values without
/// their own identity (unknown results, plain constraints) become fresh
/// tracked allocations so that later branch conditions can narrow the
/// variable; values with identity or call semantics are stored as-is.
fn assigned_value(state: ProgramState, value: SymbolicValue) -> (ProgramState, SymbolicValue) {
    match value {
        SymbolicValue::Unknown => state.allocate(None),
        SymbolicValue::WithConstraint(constraint) => state.allocate(Some(constraint)),
        other => (state, other),
    }
}
