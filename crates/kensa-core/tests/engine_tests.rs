//! End-to-end tests driving the engine over parsed sources

use kensa_core::cfg::{ControlFlowGraph, Element};
use kensa_core::se::{
    Constraint, ExecutionOutcome, ProgramState, SeCheck, SymbolicExecution, SymbolicValue,
};
use kensa_core::semantic::{SemanticModel, SymbolId};
use kensa_core::{Analyzer, ParsedFile};

fn analyze_top_level(code: &str) -> ExecutionOutcome {
    let file = ParsedFile::from_source("test.js", code);
    let mut outcomes = Analyzer::new().analyze(&file);
    assert!(!outcomes.is_empty(), "expected at least the top-level outcome");
    outcomes.remove(0)
}

fn single_condition(outcome: &ExecutionOutcome) -> &kensa_core::se::ConditionOutcome {
    assert_eq!(
        outcome.conditions.len(),
        1,
        "expected exactly one condition, got {:?}",
        outcome.conditions
    );
    &outcome.conditions[0]
}

#[test]
fn null_variable_makes_the_condition_always_falsy() {
    let outcome = analyze_top_level("var x = null; if (x) { y; }");

    assert!(outcome.completed);
    assert!(single_condition(&outcome).is_always_falsy());
}

#[test]
fn truthy_literal_makes_the_condition_always_truthy() {
    let outcome = analyze_top_level("var x = 1; if (x) { y; }");

    assert!(single_condition(&outcome).is_always_truthy());
}

#[test]
fn unassigned_variable_is_undefined_in_typeof_tests() {
    let outcome = analyze_top_level("var x; if (typeof x === \"undefined\") { a; } else { b; }");

    assert!(single_condition(&outcome).is_always_truthy());
}

#[test]
fn typeof_mismatch_is_always_falsy() {
    let outcome = analyze_top_level("var x = 1; if (typeof x === \"string\") { a; }");

    assert!(single_condition(&outcome).is_always_falsy());
}

#[test]
fn strict_null_comparison_narrows_both_ways() {
    let outcome = analyze_top_level("var x = null; if (x === null) { a; } else { b; }");

    assert!(single_condition(&outcome).is_always_truthy());
}

#[test]
fn loose_null_comparison_covers_undefined() {
    let outcome = analyze_top_level("var x; if (x == null) { a; }");

    assert!(single_condition(&outcome).is_always_truthy());
}

#[test]
fn unknown_parameter_conditions_stay_open() {
    let file = ParsedFile::from_source("test.js", "function f(p) { if (p) { a; } }");
    let outcomes = Analyzer::new().analyze(&file);

    let function_outcome = &outcomes[1];
    let condition = &function_outcome.conditions[0];
    assert!(condition.truthy && condition.falsy);
}

#[test]
fn negated_condition_flips_the_outcome() {
    let outcome = analyze_top_level("var x = null; if (!x) { a; }");

    assert!(single_condition(&outcome).is_always_truthy());
}

#[test]
fn number_is_nan_on_a_string_is_always_falsy() {
    let outcome = analyze_top_level("if (Number.isNaN(\"abc\")) { a; }");

    assert!(single_condition(&outcome).is_always_falsy());
}

#[test]
fn null_dereference_is_reported_and_the_path_pruned() {
    let outcome = analyze_top_level("var x = null; x.foo; y;");

    assert_eq!(outcome.null_dereferences.len(), 1);
}

#[test]
fn member_access_on_known_objects_is_not_reported() {
    let outcome = analyze_top_level("var x = []; x.length;");

    assert!(outcome.null_dereferences.is_empty());
}

#[test]
fn short_circuit_condition_prunes_the_right_operand() {
    let outcome = analyze_top_level("var x = null; if (x && x.length) { a; }");

    // Only the left operand is ever tested; the right one is unreachable.
    assert_eq!(outcome.conditions.len(), 1);
    assert!(outcome.conditions[0].is_always_falsy());
    assert!(outcome.condition_at(outcome.conditions[0].span).is_some());
    assert!(outcome.null_dereferences.is_empty());
}

#[test]
fn for_in_over_null_skips_the_body() {
    let outcome = analyze_top_level("var y; for (var k in null) { y = 1; } if (y) { a; }");

    assert!(single_condition(&outcome).is_always_falsy());
}

#[test]
fn argument_type_mismatches_are_recorded() {
    let outcome = analyze_top_level("Math.sin(\"hello\");");

    assert_eq!(outcome.argument_mismatches.len(), 1);
    assert_eq!(outcome.argument_mismatches[0].callee, "sin");
    assert_eq!(outcome.argument_mismatches[0].index, 0);
}

#[test]
fn extra_arguments_are_recorded_as_mismatches() {
    let outcome = analyze_top_level("Math.random(1);");

    assert_eq!(outcome.argument_mismatches.len(), 1);
    assert_eq!(outcome.argument_mismatches[0].callee, "random");
}

#[test]
fn well_typed_calls_produce_no_mismatches() {
    let outcome = analyze_top_level("Math.sin(1); Math.max(1, 2, 3); isNaN(x);");

    assert!(outcome.argument_mismatches.is_empty());
}

#[test]
fn outcomes_serialize_to_json() {
    let outcome = analyze_top_level("var x = null; if (x) { y; }");

    let json = serde_json::to_value(&outcome).expect("serializable outcome");
    assert_eq!(json["completed"], true);
    assert!(json["conditions"].as_array().is_some());
}

/// Observes the constraint of one tracked symbol before every element.
struct ConstraintProbe {
    symbol: SymbolId,
    observed: Vec<Constraint>,
}

impl SeCheck for ConstraintProbe {
    fn before_block_element(&mut self, state: &ProgramState, _element: &Element<'_>) {
        if let Some(value) = state.get_symbolic_value(self.symbol) {
            self.observed.push(state.get_constraint(value));
        }
    }
}

fn probe_function_symbol(code: &str, symbol_name: &str) -> Vec<Constraint> {
    let file = ParsedFile::from_source("test.js", code);
    let module = file.module().expect("parse failed");
    let semantic = SemanticModel::bind(module);

    let symbol = semantic
        .symbol_table
        .all_symbols()
        .find(|s| s.name == symbol_name)
        .map(|s| s.id)
        .expect("probed symbol");

    let scope = semantic
        .scope_tree
        .function_root(semantic.symbol_table.get(symbol).scope);
    let cfg = if scope == semantic.global_scope() {
        ControlFlowGraph::build_module(module)
    } else {
        panic!("probe expects a top-level symbol");
    };

    let mut probe = ConstraintProbe {
        symbol,
        observed: Vec::new(),
    };
    let mut execution = SymbolicExecution::new(&cfg, &semantic, scope);
    let outcome = execution.visit_cfg(&mut [&mut probe]);
    assert!(outcome.completed);
    probe.observed
}

#[test]
fn is_array_narrows_the_tested_variable_inside_the_branch() {
    let observed = probe_function_symbol(
        "var p = unknown(); if (Array.isArray(p)) { p; } else { p; }",
        "p",
    );

    assert!(
        observed.contains(&Constraint::ARRAY),
        "expected the truthy branch to see exactly an array, got {observed:?}"
    );
    assert!(
        observed.contains(&Constraint::ARRAY.not()),
        "expected the falsy branch to see the complement"
    );
}

#[test]
fn truthiness_narrowing_applies_inside_branches() {
    let observed = probe_function_symbol("var p = unknown(); if (p) { p; } else { p; }", "p");

    assert!(observed.contains(&Constraint::TRUTHY));
    assert!(observed.contains(&Constraint::FALSY));
}

/// Snapshots the symbolic value bound to one symbol after every element.
struct BindingProbe {
    symbol: SymbolId,
    snapshots: Vec<SymbolicValue>,
}

impl SeCheck for BindingProbe {
    fn after_block_element(&mut self, state: &ProgramState, _element: &Element<'_>) {
        if let Some(value) = state.get_symbolic_value(self.symbol) {
            self.snapshots.push(value.clone());
        }
    }
}

#[test]
fn mutating_calls_invalidate_the_receiver_binding() {
    let file = ParsedFile::from_source("test.js", "var a = [1]; a.sort(); a;");
    let module = file.module().expect("parse failed");
    let semantic = SemanticModel::bind(module);
    let cfg = ControlFlowGraph::build_module(module);

    let symbol = semantic
        .symbol_table
        .all_symbols()
        .find(|s| s.name == "a")
        .map(|s| s.id)
        .expect("symbol a");

    let mut probe = BindingProbe {
        symbol,
        snapshots: Vec::new(),
    };
    let mut execution = SymbolicExecution::new(&cfg, &semantic, semantic.global_scope());
    execution.visit_cfg(&mut [&mut probe]);

    let mut distinct = probe.snapshots.clone();
    distinct.dedup();
    assert_eq!(
        distinct.len(),
        2,
        "expected the stored binding and the invalidated one, got {distinct:?}"
    );
    assert!(distinct
        .iter()
        .all(|value| matches!(value, SymbolicValue::Variable(_))));
}

#[test]
fn non_mutating_calls_keep_the_receiver_binding() {
    let file = ParsedFile::from_source("test.js", "var a = [1]; a.map(f); a;");
    let module = file.module().expect("parse failed");
    let semantic = SemanticModel::bind(module);
    let cfg = ControlFlowGraph::build_module(module);

    let symbol = semantic
        .symbol_table
        .all_symbols()
        .find(|s| s.name == "a")
        .map(|s| s.id)
        .expect("symbol a");

    let mut probe = BindingProbe {
        symbol,
        snapshots: Vec::new(),
    };
    let mut execution = SymbolicExecution::new(&cfg, &semantic, semantic.global_scope());
    execution.visit_cfg(&mut [&mut probe]);

    let mut distinct = probe.snapshots.clone();
    distinct.dedup();
    assert_eq!(
        distinct.len(),
        1,
        "the binding must not change after a side-effect-free call, got {distinct:?}"
    );
}

#[test]
fn pathological_loops_stop_at_the_execution_budget() {
    let file = ParsedFile::from_source(
        "test.js",
        "var i = 0; while (c) { i++; } done;",
    );
    let module = file.module().expect("parse failed");
    let semantic = SemanticModel::bind(module);
    let cfg = ControlFlowGraph::build_module(module);

    let mut execution = SymbolicExecution::with_limit(&cfg, &semantic, semantic.global_scope(), 10);
    let outcome = execution.visit_cfg(&mut []);

    // The walk terminates even though states keep changing; the partial
    // outcome says so.
    assert!(!outcome.completed);
}
