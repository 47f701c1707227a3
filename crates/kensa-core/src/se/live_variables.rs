//! Live variable analysis over the control flow graph
//!
//! Computes, per basic block, the symbols whose current value may still be
//! read (live-in/live-out sets) with a backward worklist pass. Symbolic
//! execution uses the variant where plain writes also count as uses, so
//! that a tracked variable is only forgotten once nothing in the rest of
//! the function can observe it.

use std::collections::{HashMap, HashSet, VecDeque};

use swc_ecma_ast::{AssignOp, AssignTarget, Expr, Pat, SimpleAssignTarget};

use crate::cfg::{BasicBlockId, ControlFlowGraph, Element};
use crate::semantic::{SemanticModel, SymbolId, UsageKind};

pub struct LiveVariableAnalysis<'a> {
    live_in: HashMap<BasicBlockId<'a>, HashSet<SymbolId>>,
    live_out: HashMap<BasicBlockId<'a>, HashSet<SymbolId>>,
    never_read: HashSet<SymbolId>,
}

impl<'a> LiveVariableAnalysis<'a> {
    /// Classic liveness: every write kills.
    pub fn create(cfg: &ControlFlowGraph<'a>, semantic: &SemanticModel) -> Self {
        Self::build(cfg, semantic, false)
    }

    /// Liveness for symbolic execution: plain writes count as uses too, so
    /// only declaration writes kill.
    pub fn for_symbolic_execution(cfg: &ControlFlowGraph<'a>, semantic: &SemanticModel) -> Self {
        Self::build(cfg, semantic, true)
    }

    pub fn live_in(&self, block: BasicBlockId<'a>) -> Option<&HashSet<SymbolId>> {
        self.live_in.get(&block)
    }

    pub fn live_out(&self, block: BasicBlockId<'a>) -> Option<&HashSet<SymbolId>> {
        self.live_out.get(&block)
    }

    /// Symbols referenced in the CFG whose value is never read anywhere.
    pub fn never_read(&self) -> &HashSet<SymbolId> {
        &self.never_read
    }

    fn build(cfg: &ControlFlowGraph<'a>, semantic: &SemanticModel, for_se: bool) -> Self {
        let mut live_in: HashMap<BasicBlockId<'a>, HashSet<SymbolId>> = HashMap::new();
        let mut live_out: HashMap<BasicBlockId<'a>, HashSet<SymbolId>> = HashMap::new();
        let mut seen_symbols: HashSet<SymbolId> = HashSet::new();

        let mut accesses: HashMap<BasicBlockId<'a>, Vec<(SymbolId, UsageKind)>> = HashMap::new();
        for block in cfg.blocks() {
            let mut block_accesses = Vec::new();
            for element in &block.elements {
                classify_element(element, semantic, &mut block_accesses);
            }
            seen_symbols.extend(block_accesses.iter().map(|(symbol, _)| *symbol));
            accesses.insert(block.id, block_accesses);
            live_in.insert(block.id, HashSet::new());
            live_out.insert(block.id, HashSet::new());
        }

        // Backward worklist: recompute a block whenever a successor's
        // live-in set changed.
        let mut queue: VecDeque<BasicBlockId<'a>> = cfg.blocks().map(|b| b.id).collect();
        while let Some(block_id) = queue.pop_front() {
            let mut out = HashSet::new();
            for successor in cfg.successors(block_id) {
                out.extend(live_in[&successor.id].iter().copied());
            }

            let mut input = out.clone();
            for (symbol, kind) in accesses[&block_id].iter().rev() {
                if kills(*kind, for_se) {
                    input.remove(symbol);
                } else if reads(*kind, for_se) {
                    input.insert(*symbol);
                }
            }

            live_out.insert(block_id, out);
            if live_in[&block_id] != input {
                live_in.insert(block_id, input);
                for predecessor in cfg.predecessors(block_id) {
                    queue.push_back(predecessor.id);
                }
            }
        }

        let never_read = seen_symbols
            .into_iter()
            .filter(|symbol| {
                !semantic
                    .symbol_table
                    .get(*symbol)
                    .usages
                    .iter()
                    .any(|usage| usage.kind.is_read())
            })
            .collect();

        LiveVariableAnalysis {
            live_in,
            live_out,
            never_read,
        }
    }
}

fn reads(kind: UsageKind, for_se: bool) -> bool {
    kind.is_read() || (for_se && kind == UsageKind::Write)
}

fn kills(kind: UsageKind, for_se: bool) -> bool {
    match kind {
        UsageKind::DeclarationWrite => true,
        UsageKind::Write => !for_se,
        _ => false,
    }
}

/// The symbol accesses an element performs, in evaluation order.
fn classify_element(
    element: &Element<'_>,
    semantic: &SemanticModel,
    out: &mut Vec<(SymbolId, UsageKind)>,
) {
    match element {
        Element::Expr(Expr::Ident(ident)) => {
            if let Some(symbol) = semantic.resolve(ident.span) {
                out.push((symbol, UsageKind::Read));
            }
        }
        Element::Expr(Expr::Assign(assign)) => {
            if let AssignTarget::Simple(SimpleAssignTarget::Ident(binding)) = &assign.left {
                if let Some(symbol) = semantic.resolve(binding.id.span) {
                    let kind = if assign.op == AssignOp::Assign {
                        UsageKind::Write
                    } else {
                        UsageKind::ReadWrite
                    };
                    out.push((symbol, kind));
                }
            }
        }
        Element::Expr(Expr::Update(update)) => {
            if let Expr::Ident(ident) = update.arg.as_ref() {
                if let Some(symbol) = semantic.resolve(ident.span) {
                    out.push((symbol, UsageKind::ReadWrite));
                }
            }
        }
        Element::Declarator(declarator) => {
            if declarator.init.is_some() {
                pattern_symbols(&declarator.name, semantic, UsageKind::DeclarationWrite, out);
            }
        }
        Element::Bind(pattern) => {
            pattern_symbols(pattern, semantic, UsageKind::Write, out);
        }
        _ => {}
    }
}

fn pattern_symbols(
    pattern: &Pat,
    semantic: &SemanticModel,
    kind: UsageKind,
    out: &mut Vec<(SymbolId, UsageKind)>,
) {
    match pattern {
        Pat::Ident(binding) => {
            if let Some(symbol) = semantic.resolve(binding.id.span) {
                out.push((symbol, kind));
            }
        }
        Pat::Array(array) => {
            for element in array.elems.iter().flatten() {
                pattern_symbols(element, semantic, kind, out);
            }
        }
        Pat::Object(object) => {
            for prop in &object.props {
                match prop {
                    swc_ecma_ast::ObjectPatProp::KeyValue(kv) => {
                        pattern_symbols(&kv.value, semantic, kind, out)
                    }
                    swc_ecma_ast::ObjectPatProp::Assign(assign) => {
                        if let Some(symbol) = semantic.resolve(assign.key.id.span) {
                            out.push((symbol, kind));
                        }
                    }
                    swc_ecma_ast::ObjectPatProp::Rest(rest) => {
                        pattern_symbols(&rest.arg, semantic, kind, out)
                    }
                }
            }
        }
        Pat::Assign(assign) => pattern_symbols(&assign.left, semantic, kind, out),
        Pat::Rest(rest) => pattern_symbols(&rest.arg, semantic, kind, out),
        Pat::Expr(_) | Pat::Invalid(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ParsedFile;
    use crate::semantic::SemanticModel;

    fn analyzed(code: &str, f: impl FnOnce(&ControlFlowGraph<'_>, &SemanticModel, LiveVariableAnalysis<'_>)) {
        let parsed = ParsedFile::from_source("test.js", code);
        let module = parsed.module().expect("parse failed");
        let semantic = SemanticModel::bind(module);
        let cfg = ControlFlowGraph::build_module(module);
        let lva = LiveVariableAnalysis::create(&cfg, &semantic);
        f(&cfg, &semantic, lva);
    }

    fn symbol_id(semantic: &SemanticModel, name: &str) -> SymbolId {
        semantic
            .symbol_table
            .all_symbols()
            .find(|s| s.name == name)
            .map(|s| s.id)
            .unwrap_or_else(|| panic!("no symbol {name}"))
    }

    #[test]
    fn variable_read_in_a_branch_is_live_into_it() {
        analyzed("let a = 1; if (c) { a; }", |cfg, semantic, lva| {
            let a = symbol_id(semantic, "a");
            let branch = cfg
                .blocks()
                .find(|b| {
                    b.elements.iter().any(|e| {
                        matches!(e, Element::Expr(Expr::Ident(id)) if semantic.resolve(id.span) == Some(a))
                    })
                })
                .expect("branch block reading a");
            assert!(lva.live_in(branch.id).unwrap().contains(&a));
        });
    }

    #[test]
    fn declaration_kills_liveness_upstream() {
        analyzed("let a = 1; a;", |cfg, _, lva| {
            let entry_successor = cfg.successors(cfg.entry()).next().unwrap();
            assert!(lva.live_in(entry_successor.id).unwrap().is_empty());
        });
    }

    #[test]
    fn loop_carried_reads_stay_live_around_the_back_edge() {
        analyzed("let n = 0; while (c) { n = n + 1; }", |cfg, semantic, lva| {
            let n = symbol_id(semantic, "n");
            let header = cfg
                .blocks()
                .find(|b| b.kind == crate::cfg::BasicBlockKind::LoopHeader)
                .expect("loop header");
            assert!(lva.live_in(header.id).unwrap().contains(&n));
        });
    }

    #[test]
    fn never_read_symbols_are_reported() {
        analyzed("let unused = 1; let used = 2; used;", |_, semantic, lva| {
            let unused = symbol_id(semantic, "unused");
            let used = symbol_id(semantic, "used");
            assert!(lva.never_read().contains(&unused));
            assert!(!lva.never_read().contains(&used));
        });
    }

    #[test]
    fn se_variant_keeps_written_variables_alive() {
        let parsed = ParsedFile::from_source("test.js", "let a = 1; if (c) { a = 2; }");
        let module = parsed.module().unwrap();
        let semantic = SemanticModel::bind(module);
        let cfg = ControlFlowGraph::build_module(module);

        let a = symbol_id(&semantic, "a");
        let classic = LiveVariableAnalysis::create(&cfg, &semantic);
        let for_se = LiveVariableAnalysis::for_symbolic_execution(&cfg, &semantic);

        let branch = cfg
            .blocks()
            .find(|b| {
                b.elements
                    .iter()
                    .any(|e| matches!(e, Element::Expr(Expr::Assign(_))))
            })
            .expect("assignment block");

        assert!(!classic.live_in(branch.id).unwrap().contains(&a));
        assert!(for_se.live_in(branch.id).unwrap().contains(&a));
    }
}
