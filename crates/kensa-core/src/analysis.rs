//! Per-file analysis orchestration
//!
//! Binds a parsed file, builds one control flow graph per analyzable scope
//! (the module top level and every function body), and runs symbolic
//! execution over each.

use swc_ecma_ast::{
    ArrowExpr, BlockStmtOrExpr, Callee, ClassMember, Decl, DefaultDecl, Expr, ForHead, Function,
    Module, ModuleDecl, ModuleItem, Pat, Prop, PropOrSpread, Stmt, VarDeclOrExpr,
};

use crate::cfg::ControlFlowGraph;
use crate::config::Config;
use crate::parser::ParsedFile;
use crate::se::execution::{ExecutionOutcome, SeCheck, SymbolicExecution};
use crate::semantic::SemanticModel;

pub struct Analyzer {
    max_block_executions: usize,
    analyze_functions: bool,
}

impl Default for Analyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer {
    pub fn new() -> Self {
        Self::with_config(&Config::default())
    }

    pub fn with_config(config: &Config) -> Self {
        Self {
            max_block_executions: config.engine.max_block_executions,
            analyze_functions: config.engine.analyze_functions,
        }
    }

    /// Symbolically executes every analyzable scope of the file. Outcomes
    /// are ordered top level first, then function bodies in source order.
    pub fn analyze(&self, file: &ParsedFile) -> Vec<ExecutionOutcome> {
        self.analyze_with_checks(file, &mut [])
    }

    pub fn analyze_with_checks(
        &self,
        file: &ParsedFile,
        checks: &mut [&mut dyn SeCheck],
    ) -> Vec<ExecutionOutcome> {
        let Some(module) = file.module() else {
            return Vec::new();
        };
        let semantic = SemanticModel::bind(module);
        let mut outcomes = Vec::new();

        tracing::debug!(filename = %file.metadata().filename, "symbolic execution");

        let module_cfg = ControlFlowGraph::build_module(module);
        let mut execution = SymbolicExecution::with_limit(
            &module_cfg,
            &semantic,
            semantic.global_scope(),
            self.max_block_executions,
        );
        outcomes.push(execution.visit_cfg(checks));

        if self.analyze_functions {
            for site in collect_functions(module) {
                let (cfg, span) = match site {
                    FunctionSite::Function(function) => {
                        (ControlFlowGraph::build_function(function), function.span)
                    }
                    FunctionSite::Arrow(arrow) => (ControlFlowGraph::build_arrow(arrow), arrow.span),
                };
                let Some(scope) = semantic.function_scope(span) else {
                    continue;
                };
                let mut execution = SymbolicExecution::with_limit(
                    &cfg,
                    &semantic,
                    scope,
                    self.max_block_executions,
                );
                outcomes.push(execution.visit_cfg(checks));
            }
        }

        outcomes
    }
}

enum FunctionSite<'a> {
    Function(&'a Function),
    Arrow(&'a ArrowExpr),
}

/// Collects every function body of the module, in source order, including
/// nested ones.
fn collect_functions(module: &Module) -> Vec<FunctionSite<'_>> {
    let mut sites = Vec::new();
    for item in &module.body {
        match item {
            ModuleItem::Stmt(stmt) => collect_stmt(stmt, &mut sites),
            ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(export)) => {
                collect_decl(&export.decl, &mut sites)
            }
            ModuleItem::ModuleDecl(ModuleDecl::ExportDefaultDecl(export)) => match &export.decl {
                DefaultDecl::Fn(fn_expr) => {
                    sites.push(FunctionSite::Function(&fn_expr.function));
                    collect_function(&fn_expr.function, &mut sites);
                }
                DefaultDecl::Class(class_expr) => collect_class(&class_expr.class, &mut sites),
                DefaultDecl::TsInterfaceDecl(_) => {}
            },
            ModuleItem::ModuleDecl(ModuleDecl::ExportDefaultExpr(export)) => {
                collect_expr(&export.expr, &mut sites)
            }
            ModuleItem::ModuleDecl(_) => {}
        }
    }
    sites
}

fn collect_stmt<'a>(stmt: &'a Stmt, sites: &mut Vec<FunctionSite<'a>>) {
    match stmt {
        Stmt::Decl(decl) => collect_decl(decl, sites),
        Stmt::Block(block) => {
            for stmt in &block.stmts {
                collect_stmt(stmt, sites);
            }
        }
        Stmt::If(if_stmt) => {
            collect_expr(&if_stmt.test, sites);
            collect_stmt(&if_stmt.cons, sites);
            if let Some(alt) = &if_stmt.alt {
                collect_stmt(alt, sites);
            }
        }
        Stmt::While(s) => {
            collect_expr(&s.test, sites);
            collect_stmt(&s.body, sites);
        }
        Stmt::DoWhile(s) => {
            collect_stmt(&s.body, sites);
            collect_expr(&s.test, sites);
        }
        Stmt::For(s) => {
            match &s.init {
                Some(VarDeclOrExpr::VarDecl(var_decl)) => {
                    for declarator in &var_decl.decls {
                        if let Some(init) = &declarator.init {
                            collect_expr(init, sites);
                        }
                    }
                }
                Some(VarDeclOrExpr::Expr(expr)) => collect_expr(expr, sites),
                None => {}
            }
            if let Some(test) = &s.test {
                collect_expr(test, sites);
            }
            if let Some(update) = &s.update {
                collect_expr(update, sites);
            }
            collect_stmt(&s.body, sites);
        }
        Stmt::ForIn(s) => {
            collect_for_head(&s.left, sites);
            collect_expr(&s.right, sites);
            collect_stmt(&s.body, sites);
        }
        Stmt::ForOf(s) => {
            collect_for_head(&s.left, sites);
            collect_expr(&s.right, sites);
            collect_stmt(&s.body, sites);
        }
        Stmt::Switch(s) => {
            collect_expr(&s.discriminant, sites);
            for case in &s.cases {
                if let Some(test) = &case.test {
                    collect_expr(test, sites);
                }
                for stmt in &case.cons {
                    collect_stmt(stmt, sites);
                }
            }
        }
        Stmt::Try(s) => {
            for stmt in &s.block.stmts {
                collect_stmt(stmt, sites);
            }
            if let Some(handler) = &s.handler {
                for stmt in &handler.body.stmts {
                    collect_stmt(stmt, sites);
                }
            }
            if let Some(finalizer) = &s.finalizer {
                for stmt in &finalizer.stmts {
                    collect_stmt(stmt, sites);
                }
            }
        }
        Stmt::Labeled(s) => collect_stmt(&s.body, sites),
        Stmt::With(s) => {
            collect_expr(&s.obj, sites);
            collect_stmt(&s.body, sites);
        }
        Stmt::Return(s) => {
            if let Some(arg) = &s.arg {
                collect_expr(arg, sites);
            }
        }
        Stmt::Throw(s) => collect_expr(&s.arg, sites),
        Stmt::Expr(s) => collect_expr(&s.expr, sites),
        Stmt::Empty(_) | Stmt::Debugger(_) | Stmt::Break(_) | Stmt::Continue(_) => {}
    }
}

fn collect_decl<'a>(decl: &'a Decl, sites: &mut Vec<FunctionSite<'a>>) {
    match decl {
        Decl::Fn(fn_decl) => {
            sites.push(FunctionSite::Function(&fn_decl.function));
            collect_function(&fn_decl.function, sites);
        }
        Decl::Class(class_decl) => collect_class(&class_decl.class, sites),
        Decl::Var(var_decl) => {
            for declarator in &var_decl.decls {
                if let Some(init) = &declarator.init {
                    collect_expr(init, sites);
                }
            }
        }
        _ => {}
    }
}

fn collect_function<'a>(function: &'a Function, sites: &mut Vec<FunctionSite<'a>>) {
    if let Some(body) = &function.body {
        for stmt in &body.stmts {
            collect_stmt(stmt, sites);
        }
    }
}

fn collect_arrow<'a>(arrow: &'a ArrowExpr, sites: &mut Vec<FunctionSite<'a>>) {
    match arrow.body.as_ref() {
        BlockStmtOrExpr::BlockStmt(block) => {
            for stmt in &block.stmts {
                collect_stmt(stmt, sites);
            }
        }
        BlockStmtOrExpr::Expr(expr) => collect_expr(expr, sites),
    }
}

fn collect_class<'a>(class: &'a swc_ecma_ast::Class, sites: &mut Vec<FunctionSite<'a>>) {
    if let Some(super_class) = &class.super_class {
        collect_expr(super_class, sites);
    }
    for member in &class.body {
        match member {
            ClassMember::Method(method) => {
                sites.push(FunctionSite::Function(&method.function));
                collect_function(&method.function, sites);
            }
            ClassMember::PrivateMethod(method) => {
                sites.push(FunctionSite::Function(&method.function));
                collect_function(&method.function, sites);
            }
            ClassMember::Constructor(ctor) => {
                if let Some(body) = &ctor.body {
                    for stmt in &body.stmts {
                        collect_stmt(stmt, sites);
                    }
                }
            }
            ClassMember::ClassProp(prop) => {
                if let Some(value) = &prop.value {
                    collect_expr(value, sites);
                }
            }
            ClassMember::PrivateProp(prop) => {
                if let Some(value) = &prop.value {
                    collect_expr(value, sites);
                }
            }
            ClassMember::StaticBlock(block) => {
                for stmt in &block.body.stmts {
                    collect_stmt(stmt, sites);
                }
            }
            _ => {}
        }
    }
}

fn collect_for_head<'a>(head: &'a ForHead, sites: &mut Vec<FunctionSite<'a>>) {
    if let ForHead::Pat(pat) = head {
        collect_pat(pat, sites);
    }
}

fn collect_pat<'a>(pat: &'a Pat, sites: &mut Vec<FunctionSite<'a>>) {
    if let Pat::Assign(assign) = pat {
        collect_expr(&assign.right, sites);
    }
}

fn collect_expr<'a>(expr: &'a Expr, sites: &mut Vec<FunctionSite<'a>>) {
    match expr {
        Expr::Fn(fn_expr) => {
            sites.push(FunctionSite::Function(&fn_expr.function));
            collect_function(&fn_expr.function, sites);
        }
        Expr::Arrow(arrow) => {
            sites.push(FunctionSite::Arrow(arrow));
            collect_arrow(arrow, sites);
        }
        Expr::Class(class_expr) => collect_class(&class_expr.class, sites),
        Expr::Array(array) => {
            for element in array.elems.iter().flatten() {
                collect_expr(&element.expr, sites);
            }
        }
        Expr::Object(object) => {
            for prop in &object.props {
                match prop {
                    PropOrSpread::Spread(spread) => collect_expr(&spread.expr, sites),
                    PropOrSpread::Prop(prop) => match prop.as_ref() {
                        Prop::KeyValue(kv) => collect_expr(&kv.value, sites),
                        Prop::Assign(assign) => collect_expr(&assign.value, sites),
                        Prop::Method(method) => {
                            sites.push(FunctionSite::Function(&method.function));
                            collect_function(&method.function, sites);
                        }
                        Prop::Getter(getter) => {
                            if let Some(body) = &getter.body {
                                for stmt in &body.stmts {
                                    collect_stmt(stmt, sites);
                                }
                            }
                        }
                        Prop::Setter(setter) => {
                            if let Some(body) = &setter.body {
                                for stmt in &body.stmts {
                                    collect_stmt(stmt, sites);
                                }
                            }
                        }
                        Prop::Shorthand(_) => {}
                    },
                }
            }
        }
        Expr::Unary(unary) => collect_expr(&unary.arg, sites),
        Expr::Update(update) => collect_expr(&update.arg, sites),
        Expr::Bin(bin) => {
            collect_expr(&bin.left, sites);
            collect_expr(&bin.right, sites);
        }
        Expr::Assign(assign) => collect_expr(&assign.right, sites),
        Expr::Member(member) => collect_expr(&member.obj, sites),
        Expr::Cond(cond) => {
            collect_expr(&cond.test, sites);
            collect_expr(&cond.cons, sites);
            collect_expr(&cond.alt, sites);
        }
        Expr::Call(call) => {
            if let Callee::Expr(callee) = &call.callee {
                collect_expr(callee, sites);
            }
            for arg in &call.args {
                collect_expr(&arg.expr, sites);
            }
        }
        Expr::New(new) => {
            collect_expr(&new.callee, sites);
            if let Some(args) = &new.args {
                for arg in args {
                    collect_expr(&arg.expr, sites);
                }
            }
        }
        Expr::Seq(seq) => {
            for expr in &seq.exprs {
                collect_expr(expr, sites);
            }
        }
        Expr::Tpl(tpl) => {
            for expr in &tpl.exprs {
                collect_expr(expr, sites);
            }
        }
        Expr::TaggedTpl(tagged) => {
            collect_expr(&tagged.tag, sites);
            for expr in &tagged.tpl.exprs {
                collect_expr(expr, sites);
            }
        }
        Expr::Paren(paren) => collect_expr(&paren.expr, sites),
        Expr::Await(await_expr) => collect_expr(&await_expr.arg, sites),
        Expr::Yield(yield_expr) => {
            if let Some(arg) = &yield_expr.arg {
                collect_expr(arg, sites);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analyzes_the_top_level() {
        let file = ParsedFile::from_source("test.js", "var x = 1;");
        let outcomes = Analyzer::new().analyze(&file);

        assert_eq!(outcomes.len(), 1);
        assert!(outcomes[0].completed);
    }

    #[test]
    fn analyzes_each_function_body() {
        let file = ParsedFile::from_source(
            "test.js",
            "function f() { var a = 1; } const g = () => { var b = 2; };",
        );
        let outcomes = Analyzer::new().analyze(&file);

        assert_eq!(outcomes.len(), 3);
        assert!(outcomes.iter().all(|o| o.completed));
    }

    #[test]
    fn nested_functions_are_analyzed_too() {
        let file = ParsedFile::from_source(
            "test.js",
            "function outer() { function inner() { var x = null; if (x) { x; } } }",
        );
        let outcomes = Analyzer::new().analyze(&file);

        assert_eq!(outcomes.len(), 3);
        let inner = &outcomes[2];
        assert_eq!(inner.conditions.len(), 1);
        assert!(inner.conditions[0].is_always_falsy());
    }

    #[test]
    fn function_analysis_can_be_disabled() {
        let config = Config::parse("[engine]\nanalyze_functions = false\n", std::path::Path::new("kensa.toml"))
            .unwrap()
            .config;
        let file = ParsedFile::from_source("test.js", "function f() { var a = 1; }");
        let outcomes = Analyzer::with_config(&config).analyze(&file);

        assert_eq!(outcomes.len(), 1);
    }

    #[test]
    fn files_without_a_recovered_module_produce_no_outcomes() {
        let file = ParsedFile::from_source("test.js", "function {{{");
        let outcomes = Analyzer::new().analyze(&file);

        if file.module().is_none() {
            assert!(outcomes.is_empty());
        }
    }
}
