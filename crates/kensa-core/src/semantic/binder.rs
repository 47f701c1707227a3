//! Scope and symbol binder
//!
//! Walks the AST once, building the scope tree and symbol table, resolving
//! every identifier reference to its declaration, and recording the usage
//! and capture information symbolic execution relies on. `var` and function
//! declarations are hoisted to the enclosing function scope before the
//! corresponding statements are visited.

use std::collections::HashMap;

use swc_common::{Span, Spanned};
use swc_ecma_ast::{
    ArrowExpr, AssignTarget, AssignTargetPat, BlockStmtOrExpr, Callee, Class, ClassMember, Decl,
    DefaultDecl, Expr, ForHead, Function, ImportSpecifier, Module, ModuleDecl, ModuleItem,
    ObjectPatProp, OptChainBase, Pat, Prop, PropName, PropOrSpread, SimpleAssignTarget, Stmt,
    VarDecl, VarDeclKind, VarDeclOrExpr,
};

use super::scope::{ScopeId, ScopeKind, ScopeTree};
use super::symbols::{DeclarationKind, SymbolId, SymbolKind, SymbolTable, UsageKind};

#[derive(Debug, Clone)]
pub struct UnresolvedReference {
    pub name: String,
    pub span: Span,
}

pub struct SemanticModel {
    pub scope_tree: ScopeTree,
    pub symbol_table: SymbolTable,
    pub unresolved_references: Vec<UnresolvedReference>,
    resolutions: HashMap<Span, SymbolId>,
    function_scopes: HashMap<Span, ScopeId>,
}

impl SemanticModel {
    pub fn bind(module: &Module) -> SemanticModel {
        ScopeBuilder::build(module)
    }

    /// The symbol an identifier occurrence (keyed by its span) resolves to.
    pub fn resolve(&self, span: Span) -> Option<SymbolId> {
        self.resolutions.get(&span).copied()
    }

    /// The scope created for a function, keyed by the function's span.
    pub fn function_scope(&self, span: Span) -> Option<ScopeId> {
        self.function_scopes.get(&span).copied()
    }

    pub fn global_scope(&self) -> ScopeId {
        self.scope_tree
            .root()
            .expect("a bound module always has a global scope")
    }

    /// Symbols that symbolic execution of `function_scope` may track:
    /// declared somewhere inside it (but not inside a nested function) and
    /// never referenced across a closure boundary. Sorted for determinism.
    pub fn trackable_symbols(&self, function_scope: ScopeId) -> Vec<SymbolId> {
        let mut symbols: Vec<SymbolId> = self
            .symbol_table
            .all_symbols()
            .filter(|symbol| {
                self.scope_tree.function_root(symbol.scope) == function_scope && !symbol.captured
            })
            .map(|symbol| symbol.id)
            .collect();
        symbols.sort_by_key(|id| id.index());
        symbols
    }
}

struct ScopeBuilder {
    scope_tree: ScopeTree,
    symbol_table: SymbolTable,
    current_scope: Option<ScopeId>,
    resolutions: HashMap<Span, SymbolId>,
    function_scopes: HashMap<Span, ScopeId>,
    unresolved: Vec<UnresolvedReference>,
}

impl ScopeBuilder {
    fn build(module: &Module) -> SemanticModel {
        let mut builder = ScopeBuilder {
            scope_tree: ScopeTree::new(),
            symbol_table: SymbolTable::new(),
            current_scope: None,
            resolutions: HashMap::new(),
            function_scopes: HashMap::new(),
            unresolved: Vec::new(),
        };
        builder.visit_module(module);
        SemanticModel {
            scope_tree: builder.scope_tree,
            symbol_table: builder.symbol_table,
            unresolved_references: builder.unresolved,
            resolutions: builder.resolutions,
            function_scopes: builder.function_scopes,
        }
    }

    fn current(&self) -> ScopeId {
        self.current_scope.expect("visiting requires a scope")
    }

    fn visit_module(&mut self, module: &Module) {
        let global = self.scope_tree.create_scope(ScopeKind::Global, None, module.span);
        self.current_scope = Some(global);

        for item in &module.body {
            match item {
                ModuleItem::Stmt(stmt) => self.hoist_stmt(stmt),
                ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(export)) => match &export.decl {
                    Decl::Fn(fn_decl) => {
                        self.declare(
                            &fn_decl.ident.sym,
                            SymbolKind::Function,
                            DeclarationKind::Function,
                            fn_decl.ident.span,
                        );
                    }
                    Decl::Var(var_decl) if var_decl.kind == VarDeclKind::Var => {
                        for declarator in &var_decl.decls {
                            self.declare_pattern(
                                &declarator.name,
                                SymbolKind::Variable,
                                DeclarationKind::Var,
                            );
                        }
                    }
                    _ => {}
                },
                ModuleItem::ModuleDecl(_) => {}
            }
        }

        for item in &module.body {
            match item {
                ModuleItem::ModuleDecl(decl) => self.visit_module_decl(decl),
                ModuleItem::Stmt(stmt) => self.visit_stmt(stmt),
            }
        }
    }

    fn visit_module_decl(&mut self, decl: &ModuleDecl) {
        match decl {
            ModuleDecl::Import(import) => {
                for specifier in &import.specifiers {
                    let local = match specifier {
                        ImportSpecifier::Named(named) => &named.local,
                        ImportSpecifier::Default(default) => &default.local,
                        ImportSpecifier::Namespace(namespace) => &namespace.local,
                    };
                    self.declare(
                        &local.sym,
                        SymbolKind::Import,
                        DeclarationKind::Import,
                        local.span,
                    );
                }
            }
            ModuleDecl::ExportDecl(export) => self.visit_decl(&export.decl),
            ModuleDecl::ExportDefaultDecl(export) => match &export.decl {
                DefaultDecl::Fn(fn_expr) => {
                    if let Some(ident) = &fn_expr.ident {
                        self.declare(
                            &ident.sym,
                            SymbolKind::Function,
                            DeclarationKind::Function,
                            ident.span,
                        );
                    }
                    self.visit_function(&fn_expr.function);
                }
                DefaultDecl::Class(class_expr) => self.visit_class(&class_expr.class),
                DefaultDecl::TsInterfaceDecl(_) => {}
            },
            ModuleDecl::ExportDefaultExpr(export) => self.visit_expr(&export.expr),
            ModuleDecl::ExportNamed(_) | ModuleDecl::ExportAll(_) => {}
            _ => {}
        }
    }

    /// First pass over a function (or global) body: declare hoisted names.
    /// Recurses into nested statements but never into nested functions.
    fn hoist_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Decl(Decl::Fn(fn_decl)) => {
                self.declare(
                    &fn_decl.ident.sym,
                    SymbolKind::Function,
                    DeclarationKind::Function,
                    fn_decl.ident.span,
                );
            }
            Stmt::Decl(Decl::Var(var_decl)) if var_decl.kind == VarDeclKind::Var => {
                for declarator in &var_decl.decls {
                    self.declare_pattern(
                        &declarator.name,
                        SymbolKind::Variable,
                        DeclarationKind::Var,
                    );
                }
            }
            Stmt::Block(block) => {
                for stmt in &block.stmts {
                    self.hoist_stmt(stmt);
                }
            }
            Stmt::If(if_stmt) => {
                self.hoist_stmt(&if_stmt.cons);
                if let Some(alt) = &if_stmt.alt {
                    self.hoist_stmt(alt);
                }
            }
            Stmt::While(s) => self.hoist_stmt(&s.body),
            Stmt::DoWhile(s) => self.hoist_stmt(&s.body),
            Stmt::For(s) => {
                if let Some(VarDeclOrExpr::VarDecl(var_decl)) = &s.init {
                    if var_decl.kind == VarDeclKind::Var {
                        for declarator in &var_decl.decls {
                            self.declare_pattern(
                                &declarator.name,
                                SymbolKind::Variable,
                                DeclarationKind::Var,
                            );
                        }
                    }
                }
                self.hoist_stmt(&s.body);
            }
            Stmt::ForIn(s) => {
                self.hoist_for_head(&s.left);
                self.hoist_stmt(&s.body);
            }
            Stmt::ForOf(s) => {
                self.hoist_for_head(&s.left);
                self.hoist_stmt(&s.body);
            }
            Stmt::Switch(s) => {
                for case in &s.cases {
                    for stmt in &case.cons {
                        self.hoist_stmt(stmt);
                    }
                }
            }
            Stmt::Try(s) => {
                for stmt in &s.block.stmts {
                    self.hoist_stmt(stmt);
                }
                if let Some(handler) = &s.handler {
                    for stmt in &handler.body.stmts {
                        self.hoist_stmt(stmt);
                    }
                }
                if let Some(finalizer) = &s.finalizer {
                    for stmt in &finalizer.stmts {
                        self.hoist_stmt(stmt);
                    }
                }
            }
            Stmt::Labeled(s) => self.hoist_stmt(&s.body),
            Stmt::With(s) => self.hoist_stmt(&s.body),
            _ => {}
        }
    }

    fn hoist_for_head(&mut self, head: &ForHead) {
        if let ForHead::VarDecl(var_decl) = head {
            if var_decl.kind == VarDeclKind::Var {
                for declarator in &var_decl.decls {
                    self.declare_pattern(
                        &declarator.name,
                        SymbolKind::Variable,
                        DeclarationKind::Var,
                    );
                }
            }
        }
    }

    fn visit_stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Decl(decl) => self.visit_decl(decl),
            Stmt::Block(block) => {
                self.in_scope(ScopeKind::Block, block.span, |builder| {
                    for stmt in &block.stmts {
                        builder.visit_stmt(stmt);
                    }
                });
            }
            Stmt::If(if_stmt) => {
                self.visit_expr(&if_stmt.test);
                self.visit_stmt(&if_stmt.cons);
                if let Some(alt) = &if_stmt.alt {
                    self.visit_stmt(alt);
                }
            }
            Stmt::While(s) => {
                self.visit_expr(&s.test);
                self.in_scope(ScopeKind::While, s.span, |builder| {
                    builder.visit_stmt(&s.body);
                });
            }
            Stmt::DoWhile(s) => {
                self.in_scope(ScopeKind::While, s.span, |builder| {
                    builder.visit_stmt(&s.body);
                });
                self.visit_expr(&s.test);
            }
            Stmt::For(s) => {
                self.in_scope(ScopeKind::For, s.span, |builder| {
                    match &s.init {
                        Some(VarDeclOrExpr::VarDecl(var_decl)) => builder.visit_var_decl(var_decl),
                        Some(VarDeclOrExpr::Expr(expr)) => builder.visit_expr(expr),
                        None => {}
                    }
                    if let Some(test) = &s.test {
                        builder.visit_expr(test);
                    }
                    if let Some(update) = &s.update {
                        builder.visit_expr(update);
                    }
                    builder.visit_stmt(&s.body);
                });
            }
            Stmt::ForIn(s) => {
                self.in_scope(ScopeKind::For, s.span, |builder| {
                    builder.visit_for_head(&s.left);
                    builder.visit_expr(&s.right);
                    builder.visit_stmt(&s.body);
                });
            }
            Stmt::ForOf(s) => {
                self.in_scope(ScopeKind::For, s.span, |builder| {
                    builder.visit_for_head(&s.left);
                    builder.visit_expr(&s.right);
                    builder.visit_stmt(&s.body);
                });
            }
            Stmt::Switch(s) => {
                self.visit_expr(&s.discriminant);
                self.in_scope(ScopeKind::Switch, s.span, |builder| {
                    for case in &s.cases {
                        if let Some(test) = &case.test {
                            builder.visit_expr(test);
                        }
                        for stmt in &case.cons {
                            builder.visit_stmt(stmt);
                        }
                    }
                });
            }
            Stmt::Try(s) => {
                self.in_scope(ScopeKind::Block, s.block.span, |builder| {
                    for stmt in &s.block.stmts {
                        builder.visit_stmt(stmt);
                    }
                });
                if let Some(handler) = &s.handler {
                    self.in_scope(ScopeKind::Catch, handler.span, |builder| {
                        if let Some(param) = &handler.param {
                            builder.declare_pattern(
                                param,
                                SymbolKind::Variable,
                                DeclarationKind::CatchParameter,
                            );
                        }
                        for stmt in &handler.body.stmts {
                            builder.visit_stmt(stmt);
                        }
                    });
                }
                if let Some(finalizer) = &s.finalizer {
                    self.in_scope(ScopeKind::Block, finalizer.span, |builder| {
                        for stmt in &finalizer.stmts {
                            builder.visit_stmt(stmt);
                        }
                    });
                }
            }
            Stmt::Labeled(s) => self.visit_stmt(&s.body),
            Stmt::With(s) => {
                self.visit_expr(&s.obj);
                self.visit_stmt(&s.body);
            }
            Stmt::Return(s) => {
                if let Some(arg) = &s.arg {
                    self.visit_expr(arg);
                }
            }
            Stmt::Throw(s) => self.visit_expr(&s.arg),
            Stmt::Expr(s) => self.visit_expr(&s.expr),
            Stmt::Empty(_) | Stmt::Debugger(_) | Stmt::Break(_) | Stmt::Continue(_) => {}
        }
    }

    fn visit_decl(&mut self, decl: &Decl) {
        match decl {
            Decl::Var(var_decl) => self.visit_var_decl(var_decl),
            Decl::Fn(fn_decl) => {
                // Hoisting already declared the name at function scope.
                self.resolve_reference(&fn_decl.ident.sym, fn_decl.ident.span, UsageKind::DeclarationWrite);
                self.visit_function(&fn_decl.function);
            }
            Decl::Class(class_decl) => {
                self.declare(
                    &class_decl.ident.sym,
                    SymbolKind::Class,
                    DeclarationKind::Class,
                    class_decl.ident.span,
                );
                self.visit_class(&class_decl.class);
            }
            _ => {}
        }
    }

    fn visit_var_decl(&mut self, var_decl: &VarDecl) {
        let (kind, declaration_kind) = match var_decl.kind {
            VarDeclKind::Var => (SymbolKind::Variable, DeclarationKind::Var),
            VarDeclKind::Let => (SymbolKind::Variable, DeclarationKind::Let),
            VarDeclKind::Const => (SymbolKind::Constant, DeclarationKind::Const),
        };

        for declarator in &var_decl.decls {
            if var_decl.kind == VarDeclKind::Var {
                // Already hoisted; just record the write.
                self.record_pattern_writes(&declarator.name, declarator.init.is_some());
            } else {
                self.declare_pattern(&declarator.name, kind, declaration_kind);
                self.record_pattern_writes(&declarator.name, declarator.init.is_some());
            }
            if let Some(init) = &declarator.init {
                self.visit_expr(init);
            }
        }
    }

    fn visit_for_head(&mut self, head: &ForHead) {
        match head {
            ForHead::VarDecl(var_decl) => {
                if var_decl.kind != VarDeclKind::Var {
                    let (kind, declaration_kind) = match var_decl.kind {
                        VarDeclKind::Let => (SymbolKind::Variable, DeclarationKind::Let),
                        _ => (SymbolKind::Constant, DeclarationKind::Const),
                    };
                    for declarator in &var_decl.decls {
                        self.declare_pattern(&declarator.name, kind, declaration_kind);
                    }
                }
                for declarator in &var_decl.decls {
                    self.record_pattern_writes(&declarator.name, true);
                }
            }
            ForHead::Pat(pat) => self.visit_assign_pattern(pat),
            ForHead::UsingDecl(using) => {
                for declarator in &using.decls {
                    self.declare_pattern(
                        &declarator.name,
                        SymbolKind::Constant,
                        DeclarationKind::Const,
                    );
                }
            }
        }
    }

    fn visit_class(&mut self, class: &Class) {
        if let Some(super_class) = &class.super_class {
            self.visit_expr(super_class);
        }
        self.in_scope(ScopeKind::Class, class.span, |builder| {
            for member in &class.body {
                match member {
                    ClassMember::Constructor(ctor) => {
                        builder.in_scope(ScopeKind::Function, ctor.span, |b| {
                            for param in &ctor.params {
                                if let swc_ecma_ast::ParamOrTsParamProp::Param(param) = param {
                                    b.declare_pattern(
                                        &param.pat,
                                        SymbolKind::Parameter,
                                        DeclarationKind::Parameter,
                                    );
                                }
                            }
                            if let Some(body) = &ctor.body {
                                for stmt in &body.stmts {
                                    b.hoist_stmt(stmt);
                                }
                                for stmt in &body.stmts {
                                    b.visit_stmt(stmt);
                                }
                            }
                        });
                    }
                    ClassMember::Method(method) => {
                        if let PropName::Computed(computed) = &method.key {
                            builder.visit_expr(&computed.expr);
                        }
                        builder.visit_function(&method.function);
                    }
                    ClassMember::PrivateMethod(method) => builder.visit_function(&method.function),
                    ClassMember::ClassProp(prop) => {
                        if let Some(value) = &prop.value {
                            builder.visit_expr(value);
                        }
                    }
                    ClassMember::PrivateProp(prop) => {
                        if let Some(value) = &prop.value {
                            builder.visit_expr(value);
                        }
                    }
                    ClassMember::StaticBlock(block) => {
                        for stmt in &block.body.stmts {
                            builder.visit_stmt(stmt);
                        }
                    }
                    _ => {}
                }
            }
        });
    }

    fn visit_function(&mut self, function: &Function) {
        let scope = self.enter_scope(ScopeKind::Function, function.span);
        self.function_scopes.insert(function.span, scope);

        self.declare("arguments", SymbolKind::Variable, DeclarationKind::Var, function.span);
        for param in &function.params {
            self.declare_pattern(&param.pat, SymbolKind::Parameter, DeclarationKind::Parameter);
        }

        if let Some(body) = &function.body {
            for stmt in &body.stmts {
                self.hoist_stmt(stmt);
            }
            for stmt in &body.stmts {
                self.visit_stmt(stmt);
            }
        }

        self.leave_scope(scope);
    }

    fn visit_arrow(&mut self, arrow: &ArrowExpr) {
        let scope = self.enter_scope(ScopeKind::ArrowFunction, arrow.span);
        self.function_scopes.insert(arrow.span, scope);

        for pat in &arrow.params {
            self.declare_pattern(pat, SymbolKind::Parameter, DeclarationKind::Parameter);
        }

        match arrow.body.as_ref() {
            BlockStmtOrExpr::BlockStmt(block) => {
                for stmt in &block.stmts {
                    self.hoist_stmt(stmt);
                }
                for stmt in &block.stmts {
                    self.visit_stmt(stmt);
                }
            }
            BlockStmtOrExpr::Expr(expr) => self.visit_expr(expr),
        }

        self.leave_scope(scope);
    }

    fn visit_expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Ident(ident) => {
                self.resolve_reference(&ident.sym, ident.span, UsageKind::Read);
            }
            Expr::Lit(_) | Expr::This(_) | Expr::MetaProp(_) | Expr::PrivateName(_)
            | Expr::Invalid(_) => {}
            Expr::Array(array) => {
                for element in array.elems.iter().flatten() {
                    self.visit_expr(&element.expr);
                }
            }
            Expr::Object(object) => {
                for prop in &object.props {
                    match prop {
                        PropOrSpread::Spread(spread) => self.visit_expr(&spread.expr),
                        PropOrSpread::Prop(prop) => match prop.as_ref() {
                            Prop::Shorthand(ident) => {
                                self.resolve_reference(&ident.sym, ident.span, UsageKind::Read);
                            }
                            Prop::KeyValue(kv) => {
                                if let PropName::Computed(computed) = &kv.key {
                                    self.visit_expr(&computed.expr);
                                }
                                self.visit_expr(&kv.value);
                            }
                            Prop::Assign(assign) => self.visit_expr(&assign.value),
                            Prop::Getter(getter) => {
                                if let Some(body) = &getter.body {
                                    for stmt in &body.stmts {
                                        self.visit_stmt(stmt);
                                    }
                                }
                            }
                            Prop::Setter(setter) => {
                                if let Some(body) = &setter.body {
                                    for stmt in &body.stmts {
                                        self.visit_stmt(stmt);
                                    }
                                }
                            }
                            Prop::Method(method) => self.visit_function(&method.function),
                        },
                    }
                }
            }
            Expr::Fn(fn_expr) => self.visit_function(&fn_expr.function),
            Expr::Arrow(arrow) => self.visit_arrow(arrow),
            Expr::Class(class_expr) => self.visit_class(&class_expr.class),
            Expr::Unary(unary) => self.visit_expr(&unary.arg),
            Expr::Update(update) => {
                if let Expr::Ident(ident) = update.arg.as_ref() {
                    self.resolve_reference(&ident.sym, ident.span, UsageKind::ReadWrite);
                } else {
                    self.visit_expr(&update.arg);
                }
            }
            Expr::Bin(bin) => {
                self.visit_expr(&bin.left);
                self.visit_expr(&bin.right);
            }
            Expr::Assign(assign) => {
                match &assign.left {
                    AssignTarget::Simple(SimpleAssignTarget::Ident(binding)) => {
                        let kind = if assign.op == swc_ecma_ast::AssignOp::Assign {
                            UsageKind::Write
                        } else {
                            UsageKind::ReadWrite
                        };
                        self.resolve_reference(&binding.id.sym, binding.id.span, kind);
                    }
                    AssignTarget::Simple(SimpleAssignTarget::Member(member)) => {
                        self.visit_expr(&member.obj);
                        if let swc_ecma_ast::MemberProp::Computed(computed) = &member.prop {
                            self.visit_expr(&computed.expr);
                        }
                    }
                    AssignTarget::Simple(_) => {}
                    AssignTarget::Pat(pat) => match pat {
                        AssignTargetPat::Array(array) => {
                            for element in array.elems.iter().flatten() {
                                self.visit_assign_pattern(element);
                            }
                        }
                        AssignTargetPat::Object(object) => {
                            for prop in &object.props {
                                self.visit_object_pat_prop(prop);
                            }
                        }
                        AssignTargetPat::Invalid(_) => {}
                    },
                }
                self.visit_expr(&assign.right);
            }
            Expr::Member(member) => {
                self.visit_expr(&member.obj);
                if let swc_ecma_ast::MemberProp::Computed(computed) = &member.prop {
                    self.visit_expr(&computed.expr);
                }
            }
            Expr::SuperProp(super_prop) => {
                if let swc_ecma_ast::SuperProp::Computed(computed) = &super_prop.prop {
                    self.visit_expr(&computed.expr);
                }
            }
            Expr::Cond(cond) => {
                self.visit_expr(&cond.test);
                self.visit_expr(&cond.cons);
                self.visit_expr(&cond.alt);
            }
            Expr::Call(call) => {
                if let Callee::Expr(callee) = &call.callee {
                    self.visit_expr(callee);
                }
                for arg in &call.args {
                    self.visit_expr(&arg.expr);
                }
            }
            Expr::New(new) => {
                self.visit_expr(&new.callee);
                if let Some(args) = &new.args {
                    for arg in args {
                        self.visit_expr(&arg.expr);
                    }
                }
            }
            Expr::Seq(seq) => {
                for expr in &seq.exprs {
                    self.visit_expr(expr);
                }
            }
            Expr::Tpl(tpl) => {
                for expr in &tpl.exprs {
                    self.visit_expr(expr);
                }
            }
            Expr::TaggedTpl(tagged) => {
                self.visit_expr(&tagged.tag);
                for expr in &tagged.tpl.exprs {
                    self.visit_expr(expr);
                }
            }
            Expr::Yield(yield_expr) => {
                if let Some(arg) = &yield_expr.arg {
                    self.visit_expr(arg);
                }
            }
            Expr::Await(await_expr) => self.visit_expr(&await_expr.arg),
            Expr::Paren(paren) => self.visit_expr(&paren.expr),
            Expr::OptChain(opt_chain) => match opt_chain.base.as_ref() {
                OptChainBase::Member(member) => {
                    self.visit_expr(&member.obj);
                    if let swc_ecma_ast::MemberProp::Computed(computed) = &member.prop {
                        self.visit_expr(&computed.expr);
                    }
                }
                OptChainBase::Call(call) => {
                    self.visit_expr(&call.callee);
                    for arg in &call.args {
                        self.visit_expr(&arg.expr);
                    }
                }
            },
            _ => {}
        }
    }

    /// Idents inside a destructuring assignment target are writes.
    fn visit_assign_pattern(&mut self, pat: &Pat) {
        match pat {
            Pat::Ident(binding) => {
                self.resolve_reference(&binding.id.sym, binding.id.span, UsageKind::Write);
            }
            Pat::Array(array) => {
                for element in array.elems.iter().flatten() {
                    self.visit_assign_pattern(element);
                }
            }
            Pat::Object(object) => {
                for prop in &object.props {
                    self.visit_object_pat_prop(prop);
                }
            }
            Pat::Assign(assign) => {
                self.visit_assign_pattern(&assign.left);
                self.visit_expr(&assign.right);
            }
            Pat::Rest(rest) => self.visit_assign_pattern(&rest.arg),
            Pat::Expr(expr) => self.visit_expr(expr),
            Pat::Invalid(_) => {}
        }
    }

    fn visit_object_pat_prop(&mut self, prop: &ObjectPatProp) {
        match prop {
            ObjectPatProp::KeyValue(kv) => {
                if let PropName::Computed(computed) = &kv.key {
                    self.visit_expr(&computed.expr);
                }
                self.visit_assign_pattern(&kv.value);
            }
            ObjectPatProp::Assign(assign) => {
                self.resolve_reference(&assign.key.id.sym, assign.key.id.span, UsageKind::Write);
                if let Some(value) = &assign.value {
                    self.visit_expr(value);
                }
            }
            ObjectPatProp::Rest(rest) => self.visit_assign_pattern(&rest.arg),
        }
    }

    /// Declares every binding identifier of a declaration pattern.
    fn declare_pattern(&mut self, pat: &Pat, kind: SymbolKind, declaration_kind: DeclarationKind) {
        match pat {
            Pat::Ident(binding) => {
                self.declare(&binding.id.sym, kind, declaration_kind, binding.id.span);
            }
            Pat::Array(array) => {
                for element in array.elems.iter().flatten() {
                    self.declare_pattern(element, kind, declaration_kind);
                }
            }
            Pat::Object(object) => {
                for prop in &object.props {
                    match prop {
                        ObjectPatProp::KeyValue(kv) => {
                            self.declare_pattern(&kv.value, kind, declaration_kind);
                        }
                        ObjectPatProp::Assign(assign) => {
                            self.declare(&assign.key.id.sym, kind, declaration_kind, assign.key.id.span);
                            if let Some(value) = &assign.value {
                                self.visit_expr(value);
                            }
                        }
                        ObjectPatProp::Rest(rest) => {
                            self.declare_pattern(&rest.arg, kind, declaration_kind);
                        }
                    }
                }
            }
            Pat::Assign(assign) => {
                self.declare_pattern(&assign.left, kind, declaration_kind);
                self.visit_expr(&assign.right);
            }
            Pat::Rest(rest) => self.declare_pattern(&rest.arg, kind, declaration_kind),
            Pat::Expr(_) | Pat::Invalid(_) => {}
        }
    }

    /// Records declaration-write usages for the bindings of a declarator
    /// pattern and resolves each identifier occurrence.
    fn record_pattern_writes(&mut self, pat: &Pat, initialized: bool) {
        match pat {
            Pat::Ident(binding) => {
                if initialized {
                    self.resolve_reference(
                        &binding.id.sym,
                        binding.id.span,
                        UsageKind::DeclarationWrite,
                    );
                } else if let Some(id) =
                    self.symbol_table
                        .lookup(&binding.id.sym, self.current(), &self.scope_tree)
                {
                    self.resolutions.insert(binding.id.span, id);
                }
            }
            Pat::Array(array) => {
                for element in array.elems.iter().flatten() {
                    self.record_pattern_writes(element, initialized);
                }
            }
            Pat::Object(object) => {
                for prop in &object.props {
                    match prop {
                        ObjectPatProp::KeyValue(kv) => {
                            self.record_pattern_writes(&kv.value, initialized)
                        }
                        ObjectPatProp::Assign(assign) => {
                            if initialized {
                                self.resolve_reference(
                                    &assign.key.id.sym,
                                    assign.key.id.span,
                                    UsageKind::DeclarationWrite,
                                );
                            }
                        }
                        ObjectPatProp::Rest(rest) => {
                            self.record_pattern_writes(&rest.arg, initialized)
                        }
                    }
                }
            }
            Pat::Assign(assign) => self.record_pattern_writes(&assign.left, initialized),
            Pat::Rest(rest) => self.record_pattern_writes(&rest.arg, initialized),
            Pat::Expr(_) | Pat::Invalid(_) => {}
        }
    }

    fn declare(
        &mut self,
        name: &str,
        kind: SymbolKind,
        declaration_kind: DeclarationKind,
        span: Span,
    ) -> SymbolId {
        let scope = match declaration_kind {
            // `var` and hoisted functions bind at the closure boundary.
            DeclarationKind::Var | DeclarationKind::Function => {
                self.scope_tree.function_root(self.current())
            }
            _ => self.current(),
        };
        let id = self
            .symbol_table
            .declare(name, kind, declaration_kind, scope, span);
        self.resolutions.insert(span, id);
        id
    }

    fn resolve_reference(&mut self, name: &str, span: Span, usage: UsageKind) {
        match self.symbol_table.lookup(name, self.current(), &self.scope_tree) {
            Some(id) => {
                self.resolutions.insert(span, id);
                self.symbol_table.add_usage(id, span, usage);

                let declared_in = self.symbol_table.get(id).scope;
                let declaration_root = self.scope_tree.function_root(declared_in);
                let reference_root = self.scope_tree.function_root(self.current());
                if declaration_root != reference_root {
                    self.symbol_table.mark_captured(id);
                }
            }
            None => self.unresolved.push(UnresolvedReference {
                name: name.to_string(),
                span,
            }),
        }
    }

    fn in_scope(&mut self, kind: ScopeKind, span: Span, f: impl FnOnce(&mut Self)) {
        let scope = self.enter_scope(kind, span);
        f(self);
        self.leave_scope(scope);
    }

    fn enter_scope(&mut self, kind: ScopeKind, span: Span) -> ScopeId {
        let scope = self
            .scope_tree
            .create_scope(kind, self.current_scope, span);
        self.current_scope = Some(scope);
        scope
    }

    fn leave_scope(&mut self, scope: ScopeId) {
        debug_assert_eq!(self.current_scope, Some(scope));
        self.current_scope = self.scope_tree.get(scope).parent;
    }
}
