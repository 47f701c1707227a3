//! Control flow graph with linearized evaluation elements
//!
//! Each basic block carries the expression elements control passes through,
//! in evaluation (post) order, so that symbolic execution can replay them
//! against an expression stack. Condition blocks additionally carry
//! branching metadata with explicit true/false successors. `&&` and `||`
//! in condition position decompose into nested condition blocks, which is
//! what makes `if (x && x.prop)` path-sensitive.

use id_arena::{Arena, Id};
use swc_common::{Span, Spanned};
use swc_ecma_ast::{
    ArrowExpr, AssignTarget, BlockStmtOrExpr, BinaryOp, Callee, Expr, ForHead, Function, Lit,
    MemberProp, Module, ModuleItem, Pat, Prop, PropName, PropOrSpread, SimpleAssignTarget, Stmt,
    SuperProp, VarDeclOrExpr, VarDeclarator,
};

pub type BasicBlockId<'a> = Id<BasicBlock<'a>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BasicBlockKind {
    Entry,
    Exit,
    Normal,
    Condition,
    LoopHeader,
}

/// One step of evaluation inside a basic block.
#[derive(Debug, Clone, Copy)]
pub enum Element<'a> {
    /// An expression element in post order: its operand elements precede
    /// it, so executing it pops their values and pushes its own.
    Expr(&'a Expr),
    /// A `var`/`let`/`const` declarator; pops the initializer value when
    /// one exists.
    Declarator(&'a VarDeclarator),
    /// Rebinds the pattern's variables to fresh unconstrained values
    /// (catch parameters, for-in/for-of loop variables).
    Bind(&'a Pat),
    /// End of a statement: the expression stack is discarded.
    StatementEnd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchingKind {
    If,
    While,
    DoWhile,
    For,
    ForIn,
    ForOf,
}

impl BranchingKind {
    pub fn is_loop(self) -> bool {
        matches!(
            self,
            BranchingKind::While | BranchingKind::DoWhile | BranchingKind::For
        )
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Branching<'a> {
    pub kind: BranchingKind,
    pub true_successor: BasicBlockId<'a>,
    pub false_successor: BasicBlockId<'a>,
    /// The tested (sub)expression; `None` for `for(;;)`-style headers and
    /// for-in/for-of, where the "condition" is the iterated object.
    pub condition: Option<&'a Expr>,
    /// True when the branching construct is a statement, so the stack is
    /// discarded once the branch is decided.
    pub is_statement: bool,
}

#[derive(Debug)]
pub struct BasicBlock<'a> {
    pub id: BasicBlockId<'a>,
    pub kind: BasicBlockKind,
    pub elements: Vec<Element<'a>>,
    pub successors: Vec<BasicBlockId<'a>>,
    pub predecessors: Vec<BasicBlockId<'a>>,
    pub branching: Option<Branching<'a>>,
    pub span: Option<Span>,
}

#[derive(Debug)]
pub struct ControlFlowGraph<'a> {
    blocks: Arena<BasicBlock<'a>>,
    entry: BasicBlockId<'a>,
    exit: BasicBlockId<'a>,
}

impl<'a> ControlFlowGraph<'a> {
    pub fn build_module(module: &'a Module) -> Self {
        let mut builder = CfgBuilder::new();
        let mut current = builder.start();
        for item in &module.body {
            if let ModuleItem::Stmt(stmt) = item {
                current = builder.build_stmt(stmt, current);
            }
        }
        builder.finish(current)
    }

    pub fn build_function(function: &'a Function) -> Self {
        let mut builder = CfgBuilder::new();
        let mut current = builder.start();
        if let Some(body) = &function.body {
            for stmt in &body.stmts {
                current = builder.build_stmt(stmt, current);
            }
        }
        builder.finish(current)
    }

    pub fn build_arrow(arrow: &'a ArrowExpr) -> Self {
        let mut builder = CfgBuilder::new();
        let mut current = builder.start();
        match arrow.body.as_ref() {
            BlockStmtOrExpr::BlockStmt(block) => {
                for stmt in &block.stmts {
                    current = builder.build_stmt(stmt, current);
                }
            }
            BlockStmtOrExpr::Expr(expr) => {
                builder.add_expr_elements(current, expr);
                builder.blocks[current].elements.push(Element::StatementEnd);
            }
        }
        builder.finish(current)
    }

    pub fn entry(&self) -> BasicBlockId<'a> {
        self.entry
    }

    pub fn exit(&self) -> BasicBlockId<'a> {
        self.exit
    }

    pub fn get(&self, id: BasicBlockId<'a>) -> &BasicBlock<'a> {
        &self.blocks[id]
    }

    pub fn blocks(&self) -> impl Iterator<Item = &BasicBlock<'a>> {
        self.blocks.iter().map(|(_, block)| block)
    }

    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    pub fn successors(&self, id: BasicBlockId<'a>) -> impl Iterator<Item = &BasicBlock<'a>> {
        self.blocks[id]
            .successors
            .iter()
            .map(|&succ| &self.blocks[succ])
    }

    pub fn predecessors(&self, id: BasicBlockId<'a>) -> impl Iterator<Item = &BasicBlock<'a>> {
        self.blocks[id]
            .predecessors
            .iter()
            .map(|&pred| &self.blocks[pred])
    }

    pub fn has_back_edge(&self, from: BasicBlockId<'a>, to: BasicBlockId<'a>) -> bool {
        self.blocks[to].kind == BasicBlockKind::LoopHeader
            && self.blocks[from].successors.contains(&to)
    }
}

struct LoopContext<'a> {
    break_target: BasicBlockId<'a>,
    continue_target: Option<BasicBlockId<'a>>,
}

struct CfgBuilder<'a> {
    blocks: Arena<BasicBlock<'a>>,
    entry: Option<BasicBlockId<'a>>,
    exit: Option<BasicBlockId<'a>>,
    loop_stack: Vec<LoopContext<'a>>,
}

impl<'a> CfgBuilder<'a> {
    fn new() -> Self {
        Self {
            blocks: Arena::new(),
            entry: None,
            exit: None,
            loop_stack: Vec::new(),
        }
    }

    /// Creates entry and exit blocks and the first normal block.
    fn start(&mut self) -> BasicBlockId<'a> {
        let entry = self.create_block(BasicBlockKind::Entry, None);
        let exit = self.create_block(BasicBlockKind::Exit, None);
        self.entry = Some(entry);
        self.exit = Some(exit);

        let first = self.create_block(BasicBlockKind::Normal, None);
        self.add_edge(entry, first);
        first
    }

    fn finish(mut self, current: BasicBlockId<'a>) -> ControlFlowGraph<'a> {
        let exit = self.exit.expect("start() was called");
        self.add_edge(current, exit);
        ControlFlowGraph {
            blocks: self.blocks,
            entry: self.entry.expect("start() was called"),
            exit,
        }
    }

    fn create_block(&mut self, kind: BasicBlockKind, span: Option<Span>) -> BasicBlockId<'a> {
        self.blocks.alloc_with_id(|id| BasicBlock {
            id,
            kind,
            elements: Vec::new(),
            successors: Vec::new(),
            predecessors: Vec::new(),
            branching: None,
            span,
        })
    }

    fn add_edge(&mut self, from: BasicBlockId<'a>, to: BasicBlockId<'a>) {
        if !self.blocks[from].successors.contains(&to) {
            self.blocks[from].successors.push(to);
        }
        if !self.blocks[to].predecessors.contains(&from) {
            self.blocks[to].predecessors.push(from);
        }
    }

    fn exit_block(&self) -> BasicBlockId<'a> {
        self.exit.expect("start() was called")
    }

    fn build_stmt(&mut self, stmt: &'a Stmt, current: BasicBlockId<'a>) -> BasicBlockId<'a> {
        match stmt {
            Stmt::Block(block) => {
                let mut curr = current;
                for stmt in &block.stmts {
                    curr = self.build_stmt(stmt, curr);
                }
                curr
            }
            Stmt::Expr(expr_stmt) => {
                self.add_expr_elements(current, &expr_stmt.expr);
                self.blocks[current].elements.push(Element::StatementEnd);
                current
            }
            Stmt::Decl(decl) => {
                if let swc_ecma_ast::Decl::Var(var_decl) = decl {
                    for declarator in &var_decl.decls {
                        if let Some(init) = &declarator.init {
                            self.add_expr_elements(current, init);
                        }
                        self.blocks[current].elements.push(Element::Declarator(declarator));
                    }
                    self.blocks[current].elements.push(Element::StatementEnd);
                }
                // Function and class declarations are analyzed separately.
                current
            }
            Stmt::If(if_stmt) => self.build_if(if_stmt, current),
            Stmt::While(while_stmt) => self.build_while(while_stmt, current),
            Stmt::DoWhile(do_while) => self.build_do_while(do_while, current),
            Stmt::For(for_stmt) => self.build_for(for_stmt, current),
            Stmt::ForIn(for_in) => self.build_for_object(
                BranchingKind::ForIn,
                &for_in.left,
                &for_in.right,
                &for_in.body,
                for_in.span,
                current,
            ),
            Stmt::ForOf(for_of) => self.build_for_object(
                BranchingKind::ForOf,
                &for_of.left,
                &for_of.right,
                &for_of.body,
                for_of.span,
                current,
            ),
            Stmt::Switch(switch_stmt) => self.build_switch(switch_stmt, current),
            Stmt::Try(try_stmt) => self.build_try(try_stmt, current),
            Stmt::Return(return_stmt) => {
                if let Some(arg) = &return_stmt.arg {
                    self.add_expr_elements(current, arg);
                }
                self.blocks[current].elements.push(Element::StatementEnd);
                let exit = self.exit_block();
                self.add_edge(current, exit);
                self.create_block(BasicBlockKind::Normal, None)
            }
            Stmt::Throw(throw_stmt) => {
                self.add_expr_elements(current, &throw_stmt.arg);
                self.blocks[current].elements.push(Element::StatementEnd);
                let exit = self.exit_block();
                self.add_edge(current, exit);
                self.create_block(BasicBlockKind::Normal, None)
            }
            Stmt::Break(_) => {
                if let Some(context) = self.loop_stack.last() {
                    let target = context.break_target;
                    self.add_edge(current, target);
                }
                self.create_block(BasicBlockKind::Normal, None)
            }
            Stmt::Continue(_) => {
                let target = self
                    .loop_stack
                    .iter()
                    .rev()
                    .find_map(|context| context.continue_target);
                if let Some(target) = target {
                    self.add_edge(current, target);
                }
                self.create_block(BasicBlockKind::Normal, None)
            }
            Stmt::Labeled(labeled) => self.build_stmt(&labeled.body, current),
            Stmt::With(with_stmt) => {
                self.add_expr_elements(current, &with_stmt.obj);
                self.blocks[current].elements.push(Element::StatementEnd);
                self.build_stmt(&with_stmt.body, current)
            }
            Stmt::Empty(_) | Stmt::Debugger(_) => current,
        }
    }

    fn build_if(&mut self, if_stmt: &'a swc_ecma_ast::IfStmt, current: BasicBlockId<'a>) -> BasicBlockId<'a> {
        let then_block = self.create_block(BasicBlockKind::Normal, Some(if_stmt.cons.span()));
        let merge = self.create_block(BasicBlockKind::Normal, None);

        let false_target = match &if_stmt.alt {
            Some(alt) => self.create_block(BasicBlockKind::Normal, Some(alt.span())),
            None => merge,
        };

        self.build_condition(&if_stmt.test, current, then_block, false_target, BranchingKind::If);

        let then_end = self.build_stmt(&if_stmt.cons, then_block);
        self.add_edge(then_end, merge);

        if let Some(alt) = &if_stmt.alt {
            let else_end = self.build_stmt(alt, false_target);
            self.add_edge(else_end, merge);
        }

        merge
    }

    fn build_while(&mut self, while_stmt: &'a swc_ecma_ast::WhileStmt, current: BasicBlockId<'a>) -> BasicBlockId<'a> {
        let header = self.create_block(BasicBlockKind::LoopHeader, Some(while_stmt.span));
        self.add_edge(current, header);

        let condition = self.create_block(BasicBlockKind::Normal, Some(while_stmt.test.span()));
        self.add_edge(header, condition);

        let body = self.create_block(BasicBlockKind::Normal, Some(while_stmt.body.span()));
        let after = self.create_block(BasicBlockKind::Normal, None);

        self.build_condition(&while_stmt.test, condition, body, after, BranchingKind::While);

        self.loop_stack.push(LoopContext {
            break_target: after,
            continue_target: Some(header),
        });
        let body_end = self.build_stmt(&while_stmt.body, body);
        self.loop_stack.pop();

        self.add_edge(body_end, header);
        after
    }

    fn build_do_while(&mut self, do_while: &'a swc_ecma_ast::DoWhileStmt, current: BasicBlockId<'a>) -> BasicBlockId<'a> {
        let header = self.create_block(BasicBlockKind::LoopHeader, Some(do_while.span));
        self.add_edge(current, header);

        let body = self.create_block(BasicBlockKind::Normal, Some(do_while.body.span()));
        self.add_edge(header, body);

        let condition = self.create_block(BasicBlockKind::Normal, Some(do_while.test.span()));
        let after = self.create_block(BasicBlockKind::Normal, None);

        self.loop_stack.push(LoopContext {
            break_target: after,
            continue_target: Some(condition),
        });
        let body_end = self.build_stmt(&do_while.body, body);
        self.loop_stack.pop();
        self.add_edge(body_end, condition);

        self.build_condition(&do_while.test, condition, header, after, BranchingKind::DoWhile);
        after
    }

    fn build_for(&mut self, for_stmt: &'a swc_ecma_ast::ForStmt, current: BasicBlockId<'a>) -> BasicBlockId<'a> {
        let init = match &for_stmt.init {
            Some(init) => {
                let init_block = self.create_block(BasicBlockKind::Normal, None);
                self.add_edge(current, init_block);
                match init {
                    VarDeclOrExpr::VarDecl(var_decl) => {
                        for declarator in &var_decl.decls {
                            if let Some(init_expr) = &declarator.init {
                                self.add_expr_elements(init_block, init_expr);
                            }
                            self.blocks[init_block]
                                .elements
                                .push(Element::Declarator(declarator));
                        }
                    }
                    VarDeclOrExpr::Expr(expr) => self.add_expr_elements(init_block, expr),
                }
                self.blocks[init_block].elements.push(Element::StatementEnd);
                init_block
            }
            None => current,
        };

        let header = self.create_block(BasicBlockKind::LoopHeader, Some(for_stmt.span));
        self.add_edge(init, header);

        let body = self.create_block(BasicBlockKind::Normal, Some(for_stmt.body.span()));
        let after = self.create_block(BasicBlockKind::Normal, None);

        match &for_stmt.test {
            Some(test) => {
                let condition = self.create_block(BasicBlockKind::Normal, Some(test.span()));
                self.add_edge(header, condition);
                self.build_condition(test, condition, body, after, BranchingKind::For);
            }
            None => {
                self.add_edge(header, body);
            }
        }

        let update = match &for_stmt.update {
            Some(update) => {
                let update_block = self.create_block(BasicBlockKind::Normal, None);
                self.add_expr_elements(update_block, update);
                self.blocks[update_block].elements.push(Element::StatementEnd);
                self.add_edge(update_block, header);
                update_block
            }
            None => header,
        };

        self.loop_stack.push(LoopContext {
            break_target: after,
            continue_target: Some(update),
        });
        let body_end = self.build_stmt(&for_stmt.body, body);
        self.loop_stack.pop();
        self.add_edge(body_end, update);

        after
    }

    fn build_for_object(
        &mut self,
        kind: BranchingKind,
        left: &'a ForHead,
        right: &'a Expr,
        body_stmt: &'a Stmt,
        span: Span,
        current: BasicBlockId<'a>,
    ) -> BasicBlockId<'a> {
        let header = self.create_block(BasicBlockKind::LoopHeader, Some(span));
        self.add_edge(current, header);

        let condition = self.create_block(BasicBlockKind::Condition, Some(right.span()));
        self.add_edge(header, condition);
        self.add_expr_elements(condition, right);

        let body = self.create_block(BasicBlockKind::Normal, Some(body_stmt.span()));
        let after = self.create_block(BasicBlockKind::Normal, None);
        self.add_edge(condition, body);
        self.add_edge(condition, after);
        self.blocks[condition].branching = Some(Branching {
            kind,
            true_successor: body,
            false_successor: after,
            condition: None,
            is_statement: true,
        });

        // Each iteration rebinds the loop variable to an unknown value.
        let loop_pattern = match left {
            ForHead::VarDecl(var_decl) => var_decl.decls.first().map(|d| &d.name),
            ForHead::UsingDecl(using) => using.decls.first().map(|d| &d.name),
            ForHead::Pat(pat) => Some(pat.as_ref()),
        };
        if let Some(pattern) = loop_pattern {
            self.blocks[body].elements.push(Element::Bind(pattern));
        }

        self.loop_stack.push(LoopContext {
            break_target: after,
            continue_target: Some(header),
        });
        let body_end = self.build_stmt(body_stmt, body);
        self.loop_stack.pop();
        self.add_edge(body_end, header);

        after
    }

    fn build_switch(&mut self, switch_stmt: &'a swc_ecma_ast::SwitchStmt, current: BasicBlockId<'a>) -> BasicBlockId<'a> {
        self.add_expr_elements(current, &switch_stmt.discriminant);
        self.blocks[current].elements.push(Element::StatementEnd);

        let merge = self.create_block(BasicBlockKind::Normal, None);
        let mut last_case_end: Option<BasicBlockId<'a>> = None;

        self.loop_stack.push(LoopContext {
            break_target: merge,
            continue_target: None,
        });

        for case in &switch_stmt.cases {
            let case_start = self.create_block(BasicBlockKind::Normal, Some(case.span));
            self.add_edge(current, case_start);

            if let Some(test) = &case.test {
                self.add_expr_elements(case_start, test);
                self.blocks[case_start].elements.push(Element::StatementEnd);
            }

            if let Some(previous) = last_case_end {
                self.add_edge(previous, case_start);
            }

            let mut case_current = case_start;
            for stmt in &case.cons {
                case_current = self.build_stmt(stmt, case_current);
            }
            last_case_end = Some(case_current);
        }

        self.loop_stack.pop();

        match last_case_end {
            Some(last) => self.add_edge(last, merge),
            None => self.add_edge(current, merge),
        }
        if !switch_stmt.cases.iter().any(|c| c.test.is_none()) {
            // Without a default case the switch may fall through entirely.
            self.add_edge(current, merge);
        }

        merge
    }

    fn build_try(&mut self, try_stmt: &'a swc_ecma_ast::TryStmt, current: BasicBlockId<'a>) -> BasicBlockId<'a> {
        let try_start = self.create_block(BasicBlockKind::Normal, Some(try_stmt.block.span));
        self.add_edge(current, try_start);

        let mut try_current = try_start;
        for stmt in &try_stmt.block.stmts {
            try_current = self.build_stmt(stmt, try_current);
        }

        let merge = self.create_block(BasicBlockKind::Normal, None);

        let handler_end = try_stmt.handler.as_ref().map(|handler| {
            let catch_start = self.create_block(BasicBlockKind::Normal, Some(handler.span));
            // Any point of the try block may throw; approximate with an
            // edge from its start.
            self.add_edge(try_start, catch_start);
            if let Some(param) = &handler.param {
                self.blocks[catch_start].elements.push(Element::Bind(param));
            }
            let mut catch_current = catch_start;
            for stmt in &handler.body.stmts {
                catch_current = self.build_stmt(stmt, catch_current);
            }
            catch_current
        });

        match &try_stmt.finalizer {
            Some(finalizer) => {
                let finally_start = self.create_block(BasicBlockKind::Normal, Some(finalizer.span));
                self.add_edge(try_current, finally_start);
                if let Some(handler_end) = handler_end {
                    self.add_edge(handler_end, finally_start);
                }
                let mut finally_current = finally_start;
                for stmt in &finalizer.stmts {
                    finally_current = self.build_stmt(stmt, finally_current);
                }
                self.add_edge(finally_current, merge);
            }
            None => {
                self.add_edge(try_current, merge);
                if let Some(handler_end) = handler_end {
                    self.add_edge(handler_end, merge);
                }
            }
        }

        merge
    }

    /// Builds the condition blocks for `expr`, branching to `true_target`
    /// or `false_target`. Short-circuit operators split into nested
    /// condition blocks so each operand is tested on its own path.
    fn build_condition(
        &mut self,
        expr: &'a Expr,
        current: BasicBlockId<'a>,
        true_target: BasicBlockId<'a>,
        false_target: BasicBlockId<'a>,
        kind: BranchingKind,
    ) {
        match expr {
            Expr::Paren(paren) => {
                self.build_condition(&paren.expr, current, true_target, false_target, kind)
            }
            Expr::Bin(bin) if bin.op == BinaryOp::LogicalAnd => {
                let right = self.create_block(BasicBlockKind::Normal, Some(bin.right.span()));
                self.build_condition(&bin.left, current, right, false_target, kind);
                self.build_condition(&bin.right, right, true_target, false_target, kind);
            }
            Expr::Bin(bin) if bin.op == BinaryOp::LogicalOr => {
                let right = self.create_block(BasicBlockKind::Normal, Some(bin.right.span()));
                self.build_condition(&bin.left, current, true_target, right, kind);
                self.build_condition(&bin.right, right, true_target, false_target, kind);
            }
            _ => {
                self.add_expr_elements(current, expr);
                self.blocks[current].kind = BasicBlockKind::Condition;
                self.blocks[current].branching = Some(Branching {
                    kind,
                    true_successor: true_target,
                    false_successor: false_target,
                    condition: Some(expr),
                    is_statement: true,
                });
                self.add_edge(current, true_target);
                self.add_edge(current, false_target);
            }
        }
    }

    /// Appends the evaluation elements of `expr` in post order: operands
    /// first, the expression itself last. Opaque kinds (functions,
    /// optional chains, `this`, JSX) become a single element with no
    /// operands.
    fn add_expr_elements(&mut self, block: BasicBlockId<'a>, expr: &'a Expr) {
        match expr {
            Expr::Paren(paren) => {
                self.add_expr_elements(block, &paren.expr);
                return;
            }
            Expr::Tpl(tpl) => {
                for sub in &tpl.exprs {
                    self.add_expr_elements(block, sub);
                }
            }
            Expr::TaggedTpl(tagged) => {
                self.add_expr_elements(block, &tagged.tag);
                for sub in &tagged.tpl.exprs {
                    self.add_expr_elements(block, sub);
                }
            }
            Expr::Unary(unary) => {
                self.add_expr_elements(block, &unary.arg);
            }
            Expr::Bin(bin) => {
                self.add_expr_elements(block, &bin.left);
                self.add_expr_elements(block, &bin.right);
            }
            Expr::Cond(cond) => {
                self.add_expr_elements(block, &cond.test);
                self.add_expr_elements(block, &cond.cons);
                self.add_expr_elements(block, &cond.alt);
            }
            Expr::Assign(assign) => {
                match &assign.left {
                    AssignTarget::Simple(SimpleAssignTarget::Member(member)) => {
                        self.add_expr_elements(block, &member.obj);
                        if let MemberProp::Computed(computed) = &member.prop {
                            self.add_expr_elements(block, &computed.expr);
                        }
                    }
                    _ => {}
                }
                self.add_expr_elements(block, &assign.right);
            }
            Expr::Member(member) => {
                self.add_expr_elements(block, &member.obj);
                if let MemberProp::Computed(computed) = &member.prop {
                    self.add_expr_elements(block, &computed.expr);
                }
            }
            Expr::SuperProp(super_prop) => {
                if let SuperProp::Computed(computed) = &super_prop.prop {
                    self.add_expr_elements(block, &computed.expr);
                }
            }
            Expr::Call(call) => {
                if let Callee::Expr(callee) = &call.callee {
                    self.add_expr_elements(block, callee);
                }
                for arg in &call.args {
                    self.add_expr_elements(block, &arg.expr);
                }
            }
            Expr::New(new) => {
                self.add_expr_elements(block, &new.callee);
                if let Some(args) = &new.args {
                    for arg in args {
                        self.add_expr_elements(block, &arg.expr);
                    }
                }
            }
            Expr::Seq(seq) => {
                for sub in &seq.exprs {
                    self.add_expr_elements(block, sub);
                }
            }
            Expr::Array(array) => {
                for element in array.elems.iter().flatten() {
                    self.add_expr_elements(block, &element.expr);
                }
            }
            Expr::Object(object) => {
                for prop in &object.props {
                    match prop {
                        PropOrSpread::Spread(spread) => {
                            self.add_expr_elements(block, &spread.expr)
                        }
                        PropOrSpread::Prop(prop) => match prop.as_ref() {
                            Prop::KeyValue(kv) => {
                                if let PropName::Computed(computed) = &kv.key {
                                    self.add_expr_elements(block, &computed.expr);
                                }
                                self.add_expr_elements(block, &kv.value);
                            }
                            Prop::Assign(assign) => {
                                self.add_expr_elements(block, &assign.value)
                            }
                            Prop::Shorthand(_)
                            | Prop::Getter(_)
                            | Prop::Setter(_)
                            | Prop::Method(_) => {}
                        },
                    }
                }
            }
            Expr::Await(await_expr) => {
                self.add_expr_elements(block, &await_expr.arg);
            }
            Expr::Yield(yield_expr) => {
                if let Some(arg) = &yield_expr.arg {
                    self.add_expr_elements(block, arg);
                }
            }
            // Leaves: identifiers, literals, functions, classes, optional
            // chains, this, and anything unmodeled.
            _ => {}
        }
        self.blocks[block].elements.push(Element::Expr(expr));
    }
}

/// True when the expression is a boolean literal, whose branch is decided
/// without symbolic evaluation.
pub fn boolean_literal(expr: &Expr) -> Option<bool> {
    match expr {
        Expr::Lit(Lit::Bool(b)) => Some(b.value),
        Expr::Paren(paren) => boolean_literal(&paren.expr),
        _ => None,
    }
}
