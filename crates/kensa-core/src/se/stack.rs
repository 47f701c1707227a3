//! Expression stack mirroring the order of expression evaluation
//!
//! Each program state carries one immutable stack of symbolic values.
//! Executing an expression kind pops the values its operands produced and
//! pushes one value for the result. Only pure-stack kinds are handled
//! here; identifier loads, member accesses, calls and assignments need the
//! variable frame or the built-in registry and are resolved by the
//! execution driver.

use swc_ecma_ast::{BinaryOp, Expr, ObjectLit, Prop, PropName, PropOrSpread, UnaryOp};

use crate::se::constraint::Constraint;
use crate::se::state::ProgramState;
use crate::se::value::SymbolicValue;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExpressionStack {
    stack: Vec<SymbolicValue>,
}

impl ExpressionStack {
    pub fn empty_stack() -> ExpressionStack {
        ExpressionStack::default()
    }

    pub fn push(&self, value: SymbolicValue) -> ExpressionStack {
        let mut stack = self.stack.clone();
        stack.push(value);
        ExpressionStack { stack }
    }

    /// Pops the top value. An empty stack yields the unknown value so that
    /// unmodeled constructs degrade instead of failing.
    pub fn pop(&self) -> (ExpressionStack, SymbolicValue) {
        let mut stack = self.stack.clone();
        let value = stack.pop().unwrap_or(SymbolicValue::Unknown);
        (ExpressionStack { stack }, value)
    }

    pub fn peek(&self) -> Option<&SymbolicValue> {
        self.stack.last()
    }

    pub fn size(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    /// Executes a pure-stack expression kind: pops the operand values and
    /// pushes the result value. Kinds handled elsewhere (or not at all)
    /// push the unknown value.
    pub fn execute(&self, expr: &Expr, state: &ProgramState) -> ExpressionStack {
        let mut stack = self.stack.clone();
        match expr {
            Expr::Lit(lit) => {
                stack.push(SymbolicValue::WithConstraint(Constraint::from_literal(lit)));
            }
            Expr::Tpl(tpl) => {
                pop_n(&mut stack, tpl.exprs.len());
                stack.push(SymbolicValue::WithConstraint(Constraint::STRING_PRIMITIVE));
            }
            Expr::TaggedTpl(tagged) => {
                pop_n(&mut stack, tagged.tpl.exprs.len() + 1);
                stack.push(SymbolicValue::Unknown);
            }
            Expr::Unary(unary) => {
                let operand = pop_one(&mut stack);
                let result = match unary.op {
                    UnaryOp::Bang => SymbolicValue::logical_not(operand),
                    // typeof always yields a non-empty string
                    UnaryOp::TypeOf => {
                        SymbolicValue::WithConstraint(Constraint::TRUTHY_STRING)
                    }
                    UnaryOp::Void => SymbolicValue::undefined(),
                    UnaryOp::Delete => SymbolicValue::WithConstraint(Constraint::ANY_BOOLEAN),
                    UnaryOp::Minus | UnaryOp::Plus | UnaryOp::Tilde => {
                        SymbolicValue::WithConstraint(Constraint::NUMBER_PRIMITIVE)
                    }
                };
                stack.push(result);
            }
            Expr::Bin(bin) => {
                let right = pop_one(&mut stack);
                let left = pop_one(&mut stack);
                stack.push(binary_result(bin.op, &left, &right, state));
            }
            Expr::Cond(_) => {
                let alternate = pop_one(&mut stack);
                let consequent = pop_one(&mut stack);
                pop_n(&mut stack, 1);
                let merged = consequent
                    .base_constraint(state)
                    .or(alternate.base_constraint(state));
                stack.push(SymbolicValue::WithConstraint(merged));
            }
            Expr::Array(array) => {
                pop_n(&mut stack, array_literal_operand_count(array));
                stack.push(SymbolicValue::WithConstraint(Constraint::ARRAY));
            }
            Expr::Object(object) => {
                pop_n(&mut stack, object_literal_operand_count(object));
                stack.push(SymbolicValue::WithConstraint(Constraint::OTHER_OBJECT));
            }
            Expr::Fn(_) | Expr::Arrow(_) => {
                stack.push(SymbolicValue::FunctionWithKnownReturn(Constraint::ANY_VALUE));
            }
            Expr::Class(_) => {
                stack.push(SymbolicValue::WithConstraint(Constraint::FUNCTION));
            }
            Expr::Seq(seq) => {
                let result = pop_one(&mut stack);
                pop_n(&mut stack, seq.exprs.len().saturating_sub(1));
                stack.push(result);
            }
            Expr::Await(_) => {
                pop_n(&mut stack, 1);
                stack.push(SymbolicValue::Unknown);
            }
            Expr::Yield(yield_expr) => {
                if yield_expr.arg.is_some() {
                    pop_n(&mut stack, 1);
                }
                stack.push(SymbolicValue::Unknown);
            }
            _ => {
                stack.push(SymbolicValue::Unknown);
            }
        }
        ExpressionStack { stack }
    }
}

fn pop_one(stack: &mut Vec<SymbolicValue>) -> SymbolicValue {
    stack.pop().unwrap_or(SymbolicValue::Unknown)
}

fn pop_n(stack: &mut Vec<SymbolicValue>, n: usize) {
    for _ in 0..n {
        stack.pop();
    }
}

fn binary_result(
    op: BinaryOp,
    left: &SymbolicValue,
    right: &SymbolicValue,
    state: &ProgramState,
) -> SymbolicValue {
    match op {
        BinaryOp::EqEq
        | BinaryOp::NotEq
        | BinaryOp::EqEqEq
        | BinaryOp::NotEqEq
        | BinaryOp::Lt
        | BinaryOp::LtEq
        | BinaryOp::Gt
        | BinaryOp::GtEq
        | BinaryOp::In
        | BinaryOp::InstanceOf => SymbolicValue::WithConstraint(Constraint::ANY_BOOLEAN),
        BinaryOp::Add => {
            let left_constraint = left.base_constraint(state);
            let right_constraint = right.base_constraint(state);
            let result = if left_constraint.is_stricter_or_equal_to(Constraint::STRING_PRIMITIVE)
                || right_constraint.is_stricter_or_equal_to(Constraint::STRING_PRIMITIVE)
            {
                Constraint::STRING_PRIMITIVE
            } else if left_constraint.is_stricter_or_equal_to(Constraint::ANY_NUMBER)
                && right_constraint.is_stricter_or_equal_to(Constraint::ANY_NUMBER)
            {
                Constraint::NUMBER_PRIMITIVE
            } else {
                Constraint::NUMBER_PRIMITIVE.or(Constraint::STRING_PRIMITIVE)
            };
            SymbolicValue::WithConstraint(result)
        }
        // Logical operators in expression position: the result is either
        // the (suitably filtered) left operand or the right operand.
        BinaryOp::LogicalAnd => {
            let merged = (left.base_constraint(state) & Constraint::FALSY)
                .or(right.base_constraint(state));
            SymbolicValue::WithConstraint(merged)
        }
        BinaryOp::LogicalOr => {
            let merged = (left.base_constraint(state) & Constraint::TRUTHY)
                .or(right.base_constraint(state));
            SymbolicValue::WithConstraint(merged)
        }
        BinaryOp::NullishCoalescing => {
            let merged = (left.base_constraint(state) & Constraint::NOT_NULLY)
                .or(right.base_constraint(state));
            SymbolicValue::WithConstraint(merged)
        }
        _ => SymbolicValue::WithConstraint(Constraint::NUMBER_PRIMITIVE),
    }
}

/// Number of stack slots the elements of an array literal occupy: one per
/// present element (holes produce nothing).
pub(crate) fn array_literal_operand_count(array: &swc_ecma_ast::ArrayLit) -> usize {
    array.elems.iter().filter(|e| e.is_some()).count()
}

/// Number of stack slots the properties of an object literal occupy:
/// one per evaluated value plus one per computed key. Shorthand properties
/// and accessor/method bodies produce no tracked operand.
pub(crate) fn object_literal_operand_count(object: &ObjectLit) -> usize {
    object
        .props
        .iter()
        .map(|prop| match prop {
            PropOrSpread::Spread(_) => 1,
            PropOrSpread::Prop(prop) => match prop.as_ref() {
                Prop::Shorthand(_) => 0,
                Prop::KeyValue(kv) => {
                    if matches!(kv.key, PropName::Computed(_)) {
                        2
                    } else {
                        1
                    }
                }
                Prop::Assign(_) => 1,
                Prop::Getter(_) | Prop::Setter(_) | Prop::Method(_) => 0,
            },
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ParsedFile;
    use swc_ecma_ast::Stmt;

    fn first_expr(code: &str) -> Expr {
        let parsed = ParsedFile::from_source("test.js", code);
        let module = parsed.module().expect("parse failed").clone();
        let stmt = module.body[0]
            .as_stmt()
            .expect("expected a statement")
            .clone();
        match stmt {
            Stmt::Expr(expr_stmt) => match *expr_stmt.expr {
                Expr::Paren(paren) => *paren.expr,
                other => other,
            },
            _ => panic!("expected an expression statement"),
        }
    }

    fn constant(constraint: Constraint) -> SymbolicValue {
        SymbolicValue::WithConstraint(constraint)
    }

    #[test]
    fn literals_push_their_constraint() {
        let state = ProgramState::empty_state();
        let stack = ExpressionStack::empty_stack().execute(&first_expr("42;"), &state);

        assert_eq!(stack.peek(), Some(&constant(Constraint::TRUTHY_NUMBER)));
        assert_eq!(stack.size(), 1);
    }

    #[test]
    fn logical_complement_wraps_the_operand() {
        let state = ProgramState::empty_state();
        let operand = constant(Constraint::NULL);
        let stack = ExpressionStack::empty_stack()
            .push(operand.clone())
            .execute(&first_expr("!x;"), &state);

        assert_eq!(stack.peek(), Some(&SymbolicValue::logical_not(operand)));
    }

    #[test]
    fn typeof_yields_a_truthy_string() {
        let state = ProgramState::empty_state();
        let stack = ExpressionStack::empty_stack()
            .push(SymbolicValue::Unknown)
            .execute(&first_expr("typeof x;"), &state);

        assert_eq!(stack.peek(), Some(&constant(Constraint::TRUTHY_STRING)));
        assert_eq!(stack.size(), 1);
    }

    #[test]
    fn void_yields_undefined() {
        let state = ProgramState::empty_state();
        let stack = ExpressionStack::empty_stack()
            .push(SymbolicValue::Unknown)
            .execute(&first_expr("void x;"), &state);

        assert_eq!(stack.peek(), Some(&SymbolicValue::undefined()));
    }

    #[test]
    fn arithmetic_yields_a_number() {
        let state = ProgramState::empty_state();
        let stack = ExpressionStack::empty_stack()
            .push(constant(Constraint::TRUTHY_NUMBER))
            .push(constant(Constraint::TRUTHY_NUMBER))
            .execute(&first_expr("a * b;"), &state);

        assert_eq!(stack.peek(), Some(&constant(Constraint::NUMBER_PRIMITIVE)));
        assert_eq!(stack.size(), 1);
    }

    #[test]
    fn plus_with_a_string_operand_yields_a_string() {
        let state = ProgramState::empty_state();
        let stack = ExpressionStack::empty_stack()
            .push(constant(Constraint::TRUTHY_STRING))
            .push(constant(Constraint::TRUTHY_NUMBER))
            .execute(&first_expr("a + b;"), &state);

        assert_eq!(stack.peek(), Some(&constant(Constraint::STRING_PRIMITIVE)));
    }

    #[test]
    fn plus_of_two_numbers_stays_numeric() {
        let state = ProgramState::empty_state();
        let stack = ExpressionStack::empty_stack()
            .push(constant(Constraint::ZERO))
            .push(constant(Constraint::TRUTHY_NUMBER))
            .execute(&first_expr("a + b;"), &state);

        assert_eq!(stack.peek(), Some(&constant(Constraint::NUMBER_PRIMITIVE)));
    }

    #[test]
    fn logical_and_merges_falsy_left_with_right() {
        let state = ProgramState::empty_state();
        let stack = ExpressionStack::empty_stack()
            .push(constant(Constraint::NULL))
            .push(constant(Constraint::TRUTHY_STRING))
            .execute(&first_expr("a && b;"), &state);

        assert_eq!(
            stack.peek(),
            Some(&constant(Constraint::NULL.or(Constraint::TRUTHY_STRING)))
        );
    }

    #[test]
    fn nullish_coalescing_strips_nully_kinds_from_the_left() {
        let state = ProgramState::empty_state();
        let left = Constraint::NULL.or(Constraint::TRUTHY_STRING);
        let stack = ExpressionStack::empty_stack()
            .push(constant(left))
            .push(constant(Constraint::ZERO))
            .execute(&first_expr("a ?? b;"), &state);

        assert_eq!(
            stack.peek(),
            Some(&constant(Constraint::TRUTHY_STRING.or(Constraint::ZERO)))
        );
    }

    #[test]
    fn conditional_merges_both_branches() {
        let state = ProgramState::empty_state();
        let stack = ExpressionStack::empty_stack()
            .push(SymbolicValue::Unknown)
            .push(constant(Constraint::TRUTHY_STRING))
            .push(constant(Constraint::NULL))
            .execute(&first_expr("c ? a : b;"), &state);

        assert_eq!(
            stack.peek(),
            Some(&constant(Constraint::TRUTHY_STRING.or(Constraint::NULL)))
        );
        assert_eq!(stack.size(), 1);
    }

    #[test]
    fn sequence_keeps_the_last_value() {
        let state = ProgramState::empty_state();
        let stack = ExpressionStack::empty_stack()
            .push(constant(Constraint::NULL))
            .push(constant(Constraint::TRUE))
            .execute(&first_expr("a, b;"), &state);

        assert_eq!(stack.peek(), Some(&constant(Constraint::TRUE)));
        assert_eq!(stack.size(), 1);
    }

    #[test]
    fn array_literal_pops_elements_and_pushes_an_array() {
        let state = ProgramState::empty_state();
        let stack = ExpressionStack::empty_stack()
            .push(constant(Constraint::TRUTHY_NUMBER))
            .push(constant(Constraint::TRUTHY_NUMBER))
            .execute(&first_expr("[a, b];"), &state);

        assert_eq!(stack.peek(), Some(&constant(Constraint::ARRAY)));
        assert_eq!(stack.size(), 1);
    }

    #[test]
    fn function_expressions_are_callable_values() {
        let state = ProgramState::empty_state();
        let stack =
            ExpressionStack::empty_stack().execute(&first_expr("(function () {});"), &state);

        assert_eq!(
            stack.peek(),
            Some(&SymbolicValue::FunctionWithKnownReturn(Constraint::ANY_VALUE))
        );
    }

    #[test]
    fn operand_counts_for_literals() {
        let array = match first_expr("[1, , 2, ...rest];") {
            Expr::Array(array) => array,
            _ => panic!("expected array literal"),
        };
        assert_eq!(array_literal_operand_count(&array), 3);

        let object = match first_expr("({ a, b: 1, [k]: 2, get g() {}, m() {}, ...spread });") {
            Expr::Object(object) => object,
            _ => panic!("expected object literal"),
        };
        // a (0) + b:1 (1) + [k]:2 (2) + getter (0) + method (0) + spread (1)
        assert_eq!(object_literal_operand_count(&object), 4);
    }

    #[test]
    fn unmodeled_kinds_push_unknown() {
        let state = ProgramState::empty_state();
        let stack = ExpressionStack::empty_stack().execute(&first_expr("this;"), &state);

        assert_eq!(stack.peek(), Some(&SymbolicValue::Unknown));
    }
}
