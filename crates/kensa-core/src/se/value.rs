//! Symbolic values: placeholders for runtime values during analysis
//!
//! A symbolic value stands for the result of an expression without
//! evaluating it. Plain variable values carry an identity so that program
//! states can track their constraints; composite values (negations,
//! equality tests, built-in call results) know how to propagate a
//! constraint placed on them back onto the values they were built from.

use crate::se::builtins::{registry, ArgumentsConstrainer, BuiltInId, BuiltInRegistry, Method};
use crate::se::constraint::{Constraint, Truthiness};
use crate::se::state::{Feasibility, ProgramState};

/// Identity of a tracked value allocation within a program state lineage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ValueId(pub(crate) u32);

#[derive(Debug, Clone, PartialEq)]
pub enum SymbolicValue {
    /// Result of an expression the engine has no model for.
    Unknown,
    /// A value known only by its constraint: a literal, or a computed
    /// result with a known shape.
    WithConstraint(Constraint),
    /// An identity-tracked allocation; its constraint lives in the program
    /// state.
    Variable(ValueId),
    /// `!operand`
    LogicalNot(Box<SymbolicValue>),
    /// The boolean outcome of comparing `operand` against values of a
    /// fixed constraint, e.g. `x === null` or `x == undefined`.
    EqualTo {
        operand: Box<SymbolicValue>,
        constraint: Constraint,
    },
    /// The boolean outcome of `typeof operand === type_name`.
    TypeOfTest {
        operand: Box<SymbolicValue>,
        type_name: String,
    },
    /// A callable about which only the return constraint is known, e.g. a
    /// function expression.
    FunctionWithKnownReturn(Constraint),
    /// A standard-library object or constructor from the built-in registry.
    BuiltInObject(BuiltInId),
    /// A standard-library method from the built-in registry.
    BuiltInFunction(&'static Method),
    /// The result of calling a built-in function; remembers enough to
    /// narrow the arguments once a branch decides the result's truthiness.
    FunctionCall {
        return_constraint: Constraint,
        constrainer: Option<ArgumentsConstrainer>,
        arguments: Vec<SymbolicValue>,
    },
}

impl SymbolicValue {
    /// The constant `undefined` value.
    pub fn undefined() -> SymbolicValue {
        SymbolicValue::WithConstraint(Constraint::UNDEFINED)
    }

    /// The constant `null` value.
    pub fn null() -> SymbolicValue {
        SymbolicValue::WithConstraint(Constraint::NULL)
    }

    pub fn logical_not(operand: SymbolicValue) -> SymbolicValue {
        SymbolicValue::LogicalNot(Box::new(operand))
    }

    pub fn equal_to(operand: SymbolicValue, constraint: Constraint) -> SymbolicValue {
        SymbolicValue::EqualTo {
            operand: Box::new(operand),
            constraint,
        }
    }

    pub fn type_of_test(operand: SymbolicValue, type_name: impl Into<String>) -> SymbolicValue {
        SymbolicValue::TypeOfTest {
            operand: Box::new(operand),
            type_name: type_name.into(),
        }
    }

    /// The constraint this value is known to satisfy in `state`.
    pub fn base_constraint(&self, state: &ProgramState) -> Constraint {
        match self {
            SymbolicValue::Unknown => Constraint::ANY_VALUE,
            SymbolicValue::WithConstraint(constraint) => *constraint,
            SymbolicValue::Variable(id) => state.constraint_of(*id),
            SymbolicValue::LogicalNot(operand) => {
                match operand.base_constraint(state).truthiness() {
                    Truthiness::Truthy => Constraint::FALSE,
                    Truthiness::Falsy => Constraint::TRUE,
                    Truthiness::Unknown => Constraint::ANY_BOOLEAN,
                }
            }
            SymbolicValue::EqualTo {
                operand,
                constraint,
            } => {
                let operand_constraint = operand.base_constraint(state);
                if operand_constraint.is_incompatible_with(*constraint) {
                    Constraint::FALSE
                } else if operand_constraint.is_stricter_or_equal_to(*constraint) {
                    Constraint::TRUE
                } else {
                    Constraint::ANY_BOOLEAN
                }
            }
            SymbolicValue::TypeOfTest { operand, type_name } => {
                match Constraint::for_typeof_string(type_name) {
                    Some(tested) => {
                        let operand_constraint = operand.base_constraint(state);
                        if operand_constraint.is_incompatible_with(tested) {
                            Constraint::FALSE
                        } else if operand_constraint.is_stricter_or_equal_to(tested) {
                            Constraint::TRUE
                        } else {
                            Constraint::ANY_BOOLEAN
                        }
                    }
                    // Comparison against a string `typeof` never produces.
                    None => Constraint::FALSE,
                }
            }
            SymbolicValue::FunctionWithKnownReturn(_) => Constraint::FUNCTION,
            SymbolicValue::BuiltInObject(id) => registry().get(*id).base_constraint,
            SymbolicValue::BuiltInFunction(_) => Constraint::FUNCTION,
            SymbolicValue::FunctionCall {
                return_constraint, ..
            } => *return_constraint,
        }
    }

    /// Resolves a property access on this value.
    ///
    /// Built-in objects consult their own table first and then walk the
    /// prototype chain; an exhausted chain yields the constant `undefined`
    /// value. Anything else resolves to the unknown value.
    pub fn get_property_value(&self, name: &str, registry: &'static BuiltInRegistry) -> SymbolicValue {
        match self {
            SymbolicValue::BuiltInObject(id) => match registry.lookup_property(*id, name) {
                Some(property) => property.as_symbolic_value(),
                None => SymbolicValue::undefined(),
            },
            // Methods are functions; their properties come from
            // Function.prototype.
            SymbolicValue::BuiltInFunction(_) => {
                let function_prototype = registry.well_known().function_prototype;
                match registry.lookup_property(function_prototype, name) {
                    Some(property) => property.as_symbolic_value(),
                    None => SymbolicValue::undefined(),
                }
            }
            _ => SymbolicValue::Unknown,
        }
    }

    /// The result of calling this value as a plain function.
    pub fn call(&self, arguments: Vec<SymbolicValue>) -> SymbolicValue {
        match self {
            SymbolicValue::BuiltInFunction(method) => SymbolicValue::FunctionCall {
                return_constraint: method.constraint_on_return,
                constrainer: method.constrainer,
                arguments,
            },
            SymbolicValue::BuiltInObject(id) => match registry().get(*id).constructor {
                Some(semantics) => {
                    SymbolicValue::WithConstraint(semantics.constraint_on_returned_value)
                }
                None => SymbolicValue::Unknown,
            },
            SymbolicValue::FunctionWithKnownReturn(return_constraint) => {
                SymbolicValue::WithConstraint(*return_constraint)
            }
            _ => SymbolicValue::Unknown,
        }
    }

    /// The result of instantiating this value with `new`.
    pub fn instantiate(&self) -> SymbolicValue {
        match self {
            SymbolicValue::BuiltInObject(id) => match registry().get(*id).constructor {
                Some(semantics) => SymbolicValue::WithConstraint(
                    registry().get(semantics.prototype_of_instances).base_constraint,
                ),
                None => SymbolicValue::WithConstraint(Constraint::OBJECT),
            },
            _ => SymbolicValue::WithConstraint(Constraint::OBJECT),
        }
    }

    /// Narrows this value by `constraint`, propagating onto the values it
    /// was built from. Returns `Infeasible` when the narrowed state would
    /// be self-contradictory.
    pub fn constrain(&self, state: &ProgramState, constraint: Constraint) -> Feasibility {
        if constraint.is_empty() {
            return Feasibility::Infeasible;
        }
        match self {
            SymbolicValue::Unknown => Feasibility::Feasible(state.clone()),
            SymbolicValue::WithConstraint(own) => {
                if own.is_incompatible_with(constraint) {
                    Feasibility::Infeasible
                } else {
                    Feasibility::Feasible(state.clone())
                }
            }
            SymbolicValue::Variable(id) => state.constrain_value(*id, constraint),
            SymbolicValue::LogicalNot(operand) => match constraint.truthiness() {
                Truthiness::Truthy => operand.constrain(state, Constraint::FALSY),
                Truthiness::Falsy => operand.constrain(state, Constraint::TRUTHY),
                Truthiness::Unknown => Feasibility::Feasible(state.clone()),
            },
            SymbolicValue::EqualTo {
                operand,
                constraint: tested,
            } => match constraint.truthiness() {
                Truthiness::Truthy => operand.constrain(state, *tested),
                Truthiness::Falsy => operand.constrain(state, tested.not()),
                Truthiness::Unknown => Feasibility::Feasible(state.clone()),
            },
            SymbolicValue::TypeOfTest { operand, type_name } => {
                match (Constraint::for_typeof_string(type_name), constraint.truthiness()) {
                    (Some(tested), Truthiness::Truthy) => operand.constrain(state, tested),
                    (Some(tested), Truthiness::Falsy) => operand.constrain(state, tested.not()),
                    // `typeof` never evaluates to an unrecognized string,
                    // so the comparison cannot hold.
                    (None, Truthiness::Truthy) => Feasibility::Infeasible,
                    (None, Truthiness::Falsy) => Feasibility::Feasible(state.clone()),
                    (_, Truthiness::Unknown) => Feasibility::Feasible(state.clone()),
                }
            }
            SymbolicValue::FunctionWithKnownReturn(_)
            | SymbolicValue::BuiltInObject(_)
            | SymbolicValue::BuiltInFunction(_) => {
                if self.base_constraint(state).is_incompatible_with(constraint) {
                    Feasibility::Infeasible
                } else {
                    Feasibility::Feasible(state.clone())
                }
            }
            SymbolicValue::FunctionCall {
                return_constraint,
                constrainer,
                arguments,
            } => {
                if return_constraint.is_incompatible_with(constraint) {
                    return Feasibility::Infeasible;
                }
                match constrainer {
                    Some(constrainer) => constrainer.apply(arguments, state, constraint),
                    None => Feasibility::Feasible(state.clone()),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn any_state() -> ProgramState {
        ProgramState::empty_state()
    }

    #[test]
    fn unknown_value_has_any_constraint() {
        let state = any_state();
        assert_eq!(
            SymbolicValue::Unknown.base_constraint(&state),
            Constraint::ANY_VALUE
        );
    }

    #[test]
    fn constraining_a_literal_checks_compatibility() {
        let state = any_state();
        let null = SymbolicValue::null();

        assert!(null.constrain(&state, Constraint::FALSY).is_feasible());
        assert!(!null.constrain(&state, Constraint::TRUTHY).is_feasible());
    }

    #[test]
    fn constraining_with_bottom_is_always_infeasible() {
        let state = any_state();
        assert!(!SymbolicValue::Unknown
            .constrain(&state, Constraint::NO_POSSIBLE_VALUE)
            .is_feasible());
    }

    #[test]
    fn logical_not_flips_the_branch() {
        let state = any_state();
        let (state, value) = state.allocate(None);
        let negated = SymbolicValue::logical_not(value.clone());

        let truthy_branch = negated.constrain(&state, Constraint::TRUTHY).into_state().unwrap();
        assert_eq!(value.base_constraint(&truthy_branch), Constraint::FALSY);

        let falsy_branch = negated.constrain(&state, Constraint::FALSY).into_state().unwrap();
        assert_eq!(value.base_constraint(&falsy_branch), Constraint::TRUTHY);
    }

    #[test]
    fn double_negation_narrows_like_the_plain_value() {
        let state = any_state();
        let (state, value) = state.allocate(None);
        let double = SymbolicValue::logical_not(SymbolicValue::logical_not(value.clone()));

        let truthy = double.constrain(&state, Constraint::TRUTHY).into_state().unwrap();
        assert_eq!(value.base_constraint(&truthy), Constraint::TRUTHY);
    }

    #[test]
    fn equal_to_narrows_operand_on_both_branches() {
        let state = any_state();
        let (state, value) = state.allocate(None);
        let test = SymbolicValue::equal_to(value.clone(), Constraint::NULL_OR_UNDEFINED);

        let truthy = test.constrain(&state, Constraint::TRUTHY).into_state().unwrap();
        assert_eq!(value.base_constraint(&truthy), Constraint::NULL_OR_UNDEFINED);

        let falsy = test.constrain(&state, Constraint::FALSY).into_state().unwrap();
        assert_eq!(value.base_constraint(&falsy), Constraint::NOT_NULLY);
    }

    #[test]
    fn equal_to_contradiction_is_infeasible() {
        let state = any_state();
        let (state, value) = state.allocate(Some(Constraint::TRUTHY));
        let test = SymbolicValue::equal_to(value, Constraint::NULL);

        assert!(!test.constrain(&state, Constraint::TRUTHY).is_feasible());
    }

    #[test]
    fn typeof_test_narrows_to_tested_constraint() {
        let state = any_state();
        let (state, value) = state.allocate(None);
        let test = SymbolicValue::type_of_test(value.clone(), "number");

        let truthy = test.constrain(&state, Constraint::TRUTHY).into_state().unwrap();
        assert_eq!(value.base_constraint(&truthy), Constraint::ANY_NUMBER);

        let falsy = test.constrain(&state, Constraint::FALSY).into_state().unwrap();
        assert_eq!(value.base_constraint(&falsy), Constraint::ANY_NUMBER.not());
    }

    #[test]
    fn typeof_against_unknown_string_never_holds() {
        let state = any_state();
        let (state, value) = state.allocate(None);
        let test = SymbolicValue::type_of_test(value, "numbr");

        assert!(!test.constrain(&state, Constraint::TRUTHY).is_feasible());
        assert!(test.constrain(&state, Constraint::FALSY).is_feasible());
        assert_eq!(test.base_constraint(&state), Constraint::FALSE);
    }

    #[test]
    fn typeof_test_with_proven_operand_is_boolean_known() {
        let state = any_state();
        let (state, value) = state.allocate(Some(Constraint::UNDEFINED));
        let test = SymbolicValue::type_of_test(value, "undefined");

        assert_eq!(test.base_constraint(&state), Constraint::TRUE);
    }

    #[test]
    fn function_expression_value_is_callable() {
        let state = any_state();
        let function = SymbolicValue::FunctionWithKnownReturn(Constraint::ANY_VALUE);

        assert_eq!(function.base_constraint(&state), Constraint::FUNCTION);
        assert_eq!(
            function.call(Vec::new()),
            SymbolicValue::WithConstraint(Constraint::ANY_VALUE)
        );
    }
}
