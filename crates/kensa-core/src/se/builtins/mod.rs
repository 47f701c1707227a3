//! Hand-modeled semantics of the standard library
//!
//! Every standard global is described by a static table mapping property
//! names to constraints and method descriptors, wired into a prototype
//! graph rooted at `Object.prototype`. The whole graph is built once per
//! process, validated, and shared read-only across analyses.

mod array;
mod boolean;
mod date;
mod function;
mod math;
mod number;
mod object;
mod regexp;
mod string;

use std::collections::HashMap;
use std::sync::OnceLock;

use id_arena::{Arena, Id};

use crate::se::constraint::{Constraint, Truthiness};
use crate::se::state::{Feasibility, ProgramState};
use crate::se::value::SymbolicValue;

pub type BuiltInId = Id<BuiltInObject>;

/// Upper bound on prototype chain length; construction fails fast when a
/// chain does not reach the root within this many hops.
pub const MAX_PROTOTYPE_HOPS: usize = 5;

/// A modeled standard-library object: a prototype, a constructor or a
/// namespace object such as `Math`.
#[derive(Debug)]
pub struct BuiltInObject {
    pub name: &'static str,
    pub base_constraint: Constraint,
    pub prototype: Option<BuiltInId>,
    pub constructor: Option<ConstructorSemantics>,
    properties: HashMap<&'static str, Property>,
}

impl BuiltInObject {
    pub fn own_property(&self, name: &str) -> Option<&Property> {
        self.properties.get(name)
    }

    pub fn property_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.properties.keys().copied()
    }
}

/// What calling or instantiating a built-in constructor produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstructorSemantics {
    /// `new F()` yields a value with this object's base constraint;
    /// `F.prototype` resolves to it.
    pub prototype_of_instances: BuiltInId,
    /// `F()` without `new` yields a value with this constraint.
    pub constraint_on_returned_value: Constraint,
}

#[derive(Debug, PartialEq)]
pub enum Property {
    /// A plain data property with a known constraint.
    Constant(Constraint),
    Method(Method),
    /// A property that is itself a modeled object, e.g. `Array.prototype`.
    Object(BuiltInId),
}

impl Property {
    pub fn as_symbolic_value(&'static self) -> SymbolicValue {
        match self {
            Property::Constant(constraint) => SymbolicValue::WithConstraint(*constraint),
            Property::Method(method) => SymbolicValue::BuiltInFunction(method),
            Property::Object(id) => SymbolicValue::BuiltInObject(*id),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct Method {
    pub name: &'static str,
    pub constraint_on_return: Constraint,
    pub signature: Signature,
    pub constrainer: Option<ArgumentsConstrainer>,
    /// True when the call mutates its receiver, so cached facts about the
    /// receiver object must be invalidated afterwards.
    pub has_side_effect: bool,
}

/// Expected constraint per parameter index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signature {
    /// No parameters accepted.
    Empty,
    /// Exactly these parameters; anything past the end is unexpected.
    Fixed(&'static [Constraint]),
    /// Leading parameters followed by an unbounded tail of one expectation.
    Variadic {
        head: &'static [Constraint],
        rest: Constraint,
    },
}

impl Signature {
    /// The constraint a well-typed argument at `index` satisfies, or
    /// `None` when no further parameters are accepted.
    pub fn expected(&self, index: usize) -> Option<Constraint> {
        match self {
            Signature::Empty => None,
            Signature::Fixed(params) => params.get(index).copied(),
            Signature::Variadic { head, rest } => Some(head.get(index).copied().unwrap_or(*rest)),
        }
    }
}

/// Accepts any number of arguments of any shape.
pub const ANY_ARGS: Signature = Signature::Variadic {
    head: &[],
    rest: Constraint::ANY_VALUE,
};

/// A built-in's hook for propagating a branch decision about its boolean
/// result back onto the arguments it was called with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgumentsConstrainer {
    /// `Array.isArray` / `isNaN` style: a truthy result proves the first
    /// argument satisfies the target constraint, a falsy result proves its
    /// complement. With no argument the answer is fixed by whether
    /// `undefined` satisfies the target.
    TypeTest(Constraint),
    /// `Object.is` style: a truthy result narrows each operand by the
    /// other's constraint; a falsy result excludes the other operand's
    /// kind when that kind is a singleton. Missing operands default to
    /// `undefined`.
    SameValue,
}

impl ArgumentsConstrainer {
    pub fn apply(
        &self,
        arguments: &[SymbolicValue],
        state: &ProgramState,
        constraint_on_result: Constraint,
    ) -> Feasibility {
        match self {
            ArgumentsConstrainer::TypeTest(target) => {
                self.apply_type_test(*target, arguments, state, constraint_on_result)
            }
            ArgumentsConstrainer::SameValue => {
                self.apply_same_value(arguments, state, constraint_on_result)
            }
        }
    }

    fn apply_type_test(
        &self,
        target: Constraint,
        arguments: &[SymbolicValue],
        state: &ProgramState,
        constraint_on_result: Constraint,
    ) -> Feasibility {
        match (arguments.first(), constraint_on_result.truthiness()) {
            (_, Truthiness::Unknown) => Feasibility::Feasible(state.clone()),
            (Some(argument), Truthiness::Truthy) => state.constrain(argument, target),
            (Some(argument), Truthiness::Falsy) => state.constrain(argument, target.not()),
            (None, branch) => {
                let answer = Constraint::UNDEFINED.is_stricter_or_equal_to(target);
                let consistent = match branch {
                    Truthiness::Truthy => answer,
                    Truthiness::Falsy => !answer,
                    Truthiness::Unknown => true,
                };
                if consistent {
                    Feasibility::Feasible(state.clone())
                } else {
                    Feasibility::Infeasible
                }
            }
        }
    }

    fn apply_same_value(
        &self,
        arguments: &[SymbolicValue],
        state: &ProgramState,
        constraint_on_result: Constraint,
    ) -> Feasibility {
        let undefined = SymbolicValue::undefined();
        let first = arguments.first().unwrap_or(&undefined);
        let second = arguments.get(1).unwrap_or(&undefined);
        let first_constraint = first.base_constraint(state);
        let second_constraint = second.base_constraint(state);

        match constraint_on_result.truthiness() {
            Truthiness::Truthy => match state.constrain(first, second_constraint) {
                Feasibility::Feasible(narrowed) => narrowed.constrain(second, first_constraint),
                Feasibility::Infeasible => Feasibility::Infeasible,
            },
            Truthiness::Falsy => {
                if second_constraint.is_single_kind() {
                    state.constrain(first, second_constraint.not())
                } else if first_constraint.is_single_kind() {
                    state.constrain(second, first_constraint.not())
                } else {
                    Feasibility::Feasible(state.clone())
                }
            }
            Truthiness::Unknown => Feasibility::Feasible(state.clone()),
        }
    }
}

/// The process-wide built-in model, built once and immutable thereafter.
pub struct BuiltInRegistry {
    objects: Arena<BuiltInObject>,
    globals: HashMap<&'static str, GlobalBinding>,
    well_known: WellKnown,
}

#[derive(Debug)]
enum GlobalBinding {
    Object(BuiltInId),
    Function(Method),
    Value(Constraint),
}

/// Named handles into the object graph for the driver and for tests.
#[derive(Debug, Clone, Copy)]
pub struct WellKnown {
    pub object_prototype: BuiltInId,
    pub function_prototype: BuiltInId,
    pub array_prototype: BuiltInId,
    pub string_prototype: BuiltInId,
    pub number_prototype: BuiltInId,
    pub boolean_prototype: BuiltInId,
    pub date_prototype: BuiltInId,
    pub regexp_prototype: BuiltInId,
    pub object_constructor: BuiltInId,
    pub function_constructor: BuiltInId,
    pub array_constructor: BuiltInId,
    pub string_constructor: BuiltInId,
    pub number_constructor: BuiltInId,
    pub boolean_constructor: BuiltInId,
    pub date_constructor: BuiltInId,
    pub regexp_constructor: BuiltInId,
    pub math: BuiltInId,
}

static REGISTRY: OnceLock<BuiltInRegistry> = OnceLock::new();

/// The built-in singleton graph. Safe to share across threads: it is
/// written once here and read-only forever after.
pub fn registry() -> &'static BuiltInRegistry {
    REGISTRY.get_or_init(BuiltInRegistry::build)
}

impl BuiltInRegistry {
    fn build() -> BuiltInRegistry {
        let mut arena = Arena::new();

        // Prototypes first, bottom-up from the root.
        let object_prototype = object::prototype(&mut arena);
        let function_prototype = function::prototype(&mut arena, object_prototype);
        let array_prototype = array::prototype(&mut arena, object_prototype);
        let string_prototype = string::prototype(&mut arena, object_prototype);
        let number_prototype = number::prototype(&mut arena, object_prototype);
        let boolean_prototype = boolean::prototype(&mut arena, object_prototype);
        let date_prototype = date::prototype(&mut arena, object_prototype);
        let regexp_prototype = regexp::prototype(&mut arena, object_prototype);

        // Constructors second; each one is a function.
        let object_constructor =
            object::constructor(&mut arena, function_prototype, object_prototype);
        let function_constructor = function::constructor(&mut arena, function_prototype);
        let array_constructor = array::constructor(&mut arena, function_prototype, array_prototype);
        let string_constructor =
            string::constructor(&mut arena, function_prototype, string_prototype);
        let number_constructor =
            number::constructor(&mut arena, function_prototype, number_prototype);
        let boolean_constructor =
            boolean::constructor(&mut arena, function_prototype, boolean_prototype);
        let date_constructor = date::constructor(&mut arena, function_prototype, date_prototype);
        let regexp_constructor =
            regexp::constructor(&mut arena, function_prototype, regexp_prototype);

        let math = math::object(&mut arena, object_prototype);

        let well_known = WellKnown {
            object_prototype,
            function_prototype,
            array_prototype,
            string_prototype,
            number_prototype,
            boolean_prototype,
            date_prototype,
            regexp_prototype,
            object_constructor,
            function_constructor,
            array_constructor,
            string_constructor,
            number_constructor,
            boolean_constructor,
            date_constructor,
            regexp_constructor,
            math,
        };

        // Second phase: back-link each prototype to its constructor.
        for (prototype, constructor) in [
            (object_prototype, object_constructor),
            (function_prototype, function_constructor),
            (array_prototype, array_constructor),
            (string_prototype, string_constructor),
            (number_prototype, number_constructor),
            (boolean_prototype, boolean_constructor),
            (date_prototype, date_constructor),
            (regexp_prototype, regexp_constructor),
        ] {
            arena[prototype]
                .properties
                .insert("constructor", Property::Object(constructor));
        }

        let mut globals = HashMap::new();
        globals.insert("Object", GlobalBinding::Object(object_constructor));
        globals.insert("Function", GlobalBinding::Object(function_constructor));
        globals.insert("Array", GlobalBinding::Object(array_constructor));
        globals.insert("String", GlobalBinding::Object(string_constructor));
        globals.insert("Number", GlobalBinding::Object(number_constructor));
        globals.insert("Boolean", GlobalBinding::Object(boolean_constructor));
        globals.insert("Date", GlobalBinding::Object(date_constructor));
        globals.insert("RegExp", GlobalBinding::Object(regexp_constructor));
        globals.insert("Math", GlobalBinding::Object(math));

        globals.insert("NaN", GlobalBinding::Value(Constraint::NAN));
        globals.insert(
            "Infinity",
            GlobalBinding::Value(Constraint::TRUTHY_NUMBER_PRIMITIVE),
        );
        globals.insert("undefined", GlobalBinding::Value(Constraint::UNDEFINED));
        globals.insert("globalThis", GlobalBinding::Value(Constraint::OTHER_OBJECT));

        globals.insert(
            "isNaN",
            GlobalBinding::Function(Method {
                name: "isNaN",
                constraint_on_return: Constraint::ANY_BOOLEAN,
                signature: Signature::Fixed(ONE_ANY),
                constrainer: Some(ArgumentsConstrainer::TypeTest(Constraint::NAN)),
                has_side_effect: false,
            }),
        );
        globals.insert(
            "isFinite",
            GlobalBinding::Function(Method {
                name: "isFinite",
                constraint_on_return: Constraint::ANY_BOOLEAN,
                signature: Signature::Fixed(ONE_ANY),
                constrainer: None,
                has_side_effect: false,
            }),
        );
        globals.insert(
            "parseInt",
            GlobalBinding::Function(Method {
                name: "parseInt",
                constraint_on_return: Constraint::NUMBER_PRIMITIVE,
                signature: Signature::Fixed(VALUE_AND_RADIX),
                constrainer: None,
                has_side_effect: false,
            }),
        );
        globals.insert(
            "parseFloat",
            GlobalBinding::Function(Method {
                name: "parseFloat",
                constraint_on_return: Constraint::NUMBER_PRIMITIVE,
                signature: Signature::Fixed(ONE_ANY),
                constrainer: None,
                has_side_effect: false,
            }),
        );
        for name in ["decodeURI", "decodeURIComponent", "encodeURI", "encodeURIComponent"] {
            globals.insert(
                name,
                GlobalBinding::Function(Method {
                    name,
                    constraint_on_return: Constraint::STRING_PRIMITIVE,
                    signature: Signature::Fixed(ONE_STRING),
                    constrainer: None,
                    has_side_effect: false,
                }),
            );
        }

        let registry = BuiltInRegistry {
            objects: arena,
            globals,
            well_known,
        };
        registry.validate_prototype_chains();

        tracing::debug!(
            objects = registry.objects.len(),
            globals = registry.globals.len(),
            "built-in model initialized"
        );

        registry
    }

    pub fn get(&self, id: BuiltInId) -> &BuiltInObject {
        &self.objects[id]
    }

    pub fn well_known(&self) -> WellKnown {
        self.well_known
    }

    /// Resolves an unqualified top-level identifier that is not a local
    /// variable.
    pub fn find(&'static self, name: &str) -> Option<SymbolicValue> {
        self.globals.get(name).map(|binding| match binding {
            GlobalBinding::Object(id) => SymbolicValue::BuiltInObject(*id),
            GlobalBinding::Function(method) => SymbolicValue::BuiltInFunction(method),
            GlobalBinding::Value(constraint) => SymbolicValue::WithConstraint(*constraint),
        })
    }

    /// The prototype backing values of a known kind, used to resolve
    /// method calls on plain values (`[1].sort()`, `"x".trim()`).
    pub fn prototype_for(&self, constraint: Constraint) -> Option<BuiltInId> {
        let well_known = self.well_known;
        if constraint.is_empty() {
            return None;
        }
        if constraint.is_stricter_or_equal_to(Constraint::ARRAY) {
            Some(well_known.array_prototype)
        } else if constraint.is_stricter_or_equal_to(Constraint::STRING_PRIMITIVE) {
            Some(well_known.string_prototype)
        } else if constraint.is_stricter_or_equal_to(Constraint::ANY_NUMBER) {
            Some(well_known.number_prototype)
        } else if constraint.is_stricter_or_equal_to(Constraint::ANY_BOOLEAN) {
            Some(well_known.boolean_prototype)
        } else if constraint.is_stricter_or_equal_to(Constraint::DATE) {
            Some(well_known.date_prototype)
        } else if constraint.is_stricter_or_equal_to(Constraint::REGEXP) {
            Some(well_known.regexp_prototype)
        } else if constraint.is_stricter_or_equal_to(Constraint::FUNCTION) {
            Some(well_known.function_prototype)
        } else {
            None
        }
    }

    /// Looks a property up on `id`, walking the prototype chain.
    pub fn lookup_property(&'static self, id: BuiltInId, name: &str) -> Option<&'static Property> {
        let mut current = Some(id);
        while let Some(id) = current {
            let object = &self.objects[id];
            if let Some(property) = object.properties.get(name) {
                return Some(property);
            }
            current = object.prototype;
        }
        None
    }

    pub fn objects(&self) -> impl Iterator<Item = (BuiltInId, &BuiltInObject)> {
        self.objects.iter()
    }

    /// Every object must reach the single root within `MAX_PROTOTYPE_HOPS`.
    /// A violation is a programming error in the tables, not an analysis
    /// outcome, so it fails fast.
    fn validate_prototype_chains(&self) {
        let mut roots = 0;
        for (id, object) in self.objects.iter() {
            if object.prototype.is_none() {
                roots += 1;
            }
            let mut hops = 0;
            let mut current = object.prototype;
            while let Some(next) = current {
                hops += 1;
                assert!(
                    hops <= MAX_PROTOTYPE_HOPS,
                    "prototype chain of {} exceeds {} hops",
                    object.name,
                    MAX_PROTOTYPE_HOPS
                );
                current = self.objects[next].prototype;
            }
            let _ = id;
        }
        assert_eq!(roots, 1, "the prototype graph must have exactly one root");
    }
}

// Shared signature fragments.
pub(crate) const ONE_ANY: &[Constraint] = &[Constraint::ANY_VALUE];
pub(crate) const TWO_ANY: &[Constraint] = &[Constraint::ANY_VALUE, Constraint::ANY_VALUE];
pub(crate) const ONE_STRING: &[Constraint] = &[Constraint::STRING_PRIMITIVE];
pub(crate) const ONE_NUMBER: &[Constraint] = &[Constraint::NUMBER_PRIMITIVE];
pub(crate) const TWO_NUMBERS: &[Constraint] =
    &[Constraint::NUMBER_PRIMITIVE, Constraint::NUMBER_PRIMITIVE];
pub(crate) const CALLBACK: &[Constraint] = &[Constraint::FUNCTION, Constraint::ANY_VALUE];
pub(crate) const VALUE_AND_RADIX: &[Constraint] =
    &[Constraint::ANY_VALUE, Constraint::NUMBER_PRIMITIVE];

pub(crate) fn constant(constraint: Constraint) -> Property {
    Property::Constant(constraint)
}

/// A data property standardized recently enough that older engines may
/// lack it.
pub(crate) fn recent_constant(constraint: Constraint) -> Property {
    Property::Constant(constraint.for_recent_property())
}

pub(crate) fn method(name: &'static str, constraint_on_return: Constraint) -> Property {
    Property::Method(Method {
        name,
        constraint_on_return,
        signature: ANY_ARGS,
        constrainer: None,
        has_side_effect: false,
    })
}

pub(crate) fn method_sig(
    name: &'static str,
    constraint_on_return: Constraint,
    signature: Signature,
) -> Property {
    Property::Method(Method {
        name,
        constraint_on_return,
        signature,
        constrainer: None,
        has_side_effect: false,
    })
}

/// A method that mutates its receiver.
pub(crate) fn mutator(name: &'static str, constraint_on_return: Constraint) -> Property {
    Property::Method(Method {
        name,
        constraint_on_return,
        signature: ANY_ARGS,
        constrainer: None,
        has_side_effect: true,
    })
}

pub(crate) fn mutator_sig(
    name: &'static str,
    constraint_on_return: Constraint,
    signature: Signature,
) -> Property {
    Property::Method(Method {
        name,
        constraint_on_return,
        signature,
        constrainer: None,
        has_side_effect: true,
    })
}

/// A boolean type-test builtin narrowing its first argument to `target`.
pub(crate) fn type_test(name: &'static str, target: Constraint) -> Property {
    Property::Method(Method {
        name,
        constraint_on_return: Constraint::ANY_BOOLEAN,
        signature: Signature::Fixed(ONE_ANY),
        constrainer: Some(ArgumentsConstrainer::TypeTest(target)),
        has_side_effect: false,
    })
}
