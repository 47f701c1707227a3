//! Built-in model of the `Math` namespace object

use std::collections::HashMap;

use id_arena::Arena;

use super::{
    constant, method_sig, BuiltInId, BuiltInObject, Signature, ONE_NUMBER, TWO_NUMBERS,
};
use crate::se::constraint::Constraint;

pub(super) fn object(arena: &mut Arena<BuiltInObject>, object_prototype: BuiltInId) -> BuiltInId {
    let mut properties = HashMap::new();

    for name in ["E", "LN10", "LN2", "LOG10E", "LOG2E", "PI", "SQRT1_2", "SQRT2"] {
        properties.insert(name, constant(Constraint::TRUTHY_NUMBER_PRIMITIVE));
    }

    // All of these produce NaN for a NaN (or out-of-domain) argument.
    for name in [
        "abs", "acos", "acosh", "asin", "asinh", "atan", "atanh", "cbrt", "ceil", "cos", "cosh",
        "exp", "expm1", "floor", "fround", "log", "log10", "log1p", "log2", "round", "sign", "sin",
        "sinh", "sqrt", "tan", "tanh", "trunc",
    ] {
        properties.insert(
            name,
            method_sig(name, Constraint::NUMBER_PRIMITIVE, Signature::Fixed(ONE_NUMBER)),
        );
    }

    for name in ["atan2", "imul", "pow"] {
        properties.insert(
            name,
            method_sig(name, Constraint::NUMBER_PRIMITIVE, Signature::Fixed(TWO_NUMBERS)),
        );
    }

    for name in ["hypot", "max", "min"] {
        properties.insert(
            name,
            method_sig(
                name,
                Constraint::NUMBER_PRIMITIVE,
                Signature::Variadic {
                    head: &[],
                    rest: Constraint::NUMBER_PRIMITIVE,
                },
            ),
        );
    }

    properties.insert(
        "clz32",
        method_sig(
            "clz32",
            Constraint::POSITIVE_NUMBER.or(Constraint::ZERO),
            Signature::Fixed(ONE_NUMBER),
        ),
    );
    properties.insert(
        "random",
        method_sig(
            "random",
            Constraint::POSITIVE_NUMBER.or(Constraint::ZERO),
            Signature::Empty,
        ),
    );

    arena.alloc(BuiltInObject {
        name: "Math",
        base_constraint: Constraint::OTHER_OBJECT,
        prototype: Some(object_prototype),
        properties,
        constructor: None,
    })
}
