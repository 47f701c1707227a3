//! Built-in model of `Number` and `Number.prototype`

use std::collections::HashMap;

use id_arena::Arena;

use super::{
    constant, method_sig, recent_constant, type_test, BuiltInId, BuiltInObject,
    ConstructorSemantics, Property, Signature, ONE_ANY, ONE_NUMBER, ONE_STRING,
};
use crate::se::constraint::Constraint;

pub(super) fn prototype(arena: &mut Arena<BuiltInObject>, object_prototype: BuiltInId) -> BuiltInId {
    let mut properties = HashMap::new();

    // Formatting a number never yields an empty string.
    properties.insert(
        "toExponential",
        method_sig("toExponential", Constraint::TRUTHY_STRING, Signature::Fixed(ONE_NUMBER)),
    );
    properties.insert(
        "toFixed",
        method_sig("toFixed", Constraint::TRUTHY_STRING, Signature::Fixed(ONE_NUMBER)),
    );
    properties.insert(
        "toLocaleString",
        method_sig("toLocaleString", Constraint::TRUTHY_STRING, Signature::Fixed(ONE_STRING)),
    );
    properties.insert(
        "toPrecision",
        method_sig("toPrecision", Constraint::TRUTHY_STRING, Signature::Fixed(ONE_NUMBER)),
    );
    properties.insert(
        "toString",
        method_sig("toString", Constraint::TRUTHY_STRING, Signature::Fixed(ONE_NUMBER)),
    );
    properties.insert(
        "valueOf",
        method_sig("valueOf", Constraint::NUMBER_PRIMITIVE, Signature::Empty),
    );

    arena.alloc(BuiltInObject {
        name: "Number.prototype",
        base_constraint: Constraint::OTHER_OBJECT,
        prototype: Some(object_prototype),
        constructor: None,
        properties,
    })
}

pub(super) fn constructor(
    arena: &mut Arena<BuiltInObject>,
    function_prototype: BuiltInId,
    number_prototype: BuiltInId,
) -> BuiltInId {
    let mut properties = HashMap::new();
    properties.insert("prototype", Property::Object(number_prototype));

    properties.insert("EPSILON", recent_constant(Constraint::TRUTHY_NUMBER_PRIMITIVE));
    properties.insert(
        "MAX_SAFE_INTEGER",
        recent_constant(Constraint::TRUTHY_NUMBER_PRIMITIVE),
    );
    properties.insert("MAX_VALUE", constant(Constraint::TRUTHY_NUMBER_PRIMITIVE));
    properties.insert(
        "MIN_SAFE_INTEGER",
        recent_constant(Constraint::TRUTHY_NUMBER_PRIMITIVE),
    );
    properties.insert("MIN_VALUE", constant(Constraint::TRUTHY_NUMBER_PRIMITIVE));
    properties.insert("NaN", constant(Constraint::NAN));
    properties.insert(
        "NEGATIVE_INFINITY",
        constant(Constraint::TRUTHY_NUMBER_PRIMITIVE),
    );
    properties.insert(
        "POSITIVE_INFINITY",
        constant(Constraint::TRUTHY_NUMBER_PRIMITIVE),
    );

    properties.insert(
        "isFinite",
        method_sig("isFinite", Constraint::ANY_BOOLEAN, Signature::Fixed(ONE_ANY)),
    );
    properties.insert(
        "isInteger",
        method_sig("isInteger", Constraint::ANY_BOOLEAN, Signature::Fixed(ONE_ANY)),
    );
    properties.insert("isNaN", type_test("isNaN", Constraint::NAN));
    properties.insert(
        "isSafeInteger",
        method_sig("isSafeInteger", Constraint::ANY_BOOLEAN, Signature::Fixed(ONE_ANY)),
    );
    properties.insert(
        "parseFloat",
        method_sig("parseFloat", Constraint::NUMBER_PRIMITIVE, Signature::Fixed(ONE_ANY)),
    );
    properties.insert(
        "parseInt",
        method_sig(
            "parseInt",
            Constraint::NUMBER_PRIMITIVE,
            Signature::Fixed(super::VALUE_AND_RADIX),
        ),
    );

    arena.alloc(BuiltInObject {
        name: "Number",
        base_constraint: Constraint::FUNCTION,
        prototype: Some(function_prototype),
        constructor: Some(ConstructorSemantics {
            prototype_of_instances: number_prototype,
            constraint_on_returned_value: Constraint::NUMBER_PRIMITIVE,
        }),
        properties,
    })
}
