//! Built-in model of `String` and `String.prototype`

use std::collections::HashMap;

use id_arena::Arena;

use super::{
    constant, method, method_sig, BuiltInId, BuiltInObject, ConstructorSemantics, Property,
    Signature, ONE_NUMBER, ONE_STRING, TWO_ANY, TWO_NUMBERS,
};
use crate::se::constraint::Constraint;

pub(super) fn prototype(arena: &mut Arena<BuiltInObject>, object_prototype: BuiltInId) -> BuiltInId {
    let mut properties = HashMap::new();

    properties.insert(
        "length",
        constant(Constraint::POSITIVE_NUMBER.or(Constraint::ZERO)),
    );

    properties.insert(
        "charAt",
        method_sig("charAt", Constraint::STRING_PRIMITIVE, Signature::Fixed(ONE_NUMBER)),
    );
    // NaN for out-of-range indices.
    properties.insert(
        "charCodeAt",
        method_sig("charCodeAt", Constraint::NUMBER_PRIMITIVE, Signature::Fixed(ONE_NUMBER)),
    );
    properties.insert(
        "codePointAt",
        method_sig(
            "codePointAt",
            Constraint::NUMBER_PRIMITIVE.or(Constraint::UNDEFINED),
            Signature::Fixed(ONE_NUMBER),
        ),
    );
    properties.insert("concat", method("concat", Constraint::STRING_PRIMITIVE));
    properties.insert("endsWith", method("endsWith", Constraint::ANY_BOOLEAN));
    properties.insert("includes", method("includes", Constraint::ANY_BOOLEAN));
    properties.insert(
        "indexOf",
        method_sig("indexOf", Constraint::NUMBER_PRIMITIVE, Signature::Fixed(ONE_STRING)),
    );
    properties.insert(
        "lastIndexOf",
        method_sig("lastIndexOf", Constraint::NUMBER_PRIMITIVE, Signature::Fixed(ONE_STRING)),
    );
    properties.insert(
        "localeCompare",
        method_sig("localeCompare", Constraint::NUMBER_PRIMITIVE, Signature::Fixed(ONE_STRING)),
    );
    // No match yields null.
    properties.insert(
        "match",
        method("match", Constraint::ARRAY.or(Constraint::NULL)),
    );
    properties.insert("normalize", method("normalize", Constraint::STRING_PRIMITIVE));
    properties.insert("padEnd", method("padEnd", Constraint::STRING_PRIMITIVE));
    properties.insert("padStart", method("padStart", Constraint::STRING_PRIMITIVE));
    properties.insert(
        "repeat",
        method_sig("repeat", Constraint::STRING_PRIMITIVE, Signature::Fixed(ONE_NUMBER)),
    );
    properties.insert(
        "replace",
        method_sig("replace", Constraint::STRING_PRIMITIVE, Signature::Fixed(TWO_ANY)),
    );
    properties.insert("search", method("search", Constraint::NUMBER_PRIMITIVE));
    properties.insert(
        "slice",
        method_sig("slice", Constraint::STRING_PRIMITIVE, Signature::Fixed(TWO_NUMBERS)),
    );
    properties.insert("split", method("split", Constraint::ARRAY));
    properties.insert("startsWith", method("startsWith", Constraint::ANY_BOOLEAN));
    properties.insert(
        "substr",
        method_sig("substr", Constraint::STRING_PRIMITIVE, Signature::Fixed(TWO_NUMBERS)),
    );
    properties.insert(
        "substring",
        method_sig("substring", Constraint::STRING_PRIMITIVE, Signature::Fixed(TWO_NUMBERS)),
    );
    properties.insert(
        "toLocaleLowerCase",
        method("toLocaleLowerCase", Constraint::STRING_PRIMITIVE),
    );
    properties.insert(
        "toLocaleUpperCase",
        method("toLocaleUpperCase", Constraint::STRING_PRIMITIVE),
    );
    properties.insert("toLowerCase", method("toLowerCase", Constraint::STRING_PRIMITIVE));
    properties.insert("toString", method_sig("toString", Constraint::STRING_PRIMITIVE, Signature::Empty));
    properties.insert("toUpperCase", method("toUpperCase", Constraint::STRING_PRIMITIVE));
    properties.insert("trim", method_sig("trim", Constraint::STRING_PRIMITIVE, Signature::Empty));
    properties.insert("valueOf", method_sig("valueOf", Constraint::STRING_PRIMITIVE, Signature::Empty));

    arena.alloc(BuiltInObject {
        name: "String.prototype",
        base_constraint: Constraint::OTHER_OBJECT,
        prototype: Some(object_prototype),
        constructor: None,
        properties,
    })
}

pub(super) fn constructor(
    arena: &mut Arena<BuiltInObject>,
    function_prototype: BuiltInId,
    string_prototype: BuiltInId,
) -> BuiltInId {
    let mut properties = HashMap::new();
    properties.insert("prototype", Property::Object(string_prototype));
    properties.insert("fromCharCode", method("fromCharCode", Constraint::STRING_PRIMITIVE));
    properties.insert("fromCodePoint", method("fromCodePoint", Constraint::STRING_PRIMITIVE));
    properties.insert("raw", method("raw", Constraint::STRING_PRIMITIVE));

    arena.alloc(BuiltInObject {
        name: "String",
        base_constraint: Constraint::FUNCTION,
        prototype: Some(function_prototype),
        constructor: Some(ConstructorSemantics {
            prototype_of_instances: string_prototype,
            constraint_on_returned_value: Constraint::STRING_PRIMITIVE,
        }),
        properties,
    })
}
