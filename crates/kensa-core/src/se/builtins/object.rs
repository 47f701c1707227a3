//! Built-in model of `Object` and `Object.prototype`

use std::collections::HashMap;

use id_arena::Arena;

use super::{
    method, method_sig, ArgumentsConstrainer, BuiltInId, BuiltInObject, ConstructorSemantics,
    Method, Property, Signature, ONE_ANY, TWO_ANY,
};
use crate::se::constraint::Constraint;

pub(super) fn prototype(arena: &mut Arena<BuiltInObject>) -> BuiltInId {
    let mut properties = HashMap::new();
    properties.insert(
        "hasOwnProperty",
        method_sig("hasOwnProperty", Constraint::ANY_BOOLEAN, Signature::Fixed(ONE_ANY)),
    );
    properties.insert(
        "isPrototypeOf",
        method_sig("isPrototypeOf", Constraint::ANY_BOOLEAN, Signature::Fixed(ONE_ANY)),
    );
    properties.insert(
        "propertyIsEnumerable",
        method_sig(
            "propertyIsEnumerable",
            Constraint::ANY_BOOLEAN,
            Signature::Fixed(ONE_ANY),
        ),
    );
    properties.insert(
        "toLocaleString",
        method("toLocaleString", Constraint::STRING_PRIMITIVE),
    );
    // "[object X]" is never empty.
    properties.insert("toString", method("toString", Constraint::TRUTHY_STRING));
    properties.insert("valueOf", method("valueOf", Constraint::ANY_VALUE));

    arena.alloc(BuiltInObject {
        name: "Object.prototype",
        base_constraint: Constraint::OTHER_OBJECT,
        prototype: None,
        constructor: None,
        properties,
    })
}

pub(super) fn constructor(
    arena: &mut Arena<BuiltInObject>,
    function_prototype: BuiltInId,
    object_prototype: BuiltInId,
) -> BuiltInId {
    let mut properties = HashMap::new();
    properties.insert("prototype", Property::Object(object_prototype));

    properties.insert(
        "assign",
        method_sig(
            "assign",
            Constraint::OBJECT,
            Signature::Variadic {
                head: &[Constraint::OBJECT],
                rest: Constraint::ANY_VALUE,
            },
        ),
    );
    properties.insert("create", method_sig("create", Constraint::OBJECT, Signature::Fixed(TWO_ANY)));
    properties.insert("defineProperty", method("defineProperty", Constraint::OBJECT));
    properties.insert("defineProperties", method("defineProperties", Constraint::OBJECT));
    properties.insert("entries", method_sig("entries", Constraint::ARRAY, Signature::Fixed(ONE_ANY)));
    properties.insert("freeze", method_sig("freeze", Constraint::OBJECT, Signature::Fixed(ONE_ANY)));
    properties.insert(
        "getOwnPropertyDescriptor",
        method(
            "getOwnPropertyDescriptor",
            Constraint::OTHER_OBJECT.or(Constraint::UNDEFINED),
        ),
    );
    properties.insert(
        "getOwnPropertyNames",
        method_sig("getOwnPropertyNames", Constraint::ARRAY, Signature::Fixed(ONE_ANY)),
    );
    properties.insert(
        "getOwnPropertySymbols",
        method_sig("getOwnPropertySymbols", Constraint::ARRAY, Signature::Fixed(ONE_ANY)),
    );
    properties.insert(
        "getPrototypeOf",
        method_sig(
            "getPrototypeOf",
            Constraint::OBJECT.or(Constraint::NULL),
            Signature::Fixed(ONE_ANY),
        ),
    );
    properties.insert(
        "is",
        Property::Method(Method {
            name: "is",
            constraint_on_return: Constraint::ANY_BOOLEAN,
            signature: Signature::Fixed(TWO_ANY),
            constrainer: Some(ArgumentsConstrainer::SameValue),
            has_side_effect: false,
        }),
    );
    properties.insert(
        "isExtensible",
        method_sig("isExtensible", Constraint::ANY_BOOLEAN, Signature::Fixed(ONE_ANY)),
    );
    properties.insert(
        "isFrozen",
        method_sig("isFrozen", Constraint::ANY_BOOLEAN, Signature::Fixed(ONE_ANY)),
    );
    properties.insert(
        "isSealed",
        method_sig("isSealed", Constraint::ANY_BOOLEAN, Signature::Fixed(ONE_ANY)),
    );
    properties.insert("keys", method_sig("keys", Constraint::ARRAY, Signature::Fixed(ONE_ANY)));
    properties.insert(
        "preventExtensions",
        method_sig("preventExtensions", Constraint::OBJECT, Signature::Fixed(ONE_ANY)),
    );
    properties.insert("seal", method_sig("seal", Constraint::OBJECT, Signature::Fixed(ONE_ANY)));
    properties.insert("setPrototypeOf", method("setPrototypeOf", Constraint::OBJECT));
    properties.insert("values", method_sig("values", Constraint::ARRAY, Signature::Fixed(ONE_ANY)));

    arena.alloc(BuiltInObject {
        name: "Object",
        base_constraint: Constraint::FUNCTION,
        prototype: Some(function_prototype),
        constructor: Some(ConstructorSemantics {
            prototype_of_instances: object_prototype,
            constraint_on_returned_value: Constraint::OBJECT,
        }),
        properties,
    })
}
