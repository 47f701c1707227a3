//! Built-in model of `RegExp` and `RegExp.prototype`

use std::collections::HashMap;

use id_arena::Arena;

use super::{
    constant, method_sig, recent_constant, BuiltInId, BuiltInObject, ConstructorSemantics,
    Property, Signature, ONE_STRING,
};
use crate::se::constraint::Constraint;

pub(super) fn prototype(arena: &mut Arena<BuiltInObject>, object_prototype: BuiltInId) -> BuiltInId {
    let mut properties = HashMap::new();

    // No match yields null.
    properties.insert(
        "exec",
        method_sig(
            "exec",
            Constraint::ARRAY.or(Constraint::NULL),
            Signature::Fixed(ONE_STRING),
        ),
    );
    properties.insert(
        "test",
        method_sig("test", Constraint::ANY_BOOLEAN, Signature::Fixed(ONE_STRING)),
    );
    properties.insert(
        "toString",
        method_sig("toString", Constraint::TRUTHY_STRING, Signature::Empty),
    );

    properties.insert("flags", recent_constant(Constraint::STRING_PRIMITIVE));
    properties.insert("global", constant(Constraint::ANY_BOOLEAN));
    properties.insert("ignoreCase", constant(Constraint::ANY_BOOLEAN));
    properties.insert(
        "lastIndex",
        constant(Constraint::POSITIVE_NUMBER.or(Constraint::ZERO)),
    );
    properties.insert("multiline", constant(Constraint::ANY_BOOLEAN));
    properties.insert("source", constant(Constraint::TRUTHY_STRING));
    properties.insert("sticky", recent_constant(Constraint::ANY_BOOLEAN));
    properties.insert("unicode", recent_constant(Constraint::ANY_BOOLEAN));

    arena.alloc(BuiltInObject {
        name: "RegExp.prototype",
        base_constraint: Constraint::REGEXP,
        prototype: Some(object_prototype),
        constructor: None,
        properties,
    })
}

pub(super) fn constructor(
    arena: &mut Arena<BuiltInObject>,
    function_prototype: BuiltInId,
    regexp_prototype: BuiltInId,
) -> BuiltInId {
    let mut properties = HashMap::new();
    properties.insert("prototype", Property::Object(regexp_prototype));

    arena.alloc(BuiltInObject {
        name: "RegExp",
        base_constraint: Constraint::FUNCTION,
        prototype: Some(function_prototype),
        constructor: Some(ConstructorSemantics {
            prototype_of_instances: regexp_prototype,
            constraint_on_returned_value: Constraint::REGEXP,
        }),
        properties,
    })
}
