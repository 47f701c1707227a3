//! Built-in model of `Function` and `Function.prototype`

use std::collections::HashMap;

use id_arena::Arena;

use super::{
    constant, method, method_sig, BuiltInId, BuiltInObject, ConstructorSemantics, Property,
    Signature,
};
use crate::se::constraint::Constraint;

pub(super) fn prototype(arena: &mut Arena<BuiltInObject>, object_prototype: BuiltInId) -> BuiltInId {
    let mut properties = HashMap::new();
    properties.insert(
        "apply",
        method_sig(
            "apply",
            Constraint::ANY_VALUE,
            Signature::Fixed(&[Constraint::ANY_VALUE, Constraint::ARRAY]),
        ),
    );
    properties.insert("bind", method("bind", Constraint::FUNCTION));
    properties.insert("call", method("call", Constraint::ANY_VALUE));
    properties.insert("toString", method_sig("toString", Constraint::TRUTHY_STRING, Signature::Empty));
    properties.insert(
        "length",
        constant(Constraint::POSITIVE_NUMBER.or(Constraint::ZERO)),
    );
    properties.insert("name", constant(Constraint::STRING_PRIMITIVE));

    arena.alloc(BuiltInObject {
        name: "Function.prototype",
        base_constraint: Constraint::FUNCTION,
        prototype: Some(object_prototype),
        constructor: None,
        properties,
    })
}

pub(super) fn constructor(
    arena: &mut Arena<BuiltInObject>,
    function_prototype: BuiltInId,
) -> BuiltInId {
    let mut properties = HashMap::new();
    properties.insert("prototype", Property::Object(function_prototype));

    arena.alloc(BuiltInObject {
        name: "Function",
        base_constraint: Constraint::FUNCTION,
        prototype: Some(function_prototype),
        constructor: Some(ConstructorSemantics {
            prototype_of_instances: function_prototype,
            constraint_on_returned_value: Constraint::FUNCTION,
        }),
        properties,
    })
}
