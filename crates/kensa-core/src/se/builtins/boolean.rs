//! Built-in model of `Boolean` and `Boolean.prototype`

use std::collections::HashMap;

use id_arena::Arena;

use super::{
    method_sig, BuiltInId, BuiltInObject, ConstructorSemantics, Property, Signature,
};
use crate::se::constraint::Constraint;

pub(super) fn prototype(arena: &mut Arena<BuiltInObject>, object_prototype: BuiltInId) -> BuiltInId {
    let mut properties = HashMap::new();
    properties.insert(
        "toString",
        method_sig("toString", Constraint::TRUTHY_STRING, Signature::Empty),
    );
    properties.insert(
        "valueOf",
        method_sig("valueOf", Constraint::ANY_BOOLEAN, Signature::Empty),
    );

    arena.alloc(BuiltInObject {
        name: "Boolean.prototype",
        base_constraint: Constraint::OTHER_OBJECT,
        prototype: Some(object_prototype),
        constructor: None,
        properties,
    })
}

pub(super) fn constructor(
    arena: &mut Arena<BuiltInObject>,
    function_prototype: BuiltInId,
    boolean_prototype: BuiltInId,
) -> BuiltInId {
    let mut properties = HashMap::new();
    properties.insert("prototype", Property::Object(boolean_prototype));

    arena.alloc(BuiltInObject {
        name: "Boolean",
        base_constraint: Constraint::FUNCTION,
        prototype: Some(function_prototype),
        constructor: Some(ConstructorSemantics {
            prototype_of_instances: boolean_prototype,
            constraint_on_returned_value: Constraint::ANY_BOOLEAN,
        }),
        properties,
    })
}
