//! Built-in model of `Date` and `Date.prototype`

use std::collections::HashMap;

use id_arena::Arena;

use super::{
    method, method_sig, mutator, BuiltInId, BuiltInObject, ConstructorSemantics, Property,
    Signature,
};
use crate::se::constraint::Constraint;

pub(super) fn prototype(arena: &mut Arena<BuiltInObject>, object_prototype: BuiltInId) -> BuiltInId {
    let mut properties = HashMap::new();

    // Day of month is 1..=31, never zero.
    properties.insert(
        "getDate",
        method_sig("getDate", Constraint::TRUTHY_NUMBER_PRIMITIVE, Signature::Empty),
    );
    properties.insert(
        "getUTCDate",
        method_sig("getUTCDate", Constraint::TRUTHY_NUMBER_PRIMITIVE, Signature::Empty),
    );
    for name in [
        "getDay",
        "getFullYear",
        "getHours",
        "getMilliseconds",
        "getMinutes",
        "getMonth",
        "getSeconds",
        "getTime",
        "getTimezoneOffset",
        "getUTCDay",
        "getUTCFullYear",
        "getUTCHours",
        "getUTCMilliseconds",
        "getUTCMinutes",
        "getUTCMonth",
        "getUTCSeconds",
        "valueOf",
    ] {
        properties.insert(
            name,
            method_sig(name, Constraint::NUMBER_PRIMITIVE, Signature::Empty),
        );
    }

    for name in [
        "setDate",
        "setFullYear",
        "setHours",
        "setMilliseconds",
        "setMinutes",
        "setMonth",
        "setSeconds",
        "setTime",
        "setUTCDate",
        "setUTCFullYear",
        "setUTCHours",
        "setUTCMilliseconds",
        "setUTCMinutes",
        "setUTCMonth",
        "setUTCSeconds",
    ] {
        properties.insert(name, mutator(name, Constraint::NUMBER_PRIMITIVE));
    }

    for name in [
        "toDateString",
        "toISOString",
        "toJSON",
        "toLocaleDateString",
        "toLocaleString",
        "toLocaleTimeString",
        "toString",
        "toTimeString",
        "toUTCString",
    ] {
        properties.insert(name, method(name, Constraint::TRUTHY_STRING));
    }

    arena.alloc(BuiltInObject {
        name: "Date.prototype",
        base_constraint: Constraint::DATE,
        prototype: Some(object_prototype),
        constructor: None,
        properties,
    })
}

pub(super) fn constructor(
    arena: &mut Arena<BuiltInObject>,
    function_prototype: BuiltInId,
    date_prototype: BuiltInId,
) -> BuiltInId {
    let mut properties = HashMap::new();
    properties.insert("prototype", Property::Object(date_prototype));
    properties.insert(
        "now",
        method_sig("now", Constraint::TRUTHY_NUMBER_PRIMITIVE, Signature::Empty),
    );
    // NaN for unparseable input.
    properties.insert(
        "parse",
        method_sig("parse", Constraint::NUMBER_PRIMITIVE, Signature::Fixed(super::ONE_STRING)),
    );
    properties.insert("UTC", method("UTC", Constraint::NUMBER_PRIMITIVE));

    arena.alloc(BuiltInObject {
        name: "Date",
        base_constraint: Constraint::FUNCTION,
        prototype: Some(function_prototype),
        constructor: Some(ConstructorSemantics {
            prototype_of_instances: date_prototype,
            // Calling Date without new yields a string.
            constraint_on_returned_value: Constraint::TRUTHY_STRING,
        }),
        properties,
    })
}
