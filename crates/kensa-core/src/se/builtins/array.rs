//! Built-in model of `Array` and `Array.prototype`

use std::collections::HashMap;

use id_arena::Arena;

use super::{
    constant, method, method_sig, mutator, mutator_sig, type_test, BuiltInId, BuiltInObject,
    ConstructorSemantics, Property, Signature, CALLBACK, ONE_STRING, TWO_NUMBERS, VALUE_AND_RADIX,
};
use crate::se::constraint::Constraint;

pub(super) fn prototype(arena: &mut Arena<BuiltInObject>, object_prototype: BuiltInId) -> BuiltInId {
    let mut properties = HashMap::new();

    properties.insert(
        "length",
        constant(Constraint::POSITIVE_NUMBER.or(Constraint::ZERO)),
    );

    properties.insert("concat", method("concat", Constraint::ARRAY));
    properties.insert("copyWithin", mutator("copyWithin", Constraint::ARRAY));
    properties.insert("entries", method_sig("entries", Constraint::OTHER_OBJECT, Signature::Empty));
    properties.insert(
        "every",
        method_sig("every", Constraint::ANY_BOOLEAN, Signature::Fixed(CALLBACK)),
    );
    properties.insert("fill", mutator("fill", Constraint::ARRAY));
    properties.insert(
        "filter",
        method_sig("filter", Constraint::ARRAY, Signature::Fixed(CALLBACK)),
    );
    // The array may not contain a matching element.
    properties.insert(
        "find",
        method_sig("find", Constraint::ANY_VALUE, Signature::Fixed(CALLBACK)),
    );
    properties.insert(
        "findIndex",
        method_sig("findIndex", Constraint::NUMBER_PRIMITIVE, Signature::Fixed(CALLBACK)),
    );
    properties.insert(
        "forEach",
        method_sig("forEach", Constraint::UNDEFINED, Signature::Fixed(CALLBACK)),
    );
    properties.insert("includes", method("includes", Constraint::ANY_BOOLEAN));
    // Can be -1, 0 or positive.
    properties.insert(
        "indexOf",
        method_sig("indexOf", Constraint::NUMBER_PRIMITIVE, Signature::Fixed(VALUE_AND_RADIX)),
    );
    properties.insert(
        "join",
        method_sig("join", Constraint::STRING_PRIMITIVE, Signature::Fixed(ONE_STRING)),
    );
    properties.insert("keys", method_sig("keys", Constraint::OTHER_OBJECT, Signature::Empty));
    properties.insert(
        "lastIndexOf",
        method_sig(
            "lastIndexOf",
            Constraint::NUMBER_PRIMITIVE,
            Signature::Fixed(VALUE_AND_RADIX),
        ),
    );
    properties.insert(
        "map",
        method_sig("map", Constraint::ARRAY, Signature::Fixed(CALLBACK)),
    );
    // The array may be empty.
    properties.insert("pop", mutator_sig("pop", Constraint::ANY_VALUE, Signature::Empty));
    properties.insert("push", mutator("push", Constraint::POSITIVE_NUMBER));
    properties.insert(
        "reduce",
        method_sig("reduce", Constraint::ANY_VALUE, Signature::Fixed(CALLBACK)),
    );
    properties.insert(
        "reduceRight",
        method_sig("reduceRight", Constraint::ANY_VALUE, Signature::Fixed(CALLBACK)),
    );
    properties.insert("reverse", mutator_sig("reverse", Constraint::ARRAY, Signature::Empty));
    properties.insert("shift", mutator_sig("shift", Constraint::ANY_VALUE, Signature::Empty));
    properties.insert(
        "slice",
        method_sig("slice", Constraint::ARRAY, Signature::Fixed(TWO_NUMBERS)),
    );
    properties.insert(
        "some",
        method_sig("some", Constraint::ANY_BOOLEAN, Signature::Fixed(CALLBACK)),
    );
    properties.insert(
        "sort",
        mutator_sig("sort", Constraint::ARRAY, Signature::Fixed(&[Constraint::FUNCTION])),
    );
    properties.insert("splice", mutator("splice", Constraint::ARRAY));
    properties.insert("toString", method_sig("toString", Constraint::STRING_PRIMITIVE, Signature::Empty));
    properties.insert(
        "unshift",
        mutator("unshift", Constraint::POSITIVE_NUMBER.or(Constraint::ZERO)),
    );
    properties.insert("values", method_sig("values", Constraint::OTHER_OBJECT, Signature::Empty));

    arena.alloc(BuiltInObject {
        name: "Array.prototype",
        base_constraint: Constraint::ARRAY,
        prototype: Some(object_prototype),
        constructor: None,
        properties,
    })
}

pub(super) fn constructor(
    arena: &mut Arena<BuiltInObject>,
    function_prototype: BuiltInId,
    array_prototype: BuiltInId,
) -> BuiltInId {
    let mut properties = HashMap::new();
    properties.insert("prototype", Property::Object(array_prototype));
    properties.insert("isArray", type_test("isArray", Constraint::ARRAY));
    properties.insert("from", method("from", Constraint::ARRAY));
    properties.insert("of", method("of", Constraint::ARRAY));

    arena.alloc(BuiltInObject {
        name: "Array",
        base_constraint: Constraint::FUNCTION,
        prototype: Some(function_prototype),
        constructor: Some(ConstructorSemantics {
            prototype_of_instances: array_prototype,
            constraint_on_returned_value: Constraint::ARRAY,
        }),
        properties,
    })
}
