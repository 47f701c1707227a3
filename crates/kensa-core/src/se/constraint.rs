//! Constraint lattice over the possible runtime shapes of a value
//!
//! A constraint is a bitset over a fixed, finite family of disjoint basic
//! kinds. Narrowing intersects bitsets, joining unions them, and branch
//! negation complements within the full set, so every lattice query is an
//! exact O(1) bit comparison.

use bitflags::bitflags;
use serde::Serialize;
use swc_ecma_ast::{Expr, Lit};

bitflags! {
    /// Set of basic runtime kinds a value may have at a program point.
    ///
    /// The basic kinds are pairwise disjoint and cover every JavaScript
    /// value, so the complement of a constraint is itself a constraint.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Constraint: u16 {
        const UNDEFINED = 1 << 0;
        const NULL = 1 << 1;
        const NAN = 1 << 2;
        const ZERO = 1 << 3;
        const TRUTHY_NUMBER = 1 << 4;
        const EMPTY_STRING = 1 << 5;
        const TRUTHY_STRING = 1 << 6;
        const TRUE = 1 << 7;
        const FALSE = 1 << 8;
        const FUNCTION = 1 << 9;
        const ARRAY = 1 << 10;
        const DATE = 1 << 11;
        const REGEXP = 1 << 12;
        const OTHER_OBJECT = 1 << 13;
    }
}

impl Constraint {
    pub const ANY_VALUE: Constraint = Constraint::all();
    /// The bottom of the lattice. A value constrained to this set cannot
    /// exist; program states never store it (see `ProgramState::constrain`).
    pub const NO_POSSIBLE_VALUE: Constraint = Constraint::empty();

    pub const NULL_OR_UNDEFINED: Constraint = Self::NULL.union(Self::UNDEFINED);
    pub const NOT_NULLY: Constraint = Self::NULL_OR_UNDEFINED.complement();

    pub const ANY_NUMBER: Constraint = Self::NAN.union(Self::ZERO).union(Self::TRUTHY_NUMBER);
    pub const NUMBER_PRIMITIVE: Constraint = Self::ANY_NUMBER;
    pub const TRUTHY_NUMBER_PRIMITIVE: Constraint = Self::TRUTHY_NUMBER;
    /// Sign below truthiness is not tracked: a strictly positive number is
    /// approximated by the truthy-number kind.
    pub const POSITIVE_NUMBER: Constraint = Self::TRUTHY_NUMBER;

    pub const STRING_PRIMITIVE: Constraint = Self::EMPTY_STRING.union(Self::TRUTHY_STRING);
    pub const ANY_BOOLEAN: Constraint = Self::TRUE.union(Self::FALSE);

    pub const OBJECT: Constraint = Self::FUNCTION
        .union(Self::ARRAY)
        .union(Self::DATE)
        .union(Self::REGEXP)
        .union(Self::OTHER_OBJECT);

    pub const TRUTHY: Constraint = Self::TRUE
        .union(Self::TRUTHY_NUMBER)
        .union(Self::TRUTHY_STRING)
        .union(Self::OBJECT);
    pub const FALSY: Constraint = Self::TRUTHY.complement();

    /// Union (join) of two constraints.
    pub fn or(self, other: Constraint) -> Constraint {
        self | other
    }

    /// Complement within `ANY_VALUE`: the constraint satisfied exactly by
    /// the values this constraint excludes.
    pub fn not(self) -> Constraint {
        self.complement()
    }

    /// Subset test: is this constraint a refinement of `other`?
    pub fn is_stricter_or_equal_to(self, other: Constraint) -> bool {
        other.contains(self)
    }

    /// True iff no value can satisfy both constraints.
    pub fn is_incompatible_with(self, other: Constraint) -> bool {
        (self & other).is_empty()
    }

    /// True iff exactly one basic kind is possible.
    pub fn is_single_kind(self) -> bool {
        self.bits().count_ones() == 1
    }

    pub fn truthiness(self) -> Truthiness {
        if self.is_stricter_or_equal_to(Self::TRUTHY) {
            Truthiness::Truthy
        } else if self.is_stricter_or_equal_to(Self::FALSY) {
            Truthiness::Falsy
        } else {
            Truthiness::Unknown
        }
    }

    pub fn nullability(self) -> Nullability {
        if self.is_stricter_or_equal_to(Self::NULL_OR_UNDEFINED) {
            Nullability::Null
        } else if self.is_incompatible_with(Self::NULL_OR_UNDEFINED) {
            Nullability::NotNull
        } else {
            Nullability::Unknown
        }
    }

    /// Constraint for a property standardized recently enough that older
    /// engines may not provide it: the property's value, or `undefined`.
    pub fn for_recent_property(self) -> Constraint {
        self | Self::UNDEFINED
    }

    /// Maps the string compared against `typeof x` to the constraint
    /// satisfied when the comparison holds. Unknown strings (including
    /// misspellings, which make the comparison always false) yield `None`.
    pub fn for_typeof_string(type_name: &str) -> Option<Constraint> {
        match type_name {
            "undefined" => Some(Self::UNDEFINED),
            "function" => Some(Self::FUNCTION),
            "object" => Some(
                Self::NULL | Self::ARRAY | Self::DATE | Self::REGEXP | Self::OTHER_OBJECT,
            ),
            "number" => Some(Self::ANY_NUMBER),
            "string" => Some(Self::STRING_PRIMITIVE),
            "boolean" => Some(Self::ANY_BOOLEAN),
            _ => None,
        }
    }

    pub fn from_literal(lit: &Lit) -> Constraint {
        match lit {
            Lit::Null(_) => Self::NULL,
            Lit::Bool(b) => {
                if b.value {
                    Self::TRUE
                } else {
                    Self::FALSE
                }
            }
            Lit::Num(n) => {
                if n.value == 0.0 {
                    Self::ZERO
                } else {
                    Self::TRUTHY_NUMBER
                }
            }
            Lit::BigInt(b) => {
                if b.value.to_string() == "0" {
                    Self::ZERO
                } else {
                    Self::TRUTHY_NUMBER
                }
            }
            Lit::Str(s) => {
                if s.value.is_empty() {
                    Self::EMPTY_STRING
                } else {
                    Self::TRUTHY_STRING
                }
            }
            Lit::Regex(_) => Self::REGEXP,
            Lit::JSXText(_) => Self::STRING_PRIMITIVE,
        }
    }

    /// Constraint of a literal-shaped expression, if its value is known
    /// without evaluation: literals, `undefined`, `NaN`, `Infinity`, and
    /// parenthesized forms thereof.
    pub fn from_expr(expr: &Expr) -> Option<Constraint> {
        match expr {
            Expr::Lit(lit) => Some(Self::from_literal(lit)),
            Expr::Ident(ident) => match ident.sym.as_ref() {
                "undefined" => Some(Self::UNDEFINED),
                "NaN" => Some(Self::NAN),
                "Infinity" => Some(Self::TRUTHY_NUMBER),
                _ => None,
            },
            Expr::Paren(paren) => Self::from_expr(&paren.expr),
            Expr::Tpl(tpl) if tpl.exprs.is_empty() => {
                let raw_empty = tpl.quasis.iter().all(|q| q.raw.is_empty());
                Some(if raw_empty {
                    Self::EMPTY_STRING
                } else {
                    Self::TRUTHY_STRING
                })
            }
            _ => None,
        }
    }
}

/// Whether a value is known to coerce to `true`, to `false`, or to either.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Truthiness {
    Truthy,
    Falsy,
    Unknown,
}

/// Whether a value is known to be `null`/`undefined`, known not to be, or
/// unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Nullability {
    Null,
    NotNull,
    Unknown,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_basic_kinds() -> Vec<Constraint> {
        Constraint::ANY_VALUE.iter().collect()
    }

    #[test]
    fn basic_kinds_are_disjoint_and_cover_any_value() {
        let kinds = all_basic_kinds();
        assert_eq!(kinds.len(), 14);

        let mut union = Constraint::NO_POSSIBLE_VALUE;
        for (i, a) in kinds.iter().enumerate() {
            for b in &kinds[i + 1..] {
                assert!(a.is_incompatible_with(*b));
            }
            union = union.or(*a);
        }
        assert_eq!(union, Constraint::ANY_VALUE);
    }

    #[test]
    fn or_is_commutative_associative_idempotent() {
        let a = Constraint::TRUTHY;
        let b = Constraint::NULL_OR_UNDEFINED;
        let c = Constraint::ANY_NUMBER;

        assert_eq!(a.or(b), b.or(a));
        assert_eq!(a.or(b).or(c), a.or(b.or(c)));
        assert_eq!(a.or(a), a);
    }

    #[test]
    fn not_is_an_involution() {
        for c in [
            Constraint::TRUTHY,
            Constraint::NULL,
            Constraint::OBJECT,
            Constraint::ANY_VALUE,
            Constraint::NO_POSSIBLE_VALUE,
        ] {
            assert_eq!(c.not().not(), c);
            assert_eq!(c.or(c.not()), Constraint::ANY_VALUE);
        }
    }

    #[test]
    fn any_value_not_is_bottom() {
        assert_eq!(Constraint::ANY_VALUE.not(), Constraint::NO_POSSIBLE_VALUE);
    }

    #[test]
    fn stricter_or_equal_holds_for_join() {
        let a = Constraint::ARRAY;
        let b = Constraint::STRING_PRIMITIVE;
        assert!(a.is_stricter_or_equal_to(a.or(b)));
        assert!(a.is_stricter_or_equal_to(a));
        assert!(!a.or(b).is_stricter_or_equal_to(a));
    }

    #[test]
    fn truthy_and_falsy_partition_any_value() {
        assert_eq!(Constraint::TRUTHY.or(Constraint::FALSY), Constraint::ANY_VALUE);
        assert!(Constraint::TRUTHY.is_incompatible_with(Constraint::FALSY));
        assert_eq!(Constraint::FALSY, Constraint::TRUTHY.not());
    }

    #[test]
    fn derived_constants_are_unions_of_basic_kinds() {
        assert_eq!(
            Constraint::ANY_NUMBER,
            Constraint::NAN | Constraint::ZERO | Constraint::TRUTHY_NUMBER
        );
        assert_eq!(Constraint::NUMBER_PRIMITIVE, Constraint::ANY_NUMBER);
        assert_eq!(
            Constraint::OBJECT,
            Constraint::FUNCTION
                | Constraint::ARRAY
                | Constraint::DATE
                | Constraint::REGEXP
                | Constraint::OTHER_OBJECT
        );
        assert!(Constraint::FUNCTION.is_stricter_or_equal_to(Constraint::TRUTHY));
        assert!(Constraint::EMPTY_STRING.is_stricter_or_equal_to(Constraint::FALSY));
    }

    #[test]
    fn truthiness_of_constraints() {
        assert_eq!(Constraint::TRUE.truthiness(), Truthiness::Truthy);
        assert_eq!(Constraint::OBJECT.truthiness(), Truthiness::Truthy);
        assert_eq!(Constraint::NULL.truthiness(), Truthiness::Falsy);
        assert_eq!(Constraint::ZERO.or(Constraint::NAN).truthiness(), Truthiness::Falsy);
        assert_eq!(Constraint::ANY_NUMBER.truthiness(), Truthiness::Unknown);
        assert_eq!(Constraint::ANY_VALUE.truthiness(), Truthiness::Unknown);
    }

    #[test]
    fn nullability_of_constraints() {
        assert_eq!(Constraint::NULL.nullability(), Nullability::Null);
        assert_eq!(Constraint::NULL_OR_UNDEFINED.nullability(), Nullability::Null);
        assert_eq!(Constraint::OBJECT.nullability(), Nullability::NotNull);
        assert_eq!(Constraint::ANY_VALUE.nullability(), Nullability::Unknown);
    }

    #[test]
    fn single_kind_detection() {
        assert!(Constraint::NULL.is_single_kind());
        assert!(Constraint::NAN.is_single_kind());
        assert!(!Constraint::NULL_OR_UNDEFINED.is_single_kind());
        assert!(!Constraint::NO_POSSIBLE_VALUE.is_single_kind());
    }

    #[test]
    fn recent_property_admits_undefined() {
        let epsilon = Constraint::TRUTHY_NUMBER_PRIMITIVE.for_recent_property();
        assert_eq!(
            epsilon,
            Constraint::TRUTHY_NUMBER_PRIMITIVE.or(Constraint::UNDEFINED)
        );
        assert_eq!(epsilon.nullability(), Nullability::Unknown);
    }

    #[test]
    fn typeof_strings_map_to_constraints() {
        assert_eq!(
            Constraint::for_typeof_string("undefined"),
            Some(Constraint::UNDEFINED)
        );
        assert_eq!(
            Constraint::for_typeof_string("function"),
            Some(Constraint::FUNCTION)
        );
        assert_eq!(
            Constraint::for_typeof_string("number"),
            Some(Constraint::ANY_NUMBER)
        );
        assert_eq!(Constraint::for_typeof_string("symbol"), None);

        // typeof null is "object"; typeof of a function is not.
        let object = Constraint::for_typeof_string("object").unwrap();
        assert!(Constraint::NULL.is_stricter_or_equal_to(object));
        assert!(!Constraint::FUNCTION.is_stricter_or_equal_to(object));
    }

    #[test]
    fn literal_constraints_distinguish_falsy_forms() {
        use swc_common::DUMMY_SP;
        use swc_ecma_ast::{Bool, Null, Number, Str};

        let zero = Lit::Num(Number {
            span: DUMMY_SP,
            value: 0.0,
            raw: None,
        });
        let one = Lit::Num(Number {
            span: DUMMY_SP,
            value: 1.0,
            raw: None,
        });
        let empty = Lit::Str(Str {
            span: DUMMY_SP,
            value: "".into(),
            raw: None,
        });
        let full = Lit::Str(Str {
            span: DUMMY_SP,
            value: "x".into(),
            raw: None,
        });

        assert_eq!(Constraint::from_literal(&zero), Constraint::ZERO);
        assert_eq!(Constraint::from_literal(&one), Constraint::TRUTHY_NUMBER);
        assert_eq!(Constraint::from_literal(&empty), Constraint::EMPTY_STRING);
        assert_eq!(Constraint::from_literal(&full), Constraint::TRUTHY_STRING);
        assert_eq!(
            Constraint::from_literal(&Lit::Null(Null { span: DUMMY_SP })),
            Constraint::NULL
        );
        assert_eq!(
            Constraint::from_literal(&Lit::Bool(Bool {
                span: DUMMY_SP,
                value: false,
            })),
            Constraint::FALSE
        );
    }
}
