use super::{
    ConditionError, RangeCondition, Union, ValuePair, between, eq, ge, gt, le, lt,
};
use crate::db::codec::{EncodeValue, Opaque, ValueKind, encode};
use proptest::prelude::*;
use std::ops::Bound;

fn contains<V: EncodeValue>(cond: &RangeCondition, value: V) -> bool {
    let key = encode(&value).expect("value should encode");
    cond.pairs().iter().any(|pair| pair.contains(&key))
}

fn inc(value: i64) -> Bound<Vec<u8>> {
    Bound::Included(encode(&value).unwrap())
}

fn exc(value: i64) -> Bound<Vec<u8>> {
    Bound::Excluded(encode(&value).unwrap())
}

#[test]
fn and_of_nested_intervals_is_the_inner_one() {
    let inner = between(2i64, true, 4i64, true);
    let outer = between(1i64, true, 6i64, true);

    assert_eq!(inner.clone().and(outer), inner);
}

#[test]
fn and_of_disjoint_intervals_is_empty() {
    let result = between(2i64, true, 4i64, true).and(between(6i64, true, 8i64, true));

    assert!(result.is_empty());
    assert_eq!(result.kind(), Some(ValueKind::Int64));
    assert!(result.check().is_ok());
}

#[test]
fn or_is_idempotent() {
    let set = between(1i64, true, 3i64, false).or(between(5i64, false, 9i64, true));
    assert_eq!(set.clone().or(set.clone()), set);
}

#[test]
fn or_of_disjoint_sets_keeps_both_sorted() {
    let result = between(10i64, true, 12i64, true).or(between(1i64, true, 3i64, true));

    assert_eq!(result.pairs().len(), 2);
    assert_eq!(result.pairs()[0].lower(), &inc(1));
    assert_eq!(result.pairs()[1].upper(), &inc(12));
    assert!(result.is_canonical());
}

#[test]
fn or_merges_touching_intervals() {
    let result = between(1i64, true, 3i64, false).or(between(3i64, true, 5i64, true));

    assert_eq!(result.pairs(), &[ValuePair::new(inc(1), inc(5)).unwrap()]);
}

#[test]
fn or_keeps_gap_between_two_open_ends() {
    let result = between(1i64, true, 3i64, false).or(between(3i64, false, 5i64, true));

    assert_eq!(result.pairs().len(), 2);
    assert!(!contains(&result, 3i64));
    assert!(contains(&result, 2i64));
    assert!(contains(&result, 4i64));
}

#[test]
fn or_absorbs_a_chain_through_the_final_fold() {
    // [1,2] [4,5] [7,8] against (2,7): each left piece touches the right one
    let left = between(1i64, true, 2i64, true)
        .or(between(4i64, true, 5i64, true))
        .or(between(7i64, true, 8i64, true));
    let right = between(2i64, false, 7i64, false);

    let result = left.or(right);
    assert_eq!(result.pairs(), &[ValuePair::new(inc(1), inc(8)).unwrap()]);
}

#[test]
fn strict_and_inclusive_meet_at_a_point() {
    assert!(gt("2").and(le("2")).is_empty());

    let point = ge("2").and(le("2"));
    assert_eq!(point.pairs(), &[ValuePair::point(b"2".to_vec())]);
    assert_eq!(point.kind(), Some(ValueKind::Text));
}

#[test]
fn sentinel_helpers_are_half_open() {
    let below = lt(5i64);
    assert_eq!(below.pairs()[0].lower(), &Bound::Unbounded);
    assert_eq!(below.pairs()[0].upper(), &exc(5));

    let above = gt(5i64);
    assert_eq!(above.pairs()[0].lower(), &exc(5));
    assert_eq!(above.pairs()[0].upper(), &Bound::Unbounded);
}

#[test]
fn between_collapses_inverted_and_zero_width_ranges() {
    assert!(between(5i64, true, 1i64, true).is_empty());
    assert!(between(3i64, true, 3i64, false).is_empty());
    assert!(between(3i64, false, 3i64, true).is_empty());
    assert_eq!(between(3i64, true, 3i64, true).pairs().len(), 1);
}

#[test]
fn between_rejects_mixed_kinds() {
    let cond = between(1i64, true, "9", true);

    assert_eq!(
        cond.check(),
        Err(ConditionError::KindMismatch {
            left: ValueKind::Int64,
            right: ValueKind::Text,
        })
    );
}

#[test]
fn combining_mismatched_kinds_is_an_error() {
    let cond = ge(1i64).and(le(9u64));
    assert!(matches!(
        cond.error(),
        Some(ConditionError::KindMismatch { .. })
    ));

    let cond = ge(1i64).or(le("z"));
    assert!(cond.check().is_err());
}

#[test]
fn errors_are_sticky_through_combination() {
    let broken = gt(f64::NAN);
    assert!(broken.check().is_err());

    let combined = broken.or(ge(1.0f64)).and(RangeCondition::all());
    assert!(matches!(combined.error(), Some(ConditionError::Encode(_))));
}

#[test]
fn untyped_sets_adopt_the_other_kind() {
    let cond = RangeCondition::all().and(ge(3i32));
    assert_eq!(cond.kind(), Some(ValueKind::Int32));
    assert_eq!(cond, ge(3i32));

    let cond = RangeCondition::empty().or(le(3i32));
    assert_eq!(cond, le(3i32));
}

#[test]
fn empty_operand_makes_and_empty() {
    assert!(ge(1i64).and(RangeCondition::empty()).is_empty());
}

#[test]
fn opaque_values_cannot_bound_a_range() {
    let cond = ge(Opaque(vec![1u8, 2]));
    assert_eq!(
        cond.check(),
        Err(ConditionError::NotOrderable {
            kind: ValueKind::Opaque
        })
    );

    // equality is still available
    let equal = eq(Opaque(vec![1u8, 2]));
    assert!(equal.check().is_ok());
    assert_eq!(equal.kind(), ValueKind::Opaque);
}

#[test]
fn union_reports_disjoint_pairs_in_order() {
    let a = ValuePair::new(inc(5), inc(6)).unwrap();
    let b = ValuePair::new(inc(1), inc(2)).unwrap();

    assert_eq!(a.union(&b), Union::Disjoint(b, a));
}

#[test]
fn from_pairs_normalizes_unsorted_input() {
    let pairs = vec![
        ValuePair::new(inc(5), inc(9)).unwrap(),
        ValuePair::new(inc(1), inc(6)).unwrap(),
    ];
    let cond = RangeCondition::from_pairs(pairs, Some(ValueKind::Int64));

    assert!(cond.is_canonical());
    assert_eq!(cond.pairs(), &[ValuePair::new(inc(1), inc(9)).unwrap()]);
}

#[test]
fn value_pair_rejects_empty_bounds() {
    assert!(ValuePair::new(inc(2), inc(1)).is_none());
    assert!(ValuePair::new(exc(2), inc(2)).is_none());
    assert!(ValuePair::new(inc(2), inc(2)).is_some());
    assert!(ValuePair::new(Bound::Unbounded, Bound::Unbounded).is_some());
}

///
/// Brute-force model
///

#[derive(Clone, Debug)]
enum Expr {
    Between(i64, bool, i64, bool),
    Ge(i64),
    Lt(i64),
    And(Box<Self>, Box<Self>),
    Or(Box<Self>, Box<Self>),
}

impl Expr {
    fn build(&self) -> RangeCondition {
        match self {
            Self::Between(a, ai, b, bi) => between(*a, *ai, *b, *bi),
            Self::Ge(v) => ge(*v),
            Self::Lt(v) => lt(*v),
            Self::And(l, r) => l.build().and(r.build()),
            Self::Or(l, r) => l.build().or(r.build()),
        }
    }

    fn holds(&self, x: i64) -> bool {
        match self {
            Self::Between(a, ai, b, bi) => {
                let lower = if *ai { x >= *a } else { x > *a };
                let upper = if *bi { x <= *b } else { x < *b };
                lower && upper
            }
            Self::Ge(v) => x >= *v,
            Self::Lt(v) => x < *v,
            Self::And(l, r) => l.holds(x) && r.holds(x),
            Self::Or(l, r) => l.holds(x) || r.holds(x),
        }
    }
}

fn arb_expr() -> impl Strategy<Value = Expr> {
    let leaf = prop_oneof![
        (-5i64..25, any::<bool>(), -5i64..25, any::<bool>())
            .prop_map(|(a, ai, b, bi)| Expr::Between(a, ai, b, bi)),
        (-5i64..25).prop_map(Expr::Ge),
        (-5i64..25).prop_map(Expr::Lt),
    ];

    leaf.prop_recursive(4, 24, 2, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone()).prop_map(|(l, r)| Expr::And(Box::new(l), Box::new(r))),
            (inner.clone(), inner).prop_map(|(l, r)| Expr::Or(Box::new(l), Box::new(r))),
        ]
    })
}

proptest! {
    #[test]
    fn membership_matches_brute_force(expr in arb_expr()) {
        let cond = expr.build();

        prop_assert!(cond.check().is_ok());
        prop_assert!(cond.is_canonical());
        for x in -8i64..28 {
            prop_assert_eq!(contains(&cond, x), expr.holds(x), "x = {}", x);
        }
    }

    #[test]
    fn or_is_commutative(a in arb_expr(), b in arb_expr()) {
        prop_assert_eq!(a.build().or(b.build()), b.build().or(a.build()));
    }

    #[test]
    fn and_is_commutative(a in arb_expr(), b in arb_expr()) {
        prop_assert_eq!(a.build().and(b.build()), b.build().and(a.build()));
    }
}
