use crate::db::{
    codec::ValueKind,
    condition::{
        ConditionError,
        pair::{Union, ValuePair},
    },
};
use std::cmp::Ordering;

///
/// RangeCondition
///
/// A set of intervals over one value kind, kept canonical: sorted by lower
/// bound, pairwise disjoint, and with no two neighbours that could merge.
///
/// Construction errors are sticky. Once an operand carries an error, every
/// `and`/`or` involving it yields that error, and validation surfaces it
/// when the condition reaches a query.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RangeCondition {
    pairs: Vec<ValuePair>,
    kind: Option<ValueKind>,
    error: Option<ConditionError>,
}

impl RangeCondition {
    /// Every key; untyped, so it combines with a condition of any kind.
    #[must_use]
    pub fn all() -> Self {
        Self {
            pairs: vec![ValuePair::unbounded()],
            kind: None,
            error: None,
        }
    }

    /// No keys.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            pairs: Vec::new(),
            kind: None,
            error: None,
        }
    }

    pub(crate) fn single(pair: Option<ValuePair>, kind: ValueKind) -> Self {
        Self {
            pairs: pair.into_iter().collect(),
            kind: Some(kind),
            error: None,
        }
    }

    pub(crate) const fn failed(error: ConditionError) -> Self {
        Self {
            pairs: Vec::new(),
            kind: None,
            error: Some(error),
        }
    }

    /// Build from raw pairs; the pairs are normalized into canonical form.
    #[must_use]
    pub fn from_pairs(pairs: Vec<ValuePair>, kind: Option<ValueKind>) -> Self {
        let mut pairs = pairs;
        pairs.sort_by(ValuePair::cmp_by_lower);

        Self {
            pairs: fold(pairs),
            kind,
            error: None,
        }
    }

    #[must_use]
    pub fn pairs(&self) -> &[ValuePair] {
        &self.pairs
    }

    #[must_use]
    pub const fn kind(&self) -> Option<ValueKind> {
        self.kind
    }

    #[must_use]
    pub const fn error(&self) -> Option<&ConditionError> {
        self.error.as_ref()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Surface a sticky construction error.
    pub fn check(&self) -> Result<(), ConditionError> {
        match &self.error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    /// Whether the pairs are sorted, disjoint and fully merged.
    #[must_use]
    pub fn is_canonical(&self) -> bool {
        self.pairs.windows(2).all(|w| {
            w[0].cmp_by_lower(&w[1]) == Ordering::Less
                && matches!(w[0].union(&w[1]), Union::Disjoint(..))
        })
    }

    /// Keys present in both conditions.
    #[must_use]
    pub fn and(self, other: Self) -> Self {
        let kind = match combine(&self, &other) {
            Ok(kind) => kind,
            Err(err) => return Self::failed(err),
        };
        if self.is_empty() || other.is_empty() {
            return Self {
                pairs: Vec::new(),
                kind,
                error: None,
            };
        }

        // both inputs are canonical, so the cross product comes out sorted
        // and disjoint without another pass
        let mut pairs = Vec::new();
        for left in &self.pairs {
            for right in &other.pairs {
                if let Some(pair) = left.intersect(right) {
                    pairs.push(pair);
                }
            }
        }

        Self {
            pairs,
            kind,
            error: None,
        }
    }

    /// Keys present in either condition.
    #[must_use]
    pub fn or(self, other: Self) -> Self {
        let kind = match combine(&self, &other) {
            Ok(kind) => kind,
            Err(err) => return Self::failed(err),
        };

        let mut swept = Vec::with_capacity(self.pairs.len() + other.pairs.len());
        let mut left = self.pairs.into_iter().peekable();
        let mut right = other.pairs.into_iter().peekable();

        while let (Some(a), Some(b)) = (left.peek(), right.peek()) {
            if a.intersect(b).is_some() {
                if let Union::Merged(merged) = a.union(b) {
                    swept.push(merged);
                }
                left.next();
                right.next();
            } else if a.precedes(b) {
                swept.extend(left.next());
            } else {
                swept.extend(right.next());
            }
        }
        swept.extend(left);
        swept.extend(right);

        Self {
            pairs: fold(swept),
            kind,
            error: None,
        }
    }
}

// Merge neighbours of a sequence sorted by lower bound.
fn fold(pairs: Vec<ValuePair>) -> Vec<ValuePair> {
    let mut out: Vec<ValuePair> = Vec::with_capacity(pairs.len());
    let mut iter = pairs.into_iter();
    let Some(mut acc) = iter.next() else {
        return out;
    };

    for pair in iter {
        match acc.union(&pair) {
            Union::Merged(merged) => acc = merged,
            Union::Disjoint(first, second) => {
                out.push(first);
                acc = second;
            }
        }
    }
    out.push(acc);

    out
}

// Resolve the kind of a combination, propagating sticky errors first.
fn combine(
    left: &RangeCondition,
    right: &RangeCondition,
) -> Result<Option<ValueKind>, ConditionError> {
    left.check()?;
    right.check()?;

    match (left.kind, right.kind) {
        (Some(a), Some(b)) if a != b => Err(ConditionError::KindMismatch { left: a, right: b }),
        (Some(kind), _) | (_, Some(kind)) => Ok(Some(kind)),
        (None, None) => Ok(None),
    }
}
