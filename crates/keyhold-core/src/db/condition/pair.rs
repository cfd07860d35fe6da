use std::{cmp::Ordering, ops::Bound};

///
/// ValuePair
///
/// A non-empty interval over encoded bytes.
/// `lower <= upper` always holds, and a zero-width pair is closed on both ends.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ValuePair {
    lower: Bound<Vec<u8>>,
    upper: Bound<Vec<u8>>,
}

///
/// Union
///
/// Result of joining two pairs: one merged pair, or both unchanged in
/// ascending order.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Union {
    Merged(ValuePair),
    Disjoint(ValuePair, ValuePair),
}

impl ValuePair {
    /// Build a pair, returning `None` when the interval would be empty.
    #[must_use]
    pub fn new(lower: Bound<Vec<u8>>, upper: Bound<Vec<u8>>) -> Option<Self> {
        let empty = match (&lower, &upper) {
            (Bound::Included(lo), Bound::Included(hi)) => lo > hi,
            (Bound::Included(lo) | Bound::Excluded(lo), Bound::Included(hi) | Bound::Excluded(hi)) => {
                lo >= hi
            }
            _ => false,
        };

        (!empty).then_some(Self { lower, upper })
    }

    /// The interval covering every key.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self {
            lower: Bound::Unbounded,
            upper: Bound::Unbounded,
        }
    }

    /// The single-key interval `[value, value]`.
    #[must_use]
    pub fn point(value: Vec<u8>) -> Self {
        Self {
            lower: Bound::Included(value.clone()),
            upper: Bound::Included(value),
        }
    }

    #[must_use]
    pub const fn lower(&self) -> &Bound<Vec<u8>> {
        &self.lower
    }

    #[must_use]
    pub const fn upper(&self) -> &Bound<Vec<u8>> {
        &self.upper
    }

    #[must_use]
    pub fn into_bounds(self) -> (Bound<Vec<u8>>, Bound<Vec<u8>>) {
        (self.lower, self.upper)
    }

    /// True when `key` is at or past the lower bound.
    #[must_use]
    pub fn above_lower(&self, key: &[u8]) -> bool {
        match &self.lower {
            Bound::Unbounded => true,
            Bound::Included(lo) => key >= lo.as_slice(),
            Bound::Excluded(lo) => key > lo.as_slice(),
        }
    }

    /// True when `key` is at or before the upper bound.
    #[must_use]
    pub fn below_upper(&self, key: &[u8]) -> bool {
        match &self.upper {
            Bound::Unbounded => true,
            Bound::Included(hi) => key <= hi.as_slice(),
            Bound::Excluded(hi) => key < hi.as_slice(),
        }
    }

    #[must_use]
    pub fn contains(&self, key: &[u8]) -> bool {
        self.above_lower(key) && self.below_upper(key)
    }

    /// Overlap of two pairs, or `None` when they share no key.
    #[must_use]
    pub fn intersect(&self, other: &Self) -> Option<Self> {
        let lower = match cmp_lower(&self.lower, &other.lower) {
            Ordering::Less => other.lower.clone(),
            _ => self.lower.clone(),
        };
        let upper = match cmp_upper(&self.upper, &other.upper) {
            Ordering::Greater => other.upper.clone(),
            _ => self.upper.clone(),
        };

        Self::new(lower, upper)
    }

    /// Join two pairs. Pairs that overlap or touch merge into one.
    #[must_use]
    pub fn union(&self, other: &Self) -> Union {
        let (first, second) = if cmp_lower(&self.lower, &other.lower) == Ordering::Greater {
            (other, self)
        } else {
            (self, other)
        };

        if !connects(&first.upper, &second.lower) {
            return Union::Disjoint(first.clone(), second.clone());
        }

        let upper = match cmp_upper(&first.upper, &second.upper) {
            Ordering::Less => second.upper.clone(),
            _ => first.upper.clone(),
        };

        Union::Merged(Self {
            lower: first.lower.clone(),
            upper,
        })
    }

    /// Whether `self` lies entirely before `other`.
    /// Only meaningful for pairs that do not intersect.
    #[must_use]
    pub(crate) fn precedes(&self, other: &Self) -> bool {
        match (&self.upper, &other.upper, &self.lower, &other.lower) {
            (Bound::Unbounded, _, _, _) => false,
            (_, Bound::Unbounded, _, _) => true,
            (_, _, Bound::Unbounded, _) => true,
            (_, _, _, Bound::Unbounded) => false,
            (Bound::Included(hi) | Bound::Excluded(hi), _, _, Bound::Included(lo) | Bound::Excluded(lo)) => {
                hi <= lo
            }
        }
    }

    pub(crate) fn cmp_by_lower(&self, other: &Self) -> Ordering {
        cmp_lower(&self.lower, &other.lower)
    }
}

/// Order lower bounds: unbounded first, and `[k` before `(k`.
pub(crate) fn cmp_lower(a: &Bound<Vec<u8>>, b: &Bound<Vec<u8>>) -> Ordering {
    match (a, b) {
        (Bound::Unbounded, Bound::Unbounded) => Ordering::Equal,
        (Bound::Unbounded, _) => Ordering::Less,
        (_, Bound::Unbounded) => Ordering::Greater,
        (Bound::Included(x), Bound::Included(y)) | (Bound::Excluded(x), Bound::Excluded(y)) => {
            x.cmp(y)
        }
        (Bound::Included(x), Bound::Excluded(y)) => x.cmp(y).then(Ordering::Less),
        (Bound::Excluded(x), Bound::Included(y)) => x.cmp(y).then(Ordering::Greater),
    }
}

/// Order upper bounds: unbounded last, and `k)` before `k]`.
pub(crate) fn cmp_upper(a: &Bound<Vec<u8>>, b: &Bound<Vec<u8>>) -> Ordering {
    match (a, b) {
        (Bound::Unbounded, Bound::Unbounded) => Ordering::Equal,
        (Bound::Unbounded, _) => Ordering::Greater,
        (_, Bound::Unbounded) => Ordering::Less,
        (Bound::Included(x), Bound::Included(y)) | (Bound::Excluded(x), Bound::Excluded(y)) => {
            x.cmp(y)
        }
        (Bound::Included(x), Bound::Excluded(y)) => x.cmp(y).then(Ordering::Greater),
        (Bound::Excluded(x), Bound::Included(y)) => x.cmp(y).then(Ordering::Less),
    }
}

// Whether an upper bound reaches a later lower bound with no gap between them.
fn connects(upper: &Bound<Vec<u8>>, lower: &Bound<Vec<u8>>) -> bool {
    match (upper, lower) {
        (Bound::Unbounded, _) | (_, Bound::Unbounded) => true,
        (Bound::Excluded(hi), Bound::Excluded(lo)) => hi > lo,
        (Bound::Included(hi) | Bound::Excluded(hi), Bound::Included(lo) | Bound::Excluded(lo)) => {
            hi >= lo
        }
    }
}
