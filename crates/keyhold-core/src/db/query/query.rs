use crate::db::{
    codec::{EncodeValue, ValueKind},
    condition::{EqualCondition, RangeCondition},
    direction::Direction,
    query::QueryError,
};

///
/// QueryTarget
///
/// What the predicate is evaluated against: the primary key, or the value
/// of one declared index.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum QueryTarget {
    #[default]
    Key,
    Index(String),
}

///
/// Predicate
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Predicate {
    Range(RangeCondition),
    Equal(EqualCondition),
}

impl From<RangeCondition> for Predicate {
    fn from(cond: RangeCondition) -> Self {
        Self::Range(cond)
    }
}

impl From<EqualCondition> for Predicate {
    fn from(cond: EqualCondition) -> Self {
        Self::Equal(cond)
    }
}

///
/// Query
///
/// Declarative, consuming builder. Each method takes the query by value and
/// returns the updated one; nothing is validated until `check_query`.
///
/// A second predicate replaces the first. Exclusions accumulate.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Query {
    target: QueryTarget,
    predicate: Option<Predicate>,
    limit: Option<u32>,
    offset: u32,
    direction: Direction,
    exclude: Vec<Vec<u8>>,
    exclude_kind: Option<ValueKind>,
    exclude_error: Option<QueryError>,
}

impl Query {
    /// Query over primary keys.
    #[must_use]
    pub fn key() -> Self {
        Self::default()
    }

    /// Query over the index declared on `field`.
    #[must_use]
    pub fn index(field: impl Into<String>) -> Self {
        Self {
            target: QueryTarget::Index(field.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn filter(mut self, predicate: impl Into<Predicate>) -> Self {
        self.predicate = Some(predicate.into());
        self
    }

    #[must_use]
    pub fn range(self, cond: RangeCondition) -> Self {
        self.filter(cond)
    }

    #[must_use]
    pub fn equal(self, cond: EqualCondition) -> Self {
        self.filter(cond)
    }

    /// Cap the number of results; `0` removes the cap.
    #[must_use]
    pub const fn limit(mut self, n: u32) -> Self {
        self.limit = if n == 0 { None } else { Some(n) };
        self
    }

    /// Skip this many matches before collecting.
    #[must_use]
    pub const fn offset(mut self, n: u32) -> Self {
        self.offset = n;
        self
    }

    #[must_use]
    pub const fn asc(mut self) -> Self {
        self.direction = Direction::Asc;
        self
    }

    #[must_use]
    pub const fn desc(mut self) -> Self {
        self.direction = Direction::Desc;
        self
    }

    #[must_use]
    pub const fn direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Never return rows whose target value equals one of `values`.
    #[must_use]
    pub fn exclude<V, I>(mut self, values: I) -> Self
    where
        V: EncodeValue,
        I: IntoIterator<Item = V>,
    {
        if self.exclude_error.is_some() {
            return self;
        }

        for value in values {
            if let Some(kind) = self.exclude_kind
                && kind != V::KIND
            {
                self.exclude_error = Some(QueryError::ExcludeKindMismatch {
                    left: kind,
                    right: V::KIND,
                });
                return self;
            }
            self.exclude_kind = Some(V::KIND);

            match value.encode_value() {
                Ok(bytes) => self.exclude.push(bytes),
                Err(err) => {
                    self.exclude_error = Some(QueryError::Exclude(err));
                    return self;
                }
            }
        }

        self
    }

    /// Same query with offset and limit cleared.
    #[must_use]
    pub fn unpaged(mut self) -> Self {
        self.limit = None;
        self.offset = 0;
        self
    }

    #[must_use]
    pub const fn target(&self) -> &QueryTarget {
        &self.target
    }

    #[must_use]
    pub const fn predicate(&self) -> Option<&Predicate> {
        self.predicate.as_ref()
    }

    #[must_use]
    pub const fn limit_value(&self) -> Option<u32> {
        self.limit
    }

    #[must_use]
    pub const fn offset_value(&self) -> u32 {
        self.offset
    }

    #[must_use]
    pub const fn direction_value(&self) -> Direction {
        self.direction
    }

    #[must_use]
    pub fn excluded(&self) -> &[Vec<u8>] {
        &self.exclude
    }

    pub(crate) const fn exclude_kind(&self) -> Option<ValueKind> {
        self.exclude_kind
    }

    pub(crate) const fn exclude_error(&self) -> Option<&QueryError> {
        self.exclude_error.as_ref()
    }
}
