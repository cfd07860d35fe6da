use crate::{
    db::{
        codec::ValueKind,
        condition::ValuePair,
        direction::Direction,
        query::{Predicate, Query, QueryError, QueryTarget},
    },
    model::entity::EntityModel,
    obs::sink::PlanKind,
};
use std::{collections::BTreeSet, ops::Bound};

///
/// AccessSource
/// Bucket a plan walks.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum AccessSource {
    Primary { bucket: &'static str },
    Index { field: &'static str, bucket: String },
}

impl AccessSource {
    #[must_use]
    pub fn bucket(&self) -> &str {
        match self {
            Self::Primary { bucket } => bucket,
            Self::Index { bucket, .. } => bucket,
        }
    }

    #[must_use]
    pub const fn is_index(&self) -> bool {
        matches!(self, Self::Index { .. })
    }
}

///
/// Access
/// How keys inside the bucket are reached.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Access {
    /// One exact key.
    Equal(Vec<u8>),
    /// Canonical intervals in ascending order; empty means no results.
    Ranges(Vec<ValuePair>),
}

///
/// AccessPlan
/// Validated, executable form of a `Query`.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AccessPlan {
    pub source: AccessSource,
    pub access: Access,
    pub direction: Direction,
    pub offset: usize,
    pub limit: Option<usize>,
    pub exclude: BTreeSet<Vec<u8>>,
}

impl AccessPlan {
    #[must_use]
    pub fn plan_kind(&self) -> PlanKind {
        match &self.access {
            Access::Equal(_) => PlanKind::Equal,
            Access::Ranges(pairs)
                if pairs.len() == 1
                    && pairs[0].lower() == &Bound::Unbounded
                    && pairs[0].upper() == &Bound::Unbounded =>
            {
                PlanKind::FullScan
            }
            Access::Ranges(_) => PlanKind::Range,
        }
    }

    /// Human-readable summary for debug logging.
    #[must_use]
    pub fn summary(&self) -> String {
        let source = match &self.source {
            AccessSource::Primary { .. } => "primary key".to_string(),
            AccessSource::Index { field, .. } => format!("index {field}"),
        };
        let access = match &self.access {
            Access::Equal(_) => "lookup".to_string(),
            Access::Ranges(pairs) => match self.plan_kind() {
                PlanKind::FullScan => "full scan".to_string(),
                _ => format!("range scan ({} intervals)", pairs.len()),
            },
        };
        let limit = self
            .limit
            .map_or_else(|| "none".to_string(), |n| n.to_string());

        format!(
            "{source} {access}, {}, offset={}, limit={limit}, excluded={}",
            self.direction,
            self.offset,
            self.exclude.len()
        )
    }
}

/// Validate a query against a record model and resolve its access plan.
///
/// A missing predicate scans the whole target. An empty range is valid and
/// plans to no results.
pub fn check_query(model: &EntityModel, query: &Query) -> Result<AccessPlan, QueryError> {
    let (source, target_kind) = match query.target() {
        QueryTarget::Key => (
            AccessSource::Primary {
                bucket: model.data_bucket(),
            },
            model.key_kind,
        ),
        QueryTarget::Index(field) => {
            let index = model.index(field).ok_or_else(|| QueryError::UnknownIndex {
                entity: model.name,
                field: field.clone(),
            })?;

            (
                AccessSource::Index {
                    field: index.field,
                    bucket: model.index_bucket(index),
                },
                index.kind,
            )
        }
    };

    if let Some(err) = query.exclude_error() {
        return Err(err.clone());
    }
    if let Some(kind) = query.exclude_kind() {
        check_kind("exclusion", target_kind, kind)?;
    }

    let access = match query.predicate() {
        None => Access::Ranges(vec![ValuePair::unbounded()]),
        Some(Predicate::Equal(cond)) => {
            cond.check()?;
            check_kind("equality", target_kind, cond.kind())?;

            Access::Equal(cond.value().to_vec())
        }
        Some(Predicate::Range(cond)) => {
            cond.check()?;
            if let Some(kind) = cond.kind() {
                check_kind("range", target_kind, kind)?;
            }
            if !cond.is_canonical() {
                return Err(QueryError::NonCanonical);
            }

            Access::Ranges(cond.pairs().to_vec())
        }
    };

    Ok(AccessPlan {
        source,
        access,
        direction: query.direction_value(),
        offset: to_usize(query.offset_value()),
        limit: query.limit_value().map(to_usize),
        exclude: query.excluded().iter().cloned().collect(),
    })
}

fn check_kind(what: &'static str, expected: ValueKind, found: ValueKind) -> Result<(), QueryError> {
    if expected == found {
        Ok(())
    } else {
        Err(QueryError::KindMismatch {
            what,
            expected,
            found,
        })
    }
}

fn to_usize(n: u32) -> usize {
    usize::try_from(n).unwrap_or(usize::MAX)
}
