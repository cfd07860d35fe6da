//! Module: executor::scan
//! Responsibility: walk bucket cursors over a validated access plan.
//! Does not own: plan validation or row decoding.
//! Boundary: yields primary keys in scan order, already windowed.

use crate::{
    config::DbConfig,
    db::{
        condition::ValuePair,
        direction::Direction,
        index::PostingList,
        query::{Access, AccessPlan},
        store::{Cursor, Entry, ReadTx},
    },
    error::InternalError,
};
use std::ops::Bound;

///
/// Window
/// Offset and limit applied across every posting list and interval of a scan.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Window {
    skip: usize,
    remaining: Option<usize>,
}

impl Window {
    pub(crate) const fn new(offset: usize, limit: Option<usize>) -> Self {
        Self {
            skip: offset,
            remaining: limit,
        }
    }

    pub(crate) const fn is_full(&self) -> bool {
        matches!(self.remaining, Some(0))
    }

    /// Feed candidate keys in scan order, keeping those inside the window.
    pub(crate) fn take(&mut self, keys: impl IntoIterator<Item = Vec<u8>>, out: &mut Vec<Vec<u8>>) {
        for key in keys {
            if self.is_full() {
                return;
            }
            if self.skip > 0 {
                self.skip -= 1;
                continue;
            }

            out.push(key);
            if let Some(remaining) = &mut self.remaining {
                *remaining -= 1;
            }
        }
    }
}

///
/// ScanOutput
///

#[derive(Debug, Default)]
pub(crate) struct ScanOutput {
    pub keys: Vec<Vec<u8>>,
    pub entries_visited: u64,
}

/// Run a plan against its bucket and return matching primary keys.
pub(crate) fn scan_plan<T: ReadTx>(
    tx: &T,
    plan: &AccessPlan,
    config: &DbConfig,
) -> Result<ScanOutput, InternalError> {
    let mut output = ScanOutput::default();
    let Some(mut cursor) = tx.cursor(plan.source.bucket())? else {
        return Ok(output);
    };

    let mut window = Window::new(plan.offset, plan.limit);
    if window.is_full() {
        return Ok(output);
    }

    match &plan.access {
        Access::Equal(value) => {
            if plan.exclude.contains(value) {
                return Ok(output);
            }
            if let Some((key, payload)) = cursor.seek(value)
                && key == *value
            {
                output.entries_visited += 1;
                collect(plan, config, key, &payload, &mut window, &mut output.keys)?;
            }
        }
        Access::Ranges(pairs) => {
            let ordered: Box<dyn Iterator<Item = &ValuePair>> = match plan.direction {
                Direction::Asc => Box::new(pairs.iter()),
                Direction::Desc => Box::new(pairs.iter().rev()),
            };

            for pair in ordered {
                let mut visit = |(key, payload): Entry| -> Result<bool, InternalError> {
                    output.entries_visited += 1;
                    if !plan.exclude.contains(&key) {
                        collect(plan, config, key, &payload, &mut window, &mut output.keys)?;
                    }

                    Ok(!window.is_full())
                };

                let more = match plan.direction {
                    Direction::Asc => scan_ascending(&mut cursor, pair, &mut visit)?,
                    Direction::Desc => scan_descending(&mut cursor, pair, &mut visit)?,
                };
                if !more {
                    break;
                }
            }
        }
    }

    Ok(output)
}

// Primary scans yield the cursor key; index scans yield the posting list.
fn collect(
    plan: &AccessPlan,
    config: &DbConfig,
    key: Vec<u8>,
    payload: &[u8],
    window: &mut Window,
    out: &mut Vec<Vec<u8>>,
) -> Result<(), InternalError> {
    if plan.source.is_index() {
        let list = PostingList::decode(payload, config.max_value_bytes)?;
        window.take(list.into_keys(), out);
    } else {
        window.take([key], out);
    }

    Ok(())
}

/// Walk one interval upward. Returns `false` once `visit` asks to stop.
fn scan_ascending<C, F>(cursor: &mut C, pair: &ValuePair, visit: &mut F) -> Result<bool, InternalError>
where
    C: Cursor,
    F: FnMut(Entry) -> Result<bool, InternalError>,
{
    let mut entry = match pair.lower() {
        Bound::Unbounded => cursor.first(),
        Bound::Included(lo) => cursor.seek(lo),
        Bound::Excluded(lo) => match cursor.seek(lo) {
            Some((key, _)) if key == *lo => cursor.next(),
            other => other,
        },
    };

    while let Some(current) = entry {
        if !pair.below_upper(&current.0) {
            break;
        }
        if !visit(current)? {
            return Ok(false);
        }
        entry = cursor.next();
    }

    Ok(true)
}

/// Walk one interval downward. Returns `false` once `visit` asks to stop.
fn scan_descending<C, F>(cursor: &mut C, pair: &ValuePair, visit: &mut F) -> Result<bool, InternalError>
where
    C: Cursor,
    F: FnMut(Entry) -> Result<bool, InternalError>,
{
    let mut entry = match pair.upper() {
        Bound::Unbounded => cursor.last(),
        Bound::Included(hi) | Bound::Excluded(hi) => match cursor.seek(hi) {
            None => cursor.last(),
            Some(found) if pair.below_upper(&found.0) => Some(found),
            Some(_) => cursor.prev(),
        },
    };

    while let Some(current) = entry {
        if !pair.above_lower(&current.0) {
            break;
        }
        if !visit(current)? {
            return Ok(false);
        }
        entry = cursor.prev();
    }

    Ok(true)
}

///
/// TESTS
///
