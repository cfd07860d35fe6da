//! Module: db::executor
//! Responsibility: run validated queries and record writes inside a caller's transaction.
//! Does not own: opening or committing transactions.
//! Boundary: every index-maintaining write goes through this module.

mod load;
mod mutation;
mod save;
mod scan;


pub use load::{count, execute, find, find_one, get};
pub use mutation::{delete_matching, update_matching};
pub use save::{delete, insert, upsert};
