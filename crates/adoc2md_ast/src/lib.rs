//! The typed block tree produced by parsing, plus a visitor contract and a
//! debug-dump format used by golden parser tests.

mod block;
mod dump;
mod visitor;

pub use block::*;
pub use dump::dump;
pub use visitor::{visit, visit_mut};
