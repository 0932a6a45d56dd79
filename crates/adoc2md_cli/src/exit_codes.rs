//! Process exit codes, following Ruff's convention (grounded on
//! `rvben-rumdl/src/exit_codes.rs`): distinct codes for "nothing went
//! wrong" versus "the tool itself failed", so CI can tell the two apart.

pub const SUCCESS: i32 = 0;
pub const TOOL_ERROR: i32 = 2;

pub mod exit {
    use super::{SUCCESS, TOOL_ERROR};

    pub fn success() -> ! {
        std::process::exit(SUCCESS);
    }

    pub fn tool_error() -> ! {
        std::process::exit(TOOL_ERROR);
    }
}
