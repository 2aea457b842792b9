//! Exit codes for the `formgate` binary.
//! These codes are part of the public contract; scripts branch on them.

pub const SUCCESS: i32 = 0;
pub const REJECTED: i32 = 1; // `check`: schema validation failed
pub const CONFIG_ERROR: i32 = 2; // bad flags, unreadable config or schema
pub const FLAGGED_AS_BOT: i32 = 3; // `check`: honeypot tripped
