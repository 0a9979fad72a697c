//! Process exit codes returned by [`crate::run`].

/// Command finished normally.
pub const SUCCESS: i32 = 0;

/// Bad arguments, bad configuration or a failed command.
pub const ERROR: i32 = 2;
