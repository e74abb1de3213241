//! Console shell and the system commands that run on it.
//!
//! - **[`shell`]**: command registry, line editor and dispatcher
//! - **[`commands`]**: `free`, `heap_dump`, `restart`, `tasks` and `make`
//!
//! # Usage
//!
//! ```rust,no_run
//! use libconsole::platform::Platform;
//! use libconsole::system::{commands, shell::Shell};
//!
//! fn console<P: Platform>(board: P, uart_rx: &[u8]) {
//!     let mut shell = Shell::new(board);
//!     shell.set_output_function(|text| print!("{}", text));
//!     commands::register_system(&mut shell);
//!
//!     let _ = shell.input(uart_rx);
//! }
//! ```

/// Command registry, line editor and dispatcher.
pub mod shell;

/// System diagnostic commands and their registration routine.
pub mod commands;
