//! System diagnostic commands.
//!
//! | Command     | Effect                                             |
//! |-------------|----------------------------------------------------|
//! | `free`      | prints the free heap size in bytes                 |
//! | `heap_dump` | prints per-region allocator statistics             |
//! | `restart`   | resets the system                                  |
//! | `tasks`     | prints the scheduler task list (`tasks` feature)   |
//! | `make`      | onboarding joke: a canned build/flash/monitor run  |
//!
//! [`system_commands`] returns the descriptors as a value;
//! [`register_system`] submits all of them to a [`Shell`] at start-up.
//!
//! ```rust,no_run
//! use libconsole::platform::Platform;
//! use libconsole::system::commands::register_system;
//! use libconsole::system::shell::Shell;
//!
//! fn start_console<P: Platform>(board: P) -> Shell<P> {
//!     let mut shell = Shell::new(board);
//!     register_system(&mut shell);
//!     shell
//! }
//! ```

mod heap;
mod make;
mod restart;
#[cfg(feature = "tasks")]
mod tasks;

use heapless::Vec;

use crate::platform::Platform;
use crate::system::shell::{Command, Shell, ShellError};

pub use heap::{free_command, heap_dump_command, write_heap_summary};
pub use make::{
    EASTER_EGG_THRESHOLD, MAKE_INVOCATIONS, MakePlan, NoRule, make_command, parse_targets,
};
pub use restart::restart_command;
#[cfg(feature = "tasks")]
pub use tasks::{TASK_LIST_HEADER, tasks_command, write_task_row};

/// Upper bound on the number of system commands.
pub const SYSTEM_COMMANDS: usize = 5;

/// Descriptors of every system command, in registration order.
pub fn system_commands<P: Platform>() -> Vec<Command<P>, SYSTEM_COMMANDS> {
    let commands = [
        free_command::<P>(),
        heap_dump_command::<P>(),
        restart_command::<P>(),
        make_command::<P>(),
    ];

    commands.into_iter().chain(task_command::<P>()).collect()
}

#[cfg(feature = "tasks")]
fn task_command<P: Platform>() -> Option<Command<P>> {
    Some(tasks_command::<P>())
}

#[cfg(not(feature = "tasks"))]
fn task_command<P: Platform>() -> Option<Command<P>> {
    None
}

/// Register every system command, stopping at the first rejection.
///
/// # Errors
///
/// Whatever [`Shell::register`] reports for the rejected command.
pub fn try_register_system<P: Platform>(shell: &mut Shell<P>) -> Result<(), ShellError> {
    for command in system_commands::<P>() {
        shell.register(command)?;
    }
    Ok(())
}

/// Register every system command.
///
/// # Panics
///
/// If the shell rejects any command. A console without its system commands
/// is a start-up bug, so this fails fast instead of running degraded.
pub fn register_system<P: Platform>(shell: &mut Shell<P>) {
    for command in system_commands::<P>() {
        if let Err(err) = shell.register(command) {
            log::error!("failed to register '{}': {}", command.name, err);
            panic!("failed to register console command '{}': {}", command.name, err);
        }
    }
}
