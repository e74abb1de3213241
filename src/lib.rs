//! # libconsole - diagnostic console commands for embedded devices
//!
//! A small `no_std` console for microcontrollers together with the system
//! commands every firmware ends up wanting on its debug UART:
//!
//! - `free`: free heap in bytes
//! - `heap_dump`: per-region allocator statistics
//! - `tasks`: the scheduler's task list
//! - `restart`: software reset
//! - `make`: a canned build/flash/monitor transcript for people who typed
//!   their host command into the device
//!
//! The commands talk to the hardware and the RTOS only through the
//! [`platform::Platform`] trait, so the same code runs on a board, in a
//! simulator and in tests.
//!
//! ## Usage
//!
//! Add this to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! libconsole = "0.1.0"
//! ```
//!
//! ### Bringing up the console
//!
//! ```rust,no_run
//! use libconsole::platform::*;
//! use libconsole::storage::RetentionMemory;
//! use libconsole::system::{commands, shell::Shell};
//!
//! struct Board {
//!     retention: RetentionMemory<64>,
//! }
//! # impl HeapIntrospection for Board {
//! #     fn free_heap_size(&self) -> u32 { 0 }
//! #     fn heap_regions(&self) -> HeapRegions { HeapRegions::new() }
//! # }
//! # impl TaskIntrospection for Board {
//! #     fn task_count(&self) -> usize { 0 }
//! #     fn snapshot_tasks(&self, _tasks: &mut TaskList) {}
//! # }
//! # impl SystemControl for Board {
//! #     fn restart(&mut self) -> ! { loop {} }
//! # }
//! # impl DelayNs for Board {
//! #     fn delay_ns(&mut self, _ns: u32) {}
//! # }
//! # impl Platform for Board {
//! #     type Retention = RetentionMemory<64>;
//! #     fn retention(&mut self) -> &mut Self::Retention { &mut self.retention }
//! # }
//!
//! let board = Board { retention: RetentionMemory::new() };
//! let mut shell = Shell::new(board);
//! shell.set_output_function(|text| print!("{}", text));
//! commands::register_system(&mut shell);
//!
//! // Bytes as they arrive from the UART
//! shell.input(b"free\r").unwrap();
//! ```
//!
//! ## Optional Features
//!
//! - `tasks` (default): register the `tasks` command
//! - `std`: Enable standard library support (default: disabled)
//! - `defmt`: `defmt::Format` for the error types

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(missing_docs)]
#![warn(missing_debug_implementations)]

/// Host capabilities consumed by the commands: heap and task introspection,
/// reset, delays and retention memory.
pub mod platform;

/// Storage traits and checksummed slots in retention memory.
pub mod storage;

/// Console shell and system commands.
pub mod system;
