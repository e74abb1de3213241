//! Host capabilities consumed by the console commands.
//!
//! The commands never reach for global RTOS or allocator functions. Instead
//! the shell owns a value implementing [`Platform`] and lends it to every
//! handler, so a board support crate, a simulator, or a test double can all
//! provide the same services:
//!
//! - [`HeapIntrospection`]: free heap size and per-region allocator stats
//! - [`TaskIntrospection`]: a snapshot of the scheduler's task list
//! - [`SystemControl`]: the reset primitive
//! - [`DelayNs`]: blocking delays used to pace output
//! - [`Platform::retention`]: memory that survives a soft reset
//!
//! # Examples
//!
//! ```rust
//! use libconsole::platform::*;
//! use libconsole::storage::RetentionMemory;
//!
//! struct Board {
//!     retention: RetentionMemory<32>,
//! }
//!
//! impl HeapIntrospection for Board {
//!     fn free_heap_size(&self) -> u32 { 4096 }
//!     fn heap_regions(&self) -> HeapRegions { HeapRegions::new() }
//! }
//!
//! impl TaskIntrospection for Board {
//!     fn task_count(&self) -> usize { 0 }
//!     fn snapshot_tasks(&self, _tasks: &mut TaskList) {}
//! }
//!
//! impl SystemControl for Board {
//!     fn restart(&mut self) -> ! { panic!("reset") }
//! }
//!
//! impl DelayNs for Board {
//!     fn delay_ns(&mut self, _ns: u32) {}
//! }
//!
//! impl Platform for Board {
//!     type Retention = RetentionMemory<32>;
//!     fn retention(&mut self) -> &mut Self::Retention { &mut self.retention }
//! }
//! ```

#![deny(unsafe_code)]

use core::fmt;

use heapless::{String, Vec};

pub use embedded_hal::delay::DelayNs;

use crate::storage::Storage;

/// Maximum number of allocator regions reported by [`HeapIntrospection::heap_regions`].
pub const MAX_HEAP_REGIONS: usize = 8;

/// Maximum number of tasks a [`TaskList`] can hold.
pub const MAX_TASKS: usize = 32;

/// Maximum task name length in bytes.
pub const MAX_TASK_NAME_LEN: usize = 16;

/// Allocator regions, in address order.
pub type HeapRegions = Vec<HeapRegion, MAX_HEAP_REGIONS>;

/// Snapshot buffer for the scheduler's task list.
pub type TaskList = Vec<TaskInfo, MAX_TASKS>;

/// Statistics for one contiguous allocator region.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeapRegion {
    /// Start address of the region.
    pub address: usize,
    /// Size of the region in bytes.
    pub len: u32,
    /// Bytes currently free.
    pub free: u32,
    /// Bytes currently allocated.
    pub allocated: u32,
    /// Lowest free byte count observed since boot.
    pub min_free: u32,
    /// Size of the largest contiguous free block.
    pub largest_free_block: u32,
    /// Number of allocated blocks.
    pub alloc_blocks: u32,
    /// Number of free blocks.
    pub free_blocks: u32,
    /// Total number of blocks.
    pub total_blocks: u32,
}

/// Scheduler state of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    /// Currently executing.
    Running,
    /// Able to run, waiting for the CPU.
    Ready,
    /// Waiting on an event or a delay.
    Blocked,
    /// Explicitly suspended.
    Suspended,
    /// Deleted but not yet cleaned up.
    Deleted,
}

impl TaskState {
    /// Single-letter code used in task listings.
    pub const fn code(self) -> char {
        match self {
            TaskState::Running => 'X',
            TaskState::Ready => 'R',
            TaskState::Blocked => 'B',
            TaskState::Suspended => 'S',
            TaskState::Deleted => 'D',
        }
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use fmt::Write;
        f.write_char(self.code())
    }
}

/// Runtime metadata for one scheduled task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskInfo {
    /// Task name, truncated to [`MAX_TASK_NAME_LEN`] bytes.
    pub name: String<MAX_TASK_NAME_LEN>,
    /// Current scheduler state.
    pub state: TaskState,
    /// Current priority.
    pub priority: u32,
    /// Minimum free stack observed, in words.
    pub stack_high_water_mark: u32,
    /// Unique task number assigned by the scheduler.
    pub number: u32,
}

impl TaskInfo {
    /// Build a task record, truncating `name` on a character boundary.
    pub fn new(
        name: &str,
        state: TaskState,
        priority: u32,
        stack_high_water_mark: u32,
        number: u32,
    ) -> Self {
        let mut truncated = String::new();
        for ch in name.chars() {
            if truncated.push(ch).is_err() {
                break;
            }
        }

        Self {
            name: truncated,
            state,
            priority,
            stack_high_water_mark,
            number,
        }
    }
}

/// Allocator introspection.
pub trait HeapIntrospection {
    /// Free heap in bytes, across all regions.
    fn free_heap_size(&self) -> u32;

    /// Per-region allocator statistics.
    fn heap_regions(&self) -> HeapRegions;
}

/// Scheduler introspection.
pub trait TaskIntrospection {
    /// Number of tasks currently known to the scheduler.
    fn task_count(&self) -> usize;

    /// Append the current tasks to `tasks`, stopping when it is full.
    fn snapshot_tasks(&self, tasks: &mut TaskList);
}

/// System-level actions.
pub trait SystemControl {
    /// Perform a full software reset. Never returns.
    fn restart(&mut self) -> !;
}

/// Everything the system commands need from the host.
pub trait Platform: HeapIntrospection + TaskIntrospection + SystemControl + DelayNs {
    /// Memory that keeps its contents across a soft reset.
    type Retention: Storage;

    /// Access the retention memory.
    fn retention(&mut self) -> &mut Self::Retention;
}
