//! Mock board and output capture shared by the system tests.

use std::cell::RefCell;
use std::panic::{self, AssertUnwindSafe};

use libconsole::platform::*;
use libconsole::storage::RetentionMemory;
use libconsole::system::shell::{Shell, ShellError};

/// Size of the mock retention region.
pub const RETENTION_SIZE: usize = 64;

thread_local! {
    static OUTPUT: RefCell<String> = RefCell::new(String::new());
}

/// Output function capturing into a per-thread buffer.
pub fn capture_output(text: &str) {
    OUTPUT.with(|out| out.borrow_mut().push_str(text));
}

/// Drain everything captured so far on this thread.
pub fn take_output() -> String {
    OUTPUT.with(|out| std::mem::take(&mut *out.borrow_mut()))
}

/// Panic payload used by [`MockBoard::restart`].
#[derive(Debug)]
pub struct Restarted;

/// Board double with scripted heap and task data.
#[derive(Debug, Default)]
pub struct MockBoard {
    pub free_heap: u32,
    pub regions: Vec<HeapRegion>,
    pub tasks: Vec<TaskInfo>,
    pub retention: RetentionMemory<RETENTION_SIZE>,
    pub delayed_ns: u64,
}

impl MockBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// A board coming back from a soft reset keeps its retention memory.
    pub fn warm_restart(self) -> Self {
        Self {
            retention: self.retention,
            ..Self::default()
        }
    }

    /// A board after power-on: retention memory holds garbage.
    pub fn cold_boot(pattern: u8) -> Self {
        Self {
            retention: RetentionMemory::power_on(pattern),
            ..Self::default()
        }
    }
}

impl HeapIntrospection for MockBoard {
    fn free_heap_size(&self) -> u32 {
        self.free_heap
    }

    fn heap_regions(&self) -> HeapRegions {
        self.regions.iter().copied().take(MAX_HEAP_REGIONS).collect()
    }
}

impl TaskIntrospection for MockBoard {
    fn task_count(&self) -> usize {
        self.tasks.len()
    }

    fn snapshot_tasks(&self, tasks: &mut TaskList) {
        for task in &self.tasks {
            if tasks.push(task.clone()).is_err() {
                break;
            }
        }
    }
}

impl SystemControl for MockBoard {
    fn restart(&mut self) -> ! {
        panic::panic_any(Restarted)
    }
}

impl DelayNs for MockBoard {
    fn delay_ns(&mut self, ns: u32) {
        self.delayed_ns += u64::from(ns);
    }
}

impl Platform for MockBoard {
    type Retention = RetentionMemory<RETENTION_SIZE>;

    fn retention(&mut self) -> &mut Self::Retention {
        &mut self.retention
    }
}

/// Shell over `board` with output captured and echo off.
pub fn quiet_shell(board: MockBoard) -> Shell<MockBoard> {
    take_output();
    let mut shell = Shell::new(board);
    shell.set_output_function(capture_output);
    shell.set_echo(false);
    shell
}

/// Run `line`, reporting whether the board was reset while executing it.
pub fn run_until_restart(shell: &mut Shell<MockBoard>, line: &str) -> Result<bool, ShellError> {
    match panic::catch_unwind(AssertUnwindSafe(|| shell.execute(line))) {
        Ok(result) => result.map(|()| false),
        Err(payload) if payload.downcast_ref::<Restarted>().is_some() => Ok(true),
        Err(payload) => panic::resume_unwind(payload),
    }
}
