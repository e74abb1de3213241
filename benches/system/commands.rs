use criterion::{BatchSize, Criterion};
use libconsole::platform::*;
use libconsole::storage::RetentionMemory;
use libconsole::system::commands::{self, write_heap_summary, write_task_row};
use libconsole::system::shell::Shell;
use std::hint::black_box;

#[derive(Default)]
struct BenchBoard {
    retention: RetentionMemory<64>,
}

impl HeapIntrospection for BenchBoard {
    fn free_heap_size(&self) -> u32 {
        180_000
    }

    fn heap_regions(&self) -> HeapRegions {
        (0..MAX_HEAP_REGIONS)
            .map(|i| HeapRegion {
                address: 0x3ff0_0000 + i * 0x1_0000,
                len: 65_536,
                free: 30_000,
                allocated: 35_536,
                min_free: 20_000,
                largest_free_block: 16_384,
                alloc_blocks: 120,
                free_blocks: 8,
                total_blocks: 128,
            })
            .collect()
    }
}

impl TaskIntrospection for BenchBoard {
    fn task_count(&self) -> usize {
        MAX_TASKS
    }

    fn snapshot_tasks(&self, tasks: &mut TaskList) {
        for n in 0..MAX_TASKS as u32 {
            let _ = tasks.push(TaskInfo::new("worker", TaskState::Blocked, 5, 2048, n));
        }
    }
}

impl SystemControl for BenchBoard {
    fn restart(&mut self) -> ! {
        panic!("restart is not benchmarked")
    }
}

impl DelayNs for BenchBoard {
    fn delay_ns(&mut self, _ns: u32) {}
}

impl Platform for BenchBoard {
    type Retention = RetentionMemory<64>;

    fn retention(&mut self) -> &mut Self::Retention {
        &mut self.retention
    }
}

fn setup_shell() -> Shell<BenchBoard> {
    let mut shell = Shell::new(BenchBoard::default());
    shell.set_output_function(|text| {
        black_box(text);
    });
    shell.set_echo(false);
    commands::register_system(&mut shell);
    shell
}

pub fn bench_heap_summary(c: &mut Criterion) {
    let regions = BenchBoard::default().heap_regions();
    let mut report = String::with_capacity(2048);
    c.bench_function("heap_summary", |b| {
        b.iter(|| {
            report.clear();
            write_heap_summary(&mut report, black_box(&regions)).expect("Failed to format");
        })
    });
}

pub fn bench_task_rows(c: &mut Criterion) {
    let mut tasks = TaskList::new();
    BenchBoard::default().snapshot_tasks(&mut tasks);
    let mut report = String::with_capacity(4096);
    c.bench_function("task_rows", |b| {
        b.iter(|| {
            report.clear();
            for task in &tasks {
                write_task_row(&mut report, black_box(task)).expect("Failed to format");
            }
        })
    });
}

pub fn bench_make(c: &mut Criterion) {
    c.bench_function("make", |b| {
        b.iter_batched_ref(
            setup_shell,
            |shell| shell.execute(black_box("make -j 8 all")).expect("Failed to execute"),
            BatchSize::SmallInput,
        )
    });
}
