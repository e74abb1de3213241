use criterion::{BatchSize, Criterion, Throughput};
use libconsole::system::shell::{Context, EXIT_SUCCESS, Shell};
use std::hint::black_box;

fn discard(_: &str) {}

fn consume_args(_ctx: &mut Context<'_, ()>, argc: usize, argv: &[&str]) -> i32 {
    black_box(&argv[..argc]);
    EXIT_SUCCESS
}

fn setup_shell() -> Shell<()> {
    let mut shell = Shell::new(());
    shell.set_output_function(discard);
    shell.set_echo(false);
    for name in ["alpha", "beta", "gamma", "delta", "epsilon", "zeta"] {
        shell
            .register_command(name, Some("bench command"), None, consume_args)
            .expect("Failed to register");
    }
    shell
}

pub fn bench_input(c: &mut Criterion) {
    let mut group = c.benchmark_group("input");
    let line = b"zeta one two \"three four\" five\r";
    group.throughput(Throughput::Bytes(line.len() as u64));
    group.bench_function("input", |b| {
        b.iter_batched_ref(
            setup_shell,
            |shell| shell.input(black_box(line)).expect("Failed to input"),
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

pub fn bench_execute(c: &mut Criterion) {
    let mut shell = setup_shell();
    c.bench_function("execute", |b| {
        b.iter(|| {
            shell
                .execute(black_box("epsilon -v --name \"quoted \\\"arg\\\"\" 42"))
                .expect("Failed to execute")
        })
    });
}

pub fn bench_unrecognized(c: &mut Criterion) {
    let mut shell = setup_shell();
    c.bench_function("unrecognized", |b| {
        b.iter(|| shell.execute(black_box("omega")).expect("Failed to execute"))
    });
}
