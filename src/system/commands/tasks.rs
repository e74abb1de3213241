//! `tasks`.

use core::fmt::{self, Write};

use crate::platform::{MAX_TASK_NAME_LEN, MAX_TASKS, TaskInfo, TaskIntrospection, TaskList};
use crate::system::shell::{Command, Context, EXIT_FAILURE, EXIT_SUCCESS};

/// Column header printed before the task rows.
pub const TASK_LIST_HEADER: &str = "Task Name\tStatus\tPrio\tHWM\tTask Number\n";

/// `tasks`: print the scheduler's task list.
///
/// Returns [`EXIT_FAILURE`] without printing anything when the scheduler
/// reports more tasks than a [`TaskList`] can hold.
pub fn tasks_command<P: TaskIntrospection>() -> Command<P> {
    Command {
        name: "tasks",
        help: Some("Get information about running tasks"),
        hint: None,
        handler: tasks::<P>,
    }
}

fn tasks<P: TaskIntrospection>(ctx: &mut Context<'_, P>, _argc: usize, _argv: &[&str]) -> i32 {
    let count = ctx.platform().task_count();
    if count > MAX_TASKS {
        log::error!(
            "failed to allocate buffer for task list: {} tasks, room for {}",
            count,
            MAX_TASKS
        );
        return EXIT_FAILURE;
    }

    let mut tasks = TaskList::new();
    ctx.platform().snapshot_tasks(&mut tasks);

    ctx.print(TASK_LIST_HEADER);
    for task in &tasks {
        let _ = write_task_row(ctx, task);
    }
    EXIT_SUCCESS
}

/// Write one task row: name padded to the maximum name length, then state
/// code, priority, stack high-water mark and task number, tab separated.
pub fn write_task_row<W: Write>(out: &mut W, task: &TaskInfo) -> fmt::Result {
    writeln!(
        out,
        "{:<width$}\t{}\t{}\t{}\t{}",
        task.name.as_str(),
        task.state,
        task.priority,
        task.stack_high_water_mark,
        task.number,
        width = MAX_TASK_NAME_LEN
    )
}
