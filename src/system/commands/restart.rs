//! `restart`.

use crate::platform::SystemControl;
use crate::system::shell::{Command, Context};

/// `restart`: reset the system. The handler never returns.
pub fn restart_command<P: SystemControl>() -> Command<P> {
    Command {
        name: "restart",
        help: Some("Restart the program"),
        hint: None,
        handler: restart::<P>,
    }
}

fn restart<P: SystemControl>(ctx: &mut Context<'_, P>, _argc: usize, _argv: &[&str]) -> i32 {
    log::info!("Restarting");
    ctx.platform().restart()
}
