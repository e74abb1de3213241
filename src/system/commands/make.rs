//! `make`: keeps people who type build commands into the device console sane.
//!
//! Someone following an onboarding guide sooner or later types `make flash
//! monitor` into the device console instead of their host terminal. Rather
//! than "Unrecognized command", the device plays back what they expected to
//! see, and resets on `monitor` as a real flash would. The third attempt
//! without a power cycle gets a hint instead.

use core::fmt::{self, Write};

use crate::platform::Platform;
use crate::storage::{RetainedSlot, Storage};
use crate::system::shell::{Command, Context, EXIT_SUCCESS};

/// Retained slot counting `make` invocations since the last power-on.
pub const MAKE_INVOCATIONS: RetainedSlot = RetainedSlot::new(0);

/// Invocation number from which the transcript is replaced by the hint.
pub const EASTER_EGG_THRESHOLD: u32 = 3;

const FLASH_CHUNK_DELAY_MS: u32 = 200;

const EASTER_EGG: &str = "This is not the console you are looking for.\n";

const BUILD_OUTPUT: &str = "LD build/console.elf\n\
esptool.py v2.1-beta1\n";

const FLASH_OUTPUT: [&str; 5] = [
    "Flashing binaries to serial port (*) (app at offset 0x10000)...\n\
esptool.py v2.1-beta1\n\
Connecting....\n",
    "Chip is ESP32D0WDQ6 (revision 0)\n\
Uploading stub...\n\
Running stub...\n\
Stub running...\n\
Changing baud rate to 921600\n\
Changed.\n\
Configuring flash size...\n\
Auto-detected Flash size: 4MB\n\
Flash params set to 0x0220\n\
Compressed 15712 bytes to 9345...\n",
    "Wrote 15712 bytes (9345 compressed) at 0x00001000 in 0.1 seconds (effective 1126.9 kbit/s)...\n\
Hash of data verified.\n\
Compressed 333776 bytes to 197830...\n",
    "Wrote 333776 bytes (197830 compressed) at 0x00010000 in 3.3 seconds (effective 810.3 kbit/s)...\n\
Hash of data verified.\n\
Compressed 3072 bytes to 82...\n",
    "Wrote 3072 bytes (82 compressed) at 0x00008000 in 0.0 seconds (effective 1588.4 kbit/s)...\n\
Hash of data verified.\n\
Leaving...\n\
Hard resetting...\n",
];

const COLOR_YELLOW: &str = "\x1b[0;33m";
const COLOR_RESET: &str = "\x1b[0m";

const MONITOR_BANNER: &str = "--- idf_monitor on (*) 115200 ---\n\
--- Quit: Ctrl+] | Menu: Ctrl+T | Help: Ctrl+T followed by Ctrl+H --\n";

/// `make`: hidden from `help`, hinted as `all | flash | monitor`.
pub fn make_command<P: Platform>() -> Command<P> {
    Command {
        name: "make",
        help: None,
        hint: Some("all | flash | monitor"),
        handler: make::<P>,
    }
}

/// Which stages a `make` invocation plays back.
///
/// Stages always run in build, flash, monitor order, whatever the order of
/// the targets on the command line.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MakePlan {
    /// Print the link output.
    pub build: bool,
    /// Print the flashing transcript.
    pub flash: bool,
    /// Print the monitor banner and reset.
    pub monitor: bool,
}

/// A target `make` has no rule for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoRule<'a>(
    /// The target as typed.
    pub &'a str,
);

impl fmt::Display for NoRule<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "make: *** No rule to make target `{}'.  Stop.", self.0)
    }
}

/// Work out the stages for the given targets (`argv` without `make`).
///
/// - `all` builds, `flash` builds and flashes, `monitor` monitors
/// - tokens starting with `-` or a digit are ignored, so `-j 8` and `-j8` pass
/// - no targets at all means `all`
///
/// # Errors
///
/// The first token that matches none of the above.
///
/// # Examples
///
/// ```rust
/// use libconsole::system::commands::{MakePlan, NoRule, parse_targets};
///
/// let plan = parse_targets(&["-j", "4", "flash"]).unwrap();
/// assert_eq!(plan, MakePlan { build: true, flash: true, monitor: false });
///
/// assert_eq!(parse_targets(&["clean"]), Err(NoRule("clean")));
/// ```
pub fn parse_targets<'a>(targets: &[&'a str]) -> Result<MakePlan, NoRule<'a>> {
    let mut plan = MakePlan::default();

    for &target in targets {
        match target {
            "all" => plan.build = true,
            "flash" => {
                plan.build = true;
                plan.flash = true;
            }
            "monitor" => plan.monitor = true,
            // -j and friends
            flag if flag.starts_with('-') => {}
            // argument to -j
            number if number.starts_with(|c: char| c.is_ascii_digit()) => {}
            unknown => return Err(NoRule(unknown)),
        }
    }

    if targets.is_empty() {
        plan.build = true;
    }

    Ok(plan)
}

fn make<P: Platform>(ctx: &mut Context<'_, P>, argc: usize, argv: &[&str]) -> i32 {
    if !count_invocation(ctx.platform().retention()) {
        ctx.print(EASTER_EGG);
        return EXIT_SUCCESS;
    }

    let targets = argv.get(1..argc).unwrap_or_default();
    let plan = match parse_targets(targets) {
        Ok(plan) => plan,
        Err(no_rule) => {
            // Technically an error, but a failure status would spoil the act.
            let _ = writeln!(ctx, "{}", no_rule);
            return EXIT_SUCCESS;
        }
    };

    if plan.build {
        ctx.print(BUILD_OUTPUT);
    }

    if plan.flash {
        for chunk in FLASH_OUTPUT {
            ctx.print(chunk);
            ctx.platform().delay_ms(FLASH_CHUNK_DELAY_MS);
        }
    }

    if plan.monitor {
        ctx.print("MONITOR\n");
        ctx.print(COLOR_YELLOW);
        ctx.print(MONITOR_BANNER);
        ctx.print(COLOR_RESET);
        ctx.platform().restart();
    }

    EXIT_SUCCESS
}

/// Bump the retained invocation counter.
///
/// Returns `false` once the count reaches [`EASTER_EGG_THRESHOLD`]; the
/// counter is not written back in that case, so it stays there until the
/// retention memory is lost.
fn count_invocation<S: Storage>(retention: &mut S) -> bool {
    let previous = match MAKE_INVOCATIONS.load(retention) {
        Ok(count) => count.unwrap_or(0),
        Err(err) => {
            log::warn!("cannot read make invocation count: {:?}", err);
            0
        }
    };

    let count = previous.saturating_add(1);
    if count >= EASTER_EGG_THRESHOLD {
        return false;
    }

    if let Err(err) = MAKE_INVOCATIONS.store(retention, count) {
        log::warn!("cannot store make invocation count: {:?}", err);
    }
    true
}
