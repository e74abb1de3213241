//! Command console for embedded systems.
//!
//! This module implements the console facility the system commands plug
//! into: a fixed-capacity command registry, a line editor fed one byte at a
//! time, an argument tokenizer and a synchronous dispatcher. Nothing here
//! allocates; every buffer is a [`heapless`] collection.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │   Line Editor   │───▶│   Tokenizer     │───▶│   Registry      │
//! │   (echo, BS)    │    │   (argc/argv)   │    │   lookup        │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//!                                                        │
//!                                                        ▼
//!                        ┌─────────────────┐    ┌─────────────────┐
//!                        │   Output fn     │◀───│   Handler       │
//!                        │   (UART, ...)   │    │   (Context<P>)  │
//!                        └─────────────────┘    └─────────────────┘
//! ```
//!
//! The shell owns a platform value `P` and lends it to each handler through
//! a [`Context`], together with a writer bound to the shell's output
//! function. Handlers run to completion before the next line is read.
//!
//! # Usage Examples
//!
//! ```rust
//! use core::fmt::Write;
//! use libconsole::system::shell::{Context, Shell};
//!
//! fn hello(ctx: &mut Context<'_, ()>, argc: usize, argv: &[&str]) -> i32 {
//!     let who = if argc > 1 { argv[1] } else { "World" };
//!     let _ = writeln!(ctx, "Hello, {}!", who);
//!     0
//! }
//!
//! let mut shell = Shell::new(());
//! shell.set_output_function(|text| print!("{}", text));
//! shell.register_command("hello", Some("Say hello"), Some("[name]"), hello).unwrap();
//!
//! shell.input(b"hello world\r").unwrap();
//! assert_eq!(shell.last_status(), Some(0));
//! ```
//!
//! ## Argument syntax
//!
//! ```text
//! > echo "Hello World"           # Quoted argument with spaces
//! > echo "Line 1\nLine 2"        # Escape sequences within quotes
//! > make -j 4 flash              # Flags are passed through untouched
//! ```

use core::fmt;
use core::str;

use heapless::Vec;

/// Maximum length of a command line in bytes.
pub const MAX_LINE_LEN: usize = 256;

/// Maximum number of arguments per command line, including the command name.
pub const MAX_ARGS: usize = 16;

/// Maximum number of commands a shell can hold.
pub const MAX_COMMANDS: usize = 32;

/// ASCII backspace character (0x08).
pub const ASCII_BACKSPACE: u8 = 0x08;
/// ASCII line feed character (0x0A).
pub const ASCII_LF: u8 = 0x0A;
/// ASCII carriage return character (0x0D).
pub const ASCII_CR: u8 = 0x0D;
/// ASCII delete character (0x7F).
pub const ASCII_DEL: u8 = 0x7F;
/// ASCII space character (0x20).
pub const ASCII_SPACE: u8 = 0x20;

/// Status returned by a handler that succeeded.
pub const EXIT_SUCCESS: i32 = 0;
/// Generic failure status.
pub const EXIT_FAILURE: i32 = 1;

const HELP_COMMAND: &str = "help";
const HELP_COMMAND_TEXT: &str = "Print the list of registered commands";

/// Errors reported by the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellError {
    /// The command name is empty or contains a space.
    InvalidParameter,
    /// A command with the same name is already registered.
    DuplicateCommand,
    /// The registry already holds [`MAX_COMMANDS`] commands.
    OutOfMemory,
    /// The input line exceeded [`MAX_LINE_LEN`] bytes.
    BufferOverflow,
}

impl fmt::Display for ShellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShellError::InvalidParameter => f.write_str("invalid command name"),
            ShellError::DuplicateCommand => f.write_str("command already registered"),
            ShellError::OutOfMemory => f.write_str("command registry is full"),
            ShellError::BufferOverflow => f.write_str("input line too long"),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ShellError {
    fn format(&self, f: defmt::Formatter) {
        match self {
            ShellError::InvalidParameter => defmt::write!(f, "InvalidParameter"),
            ShellError::DuplicateCommand => defmt::write!(f, "DuplicateCommand"),
            ShellError::OutOfMemory => defmt::write!(f, "OutOfMemory"),
            ShellError::BufferOverflow => defmt::write!(f, "BufferOverflow"),
        }
    }
}

/// Function signature for command handlers.
///
/// Handlers receive the execution [`Context`], the argument count and the
/// argument strings. `argv[0]` is always the command name. The returned
/// value is the command's exit status; anything other than
/// [`EXIT_SUCCESS`] is reported on the console.
pub type CommandFn<P> = fn(&mut Context<'_, P>, usize, &[&str]) -> i32;

/// Function signature for output handlers.
///
/// Receives every piece of text the shell or a handler prints and forwards
/// it to the user (UART, USB CDC, RTT, ...).
pub type OutputFn = fn(&str);

/// A registered command.
///
/// `help` is shown by the built-in `help` listing and by `<cmd> --help`.
/// Commands without help text are hidden from the listing but still run.
/// `hint` is a short usage string such as `"all | flash | monitor"`.
pub struct Command<P> {
    /// Name as typed by the user. Unique within a shell.
    pub name: &'static str,
    /// Help text, or `None` to hide the command from the listing.
    pub help: Option<&'static str>,
    /// Argument hint shown next to the name.
    pub hint: Option<&'static str>,
    /// Function implementing the command.
    pub handler: CommandFn<P>,
}

impl<P> Clone for Command<P> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<P> Copy for Command<P> {}

impl<P> fmt::Debug for Command<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("help", &self.help)
            .field("hint", &self.hint)
            .finish_non_exhaustive()
    }
}

/// `fmt::Write` adapter over an optional [`OutputFn`].
#[derive(Clone, Copy)]
struct Output(Option<OutputFn>);

impl fmt::Write for Output {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        if let Some(output_fn) = self.0 {
            output_fn(s);
        }
        Ok(())
    }
}

/// Execution context handed to a command handler.
///
/// Gives the handler mutable access to the platform and implements
/// [`fmt::Write`], so `write!`/`writeln!` print to the console.
pub struct Context<'a, P> {
    platform: &'a mut P,
    out: Output,
}

impl<'a, P> Context<'a, P> {
    /// Build a context around `platform` printing through `output_fn`.
    pub fn new(platform: &'a mut P, output_fn: Option<OutputFn>) -> Self {
        Self {
            platform,
            out: Output(output_fn),
        }
    }

    /// Platform services available to the handler.
    pub fn platform(&mut self) -> &mut P {
        self.platform
    }

    /// Print `text` verbatim.
    pub fn print(&mut self, text: &str) {
        let _ = fmt::Write::write_str(&mut self.out, text);
    }
}

impl<P> fmt::Write for Context<'_, P> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        fmt::Write::write_str(&mut self.out, s)
    }
}

impl<P> fmt::Debug for Context<'_, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context").finish_non_exhaustive()
    }
}

/// Line buffer plus the spans of the tokens parsed out of it.
#[derive(Debug, Default)]
struct LineBuffer {
    bytes: Vec<u8, MAX_LINE_LEN>,
    spans: Vec<(usize, usize), MAX_ARGS>,
}

impl LineBuffer {
    fn push(&mut self, byte: u8) -> Result<(), ShellError> {
        self.bytes.push(byte).map_err(|_| ShellError::BufferOverflow)
    }

    fn pop(&mut self) -> bool {
        self.bytes.pop().is_some()
    }

    fn load(&mut self, line: &str) -> Result<(), ShellError> {
        self.clear();
        self.bytes
            .extend_from_slice(line.as_bytes())
            .map_err(|_| ShellError::BufferOverflow)
    }

    fn clear(&mut self) {
        self.bytes.clear();
        self.spans.clear();
    }

    /// Split the line into tokens, unescaping quoted arguments in place.
    ///
    /// - arguments are separated by spaces
    /// - `"..."` groups spaces into one argument; an unterminated quote runs
    ///   to the end of the line
    /// - inside quotes `\"`, `\\`, `\n`, `\t` and `\r` are unescaped, any
    ///   other escaped byte is kept as-is
    /// - tokens past [`MAX_ARGS`] are dropped
    fn tokenize(&mut self) {
        self.spans.clear();
        let buf = &mut self.bytes[..];
        let len = buf.len();
        let mut i = 0;

        while i < len && !self.spans.is_full() {
            while i < len && buf[i] == ASCII_SPACE {
                i += 1;
            }
            if i >= len {
                break;
            }

            if buf[i] == b'"' {
                i += 1;
                let start = i;
                let mut write = i;

                while i < len {
                    match buf[i] {
                        b'\\' if i + 1 < len => {
                            buf[write] = match buf[i + 1] {
                                b'n' => b'\n',
                                b't' => b'\t',
                                b'r' => b'\r',
                                other => other,
                            };
                            write += 1;
                            i += 2;
                        }
                        b'"' => {
                            i += 1;
                            break;
                        }
                        byte => {
                            buf[write] = byte;
                            write += 1;
                            i += 1;
                        }
                    }
                }

                let _ = self.spans.push((start, write));
            } else {
                let start = i;
                while i < len && buf[i] != ASCII_SPACE && buf[i] != b'"' {
                    i += 1;
                }
                let _ = self.spans.push((start, i));
            }
        }
    }

    /// Fill `argv` with the parsed tokens and return their count.
    fn argv<'a>(&'a self, argv: &mut [&'a str; MAX_ARGS]) -> usize {
        for (slot, &(start, end)) in argv.iter_mut().zip(self.spans.iter()) {
            *slot = str::from_utf8(&self.bytes[start..end]).unwrap_or("");
        }
        self.spans.len()
    }
}

/// Console shell: registry, line editor and dispatcher.
///
/// # Examples
///
/// ```rust
/// use libconsole::system::shell::Shell;
///
/// let mut shell = Shell::new(());
/// shell.set_echo(false);
/// shell.set_output_function(|text| print!("{}", text));
/// shell.execute("help").unwrap();
/// ```
pub struct Shell<P> {
    line: LineBuffer,
    commands: Vec<Command<P>, MAX_COMMANDS>,
    platform: P,
    output_fn: Option<OutputFn>,
    echo_enabled: bool,
    help_enabled: bool,
    help_command_enabled: bool,
    discarding: bool,
    last_status: Option<i32>,
}

impl<P: Default> Default for Shell<P> {
    fn default() -> Self {
        Self::new(P::default())
    }
}

impl<P: fmt::Debug> fmt::Debug for Shell<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Shell")
            .field("commands", &self.commands)
            .field("platform", &self.platform)
            .field("echo_enabled", &self.echo_enabled)
            .field("help_enabled", &self.help_enabled)
            .field("help_command_enabled", &self.help_command_enabled)
            .field("discarding", &self.discarding)
            .field("last_status", &self.last_status)
            .finish_non_exhaustive()
    }
}

impl<P> Shell<P> {
    /// Create a shell owning `platform`.
    ///
    /// Echo, the `--help` flag and the built-in `help` command start
    /// enabled. No output function is set and the registry is empty.
    pub fn new(platform: P) -> Self {
        Self {
            line: LineBuffer::default(),
            commands: Vec::new(),
            platform,
            output_fn: None,
            echo_enabled: true,
            help_enabled: true,
            help_command_enabled: true,
            discarding: false,
            last_status: None,
        }
    }

    /// Set the function receiving all console output.
    pub fn set_output_function(&mut self, output_fn: OutputFn) {
        self.output_fn = Some(output_fn);
    }

    /// Enable or disable echoing of typed characters.
    pub fn set_echo(&mut self, enabled: bool) {
        self.echo_enabled = enabled;
    }

    /// Enable or disable `<cmd> -h` / `<cmd> --help`.
    pub fn set_help(&mut self, enabled: bool) {
        self.help_enabled = enabled;
    }

    /// Enable or disable the built-in `help` listing command.
    pub fn set_help_command(&mut self, enabled: bool) {
        self.help_command_enabled = enabled;
    }

    /// Register a command.
    ///
    /// # Errors
    ///
    /// * [`ShellError::InvalidParameter`] - empty name or name containing a space
    /// * [`ShellError::DuplicateCommand`] - a command with this name exists
    /// * [`ShellError::OutOfMemory`] - [`MAX_COMMANDS`] already registered
    ///
    /// # Examples
    ///
    /// ```rust
    /// use libconsole::system::shell::{Shell, ShellError};
    ///
    /// let mut shell = Shell::new(());
    /// shell.register_command("uptime", Some("Show uptime"), None, |_, _, _| 0).unwrap();
    ///
    /// let again = shell.register_command("uptime", None, None, |_, _, _| 0);
    /// assert_eq!(again, Err(ShellError::DuplicateCommand));
    /// ```
    pub fn register_command(
        &mut self,
        name: &'static str,
        help: Option<&'static str>,
        hint: Option<&'static str>,
        handler: CommandFn<P>,
    ) -> Result<(), ShellError> {
        self.register(Command {
            name,
            help,
            hint,
            handler,
        })
    }

    /// Register a prepared [`Command`]. See [`register_command`](Self::register_command).
    pub fn register(&mut self, command: Command<P>) -> Result<(), ShellError> {
        if command.name.is_empty() || command.name.contains(' ') {
            return Err(ShellError::InvalidParameter);
        }
        if self.find(command.name).is_some() {
            return Err(ShellError::DuplicateCommand);
        }

        self.commands
            .push(command)
            .map_err(|_| ShellError::OutOfMemory)?;
        log::debug!("registered command '{}'", command.name);
        Ok(())
    }

    /// Registered commands in registration order.
    pub fn commands(&self) -> &[Command<P>] {
        &self.commands
    }

    /// Look up a registered command by name.
    pub fn find(&self, name: &str) -> Option<&Command<P>> {
        self.commands.iter().find(|cmd| cmd.name == name)
    }

    /// The platform lent to handlers.
    pub fn platform(&self) -> &P {
        &self.platform
    }

    /// Mutable access to the platform.
    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }

    /// Consume the shell and return its platform.
    pub fn into_platform(self) -> P {
        self.platform
    }

    /// Exit status of the most recently executed handler.
    ///
    /// `None` until a registered command has run. Built-in commands and
    /// unknown names leave it untouched.
    pub fn last_status(&self) -> Option<i32> {
        self.last_status
    }

    /// Feed raw input bytes to the line editor.
    ///
    /// - **CR/LF** executes the current line
    /// - **Backspace/Delete** removes the last character
    /// - **Printable ASCII** is appended and echoed
    /// - other control bytes are ignored
    ///
    /// # Errors
    ///
    /// [`ShellError::BufferOverflow`] if the line grows past
    /// [`MAX_LINE_LEN`]. The whole line is discarded: everything up to the
    /// next CR/LF is dropped, including bytes passed in later calls.
    pub fn input(&mut self, data: &[u8]) -> Result<(), ShellError> {
        let mut result = Ok(());

        for &byte in data {
            match byte {
                ASCII_CR | ASCII_LF => {
                    if self.echo_enabled {
                        self.output(if byte == ASCII_CR { "\r" } else { "\n" });
                    }
                    if !self.discarding {
                        self.process_line();
                    }
                    self.discarding = false;
                    self.line.clear();
                }
                _ if self.discarding => {}
                ASCII_BACKSPACE | ASCII_DEL => {
                    if self.line.pop() && self.echo_enabled {
                        self.output("\x08 \x08");
                    }
                }
                0x20..=0x7E => {
                    if let Err(err) = self.line.push(byte) {
                        self.line.clear();
                        self.discarding = true;
                        log::warn!("console line longer than {} bytes discarded", MAX_LINE_LEN);
                        self.output("\r\nLine too long\r\n");
                        result = Err(err);
                        continue;
                    }
                    if self.echo_enabled {
                        let mut utf8 = [0u8; 4];
                        self.output(char::from(byte).encode_utf8(&mut utf8));
                    }
                }
                _ => {}
            }
        }

        result
    }

    /// Execute one complete command line, bypassing the line editor.
    ///
    /// # Errors
    ///
    /// [`ShellError::BufferOverflow`] if `line` is longer than [`MAX_LINE_LEN`].
    pub fn execute(&mut self, line: &str) -> Result<(), ShellError> {
        self.line.load(line)?;
        self.process_line();
        self.line.clear();
        Ok(())
    }

    fn out(&self) -> Output {
        Output(self.output_fn)
    }

    fn output(&self, text: &str) {
        if let Some(output_fn) = self.output_fn {
            output_fn(text);
        }
    }

    fn process_line(&mut self) {
        self.line.tokenize();

        let mut argv = [""; MAX_ARGS];
        let argc = self.line.argv(&mut argv);
        if argc == 0 {
            return;
        }
        let name = argv[0];

        let command = self.find(name).copied();

        if self.help_enabled && argc == 2 && (argv[1] == "-h" || argv[1] == "--help") {
            if let Some(cmd) = command.filter(|cmd| cmd.help.is_some()) {
                self.show_command_help(&cmd);
                return;
            }
        }

        match command {
            Some(cmd) => {
                let mut ctx = Context::new(&mut self.platform, self.output_fn);
                let status = (cmd.handler)(&mut ctx, argc, &argv[..argc]);
                self.last_status = Some(status);

                if status != EXIT_SUCCESS {
                    log::debug!("command '{}' returned {}", cmd.name, status);
                    let _ = fmt::Write::write_fmt(
                        &mut self.out(),
                        format_args!("Command returned non-zero error code: 0x{:x}\r\n", status),
                    );
                }
            }
            None if self.help_command_enabled && name == HELP_COMMAND => self.list_commands(),
            None => {
                log::debug!("unrecognized command '{}'", name);
                if self.help_command_enabled {
                    self.output("Unrecognized command. Type 'help' to see available commands.\r\n");
                } else {
                    self.output("Unrecognized command\r\n");
                }
            }
        }
    }

    fn show_command_help(&self, cmd: &Command<P>) {
        if let Some(help) = cmd.help {
            self.output(help);
            self.output("\r\n");
        }
        if let Some(hint) = cmd.hint {
            self.output("Usage: ");
            self.output(cmd.name);
            self.output(" ");
            self.output(hint);
            self.output("\r\n");
        }
    }

    /// Built-in `help`: every command with help text, in registration order.
    fn list_commands(&self) {
        self.output(HELP_COMMAND);
        self.output("\r\n  ");
        self.output(HELP_COMMAND_TEXT);
        self.output("\r\n\r\n");

        for cmd in self.commands.iter() {
            let Some(help) = cmd.help else {
                continue;
            };

            self.output(cmd.name);
            if let Some(hint) = cmd.hint {
                self.output(" ");
                self.output(hint);
            }
            self.output("\r\n  ");
            self.output(help);
            self.output("\r\n\r\n");
        }
    }
}
