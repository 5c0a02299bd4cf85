use crate::foreground::ForegroundHandle;
use crate::prompt;
use nix::sys::signal::{kill, Signal};
use nix::unistd::Pid;
use signal_hook::consts::signal::SIGINT;
use signal_hook::iterator::{Handle, Signals};
use std::io::{self, Write};
use std::thread;

/// Outcome of routing one interrupt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Routed {
    /// The interrupt was passed on to the foreground process.
    Forwarded(Pid),
    /// No foreground process: a newline and a fresh prompt were written.
    Reprompted,
    /// No foreground process, but the line editor owns the terminal and
    /// redraws its own prompt, so nothing was written.
    Ignored,
}

/// Decides where an interrupt goes.
///
/// The router only ever reads the foreground handle. It never touches the job
/// table, which belongs to the shell's control thread.
#[derive(Debug, Clone)]
pub struct SignalRouter {
    foreground: ForegroundHandle,
    emit_prompt: bool,
    reprompt: bool,
}

impl SignalRouter {
    pub fn new(foreground: ForegroundHandle, emit_prompt: bool) -> Self {
        SignalRouter {
            foreground,
            emit_prompt,
            reprompt: true,
        }
    }

    /// Disables the idle newline and prompt. Used while a line editor is
    /// reading, since writing behind its back leaves the screen out of step
    /// with the line being edited.
    pub fn without_reprompt(mut self) -> Self {
        self.reprompt = false;
        self
    }

    /// Sends `signal` to the foreground process, or, when the shell is idle,
    /// writes a newline and a new prompt to `out`.
    pub fn route<W: Write>(&self, signal: Signal, out: &mut W) -> Routed {
        if let Some(pid) = self.foreground.get() {
            tracing::debug!(pid = pid.as_raw(), ?signal, "forwarding to foreground process");
            if let Err(errno) = kill(pid, signal) {
                tracing::warn!(pid = pid.as_raw(), %errno, "failed to forward signal");
            }
            return Routed::Forwarded(pid);
        }

        tracing::debug!(?signal, "interrupt with no foreground process");
        if !self.reprompt {
            return Routed::Ignored;
        }
        let result = if self.emit_prompt {
            write!(out, "\n{}", prompt::render())
        } else {
            writeln!(out)
        };
        if let Err(err) = result.and_then(|_| out.flush()) {
            tracing::warn!(%err, "failed to redisplay prompt");
        }
        Routed::Reprompted
    }

    /// Installs the router for SIGINT.
    ///
    /// The OS-level handler only records the signal; a dedicated thread picks
    /// it up and does the routing, so the work never runs inside the signal
    /// handler itself. Closing the returned handle stops the thread.
    pub fn install(self) -> io::Result<Handle> {
        let mut signals = Signals::new([SIGINT])?;
        let handle = signals.handle();
        thread::Builder::new()
            .name("signal-router".into())
            .spawn(move || {
                for raw in signals.forever() {
                    match Signal::try_from(raw) {
                        Ok(signal) => {
                            self.route(signal, &mut io::stdout().lock());
                        }
                        Err(errno) => tracing::warn!(raw, %errno, "unknown signal number"),
                    }
                }
            })?;
        Ok(handle)
    }
}
