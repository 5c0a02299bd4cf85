use crate::builtins::dispatch;
use crate::error::Result;
use crate::exec::Launched;
use crate::foreground::ForegroundHandle;
use crate::input::{Line, LineReader};
use crate::jobs::JobTable;
use crate::parser::parse_line;
use crate::reaper::reap_all;
use crate::signals::SignalRouter;
use std::io::{self, Write};

/// Command-line options for a shell session.
#[derive(Debug, Clone, Copy)]
pub struct Options {
    /// Print a prompt before each line.
    pub emit_prompt: bool,
    /// Log every line read.
    pub verbose: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            emit_prompt: true,
            verbose: false,
        }
    }
}

/// Whether the main loop keeps going after a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// State of one interactive session: background jobs, the foreground
/// process, and the outcome of the last foreground command.
pub struct Shell {
    pub(crate) jobs: JobTable,
    pub(crate) foreground: ForegroundHandle,
    pub(crate) last_launch: Option<Launched>,
    options: Options,
}

impl Shell {
    pub fn new(options: Options) -> Self {
        Shell {
            jobs: JobTable::new(),
            foreground: ForegroundHandle::new(),
            last_launch: None,
            options,
        }
    }

    pub fn jobs(&self) -> &JobTable {
        &self.jobs
    }

    pub fn foreground(&self) -> &ForegroundHandle {
        &self.foreground
    }

    pub fn last_launch(&self) -> Option<Launched> {
        self.last_launch
    }

    /// Parses and runs one line of input.
    pub fn execute_line<W: Write>(&mut self, line: &str, out: &mut W) -> Result<Flow> {
        if self.options.verbose {
            tracing::info!(line = line.trim(), "received command");
        }
        match parse_line(line)? {
            Some(argv) => dispatch(self, &argv, out),
            None => Ok(Flow::Continue),
        }
    }

    /// Runs the main shell loop: reaps finished jobs, reads a line, and
    /// evaluates it, until end of input or an `exit`.
    pub fn run(&mut self) -> Result<()> {
        let mut input = LineReader::new(self.options.emit_prompt);
        let mut router = SignalRouter::new(self.foreground.clone(), self.options.emit_prompt);
        if input.is_editor() {
            router = router.without_reprompt();
        }
        let router = router.install()?;
        let mut stdout = io::stdout();

        loop {
            reap_all(&mut self.jobs, &mut stdout)?;

            let line = match input.read_line() {
                Ok(Line::Text(line)) => line,
                Ok(Line::Interrupted) => {
                    writeln!(stdout)?;
                    continue;
                }
                Ok(Line::Eof) => {
                    writeln!(stdout)?;
                    break;
                }
                Err(e) => {
                    eprintln!("ssi: error reading input: {}", e);
                    break;
                }
            };

            match self.execute_line(&line, &mut stdout) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Exit) => break,
                Err(e) => eprintln!("ssi: {}", e),
            }
        }

        input.save_history();
        router.close();
        Ok(())
    }
}
