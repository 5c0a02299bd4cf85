use crate::error::{Result, ShellError};
use crate::exec::{execute_command, Mode};
use crate::jobs::list_jobs;
use crate::reaper::reap_all;
use crate::shell::{Flow, Shell};
use std::env;
use std::io::Write;
use std::path::PathBuf;

/// Runs one argument vector: a built-in if the first word names one,
/// otherwise a foreground external command.
///
/// Supported built-ins are "cd", "bg", "bglist", "exit" and "quit".
pub fn dispatch<W: Write>(shell: &mut Shell, argv: &[String], out: &mut W) -> Result<Flow> {
    let Some(name) = argv.first() else {
        return Ok(Flow::Continue);
    };
    match name.as_str() {
        "exit" | "quit" => return Ok(Flow::Exit),
        "cd" => change_dir(argv.get(1).map(String::as_str))?,
        "bg" => {
            if argv.len() < 2 {
                return Err(ShellError::MissingCommand);
            }
            execute_command(&argv[1..], Mode::Background, &shell.foreground, &mut shell.jobs)?;
        }
        "bglist" => {
            reap_all(&mut shell.jobs, out)?;
            list_jobs(&shell.jobs, out)?;
            out.flush()?;
        }
        _ => {
            let launched =
                execute_command(argv, Mode::Foreground, &shell.foreground, &mut shell.jobs)?;
            shell.last_launch = Some(launched);
        }
    }
    Ok(Flow::Continue)
}

/// `cd` with no argument or `~` goes home, `~/dir` is relative to home.
fn change_dir(target: Option<&str>) -> Result<()> {
    let path = match target {
        None | Some("~") => home()?,
        Some(t) if t.starts_with("~/") => home()?.join(&t[2..]),
        Some(t) => PathBuf::from(t),
    };
    tracing::debug!(path = %path.display(), "changing directory");
    env::set_current_dir(&path).map_err(|source| ShellError::ChangeDir { path, source })
}

fn home() -> Result<PathBuf> {
    dirs_next::home_dir().ok_or(ShellError::NoHome)
}
