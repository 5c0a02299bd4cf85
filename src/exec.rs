use crate::error::{Result, ShellError};
use crate::foreground::ForegroundHandle;
use crate::jobs::JobTable;
use nix::errno::Errno;
use nix::libc;
use nix::sys::wait::{waitpid, WaitStatus};
use nix::unistd::{fork, write, ForkResult, Pid};
use std::ffi::{CStr, CString};
use std::ptr;

/// How the shell runs an external command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Foreground,
    Background,
}

/// What happened after a successful launch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Launched {
    /// A foreground command ran to completion with this status.
    Completed(WaitStatus),
    /// A background command was started and recorded in the job table.
    Background(Pid),
}

/// Executes an external command, inheriting the shell's stdin, stdout and stderr.
///
/// In the foreground the calling thread blocks until that child terminates,
/// with `foreground` naming the child for the whole wait. In the background
/// the child is recorded in `jobs` and the call returns immediately.
///
/// If the program cannot be executed, the child reports it and exits with
/// status 1; the launch itself still succeeds.
pub fn execute_command(
    argv: &[String],
    mode: Mode,
    foreground: &ForegroundHandle,
    jobs: &mut JobTable,
) -> Result<Launched> {
    match mode {
        Mode::Foreground => run_foreground(argv, foreground).map(Launched::Completed),
        Mode::Background => spawn_background(argv, jobs).map(Launched::Background),
    }
}

/// Runs `argv` and waits for exactly that child to terminate.
pub fn run_foreground(argv: &[String], foreground: &ForegroundHandle) -> Result<WaitStatus> {
    let args = ExecArgs::new(argv)?;
    let child = spawn(&args)?;
    foreground.set(child);
    tracing::debug!(pid = child.as_raw(), command = %argv.join(" "), "foreground process started");

    // The child stays a zombie until it is collected, so the router can
    // never be left holding a pid that was already handed back to the OS.
    if let Err(err) = wait_until_exited(child) {
        foreground.clear();
        return Err(err);
    }
    foreground.clear();
    let status = collect(child);
    tracing::debug!(pid = child.as_raw(), ?status, "foreground process finished");
    status
}

/// Starts `argv` without waiting and records it in the job table.
pub fn spawn_background(argv: &[String], jobs: &mut JobTable) -> Result<Pid> {
    let args = ExecArgs::new(argv)?;
    let child = spawn(&args)?;
    let command = command_text(argv);
    tracing::debug!(pid = child.as_raw(), %command, "background process started");
    jobs.insert(child, &command);
    Ok(child)
}

/// Rebuilds the command line shown for a background job: every argument
/// followed by a single space.
pub fn command_text(argv: &[String]) -> String {
    let mut text = String::new();
    for arg in argv {
        text.push_str(arg);
        text.push(' ');
    }
    text
}

/// An argument vector in the shape execvp takes, built before forking so the
/// child never has to allocate.
struct ExecArgs {
    args: Vec<CString>,
    /// Pointers into `args`, terminated by a null pointer.
    ptrs: Vec<*const libc::c_char>,
}

impl ExecArgs {
    fn new(argv: &[String]) -> Result<Self> {
        if argv.is_empty() {
            return Err(ShellError::Parse("empty command".into()));
        }
        let args = argv
            .iter()
            .map(|arg| CString::new(arg.as_str()).map_err(ShellError::from))
            .collect::<Result<Vec<_>>>()?;
        let ptrs = args
            .iter()
            .map(|arg| arg.as_ptr())
            .chain(std::iter::once(ptr::null()))
            .collect();
        Ok(ExecArgs { args, ptrs })
    }

    fn program(&self) -> &CStr {
        &self.args[0]
    }
}

fn spawn(args: &ExecArgs) -> Result<Pid> {
    // SAFETY: the child only calls execvp, write and _exit, all async-signal
    // safe, on buffers that were fully built before the fork.
    match unsafe { fork() } {
        Ok(ForkResult::Parent { child }) => Ok(child),
        Ok(ForkResult::Child) => exec_child(args),
        Err(errno) => Err(ShellError::Fork(errno)),
    }
}

fn exec_child(args: &ExecArgs) -> ! {
    // SAFETY: both pointers come from `args`, which outlives the call, and
    // `ptrs` is null-terminated.
    unsafe { libc::execvp(args.program().as_ptr(), args.ptrs.as_ptr()) };
    report_exec_failure(args.program(), Errno::last());
    // SAFETY: _exit skips atexit handlers and stdio flushing, which belong
    // to the parent's copy of the process.
    unsafe { libc::_exit(1) }
}

/// Writes `ssi: <program>: <reason>` to stderr without allocating.
fn report_exec_failure(program: &CStr, errno: Errno) {
    let parts: [&[u8]; 5] = [
        b"ssi: ",
        program.to_bytes(),
        b": ",
        errno.desc().as_bytes(),
        b"\n",
    ];
    for part in parts {
        let _ = write(libc::STDERR_FILENO, part);
    }
}

/// Blocks until `child` has terminated, leaving it waitable.
fn wait_until_exited(child: Pid) -> Result<()> {
    loop {
        // SAFETY: siginfo_t is plain old data and waitid only writes into it.
        let mut info: libc::siginfo_t = unsafe { std::mem::zeroed() };
        let rc = unsafe {
            libc::waitid(
                libc::P_PID,
                child.as_raw() as libc::id_t,
                &mut info,
                libc::WEXITED | libc::WNOWAIT,
            )
        };
        if rc == 0 {
            return Ok(());
        }
        match Errno::last() {
            Errno::EINTR => continue,
            errno => return Err(ShellError::Wait(errno)),
        }
    }
}

fn collect(child: Pid) -> Result<WaitStatus> {
    loop {
        match waitpid(child, None) {
            Ok(status) => return Ok(status),
            Err(Errno::EINTR) => continue,
            Err(errno) => return Err(ShellError::Wait(errno)),
        }
    }
}
