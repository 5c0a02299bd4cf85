use crate::jobs::JobTable;
use nix::errno::Errno;
use nix::sys::wait::{waitpid, WaitPidFlag, WaitStatus};
use nix::unistd::Pid;
use std::io::{self, Write};

/// Collects every child that has already terminated, without blocking.
///
/// Any child may be collected, not only background jobs. For each one that
/// was in the job table the entry is removed and `"<pid>: <command> has
/// terminated."` is written to `out`. Returns the number of notices written.
pub fn reap_all<W: Write>(jobs: &mut JobTable, out: &mut W) -> io::Result<usize> {
    let any_child = Pid::from_raw(-1);
    let mut notices = 0;
    loop {
        match waitpid(any_child, Some(WaitPidFlag::WNOHANG)) {
            Ok(WaitStatus::StillAlive) => break,
            Ok(status) => {
                let Some(pid) = status.pid() else { break };
                tracing::debug!(pid = pid.as_raw(), ?status, "reaped child");
                if let Some(command) = jobs.remove(pid) {
                    writeln!(out, "{}: {} has terminated.", pid, command)?;
                    notices += 1;
                }
            }
            Err(Errno::EINTR) => continue,
            Err(Errno::ECHILD) => break,
            Err(errno) => {
                tracing::warn!(%errno, "waitpid failed while reaping");
                break;
            }
        }
    }
    if notices > 0 {
        out.flush()?;
    }
    Ok(notices)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::spawn_background;
    use crate::testutil::{argv, process_lock};
    use nix::sys::signal::{kill, Signal};
    use std::thread;
    use std::time::{Duration, Instant};

    /// Polls the reaper until `jobs` drains or the deadline passes.
    fn reap_until_empty(jobs: &mut JobTable, out: &mut Vec<u8>) -> usize {
        let deadline = Instant::now() + Duration::from_secs(10);
        let mut notices = 0;
        while !jobs.is_empty() && Instant::now() < deadline {
            notices += reap_all(jobs, out).unwrap();
            thread::sleep(Duration::from_millis(20));
        }
        notices
    }

    #[test]
    fn test_reap_with_no_children_is_noop() {
        let _lock = process_lock();
        let mut jobs = JobTable::new();
        let mut out = Vec::new();
        for _ in 0..3 {
            assert_eq!(reap_all(&mut jobs, &mut out).unwrap(), 0);
        }
        assert!(out.is_empty());
    }

    #[test]
    fn test_reap_running_child_returns_immediately() {
        let _lock = process_lock();
        let mut jobs = JobTable::new();
        let pid = spawn_background(&argv(&["sleep", "5"]), &mut jobs).unwrap();
        let mut out = Vec::new();

        let start = Instant::now();
        assert_eq!(reap_all(&mut jobs, &mut out).unwrap(), 0);
        assert!(start.elapsed() < Duration::from_secs(1));
        assert!(jobs.contains(pid));

        kill(pid, Signal::SIGKILL).unwrap();
        assert_eq!(reap_until_empty(&mut jobs, &mut out), 1);
    }

    #[test]
    fn test_finished_background_job_is_announced_once() {
        let _lock = process_lock();
        let mut jobs = JobTable::new();
        let pid = spawn_background(&argv(&["sleep", "0.2"]), &mut jobs).unwrap();
        let mut out = Vec::new();

        assert_eq!(reap_until_empty(&mut jobs, &mut out), 1);
        assert!(!jobs.contains(pid));
        assert_eq!(
            String::from_utf8(out.clone()).unwrap(),
            format!("{}: sleep 0.2  has terminated.\n", pid)
        );

        assert_eq!(reap_all(&mut jobs, &mut out).unwrap(), 0);
        assert_eq!(
            String::from_utf8(out).unwrap().matches("has terminated").count(),
            1
        );
    }

    #[test]
    fn test_untracked_child_is_reaped_silently() {
        let _lock = process_lock();
        let mut other = JobTable::new();
        let pid = spawn_background(&argv(&["true"]), &mut other).unwrap();
        let mut jobs = JobTable::new();
        let mut out = Vec::new();

        let deadline = Instant::now() + Duration::from_secs(10);
        while Instant::now() < deadline {
            reap_all(&mut jobs, &mut out).unwrap();
            if waitpid(pid, Some(WaitPidFlag::WNOHANG)) == Err(Errno::ECHILD) {
                break;
            }
            thread::sleep(Duration::from_millis(20));
        }
        assert_eq!(waitpid(pid, Some(WaitPidFlag::WNOHANG)), Err(Errno::ECHILD));
        assert!(out.is_empty());
    }
}
