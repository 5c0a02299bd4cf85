use nix::unistd::Pid;
use std::collections::HashMap;
use std::io::{self, Write};

/// A background process the shell launched and has not yet reaped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackgroundJob {
    pub pid: Pid,
    pub command: String,
}

/// Background jobs keyed by process ID.
///
/// Only the shell's control thread touches the table, so it carries no lock.
/// An entry lives from the moment its process is launched until the reaper
/// observes the process exit.
#[derive(Debug, Default)]
pub struct JobTable {
    jobs: HashMap<Pid, BackgroundJob>,
}

impl JobTable {
    /// Creates a new, empty job table.
    pub fn new() -> Self {
        JobTable {
            jobs: HashMap::new(),
        }
    }

    /// Records a background job. A live pid is unique, so an existing entry
    /// under the same pid can only be stale and is replaced.
    pub fn insert(&mut self, pid: Pid, command: &str) {
        let job = BackgroundJob {
            pid,
            command: command.to_owned(),
        };
        if let Some(stale) = self.jobs.insert(pid, job) {
            tracing::warn!(pid = pid.as_raw(), command = %stale.command, "replaced stale job entry");
        }
    }

    /// Removes the job for `pid`, handing back its command text so the caller
    /// can announce the termination. Absent pids are ignored.
    pub fn remove(&mut self, pid: Pid) -> Option<String> {
        self.jobs.remove(&pid).map(|job| job.command)
    }

    #[cfg(test)]
    pub(crate) fn get(&self, pid: Pid) -> Option<&BackgroundJob> {
        self.jobs.get(&pid)
    }

    #[cfg(test)]
    pub(crate) fn contains(&self, pid: Pid) -> bool {
        self.jobs.contains_key(&pid)
    }

    /// Iterates over `(pid, command)` pairs without touching the table.
    /// Order is unspecified.
    pub fn list(&self) -> impl Iterator<Item = (Pid, &str)> + '_ {
        self.jobs.values().map(|job| (job.pid, job.command.as_str()))
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}

/// Prints the job listing shown by `bglist`, ending with the job count.
pub fn list_jobs<W: Write>(job_table: &JobTable, out: &mut W) -> io::Result<()> {
    let mut jobs: Vec<_> = job_table.list().collect();
    jobs.sort_by_key(|(pid, _)| pid.as_raw());
    for (pid, command) in jobs {
        writeln!(out, "{}: {}", pid, command)?;
    }
    writeln!(out, "Total Background jobs: {}", job_table.len())
}
