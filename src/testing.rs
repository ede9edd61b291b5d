//! Testing utilities for manr
//!
//! This module provides fakes for the two system boundaries: `MemoryFs`,
//! an in-memory manual tree, and `ScriptedJobControl`, a terminal whose
//! pager reports a scripted sequence of statuses.
//!
//! Only available when compiled with `cfg(test)`.

use std::cell::RefCell;
use std::collections::{BTreeSet, VecDeque};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};
use nix::errno::Errno;
use nix::sys::signal::Signal;
use nix::unistd::Pid;

use crate::delivery::job::{ChildStatus, JobControl};
use crate::delivery::DeliveryError;
use crate::resolve::error::{ResolveError, Result as ResolveResult};
use crate::resolve::ManFs;

/// In-memory set of files standing in for the manual trees
///
/// Every `exists` and `glob_first` call is recorded, so tests can check
/// which parts of the tree were looked at.
///
/// # Examples
/// ```ignore
/// let fs = MemoryFs::new(["/usr/share/man/man1/ls.1"]);
/// assert!(fs.exists(Path::new("/usr/share/man/man1/ls.1")));
/// assert_eq!(fs.probe_count(), 1);
/// ```
#[derive(Debug, Default)]
pub struct MemoryFs {
    files: BTreeSet<PathBuf>,
    probes: RefCell<Vec<String>>,
}

impl MemoryFs {
    pub fn new<I, P>(files: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            files: files.into_iter().map(Into::into).collect(),
            probes: RefCell::new(Vec::new()),
        }
    }

    /// Number of lookups made so far
    pub fn probe_count(&self) -> usize {
        self.probes.borrow().len()
    }

    /// Number of lookups made below `prefix`
    pub fn probed_under(&self, prefix: &str) -> usize {
        self.probes
            .borrow()
            .iter()
            .filter(|probe| probe.starts_with(prefix))
            .count()
    }

    fn record(&self, probe: String) {
        self.probes.borrow_mut().push(probe);
    }
}

impl ManFs for MemoryFs {
    fn exists(&self, path: &Path) -> bool {
        self.record(path.display().to_string());
        self.files.contains(path)
    }

    fn glob_first(&self, pattern: &str) -> ResolveResult<Option<PathBuf>> {
        self.record(pattern.to_string());
        let compiled = Pattern::new(pattern).map_err(|e| ResolveError::invalid_glob(pattern, &e.to_string()))?;
        let options = MatchOptions {
            require_literal_separator: true,
            ..MatchOptions::default()
        };
        Ok(self
            .files
            .iter()
            .find(|file| compiled.matches_path_with(file, options))
            .cloned())
    }
}

/// Job control fake driven by a script of pager statuses
///
/// The terminal starts out held either by this run or by the shell. A
/// self-stop is treated as the shell continuing the run in the foreground
/// straight away.
#[derive(Debug)]
pub struct ScriptedJobControl {
    pub own: Pid,
    pub shell: Pid,
    pub foreground: Pid,
    pub spawned: Vec<Pid>,
    pub spawned_argv: Vec<Vec<OsString>>,
    pub resumed: Vec<Pid>,
    pub stops: Vec<Signal>,
    script: VecDeque<ChildStatus>,
    next_pid: i32,
}

impl ScriptedJobControl {
    fn with_foreground(script: Vec<ChildStatus>, in_foreground: bool) -> Self {
        let own = Pid::from_raw(100);
        let shell = Pid::from_raw(1);
        Self {
            own,
            shell,
            foreground: if in_foreground { own } else { shell },
            spawned: Vec::new(),
            spawned_argv: Vec::new(),
            resumed: Vec::new(),
            stops: Vec::new(),
            script: script.into(),
            next_pid: 200,
        }
    }

    /// This run starts out holding the terminal
    pub fn in_foreground(script: Vec<ChildStatus>) -> Self {
        Self::with_foreground(script, true)
    }

    /// The shell holds the terminal when the run starts
    pub fn in_background(script: Vec<ChildStatus>) -> Self {
        Self::with_foreground(script, false)
    }
}

impl JobControl for ScriptedJobControl {
    fn own_group(&self) -> Result<Pid, DeliveryError> {
        Ok(self.own)
    }

    fn shell_group(&self) -> Result<Pid, DeliveryError> {
        Ok(self.shell)
    }

    fn foreground_group(&self) -> Result<Pid, DeliveryError> {
        Ok(self.foreground)
    }

    fn set_foreground(&mut self, group: Pid) -> Result<(), DeliveryError> {
        self.foreground = group;
        Ok(())
    }

    fn signal_own_group(&mut self, signal: Signal) -> Result<(), DeliveryError> {
        self.stops.push(signal);
        self.foreground = self.own;
        Ok(())
    }

    fn spawn_pager(&mut self, argv: &[OsString]) -> Result<Pid, DeliveryError> {
        let pid = Pid::from_raw(self.next_pid);
        self.next_pid += 1;
        self.spawned.push(pid);
        self.spawned_argv.push(argv.to_vec());
        Ok(pid)
    }

    fn resume(&mut self, pager: Pid) -> Result<(), DeliveryError> {
        self.resumed.push(pager);
        Ok(())
    }

    fn wait(&mut self, _pager: Pid) -> Result<ChildStatus, DeliveryError> {
        self.script
            .pop_front()
            .ok_or_else(|| DeliveryError::control("wait", Errno::ECHILD))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_fs_glob_is_sorted_and_segment_bound() {
        let fs = MemoryFs::new(["/m/man3/foo.3x", "/m/man3/foo.3", "/m/man3/sub/foo.3"]);
        assert_eq!(
            fs.glob_first("/m/man3/foo.[01-9]*").unwrap(),
            Some(PathBuf::from("/m/man3/foo.3"))
        );
        assert_eq!(fs.glob_first("/m/*/foo.3").unwrap(), Some(PathBuf::from("/m/man3/foo.3")));
        assert_eq!(fs.probed_under("/m"), 2);
    }
}
