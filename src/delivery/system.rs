//! Job control on the real terminal

use std::ffi::OsString;
use std::io;
use std::os::fd::{AsFd, BorrowedFd, OwnedFd};
use std::os::unix::process::CommandExt;
use std::process::Command;
use std::time::Duration;

use nix::errno::Errno;
use nix::sys::signal::{self, SigSet, SigmaskHow, Signal};
use nix::sys::wait::{WaitPidFlag, WaitStatus, waitpid};
use nix::unistd::{self, Pid};

use super::error::{DeliveryError, Result};
use super::job::{ChildStatus, JobControl};

/// Job control through the process's standard output terminal
#[derive(Debug)]
pub struct SystemJobControl {
    terminal: OwnedFd,
}

impl SystemJobControl {
    /// Attach to the terminal on standard output
    ///
    /// # Errors
    /// Returns `DeliveryError::IoError` if standard output cannot be duplicated.
    pub fn from_stdout() -> Result<Self> {
        let terminal = io::stdout().as_fd().try_clone_to_owned()?;
        Ok(Self { terminal })
    }
}

/// Run `f` with `SIGTTOU` blocked, so a background group may change the
/// terminal's foreground group
fn without_ttou<T>(f: impl FnOnce() -> nix::Result<T>) -> nix::Result<T> {
    let mut blocked = SigSet::empty();
    blocked.add(Signal::SIGTTOU);
    let mut previous = SigSet::empty();
    signal::sigprocmask(SigmaskHow::SIG_BLOCK, Some(&blocked), Some(&mut previous))?;
    let result = f();
    signal::sigprocmask(SigmaskHow::SIG_SETMASK, Some(&previous), None)?;
    result
}

impl JobControl for SystemJobControl {
    fn own_group(&self) -> Result<Pid> {
        unistd::getpgid(None).map_err(|e| DeliveryError::control("getpgid", e))
    }

    fn shell_group(&self) -> Result<Pid> {
        let own = self.own_group()?;
        if own == unistd::getpid() {
            unistd::getpgid(Some(unistd::getppid())).map_err(|e| DeliveryError::control("getpgid", e))
        } else {
            Ok(own)
        }
    }

    fn foreground_group(&self) -> Result<Pid> {
        unistd::tcgetpgrp(&self.terminal).map_err(|e| DeliveryError::control("tcgetpgrp", e))
    }

    fn set_foreground(&mut self, group: Pid) -> Result<()> {
        without_ttou(|| unistd::tcsetpgrp(&self.terminal, group))
            .map_err(|e| DeliveryError::control("tcsetpgrp", e))
    }

    fn signal_own_group(&mut self, signal: Signal) -> Result<()> {
        signal::kill(Pid::from_raw(0), signal).map_err(|e| DeliveryError::control("kill", e))
    }

    fn spawn_pager(&mut self, argv: &[OsString]) -> Result<Pid> {
        let Some((program, args)) = argv.split_first() else {
            return Err(DeliveryError::Spawn {
                program: String::new(),
                source: io::Error::new(io::ErrorKind::InvalidInput, "empty pager command"),
            });
        };

        let mut command = Command::new(program);
        command.args(args).process_group(0);
        // SAFETY: the closure only makes async-signal-safe system calls.
        unsafe {
            command.pre_exec(take_terminal);
        }

        let child = command.spawn().map_err(|source| DeliveryError::Spawn {
            program: program.to_string_lossy().into_owned(),
            source,
        })?;
        let pid = i32::try_from(child.id())
            .map_err(|_| DeliveryError::control("fork", Errno::EOVERFLOW))?;
        Ok(Pid::from_raw(pid))
    }

    fn resume(&mut self, pager: Pid) -> Result<()> {
        signal::kill(pager, Signal::SIGCONT).map_err(|e| DeliveryError::control("kill", e))
    }

    fn wait(&mut self, pager: Pid) -> Result<ChildStatus> {
        loop {
            match waitpid(pager, Some(WaitPidFlag::WUNTRACED)) {
                Ok(WaitStatus::Stopped(_, signal)) => return Ok(ChildStatus::Stopped(signal)),
                Ok(WaitStatus::Exited(_, code)) => return Ok(ChildStatus::Exited(code)),
                Ok(WaitStatus::Signaled(_, signal, _)) => return Ok(ChildStatus::Signaled(signal)),
                Ok(_) | Err(Errno::EINTR) => {}
                Err(e) => return Err(DeliveryError::control("wait", e)),
            }
        }
    }
}

/// Runs in the pager child before exec: make its new group the terminal's
/// foreground group, and do not start the pager until that has happened.
fn take_terminal() -> io::Result<()> {
    // SAFETY: standard output stays open for the lifetime of the child.
    let terminal = unsafe { BorrowedFd::borrow_raw(nix::libc::STDOUT_FILENO) };
    let me = unistd::getpid();
    without_ttou(|| unistd::tcsetpgrp(terminal, me))?;
    while unistd::tcgetpgrp(terminal)? != me {
        std::thread::sleep(Duration::from_millis(100));
    }
    Ok(())
}
