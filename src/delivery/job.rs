//! Terminal job control for the pager
//!
//! The pager runs in its own process group and must own the terminal while
//! it runs. This process must only hand over the terminal while it holds it
//! itself, and must follow the pager into the background when the user
//! suspends it, so the shell sees the whole job as stopped.
//!
//! The negotiation is a small state machine. Every round observes who holds
//! the terminal and `step` decides what to do:
//!
//! | terminal held by | pager      | step                                  |
//! |------------------|------------|---------------------------------------|
//! | this run         | not spawned| spawn the pager, give it the terminal |
//! | this run         | spawned    | give it the terminal, continue it     |
//! | the pager        | any        | take the terminal back, then stop this group with the pager's stop signal, unless that was `SIGTTIN` |
//! | someone else     | any        | stop this group with the last stop signal |
//!
//! After spawning or continuing, the run waits for the pager. A stop goes
//! back to the top of the table; an exit ends the negotiation.

use std::ffi::OsString;

use nix::sys::signal::Signal;
use nix::unistd::Pid;
use tracing::{debug, info};

use super::error::Result;

/// Status reported for the pager process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildStatus {
    Stopped(Signal),
    Exited(i32),
    Signaled(Signal),
}

/// Process-control capability used by the negotiation
pub trait JobControl {
    /// Process group of this run
    ///
    /// # Errors
    /// Returns `DeliveryError::ProcessControl` if the group cannot be read.
    fn own_group(&self) -> Result<Pid>;

    /// Group to give the terminal back to when the run ends
    ///
    /// # Errors
    /// Returns `DeliveryError::ProcessControl` if the group cannot be read.
    fn shell_group(&self) -> Result<Pid>;

    /// Current foreground process group of the terminal
    ///
    /// # Errors
    /// Returns `DeliveryError::ProcessControl` if the terminal cannot be queried.
    fn foreground_group(&self) -> Result<Pid>;

    /// Make `group` the foreground process group of the terminal
    ///
    /// # Errors
    /// Returns `DeliveryError::ProcessControl` if the terminal refuses.
    fn set_foreground(&mut self, group: Pid) -> Result<()>;

    /// Deliver `signal` to this run's own process group
    ///
    /// # Errors
    /// Returns `DeliveryError::ProcessControl` if the signal cannot be sent.
    fn signal_own_group(&mut self, signal: Signal) -> Result<()>;

    /// Start the pager in a process group of its own
    ///
    /// # Errors
    /// Returns `DeliveryError::Spawn` if the program cannot be started.
    fn spawn_pager(&mut self, argv: &[OsString]) -> Result<Pid>;

    /// Continue a stopped pager
    ///
    /// # Errors
    /// Returns `DeliveryError::ProcessControl` if the signal cannot be sent.
    fn resume(&mut self, pager: Pid) -> Result<()>;

    /// Block until the pager stops or terminates
    ///
    /// # Errors
    /// Returns `DeliveryError::ProcessControl` if waiting fails.
    fn wait(&mut self, pager: Pid) -> Result<ChildStatus>;
}

/// Where the negotiation stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    /// This run does not hold the terminal and is waiting to be continued
    Background,
    /// The pager holds the terminal
    Foreground,
    /// The pager stopped with a signal
    Stopped(Signal),
    /// The pager is gone
    Exited,
}

/// Who holds the terminal, seen from this run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Holder {
    Us,
    Pager,
    Other(Pid),
}

impl Holder {
    #[must_use]
    pub fn classify(foreground: Pid, own: Pid, pager: Option<Pid>) -> Self {
        if foreground == own {
            Self::Us
        } else if Some(foreground) == pager {
            Self::Pager
        } else {
            Self::Other(foreground)
        }
    }
}

/// One row of the transition table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Spawn,
    Resume(Pid),
    /// Take the terminal back from the pager, then optionally stop
    Reclaim { then_stop: Option<Signal> },
    /// Stop this group until the shell continues it in the foreground
    Stop(Signal),
}

/// Decide the next step from the current holder of the terminal
#[must_use]
pub fn step(holder: Holder, pager: Option<Pid>, last_stop: Signal) -> Step {
    match (holder, pager) {
        (Holder::Us, None) => Step::Spawn,
        (Holder::Us, Some(pid)) => Step::Resume(pid),
        (Holder::Pager, _) => Step::Reclaim {
            then_stop: (last_stop != Signal::SIGTTIN).then_some(last_stop),
        },
        (Holder::Other(_), _) => Step::Stop(last_stop),
    }
}

/// Record of a finished negotiation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Negotiation {
    pub state: JobState,
    pub pager: Option<Pid>,
    pub last_stop: Signal,
    /// Group that held the terminal before this run took it
    pub terminal_owner: Pid,
    /// How often this run stopped itself
    pub suspensions: usize,
}

/// Run the pager to completion under job control
///
/// Spawns exactly one pager. Returns once it has exited or was killed.
///
/// # Errors
/// Returns `DeliveryError` if any process-control call fails.
pub fn negotiate<J: JobControl + ?Sized>(control: &mut J, argv: &[OsString]) -> Result<Negotiation> {
    let own = control.own_group()?;
    let mut job = Negotiation {
        state: JobState::Background,
        pager: None,
        last_stop: Signal::SIGSTOP,
        terminal_owner: control.shell_group()?,
        suspensions: 0,
    };

    loop {
        let holder = Holder::classify(control.foreground_group()?, own, job.pager);
        let next = step(holder, job.pager, job.last_stop);
        debug!(?holder, ?next, state = ?job.state, "job control");

        let pager = match next {
            Step::Stop(signal) => {
                if let Holder::Other(group) = holder {
                    job.terminal_owner = group;
                }
                suspend(control, &mut job, signal)?;
                continue;
            }
            Step::Reclaim { then_stop } => {
                control.set_foreground(own)?;
                if let Some(signal) = then_stop {
                    suspend(control, &mut job, signal)?;
                }
                continue;
            }
            Step::Spawn => {
                let pid = control.spawn_pager(argv)?;
                info!(pid = pid.as_raw(), "pager started");
                control.set_foreground(pid)?;
                job.pager = Some(pid);
                pid
            }
            Step::Resume(pid) => {
                control.set_foreground(pid)?;
                control.resume(pid)?;
                pid
            }
        };
        job.state = JobState::Foreground;

        match control.wait(pager)? {
            ChildStatus::Stopped(signal) => {
                debug!(?signal, "pager stopped");
                job.state = JobState::Stopped(signal);
                job.last_stop = signal;
            }
            status @ (ChildStatus::Exited(_) | ChildStatus::Signaled(_)) => {
                debug!(?status, "pager finished");
                job.state = JobState::Exited;
                return Ok(job);
            }
        }
    }
}

fn suspend<J: JobControl + ?Sized>(control: &mut J, job: &mut Negotiation, signal: Signal) -> Result<()> {
    job.state = JobState::Background;
    job.suspensions += 1;
    control.signal_own_group(signal)
}

/// Give the terminal back to its previous owner
///
/// Only done while the terminal still belongs to this run or its pager;
/// if the user has moved on to another job it is left alone.
///
/// # Errors
/// Returns `DeliveryError::ProcessControl` if the terminal cannot be queried
/// or handed over.
pub fn restore_terminal<J: JobControl + ?Sized>(
    control: &mut J,
    owner: Pid,
    pager: Option<Pid>,
) -> Result<()> {
    let own = control.own_group()?;
    let current = control.foreground_group()?;
    if current != owner && matches!(Holder::classify(current, own, pager), Holder::Us | Holder::Pager) {
        control.set_foreground(owner)?;
    }
    Ok(())
}
