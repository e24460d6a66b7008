//! Frame scheduler
//!
//! `Idle -> Running -> Terminal` over the host's animation-frame facility.
//! At most one frame request is outstanding at any time, and leaving
//! `Running` always cancels it, so a disposed game never gets ticked.

use std::fmt;

use thiserror::Error;

/// The host's "call me on the next frame" facility
pub trait FrameHost {
    type Handle: Copy + fmt::Debug;

    /// Ask for one callback on the next frame. None if the host refused.
    fn request_frame(&mut self) -> Option<Self::Handle>;
    fn cancel_frame(&mut self, handle: Self::Handle);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerPhase {
    Idle,
    Running,
    /// The run ended on its own; `start` may begin a new one
    Terminal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SchedulerError {
    #[error("scheduler is already running")]
    AlreadyRunning,
    #[error("no frame expected while {0:?}")]
    NotRunning(SchedulerPhase),
}

/// What the caller should do after a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Next frame is scheduled
    Continue,
    /// Scheduling stopped; show the game-over UI
    Finished,
}

pub struct FrameScheduler<H: FrameHost> {
    host: H,
    phase: SchedulerPhase,
    pending: Option<H::Handle>,
    frames: u64,
}

impl<H: FrameHost> FrameScheduler<H> {
    pub fn new(host: H) -> Self {
        Self {
            host,
            phase: SchedulerPhase::Idle,
            pending: None,
            frames: 0,
        }
    }

    pub fn phase(&self) -> SchedulerPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == SchedulerPhase::Running
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Frames run since the last `start`
    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Enter `Running` and request the first frame
    pub fn start(&mut self) -> Result<(), SchedulerError> {
        if self.phase == SchedulerPhase::Running {
            log::warn!("start() while running");
            return Err(SchedulerError::AlreadyRunning);
        }
        self.cancel_pending();
        self.phase = SchedulerPhase::Running;
        self.frames = 0;
        self.schedule();
        log::info!("Scheduler running");
        Ok(())
    }

    /// Guard at the top of a frame callback. The host has fired the pending
    /// request, so it is no longer outstanding.
    pub fn begin_frame(&mut self) -> Result<(), SchedulerError> {
        if self.phase != SchedulerPhase::Running {
            log::warn!("Frame rejected while {:?}", self.phase);
            return Err(SchedulerError::NotRunning(self.phase));
        }
        self.pending = None;
        self.frames += 1;
        Ok(())
    }

    /// Reschedule, or stop for good when the run has ended
    pub fn end_frame(&mut self, terminal: bool) -> FrameOutcome {
        if self.phase != SchedulerPhase::Running {
            return FrameOutcome::Finished;
        }
        if terminal {
            self.finish();
            return FrameOutcome::Finished;
        }
        self.schedule();
        FrameOutcome::Continue
    }

    /// `Running -> Terminal` without waiting for the next frame
    pub fn finish(&mut self) {
        self.cancel_pending();
        if self.phase == SchedulerPhase::Running {
            self.phase = SchedulerPhase::Terminal;
            log::info!("Scheduler finished after {} frames", self.frames);
        }
    }

    /// Cancel any pending frame and go back to `Idle`. Idempotent.
    pub fn stop(&mut self) {
        self.cancel_pending();
        if self.phase != SchedulerPhase::Idle {
            log::info!("Scheduler stopped");
        }
        self.phase = SchedulerPhase::Idle;
    }

    fn schedule(&mut self) {
        // Never two outstanding requests
        if self.pending.is_some() {
            return;
        }
        self.pending = self.host.request_frame();
        if self.pending.is_none() {
            log::warn!("Host refused a frame request");
        }
    }

    fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.host.cancel_frame(handle);
        }
    }
}

impl<H: FrameHost> Drop for FrameScheduler<H> {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}
