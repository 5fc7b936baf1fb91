use crate::core::time::SimulationClock;
use crate::error::HostError;
use crate::runtime::host::{FrameHandle, Host};

/// Timing for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTick {
    /// Seconds since the loop started.
    pub elapsed: f32,
    /// Seconds since the previous frame.
    pub dt: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum LoopState {
    Stopped,
    Running {
        clock: SimulationClock,
        /// Frame requested from the host and not yet delivered.
        pending: Option<FrameHandle>,
    },
}

/// Frame scheduling against the host clock.
///
/// At most one frame is pending at a time. Stopping cancels it and drops the
/// clock, so a restart begins again at elapsed zero.
pub struct RenderLoop {
    state: LoopState,
    frames: u64,
}

impl RenderLoop {
    pub fn new() -> Self {
        Self {
            state: LoopState::Stopped,
            frames: 0,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, LoopState::Running { .. })
    }

    pub fn pending(&self) -> Option<FrameHandle> {
        match self.state {
            LoopState::Running { pending, .. } => pending,
            LoopState::Stopped => None,
        }
    }

    /// Frames delivered since the last start.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Capture the clock and schedule the first frame. No-op while running.
    pub fn start<H: Host>(&mut self, host: &mut H) -> Result<(), HostError> {
        if self.is_running() {
            return Ok(());
        }
        let clock = SimulationClock::start(host.now_ms());
        let handle = host.request_frame()?;
        self.state = LoopState::Running {
            clock,
            pending: Some(handle),
        };
        self.frames = 0;
        Ok(())
    }

    /// A scheduled frame fired. Returns its timing, or `None` if the loop
    /// was stopped in the meantime.
    pub fn frame(&mut self, now_ms: f64) -> Option<FrameTick> {
        match &mut self.state {
            LoopState::Stopped => None,
            LoopState::Running { clock, pending } => {
                *pending = None;
                let (elapsed, dt) = clock.tick(now_ms);
                self.frames += 1;
                Some(FrameTick { elapsed, dt })
            }
        }
    }

    /// Schedule the next frame if running and none is pending.
    pub fn rearm<H: Host>(&mut self, host: &mut H) -> Result<(), HostError> {
        if let LoopState::Running { pending, .. } = &mut self.state {
            if pending.is_none() {
                *pending = Some(host.request_frame()?);
            }
        }
        Ok(())
    }

    /// Cancel any pending frame and discard the clock.
    /// Returns whether the loop was running.
    pub fn stop<H: Host>(&mut self, host: &mut H) -> bool {
        match std::mem::replace(&mut self.state, LoopState::Stopped) {
            LoopState::Running { pending, .. } => {
                if let Some(handle) = pending {
                    host.cancel_frame(handle);
                }
                true
            }
            LoopState::Stopped => false,
        }
    }
}

impl Default for RenderLoop {
    fn default() -> Self {
        Self::new()
    }
}
