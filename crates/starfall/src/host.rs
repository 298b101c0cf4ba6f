//! Wall-clock host for running the starfield in a terminal.

use std::time::{Duration, Instant};

use starfall_core::{
    FrameHandle, Host, HostStats, ResizeSubscription, Scheduler, Size, TimerHandle,
};

/// Longest time to block waiting for input when nothing is scheduled.
const IDLE_POLL: Duration = Duration::from_millis(250);

/// Serves frame requests at a fixed refresh interval and timers from a
/// monotonic clock.
#[derive(Debug)]
pub struct TerminalHost {
    scheduler: Scheduler,
    started: Instant,
    frame_interval: Duration,
    last_frame_at: Option<Duration>,
}

impl TerminalHost {
    pub fn new(viewport: Size, frame_interval: Duration) -> Self {
        Self {
            scheduler: Scheduler::new(viewport),
            started: Instant::now(),
            frame_interval,
            last_frame_at: None,
        }
    }

    /// Bring the scheduler clock up to date with the wall clock.
    pub fn tick(&mut self) {
        self.scheduler.set_now(self.started.elapsed());
    }

    fn frame_due_at(&self) -> Duration {
        self.last_frame_at
            .map_or(Duration::ZERO, |last| last + self.frame_interval)
    }

    /// The pending frame, once the next refresh is due.
    pub fn take_due_frame(&mut self) -> Option<FrameHandle> {
        let now = self.scheduler.now();
        if !self.scheduler.has_pending_frame() || now < self.frame_due_at() {
            return None;
        }
        self.last_frame_at = Some(now);
        self.scheduler.take_frame()
    }

    pub fn take_due_timers(&mut self) -> Vec<TimerHandle> {
        self.scheduler.take_due_timers()
    }

    /// Record a new viewport size; `true` if the subscriber should hear of it.
    pub fn resize(&mut self, viewport: Size) -> bool {
        self.scheduler.resize(viewport)
    }

    /// How long to wait for input before the next scheduled callback.
    pub fn poll_timeout(&self) -> Duration {
        let now = self.scheduler.now();
        let frame = self
            .scheduler
            .has_pending_frame()
            .then(|| self.frame_due_at());
        [frame, self.scheduler.next_timer_deadline()]
            .into_iter()
            .flatten()
            .map(|deadline| deadline.saturating_sub(now))
            .fold(IDLE_POLL, Duration::min)
    }

    pub fn stats(&self) -> HostStats {
        self.scheduler.stats()
    }
}

impl Host for TerminalHost {
    fn viewport(&self) -> Size {
        self.scheduler.viewport()
    }

    fn request_frame(&mut self) -> FrameHandle {
        self.scheduler.request_frame()
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.scheduler.cancel_frame(handle);
    }

    fn set_timeout(&mut self, delay: Duration) -> TimerHandle {
        self.tick();
        self.scheduler.set_timeout(delay)
    }

    fn clear_timeout(&mut self, handle: TimerHandle) {
        self.scheduler.clear_timeout(handle);
    }

    fn subscribe_resize(&mut self) -> ResizeSubscription {
        self.scheduler.subscribe_resize()
    }

    fn unsubscribe_resize(&mut self, subscription: ResizeSubscription) {
        self.scheduler.unsubscribe_resize(subscription);
    }
}
