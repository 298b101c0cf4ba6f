//! Scheduling primitives the animator consumes from its host.
//!
//! The host owns the clock and the event source. It hands out opaque
//! handles for frame requests, one-shot timers and resize subscriptions,
//! and later delivers those handles back to the animator. [`Scheduler`]
//! implements the bookkeeping half of that contract against a clock the
//! caller advances, so it serves both the terminal loop and tests.

use std::time::Duration;

use crate::Size;

/// Identifies one requested frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

/// Identifies one pending one-shot timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

/// Identifies a live resize subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResizeSubscription(u64);

/// Services a host provides to a mounted animation.
pub trait Host {
    /// Current viewport size in pixels.
    fn viewport(&self) -> Size;

    /// Ask for one callback before the next repaint.
    fn request_frame(&mut self) -> FrameHandle;

    /// Withdraw a frame request. Unknown handles are ignored.
    fn cancel_frame(&mut self, handle: FrameHandle);

    /// Ask for one callback after `delay`.
    fn set_timeout(&mut self, delay: Duration) -> TimerHandle;

    /// Withdraw a timer. Unknown or already fired handles are ignored.
    fn clear_timeout(&mut self, handle: TimerHandle);

    /// Start receiving viewport size changes.
    fn subscribe_resize(&mut self) -> ResizeSubscription;

    /// Stop receiving viewport size changes.
    fn unsubscribe_resize(&mut self, subscription: ResizeSubscription);
}

/// Call counters, useful for checking teardown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HostStats {
    pub frames_requested: u64,
    pub frames_cancelled: u64,
    pub frames_delivered: u64,
    pub timers_set: u64,
    pub timers_cleared: u64,
    pub timers_fired: u64,
    pub resize_subscriptions: u64,
    pub resize_unsubscriptions: u64,
    pub resizes_delivered: u64,
}

#[derive(Debug, Clone, Copy)]
struct PendingTimer {
    handle: TimerHandle,
    due: Duration,
}

/// Host bookkeeping driven by an externally advanced clock.
#[derive(Debug)]
pub struct Scheduler {
    viewport: Size,
    now: Duration,
    next_id: u64,
    pending_frame: Option<FrameHandle>,
    timers: Vec<PendingTimer>,
    resize_subscription: Option<ResizeSubscription>,
    stats: HostStats,
}

impl Scheduler {
    /// Create a scheduler at time zero.
    pub fn new(viewport: Size) -> Self {
        Self {
            viewport,
            now: Duration::ZERO,
            next_id: 1,
            pending_frame: None,
            timers: Vec::new(),
            resize_subscription: None,
            stats: HostStats::default(),
        }
    }

    fn next_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Time elapsed since the scheduler was created.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Move the clock forward by `elapsed`.
    pub fn advance(&mut self, elapsed: Duration) {
        self.now += elapsed;
    }

    /// Move the clock to `now`. The clock never runs backwards.
    pub fn set_now(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }

    pub fn has_pending_frame(&self) -> bool {
        self.pending_frame.is_some()
    }

    /// Take the pending frame request for delivery, if any.
    pub fn take_frame(&mut self) -> Option<FrameHandle> {
        let handle = self.pending_frame.take()?;
        self.stats.frames_delivered += 1;
        Some(handle)
    }

    /// Remove and return every timer due at the current time, earliest first.
    pub fn take_due_timers(&mut self) -> Vec<TimerHandle> {
        let now = self.now;
        let mut due: Vec<PendingTimer> = Vec::new();
        self.timers.retain(|timer| {
            if timer.due <= now {
                due.push(*timer);
                false
            } else {
                true
            }
        });
        due.sort_by_key(|timer| timer.due);
        self.stats.timers_fired += due.len() as u64;
        due.into_iter().map(|timer| timer.handle).collect()
    }

    /// When the earliest pending timer falls due.
    pub fn next_timer_deadline(&self) -> Option<Duration> {
        self.timers.iter().map(|timer| timer.due).min()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn is_resize_subscribed(&self) -> bool {
        self.resize_subscription.is_some()
    }

    /// Record a new viewport size.
    ///
    /// Returns `true` when a subscriber should be told about it.
    pub fn resize(&mut self, viewport: Size) -> bool {
        self.viewport = viewport;
        if self.resize_subscription.is_some() {
            self.stats.resizes_delivered += 1;
            true
        } else {
            false
        }
    }

    pub fn stats(&self) -> HostStats {
        self.stats
    }
}

impl Host for Scheduler {
    fn viewport(&self) -> Size {
        self.viewport
    }

    fn request_frame(&mut self) -> FrameHandle {
        let handle = FrameHandle(self.next_id());
        self.pending_frame = Some(handle);
        self.stats.frames_requested += 1;
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.pending_frame == Some(handle) {
            self.pending_frame = None;
            self.stats.frames_cancelled += 1;
        }
    }

    fn set_timeout(&mut self, delay: Duration) -> TimerHandle {
        let handle = TimerHandle(self.next_id());
        self.timers.push(PendingTimer {
            handle,
            due: self.now + delay,
        });
        self.stats.timers_set += 1;
        handle
    }

    fn clear_timeout(&mut self, handle: TimerHandle) {
        let before = self.timers.len();
        self.timers.retain(|timer| timer.handle != handle);
        if self.timers.len() != before {
            self.stats.timers_cleared += 1;
        }
    }

    fn subscribe_resize(&mut self) -> ResizeSubscription {
        let subscription = ResizeSubscription(self.next_id());
        self.resize_subscription = Some(subscription);
        self.stats.resize_subscriptions += 1;
        subscription
    }

    fn unsubscribe_resize(&mut self, subscription: ResizeSubscription) {
        if self.resize_subscription == Some(subscription) {
            self.resize_subscription = None;
            self.stats.resize_unsubscriptions += 1;
        }
    }
}
