//! The starfield animator: static stars plus a stream of shooting comets.

use rand::{Rng, SeedableRng, rngs::StdRng};
use starfall_core::{
    AnimationSettings, FrameHandle, Host, ResizeSubscription, Size, Surface, TimerHandle,
};
use tracing::{debug, trace};

use crate::comet::Comet;
use crate::star::{self, Star};

/// Host resources held while mounted.
#[derive(Debug)]
struct Mount {
    /// Frame request waiting to be delivered.
    frame: Option<FrameHandle>,
    /// Initial spawn timer, until it fires.
    spawn_timer: Option<TimerHandle>,
    resize: ResizeSubscription,
}

/// Animated starfield.
///
/// Built by [`Starfield::mount`], driven by the host delivering frames,
/// timers and resizes, and stopped by [`Starfield::unmount`]. Once
/// unmounted every callback is a no-op.
#[derive(Debug)]
pub struct Starfield<R = StdRng> {
    settings: AnimationSettings,
    stars: Vec<Star>,
    comets: Vec<Comet>,
    frame_count: u64,
    size: Size,
    rng: R,
    mount: Option<Mount>,
}

impl Starfield<StdRng> {
    /// Mount with an entropy-seeded random source.
    pub fn mount<H: Host + ?Sized>(settings: AnimationSettings, host: &mut H) -> Self {
        Self::mount_with_rng(settings, StdRng::from_entropy(), host)
    }
}

impl<R: Rng> Starfield<R> {
    /// Mount using `rng` for every random draw.
    ///
    /// Scatters the stars over the current viewport, schedules the first
    /// comet, subscribes to resizes and requests the first frame.
    pub fn mount_with_rng<H: Host + ?Sized>(
        settings: AnimationSettings,
        mut rng: R,
        host: &mut H,
    ) -> Self {
        let settings = settings.sanitized();
        let size = host.viewport();
        let stars = star::generate(&mut rng, size, settings.star_count);

        let spawn_timer = host.set_timeout(settings.initial_spawn_delay());
        let resize = host.subscribe_resize();
        let frame = host.request_frame();

        debug!(
            width = size.width,
            height = size.height,
            stars = stars.len(),
            "starfield mounted"
        );

        Self {
            settings,
            stars,
            comets: Vec::new(),
            frame_count: 0,
            size,
            rng,
            mount: Some(Mount {
                frame: Some(frame),
                spawn_timer: Some(spawn_timer),
                resize,
            }),
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.mount.is_some()
    }

    pub fn settings(&self) -> &AnimationSettings {
        &self.settings
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    pub fn comets(&self) -> &[Comet] {
        &self.comets
    }

    /// Frames rendered since mount.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Surface size used for clears and new spawns.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Handle a viewport size change. Stars and comets stay where they are.
    pub fn on_resize(&mut self, size: Size) {
        if !self.is_mounted() {
            return;
        }
        debug!(width = size.width, height = size.height, "starfield resized");
        self.size = size;
    }

    /// Handle a fired timer.
    pub fn on_timer(&mut self, handle: TimerHandle) {
        let Some(mount) = self.mount.as_mut() else {
            return;
        };
        if mount.spawn_timer != Some(handle) {
            return;
        }
        mount.spawn_timer = None;
        self.spawn_comet();
    }

    /// Handle a delivered frame: draw one pass and request the next frame.
    ///
    /// Stale handles and frames arriving after unmount are ignored.
    pub fn on_frame<S, H>(&mut self, handle: FrameHandle, surface: &mut S, host: &mut H)
    where
        S: Surface + ?Sized,
        H: Host + ?Sized,
    {
        match self.mount.as_mut() {
            Some(mount) if mount.frame == Some(handle) => mount.frame = None,
            _ => return,
        }

        self.render(surface);

        if let Some(mount) = self.mount.as_mut() {
            mount.frame = Some(host.request_frame());
        }
    }

    /// Draw one frame: clear, stars, then advance and draw every comet.
    pub fn render<S: Surface + ?Sized>(&mut self, surface: &mut S) {
        surface.clear();
        for star in &self.stars {
            star.draw(surface);
        }

        self.step();

        for comet in &self.comets {
            comet.draw(surface);
        }
    }

    /// Advance the simulation by one frame without drawing.
    pub fn step(&mut self) {
        self.frame_count += 1;
        if self.frame_count % self.settings.spawn_interval_frames == 0
            && self.comets.len() < self.settings.max_comets
        {
            self.spawn_comet();
        }

        self.comets.retain(|comet| !comet.is_expired());

        let fade = self.settings.fade_frames;
        for comet in &mut self.comets {
            comet.advance(fade);
        }

        trace!(
            frame = self.frame_count,
            comets = self.comets.len(),
            "starfield frame"
        );
    }

    fn spawn_comet(&mut self) {
        let comet = Comet::spawn(&mut self.rng, self.size);
        debug!(
            x = comet.position.x,
            y = comet.position.y,
            max_life = comet.max_life,
            "comet spawned"
        );
        self.comets.push(comet);
    }

    /// Release host resources. Safe to call more than once.
    pub fn unmount<H: Host + ?Sized>(&mut self, host: &mut H) {
        let Some(mount) = self.mount.take() else {
            return;
        };
        if let Some(frame) = mount.frame {
            host.cancel_frame(frame);
        }
        if let Some(timer) = mount.spawn_timer {
            host.clear_timeout(timer);
        }
        host.unsubscribe_resize(mount.resize);
        debug!(frames = self.frame_count, "starfield unmounted");
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use starfall_core::{Rgba, Scheduler, Stroke, Vec2};

    use super::*;

    /// Surface double recording every call.
    #[derive(Debug, Default)]
    struct Recorder {
        clears: usize,
        circles: Vec<(Vec2, f32, Rgba)>,
        lines: Vec<(Vec2, Vec2, Stroke)>,
    }

    impl Surface for Recorder {
        fn clear(&mut self) {
            self.clears += 1;
            self.circles.clear();
            self.lines.clear();
        }

        fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
            self.circles.push((center, radius, color));
        }

        fn stroke_line(&mut self, from: Vec2, to: Vec2, stroke: &Stroke) {
            self.lines.push((from, to, stroke.clone()));
        }
    }

    fn mounted(seed: u64) -> (Starfield, Scheduler) {
        let mut host = Scheduler::new(Size::new(800, 600));
        let starfield = Starfield::mount_with_rng(
            AnimationSettings::default(),
            StdRng::seed_from_u64(seed),
            &mut host,
        );
        (starfield, host)
    }

    /// Deliver the pending frame, if any. Returns whether one was delivered.
    fn pump(starfield: &mut Starfield, host: &mut Scheduler, surface: &mut Recorder) -> bool {
        match host.take_frame() {
            Some(frame) => {
                starfield.on_frame(frame, surface, host);
                true
            }
            None => false,
        }
    }

    fn fire_timers(starfield: &mut Starfield, host: &mut Scheduler) {
        for timer in host.take_due_timers() {
            starfield.on_timer(timer);
        }
    }

    #[test]
    fn test_mount_generates_stars_and_schedules() {
        let (starfield, host) = mounted(1);
        assert!(starfield.is_mounted());
        assert_eq!(starfield.stars().len(), 160);
        assert!(starfield.comets().is_empty());
        assert_eq!(starfield.size(), Size::new(800, 600));
        for star in starfield.stars() {
            assert!(starfield.size().contains(star.position));
        }

        assert!(host.has_pending_frame());
        assert!(host.is_resize_subscribed());
        assert_eq!(
            host.next_timer_deadline(),
            Some(Duration::from_millis(600))
        );
        let stats = host.stats();
        assert_eq!(stats.timers_set, 1);
        assert_eq!(stats.resize_subscriptions, 1);
        assert_eq!(stats.frames_requested, 1);
    }

    #[test]
    fn test_mount_sanitizes_settings() {
        let mut host = Scheduler::new(Size::new(800, 600));
        let settings = AnimationSettings {
            spawn_interval_frames: 0,
            fade_frames: 0,
            ..AnimationSettings::default()
        };
        let starfield = Starfield::mount_with_rng(settings, StdRng::seed_from_u64(5), &mut host);
        assert_eq!(starfield.settings().spawn_interval_frames, 1);
        assert_eq!(starfield.settings().fade_frames, 1);
        assert_eq!(starfield.settings().star_count, 160);
    }

    #[test]
    fn test_zero_viewport() {
        let mut host = Scheduler::new(Size::new(0, 0));
        let mut starfield = Starfield::mount_with_rng(
            AnimationSettings::default(),
            StdRng::seed_from_u64(6),
            &mut host,
        );
        assert!(starfield.size().is_empty());
        assert!(starfield.stars().iter().all(|star| star.position == Vec2::ZERO));

        starfield.frame_count = 139;
        starfield.step();
        assert_eq!(starfield.comets().len(), 1);
        let comet = &starfield.comets()[0];
        assert_eq!(comet.position - comet.velocity, Vec2::ZERO);
    }

    #[test]
    fn test_initial_spawn_after_delay() {
        let (mut starfield, mut host) = mounted(2);
        host.advance(Duration::from_millis(599));
        fire_timers(&mut starfield, &mut host);
        assert!(starfield.comets().is_empty());

        host.advance(Duration::from_millis(1));
        fire_timers(&mut starfield, &mut host);
        assert_eq!(starfield.comets().len(), 1);
        let comet = &starfield.comets()[0];
        assert_eq!(comet.life, 0);
        assert_eq!(comet.alpha, 0.0);
        assert!((90..=150).contains(&comet.max_life));
    }

    #[test]
    fn test_foreign_timer_is_ignored() {
        let (mut starfield, mut host) = mounted(3);
        let other = host.set_timeout(Duration::ZERO);
        starfield.on_timer(other);
        assert!(starfield.comets().is_empty());
    }

    #[test]
    fn test_frame_draws_stars_then_comets() {
        let (mut starfield, mut host) = mounted(4);
        let mut surface = Recorder::default();
        host.advance(Duration::from_millis(600));
        fire_timers(&mut starfield, &mut host);

        assert!(pump(&mut starfield, &mut host, &mut surface));
        assert_eq!(surface.clears, 1);
        // 160 stars followed by one comet head.
        assert_eq!(surface.circles.len(), 161);
        assert_eq!(surface.lines.len(), 1);
        for (_, radius, color) in &surface.circles[..160] {
            assert!((0.3..=1.5).contains(radius));
            assert!((0.1..=0.6).contains(&color.a));
        }

        let comet = &starfield.comets()[0];
        let (head, radius, color) = surface.circles[160];
        assert_eq!(head, comet.position);
        assert_eq!(radius, 1.8);
        assert_eq!(color, Rgba::WHITE.with_alpha(comet.alpha));

        let (tail, line_head, stroke) = &surface.lines[0];
        assert_eq!(*tail, comet.tail());
        assert_eq!(*line_head, comet.position);
        assert!(stroke.glow.is_some());
        assert_eq!(starfield.frame_count(), 1);
    }

    #[test]
    fn test_loop_keeps_requesting_frames() {
        let (mut starfield, mut host) = mounted(5);
        let mut surface = Recorder::default();
        for _ in 0..50 {
            assert!(pump(&mut starfield, &mut host, &mut surface));
        }
        assert_eq!(starfield.frame_count(), 50);
        assert!(host.has_pending_frame());
        assert_eq!(host.stats().frames_requested, 51);
    }

    #[test]
    fn test_stale_frame_is_ignored() {
        let (mut starfield, mut host) = mounted(6);
        let mut surface = Recorder::default();
        let stale = host.take_frame().unwrap();
        starfield.on_frame(stale, &mut surface, &mut host);
        starfield.on_frame(stale, &mut surface, &mut host);
        assert_eq!(starfield.frame_count(), 1);
        assert_eq!(surface.clears, 1);
    }

    #[test]
    fn test_comet_expires_after_max_life() {
        let (mut starfield, _host) = mounted(7);
        starfield
            .comets
            .push(Comet::new(Vec2::new(700.0, 100.0), 210.0, 5.0, 120.0, 90));

        for _ in 0..90 {
            starfield.step();
        }
        assert_eq!(starfield.comets().len(), 1);
        assert_eq!(starfield.comets()[0].life, 90);
        assert!(starfield.comets()[0].is_expired());

        starfield.step();
        assert!(starfield.comets().is_empty());
    }

    #[test]
    fn test_spawn_cadence() {
        let (mut starfield, _host) = mounted(8);
        let mut spawn_frames = Vec::new();
        let mut peak = 0;
        for _ in 0..1400 {
            starfield.step();
            let fresh = starfield.comets().iter().filter(|c| c.life == 1).count();
            if fresh > 0 {
                spawn_frames.push(starfield.frame_count());
            }
            peak = peak.max(starfield.comets().len());
        }
        assert_eq!(spawn_frames, (1..=10).map(|n| n * 140).collect::<Vec<_>>());
        assert!(peak <= 4);
    }

    #[test]
    fn test_spawn_skipped_at_capacity() {
        let (mut starfield, _host) = mounted(9);
        starfield.frame_count = 139;
        for _ in 0..4 {
            starfield
                .comets
                .push(Comet::new(Vec2::new(700.0, 100.0), 210.0, 5.0, 120.0, 150));
        }
        starfield.step();
        assert_eq!(starfield.frame_count(), 140);
        assert_eq!(starfield.comets().len(), 4);

        starfield.comets.pop();
        starfield.frame_count = 279;
        starfield.step();
        assert_eq!(starfield.comets().len(), 4);
        assert_eq!(starfield.comets()[3].life, 1);
    }

    #[test]
    fn test_capacity_counts_comets_expiring_this_frame() {
        let (mut starfield, _host) = mounted(14);
        starfield.frame_count = 139;
        for _ in 0..3 {
            starfield
                .comets
                .push(Comet::new(Vec2::new(700.0, 100.0), 210.0, 5.0, 120.0, 150));
        }
        let mut spent = Comet::new(Vec2::new(400.0, 200.0), 210.0, 5.0, 120.0, 90);
        spent.life = spent.max_life;
        starfield.comets.push(spent);

        starfield.step();
        assert_eq!(starfield.frame_count(), 140);
        assert_eq!(starfield.comets().len(), 3);
        assert!(starfield.comets().iter().all(|comet| comet.max_life == 150));
        assert!(starfield.comets().iter().all(|comet| comet.life == 1));

        // The freed slot is used on the next spawn frame.
        starfield.frame_count = 279;
        starfield.step();
        assert_eq!(starfield.comets().len(), 4);
    }

    #[test]
    fn test_linear_motion_through_frames() {
        let (mut starfield, _host) = mounted(10);
        let start = Vec2::new(700.0, 300.0);
        starfield
            .comets
            .push(Comet::new(start, 210.0, 5.0, 120.0, 150));
        for _ in 0..10 {
            starfield.step();
        }
        let comet = &starfield.comets()[0];
        assert!((comet.velocity.x - (-4.33)).abs() < 0.01);
        assert!((comet.velocity.y - (-2.5)).abs() < 1e-5);
        assert!((comet.position.x - (start.x + 10.0 * comet.velocity.x)).abs() < 1e-3);
        assert!((comet.position.y - (start.y + 10.0 * comet.velocity.y)).abs() < 1e-3);
    }

    #[test]
    fn test_resize_keeps_positions() {
        let (mut starfield, mut host) = mounted(11);
        starfield
            .comets
            .push(Comet::new(Vec2::new(700.0, 100.0), 210.0, 5.0, 120.0, 150));
        let stars_before = starfield.stars().to_vec();
        let comets_before = starfield.comets().to_vec();

        let bigger = Size::new(1200, 900);
        if host.resize(bigger) {
            starfield.on_resize(bigger);
        }

        assert_eq!(starfield.size(), bigger);
        assert_eq!(starfield.stars(), stars_before.as_slice());
        assert_eq!(starfield.comets(), comets_before.as_slice());
    }

    #[test]
    fn test_spawns_use_resized_bounds() {
        let (mut starfield, _host) = mounted(12);
        starfield.on_resize(Size::new(1200, 900));
        for _ in 0..200 {
            starfield.spawn_comet();
        }
        assert!(starfield.comets().iter().any(|c| c.position.x > 800.0));
        assert!(
            starfield
                .comets()
                .iter()
                .all(|c| (120.0..=1200.0).contains(&c.position.x)
                    && (0.0..=360.0).contains(&c.position.y))
        );
    }

    #[test]
    fn test_unmount_stops_everything() {
        let (mut starfield, mut host) = mounted(13);
        let mut surface = Recorder::default();
        for _ in 0..3 {
            pump(&mut starfield, &mut host, &mut surface);
        }

        starfield.unmount(&mut host);
        let stats = host.stats();
        assert!(!starfield.is_mounted());
        assert!(!host.has_pending_frame());
        assert!(!host.is_resize_subscribed());
        assert_eq!(host.pending_timers(), 0);
        assert_eq!(stats.frames_cancelled, 1);
        assert_eq!(stats.resize_unsubscriptions, 1);

        for _ in 0..10 {
            assert!(!pump(&mut starfield, &mut host, &mut surface));
        }
        assert!(!host.resize(Size::new(1200, 900)));
        assert_eq!(host.stats().frames_requested, stats.frames_requested);
        assert_eq!(host.stats().frames_delivered, stats.frames_delivered);
        assert_eq!(host.stats().resizes_delivered, 0);
        assert_eq!(starfield.frame_count(), 3);

        starfield.unmount(&mut host);
        assert_eq!(host.stats(), stats);
    }

    #[test]
    fn test_callbacks_after_unmount_are_noops() {
        let (mut starfield, mut host) = mounted(14);
        let mut surface = Recorder::default();
        let frame = host.take_frame().unwrap();
        starfield.unmount(&mut host);

        starfield.on_frame(frame, &mut surface, &mut host);
        starfield.on_resize(Size::new(10, 10));
        assert_eq!(surface.clears, 0);
        assert_eq!(starfield.size(), Size::new(800, 600));
        assert!(!host.has_pending_frame());
    }

    #[test]
    fn test_same_seed_same_sky() {
        let (a, _) = mounted(99);
        let (b, _) = mounted(99);
        assert_eq!(a.stars(), b.stars());
    }
}
