//! The map component's lifecycle.
//!
//! `MapController` owns one viewport on a [`MapCapability`] and everything
//! acquired through it: markers, the heatmap layer, the gesture subscription
//! and all scheduled timers. Time is virtual; the host calls
//! [`MapController::advance_to`] and timers fire in deadline order.
//!
//! Acquired resources are released by [`MapController::teardown`], which also
//! runs on drop.

use std::time::Duration;

use alerts::{Alert, HeatmapPoint};
use foundation::geo::LatLng;
use foundation::time::Time;
use layers::InfoCard;
use provider::{GestureKind, MapCapability, SubscriptionId, ViewportId};
use runtime::event_bus::EventBus;
use runtime::timers::{TimerId, TimerQueue};
use tracing::{debug, error, info, warn};

use crate::autopilot::{Autopilot, CycleCursor, ListChange, Settle, SkipReason, TickOutcome, ViewportCommand};
use crate::config::MapConfig;
use crate::error::{GeolocationError, MapError};
use crate::interaction::InteractionTracker;
use crate::outbox::{DashboardAction, GestureInbox, MapStatus, Notice, Outbox};
use crate::reconciler::{AnnotationReconciler, HeatmapOutcome, HeatmapOverlay};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ControllerTimer {
    QuietPeriod,
    AutopilotTick,
    Settle(Settle),
}

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct ControllerStats {
    pub markers_placed: u64,
    pub markers_removed: u64,
    pub duplicate_alerts: u64,
    pub heatmap_installs: u64,
    pub viewport_commands: u64,
    pub gestures: u64,
    pub ticks_skipped: u64,
}

pub struct MapController<C: MapCapability> {
    map: C,
    config: MapConfig,
    status: MapStatus,
    now: Time,

    viewport: Option<ViewportId>,
    subscription: Option<SubscriptionId>,

    alerts: Vec<Alert>,
    heatmap_points: Vec<HeatmapPoint>,
    heatmap_visible: bool,

    reconciler: AnnotationReconciler,
    heatmap: HeatmapOverlay,
    tracker: InteractionTracker,
    autopilot: Autopilot,

    timers: TimerQueue<ControllerTimer>,
    tick_timer: Option<TimerId>,
    settle_timer: Option<TimerId>,

    gestures: GestureInbox,
    outbox: Outbox,
    events: EventBus,
    stats: ControllerStats,
}

impl<C: MapCapability> MapController<C> {
    pub fn new(map: C, config: MapConfig) -> Self {
        let tracker = InteractionTracker::new(&config.interaction);
        let autopilot = Autopilot::new(&config.autopilot);
        Self {
            map,
            config,
            status: MapStatus::Loading,
            now: Time::ZERO,
            viewport: None,
            subscription: None,
            alerts: Vec::new(),
            heatmap_points: Vec::new(),
            heatmap_visible: true,
            reconciler: AnnotationReconciler::new(),
            heatmap: HeatmapOverlay::new(),
            tracker,
            autopilot,
            timers: TimerQueue::new(),
            tick_timer: None,
            settle_timer: None,
            gestures: GestureInbox::new(),
            outbox: Outbox::new(),
            events: EventBus::new(),
            stats: ControllerStats::default(),
        }
    }

    pub fn status(&self) -> &MapStatus {
        &self.status
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    pub fn now(&self) -> Time {
        self.now
    }

    pub fn map(&self) -> &C {
        &self.map
    }

    pub fn alerts(&self) -> &[Alert] {
        &self.alerts
    }

    pub fn cursor(&self) -> CycleCursor {
        self.autopilot.cursor()
    }

    pub fn stats(&self) -> ControllerStats {
        self.stats
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn live_markers(&self) -> usize {
        self.reconciler.len()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn next_timer_due(&self) -> Option<Time> {
        self.timers.next_due()
    }

    pub fn info_overlay(&self) -> Option<InfoCard> {
        self.outbox.info()
    }

    pub fn take_actions(&mut self) -> Vec<DashboardAction> {
        self.outbox.take()
    }

    /// True while inside the quiet period, or when gestures are waiting to be applied.
    pub fn is_interacting(&self) -> bool {
        self.tracker.is_interacting() || !self.gestures.is_empty()
    }

    /// Creates the viewport. Runs once: later calls return the current status.
    ///
    /// A configuration or capability failure leaves the controller
    /// `Unavailable` and no further capability calls are made.
    pub fn mount(&mut self, now: Time) -> &MapStatus {
        if self.status != MapStatus::Loading {
            return &self.status;
        }
        self.now = self.now.max(now);

        let credential = match self.config.validate().map(str::to_string) {
            Ok(c) => c,
            Err(err) => {
                self.fail(MapError::Config(err));
                return &self.status;
            }
        };
        let options = self.config.viewport_options(&credential);
        let viewport = match self.map.create_viewport(&options) {
            Ok(vp) => vp,
            Err(err) => {
                self.fail(MapError::Capability(err));
                return &self.status;
            }
        };
        self.viewport = Some(viewport);

        let inbox = self.gestures.clone();
        self.subscription = Some(self.map.on_gesture(
            viewport,
            &GestureKind::ALL,
            Box::new(move |kind| inbox.push(kind)),
        ));

        info!(viewport = %viewport, at = %self.now, "map ready");
        self.set_status(MapStatus::Ready);

        // Data that arrived while loading.
        self.reconcile_markers();
        self.apply_heatmap();
        self.sync_autopilot();
        &self.status
    }

    /// Replaces the alert set. Applied immediately when ready, otherwise at mount.
    pub fn set_alerts(&mut self, alerts: Vec<Alert>) {
        self.alerts = alerts;
        if self.status.is_ready() {
            self.reconcile_markers();
            self.sync_autopilot();
        }
    }

    /// Replaces the heatmap samples. Intensities are clamped into `[0, 1]`.
    pub fn set_heatmap(&mut self, points: Vec<HeatmapPoint>, visible: bool) {
        self.heatmap_points = points.into_iter().map(HeatmapPoint::clamped).collect();
        self.heatmap_visible = visible;
        if self.status.is_ready() {
            self.apply_heatmap();
        }
    }

    pub fn set_heatmap_visible(&mut self, visible: bool) {
        let points = std::mem::take(&mut self.heatmap_points);
        self.set_heatmap(points, visible);
    }

    /// Applies pending gestures, then fires every timer due by `now` in order.
    ///
    /// Pending gestures are stamped with the controller's time before the
    /// advance; a gesture raised between advances counts from the last
    /// observed instant.
    pub fn advance_to(&mut self, now: Time) {
        if !self.status.is_ready() {
            self.now = self.now.max(now);
            return;
        }
        self.apply_gestures();
        while let Some((id, due, timer)) = self.timers.pop_due(now) {
            self.now = self.now.max(due);
            self.fire(id, timer);
        }
        self.now = self.now.max(now);
    }

    pub fn advance_by(&mut self, delta: Duration) {
        let target = self.now + delta;
        self.advance_to(target);
    }

    /// Records a user gesture that happened at `at`.
    ///
    /// Hosts with a real clock use this instead of waiting for the next
    /// advance to stamp the gesture. Time first moves to `at`, so timers due
    /// before the gesture still fire. An `at` in the past counts as now.
    pub fn gesture_at(&mut self, at: Time) {
        if !self.status.is_ready() {
            self.now = self.now.max(at);
            return;
        }
        self.advance_to(at);
        debug!(at = %self.now, "gesture");
        self.stats.gestures += 1;
        self.note_gesture();
    }

    /// Centers on the user's position, or reports why it could not.
    ///
    /// A successful locate counts as user interaction, so the autopilot
    /// yields for a full quiet period afterwards.
    pub fn locate(&mut self, result: Result<LatLng, GeolocationError>) {
        let Some(viewport) = self.ready_viewport() else {
            return;
        };
        let position = result.and_then(|p| {
            if p.is_valid() {
                Ok(p)
            } else {
                Err(GeolocationError::PositionUnavailable)
            }
        });
        match position {
            Ok(p) => {
                self.note_gesture();
                self.map.pan_to(viewport, p);
                self.map.set_zoom(viewport, self.config.locate_zoom);
                self.stats.viewport_commands += 2;
                self.events
                    .emit(self.now, "locate", format!("centered on {:.5},{:.5}", p.lat, p.lng));
                info!(lat = p.lat, lng = p.lng, "centered on user location");
            }
            Err(err) => {
                warn!(%err, "geolocation failed");
                self.events.emit(self.now, "locate", format!("failed: {err}"));
                self.outbox
                    .push(DashboardAction::Notify(Notice::warning(err.user_message())));
            }
        }
    }

    /// Sends the tour back to the first alert.
    pub fn restart_autopilot(&mut self) {
        if !self.status.is_ready() {
            return;
        }
        self.autopilot.restart();
        self.cancel_autopilot_timers();
        if self.autopilot.is_running() {
            self.schedule_tick();
        }
        self.events.emit(self.now, "autopilot", "restarted");
        debug!("autopilot restarted");
    }

    /// Releases every timer, subscription, marker, layer and the viewport.
    /// Safe to call more than once.
    pub fn teardown(&mut self) {
        if self.status == MapStatus::Unmounted {
            return;
        }
        let timers = self.timers.clear();
        self.tick_timer = None;
        self.settle_timer = None;
        self.tracker.release(&mut self.timers);
        self.gestures.clear();

        if let Some(sub) = self.subscription.take() {
            self.map.unsubscribe(sub);
        }
        let markers = self.reconciler.clear(&mut self.map);
        self.stats.markers_removed += markers as u64;
        self.heatmap.clear(&mut self.map);
        self.outbox.clear_info();
        if let Some(vp) = self.viewport.take() {
            self.map.destroy_viewport(vp);
        }

        info!(timers, markers, "map controller torn down");
        self.set_status(MapStatus::Unmounted);
    }

    fn ready_viewport(&self) -> Option<ViewportId> {
        if self.status.is_ready() {
            self.viewport
        } else {
            None
        }
    }

    fn set_status(&mut self, status: MapStatus) {
        self.events.emit(self.now, "status", status.as_str());
        self.status = status.clone();
        self.outbox.push(DashboardAction::StatusChanged(status));
    }

    fn fail(&mut self, err: MapError) {
        error!(%err, "map unavailable");
        self.set_status(MapStatus::Unavailable(err));
    }

    fn reconcile_markers(&mut self) {
        let Some(viewport) = self.ready_viewport() else {
            return;
        };
        let summary = self
            .reconciler
            .reconcile(&mut self.map, viewport, &self.alerts, &self.outbox);
        self.stats.markers_removed += summary.removed as u64;
        self.stats.markers_placed += summary.placed as u64;
        self.stats.duplicate_alerts += summary.duplicates as u64;
        // The leave handler went away with the old marker.
        if self
            .outbox
            .info()
            .is_some_and(|card| !self.reconciler.contains(&card.alert_id))
        {
            self.outbox.clear_info();
        }
        self.events.emit(
            self.now,
            "reconcile",
            format!("removed {} placed {}", summary.removed, summary.placed),
        );
    }

    fn apply_heatmap(&mut self) {
        let Some(viewport) = self.ready_viewport() else {
            return;
        };
        let outcome = self.heatmap.apply(
            &mut self.map,
            viewport,
            &self.heatmap_points,
            self.heatmap_visible,
            &self.config.heatmap,
        );
        let message = match outcome {
            HeatmapOutcome::Installed(_) => {
                self.stats.heatmap_installs += 1;
                format!("installed {} points", self.heatmap_points.len())
            }
            HeatmapOutcome::Cleared => "cleared".to_string(),
            HeatmapOutcome::Unsupported => "unsupported".to_string(),
        };
        self.events.emit(self.now, "heatmap", message);
    }

    fn sync_autopilot(&mut self) {
        match self.autopilot.on_alerts_changed(self.alerts.len()) {
            ListChange::Started => {
                self.schedule_tick();
                self.events.emit(self.now, "autopilot", "started");
            }
            ListChange::Halted => {
                self.cancel_autopilot_timers();
                self.events.emit(self.now, "autopilot", "halted");
            }
            ListChange::Unchanged => {}
        }
    }

    fn schedule_tick(&mut self) {
        let id = self.timers.schedule_after(
            self.now,
            self.config.autopilot.tick_period,
            ControllerTimer::AutopilotTick,
        );
        self.tick_timer = Some(id);
    }

    fn cancel_autopilot_timers(&mut self) {
        for id in [self.tick_timer.take(), self.settle_timer.take()]
            .into_iter()
            .flatten()
        {
            self.timers.cancel(id);
        }
    }

    fn apply_gestures(&mut self) {
        let gestures = self.gestures.drain();
        for kind in &gestures {
            debug!(?kind, at = %self.now, "gesture");
        }
        if !gestures.is_empty() {
            self.stats.gestures += gestures.len() as u64;
            self.note_gesture();
        }
    }

    fn note_gesture(&mut self) {
        let was_interacting = self.tracker.is_interacting();
        let until = self
            .tracker
            .record_gesture(self.now, &mut self.timers, ControllerTimer::QuietPeriod);
        if !was_interacting {
            self.events
                .emit(self.now, "interaction", format!("started, quiet at {until}"));
        }
    }

    fn fire(&mut self, id: TimerId, timer: ControllerTimer) {
        match timer {
            ControllerTimer::QuietPeriod => {
                if self.tracker.on_timer(id, self.now) {
                    debug!(at = %self.now, "user interaction ended");
                    self.events.emit(self.now, "interaction", "ended");
                }
            }
            ControllerTimer::AutopilotTick => {
                if self.tick_timer != Some(id) {
                    return;
                }
                self.schedule_tick();
                self.run_tick();
            }
            ControllerTimer::Settle(step) => {
                if self.settle_timer != Some(id) {
                    return;
                }
                self.settle_timer = None;
                let interacting = self.is_interacting();
                if let Some(command) = self.autopilot.settle(step, self.alerts.len(), interacting) {
                    self.issue(command);
                }
            }
        }
    }

    fn run_tick(&mut self) {
        let interacting = self.is_interacting();
        match self.autopilot.tick(&self.alerts, interacting) {
            TickOutcome::Issue { command, then } => {
                self.issue(command);
                self.settle_timer = Some(self.timers.schedule_after(
                    self.now,
                    self.config.autopilot.settle_delay,
                    ControllerTimer::Settle(then),
                ));
            }
            TickOutcome::Skipped(reason) => {
                self.stats.ticks_skipped += 1;
                if reason != SkipReason::Halted {
                    debug!(?reason, at = %self.now, "autopilot tick skipped");
                }
            }
        }
    }

    fn issue(&mut self, command: ViewportCommand) {
        let Some(viewport) = self.ready_viewport() else {
            return;
        };
        match command {
            ViewportCommand::PanTo(center) => self.map.pan_to(viewport, center),
            ViewportCommand::SetZoom(zoom) => self.map.set_zoom(viewport, zoom),
        }
        self.stats.viewport_commands += 1;
        self.events.emit(self.now, "viewport", format!("{command:?}"));
        debug!(?command, at = %self.now, cursor = self.autopilot.cursor().index, "autopilot command");
    }
}

impl<C: MapCapability> Drop for MapController<C> {
    fn drop(&mut self) {
        self.teardown();
    }
}
