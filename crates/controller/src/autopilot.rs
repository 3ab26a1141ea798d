//! Autonomous tour of the alert list.
//!
//! The autopilot is a plain state value. It never sees the capability or a
//! clock: each tick and settle step returns the viewport command to issue, and
//! the owner decides when ticks and settles happen. Commands only flow outward;
//! the autopilot never reads the viewport back.
//!
//! One cycle per alert, two ticks long:
//! - tick (Retreated): pan to `alerts[cursor]`, then after the settle delay zoom in.
//! - tick (Focused): zoom out to overview, then after the settle delay advance.

use alerts::Alert;
use foundation::geo::LatLng;
use tracing::debug;

use crate::config::AutopilotConfig;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Retreated,
    Focused,
}

/// Position in the tour. `index < len` whenever the list is non-empty.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct CycleCursor {
    pub index: usize,
    pub phase: Phase,
}

/// One-way viewport command.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ViewportCommand {
    PanTo(LatLng),
    SetZoom(u8),
}

/// Second half of a tick, run after the settle delay.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Settle {
    ZoomIn,
    Advance,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Halted on an empty list.
    Halted,
    Interacting,
    /// The previous tick's settle step has not run yet.
    Settling,
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum TickOutcome {
    Skipped(SkipReason),
    /// Issue `command` now and schedule `then` after the settle delay.
    Issue {
        command: ViewportCommand,
        then: Settle,
    },
}

/// How the autopilot reacted to a new list length.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ListChange {
    /// Went from halted to running; ticks should be scheduled.
    Started,
    /// List became empty; ticks and settles should be cancelled.
    Halted,
    Unchanged,
}

#[derive(Debug)]
pub struct Autopilot {
    focus_zoom: u8,
    overview_zoom: u8,
    cursor: CycleCursor,
    settling: Option<Settle>,
    running: bool,
}

impl Autopilot {
    pub fn new(config: &AutopilotConfig) -> Self {
        Self {
            focus_zoom: config.focus_zoom,
            overview_zoom: config.overview_zoom,
            cursor: CycleCursor::default(),
            settling: None,
            running: false,
        }
    }

    pub fn cursor(&self) -> CycleCursor {
        self.cursor
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn pending_settle(&self) -> Option<Settle> {
        self.settling
    }

    /// Applies a new alert list length.
    ///
    /// An empty list halts and resets the cursor. A non-empty list after a halt
    /// restarts from the first alert. Otherwise the cursor is only wrapped
    /// modulo the new length, so a mid-cycle change may skip or repeat an alert.
    pub fn on_alerts_changed(&mut self, len: usize) -> ListChange {
        if len == 0 {
            if !self.running {
                return ListChange::Unchanged;
            }
            self.running = false;
            self.reset();
            debug!("autopilot halted: alert list is empty");
            return ListChange::Halted;
        }
        if !self.running {
            self.running = true;
            self.reset();
            debug!(len, "autopilot started");
            return ListChange::Started;
        }
        self.cursor.index %= len;
        ListChange::Unchanged
    }

    /// Back to the first alert, zoomed out. Any pending settle is dropped.
    pub fn restart(&mut self) {
        self.reset();
    }

    fn reset(&mut self) {
        self.cursor = CycleCursor::default();
        self.settling = None;
    }

    pub fn tick(&mut self, alerts: &[Alert], interacting: bool) -> TickOutcome {
        if !self.running || alerts.is_empty() {
            return TickOutcome::Skipped(SkipReason::Halted);
        }
        if interacting {
            return TickOutcome::Skipped(SkipReason::Interacting);
        }
        if self.settling.is_some() {
            return TickOutcome::Skipped(SkipReason::Settling);
        }

        let (command, then) = match self.cursor.phase {
            Phase::Retreated => {
                let target = &alerts[self.cursor.index % alerts.len()];
                (ViewportCommand::PanTo(target.position()), Settle::ZoomIn)
            }
            Phase::Focused => (ViewportCommand::SetZoom(self.overview_zoom), Settle::Advance),
        };
        self.settling = Some(then);
        TickOutcome::Issue { command, then }
    }

    /// Runs the settle step scheduled by the last tick.
    ///
    /// A zoom-in is abandoned when the user started interacting during the
    /// settle delay; the phase stays Retreated and the next idle tick pans again.
    /// Advancing never issues a command.
    pub fn settle(&mut self, step: Settle, len: usize, interacting: bool) -> Option<ViewportCommand> {
        if self.settling != Some(step) {
            return None;
        }
        self.settling = None;
        if len == 0 {
            return None;
        }
        match step {
            Settle::ZoomIn => {
                if interacting {
                    debug!(index = self.cursor.index, "zoom-in abandoned: user is interacting");
                    return None;
                }
                self.cursor.phase = Phase::Focused;
                Some(ViewportCommand::SetZoom(self.focus_zoom))
            }
            Settle::Advance => {
                self.cursor.index = (self.cursor.index + 1) % len;
                self.cursor.phase = Phase::Retreated;
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alerts::{AlertKind, Location, Severity};
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn alerts(n: usize) -> Vec<Alert> {
        (0..n)
            .map(|i| {
                Alert::new(
                    format!("a{i}"),
                    AlertKind::Incident,
                    Severity::Medium,
                    Location::at(18.0 + i as f64, -70.0),
                    Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
                )
            })
            .collect()
    }

    fn pilot() -> Autopilot {
        Autopilot::new(&AutopilotConfig::default())
    }

    /// Runs one full tick including its settle step.
    fn step(p: &mut Autopilot, list: &[Alert]) -> Vec<ViewportCommand> {
        let mut out = Vec::new();
        if let TickOutcome::Issue { command, then } = p.tick(list, false) {
            out.push(command);
            out.extend(p.settle(then, list.len(), false));
        }
        out
    }

    #[test]
    fn visits_alerts_in_order_and_wraps() {
        let list = alerts(3);
        let mut p = pilot();
        assert_eq!(p.on_alerts_changed(3), ListChange::Started);

        let mut visited = Vec::new();
        for _ in 0..4 {
            visited.push(p.cursor().index);
            let focus = step(&mut p, &list);
            assert_eq!(
                focus,
                vec![
                    ViewportCommand::PanTo(list[*visited.last().unwrap()].position()),
                    ViewportCommand::SetZoom(16)
                ]
            );
            assert_eq!(p.cursor().phase, Phase::Focused);
            assert_eq!(step(&mut p, &list), vec![ViewportCommand::SetZoom(11)]);
            assert_eq!(p.cursor().phase, Phase::Retreated);
        }
        assert_eq!(visited, vec![0, 1, 2, 0]);
        assert_eq!(p.cursor().index, 1);
    }

    #[test]
    fn interacting_skips_without_moving_the_cursor() {
        let list = alerts(2);
        let mut p = pilot();
        p.on_alerts_changed(2);
        for _ in 0..10 {
            assert_eq!(
                p.tick(&list, true),
                TickOutcome::Skipped(SkipReason::Interacting)
            );
        }
        assert_eq!(p.cursor(), CycleCursor::default());
        assert_eq!(p.pending_settle(), None);
    }

    #[test]
    fn zoom_in_abandoned_when_interaction_starts_mid_settle() {
        let list = alerts(2);
        let mut p = pilot();
        p.on_alerts_changed(2);
        assert!(matches!(p.tick(&list, false), TickOutcome::Issue { then: Settle::ZoomIn, .. }));
        assert_eq!(p.settle(Settle::ZoomIn, 2, true), None);
        assert_eq!(p.cursor(), CycleCursor::default());
        assert_eq!(p.pending_settle(), None);
    }

    #[test]
    fn tick_waits_for_pending_settle() {
        let list = alerts(1);
        let mut p = pilot();
        p.on_alerts_changed(1);
        p.tick(&list, false);
        assert_eq!(p.tick(&list, false), TickOutcome::Skipped(SkipReason::Settling));
    }

    #[test]
    fn empty_list_halts_and_resumes_from_first_alert() {
        let list = alerts(3);
        let mut p = pilot();
        p.on_alerts_changed(3);
        step(&mut p, &list);
        step(&mut p, &list);
        assert_eq!(p.cursor().index, 1);

        assert_eq!(p.on_alerts_changed(0), ListChange::Halted);
        assert_eq!(p.tick(&[], false), TickOutcome::Skipped(SkipReason::Halted));
        assert_eq!(p.on_alerts_changed(0), ListChange::Unchanged);

        assert_eq!(p.on_alerts_changed(3), ListChange::Started);
        assert_eq!(p.cursor(), CycleCursor::default());
    }

    #[test]
    fn shrinking_list_wraps_cursor() {
        let list = alerts(5);
        let mut p = pilot();
        p.on_alerts_changed(5);
        for _ in 0..3 {
            step(&mut p, &list);
            step(&mut p, &list);
        }
        assert_eq!(p.cursor().index, 3);
        assert_eq!(p.on_alerts_changed(2), ListChange::Unchanged);
        assert_eq!(p.cursor().index, 1);
    }

    #[test]
    fn stale_settle_is_ignored() {
        let mut p = pilot();
        p.on_alerts_changed(2);
        assert_eq!(p.settle(Settle::Advance, 2, false), None);
        assert_eq!(p.cursor().index, 0);
    }

    #[test]
    fn restart_returns_to_first_alert() {
        let list = alerts(3);
        let mut p = pilot();
        p.on_alerts_changed(3);
        step(&mut p, &list);
        p.restart();
        assert_eq!(p.cursor(), CycleCursor::default());
        assert!(p.is_running());
    }
}
