use std::collections::BTreeMap;

use alerts::{Alert, AlertId, HeatmapPoint};
use layers::{HeatmapStyle, InfoCard, MarkerSymbol, layer_points};
use provider::{Hover, MapCapability, MarkerHandlers, MarkerId, MarkerSpec, OverlayId, ViewportId};
use tracing::{debug, warn};

use crate::outbox::{DashboardAction, Outbox};

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct ReconcileSummary {
    pub removed: usize,
    pub placed: usize,
    pub duplicates: usize,
}

/// Owns the marker handles placed for the current alert set.
///
/// Every reconcile removes all previous markers before placing new ones, so
/// the live set is exactly one marker per distinct alert id.
#[derive(Debug, Default)]
pub struct AnnotationReconciler {
    markers: Vec<(AlertId, MarkerId)>,
    by_alert: BTreeMap<AlertId, MarkerId>,
    by_marker: BTreeMap<MarkerId, usize>,
}

impl AnnotationReconciler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn live_alert_ids(&self) -> impl Iterator<Item = &AlertId> {
        self.markers.iter().map(|(id, _)| id)
    }

    pub fn contains(&self, alert: &AlertId) -> bool {
        self.by_alert.contains_key(alert)
    }

    pub fn marker_for(&self, alert: &AlertId) -> Option<MarkerId> {
        self.by_alert.get(alert).copied()
    }

    pub fn alert_for(&self, marker: MarkerId) -> Option<&AlertId> {
        self.by_marker.get(&marker).map(|&i| &self.markers[i].0)
    }

    pub fn reconcile<C: MapCapability + ?Sized>(
        &mut self,
        map: &mut C,
        viewport: ViewportId,
        alerts: &[Alert],
        outbox: &Outbox,
    ) -> ReconcileSummary {
        let removed = self.clear(map);
        let mut duplicates = 0;

        for alert in alerts {
            if self.by_alert.contains_key(&alert.id) {
                warn!(alert = %alert.id, "duplicate alert id; keeping the first occurrence");
                duplicates += 1;
                continue;
            }
            let marker = map.place_marker(viewport, marker_spec(alert), handlers_for(alert, outbox));
            self.by_marker.insert(marker, self.markers.len());
            self.by_alert.insert(alert.id.clone(), marker);
            self.markers.push((alert.id.clone(), marker));
        }

        let summary = ReconcileSummary {
            removed,
            placed: self.markers.len(),
            duplicates,
        };
        debug!(?summary, "markers reconciled");
        summary
    }

    /// Removes every owned marker. Returns how many were removed.
    pub fn clear<C: MapCapability + ?Sized>(&mut self, map: &mut C) -> usize {
        let n = self.markers.len();
        for (_, marker) in self.markers.drain(..) {
            map.remove_marker(marker);
        }
        self.by_alert.clear();
        self.by_marker.clear();
        n
    }
}

pub fn marker_spec(alert: &Alert) -> MarkerSpec {
    MarkerSpec {
        position: alert.position(),
        symbol: MarkerSymbol::for_alert(alert.kind, alert.severity),
        title: alert.title.clone(),
    }
}

fn handlers_for(alert: &Alert, outbox: &Outbox) -> MarkerHandlers {
    let click_id = alert.id.clone();
    let click_outbox = outbox.clone();
    let card = InfoCard::for_alert(alert);
    let hover_outbox = outbox.clone();

    MarkerHandlers {
        on_click: Box::new(move || {
            click_outbox.push(DashboardAction::SelectAlert(click_id.clone()));
        }),
        on_hover: Box::new(move |hover| match hover {
            Hover::Enter => hover_outbox.show_info(card.clone()),
            Hover::Leave => hover_outbox.hide_info(&card.alert_id),
        }),
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum HeatmapOutcome {
    Installed(OverlayId),
    /// Hidden or empty; no layer exists.
    Cleared,
    /// The provider has no overlay capability.
    Unsupported,
}

/// The single weighted overlay layer. Replaced wholesale on every update.
#[derive(Debug, Default)]
pub struct HeatmapOverlay {
    current: Option<OverlayId>,
}

impl HeatmapOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<OverlayId> {
        self.current
    }

    pub fn apply<C: MapCapability + ?Sized>(
        &mut self,
        map: &mut C,
        viewport: ViewportId,
        points: &[HeatmapPoint],
        visible: bool,
        style: &HeatmapStyle,
    ) -> HeatmapOutcome {
        self.clear(map);
        let Some(points) = layer_points(points, visible) else {
            return HeatmapOutcome::Cleared;
        };
        match map.set_overlay_layer(viewport, points, style) {
            Some(id) => {
                debug!(overlay = %id, points = points.len(), "heatmap layer installed");
                self.current = Some(id);
                HeatmapOutcome::Installed(id)
            }
            None => {
                warn!("overlay capability unavailable; heatmap skipped");
                HeatmapOutcome::Unsupported
            }
        }
    }

    pub fn clear<C: MapCapability + ?Sized>(&mut self, map: &mut C) -> bool {
        match self.current.take() {
            Some(id) => {
                map.remove_overlay_layer(id);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alerts::{AlertKind, Location, Severity};
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use provider::{InMemoryMap, ViewportOptions};
    use std::collections::BTreeSet;

    fn alert(id: &str) -> Alert {
        Alert::new(
            id,
            AlertKind::Collapse,
            Severity::High,
            Location::at(18.47, -69.89),
            Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap(),
        )
        .with_title(format!("Alerta {id}"))
    }

    fn alerts(n: usize) -> Vec<Alert> {
        (0..n).map(|i| alert(&format!("a{i}"))).collect()
    }

    fn setup() -> (InMemoryMap, ViewportId) {
        let mut map = InMemoryMap::new();
        let vp = map
            .create_viewport(&ViewportOptions::new((18.5, -69.9).into(), 11, "key"))
            .unwrap();
        (map, vp)
    }

    fn ids(r: &AnnotationReconciler) -> BTreeSet<String> {
        r.live_alert_ids().map(|id| id.as_str().to_string()).collect()
    }

    #[test]
    fn live_markers_track_the_alert_set() {
        let (mut map, vp) = setup();
        let outbox = Outbox::new();
        let mut r = AnnotationReconciler::new();

        r.reconcile(&mut map, vp, &[], &outbox);
        assert_eq!(map.marker_count(), 0);

        r.reconcile(&mut map, vp, &alerts(1), &outbox);
        assert_eq!(map.marker_count(), 1);

        let fifty = alerts(50);
        r.reconcile(&mut map, vp, &fifty, &outbox);
        assert_eq!(map.marker_count(), 50);
        assert_eq!(ids(&r).len(), 50);

        let three = alerts(3);
        let s = r.reconcile(&mut map, vp, &three, &outbox);
        assert_eq!(s, ReconcileSummary { removed: 50, placed: 3, duplicates: 0 });
        assert_eq!(map.marker_count(), 3);
        assert_eq!(
            ids(&r),
            ["a0", "a1", "a2"].iter().map(|s| s.to_string()).collect()
        );

        r.reconcile(&mut map, vp, &[], &outbox);
        assert_eq!(map.marker_count(), 0);
        assert!(r.is_empty());
    }

    #[test]
    fn reconcile_is_idempotent() {
        let (mut map, vp) = setup();
        let outbox = Outbox::new();
        let mut r = AnnotationReconciler::new();
        let list = alerts(4);
        r.reconcile(&mut map, vp, &list, &outbox);
        let first = ids(&r);
        r.reconcile(&mut map, vp, &list, &outbox);
        assert_eq!(ids(&r), first);
        assert_eq!(map.marker_count(), 4);
    }

    #[test]
    fn duplicate_ids_keep_first() {
        let (mut map, vp) = setup();
        let outbox = Outbox::new();
        let mut r = AnnotationReconciler::new();
        let mut second = alert("x");
        second.title = "segunda".into();
        let s = r.reconcile(&mut map, vp, &[alert("x"), second], &outbox);
        assert_eq!(s.placed, 1);
        assert_eq!(s.duplicates, 1);
        let live = map.live_markers();
        assert_eq!(live[0].1.title, "Alerta x");
    }

    #[test]
    fn large_feed_with_repeats_is_indexed_by_alert_id() {
        let (mut map, vp) = setup();
        let outbox = Outbox::new();
        let mut r = AnnotationReconciler::new();
        let mut feed = alerts(2000);
        feed.extend(alerts(2000));
        let s = r.reconcile(&mut map, vp, &feed, &outbox);
        assert_eq!((s.placed, s.duplicates), (2000, 2000));
        assert_eq!(map.marker_count(), 2000);

        assert!(r.contains(&AlertId::new("a1999")));
        let m = r.marker_for(&AlertId::new("a1999")).unwrap();
        assert_eq!(r.alert_for(m), Some(&AlertId::new("a1999")));

        r.reconcile(&mut map, vp, &alerts(1), &outbox);
        assert!(!r.contains(&AlertId::new("a1999")));
        assert_eq!(r.marker_for(&AlertId::new("a1999")), None);
        assert_eq!(r.marker_for(&AlertId::new("a0")), Some(map.live_markers()[0].0));
    }

    #[test]
    fn click_and_hover_reach_the_outbox() {
        let (mut map, vp) = setup();
        let outbox = Outbox::new();
        let mut r = AnnotationReconciler::new();
        r.reconcile(&mut map, vp, &alerts(2), &outbox);

        let m1 = r.marker_for(&AlertId::new("a1")).unwrap();
        assert_eq!(r.alert_for(m1), Some(&AlertId::new("a1")));

        assert!(map.hover_marker(m1, Hover::Enter));
        assert_eq!(outbox.info().map(|c| c.title), Some("Alerta a1".to_string()));
        assert!(map.click_marker(m1));
        assert_eq!(
            outbox.take(),
            vec![DashboardAction::SelectAlert(AlertId::new("a1"))]
        );
        assert!(map.hover_marker(m1, Hover::Leave));
        assert_eq!(outbox.info(), None);
    }

    #[test]
    fn heatmap_layer_is_replaced_wholesale() {
        let (mut map, vp) = setup();
        let mut h = HeatmapOverlay::new();
        let style = HeatmapStyle::default();
        let pts = vec![HeatmapPoint::new(18.4, -69.9, 0.5)];

        assert!(matches!(h.apply(&mut map, vp, &pts, true, &style), HeatmapOutcome::Installed(_)));
        assert!(matches!(h.apply(&mut map, vp, &pts, true, &style), HeatmapOutcome::Installed(_)));
        assert_eq!(map.overlays().len(), 1);

        assert_eq!(h.apply(&mut map, vp, &pts, false, &style), HeatmapOutcome::Cleared);
        assert!(map.overlays().is_empty());

        h.apply(&mut map, vp, &pts, true, &style);
        assert_eq!(h.apply(&mut map, vp, &[], true, &style), HeatmapOutcome::Cleared);
        assert!(map.overlays().is_empty());
        assert_eq!(h.current(), None);
    }

    #[test]
    fn missing_overlay_capability_is_skipped() {
        let mut map = InMemoryMap::without_overlays();
        let vp = map
            .create_viewport(&ViewportOptions::new((18.5, -69.9).into(), 11, "key"))
            .unwrap();
        let mut h = HeatmapOverlay::new();
        let pts = vec![HeatmapPoint::new(18.4, -69.9, 0.5)];
        assert_eq!(
            h.apply(&mut map, vp, &pts, true, &HeatmapStyle::default()),
            HeatmapOutcome::Unsupported
        );
        assert_eq!(h.current(), None);
    }
}
