//! In-process [`MapCapability`] used by tests and by the headless dashboard.
//!
//! State lives behind `Rc<RefCell<..>>`; clones share it, so a test can hand one
//! clone to the controller and keep another to inspect or to simulate user input.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use alerts::HeatmapPoint;
use foundation::geo::LatLng;
use foundation::handles::HandleAllocator;
use layers::HeatmapStyle;
use tracing::debug;

use crate::capability::{
    GestureCallback, GestureKind, Hover, MapCapability, MarkerHandlers, MarkerId, MarkerSpec,
    OverlayId, SubscriptionId, ViewportId, ViewportOptions,
};
use crate::error::CapabilityError;

/// A viewport command as observed by the provider.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum ViewportCall {
    PanTo(LatLng),
    SetZoom(u8),
}

#[derive(Debug, Clone, PartialEq)]
pub struct OverlayRecord {
    pub id: OverlayId,
    pub points: Vec<HeatmapPoint>,
    pub style: HeatmapStyle,
}

struct ViewportRecord {
    id: ViewportId,
    options: ViewportOptions,
    center: LatLng,
    zoom: u8,
}

struct MarkerRecord {
    spec: MarkerSpec,
    // Taken out while a handler runs.
    handlers: Option<MarkerHandlers>,
}

struct SubscriptionRecord {
    kinds: Vec<GestureKind>,
    callback: Option<GestureCallback>,
}

#[derive(Default)]
struct Inner {
    load_failure: Option<CapabilityError>,
    overlays_unsupported: bool,
    calls: usize,

    viewport_ids: HandleAllocator,
    marker_ids: HandleAllocator,
    overlay_ids: HandleAllocator,
    subscription_ids: HandleAllocator,

    viewport: Option<ViewportRecord>,
    markers: BTreeMap<MarkerId, MarkerRecord>,
    overlays: BTreeMap<OverlayId, OverlayRecord>,
    subscriptions: BTreeMap<SubscriptionId, SubscriptionRecord>,
    viewport_calls: Vec<ViewportCall>,
}

impl Inner {
    fn owns(&self, viewport: ViewportId) -> bool {
        self.viewport.as_ref().is_some_and(|v| v.id == viewport)
    }
}

#[derive(Clone, Default)]
pub struct InMemoryMap {
    inner: Rc<RefCell<Inner>>,
}

impl std::fmt::Debug for InMemoryMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("InMemoryMap")
            .field("viewport", &inner.viewport.as_ref().map(|v| v.id))
            .field("markers", &inner.markers.len())
            .field("overlays", &inner.overlays.len())
            .field("subscriptions", &inner.subscriptions.len())
            .finish()
    }
}

impl InMemoryMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// A provider whose SDK never loads: `create_viewport` fails with `err`.
    pub fn failing(err: CapabilityError) -> Self {
        let map = Self::default();
        map.inner.borrow_mut().load_failure = Some(err);
        map
    }

    /// A provider without the overlay (visualization) library.
    pub fn without_overlays() -> Self {
        let map = Self::default();
        map.inner.borrow_mut().overlays_unsupported = true;
        map
    }

    /// Number of trait calls received so far.
    pub fn call_count(&self) -> usize {
        self.inner.borrow().calls
    }

    pub fn has_viewport(&self) -> bool {
        self.inner.borrow().viewport.is_some()
    }

    pub fn viewport_options(&self) -> Option<ViewportOptions> {
        self.inner.borrow().viewport.as_ref().map(|v| v.options.clone())
    }

    /// Current `(center, zoom)` as the provider sees it.
    pub fn camera(&self) -> Option<(LatLng, u8)> {
        self.inner
            .borrow()
            .viewport
            .as_ref()
            .map(|v| (v.center, v.zoom))
    }

    pub fn viewport_calls(&self) -> Vec<ViewportCall> {
        self.inner.borrow().viewport_calls.clone()
    }

    pub fn pan_targets(&self) -> Vec<LatLng> {
        self.inner
            .borrow()
            .viewport_calls
            .iter()
            .filter_map(|c| match c {
                ViewportCall::PanTo(p) => Some(*p),
                ViewportCall::SetZoom(_) => None,
            })
            .collect()
    }

    pub fn live_markers(&self) -> Vec<(MarkerId, MarkerSpec)> {
        self.inner
            .borrow()
            .markers
            .iter()
            .map(|(id, m)| (*id, m.spec.clone()))
            .collect()
    }

    pub fn marker_count(&self) -> usize {
        self.inner.borrow().markers.len()
    }

    pub fn overlays(&self) -> Vec<OverlayRecord> {
        self.inner.borrow().overlays.values().cloned().collect()
    }

    pub fn subscription_count(&self) -> usize {
        self.inner.borrow().subscriptions.len()
    }

    /// Simulates a user gesture; returns how many subscribers were notified.
    pub fn emit_gesture(&self, kind: GestureKind) -> usize {
        let ids: Vec<SubscriptionId> = self
            .inner
            .borrow()
            .subscriptions
            .iter()
            .filter(|(_, s)| s.kinds.contains(&kind))
            .map(|(id, _)| *id)
            .collect();

        let mut notified = 0;
        for id in ids {
            let callback = self
                .inner
                .borrow_mut()
                .subscriptions
                .get_mut(&id)
                .and_then(|s| s.callback.take());
            let Some(mut callback) = callback else {
                continue;
            };
            callback(kind);
            notified += 1;
            if let Some(s) = self.inner.borrow_mut().subscriptions.get_mut(&id) {
                s.callback = Some(callback);
            }
        }
        notified
    }

    pub fn click_marker(&self, marker: MarkerId) -> bool {
        self.with_marker_handlers(marker, |h| (h.on_click)())
    }

    pub fn hover_marker(&self, marker: MarkerId, hover: Hover) -> bool {
        self.with_marker_handlers(marker, |h| (h.on_hover)(hover))
    }

    fn with_marker_handlers(&self, marker: MarkerId, f: impl FnOnce(&mut MarkerHandlers)) -> bool {
        let handlers = self
            .inner
            .borrow_mut()
            .markers
            .get_mut(&marker)
            .and_then(|m| m.handlers.take());
        let Some(mut handlers) = handlers else {
            return false;
        };
        f(&mut handlers);
        if let Some(m) = self.inner.borrow_mut().markers.get_mut(&marker) {
            m.handlers = Some(handlers);
        }
        true
    }
}

impl MapCapability for InMemoryMap {
    fn create_viewport(
        &mut self,
        options: &ViewportOptions,
    ) -> Result<ViewportId, CapabilityError> {
        let mut inner = self.inner.borrow_mut();
        inner.calls += 1;
        if let Some(err) = inner.load_failure.clone() {
            return Err(err);
        }
        if options.credential.trim().is_empty() {
            return Err(CapabilityError::MissingCredential);
        }
        let id = ViewportId(inner.viewport_ids.allocate());
        debug!(%id, "viewport created");
        inner.viewport = Some(ViewportRecord {
            id,
            options: options.clone(),
            center: options.center,
            zoom: options.zoom,
        });
        Ok(id)
    }

    fn destroy_viewport(&mut self, viewport: ViewportId) {
        let mut inner = self.inner.borrow_mut();
        inner.calls += 1;
        if inner.owns(viewport) {
            inner.viewport = None;
            inner.viewport_ids.release(viewport.0);
        }
    }

    fn pan_to(&mut self, viewport: ViewportId, center: LatLng) {
        let mut inner = self.inner.borrow_mut();
        inner.calls += 1;
        let Some(v) = inner.viewport.as_mut().filter(|v| v.id == viewport) else {
            debug!(%viewport, "pan_to on unknown viewport ignored");
            return;
        };
        v.center = center;
        inner.viewport_calls.push(ViewportCall::PanTo(center));
    }

    fn set_zoom(&mut self, viewport: ViewportId, zoom: u8) {
        let mut inner = self.inner.borrow_mut();
        inner.calls += 1;
        let Some(v) = inner.viewport.as_mut().filter(|v| v.id == viewport) else {
            debug!(%viewport, "set_zoom on unknown viewport ignored");
            return;
        };
        v.zoom = zoom;
        inner.viewport_calls.push(ViewportCall::SetZoom(zoom));
    }

    fn place_marker(
        &mut self,
        viewport: ViewportId,
        spec: MarkerSpec,
        handlers: MarkerHandlers,
    ) -> MarkerId {
        let mut inner = self.inner.borrow_mut();
        inner.calls += 1;
        let id = MarkerId(inner.marker_ids.allocate());
        if !inner.owns(viewport) {
            debug!(%viewport, "marker placed on unknown viewport");
        }
        inner.markers.insert(
            id,
            MarkerRecord {
                spec,
                handlers: Some(handlers),
            },
        );
        id
    }

    fn remove_marker(&mut self, marker: MarkerId) {
        let mut inner = self.inner.borrow_mut();
        inner.calls += 1;
        if inner.markers.remove(&marker).is_some() {
            inner.marker_ids.release(marker.0);
        }
    }

    fn set_overlay_layer(
        &mut self,
        _viewport: ViewportId,
        points: &[HeatmapPoint],
        style: &HeatmapStyle,
    ) -> Option<OverlayId> {
        let mut inner = self.inner.borrow_mut();
        inner.calls += 1;
        if inner.overlays_unsupported {
            return None;
        }
        let id = OverlayId(inner.overlay_ids.allocate());
        inner.overlays.insert(
            id,
            OverlayRecord {
                id,
                points: points.to_vec(),
                style: *style,
            },
        );
        Some(id)
    }

    fn remove_overlay_layer(&mut self, overlay: OverlayId) {
        let mut inner = self.inner.borrow_mut();
        inner.calls += 1;
        if inner.overlays.remove(&overlay).is_some() {
            inner.overlay_ids.release(overlay.0);
        }
    }

    fn on_gesture(
        &mut self,
        _viewport: ViewportId,
        kinds: &[GestureKind],
        callback: GestureCallback,
    ) -> SubscriptionId {
        let mut inner = self.inner.borrow_mut();
        inner.calls += 1;
        let id = SubscriptionId(inner.subscription_ids.allocate());
        inner.subscriptions.insert(
            id,
            SubscriptionRecord {
                kinds: kinds.to_vec(),
                callback: Some(callback),
            },
        );
        id
    }

    fn unsubscribe(&mut self, subscription: SubscriptionId) {
        let mut inner = self.inner.borrow_mut();
        inner.calls += 1;
        if inner.subscriptions.remove(&subscription).is_some() {
            inner.subscription_ids.release(subscription.0);
        }
    }
}
