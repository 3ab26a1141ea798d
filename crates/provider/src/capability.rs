//! Capability interface over a hosted mapping SDK.
//!
//! The controller only talks to the map through [`MapCapability`]:
//! - viewport creation and one-way viewport commands (`pan_to`, `set_zoom`)
//! - marker placement with click/hover handlers
//! - a single weighted overlay layer (heatmap)
//! - gesture subscriptions
//!
//! Nothing here reads the viewport back. Implementations wrap a concrete SDK;
//! [`crate::memory::InMemoryMap`] is the in-process double.

use alerts::HeatmapPoint;
use foundation::geo::LatLng;
use foundation::handles::Handle;
use layers::{HeatmapStyle, MarkerSymbol};

use crate::error::CapabilityError;

macro_rules! handle_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(pub Handle);

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}#{}", stringify!($name), self.0)
            }
        }
    };
}

handle_id!(
    /// A live map widget.
    ViewportId
);
handle_id!(
    /// A placed marker; owned by whoever placed it.
    MarkerId
);
handle_id!(
    /// An installed overlay layer.
    OverlayId
);
handle_id!(
    /// A gesture subscription.
    SubscriptionId
);

/// User gestures on the viewport.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum GestureKind {
    DragStart,
    ZoomChanged,
    Click,
}

impl GestureKind {
    pub const ALL: [GestureKind; 3] = [
        GestureKind::DragStart,
        GestureKind::ZoomChanged,
        GestureKind::Click,
    ];
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Hover {
    Enter,
    Leave,
}

/// Viewport construction parameters, handed over once at mount.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewportOptions {
    pub center: LatLng,
    pub zoom: u8,
    pub credential: String,
    /// Provider-specific visual theme (map style id).
    pub theme: Option<String>,
    pub hide_points_of_interest: bool,
    pub hide_transit: bool,
    pub map_type_control: bool,
    pub street_view_control: bool,
    pub fullscreen_control: bool,
    pub zoom_control: bool,
}

impl ViewportOptions {
    pub fn new(center: LatLng, zoom: u8, credential: impl Into<String>) -> Self {
        Self {
            center,
            zoom,
            credential: credential.into(),
            theme: None,
            hide_points_of_interest: true,
            hide_transit: true,
            map_type_control: true,
            street_view_control: false,
            fullscreen_control: true,
            zoom_control: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarkerSpec {
    pub position: LatLng,
    pub symbol: MarkerSymbol,
    pub title: String,
}

/// Callbacks a marker fires. Invoked on the UI thread, never re-entrantly.
pub struct MarkerHandlers {
    pub on_click: Box<dyn FnMut()>,
    pub on_hover: Box<dyn FnMut(Hover)>,
}

impl MarkerHandlers {
    pub fn noop() -> Self {
        Self {
            on_click: Box::new(|| {}),
            on_hover: Box::new(|_| {}),
        }
    }
}

impl std::fmt::Debug for MarkerHandlers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarkerHandlers").finish_non_exhaustive()
    }
}

pub type GestureCallback = Box<dyn FnMut(GestureKind)>;

/// The mapping SDK as seen by the controller.
///
/// Contract:
/// - Calls happen on one thread; callbacks are invoked outside of any call into
///   the capability.
/// - Gesture callbacks fire for user-originated gestures only; `pan_to` and
///   `set_zoom` issued through this trait must not raise gestures.
/// - Handles are never reused while live; removing an unknown handle is a no-op.
pub trait MapCapability {
    fn create_viewport(&mut self, options: &ViewportOptions)
    -> Result<ViewportId, CapabilityError>;

    fn destroy_viewport(&mut self, viewport: ViewportId);

    fn pan_to(&mut self, viewport: ViewportId, center: LatLng);

    fn set_zoom(&mut self, viewport: ViewportId, zoom: u8);

    fn place_marker(
        &mut self,
        viewport: ViewportId,
        spec: MarkerSpec,
        handlers: MarkerHandlers,
    ) -> MarkerId;

    fn remove_marker(&mut self, marker: MarkerId);

    /// Installs a weighted layer. `None` means the overlay capability is not
    /// available in this provider.
    fn set_overlay_layer(
        &mut self,
        viewport: ViewportId,
        points: &[HeatmapPoint],
        style: &HeatmapStyle,
    ) -> Option<OverlayId>;

    fn remove_overlay_layer(&mut self, overlay: OverlayId);

    fn on_gesture(
        &mut self,
        viewport: ViewportId,
        kinds: &[GestureKind],
        callback: GestureCallback,
    ) -> SubscriptionId;

    fn unsubscribe(&mut self, subscription: SubscriptionId);
}
