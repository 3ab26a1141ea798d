//! Map marker and viewport lifecycle controller.
//!
//! - [`reconciler`]: keeps markers and the heatmap layer equal to the input data.
//! - [`interaction`]: turns user gestures into a decaying "user is interacting" flag.
//! - [`autopilot`]: tours the alert list (focus, hold, retreat, advance) while the user is idle.
//! - [`controller`]: wires the three to a [`provider::MapCapability`], a timer queue and an outbox.

pub mod autopilot;
pub mod config;
pub mod controller;
pub mod error;
pub mod interaction;
pub mod outbox;
pub mod reconciler;

pub use autopilot::*;
pub use config::*;
pub use controller::*;
pub use error::*;
pub use interaction::*;
pub use outbox::*;
pub use reconciler::*;
