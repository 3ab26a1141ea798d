//! Channels between capability callbacks and the controller's owner.
//!
//! Marker and gesture callbacks run on the UI thread outside of any controller
//! call, so they never touch controller state directly. They push into these
//! shared queues and the controller (or its host) drains them.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use alerts::AlertId;
use layers::InfoCard;
use provider::GestureKind;

use crate::error::MapError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapStatus {
    Loading,
    Ready,
    Unavailable(MapError),
    Unmounted,
}

impl MapStatus {
    pub fn is_ready(&self) -> bool {
        matches!(self, MapStatus::Ready)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MapStatus::Loading => "loading",
            MapStatus::Ready => "ready",
            MapStatus::Unavailable(_) => "unavailable",
            MapStatus::Unmounted => "unmounted",
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// A toast-style message for the host UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// What the host should do in response to map activity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DashboardAction {
    SelectAlert(AlertId),
    StatusChanged(MapStatus),
    Notify(Notice),
}

#[derive(Debug, Default)]
struct OutboxInner {
    actions: Vec<DashboardAction>,
    info: Option<InfoCard>,
}

/// Actions for the host plus the current hover card.
#[derive(Debug, Clone, Default)]
pub struct Outbox {
    inner: Rc<RefCell<OutboxInner>>,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, action: DashboardAction) {
        self.inner.borrow_mut().actions.push(action);
    }

    pub fn take(&self) -> Vec<DashboardAction> {
        std::mem::take(&mut self.inner.borrow_mut().actions)
    }

    pub fn pending(&self) -> usize {
        self.inner.borrow().actions.len()
    }

    pub fn show_info(&self, card: InfoCard) {
        self.inner.borrow_mut().info = Some(card);
    }

    /// Clears the card only if it still belongs to `alert`; a late leave from
    /// another marker must not hide the card that replaced it.
    pub fn hide_info(&self, alert: &AlertId) {
        let mut inner = self.inner.borrow_mut();
        if inner.info.as_ref().is_some_and(|c| &c.alert_id == alert) {
            inner.info = None;
        }
    }

    pub fn clear_info(&self) {
        self.inner.borrow_mut().info = None;
    }

    pub fn info(&self) -> Option<InfoCard> {
        self.inner.borrow().info.clone()
    }
}

/// Gestures raised by the capability, waiting to be stamped and applied.
#[derive(Debug, Clone, Default)]
pub struct GestureInbox {
    queue: Rc<RefCell<VecDeque<GestureKind>>>,
}

impl GestureInbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, kind: GestureKind) {
        self.queue.borrow_mut().push_back(kind);
    }

    pub fn is_empty(&self) -> bool {
        self.queue.borrow().is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.borrow().len()
    }

    pub fn drain(&self) -> Vec<GestureKind> {
        self.queue.borrow_mut().drain(..).collect()
    }

    pub fn clear(&self) {
        self.queue.borrow_mut().clear();
    }
}
