//! Client-only presentation state. No network, no failure modes.

use crate::models::NotificationKind;

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: String,
    pub message: String,
    pub kind: NotificationKind,
    /// Display time in milliseconds; `None` leaves it to the UI.
    pub duration: Option<u64>,
}

/// A notification before it is queued and given an id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewNotification {
    pub message: String,
    pub kind: NotificationKind,
    pub duration: Option<u64>,
}

impl NewNotification {
    pub fn new(kind: NotificationKind, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind,
            duration: None,
        }
    }

    pub fn with_duration(mut self, millis: u64) -> Self {
        self.duration = Some(millis);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum UiAction {
    ToggleSidebar,
    SetSidebarOpen(bool),
    AddNotification(NewNotification),
    RemoveNotification(String),
    SetLoading(bool),
}

#[derive(Debug, Clone, PartialEq)]
pub struct UiState {
    pub sidebar_open: bool,
    /// Oldest first, unbounded.
    pub notifications: Vec<Notification>,
    pub is_loading: bool,
    last_notification_id: u64,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            sidebar_open: true,
            notifications: Vec::new(),
            is_loading: false,
            last_notification_id: 0,
        }
    }
}

impl UiState {
    pub fn reduce(&mut self, action: UiAction) {
        match action {
            UiAction::ToggleSidebar => self.sidebar_open = !self.sidebar_open,
            UiAction::SetSidebarOpen(open) => self.sidebar_open = open,
            UiAction::AddNotification(notification) => {
                let now = u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or(0);
                self.add_notification(notification, now);
            }
            UiAction::RemoveNotification(id) => self.remove_notification(&id),
            UiAction::SetLoading(loading) => self.is_loading = loading,
        }
    }

    /// Queue a notification and return its id.
    ///
    /// Ids are the creation time in milliseconds, bumped past the previous
    /// id when two notifications land in the same millisecond.
    pub fn add_notification(&mut self, notification: NewNotification, now_millis: u64) -> String {
        let id = now_millis.max(self.last_notification_id + 1);
        self.last_notification_id = id;
        let id = id.to_string();
        self.notifications.push(Notification {
            id: id.clone(),
            message: notification.message,
            kind: notification.kind,
            duration: notification.duration,
        });
        id
    }

    pub fn remove_notification(&mut self, id: &str) {
        self.notifications.retain(|n| n.id != id);
    }
}
