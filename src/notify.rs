//! Toast-style notifications
//!
//! The simulation only emits `GameEvent`s. This module turns the ones a player
//! should hear about into notifications and hands them to a `Notifier`.

use serde::Serialize;

use crate::sim::GameEvent;

/// Visual weight of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Info,
    Destructive,
}

/// A single toast
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub severity: Severity,
    /// `None` leaves the display time to the presenter
    pub duration_ms: Option<u32>,
}

impl Notification {
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity: Severity::Info,
            duration_ms: None,
        }
    }

    pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            severity: Severity::Destructive,
            ..Self::info(title, description)
        }
    }

    pub fn with_duration(mut self, ms: u32) -> Self {
        self.duration_ms = Some(ms);
        self
    }

    /// Shown when a checkout session cannot be created
    pub fn payment_error() -> Self {
        Self::destructive(
            "Payment Error",
            "Failed to create payment session. Please try again.",
        )
    }
}

/// Map a game event to the toast it deserves, if any
pub fn notification_for(event: &GameEvent) -> Option<Notification> {
    match event {
        GameEvent::Started => Some(Notification::info(
            "Eclipse Realms Started!",
            "Use arrow keys to move, spacebar to jump or attack",
        )),
        GameEvent::CoinCollected { coins, .. } => {
            Some(Notification::info("Cosmic Coin!", format!("{coins} coins")).with_duration(1000))
        }
        GameEvent::LevelUp { level } => Some(Notification::info(
            "Level Up!",
            format!("Welcome to Level {level}"),
        )),
        // Runner runs carry a distance, arena runs do not
        GameEvent::Ended {
            score,
            distance: Some(_),
        } => Some(Notification::destructive(
            "Eclipse Eclipsed!",
            format!("Your journey ends. Score: {score}"),
        )),
        GameEvent::Ended {
            score,
            distance: None,
        } => Some(Notification::destructive(
            "Game Over!",
            format!("Final Score: {score}"),
        )),
        _ => None,
    }
}

/// Sink for notifications
pub trait Notifier {
    fn notify(&mut self, notification: Notification);
}

/// Writes notifications to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&mut self, notification: Notification) {
        match notification.severity {
            Severity::Info => log::info!("{}: {}", notification.title, notification.description),
            Severity::Destructive => {
                log::warn!("{}: {}", notification.title, notification.description)
            }
        }
    }
}

/// Collects notifications (web adapter queue, tests)
impl Notifier for Vec<Notification> {
    fn notify(&mut self, notification: Notification) {
        self.push(notification);
    }
}

/// Forward every notable event to `notifier`. Returns how many were sent.
pub fn dispatch<'a, N, I>(notifier: &mut N, events: I) -> usize
where
    N: Notifier + ?Sized,
    I: IntoIterator<Item = &'a GameEvent>,
{
    let mut sent = 0;
    for notification in events.into_iter().filter_map(notification_for) {
        notifier.notify(notification);
        sent += 1;
    }
    sent
}
