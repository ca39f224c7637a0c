//! Notification seam.
//!
//! The core never talks to a desktop notification daemon directly; frontends
//! plug in whatever delivery they have (terminal bell, system toast).

pub trait Notifier {
    fn notify(&self, title: &str, body: &str);
}

/// Drops every notification. Useful in tests and headless runs.
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _title: &str, _body: &str) {}
}
