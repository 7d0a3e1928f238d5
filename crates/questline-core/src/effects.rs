//! Side effects as data.
//!
//! The engine never talks to the host notification or audio facilities
//! directly. Each command returns the side effects it wants performed and
//! the caller delivers them best-effort. A delivery failure must never
//! abort or roll back the state mutation that produced it.

use serde::{Deserialize, Serialize};

/// A host-facing side effect requested by an engine command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SideEffect {
    /// Play the alert sound.
    PlaySound,
    /// Show a desktop notification, subject to the notification gate
    /// in [`crate::storage::Config`].
    Notify { title: String, body: String },
}

impl SideEffect {
    /// The notification announcing a freshly drawn challenge.
    pub fn new_challenge_notification(amount: u32) -> Self {
        SideEffect::Notify {
            title: "New challenge".to_string(),
            body: format!("Worth {amount} xp!"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notification_interpolates_amount() {
        let effect = SideEffect::new_challenge_notification(80);
        match effect {
            SideEffect::Notify { body, .. } => assert_eq!(body, "Worth 80 xp!"),
            _ => panic!("Expected Notify"),
        }
    }
}
