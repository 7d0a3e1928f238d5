//! Best-effort side-effect delivery.
//!
//! The engine returns side effects as data; this module hands them to the
//! host. Delivery is fire-and-forget: any failure (no notification daemon,
//! no audio device, headless host) is swallowed and never reaches the
//! progression state that requested it.

use std::io::Write;

use questline_core::storage::NotificationsConfig;
use questline_core::SideEffect;

pub fn deliver(effects: &[SideEffect], config: &NotificationsConfig) {
    for effect in effects {
        match effect {
            SideEffect::PlaySound => play_sound(config),
            SideEffect::Notify { title, body } => {
                if config.enabled {
                    send_notification(title, body);
                }
            }
        }
    }
}

fn play_sound(config: &NotificationsConfig) {
    if !config.sound {
        return;
    }
    match config.custom_sound.as_deref() {
        // Hand the file to the OS default handler.
        Some(path) => {
            let _ = open::that_detached(path);
        }
        // Terminal bell as the built-in alert.
        None => {
            let mut stderr = std::io::stderr();
            let _ = stderr.write_all(b"\x07");
            let _ = stderr.flush();
        }
    }
}

fn send_notification(title: &str, body: &str) {
    let _ = std::process::Command::new("notify-send")
        .arg(title)
        .arg(body)
        .stdout(std::process::Stdio::null())
        .stderr(std::process::Stdio::null())
        .spawn();
}
