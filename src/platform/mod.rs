//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Input events (key mapping)
//! - Animation frames

#[cfg(target_arch = "wasm32")]
mod browser;

#[cfg(target_arch = "wasm32")]
pub use browser::{BrowserFrameHost, FrameCallback};

use crate::scheduler::FrameHost;

/// What a key or pointer press means to the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    Jump,
    /// End the run now, keeping the score
    Abort,
    /// Switch to the next theme and restart
    CycleTheme,
}

/// Map a `KeyboardEvent.key` (or `.code`) value to an action
pub fn action_for_key(key: &str) -> Option<InputAction> {
    match key {
        " " | "Space" | "ArrowUp" => Some(InputAction::Jump),
        "Escape" => Some(InputAction::Abort),
        "t" | "T" => Some(InputAction::CycleTheme),
        _ => None,
    }
}

/// Frame host without a display: requests queue up until `fire` is called.
///
/// Drives the native demo and headless tests.
#[derive(Debug, Default)]
pub struct HeadlessFrameHost {
    next_handle: u32,
    pending: Vec<u32>,
    refuse: bool,
    pub cancelled: Vec<u32>,
}

impl HeadlessFrameHost {
    /// A host that never grants a frame
    pub fn refusing() -> Self {
        Self {
            refuse: true,
            ..Default::default()
        }
    }

    pub fn pending(&self) -> &[u32] {
        &self.pending
    }

    /// Deliver the oldest outstanding request, as a browser would on vsync
    pub fn fire(&mut self) -> Option<u32> {
        if self.pending.is_empty() {
            return None;
        }
        Some(self.pending.remove(0))
    }
}

impl FrameHost for HeadlessFrameHost {
    type Handle = u32;

    fn request_frame(&mut self) -> Option<u32> {
        if self.refuse {
            return None;
        }
        self.next_handle += 1;
        self.pending.push(self.next_handle);
        Some(self.next_handle)
    }

    fn cancel_frame(&mut self, handle: u32) {
        self.pending.retain(|h| *h != handle);
        self.cancelled.push(handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        assert_eq!(action_for_key(" "), Some(InputAction::Jump));
        assert_eq!(action_for_key("Space"), Some(InputAction::Jump));
        assert_eq!(action_for_key("ArrowUp"), Some(InputAction::Jump));
        assert_eq!(action_for_key("Escape"), Some(InputAction::Abort));
        assert_eq!(action_for_key("i"), None);
        assert_eq!(action_for_key("t"), Some(InputAction::CycleTheme));
        assert_eq!(action_for_key("ArrowDown"), None);
        assert_eq!(action_for_key("Enter"), None);
    }

    #[test]
    fn test_headless_host_fires_in_order() {
        let mut host = HeadlessFrameHost::default();
        let a = host.request_frame().unwrap();
        let b = host.request_frame().unwrap();
        host.cancel_frame(a);
        assert_eq!(host.fire(), Some(b));
        assert_eq!(host.fire(), None);
        assert_eq!(host.cancelled, vec![a]);
    }
}
