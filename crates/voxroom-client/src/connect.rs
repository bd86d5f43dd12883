//! The connect screen: a single room-name field gated on non-empty input.

/// Room-name input state.
///
/// The value survives a disconnect, so returning to this screen shows the
/// last room that was joined.
#[derive(Debug, Clone, Default)]
pub struct ConnectScreen {
    room_name: String,
}

impl ConnectScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn room_name(&self) -> &str {
        &self.room_name
    }

    pub fn set_room_name(&mut self, value: impl Into<String>) {
        self.room_name = value.into();
    }

    pub fn push_char(&mut self, c: char) {
        self.room_name.push(c);
    }

    pub fn backspace(&mut self) {
        self.room_name.pop();
    }

    /// Join is enabled iff the trimmed room name is non-empty.
    pub fn can_join(&self) -> bool {
        !self.room_name.trim().is_empty()
    }

    /// Returns the room to join, or `None` while the gate is closed.
    pub fn submit(&self) -> Option<String> {
        self.can_join().then(|| self.room_name.trim().to_string())
    }
}
