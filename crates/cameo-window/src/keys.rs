//! Key codes delivered by the event pump.

/// A key code reduced to its low eight bits.
///
/// Some toolkits set high bits for modifiers or non-ASCII encodings;
/// masking leaves the plain ASCII code for the common keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyCode(pub u8);

impl KeyCode {
    pub const TAB: KeyCode = KeyCode(9);
    pub const ESCAPE: KeyCode = KeyCode(27);
    pub const SPACE: KeyCode = KeyCode(32);

    /// Decode a raw backend key code. Negative values mean no key.
    pub fn from_raw(raw: i32) -> Option<Self> {
        if raw < 0 {
            return None;
        }
        Some(Self((raw & 0xFF) as u8))
    }

    /// The masked code.
    pub fn code(self) -> u8 {
        self.0
    }
}
