//! Instance-indexed line wiring descriptors.
//!
//! Each sensor instance binds four logic lines. The wiring is kept as an
//! explicit table so an out-of-range instance id fails fast instead of
//! falling through to another sensor's pins. Binding a [`PinName`] to a
//! concrete HAL pin type stays with the board-support layer.
//!
//! # Examples
//!
//! ```rust
//! use ldc1000::lines::{InstanceLines, InstanceMap, PinName};
//!
//! const LINES: InstanceMap<2> = InstanceMap::new([
//!     InstanceLines::new(PinName(16), PinName(17), PinName(18), PinName(19)),
//!     InstanceLines::new(PinName(20), PinName(21), PinName(22), PinName(23)),
//! ]);
//!
//! assert!(LINES.get(1).is_ok());
//! assert!(LINES.get(2).is_err());
//! ```

use crate::config::ConfigError;

/// Identifier of a physical pin as numbered by the board wiring table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinName(pub u8);

/// Configuration record naming a physical pin and its initial logic level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineConfig {
    /// Physical pin backing this line.
    pub pin: PinName,
    /// Logic level the line idles at before the first transaction.
    pub initial_high: bool,
}

impl LineConfig {
    /// Creates a new line configuration record.
    pub const fn new(pin: PinName, initial_high: bool) -> Self {
        Self { pin, initial_high }
    }
}

/// The four line bindings of one sensor instance, carrying the idle levels
/// the transport expects: data high, select high, clock low.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstanceLines {
    /// Data to the chip.
    pub mosi: LineConfig,
    /// Active-low chip select.
    pub cs: LineConfig,
    /// Clock.
    pub sck: LineConfig,
    /// Data from the chip; the level names the pull applied until the chip
    /// drives the line.
    pub miso: LineConfig,
}

impl InstanceLines {
    /// Builds the line set for one instance from its four pin names.
    pub const fn new(mosi: PinName, cs: PinName, sck: PinName, miso: PinName) -> Self {
        Self {
            mosi: LineConfig::new(mosi, true),
            cs: LineConfig::new(cs, true),
            sck: LineConfig::new(sck, false),
            miso: LineConfig::new(miso, false),
        }
    }
}

/// Explicit mapping from instance ids to line sets.
#[derive(Debug, Clone, Copy)]
pub struct InstanceMap<const N: usize> {
    entries: [InstanceLines; N],
}

impl<const N: usize> InstanceMap<N> {
    /// Creates a map over the given wiring table.
    pub const fn new(entries: [InstanceLines; N]) -> Self {
        Self { entries }
    }

    /// Resolves the line set wired for `id`.
    ///
    /// Unmapped ids are a configuration fault, not a fall-through.
    pub fn get(&self, id: u8) -> core::result::Result<&InstanceLines, ConfigError> {
        self.entries
            .get(id as usize)
            .ok_or(ConfigError::UnknownInstance(id))
    }
}
