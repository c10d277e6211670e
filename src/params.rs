//! Strongly typed parameter enumerations for the LDC1000 driver.
//!
//! These enums map directly to datasheet field encodings and are used across
//! [`Config`](crate::config::Config) and the high-level driver APIs. Prefer these
//! types over raw integers to keep configuration values valid and explicit.
//!
//! # Examples
//!
//! ```rust
//! use ldc1000::params::{Amplitude, InterruptMode, ResponseTime};
//!
//! let amplitude = Amplitude::V4;
//! let response = ResponseTime::C384;
//! let interrupt = InterruptMode::WakeUp;
//! let _ = (amplitude, response, interrupt);
//! ```

use modular_bitfield::prelude::Specifier;

/// Oscillation amplitude selections (`LDC_CONFIG.AMPLITUDE`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[repr(u8)]
#[bits = 2]
pub enum Amplitude {
    /// 1 V oscillation amplitude.
    V1 = 0b00,
    /// 2 V oscillation amplitude.
    V2 = 0b01,
    /// 4 V oscillation amplitude.
    V4 = 0b10,
}

impl Amplitude {
    /// Returns the oscillation amplitude in volts.
    pub const fn volts(self) -> u32 {
        match self {
            Self::V1 => 1,
            Self::V2 => 2,
            Self::V4 => 4,
        }
    }
}

/// Response time selections (`LDC_CONFIG.RESP_TIME`), expressed as the number
/// of sensor oscillation cycles per conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[repr(u8)]
#[bits = 3]
pub enum ResponseTime {
    /// 192 cycles per conversion.
    C192 = 0b010,
    /// 384 cycles per conversion.
    C384 = 0b011,
    /// 768 cycles per conversion.
    C768 = 0b100,
    /// 1536 cycles per conversion.
    C1536 = 0b101,
    /// 3072 cycles per conversion.
    C3072 = 0b110,
    /// 6144 cycles per conversion.
    C6144 = 0b111,
}

impl ResponseTime {
    /// Returns the conversion length in sensor oscillation cycles.
    pub const fn cycles(self) -> u16 {
        match self {
            Self::C192 => 192,
            Self::C384 => 384,
            Self::C768 => 768,
            Self::C1536 => 1_536,
            Self::C3072 => 3_072,
            Self::C6144 => 6_144,
        }
    }
}

/// Frequency counter clock source selection (`CLK_CONFIG.CLK_SEL`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[repr(u8)]
#[bits = 1]
pub enum ClockSource {
    /// External crystal oscillator.
    Crystal = 0,
    /// Time-base clock input pin.
    TimeBase = 1,
}

/// Interrupt pin behaviour selections (`INT_CONFIG.MODE`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[repr(u8)]
#[bits = 3]
pub enum InterruptMode {
    /// Interrupt pin disabled.
    Disabled = 0b000,
    /// Pin follows the proximity comparator output.
    Comparator = 0b001,
    /// Pin asserts once when proximity crosses the wake-up threshold.
    WakeUp = 0b010,
    /// Pin pulses when a new conversion result is ready.
    DataReady = 0b100,
}

/// Power state selections (`PWR_CONFIG.MODE`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[repr(u8)]
#[bits = 1]
pub enum PowerMode {
    /// Conversions halted, registers retained.
    Standby = 0,
    /// Continuous conversion.
    Active = 1,
}
