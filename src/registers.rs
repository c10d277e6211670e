//! Register map definitions for the LDC1000 inductance-to-digital converter.
#![allow(unused_parens)]

use modular_bitfield::prelude::*;

use crate::params::{Amplitude, ClockSource, InterruptMode, PowerMode, ResponseTime};

/// Register address of `DEVICE_ID`.
pub const REG_DEVICE_ID: u8 = 0x00;
/// Register address of `RP_MAX`.
pub const REG_RP_MAX: u8 = 0x01;
/// Register address of `RP_MIN`.
pub const REG_RP_MIN: u8 = 0x02;
/// Register address of `SENSOR_FREQ`.
pub const REG_SENSOR_FREQ: u8 = 0x03;
/// Register address of `LDC_CONFIG`.
pub const REG_LDC_CONFIG: u8 = 0x04;
/// Register address of `CLK_CONFIG`.
pub const REG_CLK_CONFIG: u8 = 0x05;
/// Register address of `THRES_HI_LSB`.
pub const REG_THRES_HI_LSB: u8 = 0x06;
/// Register address of `THRES_HI_MSB`.
pub const REG_THRES_HI_MSB: u8 = 0x07;
/// Register address of `THRES_LO_LSB`.
pub const REG_THRES_LO_LSB: u8 = 0x08;
/// Register address of `THRES_LO_MSB`.
pub const REG_THRES_LO_MSB: u8 = 0x09;
/// Register address of `INT_CONFIG`.
pub const REG_INT_CONFIG: u8 = 0x0A;
/// Register address of `PWR_CONFIG`.
pub const REG_PWR_CONFIG: u8 = 0x0B;
/// Register address of `STATUS`.
pub const REG_STATUS: u8 = 0x20;
/// Register address of `PROX_LSB`.
pub const REG_PROX_LSB: u8 = 0x21;
/// Register address of `PROX_MSB`.
pub const REG_PROX_MSB: u8 = 0x22;
/// Register address of `FREQ_LSB`.
pub const REG_FREQ_LSB: u8 = 0x23;
/// Register address of `FREQ_MID`.
pub const REG_FREQ_MID: u8 = 0x24;
/// Register address of `FREQ_MSB`.
pub const REG_FREQ_MSB: u8 = 0x25;

/// Flag ORed into the address byte of a register read.
pub const READ_FLAG: u8 = 0x80;

/// Opcode that starts a burst read at `DEVICE_ID`.
pub const BURST_START: u8 = REG_DEVICE_ID | READ_FLAG;

/// Value the `DEVICE_ID` register reads back on a responsive chip.
pub const EXPECTED_DEVICE_ID: u8 = 0x80;

/// Number of registers captured by the configuration burst read
/// (`DEVICE_ID` through `PWR_CONFIG`).
pub const CONFIG_BURST_LEN: usize = 12;

/// Access permissions encoded for each register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterAccess {
    /// Read-only register.
    ReadOnly,
    /// Read/write register.
    ReadWrite,
}

/// Minimal metadata exposed by every register value type.
pub trait Register {
    /// Raw storage backing the register payload.
    type Raw: Copy;
    /// Register address as documented in the datasheet.
    const ADDRESS: u8;
    /// Access permission classification.
    const ACCESS: RegisterAccess;
}

/// Bitfield representation of the `LDC_CONFIG` register (address `0x04`).
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LdcConfig {
    // Conversion response time (bits 2:0).
    pub response_time: ResponseTime,
    // Oscillation amplitude (bits 4:3).
    pub amplitude: Amplitude,
    #[skip]
    __: B3,
}

impl From<u8> for LdcConfig {
    fn from(value: u8) -> Self {
        Self::from_bytes([value])
    }
}

impl From<LdcConfig> for u8 {
    fn from(value: LdcConfig) -> Self {
        value.into_bytes()[0]
    }
}

/// Bitfield representation of the `CLK_CONFIG` register (address `0x05`).
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockConfig {
    // Frequency counter clock source (bit 0).
    pub source: ClockSource,
    // Crystal oscillator power-down flag (bit 1).
    pub oscillator_disabled: bool,
    #[skip]
    __: B6,
}

impl From<u8> for ClockConfig {
    fn from(value: u8) -> Self {
        Self::from_bytes([value])
    }
}

impl From<ClockConfig> for u8 {
    fn from(value: ClockConfig) -> Self {
        value.into_bytes()[0]
    }
}

/// Bitfield representation of the `INT_CONFIG` register (address `0x0A`).
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterruptConfig {
    // Interrupt pin behaviour (bits 2:0).
    pub mode: InterruptMode,
    #[skip]
    __: B5,
}

impl From<u8> for InterruptConfig {
    fn from(value: u8) -> Self {
        Self::from_bytes([value])
    }
}

impl From<InterruptConfig> for u8 {
    fn from(value: InterruptConfig) -> Self {
        value.into_bytes()[0]
    }
}

/// Bitfield representation of the `PWR_CONFIG` register (address `0x0B`).
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowerConfig {
    // Power state selection (bit 0).
    pub mode: PowerMode,
    #[skip]
    __: B7,
}

impl From<u8> for PowerConfig {
    fn from(value: u8) -> Self {
        Self::from_bytes([value])
    }
}

impl From<PowerConfig> for u8 {
    fn from(value: PowerConfig) -> Self {
        value.into_bytes()[0]
    }
}

/// Bitfield representation of the `STATUS` register (address `0x20`).
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Status {
    #[skip]
    __: B4,
    // Proximity comparator output (bit 4).
    pub comparator: bool,
    // Wake-up threshold crossed (bit 5).
    pub wake_up: bool,
    // Conversion data not yet ready, active low (bit 6).
    pub data_ready_b: bool,
    // Sensor oscillation has stopped (bit 7).
    pub osc_dead: bool,
}

impl From<u8> for Status {
    fn from(value: u8) -> Self {
        Self::from_bytes([value])
    }
}

impl From<Status> for u8 {
    fn from(value: Status) -> Self {
        value.into_bytes()[0]
    }
}

impl Register for LdcConfig {
    type Raw = u8;
    const ADDRESS: u8 = REG_LDC_CONFIG;
    const ACCESS: RegisterAccess = RegisterAccess::ReadWrite;
}

impl Register for ClockConfig {
    type Raw = u8;
    const ADDRESS: u8 = REG_CLK_CONFIG;
    const ACCESS: RegisterAccess = RegisterAccess::ReadWrite;
}

impl Register for InterruptConfig {
    type Raw = u8;
    const ADDRESS: u8 = REG_INT_CONFIG;
    const ACCESS: RegisterAccess = RegisterAccess::ReadWrite;
}

impl Register for PowerConfig {
    type Raw = u8;
    const ADDRESS: u8 = REG_PWR_CONFIG;
    const ACCESS: RegisterAccess = RegisterAccess::ReadWrite;
}

impl Register for Status {
    type Raw = u8;
    const ADDRESS: u8 = REG_STATUS;
    const ACCESS: RegisterAccess = RegisterAccess::ReadOnly;
}

/// Joins a threshold register pair into its 16-bit word.
pub fn threshold_word(lsb: u8, msb: u8) -> u16 {
    ((msb as u16) << 8) | lsb as u16
}

/// Splits a 16-bit threshold word into its `(LSB, MSB)` register pair.
pub fn split_threshold(value: u16) -> (u8, u8) {
    ((value & 0xFF) as u8, (value >> 8) as u8)
}
