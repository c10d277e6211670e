//! Configuration primitives for the LDC1000 driver.

use crate::params::{Amplitude, ClockSource, InterruptMode, PowerMode, ResponseTime};

/// User-facing configuration for the LDC1000 sensor.
///
/// The default profile matches the values programmed into a freshly wired
/// sensor head: 4 V oscillation at 384 cycles per conversion, continuous
/// conversion, and a wake-up interrupt band of `0x12C0..0x1450` proximity
/// counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// `RP_MAX` register code bounding the strongest expected response.
    pub rp_max: u8,
    /// `RP_MIN` register code bounding the weakest expected response.
    pub rp_min: u8,
    /// Sensor oscillation frequency divisor (`SENSOR_FREQ` register code).
    pub sensor_frequency: u8,
    /// Oscillation amplitude selection.
    pub amplitude: Amplitude,
    /// Conversion response time selection.
    pub response_time: ResponseTime,
    /// Frequency counter clock source.
    pub clock_source: ClockSource,
    /// Whether the crystal oscillator is powered.
    pub oscillator_enabled: bool,
    /// Interrupt pin behaviour.
    pub interrupt_mode: InterruptMode,
    /// Power state programmed at the end of initialization.
    pub power_mode: PowerMode,
    /// Upper bound of the proximity alarm band.
    pub threshold_high: u16,
    /// Lower bound of the proximity alarm band.
    pub threshold_low: u16,
}

impl Config {
    /// Begins building a [`Config`] using the builder pattern.
    pub fn new() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Checks whether this configuration is valid according to datasheet rules.
    pub fn validate(&self) -> core::result::Result<(), ConfigError> {
        if self.threshold_low >= self.threshold_high {
            return Err(ConfigError::ThresholdBandInverted);
        }

        // RP codes scale inversely with resistance, so the MAX bound must
        // carry the smaller register value.
        if self.rp_max > self.rp_min {
            return Err(ConfigError::RpWindowInverted);
        }

        Ok(())
    }
}

/// Builder for [`Config`] allowing piecemeal construction.
#[derive(Debug, Clone, Copy)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Creates a new builder seeded with [`Config::default()`].
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Overrides the `RP_MAX` register code.
    pub fn rp_max(mut self, rp_max: u8) -> Self {
        self.config.rp_max = rp_max;
        self
    }

    /// Overrides the `RP_MIN` register code.
    pub fn rp_min(mut self, rp_min: u8) -> Self {
        self.config.rp_min = rp_min;
        self
    }

    /// Overrides the sensor oscillation frequency divisor.
    pub fn sensor_frequency(mut self, divisor: u8) -> Self {
        self.config.sensor_frequency = divisor;
        self
    }

    /// Overrides the oscillation amplitude.
    pub fn amplitude(mut self, amplitude: Amplitude) -> Self {
        self.config.amplitude = amplitude;
        self
    }

    /// Overrides the conversion response time.
    pub fn response_time(mut self, response_time: ResponseTime) -> Self {
        self.config.response_time = response_time;
        self
    }

    /// Selects the frequency counter clock source.
    pub fn clock_source(mut self, source: ClockSource) -> Self {
        self.config.clock_source = source;
        self
    }

    /// Powers the crystal oscillator up or down.
    pub fn oscillator_enabled(mut self, enabled: bool) -> Self {
        self.config.oscillator_enabled = enabled;
        self
    }

    /// Overrides the interrupt pin behaviour.
    pub fn interrupt_mode(mut self, mode: InterruptMode) -> Self {
        self.config.interrupt_mode = mode;
        self
    }

    /// Overrides the power state programmed during initialization.
    pub fn power_mode(mut self, mode: PowerMode) -> Self {
        self.config.power_mode = mode;
        self
    }

    /// Sets the proximity alarm band as `(low, high)` bounds.
    pub fn threshold_band(mut self, low: u16, high: u16) -> Self {
        self.config.threshold_low = low;
        self.config.threshold_high = high;
        self
    }

    /// Finalizes the builder and returns the [`Config`].
    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rp_max: 0x13,
            rp_min: 0x34,
            sensor_frequency: 0x9A,
            amplitude: Amplitude::V4,
            response_time: ResponseTime::C384,
            clock_source: ClockSource::Crystal,
            oscillator_enabled: true,
            interrupt_mode: InterruptMode::WakeUp,
            power_mode: PowerMode::Active,
            threshold_high: 0x1450,
            threshold_low: 0x12C0,
        }
    }
}

/// Validation errors generated while verifying a [`Config`] or resolving a
/// sensor instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The low threshold is at or above the high threshold.
    ThresholdBandInverted,
    /// The `RP_MAX` code exceeds the `RP_MIN` code.
    RpWindowInverted,
    /// No line set is wired for the requested instance id.
    UnknownInstance(u8),
}
