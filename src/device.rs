//! High-level LDC1000 device driver implementation.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::interface::bitbang::{BitBang, BitBangError};
use crate::interface::Ldc1000Interface;
use crate::registers::{
    split_threshold,
    ClockConfig,
    InterruptConfig,
    LdcConfig,
    PowerConfig,
    Status,
    CONFIG_BURST_LEN,
    EXPECTED_DEVICE_ID,
    REG_CLK_CONFIG,
    REG_DEVICE_ID,
    REG_FREQ_LSB,
    REG_FREQ_MID,
    REG_FREQ_MSB,
    REG_INT_CONFIG,
    REG_LDC_CONFIG,
    REG_PROX_LSB,
    REG_PROX_MSB,
    REG_PWR_CONFIG,
    REG_RP_MAX,
    REG_RP_MIN,
    REG_SENSOR_FREQ,
    REG_STATUS,
    REG_THRES_HI_LSB,
    REG_THRES_HI_MSB,
    REG_THRES_LO_LSB,
    REG_THRES_LO_MSB,
};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin, StatefulOutputPin};

/// Capability interface shared by the real driver and the no-op stand-in,
/// letting the application select a backend at build time without changing
/// call sites.
pub trait ProximitySensor {
    /// Error type produced by the backend.
    type Error;

    /// Refreshes the cached proximity and frequency readings.
    fn update(&mut self) -> core::result::Result<(), Self::Error>;

    /// Returns the most recently cached proximity value.
    fn proximity(&self) -> u16;

    /// Returns the most recently cached frequency counter value.
    fn frequency(&self) -> u32;
}

/// High-level synchronous driver for the LDC1000 proximity sensor.
pub struct Ldc1000<IFACE> {
    interface: IFACE,
    config: Config,
    capture: [u8; CONFIG_BURST_LEN],
    proximity: u16,
    frequency: u32,
}

/// Decoded view of the `STATUS` register with explicit flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusSnapshot {
    /// STATUS[7] OSC_DEAD.
    pub osc_dead: bool,
    /// STATUS[6] DRDYB, inverted here so `true` means a conversion is ready.
    pub data_ready: bool,
    /// STATUS[5] WAKE_UP.
    pub wake_up: bool,
    /// STATUS[4] COMPARATOR.
    pub comparator: bool,
}

impl StatusSnapshot {
    /// Builds a snapshot from the raw STATUS bitfield.
    pub fn from_register(status: Status) -> Self {
        Self {
            osc_dead: status.osc_dead(),
            data_ready: !status.data_ready_b(),
            wake_up: status.wake_up(),
            comparator: status.comparator(),
        }
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for StatusSnapshot {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "StatusSnapshot {{ OSC_DEAD: {}, DATA_READY: {}, WAKE_UP: {}, COMPARATOR: {} }}",
            self.osc_dead,
            self.data_ready,
            self.wake_up,
            self.comparator
        );
    }
}

impl<IFACE> Ldc1000<IFACE> {
    // ==================================================================
    // == Driver Construction & Ownership ===============================
    // ==================================================================
    /// Creates a new driver instance from the provided bus interface.
    ///
    /// The device is not usable until [`init`](Self::init) succeeds; the
    /// cached readings start at zero.
    pub fn new(interface: IFACE, config: Config) -> Self {
        Self {
            interface,
            config,
            capture: [0; CONFIG_BURST_LEN],
            proximity: 0,
            frequency: 0,
        }
    }

    /// Consumes the driver and returns the owned interface.
    pub fn release(self) -> (IFACE, Config) {
        (self.interface, self.config)
    }

    /// Provides mutable access to the underlying interface.
    pub fn interface_mut(&mut self) -> &mut IFACE {
        &mut self.interface
    }
}

impl<Mosi, Cs, Sck, Miso, D> Ldc1000<BitBang<Mosi, Cs, Sck, Miso, D>>
where
    Mosi: OutputPin,
    Cs: OutputPin,
    Sck: StatefulOutputPin,
    Miso: InputPin,
    D: DelayNs,
{
    // ==================================================================
    // == Bit-Bang Convenience Constructors =============================
    // ==================================================================
    /// Convenience constructor binding the four lines to a bit-banged
    /// transport. Fails if an output line cannot be driven to its idle
    /// level.
    pub fn new_bitbang(
        mosi: Mosi,
        cs: Cs,
        sck: Sck,
        miso: Miso,
        delay: D,
        config: Config,
    ) -> Result<Self, BitBangError> {
        Ok(Self::new(BitBang::new(mosi, cs, sck, miso, delay)?, config))
    }

    /// Releases the driver, returning the lines, delay provider, and
    /// configuration.
    pub fn release_bitbang(self) -> ((Mosi, Cs, Sck, Miso, D), Config) {
        let (iface, config) = self.release();
        (iface.release(), config)
    }
}

impl<IFACE, CommE> Ldc1000<IFACE>
where
    IFACE: Ldc1000Interface<Error = CommE>,
{
    // ==================================================================
    // == Initialization & Configuration ================================
    // ==================================================================
    /// Programs the operating profile into the chip and verifies it answers.
    ///
    /// The register write sequence is strictly ordered: response window,
    /// oscillation divisor, LDC mode, clock source, interrupt behaviour,
    /// power state, then the four threshold bytes. A burst capture of the
    /// configuration block follows; its first byte must read back as the
    /// device id or initialization fails with [`Error::NotPresent`].
    pub fn init(&mut self) -> Result<(), CommE> {
        self.config.validate().map_err(|_| Error::InvalidConfig)?;

        self.apply_config(self.config)?;

        self
            .interface
            .read_burst(&mut self.capture)
            .map_err(Error::from)?;

        if self.capture[0] != EXPECTED_DEVICE_ID {
            return Err(Error::NotPresent);
        }

        Ok(())
    }

    /// Applies a new configuration to the device.
    pub fn configure(&mut self, config: Config) -> Result<(), CommE> {
        config.validate().map_err(|_| Error::InvalidConfig)?;

        self.apply_config(config)?;
        self.config = config;
        Ok(())
    }

    /// Returns a shared reference to the active configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns a mutable reference to the active configuration.
    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    // ==================================================================
    // == Identification & Status =======================================
    // ==================================================================
    /// Reads the identification register.
    pub fn device_id(&mut self) -> Result<u8, CommE> {
        self.read(REG_DEVICE_ID)
    }

    /// Returns a snapshot of the `STATUS` register.
    pub fn read_status(&mut self) -> Result<StatusSnapshot, CommE> {
        let raw = self.read(REG_STATUS)?;
        Ok(StatusSnapshot::from_register(Status::from(raw)))
    }

    /// Returns the configuration block captured during initialization.
    pub fn configuration_readback(&self) -> &[u8; CONFIG_BURST_LEN] {
        &self.capture
    }

    // ==================================================================
    // == Sampling ======================================================
    // ==================================================================
    /// Refreshes the cached readings with five sequential register reads:
    /// proximity MSB and LSB, then the frequency counter MSB, MID, and LSB.
    pub fn update(&mut self) -> Result<(), CommE> {
        let prox_msb = self.read(REG_PROX_MSB)?;
        let prox_lsb = self.read(REG_PROX_LSB)?;
        self.proximity = u16::from_be_bytes([prox_msb, prox_lsb]);

        let freq_msb = self.read(REG_FREQ_MSB)?;
        let freq_mid = self.read(REG_FREQ_MID)?;
        let freq_lsb = self.read(REG_FREQ_LSB)?;
        self.frequency = u32::from_be_bytes([0, freq_msb, freq_mid, freq_lsb]);

        Ok(())
    }

    /// Most recently cached proximity value; zero before the first refresh.
    pub fn proximity(&self) -> u16 {
        self.proximity
    }

    /// Most recently cached frequency counter value; zero before the first
    /// refresh.
    pub fn frequency(&self) -> u32 {
        self.frequency
    }

    // ==================================================================
    // == Internal Helpers ==============================================
    // ==================================================================
    fn read(&mut self, register: u8) -> Result<u8, CommE> {
        self.interface.read_register(register).map_err(Error::from)
    }

    fn write(&mut self, register: u8, value: u8) -> Result<(), CommE> {
        // The data-phase echo carries no acknowledgement; drop it.
        self
            .interface
            .write_register(register, value)
            .map_err(Error::from)?;
        Ok(())
    }

    fn apply_config(&mut self, config: Config) -> Result<(), CommE> {
        let ldc = LdcConfig::new()
            .with_response_time(config.response_time)
            .with_amplitude(config.amplitude);
        let clock = ClockConfig::new()
            .with_source(config.clock_source)
            .with_oscillator_disabled(!config.oscillator_enabled);
        let interrupt = InterruptConfig::new().with_mode(config.interrupt_mode);
        let power = PowerConfig::new().with_mode(config.power_mode);
        let (hi_lsb, hi_msb) = split_threshold(config.threshold_high);
        let (lo_lsb, lo_msb) = split_threshold(config.threshold_low);

        self.write(REG_RP_MAX, config.rp_max)?;
        self.write(REG_RP_MIN, config.rp_min)?;
        self.write(REG_SENSOR_FREQ, config.sensor_frequency)?;
        self.write(REG_LDC_CONFIG, ldc.into())?;
        self.write(REG_CLK_CONFIG, clock.into())?;
        self.write(REG_INT_CONFIG, interrupt.into())?;
        self.write(REG_PWR_CONFIG, power.into())?;
        self.write(REG_THRES_HI_LSB, hi_lsb)?;
        self.write(REG_THRES_HI_MSB, hi_msb)?;
        self.write(REG_THRES_LO_LSB, lo_lsb)?;
        self.write(REG_THRES_LO_MSB, lo_msb)?;

        Ok(())
    }
}

impl<IFACE, CommE> ProximitySensor for Ldc1000<IFACE>
where
    IFACE: Ldc1000Interface<Error = CommE>,
{
    type Error = Error<CommE>;

    fn update(&mut self) -> core::result::Result<(), Self::Error> {
        Ldc1000::update(self)
    }

    fn proximity(&self) -> u16 {
        self.proximity
    }

    fn frequency(&self) -> u32 {
        self.frequency
    }
}
