//! Bus interface abstraction for the LDC1000 driver.

pub mod bitbang;

/// Abstraction over the low-level bus access required by the driver.
pub trait Ldc1000Interface {
    /// Error type produced by the concrete bus implementation.
    type Error;

    /// Reads a single register.
    fn read_register(&mut self, register: u8) -> core::result::Result<u8, Self::Error>;

    /// Writes a single register.
    ///
    /// The bus clocks a byte back during the data phase; it carries no
    /// acknowledgement and callers normally discard it.
    fn write_register(&mut self, register: u8, value: u8)
        -> core::result::Result<u8, Self::Error>;

    /// Burst-reads consecutive registers starting at `DEVICE_ID` into the
    /// provided buffer.
    fn read_burst(&mut self, buf: &mut [u8]) -> core::result::Result<(), Self::Error>;
}
