//! Bit-banged transport driving the sensor's serial bus over four GPIO lines.
//!
//! There is no protocol engine behind this module: byte framing, bit order,
//! and the clock cadence all come from explicit line toggling, so the
//! sequencing here must not be reordered.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{
    Error as DigitalError, ErrorKind, InputPin, OutputPin, StatefulOutputPin,
};

use super::Ldc1000Interface;
use crate::registers::{BURST_START, READ_FLAG};

/// Microseconds between chip-select assertion and the address phase.
pub const SELECT_SETTLE_US: u32 = 2;

/// Default width of the pad between the address and data phases.
///
/// The chip needs a small setup window between the two transfers of a
/// register transaction. The exact width is board dependent; this default is
/// deliberately generous and can be tightened with
/// [`BitBang::set_phase_pad_ns`] once validated against the target hardware.
pub const DEFAULT_PHASE_PAD_NS: u32 = 250;

/// Errors produced by the bit-banged transport.
///
/// The bus itself carries no acknowledgement, parity, or framing check, so
/// the only failures observable here are faults reported by the line
/// bindings themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitBangError {
    /// A line driver or sampler reported a fault.
    Pin(ErrorKind),
}

impl BitBangError {
    fn pin<E: DigitalError>(err: E) -> Self {
        Self::Pin(err.kind())
    }
}

/// Bit-banged bus implementation owning the sensor's four logic lines.
///
/// `Mosi` carries data to the chip, `Cs` is the active-low select, `Sck` is
/// the clock (driven exclusively through [`StatefulOutputPin::toggle`]), and
/// `Miso` carries data back. `D` provides the busy-wait delays the chip's
/// setup margins require.
pub struct BitBang<Mosi, Cs, Sck, Miso, D> {
    mosi: Mosi,
    cs: Cs,
    sck: Sck,
    miso: Miso,
    delay: D,
    phase_pad_ns: u32,
}

impl<Mosi, Cs, Sck, Miso, D> BitBang<Mosi, Cs, Sck, Miso, D> {
    /// Consumes the transport and returns the owned lines and delay provider.
    pub fn release(self) -> (Mosi, Cs, Sck, Miso, D) {
        (self.mosi, self.cs, self.sck, self.miso, self.delay)
    }

    /// Overrides the pad inserted between the address and data phases.
    ///
    /// Clamped to at least one nanosecond; the chip does not tolerate
    /// back-to-back phases.
    pub fn set_phase_pad_ns(&mut self, ns: u32) {
        self.phase_pad_ns = ns.max(1);
    }
}

impl<Mosi, Cs, Sck, Miso, D> BitBang<Mosi, Cs, Sck, Miso, D>
where
    Mosi: OutputPin,
    Cs: OutputPin,
    Sck: StatefulOutputPin,
    Miso: InputPin,
    D: DelayNs,
{
    /// Takes ownership of the four lines and drives the outputs to their
    /// idle levels: data high, select high (deasserted), clock low.
    pub fn new(
        mut mosi: Mosi,
        mut cs: Cs,
        mut sck: Sck,
        miso: Miso,
        delay: D,
    ) -> Result<Self, BitBangError> {
        mosi.set_high().map_err(BitBangError::pin)?;
        cs.set_high().map_err(BitBangError::pin)?;
        sck.set_low().map_err(BitBangError::pin)?;

        Ok(Self {
            mosi,
            cs,
            sck,
            miso,
            delay,
            phase_pad_ns: DEFAULT_PHASE_PAD_NS,
        })
    }

    /// Exchanges one byte over the clock and data lines, MSB first.
    ///
    /// Each bit cell drives the outgoing level, toggles the clock, samples
    /// the incoming level, and toggles the clock back. The sample must sit
    /// between the two edges: the chip drives its output on the first edge
    /// and latches ours on fixed setup/hold margins around it.
    fn transfer(&mut self, byte: u8) -> Result<u8, BitBangError> {
        let mut out = byte;
        let mut acc = 0u8;

        for _ in 0..8 {
            if out & 0x80 != 0 {
                self.mosi.set_high().map_err(BitBangError::pin)?;
            } else {
                self.mosi.set_low().map_err(BitBangError::pin)?;
            }

            out <<= 1;
            acc <<= 1;

            self.sck.toggle().map_err(BitBangError::pin)?;

            if self.miso.is_high().map_err(BitBangError::pin)? {
                acc |= 1;
            }

            self.sck.toggle().map_err(BitBangError::pin)?;
        }

        Ok(acc)
    }

    /// Asserts chip-select and waits out the chip's settle window.
    fn select(&mut self) -> Result<(), BitBangError> {
        self.cs.set_low().map_err(BitBangError::pin)?;
        self.delay.delay_us(SELECT_SETTLE_US);
        Ok(())
    }

    fn deselect(&mut self) -> Result<(), BitBangError> {
        self.cs.set_high().map_err(BitBangError::pin)
    }

    fn phase_pad(&mut self) {
        self.delay.delay_ns(self.phase_pad_ns);
    }
}

impl<Mosi, Cs, Sck, Miso, D> Ldc1000Interface for BitBang<Mosi, Cs, Sck, Miso, D>
where
    Mosi: OutputPin,
    Cs: OutputPin,
    Sck: StatefulOutputPin,
    Miso: InputPin,
    D: DelayNs,
{
    type Error = BitBangError;

    fn read_register(&mut self, register: u8) -> core::result::Result<u8, Self::Error> {
        self.select()?;
        self.transfer(register | READ_FLAG)?;
        self.phase_pad();
        let value = self.transfer(0x00)?;
        self.deselect()?;
        Ok(value)
    }

    fn write_register(
        &mut self,
        register: u8,
        value: u8,
    ) -> core::result::Result<u8, Self::Error> {
        self.select()?;
        self.transfer(register & !READ_FLAG)?;
        self.phase_pad();
        let echoed = self.transfer(value)?;
        self.deselect()?;
        Ok(echoed)
    }

    fn read_burst(&mut self, buf: &mut [u8]) -> core::result::Result<(), Self::Error> {
        // Burst framing carries neither the settle window nor the
        // inter-phase pad; the chip streams as fast as the clock runs.
        self.cs.set_low().map_err(BitBangError::pin)?;
        self.transfer(BURST_START)?;

        for slot in buf.iter_mut() {
            *slot = self.transfer(0x00)?;
        }

        self.deselect()
    }
}

#[cfg(test)]
mod tests {
    use super::{BitBang, BitBangError, DEFAULT_PHASE_PAD_NS};
    use crate::interface::Ldc1000Interface;
    use core::cell::{Cell, RefCell};
    use core::convert::Infallible;
    use embedded_hal::delay::DelayNs;
    use embedded_hal::digital::{ErrorType, InputPin, OutputPin, StatefulOutputPin};
    use embedded_hal_mock::eh1::delay::NoopDelay;

    const LOG_CAPACITY: usize = 1024;

    const SETTLE_NS: u32 = super::SELECT_SETTLE_US * 1_000;

    /// One observable action on the shared bus.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Event {
        Select(bool),
        Data(bool),
        Clock(bool),
        Sample,
        Wait(u32),
    }

    struct EventLog {
        events: [Event; LOG_CAPACITY],
        len: usize,
    }

    /// Bits the fake chip will present on the input line, MSB first.
    struct BitQueue {
        bits: [bool; 256],
        head: usize,
        len: usize,
    }

    impl BitQueue {
        const fn new() -> Self {
            Self {
                bits: [false; 256],
                head: 0,
                len: 0,
            }
        }

        fn push_byte(&mut self, byte: u8) {
            for shift in (0..8).rev() {
                self.bits[self.head + self.len] = (byte >> shift) & 1 != 0;
                self.len += 1;
            }
        }

        fn pop(&mut self) -> bool {
            if self.len == 0 {
                return false;
            }

            let bit = self.bits[self.head];
            self.head += 1;
            self.len -= 1;
            bit
        }
    }

    /// Shared state behind the mock pins: an event log, the driven output
    /// level, and either a loopback wire or a scripted response stream.
    struct Bus {
        events: RefCell<EventLog>,
        mosi: Cell<bool>,
        rx: RefCell<BitQueue>,
        loopback: bool,
    }

    impl Bus {
        fn new() -> Self {
            Self {
                events: RefCell::new(EventLog {
                    events: [Event::Sample; LOG_CAPACITY],
                    len: 0,
                }),
                mosi: Cell::new(false),
                rx: RefCell::new(BitQueue::new()),
                loopback: false,
            }
        }

        fn loopback() -> Self {
            let mut bus = Self::new();
            bus.loopback = true;
            bus
        }

        fn push(&self, event: Event) {
            let mut log = self.events.borrow_mut();
            let index = log.len;
            assert!(index < LOG_CAPACITY, "event log overflow");
            log.events[index] = event;
            log.len += 1;
        }

        fn queue_response(&self, byte: u8) {
            self.rx.borrow_mut().push_byte(byte);
        }

        fn sample(&self) -> bool {
            if self.loopback {
                self.mosi.get()
            } else {
                self.rx.borrow_mut().pop()
            }
        }

        /// Reconstructs the bytes the driver transmitted while select was
        /// asserted, by reading the output level at the first clock edge of
        /// each bit cell.
        fn decode_sent(&self) -> ([u8; 16], usize) {
            let log = self.events.borrow();
            let mut bytes = [0u8; 16];
            let mut count = 0;
            let mut selected = false;
            let mut mosi = false;
            let mut acc = 0u8;
            let mut bit = 0u8;
            let mut mid_cell = false;

            for event in log.events[..log.len].iter() {
                match *event {
                    Event::Select(level) => selected = !level,
                    Event::Data(level) => mosi = level,
                    Event::Clock(_) if selected => {
                        if mid_cell {
                            mid_cell = false;
                        } else {
                            acc = (acc << 1) | mosi as u8;
                            bit += 1;
                            mid_cell = true;

                            if bit == 8 {
                                bytes[count] = acc;
                                count += 1;
                                acc = 0;
                                bit = 0;
                            }
                        }
                    }
                    _ => {}
                }
            }

            (bytes, count)
        }
    }

    struct MosiPin<'a> {
        bus: &'a Bus,
    }

    impl ErrorType for MosiPin<'_> {
        type Error = Infallible;
    }

    impl OutputPin for MosiPin<'_> {
        fn set_low(&mut self) -> Result<(), Infallible> {
            self.bus.mosi.set(false);
            self.bus.push(Event::Data(false));
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            self.bus.mosi.set(true);
            self.bus.push(Event::Data(true));
            Ok(())
        }
    }

    struct CsPin<'a> {
        bus: &'a Bus,
    }

    impl ErrorType for CsPin<'_> {
        type Error = Infallible;
    }

    impl OutputPin for CsPin<'_> {
        fn set_low(&mut self) -> Result<(), Infallible> {
            self.bus.push(Event::Select(false));
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            self.bus.push(Event::Select(true));
            Ok(())
        }
    }

    struct ClockPin<'a> {
        bus: &'a Bus,
        level: Cell<bool>,
    }

    impl ErrorType for ClockPin<'_> {
        type Error = Infallible;
    }

    impl OutputPin for ClockPin<'_> {
        fn set_low(&mut self) -> Result<(), Infallible> {
            self.level.set(false);
            self.bus.push(Event::Clock(false));
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            self.level.set(true);
            self.bus.push(Event::Clock(true));
            Ok(())
        }
    }

    impl StatefulOutputPin for ClockPin<'_> {
        fn is_set_high(&mut self) -> Result<bool, Infallible> {
            Ok(self.level.get())
        }

        fn is_set_low(&mut self) -> Result<bool, Infallible> {
            Ok(!self.level.get())
        }
    }

    struct MisoPin<'a> {
        bus: &'a Bus,
    }

    impl ErrorType for MisoPin<'_> {
        type Error = Infallible;
    }

    impl InputPin for MisoPin<'_> {
        fn is_high(&mut self) -> Result<bool, Infallible> {
            self.bus.push(Event::Sample);
            Ok(self.bus.sample())
        }

        fn is_low(&mut self) -> Result<bool, Infallible> {
            self.is_high().map(|level| !level)
        }
    }

    struct TickDelay<'a> {
        bus: &'a Bus,
    }

    impl DelayNs for TickDelay<'_> {
        fn delay_ns(&mut self, ns: u32) {
            self.bus.push(Event::Wait(ns));
        }

        fn delay_us(&mut self, us: u32) {
            self.bus.push(Event::Wait(us * 1_000));
        }
    }

    type MockTransport<'a> =
        BitBang<MosiPin<'a>, CsPin<'a>, ClockPin<'a>, MisoPin<'a>, TickDelay<'a>>;

    fn transport(bus: &Bus) -> MockTransport<'_> {
        BitBang::new(
            MosiPin { bus },
            CsPin { bus },
            ClockPin {
                bus,
                level: Cell::new(false),
            },
            MisoPin { bus },
            TickDelay { bus },
        )
        .unwrap()
    }

    // Events emitted while `BitBang::new` drives the idle levels.
    const CONSTRUCTION_EVENTS: usize = 3;

    #[test]
    fn new_drives_idle_levels() {
        let bus = Bus::new();
        let _transport = transport(&bus);

        let log = bus.events.borrow();
        assert_eq!(
            &log.events[..log.len],
            &[Event::Data(true), Event::Select(true), Event::Clock(false)]
        );
    }

    #[test]
    fn transfer_round_trips_bytes_over_loopback() {
        let bus = Bus::loopback();
        let mut transport = BitBang::new(
            MosiPin { bus: &bus },
            CsPin { bus: &bus },
            ClockPin {
                bus: &bus,
                level: Cell::new(false),
            },
            MisoPin { bus: &bus },
            NoopDelay::new(),
        )
        .unwrap();

        for byte in [0x00, 0x01, 0x3C, 0x5A, 0x80, 0xA5, 0xFF] {
            assert_eq!(transport.transfer(byte), Ok(byte));
        }
    }

    #[test]
    fn read_register_sets_read_flag_and_returns_data_phase() {
        let bus = Bus::new();
        bus.queue_response(0x00);
        bus.queue_response(0x5A);
        let mut transport = transport(&bus);

        let value = transport.read_register(0x22).unwrap();
        assert_eq!(value, 0x5A);

        let (sent, count) = bus.decode_sent();
        assert_eq!(&sent[..count], &[0xA2, 0x00]);
    }

    #[test]
    fn write_register_clears_read_flag_and_reports_echo() {
        let bus = Bus::new();
        bus.queue_response(0x00);
        bus.queue_response(0x77);
        let mut transport = transport(&bus);

        let echoed = transport.write_register(0x81, 0x13).unwrap();
        assert_eq!(echoed, 0x77);

        let (sent, count) = bus.decode_sent();
        assert_eq!(&sent[..count], &[0x01, 0x13]);
    }

    #[test]
    fn register_transaction_frames_select_settle_and_pad() {
        let bus = Bus::new();
        let mut transport = transport(&bus);
        transport.read_register(0x20).unwrap();

        let log = bus.events.borrow();
        let body = &log.events[CONSTRUCTION_EVENTS..log.len];

        assert_eq!(body[0], Event::Select(false));
        assert_eq!(body[1], Event::Wait(SETTLE_NS));
        assert_eq!(body[body.len() - 1], Event::Select(true));

        // Select never moves mid-transaction.
        let inner_selects = body[1..body.len() - 1]
            .iter()
            .filter(|event| matches!(event, Event::Select(_)))
            .count();
        assert_eq!(inner_selects, 0);

        // Two transfers of eight full clock cycles each.
        let edges = body
            .iter()
            .filter(|event| matches!(event, Event::Clock(_)))
            .count();
        assert_eq!(edges, 32);

        // Exactly one pad, between the address and data phases.
        let pads = body
            .iter()
            .filter(|event| matches!(event, Event::Wait(ns) if *ns == DEFAULT_PHASE_PAD_NS))
            .count();
        assert_eq!(pads, 1);
    }

    #[test]
    fn sampling_happens_between_the_two_clock_edges() {
        let bus = Bus::new();
        let mut transport = transport(&bus);
        transport.read_register(0x21).unwrap();

        let log = bus.events.borrow();
        let body = &log.events[CONSTRUCTION_EVENTS..log.len];

        let mut tags = [0u8; 64];
        let mut tag_len = 0;
        for event in body {
            match event {
                Event::Clock(_) => {
                    tags[tag_len] = b'C';
                    tag_len += 1;
                }
                Event::Sample => {
                    tags[tag_len] = b'S';
                    tag_len += 1;
                }
                _ => {}
            }
        }

        // Sixteen bit cells, each a sample bracketed by two edges.
        assert_eq!(tag_len, 48);
        for cell in tags[..tag_len].chunks(3) {
            assert_eq!(cell, b"CSC");
        }
    }

    #[test]
    fn burst_read_uses_start_opcode_and_skips_delays() {
        let bus = Bus::new();
        bus.queue_response(0x00);
        let capture = [
            0x80, 0x13, 0x34, 0x9A, 0x13, 0x00, 0x50, 0x14, 0xC0, 0x12, 0x02, 0x01,
        ];
        for byte in capture {
            bus.queue_response(byte);
        }
        let mut transport = transport(&bus);

        let mut buf = [0u8; 12];
        transport.read_burst(&mut buf).unwrap();
        assert_eq!(buf, capture);

        let (sent, count) = bus.decode_sent();
        assert_eq!(count, 13);
        assert_eq!(sent[0], 0x80);
        assert!(sent[1..13].iter().all(|byte| *byte == 0x00));

        let log = bus.events.borrow();
        let waits = log.events[..log.len]
            .iter()
            .filter(|event| matches!(event, Event::Wait(_)))
            .count();
        assert_eq!(waits, 0);
    }

    #[test]
    fn phase_pad_width_is_tunable() {
        let bus = Bus::new();
        let mut transport = transport(&bus);
        transport.set_phase_pad_ns(600);
        transport.read_register(0x01).unwrap();

        let log = bus.events.borrow();
        let pads = log.events[..log.len]
            .iter()
            .filter(|event| matches!(event, Event::Wait(600)))
            .count();
        assert_eq!(pads, 1);
    }

    #[test]
    fn pin_faults_surface_as_interface_errors() {
        struct BrokenPin;

        impl ErrorType for BrokenPin {
            type Error = embedded_hal::digital::ErrorKind;
        }

        impl OutputPin for BrokenPin {
            fn set_low(&mut self) -> Result<(), Self::Error> {
                Err(embedded_hal::digital::ErrorKind::Other)
            }

            fn set_high(&mut self) -> Result<(), Self::Error> {
                Err(embedded_hal::digital::ErrorKind::Other)
            }
        }

        let bus = Bus::new();
        let result = BitBang::new(
            BrokenPin,
            CsPin { bus: &bus },
            ClockPin {
                bus: &bus,
                level: Cell::new(false),
            },
            MisoPin { bus: &bus },
            TickDelay { bus: &bus },
        );

        assert!(matches!(
            result,
            Err(BitBangError::Pin(embedded_hal::digital::ErrorKind::Other))
        ));
    }
}
