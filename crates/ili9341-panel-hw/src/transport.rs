//! Bus transport abstraction.
//!
//! The driver only needs five things from the bus: drive the D/C line to
//! command or data, assert and release chip select, and clock out bytes.
//! [`SpiTransport`] provides them over `embedded-hal` SPI and GPIO;
//! [`RecordingTransport`] captures the framed transactions instead.

use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;
use serde::Serialize;
use std::fmt::Debug;
use tracing::trace;

/// Byte-oriented, write-only bus with a mode line and a select line.
///
/// Every call blocks until the bytes are physically on the wire.
pub trait Transport {
    type Error: Debug;

    /// Drives D/C low: the next bytes select a controller register.
    fn set_command_mode(&mut self) -> Result<(), Self::Error>;

    /// Drives D/C high: the next bytes are register parameters or pixels.
    fn set_data_mode(&mut self) -> Result<(), Self::Error>;

    /// Pulls chip select low.
    fn assert_select(&mut self) -> Result<(), Self::Error>;

    /// Releases chip select once all bytes are out.
    fn deassert_select(&mut self) -> Result<(), Self::Error>;

    /// Clocks out `bytes`.
    fn transmit(&mut self, bytes: &[u8]) -> Result<(), Self::Error>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    type Error = T::Error;

    fn set_command_mode(&mut self) -> Result<(), Self::Error> {
        T::set_command_mode(self)
    }

    fn set_data_mode(&mut self) -> Result<(), Self::Error> {
        T::set_data_mode(self)
    }

    fn assert_select(&mut self) -> Result<(), Self::Error> {
        T::assert_select(self)
    }

    fn deassert_select(&mut self) -> Result<(), Self::Error> {
        T::deassert_select(self)
    }

    fn transmit(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        T::transmit(self, bytes)
    }
}

/// Errors from [`SpiTransport`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpiTransportError<SpiE, PinE> {
    Spi(SpiE),
    Pin(PinE),
}

/// 4-wire SPI transport: an `embedded-hal` bus plus D/C and CS pins.
pub struct SpiTransport<SPI, DC, CS> {
    spi: SPI,
    dc: DC,
    cs: CS,
}

impl<SPI, DC, CS> SpiTransport<SPI, DC, CS>
where
    SPI: SpiBus<u8>,
    DC: OutputPin,
    CS: OutputPin<Error = DC::Error>,
{
    pub fn new(spi: SPI, dc: DC, cs: CS) -> Self {
        Self { spi, dc, cs }
    }

    /// Returns the bus and pins.
    pub fn release(self) -> (SPI, DC, CS) {
        (self.spi, self.dc, self.cs)
    }
}

impl<SPI, DC, CS> Transport for SpiTransport<SPI, DC, CS>
where
    SPI: SpiBus<u8>,
    DC: OutputPin,
    CS: OutputPin<Error = DC::Error>,
{
    type Error = SpiTransportError<SPI::Error, DC::Error>;

    fn set_command_mode(&mut self) -> Result<(), Self::Error> {
        self.dc.set_low().map_err(SpiTransportError::Pin)
    }

    fn set_data_mode(&mut self) -> Result<(), Self::Error> {
        self.dc.set_high().map_err(SpiTransportError::Pin)
    }

    fn assert_select(&mut self) -> Result<(), Self::Error> {
        self.cs.set_low().map_err(SpiTransportError::Pin)
    }

    fn deassert_select(&mut self) -> Result<(), Self::Error> {
        // CS must not rise while the last byte is still shifting out.
        self.spi.flush().map_err(SpiTransportError::Spi)?;
        self.cs.set_high().map_err(SpiTransportError::Pin)
    }

    fn transmit(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        self.spi.write(bytes).map_err(SpiTransportError::Spi)
    }
}

/// One framed transaction as seen on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "bytes", rename_all = "lowercase")]
pub enum BusEvent {
    /// A register selector byte sent with D/C low.
    Command(u8),
    /// Every byte sent with D/C high during one chip-select assertion.
    Data(Vec<u8>),
}

/// Failure injected by [`RecordingTransport::fail_after`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InjectedFault;

/// Transport that records transactions instead of driving hardware.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    events: Vec<BusEvent>,
    data_mode: bool,
    selected: bool,
    pending: Vec<u8>,
    fail_after: Option<usize>,
    calls: usize,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every transport call after the first `calls` fail.
    pub fn fail_after(mut self, calls: usize) -> Self {
        self.fail_after = Some(calls);
        self
    }

    /// Returns the recorded transactions.
    pub fn events(&self) -> &[BusEvent] {
        &self.events
    }

    /// Drains the recorded transactions.
    pub fn take_events(&mut self) -> Vec<BusEvent> {
        std::mem::take(&mut self.events)
    }

    /// Forgets everything recorded so far.
    pub fn clear(&mut self) {
        self.events.clear();
        self.pending.clear();
    }

    /// Returns the command bytes in order, without their parameters.
    pub fn commands(&self) -> Vec<u8> {
        self.events
            .iter()
            .filter_map(|event| match event {
                BusEvent::Command(cmd) => Some(*cmd),
                BusEvent::Data(_) => None,
            })
            .collect()
    }

    /// Returns true if chip select is currently asserted.
    pub fn is_selected(&self) -> bool {
        self.selected
    }

    fn step(&mut self) -> Result<(), InjectedFault> {
        self.calls += 1;
        match self.fail_after {
            Some(limit) if self.calls > limit => Err(InjectedFault),
            _ => Ok(()),
        }
    }
}

impl Transport for RecordingTransport {
    type Error = InjectedFault;

    fn set_command_mode(&mut self) -> Result<(), Self::Error> {
        self.step()?;
        self.data_mode = false;
        Ok(())
    }

    fn set_data_mode(&mut self) -> Result<(), Self::Error> {
        self.step()?;
        self.data_mode = true;
        Ok(())
    }

    fn assert_select(&mut self) -> Result<(), Self::Error> {
        self.step()?;
        self.selected = true;
        self.pending.clear();
        Ok(())
    }

    fn deassert_select(&mut self) -> Result<(), Self::Error> {
        self.step()?;
        self.selected = false;
        if !self.pending.is_empty() {
            let bytes = std::mem::take(&mut self.pending);
            trace!("data transaction: {} bytes", bytes.len());
            self.events.push(BusEvent::Data(bytes));
        }
        Ok(())
    }

    fn transmit(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        self.step()?;
        if !self.selected {
            // The controller ignores bytes clocked while deselected.
            return Ok(());
        }
        if self.data_mode {
            self.pending.extend_from_slice(bytes);
        } else {
            self.events
                .extend(bytes.iter().map(|&cmd| BusEvent::Command(cmd)));
        }
        Ok(())
    }
}
