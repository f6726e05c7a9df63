//! ILI9341 command set and transaction encoding.
//!
//! Wire structure:
//! - Command phase: D/C low, CS low, one register byte, CS high
//! - Data phase: D/C high, CS low, parameter or pixel bytes, CS high
//! - Multi-byte values are big-endian (high byte first)

use crate::transport::Transport;
use crate::{Error, Result, Rgb565};
use tracing::trace;

/// Pixel words per chunk when streaming a repeated color.
pub const FILL_CHUNK_PIXELS: usize = 256;

/// ILI9341 command bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Command {
    SoftwareReset = 0x01,
    SleepIn = 0x10,
    SleepOut = 0x11,
    GammaSet = 0x26,
    DisplayOff = 0x28,
    DisplayOn = 0x29,
    /// Column address set.
    ColumnAddressSet = 0x2A,
    /// Page address set.
    PageAddressSet = 0x2B,
    /// Memory write.
    MemoryWrite = 0x2C,
    /// Memory access control (orientation).
    MemoryAccessControl = 0x36,
    /// Pixel format set.
    PixelFormatSet = 0x3A,
    FrameRateControl = 0xB1,
    DisplayFunctionControl = 0xB6,
    PowerControl1 = 0xC0,
    PowerControl2 = 0xC1,
    VcomControl1 = 0xC5,
    VcomControl2 = 0xC7,
    PowerControlA = 0xCB,
    PowerControlB = 0xCF,
    PositiveGamma = 0xE0,
    NegativeGamma = 0xE1,
    DriverTimingControlA = 0xE8,
    DriverTimingControlB = 0xEA,
    PowerOnSequence = 0xED,
    Enable3Gamma = 0xF2,
    PumpRatioControl = 0xF7,
}

impl From<Command> for u8 {
    fn from(cmd: Command) -> Self {
        cmd as u8
    }
}

/// Encodes command and data transactions onto a [`Transport`].
pub struct Protocol<T> {
    transport: T,
}

impl<T: Transport> Protocol<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Sends one register selector byte.
    pub fn send_command(&mut self, cmd: u8) -> Result<()> {
        trace!("cmd 0x{:02X}", cmd);
        self.transport.set_command_mode().map_err(Error::transport)?;
        self.framed(|t| t.transmit(&[cmd]))
    }

    /// Sends parameter or pixel bytes as one data transaction.
    pub fn send_data(&mut self, bytes: &[u8]) -> Result<()> {
        if bytes.is_empty() {
            return Ok(());
        }
        self.transport.set_data_mode().map_err(Error::transport)?;
        self.framed(|t| t.transmit(bytes))
    }

    /// Sends a 16-bit value, high byte first.
    pub fn send_data16(&mut self, word: u16) -> Result<()> {
        self.send_data(&word.to_be_bytes())
    }

    /// Streams `count` copies of `color` within a single chip-select assertion.
    pub fn send_repeated(&mut self, color: Rgb565, count: usize) -> Result<()> {
        if count == 0 {
            return Ok(());
        }
        let mut chunk = [0u8; FILL_CHUNK_PIXELS * 2];
        let pattern = color.to_be_bytes();
        for pair in chunk.chunks_exact_mut(2) {
            pair.copy_from_slice(&pattern);
        }

        self.transport.set_data_mode().map_err(Error::transport)?;
        self.framed(|t| {
            let mut remaining = count;
            while remaining > 0 {
                let pixels = remaining.min(FILL_CHUNK_PIXELS);
                t.transmit(&chunk[..pixels * 2])?;
                remaining -= pixels;
            }
            Ok(())
        })
    }

    /// Sends a command followed by its parameters, if any.
    pub fn command(&mut self, cmd: Command, args: &[u8]) -> Result<()> {
        self.send_command(cmd.into())?;
        self.send_data(args)
    }

    /// Runs `body` with chip select asserted. Select is released even when
    /// `body` fails.
    fn framed<F>(&mut self, body: F) -> Result<()>
    where
        F: FnOnce(&mut T) -> std::result::Result<(), T::Error>,
    {
        self.transport.assert_select().map_err(Error::transport)?;
        let sent = body(&mut self.transport);
        let released = self.transport.deassert_select();
        sent.map_err(Error::transport)?;
        released.map_err(Error::transport)
    }
}
