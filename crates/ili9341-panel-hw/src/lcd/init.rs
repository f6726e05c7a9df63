//! Power-up register sequence.
//!
//! Order is fixed by the controller: reset, display off, vendor power and
//! timing registers, pixel format, gamma tables, sleep out. The driver then
//! applies the orientation and turns the display on.

use super::protocol::Command;

/// Wait after power-on before the first command.
pub const POWER_ON_SETTLE_MS: u32 = 10;

/// Wait after display on.
pub const DISPLAY_ON_SETTLE_MS: u32 = 10;

/// One command with its parameters and the wait that must follow it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InitStep {
    pub command: Command,
    pub params: &'static [u8],
    pub delay_ms: u32,
}

const fn step(command: Command, params: &'static [u8]) -> InitStep {
    InitStep {
        command,
        params,
        delay_ms: 0,
    }
}

const fn step_then_wait(command: Command, params: &'static [u8], delay_ms: u32) -> InitStep {
    InitStep {
        command,
        params,
        delay_ms,
    }
}

/// Everything up to and including sleep out.
pub static INIT_SEQUENCE: &[InitStep] = &[
    step_then_wait(Command::SoftwareReset, &[], 120),
    step(Command::DisplayOff, &[]),
    step(Command::PowerControlA, &[0x39, 0x2C, 0x00, 0x34, 0x02]),
    step(Command::PowerControlB, &[0x00, 0xC1, 0x30]),
    step(Command::DriverTimingControlA, &[0x85, 0x00, 0x78]),
    step(Command::DriverTimingControlB, &[0x00, 0x00]),
    step(Command::PowerOnSequence, &[0x64, 0x03, 0x12, 0x81]),
    step(Command::PumpRatioControl, &[0x20]),
    // VRH[5:0]
    step(Command::PowerControl1, &[0x23]),
    // SAP[2:0], BT[3:0]
    step(Command::PowerControl2, &[0x10]),
    step(Command::VcomControl1, &[0x3E, 0x28]),
    step(Command::VcomControl2, &[0x86]),
    // 16 bits/pixel
    step(Command::PixelFormatSet, &[0x55]),
    step(Command::FrameRateControl, &[0x00, 0x18]),
    step(Command::DisplayFunctionControl, &[0x08, 0x82, 0x27]),
    step(Command::Enable3Gamma, &[0x00]),
    step(Command::GammaSet, &[0x01]),
    step(
        Command::PositiveGamma,
        &[
            0x0F, 0x31, 0x2B, 0x0C, 0x0E, 0x08, 0x4E, 0xF1, 0x37, 0x07, 0x10, 0x03, 0x0E, 0x09,
            0x00,
        ],
    ),
    step(
        Command::NegativeGamma,
        &[
            0x00, 0x0E, 0x14, 0x03, 0x11, 0x07, 0x31, 0xC1, 0x48, 0x08, 0x0F, 0x0C, 0x31, 0x36,
            0x0F,
        ],
    ),
    step_then_wait(Command::SleepOut, &[], 120),
];
