//! ILI9341 driver instance.

use crate::orientation::{Orientation, PanelState};
use crate::transport::Transport;
use crate::{Error, Result};
use embedded_hal::delay::DelayNs;
use std::sync::Mutex;
use tracing::{debug, info};

use super::init::{DISPLAY_ON_SETTLE_MS, INIT_SEQUENCE, POWER_ON_SETTLE_MS};
use super::protocol::{Command, Protocol};

/// What drawing primitives do with geometry that leaves the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClipPolicy {
    /// Off-panel pixels are dropped silently.
    #[default]
    Clamp,
    /// Primitives that do not fit return [`Error::OutOfBounds`] before
    /// touching the bus.
    Strict,
}

/// LCD controller driver.
///
/// Owns the transport and the panel state (orientation and logical size).
/// Drawing primitives live in the `raster` and `font` modules.
pub struct Ili9341<T> {
    pub(super) protocol: Protocol<T>,
    pub(super) state: PanelState,
    pub(super) clip: ClipPolicy,
}

impl<T: Transport> Ili9341<T> {
    /// Wraps a transport. Nothing is sent until [`Ili9341::init`].
    pub fn new(transport: T) -> Self {
        Self {
            protocol: Protocol::new(transport),
            state: PanelState::default(),
            clip: ClipPolicy::default(),
        }
    }

    /// Sets the clip policy.
    pub fn with_clip_policy(mut self, clip: ClipPolicy) -> Self {
        self.clip = clip;
        self
    }

    /// Sets the orientation [`Ili9341::init`] applies.
    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.state = PanelState::new(orientation);
        self
    }

    /// Runs the power-up register sequence.
    ///
    /// The settle delays are mandatory; commands sent early leave the
    /// controller in an undefined state.
    pub fn init<D: DelayNs>(&mut self, delay: &mut D) -> Result<()> {
        delay.delay_ms(POWER_ON_SETTLE_MS);

        for step in INIT_SEQUENCE {
            self.protocol.command(step.command, step.params)?;
            if step.delay_ms > 0 {
                debug!("{:?}: waiting {}ms", step.command, step.delay_ms);
                delay.delay_ms(step.delay_ms);
            }
        }

        self.set_orientation(self.state.orientation())?;

        self.protocol.command(Command::DisplayOn, &[])?;
        delay.delay_ms(DISPLAY_ON_SETTLE_MS);

        info!(
            "ILI9341 initialized ({}x{}, {})",
            self.state.width(),
            self.state.height(),
            self.state.orientation()
        );
        Ok(())
    }

    /// Sets the display orientation.
    ///
    /// Logical width/height change before the register write, so every
    /// primitive after this call sees the new bounds.
    pub fn set_orientation(&mut self, orientation: Orientation) -> Result<()> {
        let madctl = self.state.apply(orientation);
        self.protocol
            .command(Command::MemoryAccessControl, &[madctl])?;
        debug!(
            "Set orientation to {} (MADCTL 0x{:02X}, {}x{})",
            orientation,
            madctl,
            self.state.width(),
            self.state.height()
        );
        Ok(())
    }

    /// Sets the orientation from its raw value; unknown values mean portrait.
    pub fn set_orientation_raw(&mut self, value: u8) -> Result<()> {
        self.set_orientation(Orientation::from_raw(value))
    }

    /// Gets the current orientation.
    pub fn orientation(&self) -> Orientation {
        self.state.orientation()
    }

    /// Logical width under the current orientation.
    pub fn width(&self) -> u16 {
        self.state.width()
    }

    /// Logical height under the current orientation.
    pub fn height(&self) -> u16 {
        self.state.height()
    }

    pub fn panel_state(&self) -> &PanelState {
        &self.state
    }

    pub fn clip_policy(&self) -> ClipPolicy {
        self.clip
    }

    pub fn set_clip_policy(&mut self, clip: ClipPolicy) {
        self.clip = clip;
    }

    pub fn transport(&self) -> &T {
        self.protocol.transport()
    }

    pub fn transport_mut(&mut self) -> &mut T {
        self.protocol.transport_mut()
    }

    /// Gives the transport back.
    pub fn release(self) -> T {
        self.protocol.into_transport()
    }

    /// Raw protocol access for commands the driver does not wrap.
    pub fn protocol_mut(&mut self) -> &mut Protocol<T> {
        &mut self.protocol
    }

    pub(super) fn is_strict(&self) -> bool {
        self.clip == ClipPolicy::Strict
    }
}

/// Driver shared between threads.
///
/// Every primitive issues several back-to-back transactions; interleaving
/// another caller's transactions would corrupt the address window. `with`
/// holds the lock for the whole closure, which also keeps orientation from
/// changing under an in-flight bound check.
pub struct SharedIli9341<T> {
    inner: Mutex<Ili9341<T>>,
}

impl<T: Transport> SharedIli9341<T> {
    pub fn new(driver: Ili9341<T>) -> Self {
        Self {
            inner: Mutex::new(driver),
        }
    }

    /// Runs `f` with exclusive access to the driver.
    pub fn with<R, F>(&self, f: F) -> Result<R>
    where
        F: FnOnce(&mut Ili9341<T>) -> Result<R>,
    {
        let mut driver = self.inner.lock().map_err(|_| Error::LockPoisoned)?;
        f(&mut *driver)
    }

    /// Gets the current orientation.
    pub fn orientation(&self) -> Result<Orientation> {
        self.with(|d| Ok(d.orientation()))
    }

    pub fn into_inner(self) -> Result<Ili9341<T>> {
        self.inner.into_inner().map_err(|_| Error::LockPoisoned)
    }
}
