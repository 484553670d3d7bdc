//! Display host and device context factory
//!
//! [`Display`] owns the interface to the physical panel. It runs the
//! controller init sequence and hands out the panel's single windowed device
//! context. While the context is acquired the interface lives inside it, so
//! the host refuses both a second acquisition and its own controller
//! commands until the context is released.

use embedded_hal::delay::DelayNs;
use log::{debug, warn};

use crate::command::{
    COLMOD, COLMOD_RGB565, DISPOFF, DISPON, INVOFF, INVON, MADCTL, NORON, SLPIN, SLPOUT, SWRESET,
};
use crate::config::{Config, Dimensions};
use crate::error::Error;
use crate::gdc::Gdc;
use crate::interface::DisplayInterface;
use crate::wnd565::Wnd565;

type DisplayResult<I> = core::result::Result<(), Error<<I as DisplayInterface>::Error>>;

/// Host of a streaming display panel
pub struct Display<I>
where
    I: DisplayInterface,
{
    /// Hardware interface, `None` while the device context is acquired
    interface: Option<I>,
    /// Display configuration
    config: Config,
}

impl<I> Display<I>
where
    I: DisplayInterface,
{
    /// Create a new Display instance
    pub fn new(interface: I, config: Config) -> Self {
        Self {
            interface: Some(interface),
            config,
        }
    }

    /// Perform hardware reset, software reset, and initialization
    ///
    /// # Errors
    ///
    /// Returns [`Error::Busy`] while the device context is acquired.
    pub fn reset<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        self.interface_mut()?.reset(delay);
        self.send_command(SWRESET)?;
        delay.delay_ms(120);
        self.init(delay)
    }

    /// Initialize the controller with configuration
    fn init<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        // Wake up
        self.send_command(SLPOUT)?;
        delay.delay_ms(120);

        // 16 bits per pixel
        self.send_command(COLMOD)?;
        self.send_data(&[COLMOD_RGB565])?;

        // Orientation and color order
        self.send_command(MADCTL)?;
        self.send_data(&[self.config.madctl])?;

        self.send_command(if self.config.inverted { INVON } else { INVOFF })?;
        self.send_command(NORON)?;
        self.send_command(DISPON)?;

        debug!(
            "Display initialized ({}x{})",
            self.config.dimensions.width, self.config.dimensions.height
        );
        Ok(())
    }

    /// Turn the panel off and enter sleep mode
    ///
    /// Use [`wake`](Self::wake) or [`reset`](Self::reset) to resume.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Busy`] while the device context is acquired.
    pub fn sleep<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        self.send_command(DISPOFF)?;
        self.send_command(SLPIN)?;
        delay.delay_ms(5);
        debug!("Display asleep");
        Ok(())
    }

    /// Leave sleep mode and turn the panel back on
    ///
    /// # Errors
    ///
    /// Returns [`Error::Busy`] while the device context is acquired.
    pub fn wake<D: DelayNs>(&mut self, delay: &mut D) -> DisplayResult<I> {
        self.send_command(SLPOUT)?;
        delay.delay_ms(120);
        self.send_command(DISPON)?;
        debug!("Display awake");
        Ok(())
    }

    /// Acquire the panel's device context
    ///
    /// The context takes the interface until it is handed back with
    /// [`release_gdc`](Self::release_gdc).
    ///
    /// # Errors
    ///
    /// Returns [`Error::Busy`] if the context is already acquired.
    pub fn acquire_gdc(&mut self) -> Result<Wnd565<I>, Error<I::Error>> {
        let Some(interface) = self.interface.take() else {
            warn!("Display context already acquired");
            return Err(Error::Busy);
        };

        let (x, y) = self.config.ram_offset;
        debug!("Display context acquired");
        Ok(Wnd565::new(interface, self.config.dimensions.size()).with_ram_offset(x, y))
    }

    /// Release a device context obtained from [`acquire_gdc`](Self::acquire_gdc)
    ///
    /// Waits for pending operations, releases the context and takes the
    /// interface back.
    pub fn release_gdc(&mut self, mut gdc: Wnd565<I>) {
        gdc.release();
        self.interface = Some(gdc.into_interface());
        debug!("Display context returned");
    }

    /// Returns true while the device context is acquired
    pub fn is_acquired(&self) -> bool {
        self.interface.is_none()
    }

    fn interface_mut(&mut self) -> Result<&mut I, Error<I::Error>> {
        self.interface.as_mut().ok_or(Error::Busy)
    }

    fn send_command(&mut self, cmd: u8) -> DisplayResult<I> {
        self.interface_mut()?
            .send_command(cmd)
            .map_err(Error::Interface)
    }

    fn send_data(&mut self, data: &[u8]) -> DisplayResult<I> {
        self.interface_mut()?
            .send_data(data)
            .map_err(Error::Interface)
    }

    /// Get display dimensions
    pub fn dimensions(&self) -> &Dimensions {
        &self.config.dimensions
    }

    /// Get the display configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}
