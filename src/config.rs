//! Display configuration types and builder

pub use crate::error::{BuilderError, MAX_COLUMNS, MAX_ROWS};
use crate::geometry::Size;

/// Panel dimensions
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dimensions {
    /// Width in pixels (columns)
    pub width: u16,
    /// Height in pixels (rows)
    pub height: u16,
}

impl Dimensions {
    /// Create new dimensions with validation
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::InvalidDimensions` if:
    /// - width is 0 or > MAX_COLUMNS
    /// - height is 0 or > MAX_ROWS
    pub fn new(width: u16, height: u16) -> Result<Self, BuilderError> {
        if width == 0 || width > MAX_COLUMNS || height == 0 || height > MAX_ROWS {
            return Err(BuilderError::InvalidDimensions { width, height });
        }
        Ok(Self { width, height })
    }

    /// Size of the drawing surface
    pub fn size(&self) -> Size {
        Size::new(self.width as i16, self.height as i16)
    }

    /// Bytes needed for an RGB565 framebuffer of this size
    pub fn buffer_size(&self) -> usize {
        self.width as usize * self.height as usize * 2
    }
}

/// Display configuration
///
/// Board-specific geometry of the panel behind the windowed backend.
/// Use `Builder` to create a Config.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Panel dimensions
    pub dimensions: Dimensions,
    /// Panel position inside controller RAM (columns, rows)
    pub ram_offset: (u16, u16),
    /// Memory data access control byte (orientation, RGB/BGR order)
    pub madctl: u8,
    /// Whether to enable display inversion on init
    pub inverted: bool,
}

/// Builder for constructing display configuration
///
/// # Example
///
/// ```rust
/// use gdc::{Builder, Dimensions};
///
/// let dims = match Dimensions::new(240, 240) {
///     Ok(dims) => dims,
///     Err(_) => return,
/// };
/// let config = match Builder::new().dimensions(dims).ram_offset(0, 80).build() {
///     Ok(config) => config,
///     Err(_) => return,
/// };
/// assert_eq!(config.ram_offset, (0, 80));
/// ```
#[must_use]
pub struct Builder {
    /// Panel dimensions (required)
    dimensions: Option<Dimensions>,
    /// Panel position inside controller RAM
    ram_offset: (u16, u16),
    /// Memory data access control byte
    madctl: u8,
    /// Display inversion on init
    inverted: bool,
}

impl Default for Builder {
    fn default() -> Self {
        Self {
            dimensions: None,
            ram_offset: (0, 0),
            // Default: top-to-bottom, left-to-right, RGB order
            madctl: 0x00,
            // Default: inverted (IPS panels)
            inverted: true,
        }
    }
}

impl Builder {
    /// Create a new Builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set panel dimensions (required)
    pub fn dimensions(mut self, dims: Dimensions) -> Self {
        self.dimensions = Some(dims);
        self
    }

    /// Set the panel position inside controller RAM
    ///
    /// Panels smaller than the controller RAM are often mounted off-origin;
    /// the offset is added to every window-set command.
    pub fn ram_offset(mut self, x: u16, y: u16) -> Self {
        self.ram_offset = (x, y);
        self
    }

    /// Set the memory data access control byte
    pub fn madctl(mut self, value: u8) -> Self {
        self.madctl = value;
        self
    }

    /// Set whether display inversion is enabled on init
    pub fn inverted(mut self, value: bool) -> Self {
        self.inverted = value;
        self
    }

    /// Build the configuration
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::MissingDimensions` if dimensions were not set
    pub fn build(self) -> Result<Config, BuilderError> {
        Ok(Config {
            dimensions: self.dimensions.ok_or(BuilderError::MissingDimensions)?,
            ram_offset: self.ram_offset,
            madctl: self.madctl,
            inverted: self.inverted,
        })
    }
}
