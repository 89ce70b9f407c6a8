// Configuration management
//
// Handles video settings and their persistence as TOML.

use crate::display::{ModeRequest, PresentationFlags};
use crate::geometry::Resolution;
use crate::surface::PixelFormat;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;
use std::time::Duration;

/// Default configuration file path
pub const CONFIG_FILE: &str = "scaled_video.toml";

/// Top-level configuration file
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Video settings
    pub video: VideoConfig,
}

/// Video configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VideoConfig {
    /// Width of the surface the application draws on
    pub virtual_width: u32,

    /// Height of the surface the application draws on
    pub virtual_height: u32,

    /// Initial window width
    pub window_width: u32,

    /// Initial window height
    pub window_height: u32,

    /// Bits per pixel of the display surface (0 = device default)
    pub bit_depth: u8,

    /// Start in fullscreen
    pub fullscreen: bool,

    /// Let the user resize the window
    pub resizable: bool,

    /// Accept the device's preferred depth if `bit_depth` is unavailable
    pub any_format: bool,

    /// Blend pixel edges for non-integer scale ratios
    pub high_quality: bool,

    /// Target FPS
    pub target_fps: u32,
}

impl Default for VideoConfig {
    fn default() -> Self {
        VideoConfig {
            virtual_width: 320,
            virtual_height: 240,
            window_width: 960,
            window_height: 720,
            bit_depth: 0,
            fullscreen: false,
            resizable: true,
            any_format: true,
            high_quality: false,
            target_fps: 60,
        }
    }
}

impl VideoConfig {
    /// Resolution of the virtual surface
    pub fn virtual_resolution(&self) -> Resolution {
        Resolution::new(self.virtual_width, self.virtual_height)
    }

    /// Pixel format for the virtual surface: the display's depth, or 32-bit
    /// color when the device chooses
    pub fn canvas_format(&self) -> PixelFormat {
        match self.bit_depth {
            0 => PixelFormat::XRGB8888,
            depth => PixelFormat::for_depth(depth).unwrap_or(PixelFormat::XRGB8888),
        }
    }

    /// Presentation flags from the boolean settings
    pub fn flags(&self) -> PresentationFlags {
        PresentationFlags {
            fullscreen: self.fullscreen,
            resizable: self.resizable,
            any_format: self.any_format,
            high_quality: self.high_quality,
        }
    }

    /// The initial display mode
    pub fn to_mode_request(&self) -> ModeRequest {
        ModeRequest::new(self.window_width, self.window_height, self.bit_depth)
            .with_flags(self.flags())
    }

    /// Time budget for one frame at the target FPS
    pub fn frame_duration(&self) -> Duration {
        Duration::from_micros(1_000_000 / self.target_fps.max(1) as u64)
    }
}

impl Config {
    /// Load configuration from file or create default
    ///
    /// If the configuration file doesn't exist or can't be parsed, the
    /// default configuration is returned and written to the file.
    ///
    /// # Arguments
    /// * `path` - Configuration file path
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_else(|err| {
            log::debug!("using default configuration ({}: {})", path.display(), err);
            let config = Self::default();
            // Try to save the default config, but don't fail if we can't
            let _ = config.save(path);
            config
        })
    }

    /// Load configuration from file
    ///
    /// # Returns
    /// Result containing the configuration or an error
    pub fn load(path: &Path) -> Result<Self, io::Error> {
        let contents = fs::read_to_string(path)?;
        toml::from_str(&contents).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Save configuration to file
    ///
    /// # Returns
    /// Result indicating success or error
    pub fn save(&self, path: &Path) -> Result<(), io::Error> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(path, contents)
    }
}
