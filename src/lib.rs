// Scaled Video Library
// Presents a fixed-size virtual surface on a display of any size

// Public modules
pub mod config;
pub mod demo;
pub mod dirty;
pub mod display;
pub mod error;
pub mod geometry;
pub mod scaler;
pub mod session;
pub mod surface;

// Re-export main types for convenience
pub use config::{Config, VideoConfig};
pub use dirty::DirtyTracker;
pub use display::{Display, MemoryDisplay, ModeRequest, PresentationFlags, WindowDisplay};
pub use error::{DisplayError, ScaleError};
pub use geometry::{clip_point, clip_rect, union_rect, Rect, Resolution};
pub use scaler::{choose_scaler, establish, ScaledVideo, Scaler, ScalerInfo, ScalerKind};
pub use session::VideoSession;
pub use surface::{Color, Palette, PixelFormat, Surface};
