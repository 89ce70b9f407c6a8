// Video session - Display, canvas and active scaler in one place
//
// The application draws into `canvas_mut()`, marks what it changed, and
// calls `update()` once per frame. Mode changes (window resize, fullscreen
// toggle) go through `reconfigure()`, which swaps scalers without losing
// what was drawn.

use crate::display::{Display, DisplayError, ModeRequest};
use crate::error::ScaleError;
use crate::geometry::{Rect, Resolution};
use crate::scaler::{choose_scaler, establish, ScaledVideo, ScalerInfo, ScalerKind};
use crate::surface::Surface;

/// Owns a display device, the virtual canvas and the active scaler
#[derive(Debug)]
pub struct VideoSession<D: Display> {
    display: D,
    canvas: Surface,
    video: ScaledVideo,
    mode: ModeRequest,
    /// The active scaler matches the display surface
    usable: bool,
}

impl<D: Display> VideoSession<D> {
    /// Establish the first display mode
    ///
    /// # Arguments
    /// * `display` - Device that will own the true surface
    /// * `canvas` - Virtual surface; its contents are kept
    /// * `request` - Initial display mode
    ///
    /// # Errors
    /// Anything `establish` reports
    pub fn new(mut display: D, canvas: Surface, request: ModeRequest) -> Result<Self, ScaleError> {
        let mut video = establish(&mut display, &canvas, &request)?;
        if video.is_in_place() {
            display.surface_mut().copy_from(&canvas);
        }
        video.mark_all_dirty();

        Ok(Self {
            display,
            canvas,
            video,
            mode: request,
            usable: true,
        })
    }

    /// Switch to a new display mode
    ///
    /// The canvas contents carry over and everything is marked dirty. On
    /// failure the previous mode is restored (if the display had already
    /// switched) and a scaler is rebuilt for whatever surface the display
    /// ends up with. If no scaler fits that surface the session becomes
    /// unusable: `update` fails until a later `reconfigure` succeeds.
    ///
    /// # Errors
    /// The error that prevented the new mode
    pub fn reconfigure(&mut self, request: ModeRequest) -> Result<(), ScaleError> {
        if self.in_place() {
            self.canvas.copy_from(self.display.surface());
        }

        match establish(&mut self.display, &self.canvas, &request) {
            Ok(video) => {
                if video.is_in_place() {
                    self.display.surface_mut().copy_from(&self.canvas);
                }
                self.video = video;
                self.video.mark_all_dirty();
                self.mode = request;
                self.usable = true;
                Ok(())
            }
            Err(err) => {
                log::warn!("cannot switch to {}: {}", request, err);
                if !matches!(
                    err,
                    ScaleError::Downscale { .. } | ScaleError::DisplayMode { .. }
                ) {
                    if let Err(restore) = self.restore_mode() {
                        log::error!("cannot restore display mode {}: {}", self.mode, restore);
                    }
                }
                Err(err)
            }
        }
    }

    /// Put the display back into the last good mode after a failed switch
    ///
    /// The scaler is rebuilt against the surface the display actually has
    /// afterwards, which may differ from the one it had before.
    ///
    /// # Errors
    /// `DisplayMode` if the device refused the old mode, or the selection
    /// error if no scaler fits the resulting surface. The session is only
    /// left unusable in the second case.
    fn restore_mode(&mut self) -> Result<(), ScaleError> {
        let restored = self
            .display
            .set_mode(&self.mode)
            .map_err(|source| ScaleError::DisplayMode {
                request: self.mode,
                source,
            });

        let target = self.display.surface_mut();
        target.fill(0);
        let scaler = choose_scaler(
            self.canvas.resolution(),
            self.canvas.format(),
            target.resolution(),
            target.format(),
            self.mode.flags.high_quality,
        );
        let mut video = match scaler {
            Ok(scaler) => ScaledVideo::new(scaler),
            Err(err) => {
                self.usable = false;
                return Err(err);
            }
        };

        if video.is_in_place() {
            target.copy_from(&self.canvas);
        }
        video.mark_all_dirty();
        if video.true_resolution() != self.video.true_resolution() {
            log::warn!("display came back as {}: {}", video.true_resolution(), video.describe());
        }
        self.video = video;
        self.usable = true;
        restored
    }

    /// The application draws straight into the display surface
    fn in_place(&self) -> bool {
        self.usable && self.video.is_in_place()
    }

    /// A scaler matching the display surface is active
    ///
    /// Only false after a failed `reconfigure` whose recovery found no
    /// scaler for the surface the display was left with.
    pub fn is_usable(&self) -> bool {
        self.usable
    }

    /// The surface the application draws into
    pub fn canvas(&self) -> &Surface {
        if self.in_place() {
            self.display.surface()
        } else {
            &self.canvas
        }
    }

    /// Mutable access to the surface the application draws into
    pub fn canvas_mut(&mut self) -> &mut Surface {
        if self.in_place() {
            self.display.surface_mut()
        } else {
            &mut self.canvas
        }
    }

    /// Add a virtual rectangle to the dirty region
    pub fn mark_dirty(&mut self, rect: Rect) {
        self.video.mark_dirty(rect);
    }

    /// Mark the whole canvas dirty
    pub fn mark_all_dirty(&mut self) {
        self.video.mark_all_dirty();
    }

    /// Something is waiting to be presented
    pub fn has_pending(&self) -> bool {
        self.video.has_pending()
    }

    /// Push the dirty region to the display, presenting it if `present` is set
    ///
    /// # Errors
    /// The device's presentation error, or `ModeLost` while the session is
    /// unusable
    pub fn update(&mut self, present: bool) -> Result<(), DisplayError> {
        if !self.usable {
            return Err(DisplayError::ModeLost);
        }
        self.video.update(&self.canvas, &mut self.display, present)
    }

    pub fn map_virtual_to_true(&self, x: i32, y: i32) -> (i32, i32) {
        self.video.map_virtual_to_true(x, y)
    }

    pub fn map_true_to_virtual(&self, x: i32, y: i32) -> (i32, i32) {
        self.video.map_true_to_virtual(x, y)
    }

    pub fn describe(&self) -> String {
        self.video.describe()
    }

    pub fn info(&self) -> ScalerInfo {
        self.video.info()
    }

    pub fn kind(&self) -> ScalerKind {
        self.video.kind()
    }

    pub fn virtual_resolution(&self) -> Resolution {
        self.video.virtual_resolution()
    }

    pub fn true_resolution(&self) -> Resolution {
        self.video.true_resolution()
    }

    /// The active scaler and its dirty region
    pub fn video(&self) -> &ScaledVideo {
        &self.video
    }

    /// The last mode established successfully
    pub fn mode(&self) -> &ModeRequest {
        &self.mode
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    /// Give back the display and the canvas with its current contents
    pub fn into_parts(mut self) -> (D, Surface) {
        if self.in_place() {
            self.canvas.copy_from(self.display.surface());
        }
        (self.display, self.canvas)
    }
}
