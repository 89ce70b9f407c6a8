// Window module - A display device backed by a real window
//
// This module provides window creation, mode switching and presentation
// using the winit and pixels crates. The pixels buffer always matches the
// true surface 1:1; the scaler does all the scaling.

use super::{Display, DisplayError, ModeRequest};
use crate::config::VideoConfig;
use crate::demo::Demo;
use crate::geometry::{Rect, Resolution};
use crate::session::VideoSession;
use crate::surface::{PixelFormat, Surface};
use pixels::{Pixels, SurfaceTexture};
use std::fmt;
use std::sync::Arc;
use std::time::Instant;
use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::{ElementState, KeyEvent, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Fullscreen, Window, WindowId};

/// Display device that presents into a winit window
pub struct WindowDisplay {
    window: Arc<Window>,
    pixels: Pixels<'static>,
    surface: Surface,
}

impl WindowDisplay {
    /// Attach a display to an open window
    ///
    /// The surface is a 1x1 placeholder until a mode is set.
    pub fn new(window: Arc<Window>) -> Result<Self, DisplayError> {
        let size = window.inner_size();
        let (width, height) = (size.width.max(1), size.height.max(1));

        // Create surface texture using Arc<Window> for safe 'static lifetime
        let surface_texture = SurfaceTexture::new(width, height, window.clone());
        let pixels = Pixels::new(1, 1, surface_texture)
            .map_err(|e| DisplayError::Backend(format!("failed to create pixel buffer: {}", e)))?;

        Ok(Self {
            window,
            pixels,
            surface: Surface::new(1, 1, PixelFormat::XRGB8888),
        })
    }

    /// The window this display draws into
    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Formats the pixels frame can be fed from
    fn pick_format(request: &ModeRequest) -> Result<PixelFormat, DisplayError> {
        match request.bit_depth {
            0 | 32 => Ok(PixelFormat::XRGB8888),
            8 => Ok(PixelFormat::INDEXED8),
            _ if request.flags.any_format => Ok(PixelFormat::XRGB8888),
            depth => Err(DisplayError::UnsupportedDepth(depth)),
        }
    }

    /// Resize the frame buffer, then the window surface it is scaled onto
    ///
    /// If the window surface cannot follow, the buffer goes back to
    /// `previous` so it still matches the surface handed out last.
    ///
    /// # Arguments
    /// * `target` - Owner of the buffer and surface
    /// * `previous` - Buffer size before the call
    /// * `requested` - New buffer size
    /// * `window_size` - Physical size of the window
    ///
    /// # Errors
    /// `Backend` with the message of whichever resize failed
    fn resize_frame<T, E: fmt::Display>(
        target: &mut T,
        previous: Resolution,
        requested: Resolution,
        window_size: (u32, u32),
        mut resize_buffer: impl FnMut(&mut T, u32, u32) -> Result<(), E>,
        resize_surface: impl FnOnce(&mut T, u32, u32) -> Result<(), E>,
    ) -> Result<(), DisplayError> {
        resize_buffer(target, requested.width, requested.height)
            .map_err(|e| DisplayError::Backend(e.to_string()))?;

        if let Err(e) = resize_surface(target, window_size.0, window_size.1) {
            if let Err(undo) = resize_buffer(target, previous.width, previous.height) {
                log::error!("cannot put frame buffer back to {}: {}", previous, undo);
            }
            return Err(DisplayError::Backend(e.to_string()));
        }
        Ok(())
    }

    /// Match the window's fullscreen state to the request
    fn apply_fullscreen(&self, fullscreen: bool) {
        if self.window.fullscreen().is_some() != fullscreen {
            self.window
                .set_fullscreen(fullscreen.then_some(Fullscreen::Borderless(None)));
        }
    }
}

impl Display for WindowDisplay {
    fn set_mode(&mut self, request: &ModeRequest) -> Result<(), DisplayError> {
        if request.resolution().is_empty() {
            return Err(DisplayError::Backend(format!(
                "invalid resolution {}",
                request.resolution()
            )));
        }
        let format = Self::pick_format(request)?;

        let size = self.window.inner_size();
        Self::resize_frame(
            &mut self.pixels,
            self.surface.resolution(),
            request.resolution(),
            (size.width.max(1), size.height.max(1)),
            |pixels, width, height| pixels.resize_buffer(width, height),
            |pixels, width, height| pixels.resize_surface(width, height),
        )?;

        self.apply_fullscreen(request.flags.fullscreen);
        self.window.set_resizable(request.flags.resizable);

        for pixel in self.pixels.frame_mut().chunks_exact_mut(4) {
            pixel.copy_from_slice(&[0, 0, 0, 0xFF]);
        }
        self.surface = Surface::new(request.width, request.height, format);
        log::debug!("window display set to {} ({})", request, format);
        Ok(())
    }

    fn surface(&self) -> &Surface {
        &self.surface
    }

    fn surface_mut(&mut self) -> &mut Surface {
        &mut self.surface
    }

    fn present(&mut self, rect: Rect) -> Result<(), DisplayError> {
        let frame = self.pixels.frame_mut();
        if frame.len() < self.surface.resolution().area() * 4 {
            return Err(DisplayError::Backend(format!(
                "frame buffer smaller than the {} surface",
                self.surface.resolution()
            )));
        }
        self.surface.to_rgba(rect, frame);
        self.pixels
            .render()
            .map_err(|e| DisplayError::Backend(format!("render error: {}", e)))
    }

    fn name(&self) -> &str {
        "Window Display"
    }
}

/// Demo application: scales an animated canvas into a resizable window
struct DemoWindow {
    config: VideoConfig,
    canvas: Option<Surface>,
    session: Option<VideoSession<WindowDisplay>>,
    demo: Demo,
    drawing: bool,
    last_frame_time: Instant,
}

impl DemoWindow {
    fn new(config: VideoConfig, canvas: Surface, demo: Demo) -> Self {
        Self {
            config,
            canvas: Some(canvas),
            session: None,
            demo,
            drawing: false,
            last_frame_time: Instant::now(),
        }
    }

    /// Create the window, its display and the session
    fn open(&mut self, event_loop: &ActiveEventLoop) -> Result<(), Box<dyn std::error::Error>> {
        let window_attributes = Window::default_attributes()
            .with_title(format!(
                "Scaled Video - {}",
                self.config.virtual_resolution()
            ))
            .with_inner_size(LogicalSize::new(
                self.config.window_width,
                self.config.window_height,
            ))
            .with_resizable(self.config.resizable);

        let window = Arc::new(event_loop.create_window(window_attributes)?);
        let display = WindowDisplay::new(window.clone())?;

        let size = window.inner_size();
        let request = ModeRequest {
            width: size.width,
            height: size.height,
            ..self.config.to_mode_request()
        }
        .at_least(self.config.virtual_resolution());

        let canvas = self.canvas.take().ok_or("window opened twice")?;
        self.session = Some(VideoSession::new(display, canvas, request)?);
        Ok(())
    }

    /// Switch modes after a resize or fullscreen toggle
    fn reconfigure(&mut self, size: PhysicalSize<u32>, fullscreen: bool) {
        let Some(session) = &mut self.session else {
            return;
        };
        let mut request = *session.mode();
        request.width = size.width;
        request.height = size.height;
        request.flags.fullscreen = fullscreen;
        let request = request.at_least(session.virtual_resolution());

        if request == *session.mode() {
            return;
        }
        if let Err(err) = session.reconfigure(request) {
            log::error!("mode change failed: {}", err);
        }
    }

    /// Stamp the cursor position into the canvas while the button is held
    fn draw_at(&mut self, x: f64, y: f64) {
        let Some(session) = &mut self.session else {
            return;
        };
        let (vx, vy) = session.map_true_to_virtual(x as i32, y as i32);
        let changed = self.demo.mark(session.canvas_mut(), vx, vy);
        session.mark_dirty(changed);
    }

    /// Check if enough time has passed for the next frame
    fn should_render_frame(&mut self) -> bool {
        let elapsed = self.last_frame_time.elapsed();
        if elapsed >= self.config.frame_duration() {
            self.last_frame_time = Instant::now();
            true
        } else {
            false
        }
    }

    /// Advance the animation and present what changed
    fn render(&mut self) -> Result<(), DisplayError> {
        let Some(session) = &mut self.session else {
            return Ok(());
        };
        let changed = self.demo.step(session.canvas_mut());
        session.mark_dirty(changed);
        session.update(true)
    }
}

impl ApplicationHandler for DemoWindow {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.session.is_some() {
            return;
        }
        if let Err(err) = self.open(event_loop) {
            log::error!("cannot open window: {}", err);
            event_loop.exit();
            return;
        }
        if let Some(session) = &self.session {
            log::info!("scaling: {}", session.describe());
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("close requested, exiting");
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                let fullscreen = self
                    .session
                    .as_ref()
                    .is_some_and(|s| s.mode().flags.fullscreen);
                self.reconfigure(size, fullscreen);
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state: ElementState::Pressed,
                        repeat: false,
                        ..
                    },
                ..
            } => match code {
                KeyCode::Escape => event_loop.exit(),
                KeyCode::F11 => {
                    let toggle = self.session.as_ref().map(|session| {
                        let size = session.display().window().inner_size();
                        (size, !session.mode().flags.fullscreen)
                    });
                    if let Some((size, fullscreen)) = toggle {
                        self.reconfigure(size, fullscreen);
                    }
                }
                _ => {}
            },
            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                self.drawing = state == ElementState::Pressed;
            }
            WindowEvent::CursorMoved { position, .. } => {
                if self.drawing {
                    self.draw_at(position.x, position.y);
                }
            }
            WindowEvent::RedrawRequested => {
                if self.should_render_frame() {
                    if let Err(err) = self.render() {
                        log::error!("{}", err);
                        event_loop.exit();
                    }
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        // Request a redraw
        if let Some(session) = &self.session {
            session.display().window().request_redraw();
        }
    }
}

/// Create and run the demo window
///
/// # Arguments
/// * `config` - Video configuration
///
/// # Returns
/// Result indicating success or error
pub fn run_window(config: &VideoConfig) -> Result<(), Box<dyn std::error::Error>> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let virtual_res = config.virtual_resolution();
    let format = config.canvas_format();
    let mut canvas = Surface::new(virtual_res.width, virtual_res.height, format);
    let mut demo = Demo::new();
    demo.test_pattern(&mut canvas);

    log::info!(
        "starting window: virtual {} ({}), window {}x{}, target {} FPS",
        virtual_res,
        format,
        config.window_width,
        config.window_height,
        config.target_fps
    );

    let mut app = DemoWindow::new(config.clone(), canvas, demo);
    event_loop.run_app(&mut app)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::PresentationFlags;
    use crate::error::ScaleError;
    use crate::scaler::{choose_scaler, ScalerKind};

    /// Stand-in for a pixels buffer whose window surface can refuse to resize
    struct FakeFrame {
        buffer: (u32, u32),
        surface: (u32, u32),
        surface_fails: bool,
    }

    fn resize(frame: &mut FakeFrame, requested: Resolution) -> Result<(), DisplayError> {
        WindowDisplay::resize_frame(
            frame,
            Resolution::new(320, 240),
            requested,
            (1024, 768),
            |frame: &mut FakeFrame, w, h| -> Result<(), String> {
                frame.buffer = (w, h);
                Ok(())
            },
            |frame: &mut FakeFrame, w, h| {
                if frame.surface_fails {
                    return Err("surface lost".to_string());
                }
                frame.surface = (w, h);
                Ok(())
            },
        )
    }

    #[test]
    fn test_resize_frame() {
        let mut frame = FakeFrame {
            buffer: (320, 240),
            surface: (800, 600),
            surface_fails: false,
        };
        resize(&mut frame, Resolution::new(640, 480)).unwrap();
        assert_eq!(frame.buffer, (640, 480));
        assert_eq!(frame.surface, (1024, 768));
    }

    #[test]
    fn test_resize_frame_rolls_back_buffer() {
        let mut frame = FakeFrame {
            buffer: (320, 240),
            surface: (800, 600),
            surface_fails: true,
        };
        let err = resize(&mut frame, Resolution::new(640, 480)).unwrap_err();
        assert_eq!(err, DisplayError::Backend("surface lost".to_string()));
        assert_eq!(frame.buffer, (320, 240));
        assert_eq!(frame.surface, (800, 600));
    }

    #[test]
    fn test_canvas_formats_fit_window_formats() {
        let window = Resolution::new(640, 480);
        for (depth, kind) in [
            (0, ScalerKind::IntegerReplicate),
            (8, ScalerKind::IntegerReplicate),
            (32, ScalerKind::IntegerReplicate),
        ] {
            let config = VideoConfig {
                bit_depth: depth,
                ..Default::default()
            };
            let true_format = WindowDisplay::pick_format(&config.to_mode_request()).unwrap();
            let scaler = choose_scaler(
                config.virtual_resolution(),
                &config.canvas_format(),
                window,
                &true_format,
                false,
            )
            .unwrap();
            assert_eq!(scaler.kind(), kind, "{}-bit canvas", depth);
        }
    }

    #[test]
    fn test_unmatched_canvas_format_is_an_error() {
        let config = VideoConfig {
            bit_depth: 16,
            any_format: true,
            ..Default::default()
        };
        let true_format = WindowDisplay::pick_format(&config.to_mode_request()).unwrap();
        let err = choose_scaler(
            config.virtual_resolution(),
            &config.canvas_format(),
            Resolution::new(640, 480),
            &true_format,
            false,
        )
        .err().unwrap();
        assert!(matches!(err, ScaleError::UnsupportedFormat { .. }));
    }

    #[test]
    fn test_pick_format() {
        let request = ModeRequest::new(640, 480, 0);
        assert_eq!(WindowDisplay::pick_format(&request).unwrap(), PixelFormat::XRGB8888);

        let request = ModeRequest::new(640, 480, 8);
        assert_eq!(WindowDisplay::pick_format(&request).unwrap(), PixelFormat::INDEXED8);
    }

    #[test]
    fn test_pick_format_unsupported_depth() {
        let request = ModeRequest::new(640, 480, 16);
        assert_eq!(
            WindowDisplay::pick_format(&request).unwrap_err(),
            DisplayError::UnsupportedDepth(16)
        );

        let request = request.with_flags(PresentationFlags {
            any_format: true,
            ..Default::default()
        });
        assert_eq!(WindowDisplay::pick_format(&request).unwrap(), PixelFormat::XRGB8888);
    }
}
