// Scaler selection - Picks the cheapest strategy for a display mode
//
// Strategies are tried from cheapest to most general:
// 1. No-op: same size and format, the application draws in place
// 2. Translate-only: one dimension matches, centered copy
// 3. Integer replicate: a whole factor fills one dimension
// 4. Arbitrary resample (or blend, if asked for): identical formats
// 5. Arbitrary palette convert: 8-bit indexed onto 32-bit direct color

use super::{
    check_upscale, ArbitraryBlend, ArbitraryPaletteConvert, ArbitraryResample, IntegerReplicate,
    NoOp, ScaledVideo, Scaler, TranslateOnly,
};
use crate::display::{Display, ModeRequest};
use crate::error::ScaleError;
use crate::geometry::Resolution;
use crate::surface::{PixelFormat, Surface};

/// Choose and build a scaler for a virtual/true pair
///
/// # Arguments
/// * `virtual_res` / `virtual_format` - The surface the application draws on
/// * `true_res` / `true_format` - The display's surface
/// * `high_quality` - Prefer the blending scaler for non-integer ratios
///
/// # Errors
/// `Downscale` if the true resolution is smaller than the virtual one in
/// either dimension, `UnsupportedFormat` if no scaler handles the formats
pub fn choose_scaler(
    virtual_res: Resolution,
    virtual_format: &PixelFormat,
    true_res: Resolution,
    true_format: &PixelFormat,
    high_quality: bool,
) -> Result<Box<dyn Scaler>, ScaleError> {
    check_upscale(virtual_res, true_res)?;

    if virtual_format.matches(true_format) {
        let scaler: Box<dyn Scaler> = if virtual_res == true_res {
            Box::new(NoOp::new(virtual_res, virtual_format, true_res, true_format)?)
        } else if virtual_res.width == true_res.width || virtual_res.height == true_res.height {
            Box::new(TranslateOnly::new(
                virtual_res,
                virtual_format,
                true_res,
                true_format,
            )?)
        } else if IntegerReplicate::factor_for(virtual_res, true_res).is_some() {
            Box::new(IntegerReplicate::new(
                virtual_res,
                virtual_format,
                true_res,
                true_format,
            )?)
        } else if high_quality && true_format.is_direct32() {
            Box::new(ArbitraryBlend::new(
                virtual_res,
                virtual_format,
                true_res,
                true_format,
            )?)
        } else {
            if high_quality {
                log::warn!(
                    "blended scaling needs 32-bit color, {} surfaces use nearest-pixel",
                    true_format
                );
            }
            Box::new(ArbitraryResample::new(
                virtual_res,
                virtual_format,
                true_res,
                true_format,
            )?)
        };
        return Ok(scaler);
    }

    if virtual_format.is_indexed() && true_format.is_direct32() {
        return Ok(Box::new(ArbitraryPaletteConvert::new(
            virtual_res,
            virtual_format,
            true_res,
            true_format,
        )?));
    }

    Err(ScaleError::UnsupportedFormat {
        virtual_format: *virtual_format,
        true_format: *true_format,
    })
}

/// Set a display mode and build the scaler for it
///
/// The true surface is cleared to black and the returned `ScaledVideo`
/// starts with nothing dirty.
///
/// # Arguments
/// * `display` - Device to switch
/// * `canvas` - The virtual surface
/// * `request` - Mode to establish
///
/// # Errors
/// `Downscale` before touching the display if the request is smaller than
/// the virtual surface, `DisplayMode` if the device refuses the mode, and
/// anything `choose_scaler` reports for the resulting surface. In the last
/// case the display has already switched modes.
pub fn establish(
    display: &mut dyn Display,
    canvas: &Surface,
    request: &ModeRequest,
) -> Result<ScaledVideo, ScaleError> {
    let virtual_res = canvas.resolution();
    check_upscale(virtual_res, request.resolution())?;

    display
        .set_mode(request)
        .map_err(|source| ScaleError::DisplayMode {
            request: *request,
            source,
        })?;

    let target = display.surface_mut();
    target.fill(0);
    let scaler = choose_scaler(
        virtual_res,
        canvas.format(),
        target.resolution(),
        target.format(),
        request.flags.high_quality,
    )?;

    log::info!("{}: {}", display.name(), scaler.describe());
    Ok(ScaledVideo::new(scaler))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::{MemoryDisplay, PresentationFlags};
    use crate::scaler::ScalerKind;

    const QVGA: Resolution = Resolution::new(320, 240);

    fn kind(
        virtual_format: PixelFormat,
        true_res: Resolution,
        true_format: PixelFormat,
        high_quality: bool,
    ) -> ScalerKind {
        choose_scaler(QVGA, &virtual_format, true_res, &true_format, high_quality)
            .unwrap()
            .kind()
    }

    #[test]
    fn test_selection_order() {
        let f = PixelFormat::XRGB8888;
        assert_eq!(kind(f, QVGA, f, false), ScalerKind::NoOp);
        assert_eq!(kind(f, Resolution::new(320, 400), f, false), ScalerKind::TranslateOnly);
        assert_eq!(kind(f, Resolution::new(640, 240), f, false), ScalerKind::TranslateOnly);
        assert_eq!(kind(f, Resolution::new(640, 480), f, false), ScalerKind::IntegerReplicate);
        assert_eq!(kind(f, Resolution::new(960, 800), f, false), ScalerKind::IntegerReplicate);
        assert_eq!(kind(f, Resolution::new(1000, 700), f, false), ScalerKind::ArbitraryResample);
    }

    #[test]
    fn test_high_quality_selects_blend() {
        let f = PixelFormat::XRGB8888;
        assert_eq!(kind(f, Resolution::new(1000, 700), f, true), ScalerKind::ArbitraryBlend);
        // Integer ratios never blend
        assert_eq!(kind(f, Resolution::new(640, 480), f, true), ScalerKind::IntegerReplicate);
    }

    #[test]
    fn test_high_quality_falls_back_without_32bit() {
        let f = PixelFormat::RGB565;
        assert_eq!(kind(f, Resolution::new(1000, 700), f, true), ScalerKind::ArbitraryResample);
    }

    #[test]
    fn test_indexed_onto_direct32_converts() {
        for true_res in [QVGA, Resolution::new(640, 480), Resolution::new(1000, 700)] {
            assert_eq!(
                kind(PixelFormat::INDEXED8, true_res, PixelFormat::XRGB8888, false),
                ScalerKind::ArbitraryPaletteConvert
            );
        }
    }

    #[test]
    fn test_unsupported_format_pair() {
        let err = choose_scaler(
            QVGA,
            &PixelFormat::RGB565,
            Resolution::new(640, 480),
            &PixelFormat::XRGB8888,
            false,
        )
        .err().unwrap();
        assert!(matches!(err, ScaleError::UnsupportedFormat { .. }));
    }

    #[test]
    fn test_downscale_refused() {
        let f = PixelFormat::INDEXED8;
        let err = choose_scaler(QVGA, &f, Resolution::new(320, 200), &f, false).err().unwrap();
        assert!(matches!(err, ScaleError::Downscale { .. }));
    }

    #[test]
    fn test_establish_clears_and_selects() {
        let mut display = MemoryDisplay::new(32);
        let canvas = Surface::new(320, 240, PixelFormat::XRGB8888);
        let video = establish(&mut display, &canvas, &ModeRequest::new(640, 480, 32)).unwrap();

        assert_eq!(video.kind(), ScalerKind::IntegerReplicate);
        assert!(!video.has_pending());
        assert!(display.surface().as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_establish_checks_downscale_before_mode_change() {
        let mut display = MemoryDisplay::new(32);
        let canvas = Surface::new(320, 240, PixelFormat::XRGB8888);
        let err = establish(&mut display, &canvas, &ModeRequest::new(200, 200, 32)).unwrap_err();

        assert!(matches!(err, ScaleError::Downscale { .. }));
        assert_eq!(display.mode_changes(), 0);
    }

    #[test]
    fn test_establish_reports_refused_mode() {
        let mut display = MemoryDisplay::new(32).with_depths(&[32]);
        let canvas = Surface::new(320, 240, PixelFormat::INDEXED8);
        let err = establish(&mut display, &canvas, &ModeRequest::new(640, 480, 8)).unwrap_err();

        match err {
            ScaleError::DisplayMode { request, .. } => assert_eq!(request.bit_depth, 8),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_establish_high_quality_flag() {
        let mut display = MemoryDisplay::new(32);
        let canvas = Surface::new(320, 240, PixelFormat::XRGB8888);
        let request = ModeRequest::new(1000, 700, 32).with_flags(PresentationFlags {
            high_quality: true,
            ..Default::default()
        });
        let video = establish(&mut display, &canvas, &request).unwrap();
        assert_eq!(video.kind(), ScalerKind::ArbitraryBlend);
    }
}
