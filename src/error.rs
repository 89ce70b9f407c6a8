// Error types for scaler construction and display devices

use crate::display::ModeRequest;
use crate::geometry::Resolution;
use crate::scaler::ScalerKind;
use crate::surface::PixelFormat;
use thiserror::Error;

/// Errors reported by a display device
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DisplayError {
    /// The device cannot produce a surface of this depth
    #[error("{0}-bit surfaces are not supported")]
    UnsupportedDepth(u8),

    /// The requested resolution exceeds what the device allows
    #[error("resolution {requested} exceeds the maximum of {max}")]
    TooLarge {
        requested: Resolution,
        max: Resolution,
    },

    /// Failure reported by the underlying window system or renderer
    #[error("{0}")]
    Backend(String),

    /// No scaler fits the display surface after a failed mode change
    #[error("display mode lost, a successful mode change is required")]
    ModeLost,
}

/// Errors that prevent a scaler from being established
///
/// None of these leave a scaler half-constructed: the caller keeps whatever
/// it had before the failed call.
#[derive(Debug, Error)]
pub enum ScaleError {
    /// The true resolution is smaller than the virtual one
    #[error("cannot downscale {virtual_res} to {true_res}")]
    Downscale {
        virtual_res: Resolution,
        true_res: Resolution,
    },

    /// No scaler handles this pair of pixel formats
    #[error("unsupported pixel format combination: virtual {virtual_format}, true {true_format}")]
    UnsupportedFormat {
        virtual_format: PixelFormat,
        true_format: PixelFormat,
    },

    /// A scaler was asked for a geometry it cannot produce
    #[error("{scaler} scaler cannot map {virtual_res} onto {true_res}")]
    Geometry {
        scaler: ScalerKind,
        virtual_res: Resolution,
        true_res: Resolution,
    },

    /// A scaler's pixel format precondition does not hold
    #[error("{scaler} scaler requires {requirement}")]
    FormatMismatch {
        scaler: ScalerKind,
        requirement: &'static str,
    },

    /// The display device refused the requested mode
    #[error("display refused mode {request}: {source}")]
    DisplayMode {
        request: ModeRequest,
        #[source]
        source: DisplayError,
    },
}

impl ScaleError {
    /// True for unsupported resolution/format combinations
    ///
    /// These will fail again with the same parameters; display mode failures
    /// may succeed if retried with a different request.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            ScaleError::Downscale { .. }
                | ScaleError::UnsupportedFormat { .. }
                | ScaleError::Geometry { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ScaleError::Downscale {
            virtual_res: Resolution::new(640, 480),
            true_res: Resolution::new(320, 240),
        };
        assert_eq!(err.to_string(), "cannot downscale 640x480 to 320x240");
        assert!(err.is_config_error());

        let err = ScaleError::FormatMismatch {
            scaler: ScalerKind::IntegerReplicate,
            requirement: "identical pixel formats",
        };
        assert_eq!(
            err.to_string(),
            "integer replicate scaler requires identical pixel formats"
        );
        assert!(!err.is_config_error());
    }

    #[test]
    fn test_display_mode_error_keeps_source() {
        use std::error::Error as _;

        let err = ScaleError::DisplayMode {
            request: ModeRequest::new(800, 600, 12),
            source: DisplayError::UnsupportedDepth(12),
        };
        assert!(!err.is_config_error());
        assert_eq!(
            err.source().map(|s| s.to_string()),
            Some("12-bit surfaces are not supported".to_string())
        );
    }
}
