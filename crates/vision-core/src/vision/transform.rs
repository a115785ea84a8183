//! The simulated vision variants
//!
//! Each variant is a pure value: a color filter for the renderer plus an
//! optional hint for the capture device. Nothing here holds state, so a
//! [`Vision`] can be copied freely between the gesture and frame threads.

use std::fmt;
use std::str::FromStr;

use crate::color::lms::{dichromat_matrix, Cone};
use crate::color::ColorMatrix;

/// Standard luma weights used for the monochromat filter.
const LUMA_WEIGHTS: [f32; 3] = [0.299, 0.587, 0.114];

/// Capture-side configuration requested by a vision variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CaptureHint {
    /// Force close-range (macro) focus, blurring anything further away.
    MacroFocus,
}

impl CaptureHint {
    pub fn name(&self) -> &'static str {
        match self {
            CaptureHint::MacroFocus => "macro focus",
        }
    }
}

impl fmt::Display for CaptureHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A simulated way of seeing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Vision {
    /// Unaltered vision
    Normal,
    /// Nearsightedness, produced entirely by the camera focus
    Myopia,
    /// Missing red cones
    Protanopia,
    /// Missing green cones
    Deuteranopia,
    /// Missing blue cones
    Tritanopia,
    /// No functioning cones (complete color blindness)
    Achromatopsia,
    /// Complete color blindness combined with nearsightedness
    AchromatopsiaMyopia,
}

impl Vision {
    /// Every variant, in the order the selection cycle presents them.
    pub const ALL: [Vision; 7] = [
        Vision::Normal,
        Vision::Myopia,
        Vision::Protanopia,
        Vision::Deuteranopia,
        Vision::Tritanopia,
        Vision::Achromatopsia,
        Vision::AchromatopsiaMyopia,
    ];

    /// Display label.
    pub fn name(&self) -> &'static str {
        match self {
            Vision::Normal => "Normal",
            Vision::Myopia => "Myopia",
            Vision::Protanopia => "Protanopia",
            Vision::Deuteranopia => "Deuteranopia",
            Vision::Tritanopia => "Tritanopia",
            Vision::Achromatopsia => "Achromatopsia",
            Vision::AchromatopsiaMyopia => "Achromatopsia + Myopia",
        }
    }

    /// Stable identifier for settings files and the command line.
    pub fn slug(&self) -> &'static str {
        match self {
            Vision::Normal => "normal",
            Vision::Myopia => "myopia",
            Vision::Protanopia => "protanopia",
            Vision::Deuteranopia => "deuteranopia",
            Vision::Tritanopia => "tritanopia",
            Vision::Achromatopsia => "achromatopsia",
            Vision::AchromatopsiaMyopia => "achromatopsia-myopia",
        }
    }

    /// Color filter to hand to the renderer.
    ///
    /// # Example
    /// ```
    /// use vision_core::Vision;
    ///
    /// let filter = Vision::Achromatopsia.color_matrix();
    /// let px = filter.apply(0x00FF_0000);
    /// assert_eq!(px >> 16 & 0xFF, px >> 8 & 0xFF);
    /// assert_eq!(px >> 8 & 0xFF, px & 0xFF);
    /// ```
    pub fn color_matrix(&self) -> ColorMatrix {
        match self {
            Vision::Normal | Vision::Myopia => ColorMatrix::identity(),
            Vision::Protanopia => ColorMatrix::from_rgb3(dichromat_matrix(Cone::Long)),
            Vision::Deuteranopia => ColorMatrix::from_rgb3(dichromat_matrix(Cone::Medium)),
            Vision::Tritanopia => ColorMatrix::from_rgb3(dichromat_matrix(Cone::Short)),
            Vision::Achromatopsia => {
                let [wr, wg, wb] = LUMA_WEIGHTS;
                ColorMatrix::luminance(wr, wg, wb)
            }
            Vision::AchromatopsiaMyopia => Vision::Achromatopsia
                .color_matrix()
                .concat(&Vision::Myopia.color_matrix()),
        }
    }

    /// Capture device configuration to apply while this variant is active.
    pub fn capture_hint(&self) -> Option<CaptureHint> {
        match self {
            Vision::Myopia | Vision::AchromatopsiaMyopia => Some(CaptureHint::MacroFocus),
            _ => None,
        }
    }
}

impl fmt::Display for Vision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a string names no vision variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseVisionError(pub String);

impl fmt::Display for ParseVisionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown vision {:?}", self.0)
    }
}

impl std::error::Error for ParseVisionError {}

impl FromStr for Vision {
    type Err = ParseVisionError;

    /// Parse either the slug or the display label, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Vision::ALL
            .into_iter()
            .find(|v| v.slug().eq_ignore_ascii_case(needle) || v.name().eq_ignore_ascii_case(needle))
            .ok_or_else(|| ParseVisionError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_focus_only_variants_keep_colors() {
        assert!(Vision::Normal.color_matrix().is_identity());
        assert!(Vision::Myopia.color_matrix().is_identity());
    }

    #[test]
    fn test_capture_hints() {
        let with_hint: Vec<_> = Vision::ALL
            .into_iter()
            .filter(|v| v.capture_hint().is_some())
            .collect();
        assert_eq!(with_hint, vec![Vision::Myopia, Vision::AchromatopsiaMyopia]);
        assert_eq!(Vision::Myopia.capture_hint(), Some(CaptureHint::MacroFocus));
    }

    #[test]
    fn test_composite_uses_monochrome_filter() {
        assert_eq!(
            Vision::AchromatopsiaMyopia.color_matrix(),
            Vision::Achromatopsia.color_matrix()
        );
    }

    #[test]
    fn test_dichromat_filters_differ() {
        let filters = [
            Vision::Protanopia.color_matrix(),
            Vision::Deuteranopia.color_matrix(),
            Vision::Tritanopia.color_matrix(),
        ];
        for (i, a) in filters.iter().enumerate() {
            assert!(!a.is_identity());
            for b in &filters[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_parse_names_and_slugs() {
        for vision in Vision::ALL {
            assert_eq!(vision.slug().parse::<Vision>(), Ok(vision));
            assert_eq!(vision.name().parse::<Vision>(), Ok(vision));
        }
        assert_eq!("  PROTANOPIA ".parse::<Vision>(), Ok(Vision::Protanopia));
        assert_eq!(
            "achromatopsia + myopia".parse::<Vision>(),
            Ok(Vision::AchromatopsiaMyopia)
        );
    }

    #[test]
    fn test_parse_unknown() {
        let err = "sepia".parse::<Vision>().unwrap_err();
        assert_eq!(err.to_string(), "unknown vision \"sepia\"");
    }

    #[test]
    fn test_display_uses_label() {
        assert_eq!(Vision::AchromatopsiaMyopia.to_string(), "Achromatopsia + Myopia");
        assert_eq!(CaptureHint::MacroFocus.to_string(), "macro focus");
    }
}
