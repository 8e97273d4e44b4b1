use crate::foundation::error::{CardError, CardResult};
use crate::geometry::mask::Mask;
use crate::geometry::transform::PhotoTransform;

/// Share of the vertical overflow pushed below the window in `fit`/`fill`.
///
/// Keeps the upper part of a portrait in view, where faces usually are. This is a fixed product
/// heuristic, not a face detector.
pub const FACE_BIAS: f64 = 0.2;

/// Photo scaling policy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitMode {
    /// Contain the whole photo inside the window.
    Fit,
    /// Cover the whole window; the photo may overflow.
    #[default]
    Fill,
    /// Cover scale, centered on both axes without the upward bias.
    Center,
}

impl std::str::FromStr for FitMode {
    type Err = CardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fit" | "contain" => Ok(Self::Fit),
            "fill" | "cover" => Ok(Self::Fill),
            "center" => Ok(Self::Center),
            other => Err(CardError::validation(format!(
                "unknown fit mode \"{other}\" (expected fit, fill or center)"
            ))),
        }
    }
}

impl std::fmt::Display for FitMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Fit => "fit",
            Self::Fill => "fill",
            Self::Center => "center",
        })
    }
}

/// Place a `photo_width x photo_height` photo inside `mask` according to `mode`.
///
/// `mask` may be in any coordinate space as long as the result is read in that same space. Rotation
/// is always reset to 0. Dimensions must be positive; see [`try_compute_fit_transform`] for the
/// checked form.
pub fn compute_fit_transform(
    photo_width: f64,
    photo_height: f64,
    mask: &Mask,
    mode: FitMode,
) -> PhotoTransform {
    let mask_aspect = mask.aspect();
    let photo_aspect = photo_width / photo_height;
    let wider = photo_aspect > mask_aspect;

    let scale = match mode {
        FitMode::Fit => {
            if wider {
                mask.width / photo_width
            } else {
                mask.height / photo_height
            }
        }
        FitMode::Fill | FitMode::Center => {
            if wider {
                mask.height / photo_height
            } else {
                mask.width / photo_width
            }
        }
    };

    let scaled_width = photo_width * scale;
    let scaled_height = photo_height * scale;

    let x = mask.x + (mask.width - scaled_width) / 2.0;
    let y = match mode {
        FitMode::Center => mask.y + (mask.height - scaled_height) / 2.0,
        FitMode::Fit | FitMode::Fill => {
            let overflow = scaled_height - mask.height;
            mask.y - overflow * FACE_BIAS
        }
    };

    PhotoTransform {
        x,
        y,
        scale,
        rotation: 0.0,
    }
}

/// Checked [`compute_fit_transform`]: rejects non-positive or non-finite inputs.
pub fn try_compute_fit_transform(
    photo_width: f64,
    photo_height: f64,
    mask: &Mask,
    mode: FitMode,
) -> CardResult<PhotoTransform> {
    if !(photo_width.is_finite() && photo_height.is_finite())
        || photo_width <= 0.0
        || photo_height <= 0.0
    {
        return Err(CardError::validation(format!(
            "photo dimensions must be > 0 (got {photo_width}x{photo_height})"
        )));
    }
    mask.validate()?;
    Ok(compute_fit_transform(photo_width, photo_height, mask, mode))
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/fit.rs"]
mod tests;
