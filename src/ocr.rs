//! Boundary with the external text-recognition engine.
//!
//! The editor only describes which pixels to recognize and stores the text
//! that comes back through
//! [`BoxManager::set_box_text`](crate::box_manager::BoxManager::set_box_text).

use image::DynamicImage;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::{PixelRect, Rect, SceneDimensions};
use crate::snip_box::{BoxId, SnipBox};

/// A recognition job for one snip box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OcrRequest {
    /// Box the resulting text belongs to
    pub box_id: BoxId,
    /// Committed box geometry in scene pixels
    pub region: Rect,
    /// Whole-pixel region to crop from the original image
    pub crop: PixelRect,
}

impl OcrRequest {
    pub fn for_box(snip: &SnipBox, scene: SceneDimensions) -> Self {
        Self {
            box_id: snip.id,
            region: snip.rect,
            crop: PixelRect::covering(&snip.rect, scene),
        }
    }
}

/// Errors that can occur while cropping a region for recognition.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OcrError {
    /// Crop region has no pixels
    #[error("Crop region is empty")]
    EmptyRegion,

    /// Crop region extends past the image
    #[error("Crop region {region:?} exceeds image size {width}x{height}")]
    OutOfBounds {
        region: PixelRect,
        width: u32,
        height: u32,
    },
}

/// Cut the requested region out of the original image.
pub fn crop_image(image: &DynamicImage, crop: PixelRect) -> Result<DynamicImage, OcrError> {
    if crop.is_empty() {
        return Err(OcrError::EmptyRegion);
    }
    let (width, height) = (image.width(), image.height());
    let fits_x = crop.x.checked_add(crop.width).is_some_and(|right| right <= width);
    let fits_y = crop.y.checked_add(crop.height).is_some_and(|bottom| bottom <= height);
    if !fits_x || !fits_y {
        return Err(OcrError::OutOfBounds {
            region: crop,
            width,
            height,
        });
    }
    Ok(image.crop_imm(crop.x, crop.y, crop.width, crop.height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, Rgba, RgbaImage};

    fn test_image() -> DynamicImage {
        let mut img = RgbaImage::new(20, 10);
        img.put_pixel(5, 4, Rgba([255, 0, 0, 255]));
        DynamicImage::ImageRgba8(img)
    }

    #[test]
    fn test_request_for_box() {
        let snip = SnipBox::new(7, Rect::new(1.5, 2.0, 10.0, 4.2));
        let request = OcrRequest::for_box(&snip, SceneDimensions::new(20, 10));
        assert_eq!(request.box_id, 7);
        assert_eq!(request.region, snip.rect);
        assert_eq!(request.crop, PixelRect::new(1, 2, 11, 5));
    }

    #[test]
    fn test_crop_image() {
        let cropped = crop_image(&test_image(), PixelRect::new(5, 4, 3, 2)).expect("crop fits");
        assert_eq!(cropped.dimensions(), (3, 2));
        assert_eq!(cropped.get_pixel(0, 0), Rgba([255, 0, 0, 255]));
    }

    #[test]
    fn test_crop_empty_region() {
        assert_eq!(
            crop_image(&test_image(), PixelRect::new(0, 0, 0, 5)),
            Err(OcrError::EmptyRegion)
        );
    }

    #[test]
    fn test_crop_out_of_bounds() {
        let result = crop_image(&test_image(), PixelRect::new(15, 0, 10, 5));
        assert!(matches!(result, Err(OcrError::OutOfBounds { width: 20, height: 10, .. })));
    }
}
