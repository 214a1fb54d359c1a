//! Image preprocessing for CLIP ViT-B/32.
//!
//! CLIP expects:
//! - Center square crop of the shortest side, resized to 224×224 (bicubic)
//! - Per-channel normalization with the OpenAI CLIP mean/std
//! - Channel order: RGB
//! - Tensor layout: NCHW [batch, channels, height, width]

use image::imageops::FilterType;
use image::DynamicImage;
use ndarray::Array4;

/// Number of color channels (RGB).
const CHANNELS: usize = 3;

/// CLIP input resolution.
pub const IMAGE_SIZE: u32 = 224;

const NORM_MEAN: [f32; 3] = [0.481_454_66, 0.457_827_5, 0.408_210_73];
const NORM_STD: [f32; 3] = [0.268_629_54, 0.261_302_58, 0.275_777_11];

/// Crop, resize, and normalize an image into a `[1, 3, size, size]` tensor.
pub fn preprocess(image: &DynamicImage, image_size: u32) -> Array4<f32> {
    // Crop before resizing so extreme aspect ratios never produce a huge
    // intermediate image.
    let side = image.width().min(image.height()).max(1);
    let left = image.width().saturating_sub(side) / 2;
    let top = image.height().saturating_sub(side) / 2;
    let rgb = image
        .crop_imm(left, top, side, side)
        .resize_exact(image_size, image_size, FilterType::CatmullRom)
        .to_rgb8();

    let size = image_size as usize;
    let mut tensor = Array4::<f32>::zeros((1, CHANNELS, size, size));

    for (x, y, pixel) in rgb.enumerate_pixels() {
        for c in 0..CHANNELS {
            let value = pixel.0[c] as f32 / 255.0;
            tensor[[0, c, y as usize, x as usize]] = (value - NORM_MEAN[c]) / NORM_STD[c];
        }
    }

    tensor
}
