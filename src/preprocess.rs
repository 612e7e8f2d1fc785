//! Image-to-tensor preprocessing.

use image::DynamicImage;
use ndarray::{s, Array3, Array4, ArrayView3, Axis, Zip};

/// Spatial side length the model expects.
pub const SIDE: usize = 224;
/// Number of color channels the model expects.
pub const CHANNELS: usize = 3;

/// Per-channel normalization means (RGB order).
pub const MEAN: [f32; CHANNELS] = [0.485, 0.456, 0.406];
/// Per-channel normalization standard deviations (RGB order).
pub const STDDEV: [f32; CHANNELS] = [0.229, 0.224, 0.225];

/// Decode an image into a channel-last `(height, width, 3)` byte tensor.
///
/// The model expects 224x224 input; images of any other size are resized
/// before conversion.
pub fn image_to_array(image: &DynamicImage) -> Array3<u8> {
    let rgb = if image.width() as usize == SIDE && image.height() as usize == SIDE {
        image.to_rgb8()
    } else {
        image
            .resize_exact(SIDE as u32, SIDE as u32, image::imageops::FilterType::Triangle)
            .to_rgb8()
    };
    let (width, height) = (rgb.width() as usize, rgb.height() as usize);
    Array3::from_shape_vec((height, width, CHANNELS), rgb.into_raw())
        .expect("RGB buffer length matches its dimensions")
}

/// Convert a channel-last byte image into the model input tensor.
///
/// Output shape is `(1, 3, 224, 224)`, with every channel `c` normalized
/// elementwise as `(value / 255 - MEAN[c]) / STDDEV[c]`. Batch size is fixed
/// at 1; the normalization loop iterates over the channel axis, so the
/// per-channel constants always line up with their channel.
///
/// The input shape is not validated; anything other than `(224, 224, 3)`
/// panics with an ndarray shape error.
pub fn preprocess(pixels: ArrayView3<'_, u8>) -> Array4<f32> {
    // (H, W, C) -> (C, H, W)
    let chw = pixels.permuted_axes([2, 0, 1]);

    let mut normalized = Array4::<f32>::zeros((1, CHANNELS, SIDE, SIDE));
    for channel in 0..CHANNELS {
        let (mean, stddev) = (MEAN[channel], STDDEV[channel]);
        Zip::from(normalized.slice_mut(s![0, channel, .., ..]))
            .and(chw.index_axis(Axis(0), channel))
            .for_each(|out, &value| *out = (f32::from(value) / 255.0 - mean) / stddev);
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    #[test]
    fn output_has_model_input_shape() {
        let pixels = Array3::<u8>::zeros((SIDE, SIDE, CHANNELS));
        let tensor = preprocess(pixels.view());
        assert_eq!(tensor.shape(), &[1, CHANNELS, SIDE, SIDE]);
    }

    #[test]
    fn constant_image_normalizes_per_channel() {
        let pixels = Array3::<u8>::from_elem((SIDE, SIDE, CHANNELS), 128);
        let tensor = preprocess(pixels.view());

        for channel in 0..CHANNELS {
            let expected = (128.0 / 255.0 - MEAN[channel]) / STDDEV[channel];
            let actual = tensor[[0, channel, 100, 17]];
            assert!(
                (actual - expected).abs() < 1e-6,
                "channel {}: {} != {}",
                channel,
                actual,
                expected
            );
        }
    }

    #[test]
    fn channels_are_moved_first() {
        let mut pixels = Array3::<u8>::zeros((SIDE, SIDE, CHANNELS));
        pixels[[5, 9, 2]] = 255;
        let tensor = preprocess(pixels.view());

        let expected = (1.0 - MEAN[2]) / STDDEV[2];
        assert!((tensor[[0, 2, 5, 9]] - expected).abs() < 1e-6);
        // The untouched channels at that pixel keep their zero-pixel value.
        let zero = (0.0 - MEAN[0]) / STDDEV[0];
        assert!((tensor[[0, 0, 5, 9]] - zero).abs() < 1e-6);
    }

    #[test]
    fn image_round_trip_has_expected_shape() {
        let image = DynamicImage::new_rgb8(SIDE as u32, SIDE as u32);
        let pixels = image_to_array(&image);
        assert_eq!(pixels.shape(), &[SIDE, SIDE, CHANNELS]);
    }
}
