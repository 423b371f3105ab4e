use std::io::Cursor;

use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, ImageReader, RgbImage};
use ndarray::Array4;

use crate::error::InferenceError;

#[derive(Debug, Clone, Copy)]
pub struct PreprocessOptions {
    pub width: u32,
    pub height: u32,
    pub filter: FilterType,
}

impl Default for PreprocessOptions {
    fn default() -> Self {
        Self {
            width: 224,
            height: 224,
            filter: FilterType::Triangle,
        }
    }
}

/// Turns uploaded image bytes into the model's input tensor: decode,
/// drop alpha, resize, scale to [0, 1], NHWC with batch dimension 1.
pub fn preprocess(bytes: &[u8], options: &PreprocessOptions) -> Result<Array4<f32>, InferenceError> {
    let reader = ImageReader::new(Cursor::new(bytes)).with_guessed_format()?;
    match reader.format() {
        Some(ImageFormat::Jpeg) | Some(ImageFormat::Png) => {}
        Some(other) => {
            return Err(InferenceError::UnsupportedFormat(format!("{:?}", other)));
        }
        None => return Err(InferenceError::UnsupportedFormat("unknown".to_string())),
    }

    let decoded = reader.decode()?;
    let rgb = to_rgb(decoded);
    let resized = image::imageops::resize(&rgb, options.width, options.height, options.filter);

    let (width, height) = (options.width as usize, options.height as usize);
    let mut data = Vec::with_capacity(width * height * 3);
    for pixel in resized.pixels() {
        data.push(pixel[0] as f32 / 255.0);
        data.push(pixel[1] as f32 / 255.0);
        data.push(pixel[2] as f32 / 255.0);
    }

    Array4::from_shape_vec((1, height, width, 3), data)
        .map_err(|e| InferenceError::Preprocessing(e.to_string()))
}

fn to_rgb(image: DynamicImage) -> RgbImage {
    match image {
        DynamicImage::ImageRgb8(buffer) => buffer,
        other => other.to_rgb8(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, Rgba, RgbaImage};

    fn encode(image: &DynamicImage, format: ImageFormat) -> Vec<u8> {
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), format)
            .unwrap();
        bytes
    }

    fn gradient_rgb(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
        }))
    }

    #[test]
    fn arbitrary_dimensions_yield_fixed_shape_in_unit_range() {
        let options = PreprocessOptions::default();
        for (w, h) in [(1, 1), (31, 97), (300, 200), (1024, 768)] {
            let bytes = encode(&gradient_rgb(w, h), ImageFormat::Png);
            let tensor = preprocess(&bytes, &options).unwrap();
            assert_eq!(tensor.shape(), &[1, 224, 224, 3]);
            assert!(tensor.iter().all(|&v| (0.0..=1.0).contains(&v)));
        }
    }

    #[test]
    fn rgba_alpha_is_dropped_not_blended() {
        let options = PreprocessOptions::default();

        let rgba = RgbaImage::from_fn(64, 48, |x, y| {
            Rgba([
                (x % 256) as u8,
                (y % 256) as u8,
                ((x * y) % 256) as u8,
                ((x + y) % 256) as u8,
            ])
        });
        let rgb = RgbImage::from_fn(64, 48, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, ((x * y) % 256) as u8])
        });

        let from_rgba = preprocess(
            &encode(&DynamicImage::ImageRgba8(rgba), ImageFormat::Png),
            &options,
        )
        .unwrap();
        let from_rgb = preprocess(
            &encode(&DynamicImage::ImageRgb8(rgb), ImageFormat::Png),
            &options,
        )
        .unwrap();

        assert_eq!(from_rgba, from_rgb);
    }

    #[test]
    fn uniform_gray_stays_uniform() {
        let options = PreprocessOptions::default();
        let gray = DynamicImage::ImageRgb8(RgbImage::from_pixel(512, 512, Rgb([128, 128, 128])));
        let tensor = preprocess(&encode(&gray, ImageFormat::Png), &options).unwrap();

        let expected = 128.0 / 255.0;
        assert_eq!(tensor.shape(), &[1, 224, 224, 3]);
        assert!(tensor.iter().all(|&v| (v - expected).abs() < 1e-6));
    }

    #[test]
    fn preprocessing_is_deterministic() {
        let options = PreprocessOptions::default();
        let bytes = encode(&gradient_rgb(130, 90), ImageFormat::Jpeg);
        let first = preprocess(&bytes, &options).unwrap();
        let second = preprocess(&bytes, &options).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn garbage_bytes_are_rejected() {
        let options = PreprocessOptions::default();
        let result = preprocess(b"definitely not an image", &options);
        match result {
            Err(e) => assert!(e.is_client_error()),
            Ok(_) => panic!("garbage bytes must not produce a tensor"),
        }
    }

    #[test]
    fn truncated_png_fails_with_decode_error() {
        let options = PreprocessOptions::default();
        let bytes = encode(&gradient_rgb(100, 100), ImageFormat::Png);
        let result = preprocess(&bytes[..bytes.len() / 2], &options);
        assert!(matches!(result, Err(InferenceError::Decode(_))));
    }

    #[test]
    fn non_jpeg_png_formats_are_rejected() {
        let options = PreprocessOptions::default();
        let bytes = encode(&gradient_rgb(32, 32), ImageFormat::Bmp);
        let result = preprocess(&bytes, &options);
        assert!(matches!(result, Err(InferenceError::UnsupportedFormat(_))));
    }

    #[test]
    fn configured_size_is_honored() {
        let options = PreprocessOptions {
            width: 96,
            height: 64,
            filter: FilterType::Nearest,
        };
        let bytes = encode(&gradient_rgb(300, 300), ImageFormat::Png);
        let tensor = preprocess(&bytes, &options).unwrap();
        assert_eq!(tensor.shape(), &[1, 64, 96, 3]);
    }
}
