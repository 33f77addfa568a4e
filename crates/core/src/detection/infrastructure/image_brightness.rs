use std::path::Path;

use image::imageops::FilterType;

use crate::detection::domain::brightness::mean_luminance;
use crate::shared::constants::{BRIGHTNESS_SAMPLE_HEIGHT, BRIGHTNESS_SAMPLE_WIDTH};
use crate::shared::frame::Frame;

/// Downsamples an image to the brightness sample size, the way a camera
/// frame is drawn onto a small canvas before sampling.
pub fn downsample(img: &image::DynamicImage) -> Result<Frame, Box<dyn std::error::Error>> {
    let small = img
        .resize_exact(
            BRIGHTNESS_SAMPLE_WIDTH,
            BRIGHTNESS_SAMPLE_HEIGHT,
            FilterType::Triangle,
        )
        .to_rgb8();
    Ok(Frame::new(
        small.into_raw(),
        BRIGHTNESS_SAMPLE_WIDTH,
        BRIGHTNESS_SAMPLE_HEIGHT,
        3,
    )?)
}

/// Normalized mean luminance of an image file.
pub fn sample_image_brightness(path: &Path) -> Result<f64, Box<dyn std::error::Error>> {
    let img = image::open(path)?;
    let brightness = mean_luminance(&downsample(&img)?);
    log::debug!("Brightness of {}: {brightness:.3}", path.display());
    Ok(brightness)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::path::PathBuf;

    fn write_test_image(dir: &Path, width: u32, height: u32, rgb: [u8; 3]) -> PathBuf {
        let path = dir.join("test.png");
        let mut img = image::RgbImage::new(width, height);
        for pixel in img.pixels_mut() {
            *pixel = image::Rgb(rgb);
        }
        img.save(&path).unwrap();
        path
    }

    #[test]
    fn test_downsample_size() {
        let img = image::DynamicImage::ImageRgb8(image::RgbImage::new(640, 480));
        let frame = downsample(&img).unwrap();
        assert_eq!(frame.width(), 64);
        assert_eq!(frame.height(), 48);
        assert_eq!(frame.channels(), 3);
    }

    #[test]
    fn test_dark_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_test_image(dir.path(), 320, 240, [20, 20, 20]);
        let brightness = sample_image_brightness(&path).unwrap();
        assert_relative_eq!(brightness, 20.0 / 255.0, epsilon = 1e-6);
        assert!(brightness < 0.12);
    }

    #[test]
    fn test_white_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_test_image(dir.path(), 100, 80, [255, 255, 255]);
        assert_relative_eq!(sample_image_brightness(&path).unwrap(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_missing_file_errors() {
        assert!(sample_image_brightness(Path::new("/nonexistent/frame.png")).is_err());
    }
}
