use ndarray::ArrayView3;

use crate::shared::error::FrameError;

/// A downsampled camera frame: contiguous RGB or RGBA bytes in row-major order.
///
/// Only used for brightness sampling; the engine itself never sees pixels.
#[derive(Clone, Debug)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    channels: u8,
}

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32, channels: u8) -> Result<Self, FrameError> {
        if channels != 3 && channels != 4 {
            return Err(FrameError::Channels(channels));
        }
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(channels as usize))
            .ok_or(FrameError::TooLarge {
                width,
                height,
                channels,
            })?;
        if data.len() != expected {
            return Err(FrameError::SizeMismatch {
                expected,
                actual: data.len(),
                width,
                height,
                channels,
            });
        }
        Ok(Self {
            data,
            width,
            height,
            channels,
        })
    }

    /// Wraps canvas `ImageData` bytes (always RGBA).
    pub fn from_rgba(data: Vec<u8>, width: u32, height: u32) -> Result<Self, FrameError> {
        Self::new(data, width, height, 4)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn pixel_count(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    pub fn as_ndarray(&self) -> ArrayView3<'_, u8> {
        ArrayView3::from_shape(self.shape(), &self.data)
            .expect("Frame data length is checked against dimensions in Frame::new")
    }

    fn shape(&self) -> (usize, usize, usize) {
        (
            self.height as usize,
            self.width as usize,
            self.channels as usize,
        )
    }
}
