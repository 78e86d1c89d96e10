use ndarray::{ArrayView3, ArrayViewMut3};

/// Channel order of the interleaved pixel bytes in a [`Frame`].
///
/// Camera backends differ (OpenCV hands out BGR, ffmpeg and the `image`
/// crate produce RGB); analysis always runs on RGB.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PixelOrder {
    Rgb,
    Bgr,
}

/// A single captured or rendered image: contiguous 3-channel bytes in
/// row-major order.
///
/// `index` is the capture sequence number of the cycle that produced it.
#[derive(Clone, Debug)]
pub struct Frame {
    data: Vec<u8>,
    width: u32,
    height: u32,
    order: PixelOrder,
    index: usize,
}

pub const CHANNELS: usize = 3;

impl Frame {
    pub fn new(data: Vec<u8>, width: u32, height: u32, order: PixelOrder, index: usize) -> Self {
        debug_assert_eq!(
            data.len(),
            (width as usize) * (height as usize) * CHANNELS,
            "data length must equal width * height * 3"
        );
        Self {
            data,
            width,
            height,
            order,
            index,
        }
    }

    /// A frame of the given size with every pixel set to `rgb`.
    pub fn filled(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        let pixels = width as usize * height as usize;
        let mut data = Vec::with_capacity(pixels * CHANNELS);
        for _ in 0..pixels {
            data.extend_from_slice(&rgb);
        }
        Self::new(data, width, height, PixelOrder::Rgb, 0)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn order(&self) -> PixelOrder {
        self.order
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn with_index(mut self, index: usize) -> Self {
        self.index = index;
        self
    }

    /// Pixel at `(x, y)` in the frame's own channel order.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let offset = (y as usize * self.width as usize + x as usize) * CHANNELS;
        [
            self.data[offset],
            self.data[offset + 1],
            self.data[offset + 2],
        ]
    }

    pub fn as_ndarray(&self) -> ArrayView3<'_, u8> {
        ArrayView3::from_shape(self.shape(), &self.data)
            .expect("Frame data length must match dimensions")
    }

    pub fn as_ndarray_mut(&mut self) -> ArrayViewMut3<'_, u8> {
        ArrayViewMut3::from_shape(self.shape(), &mut self.data)
            .expect("Frame data length must match dimensions")
    }

    fn shape(&self) -> (usize, usize, usize) {
        (self.height as usize, self.width as usize, CHANNELS)
    }
}
