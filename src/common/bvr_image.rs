use image::{DynamicImage, RgbImage};

/// A single captured frame. Frames are always held as 8-bit RGB.
#[derive(Debug, Clone, Default)]
pub struct BvrImage {
    pub image: RgbImage,
    pub frame_index: u64,
}

impl std::ops::Deref for BvrImage {
    type Target = RgbImage;

    fn deref(&self) -> &Self::Target {
        &self.image
    }
}

impl std::ops::DerefMut for BvrImage {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.image
    }
}

impl From<DynamicImage> for BvrImage {
    fn from(image: DynamicImage) -> Self {
        Self {
            image: image.to_rgb8(),
            ..Default::default()
        }
    }
}

impl BvrImage {
    pub fn new(image: RgbImage, frame_index: u64) -> Self {
        Self {
            image,
            frame_index,
        }
    }

    pub fn with_frame_index(mut self, frame_index: u64) -> Self {
        self.frame_index = frame_index;
        self
    }

    /// Flips the frame left to right, so a live camera preview behaves like a mirror.
    pub fn mirror_horizontal(&mut self) {
        image::imageops::flip_horizontal_in_place(&mut self.image);
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }
}
