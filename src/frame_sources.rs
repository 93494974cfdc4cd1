use std::path::{Path, PathBuf};
use anyhow::Context;
use crate::common::BvrImage;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "webp"];

/// Produces frames one at a time.
///
/// `Ok(None)` means the source has no more frames; an error means acquisition failed. Either ends
/// a measuring session.
pub trait FrameSource {
    fn next_frame(&mut self) -> anyhow::Result<Option<BvrImage>>;
}

impl<S: FrameSource + ?Sized> FrameSource for Box<S> {
    fn next_frame(&mut self) -> anyhow::Result<Option<BvrImage>> {
        (**self).next_frame()
    }
}

/// Image files from a directory, in file name order.
#[derive(Debug)]
pub struct ImageDirSource {
    paths: Vec<PathBuf>,
    position: usize,
}

impl ImageDirSource {
    pub fn open(dir: &Path) -> anyhow::Result<Self> {
        let mut paths = Vec::new();
        for entry in std::fs::read_dir(dir).with_context(|| format!("Failed to read frame directory {}", dir.display()))? {
            let path = entry?.path();
            let is_image = path
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
                .unwrap_or(false);
            if path.is_file() && is_image {
                paths.push(path);
            }
        }
        paths.sort();

        log::info!("Reading {} frames from {}", paths.len(), dir.display());
        Ok(Self { paths, position: 0 })
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl FrameSource for ImageDirSource {
    fn next_frame(&mut self) -> anyhow::Result<Option<BvrImage>> {
        let path = match self.paths.get(self.position) {
            Some(path) => path,
            None => return Ok(None),
        };

        let image = image::open(path).with_context(|| format!("Failed to decode frame {}", path.display()))?;
        let frame = BvrImage::from(image).with_frame_index(self.position as u64);
        self.position += 1;
        Ok(Some(frame))
    }
}

#[cfg(feature = "camera")]
pub use camera::CameraSource;

#[cfg(feature = "camera")]
mod camera {
    use anyhow::Context;
    use image::RgbImage;
    use opencv::{core::Mat, imgproc, prelude::*, videoio};
    use crate::common::BvrImage;
    use super::FrameSource;

    /// Live frames from a local camera through OpenCV.
    pub struct CameraSource {
        capture: videoio::VideoCapture,
        frame: Mat,
        frame_index: u64,
    }

    impl CameraSource {
        /// Opens camera `index`, asking for `width x height`. The device may deliver another size.
        pub fn open(index: i32, width: u32, height: u32) -> anyhow::Result<Self> {
            let mut capture = videoio::VideoCapture::new(index, videoio::CAP_ANY)
                .with_context(|| format!("Failed to open camera {index}"))?;
            if !capture.is_opened()? {
                anyhow::bail!("Camera {index} could not be opened");
            }

            capture.set(videoio::CAP_PROP_FRAME_WIDTH, width as f64)?;
            capture.set(videoio::CAP_PROP_FRAME_HEIGHT, height as f64)?;

            let actual_w = capture.get(videoio::CAP_PROP_FRAME_WIDTH)?;
            let actual_h = capture.get(videoio::CAP_PROP_FRAME_HEIGHT)?;
            log::info!("Camera {index} opened: requested {width}x{height}, delivering {actual_w}x{actual_h}");

            Ok(Self {
                capture,
                frame: Mat::default(),
                frame_index: 0,
            })
        }
    }

    impl FrameSource for CameraSource {
        fn next_frame(&mut self) -> anyhow::Result<Option<BvrImage>> {
            if !self.capture.read(&mut self.frame)? || self.frame.empty() {
                anyhow::bail!("Failed to grab frame");
            }

            let mut rgb = Mat::default();
            imgproc::cvt_color(&self.frame, &mut rgb, imgproc::COLOR_BGR2RGB, 0)?;

            let (w, h) = (rgb.cols() as u32, rgb.rows() as u32);
            let image = RgbImage::from_raw(w, h, rgb.data_bytes()?.to_vec())
                .ok_or_else(|| anyhow::anyhow!("Camera frame buffer does not match {w}x{h}"))?;

            let frame = BvrImage::new(image, self.frame_index);
            self.frame_index += 1;
            Ok(Some(frame))
        }
    }

    impl Drop for CameraSource {
        fn drop(&mut self) {
            if let Err(e) = self.capture.release() {
                log::warn!("Failed to release camera: {e}");
            }
        }
    }
}
