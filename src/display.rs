use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use anyhow::Context;
use image::RgbImage;
use crate::common::AnnotationInstruction;
use crate::data::FsAccess;

/// User actions observed by a display between frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserInput {
    ResetCalibration,
    Quit,
}

/// Shows annotated frames and reports user input.
pub trait DisplaySink {
    fn show(&mut self, frame_index: u64, annotated: &RgbImage, instructions: &[AnnotationInstruction]) -> anyhow::Result<()>;

    /// Inputs received since the last poll, in arrival order.
    fn poll_input(&mut self) -> anyhow::Result<Vec<UserInput>>;
}

impl<S: DisplaySink + ?Sized> DisplaySink for Box<S> {
    fn show(&mut self, frame_index: u64, annotated: &RgbImage, instructions: &[AnnotationInstruction]) -> anyhow::Result<()> {
        (**self).show(frame_index, annotated, instructions)
    }

    fn poll_input(&mut self) -> anyhow::Result<Vec<UserInput>> {
        (**self).poll_input()
    }
}

/// Writes annotated frames as `frame_NNNNNN.png`, with optional JSON instruction sidecars.
#[derive(Debug)]
pub struct ImageDirSink {
    dir: PathBuf,
    write_json: bool,
    written: u64,
}

impl ImageDirSink {
    pub fn new(dir: &Path, write_json: bool) -> anyhow::Result<Self> {
        FsAccess::create_directory(dir)?;
        log::info!("Writing annotated frames to {}", dir.display());
        Ok(Self {
            dir: dir.to_path_buf(),
            write_json,
            written: 0,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn frame_path(&self, frame_index: u64, extension: &str) -> PathBuf {
        self.dir.join(format!("frame_{:06}.{}", frame_index, extension))
    }
}

impl DisplaySink for ImageDirSink {
    fn show(&mut self, frame_index: u64, annotated: &RgbImage, instructions: &[AnnotationInstruction]) -> anyhow::Result<()> {
        let image_path = self.frame_path(frame_index, "png");
        annotated
            .save(&image_path)
            .with_context(|| format!("Failed to write {}", image_path.display()))?;

        if self.write_json {
            let json_path = self.frame_path(frame_index, "json");
            let mut writer = BufWriter::new(File::create(&json_path)?);
            serde_json::to_writer_pretty(&mut writer, instructions)?;
            writer
                .flush()
                .with_context(|| format!("Failed to write {}", json_path.display()))?;
        }

        self.written += 1;
        Ok(())
    }

    fn poll_input(&mut self) -> anyhow::Result<Vec<UserInput>> {
        Ok(Vec::new())
    }
}

#[cfg(feature = "camera")]
pub use highgui::HighGuiDisplay;

#[cfg(feature = "camera")]
mod highgui {
    use crossbeam_channel::{Receiver, Sender};
    use image::RgbImage;
    use opencv::{core, highgui, imgproc, prelude::*};
    use crate::common::AnnotationInstruction;
    use super::{DisplaySink, UserInput};

    const QUIT_KEY: i32 = 'q' as i32;

    /// An OpenCV window. A left click anywhere in it requests a calibration reset and `q` quits.
    pub struct HighGuiDisplay {
        title: String,
        clicks: Receiver<UserInput>,
    }

    impl HighGuiDisplay {
        pub fn new(title: &str) -> anyhow::Result<Self> {
            highgui::named_window(title, highgui::WINDOW_AUTOSIZE)?;

            // The callback runs inside the GUI backend; it only forwards a message
            let (tx, rx): (Sender<UserInput>, Receiver<UserInput>) = crossbeam_channel::unbounded();
            highgui::set_mouse_callback(title, Some(Box::new(move |event, _x, _y, _flags| {
                if event == highgui::EVENT_LBUTTONDOWN {
                    let _ = tx.send(UserInput::ResetCalibration);
                }
            })))?;

            Ok(Self {
                title: title.to_string(),
                clicks: rx,
            })
        }
    }

    impl DisplaySink for HighGuiDisplay {
        fn show(&mut self, _frame_index: u64, annotated: &RgbImage, _instructions: &[AnnotationInstruction]) -> anyhow::Result<()> {
            let (w, h) = annotated.dimensions();
            let mut rgb = Mat::new_rows_cols_with_default(h as i32, w as i32, core::CV_8UC3, core::Scalar::all(0.))?;
            rgb.data_bytes_mut()?.copy_from_slice(annotated.as_raw());

            let mut bgr = Mat::default();
            imgproc::cvt_color(&rgb, &mut bgr, imgproc::COLOR_RGB2BGR, 0)?;
            highgui::imshow(&self.title, &bgr)?;
            Ok(())
        }

        fn poll_input(&mut self) -> anyhow::Result<Vec<UserInput>> {
            let key = highgui::wait_key(1)?;

            let mut inputs: Vec<UserInput> = self.clicks.try_iter().collect();
            if key >= 0 && (key & 0xFF) == QUIT_KEY {
                inputs.push(UserInput::Quit);
            }
            Ok(inputs)
        }
    }

    impl Drop for HighGuiDisplay {
        fn drop(&mut self) {
            if let Err(e) = highgui::destroy_window(&self.title) {
                log::warn!("Failed to close window {}: {e}", self.title);
            }
        }
    }
}
