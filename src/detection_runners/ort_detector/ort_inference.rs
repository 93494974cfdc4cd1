use anyhow::Result;
use image::RgbImage;
use ndarray::{s, Axis};
use rayon::prelude::*;
use regex::Regex;

use crate::common::{BoxType, BvrDetection, BvrImage, ModelVersion, YoloPreds};
use crate::data::{ConfigOrt, Xs, Y};
use crate::detection_runners::inference_process::InferenceProcess;
use crate::detection_runners::ort_detector::image_ops;
use crate::detection_runners::ort_detector::OrtEngine;
use crate::detectors::Detector;

#[derive(Debug)]
pub struct OrtYOLO {
    engine: OrtEngine,
    nc: usize,
    conf: f32,
    iou: f32,
    names: Vec<String>,
    layout: YoloPreds,
    version: ModelVersion,
    profile: bool,
}

impl InferenceProcess for OrtYOLO {
    type Input = RgbImage;

    fn new(options: ConfigOrt) -> Result<Self> {
        let engine = OrtEngine::new(&options)?;

        let version = match options.yolo_version {
            Some(version) => version,
            None => anyhow::bail!("No YOLO version specified, unable to pick an output layout."),
        };
        let layout = version.preds();

        // Class names: user-defined.or(parsed)
        let names_parsed = Self::fetch_names(&engine)?;
        let names = match names_parsed {
            Some(names_parsed) => match options.names {
                Some(names) => {
                    if names.len() != names_parsed.len() {
                        anyhow::bail!(
                            "The lengths of parsed class names: {} and user-defined class names: {} do not match.",
                            names_parsed.len(),
                            names.len(),
                        );
                    }
                    Some(names)
                }
                None => Some(names_parsed),
            },
            None => options.names,
        };

        // nc: names.len().or(options.nc)
        let nc = match &names {
            Some(names) => names.len(),
            None => match options.nc {
                Some(nc) => nc,
                None => anyhow::bail!(
                    "Unable to obtain the number of classes. Please specify them explicitly using `with_nc(usize)` or `with_names(&[&str])`."
                ),
            }
        };

        let names = names.unwrap_or_else(|| Self::n2s(nc));

        log::info!("YOLO Version: {} | Classes: {} | Conf: {} | IoU: {}", version.name(), nc, options.conf, options.iou);

        let mut yolo = Self {
            engine,
            nc,
            conf: options.conf,
            iou: options.iou,
            names,
            layout,
            version,
            profile: options.profile,
        };

        // Warm up so the first live frame does not pay for graph initialization
        let (w, h) = (yolo.engine.width(), yolo.engine.height());
        for _ in 0..options.num_dry_run {
            yolo.run(&[RgbImage::new(w, h)])?;
        }

        Ok(yolo)
    }

    fn preprocess(&self, xs: &[Self::Input]) -> Result<Xs> {
        let x = image_ops::preprocess(xs, self.engine.height(), self.engine.width())?;
        Ok(Xs::from(x))
    }

    fn inference(&mut self, xs: Xs) -> Result<Xs> {
        self.engine.run(xs)
    }

    fn postprocess(&self, xs: Xs, xs0: &[Self::Input]) -> Result<Vec<Y>> {
        let preds = match xs.first() {
            Some(preds) => preds,
            None => anyhow::bail!("Model produced no outputs"),
        };
        if preds.ndim() != 3 {
            anyhow::bail!("Expected a 3D prediction tensor, got shape {:?}", preds.shape());
        }

        let row_len = self.layout.row_len(self.nc);
        let feature_axis = if self.layout.is_anchors_first() { 2 } else { 1 };
        if preds.shape()[feature_axis] != row_len {
            anyhow::bail!(
                "Prediction shape {:?} does not match {} layout with {} classes",
                preds.shape(),
                self.version.name(),
                self.nc,
            );
        }

        if preds.shape()[0] != xs0.len() {
            anyhow::bail!("Batch of {} predictions for {} images", preds.shape()[0], xs0.len());
        }

        let ys: Vec<Y> = preds
            .axis_iter(Axis(0))
            .into_par_iter()
            .enumerate()
            .map(|(idx, preds)| {
                let (slice_bboxes, slice_id, slice_clss, slice_confs) = self.layout.parse_preds(preds, self.nc);

                let (image_width, image_height) = xs0[idx].dimensions();
                let ratio = image_ops::letterbox_ratio(image_width, image_height, self.engine.width(), self.engine.height());

                let detections = slice_bboxes
                    .axis_iter(Axis(0))
                    .into_par_iter()
                    .enumerate()
                    .filter_map(|(i, bbox)| {
                        // confidence & class_id
                        let (class_id, confidence) = match &slice_id {
                            Some(ids) => (ids[[i, 0]] as usize, slice_clss[[i, 0]]),
                            None => {
                                let (class_id, &confidence) = slice_clss
                                    .slice(s![i, ..])
                                    .into_iter()
                                    .enumerate()
                                    .max_by(|a, b| a.1.total_cmp(b.1))?;

                                match &slice_confs {
                                    None => (class_id, confidence),
                                    Some(slice_confs) => (class_id, confidence * slice_confs[[i, 0]]),
                                }
                            }
                        };

                        // filtering low scores
                        if confidence < self.conf || class_id >= self.nc {
                            return None;
                        }

                        // back to source image space
                        let (a, b, c, d) = (bbox[0] / ratio, bbox[1] / ratio, bbox[2] / ratio, bbox[3] / ratio);

                        let (x1, y1, x2, y2) = match self.layout.box_type() {
                            BoxType::Cxcywh => (a - c / 2., b - d / 2., a + c / 2., b + d / 2.),
                            BoxType::Xyxy => (a, b, c, d),
                        };

                        let x1 = x1.clamp(0., image_width as f32);
                        let y1 = y1.clamp(0., image_height as f32);
                        let x2 = x2.clamp(0., image_width as f32);
                        let y2 = y2.clamp(0., image_height as f32);

                        Some(BvrDetection::default()
                            .with_x1y1_x2y2(x1, y1, x2, y2)
                            .with_confidence(confidence)
                            .with_class_id(class_id as isize)
                            .with_label(&self.names[class_id]))
                    })
                    .collect::<Vec<_>>();

                let mut y = Y::default().with_detections(&detections);
                if self.layout.apply_nms {
                    y = y.apply_nms(self.iou);
                }
                y
            })
            .collect();

        Ok(ys)
    }
}

impl Detector for OrtYOLO {
    fn detect(&mut self, frame: &BvrImage) -> Result<Vec<BvrDetection>> {
        let ys = self.forward(std::slice::from_ref(&frame.image), self.profile)?;
        Ok(ys.into_iter().next().map(Y::into_detections).unwrap_or_default())
    }
}

impl OrtYOLO {
    pub fn version(&self) -> ModelVersion {
        self.version
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn layout(&self) -> &YoloPreds {
        &self.layout
    }

    pub fn engine(&self) -> &OrtEngine {
        &self.engine
    }

    fn fetch_names(engine: &OrtEngine) -> Result<Option<Vec<String>>> {
        // fetch class names from onnx metadata
        // String format: `{0: 'person', 1: 'bicycle', 2: 'sports ball', ..., 27: "yellow_lady's_slipper"}`
        let names = match engine.try_fetch("names") {
            Some(names) => names,
            None => return Ok(None),
        };
        Ok(Some(parse_class_names(&names)?))
    }

    fn n2s(n: usize) -> Vec<String> {
        (0..n).map(|x| format!("# {}", x)).collect::<Vec<String>>()
    }
}

/// Parses the `names` metadata string Ultralytics exports embed into ONNX models.
pub fn parse_class_names(names: &str) -> Result<Vec<String>> {
    let re = Regex::new(r#"(['"])([-()\w '"]+)(['"])"#)?;
    Ok(re
        .captures_iter(names)
        .map(|x| x.extract())
        .map(|(_, [_, name, _])| name.to_string())
        .collect())
}
