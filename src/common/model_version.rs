use ndarray::{ArrayView, Axis, IxDyn};

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum ModelVersion {
    YoloV5,
    YoloV6,
    YoloV7,
    YoloV8,
    YoloV9,
    YoloV10,
    #[default] YoloV11,
    YoloV12,
}

impl ModelVersion {
    pub fn name(&self) -> &'static str {
        match self {
            Self::YoloV5 => "YoloV5",
            Self::YoloV6 => "YoloV6",
            Self::YoloV7 => "YoloV7",
            Self::YoloV8 => "YoloV8",
            Self::YoloV9 => "YoloV9",
            Self::YoloV10 => "YoloV10",
            Self::YoloV11 => "YoloV11",
            Self::YoloV12 => "YoloV12",
        }
    }

    /// Accepts `yolov8`, `v8` or `8` style names, case-insensitively.
    pub fn from_name(version: &str) -> Option<ModelVersion> {
        let version = version.to_lowercase();
        let number = version
            .trim_start_matches("yolo")
            .trim_start_matches('v');
        match number {
            "5" => Some(ModelVersion::YoloV5),
            "6" => Some(ModelVersion::YoloV6),
            "7" => Some(ModelVersion::YoloV7),
            "8" => Some(ModelVersion::YoloV8),
            "9" => Some(ModelVersion::YoloV9),
            "10" => Some(ModelVersion::YoloV10),
            "11" => Some(ModelVersion::YoloV11),
            "12" => Some(ModelVersion::YoloV12),
            _ => None,
        }
    }

    /// Output tensor layout this family of models produces.
    pub fn preds(&self) -> YoloPreds {
        match self {
            Self::YoloV5 | Self::YoloV6 | Self::YoloV7 => YoloPreds::n_a_cxcywh_confclss(),
            Self::YoloV8 | Self::YoloV9 | Self::YoloV11 | Self::YoloV12 => YoloPreds::n_cxcywh_clss_a(),
            Self::YoloV10 => YoloPreds::n_a_xyxy_confcls().apply_nms(false),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BoxType {
    /// Centre x, centre y, width, height
    Cxcywh,

    /// Top-left, bottom-right
    Xyxy,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClssType {
    /// One score per class
    Clss,
    /// Objectness followed by one score per class
    ConfClss,
    /// Score followed by class id
    ConfCls,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AnchorsPosition {
    Before,
    After,
}

#[derive(Debug, Clone, PartialEq)]
pub struct YoloPreds {
    pub clss: ClssType,
    pub bbox: BoxType,
    pub anchors: AnchorsPosition,
    pub apply_nms: bool,
}

/// Per-image slices of a prediction tensor: boxes, optional class ids, class scores and optional
/// objectness.
pub type PredSlices<'a> = (
    ArrayView<'a, f32, IxDyn>,
    Option<ArrayView<'a, f32, IxDyn>>,
    ArrayView<'a, f32, IxDyn>,
    Option<ArrayView<'a, f32, IxDyn>>,
);

impl YoloPreds {
    pub fn apply_nms(mut self, x: bool) -> Self {
        self.apply_nms = x;
        self
    }

    pub fn n_a_cxcywh_confclss() -> Self {
        // YOLOv5 | YOLOv6 | YOLOv7 : NACxcywhConfClss
        Self {
            bbox: BoxType::Cxcywh,
            clss: ClssType::ConfClss,
            anchors: AnchorsPosition::Before,
            apply_nms: true,
        }
    }

    pub fn n_cxcywh_clss_a() -> Self {
        // YOLOv8 | YOLOv9 | YOLO11 : NCxcywhClssA
        Self {
            bbox: BoxType::Cxcywh,
            clss: ClssType::Clss,
            anchors: AnchorsPosition::After,
            apply_nms: true,
        }
    }

    pub fn n_a_xyxy_confcls() -> Self {
        // YOLOv10 : NAXyxyConfCls
        Self {
            bbox: BoxType::Xyxy,
            clss: ClssType::ConfCls,
            anchors: AnchorsPosition::Before,
            apply_nms: true,
        }
    }

    pub fn box_type(&self) -> &BoxType {
        &self.bbox
    }

    pub fn is_anchors_first(&self) -> bool {
        matches!(self.anchors, AnchorsPosition::Before)
    }

    /// Number of values per anchor this layout expects for `nc` classes.
    pub fn row_len(&self, nc: usize) -> usize {
        match self.clss {
            ClssType::Clss => 4 + nc,
            ClssType::ConfClss => 5 + nc,
            ClssType::ConfCls => 6,
        }
    }

    /// Splits one image's predictions (2D, either orientation) into anchors-first slices.
    pub fn parse_preds<'a>(&self, x: ArrayView<'a, f32, IxDyn>, nc: usize) -> PredSlices<'a> {
        let x = if self.is_anchors_first() {
            x
        } else {
            x.reversed_axes()
        };

        let (slice_bboxes, xs) = x.split_at(Axis(1), 4);

        let (slice_id, slice_clss, slice_confs) = match self.clss {
            ClssType::ConfClss => {
                let (confs, xs) = xs.split_at(Axis(1), 1);
                let (clss, _xs) = xs.split_at(Axis(1), nc);
                (None, clss, Some(confs))
            }
            ClssType::ConfCls => {
                let (clss, xs) = xs.split_at(Axis(1), 1);
                let (ids, _xs) = xs.split_at(Axis(1), 1);
                (Some(ids), clss, None)
            }
            ClssType::Clss => {
                let (clss, _xs) = xs.split_at(Axis(1), nc);
                (None, clss, None)
            }
        };

        (slice_bboxes, slice_id, slice_clss, slice_confs)
    }
}
