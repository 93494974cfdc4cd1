extern crate bvr_dimensions;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use bvr_dimensions::common::{
    measurement_label, AnnotationKind, CalibrationState, DetectedBox, FixedAdvance, PixelRect, LABEL_BACKGROUND_COLOUR,
    LABEL_TEXT_COLOUR, MEASURED_COLOUR, NO_DETECTIONS_LABEL, REFERENCE_COLOUR, REFERENCE_LABEL, WARNING_COLOUR,
};
use bvr_dimensions::measure_engine::{annotate, EngineCommand, MeasureEngine};

fn detected(x1: i32, y1: i32, x2: i32, y2: i32) -> DetectedBox {
    DetectedBox::new(x1, y1, x2, y2, 0.9, 0).unwrap()
}

#[test]
fn empty_frame_gives_single_notice() {
    let mut calibration = CalibrationState::new(5.0);
    let instructions = annotate(&[], &mut calibration, &FixedAdvance::default());

    assert_eq!(instructions.len(), 1);
    let notice = &instructions[0];
    assert_eq!(notice.kind, AnnotationKind::NoDetections);
    assert_eq!(notice.label, NO_DETECTIONS_LABEL);
    assert_eq!(notice.label_colour, WARNING_COLOUR);
    assert_eq!(notice.rect, None);
    assert_eq!(notice.label_background, None);
    // baseline at y = 30, glyphs 15px tall
    assert_eq!(notice.label_origin, (10, 15));

    assert!(!calibration.is_set());
}

#[test]
fn first_box_becomes_reference() {
    let mut engine = MeasureEngine::new(FixedAdvance::default());
    let boxes = [detected(10, 100, 110, 200), detected(300, 300, 500, 350)];

    let instructions = engine.annotate(&boxes);

    assert_eq!(instructions.len(), 2);
    assert!(instructions[0].is_reference());
    assert_eq!(instructions[0].label, REFERENCE_LABEL);
    assert_eq!(instructions[0].rect_colour, REFERENCE_COLOUR);
    assert_eq!(instructions[0].kind, AnnotationKind::Reference { width_px: 100 });

    // the reference captured from box 0 already applies to box 1
    assert!(instructions[1].is_measured());
    assert_eq!(instructions[1].rect_colour, MEASURED_COLOUR);
    assert_eq!(instructions[1].label, "10.0cm x 2.5cm");
    assert_eq!(engine.calibration().reference_pixel_width(), Some(100));
}

#[test]
fn reference_persists_across_frames() {
    let mut engine = MeasureEngine::new(FixedAdvance::default());
    engine.annotate(&[detected(0, 0, 100, 40)]);

    let instructions = engine.annotate(&[detected(0, 0, 50, 50), detected(10, 10, 310, 60)]);

    assert!(instructions.iter().all(|i| i.is_measured()));
    assert_eq!(instructions[0].label, "2.5cm x 2.5cm");
    assert_eq!(instructions[1].label, "15.0cm x 2.5cm");
}

#[test]
fn empty_frame_keeps_reference() {
    let mut engine = MeasureEngine::new(FixedAdvance::default());
    engine.annotate(&[detected(0, 0, 100, 40)]);
    engine.annotate(&[]);

    assert_eq!(engine.calibration().reference_pixel_width(), Some(100));
    let instructions = engine.annotate(&[detected(0, 0, 100, 40)]);
    assert_eq!(instructions[0].label, "5.0cm x 2.0cm");
}

#[test]
fn reset_makes_next_box_the_reference() {
    let mut engine = MeasureEngine::new(FixedAdvance::default());
    engine.annotate(&[detected(0, 0, 100, 40)]);

    engine.apply(EngineCommand::ResetCalibration);
    assert!(!engine.calibration().is_set());

    let instructions = engine.annotate(&[detected(0, 0, 250, 40), detected(0, 0, 100, 40)]);
    assert!(instructions[0].is_reference());
    assert_eq!(instructions[1].label, "2.0cm x 0.8cm");
}

#[test]
fn measurement_label_uses_one_decimal() {
    assert_eq!(measurement_label(10.0, 2.5), "10.0cm x 2.5cm");
    assert_eq!(measurement_label(3.14159, 0.04), "3.1cm x 0.0cm");
    assert_eq!(measurement_label(12.26, 7.96), "12.3cm x 8.0cm");
}

#[test]
fn custom_reference_width() {
    let mut engine = MeasureEngine::with_reference_width(FixedAdvance::default(), 8.0);
    let instructions = engine.annotate(&[detected(0, 0, 80, 10), detected(0, 0, 40, 20)]);
    assert_eq!(instructions[1].label, "4.0cm x 2.0cm");
}

#[test]
fn label_sits_on_top_edge() {
    let mut calibration = CalibrationState::new(5.0);
    let text = FixedAdvance::default();
    let instructions = annotate(&[detected(10, 100, 110, 200)], &mut calibration, &text);

    let reference = &instructions[0];
    assert_eq!(reference.rect, Some(PixelRect::new(10, 100, 110, 200)));

    // "Reference" is 9 characters of 13px, 15px tall, padded by 10
    let background = reference.label_background.unwrap();
    assert_eq!(background, PixelRect::new(10, 75, 137, 100));
    assert_eq!(reference.label_origin, (15, 80));
    assert_eq!(reference.label_colour, LABEL_TEXT_COLOUR);
    assert_eq!(reference.label_background_colour, LABEL_BACKGROUND_COLOUR);
}

#[test]
fn instructions_round_trip_through_json() {
    let mut engine = MeasureEngine::new(FixedAdvance::default());
    let instructions = engine.annotate(&[detected(10, 100, 110, 200), detected(300, 300, 500, 350)]);

    let json = serde_json::to_string(&instructions).unwrap();
    assert!(json.contains("\"kind\":\"reference\""));
    assert!(json.contains("\"kind\":\"measured\""));

    let decoded: Vec<bvr_dimensions::common::AnnotationInstruction> = serde_json::from_str(&json).unwrap();
    assert_eq!(decoded, instructions);
}

fn random_frame(rng: &mut StdRng) -> Vec<DetectedBox> {
    let n = rng.gen_range(0..4);
    (0..n)
        .map(|_| {
            let x1 = rng.gen_range(0..1000);
            let y1 = rng.gen_range(20..600);
            let w = rng.gen_range(1..280);
            let h = rng.gen_range(1..120);
            detected(x1, y1, x1 + w, y1 + h)
        })
        .collect()
}

fn replay(seed: u64) -> Vec<Vec<bvr_dimensions::common::AnnotationInstruction>> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut engine = MeasureEngine::new(FixedAdvance::default());
    let mut frames = Vec::new();

    for _ in 0..200 {
        if rng.gen_bool(0.05) {
            engine.apply(EngineCommand::ResetCalibration);
        }
        let boxes = random_frame(&mut rng);
        frames.push(engine.annotate(&boxes));
    }
    frames
}

#[test]
fn replay_is_deterministic() {
    assert_eq!(replay(7), replay(7));
}

#[test]
fn one_reference_per_calibration() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut engine = MeasureEngine::new(FixedAdvance::default());
    let mut references_this_epoch = 0;

    for _ in 0..500 {
        if rng.gen_bool(0.05) {
            engine.apply(EngineCommand::ResetCalibration);
            references_this_epoch = 0;
        }

        let was_set = engine.calibration().is_set();
        let boxes = random_frame(&mut rng);
        let instructions = engine.annotate(&boxes);

        if boxes.is_empty() {
            assert_eq!(instructions.len(), 1);
            assert_eq!(instructions[0].kind, AnnotationKind::NoDetections);
            assert_eq!(engine.calibration().is_set(), was_set);
            continue;
        }

        assert_eq!(instructions.len(), boxes.len());
        for (idx, instruction) in instructions.iter().enumerate() {
            if instruction.is_reference() {
                references_this_epoch += 1;
                assert_eq!(idx, 0);
                assert!(!was_set);
            } else {
                assert!(instruction.is_measured());
            }
        }
        assert_eq!(references_this_epoch, 1);

        if let AnnotationKind::Reference { width_px } = instructions[0].kind {
            assert_eq!(width_px, boxes[0].width_px());
            assert_eq!(engine.calibration().reference_pixel_width(), Some(width_px));
        }
    }
}

#[test]
fn degenerate_boxes_do_not_deserialize() {
    let zero_width = r#"{"x1":10,"y1":10,"x2":10,"y2":5,"confidence":0.9,"class_id":0}"#;
    let inverted = r#"{"x1":50,"y1":10,"x2":20,"y2":40,"confidence":0.9,"class_id":0}"#;

    assert!(serde_json::from_str::<DetectedBox>(zero_width).is_err());
    assert!(serde_json::from_str::<DetectedBox>(inverted).is_err());
}

#[test]
fn deserialized_boxes_keep_first_wins() {
    let json = r#"[
        {"x1":0,"y1":0,"x2":100,"y2":40,"confidence":0.9,"class_id":0},
        {"x1":10,"y1":10,"x2":210,"y2":60,"confidence":0.8,"class_id":2}
    ]"#;
    let boxes: Vec<DetectedBox> = serde_json::from_str(json).unwrap();
    assert_eq!(boxes[1].class_id(), 2);

    let mut calibration = CalibrationState::new(5.0);
    let instructions = annotate(&boxes, &mut calibration, &FixedAdvance::default());

    assert!(instructions[0].is_reference());
    assert_eq!(instructions[1].label, "10.0cm x 2.5cm");
    assert_eq!(calibration.reference_pixel_width(), Some(100));

    let round_trip: DetectedBox = serde_json::from_str(&serde_json::to_string(&boxes[0]).unwrap()).unwrap();
    assert_eq!(round_trip, boxes[0]);
}
