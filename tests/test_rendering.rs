extern crate bvr_dimensions;

use image::{Rgb, RgbImage};
use bvr_dimensions::common::{
    AnnotationInstruction, AnnotationKind, FixedAdvance, PixelRect, MEASURED_COLOUR, REFERENCE_COLOUR, REFERENCE_LABEL,
};
use bvr_dimensions::rendering::{find_system_font, FontMeasure, FrameRenderer};

const BACKDROP: Rgb<u8> = Rgb([40, 40, 40]);

fn reference_instruction() -> AnnotationInstruction {
    AnnotationInstruction::boxed(
        AnnotationKind::Reference { width_px: 50 },
        PixelRect::new(10, 40, 60, 90),
        REFERENCE_COLOUR,
        REFERENCE_LABEL.to_string(),
        &FixedAdvance::default(),
    )
}

#[test]
fn render_leaves_frame_untouched() {
    let frame = RgbImage::from_pixel(200, 120, BACKDROP);
    let mut renderer = FrameRenderer::new(None);

    let annotated = renderer.render(&frame, &[reference_instruction()]);

    assert!(frame.pixels().all(|p| *p == BACKDROP));
    assert_ne!(annotated, frame);
    assert_eq!(annotated.dimensions(), frame.dimensions());
}

#[test]
fn outline_and_label_background() {
    let frame = RgbImage::from_pixel(200, 120, BACKDROP);
    let mut renderer = FrameRenderer::new(None);

    let annotated = renderer.render(&frame, &[reference_instruction()]);

    // two pixel outline drawn inward
    assert_eq!(*annotated.get_pixel(10, 60), Rgb(REFERENCE_COLOUR));
    assert_eq!(*annotated.get_pixel(11, 60), Rgb(REFERENCE_COLOUR));
    assert_eq!(*annotated.get_pixel(12, 60), BACKDROP);
    assert_eq!(*annotated.get_pixel(59, 89), Rgb(REFERENCE_COLOUR));
    assert_eq!(*annotated.get_pixel(30, 60), BACKDROP);

    // label background spans (10, 15) to (137, 40)
    assert_eq!(*annotated.get_pixel(100, 20), Rgb([255, 255, 255]));
    assert_eq!(*annotated.get_pixel(136, 39), Rgb([255, 255, 255]));
    assert_eq!(*annotated.get_pixel(137, 20), BACKDROP);
    assert_eq!(*annotated.get_pixel(100, 14), BACKDROP);
}

#[test]
fn later_instructions_paint_over_earlier() {
    let frame = RgbImage::from_pixel(200, 120, BACKDROP);
    let mut renderer = FrameRenderer::new(None);

    let measured = AnnotationInstruction::boxed(
        AnnotationKind::Measured { width_cm: 1.0, height_cm: 1.0 },
        PixelRect::new(10, 40, 60, 90),
        MEASURED_COLOUR,
        "1.0cm x 1.0cm".to_string(),
        &FixedAdvance::default(),
    );

    let annotated = renderer.render(&frame, &[reference_instruction(), measured]);
    assert_eq!(*annotated.get_pixel(10, 60), Rgb(MEASURED_COLOUR));
}

#[test]
fn boxes_partly_outside_the_frame() {
    let frame = RgbImage::from_pixel(64, 64, BACKDROP);
    let mut renderer = FrameRenderer::new(None);

    let instruction = AnnotationInstruction::boxed(
        AnnotationKind::Reference { width_px: 100 },
        PixelRect::new(-20, 5, 80, 60),
        REFERENCE_COLOUR,
        REFERENCE_LABEL.to_string(),
        &FixedAdvance::default(),
    );

    let annotated = renderer.render(&frame, &[instruction]);
    assert_eq!(*annotated.get_pixel(30, 5), Rgb(REFERENCE_COLOUR));
}

#[test]
fn no_detections_without_font_draws_nothing() {
    let frame = RgbImage::from_pixel(120, 60, BACKDROP);
    let mut renderer = FrameRenderer::new(None);

    let notice = AnnotationInstruction::no_detections(&FixedAdvance::default());
    let annotated = renderer.render(&frame, &[notice]);

    assert_eq!(annotated, frame);
}

#[test]
fn label_text_drawn_with_font() {
    let font = match find_system_font() {
        Some(path) => FontMeasure::from_file(&path).unwrap(),
        None => return,
    };
    let frame = RgbImage::from_pixel(200, 120, BACKDROP);

    let instruction = AnnotationInstruction::boxed(
        AnnotationKind::Reference { width_px: 50 },
        PixelRect::new(10, 60, 60, 110),
        REFERENCE_COLOUR,
        REFERENCE_LABEL.to_string(),
        &font,
    );
    let background = instruction.label_background.unwrap();

    let mut renderer = FrameRenderer::new(Some(font));
    let annotated = renderer.render(&frame, &[instruction]);

    let dark_in_label = (background.x1..background.x2)
        .flat_map(|x| (background.y1..background.y2).map(move |y| (x, y)))
        .filter(|&(x, y)| x >= 0 && y >= 0)
        .any(|(x, y)| annotated.get_pixel(x as u32, y as u32)[0] < 128);
    assert!(dark_in_label);
}
