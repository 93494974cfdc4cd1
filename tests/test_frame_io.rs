extern crate bvr_dimensions;

use image::{Rgb, RgbImage};
use bvr_dimensions::common::{AnnotationInstruction, AnnotationKind, FixedAdvance, PixelRect, REFERENCE_COLOUR};
use bvr_dimensions::data::FsAccess;
use bvr_dimensions::display::{DisplaySink, ImageDirSink};
use bvr_dimensions::frame_sources::{FrameSource, ImageDirSource};
use bvr_dimensions::rendering::find_system_font;

#[test]
fn image_dir_source_reads_in_name_order() {
    let dir = tempfile::tempdir().unwrap();
    RgbImage::from_pixel(4, 4, Rgb([0, 0, 200])).save(dir.path().join("b.png")).unwrap();
    RgbImage::from_pixel(6, 3, Rgb([200, 0, 0])).save(dir.path().join("a.png")).unwrap();
    std::fs::write(dir.path().join("notes.txt"), "not a frame").unwrap();

    let mut source = ImageDirSource::open(dir.path()).unwrap();
    assert_eq!(source.len(), 2);

    let first = source.next_frame().unwrap().unwrap();
    assert_eq!(first.frame_index, 0);
    assert_eq!(first.dimensions(), (6, 3));
    assert_eq!(*first.get_pixel(0, 0), Rgb([200, 0, 0]));

    let second = source.next_frame().unwrap().unwrap();
    assert_eq!(second.frame_index, 1);
    assert_eq!(second.dimensions(), (4, 4));

    assert!(source.next_frame().unwrap().is_none());
}

#[test]
fn image_dir_source_reports_bad_frames() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("broken.png"), b"not a png").unwrap();

    let mut source = ImageDirSource::open(dir.path()).unwrap();
    assert!(source.next_frame().is_err());
}

#[test]
fn missing_directory_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(ImageDirSource::open(&dir.path().join("absent")).is_err());
}

#[test]
fn image_dir_sink_writes_frames_and_sidecars() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("runs").join("measure");
    let mut sink = ImageDirSink::new(&out, true).unwrap();

    let frame = RgbImage::from_pixel(32, 16, Rgb([10, 20, 30]));
    let instructions = vec![AnnotationInstruction::boxed(
        AnnotationKind::Reference { width_px: 8 },
        PixelRect::new(2, 4, 10, 12),
        REFERENCE_COLOUR,
        "Reference".to_string(),
        &FixedAdvance::default(),
    )];

    sink.show(7, &frame, &instructions).unwrap();
    assert_eq!(sink.written(), 1);
    assert!(sink.poll_input().unwrap().is_empty());

    let written = image::open(out.join("frame_000007.png")).unwrap().to_rgb8();
    assert_eq!(written, frame);

    let json = std::fs::read_to_string(out.join("frame_000007.json")).unwrap();
    let decoded: Vec<AnnotationInstruction> = serde_json::from_str(&json).unwrap();
    assert_eq!(decoded, instructions);
}

#[test]
fn image_dir_sink_without_sidecars() {
    let dir = tempfile::tempdir().unwrap();
    let mut sink = ImageDirSink::new(dir.path(), false).unwrap();

    sink.show(0, &RgbImage::new(4, 4), &[AnnotationInstruction::no_detections(&FixedAdvance::default())]).unwrap();

    assert!(sink.frame_path(0, "png").exists());
    assert!(!sink.frame_path(0, "json").exists());
}

#[test]
fn sidecar_larger_than_write_buffer_is_complete() {
    let dir = tempfile::tempdir().unwrap();
    let mut sink = ImageDirSink::new(dir.path(), true).unwrap();

    let instructions: Vec<AnnotationInstruction> = (0..200)
        .map(|i| {
            AnnotationInstruction::boxed(
                AnnotationKind::Measured { width_cm: i as f64, height_cm: 1.5 },
                PixelRect::new(i, 20, i + 40, 60),
                REFERENCE_COLOUR,
                format!("{:.1}cm x 1.5cm", i as f64),
                &FixedAdvance::default(),
            )
        })
        .collect();

    sink.show(3, &RgbImage::new(8, 8), &instructions).unwrap();

    let json = std::fs::read_to_string(sink.frame_path(3, "json")).unwrap();
    assert!(json.len() > 8 * 1024);
    let decoded: Vec<AnnotationInstruction> = serde_json::from_str(&json).unwrap();
    assert_eq!(decoded, instructions);
}

#[test]
fn output_directories_are_created() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("a").join("b");

    FsAccess::create_directory(&nested).unwrap();
    assert!(nested.is_dir());
    // already present
    FsAccess::create_directory(&nested).unwrap();
}

#[test]
fn system_font_lookup_returns_a_file() {
    if let Some(path) = find_system_font() {
        assert!(path.is_file());
    }
}
