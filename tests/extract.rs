use gridbit::export::{self, SaveTarget, EXPORT_FILENAME};
use gridbit::sampler::{self, SampleSettings};
use gridbit::{Extractor, GeometryState, PointerEvent, Session, Vec2};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;

#[derive(Default)]
struct Saved(Option<(String, Vec<u8>)>);

impl SaveTarget for Saved {
    fn save(&mut self, bytes: &[u8], filename: &str) -> std::io::Result<()> {
        self.0 = Some((filename.to_string(), bytes.to_vec()));
        Ok(())
    }
}

fn png_bytes(img: &RgbaImage) -> Vec<u8> {
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png).unwrap();
    bytes
}

/// 8x8 sprite on a 2px grid: a white "L" in the top-left 4x4 cells.
fn sprite() -> RgbaImage {
    RgbaImage::from_fn(8, 8, |x, y| {
        let (cx, cy) = (x / 2, y / 2);
        let on = (cx == 0 && cy < 3) || (cy == 2 && cx < 3);
        if on { Rgba([240, 240, 240, 255]) } else { Rgba([20, 30, 40, 255]) }
    })
}

#[test]
fn white_and_black_four_by_four() {
    let geometry = GeometryState::new(Vec2::new(0.0, 0.0), Vec2::new(2.0, 2.0), 2.0);

    let white = RgbaImage::from_pixel(4, 4, Rgba([255, 255, 255, 255]));
    let out = sampler::sample(&white, &geometry);
    assert_eq!((out.width(), out.height()), (2, 2));
    assert!((0..2).all(|y| (0..2).all(|x| out.value(x, y) == 255)));

    let black = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255]));
    let out = sampler::sample(&black, &geometry);
    assert_eq!((out.width(), out.height()), (2, 2));
    assert_eq!(out.count_on(), 0);
}

#[test]
fn extractor_recovers_sprite() {
    let geometry = GeometryState::new(Vec2::new(0.0, 0.0), Vec2::new(2.0, 2.0), 1.0);
    let out = Extractor::new(geometry).extract(&DynamicImage::ImageRgba8(sprite()));
    assert_eq!(out.to_text(), "#...\n#...\n###.\n....\n");

    let inverted = Extractor::new(geometry).with_invert(true).extract(&DynamicImage::ImageRgba8(sprite()));
    assert_eq!(inverted.to_text(), ".###\n.###\n...#\n####\n");
}

#[test_log::test]
fn session_fits_grid_and_exports_bitmap() {
    let mut session = Session::new();
    assert_eq!(session.load_bytes(&png_bytes(&sprite())).unwrap(), (8, 8));

    // default 8x8 cells cover the whole sprite with one mostly dark cell
    assert_eq!((session.binary().width(), session.binary().height()), (1, 1));

    // click at the top-left corner, then shift-drag from four cells out back to two
    session.set_scale(2.0);
    session.pointer_down(PointerEvent::new(0.0, 0.0, false));
    session.pointer_up();
    session.set_cell_size(4.0, 4.0);
    session.pointer_down(PointerEvent::new(16.0, 16.0, true));
    session.pointer_move(PointerEvent::new(8.0, 8.0, true));
    session.pointer_up();
    assert_eq!(session.geometry().cell_size(), Vec2::new(2.0, 2.0));
    assert_eq!(session.binary().to_text(), "#...\n#...\n###.\n....\n");

    let mut saved = Saved::default();
    assert!(session.export(&mut saved).unwrap());
    let (name, bytes) = saved.0.unwrap();
    assert_eq!(name, EXPORT_FILENAME);

    let bmp = image::load_from_memory_with_format(&bytes, ImageFormat::Bmp).unwrap().to_rgba8();
    assert_eq!(bmp.dimensions(), (8, 8));
    assert_eq!(bmp.get_pixel(1, 5).0, [255, 255, 255, 255]);
    assert_eq!(bmp.get_pixel(7, 7).0, [0, 0, 0, 255]);
}

#[test]
fn resize_drag_scenario() {
    let mut session = Session::new();
    session.set_scale(1.0);
    session.set_origin(10.0, 10.0);
    session.set_cell_size(5.0, 5.0);

    session.pointer_down(PointerEvent::new(20.0, 20.0, true));
    session.pointer_move(PointerEvent::new(30.0, 20.0, true));
    assert_eq!(session.geometry().cell_size(), Vec2::new(10.0, 5.0));
}

#[test]
fn fractional_grid_stays_in_bounds() {
    let img = RgbaImage::from_fn(37, 23, |x, y| Rgba([(x * 7) as u8, (y * 11) as u8, 90, 255]));
    for cell in [1.3, 2.7, 3.49, 5.5] {
        for origin in [0.0, 0.6, 4.25, 36.9] {
            let out = sampler::sample_grid(
                &img,
                Vec2::new(origin, origin / 2.0),
                Vec2::new(cell, cell * 1.1),
                &SampleSettings::default(),
            );
            assert!(out.width() > 0 && out.height() > 0);
        }
    }
}

#[test]
fn nothing_loaded_exports_nothing() {
    let session = Session::new();
    let mut saved = Saved::default();
    assert!(!session.export(&mut saved).unwrap());
    assert!(saved.0.is_none());
    assert!(!export::export(session.binary(), 4, &mut saved).unwrap());
}
