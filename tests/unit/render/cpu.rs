use super::*;

#[test]
fn background_fills_the_frame() {
    let frame = PixmapSurface::new(8, 6, Rgba8::rgb(0, 0, 255)).unwrap().finish();
    assert_eq!(frame.width, 8);
    assert_eq!(frame.height, 6);
    assert_eq!(frame.data.len(), 8 * 6 * 4);
    assert_eq!(frame.pixel(0, 0), Some([0, 0, 255, 255]));
    assert_eq!(frame.pixel(7, 5), Some([0, 0, 255, 255]));
    assert_eq!(frame.pixel(8, 0), None);
}

#[test]
fn zero_sized_surface_is_rejected() {
    assert!(PixmapSurface::new(0, 10, Rgba8::BLACK).is_err());
    assert!(PixmapSurface::new(70_000, 10, Rgba8::BLACK).is_err());
}

#[test]
fn transformed_rect_lands_at_position() {
    let mut s = PixmapSurface::new(20, 20, Rgba8::TRANSPARENT).unwrap();
    let paint = Paint {
        transform: Affine::translate((10.0, 10.0)),
        ..Paint::solid(Rgba8::rgb(255, 0, 0))
    };
    s.fill_rect(Rect::new(0.0, 0.0, 5.0, 5.0), &paint);
    let frame = s.finish();

    assert_eq!(frame.pixel(12, 12), Some([255, 0, 0, 255]));
    assert_eq!(frame.pixel(2, 2), Some([0, 0, 0, 0]));
}

#[test]
fn later_draws_cover_earlier_ones() {
    let mut s = PixmapSurface::new(10, 10, Rgba8::WHITE).unwrap();
    s.fill_rect(Rect::new(0.0, 0.0, 10.0, 10.0), &Paint::solid(Rgba8::rgb(0, 255, 0)));
    s.fill_circle(Point::new(5.0, 5.0), 4.0, &Paint::solid(Rgba8::BLACK));
    let frame = s.finish();
    assert_eq!(frame.pixel(5, 5), Some([0, 0, 0, 255]));
    assert_eq!(frame.pixel(0, 0), Some([0, 255, 0, 255]));
}

#[test]
fn opacity_reduces_alpha() {
    let mut s = PixmapSurface::new(4, 4, Rgba8::TRANSPARENT).unwrap();
    let paint = Paint {
        opacity: 0.5,
        ..Paint::solid(Rgba8::WHITE)
    };
    s.fill_rect(Rect::new(0.0, 0.0, 4.0, 4.0), &paint);
    let [_, _, _, a] = s.finish().pixel(1, 1).unwrap();
    assert!((120..=135).contains(&a), "alpha was {a}");
}

#[test]
fn image_is_stretched_into_dest() {
    let mut s = PixmapSurface::new(10, 10, Rgba8::TRANSPARENT).unwrap();
    let image = ImageData::solid(2, 2, Rgba8::rgb(255, 0, 0));
    s.draw_image(&image, Rect::new(0.0, 0.0, 10.0, 10.0), &Paint::solid(Rgba8::WHITE));
    let frame = s.finish();
    assert_eq!(frame.pixel(5, 5).map(|p| p[3]), Some(255));
    assert!(frame.pixel(5, 5).unwrap()[0] > 200);
}

#[test]
fn text_is_counted_not_drawn() {
    let mut s = PixmapSurface::new(4, 4, Rgba8::TRANSPARENT).unwrap();
    s.fill_text("hi", Point::ZERO, &TextStyle::default(), &Paint::solid(Rgba8::WHITE));
    assert_eq!(s.skipped_text(), 1);
    assert_eq!(s.finish().pixel(0, 0), Some([0, 0, 0, 0]));
}
