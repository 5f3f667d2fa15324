// Raster Benchmarks
// Performance benchmarks for sprite, text, line and fill routines

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;
use vscreen::color::{colors, Color4u};
use vscreen::math::Vec2i;
use vscreen::raster;
use vscreen::resource::{Font, SpriteSheet, SpriteSheetMeta};
use vscreen::screen::{ColorBand, ColorMode, VirtualScreen};
use vscreen::BitmapImage;

/// Arcade sized screen used by every benchmark
fn create_test_screen() -> VirtualScreen {
    VirtualScreen::new(Vec2i::new(224, 256))
}

/// 8x4 sheet of 16x16 sprites with a checkerboard of transparent pixels
fn create_test_sheet() -> SpriteSheet {
    let size = Vec2i::new(128, 64);
    let pixels = (0..size.area())
        .map(|i| {
            if i % 3 == 0 {
                Color4u::TRANSPARENT
            } else {
                colors::GREEN
            }
        })
        .collect();
    let meta = SpriteSheetMeta {
        sheet_width: 8,
        sheet_height: 4,
        sprite_width: 16,
        sprite_height: 16,
    };
    SpriteSheet::new(BitmapImage::from_pixels(size, pixels), meta)
        .unwrap_or_else(|_| SpriteSheet::error_sheet())
}

/// Benchmark sprite blits, fully visible and clipped
fn bench_sprites(c: &mut Criterion) {
    let mut group = c.benchmark_group("sprites");
    let sheet = create_test_sheet();

    group.bench_function("visible_16x16", |b| {
        let mut screen = create_test_screen();
        b.iter(|| {
            raster::draw_sprite(&mut screen, &sheet, black_box(5), Vec2i::new(100, 100));
        });
    });

    group.bench_function("clipped_16x16", |b| {
        let mut screen = create_test_screen();
        b.iter(|| {
            raster::draw_sprite(&mut screen, &sheet, black_box(5), Vec2i::new(-8, 248));
        });
    });

    // One frame worth of invaders: 55 sprites
    group.bench_function("formation_55", |b| {
        let mut screen = create_test_screen();
        b.iter(|| {
            for row in 0..5 {
                for col in 0..11 {
                    let position = Vec2i::new(col * 18, 120 + row * 18);
                    raster::draw_sprite(&mut screen, &sheet, (row * 11 + col) as usize, position);
                }
            }
            black_box(screen.colors());
        });
    });

    group.finish();
}

/// Benchmark the banded color transform against full RGB
fn bench_color_modes(c: &mut Criterion) {
    let mut group = c.benchmark_group("color_modes");
    let sheet = create_test_sheet();

    for mode in [ColorMode::FullRgb, ColorMode::YAxisBanded, ColorMode::Bitmaps] {
        let id = BenchmarkId::from_parameter(format!("{:?}", mode));
        group.bench_with_input(id, &mode, |b, &mode| {
            let mut screen = create_test_screen();
            screen.set_color_mode(mode);
            screen.set_color_bands(&[
                ColorBand::new(32, colors::GREEN),
                ColorBand::new(200, colors::WHITE),
                ColorBand::new(255, colors::RED),
            ]);
            b.iter(|| {
                raster::draw_sprite(&mut screen, &sheet, 0, black_box(Vec2i::new(50, 100)));
            });
        });
    }

    group.finish();
}

/// Benchmark text, line and fill routines
fn bench_primitives(c: &mut Criterion) {
    let mut group = c.benchmark_group("primitives");
    let font = Font::error_font();

    group.bench_function("text_24_chars", |b| {
        let mut screen = create_test_screen();
        b.iter(|| {
            let text = black_box("SCORE<1> HI-SCORE SCORE");
            raster::draw_text(&mut screen, &font, text, Vec2i::new(0, 240));
        });
    });

    group.bench_function("line_diagonal", |b| {
        let mut screen = create_test_screen();
        b.iter(|| {
            let end = black_box(Vec2i::new(223, 255));
            raster::draw_line(&mut screen, Vec2i::ZERO, end, colors::WHITE);
        });
    });

    group.bench_function("fill_shade", |b| {
        let mut screen = create_test_screen();
        b.iter(|| raster::fill_shade(&mut screen, black_box(1)));
    });

    group.bench_function("clear", |b| {
        let mut screen = create_test_screen();
        b.iter(|| raster::clear(&mut screen));
    });

    group.finish();
}

criterion_group!(benches, bench_sprites, bench_color_modes, bench_primitives);
criterion_main!(benches);
