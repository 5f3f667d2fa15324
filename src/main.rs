// vscreen demo - draws into a few virtual screens inside a resizable window
//
// Sprite sheets and fonts are loaded from the asset directory named in
// vscreen.toml or VSCREEN_ASSETS. Missing assets fall back to the built-in
// error resources, so the demo runs without any files present.
// F12 captures every screen, Esc quits.

use vscreen::color::{colors, Color4u};
use vscreen::config::{GfxConfig, CONFIG_FILE};
use vscreen::display::{run_window, Scene};
use vscreen::math::Vec2i;
use vscreen::resource::{ResourceHandle, SpriteSheet, SpriteSheetMeta};
use vscreen::screen::{ColorBand, ColorMode, PositionMode, ScreenId};
use vscreen::{BitmapImage, GfxContext};

/// Environment variable overriding the asset root
const ASSETS_ENV: &str = "VSCREEN_ASSETS";

const WORLD_RESOLUTION: Vec2i = Vec2i::new(224, 256);
const INVADER: [&str; 8] = [
    "..#.....#..",
    "...#...#...",
    "..#######..",
    ".##.###.##.",
    "###########",
    "#.#######.#",
    "#.#.....#.#",
    "...##.##...",
];

/// Two frame invader animation built in memory
fn invader_sheet() -> SpriteSheet {
    let size = Vec2i::new(INVADER[0].len() as i32, INVADER.len() as i32);
    let mut pixels = Vec::with_capacity(size.area() as usize * 2);

    // Bitmap rows run bottom-up; frame 1 mirrors the legs
    for row in INVADER.iter().rev() {
        for frame in 0..2 {
            let cells: Vec<char> = if frame == 0 {
                row.chars().collect()
            } else {
                row.chars().rev().collect()
            };
            pixels.extend(cells.into_iter().map(|c| {
                if c == '#' {
                    colors::WHITE
                } else {
                    Color4u::TRANSPARENT
                }
            }));
        }
    }

    let image = BitmapImage::from_pixels(Vec2i::new(size.x * 2, size.y), pixels);
    let meta = SpriteSheetMeta {
        sheet_width: 2,
        sheet_height: 1,
        sprite_width: size.x,
        sprite_height: size.y,
    };
    SpriteSheet::new(image, meta).unwrap_or_else(|_| SpriteSheet::error_sheet())
}

#[derive(Default)]
struct Demo {
    world: Option<ScreenId>,
    hud: Option<ScreenId>,
    invader: Option<ResourceHandle>,
    alien: Option<ResourceHandle>,
    font: Option<ResourceHandle>,
}

impl Scene for Demo {
    fn setup(&mut self, gfx: &mut GfxContext) {
        let world = gfx.create_screen(WORLD_RESOLUTION);
        gfx.set_color_mode(ColorMode::YAxisBanded, world);
        gfx.set_color_bands(
            &[
                ColorBand::new(40, colors::GREEN),
                ColorBand::new(200, colors::WHITE),
                ColorBand::new(i32::MAX, colors::RED),
            ],
            world,
        );

        let hud = gfx.create_screen(Vec2i::new(112, 16));
        gfx.set_position_mode(PositionMode::TopLeft, hud);

        self.world = Some(world);
        self.hud = Some(hud);
        self.invader = Some(gfx.insert_sprite_sheet("invader", invader_sheet()));
        self.alien = Some(gfx.load_sprite_sheet("alien"));
        self.font = Some(gfx.load_font("arcade"));
    }

    fn draw(&mut self, gfx: &mut GfxContext, frame: u64) {
        let (Some(world), Some(hud), Some(invader), Some(alien), Some(font)) =
            (self.world, self.hud, self.invader, self.alien, self.font)
        else {
            return;
        };

        gfx.clear_screen(world);
        let step = (frame / 30) as usize;
        let sweep = (frame % 120) as i32;
        for row in 0..5 {
            for col in 0..8 {
                let position = Vec2i::new(12 + col * 24 + sweep / 4, 120 + row * 16);
                gfx.draw_sprite(position, invader, step % 2, world);
            }
        }
        gfx.draw_sprite(Vec2i::new(104, 16), alien, 0, world);
        gfx.draw_line(Vec2i::new(0, 8), Vec2i::new(223, 8), colors::WHITE, world);

        gfx.fill_shade(1, hud);
        gfx.draw_text(Vec2i::new(2, 2), &format!("FRAME {}", frame), font, hud);
    }

    fn clear_color(&self) -> Color4u {
        colors::JET
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut config = GfxConfig::load_or_default(CONFIG_FILE);
    if let Ok(root) = std::env::var(ASSETS_ENV) {
        config.assets.root = root.into();
    }

    run_window(config, Demo::default())
}
