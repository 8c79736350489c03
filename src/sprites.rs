//! Procedural sprite and backdrop painting
//!
//! All art is generated once at startup into RGBA buffers and cached in a
//! [`SpriteAtlas`]; none of it affects gameplay. Each painter is a pure
//! function of its inputs - the backdrop additionally takes a seed so a
//! given session always paints the same sky.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::*;
use crate::settings::QualityPreset;
use crate::sim::state::{FruitKind, ObjectKind};

/// RGBA color
pub type Color = [u8; 4];

const BASKET_WEAVE: Color = [0xFF, 0xD7, 0x00, 0xFF];
const BASKET_TRIM: Color = [0x59, 0x43, 0x00, 0xFF];
const LEAF_GREEN: Color = [0x32, 0xCD, 0x32, 0xFF];
const STRAWBERRY_RED: Color = [0xFF, 0x32, 0x32, 0xFF];
const APPLE_RED: Color = [0xFF, 0x00, 0x00, 0xFF];
const ORANGE_ORANGE: Color = [0xFF, 0xA5, 0x00, 0xFF];
const BANANA_YELLOW: Color = [0xFF, 0xE1, 0x35, 0xFF];
const SEED_YELLOW: Color = [0xFF, 0xE1, 0x35, 0xFF];
const MELON_FLESH: Color = [0xFF, 0x6B, 0x6B, 0xFF];
const MELON_RIND: Color = [0x90, 0xEE, 0x90, 0xFF];
const BOMB_BODY: Color = [0x00, 0x00, 0x00, 0xFF];
const BOMB_FUSE: Color = [0x4A, 0x4A, 0x4A, 0xFF];
const BOMB_SPARK: Color = [0xFF, 0xD7, 0x00, 0xFF];
const BOMB_SHINE: Color = [0xFF, 0xFF, 0xFF, 0xFF];
const SKY_TOP: Color = [0x87, 0xCE, 0xEB, 0xFF];
const SKY_BOTTOM: Color = [0xE0, 0xF7, 0xFA, 0xFF];
const CLOUD_WHITE: Color = [0xFF, 0xFF, 0xFF, 0xCC];
const TRUNK_BROWN: Color = [0x8B, 0x45, 0x13, 0xFF];
const TREE_GREEN: Color = [0x22, 0x8B, 0x22, 0xFF];
const GRASS_GREEN: Color = [0x90, 0xEE, 0x90, 0xFF];

/// An RGBA8 pixel buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sprite {
    pub width: usize,
    pub height: usize,
    /// Row-major RGBA, `width * height * 4` bytes
    pub pixels: Vec<u8>,
}

impl Sprite {
    /// Fully transparent buffer
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width * height * 4],
        }
    }

    /// Source-over blend one pixel; out-of-bounds coordinates are ignored
    pub fn put(&mut self, x: i32, y: i32, color: Color) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let idx = (y as usize * self.width + x as usize) * 4;
        let src_a = color[3] as u32;
        if src_a == 0 {
            return;
        }
        if src_a == 255 {
            self.pixels[idx..idx + 4].copy_from_slice(&color);
            return;
        }
        let dst = &mut self.pixels[idx..idx + 4];
        let dst_a = dst[3] as u32;
        let out_a = src_a + dst_a * (255 - src_a) / 255;
        for c in 0..3 {
            let src_c = color[c] as u32;
            let dst_c = dst[c] as u32;
            let blended = (src_c * src_a + dst_c * dst_a * (255 - src_a) / 255) / out_a.max(1);
            dst[c] = blended.min(255) as u8;
        }
        dst[3] = out_a.min(255) as u8;
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Color) {
        for py in y..y + h {
            for px in x..x + w {
                self.put(px, py, color);
            }
        }
    }

    pub fn fill_circle(&mut self, cx: f32, cy: f32, r: f32, color: Color) {
        let (x0, x1) = ((cx - r).floor() as i32, (cx + r).ceil() as i32);
        let (y0, y1) = ((cy - r).floor() as i32, (cy + r).ceil() as i32);
        for py in y0..=y1 {
            for px in x0..=x1 {
                let dx = px as f32 + 0.5 - cx;
                let dy = py as f32 + 0.5 - cy;
                if dx * dx + dy * dy <= r * r {
                    self.put(px, py, color);
                }
            }
        }
    }

    /// Lower (dy >= 0) or upper half disc, y-down coordinates
    pub fn fill_half_circle(&mut self, cx: f32, cy: f32, r: f32, lower: bool, color: Color) {
        let (x0, x1) = ((cx - r).floor() as i32, (cx + r).ceil() as i32);
        let (y0, y1) = ((cy - r).floor() as i32, (cy + r).ceil() as i32);
        for py in y0..=y1 {
            for px in x0..=x1 {
                let dx = px as f32 + 0.5 - cx;
                let dy = py as f32 + 0.5 - cy;
                let in_half = if lower { dy >= 0.0 } else { dy <= 0.0 };
                if in_half && dx * dx + dy * dy <= r * r {
                    self.put(px, py, color);
                }
            }
        }
    }

    /// Band of a circle between `start` and `end` angles (radians,
    /// y-down screen convention; `end` may exceed 2π to express wrap)
    pub fn fill_ring(
        &mut self,
        cx: f32,
        cy: f32,
        r: f32,
        thickness: f32,
        start: f32,
        end: f32,
        color: Color,
    ) {
        use std::f32::consts::TAU;
        let outer = r + thickness / 2.0;
        let inner = r - thickness / 2.0;
        let (x0, x1) = ((cx - outer).floor() as i32, (cx + outer).ceil() as i32);
        let (y0, y1) = ((cy - outer).floor() as i32, (cy + outer).ceil() as i32);
        for py in y0..=y1 {
            for px in x0..=x1 {
                let dx = px as f32 + 0.5 - cx;
                let dy = py as f32 + 0.5 - cy;
                let dist = (dx * dx + dy * dy).sqrt();
                if dist < inner || dist > outer {
                    continue;
                }
                let mut angle = dy.atan2(dx);
                if angle < 0.0 {
                    angle += TAU;
                }
                if (angle >= start && angle <= end) || (angle + TAU >= start && angle + TAU <= end)
                {
                    self.put(px, py, color);
                }
            }
        }
    }

    pub fn fill_triangle(&mut self, a: (f32, f32), b: (f32, f32), c: (f32, f32), color: Color) {
        let edge = |p: (f32, f32), q: (f32, f32), x: f32, y: f32| {
            (q.0 - p.0) * (y - p.1) - (q.1 - p.1) * (x - p.0)
        };
        let x0 = a.0.min(b.0).min(c.0).floor() as i32;
        let x1 = a.0.max(b.0).max(c.0).ceil() as i32;
        let y0 = a.1.min(b.1).min(c.1).floor() as i32;
        let y1 = a.1.max(b.1).max(c.1).ceil() as i32;
        for py in y0..=y1 {
            for px in x0..=x1 {
                let x = px as f32 + 0.5;
                let y = py as f32 + 0.5;
                let e0 = edge(a, b, x, y);
                let e1 = edge(b, c, x, y);
                let e2 = edge(c, a, x, y);
                if (e0 >= 0.0 && e1 >= 0.0 && e2 >= 0.0) || (e0 <= 0.0 && e1 <= 0.0 && e2 <= 0.0) {
                    self.put(px, py, color);
                }
            }
        }
    }

    /// Stroke a quadratic curve by stamping discs along it
    pub fn stroke_quadratic(
        &mut self,
        p0: (f32, f32),
        ctrl: (f32, f32),
        p1: (f32, f32),
        width: f32,
        color: Color,
    ) {
        const STEPS: usize = 32;
        for i in 0..=STEPS {
            let t = i as f32 / STEPS as f32;
            let u = 1.0 - t;
            let x = u * u * p0.0 + 2.0 * u * t * ctrl.0 + t * t * p1.0;
            let y = u * u * p0.1 + 2.0 * u * t * ctrl.1 + t * t * p1.1;
            self.fill_circle(x, y, width / 2.0, color);
        }
    }
}

/// Paint the player's woven basket (80x80, transparent background)
pub fn paint_basket() -> Sprite {
    use std::f32::consts::PI;
    let mut sprite = Sprite::new(PLAYER_WIDTH as usize, PLAYER_HEIGHT as usize);

    // Handle: upper half ring
    sprite.fill_ring(40.0, 25.0, 30.0, 6.0, PI, 2.0 * PI, BASKET_TRIM);

    let basket_top = 35;
    let basket_height = 35;

    // Horizontal weave with shadow lines between the rows
    for (row, y) in (basket_top..basket_top + basket_height).step_by(6).enumerate() {
        sprite.fill_rect(5, y, 70, 4, BASKET_WEAVE);
        if row > 0 {
            sprite.fill_rect(5, y - 1, 70, 1, BASKET_TRIM);
        }
    }

    // Vertical stakes give the weave its texture
    for x in (8..75).step_by(12) {
        sprite.fill_rect(x, basket_top, 2, basket_height, BASKET_TRIM);
    }

    // Rim
    sprite.fill_rect(5, basket_top - 2, 70, 4, BASKET_TRIM);

    sprite
}

/// Paint one fruit variety (40x40, transparent background)
pub fn paint_fruit(kind: FruitKind) -> Sprite {
    use std::f32::consts::PI;
    let mut sprite = Sprite::new(OBJECT_WIDTH as usize, OBJECT_HEIGHT as usize);

    match kind {
        FruitKind::Strawberry => {
            sprite.fill_circle(20.0, 25.0, 15.0, STRAWBERRY_RED);
            sprite.fill_triangle((20.0, 8.0), (14.0, 16.0), (26.0, 16.0), LEAF_GREEN);
            // Ring of seeds
            for i in 0..8 {
                let angle = i as f32 / 8.0 * 2.0 * PI;
                let x = 20.0 + angle.cos() * 8.0;
                let y = 25.0 + angle.sin() * 8.0;
                sprite.fill_circle(x, y, 1.2, SEED_YELLOW);
            }
        }
        FruitKind::Apple => {
            sprite.fill_circle(20.0, 25.0, 15.0, APPLE_RED);
            sprite.fill_triangle((20.0, 8.0), (26.0, 16.0), (20.0, 14.0), LEAF_GREEN);
        }
        FruitKind::Orange => {
            sprite.fill_circle(20.0, 20.0, 15.0, ORANGE_ORANGE);
            sprite.fill_triangle((20.0, 3.0), (26.0, 10.0), (20.0, 8.0), LEAF_GREEN);
        }
        FruitKind::Banana => {
            // Curved body as a thick arc through the lower-right quadrant
            sprite.fill_ring(12.0, 10.0, 18.0, 8.0, 0.2 * PI, 0.8 * PI, BANANA_YELLOW);
            sprite.fill_circle(9.0, 28.0, 3.5, BANANA_YELLOW);
            sprite.fill_circle(30.0, 11.0, 3.0, BASKET_TRIM);
        }
        FruitKind::Watermelon => {
            sprite.fill_half_circle(20.0, 18.0, 15.0, true, MELON_FLESH);
            sprite.fill_ring(20.0, 18.0, 14.0, 4.0, 0.0, PI, MELON_RIND);
            for i in 0..5 {
                let x = 13.0 + i as f32 * 4.0;
                let y = 24.0 - (i % 2) as f32 * 4.0;
                sprite.fill_circle(x, y, 1.2, BOMB_BODY);
            }
        }
    }

    sprite
}

/// Paint the bomb (40x40, transparent background)
pub fn paint_bomb() -> Sprite {
    let mut sprite = Sprite::new(OBJECT_WIDTH as usize, OBJECT_HEIGHT as usize);

    sprite.fill_circle(20.0, 25.0, 12.0, BOMB_BODY);
    sprite.stroke_quadratic((20.0, 13.0), (25.0, 8.0), (30.0, 10.0), 2.0, BOMB_FUSE);
    // Spark: four-point star at the fuse tip
    sprite.fill_triangle((30.0, 3.0), (28.0, 10.0), (32.0, 10.0), BOMB_SPARK);
    sprite.fill_triangle((30.0, 15.0), (28.0, 8.0), (32.0, 8.0), BOMB_SPARK);
    sprite.fill_triangle((24.0, 9.0), (31.0, 7.0), (31.0, 11.0), BOMB_SPARK);
    sprite.fill_triangle((36.0, 9.0), (29.0, 7.0), (29.0, 11.0), BOMB_SPARK);
    // Shine highlight
    sprite.fill_circle(15.0, 20.0, 3.0, BOMB_SHINE);

    sprite
}

/// Channel-wise linear interpolation
fn lerp_color(a: Color, b: Color, t: f32) -> Color {
    let mut out = [0u8; 4];
    for c in 0..4 {
        out[c] = (a[c] as f32 + (b[c] as f32 - a[c] as f32) * t).round() as u8;
    }
    out
}

/// Paint the field backdrop: sky gradient, clouds, trees, grass band.
///
/// Cloud placement comes from the given seed; everything else is fixed.
pub fn paint_backdrop(width: usize, height: usize, seed: u64, quality: QualityPreset) -> Sprite {
    let mut sprite = Sprite::new(width, height);
    let w = width as f32;
    let h = height as f32;

    // Sky gradient, top to bottom
    for y in 0..height {
        let t = y as f32 / h;
        let color = lerp_color(SKY_TOP, SKY_BOTTOM, t);
        sprite.fill_rect(0, y as i32, width as i32, 1, color);
    }

    // Clouds in the upper half, three overlapping puffs each
    let mut rng = Pcg32::seed_from_u64(seed);
    for _ in 0..quality.cloud_count() {
        let x = rng.random_range(0.0..w);
        let y = rng.random_range(0.0..h / 2.0);
        let size = 30.0 + rng.random_range(0.0..50.0);
        sprite.fill_circle(x, y, size, CLOUD_WHITE);
        sprite.fill_circle(x + size * 0.5, y - size * 0.2, size * 0.7, CLOUD_WHITE);
        sprite.fill_circle(x - size * 0.5, y - size * 0.1, size * 0.6, CLOUD_WHITE);
    }

    // Evenly spaced trees above the grass line
    let trees = quality.tree_count();
    for i in 0..trees {
        let x = (i + 1) as f32 * w / (trees + 1) as f32;
        let y = h - 50.0;
        let size = 80.0;
        sprite.fill_rect(
            (x - size / 8.0) as i32,
            (y - size / 2.0) as i32,
            (size / 4.0) as i32,
            size as i32,
            TRUNK_BROWN,
        );
        sprite.fill_triangle(
            (x, y - size * 1.5),
            (x + size, y - size / 2.0),
            (x - size, y - size / 2.0),
            TREE_GREEN,
        );
        sprite.fill_triangle(
            (x, y - size * 1.2),
            (x + size * 0.8, y - size / 4.0),
            (x - size * 0.8, y - size / 4.0),
            TREE_GREEN,
        );
    }

    // Grass band with a gentle bulge toward the center
    for x in 0..width {
        let nx = 2.0 * (x as f32 / w) - 1.0;
        let top = h - 30.0 - 20.0 * (1.0 - nx * nx);
        sprite.fill_rect(x as i32, top as i32, 1, (h - top) as i32 + 1, GRASS_GREEN);
    }

    sprite
}

/// All sprites the renderer needs, painted once at startup
#[derive(Debug, Clone)]
pub struct SpriteAtlas {
    pub basket: Sprite,
    pub bomb: Sprite,
    pub fruits: [Sprite; 5],
    pub backdrop: Sprite,
}

impl SpriteAtlas {
    pub fn generate(seed: u64, quality: QualityPreset) -> Self {
        Self {
            basket: paint_basket(),
            bomb: paint_bomb(),
            fruits: FruitKind::ALL.map(paint_fruit),
            backdrop: paint_backdrop(
                FIELD_WIDTH as usize,
                FIELD_HEIGHT as usize,
                seed,
                quality,
            ),
        }
    }

    pub fn fruit(&self, kind: FruitKind) -> &Sprite {
        let idx = FruitKind::ALL
            .iter()
            .position(|k| *k == kind)
            .unwrap_or_default();
        &self.fruits[idx]
    }

    /// Sprite for a falling object
    pub fn object_sprite(&self, kind: ObjectKind) -> &Sprite {
        match kind {
            ObjectKind::Fruit(fruit) => self.fruit(fruit),
            ObjectKind::Bomb => &self.bomb,
        }
    }
}
