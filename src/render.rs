//! Canvas-2D rendering
//!
//! Each cached sprite buffer is uploaded once into an offscreen canvas so
//! per-frame drawing is plain `drawImage` compositing. Rendering only
//! reads `GameState`; it never mutates it.

use wasm_bindgen::{Clamped, JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, ImageData};

use crate::consts::*;
use crate::sim::state::{FruitKind, GameState, ObjectKind};
use crate::sprites::{Sprite, SpriteAtlas};

/// Upload a sprite buffer into a fresh offscreen canvas
fn sprite_canvas(document: &Document, sprite: &Sprite) -> Result<HtmlCanvasElement, JsValue> {
    let canvas: HtmlCanvasElement = document.create_element("canvas")?.dyn_into()?;
    canvas.set_width(sprite.width as u32);
    canvas.set_height(sprite.height as u32);

    let ctx: CanvasRenderingContext2d = canvas
        .get_context("2d")?
        .ok_or_else(|| JsValue::from_str("no 2d context"))?
        .dyn_into()?;

    let data = ImageData::new_with_u8_clamped_array_and_sh(
        Clamped(sprite.pixels.as_slice()),
        sprite.width as u32,
        sprite.height as u32,
    )?;
    ctx.put_image_data(&data, 0.0, 0.0)?;
    Ok(canvas)
}

/// Renders the play field onto the game canvas
pub struct CanvasRenderer {
    ctx: CanvasRenderingContext2d,
    backdrop: HtmlCanvasElement,
    basket: HtmlCanvasElement,
    bomb: HtmlCanvasElement,
    fruits: Vec<HtmlCanvasElement>,
}

impl CanvasRenderer {
    pub fn new(
        document: &Document,
        canvas: &HtmlCanvasElement,
        atlas: &SpriteAtlas,
    ) -> Result<Self, JsValue> {
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("no 2d context"))?
            .dyn_into()?;

        let fruits = FruitKind::ALL
            .iter()
            .map(|kind| sprite_canvas(document, atlas.fruit(*kind)))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            ctx,
            backdrop: sprite_canvas(document, &atlas.backdrop)?,
            basket: sprite_canvas(document, &atlas.basket)?,
            bomb: sprite_canvas(document, &atlas.bomb)?,
            fruits,
        })
    }

    fn object_canvas(&self, kind: ObjectKind) -> &HtmlCanvasElement {
        match kind {
            ObjectKind::Fruit(fruit) => {
                let idx = FruitKind::ALL
                    .iter()
                    .position(|k| *k == fruit)
                    .unwrap_or_default();
                &self.fruits[idx]
            }
            ObjectKind::Bomb => &self.bomb,
        }
    }

    /// Draw one frame: backdrop, basket, falling objects, HUD
    pub fn render(&self, state: &GameState, fps: u32, show_fps: bool) -> Result<(), JsValue> {
        let ctx = &self.ctx;

        ctx.draw_image_with_html_canvas_element(&self.backdrop, 0.0, 0.0)?;
        ctx.draw_image_with_html_canvas_element(
            &self.basket,
            f64::from(state.player.pos.x),
            f64::from(state.player.pos.y),
        )?;
        for obj in &state.objects {
            ctx.draw_image_with_html_canvas_element(
                self.object_canvas(obj.kind),
                f64::from(obj.pos.x),
                f64::from(obj.pos.y),
            )?;
        }

        self.draw_hud(state, fps, show_fps)
    }

    fn draw_hud(&self, state: &GameState, fps: u32, show_fps: bool) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        ctx.set_font("bold 24px Arial");
        ctx.set_fill_style_str("white");
        ctx.set_stroke_style_str("black");
        ctx.set_line_width(3.0);

        let score = format!("Score: {}", state.score);
        let level = format!("Level: {}", state.level);
        let fruits = format!(
            "Fruits: {}/{}",
            state.fruits_collected,
            FRUITS_PER_LEVEL
        );

        ctx.stroke_text(&score, 10.0, 30.0)?;
        ctx.fill_text(&score, 10.0, 30.0)?;

        let right = f64::from(FIELD_WIDTH) - 120.0;
        ctx.stroke_text(&level, right, 30.0)?;
        ctx.fill_text(&level, right, 30.0)?;
        ctx.stroke_text(&fruits, right, 60.0)?;
        ctx.fill_text(&fruits, right, 60.0)?;

        if show_fps {
            let text = format!("FPS: {fps}");
            ctx.stroke_text(&text, 10.0, 60.0)?;
            ctx.fill_text(&text, 10.0, 60.0)?;
        }

        Ok(())
    }
}
