//! Canvas 2D software surface.

use std::collections::HashMap;
use std::f64::consts::TAU;

use orrery_engine::components::mesh::Shading;
use orrery_engine::renderer::{DrawItem, QuadInstance};
use orrery_engine::{DiscInstance, FrameData, HostError, MaterialId, SceneGraph, Surface, ViewportSize};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlElement, Window};

/// Opacity of the meridian stroke that shows self-rotation.
const SPIN_BAND_ALPHA: f64 = 0.18;

/// Cached CSS state for one material.
struct MaterialStyle {
    css: String,
    opacity: f64,
}

pub struct CanvasSurface {
    window: Window,
    container: HtmlElement,
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    max_pixel_ratio: f64,
    pixel_ratio: f64,
    size: ViewportSize,
    styles: HashMap<MaterialId, MaterialStyle>,
}

impl CanvasSurface {
    /// Create a canvas and append it to `container`.
    pub fn create(
        window: &Window,
        container: HtmlElement,
        size: ViewportSize,
        max_pixel_ratio: f64,
    ) -> Result<Self, HostError> {
        let document = window
            .document()
            .ok_or_else(|| HostError::Surface("no document".into()))?;
        let canvas: HtmlCanvasElement = document
            .create_element("canvas")
            .map_err(|e| HostError::Surface(format!("{e:?}")))?
            .dyn_into()
            .map_err(|_| HostError::Surface("created element is not a canvas".into()))?;
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .map_err(|_| HostError::NoRenderingContext)?
            .ok_or(HostError::NoRenderingContext)?
            .dyn_into()
            .map_err(|_| HostError::NoRenderingContext)?;
        container
            .append_child(&canvas)
            .map_err(|e| HostError::Surface(format!("{e:?}")))?;

        let mut surface = Self {
            window: window.clone(),
            container,
            canvas,
            ctx,
            max_pixel_ratio,
            pixel_ratio: 1.0,
            size,
            styles: HashMap::new(),
        };
        if !size.is_degenerate() {
            surface.apply_size(size);
        }
        Ok(surface)
    }

    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }

    fn apply_size(&mut self, size: ViewportSize) {
        self.pixel_ratio = clamp_pixel_ratio(self.window.device_pixel_ratio(), self.max_pixel_ratio);
        self.size = size;
        self.canvas
            .set_width((size.width as f64 * self.pixel_ratio).round() as u32);
        self.canvas
            .set_height((size.height as f64 * self.pixel_ratio).round() as u32);
        let style = self.canvas.style();
        let _ = style.set_property("width", &format!("{}px", size.width));
        let _ = style.set_property("height", &format!("{}px", size.height));
        let _ = style.set_property("display", "block");
    }

    fn style(&self, material: f32) -> Option<&MaterialStyle> {
        self.styles.get(&MaterialId(material as u32))
    }

    fn draw_frame(&self, frame: &FrameData) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        let pr = self.pixel_ratio;
        ctx.set_transform(pr, 0.0, 0.0, pr, 0.0, 0.0)?;
        ctx.clear_rect(0.0, 0.0, frame.size.width as f64, frame.size.height as f64);

        if let Some(style) = frame.star_material.and_then(|m| self.styles.get(&m)) {
            ctx.set_global_alpha(style.opacity);
            ctx.set_fill_style_str(&style.css);
            for star in &frame.stars {
                let s = star.size as f64;
                ctx.fill_rect(star.x as f64 - s * 0.5, star.y as f64 - s * 0.5, s, s);
            }
        }

        ctx.set_line_width(1.0);
        for line in &frame.lines {
            let Some(style) = self.styles.get(&line.material) else {
                continue;
            };
            ctx.set_global_alpha(style.opacity);
            ctx.set_stroke_style_str(&style.css);
            ctx.begin_path();
            for (i, p) in line.points.iter().enumerate() {
                if i == 0 {
                    ctx.move_to(p.x as f64, p.y as f64);
                } else {
                    ctx.line_to(p.x as f64, p.y as f64);
                }
            }
            ctx.stroke();
        }

        for item in &frame.items {
            match item {
                DrawItem::Disc(disc) => self.draw_disc(disc)?,
                DrawItem::Quad(quad) => self.draw_quad(quad),
            }
        }
        ctx.set_global_alpha(1.0);
        Ok(())
    }

    fn draw_disc(&self, disc: &DiscInstance) -> Result<(), JsValue> {
        if disc.radius <= 0.0 {
            return Ok(());
        }
        let ctx = &self.ctx;
        let (x, y, r) = (disc.x as f64, disc.y as f64, disc.radius as f64);
        ctx.set_global_alpha(disc.alpha as f64);
        ctx.begin_path();
        ctx.arc(x, y, r, 0.0, TAU)?;

        if disc.is_shaded() {
            let hx = x + disc.highlight_x as f64 * r * 0.6;
            let hy = y + disc.highlight_y as f64 * r * 0.6;
            let gradient = ctx.create_radial_gradient(hx, hy, r * 0.05, x, y, r)?;
            gradient.add_color_stop(0.0, &css_rgb(disc.r, disc.g, disc.b))?;
            gradient.add_color_stop(1.0, &css_rgb(disc.shadow_r, disc.shadow_g, disc.shadow_b))?;
            ctx.set_fill_style_canvas_gradient(&gradient);
            ctx.fill();

            // Meridian: its width follows the spin phase.
            ctx.set_global_alpha(SPIN_BAND_ALPHA * disc.alpha as f64);
            ctx.set_stroke_style_str(&css_rgb(disc.shadow_r, disc.shadow_g, disc.shadow_b));
            ctx.begin_path();
            ctx.ellipse(x, y, (disc.spin as f64).cos().abs() * r, r, 0.0, 0.0, TAU)?;
            ctx.stroke();
        } else {
            let css = self
                .style(disc.material)
                .map(|s| s.css.clone())
                .unwrap_or_else(|| css_rgb(disc.r, disc.g, disc.b));
            ctx.set_fill_style_str(&css);
            ctx.fill();
        }
        Ok(())
    }

    fn draw_quad(&self, quad: &QuadInstance) {
        let Some(style) = self.style(quad.material) else {
            return;
        };
        let ctx = &self.ctx;
        ctx.set_global_alpha(style.opacity);
        ctx.set_fill_style_str(&style.css);
        ctx.begin_path();
        let [first, rest @ ..] = &quad.points;
        ctx.move_to(first[0] as f64, first[1] as f64);
        for p in rest {
            ctx.line_to(p[0] as f64, p[1] as f64);
        }
        ctx.close_path();
        ctx.fill();
    }
}

impl Surface for CanvasSurface {
    fn backend(&self) -> &'static str {
        "canvas2d"
    }

    fn prepare(&mut self, scene: &SceneGraph) {
        self.styles.clear();
        for (id, material) in scene.resources().materials() {
            let opacity = match material.shading {
                Shading::Points { .. } | Shading::Line | Shading::Unlit => material.opacity,
                Shading::Standard { .. } => 1.0,
            };
            self.styles.insert(
                id,
                MaterialStyle {
                    css: material.color.to_hex_string(),
                    opacity: opacity as f64,
                },
            );
        }
        log::info!("canvas prepared {} material styles", self.styles.len());
    }

    fn resize(&mut self, size: ViewportSize) {
        self.apply_size(size);
    }

    fn draw(&mut self, frame: &FrameData) {
        if let Err(e) = self.draw_frame(frame) {
            log::warn!("canvas draw failed: {e:?}");
        }
    }

    fn release(&mut self) {
        self.styles.clear();
        if self.canvas.parent_node().is_some() {
            if let Err(e) = self.container.remove_child(&self.canvas) {
                log::warn!("failed to detach canvas: {e:?}");
            }
        }
        log::info!("canvas released");
    }
}

/// Device pixel ratio capped at `max`. Non-finite or non-positive ratios fall back to 1.
pub fn clamp_pixel_ratio(device: f64, max: f64) -> f64 {
    if !(device.is_finite() && device > 0.0) {
        return 1.0;
    }
    device.min(max.max(1.0))
}

/// CSS `rgb()` for linear [0, 1] channels.
pub fn css_rgb(r: f32, g: f32, b: f32) -> String {
    let to_byte = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    format!("rgb({},{},{})", to_byte(r), to_byte(g), to_byte(b))
}
