// Canvas glue for the particle field: owns the overlay <canvas> and its
// 2d context, and draws whatever the simulation produced this frame.

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement};

use crate::field::{Connection, INDIGO};
use crate::particle::Particle;

const CANVAS_ID: &str = "bg-canvas";

pub struct Renderer {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
}

impl Renderer {
    // Builds the full-viewport overlay canvas, prepends it to <body> so it
    // stacks behind the page content, and grabs its 2d context.
    pub fn mount(document: &Document) -> Result<Renderer, JsValue> {
        let canvas = document
            .create_element("canvas")?
            .dyn_into::<HtmlCanvasElement>()?;
        canvas.set_id(CANVAS_ID);

        let style = canvas.style();
        style.set_property("position", "fixed")?;
        style.set_property("top", "0")?;
        style.set_property("left", "0")?;
        style.set_property("width", "100%")?;
        style.set_property("height", "100%")?;
        style.set_property("z-index", "0")?;
        // Overlay must never swallow clicks meant for the page
        style.set_property("pointer-events", "none")?;

        let body = document
            .body()
            .ok_or_else(|| JsValue::from_str("document has no body"))?;
        body.insert_before(&canvas, body.first_child().as_ref())?;

        let context = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()?;

        Ok(Renderer { canvas, context })
    }

    pub fn set_size(&self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }

    pub fn clear(&self, width: f64, height: f64) {
        self.context.clear_rect(0.0, 0.0, width, height);
    }

    pub fn draw_particles(&self, particles: &[Particle]) -> Result<(), JsValue> {
        for p in particles {
            self.context.begin_path();
            self.context
                .arc(p.pos[0], p.pos[1], p.size, 0.0, std::f64::consts::PI * 2.0)?;
            self.context.set_fill_style_str(&p.color.to_css_string());
            self.context.fill();
        }
        Ok(())
    }

    // Particle-to-particle lines are translucent white; lines running to
    // the pointer reuse the indigo accent.
    pub fn draw_connections(&self, lines: &[Connection]) {
        self.context.set_line_width(1.0);
        for line in lines {
            self.stroke_line(line, &format!("rgba(255, 255, 255, {:.4})", line.alpha));
        }
    }

    pub fn draw_pointer_links(&self, lines: &[Connection]) {
        self.context.set_line_width(1.0);
        for line in lines {
            let style = format!(
                "rgba({}, {}, {}, {:.4})",
                INDIGO.r, INDIGO.g, INDIGO.b, line.alpha
            );
            self.stroke_line(line, &style);
        }
    }

    fn stroke_line(&self, line: &Connection, style: &str) {
        self.context.set_stroke_style_str(style);
        self.context.begin_path();
        self.context.move_to(line.from[0], line.from[1]);
        self.context.line_to(line.to[0], line.to[1]);
        self.context.stroke();
    }
}
