//! Browser host: `<canvas>` elements driven through `CanvasRenderingContext2d`.

use crisp_core::kurbo::Affine;
use crisp_core::{
    Color, CompositeMode, DrawingContext, EventSource, Host, HostError, PointerMove, Surface,
};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, MouseEvent, Window};

fn js_reason(err: JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}

/// The page the demo runs in, plus the id of its visible canvas.
pub struct WebHost {
    window: Window,
    document: Document,
    canvas_id: String,
}

impl WebHost {
    pub fn new(canvas_id: &str) -> Result<Self, HostError> {
        let window =
            web_sys::window().ok_or_else(|| HostError::Context("no global `window`".into()))?;
        let document = window
            .document()
            .ok_or_else(|| HostError::Context("window has no document".into()))?;
        Ok(Self {
            window,
            document,
            canvas_id: canvas_id.to_string(),
        })
    }

    fn canvas(&self, id: &str) -> Option<HtmlCanvasElement> {
        self.document
            .get_element_by_id(id)?
            .dyn_into::<HtmlCanvasElement>()
            .ok()
    }
}

impl Host for WebHost {
    type Surface = WebSurface;
    type Context = WebContext;

    fn surface_by_id(&self, id: &str) -> Option<WebSurface> {
        self.canvas(id).map(WebSurface)
    }

    fn create_surface(&self) -> Result<WebSurface, HostError> {
        let element = self
            .document
            .create_element("canvas")
            .map_err(|e| HostError::Context(js_reason(e)))?;
        let canvas = element
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| HostError::Context("created element is not a canvas".into()))?;
        Ok(WebSurface(canvas))
    }

    fn device_scale_factor(&self) -> f64 {
        self.window.device_pixel_ratio()
    }
}

impl EventSource for WebHost {
    /// Listens for `mousemove` on the visible canvas. The listener is never
    /// removed; it lives as long as the page.
    fn on_pointer_move(&self, mut handler: Box<dyn FnMut(PointerMove)>) -> Result<(), HostError> {
        let canvas = self
            .canvas(&self.canvas_id)
            .ok_or_else(|| HostError::Event(format!("no canvas `{}`", self.canvas_id)))?;

        let closure = Closure::wrap(Box::new(move |event: MouseEvent| {
            handler(PointerMove::new(event.offset_x(), event.offset_y()));
        }) as Box<dyn FnMut(MouseEvent)>);
        canvas
            .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref())
            .map_err(|e| HostError::Event(js_reason(e)))?;
        closure.forget();
        Ok(())
    }
}

/// A `<canvas>` element, visible or detached.
#[derive(Clone)]
pub struct WebSurface(pub HtmlCanvasElement);

impl Surface for WebSurface {
    type Context = WebContext;

    fn size(&self) -> (u32, u32) {
        (self.0.width(), self.0.height())
    }

    fn set_size(&self, width: u32, height: u32) -> Result<(), HostError> {
        self.0.set_width(width);
        self.0.set_height(height);
        Ok(())
    }

    fn context(&self, opaque: bool) -> Result<WebContext, HostError> {
        let options = js_sys::Object::new();
        js_sys::Reflect::set(&options, &"alpha".into(), &JsValue::from_bool(!opaque))
            .map_err(|e| HostError::Context(js_reason(e)))?;

        let ctx = self
            .0
            .get_context_with_context_options("2d", &options)
            .map_err(|e| HostError::Context(js_reason(e)))?
            .ok_or_else(|| HostError::Context("2d context unavailable".into()))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| HostError::Context("not a CanvasRenderingContext2d".into()))?;
        Ok(WebContext(ctx))
    }
}

pub struct WebContext(pub CanvasRenderingContext2d);

impl DrawingContext for WebContext {
    type Surface = WebSurface;

    fn set_stroke_color(&mut self, color: Color) {
        self.0.set_stroke_style_str(&color.to_hex());
    }

    fn set_fill_color(&mut self, color: Color) {
        self.0.set_fill_style_str(&color.to_hex());
    }

    fn set_line_width(&mut self, width: f64) {
        self.0.set_line_width(width);
    }

    fn begin_path(&mut self) {
        self.0.begin_path();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.0.move_to(x, y);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.0.line_to(x, y);
    }

    fn stroke(&mut self) {
        self.0.stroke();
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.0.fill_rect(x, y, width, height);
    }

    fn set_transform(&mut self, transform: Affine) -> Result<(), HostError> {
        let [a, b, c, d, e, f] = transform.as_coeffs();
        self.0.set_transform(a, b, c, d, e, f).map_err(|err| HostError::Draw {
            op: "setTransform",
            reason: js_reason(err),
        })
    }

    fn set_composite_mode(&mut self, mode: CompositeMode) -> Result<(), HostError> {
        self.0
            .set_global_composite_operation(mode.as_css())
            .map_err(|err| HostError::Draw {
                op: "globalCompositeOperation",
                reason: js_reason(err),
            })
    }

    fn draw_image(&mut self, source: &WebSurface, x: f64, y: f64) -> Result<(), HostError> {
        self.0
            .draw_image_with_html_canvas_element(&source.0, x, y)
            .map_err(|err| HostError::Draw {
                op: "drawImage",
                reason: js_reason(err),
            })
    }
}
