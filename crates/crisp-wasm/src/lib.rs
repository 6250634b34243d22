//! WASM bridge for Crisp Lines: runs the demo on a page's `<canvas>`.
//!
//! Compiled via `wasm-pack build --target web`. From JavaScript:
//!
//! ```js
//! const demo = new CrispDemo("myCanvas");
//! ```
//!
//! The constructor paints the background, registers the `mousemove`
//! handler, and returns. The browser's event loop drives everything after.

mod host;

pub use host::{WebContext, WebHost, WebSurface};

use crisp_core::{ConfigError, SceneConfig, SharedRenderer};
use std::sync::Once;
use wasm_bindgen::prelude::*;

/// A running demo. Keeping it alive is optional: the event listener owns
/// the renderer too.
#[wasm_bindgen]
pub struct CrispDemo {
    renderer: SharedRenderer<WebHost>,
}

#[wasm_bindgen]
impl CrispDemo {
    /// Start the demo on the canvas with id `canvas_id`. `config_json`
    /// optionally overrides colors, frame, and cursor length.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str, config_json: Option<String>) -> Result<CrispDemo, JsValue> {
        init_logging();

        let config = parse_config(config_json.as_deref()).map_err(to_js)?;
        let host = WebHost::new(canvas_id).map_err(to_js)?;
        let renderer = crisp_core::start(&host, canvas_id, config).map_err(|err| {
            log::error!("setup failed: {err}");
            to_js(err)
        })?;

        Ok(Self { renderer })
    }

    /// The device pixel ratio captured at startup.
    #[wasm_bindgen(getter, js_name = scaleFactor)]
    pub fn scale_factor(&self) -> f64 {
        self.renderer.borrow().scale().get()
    }

    /// Line width in device pixels.
    #[wasm_bindgen(getter, js_name = lineWidth)]
    pub fn line_width(&self) -> u32 {
        let renderer = self.renderer.borrow();
        renderer.scaled_line_width(renderer.config().line_thickness)
    }
}

/// `None` or an empty string selects the built-in scene.
pub fn parse_config(json: Option<&str>) -> Result<SceneConfig, ConfigError> {
    match json.map(str::trim) {
        None | Some("") => Ok(SceneConfig::default()),
        Some(json) => SceneConfig::from_json(json),
    }
}

fn to_js(err: impl std::fmt::Display) -> JsValue {
    js_sys::Error::new(&err.to_string()).into()
}

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        console_error_panic_hook::set_once();
        // Another logger may already be installed by the embedding page.
        console_log::init_with_level(log::Level::Debug).ok();
    });
}
