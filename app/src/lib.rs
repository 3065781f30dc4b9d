//! # app
//!
//! Browser entry point binding the `engine` crate to a real page: finds the
//! shared canvas and every `data-webgl` tagged element, loads their media,
//! compiles the draw programs, and runs the frame loop.
//!
//! ## Modules
//!
//! - [`dom`] — tagged-element discovery and attribute parsing
//! - [`loader`] — async image/video loading and the URL-keyed texture cache
//! - [`mat`] — column-major 4x4 matrix helpers for the draw layer
//! - [`gfx`] — WebGL2 renderer: programs, quad geometry, textures, draw pass
//! - [`run`] — startup sequence, event wiring, and the animation loop

pub mod dom;
pub mod gfx;
pub mod loader;
pub mod mat;
pub mod run;

use wasm_bindgen::JsValue;
use wasm_bindgen::prelude::wasm_bindgen;

/// Module entry point, invoked by the wasm loader once the module is
/// instantiated. Logging and panic reporting come up first so startup
/// failures land in the console instead of vanishing.
#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    wasm_bindgen_futures::spawn_local(async {
        if let Err(err) = run::start().await {
            log::error!("startup failed: {err:?}");
        }
    });
    Ok(())
}
