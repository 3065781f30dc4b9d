//! DOM-synchronized WebGL effects engine.
//!
//! This crate keeps a set of 3D meshes locked to companion DOM elements and
//! runs the per-frame interaction state machines that drive their shader
//! uniforms: slide navigation with rotational catch-up, pointer hover with
//! raycast tilt, and scroll-scrubbed progress. It is compiled to WebAssembly,
//! but everything except the thin [`engine::Engine`] wrapper is browser-free
//! and tested on the host. The host layer (the `app` crate) owns asset
//! loading, the WebGL draw calls, and the media playback side effects the
//! engine requests via [`engine::Action`]s.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level engine and testable [`engine::EngineCore`] |
//! | [`scene`] | Scene objects, geometry, and the ordered registry |
//! | [`slide`] | Slide navigation state machine and playback gating |
//! | [`hover`] | Pointer raycast and hover tilt state |
//! | [`scrub`] | Scroll-scrubbed progress |
//! | [`viewport`] | Perspective frustum parameters from canvas size |
//! | [`coords`] | DOM rect to world-space mapping, NDC conversion |
//! | [`uniforms`] | Per-material uniform store and the `data-opts` bag |
//! | [`effect`] | Effect-kind tags and configuration errors |
//! | [`math`] | Lerp with terminal snap, axis-angle orientation |
//! | [`consts`] | Shared numeric constants (camera depth, rates, epsilons) |

pub mod consts;
pub mod coords;
pub mod effect;
pub mod engine;
pub mod hover;
pub mod math;
pub mod scene;
pub mod scrub;
pub mod slide;
pub mod uniforms;
pub mod viewport;
