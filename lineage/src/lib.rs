//! Family-tree canvas engine for the LifeBridge genealogy studio.
//!
//! This crate is compiled to WebAssembly and runs in the browser, and is also
//! linked natively by the server for the shared member model and the AI
//! intake boundary. It owns the working set of family members, lays them out
//! in generation rows, maintains the pan/zoom viewport, persists the working
//! set to client-local storage, and renders the result to a 2D canvas. The
//! host page only wires DOM events to the engine and calls the server for
//! AI-driven parsing.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level engine and testable [`engine::EngineCore`] |
//! | [`member`] | Family members and the in-memory working set |
//! | [`layout`] | Generational graph layout (rows, orphans, connector curves) |
//! | [`viewport`] | Pan/zoom transform and coordinate conversions |
//! | [`gesture`] | Gesture state machine driving the viewport |
//! | [`hit`] | Hit-testing member cards |
//! | [`intake`] | Coercing untrusted AI output into members |
//! | [`storage`] | Client-local persistence of the working set |
//! | [`render`] | Scene rendering (browser only) |
//! | [`consts`] | Shared numeric constants (zoom limits, card sizes, etc.) |

pub mod consts;
pub mod engine;
pub mod gesture;
pub mod hit;
pub mod intake;
pub mod layout;
pub mod member;
#[cfg(feature = "browser")]
pub mod render;
pub mod storage;
pub mod viewport;

/// Initialize console logging and the panic hook for the WASM target.
#[cfg(feature = "browser")]
pub fn init_logging() {
    if console_log::init_with_level(log::Level::Debug).is_err() {
        return;
    }
    console_error_panic_hook::set_once();
    log::info!("lineage logging initialized");
}
