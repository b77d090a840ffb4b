// ============================================================================
// HORARIOS GRID - FRONTEND MVVM (RUST PURO + WASM)
// ============================================================================
// Arquitectura:
// - Views: funciones que escriben DOM (sin lógica)
// - ViewModels: eventos, requests y sesiones de grilla
// - Services: comunicación con la API
// - State: State Management con Rc<RefCell> (selección, cascada, guardado)
// - Models: bloques, turnos, grilla y formatos del servidor
// ============================================================================

pub mod models;
pub mod services;
pub mod viewmodels;
pub mod state;
pub mod dom;
pub mod views;
pub mod utils;
pub mod config;
pub mod app;

use std::cell::RefCell;
use wasm_bindgen::prelude::*;
use crate::app::App;
use crate::config::CONFIG;

// Instancia global de la App (una por página)
thread_local! {
    static APP: RefCell<Option<App>> = const { RefCell::new(None) };
}

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let level = if CONFIG.is_logging_enabled() {
        log::Level::Debug
    } else {
        log::Level::Warn
    };
    wasm_logger::init(wasm_logger::Config::new(level));
    log::info!("🚀 Horarios Grid - Rust Puro + MVVM ({})", CONFIG.environment);

    mount_app()
}

fn mount_app() -> Result<(), JsValue> {
    let mut app = App::new(CONFIG.with_page_overrides());
    app.mount()?;
    APP.with(|cell| {
        if let Some(mut previous) = cell.borrow_mut().replace(app) {
            previous.unmount();
        }
    });
    Ok(())
}

/// Desmonta la app (llamable desde JavaScript antes de reemplazar el DOM)
#[wasm_bindgen]
pub fn unmount() {
    APP.with(|cell| {
        if let Some(mut app) = cell.borrow_mut().take() {
            app.unmount();
        }
    });
}

/// Vuelve a montar sobre el DOM actual (p. ej. después de un swap de HTML)
#[wasm_bindgen]
pub fn remount() -> Result<(), JsValue> {
    unmount();
    mount_app()
}
