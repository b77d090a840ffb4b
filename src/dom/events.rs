// ============================================================================
// EVENT HANDLING - Listeners sobre elementos del DOM
// ============================================================================
// El EventListener es dueño del Closure: mientras viva, el listener está
// registrado; al dropearlo se des-registra y se libera el closure.
// Nunca se usa closure.forget(): los viewmodels guardan sus listeners y
// los sueltan en el teardown. Los handlers toman Weak del viewmodel para
// no formar ciclos (viewmodel → listener → viewmodel).
// ============================================================================

use wasm_bindgen::prelude::*;
use wasm_bindgen::closure::Closure;
use web_sys::{Element, Event};

/// Listener registrado sobre un elemento
pub struct EventListener {
    element: Element,
    event_type: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

impl EventListener {
    /// Crear event listener genérico
    pub fn new<F>(element: &Element, event_type: &'static str, handler: F) -> Result<Self, JsValue>
    where
        F: FnMut(Event) + 'static,
    {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        element.add_event_listener_with_callback(event_type, closure.as_ref().unchecked_ref())?;
        Ok(Self {
            element: element.clone(),
            event_type,
            closure,
        })
    }
}

impl Drop for EventListener {
    fn drop(&mut self) {
        let callback = self.closure.as_ref().unchecked_ref();
        if let Err(e) = self.element.remove_event_listener_with_callback(self.event_type, callback) {
            log::warn!("⚠️ No se pudo quitar el listener {}: {:?}", self.event_type, e);
        }
    }
}

/// Helper para crear click handler simple
pub fn on_click<F>(element: &Element, handler: F) -> Result<EventListener, JsValue>
where
    F: FnMut(Event) + 'static,
{
    EventListener::new(element, "click", handler)
}

/// Helper para el evento "change" de un select
pub fn on_change<F>(element: &Element, handler: F) -> Result<EventListener, JsValue>
where
    F: FnMut(Event) + 'static,
{
    EventListener::new(element, "change", handler)
}

/// Elemento más cercano al target del evento que cumpla `selector`
/// (para listeners delegados en un contenedor)
pub fn closest_target(event: &Event, selector: &str) -> Option<Element> {
    event
        .target()?
        .dyn_into::<Element>()
        .ok()?
        .closest(selector)
        .ok()
        .flatten()
}
