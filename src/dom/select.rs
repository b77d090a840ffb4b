// ============================================================================
// SELECT HELPERS - Leer y rellenar <select>
// ============================================================================

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlOptionElement, HtmlSelectElement};
use crate::dom::{append_child, create_element};
use crate::models::options::OptionItem;

pub fn as_select(element: &Element) -> Option<HtmlSelectElement> {
    element.dyn_ref::<HtmlSelectElement>().cloned()
}

/// Valor actual del select ("" si no es un select)
pub fn select_value(element: &Element) -> String {
    as_select(element).map(|select| select.value()).unwrap_or_default()
}

/// Texto de la opción elegida ("" si no hay)
pub fn selected_text(element: &Element) -> String {
    let Some(select) = as_select(element) else {
        return String::new();
    };
    if select.value().is_empty() {
        return String::new();
    }
    select
        .selected_options()
        .item(0)
        .and_then(|item| item.dyn_into::<HtmlOptionElement>().ok())
        .map(|option| option.text())
        .unwrap_or_default()
}

/// Opciones renderizadas por el servidor (incluye el placeholder vacío)
pub fn read_options(element: &Element) -> Vec<OptionItem> {
    let Some(select) = as_select(element) else {
        return Vec::new();
    };
    let options = select.options();
    (0..options.length())
        .filter_map(|index| options.item(index))
        .filter_map(|item| item.dyn_into::<HtmlOptionElement>().ok())
        .map(|option| OptionItem::new(option.value(), option.text()))
        .collect()
}

/// Reemplaza las opciones: placeholder vacío + `options`, y fija valor y estado
pub fn fill_select(
    element: &Element,
    placeholder: &str,
    options: &[OptionItem],
    value: &str,
    enabled: bool,
) -> Result<(), JsValue> {
    let select = as_select(element).ok_or_else(|| JsValue::from_str("Element is not a select"))?;
    select.set_inner_html("");

    let empty = create_element("option")?;
    empty.set_attribute("value", "")?;
    empty.set_text_content(Some(placeholder));
    append_child(element, &empty)?;

    for item in options {
        let option = create_element("option")?;
        option.set_attribute("value", &item.id)?;
        option.set_text_content(Some(&item.label));
        append_child(element, &option)?;
    }

    select.set_value(value);
    select.set_disabled(!enabled);
    Ok(())
}
