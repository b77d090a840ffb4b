// ============================================================================
// GRID VIEW - Renderiza el GridModel como <table>
// ============================================================================
// Solo recorre el modelo: no decide qué celdas existen. Los estilos van
// inline para no pelear con las hojas de estilo de la página.
// ============================================================================

use std::collections::HashMap;
use wasm_bindgen::prelude::*;
use web_sys::Element;
use crate::dom::{append_child, clear_children, query_selector, set_attribute, set_class, set_style, set_text_content, ElementBuilder};
use crate::models::day::Day;
use crate::models::grid::{CellKey, GridCell, GridModel, GridTable};
use crate::models::sync::SlotDetail;
use crate::models::time::{format_hhmm, format_range};
use crate::state::selection_state::CellFlags;
use crate::utils::constants::{BLOCKS_COUNTER_SELECTOR, BREAK_LABEL, TIME_HEADER};

const STYLE_BASE: &str = "height: 46px; border-radius: 12px; text-align: center; vertical-align: middle; padding: 0; transition: background .12s ease, border-color .12s ease;";
const STYLE_CLICKABLE: &str = "background: #F7F4EE; border: 1px solid #E6E2D8; cursor: pointer;";
const STYLE_BREAK: &str = "background: #F4F1E9; border: 1px solid #E6E2D8; color: #6E6A60; font-style: italic; pointer-events: none;";
const STYLE_SELECTED: &str = "background: #E6F6EE; border: 1px solid #6DC597; cursor: pointer; box-shadow: inset 0 0 0 2px rgba(109,197,151,.25);";
const STYLE_PENDING_REMOVE: &str = "background: #FDF2F2; border: 1px dashed #E0A3A3; cursor: pointer;";
const STYLE_READ_ONLY: &str = "background: #FFFFFF; border: 1px solid #E6E2D8;";

fn render_header(days: &[Day]) -> Result<Element, JsValue> {
    let row = ElementBuilder::new("tr")?
        .child(ElementBuilder::new("th")?.class("hcell").text(TIME_HEADER).build())?;
    let row = days.iter().try_fold(row, |row, day| {
        row.child(ElementBuilder::new("th")?.class("hcell").text(day.label()).build())
    })?;
    Ok(ElementBuilder::new("thead")?.child(row.build())?.build())
}

fn render_block_cell(key: &CellKey, to: chrono::NaiveTime, rowspan: usize, clickable: bool) -> Result<Element, JsValue> {
    let style = format!("{} {}", STYLE_BASE, if clickable { STYLE_CLICKABLE } else { STYLE_READ_ONLY });
    Ok(ElementBuilder::new("td")?
        .class(if clickable { "cell is-selectable" } else { "cell" })
        .attr("data-day", &key.day.number().to_string())?
        .attr("data-from", &format_hhmm(key.from))?
        .attr("data-to", &format_hhmm(to))?
        .attr("style", &style)?
        .span("rowspan", rowspan)?
        .build())
}

fn render_table(table: &GridTable, clickable: bool, cells: &mut HashMap<CellKey, Element>) -> Result<Element, JsValue> {
    let body = ElementBuilder::new("tbody")?.build();

    for row in &table.rows {
        let tr = ElementBuilder::new("tr")?
            .class(if row.is_break_row() { "row is-break" } else { "row" })
            .child(
                ElementBuilder::new("td")?
                    .class("time-slot")
                    .text(&format_range(row.from, row.to))
                    .build(),
            )?
            .build();

        for cell in &row.cells {
            let td = match cell {
                GridCell::Block { key, to, rowspan } => {
                    let td = render_block_cell(key, *to, *rowspan, clickable)?;
                    cells.insert(*key, td.clone());
                    td
                }
                GridCell::Break { colspan, rowspan } => ElementBuilder::new("td")?
                    .class("cell is-break")
                    .text(BREAK_LABEL)
                    .attr("style", &format!("{} {}", STYLE_BASE, STYLE_BREAK))?
                    .span("colspan", *colspan)?
                    .span("rowspan", *rowspan)?
                    .build(),
                GridCell::Empty => ElementBuilder::new("td")?.class("cell is-empty").build(),
            };
            append_child(&tr, &td)?;
        }
        append_child(&body, &tr)?;
    }

    Ok(ElementBuilder::new("table")?
        .class("grid-table")
        .child(render_header(&table.days)?)?
        .child(body)?
        .build())
}

/// Reemplaza el contenido de `host` con las tablas del modelo.
/// Devuelve el mapa CellKey → <td> de todas las celdas direccionables.
pub fn render_grid(host: &Element, model: &GridModel, clickable: bool) -> Result<HashMap<CellKey, Element>, JsValue> {
    clear_children(host);
    let mut cells = HashMap::new();
    for table in &model.tables {
        let element = render_table(table, clickable, &mut cells)?;
        append_child(host, &element)?;
    }
    Ok(cells)
}

fn render_detail(cell: &Element, detail: Option<&SlotDetail>) -> Result<(), JsValue> {
    clear_children(cell);
    let Some(detail) = detail else {
        return Ok(());
    };

    let lines = [
        ("cell-subject", detail.subject.clone()),
        ("cell-teacher", detail.teacher.clone()),
        ("cell-commission", detail.commission.as_ref().map(|c| format!("Com. {c}"))),
        ("cell-room", detail.room.as_ref().map(|r| format!("Aula {r}"))),
    ];

    for (class, text) in lines {
        if let Some(text) = text.filter(|t| !t.trim().is_empty()) {
            let line = ElementBuilder::new("div")?.class(class).text(&text).build();
            append_child(cell, &line)?;
        }
    }
    Ok(())
}

/// Pinta una celda del editor según sus flags
pub fn paint_cell(cell: &Element, flags: CellFlags, detail: Option<&SlotDetail>) -> Result<(), JsValue> {
    let desired = flags.desired();
    set_class(cell, "is-selected", desired)?;
    set_class(cell, "is-occupied", flags.occupied)?;
    set_class(cell, "is-pending", flags.is_pending())?;

    let style = if desired {
        STYLE_SELECTED
    } else if flags.pending_remove {
        STYLE_PENDING_REMOVE
    } else {
        STYLE_CLICKABLE
    };
    set_attribute(cell, "style", &format!("{} {}", STYLE_BASE, style))?;
    render_detail(cell, detail.filter(|_| desired))
}

/// Pinta un ítem en una grilla de solo lectura
pub fn paint_item(cell: &Element, detail: &SlotDetail) -> Result<(), JsValue> {
    set_class(cell, "has-item", true)?;
    set_style(cell, "background", "#E6F6EE")?;
    render_detail(cell, Some(detail))
}

/// Contador de bloques seleccionados (si la página lo tiene)
pub fn update_counter(count: usize) {
    match query_selector(BLOCKS_COUNTER_SELECTOR) {
        Ok(Some(counter)) => set_text_content(&counter, &count.to_string()),
        Ok(None) => {}
        Err(e) => log::warn!("⚠️ [GRID] Contador no disponible: {:?}", e),
    }
}
