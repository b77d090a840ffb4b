// ============================================================================
// GRID MODEL - Árbol estructural de la grilla (sin DOM)
// ============================================================================
// Las vistas solo recorren este modelo. Una única función arma la tabla a
// partir de columnas (día + bloques de ese día):
// - Split: tabla L..V con el turno elegido y, aparte, tabla de sábado
// - Unified: una sola tabla L..S; las filas son la unión de los límites de
//   ambos patrones y un bloque que cruza varios límites usa rowspan
// ============================================================================

use std::collections::BTreeSet;
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use crate::models::day::Day;
use crate::models::shift::Slot;
use crate::models::time::parse_hhmm;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    /// Tabla de L..V y tabla de sábado separadas
    Split,
    /// Una sola tabla L..S
    #[default]
    Unified,
}

/// Clave estructurada de una celda: (día, hora de inicio).
/// La hora de fin no forma parte de la clave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellKey {
    pub day: Day,
    pub from: NaiveTime,
}

impl CellKey {
    pub fn new(day: Day, from: NaiveTime) -> Self {
        Self { day, from }
    }

    /// Clave desde los atributos `data-day` / `data-from` de una celda
    pub fn from_data(day: &str, from: &str) -> Option<Self> {
        Some(Self::new(Day::parse(day)?, parse_hhmm(from)?))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridCell {
    /// Celda direccionable y clickeable
    Block { key: CellKey, to: NaiveTime, rowspan: usize },
    /// Recreo: etiqueta sin dirección, nunca clickeable
    Break { colspan: usize, rowspan: usize },
    /// Hueco donde ese día no tiene bloque
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridRow {
    pub from: NaiveTime,
    pub to: NaiveTime,
    /// Celdas emitidas en esta fila (las cubiertas por un rowspan se omiten)
    pub cells: Vec<GridCell>,
}

impl GridRow {
    pub fn is_break_row(&self) -> bool {
        matches!(self.cells.as_slice(), [GridCell::Break { .. }])
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridTable {
    pub days: Vec<Day>,
    pub rows: Vec<GridRow>,
}

impl GridTable {
    /// Armar una tabla a partir de los bloques de cada columna
    pub fn build(columns: &[(Day, &[Slot])]) -> Self {
        let days: Vec<Day> = columns.iter().map(|(day, _)| *day).collect();

        let bounds: Vec<NaiveTime> = columns
            .iter()
            .flat_map(|(_, slots)| slots.iter().flat_map(|slot| [slot.from, slot.to]))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let segments: Vec<(NaiveTime, NaiveTime)> = bounds.windows(2).map(|w| (w[0], w[1])).collect();

        // Por columna: índice de segmento hasta el que llega el último rowspan
        let mut covered_until = vec![0usize; columns.len()];
        let mut rows = Vec::new();

        for (index, &(from, to)) in segments.iter().enumerate() {
            let mut cells = Vec::new();
            let mut all_breaks = true;
            let mut break_span = None;
            let mut any_covered = false;

            for (column, (day, slots)) in columns.iter().enumerate() {
                if covered_until[column] > index {
                    all_breaks = false;
                    any_covered = true;
                    continue;
                }

                let Some(slot) = slots.iter().find(|slot| slot.from == from) else {
                    all_breaks = false;
                    cells.push(GridCell::Empty);
                    continue;
                };

                let rowspan = segments[index..]
                    .iter()
                    .take_while(|(_, seg_to)| *seg_to <= slot.to)
                    .count()
                    .max(1);
                covered_until[column] = index + rowspan;

                if slot.is_break {
                    if break_span.is_some_and(|span| span != rowspan) {
                        all_breaks = false;
                    }
                    break_span = Some(rowspan);
                    cells.push(GridCell::Break { colspan: 1, rowspan });
                } else {
                    all_breaks = false;
                    cells.push(GridCell::Block {
                        key: CellKey::new(*day, slot.from),
                        to: slot.to,
                        rowspan,
                    });
                }
            }

            if !any_covered && cells.iter().all(|cell| *cell == GridCell::Empty) {
                // Hueco entre turnos: no se dibuja
                continue;
            }

            if all_breaks && cells.len() == columns.len() {
                let rowspan = break_span.unwrap_or(1);
                cells = vec![GridCell::Break { colspan: columns.len(), rowspan }];
            }

            rows.push(GridRow { from, to, cells });
        }

        Self { days, rows }
    }

    /// Celdas direccionables con su hora de fin
    pub fn addressable(&self) -> impl Iterator<Item = (CellKey, NaiveTime)> + '_ {
        self.rows.iter().flat_map(|row| {
            row.cells.iter().filter_map(|cell| match cell {
                GridCell::Block { key, to, .. } => Some((*key, *to)),
                _ => None,
            })
        })
    }
}

/// Grilla completa de una sesión: una o dos tablas
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridModel {
    pub tables: Vec<GridTable>,
}

impl GridModel {
    /// Grilla del editor: L..V con `weekday`, sábado opcional según `mode`
    pub fn for_editor(weekday: &[Slot], saturday: Option<&[Slot]>, mode: LayoutMode) -> Self {
        let mut columns: Vec<(Day, &[Slot])> = Day::WEEKDAYS.iter().map(|day| (*day, weekday)).collect();

        let tables = match (saturday, mode) {
            (None, _) => vec![GridTable::build(&columns)],
            (Some(saturday), LayoutMode::Unified) => {
                columns.push((Day::Saturday, saturday));
                vec![GridTable::build(&columns)]
            }
            (Some(saturday), LayoutMode::Split) => vec![
                GridTable::build(&columns),
                GridTable::build(&[(Day::Saturday, saturday)]),
            ],
        };

        Self { tables }
    }

    /// Grilla de solo lectura con los mismos bloques para todos los días
    pub fn uniform(slots: &[Slot], days: &[Day]) -> Self {
        let columns: Vec<(Day, &[Slot])> = days.iter().map(|day| (*day, slots)).collect();
        Self {
            tables: vec![GridTable::build(&columns)],
        }
    }

    pub fn addressable(&self) -> impl Iterator<Item = (CellKey, NaiveTime)> + '_ {
        self.tables.iter().flat_map(|table| table.addressable())
    }

    pub fn is_empty(&self) -> bool {
        self.tables.iter().all(|table| table.rows.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::shift::{build_slots, ShiftDefinition, ShiftKey};
    use crate::models::time::{format_hhmm, parse_hhmm};

    fn hm(value: &str) -> NaiveTime {
        parse_hhmm(value).unwrap()
    }

    fn slots(key: ShiftKey) -> Vec<Slot> {
        build_slots(&ShiftDefinition::embedded(key), 40)
    }

    #[test]
    fn test_cell_key_from_data_attributes() {
        assert_eq!(CellKey::from_data("2", "08:25"), Some(CellKey::new(Day::Tuesday, hm("08:25"))));
        assert_eq!(CellKey::from_data("7", "08:25"), None);
        assert_eq!(CellKey::from_data("1", ""), None);
        assert_eq!(LayoutMode::default(), LayoutMode::Unified);
    }

    #[test]
    fn test_every_rendered_cell_resolves_from_its_attributes() {
        let model = GridModel::for_editor(&slots(ShiftKey::Tarde), Some(&slots(ShiftKey::Sabado)), LayoutMode::Unified);
        let mut count = 0;
        for (key, _) in model.addressable() {
            let (day, from) = (key.day.number().to_string(), format_hhmm(key.from));
            assert_eq!(CellKey::from_data(&day, &from), Some(key));
            count += 1;
        }
        assert!(count > 0);
    }

    #[test]
    fn test_split_weekday_table_has_one_row_per_slot() {
        let morning = slots(ShiftKey::Manana);
        let grid = GridModel::for_editor(&morning, None, LayoutMode::Split);
        let table = &grid.tables[0];

        assert_eq!(table.days, Day::WEEKDAYS.to_vec());
        assert_eq!(table.rows.len(), morning.len());

        // Recreo: una sola celda que ocupa los 5 días, sin dirección
        let recess = &table.rows[2];
        assert!(recess.is_break_row());
        assert_eq!(recess.cells, vec![GridCell::Break { colspan: 5, rowspan: 1 }]);

        let first = &table.rows[0];
        assert_eq!(first.cells.len(), 5);
        assert_eq!(
            first.cells[1],
            GridCell::Block { key: CellKey::new(Day::Tuesday, hm("07:45")), to: hm("08:25"), rowspan: 1 }
        );
    }

    #[test]
    fn test_split_with_saturday_adds_second_table() {
        let morning = slots(ShiftKey::Manana);
        let saturday = slots(ShiftKey::Sabado);
        let grid = GridModel::for_editor(&morning, Some(&saturday), LayoutMode::Split);

        assert_eq!(grid.tables.len(), 2);
        assert_eq!(grid.tables[1].days, vec![Day::Saturday]);
        // 7 bloques por día L..V + 7 del sábado
        assert_eq!(grid.addressable().count(), 5 * 7 + 7);
    }

    #[test]
    fn test_unified_uses_rowspan_for_saturday_blocks() {
        let morning = slots(ShiftKey::Manana);
        let saturday = slots(ShiftKey::Sabado);
        let grid = GridModel::for_editor(&morning, Some(&saturday), LayoutMode::Unified);

        assert_eq!(grid.tables.len(), 1);
        let table = &grid.tables[0];
        assert_eq!(table.days.len(), 6);

        // Todos los bloques de ambos patrones siguen siendo direccionables
        assert_eq!(grid.addressable().count(), 5 * 7 + 7);

        // El bloque 09:00–09:40 del sábado cruza el límite 09:05 y 09:15
        let saturday_cell = table
            .rows
            .iter()
            .flat_map(|row| row.cells.iter())
            .find(|cell| matches!(cell, GridCell::Block { key, .. } if key.day == Day::Saturday && key.from == hm("09:00")))
            .cloned();
        assert_eq!(
            saturday_cell,
            Some(GridCell::Block { key: CellKey::new(Day::Saturday, hm("09:00")), to: hm("09:40"), rowspan: 3 })
        );

        // El recreo de L..V coincide con un bloque de sábado: no se une en una sola celda
        let weekday_recess = table.rows.iter().find(|row| row.from == hm("09:05")).unwrap();
        assert!(!weekday_recess.is_break_row());
    }

    #[test]
    fn test_gap_between_patterns_is_not_drawn() {
        let a = vec![Slot::block(hm("08:00"), hm("08:40"))];
        let b = vec![Slot::block(hm("09:00"), hm("09:40"))];
        let table = GridTable::build(&[(Day::Monday, &a), (Day::Saturday, &b)]);
        // 08:40–09:00 no pertenece a ningún bloque
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0].cells[1], GridCell::Empty);
    }

    #[test]
    fn test_uniform_read_only_grid() {
        let evening = slots(ShiftKey::Vespertino);
        let grid = GridModel::uniform(&evening, &Day::ALL);
        assert_eq!(grid.addressable().count(), 6 * 7);
        assert!(!grid.is_empty());
        assert!(GridModel::uniform(&[], &Day::ALL).is_empty());
    }
}
