// Recorridos completos del editor sin DOM: bloques → grilla → selección → payload

use horarios_grid::models::day::Day;
use horarios_grid::models::grid::{CellKey, GridModel, LayoutMode};
use horarios_grid::models::options::OptionItem;
use horarios_grid::models::shift::{build_slots, ShiftDefinition, ShiftKey};
use horarios_grid::models::sync::{OccupiedResponse, SaveRequest, SelectionContext};
use horarios_grid::models::time::{format_hhmm, parse_hhmm};
use horarios_grid::services::api_error::decode_mutation;
use horarios_grid::state::{CascadeState, Level, LoadOutcome, SelectionState};

fn key(day: Day, hhmm: &str) -> CellKey {
    CellKey::new(day, parse_hhmm(hhmm).unwrap())
}

fn morning_selection() -> SelectionState {
    let weekday = build_slots(&ShiftDefinition::embedded(ShiftKey::Manana), 40);
    let saturday = build_slots(&ShiftDefinition::embedded(ShiftKey::Sabado), 40);
    let model = GridModel::for_editor(&weekday, Some(&saturday), LayoutMode::Unified);
    SelectionState::from_model(&model)
}

fn context() -> SelectionContext {
    SelectionContext::new("1", "3", "17", "manana")
}

#[test]
fn morning_shift_starts_with_two_blocks_and_a_break() {
    let definition = ShiftDefinition::from_hhmm(
        ShiftKey::Manana,
        "07:45",
        "12:45",
        &[("09:05", "09:15"), ("10:35", "10:45")],
    )
    .unwrap();
    let slots = build_slots(&definition, 40);

    let labels: Vec<(String, String, bool)> = slots
        .iter()
        .take(4)
        .map(|slot| (format_hhmm(slot.from), format_hhmm(slot.to), slot.is_break))
        .collect();
    assert_eq!(
        labels,
        vec![
            ("07:45".into(), "08:25".into(), false),
            ("08:25".into(), "09:05".into(), false),
            ("09:05".into(), "09:15".into(), true),
            ("09:15".into(), "09:55".into(), false),
        ]
    );
    assert!(slots.last().unwrap().to <= parse_hhmm("12:45").unwrap());
}

#[test]
fn double_click_leaves_nothing_to_save() {
    let mut selection = morning_selection();
    let cell = key(Day::Wednesday, "09:15");

    assert_eq!(selection.toggle(&cell), Some(true));
    assert_eq!(selection.toggle(&cell), Some(false));
    assert!(selection.delta().is_empty());
    assert!(!selection.is_dirty());
}

#[test]
fn break_rows_are_not_clickable() {
    let mut selection = morning_selection();
    assert_eq!(selection.toggle(&key(Day::Monday, "09:05")), None);
}

#[test]
fn server_snapshot_is_the_new_baseline() {
    let mut selection = morning_selection();
    selection.toggle(&key(Day::Friday, "11:25"));

    let body = r#"{"items":[{"dia":1,"inicio":"07:45","fin":"08:25","materia":"Didáctica"},
                            {"dia":6,"inicio":"09:00"}]}"#;
    let occupied = serde_json::from_str::<OccupiedResponse>(body).unwrap().into_slots();
    assert_eq!(selection.apply_server_snapshot(&occupied), 2);

    assert!(selection.delta().is_empty());
    assert_eq!(selection.selected_count(), 2);
}

#[test]
fn full_save_sends_the_whole_desired_set() {
    let mut selection = morning_selection();
    let occupied = serde_json::from_str::<OccupiedResponse>(r#"{"slots":[{"d":1,"hhmm":"07:45"}],"count":1}"#)
        .unwrap()
        .into_slots();
    selection.apply_server_snapshot(&occupied);
    selection.toggle(&key(Day::Tuesday, "08:25"));

    let request = SaveRequest::new(&context(), selection.save_items());
    let json = serde_json::to_value(&request).unwrap();
    assert_eq!(
        json["items"],
        serde_json::json!([
            {"dia": 1, "inicio": "07:45", "fin": "08:25"},
            {"dia": 2, "inicio": "08:25", "fin": "09:05"},
        ])
    );
    assert_eq!(json["turno"], "manana");
}

#[test]
fn rejected_save_restores_the_server_state() {
    let mut selection = morning_selection();
    let cell = key(Day::Thursday, "07:45");
    selection.toggle(&cell);

    let result = decode_mutation(200, Some("application/json"), r#"{"ok":false,"error":"Aula ocupada"}"#);
    let error = result.unwrap_err();
    assert_eq!(error.user_message(), "Aula ocupada");

    selection.clear_pending();
    assert!(!selection.flags(&cell).unwrap().desired());
    assert_eq!(selection.selected_count(), 0);
}

#[test]
fn rejected_toggle_reverts_only_the_clicked_cell() {
    let mut selection = morning_selection();
    let saved = key(Day::Monday, "07:45");
    let occupied = serde_json::from_str::<OccupiedResponse>(r#"{"slots":[{"d":1,"hhmm":"07:45"}]}"#)
        .unwrap()
        .into_slots();
    selection.apply_server_snapshot(&occupied);

    // quitar un bloque guardado y agregar otro, cada uno con su toggle
    assert_eq!(selection.toggle(&saved), Some(false));
    let added = key(Day::Tuesday, "08:25");
    assert_eq!(selection.toggle(&added), Some(true));

    let rejected = decode_mutation(200, Some("application/json"), r#"{"ok":false,"error":"Aula ocupada"}"#);
    assert!(rejected.is_err());
    assert!(selection.revert(&saved));

    let flags = selection.flags(&saved).unwrap();
    assert!(flags.occupied);
    assert!(!flags.is_pending());
    // el otro toggle sigue esperando su propia respuesta
    assert!(selection.flags(&added).unwrap().pending_add);
    assert_eq!(selection.selected_count(), 2);

    let accepted = decode_mutation(200, Some("application/json"), r#"{"ok":true,"count":2}"#).unwrap();
    assert_eq!(accepted.saved_count, 2);
    selection.commit(&added, true);
    assert!(!selection.is_dirty());
}

#[test]
fn program_without_plans_stops_the_cascade() {
    let programs = vec![OptionItem::new("1", "Profesorado de Historia"), OptionItem::new("2", "Profesorado de Inglés")];
    let mut cascade = CascadeState::new(programs, Vec::new());

    let request = cascade.user_change(Level::Program, "1").unwrap();
    assert_eq!(request.level, Level::Plan);

    let outcome = cascade.options_loaded(Level::Plan, request.generation, Vec::new());
    assert_eq!(outcome, LoadOutcome::Halted);
    for level in [Level::Plan, Level::Subject, Level::Shift] {
        assert!(!cascade.selector(level).enabled);
    }
    assert!(cascade.context().shift_key().is_none());
}

#[test]
fn single_subject_is_selected_automatically() {
    let programs = vec![OptionItem::new("1", "Profesorado de Historia")];
    let shifts = vec![OptionItem::new("manana", "Mañana"), OptionItem::new("tarde", "Tarde")];
    let mut cascade = CascadeState::new(programs, shifts);

    let plans = cascade.user_change(Level::Program, "1").unwrap();
    let subjects = match cascade.options_loaded(
        Level::Plan,
        plans.generation,
        vec![OptionItem::new("3", "Plan 2015"), OptionItem::new("4", "Plan 2023")],
    ) {
        LoadOutcome::Ready => cascade.user_change(Level::Plan, "3").unwrap(),
        other => panic!("se esperaba Ready, llegó {:?}", other),
    };

    let outcome = cascade.options_loaded(Level::Subject, subjects.generation, vec![OptionItem::new("17", "Didáctica")]);
    assert!(matches!(outcome, LoadOutcome::AutoSelected { ref value, next: None } if value == "17"));
    assert_eq!(cascade.value(Level::Subject), "17");
    assert!(cascade.selector(Level::Shift).enabled);
}
