// ============================================================================
// OPTIONS - Opciones de los selects en cascada (carreras, planes, materias...)
// ============================================================================

use serde::{Deserialize, Serialize};

/// Opción ya normalizada: id como texto (es lo que termina en `<option value>`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionItem {
    pub id: String,
    pub label: String,
}

impl OptionItem {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(i64),
    Text(String),
}

impl RawId {
    fn into_string(self) -> String {
        match self {
            RawId::Number(n) => n.to_string(),
            RawId::Text(s) => s,
        }
    }
}

#[derive(Deserialize)]
struct RawOption {
    #[serde(alias = "value")]
    id: RawId,
    #[serde(default)]
    nombre: Option<String>,
    #[serde(default)]
    label: Option<String>,
    #[serde(default)]
    text: Option<String>,
}

impl RawOption {
    fn into_item(self) -> OptionItem {
        let id = self.id.into_string();
        let label = self
            .nombre
            .or(self.label)
            .or(self.text)
            .unwrap_or_else(|| id.clone());
        OptionItem { id, label }
    }
}

/// Respuesta de cualquier endpoint de opciones.
/// Según el endpoint la lista viene en `results`, `items`, `planes` o `turnos`.
#[derive(Deserialize, Default)]
pub struct OptionsResponse {
    #[serde(default)]
    results: Option<Vec<RawOption>>,
    #[serde(default)]
    items: Option<Vec<RawOption>>,
    #[serde(default)]
    planes: Option<Vec<RawOption>>,
    #[serde(default)]
    turnos: Option<Vec<RawOption>>,
}

impl OptionsResponse {
    pub fn into_items(self) -> Vec<OptionItem> {
        self.results
            .or(self.items)
            .or(self.planes)
            .or(self.turnos)
            .unwrap_or_default()
            .into_iter()
            .map(RawOption::into_item)
            .filter(|item| !item.id.is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Vec<OptionItem> {
        serde_json::from_str::<OptionsResponse>(json).unwrap().into_items()
    }

    #[test]
    fn test_results_with_numeric_ids() {
        let items = parse(r#"{"results":[{"id":3,"nombre":"Profesorado de Historia"}]}"#);
        assert_eq!(items, vec![OptionItem::new("3", "Profesorado de Historia")]);
    }

    #[test]
    fn test_items_with_label() {
        let items = parse(r#"{"items":[{"id":"12","label":"Didáctica I"},{"id":"","label":"x"}]}"#);
        assert_eq!(items, vec![OptionItem::new("12", "Didáctica I")]);
    }

    #[test]
    fn test_planes_key_and_missing_label() {
        let items = parse(r#"{"planes":[{"id":5}]}"#);
        assert_eq!(items, vec![OptionItem::new("5", "5")]);
    }

    #[test]
    fn test_turnos_use_value_as_id() {
        let items = parse(r#"{"turnos":[{"value":"manana","label":"Mañana"}]}"#);
        assert_eq!(items, vec![OptionItem::new("manana", "Mañana")]);
    }

    #[test]
    fn test_unknown_shape_is_empty() {
        assert!(parse(r#"{"otra":[]}"#).is_empty());
    }
}
