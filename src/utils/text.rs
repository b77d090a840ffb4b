// ============================================================================
// TEXT - Normalización de textos que llegan del servidor o del HTML
// ============================================================================

/// Minúsculas, sin espacios en los bordes y sin tildes ("Mañana" → "manana")
pub fn fold_key(value: &str) -> String {
    value
        .trim()
        .chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'á' | 'à' | 'ä' | 'â' => 'a',
            'é' | 'è' | 'ë' | 'ê' => 'e',
            'í' | 'ì' | 'ï' | 'î' => 'i',
            'ó' | 'ò' | 'ö' | 'ô' => 'o',
            'ú' | 'ù' | 'ü' | 'û' => 'u',
            'ñ' => 'n',
            other => other,
        })
        .collect()
}

/// Recorta un texto a `max` caracteres respetando límites UTF-8
pub fn preview(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fold_key_strips_accents_and_case() {
        assert_eq!(fold_key("  Mañana "), "manana");
        assert_eq!(fold_key("Miércoles"), "miercoles");
        assert_eq!(fold_key("SÁBADO"), "sabado");
    }

    #[test]
    fn test_preview_is_char_based() {
        assert_eq!(preview("ñandú", 3), "ñan");
        assert_eq!(preview("ok", 200), "ok");
    }
}
