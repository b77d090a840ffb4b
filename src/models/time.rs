// ============================================================================
// TIME - Horas "HH:MM" sobre chrono::NaiveTime
// ============================================================================

use chrono::{NaiveTime, Timelike};

/// Parsear "07:45", "7:45" o "07:45:00" (el servidor devuelve ambos formatos)
pub fn parse_hhmm(value: &str) -> Option<NaiveTime> {
    let mut parts = value.trim().split(':');
    let hours = parts.next()?;
    let minutes = parts.next()?;

    if hours.is_empty() || hours.len() > 2 || minutes.len() != 2 {
        return None;
    }

    let hours: u32 = hours.parse().ok()?;
    let minutes: u32 = minutes.parse().ok()?;
    NaiveTime::from_hms_opt(hours, minutes, 0)
}

pub fn format_hhmm(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

/// Minutos desde medianoche
pub fn to_minutes(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}

/// Inversa de `to_minutes`; `None` si pasa de 23:59
pub fn from_minutes(minutes: u32) -> Option<NaiveTime> {
    NaiveTime::from_hms_opt(minutes / 60, minutes % 60, 0)
}

/// Rango legible "07:45 – 08:25"
pub fn format_range(from: NaiveTime, to: NaiveTime) -> String {
    format!("{} – {}", format_hhmm(from), format_hhmm(to))
}

/// Serde para campos `NaiveTime` en formato "HH:MM"
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_hhmm(*time))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_hhmm(&raw)
            .ok_or_else(|| de::Error::custom(format!("hora inválida: {raw:?}")))
    }

    pub mod option {
        use chrono::NaiveTime;
        use serde::{Deserialize, Deserializer};

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<NaiveTime>, D::Error> {
            let raw = Option::<String>::deserialize(deserializer)?;
            Ok(raw.as_deref().and_then(super::super::parse_hhmm))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_server_formats() {
        let expected = NaiveTime::from_hms_opt(7, 45, 0);
        assert_eq!(parse_hhmm("07:45"), expected);
        assert_eq!(parse_hhmm("7:45"), expected);
        assert_eq!(parse_hhmm("07:45:00"), expected);
        assert_eq!(parse_hhmm(" 07:45 "), expected);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!(parse_hhmm(""), None);
        assert_eq!(parse_hhmm("0745"), None);
        assert_eq!(parse_hhmm("25:00"), None);
        assert_eq!(parse_hhmm("07:5"), None);
        assert_eq!(parse_hhmm("ab:cd"), None);
    }

    #[test]
    fn test_minutes_conversion() {
        let t = parse_hhmm("18:10").unwrap();
        assert_eq!(to_minutes(t), 1090);
        assert_eq!(from_minutes(1090), Some(t));
        assert_eq!(from_minutes(24 * 60), None);
    }

    #[test]
    fn test_format_range() {
        let from = parse_hhmm("7:45").unwrap();
        let to = parse_hhmm("8:25").unwrap();
        assert_eq!(format_range(from, to), "07:45 – 08:25");
    }
}
