// ============================================================================
// DAY - Día de la semana con codificación canónica 1..=6
// ============================================================================
// El servidor mezcla "lu".."sa", nombres completos y enteros.
// Internamente siempre se usa el entero (1 = lunes .. 6 = sábado).
// ============================================================================

use std::fmt;
use serde::{Deserialize, Serialize};
use crate::utils::text::fold_key;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "DayRepr", into = "u8")]
pub enum Day {
    Monday = 1,
    Tuesday = 2,
    Wednesday = 3,
    Thursday = 4,
    Friday = 5,
    Saturday = 6,
}

impl Day {
    pub const WEEKDAYS: [Day; 5] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
    ];

    pub const ALL: [Day; 6] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
        Day::Saturday,
    ];

    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn from_number(number: u8) -> Option<Self> {
        Day::ALL.get(usize::from(number).checked_sub(1)?).copied()
    }

    pub fn abbrev(self) -> &'static str {
        match self {
            Day::Monday => "lu",
            Day::Tuesday => "ma",
            Day::Wednesday => "mi",
            Day::Thursday => "ju",
            Day::Friday => "vi",
            Day::Saturday => "sa",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Day::Monday => "Lunes",
            Day::Tuesday => "Martes",
            Day::Wednesday => "Miércoles",
            Day::Thursday => "Jueves",
            Day::Friday => "Viernes",
            Day::Saturday => "Sábado",
        }
    }

    /// Acepta "3", "mi", "miercoles", "Miércoles"...
    pub fn parse(value: &str) -> Option<Self> {
        let folded = fold_key(value);
        if let Ok(number) = folded.parse::<u8>() {
            return Self::from_number(number);
        }

        let prefix: String = folded.chars().take(2).collect();
        Day::ALL.into_iter().find(|day| day.abbrev() == prefix)
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl From<Day> for u8 {
    fn from(day: Day) -> Self {
        day.number()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DayRepr {
    Number(u8),
    Text(String),
}

impl TryFrom<DayRepr> for Day {
    type Error = String;

    fn try_from(repr: DayRepr) -> Result<Self, Self::Error> {
        match repr {
            DayRepr::Number(n) => Day::from_number(n).ok_or_else(|| format!("día fuera de rango: {n}")),
            DayRepr::Text(s) => Day::parse(&s).ok_or_else(|| format!("día desconocido: {s:?}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_encodings() {
        assert_eq!(Day::parse("lu"), Some(Day::Monday));
        assert_eq!(Day::parse("Miércoles"), Some(Day::Wednesday));
        assert_eq!(Day::parse("sabado"), Some(Day::Saturday));
        assert_eq!(Day::parse("4"), Some(Day::Thursday));
        assert_eq!(Day::parse("7"), None);
        assert_eq!(Day::parse("domingo"), None);
    }

    #[test]
    fn test_serde_emits_integer_and_accepts_text() {
        assert_eq!(serde_json::to_string(&Day::Tuesday).unwrap(), "2");
        let from_text: Day = serde_json::from_str("\"vi\"").unwrap();
        let from_number: Day = serde_json::from_str("5").unwrap();
        assert_eq!(from_text, Day::Friday);
        assert_eq!(from_number, Day::Friday);
        assert!(serde_json::from_str::<Day>("0").is_err());
    }
}
