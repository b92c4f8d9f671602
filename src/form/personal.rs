use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Gender as recorded on the cover sheet and for children.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Geschlecht {
    Maennlich,
    Weiblich,
    Divers,
}

impl Geschlecht {
    pub fn label(self) -> &'static str {
        match self {
            Geschlecht::Maennlich => "männlich",
            Geschlecht::Weiblich => "weiblich",
            Geschlecht::Divers => "divers",
        }
    }
}

impl fmt::Display for Geschlecht {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Geschlecht {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "m" | "maennlich" | "männlich" => Ok(Geschlecht::Maennlich),
            "w" | "weiblich" => Ok(Geschlecht::Weiblich),
            "d" | "divers" => Ok(Geschlecht::Divers),
            other => Err(format!("unknown gender `{}` (use m, w or d)", other)),
        }
    }
}

/// Identifying data of the patient (chapter 1).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Stammdaten {
    pub geschlecht: Option<Geschlecht>,
    pub alter: Option<u32>,
    pub chiffre: Option<String>,
    pub datum: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gender_parses_short_and_long_forms() {
        assert_eq!("m".parse::<Geschlecht>().unwrap(), Geschlecht::Maennlich);
        assert_eq!("Weiblich".parse::<Geschlecht>().unwrap(), Geschlecht::Weiblich);
        assert_eq!(" d ".parse::<Geschlecht>().unwrap(), Geschlecht::Divers);
        assert!("x".parse::<Geschlecht>().is_err());
    }

    #[test]
    fn gender_serializes_lowercase() {
        let json = serde_json::to_string(&Geschlecht::Maennlich).unwrap();
        assert_eq!(json, "\"maennlich\"");
    }
}
