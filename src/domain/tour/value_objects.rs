use serde::{Deserialize, Serialize};

/// Physical difficulty rating of a tour
///
/// Stored in Postgres as the `difficulty` enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "difficulty", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Difficult,
}

impl sqlx::postgres::PgHasArrayType for Difficulty {
    fn array_type_info() -> sqlx::postgres::PgTypeInfo {
        sqlx::postgres::PgTypeInfo::with_name("_difficulty")
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Difficult => write!(f, "difficult"),
        }
    }
}

impl std::str::FromStr for Difficulty {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "difficult" => Ok(Difficulty::Difficult),
            other => Err(format!("Unknown difficulty: {}", other)),
        }
    }
}

/// A stop on a tour's itinerary, in the shape the map widget consumes
///
/// `coordinates` is `[longitude, latitude]`, matching the map provider's
/// lng/lat ordering. `day` is the 1-based itinerary day the stop belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub coordinates: [f64; 2],
    pub day: u32,
    pub description: String,
}

impl Location {
    pub fn longitude(&self) -> f64 {
        self.coordinates[0]
    }

    pub fn latitude(&self) -> f64 {
        self.coordinates[1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn difficulty_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&Difficulty::Difficult).unwrap(),
            "\"difficult\""
        );
    }

    #[test]
    fn difficulty_deserializes_lowercase() {
        let parsed: Difficulty = serde_json::from_str("\"medium\"").unwrap();
        assert_eq!(parsed, Difficulty::Medium);
    }

    #[test]
    fn difficulty_display() {
        assert_eq!(Difficulty::Easy.to_string(), "easy");
        assert_eq!(Difficulty::Difficult.to_string(), "difficult");
    }

    #[test]
    fn difficulty_parses_from_str() {
        assert_eq!("easy".parse::<Difficulty>().unwrap(), Difficulty::Easy);
        assert!("extreme".parse::<Difficulty>().is_err());
    }

    #[test]
    fn location_round_trips_through_json() {
        let loc = Location {
            coordinates: [-80.185942, 25.774772],
            day: 1,
            description: "Lummus Park Beach".to_string(),
        };

        let json = serde_json::to_string(&loc).unwrap();
        let back: Location = serde_json::from_str(&json).unwrap();

        assert_eq!(back, loc);
        assert_eq!(back.longitude(), -80.185942);
        assert_eq!(back.latitude(), 25.774772);
    }
}
