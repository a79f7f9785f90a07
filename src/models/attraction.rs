use serde::{Deserialize, Serialize};

/// Rating as reported by the points-of-interest provider: a score when the
/// provider ranks the place, the literal "N/A" otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Rating {
    Score(f64),
    Label(String),
}

impl Rating {
    pub fn not_available() -> Self {
        Rating::Label("N/A".to_string())
    }
}

impl std::fmt::Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rating::Score(score) => write!(f, "{}", score),
            Rating::Label(label) => write!(f, "{}", label),
        }
    }
}

/// A point of interest near the destination, enriched with image,
/// description, cost and distance metadata. Request-scoped, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attraction {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub distance_label: String,
    pub category: String,
    pub rating: Rating,
    pub cost_label: String,
    pub image_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_serializes_as_number_or_string() {
        assert_eq!(
            serde_json::to_string(&Rating::Score(7.0)).unwrap(),
            "7.0"
        );
        assert_eq!(
            serde_json::to_string(&Rating::not_available()).unwrap(),
            "\"N/A\""
        );
    }

    #[test]
    fn rating_displays_without_quotes() {
        assert_eq!(Rating::Score(4.5).to_string(), "4.5");
        assert_eq!(Rating::not_available().to_string(), "N/A");
    }

    #[test]
    fn attraction_uses_camel_case_wire_names() {
        let attraction = Attraction {
            name: "Baga Beach".to_string(),
            description: String::new(),
            distance_label: "2.4 km".to_string(),
            category: "beaches".to_string(),
            rating: Rating::Score(3.0),
            cost_label: "₹450".to_string(),
            image_url: None,
        };
        let value = serde_json::to_value(&attraction).unwrap();
        assert_eq!(value["distanceLabel"], "2.4 km");
        assert_eq!(value["costLabel"], "₹450");
        assert!(value["imageUrl"].is_null());
    }
}
