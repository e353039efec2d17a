use std::time::Duration;

use serde_derive::Deserialize;

use super::*;

#[derive(Debug, Clone)]
pub struct NominatimSettings {
    pub endpoint: String,
    pub user_agent: String,
    pub limit: u32,
    pub timeout: Duration,
}

/// Looks up places with the public Nominatim search API of OpenStreetMap.
pub struct Nominatim {
    settings: NominatimSettings,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    display_name: String,
    lat: String,
    lon: String,
}

impl Nominatim {
    pub fn new(settings: NominatimSettings) -> Self {
        Self { settings }
    }

    fn search_url(&self) -> String {
        format!("{}/search", self.settings.endpoint.trim_end_matches('/'))
    }
}

impl Geocoder for Nominatim {
    fn geocode(&self, query: &str) -> Result<Vec<Place>, GeocodeError> {
        let limit = self.settings.limit.to_string();
        let response = ureq::get(&self.search_url())
            .set("User-Agent", &self.settings.user_agent)
            .query("format", "json")
            .query("q", query)
            .query("limit", &limit)
            .timeout(self.settings.timeout)
            .call();

        if let Some(e) = response.synthetic_error() {
            return Err(GeocodeError::Transport(e.to_string()));
        }
        if !response.ok() {
            return Err(GeocodeError::Status(response.status()));
        }

        parse_search_response(&response.into_string()?)
    }
}

/// Parses the JSON body of a Nominatim `/search` response.
///
/// Candidates with coordinates that are not finite numbers are skipped.
pub fn parse_search_response(body: &str) -> Result<Vec<Place>, GeocodeError> {
    let results: Vec<SearchResult> = serde_json::from_str(body)?;
    Ok(results
        .into_iter()
        .filter_map(|result| {
            let lat = result.lat.parse::<f64>().ok()?;
            let lng = result.lon.parse::<f64>().ok()?;
            match Position::new(lat, lng) {
                Ok(center) => Some(Place {
                    label: result.display_name,
                    center,
                }),
                Err(e) => {
                    log::debug!("Skipping candidate {}. Reason:\r\n{}", result.display_name, e);
                    None
                }
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_candidates_in_order() {
        let body = r#"[
            {"place_id": 1, "lat": "25.0339639", "lon": "121.5644722", "display_name": "Taipei 101, Xinyi, Taipei", "importance": 0.6},
            {"place_id": 2, "lat": "25.0330", "lon": "121.5654", "display_name": "Taipei 101 Mall"}
        ]"#;

        let places = parse_search_response(body).unwrap();
        assert_eq!(places.len(), 2);
        assert_eq!(places[0].label, "Taipei 101, Xinyi, Taipei");
        assert_eq!(places[0].center, Position::new(25.0339639, 121.5644722).unwrap());
        assert_eq!(places[1].center, Position::new(25.0330, 121.5654).unwrap());
    }

    #[test]
    fn no_match_is_an_empty_list() {
        assert!(parse_search_response("[]").unwrap().is_empty());
    }

    #[test]
    fn skips_candidates_without_usable_coordinates() {
        let body = r#"[
            {"lat": "north", "lon": "121.0", "display_name": "Broken"},
            {"lat": "NaN", "lon": "121.0", "display_name": "Not a number"},
            {"lat": "24.1", "lon": "120.6", "display_name": "Taichung"}
        ]"#;

        let places = parse_search_response(body).unwrap();
        assert_eq!(places.len(), 1);
        assert_eq!(places[0].label, "Taichung");
    }

    #[test]
    fn error_documents_are_parse_errors() {
        let body = r#"{"error": "Unable to geocode"}"#;
        assert!(matches!(
            parse_search_response(body),
            Err(GeocodeError::Parse(_))
        ));
    }

    #[test]
    fn search_url_ignores_trailing_slashes() {
        let nominatim = Nominatim::new(NominatimSettings {
            endpoint: "https://nominatim.openstreetmap.org/".to_string(),
            user_agent: "waypoint-test".to_string(),
            limit: 1,
            timeout: Duration::from_secs(1),
        });
        assert_eq!(
            nominatim.search_url(),
            "https://nominatim.openstreetmap.org/search"
        );
    }
}
