// Static map rendering for tour itineraries
// Builds provider URLs; the interactive widget consumes the raw locations
// plus the access token from the same payload.

use crate::domain::tour::value_objects::Location;

const STATIC_MAP_BASE: &str = "https://api.mapbox.com/styles/v1/mapbox/outdoors-v12/static";
const STATIC_MAP_SIZE: &str = "600x400";

/// Builds a static-map URL with one marker per itinerary stop
///
/// Markers are labeled with the itinerary day. With no locations the map
/// falls back to the provider's automatic framing of the world view.
pub fn static_map_url(locations: &[Location], access_token: &str) -> String {
    let pins: Vec<String> = locations
        .iter()
        .map(|loc| {
            format!(
                "pin-s-{}({},{})",
                loc.day,
                loc.longitude(),
                loc.latitude()
            )
        })
        .collect();

    if pins.is_empty() {
        format!(
            "{}/0,0,1/{}?access_token={}",
            STATIC_MAP_BASE, STATIC_MAP_SIZE, access_token
        )
    } else {
        format!(
            "{}/{}/auto/{}?access_token={}",
            STATIC_MAP_BASE,
            pins.join(","),
            STATIC_MAP_SIZE,
            access_token
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location(day: u32, lng: f64, lat: f64) -> Location {
        Location {
            coordinates: [lng, lat],
            day,
            description: format!("Stop on day {}", day),
        }
    }

    #[test]
    fn url_contains_one_pin_per_location() {
        let locations = vec![
            location(1, -80.185942, 25.774772),
            location(2, -80.128473, 25.781842),
        ];

        let url = static_map_url(&locations, "pk.test-token");

        assert!(url.contains("pin-s-1(-80.185942,25.774772)"));
        assert!(url.contains("pin-s-2(-80.128473,25.781842)"));
        assert!(url.contains("/auto/"));
        assert!(url.ends_with("access_token=pk.test-token"));
    }

    #[test]
    fn empty_itinerary_falls_back_to_world_view() {
        let url = static_map_url(&[], "pk.test-token");

        assert!(!url.contains("pin-s"));
        assert!(url.contains("/0,0,1/"));
    }
}
