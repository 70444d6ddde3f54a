//! SondeHub tracker map URL builder.
//!
//! The tracker site encodes its view in the fragment:
//! `{base}/#!mt=Mapnik&mz=9&qm=3h&mc={lat},{lon}&f={serial}&q={serial}`.
//! An empty `f`/`q` pair must be sent as literal `""` to clear a
//! previously applied serial filter on an already-open map.

use serde::{Deserialize, Serialize};

pub const DEFAULT_BASE_URL: &str = "https://tracker.sondehub.org";
pub const DEFAULT_MAP_TYPE: &str = "Mapnik";

/// Builder for a SondeHub tracker map URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapUrl {
    base: String,
    map_type: String,
    zoom: u8,
    history: String,
    center: (f64, f64),
    serial: Option<String>,
}

impl MapUrl {
    pub fn new(base: impl Into<String>, zoom: u8, history: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            map_type: DEFAULT_MAP_TYPE.to_string(),
            zoom,
            history: history.into(),
            center: (0.0, 0.0),
            serial: None,
        }
    }

    #[must_use]
    pub fn with_center(mut self, lat: f64, lon: f64) -> Self {
        self.center = (lat, lon);
        self
    }

    #[must_use]
    pub fn with_serial(mut self, serial: impl Into<String>) -> Self {
        let serial = serial.into();
        self.serial = if serial.is_empty() { None } else { Some(serial) };
        self
    }

    /// Render the full URL.
    pub fn build(&self) -> String {
        let mut url = format!(
            "{}/#!mt={}&mz={}&qm={}&mc={:.6},{:.6}",
            self.base, self.map_type, self.zoom, self.history, self.center.0, self.center.1
        );
        match &self.serial {
            Some(serial) => {
                url.push_str(&format!("&f={serial}&q={serial}"));
            }
            // Invalid values clear the follow/filter parameters.
            None => url.push_str("&f=\"\"&q=\"\""),
        }
        url
    }
}

impl Default for MapUrl {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL, 9, "3h")
    }
}
