// Runtime settings.
//
// Sources, later ones win
// - Built-in defaults.
// - internships.json in the working directory, when present.
// - INTERNSHIPS_* environment variables. Nested keys use "__", e.g.
//   INTERNSHIPS_INSTITUTION__TERM.

use crate::modules::reports::core::institution::InstitutionMeta;
use figment::{
    Figment,
    providers::{Env, Format, Json, Serialized},
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const CONFIG_FILE: &str = "internships.json";
pub const ENV_PREFIX: &str = "INTERNSHIPS_";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub bind_address: String,
    /// Seconds between projection repair passes. 0 turns the worker off.
    pub repair_interval_secs: u64,
    pub institution: InstitutionMeta,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            repair_interval_secs: 300,
            institution: InstitutionMeta::default(),
        }
    }
}

impl Settings {
    pub fn load() -> Result<Self, figment::Error> {
        Self::extract(
            Figment::new()
                .merge(Json::file(CONFIG_FILE))
                .merge(Env::prefixed(ENV_PREFIX).split("__")),
        )
    }

    /// Layers `overrides` on top of the defaults.
    pub fn extract(overrides: Figment) -> Result<Self, figment::Error> {
        Figment::from(Serialized::defaults(Settings::default()))
            .merge(overrides)
            .extract()
    }

    pub fn repair_interval(&self) -> Option<Duration> {
        (self.repair_interval_secs > 0).then(|| Duration::from_secs(self.repair_interval_secs))
    }
}
