//! JSON (de)serialization for calibration and solver settings.
//!
//! Every calibration struct in the workspace is plain data with
//! `#[serde(default)]`, so a JSON file only needs the fields it overrides.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;

pub trait JsonConfig: Serialize + DeserializeOwned {
    fn from_json_str(json: &str) -> Result<Self> {
        let cfg = serde_json::from_str(json)?;
        log::debug!("loaded {} from json", std::any::type_name::<Self>());
        Ok(cfg)
    }

    fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
