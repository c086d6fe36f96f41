use std::{fs, io, path::Path};

use serde_json::{Map, Value};

use crate::config::DataConfig;
use crate::error::{PlannerError, Result};

// Both schedule documents as decoded JSON, not yet normalized
#[derive(Debug, Clone)]
pub struct RawSchedules {
    pub gk: Value,
    pub maths: Value,
}

// A missing file reads as `{}` so the dashboard still renders
pub fn load_document(path: &Path) -> Result<Value> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::warn!(path = %path.display(), "schedule file not found, using empty document");
            return Ok(Value::Object(Map::new()));
        }
        Err(source) => {
            return Err(PlannerError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    serde_json::from_str(&text).map_err(|source| PlannerError::Json {
        path: path.to_path_buf(),
        source,
    })
}

pub fn load_schedules(data: &DataConfig) -> Result<RawSchedules> {
    Ok(RawSchedules {
        gk: load_document(&data.gk_path())?,
        maths: load_document(&data.maths_path())?,
    })
}
