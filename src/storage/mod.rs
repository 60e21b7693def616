//! Persistence layer.
//!
//! Saves and loads a valuation session (intake + item lines) to/from a
//! JSON file. This is the crate's own format; manifest parsing happens
//! upstream.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};
use uuid::Uuid;

use crate::types::{validate_items, Intake, Item, ValuationError};

/// Default session file path.
pub const DEFAULT_SESSION_FILE: &str = "palletbid_session.json";

/// A pallet under evaluation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    #[serde(default)]
    pub name: String,
    #[serde(default = "Utc::now")]
    pub saved_at: DateTime<Utc>,
    #[serde(default)]
    pub intake: Intake,
    #[serde(default)]
    pub items: Vec<Item>,
}

impl Session {
    pub fn new(name: &str, intake: Intake, items: Vec<Item>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            saved_at: Utc::now(),
            intake,
            items,
        }
    }

    pub fn validate(&self) -> Result<(), ValuationError> {
        validate_items(&self.items)
    }
}

/// Save a session as pretty JSON, stamping `saved_at`.
pub fn save_session(session: &Session, path: Option<&str>) -> Result<()> {
    let path = path.unwrap_or(DEFAULT_SESSION_FILE);
    let mut stamped = session.clone();
    stamped.saved_at = Utc::now();

    let json = serde_json::to_string_pretty(&stamped).context("Failed to serialise session")?;
    std::fs::write(path, &json).context(format!("Failed to write session to {path}"))?;

    debug!(path, items = stamped.items.len(), "Session saved");
    Ok(())
}

/// Load a session from a JSON file.
/// Returns None if the file doesn't exist.
pub fn load_session(path: Option<&str>) -> Result<Option<Session>> {
    let path = path.unwrap_or(DEFAULT_SESSION_FILE);

    if !Path::new(path).exists() {
        info!(path, "No saved session found");
        return Ok(None);
    }

    let json = std::fs::read_to_string(path).context(format!("Failed to read session from {path}"))?;
    let session: Session =
        serde_json::from_str(&json).context(format!("Failed to parse session from {path}"))?;
    session
        .validate()
        .map_err(|e| ValuationError::Storage(format!("{path}: {e}")))?;

    info!(
        path,
        name = %session.name,
        items = session.items.len(),
        shipping_cost = %session.intake.shipping_cost,
        "Session loaded from disk"
    );

    Ok(Some(session))
}

/// Delete the session file.
pub fn delete_session(path: Option<&str>) -> Result<()> {
    let path = path.unwrap_or(DEFAULT_SESSION_FILE);
    if Path::new(path).exists() {
        std::fs::remove_file(path).context(format!("Failed to delete session file {path}"))?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
