//! Shared JSON fixtures for the foot placement tests.
//!
//! `fixtures/manifest.json` maps fixture names to paths under `fixtures/`.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Deserialize;

static MANIFEST: Lazy<Manifest> = Lazy::new(|| {
    let raw = include_str!("../../../../fixtures/manifest.json");
    serde_json::from_str(raw).expect("fixtures manifest should parse")
});

#[derive(Debug, Deserialize)]
struct Manifest {
    configs: HashMap<String, String>,
    terrains: HashMap<String, String>,
}

fn read(kind: &str, map: &HashMap<String, String>, name: &str) -> Result<String> {
    let rel = map
        .get(name)
        .ok_or_else(|| anyhow!("unknown {kind} fixture '{name}'"))?;
    let path: PathBuf = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../../../fixtures")
        .join(rel);
    fs::read_to_string(&path).with_context(|| format!("failed to read {kind} fixture at {}", path.display()))
}

fn parse<T: DeserializeOwned>(name: &str, text: &str) -> Result<T> {
    serde_json::from_str(text).with_context(|| format!("failed to parse JSON fixture {name}"))
}

/// Named foot placement configurations (partial JSON, defaults fill the rest).
pub mod configs {
    use super::*;

    pub fn keys() -> Vec<String> {
        MANIFEST.configs.keys().cloned().collect()
    }

    /// Raw text, for exercising the crate's own JSON entry point.
    pub fn json(name: &str) -> Result<String> {
        read("config", &MANIFEST.configs, name)
    }

    pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
        parse(name, &json(name)?)
    }
}

/// Ground planes (`point` + `normal`).
pub mod terrains {
    use super::*;

    pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
        parse(name, &read("terrain", &MANIFEST.terrains, name)?)
    }
}
