use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use brilfit_core::catalog::infrastructure::woocommerce_source::WooCommerceCredentials;
use brilfit_core::classification::domain::face_shape_classifier::ShapePolicy;
use brilfit_core::compositing::domain::placement_policy::PlacementPolicy;
use brilfit_core::shared::constants::{
    CATALOG_PAGE_SIZE, CATALOG_TIMEOUT_SECS, CATALOG_TTL_SECS, DEFAULT_DISPLAY_WIDTH,
    DEFAULT_STORE_URL, DEFAULT_TRY_ON_COUNT, FRAME_IMAGE_TIMEOUT_SECS,
};

pub const ENV_STORE_URL: &str = "WOOCOMMERCE_URL";
pub const ENV_KEY: &str = "WOOCOMMERCE_KEY";
pub const ENV_SECRET: &str = "WOOCOMMERCE_SECRET";

/// Persistent configuration. Layers: defaults, then the JSON file, then the
/// environment; CLI flags are applied on top by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub store_url: String,
    pub consumer_key: Option<String>,
    pub consumer_secret: Option<String>,
    pub page_size: usize,
    pub catalog_ttl_secs: u64,
    pub catalog_timeout_secs: u64,
    pub frame_timeout_secs: u64,
    pub try_on_count: usize,
    pub display_width: u32,
    pub shape_policy: ShapePolicy,
    pub placement: PlacementPolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            store_url: DEFAULT_STORE_URL.to_string(),
            consumer_key: None,
            consumer_secret: None,
            page_size: CATALOG_PAGE_SIZE,
            catalog_ttl_secs: CATALOG_TTL_SECS,
            catalog_timeout_secs: CATALOG_TIMEOUT_SECS,
            frame_timeout_secs: FRAME_IMAGE_TIMEOUT_SECS,
            try_on_count: DEFAULT_TRY_ON_COUNT,
            display_width: DEFAULT_DISPLAY_WIDTH,
            shape_policy: ShapePolicy::default(),
            placement: PlacementPolicy::default(),
        }
    }
}

impl Settings {
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("BrilFit").join("settings.json"))
    }

    /// File settings overlaid with the process environment.
    pub fn load() -> Self {
        let base = Self::config_path()
            .map(|path| Self::load_from(&path))
            .unwrap_or_default();
        base.with_env(|name| std::env::var(name).ok())
    }

    /// Defaults when the file is missing or unreadable.
    pub fn load_from(path: &Path) -> Self {
        let Ok(json) = fs::read_to_string(path) else {
            return Self::default();
        };
        match serde_json::from_str(&json) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Ignoring invalid settings file {}: {e}", path.display());
                Self::default()
            }
        }
    }

    /// Overrides store URL and credentials from variables `lookup` resolves.
    /// Empty values are ignored.
    pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |name: &str| lookup(name).filter(|v: &String| !v.trim().is_empty());
        if let Some(url) = var(ENV_STORE_URL) {
            self.store_url = url;
        }
        if let Some(key) = var(ENV_KEY) {
            self.consumer_key = Some(key);
        }
        if let Some(secret) = var(ENV_SECRET) {
            self.consumer_secret = Some(secret);
        }
        self
    }

    pub fn credentials(&self) -> Option<WooCommerceCredentials> {
        WooCommerceCredentials::from_parts(self.consumer_key.clone(), self.consumer_secret.clone())
    }
}
