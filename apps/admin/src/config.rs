use std::{collections::HashMap, fs};

use client_core::{IconHostRewrite, PanelConfig, DEV_ICON_AUTHORITY, PRODUCTION_API_URL};

#[derive(Debug, Clone)]
pub struct Settings {
    pub api_base_url: String,
    pub icon_dev_authority: String,
    pub icon_public_authority: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: PRODUCTION_API_URL.into(),
            icon_dev_authority: DEV_ICON_AUTHORITY.into(),
            icon_public_authority: PRODUCTION_API_URL.trim_start_matches("https://").into(),
        }
    }
}

/// Defaults, overridden by `admin.toml` in the working directory,
/// overridden by environment variables.
pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string("admin.toml") {
        if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(&raw) {
            if let Some(v) = file_cfg.get("api_base_url") {
                settings.api_base_url = v.clone();
            }
            if let Some(v) = file_cfg.get("icon_dev_authority") {
                settings.icon_dev_authority = v.clone();
            }
            if let Some(v) = file_cfg.get("icon_public_authority") {
                settings.icon_public_authority = v.clone();
            }
        }
    }

    if let Ok(v) = std::env::var("ADMIN_API_BASE_URL") {
        settings.api_base_url = v;
    }
    if let Ok(v) = std::env::var("APP__API_BASE_URL") {
        settings.api_base_url = v;
    }
    if let Ok(v) = std::env::var("ADMIN_ICON_PUBLIC_AUTHORITY") {
        settings.icon_public_authority = v;
    }

    settings
}

impl Settings {
    pub fn panel_config(&self) -> PanelConfig {
        PanelConfig {
            api_base_url: self.api_base_url.clone(),
            icon_rewrite: Some(IconHostRewrite {
                dev_authority: self.icon_dev_authority.clone(),
                public_authority: self.icon_public_authority.clone(),
            }),
        }
    }
}
