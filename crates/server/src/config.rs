use std::{collections::BTreeMap, fs, io, path::Path};

use access_gate::GateConfig;
use anyhow::Context;
use serde::Deserialize;

pub const DEFAULT_SESSION_COOKIE: &str = "__Secure-next-auth.session-token";
pub const DEV_SESSION_SECRET: &str = "dev-session-secret";

#[derive(Debug, Clone)]
pub struct Settings {
    pub server_bind: String,
    pub catalog_path: Option<String>,
    pub session_cookie: String,
    pub session_secret: String,
    pub gate: GateConfig,
    pub status_styles: BTreeMap<String, String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:3000".into(),
            catalog_path: None,
            session_cookie: DEFAULT_SESSION_COOKIE.into(),
            session_secret: DEV_SESSION_SECRET.into(),
            gate: GateConfig::default(),
            status_styles: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    bind_addr: Option<String>,
    catalog_path: Option<String>,
    session_cookie: Option<String>,
    session_secret: Option<String>,
    gate: Option<GateConfig>,
    #[serde(default)]
    status_styles: BTreeMap<String, String>,
}

/// Defaults, then `server.toml` if present, then the environment.
pub fn load_settings() -> anyhow::Result<Settings> {
    let mut settings = Settings::default();
    apply_file(&mut settings, Path::new("server.toml"))?;
    apply_env(&mut settings, |key| std::env::var(key).ok());
    Ok(settings)
}

fn apply_file(settings: &mut Settings, path: &Path) -> anyhow::Result<()> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(error) => {
            return Err(error).with_context(|| format!("failed to read '{}'", path.display()))
        }
    };
    apply_toml(settings, &raw).with_context(|| format!("invalid settings in '{}'", path.display()))
}

fn apply_toml(settings: &mut Settings, raw: &str) -> anyhow::Result<()> {
    let file_cfg: FileSettings = toml::from_str(raw)?;

    if let Some(v) = file_cfg.bind_addr {
        settings.server_bind = v;
    }
    if let Some(v) = file_cfg.catalog_path {
        settings.catalog_path = Some(v);
    }
    if let Some(v) = file_cfg.session_cookie {
        settings.session_cookie = v;
    }
    if let Some(v) = file_cfg.session_secret {
        settings.session_secret = v;
    }
    if let Some(v) = file_cfg.gate {
        settings.gate = v;
    }
    settings.status_styles.extend(file_cfg.status_styles);
    Ok(())
}

fn apply_env(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    let var = |plain: &str, prefixed: &str| lookup(prefixed).or_else(|| lookup(plain));

    if let Some(v) = var("SERVER_BIND", "APP__BIND_ADDR") {
        settings.server_bind = v;
    }
    if let Some(v) = var("CATALOG_PATH", "APP__CATALOG_PATH") {
        settings.catalog_path = Some(v);
    }
    if let Some(v) = var("SESSION_COOKIE", "APP__SESSION_COOKIE") {
        settings.session_cookie = v;
    }
    if let Some(v) = var("NEXTAUTH_SECRET", "APP__SESSION_SECRET") {
        settings.session_secret = v;
    }
    if let Some(v) = lookup("APP__PUBLIC_PATHS") {
        settings.gate.public_paths = split_list(&v);
    }
    if let Some(v) = lookup("APP__PROTECTED_HOME") {
        settings.gate.protected_home = v;
    }
    if let Some(v) = lookup("APP__BYPASS_PATTERNS") {
        settings.gate.bypass_patterns = split_list(&v);
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
