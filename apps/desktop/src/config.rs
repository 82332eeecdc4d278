use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use client_core::ConnectOptions;
use serde::Deserialize;

pub const DEFAULT_CONFIG_FILE: &str = "communique.toml";

#[derive(Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub nick: Option<String>,
    pub username: Option<String>,
    pub realname: Option<String>,
    /// Servers connected on startup.
    pub servers: Vec<String>,
}

impl Settings {
    /// Identity used for every connection; unset fields fall back to the core defaults.
    pub fn identity(&self) -> ConnectOptions {
        ConnectOptions {
            nick: self.nick.clone(),
            username: self.username.clone(),
            realname: self.realname.clone(),
            ..ConnectOptions::default()
        }
    }
}

/// Loads settings from the config file and the environment.
///
/// A missing file is only an error when its path was given explicitly.
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<Settings> {
    let (path, explicit) = match path {
        Some(path) => (path.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
    };

    let settings = match fs::read_to_string(&path) {
        Ok(raw) => parse_settings(&raw)
            .with_context(|| format!("invalid config file '{}'", path.display()))?,
        Err(err) if !explicit && err.kind() == std::io::ErrorKind::NotFound => Settings::default(),
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to read config file '{}'", path.display()))
        }
    };

    Ok(apply_env_overrides(settings, |key| std::env::var(key).ok()))
}

pub fn parse_settings(raw: &str) -> anyhow::Result<Settings> {
    Ok(toml::from_str(raw)?)
}

pub fn apply_env_overrides(
    mut settings: Settings,
    var: impl Fn(&str) -> Option<String>,
) -> Settings {
    if let Some(v) = var("COMMUNIQUE_NICK") {
        settings.nick = Some(v);
    }
    if let Some(v) = var("COMMUNIQUE_USERNAME") {
        settings.username = Some(v);
    }
    if let Some(v) = var("COMMUNIQUE_REALNAME") {
        settings.realname = Some(v);
    }
    if let Some(v) = var("COMMUNIQUE_SERVERS") {
        settings.servers = v
            .split(',')
            .map(str::trim)
            .filter(|server| !server.is_empty())
            .map(str::to_string)
            .collect();
    }
    settings
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
