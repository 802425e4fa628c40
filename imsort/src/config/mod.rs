use std::{
    collections::HashMap,
    env,
    path::{Path, PathBuf},
};

use color_eyre::{Result, eyre::eyre};
use directories::ProjectDirs;
use imsort_ui::keymap::{Command, KeyMap};
use serde::Deserialize;
use tracing::{debug, warn};

const DEFAULT_CONFIG: &str = include_str!("../../.config/config.json5");

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub keybindings: HashMap<String, Command>,
}

impl Config {
    /// Loads the user configuration on top of the embedded defaults.
    pub fn new() -> Result<Self> {
        let default_config: Config = json5::from_str(DEFAULT_CONFIG)?;
        let config_dir = get_config_dir();
        Self::load(default_config, &config_dir)
    }

    fn load(default_config: Config, config_dir: &Path) -> Result<Self> {
        let mut builder = config::Config::builder();

        let config_files = [
            ("config.json5", config::FileFormat::Json5),
            ("config.json", config::FileFormat::Json),
            ("config.yaml", config::FileFormat::Yaml),
            ("config.toml", config::FileFormat::Toml),
            ("config.ini", config::FileFormat::Ini),
        ];
        let mut found_config = false;
        for (file, format) in &config_files {
            let path = config_dir.join(file);
            let source = config::File::from(path.clone())
                .format(*format)
                .required(false);
            builder = builder.add_source(source);
            if path.exists() {
                debug!("reading configuration from {}", path.display());
                found_config = true
            }
        }
        if !found_config {
            warn!("No configuration file found, using the default keybindings");
        }

        let mut cfg: Self = builder.build()?.try_deserialize()?;

        for (key, command) in default_config.keybindings {
            cfg.keybindings.entry(key).or_insert(command);
        }

        Ok(cfg)
    }

    pub fn keymap(&self) -> Result<KeyMap> {
        KeyMap::from_bindings(&self.keybindings).map_err(|e| eyre!("invalid keybinding: {e}"))
    }
}

pub fn get_data_dir() -> PathBuf {
    if let Some(data_folder) = env::var("IMSORT_DATA").ok().map(PathBuf::from) {
        data_folder
    } else if let Some(proj_dirs) = project_directory() {
        proj_dirs.data_local_dir().to_path_buf()
    } else {
        PathBuf::from(".").join(".data")
    }
}

pub fn get_config_dir() -> PathBuf {
    if let Some(config_folder) = env::var("IMSORT_CONFIG").ok().map(PathBuf::from) {
        config_folder
    } else if let Some(proj_dirs) = project_directory() {
        proj_dirs.config_local_dir().to_path_buf()
    } else {
        PathBuf::from(".").join(".config")
    }
}

fn project_directory() -> Option<ProjectDirs> {
    ProjectDirs::from("de.marma", "", env!("CARGO_PKG_NAME"))
}
