use crate::error::{InventarioError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Verificador con sesión iniciada
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    pub number: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// Ruta del documento de sesión (por defecto en el directorio de datos)
    pub session_file: Option<PathBuf>,
    pub theme: Option<String>,
    pub current_user: Option<CurrentUser>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| InventarioError::Config("No se encontró el directorio del usuario".into()))?;
        Ok(home.join(".config").join("inventario-pro").join("config.json"))
    }

    /// Ruta efectiva del documento de sesión
    pub fn session_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.session_file {
            return Ok(path.clone());
        }
        let data = dirs::data_local_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| InventarioError::Config("No se encontró el directorio de datos".into()))?;
        Ok(data.join("inventario-pro").join("session.json"))
    }

    pub fn set_current_user(&mut self, number: String, name: String) -> Result<()> {
        self.current_user = Some(CurrentUser { number, name });
        self.save()
    }
}
