use thiserror::Error;

#[derive(Error, Debug)]
pub enum InventarioError {
    #[error(transparent)]
    Core(#[from] inventario_common::Error),

    #[error("Error de configuración: {0}")]
    Config(String),

    #[error("Archivo no encontrado: {0}")]
    FileNotFound(String),

    #[error("Error al leer el listado: {0}")]
    ParseFailure(String),

    #[error("Error al generar el reporte: {0}")]
    Report(String),

    #[error("¡ALERTA! Almacenamiento lleno o inaccesible ({0}). La app está en modo lectura; exporte la sesión y reinicie")]
    StorageQuota(String),

    #[error("Usuario no autorizado")]
    Unauthorized,

    #[error("Error de consola: {0}")]
    Prompt(String),

    #[error("Error de E/S: {0}")]
    Io(#[from] std::io::Error),

    #[error("Error de JSON: {0}")]
    JsonParse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, InventarioError>;
