//! Tipos de error del núcleo

use thiserror::Error;

/// Errores del núcleo de inventario
#[derive(Error, Debug)]
pub enum Error {
    #[error("El bien {code} ya está asignado a {holder}. Se requiere confirmación para reasignar")]
    AssignmentConflict { code: String, holder: String },

    #[error("Debe activar un resguardante para ubicar o re-etiquetar")]
    NoActiveCustodian,

    #[error("El archivo \"{0}\" ya fue cargado. Se requiere confirmación para reemplazar")]
    DuplicateBatch(String),

    #[error("Modo de solo lectura activo: exporte la sesión y reinicie")]
    ReadOnly,

    #[error("Clave única no encontrada en el inventario: {0}")]
    UnknownCode(String),

    #[error("Resguardante no encontrado: {0}")]
    UnknownCustodian(String),

    #[error("El área {0} aún no está completada; no puede cerrarse")]
    AreaNotCompleted(String),

    #[error("La clave o serie \"{0}\" ya existe en el inventario")]
    DuplicateSerial(String),

    #[error("Error de serialización: {0}")]
    Json(#[from] serde_json::Error),
}

/// Alias de Result
pub type Result<T> = std::result::Result<T, Error>;
