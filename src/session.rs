//! Persistencia del documento de sesión
//!
//! El almacén completo se serializa a JSON tras cada operación mutante
//! (guardado "dispara y olvida", sin transacciones). Una falla de escritura
//! es fatal para la sesión: activa el modo de solo lectura y la única
//! salida es exportar y reiniciar. La caché derivada nunca se serializa;
//! se reconstruye al cargar.

use crate::error::{InventarioError, Result};
use inventario_common::InventoryStore;
use std::path::Path;

/// Guarda el documento de sesión.
///
/// En modo de solo lectura el guardado se omite en silencio (la mutación ya
/// fue bloqueada antes). Si la escritura falla, el almacén pasa a solo
/// lectura y se regresa `StorageQuota`.
pub fn save(store: &mut InventoryStore, path: &Path) -> Result<()> {
    if store.read_only {
        return Ok(());
    }

    let json = store
        .to_session_json()
        .map_err(InventarioError::Core)?;

    let write = || -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, &json)
    };

    if let Err(e) = write() {
        store.read_only = true;
        return Err(InventarioError::StorageQuota(e.to_string()));
    }
    Ok(())
}

/// Carga el documento de sesión si existe
pub fn load(path: &Path) -> Result<Option<InventoryStore>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(path)?;
    let store = InventoryStore::from_session_json(&content).map_err(InventarioError::Core)?;
    Ok(Some(store))
}

/// Exporta la sesión a una ruta elegida por el usuario.
///
/// Disponible incluso en modo de solo lectura: es la vía de recuperación.
/// Una falla aquí no cambia el modo de la sesión.
pub fn export_session(store: &InventoryStore, dest: &Path) -> Result<()> {
    let json = store
        .to_session_json()
        .map_err(InventarioError::Core)?;
    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(dest, json)?;
    Ok(())
}

/// Importa un documento de sesión portátil.
///
/// El parseo ocurre sobre temporales: si el archivo es ilegible, el almacén
/// actual queda intacto.
pub fn import_session(path: &Path) -> Result<InventoryStore> {
    if !path.exists() {
        return Err(InventarioError::FileNotFound(path.display().to_string()));
    }
    let content = std::fs::read_to_string(path)?;
    InventoryStore::from_session_json(&content).map_err(InventarioError::Core)
}
