//! Evaluador de avance
//!
//! Re-deriva las banderas de área completada y de inventario terminado
//! después de cada mutación. Las notificaciones son por flanco: solo la
//! transición falso→verdadero produce un evento; la vuelta atrás limpia la
//! bandera y deja únicamente rastro en la bitácora.

use crate::store::InventoryStore;
use serde::{Deserialize, Serialize};

/// Notificación de avance dirigida a la interfaz
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum InventoryEvent {
    /// Todos los bienes de un área quedaron ubicados
    AreaCompleted { area_id: String },
    /// Hito global: todos los bienes del inventario ubicados
    InventoryFinished,
}

/// Re-deriva la bandera de completitud de un área.
///
/// Un área sin registros nunca está completa. Un área cerrada ya no se
/// evalúa: el cierre es terminal.
pub fn evaluate_area(store: &mut InventoryStore, area_id: &str) -> Option<InventoryEvent> {
    if area_id.is_empty() || store.areas.is_closed(area_id) {
        return None;
    }

    let mut area_records = store.records.iter().filter(|r| r.original_area == area_id);
    let has_records = area_records.clone().next().is_some();
    let is_complete = has_records && area_records.all(|r| r.located.is_si());
    let was_complete = store.areas.is_completed(area_id);

    if is_complete && !was_complete {
        store.areas.completed.insert(area_id.to_string());
        store.log_activity(
            "Área completada",
            &format!("Todos los bienes del área {} han sido ubicados", area_id),
        );
        Some(InventoryEvent::AreaCompleted {
            area_id: area_id.to_string(),
        })
    } else if !is_complete && was_complete {
        // Flanco de bajada: sin notificación, solo bitácora
        store.areas.completed.remove(area_id);
        store.log_activity(
            "Área reabierta",
            &format!("El área {} dejó de estar completa", area_id),
        );
        None
    } else {
        None
    }
}

/// Re-deriva el hito global. Dispara una sola vez y es pegajoso: un bien
/// des-ubicado después no lo revierte (a diferencia del avance por área).
pub fn evaluate_global(store: &mut InventoryStore) -> Option<InventoryEvent> {
    if store.inventory_finished || store.records.is_empty() {
        return None;
    }
    if store.records.iter().all(|r| r.located.is_si()) {
        store.inventory_finished = true;
        store.log_activity("Inventario completado", "Todos los bienes han sido ubicados");
        return Some(InventoryEvent::InventoryFinished);
    }
    None
}

/// Re-deriva todas las áreas (en orden alfabético, determinista) y el hito
/// global. Para después de mutaciones masivas (aplicar conciliación,
/// eliminar lotes).
pub fn evaluate_all(store: &mut InventoryStore) -> Vec<InventoryEvent> {
    let mut events = Vec::new();
    for area_id in store.areas_in_use() {
        events.extend(evaluate_area(store, &area_id));
    }
    events.extend(evaluate_global(store));
    events
}
