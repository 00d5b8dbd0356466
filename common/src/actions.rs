//! Máquina de estados de ubicación y resguardo
//!
//! Ciclo de vida por bien: no ubicado → ubicado → (reasignado | re-etiquetado)
//! → no ubicado. Ubicar y re-etiquetar exigen un resguardante activo; la
//! reasignación sobre un bien ya resguardado por otra persona exige
//! confirmación explícita. Des-ubicar siempre está permitido.

use crate::completion::{evaluate_area, evaluate_global, InventoryEvent};
use crate::error::{Error, Result};
use crate::store::InventoryStore;
use crate::types::SiNo;
use chrono::Utc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LocateMode {
    /// Ubicar: limpia la bandera de etiqueta si estaba encendida
    Ubicar,
    /// Re-etiquetar: fuerza la impresión de etiqueta
    Reetiquetar,
}

/// Marca un bien como ubicado bajo el resguardante activo.
///
/// `confirm_reassign` debe venir en verdadero cuando el bien ya está
/// asignado a otro resguardante; de lo contrario la transición se rechaza
/// con `AssignmentConflict` para que la interfaz pida confirmación.
pub fn locate(
    store: &mut InventoryStore,
    code: &str,
    precise_location: Option<&str>,
    confirm_reassign: bool,
) -> Result<Vec<InventoryEvent>> {
    transition(store, code, LocateMode::Ubicar, precise_location, confirm_reassign)
}

/// Igual que `locate`, pero deja la bandera IMPRIMIR ETIQUETA en SI
pub fn relabel(
    store: &mut InventoryStore,
    code: &str,
    precise_location: Option<&str>,
    confirm_reassign: bool,
) -> Result<Vec<InventoryEvent>> {
    transition(store, code, LocateMode::Reetiquetar, precise_location, confirm_reassign)
}

fn transition(
    store: &mut InventoryStore,
    code: &str,
    mode: LocateMode,
    precise_location: Option<&str>,
    confirm_reassign: bool,
) -> Result<Vec<InventoryEvent>> {
    store.ensure_writable()?;

    let custodian = store.active_custodian().ok_or(Error::NoActiveCustodian)?;
    let custodian_name = custodian.name.clone();
    let custodian_area = custodian.area.clone();
    let fallback_location = custodian.default_location().map(|s| s.to_string());

    let record = store
        .find_record(code)
        .ok_or_else(|| Error::UnknownCode(code.to_string()))?;

    // Conflicto de resguardo: el bien ya pertenece a otra persona
    let assigned_to_other = record.located.is_si()
        && !record.assigned_custodian_name.is_empty()
        && record.assigned_custodian_name != custodian_name;
    if assigned_to_other && !confirm_reassign {
        return Err(Error::AssignmentConflict {
            code: code.to_string(),
            holder: record.assigned_custodian_name.clone(),
        });
    }

    let area_id = record.original_area.clone();
    let reassigned = assigned_to_other;

    let record = store
        .find_record_mut(code)
        .ok_or_else(|| Error::UnknownCode(code.to_string()))?;
    record.located = SiNo::Si;
    record.assigned_custodian_name = custodian_name.clone();
    record.located_at = Some(Utc::now().to_rfc3339());
    record.area_mismatch = record.original_area != custodian_area;
    record.specific_location = precise_location
        .map(|s| s.to_string())
        .or(fallback_location);

    match mode {
        LocateMode::Reetiquetar => record.needs_label_print = SiNo::Si,
        LocateMode::Ubicar => {
            if record.needs_label_print.is_si() {
                record.needs_label_print = SiNo::No;
            }
        }
    }

    let action = match (mode, reassigned) {
        (_, true) => "Bien reasignado",
        (LocateMode::Ubicar, false) => "Bien ubicado",
        (LocateMode::Reetiquetar, false) => "Bien marcado para re-etiquetar",
    };
    store.log_activity(action, &format!("{} → {}", code, custodian_name));

    let mut events = Vec::new();
    events.extend(evaluate_area(store, &area_id));
    events.extend(evaluate_global(store));
    Ok(events)
}

/// Regresa un bien al estado no ubicado.
///
/// Siempre permitido: quitar un resguardo no pisa el de nadie más, así que
/// no hay verificación de conflicto.
pub fn unlocate(store: &mut InventoryStore, code: &str) -> Result<Vec<InventoryEvent>> {
    store.ensure_writable()?;

    let record = store
        .find_record_mut(code)
        .ok_or_else(|| Error::UnknownCode(code.to_string()))?;

    record.located = SiNo::No;
    record.assigned_custodian_name = String::new();
    record.needs_label_print = SiNo::No;
    record.located_at = None;
    record.area_mismatch = false;
    record.specific_location = None;
    let area_id = record.original_area.clone();

    store.log_activity("Bien des-ubicado", code);

    let mut events = Vec::new();
    events.extend(evaluate_area(store, &area_id));
    events.extend(evaluate_global(store));
    Ok(events)
}
