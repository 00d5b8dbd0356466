//! Aplicación selectiva de la conciliación
//!
//! Cada entrada del diff se aplica de forma independiente según la
//! selección del usuario. El índice derivado y el avance se re-derivan una
//! sola vez al final del lote, no por entrada.

use crate::completion::{evaluate_all, InventoryEvent};
use crate::diff::{DiffKind, DiffResult, DiffSelection};
use crate::error::Result;
use crate::store::InventoryStore;
use crate::types::SiNo;

/// Resultado de aplicar una conciliación
#[derive(Debug, Clone, Default)]
pub struct ApplyOutcome {
    /// Entradas efectivamente aplicadas
    pub applied: usize,
    /// Lote asignado a las altas, si se aplicó alguna
    pub batch_id: Option<i64>,
    pub events: Vec<InventoryEvent>,
}

/// Aplica al almacén las entradas seleccionadas del diff.
///
/// - Altas: entran como no ubicadas, agrupadas bajo un lote nuevo propio.
/// - Cambios: sobrescriben únicamente los campos auditados; el estado de
///   ubicación y resguardo jamás cambia por una corrección de contenido.
/// - Bajas: eliminan el registro por clave y descartan sus datos auxiliares
///   (notas por clave).
///
/// Las entradas no seleccionadas se dejan intactas.
pub fn apply_selected(
    store: &mut InventoryStore,
    diff: &DiffResult,
    selection: &DiffSelection,
) -> Result<ApplyOutcome> {
    store.ensure_writable()?;

    let mut outcome = ApplyOutcome::default();

    // Altas: un solo lote nuevo agrupa todas las del lote aplicado
    let selected_additions: Vec<_> = diff
        .additions
        .iter()
        .filter(|r| selection.contains(DiffKind::Addition, &r.code))
        .collect();
    if !selected_additions.is_empty() {
        let batch_id = store.next_batch_id();
        outcome.batch_id = Some(batch_id);
        for incoming in selected_additions {
            let mut record = incoming.clone();
            record.located = SiNo::No;
            record.needs_label_print = SiNo::No;
            record.assigned_custodian_name = String::new();
            record.batch_id = batch_id;
            store.records.push(record);
            outcome.applied += 1;
        }
    }

    // Cambios: solo los campos auditados del registro existente
    for entry in &diff.modifications {
        if !selection.contains(DiffKind::Modification, &entry.code) {
            continue;
        }
        if let Some(record) = store.find_record_mut(&entry.code) {
            for change in &entry.changes {
                change.field.set(record, change.new.clone());
            }
            outcome.applied += 1;
        }
    }

    // Bajas: registro fuera, datos auxiliares fuera
    for deletion in &diff.deletions {
        if !selection.contains(DiffKind::Deletion, &deletion.code) {
            continue;
        }
        let before = store.records.len();
        store.records.retain(|r| r.code != deletion.code);
        if store.records.len() < before {
            store.notes.remove(&deletion.code);
            outcome.applied += 1;
        }
    }

    // Re-derivación única al final del lote
    store.rebuild_index();
    outcome.events = evaluate_all(store);
    store.log_activity(
        "Conciliación aplicada",
        &format!("{} cambios aplicados", outcome.applied),
    );

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::compute_diff;
    use crate::error::Error;
    use crate::types::AssetRecord;

    fn record(code: &str, description: &str) -> AssetRecord {
        AssetRecord {
            code: code.to_string(),
            description: description.to_string(),
            serial: format!("S-{}", code),
            ..Default::default()
        }
    }

    fn located_record(code: &str, custodian: &str) -> AssetRecord {
        AssetRecord {
            located: SiNo::Si,
            assigned_custodian_name: custodian.to_string(),
            located_at: Some("2026-03-01T10:00:00Z".to_string()),
            ..record(code, "BIEN UBICADO")
        }
    }

    #[test]
    fn test_apply_addition_defaults_and_new_batch() {
        let mut store = InventoryStore::new();
        store.records.push(record("111", "A"));
        let old_batch = store.next_batch_id();

        let incoming = vec![record("111", "A"), located_record("222", "ALGUIEN")];
        let diff = compute_diff(&store.records.clone(), &incoming);
        let outcome =
            apply_selected(&mut store, &diff, &DiffSelection::default_for(&diff)).unwrap();

        assert_eq!(outcome.applied, 1);
        let added = store.find_record("222").unwrap();
        // El alta entra sin ubicar aunque el listado trajera otra cosa
        assert_eq!(added.located, SiNo::No);
        assert_eq!(added.needs_label_print, SiNo::No);
        assert!(added.assigned_custodian_name.is_empty());
        assert!(added.batch_id > old_batch);
        assert_eq!(outcome.batch_id, Some(added.batch_id));
    }

    #[test]
    fn test_apply_modification_preserves_location_state() {
        let mut store = InventoryStore::new();
        let mut current = located_record("111", "LÓPEZ ESTRADA LEOPOLDO");
        current.specific_location = Some("OFICINA 1".to_string());
        store.records.push(current);

        let mut incoming = record("111", "DESCRIPCION CORREGIDA");
        incoming.brand = "NUEVA MARCA".to_string();
        let diff = compute_diff(&store.records.clone(), &[incoming]);
        let outcome =
            apply_selected(&mut store, &diff, &DiffSelection::default_for(&diff)).unwrap();

        assert_eq!(outcome.applied, 1);
        let updated = store.find_record("111").unwrap();
        assert_eq!(updated.description, "DESCRIPCION CORREGIDA");
        assert_eq!(updated.brand, "NUEVA MARCA");
        // La corrección de contenido jamás toca la ubicación
        assert_eq!(updated.located, SiNo::Si);
        assert_eq!(updated.assigned_custodian_name, "LÓPEZ ESTRADA LEOPOLDO");
        assert_eq!(updated.specific_location.as_deref(), Some("OFICINA 1"));
    }

    #[test]
    fn test_apply_deletion_discards_notes() {
        let mut store = InventoryStore::new();
        store.records.push(record("111", "A"));
        store.records.push(record("222", "B"));
        store
            .notes
            .insert("222".to_string(), "pata dañada".to_string());

        let incoming = vec![record("111", "A")];
        let diff = compute_diff(&store.records.clone(), &incoming);

        // La selección por defecto no incluye bajas
        let outcome =
            apply_selected(&mut store, &diff, &DiffSelection::default_for(&diff)).unwrap();
        assert_eq!(outcome.applied, 0);
        assert!(store.find_record("222").is_some());

        let outcome = apply_selected(&mut store, &diff, &DiffSelection::all_for(&diff)).unwrap();
        assert_eq!(outcome.applied, 1);
        assert!(store.find_record("222").is_none());
        assert!(!store.notes.contains_key("222"));
    }

    #[test]
    fn test_apply_rebuilds_index_once_at_end() {
        let mut store = InventoryStore::new();
        store.records.push(record("111", "A"));
        store.rebuild_index();

        let incoming = vec![record("111", "A"), record("222", "B")];
        let diff = compute_diff(&store.records.clone(), &incoming);
        apply_selected(&mut store, &diff, &DiffSelection::default_for(&diff)).unwrap();

        assert!(store.is_known_code_or_serial("222"));
        assert!(store.is_known_code_or_serial("s-222"));
    }

    /// Idempotencia: aplicar todo y volver a conciliar da un diff vacío
    #[test]
    fn test_round_trip_idempotence() {
        let mut store = InventoryStore::new();
        store.records.push(record("111", "A"));
        store.records.push(record("333", "C"));

        let incoming = vec![record("111", "A2"), record("222", "B")];
        let diff = compute_diff(&store.records.clone(), &incoming);
        apply_selected(&mut store, &diff, &DiffSelection::all_for(&diff)).unwrap();

        let second = compute_diff(&store.records.clone(), &incoming);
        assert!(second.is_empty());
    }

    /// Idempotencia parcial: lo no seleccionado sigue apareciendo en un
    /// segundo diff, lo aplicado ya no
    #[test]
    fn test_partial_apply_leaves_unselected_pending() {
        let mut store = InventoryStore::new();
        store.records.push(record("111", "A"));

        let incoming = vec![record("111", "A2"), record("222", "B")];
        let diff = compute_diff(&store.records.clone(), &incoming);

        let mut selection = DiffSelection::empty();
        selection.select(DiffKind::Addition, "222");
        let outcome = apply_selected(&mut store, &diff, &selection).unwrap();
        assert_eq!(outcome.applied, 1);

        let second = compute_diff(&store.records.clone(), &incoming);
        assert!(second.additions.is_empty());
        assert_eq!(second.modifications.len(), 1);
        assert_eq!(second.modifications[0].code, "111");
    }

    /// Aplicar bajas puede completar un área (el último pendiente se va)
    #[test]
    fn test_apply_deletion_can_complete_area() {
        let mut store = InventoryStore::new();
        let mut located = located_record("111", "ALGUIEN");
        located.original_area = "12".to_string();
        let mut pending = record("222", "PENDIENTE");
        pending.original_area = "12".to_string();
        store.records.push(located);
        store.records.push(pending);

        let incoming = vec![{
            let mut r = record("111", "BIEN UBICADO");
            r.original_area = "12".to_string();
            r
        }];
        let diff = compute_diff(&store.records.clone(), &incoming);
        let outcome = apply_selected(&mut store, &diff, &DiffSelection::all_for(&diff)).unwrap();

        assert!(outcome.events.contains(&InventoryEvent::AreaCompleted {
            area_id: "12".to_string()
        }));
        assert!(store.areas.is_completed("12"));
    }

    #[test]
    fn test_apply_read_only_rejected() {
        let mut store = InventoryStore::new();
        store.read_only = true;
        let diff = DiffResult::default();
        let err = apply_selected(&mut store, &diff, &DiffSelection::empty()).unwrap_err();
        assert!(matches!(err, Error::ReadOnly));
    }
}
