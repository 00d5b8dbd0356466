//! Pruebas del flujo completo de conciliación
//!
//! Importar → ubicar → conciliar contra un listado nuevo → aplicar
//! selección → verificar avance y persistencia.

use inventario_common::{
    actions, apply_selected, compute_diff, AssetRecord, DiffKind, DiffSelection, Error as CoreError,
    InventoryEvent, InventoryStore, SiNo, Snapshot, SnapshotMeta,
};
use inventario_pro::session;
use tempfile::tempdir;

fn listing(file: &str, area: &str, rows: &[(&str, &str, &str)]) -> Snapshot {
    Snapshot {
        meta: SnapshotMeta {
            area_id: area.to_string(),
            area_display: format!("AREA {} OFICINAS", area),
            list_type: "LIBRO OFICIAL".to_string(),
            report_date: "03/02/2026".to_string(),
            responsible: None,
            source_file: file.to_string(),
        },
        records: rows
            .iter()
            .map(|(code, description, brand)| {
                AssetRecord::from_listing(
                    code.to_string(),
                    description.to_string(),
                    brand.to_string(),
                    String::new(),
                    String::new(),
                )
            })
            .collect(),
    }
}

fn store_with_inventory() -> InventoryStore {
    let mut store = InventoryStore::new();
    store
        .import_snapshot(
            listing(
                "area12.xlsx",
                "12",
                &[
                    ("11111", "SILLA SECRETARIAL", "HON"),
                    ("22222", "ESCRITORIO", "STEELE"),
                ],
            ),
            false,
        )
        .expect("importar listado");
    store
        .add_custodian("LÓPEZ QUINTANA ALDO", "12", vec!["OFICINA 3".to_string()])
        .expect("alta de resguardante");
    store
        .set_active_custodian("LÓPEZ QUINTANA ALDO")
        .expect("activar resguardante");
    store
}

/// Flujo completo: el listado actualizado trae un alta, un cambio y una baja
#[test]
fn test_full_reconciliation_flow() {
    let mut store = store_with_inventory();

    let updated = listing(
        "area12-actualizado.xlsx",
        "12",
        &[
            ("11111", "SILLA SECRETARIAL", "HON-2"), // cambio de marca
            ("33333", "PROYECTOR", "EPSON"),         // alta
        ],
    );

    let diff = compute_diff(&store.records, &updated.records);
    assert_eq!(diff.additions.len(), 1);
    assert_eq!(diff.modifications.len(), 1);
    assert_eq!(diff.deletions.len(), 1);
    assert_eq!(diff.deletions[0].code, "22222");

    // Selección por defecto: la baja queda pendiente
    let outcome = apply_selected(&mut store, &diff, &DiffSelection::default_for(&diff))
        .expect("aplicar conciliación");
    assert_eq!(outcome.applied, 2);
    assert!(store.find_record("22222").is_some());
    assert_eq!(store.find_record("11111").unwrap().brand, "HON-2");
    assert_eq!(store.find_record("33333").unwrap().located, SiNo::No);

    // Con la baja incluida, el segundo diff queda vacío
    let mut selection = DiffSelection::empty();
    selection.select(DiffKind::Deletion, "22222");
    apply_selected(&mut store, &diff, &selection).expect("aplicar baja");

    let second = compute_diff(&store.records, &updated.records);
    assert!(second.is_empty());
}

/// La aplicación parcial no toca la ubicación de los bienes existentes
#[test]
fn test_modification_keeps_custody() {
    let mut store = store_with_inventory();
    actions::locate(&mut store, "11111", None, false).expect("ubicar");

    let updated = listing(
        "area12-v2.xlsx",
        "12",
        &[
            ("11111", "SILLA SECRETARIAL REFORZADA", "HON"),
            ("22222", "ESCRITORIO", "STEELE"),
        ],
    );
    let diff = compute_diff(&store.records, &updated.records);
    apply_selected(&mut store, &diff, &DiffSelection::default_for(&diff)).expect("aplicar");

    let record = store.find_record("11111").unwrap();
    assert_eq!(record.description, "SILLA SECRETARIAL REFORZADA");
    assert_eq!(record.located, SiNo::Si);
    assert_eq!(record.assigned_custodian_name, "LÓPEZ QUINTANA ALDO");
}

/// Ubicar todos los bienes de un área notifica una sola vez
#[test]
fn test_completion_through_actions() {
    let mut store = store_with_inventory();

    let events = actions::locate(&mut store, "11111", None, false).expect("ubicar");
    assert!(events.is_empty());

    let events = actions::locate(&mut store, "22222", None, false).expect("ubicar");
    assert!(events.contains(&InventoryEvent::AreaCompleted {
        area_id: "12".to_string()
    }));
    assert!(events.contains(&InventoryEvent::InventoryFinished));

    // Des-ubicar reabre el área en silencio; el hito global es pegajoso
    let events = actions::unlocate(&mut store, "22222").expect("des-ubicar");
    assert!(events.is_empty());
    assert!(!store.areas.is_completed("12"));
    assert!(store.inventory_finished);
}

/// Conflicto de resguardo a través del flujo completo
#[test]
fn test_reassignment_flow() {
    let mut store = store_with_inventory();
    actions::locate(&mut store, "11111", None, false).expect("ubicar");

    store
        .add_custodian("MARIN ESPINOSA MIGUEL", "15", vec![])
        .expect("alta");
    store
        .set_active_custodian("MARIN ESPINOSA MIGUEL")
        .expect("activar");

    let err = actions::locate(&mut store, "11111", None, false).unwrap_err();
    assert!(matches!(err, CoreError::AssignmentConflict { .. }));

    actions::locate(&mut store, "11111", None, true).expect("reasignar confirmado");
    let record = store.find_record("11111").unwrap();
    assert_eq!(record.assigned_custodian_name, "MARIN ESPINOSA MIGUEL");
    // Área de origen 12, resguardante del área 15
    assert!(record.area_mismatch);
}

/// La sesión sobrevive un ciclo guardar/cargar con el índice reconstruido
#[test]
fn test_session_round_trip_preserves_flow() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("session.json");

    let mut store = store_with_inventory();
    actions::locate(&mut store, "11111", None, false).expect("ubicar");
    session::save(&mut store, &path).expect("guardar");

    let mut restored = session::load(&path).expect("cargar").expect("sesión");
    assert_eq!(restored.records.len(), 2);
    assert!(restored.is_known_code_or_serial("11111"));
    assert_eq!(
        restored.find_record("11111").unwrap().assigned_custodian_name,
        "LÓPEZ QUINTANA ALDO"
    );

    // El resguardante activo también persiste y las acciones continúan
    let events = actions::locate(&mut restored, "22222", None, false).expect("ubicar");
    assert!(!events.is_empty());
}

/// El modo de solo lectura bloquea el flujo mutante de extremo a extremo
#[test]
fn test_read_only_blocks_flow() {
    let mut store = store_with_inventory();
    store.read_only = true;

    let err = actions::locate(&mut store, "11111", None, false).unwrap_err();
    assert!(matches!(err, CoreError::ReadOnly));

    let diff = compute_diff(&store.records, &[]);
    let err = apply_selected(&mut store, &diff, &DiffSelection::all_for(&diff)).unwrap_err();
    assert!(matches!(err, CoreError::ReadOnly));
}
