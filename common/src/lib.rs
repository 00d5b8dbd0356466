//! Inventario Pro - Biblioteca común
//!
//! Tipos y lógica compartidos entre el CLI y un posible frontend Web (WASM):
//! modelo de datos, motor de conciliación, almacén de inventario,
//! máquina de estados de ubicación y evaluador de áreas completas.

pub mod types;
pub mod error;
pub mod diff;
pub mod apply;
pub mod store;
pub mod actions;
pub mod completion;
pub mod verifiers;

pub use types::{AssetRecord, AdditionalItem, Custodian, Responsible, SiNo, Snapshot, SnapshotMeta};
pub use error::{Error, Result};
pub use diff::{compute_diff, ChangedField, DiffKind, DiffResult, DiffSelection, ModifiedEntry};
pub use apply::{apply_selected, ApplyOutcome};
pub use store::{BatchSummary, DashboardSummary, InventoryStore};
pub use actions::{locate, relabel, unlocate};
pub use completion::{evaluate_all, evaluate_area, evaluate_global, InventoryEvent};
pub use verifiers::verify_employee;
