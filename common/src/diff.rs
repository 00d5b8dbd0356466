//! Motor de conciliación
//!
//! Compara el inventario vivo contra un listado nuevo y clasifica cada
//! clave en altas, cambios o bajas. El resultado es efímero: se revisa,
//! se aplica parcialmente (ver `apply`) y se descarta.

use crate::types::AssetRecord;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Campos auditados durante la conciliación
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AuditedField {
    Description,
    Brand,
    Model,
    Serial,
}

impl AuditedField {
    /// Los cuatro campos auditados, en orden de reporte
    pub const ALL: [AuditedField; 4] = [
        AuditedField::Description,
        AuditedField::Brand,
        AuditedField::Model,
        AuditedField::Serial,
    ];

    pub fn get(self, record: &AssetRecord) -> &str {
        match self {
            AuditedField::Description => &record.description,
            AuditedField::Brand => &record.brand,
            AuditedField::Model => &record.model,
            AuditedField::Serial => &record.serial,
        }
    }

    pub fn set(self, record: &mut AssetRecord, value: String) {
        match self {
            AuditedField::Description => record.description = value,
            AuditedField::Brand => record.brand = value,
            AuditedField::Model => record.model = value,
            AuditedField::Serial => record.serial = value,
        }
    }
}

impl std::fmt::Display for AuditedField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuditedField::Description => write!(f, "DESCRIPCION"),
            AuditedField::Brand => write!(f, "MARCA"),
            AuditedField::Model => write!(f, "MODELO"),
            AuditedField::Serial => write!(f, "SERIE"),
        }
    }
}

/// Un campo auditado que cambió entre el inventario y el listado nuevo
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangedField {
    pub field: AuditedField,
    pub old: String,
    pub new: String,
}

/// Un cambio detectado: el registro entrante y sus campos modificados
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModifiedEntry {
    pub code: String,
    pub incoming: AssetRecord,
    pub changes: Vec<ChangedField>,
}

/// Resultado de la conciliación: tres secuencias disjuntas
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffResult {
    /// Claves presentes en el listado nuevo y ausentes del inventario
    pub additions: Vec<AssetRecord>,
    /// Claves presentes en ambos con algún campo auditado distinto
    pub modifications: Vec<ModifiedEntry>,
    /// Registros del inventario ausentes del listado nuevo
    pub deletions: Vec<AssetRecord>,
}

impl DiffResult {
    pub fn is_empty(&self) -> bool {
        self.additions.is_empty() && self.modifications.is_empty() && self.deletions.is_empty()
    }

    pub fn total(&self) -> usize {
        self.additions.len() + self.modifications.len() + self.deletions.len()
    }
}

/// Tipo de entrada del diff
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DiffKind {
    Addition,
    Modification,
    Deletion,
}

/// Selección de entradas a aplicar, por (tipo, clave).
///
/// Cada entrada es independiente. La selección por defecto incluye altas y
/// cambios; las bajas requieren opt-in explícito por ser destructivas.
#[derive(Debug, Clone, Default)]
pub struct DiffSelection {
    keys: HashSet<(DiffKind, String)>,
}

impl DiffSelection {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Selección por defecto: altas y cambios pre-seleccionados, bajas no
    pub fn default_for(diff: &DiffResult) -> Self {
        let mut selection = Self::default();
        for record in &diff.additions {
            selection.select(DiffKind::Addition, &record.code);
        }
        for entry in &diff.modifications {
            selection.select(DiffKind::Modification, &entry.code);
        }
        selection
    }

    /// Selecciona todo, incluidas las bajas
    pub fn all_for(diff: &DiffResult) -> Self {
        let mut selection = Self::default_for(diff);
        for record in &diff.deletions {
            selection.select(DiffKind::Deletion, &record.code);
        }
        selection
    }

    pub fn select(&mut self, kind: DiffKind, code: &str) {
        self.keys.insert((kind, code.to_string()));
    }

    pub fn deselect(&mut self, kind: DiffKind, code: &str) {
        self.keys.remove(&(kind, code.to_string()));
    }

    pub fn contains(&self, kind: DiffKind, code: &str) -> bool {
        self.keys.contains(&(kind, code.to_string()))
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Compara el inventario actual contra un listado entrante.
///
/// Función pura: no modifica ninguna de las dos secuencias y puede
/// llamarse repetidamente con distintos listados.
///
/// Orden del resultado: altas y cambios siguen el orden del listado
/// entrante; las bajas siguen el orden del inventario actual.
pub fn compute_diff(current: &[AssetRecord], incoming: &[AssetRecord]) -> DiffResult {
    // Índice por clave; ante claves duplicadas gana la última
    let mut lookup: HashMap<&str, &AssetRecord> = HashMap::new();
    for record in current {
        lookup.insert(record.code.as_str(), record);
    }

    let mut diff = DiffResult::default();
    let mut visited: HashSet<&str> = HashSet::new();

    for incoming_record in incoming {
        let code = incoming_record.code.as_str();
        visited.insert(code);

        match lookup.get(code) {
            Some(current_record) => {
                let changes: Vec<ChangedField> = AuditedField::ALL
                    .iter()
                    .filter(|field| field.get(current_record) != field.get(incoming_record))
                    .map(|field| ChangedField {
                        field: *field,
                        old: field.get(current_record).to_string(),
                        new: field.get(incoming_record).to_string(),
                    })
                    .collect();

                if !changes.is_empty() {
                    diff.modifications.push(ModifiedEntry {
                        code: code.to_string(),
                        incoming: incoming_record.clone(),
                        changes,
                    });
                }
                // Sin cambios auditados: el registro se excluye del resultado
            }
            None => diff.additions.push(incoming_record.clone()),
        }
    }

    // Bajas: claves del inventario nunca visitadas, en orden del inventario
    let mut emitted: HashSet<&str> = HashSet::new();
    for record in current {
        let code = record.code.as_str();
        if visited.contains(code) || !emitted.insert(code) {
            continue;
        }
        // Ante duplicados reportamos el registro que ganó en el índice
        if let Some(winner) = lookup.get(code) {
            diff.deletions.push((*winner).clone());
        }
    }

    diff
}
