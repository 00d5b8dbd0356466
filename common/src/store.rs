//! Almacén de inventario
//!
//! Colección viva de bienes más sus índices derivados y banderas de avance.
//! Toda mutación pasa por los contratos de `apply` y `actions`; tras cada
//! mutación masiva debe llamarse `rebuild_index()` (el índice se reconstruye
//! completo, nunca se parcha incrementalmente).

use crate::error::{Error, Result};
use crate::types::{AdditionalItem, AssetRecord, Custodian, Responsible, Snapshot};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Registro de áreas: nombre visible, responsable y banderas de ciclo de vida.
///
/// `completed` es reversible mientras el área siga abierta; `closed` es
/// terminal (acta de cierre generada).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AreaRegistry {
    pub names: HashMap<String, String>,
    pub directory: HashMap<String, Responsible>,
    pub closed: HashSet<String>,
    pub completed: HashSet<String>,
}

impl AreaRegistry {
    pub fn display_name<'a>(&'a self, area_id: &'a str) -> &'a str {
        self.names.get(area_id).map(|s| s.as_str()).unwrap_or(area_id)
    }

    pub fn is_closed(&self, area_id: &str) -> bool {
        self.closed.contains(area_id)
    }

    pub fn is_completed(&self, area_id: &str) -> bool {
        self.completed.contains(area_id)
    }
}

/// Resumen para el tablero principal
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_items: usize,
    pub located_items: usize,
    pub pending_items: usize,
    /// Bienes ubicados o registrados el día de hoy
    pub daily_progress: usize,
    pub working_areas: usize,
    pub additional_items: usize,
}

/// Resumen de un lote cargado (un archivo importado)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchSummary {
    pub batch_id: i64,
    pub file_name: String,
    pub area_id: String,
    pub list_type: String,
    pub report_date: String,
    pub records: usize,
    pub completed: bool,
    pub closed: bool,
}

/// Resultado de una importación
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSummary {
    pub batch_id: i64,
    pub imported: usize,
    pub area_id: String,
    pub replaced: usize,
}

/// El almacén autoritativo de la sesión de inventario.
///
/// Se crea vacío al iniciar sesión (o se carga del documento persistido) y
/// se reinicia por completo con `reset()`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InventoryStore {
    pub records: Vec<AssetRecord>,
    pub additional_items: Vec<AdditionalItem>,
    pub custodians: Vec<Custodian>,
    /// Resguardante activo (vinculado por nombre, como en el origen)
    pub active_custodian: Option<String>,
    pub areas: AreaRegistry,
    /// Hito global: todos los bienes ubicados alguna vez (pegajoso)
    pub inventory_finished: bool,
    /// Notas por clave única (dato auxiliar; se descarta junto con la baja)
    pub notes: HashMap<String, String>,
    pub activity_log: Vec<String>,
    pub session_start: Option<String>,
    /// Falla de persistencia: bloquea toda operación mutante
    pub read_only: bool,
    /// Último identificador de lote emitido (garantiza monotonía)
    pub last_batch_id: i64,

    /// Caché de claves y series para búsqueda rápida. Derivado: se excluye
    /// de la serialización y se reconstruye con `rebuild_index()`.
    #[serde(skip)]
    pub code_serial_cache: HashSet<String>,
}

impl InventoryStore {
    pub fn new() -> Self {
        let mut store = Self {
            session_start: Some(Utc::now().to_rfc3339()),
            ..Default::default()
        };
        store.log_activity("Sesión iniciada", "Nuevo inventario");
        store
    }

    /// Rechaza la operación si el modo de solo lectura está activo
    pub fn ensure_writable(&self) -> Result<()> {
        if self.read_only {
            return Err(Error::ReadOnly);
        }
        Ok(())
    }

    // --- ÍNDICE DERIVADO ---

    /// Reconstruye la caché de claves y series en O(n).
    ///
    /// Obligatorio tras cada mutación masiva (importación, aplicación de
    /// conciliación, eliminación de lotes).
    pub fn rebuild_index(&mut self) {
        self.code_serial_cache.clear();
        for record in &self.records {
            Self::cache_value(&mut self.code_serial_cache, &record.serial);
            Self::cache_value(&mut self.code_serial_cache, &record.code);
        }
        for item in &self.additional_items {
            Self::cache_value(&mut self.code_serial_cache, &item.serial);
            Self::cache_value(&mut self.code_serial_cache, &item.code);
            Self::cache_value(&mut self.code_serial_cache, &item.assigned_code);
        }
    }

    fn cache_value(cache: &mut HashSet<String>, value: &str) {
        let normalized = value.trim().to_lowercase();
        if !normalized.is_empty() {
            cache.insert(normalized);
        }
    }

    /// Búsqueda rápida de duplicados por clave o serie (insensible a mayúsculas)
    pub fn is_known_code_or_serial(&self, value: &str) -> bool {
        self.code_serial_cache.contains(&value.trim().to_lowercase())
    }

    // --- CONSULTAS ---

    pub fn find_record(&self, code: &str) -> Option<&AssetRecord> {
        self.records.iter().find(|r| r.code == code)
    }

    pub fn find_record_mut(&mut self, code: &str) -> Option<&mut AssetRecord> {
        self.records.iter_mut().find(|r| r.code == code)
    }

    pub fn find_custodian(&self, name: &str) -> Option<&Custodian> {
        self.custodians.iter().find(|c| c.name == name)
    }

    /// Resguardante activo, si hay uno
    pub fn active_custodian(&self) -> Option<&Custodian> {
        self.active_custodian
            .as_deref()
            .and_then(|name| self.find_custodian(name))
    }

    /// Áreas conocidas: las de los bienes más las de los resguardantes
    pub fn areas_in_use(&self) -> Vec<String> {
        let mut areas: Vec<String> = self
            .records
            .iter()
            .map(|r| r.original_area.clone())
            .chain(self.custodians.iter().map(|c| c.area.clone()))
            .filter(|a| !a.is_empty())
            .collect::<HashSet<_>>()
            .into_iter()
            .collect();
        areas.sort();
        areas
    }

    /// Conteo de resguardantes por ubicación base (sin el número final)
    pub fn location_counts(&self) -> HashMap<String, usize> {
        let mut counts = HashMap::new();
        for custodian in &self.custodians {
            for location in &custodian.locations {
                if location.is_empty() {
                    continue;
                }
                let base = match location.rsplit_once(' ') {
                    Some((head, tail)) if tail.chars().all(|c| c.is_ascii_digit()) => head,
                    _ => location.as_str(),
                };
                *counts.entry(base.to_string()).or_insert(0) += 1;
            }
        }
        counts
    }

    /// Resumen para el tablero
    pub fn dashboard(&self) -> DashboardSummary {
        let total = self.records.len();
        let located = self.records.iter().filter(|r| r.located.is_si()).count();
        let today = Utc::now().format("%Y-%m-%d").to_string();

        let daily_inventory = self
            .records
            .iter()
            .filter(|r| r.located_at.as_deref().is_some_and(|d| d.starts_with(&today)))
            .count();
        let daily_additional = self
            .additional_items
            .iter()
            .filter(|i| i.registered_at.starts_with(&today))
            .count();

        DashboardSummary {
            total_items: total,
            located_items: located,
            pending_items: total - located,
            daily_progress: daily_inventory + daily_additional,
            working_areas: self
                .records
                .iter()
                .map(|r| r.original_area.as_str())
                .collect::<HashSet<_>>()
                .len(),
            additional_items: self.additional_items.len(),
        }
    }

    /// Lotes cargados, en orden de primera aparición en el inventario
    pub fn loaded_batches(&self) -> Vec<BatchSummary> {
        let mut seen = HashSet::new();
        let mut batches = Vec::new();
        for record in &self.records {
            if !seen.insert(record.batch_id) {
                continue;
            }
            let count = self
                .records
                .iter()
                .filter(|r| r.batch_id == record.batch_id)
                .count();
            batches.push(BatchSummary {
                batch_id: record.batch_id,
                file_name: record.source_file_name.clone(),
                area_id: record.original_area.clone(),
                list_type: record.original_list_type.clone(),
                report_date: record.report_date.clone(),
                records: count,
                completed: self.areas.is_completed(&record.original_area),
                closed: self.areas.is_closed(&record.original_area),
            });
        }
        batches
    }

    // --- IMPORTACIÓN DE LISTADOS ---

    /// ¿Ya se cargó un archivo con este nombre? La política de duplicados es
    /// por nombre de archivo, no por clave: dos archivos distintos pueden
    /// introducir claves en colisión y el motor de conciliación lo tolera.
    pub fn file_already_loaded(&self, file_name: &str) -> bool {
        self.records.iter().any(|r| r.source_file_name == file_name)
    }

    /// Identificador de lote nuevo: milisegundos actuales, forzado a ser
    /// estrictamente mayor que el último emitido
    pub fn next_batch_id(&mut self) -> i64 {
        let now = Utc::now().timestamp_millis();
        self.last_batch_id = now.max(self.last_batch_id + 1);
        self.last_batch_id
    }

    /// Importa un listado normalizado como un lote nuevo.
    ///
    /// Con `replace` activo elimina primero todos los registros cuyo archivo
    /// de origen coincida; sin `replace`, un nombre repetido es un error que
    /// la interfaz debe confirmar con el usuario.
    pub fn import_snapshot(&mut self, snapshot: Snapshot, replace: bool) -> Result<ImportSummary> {
        self.ensure_writable()?;

        let meta = snapshot.meta;
        let mut replaced = 0;
        if self.file_already_loaded(&meta.source_file) {
            if !replace {
                return Err(Error::DuplicateBatch(meta.source_file));
            }
            replaced = self.remove_batch_by_file(&meta.source_file);
        }

        if !meta.area_id.is_empty() && !self.areas.names.contains_key(&meta.area_id) {
            self.areas
                .names
                .insert(meta.area_id.clone(), meta.area_display.clone());
        }
        if let Some(responsible) = &meta.responsible {
            self.areas
                .directory
                .insert(meta.area_id.clone(), responsible.clone());
        }

        let batch_id = self.next_batch_id();
        let imported = snapshot.records.len();
        for mut record in snapshot.records {
            record.original_area = meta.area_id.clone();
            record.original_list_type = meta.list_type.clone();
            record.batch_id = batch_id;
            record.source_file_name = meta.source_file.clone();
            record.report_date = meta.report_date.clone();
            self.records.push(record);
        }

        // Un lote nuevo reabre el hito global
        self.inventory_finished = false;
        self.rebuild_index();
        self.log_activity(
            "Archivo cargado",
            &format!("Archivo \"{}\" ({} bienes)", meta.source_file, imported),
        );

        Ok(ImportSummary {
            batch_id,
            imported,
            area_id: meta.area_id,
            replaced,
        })
    }

    /// Elimina todos los registros con ese archivo de origen
    pub fn remove_batch_by_file(&mut self, file_name: &str) -> usize {
        let before = self.records.len();
        self.records.retain(|r| r.source_file_name != file_name);
        let removed = before - self.records.len();
        if removed > 0 {
            self.rebuild_index();
        }
        removed
    }

    /// Elimina un lote por identificador
    pub fn remove_batch(&mut self, batch_id: i64) -> Result<usize> {
        self.ensure_writable()?;
        let before = self.records.len();
        self.records.retain(|r| r.batch_id != batch_id);
        let removed = before - self.records.len();
        if removed > 0 {
            self.rebuild_index();
            self.log_activity("Listado eliminado", &format!("{} bienes", removed));
        }
        Ok(removed)
    }

    // --- RESGUARDANTES ---

    pub fn add_custodian(&mut self, name: &str, area: &str, locations: Vec<String>) -> Result<()> {
        self.ensure_writable()?;
        let id = format!("u-{:x}-{}", Utc::now().timestamp_millis(), self.custodians.len());
        self.custodians.push(Custodian {
            id,
            name: name.to_string(),
            area: area.to_string(),
            locations,
        });
        self.log_activity("Resguardante registrado", name);
        Ok(())
    }

    pub fn set_active_custodian(&mut self, name: &str) -> Result<()> {
        if self.find_custodian(name).is_none() {
            return Err(Error::UnknownCustodian(name.to_string()));
        }
        self.active_custodian = Some(name.to_string());
        Ok(())
    }

    // --- BIENES ADICIONALES ---

    /// Registra un bien adicional al resguardante activo.
    ///
    /// La caché de claves y series detecta duplicados contra el inventario
    /// completo; `force` permite registrar de todos modos tras confirmar.
    pub fn add_additional_item(&mut self, mut item: AdditionalItem, force: bool) -> Result<()> {
        self.ensure_writable()?;
        let active = self.active_custodian().ok_or(Error::NoActiveCustodian)?;
        item.custodian_name = active.name.clone();

        if !force {
            for value in [item.code.as_str(), item.serial.as_str()] {
                if !value.is_empty() && self.is_known_code_or_serial(value) {
                    return Err(Error::DuplicateSerial(value.to_string()));
                }
            }
        }

        item.registered_at = Utc::now().to_rfc3339();
        let description = item.description.clone();
        self.additional_items.push(item);
        self.rebuild_index();
        self.log_activity("Bien adicional registrado", &description);
        Ok(())
    }

    // --- NOTAS ---

    /// Registra o reemplaza la nota de un bien. La nota es dato auxiliar:
    /// se descarta junto con la baja del bien.
    pub fn set_note(&mut self, code: &str, text: &str) -> Result<()> {
        self.ensure_writable()?;
        if self.find_record(code).is_none() {
            return Err(Error::UnknownCode(code.to_string()));
        }
        self.notes.insert(code.to_string(), text.to_string());
        self.log_activity("Nota registrada", code);
        Ok(())
    }

    // --- ÁREAS ---

    /// Cierra un área (terminal): solo válido sobre un área completada
    pub fn close_area(&mut self, area_id: &str) -> Result<()> {
        self.ensure_writable()?;
        if !self.areas.is_completed(area_id) {
            return Err(Error::AreaNotCompleted(area_id.to_string()));
        }
        self.areas.closed.insert(area_id.to_string());
        self.log_activity("Área cerrada", &format!("Acta de cierre del área {}", area_id));
        Ok(())
    }

    // --- BITÁCORA Y SESIÓN ---

    /// Bitácora centralizada de actividad
    pub fn log_activity(&mut self, action: &str, details: &str) {
        let timestamp = Utc::now().format("%d/%m/%Y %H:%M:%S");
        self.activity_log.push(format!("[{}] {}: {}", timestamp, action, details));
    }

    /// Reinicia la sesión: descarta todo el estado en memoria. El registro
    /// de quién reinició queda a cargo del llamador.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Serializa el documento de sesión. La caché derivada queda fuera
    /// (campo `#[serde(skip)]`) y se reconstruye al cargar.
    pub fn to_session_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Restaura un documento de sesión y reconstruye los índices
    pub fn from_session_json(json: &str) -> Result<Self> {
        let mut store: Self = serde_json::from_str(json)?;
        store.rebuild_index();
        Ok(store)
    }
}
