//! Modelo de datos del inventario
//!
//! Tipos compartidos entre el CLI y Web:
//! - AssetRecord: un bien del listado institucional
//! - AdditionalItem: bien adicional no listado
//! - Custodian: resguardante con sus ubicaciones
//! - Snapshot: un listado normalizado (archivo parseado)

use serde::{Deserialize, Serialize};

/// Bandera SI/NO tal como aparece en los listados originales
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SiNo {
    #[serde(rename = "SI")]
    Si,
    #[default]
    #[serde(rename = "NO")]
    No,
}

impl SiNo {
    pub fn is_si(self) -> bool {
        matches!(self, SiNo::Si)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SiNo::Si => "SI",
            SiNo::No => "NO",
        }
    }
}

impl std::fmt::Display for SiNo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Un bien físico del inventario
///
/// La clave única es el identificador de negocio: 5-6 dígitos, o un
/// decimal `0.xxx` para claves heredadas que colisionarían entre sí.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AssetRecord {
    /// Clave única (inmutable una vez asignada)
    pub code: String,
    pub description: String,
    pub brand: String,
    pub model: String,
    pub serial: String,

    /// Área bajo la que se importó el bien (procedencia, inmutable)
    pub original_area: String,
    /// Tipo de libro/listado de origen (solo procedencia)
    pub original_list_type: String,
    /// Identificador del lote de importación
    pub batch_id: i64,
    pub source_file_name: String,
    /// Fecha de impresión del listado de origen
    pub report_date: String,

    /// UBICADO
    pub located: SiNo,
    /// NOMBRE DE USUARIO (vacío mientras no esté ubicado)
    pub assigned_custodian_name: String,
    /// IMPRIMIR ETIQUETA
    pub needs_label_print: SiNo,
    /// Ubicación precisa elegida al momento de ubicar
    #[serde(skip_serializing_if = "Option::is_none")]
    pub specific_location: Option<String>,
    /// Ubicado en un área distinta a la de origen (derivado)
    pub area_mismatch: bool,
    /// Fecha/hora de ubicación (ISO 8601)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub located_at: Option<String>,
}

impl AssetRecord {
    /// Crea un registro recién normalizado a partir de una fila del listado.
    /// Los campos de ubicación quedan en su estado inicial (no ubicado).
    pub fn from_listing(
        code: String,
        description: String,
        brand: String,
        model: String,
        serial: String,
    ) -> Self {
        Self {
            code,
            description,
            brand,
            model,
            serial,
            ..Default::default()
        }
    }
}

/// Bien adicional: detectado en campo pero ausente de los listados
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdditionalItem {
    pub code: String,
    pub description: String,
    pub brand: String,
    pub serial: String,
    /// Clave asignada manualmente durante el levantamiento
    pub assigned_code: String,
    /// Resguardante al que se registró
    pub custodian_name: String,
    /// Bien personal (no institucional)
    pub personal: SiNo,
    /// Fecha de registro (ISO 8601)
    pub registered_at: String,
}

/// Resguardante: persona responsable de una o más ubicaciones de un área.
///
/// Conserva el comportamiento de origen: existe un `id` estable, pero los
/// bienes se vinculan por `name`. Renombrar un resguardante no re-vincula
/// sus bienes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Custodian {
    pub id: String,
    pub name: String,
    pub area: String,
    pub locations: Vec<String>,
}

impl Custodian {
    /// Ubicación por defecto (la primera registrada)
    pub fn default_location(&self) -> Option<&str> {
        self.locations.first().map(|s| s.as_str())
    }
}

/// Responsable de área extraído del encabezado del listado
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Responsible {
    pub name: String,
    pub title: String,
}

/// Metadatos de un listado normalizado
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SnapshotMeta {
    /// Identificador de área extraído del encabezado (p. ej. "12")
    pub area_id: String,
    /// Texto completo del encabezado de área
    pub area_display: String,
    /// Tipo de libro (celda B7 del listado)
    pub list_type: String,
    /// Fecha de impresión detectada ("S/F" si no se encontró)
    pub report_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub responsible: Option<Responsible>,
    pub source_file: String,
}

/// Un listado parseado y normalizado, listo para importar o conciliar
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Snapshot {
    pub meta: SnapshotMeta,
    pub records: Vec<AssetRecord>,
}
