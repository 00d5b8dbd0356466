//! Normalizador de listados
//!
//! Convierte un archivo .xlsx institucional en un `Snapshot` normalizado:
//! - filas de bienes a partir del renglón 12, filtradas por clave única
//! - fecha de impresión detectada en el encabezado (celda serial o texto)
//! - área, tipo de libro y responsable extraídos del encabezado
//!
//! Las filas sin clave válida se descartan en silencio. El parseo trabaja
//! sobre estructuras temporales: un archivo ilegible jamás toca el almacén.

use crate::error::{InventarioError, Result};
use calamine::{open_workbook, Data, Range, Reader, Xlsx};
use chrono::NaiveDate;
use inventario_common::types::{AssetRecord, Responsible, Snapshot, SnapshotMeta};
use lazy_static::lazy_static;
use regex::Regex;
use std::path::Path;

lazy_static! {
    /// Clave única: 5-6 dígitos, o decimal `0.xxx` para claves heredadas
    static ref CLAVE_UNICA_RE: Regex = Regex::new(r"^(?:\d{5,6}|0\.\d+)$").unwrap();
    static ref AREA_RE: Regex = Regex::new(r"AREA\s(\d+)").unwrap();
    static ref DATE_RE: Regex = Regex::new(r"\d{2}[/\-]\d{2}[/\-]\d{4}").unwrap();
}

/// Primer renglón de datos (0-indexado): los listados traen 11 renglones
/// de encabezado
const DATA_START_ROW: u32 = 11;

const COL_CODE: u32 = 0;
const COL_DESCRIPTION: u32 = 1;
const COL_BRAND: u32 = 4;
const COL_MODEL: u32 = 5;
const COL_SERIAL: u32 = 6;

/// ¿El valor es una clave única aceptable?
pub fn is_valid_code(value: &str) -> bool {
    CLAVE_UNICA_RE.is_match(value)
}

/// Parsea y normaliza un listado .xlsx
pub fn parse_snapshot(path: &Path) -> Result<Snapshot> {
    if !path.exists() {
        return Err(InventarioError::FileNotFound(path.display().to_string()));
    }

    let mut workbook: Xlsx<_> = open_workbook(path)
        .map_err(|e| InventarioError::ParseFailure(format!("{}: {}", path.display(), e)))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| InventarioError::ParseFailure("el archivo no tiene hojas".into()))?
        .map_err(|e| InventarioError::ParseFailure(e.to_string()))?;

    let source_file = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let (area_id, area_display) = extract_area(&range);
    let meta = SnapshotMeta {
        area_id,
        area_display,
        list_type: book_type(&range),
        report_date: find_report_date_smart(&range),
        responsible: extract_responsible(&range),
        source_file,
    };

    // `end()` es posición absoluta; la altura del rango no sirve porque el
    // rango arranca en la primera celda no vacía
    let end_row = range.end().map(|(row, _)| row).unwrap_or(0);

    let mut records = Vec::new();
    for row in DATA_START_ROW..=end_row {
        let code = cell_text(&range, row, COL_CODE).trim().to_string();
        if !is_valid_code(&code) {
            continue;
        }
        records.push(AssetRecord::from_listing(
            code,
            cell_text(&range, row, COL_DESCRIPTION),
            cell_text(&range, row, COL_BRAND),
            cell_text(&range, row, COL_MODEL),
            cell_text(&range, row, COL_SERIAL),
        ));
    }

    Ok(Snapshot { meta, records })
}

fn cell_text(range: &Range<Data>, row: u32, col: u32) -> String {
    match range.get_value((row, col)) {
        None | Some(Data::Empty) => String::new(),
        Some(Data::String(s)) => s.clone(),
        Some(Data::Float(f)) => format!("{}", f),
        Some(Data::Int(i)) => i.to_string(),
        Some(other) => other.to_string(),
    }
}

fn cell_number(range: &Range<Data>, row: u32, col: u32) -> Option<f64> {
    match range.get_value((row, col))? {
        Data::Float(f) => Some(*f),
        Data::Int(i) => Some(*i as f64),
        Data::DateTime(dt) => Some(dt.as_f64()),
        _ => None,
    }
}

/// Busca la fecha de impresión en el encabezado (renglones 1-11).
///
/// Acepta tanto celdas de fecha en serial de Excel (ventana 43000-60000,
/// es decir, años ~2017-2064) como texto dd/mm/aaaa. Regresa "S/F" si no
/// hay fecha reconocible.
pub fn find_report_date_smart(range: &Range<Data>) -> String {
    let (end_row, end_col) = match range.end() {
        Some(end) => end,
        None => return "S/F".to_string(),
    };
    let max_row = end_row.min(10);
    let max_col = end_col.min(30);

    for row in 0..=max_row {
        for col in 0..=max_col {
            if let Some(serial) = cell_number(range, row, col) {
                if serial > 43000.0 && serial < 60000.0 {
                    if let Some(date) = excel_serial_to_date(serial) {
                        return date;
                    }
                }
            }
            let text = cell_text(range, row, col);
            if let Some(found) = DATE_RE.find(&text) {
                return found.as_str().to_string();
            }
        }
    }
    "S/F".to_string()
}

/// Serial de Excel → dd/mm/aaaa (época 30/12/1899)
fn excel_serial_to_date(serial: f64) -> Option<String> {
    let base = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    let date = base.checked_add_signed(chrono::Duration::days(serial.trunc() as i64))?;
    Some(date.format("%d/%m/%Y").to_string())
}

/// Área del encabezado (celda A10): identificador y texto completo
fn extract_area(range: &Range<Data>) -> (String, String) {
    let header = cell_text(range, 9, 0);
    let area_id = AREA_RE
        .captures(&header)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| "Sin Área".to_string());
    let display = if header.trim().is_empty() {
        "Sin Área".to_string()
    } else {
        header.trim().to_string()
    };
    (area_id, display)
}

/// Tipo de libro: celda B7 con respaldo en L7
fn book_type(range: &Range<Data>) -> String {
    let primary = cell_text(range, 6, 1);
    if !primary.trim().is_empty() {
        return primary.trim().to_string();
    }
    let fallback = cell_text(range, 6, 11);
    if !fallback.trim().is_empty() {
        return fallback.trim().to_string();
    }
    "Sin Tipo".to_string()
}

/// Responsable del área: bajo la etiqueta "responsable", el nombre está dos
/// renglones abajo y el cargo tres
fn extract_responsible(range: &Range<Data>) -> Option<Responsible> {
    let (end_row, end_col) = range.end()?;
    for row in 0..=end_row {
        for col in 0..=end_col {
            let label = cell_text(range, row, col);
            if label.trim().to_lowercase() != "responsable" {
                continue;
            }
            let name = cell_text(range, row + 2, col).trim().to_string();
            let title = cell_text(range, row + 3, col).trim().to_string();
            if !name.is_empty() && !title.is_empty() {
                return Some(Responsible { name, title });
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_code() {
        assert!(is_valid_code("12345"));
        assert!(is_valid_code("123456"));
        assert!(is_valid_code("0.45"));
        assert!(is_valid_code("0.123456"));

        assert!(!is_valid_code("1234"));      // muy corta
        assert!(!is_valid_code("1234567"));   // muy larga
        assert!(!is_valid_code("12a45"));
        assert!(!is_valid_code("1.45"));      // solo 0.x desambigua
        assert!(!is_valid_code(""));
        assert!(!is_valid_code("TOTAL"));
    }

    #[test]
    fn test_excel_serial_to_date() {
        // 45292 = 01/01/2024
        assert_eq!(excel_serial_to_date(45292.0).as_deref(), Some("01/01/2024"));
        // La parte fraccional (hora) se ignora
        assert_eq!(excel_serial_to_date(45292.75).as_deref(), Some("01/01/2024"));
    }

    #[test]
    fn test_date_regex_variants() {
        assert!(DATE_RE.is_match("IMPRESO EL 03/02/2026"));
        assert!(DATE_RE.is_match("03-02-2026"));
        assert!(!DATE_RE.is_match("3/2/2026")); // sin ceros no es formato de listado
    }
}
