//! Reportes en Excel
//!
//! Genera los reportes de inventario y de etiquetas pendientes con el
//! mismo encabezado de columnas que los listados institucionales.

use crate::error::{InventarioError, Result};
use inventario_common::InventoryStore;
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use std::path::Path;

const INVENTORY_HEADERS: &[&str] = &[
    "CLAVE UNICA",
    "DESCRIPCION",
    "MARCA",
    "MODELO",
    "SERIE",
    "UBICADO",
    "NOMBRE DE USUARIO",
    "UBICACION",
    "AREA",
    "TIPO DE LIBRO",
    "FECHA UBICADO",
    "IMPRIMIR ETIQUETA",
];

const LABEL_HEADERS: &[&str] = &["CLAVE UNICA", "DESCRIPCION", "NOMBRE DE USUARIO", "UBICACION"];

fn write_headers(worksheet: &mut Worksheet, headers: &[&str]) -> Result<()> {
    let bold = Format::new().set_bold();
    for (col, header) in headers.iter().enumerate() {
        worksheet
            .write_with_format(0, col as u16, *header, &bold)
            .map_err(|e| InventarioError::Report(e.to_string()))?;
    }
    Ok(())
}

/// Reporte completo del inventario
pub fn generate_inventory_report(store: &InventoryStore, output_path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name("Inventario")
        .map_err(|e| InventarioError::Report(e.to_string()))?;

    write_headers(worksheet, INVENTORY_HEADERS)?;

    for (i, record) in store.records.iter().enumerate() {
        let row = (i + 1) as u32;
        let cells = [
            record.code.as_str(),
            record.description.as_str(),
            record.brand.as_str(),
            record.model.as_str(),
            record.serial.as_str(),
            record.located.as_str(),
            record.assigned_custodian_name.as_str(),
            record.specific_location.as_deref().unwrap_or(""),
            record.original_area.as_str(),
            record.original_list_type.as_str(),
            record.located_at.as_deref().unwrap_or(""),
            record.needs_label_print.as_str(),
        ];
        for (col, value) in cells.iter().enumerate() {
            worksheet
                .write_string(row, col as u16, *value)
                .map_err(|e| InventarioError::Report(e.to_string()))?;
        }
    }

    // Columnas de texto largo más anchas
    worksheet
        .set_column_width(1, 45)
        .map_err(|e| InventarioError::Report(e.to_string()))?;
    worksheet
        .set_column_width(6, 35)
        .map_err(|e| InventarioError::Report(e.to_string()))?;

    workbook
        .save(output_path)
        .map_err(|e| InventarioError::Report(e.to_string()))?;
    Ok(())
}

/// Reporte de etiquetas pendientes de impresión. Regresa cuántas filas
/// se escribieron.
pub fn generate_labels_report(store: &InventoryStore, output_path: &Path) -> Result<usize> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet
        .set_name("Etiquetas")
        .map_err(|e| InventarioError::Report(e.to_string()))?;

    write_headers(worksheet, LABEL_HEADERS)?;

    let mut row: u32 = 1;
    for record in store.records.iter().filter(|r| r.needs_label_print.is_si()) {
        let cells = [
            record.code.as_str(),
            record.description.as_str(),
            record.assigned_custodian_name.as_str(),
            record.specific_location.as_deref().unwrap_or(""),
        ];
        for (col, value) in cells.iter().enumerate() {
            worksheet
                .write_string(row, col as u16, *value)
                .map_err(|e| InventarioError::Report(e.to_string()))?;
        }
        row += 1;
    }

    workbook
        .save(output_path)
        .map_err(|e| InventarioError::Report(e.to_string()))?;
    Ok((row - 1) as usize)
}
