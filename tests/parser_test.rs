//! Pruebas del normalizador de listados
//!
//! Genera archivos .xlsx con el mismo trazado que los listados
//! institucionales y verifica la extracción de encabezado y filas.

use inventario_pro::error::InventarioError;
use inventario_pro::parser;
use rust_xlsxwriter::Workbook;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

/// Escribe un listado de prueba con encabezado institucional y filas dadas
fn write_listing(
    dir: &Path,
    file_name: &str,
    area_header: &str,
    rows: &[(&str, &str, &str, &str, &str)],
) -> PathBuf {
    let path = dir.join(file_name);
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    // Encabezado: fecha (renglón 3), tipo de libro (B7), área (A10)
    worksheet.write_string(2, 0, "IMPRESO EL 03/02/2026").unwrap();
    worksheet.write_string(6, 1, "LIBRO OFICIAL").unwrap();
    worksheet.write_string(9, 0, area_header).unwrap();

    // Bloque de responsable
    worksheet.write_string(4, 7, "RESPONSABLE").unwrap();
    worksheet.write_string(6, 7, "GARCÍA MORALES ELENA").unwrap();
    worksheet.write_string(7, 7, "JEFA DE DEPARTAMENTO").unwrap();

    // Filas de datos a partir del renglón 12
    for (i, (code, description, brand, model, serial)) in rows.iter().enumerate() {
        let row = 11 + i as u32;
        worksheet.write_string(row, 0, *code).unwrap();
        worksheet.write_string(row, 1, *description).unwrap();
        worksheet.write_string(row, 4, *brand).unwrap();
        worksheet.write_string(row, 5, *model).unwrap();
        worksheet.write_string(row, 6, *serial).unwrap();
    }

    workbook.save(&path).unwrap();
    path
}

#[test]
fn test_parse_filters_rows_by_code() {
    let dir = tempdir().expect("tempdir");
    let path = write_listing(
        dir.path(),
        "listado.xlsx",
        "AREA 12 DIRECCION DE RECURSOS MATERIALES",
        &[
            ("12345", "SILLA SECRETARIAL", "HON", "GS-200", "A991"),
            ("TOTAL", "", "", "", ""),      // fila de resumen: se descarta
            ("0.45", "MESA DE JUNTAS", "", "", ""),
            ("1234", "CLAVE CORTA", "", "", ""), // clave inválida
            ("123456", "ARCHIVERO", "STEELE", "", "B-40"),
        ],
    );

    let snapshot = parser::parse_snapshot(&path).expect("parsear listado");
    let codes: Vec<&str> = snapshot.records.iter().map(|r| r.code.as_str()).collect();
    assert_eq!(codes, vec!["12345", "0.45", "123456"]);

    let first = &snapshot.records[0];
    assert_eq!(first.description, "SILLA SECRETARIAL");
    assert_eq!(first.brand, "HON");
    assert_eq!(first.model, "GS-200");
    assert_eq!(first.serial, "A991");
}

#[test]
fn test_parse_extracts_header_metadata() {
    let dir = tempdir().expect("tempdir");
    let path = write_listing(
        dir.path(),
        "area12.xlsx",
        "AREA 12 DIRECCION DE RECURSOS MATERIALES",
        &[("12345", "SILLA", "", "", "")],
    );

    let snapshot = parser::parse_snapshot(&path).expect("parsear listado");
    assert_eq!(snapshot.meta.area_id, "12");
    assert_eq!(
        snapshot.meta.area_display,
        "AREA 12 DIRECCION DE RECURSOS MATERIALES"
    );
    assert_eq!(snapshot.meta.list_type, "LIBRO OFICIAL");
    assert_eq!(snapshot.meta.report_date, "03/02/2026");
    assert_eq!(snapshot.meta.source_file, "area12.xlsx");

    let responsible = snapshot.meta.responsible.expect("responsable");
    assert_eq!(responsible.name, "GARCÍA MORALES ELENA");
    assert_eq!(responsible.title, "JEFA DE DEPARTAMENTO");
}

#[test]
fn test_parse_header_without_area_number() {
    let dir = tempdir().expect("tempdir");
    let path = write_listing(
        dir.path(),
        "sin-area.xlsx",
        "OFICINAS GENERALES",
        &[("12345", "SILLA", "", "", "")],
    );

    let snapshot = parser::parse_snapshot(&path).expect("parsear listado");
    assert_eq!(snapshot.meta.area_id, "Sin Área");
    assert_eq!(snapshot.meta.area_display, "OFICINAS GENERALES");
}

#[test]
fn test_parse_date_from_excel_serial() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("serial.xlsx");

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    // 45292 = 01/01/2024 en serial de Excel
    worksheet.write_number(1, 1, 45292.0).unwrap();
    worksheet.write_string(9, 0, "AREA 3").unwrap();
    worksheet.write_string(11, 0, "55555").unwrap();
    workbook.save(&path).unwrap();

    let snapshot = parser::parse_snapshot(&path).expect("parsear listado");
    assert_eq!(snapshot.meta.report_date, "01/01/2024");
}

#[test]
fn test_parse_without_date_reports_sf() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("sin-fecha.xlsx");

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.write_string(9, 0, "AREA 3").unwrap();
    worksheet.write_string(11, 0, "55555").unwrap();
    workbook.save(&path).unwrap();

    let snapshot = parser::parse_snapshot(&path).expect("parsear listado");
    assert_eq!(snapshot.meta.report_date, "S/F");
    // Sin celda B7 ni L7: tipo por defecto
    assert_eq!(snapshot.meta.list_type, "Sin Tipo");
}

#[test]
fn test_parse_numeric_codes() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("numerico.xlsx");

    // Las claves llegan a veces como celdas numéricas, no texto
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.write_string(9, 0, "AREA 7").unwrap();
    worksheet.write_number(11, 0, 54321.0).unwrap();
    worksheet.write_string(11, 1, "PROYECTOR").unwrap();
    workbook.save(&path).unwrap();

    let snapshot = parser::parse_snapshot(&path).expect("parsear listado");
    assert_eq!(snapshot.records.len(), 1);
    assert_eq!(snapshot.records[0].code, "54321");
}

#[test]
fn test_parse_missing_file() {
    let result = parser::parse_snapshot(Path::new("/no/existe/listado.xlsx"));
    assert!(matches!(result, Err(InventarioError::FileNotFound(_))));
}

#[test]
fn test_parse_unreadable_file() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("roto.xlsx");
    std::fs::write(&path, b"esto no es un xlsx").unwrap();

    let result = parser::parse_snapshot(&path);
    assert!(matches!(result, Err(InventarioError::ParseFailure(_))));
}
