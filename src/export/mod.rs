pub mod excel;

use crate::cli::ExportFormat;
use crate::error::Result;
use crate::session;
use inventario_common::InventoryStore;
use std::path::{Path, PathBuf};

fn output_path_for(output: &Path, stem: &str, extension: &str) -> PathBuf {
    if output.is_dir() || output.extension().is_none() {
        output.join(format!("{}.{}", stem, extension))
    } else {
        output.to_path_buf()
    }
}

pub fn export(store: &InventoryStore, format: &ExportFormat, output: &Path) -> Result<()> {
    match format {
        ExportFormat::Sesion => {
            let path = output_path_for(output, "sesion-inventario", "json");
            session::export_session(store, &path)?;
            println!("✔ Sesión exportada: {}", path.display());
        }
        ExportFormat::Inventario => {
            let path = output_path_for(output, "reporte-inventario", "xlsx");
            println!("- Generando reporte de inventario...");
            excel::generate_inventory_report(store, &path)?;
            println!("✔ Reporte: {}", path.display());
        }
        ExportFormat::Etiquetas => {
            let path = output_path_for(output, "etiquetas-pendientes", "xlsx");
            println!("- Generando reporte de etiquetas...");
            let rows = excel::generate_labels_report(store, &path)?;
            println!("✔ {} etiquetas pendientes: {}", rows, path.display());
        }
    }

    Ok(())
}
