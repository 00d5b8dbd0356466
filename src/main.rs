use clap::Parser;
use dialoguer::Confirm;
use inventario_pro::{cli, config, error, export, parser, session};

use cli::{AdicionalCmd, AreaCmd, Cli, Commands, ResguardanteCmd};
use config::Config;
use error::{InventarioError, Result};
use inventario_common::{
    actions, apply_selected, compute_diff, evaluate_all, verify_employee, AdditionalItem, DiffKind,
    DiffResult, DiffSelection, Error as CoreError, InventoryEvent, InventoryStore, SiNo,
};
use std::path::{Path, PathBuf};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = Config::load()?;

    if let Some(path) = &cli.sesion {
        config.session_file = Some(path.clone());
    }
    let session_path = config.session_path()?;

    match cli.command {
        Commands::Login { empleado } => {
            match verify_employee(&empleado) {
                Some(name) => {
                    config.set_current_user(empleado, name.to_string())?;
                    println!("✔ Bienvenido, {}", name);
                }
                None => return Err(InventarioError::Unauthorized),
            }
            return Ok(());
        }

        Commands::Config { set_sesion, mostrar } => {
            if let Some(path) = set_sesion {
                config.session_file = Some(path);
                config.save()?;
                println!("✔ Ruta de sesión actualizada");
            }
            if mostrar {
                println!("Configuración:");
                println!("  Sesión: {}", config.session_path()?.display());
                match &config.current_user {
                    Some(user) => println!("  Usuario: {} ({})", user.name, user.number),
                    None => println!("  Usuario: sin sesión iniciada"),
                }
            }
            return Ok(());
        }

        command => {
            let user_name = require_login(&config)?;
            let mut store = match session::load(&session_path)? {
                Some(store) => store,
                None => InventoryStore::new(),
            };
            if store.read_only {
                eprintln!("⚠ Modo de solo lectura activo: exporte la sesión y reinicie.");
            }
            run(command, &mut store, &session_path, &user_name, cli.verbose)?;
        }
    }

    Ok(())
}

fn require_login(config: &Config) -> Result<String> {
    config
        .current_user
        .as_ref()
        .map(|user| user.name.clone())
        .ok_or(InventarioError::Unauthorized)
}

fn run(
    command: Commands,
    store: &mut InventoryStore,
    session_path: &Path,
    user_name: &str,
    verbose: bool,
) -> Result<()> {
    match command {
        Commands::Importar { archivos, carpeta, reemplazar } => {
            println!("📥 inventario-pro - Carga de listados\n");

            let files = collect_import_files(archivos, carpeta)?;
            if files.is_empty() {
                return Err(InventarioError::FileNotFound(
                    "no se indicó ningún archivo .xlsx".into(),
                ));
            }

            let progress = indicatif::ProgressBar::new(files.len() as u64);
            let mut total = 0;
            for file in &files {
                let snapshot = parser::parse_snapshot(file)?;
                let file_name = snapshot.meta.source_file.clone();

                let summary = match store.import_snapshot(snapshot.clone(), reemplazar) {
                    Err(CoreError::DuplicateBatch(name)) => {
                        let replace = Confirm::new()
                            .with_prompt(format!("El archivo \"{}\" ya fue cargado. ¿Reemplazar?", name))
                            .default(false)
                            .interact()
                            .map_err(|e| InventarioError::Prompt(e.to_string()))?;
                        if replace {
                            Some(store.import_snapshot(snapshot, true)?)
                        } else {
                            println!("- Se conservó el archivo anterior: {}", name);
                            None
                        }
                    }
                    other => Some(other?),
                };

                if let Some(summary) = summary {
                    total += summary.imported;
                    if verbose {
                        println!(
                            "✔ {} bienes del área {} ({})",
                            summary.imported, summary.area_id, file_name
                        );
                    }
                }
                progress.inc(1);
            }
            progress.finish_and_clear();

            println!("✔ Cargados {} bienes de {} archivo(s)", total, files.len());
            persist(store, session_path);
        }

        Commands::Comparar { archivo, aplicar, bajas, todo, si } => {
            println!("⚖ inventario-pro - Conciliación\n");

            println!("[1/2] Analizando diferencias...");
            let snapshot = parser::parse_snapshot(&archivo)?;
            let report_date = snapshot.meta.report_date.clone();
            let diff = compute_diff(&store.records, &snapshot.records);
            println!("✔ Comparado contra el listado del {}\n", report_date);

            print_diff(&diff, verbose);

            if diff.is_empty() || !aplicar {
                return Ok(());
            }

            println!("\n[2/2] Aplicando selección...");
            let selection = if todo {
                DiffSelection::all_for(&diff)
            } else {
                let mut selection = DiffSelection::default_for(&diff);
                if bajas {
                    for record in &diff.deletions {
                        selection.select(DiffKind::Deletion, &record.code);
                    }
                }
                selection
            };

            if selection.is_empty() {
                println!("- No hay nada seleccionado.");
                return Ok(());
            }

            if !si {
                let confirmed = Confirm::new()
                    .with_prompt(format!("¿Aplicar {} cambio(s) al inventario?", selection.len()))
                    .default(true)
                    .interact()
                    .map_err(|e| InventarioError::Prompt(e.to_string()))?;
                if !confirmed {
                    println!("- Conciliación descartada.");
                    return Ok(());
                }
            }

            let outcome = apply_selected(store, &diff, &selection)?;
            println!("✔ {} cambios aplicados", outcome.applied);
            print_events(store, &outcome.events);
            persist(store, session_path);
        }

        Commands::Ubicar { claves, ubicacion, reasignar } => {
            locate_items(store, &claves, ubicacion.as_deref(), reasignar, false)?;
            persist(store, session_path);
        }

        Commands::Reetiquetar { claves, ubicacion, reasignar } => {
            locate_items(store, &claves, ubicacion.as_deref(), reasignar, true)?;
            persist(store, session_path);
        }

        Commands::Desubicar { claves } => {
            let confirmed = Confirm::new()
                .with_prompt(format!("¿Marcar {} bien(es) como NO ubicados?", claves.len()))
                .default(false)
                .interact()
                .map_err(|e| InventarioError::Prompt(e.to_string()))?;
            if !confirmed {
                return Ok(());
            }

            let mut events = Vec::new();
            for clave in &claves {
                events.extend(actions::unlocate(store, clave)?);
            }
            println!("✔ {} bien(es) des-ubicado(s)", claves.len());
            print_events(store, &events);
            persist(store, session_path);
        }

        Commands::Resguardante { accion } => match accion {
            ResguardanteCmd::Alta { nombre, area, ubicacion } => {
                store.add_custodian(&nombre, &area, ubicacion)?;
                println!("✔ Resguardante registrado: {}", nombre);
                persist(store, session_path);
            }
            ResguardanteCmd::Activar { nombre } => {
                store.set_active_custodian(&nombre)?;
                println!("✔ Resguardante activo: {}", nombre);
                persist(store, session_path);
            }
            ResguardanteCmd::Lista => {
                if store.custodians.is_empty() {
                    println!("No hay resguardantes registrados.");
                }
                let active = store.active_custodian.clone();
                for custodian in &store.custodians {
                    let marker = if active.as_deref() == Some(custodian.name.as_str()) {
                        " (activo)"
                    } else {
                        ""
                    };
                    println!(
                        "- {} | Área {} | {}{}",
                        custodian.name,
                        custodian.area,
                        custodian.locations.join(", "),
                        marker
                    );
                }
            }
        },

        Commands::Adicional { accion } => match accion {
            AdicionalCmd::Alta {
                descripcion,
                clave,
                serie,
                marca,
                clave_asignada,
                personal,
                forzar,
            } => {
                let item = AdditionalItem {
                    description: descripcion.clone(),
                    code: clave.unwrap_or_default(),
                    serial: serie.unwrap_or_default(),
                    brand: marca.unwrap_or_default(),
                    assigned_code: clave_asignada.unwrap_or_default(),
                    personal: if personal { SiNo::Si } else { SiNo::No },
                    ..Default::default()
                };

                match store.add_additional_item(item.clone(), forzar) {
                    Err(CoreError::DuplicateSerial(value)) => {
                        let confirmed = Confirm::new()
                            .with_prompt(format!(
                                "La clave o serie \"{}\" ya existe. ¿Registrar de todos modos?",
                                value
                            ))
                            .default(false)
                            .interact()
                            .map_err(|e| InventarioError::Prompt(e.to_string()))?;
                        if !confirmed {
                            println!("- Registro descartado.");
                            return Ok(());
                        }
                        store.add_additional_item(item, true)?;
                    }
                    other => other?,
                }
                println!("✔ Bien adicional registrado: {}", descripcion);
                persist(store, session_path);
            }
            AdicionalCmd::Lista => {
                if store.additional_items.is_empty() {
                    println!("No hay bienes adicionales registrados.");
                    return Ok(());
                }
                for item in &store.additional_items {
                    let personal = if item.personal.is_si() { " [PERSONAL]" } else { "" };
                    println!(
                        "- {}{} | Clave: {} | Serie: {} | Asignada: {} | {}",
                        item.description,
                        personal,
                        if item.code.is_empty() { "N/A" } else { &item.code },
                        if item.serial.is_empty() { "N/A" } else { &item.serial },
                        if item.assigned_code.is_empty() { "N/A" } else { &item.assigned_code },
                        item.custodian_name
                    );
                }
            }
        },

        Commands::Nota { clave, texto } => match texto {
            Some(texto) => {
                store.set_note(&clave, &texto)?;
                println!("✔ Nota registrada para {}", clave);
                persist(store, session_path);
            }
            None => match store.notes.get(&clave) {
                Some(nota) => println!("{}: {}", clave, nota),
                None => println!("El bien {} no tiene nota.", clave),
            },
        },

        Commands::Estado => {
            println!("📋 inventario-pro - Avance de {}\n", user_name);
            let dashboard = store.dashboard();
            println!("  Bienes totales:   {}", dashboard.total_items);
            println!("  Ubicados:         {}", dashboard.located_items);
            println!("  Pendientes:       {}", dashboard.pending_items);
            println!("  Avance de hoy:    {}", dashboard.daily_progress);
            println!("  Áreas en trabajo: {}", dashboard.working_areas);
            println!("  Bienes adicionales: {}", dashboard.additional_items);
            if store.inventory_finished {
                println!("\n🏁 Inventario completado.");
            }
            if verbose {
                let mut counts: Vec<_> = store.location_counts().into_iter().collect();
                counts.sort();
                if !counts.is_empty() {
                    println!("\nResguardantes por ubicación:");
                    for (location, count) in counts {
                        println!("  {} × {}", location, count);
                    }
                }
            }
        }

        Commands::Listados { eliminar } => {
            if let Some(batch_id) = eliminar {
                let confirmed = Confirm::new()
                    .with_prompt("¿Eliminar el listado completo del inventario?")
                    .default(false)
                    .interact()
                    .map_err(|e| InventarioError::Prompt(e.to_string()))?;
                if !confirmed {
                    return Ok(());
                }
                let removed = store.remove_batch(batch_id)?;
                println!("✔ {} bienes eliminados", removed);
                let events = evaluate_all(store);
                print_events(store, &events);
                persist(store, session_path);
                return Ok(());
            }

            let batches = store.loaded_batches();
            if batches.is_empty() {
                println!("No hay listados cargados.");
                return Ok(());
            }
            println!("Listados cargados: {}\n", batches.len());
            for batch in batches {
                let status = if batch.closed {
                    " [CERRADA]"
                } else if batch.completed {
                    " [COMPLETA]"
                } else {
                    ""
                };
                println!(
                    "- [{}] {} | Área {}{} | {} | Impresión: {} | {} bienes",
                    batch.batch_id,
                    batch.file_name,
                    batch.area_id,
                    status,
                    batch.list_type,
                    batch.report_date,
                    batch.records
                );
            }
        }

        Commands::Area { accion } => match accion {
            AreaCmd::Cerrar { area } => {
                store.close_area(&area)?;
                println!("✔ Área {} cerrada. Acta de cierre registrada.", area);
                persist(store, session_path);
            }
            AreaCmd::Directorio => {
                if store.areas.directory.is_empty() {
                    println!("El directorio de áreas está vacío.");
                    return Ok(());
                }
                let mut areas: Vec<_> = store.areas.directory.iter().collect();
                areas.sort_by(|a, b| a.0.cmp(b.0));
                for (area_id, responsible) in areas {
                    println!(
                        "- Área {} | {} | {} ({})",
                        area_id,
                        store.areas.display_name(area_id),
                        responsible.name,
                        responsible.title
                    );
                }
            }
        },

        Commands::Exportar { formato, salida } => {
            println!("📄 inventario-pro - Exportación\n");
            let output = salida.unwrap_or_else(|| PathBuf::from("."));
            export::export(store, &formato, &output)?;
        }

        Commands::ImportarSesion { archivo } => {
            let confirmed = Confirm::new()
                .with_prompt("Importar una sesión reemplaza el inventario actual. ¿Continuar?")
                .default(false)
                .interact()
                .map_err(|e| InventarioError::Prompt(e.to_string()))?;
            if !confirmed {
                return Ok(());
            }

            // El parseo ocurre antes de tocar el almacén actual
            let mut imported = session::import_session(&archivo)?;
            imported.read_only = false;
            imported.log_activity("Sesión importada", &archivo.display().to_string());
            *store = imported;
            println!("✔ Sesión importada: {} bienes", store.records.len());
            persist(store, session_path);
        }

        Commands::Reiniciar { si } => {
            if !si {
                let confirmed = Confirm::new()
                    .with_prompt("¿Iniciar un inventario nuevo? Se descarta todo el estado actual")
                    .default(false)
                    .interact()
                    .map_err(|e| InventarioError::Prompt(e.to_string()))?;
                if !confirmed {
                    return Ok(());
                }
            }
            store.reset();
            store.log_activity("Sesión reiniciada", &format!("Nuevo inventario iniciado por {}", user_name));
            println!("✔ Se ha iniciado un nuevo inventario.");
            persist(store, session_path);
        }

        // Login y Config se atienden antes de cargar la sesión
        Commands::Login { .. } | Commands::Config { .. } => unreachable!(),
    }

    Ok(())
}

/// Reúne los archivos a importar: los indicados más los .xlsx de la carpeta
fn collect_import_files(archivos: Vec<PathBuf>, carpeta: Option<PathBuf>) -> Result<Vec<PathBuf>> {
    let mut files = archivos;

    if let Some(folder) = carpeta {
        if !folder.exists() {
            return Err(InventarioError::FileNotFound(folder.display().to_string()));
        }
        for entry in walkdir::WalkDir::new(&folder)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            if let Some(ext) = path.extension() {
                if ext.to_string_lossy().eq_ignore_ascii_case("xlsx") {
                    files.push(path.to_path_buf());
                }
            }
        }
        files.sort();
    }

    Ok(files)
}

/// Ubica o re-etiqueta una lista de claves, confirmando las reasignaciones
fn locate_items(
    store: &mut InventoryStore,
    claves: &[String],
    ubicacion: Option<&str>,
    reasignar: bool,
    relabel: bool,
) -> Result<()> {
    type LocateFn =
        fn(&mut InventoryStore, &str, Option<&str>, bool) -> inventario_common::Result<Vec<InventoryEvent>>;
    let action: LocateFn = if relabel { actions::relabel } else { actions::locate };

    let mut events = Vec::new();
    let mut applied = 0;
    for clave in claves {
        match action(store, clave.as_str(), ubicacion, reasignar) {
            Ok(new_events) => {
                events.extend(new_events);
                applied += 1;
            }
            Err(CoreError::AssignmentConflict { code, holder }) => {
                let active = store.active_custodian.clone().unwrap_or_default();
                let confirmed = Confirm::new()
                    .with_prompt(format!(
                        "El bien {} ya está asignado a {}. ¿Reasignar a {}?",
                        code, holder, active
                    ))
                    .default(false)
                    .interact()
                    .map_err(|e| InventarioError::Prompt(e.to_string()))?;
                if confirmed {
                    events.extend(action(store, clave.as_str(), ubicacion, true)?);
                    applied += 1;
                    println!("✔ Bien {} reasignado", clave);
                } else {
                    println!("- Bien {} sin cambios", clave);
                }
            }
            Err(other) => return Err(other.into()),
        }
    }

    println!(
        "✔ {} bien(es) {}",
        applied,
        if relabel { "marcados para re-etiquetar" } else { "ubicados" }
    );
    print_events(store, &events);
    Ok(())
}

fn print_diff(diff: &DiffResult, verbose: bool) {
    println!("Resultado de la conciliación:");
    println!("  Altas:   {}", diff.additions.len());
    println!("  Cambios: {}", diff.modifications.len());
    println!("  Bajas:   {}", diff.deletions.len());

    if diff.is_empty() {
        println!("\n✔ El inventario coincide con el listado.");
        return;
    }

    if !diff.additions.is_empty() {
        println!("\nALTAS (pre-seleccionadas):");
        for record in &diff.additions {
            println!("  + {} {}", record.code, record.description);
        }
    }

    if !diff.modifications.is_empty() {
        println!("\nCAMBIOS (pre-seleccionados):");
        for entry in &diff.modifications {
            println!("  ~ {}", entry.code);
            for change in &entry.changes {
                println!("      {}: {} -> {}", change.field, change.old, change.new);
            }
        }
    }

    if !diff.deletions.is_empty() {
        println!("\nBAJAS (requieren --bajas o --todo):");
        for record in &diff.deletions {
            println!("  - {} {}", record.code, record.description);
        }
    }

    if verbose {
        println!("\nTotal de entradas: {}", diff.total());
    }
}

fn print_events(store: &InventoryStore, events: &[InventoryEvent]) {
    for event in events {
        match event {
            InventoryEvent::AreaCompleted { area_id } => {
                println!("🎉 ¡Área {} completada!", store.areas.display_name(area_id));
            }
            InventoryEvent::InventoryFinished => {
                println!("🏁 ¡Felicidades! Has ubicado todos los bienes.");
            }
        }
    }
}

/// Guardado "dispara y olvida": una falla activa el modo de solo lectura y
/// se avisa, pero la operación en memoria ya ocurrió
fn persist(store: &mut InventoryStore, path: &Path) {
    if let Err(e) = session::save(store, path) {
        eprintln!("{}", e);
    }
}
