use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "inventario-pro")]
#[command(about = "Levantamiento de inventario físico y conciliación de listados", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Salida detallada
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Ruta alterna del documento de sesión
    #[arg(long, global = true)]
    pub sesion: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Inicia sesión con número de empleado
    Login {
        /// Número de empleado del verificador
        #[arg(required = true)]
        empleado: String,
    },

    /// Carga listados .xlsx al inventario
    Importar {
        /// Archivos .xlsx a cargar
        archivos: Vec<PathBuf>,

        /// Carga todos los .xlsx de una carpeta
        #[arg(short, long)]
        carpeta: Option<PathBuf>,

        /// Reemplaza sin preguntar un archivo ya cargado
        #[arg(long)]
        reemplazar: bool,
    },

    /// Concilia el inventario contra un listado nuevo (altas/cambios/bajas)
    Comparar {
        /// Listado .xlsx a comparar
        #[arg(required = true)]
        archivo: PathBuf,

        /// Aplica la selección al terminar (por defecto solo muestra)
        #[arg(short, long)]
        aplicar: bool,

        /// Incluye las bajas en la selección (destructivo, nunca por defecto)
        #[arg(long)]
        bajas: bool,

        /// Aplica todo: altas, cambios y bajas
        #[arg(long)]
        todo: bool,

        /// No pedir confirmación antes de aplicar
        #[arg(long)]
        si: bool,
    },

    /// Marca bienes como ubicados bajo el resguardante activo
    Ubicar {
        /// Claves únicas de los bienes
        #[arg(required = true)]
        claves: Vec<String>,

        /// Ubicación precisa (por defecto la primera del resguardante)
        #[arg(short, long)]
        ubicacion: Option<String>,

        /// Reasigna sin preguntar bienes resguardados por otra persona
        #[arg(long)]
        reasignar: bool,
    },

    /// Igual que ubicar, pero deja el bien marcado para imprimir etiqueta
    Reetiquetar {
        /// Claves únicas de los bienes
        #[arg(required = true)]
        claves: Vec<String>,

        /// Ubicación precisa (por defecto la primera del resguardante)
        #[arg(short, long)]
        ubicacion: Option<String>,

        /// Reasigna sin preguntar bienes resguardados por otra persona
        #[arg(long)]
        reasignar: bool,
    },

    /// Regresa bienes al estado no ubicado
    Desubicar {
        /// Claves únicas de los bienes
        #[arg(required = true)]
        claves: Vec<String>,
    },

    /// Administra resguardantes
    Resguardante {
        #[command(subcommand)]
        accion: ResguardanteCmd,
    },

    /// Registra bienes adicionales (detectados en campo, fuera de listado)
    Adicional {
        #[command(subcommand)]
        accion: AdicionalCmd,
    },

    /// Agrega o consulta la nota de un bien
    Nota {
        /// Clave única del bien
        #[arg(required = true)]
        clave: String,

        /// Texto de la nota (sin texto: muestra la actual)
        texto: Option<String>,
    },

    /// Tablero de avance del levantamiento
    Estado,

    /// Lotes cargados (listados importados)
    Listados {
        /// Elimina el lote con ese identificador
        #[arg(long)]
        eliminar: Option<i64>,
    },

    /// Áreas: cierre y directorio de responsables
    Area {
        #[command(subcommand)]
        accion: AreaCmd,
    },

    /// Exporta la sesión o reportes en Excel
    Exportar {
        /// Formato (sesion/inventario/etiquetas)
        #[arg(short, long, default_value = "sesion")]
        formato: ExportFormat,

        /// Archivo o directorio de salida
        #[arg(short, long)]
        salida: Option<PathBuf>,
    },

    /// Importa un documento de sesión portátil
    ImportarSesion {
        /// Archivo de sesión exportado
        #[arg(required = true)]
        archivo: PathBuf,
    },

    /// Reinicia la sesión de inventario (descarta todo)
    Reiniciar {
        /// No pedir confirmación
        #[arg(long)]
        si: bool,
    },

    /// Muestra la configuración
    Config {
        /// Fija la ruta del documento de sesión
        #[arg(long)]
        set_sesion: Option<PathBuf>,

        /// Muestra la configuración actual
        #[arg(long)]
        mostrar: bool,
    },
}

#[derive(Subcommand)]
pub enum ResguardanteCmd {
    /// Registra un resguardante nuevo
    Alta {
        /// Nombre completo
        #[arg(required = true)]
        nombre: String,

        /// Área del resguardante
        #[arg(short, long)]
        area: String,

        /// Ubicaciones a su cargo (repetible)
        #[arg(short, long)]
        ubicacion: Vec<String>,
    },

    /// Activa un resguardante para las acciones de ubicación
    Activar {
        #[arg(required = true)]
        nombre: String,
    },

    /// Lista los resguardantes registrados
    Lista,
}

#[derive(Subcommand)]
pub enum AdicionalCmd {
    /// Registra un bien adicional al resguardante activo
    Alta {
        /// Descripción del bien
        #[arg(required = true)]
        descripcion: String,

        #[arg(long)]
        clave: Option<String>,

        #[arg(long)]
        serie: Option<String>,

        #[arg(long)]
        marca: Option<String>,

        /// Clave asignada durante el levantamiento
        #[arg(long)]
        clave_asignada: Option<String>,

        /// Bien personal (no institucional)
        #[arg(long)]
        personal: bool,

        /// Registra aunque la clave o serie ya exista
        #[arg(long)]
        forzar: bool,
    },

    /// Lista los bienes adicionales registrados
    Lista,
}

#[derive(Subcommand)]
pub enum AreaCmd {
    /// Genera el acta de cierre de un área completada (terminal)
    Cerrar {
        #[arg(required = true)]
        area: String,
    },

    /// Directorio de responsables por área
    Directorio,
}

#[derive(Clone, Debug, Default)]
pub enum ExportFormat {
    #[default]
    Sesion,
    Inventario,
    Etiquetas,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sesion" | "session" | "json" => Ok(ExportFormat::Sesion),
            "inventario" | "xlsx" => Ok(ExportFormat::Inventario),
            "etiquetas" | "labels" => Ok(ExportFormat::Etiquetas),
            _ => Err(format!(
                "Formato desconocido: {}. Use sesion, inventario o etiquetas",
                s
            )),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Sesion => write!(f, "sesion"),
            ExportFormat::Inventario => write!(f, "inventario"),
            ExportFormat::Etiquetas => write!(f, "etiquetas"),
        }
    }
}
