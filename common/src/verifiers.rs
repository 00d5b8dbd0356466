//! Tabla de verificadores autorizados
//!
//! El acceso es una búsqueda estática por número de empleado; no hay más
//! modelo de autenticación que esta tabla.

/// Número de empleado → nombre del verificador
pub const VERIFIERS: &[(&str, &str)] = &[
    ("41290", "BENÍTEZ HERNÁNDEZ MARIO"),
    ("41292", "ESCAMILLA VILLEGAS BRYAN ANTONY"),
    ("41282", "LÓPEZ QUINTANA ALDO"),
    ("41287", "MARIN ESPINOSA MIGUEL"),
    ("41289", "SANCHEZ ARELLANES RICARDO"),
    ("41293", "EDSON OSNAR TORRES JIMENEZ"),
    ("15990", "CHÁVEZ SÁNCHEZ ALFONSO"),
    ("17326", "DOMÍNGUEZ VAZQUEZ FRANCISCO JAVIER"),
    ("11885", "ESTRADA HERNÁNDEZ ROBERTO"),
    ("19328", "LÓPEZ ESTRADA LEOPOLDO"),
    ("44925", "MENDOZA SOLARES JOSE JUAN"),
    ("16990", "PÉREZ RODRÍGUEZ DANIEL"),
    ("16000", "PÉREZ YAÑEZ JUAN JOSE"),
    ("17812", "RODRÍGUEZ RAMÍREZ RENE"),
    ("44095", "LOPEZ JIMENEZ ALAN GABRIEL"),
    ("2875", "VIZCAINO ROJAS ALVARO"),
];

/// Busca el nombre del verificador por número de empleado
pub fn verify_employee(number: &str) -> Option<&'static str> {
    VERIFIERS
        .iter()
        .find(|(num, _)| *num == number.trim())
        .map(|(_, name)| *name)
}
