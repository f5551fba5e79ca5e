// Archivo: config.rs
// Propósito: opciones del gleaning, con valores por defecto y lectura desde
// el entorno (GLEAN_ROLES, GLEAN_UNSET_MISSING_FILES).
use crate::errors::{GleanFailure, Result};
use job_domain::{Role, JOB_DIRECTORY};
use std::str::FromStr;

pub const ROLES_VAR: &str = "GLEAN_ROLES";
pub const UNSET_MISSING_VAR: &str = "GLEAN_UNSET_MISSING_FILES";

/// Opciones de una pasada de gleaning.
#[derive(Debug, Clone, PartialEq)]
pub struct GleanConfig {
    /// Roles a reconciliar. Los indicadores se recogen siempre.
    pub roles: Vec<Role>,
    /// Limpiar en el árbol las salidas que no existen en disco.
    pub unset_missing_files: bool,
    /// Categoría de directorio de los ficheros producidos.
    pub output_directory: i32,
}

impl Default for GleanConfig {
    fn default() -> Self {
        Self { roles: vec![Role::In, Role::Out],
               unset_missing_files: true,
               output_directory: JOB_DIRECTORY }
    }
}

impl GleanConfig {
    /// Lee la configuración del entorno (cargando `.env` si existe).
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Igual que [`GleanConfig::from_env`] pero con una fuente de variables
    /// inyectada. Las variables ausentes conservan el valor por defecto.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
        where F: Fn(&str) -> Option<String>
    {
        let mut config = Self::default();
        if let Some(raw) = lookup(ROLES_VAR) {
            config.roles = parse_roles(&raw)?;
        }
        if let Some(raw) = lookup(UNSET_MISSING_VAR) {
            config.unset_missing_files = parse_flag(UNSET_MISSING_VAR, &raw)?;
        }
        Ok(config)
    }
}

fn parse_roles(raw: &str) -> Result<Vec<Role>> {
    let mut roles = Vec::new();
    for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let role = Role::from_str(part).map_err(|e| GleanFailure::Config(format!("{}: {}", ROLES_VAR, e)))?;
        if !roles.contains(&role) {
            roles.push(role);
        }
    }
    Ok(roles)
}

fn parse_flag(var: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(GleanFailure::Config(format!("{}: valor booleano no válido '{}'", var, other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_cover_both_roles() {
        let config = GleanConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, GleanConfig::default());
        assert!(config.unset_missing_files);
        assert_eq!(config.output_directory, JOB_DIRECTORY);
    }

    #[test]
    fn roles_and_flag_are_parsed() {
        let config = GleanConfig::from_lookup(lookup(&[(ROLES_VAR, " out , OUT"), (UNSET_MISSING_VAR, "no")])).unwrap();
        assert_eq!(config.roles, vec![Role::Out]);
        assert!(!config.unset_missing_files);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(matches!(GleanConfig::from_lookup(lookup(&[(ROLES_VAR, "in,sideways")])),
                         Err(GleanFailure::Config(_))));
        assert!(matches!(GleanConfig::from_lookup(lookup(&[(UNSET_MISSING_VAR, "maybe")])),
                         Err(GleanFailure::Config(_))));
    }
}
