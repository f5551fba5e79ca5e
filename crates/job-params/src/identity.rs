// Archivo: identity.rs
// Propósito: derivar la identidad canónica de un parámetro a partir de su
// ruta completa en el árbol. Es la clave estable con la que se enlazan los
// nodos del árbol con los registros persistidos entre ejecuciones.

/// Separador de segmentos en las rutas de parámetros.
pub const PATH_SEPARATOR: char = '.';

/// Indica si un segmento lleva marcador de índice (`xyzout[1]`).
pub fn has_index_marker(segment: &str) -> bool {
    match segment.find('[') {
        Some(open) => segment[open..].contains(']'),
        None => false,
    }
}

/// Identidad canónica de un parámetro.
///
/// Se recorre la ruta de izquierda a derecha: si algún segmento lleva marcador
/// de índice, la identidad es el sufijo que empieza en el **primer** segmento
/// indexado; si ninguno lo lleva, la identidad es sólo el **último** segmento.
///
/// ```rust
/// use job_params::param_identity;
/// assert_eq!(param_identity("outputData.xyzout[1].file"), "xyzout[1].file");
/// assert_eq!(param_identity("outputData.logfile"), "logfile");
/// ```
///
/// Limitación conocida: dos hojas con el mismo nombre bajo ramas distintas
/// sin índice colapsan en la misma identidad.
pub fn param_identity(path: &str) -> String {
    let segments: Vec<&str> = path.split(PATH_SEPARATOR).collect();
    match segments.iter().position(|s| has_index_marker(s)) {
        Some(first) => segments[first..].join(&PATH_SEPARATOR.to_string()),
        None => segments.last().map(|s| s.to_string()).unwrap_or_default(),
    }
}

/// Une una ruta padre con el nombre de un hijo. Un padre vacío produce sólo
/// el nombre del hijo.
pub fn join_path(parent: &str, child: &str) -> String {
    if parent.is_empty() {
        child.to_string()
    } else {
        format!("{}{}{}", parent, PATH_SEPARATOR, child)
    }
}

/// Ruta del elemento `index` de una lista.
pub fn index_path(list_path: &str, index: usize) -> String {
    format!("{}[{}]", list_path, index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_needs_both_brackets() {
        assert!(has_index_marker("xyzout[0]"));
        assert!(has_index_marker("a[b]c"));
        assert!(!has_index_marker("xyzout["));
        assert!(!has_index_marker("xyz]out["));
        assert!(!has_index_marker("plain"));
    }

    #[test]
    fn join_path_skips_empty_parent() {
        assert_eq!(join_path("", "XYZOUT"), "XYZOUT");
        assert_eq!(join_path("outputData", "XYZOUT"), "outputData.XYZOUT");
        assert_eq!(index_path("outputData.list", 3), "outputData.list[3]");
    }
}
