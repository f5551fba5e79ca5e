// Archivo: tree.rs
// Propósito: tipos del árbol de parámetros de un job. Cada nodo es una
// variante de `ParamNode`; los contenedores y listas anidan nodos, las hojas
// son ficheros, indicadores de rendimiento o escalares.
use crate::errors::{ParamsError, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Valor escalar dinámico de un parámetro o de un campo de indicador.
///
/// Se deserializa sin etiqueta desde JSON: `null`, booleanos, enteros,
/// reales y cadenas; cualquier otra forma queda en `Other`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Other(serde_json::Value),
}

impl ParamValue {
    pub fn is_null(&self) -> bool {
        matches!(self, ParamValue::Null)
    }
}

impl From<f64> for ParamValue {
    fn from(v: f64) -> Self {
        ParamValue::Float(v)
    }
}

impl From<i64> for ParamValue {
    fn from(v: i64) -> Self {
        ParamValue::Int(v)
    }
}

impl From<&str> for ParamValue {
    fn from(v: &str) -> Self {
        ParamValue::Text(v.to_string())
    }
}

impl From<()> for ParamValue {
    fn from(_: ()) -> Self {
        ParamValue::Null
    }
}

impl From<String> for ParamValue {
    fn from(v: String) -> Self {
        ParamValue::Text(v)
    }
}

/// Referencia a un fichero de datos (entrada o salida de un job).
///
/// Expone la superficie que consume el gleaning: existencia en disco,
/// "está definido", ranura para el id persistido y atributos opcionales.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataFile {
    /// Nombre del objeto dentro de su contenedor.
    pub name: String,
    /// Clasificación declarada (mime normalizado), p.ej. `chemical/x-pdb`.
    pub mime_type_name: Option<String>,
    /// Directorio donde vive el fichero.
    pub directory: Option<PathBuf>,
    /// Nombre base del fichero; también es su nombre visible.
    pub base_name: Option<String>,
    pub annotation: Option<String>,
    pub sub_type: Option<i32>,
    pub content_flag: Option<i32>,
    /// Id del registro `File` persistido (UUID en texto).
    pub db_file_id: Option<String>,
}

impl DataFile {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Default::default() }
    }

    pub fn with_mime_type(mut self, mime: impl Into<String>) -> Self {
        self.mime_type_name = Some(mime.into());
        self
    }

    /// Fija directorio y nombre base a partir de una ruta completa.
    pub fn with_location(mut self, path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        self.directory = path.parent().map(Path::to_path_buf);
        self.base_name = path.file_name().map(|n| n.to_string_lossy().into_owned());
        self
    }

    pub fn with_annotation(mut self, annotation: impl Into<String>) -> Self {
        self.annotation = Some(annotation.into());
        self
    }

    pub fn with_sub_type(mut self, sub_type: i32) -> Self {
        self.sub_type = Some(sub_type);
        self
    }

    pub fn with_content_flag(mut self, content: i32) -> Self {
        self.content_flag = Some(content);
        self
    }

    pub fn with_db_file_id(mut self, id: impl Into<String>) -> Self {
        self.db_file_id = Some(id.into());
        self
    }

    /// Ruta completa en disco, si el nodo tiene nombre base.
    pub fn full_path(&self) -> Option<PathBuf> {
        let base = self.base_name.as_deref().filter(|b| !b.trim().is_empty())?;
        Some(match &self.directory {
            Some(dir) => dir.join(base),
            None => PathBuf::from(base),
        })
    }

    /// El fichero referenciado existe en disco.
    pub fn exists(&self) -> bool {
        self.full_path().map(|p| p.is_file()).unwrap_or(false)
    }

    /// El nodo está lógicamente definido (tiene nombre base no vacío).
    pub fn is_set(&self) -> bool {
        self.base_name.as_deref().map(|b| !b.trim().is_empty()).unwrap_or(false)
    }

    /// Limpia la referencia al fichero. La clasificación declarada se
    /// conserva porque pertenece a la definición del parámetro.
    pub fn unset(&mut self) {
        self.directory = None;
        self.base_name = None;
        self.annotation = None;
        self.sub_type = None;
        self.content_flag = None;
        self.db_file_id = None;
    }

    /// Reemplaza los datos del fichero conservando la clasificación de la
    /// definición cuando los datos cargados no la traen.
    pub fn merge_from(&mut self, data: DataFile) {
        let mime = data.mime_type_name.clone().or_else(|| self.mime_type_name.take());
        *self = data;
        self.mime_type_name = mime;
    }

    pub fn set_db_file_id(&mut self, id: impl Into<String>) {
        self.db_file_id = Some(id.into());
    }
}

/// Conjunto ordenado de métricas nombradas (indicador de rendimiento).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PerformanceIndicator {
    pub name: String,
    /// Campos en el orden declarado por el indicador.
    #[serde(default)]
    pub fields: IndexMap<String, ParamValue>,
}

impl PerformanceIndicator {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), fields: IndexMap::new() }
    }

    /// Declara un campo (sin valor si se pasa `ParamValue::Null`).
    pub fn with_field(mut self, field: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    /// Nombres de campo en orden declarado.
    pub fn data_order(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn value(&self, field: &str) -> Option<&ParamValue> {
        self.fields.get(field)
    }

    pub fn set(&mut self, field: &str, value: impl Into<ParamValue>) {
        self.fields.insert(field.to_string(), value.into());
    }
}

/// Parámetro escalar simple (controlParameters, flags, etc.).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ScalarParam {
    pub name: String,
    #[serde(default)]
    pub value: ParamValue,
}

/// Contenedor con hijos nombrados y ordenados.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ParamContainer {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub children: Vec<ParamNode>,
}

impl ParamContainer {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), children: Vec::new() }
    }

    pub fn with_child(mut self, child: ParamNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn push(&mut self, child: ParamNode) {
        self.children.push(child);
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn child(&self, name: &str) -> Option<&ParamNode> {
        self.children.iter().find(|c| c.name() == name)
    }

    pub fn child_mut(&mut self, name: &str) -> Option<&mut ParamNode> {
        self.children.iter_mut().find(|c| c.name() == name)
    }

    /// Superpone `other` sobre este contenedor: los contenedores con el mismo
    /// nombre se fusionan recursivamente, listas y hojas se reemplazan y los
    /// hijos desconocidos se añaden al final.
    pub fn merge_from(&mut self, other: ParamContainer) {
        for incoming in other.children {
            match self.children.iter().position(|c| c.name() == incoming.name()) {
                Some(idx) => match (&mut self.children[idx], incoming) {
                    (ParamNode::Container(existing), ParamNode::Container(c)) => existing.merge_from(c),
                    (ParamNode::File(existing), ParamNode::File(f)) => existing.merge_from(f),
                    (slot, incoming) => *slot = incoming,
                },
                None => self.children.push(incoming),
            }
        }
    }
}

/// Lista de nodos; los elementos se identifican por índice.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ParamList {
    pub name: String,
    #[serde(default)]
    pub items: Vec<ParamNode>,
}

impl ParamList {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), items: Vec::new() }
    }

    pub fn with_item(mut self, item: ParamNode) -> Self {
        self.items.push(item);
        self
    }
}

/// Nodo del árbol de parámetros.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParamNode {
    Container(ParamContainer),
    List(ParamList),
    File(DataFile),
    Indicator(PerformanceIndicator),
    Scalar(ScalarParam),
}

impl ParamNode {
    pub fn name(&self) -> &str {
        match self {
            ParamNode::Container(c) => &c.name,
            ParamNode::List(l) => &l.name,
            ParamNode::File(f) => &f.name,
            ParamNode::Indicator(i) => &i.name,
            ParamNode::Scalar(s) => &s.name,
        }
    }

    pub fn is_file(&self) -> bool {
        matches!(self, ParamNode::File(_))
    }

    pub fn is_indicator(&self) -> bool {
        matches!(self, ParamNode::Indicator(_))
    }

    pub fn scalar(name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        ParamNode::Scalar(ScalarParam { name: name.into(), value: value.into() })
    }
}

/// Contenedor completo de un job con sus tres secciones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JobContainer {
    pub control_parameters: ParamContainer,
    pub input_data: ParamContainer,
    pub output_data: ParamContainer,
}

pub const CONTROL_PARAMETERS: &str = "controlParameters";
pub const INPUT_DATA: &str = "inputData";
pub const OUTPUT_DATA: &str = "outputData";

impl Default for JobContainer {
    fn default() -> Self {
        Self { control_parameters: ParamContainer::new(CONTROL_PARAMETERS),
               input_data: ParamContainer::new(INPUT_DATA),
               output_data: ParamContainer::new(OUTPUT_DATA) }
    }
}

impl JobContainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Superpone los datos cargados sobre esta definición, sección a sección.
    pub fn merge_from(&mut self, data: JobContainer) {
        self.control_parameters.merge_from(data.control_parameters);
        self.input_data.merge_from(data.input_data);
        self.output_data.merge_from(data.output_data);
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        let mut container: JobContainer = serde_json::from_str(s)?;
        container.normalize_sections()?;
        Ok(container)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(ParamsError::NotFound(path.display().to_string()));
        }
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    // Los nombres de sección forman parte de la ruta de cada parámetro: una
    // sección sin nombre recibe el suyo, uno distinto es un error.
    fn normalize_sections(&mut self) -> Result<()> {
        let sections = [(&mut self.control_parameters, CONTROL_PARAMETERS),
                        (&mut self.input_data, INPUT_DATA),
                        (&mut self.output_data, OUTPUT_DATA)];
        for (section, expected) in sections {
            if section.name.is_empty() {
                section.name = expected.to_string();
            } else if section.name != expected {
                return Err(ParamsError::Validation(format!("sección '{}' con nombre inesperado '{}'",
                                                           expected, section.name)));
            }
        }
        Ok(())
    }
}
