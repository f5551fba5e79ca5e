// Archivo: walker.rs
// Propósito: búsqueda recursiva genérica sobre el árbol de parámetros.
//
// Los contenedores y listas se recorren en orden de documento; los elementos
// de lista conservan su índice en la ruta (`lista[2]`). Un nodo que cumple el
// predicado se devuelve y no se desciende en él. El recorrido no tiene
// efectos secundarios; la variante mutable entrega préstamos disjuntos para
// que el llamador pueda escribir sobre los nodos encontrados.
use crate::identity::{index_path, join_path};
use crate::tree::{DataFile, ParamContainer, ParamNode, PerformanceIndicator};

/// Nodo encontrado junto con su ruta completa desde la raíz.
#[derive(Debug)]
pub struct Located<T> {
    pub path: String,
    pub node: T,
}

/// Devuelve todos los descendientes de `root` que cumplen `predicate`.
pub fn find_objects<'a, P>(root: &'a ParamContainer, predicate: P) -> Vec<Located<&'a ParamNode>>
    where P: Fn(&ParamNode) -> bool
{
    let mut found = Vec::new();
    for child in &root.children {
        visit(child, join_path(&root.name, child.name()), &predicate, &mut found);
    }
    found
}

fn visit<'a, P>(node: &'a ParamNode, path: String, predicate: &P, found: &mut Vec<Located<&'a ParamNode>>)
    where P: Fn(&ParamNode) -> bool
{
    if predicate(node) {
        found.push(Located { path, node });
        return;
    }
    match node {
        ParamNode::Container(c) => {
            for child in &c.children {
                visit(child, join_path(&path, child.name()), predicate, found);
            }
        }
        ParamNode::List(l) => {
            for (i, item) in l.items.iter().enumerate() {
                visit(item, index_path(&path, i), predicate, found);
            }
        }
        _ => {}
    }
}

/// Variante mutable de [`find_objects`].
pub fn find_objects_mut<'a, P>(root: &'a mut ParamContainer, predicate: P) -> Vec<Located<&'a mut ParamNode>>
    where P: Fn(&ParamNode) -> bool
{
    let mut found = Vec::new();
    let root_name = root.name.clone();
    for child in root.children.iter_mut() {
        let path = join_path(&root_name, child.name());
        visit_mut(child, path, &predicate, &mut found);
    }
    found
}

fn visit_mut<'a, P>(node: &'a mut ParamNode,
                    path: String,
                    predicate: &P,
                    found: &mut Vec<Located<&'a mut ParamNode>>)
    where P: Fn(&ParamNode) -> bool
{
    if predicate(node) {
        found.push(Located { path, node });
        return;
    }
    match node {
        ParamNode::Container(c) => {
            for child in c.children.iter_mut() {
                let child_path = join_path(&path, child.name());
                visit_mut(child, child_path, predicate, found);
            }
        }
        ParamNode::List(l) => {
            for (i, item) in l.items.iter_mut().enumerate() {
                visit_mut(item, index_path(&path, i), predicate, found);
            }
        }
        _ => {}
    }
}

/// Ficheros de datos bajo `root`.
pub fn data_files(root: &ParamContainer) -> Vec<Located<&DataFile>> {
    find_objects(root, ParamNode::is_file).into_iter()
                                          .filter_map(|l| match l.node {
                                              ParamNode::File(f) => Some(Located { path: l.path, node: f }),
                                              _ => None,
                                          })
                                          .collect()
}

/// Ficheros de datos bajo `root`, con acceso mutable para escribir ids o
/// limpiar referencias.
pub fn data_files_mut(root: &mut ParamContainer) -> Vec<Located<&mut DataFile>> {
    find_objects_mut(root, ParamNode::is_file).into_iter()
                                              .filter_map(|l| match l.node {
                                                  ParamNode::File(f) => Some(Located { path: l.path, node: f }),
                                                  _ => None,
                                              })
                                              .collect()
}

/// Indicadores de rendimiento bajo `root`.
pub fn indicators(root: &ParamContainer) -> Vec<Located<&PerformanceIndicator>> {
    find_objects(root, ParamNode::is_indicator).into_iter()
                                               .filter_map(|l| match l.node {
                                                   ParamNode::Indicator(i) => Some(Located { path: l.path, node: i }),
                                                   _ => None,
                                               })
                                               .collect()
}
