use job_params::{has_index_marker, param_identity};

#[test]
fn indexed_path_keeps_suffix_from_first_indexed_segment() {
  assert_eq!(param_identity("outputData.xyzout[1].file"), "xyzout[1].file");
  assert_eq!(param_identity("job.outputData.HKLOUT[0]"), "HKLOUT[0]");
  // sólo cuenta el primer segmento indexado
  assert_eq!(param_identity("inputData.a[0].b.c[3].d"), "a[0].b.c[3].d");
}

#[test]
fn plain_path_collapses_to_last_segment() {
  assert_eq!(param_identity("outputData.logfile"), "logfile");
  assert_eq!(param_identity("outputData.XYZOUT.file"), "file");
  assert_eq!(param_identity("XYZIN"), "XYZIN");
}

#[test]
fn same_leaf_under_different_plain_branches_collides() {
  // limitación conocida: ramas sin índice colapsan en la hoja
  assert_eq!(param_identity("outputData.left.file"), param_identity("outputData.right.file"));
  // pero los elementos de lista se distinguen por índice
  assert_ne!(param_identity("outputData.list[0].file"), param_identity("outputData.list[1].file"));
}

#[test]
fn unbalanced_bracket_is_not_an_index() {
  assert!(!has_index_marker("odd["));
  assert_eq!(param_identity("outputData.odd[.file"), "file");
  assert_eq!(param_identity(""), "");
}
