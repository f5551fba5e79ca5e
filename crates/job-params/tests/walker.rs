use job_params::{data_files, data_files_mut, find_objects, indicators, DataFile, JobContainer, ParamContainer,
                 ParamList, ParamNode, PerformanceIndicator};

fn sample_outputs() -> ParamContainer {
  ParamContainer::new("outputData")
    .with_child(ParamNode::File(DataFile::new("XYZOUT")))
    .with_child(ParamNode::scalar("NCYCLES", 10_i64))
    .with_child(ParamNode::List(ParamList::new("xyzout")
      .with_item(ParamNode::Container(ParamContainer::new("").with_child(ParamNode::File(DataFile::new("file")))))
      .with_item(ParamNode::Container(ParamContainer::new("").with_child(ParamNode::File(DataFile::new("file")))))))
    .with_child(ParamNode::Container(ParamContainer::new("PERFORMANCE")
      .with_child(ParamNode::Indicator(PerformanceIndicator::new("stats").with_field("rmsd", 0.23)))))
}

#[test]
fn files_found_in_document_order_with_indexed_paths() {
  let outputs = sample_outputs();
  let paths: Vec<String> = data_files(&outputs).into_iter().map(|l| l.path).collect();
  assert_eq!(paths,
             vec!["outputData.XYZOUT".to_string(),
                  "outputData.xyzout[0].file".to_string(),
                  "outputData.xyzout[1].file".to_string()]);
}

#[test]
fn indicators_are_found_inside_nested_containers() {
  let outputs = sample_outputs();
  let found = indicators(&outputs);
  assert_eq!(found.len(), 1);
  assert_eq!(found[0].path, "outputData.PERFORMANCE.stats");
  assert_eq!(found[0].node.data_order().collect::<Vec<_>>(), vec!["rmsd"]);
}

#[test]
fn matched_container_is_not_descended() {
  let outputs = sample_outputs();
  let found = find_objects(&outputs, |n| matches!(n, ParamNode::Container(_)));
  // xyzout[0], xyzout[1] y PERFORMANCE; los ficheros internos no aparecen
  let paths: Vec<&str> = found.iter().map(|l| l.path.as_str()).collect();
  assert_eq!(paths, vec!["outputData.xyzout[0]", "outputData.xyzout[1]", "outputData.PERFORMANCE"]);
}

#[test]
fn empty_sections_yield_nothing() {
  let container = JobContainer::new();
  assert!(data_files(&container.input_data).is_empty());
  assert!(indicators(&container.output_data).is_empty());
}

#[test]
fn mutable_walk_writes_back_onto_the_tree() {
  let mut outputs = sample_outputs();
  for (i, located) in data_files_mut(&mut outputs).into_iter().enumerate() {
    located.node.set_db_file_id(format!("id-{}", i));
  }
  let ids: Vec<Option<String>> = data_files(&outputs).into_iter().map(|l| l.node.db_file_id.clone()).collect();
  assert_eq!(ids, vec![Some("id-0".into()), Some("id-1".into()), Some("id-2".into())]);
}
