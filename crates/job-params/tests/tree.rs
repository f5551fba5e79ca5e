use job_params::{DataFile, JobContainer, ParamNode, ParamValue, ParamsError};
use std::io::Write;

#[test]
fn data_file_existence_and_set_state() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("out.pdb");
  std::fs::File::create(&path).unwrap().write_all(b"ATOM").unwrap();

  let present = DataFile::new("XYZOUT").with_location(&path);
  assert!(present.is_set());
  assert!(present.exists());
  assert_eq!(present.full_path().unwrap(), path);

  let missing = DataFile::new("XYZOUT").with_location(dir.path().join("nope.pdb"));
  assert!(missing.is_set());
  assert!(!missing.exists());

  let blank = DataFile::new("XYZOUT");
  assert!(!blank.is_set());
  assert!(!blank.exists());
}

#[test]
fn unset_clears_reference_but_keeps_classification() {
  let mut f = DataFile::new("XYZOUT").with_mime_type("chemical/x-pdb")
                                     .with_location("/tmp/x.pdb")
                                     .with_db_file_id("abc")
                                     .with_sub_type(1);
  f.unset();
  assert!(!f.is_set());
  assert_eq!(f.db_file_id, None);
  assert_eq!(f.sub_type, None);
  assert_eq!(f.mime_type_name.as_deref(), Some("chemical/x-pdb"));
}

#[test]
fn container_json_parses_tagged_nodes() {
  let raw = r#"{
    "inputData": {"children": [
      {"kind": "file", "name": "XYZIN", "baseName": "in.pdb", "dbFileId": "0d9f"}
    ]},
    "outputData": {"children": [
      {"kind": "indicator", "name": "stats", "fields": {"rmsd": 0.23, "cycles": 5, "notes": "", "flag": null}},
      {"kind": "list", "name": "maps", "items": [{"kind": "file", "name": "map"}]}
    ]}
  }"#;
  let c = JobContainer::from_json_str(raw).unwrap();
  assert_eq!(c.input_data.name, "inputData");
  assert_eq!(c.control_parameters.name, "controlParameters");
  match c.output_data.child("stats") {
    Some(ParamNode::Indicator(i)) => {
      assert_eq!(i.data_order().collect::<Vec<_>>(), vec!["rmsd", "cycles", "notes", "flag"]);
      assert_eq!(i.value("rmsd"), Some(&ParamValue::Float(0.23)));
      assert_eq!(i.value("cycles"), Some(&ParamValue::Int(5)));
      assert_eq!(i.value("notes"), Some(&ParamValue::Text(String::new())));
      assert_eq!(i.value("flag"), Some(&ParamValue::Null));
    }
    other => panic!("expected indicator, got {:?}", other),
  }
}

#[test]
fn misnamed_section_is_rejected() {
  let raw = r#"{"inputData": {"name": "outputData", "children": []}}"#;
  match JobContainer::from_json_str(raw) {
    Err(ParamsError::Validation(_)) => {}
    other => panic!("expected validation error, got {:?}", other),
  }
}

#[test]
fn merge_overlays_data_on_definition() {
  let mut def = JobContainer::new();
  def.input_data.push(ParamNode::File(DataFile::new("XYZIN").with_mime_type("chemical/x-pdb")));
  def.control_parameters.push(ParamNode::scalar("NCYC", 5_i64));

  let mut data = JobContainer::new();
  data.input_data.push(ParamNode::File(DataFile::new("XYZIN").with_location("/data/in.pdb")));
  data.control_parameters.push(ParamNode::scalar("EXTRA", "x"));

  def.merge_from(data);
  match def.input_data.child("XYZIN") {
    Some(ParamNode::File(f)) => {
      assert_eq!(f.base_name.as_deref(), Some("in.pdb"));
      assert_eq!(f.mime_type_name.as_deref(), Some("chemical/x-pdb"));
    }
    other => panic!("unexpected {:?}", other),
  }
  assert_eq!(def.control_parameters.children.len(), 2);
}

#[test]
fn missing_json_file_is_not_found() {
  let dir = tempfile::tempdir().unwrap();
  match JobContainer::from_json_file(&dir.path().join("params.json")) {
    Err(ParamsError::NotFound(_)) => {}
    other => panic!("expected not found, got {:?}", other),
  }
}
