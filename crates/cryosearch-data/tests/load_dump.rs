use std::io::Write;

use cryosearch_data::{
    DataError, DumpLayout, load_records, parse_records, sample_records, write_sample_dump,
};

#[test]
fn test_sample_dump_loads_in_both_layouts() {
    let expected = sample_records().expect("sample records deserialize");

    for layout in [DumpLayout::JsonArray, DumpLayout::NdJson] {
        let dump = write_sample_dump(layout).expect("dump written");
        let loaded = load_records(dump.path()).expect("dump loads");
        assert_eq!(loaded, expected, "layout {layout:?} should round trip");
    }
}

#[test]
fn test_sample_records_keep_catalog_invariants() {
    let records = sample_records().unwrap();
    assert_eq!(records.len(), 6);
    cryosearch_data::validate_records(&records).unwrap();

    let glycerol = records.iter().find(|r| r.hash == "glyc02").unwrap();
    assert!(glycerol.is_gras());
    assert_eq!(glycerol.molecular_weight_value(), Some(92.09));
    assert_eq!(glycerol.cell_info.len(), 2);
}

#[test]
fn test_missing_dump_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.json");
    assert!(matches!(
        load_records(&missing),
        Err(DataError::DumpNotFound(path)) if path == missing
    ));
}

#[test]
fn test_collection_export_lines_load() {
    // Two lines as written by mongoexport (relaxed and canonical extended JSON)
    let export = concat!(
        r#"{"_id":{"$oid":"65e1a7f2c3b4d5e6f7a8b9c0"},"hash":"a1","name":"Glycerol","#,
        r#""date_uploaded":{"$date":"2024-03-01T10:00:00.000Z"}}"#,
        "\n",
        r#"{"_id":{"$oid":"65e1a7f2c3b4d5e6f7a8b9c1"},"hash":"b2","name":"Trehalose","#,
        r#""date_written":{"$date":{"$numberLong":"1709287200000"}}}"#,
        "\n",
    );

    let records = parse_records(export).expect("export lines parse");
    assert_eq!(records.len(), 2);
    assert_eq!(
        records[0].date_uploaded.map(|d| d.to_rfc3339()),
        Some("2024-03-01T10:00:00+00:00".to_string())
    );
    assert_eq!(records[0].date_uploaded, records[1].date_written);

    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(export.as_bytes()).unwrap();
    assert_eq!(load_records(file.path()).unwrap(), records);
}
