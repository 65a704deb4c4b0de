use std::fs;
use std::sync::Arc;

use arrow::array::{Int64Array, ListBuilder, StringArray, StringBuilder};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use syft_filter::{load_file, DatasetFilter, LoadError, Value};
use tempfile::TempDir;

#[test]
fn loads_json_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("items.json");
    fs::write(
        &path,
        r#"[{"id": 1, "name": "Apple", "tags": ["fruit", "red"]},
            {"id": 2, "name": "Carrot", "tags": ["vegetable"]}]"#,
    )
    .unwrap();

    let mut filter = DatasetFilter::new();
    filter.load(path.as_path()).unwrap();
    filter.exact_filter("tags", "RED").unwrap();
    assert_eq!(filter.len(), 1);
    assert_eq!(filter.results()[0].get("name"), Some(&Value::from("Apple")));
}

#[test]
fn loads_csv_with_typed_cells() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("items.csv");
    fs::write(
        &path,
        "id,name,price,tags[],note\n1,Apple,1.25,fruit;red,\n2,Carrot,0.5,vegetable,Hello; world\n",
    )
    .unwrap();

    let records = load_file(&path).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].get("id"), Some(&Value::Integer(1)));
    assert_eq!(records[0].get("price"), Some(&Value::Float(1.25)));
    assert_eq!(records[0].get("tags"), Some(&Value::from(vec!["fruit", "red"])));
    assert_eq!(records[0].get("note"), Some(&Value::Null));
    assert_eq!(records[1].get("tags"), Some(&Value::from(vec!["vegetable"])));
    assert_eq!(records[1].get("note"), Some(&Value::from("Hello; world")));
    assert_eq!(records[1].get("tags[]"), None);

    let mut filter = DatasetFilter::from_records(records);
    filter.range_filter_flag("price", 0.0, 1.0, false).unwrap();
    assert_eq!(filter.len(), 1);
}

#[test]
fn loads_parquet_with_list_column() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("items.parquet");

    let mut tags = ListBuilder::new(StringBuilder::new());
    for row in [vec!["fruit", "red"], vec!["vegetable"]] {
        for tag in row {
            tags.values().append_value(tag);
        }
        tags.append(true);
    }
    let schema = Arc::new(Schema::new(vec![
        Field::new("id", DataType::Int64, false),
        Field::new("name", DataType::Utf8, true),
        Field::new("tags", DataType::List(Arc::new(Field::new("item", DataType::Utf8, true))), false),
    ]));
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from(vec![1i64, 2])),
            Arc::new(StringArray::from(vec![Some("Apple"), None])),
            Arc::new(tags.finish()),
        ],
    )
    .unwrap();
    let file = fs::File::create(&path).unwrap();
    let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
    writer.write(&batch).unwrap();
    writer.close().unwrap();

    let records = load_file(&path).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].get("name"), Some(&Value::from("Apple")));
    assert_eq!(records[1].get("name"), Some(&Value::Null));
    assert_eq!(records[1].get("tags"), Some(&Value::from(vec!["vegetable"])));
}

#[test]
fn rejects_unknown_extension() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("items.xml");
    fs::write(&path, "<items/>").unwrap();

    let err = load_file(&path).unwrap_err();
    assert!(matches!(err, LoadError::UnsupportedFormat(ext) if ext == "xml"));
}

#[test]
fn missing_file_is_a_load_error() {
    let dir = TempDir::new().unwrap();
    let mut filter = DatasetFilter::new();
    let err = filter.load(dir.path().join("absent.json").as_path()).unwrap_err();
    assert!(matches!(err, LoadError::Decode(_)));
    assert!(!filter.is_loaded());
}
