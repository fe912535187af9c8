use arrow::array::{Float64Array, Int32Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use histlens_core::{
    load_sample, read_parquet_column, HistLensError, HistogramAttrs, HistogramNode, JsonFileSink,
    LinearScale, PreserveDomain, Scale,
};
use parquet::arrow::ArrowWriter;
use std::sync::Arc;
use tempfile::NamedTempFile;

fn write_fixture() -> NamedTempFile {
    let tmp = tempfile::Builder::new()
        .suffix(".parquet")
        .tempfile()
        .unwrap();
    let schema = Arc::new(Schema::new(vec![
        Field::new("name", DataType::Utf8, true),
        Field::new("id", DataType::Int32, false),
        Field::new("score", DataType::Float64, true),
    ]));
    let names = Arc::new(StringArray::from(vec![Some("a"), Some("b"), None, Some("d")]));
    let ids = Arc::new(Int32Array::from(vec![0, 5, 7, 10]));
    let scores = Arc::new(Float64Array::from(vec![Some(0.5), None, Some(2.5), Some(4.0)]));
    let batch = RecordBatch::try_new(schema.clone(), vec![names, ids, scores]).unwrap();
    let mut writer = ArrowWriter::try_new(tmp.as_file(), schema, None).unwrap();
    writer.write(&batch).unwrap();
    writer.close().unwrap();
    tmp
}

#[test]
fn first_numeric_column_by_default() {
    let tmp = write_fixture();
    assert_eq!(load_sample(tmp.path(), None).unwrap(), vec![0.0, 5.0, 7.0, 10.0]);
}

#[test]
fn named_column_skips_nulls() {
    let tmp = write_fixture();
    assert_eq!(read_parquet_column(tmp.path(), Some("score"), 2).unwrap(), vec![0.5, 2.5, 4.0]);
}

#[test]
fn unknown_and_non_numeric_columns_rejected() {
    let tmp = write_fixture();
    assert!(matches!(
        load_sample(tmp.path(), Some("missing")),
        Err(HistLensError::UnknownColumn(c)) if c == "missing"
    ));
    assert!(load_sample(tmp.path(), Some("name")).is_err());
}

#[test]
fn parquet_column_into_node() {
    let tmp = write_fixture();
    let sample = load_sample(tmp.path(), Some("id")).unwrap();
    let x = LinearScale::new().shared();
    let y = LinearScale::new().shared();
    let attrs = HistogramAttrs { bins: 2, sample, ..Default::default() };
    let mut node = HistogramNode::new("ids", attrs, x.clone(), y.clone()).unwrap();
    assert_eq!(node.output().edges, vec![0.0, 5.0, 10.0]);
    assert_eq!(node.output().counts, vec![1.0, 3.0]);

    node.set_normalized(true);
    let area: f64 = node.output().counts.iter().map(|c| c * 5.0).sum();
    assert!((area - 1.0).abs() < 1e-12);
    assert!((y.borrow().domain().max - 1.05 * 3.0 / 20.0).abs() < 1e-12);
}

#[test]
fn overlaid_nodes_share_domains() {
    let x = LinearScale::new().shared();
    let y = LinearScale::new().shared();
    let mut narrow = HistogramNode::new(
        "narrow",
        HistogramAttrs { bins: 4, sample: vec![2.0, 3.0, 3.0, 4.0], ..Default::default() },
        x.clone(),
        y.clone(),
    )
    .unwrap();
    let mut wide = HistogramNode::new(
        "wide",
        HistogramAttrs { bins: 4, sample: vec![0.0, 8.0], ..Default::default() },
        x.clone(),
        y.clone(),
    )
    .unwrap();
    narrow.refresh();
    assert_eq!(narrow.output().edges, wide.output().edges);
    assert_eq!(narrow.output().counts, vec![0.0, 3.0, 1.0, 0.0]);

    // wide steps back; narrow rebins against its own extent again
    wide.set_preserve_domain(PreserveDomain { sample: true, count: false });
    narrow.refresh();
    assert_eq!(x.borrow().domain().min, 2.0);
    assert_eq!(narrow.output().edges, vec![2.0, 2.5, 3.0, 3.5, 4.0]);
    assert_eq!(narrow.output().counts, vec![1.0, 0.0, 2.0, 1.0]);
    // wide has nothing inside [2, 4], so only narrow sizes the count axis
    assert!(wide.output().is_empty());
    assert!((y.borrow().domain().max - 1.05 * 2.0).abs() < 1e-12);
}

#[test]
fn sink_persists_latest_state() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    let node = HistogramNode::new(
        "persisted",
        HistogramAttrs { bins: 3, ..Default::default() },
        LinearScale::new().shared(),
        LinearScale::new().shared(),
    )
    .unwrap();
    let mut node = node.with_sink(Box::new(JsonFileSink::new(&path)));
    node.set_sample(vec![1.0, 2.0, 3.0, 4.0]);
    node.set_bins(2).unwrap();
    let saved = JsonFileSink::new(&path).load().unwrap();
    assert_eq!(saved.bins, 2);
    assert_eq!(saved.count, vec![2.0, 2.0]);
    assert_eq!(saved, node.snapshot());
}
