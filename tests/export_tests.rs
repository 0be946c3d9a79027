mod common;

use arrow::array::{Array, AsArray};
use arrow::datatypes::{DataType, Float64Type};
use common::{fixture_path, GnssLogBuilder, FIX_FIELDS};
use gnss_navdata::formats::android::derived_column_map;
use gnss_navdata::formats::csv::extract_kind_csv;
use gnss_navdata::rawlog::DEFAULT_COMMENT_MARKER;
use gnss_navdata::{
    read_derived, read_raw_gnss, Cols, CsvWriter, Error, NavData, ParquetWriter, ParquetWriterBuilder,
    RecordKind,
};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::file::reader::{FileReader, SerializedFileReader};
use std::fs::{self, File};
use tempfile::tempdir;

fn read_parquet(path: &std::path::Path) -> arrow::record_batch::RecordBatch {
    let file = File::open(path).unwrap();
    let mut reader = ParquetRecordBatchReaderBuilder::try_new(file)
        .unwrap()
        .build()
        .unwrap();
    reader.next().unwrap().unwrap()
}

#[test]
fn test_derived_parquet_uses_external_names() {
    let dir = tempdir().unwrap();
    let derived = read_derived(fixture_path("pixel4_derived.csv")).unwrap();

    let files = ParquetWriter::new(dir.path())
        .column_map(derived_column_map())
        .write(&derived)
        .unwrap();

    assert_eq!(files, vec![dir.path().join("file_part000.parquet")]);

    let reader = SerializedFileReader::new(File::open(&files[0]).unwrap()).unwrap();
    let metadata = reader.metadata().file_metadata();
    assert_eq!(metadata.num_rows(), 6);
    let names: Vec<&str> = metadata
        .schema()
        .get_fields()
        .iter()
        .map(|f| f.name())
        .collect();
    assert_eq!(names[0], "collectionName");
    assert!(names.contains(&"signalType"));
    assert!(names.contains(&"corr_pr_m"));
    assert!(!names.contains(&"signal_type"));

    let batch = read_parquet(&files[0]);
    let signal = batch.column_by_name("signalType").unwrap().as_string::<i32>();
    assert_eq!(signal.value(2), "GAL_E1");
    let svid = batch
        .column_by_name("svid")
        .unwrap()
        .as_primitive::<Float64Type>();
    assert_eq!(svid.value(1), 10.0);
}

#[test]
fn test_parquet_chunking() {
    let dir = tempdir().unwrap();
    let raw = read_raw_gnss(fixture_path("pixel4_gnss_log.txt")).unwrap();

    let stats = ParquetWriter::new(dir.path())
        .chunk_size(4)
        .write_with_stats(&raw)
        .unwrap();

    assert_eq!(stats.num_samples, 6);
    assert_eq!(stats.num_chunks, 2);
    assert_eq!(stats.num_fields, raw.num_fields());
    assert!(stats.summary().contains("6 samples"));

    let first = read_parquet(&dir.path().join("file_part000.parquet"));
    let second = read_parquet(&dir.path().join("file_part001.parquet"));
    assert_eq!(first.num_rows(), 4);
    assert_eq!(second.num_rows(), 2);

    let sv_id = second.column_by_name("sv_id").unwrap().as_primitive::<Float64Type>();
    assert_eq!(sv_id.values().to_vec(), vec![10.0, 5.0]);
}

#[test]
fn test_parquet_writes_nan_as_null() {
    let dir = tempdir().unwrap();
    let text = GnssLogBuilder::new()
        .header("Fix", &FIX_FIELDS)
        .data("Fix", &["gps", "37.4", "-122.1", "", "0", "3.9", "", "1000"])
        .data("Fix", &["gps", "37.5", "-122.2", "-20", "0", "4.1", "90", "2000"])
        .build();
    let fixes = gnss_navdata::AndroidRawLog::from_text(&text).fixes().unwrap();

    let files = ParquetWriter::new(dir.path()).write(&fixes).unwrap();
    let batch = read_parquet(&files[0]);

    let bearing = batch.column_by_name("BearingDegrees").unwrap();
    assert_eq!(bearing.data_type(), &DataType::Float64);
    assert!(bearing.is_null(0));
    assert!(!bearing.is_null(1));
    assert_eq!(batch.column_by_name("Provider").unwrap().data_type(), &DataType::Utf8);
}

#[test]
fn test_partially_labelled_store_exports() {
    let dir = tempdir().unwrap();
    let mut nav = NavData::new();
    nav.set("sv_id", vec![3.0, 10.0, 5.0]).unwrap();
    nav.set(("label", Cols::Index(1)), vec!["GPS_L1"]).unwrap();

    let batch = nav.to_record_batch(None).unwrap();
    let labels = batch.column_by_name("label").unwrap().as_string::<i32>();
    assert_eq!(labels.value(0), "");
    assert_eq!(labels.value(1), "GPS_L1");

    let files = ParquetWriter::new(dir.path()).write(&nav).unwrap();
    assert_eq!(read_parquet(&files[0]).num_rows(), 3);
}

#[test]
fn test_parquet_rejects_empty_store() {
    let dir = tempdir().unwrap();
    let err = ParquetWriter::new(dir.path())
        .write(&NavData::new())
        .unwrap_err();

    assert!(matches!(err, Error::OutputError(_)));
}

#[test]
fn test_builder_requires_output_directory() {
    assert!(matches!(
        ParquetWriterBuilder::new().build(),
        Err(Error::Other(_))
    ));

    let dir = tempdir().unwrap();
    let writer = ParquetWriterBuilder::new()
        .output_directory(dir.path())
        .chunk_size(10)
        .build()
        .unwrap();
    let raw = read_raw_gnss(fixture_path("pixel4_gnss_log.txt")).unwrap();
    assert_eq!(writer.write(&raw).unwrap().len(), 1);
}

#[test]
fn test_csv_writer_round_trips_derived_file() {
    let dir = tempdir().unwrap();
    let derived = read_derived(fixture_path("pixel4_derived.csv")).unwrap();
    let out = dir.path().join("nested").join("derived.csv");

    let written = CsvWriter::new(&out)
        .column_map(derived_column_map())
        .write(&derived)
        .unwrap();
    assert_eq!(written, out);

    let reread = read_derived(&out).unwrap();
    assert_eq!(reread.len(), derived.len());
    assert_eq!(reread.fields(), derived.fields());
    assert_eq!(
        reread.decode("signal_type", ..).unwrap(),
        derived.decode("signal_type", ..).unwrap()
    );
    assert_eq!(reread.row("raw_pr_m").unwrap(), derived.row("raw_pr_m").unwrap());
}

#[test]
fn test_extract_kind_csv() {
    let dir = tempdir().unwrap();
    let text = fs::read_to_string(fixture_path("pixel4_gnss_log.txt")).unwrap();

    let path = extract_kind_csv(&text, dir.path(), RecordKind::Fix, DEFAULT_COMMENT_MARKER).unwrap();
    assert_eq!(path, dir.path().join("Fix.csv"));

    let written = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = written.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], FIX_FIELDS.join(","));
    assert!(lines[1].starts_with("gps,37.42236"));
    assert!(lines[2].starts_with("fused,"));
}
