use std::path::Path;
use std::sync::Arc;
use std::thread;

use rust_fileprep::ProcessError;
use rust_fileprep::ingestion::{infer_format_from_path, parse_table};
use rust_fileprep::processing::Processor;
use rust_fileprep::schema::tags::TagMode;
use rust_fileprep::schema::{FieldSpec, Record, RecordSchema, RowValues};
use rust_fileprep::types::{Compression, DataType, FileFormat, FileType, Value};

struct Contact {
    email: String,
}

impl Record for Contact {
    fn fields() -> Vec<FieldSpec> {
        vec![
            FieldSpec::new("Email", DataType::Utf8)
                .prep("trim,lowercase")
                .validate("required,email"),
        ]
    }

    fn from_row(row: &RowValues<'_>) -> Self {
        Self {
            email: row.get("Email"),
        }
    }
}

#[test]
fn format_detection_from_paths() {
    let cases = [
        ("a.csv", FileFormat::plain(FileType::Csv)),
        ("a.TSV", FileFormat::plain(FileType::Tsv)),
        ("logs/a.ltsv.zst", FileFormat::new(FileType::Ltsv, Compression::Zstd)),
        ("a.ndjson", FileFormat::plain(FileType::Jsonl)),
        ("a.json.bz2", FileFormat::new(FileType::Json, Compression::Bzip2)),
        ("a.parquet", FileFormat::plain(FileType::Parquet)),
        ("a.xlsx", FileFormat::plain(FileType::Xlsx)),
        ("a.csv.lz4", FileFormat::new(FileType::Csv, Compression::Lz4)),
    ];
    for (path, expected) in cases {
        assert_eq!(infer_format_from_path(Path::new(path)).unwrap(), expected, "{path}");
    }
    assert_eq!(FileFormat::new(FileType::Csv, Compression::Gzip).to_string(), "csv.gz");
}

#[test]
fn unknown_extension_is_unsupported() {
    let err = Processor::default()
        .process_path::<Contact>("tests/fixtures/users.txt")
        .unwrap_err();
    assert!(matches!(err, ProcessError::UnsupportedFormat { .. }));

    let err = Processor::default()
        .process_path::<Contact>("tests/fixtures/users.gz")
        .unwrap_err();
    assert!(matches!(err, ProcessError::UnsupportedFormat { .. }));
}

#[test]
fn same_schema_across_formats() {
    let processor = Processor::default();
    for path in ["tests/fixtures/users.csv", "tests/fixtures/users.tsv"] {
        let out = processor.process_path::<Contact>(path).unwrap();
        assert_eq!(out.result.row_count, 3, "{path}");
        assert_eq!(out.result.valid_row_count, 2, "{path}");
        assert_eq!(out.records[0].email, "ada@example.com");
    }
}

#[test]
fn processor_is_shared_across_threads() {
    let processor = Arc::new(Processor::default());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let p = Arc::clone(&processor);
            thread::spawn(move || {
                let input = format!("email\nuser{i}@example.com\nbroken\n");
                let out = p
                    .process::<Contact, _>(input.as_bytes(), FileFormat::plain(FileType::Csv))
                    .unwrap();
                (out.result.valid_row_count, out.records[0].email.clone())
            })
        })
        .collect();

    for (i, h) in handles.into_iter().enumerate() {
        let (valid, email) = h.join().unwrap();
        assert_eq!(valid, 1);
        assert_eq!(email, format!("user{i}@example.com"));
    }

    let a = processor.compile::<Contact>().unwrap();
    let b = processor.compile::<Contact>().unwrap();
    assert!(Arc::ptr_eq(&a, &b));
}

#[test]
fn explicit_schema_without_a_record_type() {
    let schema = RecordSchema::compile(
        vec![
            FieldSpec::new("Host", DataType::Utf8),
            FieldSpec::new("Status", DataType::UInt16).validate("oneof=200 404"),
        ],
        TagMode::Strict,
    )
    .unwrap();
    assert_eq!(schema.column_names(), vec!["host", "status"]);
    assert_eq!(schema.index_of("Status"), Some(1));

    let input = std::fs::read("tests/fixtures/access.ltsv").unwrap();
    let out = Processor::default()
        .process_with_schema(&schema, input.as_slice(), FileFormat::plain(FileType::Ltsv))
        .unwrap();
    assert_eq!(
        out.records,
        vec![
            vec![Value::Utf8("127.0.0.1".into()), Value::UInt64(200)],
            vec![Value::Utf8("10.0.0.2".into()), Value::UInt64(404)],
        ]
    );
}

#[test]
fn parse_table_directly() {
    let table = parse_table(b"a,b\n1\n", FileType::Csv).unwrap();
    assert_eq!(table.rows, vec![vec!["1".to_string(), String::new()]]);
    assert!(matches!(parse_table(b"", FileType::Tsv), Err(ProcessError::EmptyInput)));
}
