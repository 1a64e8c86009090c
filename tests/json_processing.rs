use rust_fileprep::ProcessError;
use rust_fileprep::processing::{EMPTY_JSON_DATA, ProcessOptions, Processor};
use rust_fileprep::schema::{FieldSpec, Record, RowValues};
use rust_fileprep::types::{DataType, FileFormat, FileType};

fn json() -> FileFormat {
    FileFormat::plain(FileType::Json)
}

fn jsonl() -> FileFormat {
    FileFormat::plain(FileType::Jsonl)
}

/// Empties the row when it is an empty object.
struct DropEmpty;

impl Record for DropEmpty {
    fn fields() -> Vec<FieldSpec> {
        vec![FieldSpec::new("Data", DataType::Utf8).prep("nullify={}")]
    }

    fn from_row(_: &RowValues<'_>) -> Self {
        DropEmpty
    }
}

struct Truncated;

impl Record for Truncated {
    fn fields() -> Vec<FieldSpec> {
        vec![FieldSpec::new("Data", DataType::Utf8).prep("truncate=5")]
    }

    fn from_row(_: &RowValues<'_>) -> Self {
        Truncated
    }
}

struct Event {
    data: String,
}

impl Record for Event {
    fn fields() -> Vec<FieldSpec> {
        vec![FieldSpec::new("Payload", DataType::Utf8)
            .name("data")
            .validate("required,contains=\"id\"")]
    }

    fn from_row(row: &RowValues<'_>) -> Self {
        Self {
            data: row.get("Payload"),
        }
    }
}

#[test]
fn emptied_rows_are_skipped_on_emit() {
    let out = Processor::default()
        .process::<DropEmpty, _>(r#"[{}, {"k":"v"}]"#.as_bytes(), json())
        .unwrap();

    assert_eq!(out.result.row_count, 2);
    assert_eq!(out.result.valid_row_count, 1);
    assert_eq!(out.result.error_count(), 1);
    let err = out.result.prep_errors().next().unwrap();
    assert_eq!(err.row, 1);
    assert_eq!(err.tag, EMPTY_JSON_DATA);
    assert_eq!(out.stream.as_bytes(), b"{\"k\":\"v\"}\n");
    assert_eq!(out.stream.output_format(), FileFormat::plain(FileType::Jsonl));
}

#[test]
fn invalid_json_after_prep_is_fatal() {
    let err = Processor::default()
        .process::<Truncated, _>(r#"[{"key":"value"}]"#.as_bytes(), json())
        .unwrap_err();
    match err {
        ProcessError::JsonInvalidAfterPrep { row, value } => {
            assert_eq!(row, 1);
            assert_eq!(value, "{\"key");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn invalid_value_is_truncated_in_the_error() {
    struct Broken;
    impl Record for Broken {
        fn fields() -> Vec<FieldSpec> {
            vec![FieldSpec::new("Data", DataType::Utf8).prep("prefix=x")]
        }
        fn from_row(_: &RowValues<'_>) -> Self {
            Broken
        }
    }

    let long = format!("[\"{}\"]", "a".repeat(300));
    let err = Processor::default()
        .process::<Broken, _>(long.as_bytes(), json())
        .unwrap_err();
    match err {
        ProcessError::JsonInvalidAfterPrep { value, .. } => assert_eq!(value.chars().count(), 100),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn all_rows_empty_is_fatal() {
    let err = Processor::default()
        .process::<DropEmpty, _>("{}\n{}\n".as_bytes(), jsonl())
        .unwrap_err();
    assert!(matches!(err, ProcessError::JsonAllRowsEmpty));
}

#[test]
fn jsonl_is_compacted_with_key_order_kept() {
    let out = Processor::default()
        .process_path::<Event>("tests/fixtures/events.jsonl")
        .unwrap();
    assert_eq!(out.result.row_count, 2);
    assert_eq!(out.result.valid_row_count, 2);
    assert_eq!(out.records[0].data, r#"{"id": 1, "type": "click"}"#);
    assert_eq!(
        String::from_utf8(out.stream.into_bytes()).unwrap(),
        "{\"id\":1,\"type\":\"click\"}\n{\"id\":2,\"type\":\"view\"}\n"
    );
}

#[test]
fn json_array_becomes_jsonl() {
    let out = Processor::default()
        .process_path::<Event>("tests/fixtures/events.json")
        .unwrap();
    assert_eq!(
        out.stream.as_bytes(),
        b"{\"id\":1,\"tags\":[\"a\",\"b\"]}\n{\"id\":2,\"tags\":[]}\n"
    );
}

#[test]
fn rows_without_a_data_field_use_the_raw_cell() {
    struct Unbound;
    impl Record for Unbound {
        fn fields() -> Vec<FieldSpec> {
            vec![FieldSpec::new("Other", DataType::Utf8)]
        }
        fn from_row(_: &RowValues<'_>) -> Self {
            Unbound
        }
    }

    let out = Processor::default()
        .process::<Unbound, _>("[1, \"two\"]".as_bytes(), json())
        .unwrap();
    assert_eq!(out.stream.as_bytes(), b"1\n\"two\"\n");
}

#[test]
fn valid_rows_only_filters_json_output() {
    let processor = Processor::new(ProcessOptions {
        valid_rows_only: true,
        ..Default::default()
    });
    let out = processor
        .process::<Event, _>("{\"id\":1}\n{\"name\":\"x\"}\n".as_bytes(), jsonl())
        .unwrap();
    assert_eq!(out.result.row_count, 2);
    assert_eq!(out.records.len(), 1);
    assert_eq!(out.stream.as_bytes(), b"{\"id\":1}\n");
}

#[test]
fn all_rows_filtered_out_is_fatal() {
    let processor = Processor::new(ProcessOptions {
        valid_rows_only: true,
        ..Default::default()
    });
    let err = processor
        .process::<Event, _>("{\"name\":\"x\"}\n{\"name\":\"y\"}\n".as_bytes(), jsonl())
        .unwrap_err();
    assert!(matches!(err, ProcessError::JsonAllRowsEmpty));
}

#[test]
fn big_numbers_survive_the_round_trip() {
    struct Passthrough;
    impl Record for Passthrough {
        fn fields() -> Vec<FieldSpec> {
            Vec::new()
        }
        fn from_row(_: &RowValues<'_>) -> Self {
            Passthrough
        }
    }

    let input = r#"[{"id": 12345678901234567890123, "p": 0.10000000000000000555}]"#;
    let out = Processor::default()
        .process::<Passthrough, _>(input.as_bytes(), json())
        .unwrap();
    assert_eq!(
        out.stream.as_bytes(),
        b"{\"id\":12345678901234567890123,\"p\":0.10000000000000000555}\n"
    );

    let input = "{\"id\": 18446744073709551616000}\n";
    let out = Processor::default()
        .process::<Passthrough, _>(input.as_bytes(), jsonl())
        .unwrap();
    assert_eq!(out.stream.as_bytes(), b"{\"id\":18446744073709551616000}\n");
}

#[test]
fn malformed_inputs() {
    let err = Processor::default()
        .process::<Event, _>("{\"id\":1}\nnot json\n".as_bytes(), jsonl())
        .unwrap_err();
    match err {
        ProcessError::MalformedTable { message } => assert!(message.contains("line 2")),
        other => panic!("unexpected error: {other}"),
    }

    let err = Processor::default()
        .process::<Event, _>("{\"id\":1}".as_bytes(), json())
        .unwrap_err();
    assert!(matches!(err, ProcessError::MalformedTable { .. }));

    let err = Processor::default()
        .process::<Event, _>("[]".as_bytes(), json())
        .unwrap_err();
    assert!(matches!(err, ProcessError::EmptyInput));
}
