#![cfg(feature = "excel_test_writer")]

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use rust_fileprep::processing::Processor;
use rust_fileprep::schema::{FieldSpec, Record, RowValues};
use rust_fileprep::types::{DataType, FileFormat, FileType};

fn tmp_file(name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("rust-fileprep-{name}-{nanos}.xlsx"))
}

struct Product {
    sku: String,
    qty: u32,
    price: f64,
}

impl Record for Product {
    fn fields() -> Vec<FieldSpec> {
        vec![
            FieldSpec::new("SKU", DataType::Utf8)
                .prep("trim,uppercase")
                .validate("required,alphanumeric"),
            FieldSpec::new("Qty", DataType::UInt32).validate("min=1"),
            FieldSpec::new("Price", DataType::Float64).validate("gt=0"),
        ]
    }

    fn from_row(row: &RowValues<'_>) -> Self {
        Self {
            sku: row.get("SKU"),
            qty: row.get("Qty"),
            price: row.get("Price"),
        }
    }
}

/// A blank first row, then the header, then two data rows.
fn write_products_xlsx(path: &PathBuf) {
    use rust_xlsxwriter::Workbook;

    let mut wb = Workbook::new();
    let ws = wb.add_worksheet();
    ws.set_name("Products").unwrap();

    ws.write_string(1, 0, "sku").unwrap();
    ws.write_string(1, 1, "qty").unwrap();
    ws.write_string(1, 2, "price").unwrap();

    ws.write_string(2, 0, " ab12 ").unwrap();
    ws.write_number(2, 1, 3).unwrap();
    ws.write_number(2, 2, 9.5).unwrap();

    ws.write_string(3, 0, "zz-9").unwrap();
    ws.write_number(3, 1, 0).unwrap();
    ws.write_number(3, 2, 4).unwrap();

    // A second sheet is never read.
    let other = wb.add_worksheet();
    other.write_string(0, 0, "ignored").unwrap();

    wb.save(path).unwrap();
}

#[test]
fn first_sheet_is_processed_and_emitted_as_csv() {
    let path = tmp_file("products");
    write_products_xlsx(&path);

    let out = Processor::default().process_path::<Product>(&path).unwrap();
    assert_eq!(out.result.headers, vec!["sku", "qty", "price"]);
    assert_eq!(out.result.row_count, 2);
    assert_eq!(out.result.valid_row_count, 1);

    assert_eq!(out.records[0].sku, "AB12");
    assert_eq!(out.records[0].qty, 3);
    assert_eq!(out.records[0].price, 9.5);

    let tags: Vec<&str> = out.result.errors.iter().map(|e| e.tag()).collect();
    assert_eq!(tags, vec!["alphanumeric", "min"]);

    assert_eq!(out.stream.output_format(), FileFormat::plain(FileType::Csv));
    assert_eq!(
        out.stream.as_bytes(),
        b"sku,qty,price\nAB12,3,9.5\nZZ-9,0,4\n"
    );

    let _ = std::fs::remove_file(&path);
}
