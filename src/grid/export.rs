//! Exporting the displayed transactions as a CSV file for spreadsheets.

use axum::{
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::{Error, models::Transaction};

/// The name the browser saves the export as.
pub const EXPORT_FILE_NAME: &str = "transactions.csv";

/// The header row, in column order.
pub const CSV_HEADERS: [&str; 7] = [
    "Type",
    "Product Name",
    "Customer Name",
    "Status",
    "Amount",
    "Payment Reference",
    "Date",
];

/// The UTF-8 byte order mark, which spreadsheet apps need to detect the
/// encoding.
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Write `transactions` as CSV with every field quoted.
///
/// Dates are written as sent by the API and amounts without formatting.
///
/// # Errors
/// Returns [Error::CsvExportError] if a record could not be written.
pub fn transactions_to_csv(transactions: &[Transaction]) -> Result<Vec<u8>, Error> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(UTF8_BOM.to_vec());

    writer
        .write_record(CSV_HEADERS)
        .map_err(|error| Error::CsvExportError(error.to_string()))?;

    for transaction in transactions {
        let amount = transaction.amount.to_string();
        let metadata = transaction.metadata.as_ref();

        writer
            .write_record([
                transaction.kind.as_str(),
                metadata
                    .and_then(|metadata| metadata.product_name.as_deref())
                    .unwrap_or_default(),
                metadata.map(|metadata| metadata.name.as_str()).unwrap_or_default(),
                transaction.status.as_str(),
                amount.as_str(),
                transaction.payment_reference.as_deref().unwrap_or_default(),
                transaction.date.as_str(),
            ])
            .map_err(|error| Error::CsvExportError(error.to_string()))?;
    }

    writer
        .into_inner()
        .map_err(|error| Error::CsvExportError(error.to_string()))
}

/// A CSV file sent as a download.
pub struct CsvDownload(pub Vec<u8>);

impl IntoResponse for CsvDownload {
    fn into_response(self) -> Response {
        (
            [
                (CONTENT_TYPE, "text/csv; charset=utf-8".to_owned()),
                (
                    CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{EXPORT_FILE_NAME}\""),
                ),
            ],
            self.0,
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use crate::models::{Transaction, TransactionMetadata, TransactionStatus};

    use super::{UTF8_BOM, transactions_to_csv};

    #[test]
    fn starts_with_bom_and_quotes_every_field() {
        let transactions = [Transaction::build(10.0, "deposit", "2023-01-01").metadata(
            TransactionMetadata {
                name: "A\"B".to_owned(),
                ..Default::default()
            },
        )];

        let csv = transactions_to_csv(&transactions).unwrap();

        assert!(csv.starts_with(UTF8_BOM));
        let text = String::from_utf8(csv[UTF8_BOM.len()..].to_vec()).unwrap();
        assert_eq!(
            text,
            "\"Type\",\"Product Name\",\"Customer Name\",\"Status\",\"Amount\",\"Payment Reference\",\"Date\"\n\
             \"deposit\",\"\",\"A\"\"B\",\"successful\",\"10\",\"\",\"2023-01-01\"\n"
        );
    }

    #[test]
    fn writes_every_column_in_order() {
        let transactions = [Transaction::build(1234.5, "deposit", "2023-02-01T10:00:00Z")
            .status(TransactionStatus::Pending)
            .payment_reference("ref-1")
            .metadata(TransactionMetadata {
                name: "Roy Cash".to_owned(),
                product_name: Some("Rich Dad Poor Dad".to_owned()),
                ..Default::default()
            })];

        let csv = transactions_to_csv(&transactions).unwrap();

        let text = String::from_utf8(csv[UTF8_BOM.len()..].to_vec()).unwrap();
        let row = text.lines().nth(1).unwrap();
        assert_eq!(
            row,
            "\"deposit\",\"Rich Dad Poor Dad\",\"Roy Cash\",\"pending\",\"1234.5\",\"ref-1\",\"2023-02-01T10:00:00Z\""
        );
    }

    #[test]
    fn withdrawal_without_metadata_has_empty_fields() {
        let transactions = [Transaction::build(500.0, "withdrawal", "2023-01-02")];

        let csv = transactions_to_csv(&transactions).unwrap();

        let text = String::from_utf8(csv[UTF8_BOM.len()..].to_vec()).unwrap();
        assert_eq!(
            text.lines().nth(1).unwrap(),
            "\"withdrawal\",\"\",\"\",\"successful\",\"500\",\"\",\"2023-01-02\""
        );
    }

    #[test]
    fn empty_export_has_header_only() {
        let csv = transactions_to_csv(&[]).unwrap();

        let text = String::from_utf8(csv[UTF8_BOM.len()..].to_vec()).unwrap();
        assert_eq!(text.lines().count(), 1);
    }
}
