//! The records served by the payments API: the signed-in user, their wallet
//! and their transactions.

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use time::{
    Date, OffsetDateTime, PrimitiveDateTime, Time, format_description::well_known::Rfc3339,
    macros::format_description,
};

/// The account holder the dashboard belongs to.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// The user's given name.
    #[serde(default)]
    pub first_name: String,
    /// The user's family name.
    #[serde(default)]
    pub last_name: String,
    /// The user's email address.
    #[serde(default)]
    pub email: String,
}

impl User {
    /// The first and last name separated by a space, skipping empty parts.
    pub fn full_name(&self) -> String {
        [self.first_name.as_str(), self.last_name.as_str()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Up to two upper-case initials for the avatar in the navigation bar.
    pub fn initials(&self) -> String {
        [self.first_name.as_str(), self.last_name.as_str()]
            .into_iter()
            .filter_map(|part| part.chars().next())
            .flat_map(char::to_uppercase)
            .collect()
    }
}

/// Balances and totals for the user's store wallet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Wallet {
    /// Funds available for withdrawal.
    #[serde(default)]
    pub balance: f64,
    /// Everything paid out so far.
    #[serde(default)]
    pub total_payout: f64,
    /// Everything earned so far.
    #[serde(default)]
    pub total_revenue: f64,
    /// Payouts that have been requested but not yet settled.
    #[serde(default)]
    pub pending_payout: f64,
    /// The number of orders placed with the store.
    #[serde(default)]
    pub total_orders: u64,
}

/// Where a transaction is in its settlement lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Successful,
    Pending,
    Failed,
}

impl TransactionStatus {
    /// Every status, in the order they are offered in the filter panel.
    pub const ALL: [TransactionStatus; 3] = [
        TransactionStatus::Successful,
        TransactionStatus::Pending,
        TransactionStatus::Failed,
    ];

    /// The lower-case wire representation, e.g. "pending".
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionStatus::Successful => "successful",
            TransactionStatus::Pending => "pending",
            TransactionStatus::Failed => "failed",
        }
    }

    /// The capitalised label shown to users, e.g. "Pending".
    pub fn label(self) -> &'static str {
        match self {
            TransactionStatus::Successful => "Successful",
            TransactionStatus::Pending => "Pending",
            TransactionStatus::Failed => "Failed",
        }
    }

    /// Parse the wire representation, ignoring case and surrounding whitespace.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();

        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(text))
    }
}

impl Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Details about the customer and product behind a store transaction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionMetadata {
    /// The customer's name.
    #[serde(default)]
    pub name: String,
    /// The kind of product, e.g. "digital_product".
    #[serde(default, rename = "type")]
    pub kind: String,
    /// The customer's email address.
    #[serde(default)]
    pub email: String,
    /// The number of items purchased.
    #[serde(default)]
    pub quantity: u32,
    /// The customer's country, e.g. "Nigeria" or "United States".
    #[serde(default)]
    pub country: String,
    /// The name of the product that was sold.
    #[serde(default)]
    pub product_name: Option<String>,
}

/// The transaction type the API uses for payouts to the user's bank.
pub const WITHDRAWAL: &str = "withdrawal";

/// A single money movement in or out of the wallet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// The API's identifier for the transaction, empty when not provided.
    #[serde(default)]
    pub id: String,
    /// The amount of money moved, in the currency of the customer's country.
    pub amount: f64,
    /// The transaction type, e.g. "deposit" or "withdrawal".
    #[serde(rename = "type")]
    pub kind: String,
    /// The settlement status.
    pub status: TransactionStatus,
    /// The timestamp exactly as sent by the API.
    ///
    /// This is kept verbatim so that exports reproduce the source data. Use
    /// [Transaction::timestamp] for comparisons.
    pub date: String,
    /// Customer and product details, absent for withdrawals.
    #[serde(default)]
    pub metadata: Option<TransactionMetadata>,
    /// The payment processor's reference.
    #[serde(default)]
    pub payment_reference: Option<String>,
}

impl Transaction {
    /// Create a successful transaction with no metadata.
    ///
    /// Intended for building test data with the chained setters below.
    pub fn build(amount: f64, kind: &str, date: &str) -> Self {
        Self {
            id: String::new(),
            amount,
            kind: kind.to_owned(),
            status: TransactionStatus::Successful,
            date: date.to_owned(),
            metadata: None,
            payment_reference: None,
        }
    }

    /// Set the transaction ID.
    pub fn id(mut self, id: &str) -> Self {
        self.id = id.to_owned();
        self
    }

    /// Set the status.
    pub fn status(mut self, status: TransactionStatus) -> Self {
        self.status = status;
        self
    }

    /// Set the customer and product details.
    pub fn metadata(mut self, metadata: TransactionMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Set the payment reference.
    pub fn payment_reference(mut self, reference: &str) -> Self {
        self.payment_reference = Some(reference.to_owned());
        self
    }

    /// Whether this transaction is a payout to the user's bank.
    pub fn is_withdrawal(&self) -> bool {
        self.kind == WITHDRAWAL
    }

    /// The product name from the metadata, if there is a non-empty one.
    pub fn product_name(&self) -> Option<&str> {
        self.metadata
            .as_ref()
            .and_then(|metadata| metadata.product_name.as_deref())
            .filter(|name| !name.is_empty())
    }

    /// The customer name from the metadata, if any.
    pub fn customer_name(&self) -> Option<&str> {
        self.metadata
            .as_ref()
            .map(|metadata| metadata.name.as_str())
            .filter(|name| !name.is_empty())
    }

    /// The customer country from the metadata, if any.
    pub fn country(&self) -> Option<&str> {
        self.metadata
            .as_ref()
            .map(|metadata| metadata.country.as_str())
            .filter(|country| !country.is_empty())
    }

    /// The point in time the transaction happened.
    ///
    /// Accepts RFC 3339 timestamps, bare dates (`2023-01-01`, read as
    /// midnight UTC) and ISO date-times without an offset (read as UTC).
    /// Returns `None` if the API sent something else.
    pub fn timestamp(&self) -> Option<OffsetDateTime> {
        parse_timestamp(&self.date)
    }
}

fn parse_timestamp(text: &str) -> Option<OffsetDateTime> {
    let text = text.trim();

    if let Ok(timestamp) = OffsetDateTime::parse(text, &Rfc3339) {
        return Some(timestamp);
    }

    if let Ok(date_time) = PrimitiveDateTime::parse(
        text,
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
    ) {
        return Some(date_time.assume_utc());
    }

    Date::parse(text, format_description!("[year]-[month]-[day]"))
        .ok()
        .map(|date| date.with_time(Time::MIDNIGHT).assume_utc())
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::{Transaction, TransactionMetadata, TransactionStatus, User};

    #[test]
    fn deserializes_api_transaction() {
        let json = r#"{
            "amount": 500,
            "metadata": {
                "name": "John Doe",
                "type": "digital_product",
                "email": "johndoe@example.com",
                "quantity": 1,
                "country": "Nigeria",
                "product_name": "Rich Dad Poor Dad"
            },
            "payment_reference": "c3f7123f-186f-4a45-b911-76736e9c5937",
            "status": "successful",
            "type": "deposit",
            "date": "2022-03-03"
        }"#;

        let transaction: Transaction = serde_json::from_str(json).unwrap();

        assert_eq!(transaction.amount, 500.0);
        assert_eq!(transaction.kind, "deposit");
        assert_eq!(transaction.status, TransactionStatus::Successful);
        assert_eq!(transaction.product_name(), Some("Rich Dad Poor Dad"));
        assert_eq!(transaction.customer_name(), Some("John Doe"));
        assert_eq!(transaction.country(), Some("Nigeria"));
        assert_eq!(
            transaction.payment_reference.as_deref(),
            Some("c3f7123f-186f-4a45-b911-76736e9c5937")
        );
        assert_eq!(transaction.id, "");
    }

    #[test]
    fn deserializes_withdrawal_without_metadata() {
        let json = r#"{
            "amount": 3000.5,
            "status": "pending",
            "type": "withdrawal",
            "date": "2022-03-01"
        }"#;

        let transaction: Transaction = serde_json::from_str(json).unwrap();

        assert!(transaction.is_withdrawal());
        assert_eq!(transaction.metadata, None);
        assert_eq!(transaction.product_name(), None);
    }

    #[test]
    fn rejects_unknown_status() {
        let json = r#"{"amount": 1, "status": "reversed", "type": "deposit", "date": ""}"#;

        assert!(serde_json::from_str::<Transaction>(json).is_err());
    }

    #[test]
    fn parses_supported_timestamp_formats() {
        let cases = [
            ("2023-01-01", datetime!(2023-01-01 00:00 UTC)),
            ("2023-01-01T10:30:00Z", datetime!(2023-01-01 10:30 UTC)),
            ("2023-01-01T10:30:00.250Z", datetime!(2023-01-01 10:30:00.25 UTC)),
            ("2023-01-01T10:30:00+13:00", datetime!(2023-01-01 10:30 +13)),
            ("2023-01-01T10:30:00", datetime!(2023-01-01 10:30 UTC)),
        ];

        for (text, want) in cases {
            let got = Transaction::build(1.0, "deposit", text).timestamp();
            assert_eq!(got, Some(want), "parsing {text:?}");
        }
    }

    #[test]
    fn unparseable_timestamp_is_none() {
        assert_eq!(
            Transaction::build(1.0, "deposit", "last tuesday").timestamp(),
            None
        );
    }

    #[test]
    fn empty_product_name_is_none() {
        let transaction = Transaction::build(1.0, "deposit", "2023-01-01").metadata(
            TransactionMetadata {
                product_name: Some(String::new()),
                ..Default::default()
            },
        );

        assert_eq!(transaction.product_name(), None);
    }

    #[test]
    fn status_parse_ignores_case() {
        assert_eq!(
            TransactionStatus::parse(" Pending "),
            Some(TransactionStatus::Pending)
        );
        assert_eq!(TransactionStatus::parse("refunded"), None);
    }

    #[test]
    fn user_names() {
        let user = User {
            first_name: "olivier".to_owned(),
            last_name: "Jones".to_owned(),
            email: "olivier@example.com".to_owned(),
        };

        assert_eq!(user.full_name(), "olivier Jones");
        assert_eq!(user.initials(), "OJ");
        assert_eq!(User::default().full_name(), "");
    }
}
