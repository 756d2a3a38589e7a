//! Command structs for engine operations.
//!
//! [`TransactionCmd`] is the raw, untrusted submission as it arrives from the
//! API layer: the timestamp is still a string and prices are still major
//! units. The validator turns it into typed domain data.

/// A raw transaction submission.
#[derive(Clone, Debug)]
pub struct TransactionCmd {
    /// Idempotency key: at most one application per id.
    pub transaction_id: String,
    pub shopper_id: String,
    pub store_id: String,
    /// RFC3339 instant, parsed by the validator.
    pub timestamp: String,
    pub items: Vec<LineItemInput>,
}

impl TransactionCmd {
    #[must_use]
    pub fn new(
        transaction_id: impl Into<String>,
        shopper_id: impl Into<String>,
        store_id: impl Into<String>,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            transaction_id: transaction_id.into(),
            shopper_id: shopper_id.into(),
            store_id: store_id.into(),
            timestamp: timestamp.into(),
            items: Vec::new(),
        }
    }

    #[must_use]
    pub fn item(mut self, item: LineItemInput) -> Self {
        self.items.push(item);
        self
    }
}

/// A raw purchase line.
#[derive(Clone, Debug)]
pub struct LineItemInput {
    pub sku: String,
    pub name: String,
    pub quantity: i64,
    /// Unit price in major units (dollars), as submitted in JSON.
    pub unit_price: f64,
    pub category: String,
}

impl LineItemInput {
    #[must_use]
    pub fn new(
        sku: impl Into<String>,
        name: impl Into<String>,
        quantity: i64,
        unit_price: f64,
        category: impl Into<String>,
    ) -> Self {
        Self {
            sku: sku.into(),
            name: name.into(),
            quantity,
            unit_price,
            category: category.into(),
        }
    }
}
