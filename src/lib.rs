//! # GIRO Batch
//!
//! Encoder and decoder for fixed-width interbank GIRO batch payment files.
//!
//! ## Format
//!
//! - **Fixed-width rows**: every row is exactly 1000 ASCII characters
//! - **Row order**: one header, 1 to 5000 details, one trailer, joined by CRLF
//! - **Trailer aggregates**: credit/debit counts and cent totals, plus an
//!   account hash total derived from the header and detail accounts
//! - **Validation on encode only**: field patterns are checked when writing,
//!   not when reading
//!
//! ## Example
//!
//! ```
//! use giro_batch::{decode, encode, BatchHeader, DetailRecord, GiroBatch};
//!
//! let header = BatchHeader {
//!     sender_company_id: "S3ND3RID".to_string(),
//!     originating_account: "0259001103".to_string(),
//!     originating_name: "Foo Chinese Kitchen Pte Ltd".to_string(),
//!     batch_id: 1,
//!     ..Default::default()
//! };
//! let detail = DetailRecord {
//!     payment_type: "20".to_string(),
//!     beneficiary_reference: "Free money".to_string(),
//!     receiving_bank_bic: "DBSSSGSGXXX".to_string(),
//!     receiving_account: "1234567890".to_string(),
//!     receiving_account_name: "Bar Breweries Pte Ltd".to_string(),
//!     purpose_code: "SALA".to_string(),
//!     amount_in_cents: 6900,
//!     ..Default::default()
//! };
//!
//! let mut batch = GiroBatch::from_parts(header, vec![detail], None);
//! batch.set_trailer_values().unwrap();
//!
//! let bytes = encode(&mut batch).unwrap();
//! assert_eq!(decode(&bytes).unwrap(), batch);
//! ```

pub mod amount;
pub mod batch;
pub mod checksum;
pub mod error;
pub mod field;
pub mod record;
pub mod records;
pub mod report;
pub mod serializer;

pub use amount::Amount;
pub use batch::{GiroBatch, PaymentClass, Row};
pub use error::{GiroError, Result};
pub use field::{FieldKind, FieldSpec, Pattern, Value};
pub use record::{FieldValues, FixedWidthRecord, RecordSchema, RECORD_WIDTH};
pub use records::{BatchHeader, BatchTrailer, DetailRecord};
pub use serializer::{
    decode, decode_with, dump, encode, encode_with, load, load_with, SerializerConfig,
    MAX_TRANSACTIONS, ROW_SEPARATOR,
};
