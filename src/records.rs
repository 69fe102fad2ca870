//! Header, detail and trailer records of a GIRO batch.
//!
//! Field layouts are built once on first use and never change afterwards.
//! Filler and record-type columns are not exposed on the typed records; they
//! always encode with their fixed contents.

use crate::error::{GiroError, Result};
use crate::field::{FieldSpec, Pattern, DATETIME_FORMAT, DATE_FORMAT};
use crate::record::{FieldValues, FixedWidthRecord, RecordSchema};
use chrono::{NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;

pub const DETAIL_RECORD_TYPE: &str = "10";
pub const TRAILER_RECORD_TYPE: &str = "20";
pub const DEFAULT_CURRENCY: &str = "SGD";
pub const DEFAULT_PRIORITY: &str = "N";

/// Closing filler of the header: `C`, 719 spaces, `01`.
pub static HEADER_CLOSING_FILLER: Lazy<String> = Lazy::new(|| format!("C{}01", " ".repeat(719)));

fn pattern(source: &str) -> Pattern {
    // Only called with the literals below.
    Pattern::new(source).expect("built-in field pattern compiles")
}

static HEADER_SCHEMA: Lazy<RecordSchema> = Lazy::new(|| {
    RecordSchema::builder("header")
        .field(FieldSpec::datetime("creation_datetime", 14, DATETIME_FORMAT))
        .field(FieldSpec::validated_text(
            "sender_company_id",
            8,
            pattern("[A-Z0-9 ]{8}"),
        ))
        .field(FieldSpec::date("value_date", 8, DATE_FORMAT))
        .field(FieldSpec::validated_text(
            "originating_account",
            34,
            pattern("[a-zA-Z0-9]+"),
        ))
        .field(FieldSpec::validated_text(
            "originating_name",
            140,
            pattern("[a-zA-Z0-9 ]+"),
        ))
        .field(FieldSpec::text("filler_1", 34))
        .field(FieldSpec::integer("batch_id", 5))
        .field(FieldSpec::text("batch_reference", 35))
        .field(FieldSpec::text("filler_2", 722).with_default(HEADER_CLOSING_FILLER.clone()))
        .build()
});

static DETAIL_SCHEMA: Lazy<RecordSchema> = Lazy::new(|| {
    RecordSchema::builder("detail")
        .field(FieldSpec::validated_text(
            "payment_type",
            2,
            pattern("20|22|30"),
        ))
        .field(FieldSpec::validated_text(
            "beneficiary_reference",
            35,
            pattern("[a-zA-Z0-9 ]+"),
        ))
        .field(FieldSpec::validated_text(
            "receiving_bank_bic",
            35,
            pattern("[A-Z0-9]{11}"),
        ))
        .field(FieldSpec::validated_text(
            "receiving_account",
            34,
            pattern("[a-zA-Z0-9]+"),
        ))
        .field(FieldSpec::validated_text(
            "receiving_account_name",
            140,
            pattern("[a-zA-Z0-9 ]+"),
        ))
        .field(FieldSpec::validated_text(
            "purpose_code",
            4,
            pattern("[A-Z ]{4}"),
        ))
        .field(FieldSpec::text("currency", 3).with_default(DEFAULT_CURRENCY))
        .field(FieldSpec::integer("amount_in_cents", 11))
        .field(FieldSpec::text("originator_bank_reference", 35))
        .field(FieldSpec::text("payment_details", 140))
        .field(FieldSpec::text("priority_indicator", 1).with_default(DEFAULT_PRIORITY))
        .field(FieldSpec::text("ultimate_originator_name", 140))
        .field(FieldSpec::text("ultimate_receiver_name", 140))
        .field(FieldSpec::text("filler_1", 278))
        .field(FieldSpec::text("record_type", 2).with_default(DETAIL_RECORD_TYPE))
        .build()
});

static TRAILER_SCHEMA: Lazy<RecordSchema> = Lazy::new(|| {
    RecordSchema::builder("trailer")
        .field(FieldSpec::integer("total_credit_txn", 11))
        .field(FieldSpec::integer("total_credit_amt", 18))
        .field(FieldSpec::integer("total_debit_txn", 11))
        .field(FieldSpec::integer("total_debit_amt", 18))
        .field(FieldSpec::text("filler_1", 26))
        .field(FieldSpec::integer("account_hash_total", 11))
        .field(FieldSpec::text("filler_2", 903))
        .field(FieldSpec::text("record_type", 2).with_default(TRAILER_RECORD_TYPE))
        .build()
});

/// First row of a batch: who is paying, from which account, and when.
///
/// `batch_id` should be unique together with `value_date` and lie in
/// `1..=89999`; that is not checked here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchHeader {
    pub creation_datetime: Option<NaiveDateTime>,
    /// Uppercase letters, digits and spaces, exactly 8 characters.
    pub sender_company_id: String,
    /// Effective date of the batch.
    pub value_date: Option<NaiveDate>,
    pub originating_account: String,
    pub originating_name: String,
    pub batch_id: u32,
    pub batch_reference: String,
}

impl FixedWidthRecord for BatchHeader {
    fn schema() -> &'static RecordSchema {
        &HEADER_SCHEMA
    }

    fn to_values(&self) -> FieldValues {
        let mut values = FieldValues::new();
        values.set_opt("creation_datetime", self.creation_datetime);
        values.set_text("sender_company_id", &self.sender_company_id);
        values.set_opt("value_date", self.value_date);
        values.set_text("originating_account", &self.originating_account);
        values.set_text("originating_name", &self.originating_name);
        values.set("batch_id", u64::from(self.batch_id));
        values.set_text("batch_reference", &self.batch_reference);
        values
    }

    fn from_values(values: &FieldValues) -> Result<Self> {
        let batch_id = u32::try_from(values.integer("batch_id")?)
            .map_err(|_| GiroError::Overflow("batch_id"))?;

        Ok(BatchHeader {
            creation_datetime: values.datetime("creation_datetime")?,
            sender_company_id: values.text("sender_company_id")?,
            value_date: values.date("value_date")?,
            originating_account: values.text("originating_account")?,
            originating_name: values.text("originating_name")?,
            batch_id,
            batch_reference: values.text("batch_reference")?,
        })
    }
}

/// One payment instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailRecord {
    /// `20` or `22` for credits, `30` for debits.
    pub payment_type: String,
    pub beneficiary_reference: String,
    /// 11-character bank identifier, left-aligned in its column.
    pub receiving_bank_bic: String,
    pub receiving_account: String,
    pub receiving_account_name: String,
    /// Four uppercase letters, e.g. `SALA`.
    pub purpose_code: String,
    pub currency: String,
    pub amount_in_cents: u64,
    /// Only needed when debiting someone else's account.
    pub originator_bank_reference: String,
    pub payment_details: String,
    pub priority_indicator: String,
    pub ultimate_originator_name: String,
    pub ultimate_receiver_name: String,
}

impl Default for DetailRecord {
    fn default() -> Self {
        DetailRecord {
            payment_type: String::new(),
            beneficiary_reference: String::new(),
            receiving_bank_bic: String::new(),
            receiving_account: String::new(),
            receiving_account_name: String::new(),
            purpose_code: String::new(),
            currency: DEFAULT_CURRENCY.to_string(),
            amount_in_cents: 0,
            originator_bank_reference: String::new(),
            payment_details: String::new(),
            priority_indicator: DEFAULT_PRIORITY.to_string(),
            ultimate_originator_name: String::new(),
            ultimate_receiver_name: String::new(),
        }
    }
}

impl FixedWidthRecord for DetailRecord {
    fn schema() -> &'static RecordSchema {
        &DETAIL_SCHEMA
    }

    fn to_values(&self) -> FieldValues {
        let mut values = FieldValues::new();
        values.set_text("payment_type", &self.payment_type);
        values.set_text("beneficiary_reference", &self.beneficiary_reference);
        values.set_text("receiving_bank_bic", &self.receiving_bank_bic);
        values.set_text("receiving_account", &self.receiving_account);
        values.set_text("receiving_account_name", &self.receiving_account_name);
        values.set_text("purpose_code", &self.purpose_code);
        values.set_text("currency", &self.currency);
        values.set("amount_in_cents", self.amount_in_cents);
        values.set_text("originator_bank_reference", &self.originator_bank_reference);
        values.set_text("payment_details", &self.payment_details);
        values.set_text("priority_indicator", &self.priority_indicator);
        values.set_text("ultimate_originator_name", &self.ultimate_originator_name);
        values.set_text("ultimate_receiver_name", &self.ultimate_receiver_name);
        values
    }

    fn from_values(values: &FieldValues) -> Result<Self> {
        Ok(DetailRecord {
            payment_type: values.text("payment_type")?,
            beneficiary_reference: values.text("beneficiary_reference")?,
            receiving_bank_bic: values.text("receiving_bank_bic")?,
            receiving_account: values.text("receiving_account")?,
            receiving_account_name: values.text("receiving_account_name")?,
            purpose_code: values.text("purpose_code")?,
            currency: values.text("currency")?,
            amount_in_cents: values.integer("amount_in_cents")?,
            originator_bank_reference: values.text("originator_bank_reference")?,
            payment_details: values.text("payment_details")?,
            priority_indicator: values.text("priority_indicator")?,
            ultimate_originator_name: values.text("ultimate_originator_name")?,
            ultimate_receiver_name: values.text("ultimate_receiver_name")?,
        })
    }
}

/// Last row of a batch: per-class totals and the account hash.
///
/// Usually produced by [`crate::GiroBatch::set_trailer_values`] rather than
/// filled in by hand.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchTrailer {
    pub total_credit_txn: u64,
    pub total_credit_amt: u64,
    pub total_debit_txn: u64,
    pub total_debit_amt: u64,
    pub account_hash_total: u64,
}

impl FixedWidthRecord for BatchTrailer {
    fn schema() -> &'static RecordSchema {
        &TRAILER_SCHEMA
    }

    fn to_values(&self) -> FieldValues {
        let mut values = FieldValues::new();
        values.set("total_credit_txn", self.total_credit_txn);
        values.set("total_credit_amt", self.total_credit_amt);
        values.set("total_debit_txn", self.total_debit_txn);
        values.set("total_debit_amt", self.total_debit_amt);
        values.set("account_hash_total", self.account_hash_total);
        values
    }

    fn from_values(values: &FieldValues) -> Result<Self> {
        Ok(BatchTrailer {
            total_credit_txn: values.integer("total_credit_txn")?,
            total_credit_amt: values.integer("total_credit_amt")?,
            total_debit_txn: values.integer("total_debit_txn")?,
            total_debit_amt: values.integer("total_debit_amt")?,
            account_hash_total: values.integer("account_hash_total")?,
        })
    }
}
