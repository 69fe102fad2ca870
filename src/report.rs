//! CSV summary of a batch's payment instructions.

use crate::amount::Amount;
use crate::batch::{GiroBatch, PaymentClass};
use crate::error::Result;
use log::info;
use serde::Serialize;
use std::io::Write;

/// One output line per detail row.
#[derive(Debug, Serialize)]
struct DetailSummary<'a> {
    row: usize,
    payment_type: &'a str,
    class: &'static str,
    receiving_bank_bic: &'a str,
    receiving_account: &'a str,
    receiving_account_name: &'a str,
    purpose_code: &'a str,
    currency: &'a str,
    amount: Amount,
}

fn class_label(payment_type: &str) -> &'static str {
    match PaymentClass::from_code(payment_type) {
        Some(PaymentClass::Credit) => "credit",
        Some(PaymentClass::Debit) => "debit",
        None => "unknown",
    }
}

/// Writes one CSV line per detail, in file order.
///
/// Rows are numbered as in the file, so the first detail is row 2. Trailer
/// totals are logged at info level rather than written.
pub fn write_summary<W: Write>(batch: &GiroBatch, writer: W) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    for (index, detail) in batch.details.iter().enumerate() {
        csv_writer.serialize(DetailSummary {
            row: index + 2,
            payment_type: &detail.payment_type,
            class: class_label(&detail.payment_type),
            receiving_bank_bic: &detail.receiving_bank_bic,
            receiving_account: &detail.receiving_account,
            receiving_account_name: &detail.receiving_account_name,
            purpose_code: &detail.purpose_code,
            currency: &detail.currency,
            amount: Amount::from_cents(detail.amount_in_cents)?,
        })?;
    }

    csv_writer.flush()?;

    let trailer = &batch.trailer;
    info!(
        "Batch {}: {} credits totalling {}, {} debits totalling {}",
        batch.header.batch_id,
        trailer.total_credit_txn,
        Amount::from_cents(trailer.total_credit_amt)?,
        trailer.total_debit_txn,
        Amount::from_cents(trailer.total_debit_amt)?
    );
    Ok(())
}
