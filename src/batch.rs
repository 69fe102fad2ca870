//! In-memory batch: one header, ordered details, one trailer.
//!
//! Trailer values are derived from the header and details. The batch does not
//! track staleness; call [`GiroBatch::set_trailer_values`] after changing
//! either before encoding.

use crate::checksum;
use crate::error::{GiroError, Result};
use crate::record::FixedWidthRecord;
use crate::records::{BatchHeader, BatchTrailer, DetailRecord};
use log::debug;

/// Payment types counted as credits.
pub const CREDIT_PAYMENT_TYPES: [&str; 2] = ["20", "22"];

/// Payment types counted as debits.
pub const DEBIT_PAYMENT_TYPES: [&str; 1] = ["30"];

/// Which trailer totals a detail contributes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentClass {
    Credit,
    Debit,
}

impl PaymentClass {
    /// Classifies a payment type code, or `None` if it is not recognised.
    pub fn from_code(code: &str) -> Option<Self> {
        if CREDIT_PAYMENT_TYPES.contains(&code) {
            Some(PaymentClass::Credit)
        } else if DEBIT_PAYMENT_TYPES.contains(&code) {
            Some(PaymentClass::Debit)
        } else {
            None
        }
    }
}

/// A borrowed row in on-wire order.
#[derive(Debug, Clone, Copy)]
pub enum Row<'a> {
    Header(&'a BatchHeader),
    Detail(&'a DetailRecord),
    Trailer(&'a BatchTrailer),
}

impl Row<'_> {
    pub fn to_record(&self) -> Result<String> {
        match self {
            Row::Header(header) => header.to_record(),
            Row::Detail(detail) => detail.to_record(),
            Row::Trailer(trailer) => trailer.to_record(),
        }
    }
}

/// One complete payment submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GiroBatch {
    pub header: BatchHeader,
    pub details: Vec<DetailRecord>,
    pub trailer: BatchTrailer,
}

impl GiroBatch {
    /// Creates a batch with a default header, a single default detail and a
    /// zeroed trailer.
    pub fn new() -> Self {
        GiroBatch {
            header: BatchHeader::default(),
            details: vec![DetailRecord::default()],
            trailer: BatchTrailer::default(),
        }
    }

    /// Creates a batch from its parts. A missing trailer starts zeroed.
    pub fn from_parts(
        header: BatchHeader,
        details: Vec<DetailRecord>,
        trailer: Option<BatchTrailer>,
    ) -> Self {
        GiroBatch {
            header,
            details,
            trailer: trailer.unwrap_or_default(),
        }
    }

    /// Rows in the order they appear in the file: header first, trailer last.
    pub fn to_rows(&self) -> Vec<Row<'_>> {
        let mut rows = Vec::with_capacity(self.details.len() + 2);
        rows.push(Row::Header(&self.header));
        rows.extend(self.details.iter().map(Row::Detail));
        rows.push(Row::Trailer(&self.trailer));
        rows
    }

    pub fn compute_ac_hash_total(&self) -> Result<u64> {
        checksum::compute_ac_hash_total(&self.header, &self.details)
    }

    /// Derives a fresh trailer from the header and details.
    ///
    /// Fails with [`GiroError::Classification`] on the first detail whose
    /// payment type is neither credit nor debit.
    pub fn compute_trailer_values(&self) -> Result<BatchTrailer> {
        let mut trailer = BatchTrailer::default();

        for (index, detail) in self.details.iter().enumerate() {
            let (count, amount) = match PaymentClass::from_code(&detail.payment_type) {
                Some(PaymentClass::Credit) => {
                    (&mut trailer.total_credit_txn, &mut trailer.total_credit_amt)
                }
                Some(PaymentClass::Debit) => {
                    (&mut trailer.total_debit_txn, &mut trailer.total_debit_amt)
                }
                None => {
                    return Err(GiroError::Classification {
                        index,
                        payment_type: detail.payment_type.clone(),
                    })
                }
            };
            *count += 1;
            *amount = amount
                .checked_add(detail.amount_in_cents)
                .ok_or(GiroError::Overflow("trailer amount total"))?;
        }

        trailer.account_hash_total = self.compute_ac_hash_total()?;

        debug!(
            "Computed trailer: {} credits ({} cents), {} debits ({} cents), hash {}",
            trailer.total_credit_txn,
            trailer.total_credit_amt,
            trailer.total_debit_txn,
            trailer.total_debit_amt,
            trailer.account_hash_total
        );

        Ok(trailer)
    }

    /// Replaces the trailer with [`GiroBatch::compute_trailer_values`].
    pub fn set_trailer_values(&mut self) -> Result<()> {
        self.trailer = self.compute_trailer_values()?;
        Ok(())
    }

    /// Recomputes only the trailer's account hash total.
    pub fn set_ac_hash_total(&mut self) -> Result<()> {
        self.trailer.account_hash_total = self.compute_ac_hash_total()?;
        Ok(())
    }

    /// Returns `true` if the stored hash matches a fresh computation.
    pub fn verify_ac_hash_total(&self) -> Result<bool> {
        Ok(self.trailer.account_hash_total == self.compute_ac_hash_total()?)
    }
}

impl Default for GiroBatch {
    fn default() -> Self {
        Self::new()
    }
}
