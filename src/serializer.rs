//! Batch-level encoding and decoding.
//!
//! A batch file is ASCII text: the header row, every detail row, then the
//! trailer row, separated by CRLF. There is no separator after the trailer.

use crate::batch::GiroBatch;
use crate::error::{GiroError, Result};
use crate::record::{FixedWidthRecord, RECORD_WIDTH};
use crate::records::{BatchHeader, BatchTrailer, DetailRecord};
use log::{debug, warn};
use std::io::{Read, Write};

/// Separator between rows.
pub const ROW_SEPARATOR: &[u8] = b"\r\n";

/// Default limit on detail rows per batch.
pub const MAX_TRANSACTIONS: usize = 5000;

/// Knobs for [`encode_with`] and [`decode_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerializerConfig {
    /// Largest number of detail rows accepted on encode.
    pub max_transactions: usize,
    /// Fail decoding when the stored hash does not match. When off, a
    /// mismatch is only logged.
    pub verify_hash: bool,
}

impl SerializerConfig {
    pub fn with_max_transactions(mut self, max_transactions: usize) -> Self {
        self.max_transactions = max_transactions;
        self
    }

    pub fn with_verify_hash(mut self, verify_hash: bool) -> Self {
        self.verify_hash = verify_hash;
        self
    }
}

impl Default for SerializerConfig {
    fn default() -> Self {
        SerializerConfig {
            max_transactions: MAX_TRANSACTIONS,
            verify_hash: true,
        }
    }
}

/// Encodes a batch with the default configuration.
///
/// The trailer's account hash total is refreshed first; the other trailer
/// totals are written as they are.
pub fn encode(batch: &mut GiroBatch) -> Result<Vec<u8>> {
    encode_with(batch, &SerializerConfig::default())
}

pub fn encode_with(batch: &mut GiroBatch, config: &SerializerConfig) -> Result<Vec<u8>> {
    batch.set_ac_hash_total()?;

    if batch.details.len() > config.max_transactions {
        return Err(GiroError::Capacity {
            count: batch.details.len(),
            max: config.max_transactions,
        });
    }

    let rows = batch.to_rows();
    let mut out = Vec::with_capacity(rows.len() * (RECORD_WIDTH + ROW_SEPARATOR.len()));
    for (index, row) in rows.iter().enumerate() {
        let line = row.to_record()?;
        if !line.is_ascii() {
            return Err(GiroError::Structure(format!(
                "row {} contains non-ASCII characters",
                index + 1
            )));
        }
        if index > 0 {
            out.extend_from_slice(ROW_SEPARATOR);
        }
        out.extend_from_slice(line.as_bytes());
    }

    debug!(
        "Encoded batch {} with {} details ({} bytes)",
        batch.header.batch_id,
        batch.details.len(),
        out.len()
    );
    Ok(out)
}

/// Decodes a batch, failing on a hash mismatch.
pub fn decode(bytes: &[u8]) -> Result<GiroBatch> {
    decode_with(bytes, &SerializerConfig::default())
}

/// Decodes a batch.
///
/// The first row is the header, the last the trailer and everything in
/// between a detail. Field patterns are not checked on this path.
pub fn decode_with(bytes: &[u8], config: &SerializerConfig) -> Result<GiroBatch> {
    let rows = split_rows(bytes);
    if rows.len() < 3 {
        return Err(GiroError::Structure(format!(
            "expected at least 3 rows, found {}",
            rows.len()
        )));
    }

    let mut lines = Vec::with_capacity(rows.len());
    for (index, row) in rows.iter().enumerate() {
        if !row.is_ascii() {
            return Err(GiroError::Structure(format!(
                "row {} contains non-ASCII bytes",
                index + 1
            )));
        }
        let line = std::str::from_utf8(row)
            .map_err(|e| GiroError::Structure(format!("row {}: {}", index + 1, e)))?;
        lines.push(line);
    }

    let (first, rest) = lines
        .split_first()
        .ok_or_else(|| GiroError::Structure("missing header row".to_string()))?;
    let (last, middle) = rest
        .split_last()
        .ok_or_else(|| GiroError::Structure("missing trailer row".to_string()))?;

    let header = BatchHeader::from_record(first)?;
    let trailer = BatchTrailer::from_record(last)?;
    let details = middle
        .iter()
        .map(|line| DetailRecord::from_record(line))
        .collect::<Result<Vec<_>>>()?;

    let batch = GiroBatch::from_parts(header, details, Some(trailer));

    let computed = batch.compute_ac_hash_total()?;
    let stored = batch.trailer.account_hash_total;
    if stored != computed {
        if config.verify_hash {
            return Err(GiroError::HashMismatch { stored, computed });
        }
        warn!(
            "Account hash total mismatch in batch {}: stored {}, computed {}",
            batch.header.batch_id, stored, computed
        );
    }

    debug!(
        "Decoded batch {} with {} details",
        batch.header.batch_id,
        batch.details.len()
    );
    Ok(batch)
}

/// Writes an encoded batch to `writer`, returning the number of bytes written.
pub fn dump<W: Write>(batch: &mut GiroBatch, mut writer: W) -> Result<usize> {
    let bytes = encode(batch)?;
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(bytes.len())
}

/// Reads `reader` to the end and decodes it.
pub fn load<R: Read>(mut reader: R) -> Result<GiroBatch> {
    load_with(&mut reader, &SerializerConfig::default())
}

pub fn load_with<R: Read>(mut reader: R, config: &SerializerConfig) -> Result<GiroBatch> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    decode_with(&bytes, config)
}

fn split_rows(bytes: &[u8]) -> Vec<&[u8]> {
    let mut rows = Vec::new();
    let mut start = 0;
    let mut i = 0;
    while i + ROW_SEPARATOR.len() <= bytes.len() {
        if &bytes[i..i + ROW_SEPARATOR.len()] == ROW_SEPARATOR {
            rows.push(&bytes[start..i]);
            i += ROW_SEPARATOR.len();
            start = i;
        } else {
            i += 1;
        }
    }
    rows.push(&bytes[start..]);
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn scenario_batch() -> GiroBatch {
        let header = BatchHeader {
            creation_datetime: NaiveDate::from_ymd_opt(2017, 8, 14)
                .unwrap()
                .and_hms_opt(10, 0, 0),
            sender_company_id: "ABCDEFGH".to_string(),
            value_date: NaiveDate::from_ymd_opt(2017, 8, 15),
            originating_account: "0150250208".to_string(),
            originating_name: "SUNMICRO FA PTE LTD".to_string(),
            batch_id: 1,
            batch_reference: String::new(),
        };
        let detail = DetailRecord {
            payment_type: "20".to_string(),
            beneficiary_reference: "giro test".to_string(),
            receiving_bank_bic: "DBSSSGSGXXX".to_string(),
            receiving_account: "198904163".to_string(),
            receiving_account_name: "Terence Tan Wei Jie".to_string(),
            purpose_code: "SALA".to_string(),
            amount_in_cents: 1,
            ..Default::default()
        };
        let mut batch = GiroBatch::from_parts(header, vec![detail], None);
        batch.set_trailer_values().unwrap();
        batch
    }

    #[test]
    fn test_split_rows() {
        assert_eq!(split_rows(b"a\r\nb\r\nc"), vec![&b"a"[..], &b"b"[..], &b"c"[..]]);
        assert_eq!(split_rows(b"a\nb\rc"), vec![&b"a\nb\rc"[..]]);
        assert_eq!(split_rows(b"a\r\n"), vec![&b"a"[..], &b""[..]]);
        assert_eq!(split_rows(b""), vec![&b""[..]]);
    }

    #[test]
    fn test_scenario_trailer_values() {
        let batch = scenario_batch();
        assert_eq!(batch.trailer.total_credit_txn, 1);
        assert_eq!(batch.trailer.total_credit_amt, 1);
        assert_eq!(batch.trailer.total_debit_txn, 0);
        assert_eq!(batch.trailer.total_debit_amt, 0);
    }

    #[test]
    fn test_encode_layout() {
        let mut batch = scenario_batch();
        let bytes = encode(&mut batch).unwrap();

        assert_eq!(bytes.len(), 3 * RECORD_WIDTH + 2 * ROW_SEPARATOR.len());
        assert_eq!(&bytes[RECORD_WIDTH..RECORD_WIDTH + 2], b"\r\n");
        assert!(!bytes.ends_with(b"\r\n"));
        for row in split_rows(&bytes) {
            assert_eq!(row.len(), RECORD_WIDTH);
        }
    }

    #[test]
    fn test_round_trip_reproduces_batch() {
        let mut batch = scenario_batch();
        let bytes = encode(&mut batch).unwrap();
        let decoded = decode(&bytes).unwrap();
        assert_eq!(decoded, batch);
    }

    #[test]
    fn test_encode_refreshes_stale_hash() {
        let mut batch = scenario_batch();
        batch.trailer.account_hash_total = 1;
        let bytes = encode(&mut batch).unwrap();

        assert_eq!(batch.trailer.account_hash_total, 18_387_914_220);
        assert!(decode(&bytes).is_ok());
    }

    #[test]
    fn test_capacity_limit() {
        let mut batch = scenario_batch();
        let detail = batch.details[0].clone();
        batch.details = vec![detail; 3];

        let tight = SerializerConfig::default().with_max_transactions(2);
        assert!(matches!(
            encode_with(&mut batch, &tight),
            Err(GiroError::Capacity { count: 3, max: 2 })
        ));

        let exact = SerializerConfig::default().with_max_transactions(3);
        assert!(encode_with(&mut batch, &exact).is_ok());
    }

    #[test]
    fn test_non_ascii_text_fails_encoding() {
        let mut batch = scenario_batch();
        batch.details[0].payment_details = "caf\u{e9}".to_string();
        assert!(matches!(encode(&mut batch), Err(GiroError::Structure(_))));
    }

    #[test]
    fn test_two_rows_is_structure_error() {
        let mut batch = scenario_batch();
        let bytes = encode(&mut batch).unwrap();
        let two_rows = &bytes[RECORD_WIDTH + 2..];
        assert!(matches!(decode(two_rows), Err(GiroError::Structure(_))));
    }

    #[test]
    fn test_non_ascii_bytes_fail_decoding() {
        let mut batch = scenario_batch();
        let mut bytes = encode(&mut batch).unwrap();
        bytes[RECORD_WIDTH + 2 + 500] = 0xE9;
        assert!(matches!(decode(&bytes), Err(GiroError::Structure(_))));
    }

    #[test]
    fn test_hash_mismatch_fails_when_verifying() {
        let mut batch = scenario_batch();
        let bytes = encode(&mut batch).unwrap();
        let tampered = tamper_hash(&bytes);

        match decode(&tampered) {
            Err(GiroError::HashMismatch { stored, computed }) => {
                assert_eq!(stored, 11_111_111_111);
                assert_eq!(computed, 18_387_914_220);
            }
            other => panic!("Expected HashMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_hash_mismatch_tolerated_without_verification() {
        let mut batch = scenario_batch();
        let bytes = encode(&mut batch).unwrap();
        let tampered = tamper_hash(&bytes);

        let config = SerializerConfig::default().with_verify_hash(false);
        let decoded = decode_with(&tampered, &config).unwrap();
        assert_eq!(decoded.trailer.account_hash_total, 11_111_111_111);
        assert!(!decoded.verify_ac_hash_total().unwrap());
    }

    #[test]
    fn test_dump_and_load() {
        let mut batch = scenario_batch();
        let mut buffer = Vec::new();
        let written = dump(&mut batch, &mut buffer).unwrap();

        assert_eq!(written, buffer.len());
        assert_eq!(load(buffer.as_slice()).unwrap(), batch);
    }

    fn tamper_hash(bytes: &[u8]) -> Vec<u8> {
        let mut tampered = bytes.to_vec();
        let trailer_start = tampered.len() - RECORD_WIDTH;
        tampered[trailer_start + 84..trailer_start + 95].copy_from_slice(b"11111111111");
        tampered
    }
}
