//! Distribution Tree Generator
//!
//! Reads an `address,amount` CSV, builds the Merkle commitment tree over
//! the valid rows, prints the published root, and writes the serialized
//! tree artifact for later proof generation.

use std::env;
use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use merkle_distributor::{dump, DistributionTree, Record, TreeArtifact};

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let mut args = env::args().skip(1);
    let input = PathBuf::from(
        args.next()
            .unwrap_or_else(|| "distribution/distribution.csv".to_string()),
    );
    let output = PathBuf::from(
        args.next()
            .unwrap_or_else(|| "distribution/tree.json".to_string()),
    );

    let raw = fs::read_to_string(&input)
        .with_context(|| format!("failed to read {}", input.display()))?;

    let (records, total) = parse_rows(&raw);
    let rejected = total - records.len();
    println!("Number of rows: {}", total);
    if rejected > 0 {
        println!("Rejected {} of {} rows", rejected, total);
    }
    println!("Number of valid records: {}", records.len());

    let tree = DistributionTree::build(records).context("failed to build tree")?;
    println!("Merkle root: 0x{}", hex::encode(tree.root()));

    write_artifact(&dump(&tree), &output)?;
    println!("Tree written to {}", output.display());

    Ok(())
}

/// Parse CSV rows into validated records. Malformed rows are logged and
/// skipped, never fatal; returns the valid records and the total row count.
fn parse_rows(raw: &str) -> (Vec<Record>, usize) {
    let mut records = Vec::new();
    let mut total = 0usize;

    for line in raw.lines() {
        // tolerate CRLF input and trailing blank rows
        let line = line.trim_end_matches('\r').trim();
        if line.is_empty() {
            continue;
        }
        total += 1;

        let (address, amount) = match line.split_once(',') {
            Some(columns) => columns,
            None => {
                log::warn!("row {}: missing amount column", total);
                continue;
            }
        };
        match Record::parse(address.trim(), amount.trim()) {
            Ok(record) => records.push(record),
            Err(e) => log::warn!("row {}: {}", total, e),
        }
    }

    (records, total)
}

/// Write the artifact to a sibling temp file and atomically swap it into
/// place, so concurrent readers never observe a partial document.
fn write_artifact(artifact: &TreeArtifact, output: &PathBuf) -> Result<()> {
    let json = serde_json::to_string_pretty(artifact).context("failed to serialize artifact")?;

    let tmp = output.with_extension("json.tmp");
    fs::write(&tmp, json).with_context(|| format!("failed to write {}", tmp.display()))?;
    fs::rename(&tmp, output)
        .with_context(|| format!("failed to replace {}", output.display()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_rows_are_excluded_without_affecting_root() {
        let clean = "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa1,100\n\
                     0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb2,200\n";
        let dirty = "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa1,100\r\n\
                     0xccccccccccccccccccccccccccccccccccccccc3,not-a-number\r\n\
                     ,300\r\n\
                     0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb2,200\r\n\
                     \r\n";

        let (clean_records, clean_total) = parse_rows(clean);
        let (dirty_records, dirty_total) = parse_rows(dirty);

        assert_eq!(clean_total, 2);
        assert_eq!(dirty_total, 4);
        assert_eq!(dirty_records.len(), 2);
        assert_eq!(clean_records, dirty_records);

        let clean_root = DistributionTree::build(clean_records).unwrap().root();
        let dirty_root = DistributionTree::build(dirty_records).unwrap().root();
        assert_eq!(clean_root, dirty_root);
    }

    #[test]
    fn test_rows_without_amount_column_are_skipped() {
        let (records, total) = parse_rows("0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa1\n");
        assert_eq!(total, 1);
        assert!(records.is_empty());
    }
}
