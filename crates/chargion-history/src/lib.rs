// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of ChargION.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

//! Data-access layer for the historical hourly load dataset.
//!
//! Reads `hourly_ev_load.csv`-style files and hands the forecast core a
//! pre-cleaned record sequence: rows with unparseable timestamps are
//! dropped, energy values are coerced to non-negative numbers (invalid or
//! negative → 0.0), and a missing file is reported as an absent dataset
//! rather than an error.

use chargion_core::HistorySource;
use chargion_types::HourlyLoadRecord;
use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Timestamp formats accepted in the dataset, most common first
const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%d-%m-%Y %H:%M",
    "%d/%m/%Y %H:%M",
];

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("malformed CSV in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("missing required column '{0}' (need 'timestamp' and 'energy_kwh')")]
    MissingColumn(&'static str),
}

/// Load the hourly dataset from `path`.
///
/// Returns `Ok(None)` when the file does not exist (absent-dataset signal).
/// Rows whose timestamp fails every accepted format are dropped; energy
/// values that fail to parse, or parse negative, become 0.0.
pub fn load_hourly(path: &Path) -> Result<Option<Vec<HourlyLoadRecord>>, HistoryError> {
    if !path.exists() {
        debug!(path = %path.display(), "hourly dataset not found");
        return Ok(None);
    }

    let mut reader = csv::Reader::from_path(path).map_err(|source| HistoryError::Csv {
        path: path.to_path_buf(),
        source,
    })?;

    let headers = reader
        .headers()
        .map_err(|source| HistoryError::Csv {
            path: path.to_path_buf(),
            source,
        })?
        .clone();
    let timestamp_col = headers
        .iter()
        .position(|h| h.trim() == "timestamp")
        .ok_or(HistoryError::MissingColumn("timestamp"))?;
    let energy_col = headers
        .iter()
        .position(|h| h.trim() == "energy_kwh")
        .ok_or(HistoryError::MissingColumn("energy_kwh"))?;

    let mut records = Vec::new();
    let mut dropped = 0_usize;

    for row in reader.records() {
        let row = row.map_err(|source| HistoryError::Csv {
            path: path.to_path_buf(),
            source,
        })?;

        let Some(timestamp) = row.get(timestamp_col).and_then(parse_timestamp) else {
            dropped += 1;
            continue;
        };

        let energy_kwh = row
            .get(energy_col)
            .and_then(|v| v.trim().parse::<f64>().ok())
            .filter(|v| v.is_finite() && *v >= 0.0)
            .unwrap_or(0.0);

        records.push(HourlyLoadRecord::new(timestamp, energy_kwh));
    }

    if dropped > 0 {
        warn!(
            path = %path.display(),
            dropped,
            "dropped rows with unparseable timestamps"
        );
    }
    debug!(path = %path.display(), rows = records.len(), "hourly dataset loaded");

    Ok(Some(records))
}

fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
}

/// File-backed history source. Re-reads the CSV on every `load` call so
/// rows appended between conversation turns are picked up.
#[derive(Debug, Clone)]
pub struct CsvHistorySource {
    path: PathBuf,
}

impl CsvHistorySource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HistorySource for CsvHistorySource {
    fn load(&self) -> Option<Vec<HourlyLoadRecord>> {
        match load_hourly(&self.path) {
            Ok(records) => records,
            Err(err) => {
                // A broken file is treated like an absent dataset; the
                // router turns that into a user-visible no-data reply
                warn!(path = %self.path.display(), error = %err, "failed to load hourly dataset");
                None
            }
        }
    }
}
