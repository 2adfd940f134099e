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

use chargion_types::HourlyLoadRecord;
use chrono::NaiveDate;

/// Supplier of historical hourly load records.
///
/// `load` is called once per forecast-triggering request, so a file-backed
/// implementation picks up new rows between conversation turns. Returning
/// `None` signals that the backing dataset is absent; the caller treats it
/// the same as an empty history.
pub trait HistorySource {
    fn load(&self) -> Option<Vec<HourlyLoadRecord>>;
}

/// Supplier of the reference date ("today") for relative date expressions
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// Clock backed by the local system time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }
}

/// Fixed in-memory history, mainly for tests and demos
#[derive(Debug, Clone, Default)]
pub struct StaticHistory {
    records: Option<Vec<HourlyLoadRecord>>,
}

impl StaticHistory {
    /// History with the given records
    pub fn new(records: Vec<HourlyLoadRecord>) -> Self {
        Self {
            records: Some(records),
        }
    }

    /// History whose backing dataset is absent
    pub fn missing() -> Self {
        Self { records: None }
    }
}

impl HistorySource for StaticHistory {
    fn load(&self) -> Option<Vec<HourlyLoadRecord>> {
        self.records.clone()
    }
}
