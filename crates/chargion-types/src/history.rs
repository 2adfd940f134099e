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

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One row of the historical hourly charging dataset.
///
/// Rows arrive pre-cleaned from the data-access layer: the timestamp parsed
/// successfully and `energy_kwh` is non-negative (invalid values are coerced
/// to 0.0 upstream). Duplicate timestamps are not deduplicated; a duplicate
/// simply weights its hour's average.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyLoadRecord {
    /// Start of the metered hour (station-local time)
    pub timestamp: NaiveDateTime,

    /// Energy delivered by the station during that hour (kWh)
    pub energy_kwh: f64,
}

impl HourlyLoadRecord {
    pub fn new(timestamp: NaiveDateTime, energy_kwh: f64) -> Self {
        Self {
            timestamp,
            energy_kwh,
        }
    }
}
