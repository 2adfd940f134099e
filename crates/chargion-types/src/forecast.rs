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

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which historical pattern a forecast was derived from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForecastSource {
    /// Per-hour averages over records sharing the target date's weekday
    WeekdayPattern,
    /// Per-hour averages over all records, used when the target weekday is unseen
    GlobalHourlyAvg,
    /// No historical data at all; the result carries no usable profile
    NoData,
}

impl ForecastSource {
    /// Stable label used in replies and logs
    pub fn label(&self) -> &'static str {
        match self {
            Self::WeekdayPattern => "weekday_pattern",
            Self::GlobalHourlyAvg => "global_hourly_avg",
            Self::NoData => "no_data",
        }
    }
}

impl fmt::Display for ForecastSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Predicted load for a single hour of the forecast day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyPrediction {
    /// Start of the predicted hour (the forecast date at HH:00)
    pub timestamp: NaiveDateTime,

    /// Predicted load for that hour (kWh)
    pub predicted_kwh: f64,
}

/// A full 24-hour load forecast for one calendar date.
///
/// `hourly` covers exactly 00:00 through 23:00 of `date` in hour order,
/// except for `ForecastSource::NoData` results, which carry no predictions
/// and must not be presented as numeric forecasts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    /// Calendar date the forecast covers
    pub date: NaiveDate,

    /// Per-hour predictions, hour-ordered (empty when source is NoData)
    pub hourly: Vec<HourlyPrediction>,

    /// Sum of all hourly predictions (kWh)
    pub total_kwh: f64,

    /// Pattern the predictions were derived from
    pub source: ForecastSource,
}

impl ForecastResult {
    /// Whether this result carries a usable profile
    pub fn has_profile(&self) -> bool {
        self.source != ForecastSource::NoData
    }

    /// The hour with the highest predicted load, if any
    pub fn peak(&self) -> Option<&HourlyPrediction> {
        self.hourly.iter().max_by(|a, b| {
            a.predicted_kwh
                .partial_cmp(&b.predicted_kwh)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
    }
}
