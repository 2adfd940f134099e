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

use chargion_types::{ForecastResult, ForecastSource, HourlyLoadRecord, HourlyPrediction};
use chrono::{Datelike, Duration, NaiveDate, NaiveTime, Timelike};
use tracing::debug;

/// Per-hour mean profile over a subset of the history.
/// Hours with no observations stay `None` and are gap-filled later.
type HourlyProfile = [Option<f64>; 24];

/// Pattern-based load forecaster.
///
/// Derives a 24-hour profile for a target date from per-hour averages of
/// historical records sharing the date's weekday, falling back to per-hour
/// averages over the whole history when that weekday is unseen. Plain
/// arithmetic means, no weighting by recency, no smoothing.
#[derive(Debug, Clone, Default)]
pub struct ForecastEngine;

impl ForecastEngine {
    pub fn new() -> Self {
        Self
    }

    /// Build the forecast for `date`. Pure function of (date, history).
    pub fn forecast(&self, date: NaiveDate, history: &[HourlyLoadRecord]) -> ForecastResult {
        let wd = date.weekday();

        let same_weekday = hourly_means(
            history
                .iter()
                .filter(|r| r.timestamp.weekday() == wd),
        );

        // Fallback averages every weekday together. That conflates weekend
        // and weekday shapes, which is a known accuracy caveat of the
        // method, kept deliberately.
        let (profile, source) = match same_weekday {
            Some(profile) => (profile, ForecastSource::WeekdayPattern),
            None => match hourly_means(history.iter()) {
                Some(profile) => (profile, ForecastSource::GlobalHourlyAvg),
                None => {
                    debug!("no historical records at all, returning no_data result");
                    return ForecastResult {
                        date,
                        hourly: Vec::new(),
                        total_kwh: 0.0,
                        source: ForecastSource::NoData,
                    };
                }
            },
        };

        // Gap-fill absent hours with the profile's own mean, never zero
        let observed: Vec<f64> = profile.iter().flatten().copied().collect();
        let fill = observed.iter().sum::<f64>() / observed.len() as f64;

        let midnight = date.and_time(NaiveTime::MIN);
        let hourly: Vec<HourlyPrediction> = (0..24)
            .map(|hour| HourlyPrediction {
                timestamp: midnight + Duration::hours(hour),
                predicted_kwh: profile[hour as usize].unwrap_or(fill),
            })
            .collect();

        let total_kwh: f64 = hourly.iter().map(|p| p.predicted_kwh).sum();

        debug!(
            date = %date,
            source = %source,
            total_kwh,
            "forecast computed"
        );

        ForecastResult {
            date,
            hourly,
            total_kwh,
            source,
        }
    }
}

/// Per-hour arithmetic means over the given records.
/// Returns `None` when the iterator yields nothing.
fn hourly_means<'a>(records: impl Iterator<Item = &'a HourlyLoadRecord>) -> Option<HourlyProfile> {
    let mut sums = [0.0_f64; 24];
    let mut counts = [0_u32; 24];

    let mut seen = false;
    for record in records {
        let hour = record.timestamp.hour() as usize;
        sums[hour] += record.energy_kwh;
        counts[hour] += 1;
        seen = true;
    }

    if !seen {
        return None;
    }

    let mut profile: HourlyProfile = [None; 24];
    for hour in 0..24 {
        if counts[hour] > 0 {
            profile[hour] = Some(sums[hour] / f64::from(counts[hour]));
        }
    }
    Some(profile)
}
