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

use crate::forecast::ForecastResult;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Conversation memory for a single active session.
///
/// Holds the most recently computed forecast so follow-up questions
/// ("show hourly breakdown") can be answered without recomputation. One
/// instance per conversation; the caller persists it between `handle`
/// calls. Not shared across concurrent conversations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionState {
    last_date: Option<NaiveDate>,
    last_forecast: Option<ForecastResult>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Date of the last forecast, if one has been computed this session
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.last_date
    }

    /// The last computed forecast.
    ///
    /// This is the machine-readable accessor for consumers that need the
    /// numbers (e.g. to draw a chart); reply strings are display-only.
    pub fn last_forecast(&self) -> Option<&ForecastResult> {
        self.last_forecast.as_ref()
    }

    /// Store a freshly computed forecast, overwriting any prior one
    pub fn remember(&mut self, date: NaiveDate, forecast: ForecastResult) {
        self.last_date = Some(date);
        self.last_forecast = Some(forecast);
    }

    /// Drop all remembered state (session reset)
    pub fn clear(&mut self) {
        self.last_date = None;
        self.last_forecast = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forecast::{ForecastResult, ForecastSource};

    fn forecast_for(date: NaiveDate) -> ForecastResult {
        ForecastResult {
            date,
            hourly: Vec::new(),
            total_kwh: 0.0,
            source: ForecastSource::NoData,
        }
    }

    #[test]
    fn test_remember_overwrites_previous() {
        let mut session = SessionState::new();
        assert!(session.last_date().is_none());

        let first = NaiveDate::from_ymd_opt(2025, 11, 10).unwrap();
        let second = NaiveDate::from_ymd_opt(2025, 11, 11).unwrap();

        session.remember(first, forecast_for(first));
        session.remember(second, forecast_for(second));

        assert_eq!(session.last_date(), Some(second));
        assert_eq!(session.last_forecast().unwrap().date, second);
    }

    #[test]
    fn test_clear_resets_memory() {
        let mut session = SessionState::new();
        let date = NaiveDate::from_ymd_opt(2025, 11, 10).unwrap();
        session.remember(date, forecast_for(date));

        session.clear();
        assert!(session.last_date().is_none());
        assert!(session.last_forecast().is_none());
    }
}
