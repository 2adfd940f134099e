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

//! End-to-end conversation flows through the router, the forecast engine
//! and the CSV data-access layer.

use chargion_core::{Clock, ConversationRouter, HistorySource};
use chargion_history::CsvHistorySource;
use chargion_types::{ForecastSource, HourlyLoadRecord, SessionState};
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

struct FixedClock(NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// History whose contents the test can swap out between turns
#[derive(Clone)]
struct SharedHistory(Rc<RefCell<Option<Vec<HourlyLoadRecord>>>>);

impl SharedHistory {
    fn new(records: Vec<HourlyLoadRecord>) -> Self {
        Self(Rc::new(RefCell::new(Some(records))))
    }

    fn replace(&self, records: Vec<HourlyLoadRecord>) {
        *self.0.borrow_mut() = Some(records);
    }
}

impl HistorySource for SharedHistory {
    fn load(&self) -> Option<Vec<HourlyLoadRecord>> {
        self.0.borrow().clone()
    }
}

// Monday used as "today" throughout
fn today() -> NaiveDate {
    let date = NaiveDate::from_ymd_opt(2025, 11, 10).unwrap();
    assert_eq!(date.weekday(), Weekday::Mon);
    date
}

fn record(date: NaiveDate, hour: u32, kwh: f64) -> HourlyLoadRecord {
    HourlyLoadRecord::new(date.and_hms_opt(hour, 0, 0).unwrap(), kwh)
}

/// Tuesday history matching the "load tomorrow" target weekday
fn tuesday_history() -> Vec<HourlyLoadRecord> {
    let tuesday = NaiveDate::from_ymd_opt(2025, 11, 4).unwrap();
    assert_eq!(tuesday.weekday(), Weekday::Tue);
    vec![record(tuesday, 8, 5.0), record(tuesday, 9, 7.0)]
}

#[test]
fn follow_up_replays_stored_forecast_without_recomputation() {
    let history = SharedHistory::new(tuesday_history());
    let router = ConversationRouter::new(history.clone(), FixedClock(today()));
    let mut session = SessionState::new();

    let summary = router.handle("What will be the load tomorrow?", &mut session);
    assert!(summary.contains("144.00 kWh"));
    assert!(summary.contains("weekday_pattern"));

    let stored = session.last_forecast().unwrap().clone();
    assert_eq!(stored.date, today() + Duration::days(1));

    // Mutate the history between turns; the follow-up must not care
    history.replace(vec![record(
        NaiveDate::from_ymd_opt(2025, 11, 4).unwrap(),
        8,
        999.0,
    )]);

    let breakdown = router.handle("show hourly forecast", &mut session);
    assert!(breakdown.contains("• 08:00 → 5.00 kWh"));
    assert!(breakdown.contains("• 09:00 → 7.00 kWh"));
    assert!(!breakdown.contains("999"));
    assert_eq!(session.last_forecast().unwrap(), &stored);
}

#[test]
fn rejection_gate_refuses_gibberish_and_stores_nothing() {
    let router = ConversationRouter::new(SharedHistory::new(tuesday_history()), FixedClock(today()));
    let mut session = SessionState::new();

    let reply = router.handle("asdkjaslkd", &mut session);
    assert!(reply.contains("EV load forecasting"));
    assert!(session.last_forecast().is_none());

    // A follow-up detail request still has nothing to show
    let reply = router.handle("show hourly forecast", &mut session);
    assert!(reply.contains("Which date"));
}

#[test]
fn dateless_ev_query_defaults_to_tomorrow() {
    let router = ConversationRouter::new(SharedHistory::new(tuesday_history()), FixedClock(today()));
    let mut session = SessionState::new();

    router.handle("what about the charging station load?", &mut session);
    assert_eq!(session.last_date(), Some(today() + Duration::days(1)));
}

#[test]
fn unseen_weekday_falls_back_to_global_average() {
    // Tuesday-only history, Sunday target
    let router = ConversationRouter::new(SharedHistory::new(tuesday_history()), FixedClock(today()));
    let mut session = SessionState::new();

    let reply = router.handle("load on sunday", &mut session);
    assert!(reply.contains("global_hourly_avg"));
    assert_eq!(
        session.last_forecast().unwrap().source,
        ForecastSource::GlobalHourlyAvg
    );
}

#[test]
fn absent_dataset_never_fabricates_numbers() {
    let history = SharedHistory(Rc::new(RefCell::new(None)));
    let router = ConversationRouter::new(history, FixedClock(today()));
    let mut session = SessionState::new();

    let reply = router.handle("load tomorrow", &mut session);
    assert!(reply.contains("historical load data"));
    assert!(!reply.contains("kWh"));
    assert!(session.last_forecast().is_none());
}

#[test]
fn csv_backed_conversation_picks_up_appended_rows() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "timestamp,energy_kwh").unwrap();
    writeln!(file, "2025-11-04 08:00:00,5.0").unwrap();
    file.flush().unwrap();

    let router = ConversationRouter::new(
        CsvHistorySource::new(file.path()),
        FixedClock(today()),
    );
    let mut session = SessionState::new();

    router.handle("load tomorrow", &mut session);
    let first_total = session.last_forecast().unwrap().total_kwh;
    assert!((first_total - 120.0).abs() < 1e-9);

    // New rows land on disk between turns and the next forecast sees them
    let mut handle = std::fs::OpenOptions::new()
        .append(true)
        .open(file.path())
        .unwrap();
    writeln!(handle, "2025-11-04 09:00:00,7.0").unwrap();
    handle.flush().unwrap();

    router.handle("load tomorrow", &mut session);
    let second_total = session.last_forecast().unwrap().total_kwh;
    assert!((second_total - 144.0).abs() < 1e-9);
}

#[test]
fn meta_questions_are_answered_before_the_rejection_gate() {
    let router = ConversationRouter::new(SharedHistory::new(Vec::new()), FixedClock(today()));
    let mut session = SessionState::new();

    assert!(router.handle("hello", &mut session).contains("Hello"));
    assert!(router.handle("who are you", &mut session).contains("Assistant"));
    assert!(router.handle("what can you do", &mut session).contains("Predict load"));
    assert!(router.handle("how do you work", &mut session).contains("weekday"));
}
