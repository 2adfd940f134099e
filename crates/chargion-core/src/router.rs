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

use crate::date_resolver;
use crate::forecast::ForecastEngine;
use crate::traits::{Clock, HistorySource};
use chargion_types::{ForecastResult, SessionState};
use chrono::{Duration, NaiveDate};
use tracing::{debug, info};

/// Fallback lookahead when an EV-flavored query carries no date:
/// "what's the load?" means tomorrow. Named policy, swappable per deployment.
const DEFAULT_LOOKAHEAD_DAYS: i64 = 1;

/// Greetings match the whole (trimmed, lowercased) input exactly
const GREETING_TOKENS: &[&str] = &["hi", "hello", "hey", "hii", "hola"];

const IDENTITY_PHRASES: &[&str] = &[
    "who are you",
    "what are you",
    "who is this",
    "who am i talking to",
];

const CAPABILITY_PHRASES: &[&str] = &[
    "what can you do",
    "help",
    "capabilities",
    "features",
    "what do you do",
];

const METHODOLOGY_PHRASES: &[&str] = &[
    "how do you work",
    "how are you forecasting",
    "how does this work",
    "explain how you work",
    "how do you predict",
    "how are you predicting",
    "how is prediction made",
];

const DETAIL_PHRASES: &[&str] = &["detailed", "hour-by-hour", "hourly", "show hours"];

/// Keywords marking a query as in-domain. An input matching none of these
/// and carrying no resolvable date is refused instead of forecast.
const DOMAIN_KEYWORDS: &[&str] = &[
    "load", "forecast", "charging", "station", "capacity", "ev", "energy", "peak",
];

const USAGE_PROMPT: &str =
    "Please ask something like: 'Load tomorrow' or 'Load on 15-11-2025'.";

const GREETING_REPLY: &str =
    "Hello! 👋 How can I help you with EV load forecasting today?";

const IDENTITY_REPLY: &str = "I'm an EV Load Forecasting Assistant ⚡\n\n\
    I help operators predict EV charging station load, identify peak hours \
    and understand future demand.";

const CAPABILITY_REPLY: &str = "Here's what I can do! ⚡\n\n\
    • Predict load for any date (e.g., 15-11-2025)\n\
    • Show a detailed hour-by-hour forecast\n\
    • Understand natural language dates (tomorrow, next Monday)\n\
    • Identify peak hours\n\
    • Explain how forecasting works\n\
    • Remember your last forecast for follow-ups";

// Must describe the real algorithm; this reply is the method's documentation.
const METHODOLOGY_REPLY: &str = "Here's how I predict future EV load ⚙️\n\n\
    1. I read past hourly EV load data.\n\
    2. I detect which weekday the requested date falls on.\n\
    3. I average the historical load per hour for that weekday.\n\
    4. If that weekday has no data, I fall back to hourly averages over all \
    days (a rough fallback: it mixes weekend and weekday patterns).\n\
    5. Hours with no observations are filled with the profile's own mean.\n\
    6. I report the total load and the peak hour, and keep the forecast in \
    memory so 'show detailed' gives the full 24-hour breakdown.";

const ASK_FOR_DATE_REPLY: &str = "Which date do you want the detailed forecast for?";

const REJECTION_REPLY: &str = "Sorry! 🙏 I didn't understand that.\n\n\
    I'm designed only for EV load forecasting and charging station insights.\n\
    Try asking things like:\n\
    • 'What will be the load tomorrow?'\n\
    • 'Load on 15-11-2025'\n\
    • 'Peak hours this week'\n\
    • 'Show detailed forecast'";

const NO_DATA_REPLY: &str = "I don't have any historical load data to work \
    from yet, so I can't give you numbers for that date. Please load the \
    hourly dataset first.";

const OPERATIONAL_TIP: &str =
    "💡 Tip: shift flexible charging into low-demand hours and use load balancing during peaks.";

/// What the user is asking for. Variants are checked in declaration order,
/// first match wins; `Rejected` stays last-but-one on purpose so every
/// meta-question is answered before the off-topic gate fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Empty,
    Greeting,
    Identity,
    Capabilities,
    Methodology,
    DetailRequest,
    Rejected,
    Forecast,
}

impl Intent {
    /// Classify a trimmed, lowercased input. `has_date` reports whether the
    /// date resolver found anything, which keeps date-only queries like
    /// "15-11-2025" out of the rejection gate.
    pub fn classify(query: &str, has_date: bool) -> Self {
        if query.is_empty() {
            return Self::Empty;
        }
        if GREETING_TOKENS.contains(&query) {
            return Self::Greeting;
        }
        if contains_any(query, IDENTITY_PHRASES) {
            return Self::Identity;
        }
        if contains_any(query, CAPABILITY_PHRASES) {
            return Self::Capabilities;
        }
        if contains_any(query, METHODOLOGY_PHRASES) {
            return Self::Methodology;
        }
        if contains_any(query, DETAIL_PHRASES) {
            return Self::DetailRequest;
        }
        if !contains_any(query, DOMAIN_KEYWORDS) && !has_date {
            return Self::Rejected;
        }
        Self::Forecast
    }
}

fn contains_any(query: &str, phrases: &[&str]) -> bool {
    phrases.iter().any(|p| query.contains(p))
}

/// Conversational front end over the forecast engine.
///
/// Every input terminates in a reply string; there is no fatal error path.
/// Only the detail-request and forecast intents touch session state.
#[derive(Debug)]
pub struct ConversationRouter<H, C> {
    history: H,
    clock: C,
    engine: ForecastEngine,
}

impl<H: HistorySource, C: Clock> ConversationRouter<H, C> {
    pub fn new(history: H, clock: C) -> Self {
        Self {
            history,
            clock,
            engine: ForecastEngine::new(),
        }
    }

    /// Handle one conversation turn. The caller persists `session` across
    /// calls; one SessionState per active conversation.
    pub fn handle(&self, text: &str, session: &mut SessionState) -> String {
        let query = text.trim().to_lowercase();
        let today = self.clock.today();
        let resolved = date_resolver::resolve(text, today);
        let intent = Intent::classify(&query, resolved.is_some());

        debug!(?intent, resolved_date = ?resolved, "classified input");

        match intent {
            Intent::Empty => USAGE_PROMPT.to_owned(),
            Intent::Greeting => GREETING_REPLY.to_owned(),
            Intent::Identity => IDENTITY_REPLY.to_owned(),
            Intent::Capabilities => CAPABILITY_REPLY.to_owned(),
            Intent::Methodology => METHODOLOGY_REPLY.to_owned(),
            Intent::DetailRequest => detail_reply(session),
            Intent::Rejected => REJECTION_REPLY.to_owned(),
            Intent::Forecast => self.forecast_reply(resolved, today, session),
        }
    }

    fn forecast_reply(
        &self,
        resolved: Option<NaiveDate>,
        today: NaiveDate,
        session: &mut SessionState,
    ) -> String {
        let date = resolved.unwrap_or_else(|| today + Duration::days(DEFAULT_LOOKAHEAD_DAYS));

        // Reload on every forecast request so new rows are picked up;
        // an absent dataset is the same as an empty one
        let history = self.history.load().unwrap_or_default();
        let result = self.engine.forecast(date, &history);

        if !result.has_profile() {
            info!(date = %date, "no historical data, refusing to fabricate a forecast");
            return NO_DATA_REPLY.to_owned();
        }

        info!(
            date = %date,
            source = %result.source,
            total_kwh = result.total_kwh,
            "forecast served"
        );

        let reply = summary_reply(&result);
        session.remember(date, result);
        reply
    }
}

fn detail_reply(session: &SessionState) -> String {
    match session.last_forecast() {
        // Stored result replayed as-is; no recomputation for follow-ups
        Some(forecast) => breakdown_reply(forecast),
        None => ASK_FOR_DATE_REPLY.to_owned(),
    }
}

fn summary_reply(result: &ForecastResult) -> String {
    let mut reply = format!(
        "📅 {} ({})\n🔋 Expected total load: ~{:.2} kWh\n📘 Based on: {} pattern\n",
        result.date.format("%d %b %Y"),
        result.date.format("%A"),
        result.total_kwh,
        result.source,
    );

    if let Some(peak) = result.peak() {
        reply.push_str(&format!(
            "⏰ Peak hour: {} (~{:.2} kWh)\n",
            peak.timestamp.format("%H:%M"),
            peak.predicted_kwh,
        ));
    }

    reply.push('\n');
    reply.push_str(OPERATIONAL_TIP);
    reply
}

fn breakdown_reply(result: &ForecastResult) -> String {
    let mut lines = vec![format!(
        "🕒 Hour-by-hour forecast for {} (source: {}):",
        result.date.format("%d %b %Y"),
        result.source,
    )];
    for prediction in &result.hourly {
        lines.push(format!(
            "• {} → {:.2} kWh",
            prediction.timestamp.format("%H:%M"),
            prediction.predicted_kwh,
        ));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::StaticHistory;
    use chargion_types::{ForecastSource, HourlyLoadRecord};
    use chrono::{Datelike, Weekday};

    struct FixedClock(NaiveDate);

    impl Clock for FixedClock {
        fn today(&self) -> NaiveDate {
            self.0
        }
    }

    // Monday
    fn today() -> NaiveDate {
        let date = NaiveDate::from_ymd_opt(2025, 11, 10).unwrap();
        assert_eq!(date.weekday(), Weekday::Mon);
        date
    }

    fn record(date: NaiveDate, hour: u32, kwh: f64) -> HourlyLoadRecord {
        HourlyLoadRecord::new(date.and_hms_opt(hour, 0, 0).unwrap(), kwh)
    }

    fn monday_history() -> Vec<HourlyLoadRecord> {
        // Monday 2025-11-03
        let monday = NaiveDate::from_ymd_opt(2025, 11, 3).unwrap();
        assert_eq!(monday.weekday(), Weekday::Mon);
        vec![record(monday, 8, 5.0), record(monday, 9, 7.0)]
    }

    fn router() -> ConversationRouter<StaticHistory, FixedClock> {
        ConversationRouter::new(StaticHistory::new(monday_history()), FixedClock(today()))
    }

    #[test]
    fn test_classification_priority_order() {
        assert_eq!(Intent::classify("", false), Intent::Empty);
        assert_eq!(Intent::classify("hello", false), Intent::Greeting);
        assert_eq!(Intent::classify("who are you", false), Intent::Identity);
        assert_eq!(Intent::classify("what can you do", false), Intent::Capabilities);
        assert_eq!(Intent::classify("how do you predict", false), Intent::Methodology);
        assert_eq!(Intent::classify("show hourly forecast", false), Intent::DetailRequest);
        assert_eq!(Intent::classify("asdkjaslkd", false), Intent::Rejected);
        assert_eq!(Intent::classify("load tomorrow", true), Intent::Forecast);
        // A bare date is in-domain even without keywords
        assert_eq!(Intent::classify("15-11-2025", true), Intent::Forecast);
    }

    #[test]
    fn test_greeting_is_exact_match_only() {
        // "hello there" is not a bare greeting; no domain keyword, no date
        assert_eq!(Intent::classify("hello there", false), Intent::Rejected);
    }

    #[test]
    fn test_empty_input_prompts_for_question() {
        let mut session = SessionState::new();
        let reply = router().handle("   ", &mut session);
        assert_eq!(reply, USAGE_PROMPT);
    }

    #[test]
    fn test_rejection_gate_stores_nothing() {
        let mut session = SessionState::new();
        let reply = router().handle("asdkjaslkd", &mut session);
        assert_eq!(reply, REJECTION_REPLY);
        assert!(session.last_date().is_none());
        assert!(session.last_forecast().is_none());
    }

    #[test]
    fn test_forecast_reply_contains_total_source_and_peak() {
        let mut session = SessionState::new();
        // "today" is Monday, matching the Monday-only history
        let reply = router().handle("load today", &mut session);

        assert!(reply.contains("10 Nov 2025 (Monday)"));
        assert!(reply.contains("144.00 kWh"));
        assert!(reply.contains("weekday_pattern"));
        assert!(reply.contains("Peak hour: 09:00 (~7.00 kWh)"));

        let stored = session.last_forecast().unwrap();
        assert_eq!(stored.source, ForecastSource::WeekdayPattern);
        assert_eq!(session.last_date(), Some(today()));
    }

    #[test]
    fn test_dateless_domain_query_defaults_to_tomorrow() {
        let mut session = SessionState::new();
        router().handle("what will the charging load be?", &mut session);
        assert_eq!(session.last_date(), Some(today() + Duration::days(1)));
    }

    #[test]
    fn test_detail_without_memory_asks_for_date() {
        let mut session = SessionState::new();
        let reply = router().handle("show hourly forecast", &mut session);
        assert_eq!(reply, ASK_FOR_DATE_REPLY);
    }

    #[test]
    fn test_detail_after_forecast_renders_24_lines() {
        let mut session = SessionState::new();
        let r = router();
        r.handle("load today", &mut session);
        let reply = r.handle("show hourly forecast", &mut session);

        // Header plus one line per hour
        assert_eq!(reply.lines().count(), 25);
        assert!(reply.contains("• 08:00 → 5.00 kWh"));
        assert!(reply.contains("• 09:00 → 7.00 kWh"));
        assert!(reply.contains("• 23:00 → 6.00 kWh"));
    }

    #[test]
    fn test_missing_dataset_yields_no_data_reply() {
        let mut session = SessionState::new();
        let r = ConversationRouter::new(StaticHistory::missing(), FixedClock(today()));
        let reply = r.handle("load tomorrow", &mut session);

        assert_eq!(reply, NO_DATA_REPLY);
        // A no_data result is not remembered; a follow-up still asks for a date
        assert!(session.last_forecast().is_none());
    }

    #[test]
    fn test_meta_intents_are_side_effect_free() {
        let mut session = SessionState::new();
        let r = router();
        for input in ["hello", "who are you", "help", "how do you work"] {
            r.handle(input, &mut session);
        }
        assert!(session.last_forecast().is_none());
    }

    #[test]
    fn test_methodology_reply_describes_algorithm() {
        let mut session = SessionState::new();
        let reply = router().handle("how do you predict the load?", &mut session);
        assert!(reply.contains("weekday"));
        assert!(reply.contains("fall back"));
    }
}
