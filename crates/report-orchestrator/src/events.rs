use report_core::{render_template, CalendarInfo, TranscriptLinks, UpcomingEvent};

const AGM_DESCRIPTION_CHARS: usize = 200;

/// Earnings and ex-dividend entries from the provider calendar.
pub fn calendar_events(calendar: &CalendarInfo, company: &str) -> Vec<UpcomingEvent> {
    let mut events: Vec<UpcomingEvent> = calendar
        .earnings_dates
        .iter()
        .map(|date| UpcomingEvent {
            event_type: "Earnings Call".to_string(),
            date: date.format("%Y-%m-%d").to_string(),
            description: format!("{} Quarterly Earnings Report and Conference Call", company),
        })
        .collect();

    if let Some(ex_div) = calendar.ex_dividend_date {
        events.push(UpcomingEvent {
            event_type: "Ex-Dividend Date".to_string(),
            date: ex_div.format("%Y-%m-%d").to_string(),
            description: "Last date to purchase shares to receive upcoming dividend".to_string(),
        });
    }

    events
}

/// Annual General Meeting entry when the research answer mentions one.
pub fn agm_event(answer: &str, year: i32) -> Option<UpcomingEvent> {
    let mentions_agm =
        answer.contains("AGM") || answer.to_lowercase().contains("annual general meeting");
    if !mentions_agm {
        return None;
    }

    let excerpt: String = answer.chars().take(AGM_DESCRIPTION_CHARS).collect();
    Some(UpcomingEvent {
        event_type: "Annual General Meeting".to_string(),
        date: format!("TBA {}", year),
        description: format!("{}...", excerpt),
    })
}

pub fn events_prompt(company: &str, symbol: &str, year: i32) -> String {
    format!(
        "Search for upcoming {} ({}) shareholder meetings, AGM, investor events, product launches, or major announcements scheduled for {}.",
        company, symbol, year
    )
}

pub fn tariff_prompt(company: &str, symbol: &str, year: i32) -> String {
    format!(
        "Search for the latest tariff news and trade restrictions specifically affecting {company} ({symbol}) in {}-{}. Include only news directly related to {company}'s operations, products, or supply chain. Mention specific tariff rates, countries affected, and direct impact on the company.",
        year - 1,
        year
    )
}

/// Earnings-call transcript URLs; no network access.
pub fn transcript_links(templates: &TranscriptLinks, company: &str, symbol: &str) -> TranscriptLinks {
    TranscriptLinks {
        seeking_alpha: render_template(&templates.seeking_alpha, company, symbol),
        fool: render_template(&templates.fool, company, symbol),
        yahoo: render_template(&templates.yahoo, company, symbol),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use report_core::FallbackTables;

    #[test]
    fn test_calendar_events() {
        let calendar = CalendarInfo {
            earnings_dates: vec![
                NaiveDate::from_ymd_opt(2026, 1, 29).unwrap(),
                NaiveDate::from_ymd_opt(2026, 2, 2).unwrap(),
            ],
            ex_dividend_date: NaiveDate::from_ymd_opt(2025, 11, 10),
        };
        let events = calendar_events(&calendar, "Apple Inc.");
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].event_type, "Earnings Call");
        assert_eq!(events[0].date, "2026-01-29");
        assert_eq!(events[0].description, "Apple Inc. Quarterly Earnings Report and Conference Call");
        assert_eq!(events[2].event_type, "Ex-Dividend Date");
    }

    #[test]
    fn test_agm_detection() {
        assert!(agm_event("Apple will hold its AGM in February.", 2026).is_some());
        assert!(agm_event("The Annual General Meeting is expected in March.", 2026).is_some());
        assert!(agm_event("An agm is planned.", 2026).is_none());
        assert!(agm_event("No shareholder events announced.", 2026).is_none());
    }

    #[test]
    fn test_agm_description_is_truncated() {
        let answer = format!("AGM {}", "é".repeat(300));
        let event = agm_event(&answer, 2027).unwrap();
        assert_eq!(event.date, "TBA 2027");
        assert_eq!(event.description.chars().count(), 203);
        assert!(event.description.ends_with("..."));

        let short = agm_event("AGM soon", 2027).unwrap();
        assert_eq!(short.description, "AGM soon...");
    }

    #[test]
    fn test_transcript_links() {
        let links = transcript_links(&FallbackTables::default().transcript_links, "NVIDIA", "NVDA");
        assert_eq!(links.seeking_alpha, "https://seekingalpha.com/symbol/NVDA/earnings/transcripts");
        assert_eq!(links.fool, "https://www.fool.com/earnings-call-transcripts/nvda/");
        assert_eq!(links.yahoo, "https://finance.yahoo.com/quote/NVDA/analysis");
    }
}
