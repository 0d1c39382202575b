//! Plain-text rendering of timelines and booking choices.

use chrono::NaiveDate;
use slot_engine::{BookingOptions, Interval};
use slot_provider::WeekView;

pub fn week(view: &WeekView) -> String {
    let window = view.window;
    let mut out = format!(
        "Week {} .. {}\n",
        window.start().date(),
        window.end().date()
    );
    for (day_date, timeline) in &view.days {
        out.push('\n');
        out.push_str(&day(*day_date, timeline));
    }
    out.push('\n');
    if let Some((previous, _)) = window.previous_week() {
        out.push_str(&format!("Previous week: --from {}\n", previous.date()));
    }
    out.push_str(&format!("Next week: --from {}\n", window.next_week().date()));
    out
}

pub fn day(date: NaiveDate, timeline: &[Interval]) -> String {
    let mut out = format!("{}\n", date.format("%a %Y-%m-%d"));
    for interval in timeline {
        let state = if interval.is_booked() { "booked" } else { "free" };
        out.push_str(&format!(
            "  {interval}  {state:<6}  {:>4} min\n",
            interval.duration_minutes()
        ));
    }
    out
}

pub fn options(options: &BookingOptions) -> String {
    let starts: Vec<String> = options
        .start_times()
        .iter()
        .map(|t| t.format("%H:%M").to_string())
        .collect();
    let durations: Vec<String> = options.durations().iter().map(|d| d.to_string()).collect();

    format!(
        "Slot {} on {} is available\nStart times: {}\nDurations (min): {}\nEnds at: {}\n",
        options.slot(),
        options.slot().start().date(),
        starts.join(", "),
        durations.join(", "),
        options.end_time().format("%H:%M")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_lists_each_interval() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        let timeline = vec![
            Interval::free(
                date.and_hms_opt(9, 0, 0).unwrap(),
                date.and_hms_opt(9, 30, 0).unwrap(),
            )
            .unwrap(),
            Interval::booked(
                date.and_hms_opt(9, 30, 0).unwrap(),
                date.and_hms_opt(10, 0, 0).unwrap(),
            )
            .unwrap(),
        ];

        let text = day(date, &timeline);

        assert_eq!(
            text,
            "Mon 2026-03-02\n  09:00 - 09:30  free      30 min\n  09:30 - 10:00  booked    30 min\n"
        );
    }

    #[test]
    fn options_list_starts_and_durations() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        let slot = Interval::free(
            date.and_hms_opt(10, 0, 0).unwrap(),
            date.and_hms_opt(10, 30, 0).unwrap(),
        )
        .unwrap();
        let options = BookingOptions::for_slot(&slot).unwrap();

        let text = super::options(&options);

        assert!(text.starts_with("Slot 10:00 - 10:30 on 2026-03-02 is available\n"));
        assert!(text.contains("Start times: 10:00, 10:15\n"));
        assert!(text.contains("Durations (min): 15, 30\n"));
        assert!(text.ends_with("Ends at: 10:30\n"));
    }
}
