//! Preference gating: master switch, per-kind toggles and quiet hours.

use chrono::NaiveTime;

use tasksms::preferences::{NotificationKind, SmsPreferences, Suppressed};

fn at(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap_or(NaiveTime::MIN)
}

fn enabled() -> SmsPreferences {
    SmsPreferences {
        enabled: true,
        ..SmsPreferences::default()
    }
}

#[test]
fn disabled_by_default() {
    let prefs = SmsPreferences::default();
    assert_eq!(
        prefs.check(NotificationKind::TaskReminder, at(12, 0)),
        Err(Suppressed::Disabled)
    );
}

#[test]
fn default_kinds_allow_only_reminders_and_text() {
    let prefs = enabled();
    assert_eq!(prefs.check(NotificationKind::TaskReminder, at(12, 0)), Ok(()));
    assert_eq!(prefs.check(NotificationKind::Text, at(12, 0)), Ok(()));
    assert_eq!(
        prefs.check(NotificationKind::DailySummary, at(12, 0)),
        Err(Suppressed::KindDisabled(NotificationKind::DailySummary))
    );
    assert_eq!(
        prefs.check(NotificationKind::AiInsights, at(12, 0)),
        Err(Suppressed::KindDisabled(NotificationKind::AiInsights))
    );
}

#[test]
fn quiet_hours_hold_back_every_kind() {
    let mut prefs = enabled();
    prefs.kinds.daily_summary = true;
    for kind in [
        NotificationKind::TaskReminder,
        NotificationKind::DailySummary,
        NotificationKind::Text,
    ] {
        assert_eq!(prefs.check(kind, at(23, 15)), Err(Suppressed::QuietHours));
        assert_eq!(prefs.check(kind, at(7, 59)), Err(Suppressed::QuietHours));
        assert_eq!(prefs.check(kind, at(8, 0)), Ok(()));
    }
}

#[test]
fn single_digit_minutes_compare_as_times() {
    let prefs = enabled();
    // 09:05 sorts before 22:00 as a time even though "9:5" > "22:00" as text.
    assert_eq!(prefs.check(NotificationKind::TaskReminder, at(9, 5)), Ok(()));
}

#[test]
fn suppression_reasons_read_well() {
    assert_eq!(
        Suppressed::KindDisabled(NotificationKind::AiInsights).to_string(),
        "ai_insights notifications are disabled"
    );
    assert_eq!(Suppressed::QuietHours.to_string(), "inside quiet hours");
}
