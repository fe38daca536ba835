// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

/// 2024-03-10T15:00:00Z
const NOW: u64 = 1_710_082_800_000;

#[test]
fn success_rate_handles_empty_window() {
    assert_eq!(AgentStats::default().success_rate(), 0.0);
}

#[test]
fn success_rate_is_completed_over_total() {
    let stats = AgentStats { total: 8, completed: 6, failed: 2, ..Default::default() };
    assert!((stats.success_rate() - 0.75).abs() < f64::EPSILON);
}

#[test]
fn day_key_is_utc_date() {
    assert_eq!(day_key(NOW), "2024-03-10");
    assert_eq!(day_key(0), "1970-01-01");
}

#[test]
fn window_keys_end_today_oldest_first() {
    assert_eq!(window_keys(3, NOW), vec!["2024-03-08", "2024-03-09", "2024-03-10"]);
    assert!(window_keys(0, NOW).is_empty());
}

#[test]
fn window_crosses_month_boundary() {
    let keys = window_keys(12, NOW);
    assert_eq!(keys.len(), 12);
    assert_eq!(keys.first().map(String::as_str), Some("2024-02-28"));
}

#[test]
fn normalize_fills_missing_days_and_drops_outside_keys() {
    let sparse = AgentStats {
        total: 3,
        by_day: BTreeMap::from([
            ("2024-03-09".to_string(), 2),
            ("2024-01-01".to_string(), 7),
        ]),
        ..Default::default()
    };
    let stats = sparse.normalize_window(3, NOW);
    assert_eq!(
        stats.by_day,
        BTreeMap::from([
            ("2024-03-08".to_string(), 0),
            ("2024-03-09".to_string(), 2),
            ("2024-03-10".to_string(), 0),
        ])
    );
    assert_eq!(stats.total, 3);
}

#[test]
fn stats_body_is_camel_case() {
    let stats: AgentStats = serde_json::from_str(
        r#"{"total":2,"completed":1,"failed":1,"queued":0,"avgDurationMinutes":12.5,"byDay":{"2024-03-10":2}}"#,
    )
    .unwrap();
    assert_eq!(stats.avg_duration_minutes, 12.5);
    assert_eq!(stats.by_day.get("2024-03-10"), Some(&2));
}
