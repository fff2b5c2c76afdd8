//! Integration tests for streaks, jokers and recovery working together.
//!
//! Each scenario replays a user's history through the public API the way a
//! nightly job would: recompute the status, spend or allocate jokers, and
//! recompute again with the covered days.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use hearth_core::joker::{
    allocate_monthly_jokers, get_best_joker_to_use, grant_golden_joker, use_joker, JokerConfig,
    JokerInventory, JokerType,
};
use hearth_core::streak::{
    attempt_streak_recovery, calculate_household_streak, calculate_streak_status,
    calculate_streak_status_with_jokers, detect_streak_break, merge_daily_activities,
    ActivityThreshold, DailyActivity, HouseholdStreakPolicy, MemberActivity, StreakConfig,
    TaskCompletion,
};
use hearth_core::EngineError;

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, d).unwrap()
}

fn at(d: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, d, hour, 0, 0).unwrap()
}

fn active(user: &str, d: u32) -> DailyActivity {
    DailyActivity::new(user, day(d), 3, 1, 4.5, &ActivityThreshold::default())
}

fn history(user: &str, days: impl IntoIterator<Item = u32>) -> Vec<DailyActivity> {
    days.into_iter().map(|d| active(user, d)).collect()
}

#[test]
fn seven_day_run_ending_today() {
    let status = calculate_streak_status("ava", &history("ava", 1..=7), day(7)).unwrap();
    assert_eq!(status.current_streak, 7);
    assert!(status.is_active_today);
    assert!(!status.risk_of_break);

    // An inactive day two days ago cuts the run to the last two days
    let mut with_gap = history("ava", 1..=7);
    with_gap[4] = DailyActivity::inactive("ava", day(5));
    let status = calculate_streak_status("ava", &with_gap, day(7)).unwrap();
    assert_eq!(status.current_streak, 2);
    assert_eq!(status.longest_streak, 4);
    assert_eq!(status.streak_start_date, Some(day(6)));
}

#[test]
fn two_day_gap_without_joker_restarts_the_streak() {
    let mut activities = history("ava", 1..=10);
    activities.push(active("ava", 13));

    let status = calculate_streak_status("ava", &activities, day(13)).unwrap();
    assert_eq!(status.current_streak, 1);
    assert_eq!(status.longest_streak, 10);
}

#[test]
fn joker_on_first_missed_day_carries_the_streak_into_the_next_day() {
    let config = JokerConfig::default();
    let activities = history("ava", 1..=10);

    let inventory =
        allocate_monthly_jokers(&JokerInventory::new("ava"), false, at(1, 8), &config).inventory;

    // Evening of day 11: nothing done, the streak is at risk
    let day11 = calculate_streak_status("ava", &activities, day(11)).unwrap();
    assert_eq!(day11.current_streak, 10);
    assert!(day11.risk_of_break);

    let used = use_joker(&inventory, &day11, at(11, 22));
    assert!(used.success);
    assert_eq!(used.streak_preserved, 10);

    // Day 12, still nothing done: the bridged day keeps the run alive
    let covered = used.inventory.covered_dates();
    let day12 = calculate_streak_status_with_jokers("ava", &activities, &covered, day(12)).unwrap();
    assert_eq!(day12.current_streak, 10);
    assert!(day12.risk_of_break);

    // Second joker on day 12, then activity on day 13 extends the run
    let used_again = use_joker(&used.inventory, &day12, at(12, 22));
    assert!(used_again.success);

    let mut with_day13 = activities.clone();
    with_day13.push(active("ava", 13));
    let day13 = calculate_streak_status_with_jokers(
        "ava",
        &with_day13,
        &used_again.inventory.covered_dates(),
        day(13),
    )
    .unwrap();
    assert_eq!(day13.current_streak, 11);
    assert_eq!(day13.longest_streak, 11);
    assert_eq!(day13.streak_start_date, Some(day(1)));
}

#[test]
fn use_joker_refuses_when_already_active_today() {
    let config = JokerConfig::default();
    let inventory =
        allocate_monthly_jokers(&JokerInventory::new("ava"), true, at(1, 8), &config).inventory;
    let status = calculate_streak_status("ava", &history("ava", 1..=5), day(5)).unwrap();

    let outcome = use_joker(&inventory, &status, at(5, 21));
    assert!(!outcome.success);
    assert_eq!(outcome.inventory, inventory);
}

#[test]
fn golden_joker_is_kept_for_last() {
    let config = JokerConfig::default();
    let activities = history("ava", 1..=30);
    let status = calculate_streak_status("ava", &activities, day(30)).unwrap();

    let inventory =
        allocate_monthly_jokers(&JokerInventory::new("ava"), false, at(1, 8), &config).inventory;
    let golden =
        grant_golden_joker(&inventory, 29, 30, status.streak_start_date, at(30, 20), &config);
    assert!(golden.awarded);

    let best = get_best_joker_to_use(&golden.inventory, 30, at(30, 20)).unwrap();
    assert_eq!(best.joker_type, JokerType::Standard);

    // Replaying the same milestone does not award a second golden joker
    let replay = grant_golden_joker(
        &golden.inventory,
        29,
        30,
        status.streak_start_date,
        at(30, 21),
        &config,
    );
    assert!(!replay.awarded);
    assert_eq!(replay.inventory.count_by_type(JokerType::Golden), 1);
}

#[test]
fn break_then_recover_with_a_joker() {
    let config = StreakConfig::default();
    let joker_config = JokerConfig::default();
    let activities = history("ava", 1..=6);

    let before = calculate_streak_status("ava", &activities, day(6)).unwrap();
    let after = calculate_streak_status("ava", &activities, day(8)).unwrap();
    let brk = detect_streak_break(&before, &after, &config).unwrap();
    assert_eq!(brk.lost_streak, 6);
    assert_eq!(brk.missed_dates, vec![day(7)]);

    let inventory = allocate_monthly_jokers(
        &JokerInventory::new("ava"),
        false,
        at(1, 8),
        &joker_config,
    )
    .inventory;
    let today = active("ava", 8);
    let recovery = attempt_streak_recovery(&brk, &inventory, Some(&today), at(8, 18), &config);
    assert!(recovery.success);
    assert_eq!(recovery.restored_streak, 7);

    // The recomputed status agrees with the recovery
    let mut healed = activities.clone();
    healed.push(today);
    let status = calculate_streak_status_with_jokers(
        "ava",
        &healed,
        &recovery.inventory.covered_dates(),
        day(8),
    )
    .unwrap();
    assert_eq!(status.current_streak, 7);
}

#[test]
fn completions_roll_up_into_merged_days() {
    let threshold = ActivityThreshold::default();
    let completions = vec![
        TaskCompletion {
            task_id: "dishes".to_string(),
            completed_at: at(2, 9),
            weight: 1.0,
            is_critical: false,
        },
        TaskCompletion {
            task_id: "trash".to_string(),
            completed_at: at(2, 19),
            weight: 2.0,
            is_critical: true,
        },
    ];
    let morning = DailyActivity::summarize("ava", day(2), &completions[..1], &threshold);
    let evening = DailyActivity::summarize("ava", day(2), &completions[1..], &threshold);

    // Two rows for the same day are caller misuse until merged
    let raw = vec![active("ava", 1), morning, evening];
    assert!(matches!(
        calculate_streak_status("ava", &raw, day(2)),
        Err(EngineError::DuplicateActivityDay { .. })
    ));

    let merged = merge_daily_activities(&raw, &threshold);
    assert_eq!(merged.len(), 2);
    assert_eq!(merged[1].tasks_completed, 2);
    assert_eq!(merged[1].critical_tasks, 1);

    let status = calculate_streak_status("ava", &merged, day(2)).unwrap();
    assert_eq!(status.current_streak, 2);
}

#[test]
fn household_streak_reports_members_individually() {
    let members = vec![
        MemberActivity {
            user_id: "ava".to_string(),
            activities: history("ava", 1..=10),
            covered_dates: Vec::new(),
        },
        MemberActivity {
            user_id: "ben".to_string(),
            activities: history("ben", 7..=10),
            covered_dates: Vec::new(),
        },
        MemberActivity {
            user_id: "kid".to_string(),
            activities: Vec::new(),
            covered_dates: Vec::new(),
        },
    ];

    let all = calculate_household_streak(
        "h1",
        &members,
        day(10),
        HouseholdStreakPolicy::AllActive,
    )
    .unwrap();
    assert_eq!(all.household_streak, 4);
    assert_eq!(all.active_members, 2);
    assert!(all.all_active_today);
    assert_eq!(all.members.len(), 3);

    let any = calculate_household_streak(
        "h1",
        &members,
        day(10),
        HouseholdStreakPolicy::AnyActive,
    )
    .unwrap();
    assert_eq!(any.household_streak, 10);

    let avg = calculate_household_streak(
        "h1",
        &members,
        day(10),
        HouseholdStreakPolicy::Average,
    )
    .unwrap();
    assert_eq!(avg.household_streak, 7);
}
