#![forbid(unsafe_code)]
use chrono::{NaiveDate, NaiveDateTime};
use dutyrota::{
    NoticeTime, ParticipantId, Planner, ReminderScheduler, ReminderSet, RotaName, VacationPeriod,
};

const ALICE: i64 = 1;
const BOB: i64 = 2;

fn pid(raw: i64) -> ParticipantId {
    ParticipantId::new(raw)
}

fn june(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, day).unwrap()
}

fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    june(day).and_hms_opt(hour, minute, 0).unwrap()
}

fn default_notice() -> NoticeTime {
    NoticeTime::default()
}

/// Alice (default notice) on odd days, Bob (21:30) on even days.
fn planner_with_rota() -> Planner {
    let mut planner = Planner::new();
    planner.register(pid(ALICE), "Alice", "");
    planner.register(pid(BOB), "Bob", "");
    planner
        .set_notice(pid(BOB), NoticeTime::new(21, 30).unwrap())
        .unwrap();
    planner.generate(RotaName::Current, 2025, 6);
    planner
}

#[test]
fn one_job_per_assigned_date() {
    let planner = planner_with_rota();
    let set = ReminderSet::derive(planner.state(), RotaName::Current, default_notice());

    assert_eq!(set.len(), 30);
    let mut dates: Vec<NaiveDate> = set.iter().map(|job| job.date).collect();
    dates.dedup();
    assert_eq!(dates.len(), 30, "duplicate registration for a date");
}

#[test]
fn notice_time_uses_the_participant_override() {
    let planner = planner_with_rota();
    let set = ReminderSet::derive(planner.state(), RotaName::Current, default_notice());

    let alice_job = set.iter().find(|job| job.date == june(1)).unwrap();
    assert_eq!(alice_job.participant, pid(ALICE));
    assert_eq!(alice_job.notice, default_notice());

    let bob_job = set.iter().find(|job| job.date == june(2)).unwrap();
    assert_eq!(bob_job.participant, pid(BOB));
    assert_eq!(bob_job.notice, NoticeTime::new(21, 30).unwrap());
}

#[test]
fn job_fires_only_on_the_evening_before_its_date() {
    let planner = planner_with_rota();
    let set = ReminderSet::derive(planner.state(), RotaName::Current, default_notice());

    // June 3 is Alice's; her reminder fires June 2 at 20:00.
    let due = set.due(at(2, 20, 0));
    assert_eq!(due.len(), 1);
    assert_eq!(due[0].participant, pid(ALICE));
    assert_eq!(due[0].date, june(3));

    // Bob's June 4 duty reminds at his 21:30 on June 3.
    let due = set.due(at(3, 21, 30));
    assert_eq!(due.len(), 1);
    assert_eq!(due[0].participant, pid(BOB));
    assert_eq!(due[0].date, june(4));

    // Any other minute of the daily check is a silent no-op.
    assert!(set.due(at(2, 20, 1)).is_empty());
    assert!(set.due(at(2, 21, 30)).is_empty());
    assert!(set.due(at(3, 20, 0)).is_empty());
}

#[test]
fn unassigned_day_has_no_registration() {
    let mut planner = Planner::new();
    planner.register(pid(ALICE), "Alice", "");
    planner.register(pid(BOB), "Bob", "");
    for id in [ALICE, BOB] {
        planner
            .add_vacation(pid(id), VacationPeriod::new(june(5), june(5)).unwrap())
            .unwrap();
    }
    planner.generate(RotaName::Current, 2025, 6);

    let set = ReminderSet::derive(planner.state(), RotaName::Current, default_notice());
    assert_eq!(set.len(), 29);
    assert!(set.iter().all(|job| job.date != june(5)));
    assert!(set.due(at(4, 20, 0)).is_empty());
    assert!(set.due(at(4, 21, 30)).is_empty());
}

#[test]
fn rebuild_after_a_swap_leaves_no_stale_registration() {
    let mut planner = planner_with_rota();
    let scheduler = ReminderScheduler::new();
    scheduler.rebuild(ReminderSet::derive(
        planner.state(),
        RotaName::Current,
        default_notice(),
    ));
    assert_eq!(scheduler.job_count(), 30);

    // Swap June 1 (Alice) with June 2 (Bob).
    planner.exchange_open(pid(ALICE), RotaName::Current).unwrap();
    planner.exchange_pick_own_date(pid(ALICE), june(1)).unwrap();
    planner.exchange_pick_colleague(pid(ALICE), pid(BOB)).unwrap();
    let token = planner
        .exchange_pick_colleague_date(pid(ALICE), june(2))
        .unwrap()
        .token;
    planner.exchange_resolve(pid(ALICE), &token, true).unwrap();

    let rebuilt = ReminderSet::derive(planner.state(), RotaName::Current, default_notice());
    scheduler.rebuild(rebuilt);
    assert_eq!(scheduler.job_count(), 30);

    // May 31 evening: June 1 now belongs to Bob, who reminds at 21:30.
    let eve = NaiveDate::from_ymd_opt(2025, 5, 31)
        .unwrap()
        .and_hms_opt(21, 30, 0)
        .unwrap();
    let due = scheduler.due(eve);
    assert_eq!(due.len(), 1);
    assert_eq!(due[0].participant, pid(BOB));
    assert_eq!(due[0].date, june(1));

    // Alice's old 20:00 registration for June 1 is gone.
    let old = NaiveDate::from_ymd_opt(2025, 5, 31)
        .unwrap()
        .and_hms_opt(20, 0, 0)
        .unwrap();
    assert!(scheduler.due(old).is_empty());

    // June 1 evening: June 2 is Alice's now, default notice applies.
    let due = scheduler.due(at(1, 20, 0));
    assert_eq!(due.len(), 1);
    assert_eq!(due[0].participant, pid(ALICE));
    assert_eq!(due[0].date, june(2));
}

#[test]
fn derive_is_a_wholesale_replacement() {
    let mut planner = planner_with_rota();
    let scheduler = ReminderScheduler::new();
    scheduler.rebuild(ReminderSet::derive(
        planner.state(),
        RotaName::Current,
        default_notice(),
    ));
    assert_eq!(scheduler.job_count(), 30);

    // Shrink the month's assignments and rebuild: nothing lingers.
    planner
        .add_vacation(pid(ALICE), VacationPeriod::new(june(1), june(30)).unwrap())
        .unwrap();
    planner
        .add_vacation(pid(BOB), VacationPeriod::new(june(1), june(30)).unwrap())
        .unwrap();
    planner.generate(RotaName::Current, 2025, 6);

    scheduler.rebuild(ReminderSet::derive(
        planner.state(),
        RotaName::Current,
        default_notice(),
    ));
    assert_eq!(scheduler.job_count(), 0);
}
