#![forbid(unsafe_code)]
use chrono::NaiveDate;
use dutyrota::{generate_rota, month_dates, Participant, ParticipantId, VacationPeriod};

fn pid(raw: i64) -> ParticipantId {
    ParticipantId::new(raw)
}

fn person(raw: i64, name: &str) -> Participant {
    Participant::new(pid(raw), name, "")
}

fn june(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, day).unwrap()
}

fn vacation(from: NaiveDate, to: NaiveDate) -> VacationPeriod {
    VacationPeriod::new(from, to).unwrap()
}

#[test]
fn round_robin_cycles_in_registration_order() {
    let people = vec![person(1, "Alice"), person(2, "Bob"), person(3, "Carol")];
    let rota = generate_rota(2025, 6, &people);

    assert_eq!(rota.len(), 30);
    for (index, day) in (1..=30).enumerate() {
        let expected = pid((index as i64 % 3) + 1);
        assert_eq!(rota.assignee(june(day)), Some(expected), "day {day}");
    }
}

#[test]
fn fully_absent_participant_is_never_assigned() {
    let mut bob = person(2, "Bob");
    bob.vacations.push(vacation(june(1), june(30)));
    let people = vec![person(1, "Alice"), bob, person(3, "Carol")];

    let rota = generate_rota(2025, 6, &people);
    assert!(rota.dates_for(pid(2)).is_empty());
    // The two remaining participants cover every day between them.
    assert_eq!(rota.len(), 30);
}

#[test]
fn generation_is_deterministic() {
    let mut alice = person(1, "Alice");
    alice.vacations.push(vacation(june(10), june(12)));
    let people = vec![alice, person(2, "Bob"), person(3, "Carol")];

    let first = generate_rota(2025, 6, &people);
    let second = generate_rota(2025, 6, &people);
    assert_eq!(first, second);
}

#[test]
fn absence_shifts_rotation_without_restarting_it() {
    let mut alice = person(1, "Alice");
    alice.vacations.push(vacation(june(1), june(1)));
    let people = vec![alice, person(2, "Bob")];

    let rota = generate_rota(2025, 6, &people);
    // Day 1 examines Alice (absent) then Bob; the cursor has moved past
    // both, so day 2 wraps back to Alice and the alternation continues
    // shifted rather than restarted.
    assert_eq!(rota.assignee(june(1)), Some(pid(2)));
    assert_eq!(rota.assignee(june(2)), Some(pid(1)));
    assert_eq!(rota.assignee(june(3)), Some(pid(2)));
    assert_eq!(rota.assignee(june(4)), Some(pid(1)));
}

#[test]
fn day_with_nobody_available_stays_unassigned() {
    let mut alice = person(1, "Alice");
    alice.vacations.push(vacation(june(5), june(5)));
    let mut bob = person(2, "Bob");
    bob.vacations.push(vacation(june(5), june(5)));
    let people = vec![alice, bob];

    let rota = generate_rota(2025, 6, &people);
    assert_eq!(rota.assignee(june(5)), None);
    assert_eq!(rota.len(), 29);
    // The exhausted scan advanced the cursor by the participant count, so
    // day 6 continues where day 4 left off.
    assert_eq!(rota.assignee(june(4)), Some(pid(2)));
    assert_eq!(rota.assignee(june(6)), Some(pid(1)));
}

#[test]
fn zero_participants_gives_empty_rota() {
    let rota = generate_rota(2025, 6, &[]);
    assert!(rota.is_empty());
}

#[test]
fn single_participant_takes_every_day() {
    let people = vec![person(7, "Solo")];
    let rota = generate_rota(2025, 6, &people);
    assert_eq!(rota.len(), 30);
    assert!(rota.iter().all(|(_, p)| p == pid(7)));
}

#[test]
fn month_dates_cover_the_month_exactly() {
    let days = month_dates(2025, 6);
    assert_eq!(days.len(), 30);
    assert_eq!(days[0], june(1));
    assert_eq!(days[29], june(30));

    assert_eq!(month_dates(2024, 2).len(), 29);
    assert!(month_dates(2025, 13).is_empty());
}

#[test]
fn next_month_carries_the_year() {
    assert_eq!(dutyrota::next_month(2025, 6), (2025, 7));
    assert_eq!(dutyrota::next_month(2025, 12), (2026, 1));
}
