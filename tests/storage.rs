#![forbid(unsafe_code)]
use anyhow::anyhow;
use chrono::NaiveDate;
use dutyrota::{
    JsonStorage, Outcome, ParticipantId, Planner, RosterState, RosterStore, RotaName, Storage,
};
use tempfile::tempdir;

fn pid(raw: i64) -> ParticipantId {
    ParticipantId::new(raw)
}

fn june(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, day).unwrap()
}

#[test]
fn missing_file_loads_an_empty_state() {
    let dir = tempdir().unwrap();
    let storage = JsonStorage::open(dir.path().join("absent.json")).unwrap();
    let state = storage.load().unwrap();
    assert_eq!(state, RosterState::default());
}

#[test]
fn update_commits_and_survives_reopening() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data.json");

    let store = RosterStore::new(JsonStorage::open(&path).unwrap());
    store
        .update(|state| {
            let mut planner = Planner::from_state(std::mem::take(state));
            planner.register(pid(1), "Alice", "🟠");
            planner.register(pid(2), "Bob", "🔵");
            planner.generate(RotaName::Current, 2025, 6);
            *state = planner.into_state();
            Ok(())
        })
        .unwrap();

    // A fresh handle on the same file sees the committed state.
    let reopened = RosterStore::new(JsonStorage::open(&path).unwrap());
    let (people, assigned) = reopened
        .read(|state| (state.participants.len(), state.rota_current.len()))
        .unwrap();
    assert_eq!(people, 2);
    assert_eq!(assigned, 30);
}

#[test]
fn failed_update_is_not_committed() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data.json");
    let store = RosterStore::new(JsonStorage::open(&path).unwrap());

    store
        .update(|state| {
            let mut planner = Planner::from_state(std::mem::take(state));
            planner.register(pid(1), "Alice", "");
            *state = planner.into_state();
            Ok(())
        })
        .unwrap();

    let result: anyhow::Result<()> = store.update(|state| {
        let mut planner = Planner::from_state(std::mem::take(state));
        planner.register(pid(2), "Bob", "");
        *state = planner.into_state();
        Err(anyhow!("boom"))
    });
    assert!(result.is_err());

    let people = store.read(|state| state.participants.len()).unwrap();
    assert_eq!(people, 1, "failed cycle must not be persisted");
}

#[test]
fn pending_exchange_survives_a_restart() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("data.json");

    let token = {
        let store = RosterStore::new(JsonStorage::open(&path).unwrap());
        store
            .update(|state| {
                let mut planner = Planner::from_state(std::mem::take(state));
                planner.register(pid(1), "Alice", "");
                planner.register(pid(2), "Bob", "");
                planner.generate(RotaName::Current, 2025, 6);
                planner.exchange_open(pid(1), RotaName::Current)?;
                planner.exchange_pick_own_date(pid(1), june(1))?;
                planner.exchange_pick_colleague(pid(1), pid(2))?;
                let proposed = planner.exchange_pick_colleague_date(pid(1), june(2))?;
                *state = planner.into_state();
                Ok(proposed.token)
            })
            .unwrap()
    };

    // New process: the colleague's answer still finds the request.
    let store = RosterStore::new(JsonStorage::open(&path).unwrap());
    let resolved = store
        .update(|state| {
            let mut planner = Planner::from_state(std::mem::take(state));
            let resolved = planner.exchange_resolve(pid(1), &token, true)?;
            *state = planner.into_state();
            Ok(resolved)
        })
        .unwrap();

    assert_eq!(resolved.outcome, Outcome::Accepted);
    let swapped = store
        .read(|state| {
            (
                state.rota_current.assignee(june(1)),
                state.rota_current.assignee(june(2)),
            )
        })
        .unwrap();
    assert_eq!(swapped, (Some(pid(2)), Some(pid(1))));
}
