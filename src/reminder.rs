use crate::model::{NoticeTime, ParticipantId, RosterState, RotaName};
use crate::notification::{Notifier, ReminderRenderer};
use chrono::{NaiveDate, NaiveDateTime, Timelike};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

/// One derived registration per (date, participant) rota entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReminderJob {
    pub date: NaiveDate,
    pub participant: ParticipantId,
    pub notice: NoticeTime,
}

/// Emitted when a job fires on the evening before its duty date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReminderDue {
    pub participant: ParticipantId,
    pub date: NaiveDate,
}

/// Full set of reminder registrations for one rota.
///
/// Always rebuilt wholesale from the rota; never patched incrementally, so
/// a date that changed hands cannot keep a stale registration behind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReminderSet {
    jobs: BTreeMap<(NaiveDate, ParticipantId), ReminderJob>,
}

impl ReminderSet {
    /// Derive the registrations for `name` from scratch. A participant
    /// without an override gets `default_notice`.
    pub fn derive(state: &RosterState, name: RotaName, default_notice: NoticeTime) -> Self {
        let mut jobs = BTreeMap::new();
        for (date, participant) in state.rota(name).iter() {
            let notice = state
                .find_participant(participant)
                .and_then(|p| p.notice)
                .unwrap_or(default_notice);
            jobs.insert(
                (date, participant),
                ReminderJob {
                    date,
                    participant,
                    notice,
                },
            );
        }
        Self { jobs }
    }

    /// Jobs due at `now`: the notice time matches `now`'s hour and minute
    /// and the duty date is tomorrow. Every other firing is a silent no-op.
    pub fn due(&self, now: NaiveDateTime) -> Vec<ReminderDue> {
        let Some(tomorrow) = now.date().succ_opt() else {
            return Vec::new();
        };
        self.jobs
            .values()
            .filter(|job| {
                job.date == tomorrow
                    && u32::from(job.notice.hour) == now.hour()
                    && u32::from(job.notice.minute) == now.minute()
            })
            .map(|job| ReminderDue {
                participant: job.participant,
                date: job.date,
            })
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ReminderJob> {
        self.jobs.values()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}

/// Registry of reminder jobs shared with the timer thread.
///
/// `rebuild` replaces the whole set under the lock; `due` reads a
/// consistent snapshot, so a firing never observes a half-applied swap.
#[derive(Debug, Clone, Default)]
pub struct ReminderScheduler {
    jobs: Arc<Mutex<ReminderSet>>,
}

impl ReminderScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a freshly derived set, discarding every prior registration.
    pub fn rebuild(&self, set: ReminderSet) {
        let mut guard = self.jobs.lock().unwrap_or_else(|e| e.into_inner());
        *guard = set;
    }

    pub fn due(&self, now: NaiveDateTime) -> Vec<ReminderDue> {
        let guard = self.jobs.lock().unwrap_or_else(|e| e.into_inner());
        guard.due(now)
    }

    pub fn job_count(&self) -> usize {
        let guard = self.jobs.lock().unwrap_or_else(|e| e.into_inner());
        guard.len()
    }

    /// Run the recurring evening-before check on its own thread.
    ///
    /// `now_fn` supplies local wall-clock time in the configured timezone;
    /// the loop evaluates once per minute, aligned on minute boundaries.
    /// Delivery failures are dropped: notification is fire-and-forget.
    pub fn spawn<F>(
        &self,
        notifier: Arc<dyn Notifier + Send + Sync>,
        renderer: Arc<dyn ReminderRenderer + Send + Sync>,
        now_fn: F,
    ) -> thread::JoinHandle<()>
    where
        F: Fn() -> NaiveDateTime + Send + 'static,
    {
        let jobs = Arc::clone(&self.jobs);
        thread::spawn(move || loop {
            let now = now_fn();
            let due = {
                let guard = jobs.lock().unwrap_or_else(|e| e.into_inner());
                guard.due(now)
            };
            for reminder in due {
                let message = renderer.render(&reminder);
                let _ = notifier.notify(reminder.participant, &message, &[]);
            }
            let to_next_minute = 60 - u64::from(now.second()).min(59);
            thread::sleep(Duration::from_secs(to_next_minute.max(1)));
        })
    }
}
