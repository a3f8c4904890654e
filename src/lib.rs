#![forbid(unsafe_code)]
//! Dutyrota — monthly on-call duty planning, local and file-backed (no DB).
//!
//! - Round-robin rota generation with per-participant vacation windows.
//! - Two-party duty exchange with confirmation-time re-validation.
//! - Evening-before reminders derived wholesale from the active rota.
//! - Atomic JSON persistence behind a small storage trait.
//!
//! Dates are plain calendar days; reminder times are local wall-clock in
//! the configured timezone, with the clock injected by the caller.

pub mod config;
pub mod io;
pub mod model;
pub mod notification;
pub mod planner;
pub mod reminder;
pub mod render;
pub mod storage;

pub use config::Config;
pub use model::{
    ExchangeRequest, ExchangeStage, NoticeTime, Participant, ParticipantId, RosterState, Rota,
    RotaName, VacationPeriod,
};
pub use notification::{
    decode_choice, encode_choice, proposal_message, Choice, ConsoleNotifier, Notifier,
    ReminderRenderer, TextReminder,
};
pub use planner::{
    generate_rota, month_dates, next_month, ExchangeProposed, ExchangeResolved, Outcome,
    PlanError, Planner, RotaRegenerated,
};
pub use reminder::{ReminderDue, ReminderJob, ReminderScheduler, ReminderSet};
pub use storage::{JsonStorage, RosterStore, Storage};
