mod exchange;
mod generate;
mod types;
mod util;

pub use generate::generate_rota;
pub use types::{ExchangeProposed, ExchangeResolved, Outcome, PlanError, RotaRegenerated};
pub use util::{month_dates, next_month};

use crate::model::{
    NoticeTime, Participant, ParticipantId, RosterState, RotaName, VacationPeriod,
};
use chrono::NaiveDate;

/// Planner: every mutation of the roster state goes through here.
///
/// Load the state, wrap it, call one operation, persist the result — the
/// read-modify-write cycle belongs to the caller (see `storage::RosterStore`).
#[derive(Debug, Default)]
pub struct Planner {
    state: RosterState,
}

impl Planner {
    pub fn new() -> Self {
        Self {
            state: RosterState::default(),
        }
    }

    pub fn from_state(state: RosterState) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &RosterState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut RosterState {
        &mut self.state
    }

    pub fn into_state(self) -> RosterState {
        self.state
    }

    /// Register or update a participant. A re-registration refreshes name
    /// and emoji but keeps vacations, notice time and rotation position.
    pub fn register<N: Into<String>, E: Into<String>>(
        &mut self,
        id: ParticipantId,
        name: N,
        emoji: E,
    ) {
        match self.state.find_participant_mut(id) {
            Some(existing) => {
                existing.name = name.into();
                existing.emoji = emoji.into();
            }
            None => self
                .state
                .participants
                .push(Participant::new(id, name, emoji)),
        }
    }

    /// Append a vacation period. Saved periods are never edited or removed.
    pub fn add_vacation(
        &mut self,
        id: ParticipantId,
        period: VacationPeriod,
    ) -> Result<(), PlanError> {
        let participant = self
            .state
            .find_participant_mut(id)
            .ok_or(PlanError::UnknownParticipant(id))?;
        participant.vacations.push(period);
        Ok(())
    }

    /// Override the participant's reminder notice time.
    pub fn set_notice(&mut self, id: ParticipantId, notice: NoticeTime) -> Result<(), PlanError> {
        let participant = self
            .state
            .find_participant_mut(id)
            .ok_or(PlanError::UnknownParticipant(id))?;
        participant.notice = Some(notice);
        Ok(())
    }

    /// Regenerate the named rota for the given month, replacing it wholesale.
    /// Reminder registrations must be re-derived afterwards.
    pub fn generate(&mut self, name: RotaName, year: i32, month: u32) -> RotaRegenerated {
        let rota = generate_rota(year, month, &self.state.participants);
        *self.state.rota_mut(name) = rota.clone();
        RotaRegenerated { name, rota }
    }

    pub fn exchange_open(
        &mut self,
        initiator: ParticipantId,
        rota: RotaName,
    ) -> Result<Vec<NaiveDate>, PlanError> {
        exchange::open(&mut self.state, initiator, rota)
    }

    pub fn exchange_pick_own_date(
        &mut self,
        initiator: ParticipantId,
        date: NaiveDate,
    ) -> Result<Vec<ParticipantId>, PlanError> {
        exchange::pick_own_date(&mut self.state, initiator, date)
    }

    pub fn exchange_pick_colleague(
        &mut self,
        initiator: ParticipantId,
        colleague: ParticipantId,
    ) -> Result<Vec<NaiveDate>, PlanError> {
        exchange::pick_colleague(&mut self.state, initiator, colleague)
    }

    pub fn exchange_pick_colleague_date(
        &mut self,
        initiator: ParticipantId,
        date: NaiveDate,
    ) -> Result<ExchangeProposed, PlanError> {
        exchange::pick_colleague_date(&mut self.state, initiator, date)
    }

    pub fn exchange_resolve(
        &mut self,
        initiator: ParticipantId,
        token: &str,
        accepted: bool,
    ) -> Result<ExchangeResolved, PlanError> {
        exchange::resolve(&mut self.state, initiator, token, accepted)
    }

    pub fn exchange_cancel(&mut self, initiator: ParticipantId) {
        exchange::cancel(&mut self.state, initiator);
    }
}
