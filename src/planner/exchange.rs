use super::types::{ExchangeProposed, ExchangeResolved, Outcome, PlanError};
use crate::model::{ExchangeRequest, ExchangeStage, ParticipantId, RosterState, RotaName};
use chrono::NaiveDate;
use uuid::Uuid;

/// Open the flow: drop any unresolved session or request by this initiator
/// and start selecting one of their own duty days.
pub(super) fn open(
    state: &mut RosterState,
    initiator: ParticipantId,
    rota: RotaName,
) -> Result<Vec<NaiveDate>, PlanError> {
    if state.find_participant(initiator).is_none() {
        return Err(PlanError::UnknownParticipant(initiator));
    }
    state.exchanges.remove(&initiator);
    state
        .sessions
        .insert(initiator, ExchangeStage::SelectingOwnDate { rota });
    Ok(state.rota(rota).dates_for(initiator))
}

/// Initiator picks one of their own assigned dates. On a date they do not
/// hold, the selection is rejected and the session does not advance.
pub(super) fn pick_own_date(
    state: &mut RosterState,
    initiator: ParticipantId,
    date: NaiveDate,
) -> Result<Vec<ParticipantId>, PlanError> {
    let rota = match state.sessions.get(&initiator) {
        Some(ExchangeStage::SelectingOwnDate { rota }) => *rota,
        Some(_) => return Err(PlanError::WrongStep { expected: "own date" }),
        None => return Err(PlanError::NoSession(initiator)),
    };

    if state.rota(rota).assignee(date) != Some(initiator) {
        return Err(PlanError::NotYourDate(date));
    }

    state.sessions.insert(
        initiator,
        ExchangeStage::SelectingColleague { rota, source: date },
    );
    Ok(state.rota(rota).colleagues_of(initiator))
}

/// Initiator picks the colleague to swap with; the colleague must hold at
/// least one assignment in the same rota.
pub(super) fn pick_colleague(
    state: &mut RosterState,
    initiator: ParticipantId,
    colleague: ParticipantId,
) -> Result<Vec<NaiveDate>, PlanError> {
    let (rota, source) = match state.sessions.get(&initiator) {
        Some(ExchangeStage::SelectingColleague { rota, source }) => (*rota, *source),
        Some(_) => return Err(PlanError::WrongStep { expected: "colleague" }),
        None => return Err(PlanError::NoSession(initiator)),
    };

    if colleague == initiator {
        return Err(PlanError::SelfExchange);
    }
    if state.find_participant(colleague).is_none() {
        return Err(PlanError::UnknownParticipant(colleague));
    }
    let dates = state.rota(rota).dates_for(colleague);
    if dates.is_empty() {
        return Err(PlanError::NoDuties(colleague));
    }

    state.sessions.insert(
        initiator,
        ExchangeStage::SelectingColleagueDate {
            rota,
            source,
            colleague,
        },
    );
    Ok(dates)
}

/// Initiator picks the colleague's date, completing the proposal. The
/// request is stored keyed by initiator; an unresolved prior request is
/// superseded, its token becoming stale.
pub(super) fn pick_colleague_date(
    state: &mut RosterState,
    initiator: ParticipantId,
    date: NaiveDate,
) -> Result<ExchangeProposed, PlanError> {
    let (rota, source, colleague) = match state.sessions.get(&initiator) {
        Some(ExchangeStage::SelectingColleagueDate {
            rota,
            source,
            colleague,
        }) => (*rota, *source, *colleague),
        Some(_) => {
            return Err(PlanError::WrongStep {
                expected: "colleague date",
            })
        }
        None => return Err(PlanError::NoSession(initiator)),
    };

    if state.rota(rota).assignee(date) != Some(colleague) {
        return Err(PlanError::NotColleagueDate { date, colleague });
    }

    let token = Uuid::new_v4().to_string();
    state.exchanges.insert(
        initiator,
        ExchangeRequest {
            token: token.clone(),
            rota,
            source,
            colleague,
            target: date,
        },
    );
    state.sessions.remove(&initiator);

    Ok(ExchangeProposed {
        initiator,
        colleague,
        rota,
        source,
        target: date,
        token,
    })
}

/// Resolve the pending request identified by (initiator, token).
///
/// Acceptance re-validates both rota entries before swapping: if either
/// date changed hands since the proposal (e.g. a regeneration ran in
/// between), the request resolves as [`Outcome::OutOfDate`] and the rota is
/// untouched. The swap itself is a single in-memory mutation, persisted by
/// one store save, so both entries move together or not at all.
pub(super) fn resolve(
    state: &mut RosterState,
    initiator: ParticipantId,
    token: &str,
    accepted: bool,
) -> Result<ExchangeResolved, PlanError> {
    match state.exchanges.get(&initiator) {
        Some(req) if req.token == token => {}
        // Stale buttons for a superseded request must not consume the
        // currently pending one.
        _ => return Err(PlanError::RequestNotFound),
    }
    let req = state
        .exchanges
        .remove(&initiator)
        .ok_or(PlanError::RequestNotFound)?;

    let mut resolved = ExchangeResolved {
        initiator,
        colleague: req.colleague,
        rota: req.rota,
        source: req.source,
        target: req.target,
        outcome: Outcome::Declined,
    };

    if !accepted {
        return Ok(resolved);
    }

    let rota = state.rota(req.rota);
    let still_valid = rota.assignee(req.source) == Some(initiator)
        && rota.assignee(req.target) == Some(req.colleague);
    if !still_valid {
        resolved.outcome = Outcome::OutOfDate;
        return Ok(resolved);
    }

    let rota = state.rota_mut(req.rota);
    rota.assign(req.source, req.colleague);
    rota.assign(req.target, initiator);
    resolved.outcome = Outcome::Accepted;
    Ok(resolved)
}

/// Explicit cancellation: forget the session and any pending request,
/// without touching the rota.
pub(super) fn cancel(state: &mut RosterState, initiator: ParticipantId) {
    state.sessions.remove(&initiator);
    state.exchanges.remove(&initiator);
}
