use crate::model::{ParticipantId, Rota, RotaName};
use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlanError {
    #[error("unknown participant: {0}")]
    UnknownParticipant(ParticipantId),
    #[error("no exchange in progress for participant {0}")]
    NoSession(ParticipantId),
    #[error("wrong exchange step: expected {expected}")]
    WrongStep { expected: &'static str },
    #[error("{0} is not one of your duty days")]
    NotYourDate(NaiveDate),
    #[error("participant {0} holds no duties in this rota")]
    NoDuties(ParticipantId),
    #[error("{date} is not assigned to participant {colleague}")]
    NotColleagueDate {
        date: NaiveDate,
        colleague: ParticipantId,
    },
    #[error("cannot exchange a duty with yourself")]
    SelfExchange,
    #[error("exchange request not found")]
    RequestNotFound,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Emitted after a stored rota has been replaced wholesale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RotaRegenerated {
    pub name: RotaName,
    pub rota: Rota,
}

/// Emitted once an initiator's proposal is complete and the colleague must
/// be asked to accept or reject it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeProposed {
    pub initiator: ParticipantId,
    pub colleague: ParticipantId,
    pub rota: RotaName,
    pub source: NaiveDate,
    pub target: NaiveDate,
    pub token: String,
}

/// How a pending exchange request ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Colleague accepted and both rota entries were swapped.
    Accepted,
    /// Colleague declined; the rota is untouched.
    Declined,
    /// The rota changed between proposal and confirmation; resolved as a
    /// rejection, the rota is untouched.
    OutOfDate,
}

/// Emitted when a pending exchange request is resolved either way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeResolved {
    pub initiator: ParticipantId,
    pub colleague: ParticipantId,
    pub rota: RotaName,
    pub source: NaiveDate,
    pub target: NaiveDate,
    pub outcome: Outcome,
}

impl ExchangeResolved {
    pub fn accepted(&self) -> bool {
        self.outcome == Outcome::Accepted
    }
}
