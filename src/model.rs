use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Stable opaque identifier for a participant (chat/account id).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(i64);

impl ParticipantId {
    pub fn new(raw: i64) -> Self {
        Self(raw)
    }
    pub fn as_i64(self) -> i64 {
        self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Local wall-clock time of day at which a reminder should fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoticeTime {
    pub hour: u8,
    pub minute: u8,
}

impl NoticeTime {
    pub fn new(hour: u8, minute: u8) -> Result<Self, String> {
        if hour > 23 || minute > 59 {
            return Err(format!("notice time out of range: {hour:02}:{minute:02}"));
        }
        Ok(Self { hour, minute })
    }

    /// Parse `"HH:MM"`.
    pub fn parse(raw: &str) -> Result<Self, String> {
        let (h, m) = raw
            .trim()
            .split_once(':')
            .ok_or_else(|| format!("expected HH:MM, got {raw:?}"))?;
        let hour: u8 = h.parse().map_err(|_| format!("invalid hour in {raw:?}"))?;
        let minute: u8 = m.parse().map_err(|_| format!("invalid minute in {raw:?}"))?;
        Self::new(hour, minute)
    }
}

impl Default for NoticeTime {
    fn default() -> Self {
        Self { hour: 20, minute: 0 }
    }
}

impl fmt::Display for NoticeTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// Inclusive calendar-date range during which a participant is unavailable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VacationPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl VacationPeriod {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, String> {
        if end < start {
            return Err("vacation end must not precede start".to_string());
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Member of the duty rotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
    pub emoji: String,
    /// `None` means the configured default notice time applies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notice: Option<NoticeTime>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub vacations: Vec<VacationPeriod>,
}

impl Participant {
    pub fn new<N: Into<String>, E: Into<String>>(id: ParticipantId, name: N, emoji: E) -> Self {
        Self {
            id,
            name: name.into(),
            emoji: emoji.into(),
            notice: None,
            vacations: Vec::new(),
        }
    }

    pub fn is_available(&self, date: NaiveDate) -> bool {
        !self.vacations.iter().any(|vac| vac.contains(date))
    }
}

/// Which of the two stored rotas an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RotaName {
    Current,
    Next,
}

impl RotaName {
    pub fn as_str(self) -> &'static str {
        match self {
            RotaName::Current => "current",
            RotaName::Next => "next",
        }
    }
}

impl fmt::Display for RotaName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Date → participant duty assignment for one month.
///
/// A date absent from the map is an unassigned day; that is a valid state,
/// not an error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rota(BTreeMap<NaiveDate, ParticipantId>);

impl Rota {
    pub fn assignee(&self, date: NaiveDate) -> Option<ParticipantId> {
        self.0.get(&date).copied()
    }

    pub fn assign(&mut self, date: NaiveDate, participant: ParticipantId) {
        self.0.insert(date, participant);
    }

    /// Dates assigned to `participant`, ascending.
    pub fn dates_for(&self, participant: ParticipantId) -> Vec<NaiveDate> {
        self.0
            .iter()
            .filter(|(_, p)| **p == participant)
            .map(|(d, _)| *d)
            .collect()
    }

    /// Distinct assignees other than `participant`, in first-appearance order.
    pub fn colleagues_of(&self, participant: ParticipantId) -> Vec<ParticipantId> {
        let mut out = Vec::new();
        for p in self.0.values() {
            if *p != participant && !out.contains(p) {
                out.push(*p);
            }
        }
        out
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, ParticipantId)> + '_ {
        self.0.iter().map(|(d, p)| (*d, *p))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Per-initiator step of the exchange flow (persisted, not closure state).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum ExchangeStage {
    SelectingOwnDate {
        rota: RotaName,
    },
    SelectingColleague {
        rota: RotaName,
        source: NaiveDate,
    },
    SelectingColleagueDate {
        rota: RotaName,
        source: NaiveDate,
        colleague: ParticipantId,
    },
}

/// Complete swap proposal awaiting the colleague's answer.
///
/// Keyed by initiator in [`RosterState::exchanges`]; at most one per
/// initiator, a newer request supersedes an unresolved older one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeRequest {
    /// Random token embedded in the choice labels sent to the colleague,
    /// so answers to a superseded proposal can be told apart.
    pub token: String,
    pub rota: RotaName,
    pub source: NaiveDate,
    pub colleague: ParticipantId,
    pub target: NaiveDate,
}

/// Whole persisted roster: participants, both rotas and in-flight exchanges.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterState {
    /// Registration order is the rotation order; it must stay stable.
    #[serde(default)]
    pub participants: Vec<Participant>,
    #[serde(default)]
    pub rota_current: Rota,
    #[serde(default)]
    pub rota_next: Rota,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub exchanges: BTreeMap<ParticipantId, ExchangeRequest>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub sessions: BTreeMap<ParticipantId, ExchangeStage>,
}

impl RosterState {
    pub fn find_participant(&self, id: ParticipantId) -> Option<&Participant> {
        self.participants.iter().find(|p| p.id == id)
    }

    pub fn find_participant_mut(&mut self, id: ParticipantId) -> Option<&mut Participant> {
        self.participants.iter_mut().find(|p| p.id == id)
    }

    pub fn rota(&self, name: RotaName) -> &Rota {
        match name {
            RotaName::Current => &self.rota_current,
            RotaName::Next => &self.rota_next,
        }
    }

    pub fn rota_mut(&mut self, name: RotaName) -> &mut Rota {
        match name {
            RotaName::Current => &mut self.rota_current,
            RotaName::Next => &mut self.rota_next,
        }
    }
}
