use crate::model::{NoticeTime, Participant, ParticipantId, RosterState, RotaName, VacationPeriod};
use anyhow::{bail, Context};
use chrono::NaiveDate;
use csv::{ReaderBuilder, WriterBuilder};
use std::path::Path;

/// Import participants from CSV: header `id,name,emoji[,notice][,vacations]`.
///
/// `notice` is `HH:MM`; `vacations` is a `;`-separated list of inclusive
/// `YYYY-MM-DD/YYYY-MM-DD` ranges (a lone date is a one-day period).
pub fn import_participants_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<Participant>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let id = rec.get(0).context("missing id")?.trim();
        let name = rec.get(1).context("missing name")?.trim();
        let emoji = rec.get(2).context("missing emoji")?.trim();
        if id.is_empty() || name.is_empty() {
            bail!("invalid participant row (empty id or name)");
        }
        let id: i64 = id
            .parse()
            .with_context(|| format!("invalid participant id: {id}"))?;
        let mut participant = Participant::new(ParticipantId::new(id), name, emoji);
        if let Some(notice) = rec.get(3) {
            let notice = notice.trim();
            if !notice.is_empty() {
                participant.notice = Some(
                    NoticeTime::parse(notice)
                        .map_err(anyhow::Error::msg)
                        .with_context(|| format!("invalid notice for id {id}"))?,
                );
            }
        }
        if let Some(ranges) = rec.get(4) {
            let ranges = ranges.trim();
            if !ranges.is_empty() {
                participant.vacations = parse_vacations(ranges)
                    .with_context(|| format!("invalid vacations for id {id}"))?;
            }
        }
        out.push(participant);
    }
    Ok(out)
}

fn parse_vacations(raw: &str) -> anyhow::Result<Vec<VacationPeriod>> {
    raw.split(';')
        .filter(|chunk| !chunk.trim().is_empty())
        .map(|chunk| parse_vacation_chunk(chunk.trim()))
        .collect()
}

fn parse_vacation_chunk(chunk: &str) -> anyhow::Result<VacationPeriod> {
    if let Some((start_raw, end_raw)) = chunk.split_once('/').or_else(|| chunk.split_once("..")) {
        let start = parse_date(start_raw.trim())?;
        let end = parse_date(end_raw.trim())?;
        VacationPeriod::new(start, end).map_err(anyhow::Error::msg)
    } else {
        let day = parse_date(chunk)?;
        VacationPeriod::new(day, day).map_err(anyhow::Error::msg)
    }
}

pub fn parse_date(raw: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").with_context(|| format!("invalid date: {raw}"))
}

/// Export one rota as CSV: header `date,participant_id,name`.
pub fn export_rota_csv<P: AsRef<Path>>(
    path: P,
    state: &RosterState,
    name: RotaName,
) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    w.write_record(["date", "participant_id", "name"])?;
    for (date, participant) in state.rota(name).iter() {
        let display = state
            .find_participant(participant)
            .map(|p| p.name.as_str())
            .unwrap_or("");
        let date = date.format("%Y-%m-%d").to_string();
        let id = participant.as_i64().to_string();
        w.write_record([date.as_str(), id.as_str(), display])?;
    }
    w.flush()?;
    Ok(())
}
