use super::util;
use crate::model::{Participant, Rota};

/// Build the month's rota by round-robin over `participants` in slice order.
///
/// One shared cursor runs across the whole month: each date scans forward
/// from the cursor, advancing it once per participant examined whether or
/// not that participant was assignable. The scan stops at the first
/// participant available on the date; if a full cycle finds nobody, the
/// date stays unassigned and the cursor has still moved by the participant
/// count. Absences therefore shift the rotation instead of restarting it.
///
/// Pure: identical inputs give identical rotas.
pub fn generate_rota(year: i32, month: u32, participants: &[Participant]) -> Rota {
    let mut rota = Rota::default();
    if participants.is_empty() {
        return rota;
    }

    let mut cursor = 0usize;
    for date in util::month_dates(year, month) {
        for _ in 0..participants.len() {
            let candidate = &participants[cursor % participants.len()];
            cursor += 1;
            if candidate.is_available(date) {
                rota.assign(date, candidate.id);
                break;
            }
        }
    }
    rota
}
