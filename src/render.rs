use crate::model::{RosterState, RotaName};

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

pub fn month_name(month: u32) -> &'static str {
    MONTHS
        .get(month.saturating_sub(1) as usize)
        .copied()
        .unwrap_or("?")
}

/// Month view of a rota: one line per assigned day, unassigned days are
/// simply absent.
pub fn format_rota(state: &RosterState, name: RotaName, year: i32, month: u32) -> String {
    let mut lines = vec![format!("Duty rota for {} {year}", month_name(month))];
    lines.push(String::new());
    for (date, participant) in state.rota(name).iter() {
        let (emoji, display) = state
            .find_participant(participant)
            .map(|p| (p.emoji.as_str(), p.name.as_str()))
            .unwrap_or(("", "?"));
        lines.push(format!(
            "{}, {}: {} {}",
            date.format("%A"),
            date.format("%d.%m"),
            emoji,
            display
        ));
    }
    lines.join("\n")
}
