use crate::model::ParticipantId;
use crate::planner::ExchangeProposed;
use crate::reminder::ReminderDue;

/// Labeled action offered to a participant; the selection comes back from
/// the transport as an event carrying the same `data` label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub label: String,
    pub data: String,
}

/// Delivery of a rendered message, fire-and-forget. The chat transport
/// implements this; the library ships a console stand-in.
pub trait Notifier {
    fn notify(&self, to: ParticipantId, message: &str, choices: &[Choice]) -> anyhow::Result<()>;
}

/// Prints deliveries to stdout; used by the CLI and in tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, to: ParticipantId, message: &str, choices: &[Choice]) -> anyhow::Result<()> {
        println!("-> {to}: {message}");
        for choice in choices {
            println!("   [{}] {}", choice.label, choice.data);
        }
        Ok(())
    }
}

/// Renders the evening-before duty reminder.
pub trait ReminderRenderer {
    fn render(&self, due: &ReminderDue) -> String;
}

/// Plain-text reminder wording.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextReminder;

impl ReminderRenderer for TextReminder {
    fn render(&self, due: &ReminderDue) -> String {
        format!(
            "Reminder: tomorrow ({}) you are on duty.",
            due.date.format("%d.%m")
        )
    }
}

/// Message and accept/reject choice set sent to the colleague of a freshly
/// completed proposal. `initiator_name` is the display form of the sender.
pub fn proposal_message(initiator_name: &str, proposed: &ExchangeProposed) -> (String, Vec<Choice>) {
    let message = format!(
        "{} proposes a swap: your duty on {} for theirs on {}. Do you accept?",
        initiator_name,
        proposed.target.format("%d.%m"),
        proposed.source.format("%d.%m"),
    );
    let choices = vec![
        Choice {
            label: "Yes".to_string(),
            data: encode_choice(proposed.initiator, &proposed.token, true),
        },
        Choice {
            label: "No".to_string(),
            data: encode_choice(proposed.initiator, &proposed.token, false),
        },
    ];
    (message, choices)
}

/// Opaque choice label carried through the transport and back.
pub fn encode_choice(initiator: ParticipantId, token: &str, accepted: bool) -> String {
    let verdict = if accepted { "yes" } else { "no" };
    format!("swap:{verdict}:{initiator}:{token}")
}

/// Inverse of [`encode_choice`]; `None` for labels this crate never issued.
pub fn decode_choice(data: &str) -> Option<(ParticipantId, &str, bool)> {
    let rest = data.strip_prefix("swap:")?;
    let (verdict, rest) = rest.split_once(':')?;
    let accepted = match verdict {
        "yes" => true,
        "no" => false,
        _ => return None,
    };
    let (id, token) = rest.split_once(':')?;
    let id: i64 = id.parse().ok()?;
    Some((ParticipantId::new(id), token, accepted))
}
