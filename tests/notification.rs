#![forbid(unsafe_code)]
use chrono::NaiveDate;
use dutyrota::{
    decode_choice, proposal_message, ExchangeProposed, ParticipantId, ReminderDue,
    ReminderRenderer, RotaName, TextReminder,
};

#[test]
fn proposal_choices_carry_the_issued_labels_back() {
    let proposed = ExchangeProposed {
        initiator: ParticipantId::new(1),
        colleague: ParticipantId::new(2),
        rota: RotaName::Current,
        source: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
        target: NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
        token: "tok-123".to_string(),
    };

    let (message, choices) = proposal_message("Alice", &proposed);
    assert!(message.contains("Alice"));
    assert!(message.contains("02.06"));
    assert!(message.contains("01.06"));
    assert_eq!(choices.len(), 2);

    let (initiator, token, accepted) = decode_choice(&choices[0].data).unwrap();
    assert_eq!(initiator, ParticipantId::new(1));
    assert_eq!(token, "tok-123");
    assert!(accepted);

    let (_, _, accepted) = decode_choice(&choices[1].data).unwrap();
    assert!(!accepted);

    assert_eq!(decode_choice("menu:open"), None);
    assert_eq!(decode_choice("swap:maybe:1:tok"), None);
}

#[test]
fn reminder_text_names_tomorrow() {
    let due = ReminderDue {
        participant: ParticipantId::new(2),
        date: NaiveDate::from_ymd_opt(2025, 6, 2).unwrap(),
    };
    let text = TextReminder.render(&due);
    assert_eq!(text, "Reminder: tomorrow (02.06) you are on duty.");
}
