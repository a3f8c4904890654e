#![forbid(unsafe_code)]
use anyhow::{Context, Result};
use chrono::{Datelike, Local, NaiveDateTime};
use clap::{Parser, Subcommand, ValueEnum};
use dutyrota::{
    io,
    model::{NoticeTime, ParticipantId, RotaName, VacationPeriod},
    notification::{proposal_message, ConsoleNotifier, Notifier, ReminderRenderer, TextReminder},
    planner::{next_month, Outcome, PlanError, Planner},
    reminder::{ReminderScheduler, ReminderSet},
    render,
    storage::{JsonStorage, RosterStore},
    Config,
};
use std::sync::Arc;
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// Minimal duty-rota CLI (no database)
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Enable logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// JSON state file (overrides DUTYROTA_DATA)
    #[arg(long, global = true)]
    data: Option<String>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum RotaArg {
    Current,
    Next,
}

impl From<RotaArg> for RotaName {
    fn from(arg: RotaArg) -> Self {
        match arg {
            RotaArg::Current => RotaName::Current,
            RotaArg::Next => RotaName::Next,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Register a participant (or refresh name/emoji)
    Register {
        #[arg(long)]
        id: i64,
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        emoji: String,
    },

    /// Record a vacation period (inclusive YYYY-MM-DD bounds)
    Vacation {
        #[arg(long)]
        id: i64,
        #[arg(long)]
        from: String,
        #[arg(long)]
        to: String,
    },

    /// Override a participant's reminder time (HH:MM)
    SetNotice {
        #[arg(long)]
        id: i64,
        #[arg(long)]
        time: String,
    },

    /// Regenerate a rota for its month
    Generate {
        #[arg(long, value_enum)]
        rota: RotaArg,
        /// Defaults to this month (current) or the month after (next)
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        month: Option<u32>,
    },

    /// Print a rota month view
    Show {
        #[arg(long, value_enum)]
        rota: RotaArg,
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        month: Option<u32>,
    },

    /// Import participants from a CSV file
    ImportParticipants {
        #[arg(long)]
        csv: String,
    },

    /// Export a rota to CSV
    ExportRota {
        #[arg(long, value_enum)]
        rota: RotaArg,
        #[arg(long)]
        out: String,
    },

    /// Two-party duty exchange flow
    Exchange {
        #[command(subcommand)]
        cmd: ExchangeCmd,
    },

    /// Print reminders due at a given local minute (default: now)
    Due {
        /// "YYYY-MM-DD HH:MM"
        #[arg(long)]
        at: Option<String>,
    },

    /// Run the recurring reminder check until interrupted
    Watch,
}

#[derive(Subcommand, Debug)]
enum ExchangeCmd {
    /// Start an exchange, listing your duty days
    Open {
        #[arg(long)]
        id: i64,
        #[arg(long, value_enum)]
        rota: RotaArg,
    },
    /// Pick one of your own duty days
    Pick {
        #[arg(long)]
        id: i64,
        #[arg(long)]
        date: String,
    },
    /// Pick the colleague to swap with
    With {
        #[arg(long)]
        id: i64,
        #[arg(long)]
        colleague: i64,
    },
    /// Pick the colleague's day; sends them the proposal
    For {
        #[arg(long)]
        id: i64,
        #[arg(long)]
        date: String,
    },
    /// Answer a proposal as the colleague
    Respond {
        /// Initiator of the proposal being answered
        #[arg(long)]
        initiator: i64,
        #[arg(long)]
        token: String,
        /// true to accept, false to decline
        #[arg(long, action = clap::ArgAction::Set)]
        accept: bool,
    },
    /// Abandon the exchange in progress
    Cancel {
        #[arg(long)]
        id: i64,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }
    let mut config = Config::from_env()?;
    if let Some(path) = &cli.data {
        config.data_file = path.into();
    }
    let store = RosterStore::new(JsonStorage::open(&config.data_file)?);
    let notifier = ConsoleNotifier;

    match cli.cmd {
        Commands::Register { id, name, emoji } => {
            with_planner(&store, |p| {
                p.register(ParticipantId::new(id), name.as_str(), emoji.as_str());
                Ok(())
            })?;
            println!("registered participant {id}");
        }
        Commands::Vacation { id, from, to } => {
            // Validate the input fully before touching the store.
            let start = io::parse_date(&from)?;
            let end = io::parse_date(&to)?;
            let period = VacationPeriod::new(start, end).map_err(anyhow::Error::msg)?;
            with_planner(&store, |p| {
                p.add_vacation(ParticipantId::new(id), period)?;
                Ok(())
            })?;
            println!("vacation saved for participant {id}");
        }
        Commands::SetNotice { id, time } => {
            let notice = NoticeTime::parse(&time).map_err(anyhow::Error::msg)?;
            with_planner(&store, |p| {
                p.set_notice(ParticipantId::new(id), notice)?;
                Ok(())
            })?;
            println!("notice time for participant {id} set to {notice}");
        }
        Commands::Generate { rota, year, month } => {
            let name: RotaName = rota.into();
            let (year, month) = resolve_month(name, year, month);
            let event = with_planner(&store, |p| Ok(p.generate(name, year, month)))?;
            println!(
                "rota {} regenerated for {year}-{month:02}: {} of {} days assigned",
                event.name,
                event.rota.len(),
                dutyrota::month_dates(year, month).len()
            );
        }
        Commands::Show { rota, year, month } => {
            let name: RotaName = rota.into();
            let (year, month) = resolve_month(name, year, month);
            let text = store.read(|state| {
                if state.rota(name).is_empty() {
                    "The rota is empty.".to_string()
                } else {
                    render::format_rota(state, name, year, month)
                }
            })?;
            println!("{text}");
        }
        Commands::ImportParticipants { csv } => {
            let imported = io::import_participants_csv(csv)?;
            let count = imported.len();
            with_planner(&store, |p| {
                for participant in imported {
                    let id = participant.id;
                    p.register(id, participant.name.clone(), participant.emoji.clone());
                    if let Some(existing) = p.state_mut().find_participant_mut(id) {
                        existing.notice = participant.notice;
                        existing.vacations = participant.vacations;
                    }
                }
                Ok(())
            })?;
            println!("imported {count} participant(s)");
        }
        Commands::ExportRota { rota, out } => {
            let name: RotaName = rota.into();
            store.read(|state| io::export_rota_csv(&out, state, name))??;
            println!("exported rota {name} to {out}");
        }
        Commands::Exchange { cmd } => run_exchange(&store, &notifier, cmd)?,
        Commands::Due { at } => {
            let now = match at {
                Some(raw) => NaiveDateTime::parse_from_str(&raw, "%Y-%m-%d %H:%M")
                    .with_context(|| format!("invalid --at value: {raw}"))?,
                None => Local::now().naive_local(),
            };
            let due = store.read(|state| {
                ReminderSet::derive(state, RotaName::Current, config.default_notice).due(now)
            })?;
            if due.is_empty() {
                println!("no reminders due at {}", now.format("%Y-%m-%d %H:%M"));
            }
            let renderer = TextReminder;
            for reminder in due {
                notifier.notify(reminder.participant, &renderer.render(&reminder), &[])?;
            }
        }
        Commands::Watch => {
            let scheduler = ReminderScheduler::new();
            let handle = scheduler.spawn(
                Arc::new(ConsoleNotifier),
                Arc::new(TextReminder),
                || Local::now().naive_local(),
            );
            println!("reminder check running (timezone: {})", config.timezone);
            loop {
                let set = store.read(|state| {
                    ReminderSet::derive(state, RotaName::Current, config.default_notice)
                })?;
                scheduler.rebuild(set);
                if handle.is_finished() {
                    anyhow::bail!("reminder thread stopped unexpectedly");
                }
                std::thread::sleep(std::time::Duration::from_secs(60));
            }
        }
    }

    Ok(())
}

fn run_exchange(
    store: &RosterStore<JsonStorage>,
    notifier: &ConsoleNotifier,
    cmd: ExchangeCmd,
) -> Result<()> {
    match cmd {
        ExchangeCmd::Open { id, rota } => {
            let dates =
                with_planner(store, |p| {
                    Ok(p.exchange_open(ParticipantId::new(id), rota.into())?)
                })?;
            if dates.is_empty() {
                println!("you hold no duty days in this rota");
            } else {
                println!("your duty days:");
                for date in dates {
                    println!("  {}", date.format("%d.%m"));
                }
            }
        }
        ExchangeCmd::Pick { id, date } => {
            let date = io::parse_date(&date)?;
            let colleagues = with_planner(store, |p| {
                Ok(p.exchange_pick_own_date(ParticipantId::new(id), date)?)
            })?;
            println!("colleagues with duties:");
            for colleague in colleagues {
                println!("  {colleague}");
            }
        }
        ExchangeCmd::With { id, colleague } => {
            let dates = with_planner(store, |p| {
                Ok(p.exchange_pick_colleague(
                    ParticipantId::new(id),
                    ParticipantId::new(colleague),
                )?)
            })?;
            println!("their duty days:");
            for date in dates {
                println!("  {}", date.format("%d.%m"));
            }
        }
        ExchangeCmd::For { id, date } => {
            let date = io::parse_date(&date)?;
            let (proposed, initiator_name) = with_planner(store, |p| {
                let proposed = p.exchange_pick_colleague_date(ParticipantId::new(id), date)?;
                let name = p
                    .state()
                    .find_participant(proposed.initiator)
                    .map(|part| part.name.clone())
                    .unwrap_or_else(|| proposed.initiator.to_string());
                Ok((proposed, name))
            })?;
            let (message, choices) = proposal_message(&initiator_name, &proposed);
            notifier.notify(proposed.colleague, &message, &choices)?;
            notifier.notify(proposed.initiator, "Request sent to your colleague.", &[])?;
            println!("proposal token: {}", proposed.token);
        }
        ExchangeCmd::Respond {
            initiator,
            token,
            accept,
        } => {
            let initiator = ParticipantId::new(initiator);
            let resolved = store.update(|state| {
                let mut planner = Planner::from_state(std::mem::take(state));
                let out = planner.exchange_resolve(initiator, &token, accept);
                *state = planner.into_state();
                match out {
                    Ok(resolved) => Ok(Some(resolved)),
                    Err(PlanError::RequestNotFound) => Ok(None),
                    Err(err) => Err(err.into()),
                }
            })?;
            let Some(resolved) = resolved else {
                println!("request not found");
                return Ok(());
            };
            match resolved.outcome {
                Outcome::Accepted => {
                    notifier.notify(
                        resolved.initiator,
                        &format!(
                            "Swap confirmed. Your new duty day: {}",
                            resolved.target.format("%d.%m")
                        ),
                        &[],
                    )?;
                    notifier.notify(
                        resolved.colleague,
                        &format!(
                            "You accepted the swap. Your new duty day: {}",
                            resolved.source.format("%d.%m")
                        ),
                        &[],
                    )?;
                }
                Outcome::Declined => {
                    notifier.notify(resolved.initiator, "Your colleague declined the swap.", &[])?;
                    notifier.notify(resolved.colleague, "You declined the swap request.", &[])?;
                }
                Outcome::OutOfDate => {
                    let note = "The rota changed since the proposal; the swap was not applied.";
                    notifier.notify(resolved.initiator, note, &[])?;
                    notifier.notify(resolved.colleague, note, &[])?;
                }
            }
        }
        ExchangeCmd::Cancel { id } => {
            with_planner(store, |p| {
                p.exchange_cancel(ParticipantId::new(id));
                Ok(())
            })?;
            println!("exchange cancelled");
        }
    }
    Ok(())
}

/// One transactional read-modify-write cycle over the store.
fn with_planner<T>(
    store: &RosterStore<JsonStorage>,
    f: impl FnOnce(&mut Planner) -> Result<T>,
) -> Result<T> {
    store.update(|state| {
        let mut planner = Planner::from_state(std::mem::take(state));
        let out = f(&mut planner);
        *state = planner.into_state();
        out
    })
}

fn resolve_month(name: RotaName, year: Option<i32>, month: Option<u32>) -> (i32, u32) {
    if let (Some(y), Some(m)) = (year, month) {
        return (y, m);
    }
    let today = Local::now().date_naive();
    match name {
        RotaName::Current => (today.year(), today.month()),
        RotaName::Next => next_month(today.year(), today.month()),
    }
}
