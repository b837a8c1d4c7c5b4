use crate::bot::{Bot, BotParts};
use crate::cli::RunCliArgs;
use crate::config::Config;
use crate::notes::NotesLog;
use crate::room::{ChatRoom, Operators, Outbox, RoomEvent};
use crate::transport::{ConsoleTransport, RoomTransport, ScriptedTransport};
use anyhow::Result;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, warn};

pub async fn run_service(args: RunCliArgs) -> Result<()> {
    info!("Starting turnbot in room {}", args.room);

    let config = Config::load()?;

    let room = Arc::new(ChatRoom::new(args.room.as_str()));
    for member in &args.members {
        room.join(member, None);
    }

    let operators = Arc::new(Operators::new(
        config.bot.operators.iter().chain(args.operators.iter()).cloned(),
    ));
    if operators.list().is_empty() {
        warn!("No operators configured, privileged commands are disabled");
    }

    let notes = Arc::new(NotesLog::new(config.notes.notes_dir()?)?);
    info!("Meeting notes are written to {:?}", notes.dir());

    match &args.script {
        Some(path) => {
            let mut transport = ScriptedTransport::from_file(path)?.with_echo(true);
            run_room(&config, room, operators, notes, &mut transport).await
        }
        None => {
            info!("Type messages as 'name> text', Ctrl-D to leave");
            let mut transport = ConsoleTransport::new()?;
            run_room(&config, room, operators, notes, &mut transport).await
        }
    }
}

/// Serial event loop for one room.
///
/// Messages from the transport and reminder firings are handled one at a
/// time; whatever the bot announces is flushed to the transport after each
/// event. Returns when the transport closes.
pub async fn run_room<T>(
    config: &Config,
    room: Arc<ChatRoom>,
    operators: Arc<Operators>,
    notes: Arc<NotesLog>,
    transport: &mut T,
) -> Result<()>
where
    T: RoomTransport + ?Sized,
{
    let (outbox, mut outbox_rx) = Outbox::channel();
    let (events_tx, mut events_rx) = mpsc::unbounded_channel::<RoomEvent>();

    let mut bot = Bot::standard(
        config,
        BotParts {
            room: room.clone(),
            operators,
            announcer: Arc::new(outbox),
            notes,
            events: events_tx,
        },
    );
    info!("Modules: {}", bot.module_names().join(", "));

    loop {
        tokio::select! {
            message = transport.next_message() => {
                match message? {
                    Some(message) => {
                        room.join(&message.sender, None);
                        bot.handle_event(RoomEvent::Message(message));
                    }
                    None => {
                        info!("Room {} closed with {} members", room.name(), room.member_count());
                        break;
                    }
                }
            }
            Some(event) = events_rx.recv() => bot.handle_event(event),
        }

        while let Ok(announcement) = outbox_rx.try_recv() {
            transport.send(&announcement.render()).await?;
        }
    }

    Ok(())
}
