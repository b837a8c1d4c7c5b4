//! End-to-end meetings replayed through the room event loop.
//!
//! Time is paused, so `wait` lines in a script advance the clock instantly
//! and reminders fire exactly when they would in a live room.

use std::sync::Arc;

use turnbot::app::run_room;
use turnbot::config::Config;
use turnbot::notes::NotesLog;
use turnbot::room::{ChatRoom, Operators};
use turnbot::transport::ScriptedTransport;

struct Room {
    config: Config,
    room: Arc<ChatRoom>,
    operators: Arc<Operators>,
    notes: Arc<NotesLog>,
    _notes_dir: tempfile::TempDir,
}

impl Room {
    fn new(members: &[&str], operators: &[&str]) -> Self {
        let notes_dir = tempfile::tempdir().unwrap();
        let room = Arc::new(ChatRoom::new("#standup"));
        for member in members {
            room.join(member, None);
        }
        Self {
            config: Config::default(),
            room,
            operators: Arc::new(Operators::new(operators.iter().copied())),
            notes: Arc::new(NotesLog::new(notes_dir.path()).unwrap()),
            _notes_dir: notes_dir,
        }
    }

    async fn replay(&self, script: &str) -> Vec<String> {
        let mut transport = ScriptedTransport::parse(script).unwrap();
        run_room(
            &self.config,
            self.room.clone(),
            self.operators.clone(),
            self.notes.clone(),
            &mut transport,
        )
        .await
        .unwrap();
        transport.sent().to_vec()
    }
}

#[tokio::test(start_paused = true)]
async fn test_standup_with_reminders() {
    let room = Room::new(&["alice", "bob", "carol"], &["alice"]);

    let sent = room
        .replay(
            "alice> !meeting rollcall\n\
             bob> morning\n\
             wait 61\n\
             alice> !meeting next\n\
             wait 31\n\
             bob> sorry, was muted\n\
             alice> !meeting next\n",
        )
        .await;

    assert_eq!(
        sent,
        vec![
            "Doing the rollcall.",
            "Hello @room, this is the roll-call! alice bob carol",
            "Roll-call for carol",
            "Meeting in progress.",
            "There are 2 participants.",
            "bob, you're up (after that, alice).",
            "bob are you with us?",
            "alice, you're up (after that, we're done!).",
            "That was the last turn, the meeting is over.",
        ]
    );

    // Notes were opened by the operator and closed at the end
    assert!(room.notes.active_label().is_none());
    let files: Vec<_> = std::fs::read_dir(room.notes.dir())
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect();
    assert_eq!(files.len(), 1);
    let notes = std::fs::read_to_string(&files[0]).unwrap();
    assert!(notes.contains("bob: morning"));
    assert!(notes.contains("bob: sorry, was muted"));
}

#[tokio::test(start_paused = true)]
async fn test_prompt_answer_cancels_turn_reminder() {
    let room = Room::new(&["chair", "dan"], &[]);

    let sent = room
        .replay(
            "chair> !meeting rollcall\n\
             dan> hi\n\
             chair> !meeting next\n\
             wait 10\n\
             dan> yesterday I fixed the build\n\
             wait 60\n",
        )
        .await;

    assert!(!sent.iter().any(|line| line.contains("are you with us?")));
    assert_eq!(sent.last().map(String::as_str), Some("dan, you're up (after that, chair)."));
}

#[tokio::test(start_paused = true)]
async fn test_skip_bump_breakout_and_forced_end() {
    let room = Room::new(&["op", "ann", "ben", "cat"], &["op"]);

    let sent = room
        .replay(
            "op> !meeting rollcall\n\
             ann> here\n\
             ben> here\n\
             cat> here\n\
             op> !meeting skip ben\n\
             op> !meeting bump cat\n\
             ann> !meeting next\n\
             op> !meeting next\n\
             ann> !meeting breakout release checklist\n\
             op> !meeting done\n\
             op> !meeting status\n",
        )
        .await;

    assert_eq!(
        sent,
        vec![
            "Doing the rollcall.",
            "Hello @room, this is the roll-call! op ann ben cat",
            "User ben will be skipped this meeting.",
            "User cat is up next.",
            "Meeting in progress.",
            "There are 3 participants.",
            "cat, you're up (after that, ann).",
            "Registered breakout 'release checklist'.",
            "The meeting has been forcefully ended.",
            "No meeting in progress.",
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_help_lists_modules() {
    let room = Room::new(&["alice"], &[]);

    let sent = room.replay("alice> !help\n").await;

    assert_eq!(sent.len(), 2);
    assert_eq!(sent[1], "Use !help <modulename..> to see what commands are available.");
    for module in ["turnbot", "meeting", "log"] {
        assert!(sent[0].contains(module), "{} missing from {:?}", module, sent[0]);
    }
}
