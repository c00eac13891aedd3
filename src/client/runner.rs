//! Client execution flows.
//!
//! `run_create` and `run_join` are the two entry points behind the CLI
//! subcommands. The join flow owns the room-view session: it hydrates room
//! metadata, spawns the transport and the readline thread, then serializes
//! transport events, countdown ticks, typing ticks and user input against
//! one `RoomSession` value.

use std::path::PathBuf;
use std::time::Duration;

use crate::common::time::{Clock, SystemClock};
use crate::infrastructure::dto::http::{CreateRoomRequest, RoomInfo};

use super::api::RoomApi;
use super::error::ClientError;
use super::formatter::MessageFormatter;
use super::identity::IdentityStore;
use super::session::{RoomSession, SessionEffect};
use super::transport::{Transport, TransportConfig};
use super::ui::{redisplay_prompt, spawn_readline_thread};

/// Endpoints and profile location shared by all flows.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_url: String,
    pub ws_url: String,
    pub profile: PathBuf,
}

/// Create a room, then fetch and print its metadata with a ready-to-paste
/// join command.
pub async fn run_create(
    config: &ClientConfig,
    room_name: String,
    expires_in_minutes: u32,
    max_users: u32,
) -> Result<(), ClientError> {
    let api = RoomApi::new(&config.api_url);
    let request = CreateRoomRequest {
        room_name,
        expires_in_minutes,
        max_users,
    };

    let created = match api.create_room(&request).await {
        Ok(Some(created)) => created,
        Ok(None) => {
            // Suppressed duplicate; nothing was created on our behalf.
            return Err(ClientError::Room(
                "Room creation is already in progress.".to_string(),
            ));
        }
        Err(e) => return Err(ClientError::Room(e.create_reason())),
    };

    tracing::info!("Room created: {}", created.room_id);
    println!("Room created successfully.");

    match api.get_room_info(&created.room_id).await {
        Ok(Some(info)) => print!("{}", MessageFormatter::format_room_header(&info)),
        Ok(None) => {}
        Err(e) => tracing::warn!("Room metadata lookup failed: {}", e.lookup_reason()),
    }

    println!(
        "Share the room code and join with:\n  client join --room-id {} --nickname <name>",
        created.room_id
    );
    Ok(())
}

/// Join a room and run the chat session until exit or room expiry.
///
/// Missing arguments fall back to the stored identity, so a bare
/// `client join` resumes the previous session after a restart.
pub async fn run_join(
    config: &ClientConfig,
    room_id: Option<String>,
    nickname: Option<String>,
) -> Result<(), ClientError> {
    let mut store = IdentityStore::open(&config.profile);
    let room_id = room_id
        .filter(|v| !v.is_empty())
        .or_else(|| non_empty(&store.identity().room_id))
        .ok_or(ClientError::MissingIdentity("room id"))?;
    let nickname = nickname
        .filter(|v| !v.is_empty())
        .or_else(|| non_empty(&store.identity().nickname))
        .ok_or(ClientError::MissingIdentity("nickname"))?;

    let api = RoomApi::new(&config.api_url);

    tracing::info!("Attempting room join: {}", room_id);
    if let Err(e) = api.join_room(&room_id).await {
        return Err(ClientError::Room(e.join_reason()));
    }

    // Persist the pair only after the join is accepted
    store.set_nickname(&nickname);
    store.set_room_id(&room_id);

    let info = match api.get_room_info(&room_id).await {
        Ok(Some(info)) => info,
        Ok(None) => return Err(ClientError::Room("Room lookup failed.".to_string())),
        Err(e) => return Err(ClientError::Room(e.lookup_reason())),
    };

    run_room_session(config, &room_id, &nickname, info).await
}

async fn run_room_session(
    config: &ClientConfig,
    room_id: &str,
    nickname: &str,
    info: RoomInfo,
) -> Result<(), ClientError> {
    let clock = SystemClock;
    let mut session = RoomSession::new(room_id, nickname);

    print!("{}", MessageFormatter::format_room_header(&info));
    session.hydrate(info, clock.now_millis());
    if session.is_expired() {
        print!("{}", MessageFormatter::format_expired_notice());
        return Ok(());
    }

    println!(
        "You are '{}'. Type messages and press Enter to send. Press Ctrl+C to exit.",
        nickname
    );

    let (transport, mut events) =
        Transport::connect(TransportConfig::new(config.ws_url.clone()));
    let (mut lines, mut keystrokes) = spawn_readline_thread(nickname);

    apply_effects(&transport, session.bind());

    let mut countdown = tokio::time::interval(Duration::from_secs(1));
    let mut typing_tick = tokio::time::interval(Duration::from_millis(200));
    let mut view = ViewState::new();

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Some(event) => {
                    let effects = session.handle_transport_event(event);
                    apply_effects(&transport, effects);
                }
                None => {
                    session.teardown();
                    return Err(ClientError::Connection(
                        "Live connection ended unexpectedly".to_string(),
                    ));
                }
            },
            line = lines.recv() => match line {
                Some(line) => {
                    let effects = session.handle_input(&line, clock.now_millis());
                    apply_effects(&transport, effects);
                }
                // Ctrl+C / Ctrl+D closed the input channel
                None => break,
            },
            key = keystrokes.recv() => match key {
                Some(()) => {
                    let effects = session.handle_typing_input(clock.now_millis());
                    apply_effects(&transport, effects);
                }
                // Readline thread exited
                None => break,
            },
            _ = countdown.tick() => {
                let now = clock.now_millis();
                let effects = session.on_countdown_tick(now);
                apply_effects(&transport, effects);
                view.render_countdown(&session, now);
            }
            _ = typing_tick.tick() => {
                let effects = session.on_typing_tick(clock.now_millis());
                apply_effects(&transport, effects);
            }
        }

        view.render(&mut session);

        if session.is_expired() {
            print!("{}", MessageFormatter::format_expired_notice());
            break;
        }
    }

    session.teardown();
    transport.close();
    Ok(())
}

fn apply_effects(transport: &Transport, effects: Vec<SessionEffect>) {
    for effect in effects {
        match effect {
            SessionEffect::Send(event) => transport.send(event),
            SessionEffect::CloseTransport => transport.close(),
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Tracks what has already been printed so that each loop turn only renders
/// the delta.
struct ViewState {
    rendered_entries: usize,
    typing_line: String,
    connected: bool,
    countdown_line: String,
}

impl ViewState {
    fn new() -> Self {
        Self {
            rendered_entries: 0,
            typing_line: String::new(),
            connected: false,
            countdown_line: String::new(),
        }
    }

    fn render(&mut self, session: &mut RoomSession) {
        let mut printed = false;

        if session.is_connected() != self.connected {
            self.connected = session.is_connected();
            print!("{}", MessageFormatter::format_status(self.connected));
            printed = true;
        }

        let timeline = session.timeline();
        if timeline.len() > self.rendered_entries {
            let local = session.username().to_string();
            let active_users = session.active_users();
            for entry in &timeline[self.rendered_entries..] {
                print!(
                    "{}",
                    MessageFormatter::format_entry(entry, &local, active_users)
                );
            }
            self.rendered_entries = timeline.len();
            printed = true;
        }

        let typing_line = MessageFormatter::format_typing(&session.typing_usernames());
        if typing_line != self.typing_line {
            if !typing_line.is_empty() {
                print!("\n{}", typing_line);
                printed = true;
            }
            self.typing_line = typing_line;
        }

        if let Some(feedback) = session.take_feedback() {
            print!("{}", MessageFormatter::format_feedback(&feedback));
            printed = true;
        }

        if printed && !session.is_expired() {
            redisplay_prompt(session.username());
        }
    }

    /// Print the countdown once per minute and through the final ten
    /// seconds, instead of spamming one line per tick.
    fn render_countdown(&mut self, session: &RoomSession, now: i64) {
        let Some(label) = session.countdown_label(now) else {
            return;
        };
        let worth_showing = label.ends_with(":00") || label.as_str() <= "00:10";
        if worth_showing && label != self.countdown_line {
            print!("{}", MessageFormatter::format_countdown(&label));
            redisplay_prompt(session.username());
            self.countdown_line = label;
        }
    }
}
