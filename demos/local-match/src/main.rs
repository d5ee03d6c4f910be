//! A scripted two-player Tic-Tac-Toe match over the in-process store.
//!
//! Run with `RUST_LOG=debug` to watch every store write and session
//! event; the board is printed after each accepted move.

use std::time::{SystemTime, UNIX_EPOCH};

use gamebox::prelude::*;
use gamebox::{Cell, GameState};
use tracing_subscriber::EnvFilter;

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

fn render(doc: &RoomDoc) -> String {
    let Ok(GameState::TicTacToe(state)) = GameState::decode(doc.game, &doc.state) else {
        return "<undecodable board>".into();
    };
    state
        .board
        .chunks(3)
        .map(|row| {
            row.iter()
                .map(|c| match c {
                    Cell::Empty => ".",
                    Cell::X => "X",
                    Cell::O => "O",
                })
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

async fn play(session: &mut RoomSession<MemoryStore>, cell: u8) -> Result<RoomDoc, GameboxError> {
    session.refresh().await?;
    let mv = session.next_move(MovePayload::PlaceMark { cell })?;
    let doc = session.publish_move(mv).await?;
    println!("\n{} played cell {cell}:\n{}", session.slot(), render(&doc));
    Ok(doc)
}

#[tokio::main]
async fn main() -> Result<(), GameboxError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let store = MemoryStore::new();
    let directory = RoomDirectory::new(store.clone());

    // Player one creates the room; the id is what would travel in the URL.
    let room = directory.create_room(GameKind::TicTacToe, now_ms()).await?;
    println!("room created: {room}");

    let slot0 = directory
        .join_room(&room, PlayerId::new("alice"), "Alice", now_ms())
        .await?;
    let slot1 = directory
        .join_room(&room, PlayerId::new("bob"), "Bob", now_ms())
        .await?;

    let mut alice = RoomSession::attach(store.clone(), room.clone(), slot0).await?;
    let mut bob = RoomSession::attach(store.clone(), room.clone(), slot1).await?;

    // An observer watching the raw snapshot feed, like a spectator tab.
    let mut feed = store.subscribe(&room.doc_key()).await?;
    let watcher = tokio::spawn(async move {
        while let Some(snap) = feed.next().await {
            if let Ok(doc) = RoomDoc::from_value(&snap.value) {
                tracing::info!(
                    version = %snap.version,
                    moves = doc.last_seq(),
                    status = %doc.status,
                    "snapshot"
                );
            }
        }
        tracing::info!("snapshot feed ended");
    });

    // Alice takes the main diagonal.
    play(&mut alice, 0).await?;
    play(&mut bob, 1).await?;
    play(&mut alice, 4).await?;
    play(&mut bob, 2).await?;
    let doc = play(&mut alice, 8).await?;

    match doc.winner {
        Some(Outcome::Winner { slot }) => println!("\n{slot} wins"),
        Some(Outcome::Draw) => println!("\ndraw"),
        None => println!("\ngame still running?"),
    }

    alice.detach();
    bob.detach();
    directory.delete_room(&room).await?;
    let _ = watcher.await;

    Ok(())
}
