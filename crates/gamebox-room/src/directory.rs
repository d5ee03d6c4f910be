//! Room directory: creates, locates, and retires room documents.
//!
//! The directory is the only component that writes the player-slots
//! field. Joins go through a compare-and-set loop against the store's
//! document version, so two late joiners can never both claim slot 1 —
//! one write wins, the other re-reads and finds the room full.

use gamebox_games::GameState;
use gamebox_protocol::{GameKind, PlayerId, PlayerSlot, RoomDoc, RoomId, RoomStatus, Slot};
use gamebox_store::{DocumentStore, Snapshot, StoreError};

use crate::error::store_err;
use crate::{DirectoryConfig, RoomError};

/// How many fresh ids `create_room` draws before giving up. Collisions
/// need two 82-bit draws to match, so one retry is already paranoia.
const ID_RETRY_LIMIT: usize = 4;

/// Creates and locates rooms in the document store.
///
/// Cheap to clone when the store is (all clones talk to the same
/// documents). The directory holds no state of its own — every operation
/// reads the store fresh.
#[derive(Clone)]
pub struct RoomDirectory<S> {
    store: S,
    config: DirectoryConfig,
}

impl<S: DocumentStore> RoomDirectory<S> {
    /// Creates a directory with default configuration.
    pub fn new(store: S) -> Self {
        Self::with_config(store, DirectoryConfig::default())
    }

    /// Creates a directory with the given configuration.
    pub fn with_config(store: S, config: DirectoryConfig) -> Self {
        Self { store, config }
    }

    /// Allocates a fresh room: unique id, `Waiting`, zero slots, the
    /// game's initial state.
    ///
    /// `now_ms` is the caller's clock (unix millis); it only feeds the
    /// idle sweep.
    pub async fn create_room(&self, game: GameKind, now_ms: u64) -> Result<RoomId, RoomError> {
        let initial_state = GameState::initial(game).encode()?;

        for _ in 0..ID_RETRY_LIMIT {
            let id = RoomId::generate();
            let doc = RoomDoc::new(id.clone(), game, initial_state.clone(), now_ms);
            match self.store.create(&id.doc_key(), doc.to_value()?).await {
                Ok(_) => {
                    tracing::info!(room = %id, game = %game, "room created");
                    return Ok(id);
                }
                Err(StoreError::AlreadyExists(_)) => continue,
                Err(e) => return Err(RoomError::Storage(e)),
            }
        }

        Err(RoomError::Storage(StoreError::Unavailable(
            "could not allocate a fresh room id".into(),
        )))
    }

    /// Adds a player to a room, returning their slot.
    ///
    /// Rejoin is idempotent: if the identity already occupies a slot,
    /// that slot comes back unchanged (a reloaded browser resumes its
    /// game). The second successful join flips the room to `InProgress`.
    ///
    /// # Errors
    /// - [`RoomError::NotFound`] — the id does not resolve
    /// - [`RoomError::RoomFull`] — both slots are taken by others
    pub async fn join_room(
        &self,
        room_id: &RoomId,
        player: PlayerId,
        display_name: &str,
        now_ms: u64,
    ) -> Result<Slot, RoomError> {
        let key = room_id.doc_key();

        for _ in 0..self.config.join_retry_limit {
            let snap = self.snapshot(room_id).await?;
            let mut doc = RoomDoc::from_value(&snap.value)?;

            if let Some(slot) = doc.slot_of(&player) {
                tracing::debug!(room = %room_id, %player, %slot, "idempotent rejoin");
                return Ok(slot);
            }
            if doc.is_full() || !doc.status.is_joinable() {
                return Err(RoomError::RoomFull(room_id.clone()));
            }

            let slot = Slot(doc.slots.len() as u8);
            doc.slots.push(PlayerSlot {
                player: player.clone(),
                display_name: display_name.to_string(),
                joined_at: now_ms,
            });
            if doc.is_full() {
                doc.status = RoomStatus::InProgress;
            }

            match self
                .store
                .conditional_update(&key, snap.version, doc.to_value()?)
                .await
            {
                Ok(_) => {
                    tracing::info!(
                        room = %room_id,
                        %player,
                        %slot,
                        players = doc.slots.len(),
                        "player joined"
                    );
                    return Ok(slot);
                }
                Err(StoreError::Conflict { .. }) => {
                    tracing::debug!(room = %room_id, %player, "join raced, retrying");
                    continue;
                }
                Err(e) => return Err(store_err(room_id, e)),
            }
        }

        Err(RoomError::Contended(room_id.clone()))
    }

    /// Like [`join_room`](Self::join_room), but a known identity is an
    /// error instead of an idempotent success.
    pub async fn join_room_strict(
        &self,
        room_id: &RoomId,
        player: PlayerId,
        display_name: &str,
        now_ms: u64,
    ) -> Result<Slot, RoomError> {
        let doc = self.get_room(room_id).await?;
        if doc.slot_of(&player).is_some() {
            return Err(RoomError::AlreadyJoined(player, room_id.clone()));
        }
        self.join_room(room_id, player, display_name, now_ms).await
    }

    /// Reads the current room document.
    pub async fn get_room(&self, room_id: &RoomId) -> Result<RoomDoc, RoomError> {
        let snap = self.snapshot(room_id).await?;
        Ok(RoomDoc::from_value(&snap.value)?)
    }

    /// Lists rooms of the given game that are still accepting a second
    /// player. Rooms that vanish mid-listing are silently skipped.
    pub async fn list_waiting(&self, game: GameKind) -> Result<Vec<RoomDoc>, RoomError> {
        let keys = self
            .store
            .list(&format!("{}/", gamebox_protocol::ROOM_COLLECTION))
            .await
            .map_err(RoomError::Storage)?;

        let mut waiting = Vec::new();
        for key in keys {
            let Ok(snap) = self.store.get(&key).await else {
                continue;
            };
            let Ok(doc) = RoomDoc::from_value(&snap.value) else {
                tracing::warn!(doc = key, "skipping undecodable room document");
                continue;
            };
            if doc.game == game && doc.status.is_joinable() {
                waiting.push(doc);
            }
        }
        Ok(waiting)
    }

    /// Retires stale rooms, returning the ids it deleted.
    ///
    /// Two rules, matching the room lifecycle:
    /// - `Waiting` rooms idle longer than `waiting_timeout` are deleted.
    /// - `Finished` rooms are first stamped with the sweep time, then
    ///   deleted once `finished_linger` has passed — so the final board
    ///   stays readable for a while without any clock in the move path.
    pub async fn sweep(&self, now_ms: u64) -> Result<Vec<RoomId>, RoomError> {
        let keys = self
            .store
            .list(&format!("{}/", gamebox_protocol::ROOM_COLLECTION))
            .await
            .map_err(RoomError::Storage)?;

        let mut removed = Vec::new();
        for key in keys {
            let Ok(snap) = self.store.get(&key).await else {
                continue;
            };
            let Ok(doc) = RoomDoc::from_value(&snap.value) else {
                tracing::warn!(doc = key, "skipping undecodable room document");
                continue;
            };

            match doc.status {
                RoomStatus::Waiting => {
                    let idle = now_ms.saturating_sub(doc.created_at);
                    if idle >= self.config.waiting_timeout.as_millis() as u64 {
                        if self.store.delete(&key).await.is_ok() {
                            tracing::info!(room = %doc.id, "idle waiting room swept");
                            removed.push(doc.id);
                        }
                    }
                }
                RoomStatus::Finished => match doc.finished_at {
                    None => {
                        // First sight: stamp, collect on a later sweep.
                        let mut stamped = doc.clone();
                        stamped.finished_at = Some(now_ms);
                        let _ = self
                            .store
                            .conditional_update(&key, snap.version, stamped.to_value()?)
                            .await;
                    }
                    Some(t) => {
                        if now_ms.saturating_sub(t)
                            >= self.config.finished_linger.as_millis() as u64
                            && self.store.delete(&key).await.is_ok()
                        {
                            tracing::info!(room = %doc.id, "finished room swept");
                            removed.push(doc.id);
                        }
                    }
                },
                RoomStatus::InProgress => {}
            }
        }
        Ok(removed)
    }

    /// Deletes a room outright, regardless of state.
    pub async fn delete_room(&self, room_id: &RoomId) -> Result<(), RoomError> {
        self.store
            .delete(&room_id.doc_key())
            .await
            .map_err(|e| store_err(room_id, e))?;
        tracing::info!(room = %room_id, "room deleted");
        Ok(())
    }

    async fn snapshot(&self, room_id: &RoomId) -> Result<Snapshot, RoomError> {
        self.store
            .get(&room_id.doc_key())
            .await
            .map_err(|e| store_err(room_id, e))
    }
}
