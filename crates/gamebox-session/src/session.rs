//! One player's live attachment to a room.
//!
//! A `RoomSession` owns a subscription to the room document and the
//! local player's slot. Incoming snapshots always carry the full
//! authoritative state; outgoing moves go through a conditional write
//! keyed on the version of the snapshot they were computed against.
//! That write is the only ordering guarantee between the two players —
//! whoever's write lands first owns that sequence number, the other
//! side gets [`SessionError::ConcurrentMoveConflict`] and recomputes.

use gamebox_games::GameState;
use gamebox_protocol::{Move, MovePayload, RoomDoc, RoomId, RoomStatus, Slot};
use gamebox_room::TurnState;
use gamebox_store::{DocumentStore, Snapshot, StoreError, Subscription};

use crate::SessionError;

/// A live, detachable attachment of one player slot to one room.
///
/// Created by [`attach`](Self::attach); torn down by
/// [`detach`](Self::detach) or by being dropped — whichever comes first.
/// Either way the store listener is released exactly once.
pub struct RoomSession<S: DocumentStore> {
    store: S,
    room_id: RoomId,
    slot: Slot,
    key: String,
    /// `None` once detached.
    sub: Option<S::Subscription>,
    /// The last snapshot this session has seen, by subscription,
    /// refresh, or its own accepted write.
    latest: Snapshot,
}

impl<S: DocumentStore> RoomSession<S> {
    /// Attaches to a room as the given slot.
    ///
    /// Reads the current document and opens the live subscription.
    /// Re-attaching after a disconnect is the reconnect path: the new
    /// session starts from the current document, not from where the old
    /// one left off.
    pub async fn attach(store: S, room_id: RoomId, slot: Slot) -> Result<Self, SessionError> {
        let key = room_id.doc_key();
        let latest = store.get(&key).await.map_err(|e| match e {
            StoreError::NotFound(_) => SessionError::RoomNotFound(room_id.clone()),
            other => SessionError::Storage(other),
        })?;
        let sub = store.subscribe(&key).await.map_err(|e| match e {
            StoreError::NotFound(_) => SessionError::RoomNotFound(room_id.clone()),
            other => SessionError::Storage(other),
        })?;

        tracing::info!(room = %room_id, %slot, "session attached");
        Ok(Self {
            store,
            room_id,
            slot,
            key,
            sub: Some(sub),
            latest,
        })
    }

    /// The room this session is attached to.
    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    /// The slot this session owns.
    pub fn slot(&self) -> Slot {
        self.slot
    }

    /// Decodes the last observed snapshot.
    pub fn doc(&self) -> Result<RoomDoc, SessionError> {
        Ok(RoomDoc::from_value(&self.latest.value)?)
    }

    /// The derived turn state of the last observed snapshot.
    pub fn turn_state(&self) -> Result<TurnState, SessionError> {
        Ok(TurnState::derive(&self.doc()?))
    }

    /// Waits for the next change to the room document.
    ///
    /// Yields the current document first, then one per change — a lazy,
    /// infinite sequence that never polls. Returns `Ok(None)` once the
    /// room has been deleted; the feed never resumes after that.
    pub async fn next_snapshot(&mut self) -> Result<Option<RoomDoc>, SessionError> {
        let sub = self.sub.as_mut().ok_or(SessionError::Detached)?;
        match sub.next().await {
            Some(snap) => {
                let doc = RoomDoc::from_value(&snap.value)?;
                self.latest = snap;
                Ok(Some(doc))
            }
            None => Ok(None),
        }
    }

    /// Re-reads the document directly, bypassing the subscription.
    ///
    /// The resync half of resync-and-retry after [`SessionError::StaleMove`]
    /// or [`SessionError::ConcurrentMoveConflict`].
    pub async fn refresh(&mut self) -> Result<RoomDoc, SessionError> {
        let snap = self.store.get(&self.key).await.map_err(|e| match e {
            StoreError::NotFound(_) => SessionError::RoomNotFound(self.room_id.clone()),
            other => SessionError::Storage(other),
        })?;
        let doc = RoomDoc::from_value(&snap.value)?;
        self.latest = snap;
        Ok(doc)
    }

    /// Builds the next move in sequence for this session's slot.
    pub fn next_move(&self, payload: MovePayload) -> Result<Move, SessionError> {
        let doc = self.doc()?;
        Ok(Move {
            slot: self.slot,
            seq: doc.last_seq() + 1,
            payload,
        })
    }

    /// Validates and publishes one move.
    ///
    /// The pipeline, in order — nothing touches the store until every
    /// local check has passed:
    ///
    /// 1. the move must be for this session's slot,
    /// 2. its `seq` must extend the observed history ([`SessionError::StaleMove`]),
    /// 3. the turn arbiter must agree it is this slot's turn,
    /// 4. the game rules must accept it (pure `apply_move`),
    /// 5. the conditional write must win
    ///    ([`SessionError::ConcurrentMoveConflict`] if it does not).
    ///
    /// On success, returns the document as this session now sees it.
    pub async fn publish_move(&mut self, mv: Move) -> Result<RoomDoc, SessionError> {
        let doc = self.doc()?;

        if mv.slot != self.slot {
            return Err(SessionError::WrongSlot {
                own: self.slot,
                got: mv.slot,
            });
        }

        let expected = doc.last_seq() + 1;
        if mv.seq != expected {
            return Err(SessionError::StaleMove {
                expected,
                got: mv.seq,
            });
        }

        TurnState::check_move(&doc, mv.slot)?;

        let state = GameState::decode(doc.game, &doc.state)?;
        let next_state = state.apply_move(&mv)?;

        let mut next = doc;
        next.state = next_state.encode()?;
        next.moves.push(mv.clone());
        if let Some(outcome) = next_state.outcome() {
            next.winner = Some(outcome);
            next.status = RoomStatus::Finished;
            tracing::info!(room = %self.room_id, ?outcome, "game finished");
        }

        let value = next.to_value()?;
        match self
            .store
            .conditional_update(&self.key, self.latest.version, value.clone())
            .await
        {
            Ok(version) => {
                self.latest = Snapshot { version, value };
                tracing::debug!(
                    room = %self.room_id,
                    slot = %mv.slot,
                    seq = mv.seq,
                    "move accepted"
                );
                Ok(next)
            }
            Err(StoreError::Conflict { .. }) => {
                tracing::debug!(
                    room = %self.room_id,
                    slot = %mv.slot,
                    seq = mv.seq,
                    "move lost the write race"
                );
                Err(SessionError::ConcurrentMoveConflict { seq: mv.seq })
            }
            Err(StoreError::NotFound(_)) => {
                Err(SessionError::RoomNotFound(self.room_id.clone()))
            }
            Err(other) => Err(SessionError::Storage(other)),
        }
    }

    /// Releases the subscription. Idempotent — safe to call any number
    /// of times, and called from `Drop` if the caller never does.
    pub fn detach(&mut self) {
        if self.sub.take().is_some() {
            tracing::info!(room = %self.room_id, slot = %self.slot, "session detached");
        }
    }

    /// Returns `true` if the session still holds its subscription.
    pub fn is_attached(&self) -> bool {
        self.sub.is_some()
    }
}

impl<S: DocumentStore> Drop for RoomSession<S> {
    fn drop(&mut self) {
        // Covers every exit path, including early returns and panics in
        // the caller; a listener must never outlive its session.
        self.detach();
    }
}
