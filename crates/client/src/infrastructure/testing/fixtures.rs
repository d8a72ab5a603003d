//! In-memory game server used across unit tests.
//!
//! `FakeServer` is a [`FrameTransport`] whose far end is a tiny model of the
//! game process: every written request is answered immediately with one
//! response frame, queued in wire order. Clones share the same connection, so
//! a test can keep a clone to steer the server and inspect what happened on
//! the wire after handing the transport to a correlator.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use tokio::sync::Notify;

use sc2link_domain::Status;
use sc2link_shared::{
    AvailableMaps, CreateGameError, CreateGameResult, JoinGameError, JoinGameResult, PingResult,
    Request, Response, ResponsePayload,
};

use crate::ports::outbound::{FrameTransport, TransportError};

const FAKE_GAME_VERSION: &str = "4.10.0";
const FAKE_BASE_BUILD: u32 = 75689;

/// Game-side state that shapes each response.
#[derive(Debug)]
struct FakeGame {
    status: Status,
    simulation_loop: u32,
    next_player_id: u32,
    maps: Vec<String>,
}

impl Default for FakeGame {
    fn default() -> Self {
        Self {
            status: Status::Launched,
            simulation_loop: 0,
            next_player_id: 1,
            maps: vec![
                "Ladder/Acropolis.SC2Map".to_string(),
                "Melee/Simple64.SC2Map".to_string(),
            ],
        }
    }
}

impl FakeGame {
    fn respond(&mut self, request: &Request) -> Response {
        let payload = match request {
            Request::Ping => ResponsePayload::Ping(PingResult {
                game_version: FAKE_GAME_VERSION.to_string(),
                data_version: "B89B5D6FA7CBF6452E721311BFBC6CB2".to_string(),
                data_build: FAKE_BASE_BUILD,
                base_build: FAKE_BASE_BUILD,
            }),
            Request::AvailableMaps => ResponsePayload::AvailableMaps(AvailableMaps {
                local_map_paths: self.maps.clone(),
                battlenet_map_names: Vec::new(),
            }),
            Request::CreateGame { settings } => {
                if settings.players.is_empty() {
                    ResponsePayload::CreateGame(CreateGameResult {
                        error: Some(CreateGameError::MissingPlayerSetup),
                        error_details: Some("at least one player is required".to_string()),
                    })
                } else {
                    self.status = Status::InitGame;
                    ResponsePayload::CreateGame(CreateGameResult::default())
                }
            }
            Request::JoinGame { settings } => {
                if settings.race.is_none() && settings.observed_player_id.is_none() {
                    ResponsePayload::JoinGame(JoinGameResult {
                        player_id: 0,
                        error: Some(JoinGameError::MissingParticipation),
                        error_details: None,
                    })
                } else {
                    self.status = Status::InGame;
                    let player_id = self.next_player_id;
                    self.next_player_id += 1;
                    ResponsePayload::JoinGame(JoinGameResult {
                        player_id,
                        ..JoinGameResult::default()
                    })
                }
            }
            Request::Step { count } => {
                self.simulation_loop += count;
                ResponsePayload::Step {
                    simulation_loop: self.simulation_loop,
                }
            }
            Request::LeaveGame => {
                self.status = Status::Launched;
                ResponsePayload::LeaveGame
            }
            Request::Quit => {
                self.status = Status::Quit;
                ResponsePayload::Quit
            }
        };

        Response::new(self.status, payload)
    }
}

#[derive(Debug, Default)]
struct WireState {
    game: FakeGame,
    /// Response frames the client has not read yet, in wire order
    outbox: VecDeque<Vec<u8>>,
    /// Every frame the client wrote
    written: Vec<Vec<u8>>,
    /// Completed `read_frame` calls that returned a frame
    reads: usize,
    /// While set, reads wait even if frames are queued
    held: bool,
    closed: bool,
    fail_next_write: bool,
    fail_next_read: bool,
    corrupt_next_response: bool,
}

#[derive(Debug, Default)]
struct Shared {
    state: Mutex<WireState>,
    notify: Notify,
}

/// In-memory transport backed by a fake game process.
#[derive(Debug, Clone, Default)]
pub struct FakeServer {
    shared: Arc<Shared>,
}

impl FakeServer {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, WireState> {
        // A test that panicked while holding the lock already failed.
        self.shared
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Force the status the game reports in subsequent responses.
    pub fn set_status(&self, status: Status) {
        self.state().game.status = status;
    }

    /// Number of frames the client has read off the wire.
    pub fn reads(&self) -> usize {
        self.state().reads
    }

    /// Frames written by the client, decoded back into requests.
    pub fn received_requests(&self) -> Vec<Request> {
        self.state()
            .written
            .iter()
            .filter_map(|frame| serde_json::from_slice(frame).ok())
            .collect()
    }

    /// Response frames queued but not yet read.
    pub fn queued(&self) -> usize {
        self.state().outbox.len()
    }

    /// Make reads wait until [`release`](Self::release) is called.
    pub fn hold(&self) {
        self.state().held = true;
    }

    pub fn release(&self) {
        self.state().held = false;
        self.shared.notify.notify_waiters();
    }

    /// Close the server side; queued frames can still be read.
    pub fn shutdown(&self) {
        self.state().closed = true;
        self.shared.notify.notify_waiters();
    }

    pub fn fail_next_write(&self) {
        self.state().fail_next_write = true;
    }

    pub fn fail_next_read(&self) {
        self.state().fail_next_read = true;
    }

    /// Replace the next response frame with bytes that do not decode.
    pub fn corrupt_next_response(&self) {
        self.state().corrupt_next_response = true;
    }
}

fn broken_pipe() -> TransportError {
    TransportError::Io(std::io::Error::new(
        std::io::ErrorKind::BrokenPipe,
        "injected transport failure",
    ))
}

#[async_trait]
impl FrameTransport for FakeServer {
    async fn write_frame(&mut self, frame: Vec<u8>) -> Result<(), TransportError> {
        {
            let mut state = self.state();
            if state.closed {
                return Err(TransportError::Closed);
            }
            if std::mem::take(&mut state.fail_next_write) {
                return Err(broken_pipe());
            }

            let response = match serde_json::from_slice::<Request>(&frame) {
                Ok(request) => state.game.respond(&request),
                Err(e) => Response::rejected(state.game.status, vec![e.to_string()]),
            };
            let quitting = response.payload == Some(ResponsePayload::Quit);

            let bytes = if std::mem::take(&mut state.corrupt_next_response) {
                b"\x00not a response".to_vec()
            } else {
                serde_json::to_vec(&response).map_err(std::io::Error::from)?
            };

            state.written.push(frame);
            state.outbox.push_back(bytes);
            if quitting {
                state.closed = true;
            }
        }
        self.shared.notify.notify_waiters();
        Ok(())
    }

    async fn read_frame(&mut self) -> Result<Vec<u8>, TransportError> {
        loop {
            let notified = self.shared.notify.notified();
            {
                let mut state = self.state();
                if std::mem::take(&mut state.fail_next_read) {
                    return Err(broken_pipe());
                }
                if !state.held {
                    if let Some(frame) = state.outbox.pop_front() {
                        state.reads += 1;
                        return Ok(frame);
                    }
                    if state.closed {
                        return Err(TransportError::Closed);
                    }
                }
            }
            notified.await;
        }
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        self.shutdown();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(request: &Request) -> Vec<u8> {
        serde_json::to_vec(request).unwrap()
    }

    #[tokio::test]
    async fn answers_each_request_in_order() {
        let mut server = FakeServer::new();
        server.write_frame(encode(&Request::Ping)).await.unwrap();
        server
            .write_frame(encode(&Request::Step { count: 4 }))
            .await
            .unwrap();

        assert_eq!(server.queued(), 2);
        let first: Response = serde_json::from_slice(&server.read_frame().await.unwrap()).unwrap();
        let second: Response =
            serde_json::from_slice(&server.read_frame().await.unwrap()).unwrap();

        assert!(matches!(first.payload, Some(ResponsePayload::Ping(_))));
        assert_eq!(
            second.payload,
            Some(ResponsePayload::Step { simulation_loop: 4 })
        );
        assert_eq!(server.reads(), 2);
    }

    #[tokio::test]
    async fn quit_closes_after_final_response() {
        let mut server = FakeServer::new();
        server.write_frame(encode(&Request::Quit)).await.unwrap();

        assert!(server.read_frame().await.is_ok());
        assert!(matches!(
            server.read_frame().await,
            Err(TransportError::Closed)
        ));
        assert!(matches!(
            server.write_frame(encode(&Request::Ping)).await,
            Err(TransportError::Closed)
        ));
    }

    #[tokio::test]
    async fn held_reads_resume_on_release() {
        let mut server = FakeServer::new();
        let handle = server.clone();
        server.write_frame(encode(&Request::Ping)).await.unwrap();
        handle.hold();

        let reader = tokio::spawn(async move { server.read_frame().await });
        tokio::task::yield_now().await;
        handle.release();

        assert!(reader.await.unwrap().is_ok());
        assert_eq!(handle.reads(), 1);
    }
}
