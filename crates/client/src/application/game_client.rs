//! High-level game API client.
//!
//! Wraps a [`Correlator`] with typed helpers for the common game API calls
//! and the lifecycle waits a bot runner needs.

use std::time::Duration;

use sc2link_domain::{RequestId, Status};
use sc2link_shared::{
    AvailableMaps, CreateGameSettings, JoinGameSettings, PingResult, Request, Response,
    ResponsePayload, Sc2Codec,
};

use super::error::ClientError;
use crate::config::ClientConfig;
use crate::correlation::{CorrelationError, Correlator, StatusObserver};
use crate::infrastructure::WebSocketTransport;
use crate::ports::outbound::FrameTransport;

pub struct GameClient<T = WebSocketTransport> {
    correlator: Correlator<T, Sc2Codec>,
    port: u16,
    poll_interval: Duration,
    response_timeout: Option<Duration>,
}

impl GameClient {
    /// Connect to the game API described by `config`, retrying while the game
    /// process starts up.
    pub async fn connect(config: &ClientConfig) -> Result<Self, ClientError> {
        let url = config.ws_url()?;
        let transport = WebSocketTransport::connect(&url, &config.retry).await?;
        Ok(Self::with_transport(transport, config))
    }
}

impl<T: FrameTransport> GameClient<T> {
    /// Build a client over an already established connection.
    pub fn with_transport(transport: T, config: &ClientConfig) -> Self {
        Self {
            correlator: Correlator::new(transport, Sc2Codec::new()),
            port: config.port,
            poll_interval: config.poll_interval,
            response_timeout: config.response_timeout,
        }
    }

    /// Status reported by the most recent response.
    pub fn status(&self) -> Status {
        self.correlator.current_status()
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn status_observer(&self) -> StatusObserver {
        self.correlator.status_observer()
    }

    /// Issue a request without waiting. Several requests may be in flight.
    pub async fn request(&mut self, request: &Request) -> Result<RequestId, ClientError> {
        Ok(self.correlator.request(request).await?)
    }

    /// Retrieve the response for `id`; each response can be retrieved once.
    pub async fn response(&mut self, id: RequestId) -> Result<Response, ClientError> {
        let response = match self.response_timeout {
            Some(timeout) => self.correlator.response_with_timeout(id, timeout).await?,
            None => self.correlator.response(id).await?,
        };
        Ok(response)
    }

    pub async fn req_resp(&mut self, request: &Request) -> Result<Response, ClientError> {
        let id = self.request(request).await?;
        self.response(id).await
    }

    pub async fn ping(&mut self) -> Result<PingResult, ClientError> {
        match payload(self.req_resp(&Request::Ping).await?, "ping")? {
            ResponsePayload::Ping(result) => Ok(result),
            other => Err(unexpected("ping", &other)),
        }
    }

    /// Maps the game can load, local and Battle.net.
    pub async fn available_maps(&mut self) -> Result<AvailableMaps, ClientError> {
        match payload(self.req_resp(&Request::AvailableMaps).await?, "available_maps")? {
            ResponsePayload::AvailableMaps(maps) => Ok(maps),
            other => Err(unexpected("available_maps", &other)),
        }
    }

    pub async fn create_game(&mut self, settings: CreateGameSettings) -> Result<(), ClientError> {
        let response = self.req_resp(&Request::CreateGame { settings }).await?;
        match payload(response, "create_game")? {
            ResponsePayload::CreateGame(result) => match result.error {
                Some(code) => Err(ClientError::CreateGame {
                    code,
                    details: result.error_details,
                }),
                None => Ok(()),
            },
            other => Err(unexpected("create_game", &other)),
        }
    }

    /// Join a game and return the assigned player id.
    pub async fn join_game(&mut self, settings: JoinGameSettings) -> Result<u32, ClientError> {
        let id = self.join_game_request(settings).await?;
        self.join_game_response(id).await
    }

    /// Request half of [`join_game`](Self::join_game).
    ///
    /// Multi-player setups send every join before waiting on any of them.
    pub async fn join_game_request(
        &mut self,
        settings: JoinGameSettings,
    ) -> Result<RequestId, ClientError> {
        self.request(&Request::JoinGame { settings }).await
    }

    /// Response half of [`join_game`](Self::join_game).
    pub async fn join_game_response(&mut self, id: RequestId) -> Result<u32, ClientError> {
        match payload(self.response(id).await?, "join_game")? {
            ResponsePayload::JoinGame(result) => match result.error {
                Some(code) => Err(ClientError::JoinGame {
                    code,
                    details: result.error_details,
                }),
                None => Ok(result.player_id),
            },
            other => Err(unexpected("join_game", &other)),
        }
    }

    /// Advance the simulation, returning the new game loop.
    pub async fn step(&mut self, count: u32) -> Result<u32, ClientError> {
        match payload(self.req_resp(&Request::Step { count }).await?, "step")? {
            ResponsePayload::Step { simulation_loop } => Ok(simulation_loop),
            other => Err(unexpected("step", &other)),
        }
    }

    pub async fn leave_game(&mut self) -> Result<(), ClientError> {
        match payload(self.req_resp(&Request::LeaveGame).await?, "leave_game")? {
            ResponsePayload::LeaveGame => Ok(()),
            other => Err(unexpected("leave_game", &other)),
        }
    }

    /// Ask the game process to exit.
    ///
    /// The response is never awaited. If the connection outlives the request,
    /// its frame is buffered once a later retrieval drains past it and stays
    /// there until the connection is closed.
    pub async fn quit(&mut self) {
        match self.request(&Request::Quit).await {
            Ok(id) => tracing::debug!(request_id = %id, "Quit requested"),
            Err(e) => tracing::warn!(error = %e, "Failed to send quit request"),
        }
    }

    /// Block until the connection to the game is lost.
    pub async fn wait_for_close(&mut self) {
        self.poll_until(|_| false).await;
    }

    /// Block until the game reports it has ended, or the connection is lost.
    pub async fn wait_for_end(&mut self) {
        self.poll_until(|status| status == Status::Ended).await;
    }

    /// Ping every poll interval until `done` accepts the status or the
    /// connection is lost.
    ///
    /// A ping whose response times out is not re-sent; the next round keeps
    /// waiting on the same identifier so no stray response is left buffered.
    /// Other failures (a frame that does not decode, say) are logged and the
    /// polling carries on.
    async fn poll_until<F>(&mut self, done: F)
    where
        F: Fn(Status) -> bool,
    {
        let mut outstanding: Option<RequestId> = None;
        loop {
            let id = match outstanding.take() {
                Some(id) => id,
                None => match self.request(&Request::Ping).await {
                    Ok(id) => id,
                    Err(e) => {
                        tracing::debug!(error = %e, "Ping could not be sent, connection gone");
                        return;
                    }
                },
            };

            match self.response(id).await {
                Ok(_) => {}
                Err(ClientError::Correlation(CorrelationError::TimedOut(_))) => {
                    tracing::debug!(request_id = %id, "Ping timed out, still waiting");
                    outstanding = Some(id);
                }
                Err(e) if e.is_connection_lost() => {
                    tracing::debug!(error = %e, "Connection lost while polling");
                    return;
                }
                Err(e) => tracing::warn!(request_id = %id, error = %e, "Ping failed, polling on"),
            }

            let status = self.status();
            if done(status) {
                tracing::info!(%status, "Game reached awaited status");
                return;
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    pub async fn close(&mut self) -> Result<(), ClientError> {
        Ok(self.correlator.close().await?)
    }
}

/// Unwrap the payload, surfacing API-level errors first.
fn payload(response: Response, expected: &'static str) -> Result<ResponsePayload, ClientError> {
    if response.has_errors() {
        return Err(ClientError::Api(response.error));
    }
    response.payload.ok_or(ClientError::UnexpectedResponse {
        expected,
        actual: "empty",
    })
}

fn unexpected(expected: &'static str, actual: &ResponsePayload) -> ClientError {
    ClientError::UnexpectedResponse {
        expected,
        actual: actual.kind(),
    }
}
