//! End-to-end pipelining against a real WebSocket server on localhost.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio_tungstenite::tungstenite::Message;

use sc2link_client::{
    ClientConfig, ClientError, CorrelationError, FrameTransport, GameClient, RetryConfig,
    TransportError, WebSocketTransport,
};
use sc2link_shared::{
    AvailableMaps, PingResult, Request, RequestId, Response, ResponsePayload, Status,
};

/// Serve one connection, answering each request in order.
async fn spawn_game_server() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        let (tcp, _) = listener.accept().await.unwrap();
        let ws = tokio_tungstenite::accept_async(tcp).await.unwrap();
        let mut transport = WebSocketTransport::from_stream(ws);
        let mut simulation_loop = 0;

        while let Ok(frame) = transport.read_frame().await {
            let request: Request = serde_json::from_slice(&frame).unwrap();
            let payload = match request {
                Request::Ping => ResponsePayload::Ping(PingResult {
                    game_version: "5.0.11".to_string(),
                    ..PingResult::default()
                }),
                Request::AvailableMaps => ResponsePayload::AvailableMaps(AvailableMaps {
                    local_map_paths: vec!["Melee/Flat32.SC2Map".to_string()],
                    battlenet_map_names: Vec::new(),
                }),
                Request::Step { count } => {
                    simulation_loop += count;
                    ResponsePayload::Step { simulation_loop }
                }
                Request::Quit => ResponsePayload::Quit,
                other => panic!("unexpected request {}", other.kind()),
            };
            let status = if simulation_loop >= 5 {
                Status::Ended
            } else {
                Status::InGame
            };
            let bytes = serde_json::to_vec(&Response::new(status, payload)).unwrap();
            if transport.write_frame(bytes).await.is_err() {
                break;
            }
        }
    });

    port
}

fn config(port: u16) -> ClientConfig {
    ClientConfig {
        retry: RetryConfig::no_retry(),
        poll_interval: Duration::from_millis(1),
        ..ClientConfig::new("127.0.0.1", port)
    }
}

fn simulation_loop(response: &Response) -> u32 {
    match response.payload {
        Some(ResponsePayload::Step { simulation_loop }) => simulation_loop,
        ref other => panic!("expected step payload, got {other:?}"),
    }
}

#[tokio::test]
async fn pipelined_requests_match_their_responses() {
    let port = spawn_game_server().await;
    let mut client = GameClient::connect(&config(port)).await.unwrap();
    assert_eq!(client.port(), port);

    let mut ids = Vec::new();
    for _ in 0..4 {
        ids.push(client.request(&Request::Step { count: 1 }).await.unwrap());
    }
    assert_eq!(ids.last(), Some(&RequestId::new(4)));

    for id in ids.iter().rev() {
        let response = client.response(*id).await.unwrap();
        assert_eq!(u64::from(simulation_loop(&response)), id.get());
    }
    assert_eq!(client.status(), Status::InGame);

    let again = client.response(ids[0]).await.unwrap_err();
    assert!(matches!(
        again,
        ClientError::Correlation(CorrelationError::UnknownOrConsumed(_))
    ));

    let ping = client.ping().await.unwrap();
    assert_eq!(ping.game_version, "5.0.11");
    let maps = client.available_maps().await.unwrap();
    assert_eq!(maps.local_map_paths.len(), 1);
}

#[tokio::test]
async fn wait_for_end_returns_once_game_reports_ended() {
    let port = spawn_game_server().await;
    let mut client = GameClient::connect(&config(port)).await.unwrap();

    client.step(5).await.unwrap();
    client.wait_for_end().await;

    assert_eq!(client.status(), Status::Ended);
}

#[tokio::test]
async fn text_frames_and_close_from_server() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    tokio::spawn(async move {
        let (tcp, _) = listener.accept().await.unwrap();
        let mut ws = tokio_tungstenite::accept_async(tcp).await.unwrap();
        // Answer the first request as text, hang up on the second.
        let _ = ws.next().await;
        let body = serde_json::to_string(&Response::new(Status::Launched, ResponsePayload::Quit))
            .unwrap();
        ws.send(Message::Text(body)).await.unwrap();
        let _ = ws.next().await;
        ws.close(None).await.unwrap();
        while let Some(Ok(_)) = ws.next().await {}
    });

    let mut client = GameClient::connect(&config(port)).await.unwrap();
    let response = client.req_resp(&Request::Quit).await.unwrap();
    assert_eq!(response.payload, Some(ResponsePayload::Quit));

    let second = client.request(&Request::Ping).await.unwrap();
    let err = client.response(second).await.unwrap_err();
    assert!(err.is_connection_lost());
    assert!(matches!(
        err,
        ClientError::Correlation(CorrelationError::Read {
            source: TransportError::Closed,
            ..
        })
    ));
}

#[tokio::test]
async fn connect_to_missing_server_gives_up() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let err = GameClient::connect(&config(port)).await.err().unwrap();
    assert!(matches!(
        err,
        ClientError::Transport(TransportError::ConnectExhausted { attempts: 1, .. })
    ));
}
