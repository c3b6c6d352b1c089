//! End-to-end tests: a scripted mock game server drives a [`QuizClient`]
//! through a full game over a real loopback WebSocket.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::WebSocketStream;

use mathrush::prelude::*;

type ServerWs = WebSocketStream<TcpStream>;

// =========================================================================
// Helpers
// =========================================================================

/// Binds a mock game server on a random port; the returned task resolves
/// to the server side of the socket once a client connects.
async fn spawn_server() -> (ClientConfig, JoinHandle<ServerWs>) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("should bind");
    let port = listener.local_addr().expect("should have addr").port();

    let handle = tokio::spawn(async move {
        let (stream, _) = listener.accept().await.expect("should accept");
        tokio_tungstenite::accept_async(stream)
            .await
            .expect("handshake should succeed")
    });

    (ClientConfig::new("127.0.0.1", port), handle)
}

// =========================================================================
// Full game flow
// =========================================================================

#[tokio::test]
async fn test_scripted_game_drives_the_full_state_machine() {
    let (config, server) = spawn_server().await;

    let client = QuizClient::connect(&config, "Ada")
        .await
        .expect("should connect");
    let mut ws = server.await.expect("server task");

    let mut multipliers = vec![11];
    multipliers.extend_from_slice(&2.0f32.to_be_bytes());
    multipliers.extend_from_slice(&1.5f32.to_be_bytes());

    let script: Vec<Vec<u8>> = vec![
        // HubHello
        vec![0],
        // LobbyHello: Ada (id 1), Bob (id 2)
        vec![1, 2, 1, 3, b'A', b'd', b'a', 2, 3, b'B', b'o', b'b'],
        // NewPlayer: Eve (id 3)
        vec![2, 3, 3, b'E', b'v', b'e'],
        // NewQuestion: difficulty 2, "3 + 4"
        vec![4, 2, 0, 5, b'3', b' ', b'+', b' ', b'4'],
        // CorrectSubmission: score 50, coins 3
        vec![3, 0, 0, 0, 50, 0, 0, 0, 3],
        // StatusChanged: [2]
        vec![6, 0, 1, 0, 2],
        // OpponentStatusChanged: Bob gets [1, 2]
        vec![7, 2, 0, 2, 0, 1, 0, 2],
        // MultipliersChanged: 2.0 / 1.5
        multipliers,
        // OpponentScoreChanged: Bob at 40
        vec![10, 2, 0, 0, 0, 40],
        // OpponentEliminated: Eve out
        vec![9, 3],
        // PurchaseConfirmed: coins now 480
        vec![5, 0, 0, 1, 224],
        // Eliminated: self out in place 2
        vec![8, 2],
    ];
    for frame in script {
        ws.send(Message::Binary(frame.into()))
            .await
            .expect("server send");
    }
    ws.close(None).await.expect("server close");

    // The stream is ordered, so once the close has been observed every
    // frame before it has been folded into the state.
    assert_eq!(client.wait_closed().await, CloseReason::Server);

    let state = client.snapshot();
    assert_eq!(state.screen, Screen::Game);
    assert_eq!(
        state.question,
        Some(Question {
            difficulty: 2,
            text: "3 + 4".into(),
        })
    );
    assert!(state.answer_input.is_empty());

    assert_eq!(state.score, 50);
    assert_eq!(state.coins, 480);
    assert_eq!(state.effects, vec![EffectId(2)]);
    assert_eq!(state.score_multiplier, 2.0);
    assert_eq!(state.coin_multiplier, 1.5);
    assert_eq!(state.eliminated_place, Some(2));

    assert_eq!(state.roster.len(), 3);

    let ada = &state.roster[&PlayerId(1)];
    assert_eq!(ada.name, "Ada");
    assert!(ada.effects.is_empty());
    assert!(!ada.eliminated);

    let bob = &state.roster[&PlayerId(2)];
    assert_eq!(bob.name, "Bob");
    assert_eq!(bob.effects, vec![EffectId(1), EffectId(2)]);
    assert_eq!(bob.score, 40);
    assert!(!bob.eliminated);

    let eve = &state.roster[&PlayerId(3)];
    assert_eq!(eve.name, "Eve");
    assert!(eve.eliminated);
}

#[tokio::test]
async fn test_senders_reach_the_server_byte_correct() {
    let (config, server) = spawn_server().await;

    let client = QuizClient::connect(&config, "Ada")
        .await
        .expect("should connect");
    let mut ws = server.await.expect("server task");

    client.send_submit(7).expect("send");
    client
        .send_purchase(Powerup::HardMode, PlayerId(2))
        .expect("send");
    client.send_skip_wait().expect("send");

    let expected: [&[u8]; 3] = [&[1, 0, 0, 0, 7], &[2, 6, 2], &[3]];
    for frame in expected {
        let message = tokio::time::timeout(Duration::from_secs(5), ws.next())
            .await
            .expect("timed out")
            .expect("stream open")
            .expect("no transport error");
        assert_eq!(message.into_data().as_ref(), frame);
    }
}

#[tokio::test]
async fn test_close_is_reflected_on_both_handles() {
    let (config, server) = spawn_server().await;

    let client = QuizClient::connect(&config, "Ada")
        .await
        .expect("should connect");
    let _ws = server.await.expect("server task");

    client.close();
    assert_eq!(client.wait_closed().await, CloseReason::Local);
    assert!(client.session().is_closed());
    assert!(matches!(
        client.send_submit(1),
        Err(MathrushError::Client(ClientError::Closed))
    ));
}
