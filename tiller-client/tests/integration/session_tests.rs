use crate::integration::{create_session, test_config};
use crate::utils::{MockIssuer, MockTransport};
use std::sync::Arc;
use std::time::Duration;
use tiller_client::session::{PeerSession, SessionError, SessionState};
use tiller_core::{DiscreteCommand, DriveCommand, Waypoint};
use tokio::sync::Mutex;
use tokio::time::sleep;

#[tokio::test]
async fn start_fails_fast_when_credential_issuance_fails() {
    let (session, transport) = create_session(MockIssuer::failing());

    let err = session.start().await.expect_err("start should fail");
    assert!(matches!(err, SessionError::Credential(_)));
    assert_eq!(session.state(), SessionState::Disconnected);
    assert_eq!(transport.connect_count(), 0);
}

#[tokio::test]
async fn start_fails_fast_when_connect_fails() {
    let (session, transport) = create_session(MockIssuer::new());
    transport.set_fail_connect(true);

    let err = session.start().await.expect_err("start should fail");
    assert!(matches!(err, SessionError::Connect(_)));
    assert_eq!(session.state(), SessionState::Disconnected);
    assert_eq!(transport.connect_count(), 1);
}

#[tokio::test]
async fn double_start_is_rejected() {
    let (session, _transport) = create_session(MockIssuer::new());

    session.start().await.expect("first start");
    assert!(matches!(
        session.start().await,
        Err(SessionError::AlreadyStarted)
    ));
}

#[tokio::test(start_paused = true)]
async fn probe_retries_forever_until_the_peer_joins() {
    let (session, transport) = create_session(MockIssuer::new());
    session.start().await.expect("start");

    // Half a minute of absence: probes keep firing, no handshake, no
    // error surfaces.
    sleep(Duration::from_secs(35)).await;
    assert!(transport.presence_check_count() >= 3);
    assert_eq!(transport.calls_for("client-connected").await, 0);
    assert!(!session.peer_present());

    // The robot joins; the next probe runs the handshake and caches the
    // advertised cameras.
    transport.set_peer_present(true);
    sleep(Duration::from_secs(11)).await;
    assert!(session.peer_present());
    assert_eq!(transport.calls_for("client-connected").await, 1);
    assert!(session.available_cameras().await.is_some());

    session.stop().await;
}

#[tokio::test(start_paused = true)]
async fn drive_and_discrete_commands_drop_silently_while_peer_absent() {
    let (session, transport) = create_session(MockIssuer::new());
    session.start().await.expect("start");

    session
        .send_drive(DriveCommand::new(0.5, 0.0))
        .await
        .expect("absent peer must not error a drive command");
    session
        .send_command(DiscreteCommand::Logs)
        .await
        .expect("absent peer must not error a discrete command");

    assert_eq!(transport.calls_for("drive-cmd").await, 0);
    assert_eq!(transport.calls_for("cmd").await, 0);

    // Once the peer is ready the same calls go through.
    transport.set_peer_present(true);
    sleep(Duration::from_secs(11)).await;

    session
        .send_drive(DriveCommand::new(0.5, 0.0))
        .await
        .expect("drive");
    assert_eq!(transport.calls_for("drive-cmd").await, 1);
    assert_eq!(
        transport.last_payload_for("drive-cmd").await,
        Some(br#"{"driveCmd":{"l":0.5,"r":0.0}}"#.to_vec())
    );

    session.stop().await;
}

#[tokio::test]
async fn status_returns_a_default_document_while_peer_absent() {
    let (session, transport) = create_session(MockIssuer::new());
    session.start().await.expect("start");

    let telemetry = session.status().await.expect("status");
    assert_eq!(telemetry, serde_json::json!({}));
    assert_eq!(transport.calls_for("status").await, 0);

    session.stop().await;
}

#[tokio::test]
async fn one_shot_actions_are_rejected_while_peer_absent() {
    let (session, _transport) = create_session(MockIssuer::new());
    session.start().await.expect("start");

    let waypoints = [Waypoint::new(47.4979, 19.0402)];
    assert!(matches!(
        session.send_waypoints(&waypoints).await,
        Err(SessionError::PeerUnavailable(_))
    ));
    assert!(matches!(
        session.switch_camera("1").await,
        Err(SessionError::PeerUnavailable(_))
    ));

    session.stop().await;
}

#[tokio::test(start_paused = true)]
async fn telemetry_fans_out_to_observers_and_stops_after_unsubscribe() {
    let (session, transport) = create_session(MockIssuer::new());
    transport.set_peer_present(true);
    transport
        .set_status_body(serde_json::json!({ "battery": 64 }))
        .await;

    session.start().await.expect("start");
    sleep(Duration::from_secs(11)).await;
    assert!(session.peer_present());

    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen2 = seen.clone();
    let id = session
        .on_telemetry(move |t| {
            if let Ok(mut guard) = seen2.try_lock() {
                guard.push(t.clone());
            }
        })
        .await;

    sleep(Duration::from_secs(3)).await;
    let received = seen.lock().await.len();
    assert!(received >= 2);
    assert_eq!(seen.lock().await[0], serde_json::json!({ "battery": 64 }));

    session.off_telemetry(id).await;
    sleep(Duration::from_secs(3)).await;
    assert_eq!(seen.lock().await.len(), received);

    session.stop().await;
}

#[tokio::test(start_paused = true)]
async fn stop_cancels_the_probe_and_poll_loops() {
    let (session, transport) = create_session(MockIssuer::new());
    transport.set_peer_present(true);

    session.start().await.expect("start");
    sleep(Duration::from_secs(12)).await;

    session.stop().await;
    assert_eq!(session.state(), SessionState::Disconnected);
    assert!(!session.peer_present());
    assert_eq!(transport.close_count(), 1);

    let probes = transport.presence_check_count();
    let polls = transport.calls_for("status").await;

    // No orphaned timer keeps firing into the torn-down session.
    sleep(Duration::from_secs(60)).await;
    assert_eq!(transport.presence_check_count(), probes);
    assert_eq!(transport.calls_for("status").await, polls);
}

#[tokio::test]
async fn fresh_credentials_are_reused_across_restarts() {
    let issuer = Arc::new(MockIssuer::new());
    let transport = MockTransport::new();
    let session = PeerSession::new(test_config(), issuer.clone(), Arc::new(transport.clone()));

    session.start().await.expect("start");
    session.stop().await;
    session.start().await.expect("restart");
    session.stop().await;

    // Hour-long TTL: the second start rides the cached credential.
    assert_eq!(issuer.issue_count(), 1);
    assert_eq!(transport.connect_count(), 2);
}

#[tokio::test]
async fn expired_credentials_are_reissued() {
    let issuer = Arc::new(MockIssuer::with_ttl(Duration::ZERO));
    let transport = MockTransport::new();
    let session = PeerSession::new(test_config(), issuer.clone(), Arc::new(transport.clone()));

    session.start().await.expect("start");
    session.stop().await;
    session.start().await.expect("restart");
    session.stop().await;

    assert_eq!(issuer.issue_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn channel_disconnect_notification_tears_the_loops_down() {
    let (session, transport) = create_session(MockIssuer::new());
    transport.set_peer_present(true);

    session.start().await.expect("start");
    sleep(Duration::from_secs(12)).await;
    assert!(session.peer_present());

    session.notify_disconnected().await;
    assert_eq!(session.state(), SessionState::Disconnected);
    assert!(!session.peer_present());

    let probes = transport.presence_check_count();
    let polls = transport.calls_for("status").await;
    sleep(Duration::from_secs(60)).await;
    assert_eq!(transport.presence_check_count(), probes);
    assert_eq!(transport.calls_for("status").await, polls);

    // No silent reconnect: re-establishing takes an explicit start.
    session.start().await.expect("restart");
    assert_eq!(session.state(), SessionState::Connected);
    session.stop().await;
}

#[tokio::test(start_paused = true)]
async fn failed_handshake_puts_the_probe_back_into_retry() {
    let (session, transport) = create_session(MockIssuer::new());
    transport.set_peer_present(true);
    transport.set_fail_calls(true);

    session.start().await.expect("start");
    sleep(Duration::from_secs(25)).await;

    // Every probe sees the peer, attempts the handshake, and falls back
    // to the retry state when it fails.
    assert!(transport.calls_for("client-connected").await >= 2);
    assert!(!session.peer_present());
    assert!(session.available_cameras().await.is_none());

    transport.set_fail_calls(false);
    sleep(Duration::from_secs(11)).await;
    assert!(session.peer_present());
    assert!(session.available_cameras().await.is_some());

    session.stop().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_starts_connect_exactly_once() {
    let (session, transport) = create_session(MockIssuer::new());

    let s1 = session.clone();
    let s2 = session.clone();
    let (r1, r2) = tokio::join!(
        tokio::spawn(async move { s1.start().await }),
        tokio::spawn(async move { s2.start().await }),
    );

    let outcomes = [r1.expect("join"), r2.expect("join")];
    assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
    assert_eq!(transport.connect_count(), 1);

    session.stop().await;
}

#[tokio::test(start_paused = true)]
async fn rpc_calls_time_out_against_a_hung_peer() {
    let (session, transport) = create_session(MockIssuer::new());
    transport.set_peer_present(true);

    session.start().await.expect("start");
    sleep(Duration::from_secs(11)).await;
    assert!(session.peer_present());

    transport.set_hang_calls(true);
    let err = session
        .send_waypoints(&[Waypoint::new(0.0, 0.0)])
        .await
        .expect_err("hung rpc must time out");
    assert!(matches!(err, SessionError::RpcTimeout(_)));

    session.stop().await;
}
