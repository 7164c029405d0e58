use crate::integration::{connect, create_test_broker, disconnect, send, settle};
use crate::utils::CLAIM_PROMPT;

#[tokio::test]
async fn new_connection_receives_the_claim_prompt() {
    let (tx, output) = create_test_broker();

    let a = connect(&tx).await;
    settle().await;

    assert_eq!(output.texts_for(a).await, vec![CLAIM_PROMPT.to_string()]);
}

#[tokio::test]
async fn paired_clients_are_mutually_reachable() {
    let (tx, output) = create_test_broker();

    let a = connect(&tx).await;
    let b = connect(&tx).await;

    send(&tx, a, r#"{"roomId":"abc123"}"#).await;
    send(&tx, b, r#"{"roomId":"abc123"}"#).await;

    let drive = r#"{"driveCmd":{"l":0.5,"r":0.5}}"#;
    send(&tx, a, drive).await;
    assert!(output.wait_for_relayed(b, 1, 1000).await);

    // Verbatim, to the other slot only, never echoed to the sender.
    assert_eq!(output.relayed_for(b).await, vec![drive.to_string()]);
    assert!(output.relayed_for(a).await.is_empty());

    send(&tx, b, r#"{"command":"LOGS"}"#).await;
    assert!(output.wait_for_relayed(a, 1, 1000).await);
    assert_eq!(
        output.relayed_for(a).await,
        vec![r#"{"command":"LOGS"}"#.to_string()]
    );
}

#[tokio::test]
async fn third_claim_on_a_full_room_is_rejected() {
    let (tx, output) = create_test_broker();

    let a = connect(&tx).await;
    let b = connect(&tx).await;
    let c = connect(&tx).await;

    send(&tx, a, r#"{"roomId":"R"}"#).await;
    send(&tx, b, r#"{"roomId":"R"}"#).await;
    send(&tx, c, r#"{"roomId":"R"}"#).await;
    settle().await;

    // The pair does not observe the rejected claim.
    assert!(output.relayed_for(a).await.is_empty());
    assert!(output.relayed_for(b).await.is_empty());

    // The room still relays between its two members, and the rejected
    // connection sees none of it.
    send(&tx, a, r#"{"command":"NOISE"}"#).await;
    assert!(output.wait_for_relayed(b, 1, 1000).await);
    assert!(output.relayed_for(c).await.is_empty());
}

#[tokio::test]
async fn disconnect_tears_the_room_down_entirely() {
    let (tx, output) = create_test_broker();

    let a = connect(&tx).await;
    let b = connect(&tx).await;
    send(&tx, a, r#"{"roomId":"R"}"#).await;
    send(&tx, b, r#"{"roomId":"R"}"#).await;

    disconnect(&tx, a).await;
    assert!(output.wait_for_close(b, 1000).await);

    // A later claim of the same id gets a fresh room, not a stale
    // rejoin.
    let d = connect(&tx).await;
    let e = connect(&tx).await;
    send(&tx, d, r#"{"roomId":"R"}"#).await;
    send(&tx, e, r#"{"roomId":"R"}"#).await;

    send(&tx, d, r#"{"driveCmd":{"l":1.0,"r":0.0}}"#).await;
    assert!(output.wait_for_relayed(e, 1, 1000).await);
}

#[tokio::test]
async fn solo_member_messages_relay_nowhere() {
    let (tx, output) = create_test_broker();

    let a = connect(&tx).await;
    let b = connect(&tx).await;
    send(&tx, a, r#"{"roomId":"lonely"}"#).await;

    send(&tx, a, r#"{"command":"LOGS"}"#).await;
    settle().await;

    // The roomed sender relays only within its room; the unroomed
    // bystander must not receive room traffic.
    assert!(output.relayed_for(b).await.is_empty());
    assert!(output.relayed_for(a).await.is_empty());
}
