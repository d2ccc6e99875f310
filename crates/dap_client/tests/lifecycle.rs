use dap_client::{Client, ClientConfig, ClientState, LogicalEvent, ResponseDelivery};
use serde_json::json;

fn frame(body: &serde_json::Value) -> Vec<u8> {
    dap_client::encode_frame(body)
}

fn collect(client: &mut Client, bytes: &[u8]) -> Vec<LogicalEvent> {
    client.recv(bytes).collect::<Result<_, _>>().unwrap()
}

#[test]
fn full_lifecycle_from_construction_to_shutdown() {
    let mut client = Client::new(ClientConfig::default());
    assert_eq!(client.state(), ClientState::WaitingForInitialized);

    let outbound = client.send();
    let text = String::from_utf8(outbound).unwrap();
    assert!(text.contains("\"seq\":1"));
    assert!(text.contains("\"command\":\"initialize\""));

    let events = collect(
        &mut client,
        &frame(&json!({
            "type": "response", "seq": 1, "request_seq": 1,
            "command": "initialize", "success": true,
            "body": {"supportsConfigurationDoneRequest": true}
        })),
    );
    assert_eq!(events, vec![LogicalEvent::Initialized]);
    assert_eq!(client.state(), ClientState::Normal);

    let seq = client.launch("main.py", None).unwrap();
    assert_eq!(seq, 2);
    let outbound = client.send();
    assert!(String::from_utf8(outbound).unwrap().contains("\"seq\":2"));

    let events = collect(
        &mut client,
        &frame(&json!({
            "type": "response", "seq": 3, "request_seq": 2,
            "command": "launch", "success": true
        })),
    );
    assert_eq!(
        events,
        vec![LogicalEvent::Response(ResponseDelivery {
            command: "launch".to_string(),
            request_seq: 2,
            success: true,
            message: None,
            body: None,
            unsolicited: false,
        })]
    );

    let seq = client.disconnect().unwrap();
    assert_eq!(seq, 3);
    assert_eq!(client.state(), ClientState::WaitingForShutdown);

    let events = collect(
        &mut client,
        &frame(&json!({
            "type": "response", "seq": 4, "request_seq": 3,
            "command": "disconnect", "success": true
        })),
    );
    assert_eq!(events, vec![LogicalEvent::Terminated]);
    assert_eq!(client.state(), ClientState::Shutdown);
}

#[test]
fn unsolicited_event_after_initialize() {
    let mut client = Client::new(ClientConfig::default());
    let _ = client.send();
    let _ = collect(
        &mut client,
        &frame(&json!({
            "type": "response", "seq": 1, "request_seq": 1,
            "command": "initialize", "success": true
        })),
    );

    let events = collect(
        &mut client,
        &frame(&json!({
            "type": "event", "seq": 2, "event": "output",
            "body": {"category": "stdout", "output": "hello\n"}
        })),
    );
    match &events[0] {
        LogicalEvent::Event(e) => {
            assert_eq!(e.event, "output");
            assert_eq!(e.body.as_ref().unwrap()["output"], "hello\n");
        }
        other => panic!("expected event, got {other:?}"),
    }
}

#[test]
fn partial_framing_across_two_recv_calls() {
    let mut client = Client::new(ClientConfig::default());
    let _ = client.send();
    let _ = collect(
        &mut client,
        &frame(&json!({
            "type": "response", "seq": 1, "request_seq": 1,
            "command": "initialize", "success": true
        })),
    );

    let stopped = frame(&json!({
        "type": "event", "seq": 2, "event": "stopped",
        "body": {"reason": "breakpoint"}
    }));
    let (first, rest) = stopped.split_at(20);

    let events: Vec<_> = client.recv(first).collect::<Result<_, _>>().unwrap();
    assert!(events.is_empty());

    let events = collect(&mut client, rest);
    assert_eq!(events.len(), 1);
    assert!(matches!(&events[0], LogicalEvent::Event(e) if e.event == "stopped"));
}

#[test]
fn two_frames_in_one_chunk_yield_two_events_in_order() {
    let mut client = Client::new(ClientConfig::default());
    let _ = client.send();
    let _ = collect(
        &mut client,
        &frame(&json!({
            "type": "response", "seq": 1, "request_seq": 1,
            "command": "initialize", "success": true
        })),
    );

    let mut chunk = frame(&json!({"type": "event", "seq": 2, "event": "stopped"}));
    chunk.extend(frame(&json!({"type": "event", "seq": 3, "event": "continued"})));

    let events = collect(&mut client, &chunk);
    assert_eq!(events.len(), 2);
    assert!(matches!(&events[0], LogicalEvent::Event(e) if e.event == "stopped"));
    assert!(matches!(&events[1], LogicalEvent::Event(e) if e.event == "continued"));
}

#[test]
fn error_response_surfaces_as_failed_generic_delivery() {
    let mut client = Client::new(ClientConfig::default());
    let _ = client.send();
    let _ = collect(
        &mut client,
        &frame(&json!({
            "type": "response", "seq": 1, "request_seq": 1,
            "command": "initialize", "success": true
        })),
    );

    client.evaluate("1 + 1", None, None).unwrap();
    let _ = client.send();

    let events = collect(
        &mut client,
        &frame(&json!({
            "type": "response", "seq": 3, "request_seq": 2,
            "command": "evaluate", "success": false, "message": "cancelled"
        })),
    );
    match &events[0] {
        LogicalEvent::Response(r) => {
            assert_eq!(r.command, "evaluate");
            assert!(!r.success);
            assert_eq!(r.message.as_deref(), Some("cancelled"));
            assert!(!r.unsolicited);
        }
        other => panic!("expected response, got {other:?}"),
    }
}
