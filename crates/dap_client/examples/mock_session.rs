//! Drives a `Client` against an in-process mock adapter to show the
//! byte-in/byte-out usage pattern: alternate `send()` / `recv()` calls, no
//! socket or process involved.

use dap_client::{encode_frame, Client, ClientConfig, LogicalEvent};
use serde_json::json;

/// Stands in for a real debug adapter: echoes back a canned success
/// response for whatever request it is handed.
fn mock_adapter_reply(request_bytes: &[u8]) -> Vec<u8> {
    let text = String::from_utf8_lossy(request_bytes);
    let body_start = text.find("\r\n\r\n").map(|i| i + 4).unwrap_or(0);
    let request: serde_json::Value = serde_json::from_str(&text[body_start..]).unwrap();

    let command = request["command"].as_str().unwrap_or_default();
    let request_seq = request["seq"].as_u64().unwrap_or_default();

    encode_frame(&json!({
        "type": "response",
        "seq": request_seq + 100,
        "request_seq": request_seq,
        "command": command,
        "success": true,
        "body": {},
    }))
}

fn main() {
    let mut client = Client::builder()
        .client_name("example-host")
        .adapter_id("mock")
        .build();

    let init_request = client.send();
    let init_response = mock_adapter_reply(&init_request);
    for event in client.recv(&init_response) {
        match event.unwrap() {
            LogicalEvent::Initialized => println!("adapter initialized"),
            other => println!("unexpected during init: {other:?}"),
        }
    }

    client.launch("main.py", None).unwrap();
    let launch_request = client.send();
    let launch_response = mock_adapter_reply(&launch_request);
    for event in client.recv(&launch_response) {
        println!("{:?}", event.unwrap());
    }

    client.disconnect().unwrap();
    let disconnect_request = client.send();
    let disconnect_response = mock_adapter_reply(&disconnect_request);
    for event in client.recv(&disconnect_response) {
        match event.unwrap() {
            LogicalEvent::Terminated => println!("session terminated"),
            other => println!("unexpected during shutdown: {other:?}"),
        }
    }

    println!("final state: {:?}", client.state());
}
