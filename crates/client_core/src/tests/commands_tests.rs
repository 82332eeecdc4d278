use super::*;
use crate::test_support::{Harness, RecordingConnector, SentLine};
use pretty_assertions::assert_eq;
use shared::{error::ErrorCode, protocol::DisplayEvent};

const SERVER: &str = "irc.example.org";

fn connected() -> Harness {
    let mut harness = Harness::new();
    harness
        .orchestrator
        .connect(SERVER, &ConnectOptions::default())
        .expect("connect");
    harness.display.clear();
    harness
}

fn run(harness: &mut Harness, buffer: BufferRef, raw: &str) -> CoreResult<()> {
    harness.orchestrator.dispatch_input(&buffer, raw)
}

#[test]
fn slash_predicate() {
    let predicate = SlashCommandPredicate;
    assert!(predicate.is_command("/join #rust"));
    assert!(predicate.is_command("/"));
    assert!(!predicate.is_command("//not a command"));
    assert!(!predicate.is_command("hello /world"));
    assert!(!predicate.is_command(""));
}

#[test]
fn split_command_separates_name_and_args() {
    assert_eq!(split_command("/msg bob hi there"), ("msg", "bob hi there"));
    assert_eq!(split_command("/close"), ("close", ""));
    assert_eq!(split_command("/query   #a  "), ("query", "#a"));
}

#[test]
fn connect_uses_configured_identity_and_nick_override() {
    let identity = ConnectOptions {
        realname: Some("Alice Liddell".into()),
        ..ConnectOptions::default()
    };
    let mut harness = Harness::with_commands(
        RecordingConnector::default(),
        std::sync::Arc::new(BuiltinCommands::new(identity)),
    );

    run(
        &mut harness,
        BufferRef::in_default_scope("status"),
        "/connect irc.example.org alice",
    )
    .expect("connect command");

    let config = harness
        .orchestrator
        .connections()
        .config(SERVER)
        .expect("config");
    assert_eq!(config.nick, "alice");
    assert_eq!(config.username, "communique");
    assert_eq!(config.realname, "Alice Liddell");
    assert!(harness.orchestrator.buffer_exists(&BufferRef::server(SERVER)));
}

#[test]
fn connect_without_server_is_usage_error() {
    let mut harness = Harness::new();

    let err = run(&mut harness, BufferRef::in_default_scope("x"), "/connect")
        .expect_err("missing server");
    assert_eq!(err.code(), ErrorCode::Command);
    assert_eq!(err.to_string(), "usage: /connect <server> [nick]");
}

#[test]
fn query_creates_focused_buffer_under_current_server() {
    let mut harness = connected();

    run(&mut harness, BufferRef::server(SERVER), "/query bob").expect("query");
    run(&mut harness, BufferRef::server(SERVER), "/JOIN bob").expect("join existing");

    let events = harness.display.events();
    assert_eq!(events.len(), 1);
    assert!(matches!(
        &events[0],
        DisplayEvent::BufferCreated(created) if created.name == "bob" && created.switch
    ));
    assert_eq!(
        harness.orchestrator.buffers().buffers(SERVER),
        ["server", "bob"]
    );
    assert!(harness.connector.sent().is_empty());
}

#[test]
fn close_deletes_buffer() {
    let mut harness = connected();
    run(&mut harness, BufferRef::server(SERVER), "/query #chat").expect("query");

    run(&mut harness, BufferRef::new(SERVER, "#chat"), "/close #chat").expect("close");

    assert!(!harness
        .orchestrator
        .buffer_exists(&BufferRef::new(SERVER, "#chat")));
}

#[test]
fn close_missing_buffer_is_reported_in_server_console() {
    let mut harness = connected();

    run(&mut harness, BufferRef::server(SERVER), "/close #gone").expect("close is handled");

    let messages = harness.display.messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].0, BufferRef::server(SERVER));
    assert_eq!(
        messages[0].1.message,
        "cannot close #gone: buffer irc.example.org-#gone does not exist"
    );
}

#[test]
fn close_missing_buffer_without_console_returns_error() {
    let mut harness = Harness::new();

    let err = run(&mut harness, BufferRef::in_default_scope("x"), "/close y")
        .expect_err("no console");
    assert!(err.is_not_found());
}

#[test]
fn msg_sends_and_opens_target_buffer() {
    let mut harness = connected();

    run(
        &mut harness,
        BufferRef::server(SERVER),
        "/msg bob  hello  there",
    )
    .expect("msg");

    assert_eq!(
        harness.connector.sent(),
        vec![SentLine {
            server_id: SERVER.into(),
            target: "bob".into(),
            text: "hello  there".into(),
        }]
    );
    assert!(harness.orchestrator.buffer_exists(&BufferRef::new(SERVER, "bob")));
}

#[test]
fn msg_without_connection_fails_without_creating_buffer() {
    let mut harness = Harness::new();

    let err = run(&mut harness, BufferRef::new("nowhere", "x"), "/msg bob hi")
        .expect_err("no connection");

    assert_eq!(err.code(), ErrorCode::UnknownConnection);
    assert!(harness.display.events().is_empty());
}

#[test]
fn msg_without_text_is_usage_error() {
    let mut harness = connected();

    let err = run(&mut harness, BufferRef::server(SERVER), "/msg bob").expect_err("usage");
    assert_eq!(err.code(), ErrorCode::Command);
}

#[test]
fn unknown_command_is_rejected() {
    let mut harness = connected();

    let err = run(&mut harness, BufferRef::server(SERVER), "/dance").expect_err("unknown");
    assert_eq!(err.to_string(), "unknown command /dance");
    assert!(harness.connector.sent().is_empty());
}

#[test]
fn double_slash_is_sent_verbatim() {
    let mut harness = connected();

    run(&mut harness, BufferRef::new(SERVER, "#chat"), "//shrug").expect("send");

    assert_eq!(harness.connector.sent()[0].text, "//shrug");
}
