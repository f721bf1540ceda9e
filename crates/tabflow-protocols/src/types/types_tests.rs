use super::*;

#[test]
fn test_tab_serializes_camel_case() {
    let mut tab = Tab::new("12", "https://react.dev", "React");
    tab.fav_icon_url = Some("https://react.dev/favicon.ico".to_string());
    tab.group_id = Some(4);

    let json = serde_json::to_value(&tab).unwrap();
    assert_eq!(json["id"], "12");
    assert_eq!(json["favIconUrl"], "https://react.dev/favicon.ico");
    assert_eq!(json["groupId"], 4);
}

#[test]
fn test_tab_optional_fields_skipped() {
    let tab = Tab::new("1", "https://a.example", "A");
    let json = serde_json::to_string(&tab).unwrap();
    assert!(!json.contains("favIconUrl"));
    assert!(!json.contains("groupId"));
}

#[test]
fn test_tab_native_id() {
    assert_eq!(Tab::new("42", "", "").native_id(), Some(42));
    assert_eq!(Tab::new("abc", "", "").native_id(), None);
}

#[test]
fn test_tab_matches_title_or_url() {
    let tab = Tab::new("1", "https://github.com/rust-lang", "The Rust Project");
    assert!(tab.matches("rust"));
    assert!(tab.matches("GITHUB"));
    assert!(!tab.matches("python"));
}

#[test]
fn test_tab_group_roundtrip_field_names() {
    let json = r##"{"id":"group-0-1","name":"Dev","description":"d","color":"#111","tabIds":["1","3"]}"##;
    let group: TabGroup = serde_json::from_str(json).unwrap();
    assert_eq!(group.tab_ids, vec!["1", "3"]);
    assert!(serde_json::to_string(&group).unwrap().contains("\"tabIds\""));
}

#[test]
fn test_ai_result_parses_tab_indices() {
    let json = r##"{"groups":[{"name":"Dev","description":"d","color":"#111","tabIndices":[0,2]}]}"##;
    let result: AIResult = serde_json::from_str(json).unwrap();
    assert_eq!(result.groups.len(), 1);
    assert_eq!(result.groups[0].tab_indices, vec![0, 2]);
}

#[test]
fn test_ai_result_rejects_negative_index() {
    let json = r#"{"groups":[{"name":"Dev","tabIndices":[-1]}]}"#;
    assert!(serde_json::from_str::<AIResult>(json).is_err());
}

#[test]
fn test_stream_update_progress_frames() {
    let frame: StreamUpdate =
        serde_json::from_str(r#"{"status":"analyzing","message":"Using system key (Rotation 1/2)..."}"#)
            .unwrap();
    assert_eq!(frame.status(), "analyzing");
    assert_eq!(frame.message(), Some("Using system key (Rotation 1/2)..."));
    assert!(!frame.is_terminal());

    let frame: StreamUpdate = serde_json::from_str(r#"{"status":"retry"}"#).unwrap();
    assert_eq!(frame, StreamUpdate::Retry { message: None });
}

#[test]
fn test_stream_update_success_frame() {
    let line = r#"{"status":"success","data":{"groups":[]},"sources":[{"web":{"uri":"https://x"}}]}"#;
    let frame: StreamUpdate = serde_json::from_str(line).unwrap();
    assert!(frame.is_terminal());
    match frame {
        StreamUpdate::Success { data, sources } => {
            assert!(data.groups.is_empty());
            assert_eq!(sources.len(), 1);
        }
        other => panic!("unexpected frame: {:?}", other),
    }
}

#[test]
fn test_stream_update_success_requires_data() {
    assert!(serde_json::from_str::<StreamUpdate>(r#"{"status":"success"}"#).is_err());
}

#[test]
fn test_stream_update_unknown_status_rejected() {
    assert!(serde_json::from_str::<StreamUpdate>(r#"{"status":"done"}"#).is_err());
    assert!(serde_json::from_str::<StreamUpdate>(r#"{"message":"no tag"}"#).is_err());
}

#[test]
fn test_stream_update_ndjson_line() {
    let line = StreamUpdate::error("boom").to_ndjson_line().unwrap();
    assert_eq!(line, "{\"status\":\"error\",\"message\":\"boom\"}\n");
}

#[test]
fn test_connection_status_default_and_display() {
    assert_eq!(ConnectionStatus::default(), ConnectionStatus::Disconnected);
    assert_eq!(ConnectionStatus::Connecting.to_string(), "connecting");
    assert_eq!(
        serde_json::to_string(&ConnectionStatus::Connected).unwrap(),
        "\"connected\""
    );
}
