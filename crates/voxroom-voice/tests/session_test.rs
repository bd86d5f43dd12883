use voxroom_types::{Speaker, VoiceActivity};
use voxroom_voice::{
    LiveKitConnector, MediaConfig, MediaConnector, MediaEvent, RoomOptions, VoiceError,
};

const DEFAULT_URL: &str = "ws://localhost:7880";

#[test]
fn test_connect_mounts_audio_only_session() {
    let connector = LiveKitConnector::new();
    let session = connector
        .connect(RoomOptions::audio_only(DEFAULT_URL, "abc"))
        .expect("connect should succeed");

    assert!(session.is_connected());
    assert_eq!(session.token(), "abc");
    assert!(session.options().audio);
    assert!(!session.options().video);
    assert_eq!(session.options().server_url, DEFAULT_URL);
}

#[test]
fn test_connect_rejects_empty_token() {
    let connector = LiveKitConnector::new();
    let err = connector
        .connect(RoomOptions::audio_only(DEFAULT_URL, "  "))
        .unwrap_err();
    assert_eq!(err, VoiceError::EmptyToken);
}

#[test]
fn test_connect_rejects_missing_url() {
    let connector = LiveKitConnector::new();
    let err = connector
        .connect(RoomOptions::audio_only("", "abc"))
        .unwrap_err();
    assert_eq!(err, VoiceError::MissingServerUrl);
}

#[tokio::test]
async fn test_events_reach_subscribers_in_order() {
    let connector = LiveKitConnector::new();
    let session = connector
        .connect(RoomOptions::audio_only(DEFAULT_URL, "abc"))
        .unwrap();

    let mut rx = session.subscribe();
    let sender = session.event_sender().unwrap();

    assert!(sender.voice_activity(true, false));
    assert!(sender.transcript(Speaker::User, "hello"));
    assert!(sender.transcript(Speaker::Assistant, "hi there"));

    assert_eq!(
        rx.recv().await.unwrap(),
        MediaEvent::VoiceActivity(VoiceActivity {
            listening: true,
            speaking: false
        })
    );
    assert_eq!(
        rx.recv().await.unwrap(),
        MediaEvent::Transcript {
            speaker: Speaker::User,
            text: "hello".to_string()
        }
    );
    assert_eq!(
        rx.recv().await.unwrap(),
        MediaEvent::Transcript {
            speaker: Speaker::Assistant,
            text: "hi there".to_string()
        }
    );
}

#[test]
fn test_send_without_subscribers_reports_false() {
    let session = LiveKitConnector::new()
        .connect(RoomOptions::audio_only(DEFAULT_URL, "abc"))
        .unwrap();
    let sender = session.event_sender().unwrap();
    assert!(!sender.voice_activity(false, true));
}

#[test]
fn test_disconnected_session_refuses_new_senders() {
    let mut session = LiveKitConnector::new()
        .connect(RoomOptions::audio_only(DEFAULT_URL, "abc"))
        .unwrap();
    session.disconnect();
    assert!(!session.is_connected());
    assert_eq!(session.event_sender().unwrap_err(), VoiceError::NotConnected);

    // Disconnecting twice is a no-op.
    session.disconnect();
    assert!(!session.is_connected());
}

#[test]
fn test_media_config_from_toml() {
    let config: MediaConfig = toml::from_str(r#"server_url = "wss://media.example""#).unwrap();
    assert!(config.is_configured());

    let config: MediaConfig = toml::from_str("").unwrap();
    assert!(!config.is_configured());
}
