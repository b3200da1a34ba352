use finplay_contracts::network::{
    ImageKind, PlaybackEventKind, PlaybackNetwork, PlaybackReport,
    StreamRequest,
};
use finplay_core::api::{JellyfinClient, PlaybackReportBody};
use finplay_core::config::ClientConfig;
use finplay_model::{
    ItemId, MediaSourceId, PlaySessionId, TrackId, UserSessionId,
};
use serde_json::json;
use std::collections::HashMap;
use uuid::Uuid;

fn config(server_url: &str) -> ClientConfig {
    ClientConfig {
        server_url: server_url.into(),
        client_name: "finplay".into(),
        device_name: "Living Room".into(),
        device_id: "device-1".into(),
        client_version: "0.1.0".into(),
        request_timeout_secs: 5,
    }
}

fn session_id() -> PlaySessionId {
    PlaySessionId(Uuid::from_u128(0x1234_5678_9abc_def0_1234_5678_9abc_def0))
}

fn stream_request() -> StreamRequest {
    StreamRequest {
        access_token: "secret".into(),
        item_id: ItemId::new("abc123").unwrap(),
        media_source_id: MediaSourceId::new("src9").unwrap(),
        video_track_id: TrackId(0),
        audio_track_id: TrackId(2),
        subtitle_track_id: None,
        bitrate_cap_bits: None,
        play_session_id: session_id(),
    }
}

fn query(url: &url::Url) -> HashMap<String, String> {
    url.query_pairs().into_owned().collect()
}

#[test]
fn stream_url_carries_tracks_session_and_token() {
    let client =
        JellyfinClient::new(&config("https://media.example.org/jellyfin/"))
            .unwrap();
    let handle = client.build_playback_request(&stream_request()).unwrap();

    assert_eq!(handle.url.path(), "/jellyfin/Videos/abc123/master.m3u8");
    let params = query(&handle.url);
    assert_eq!(params["MediaSourceId"], "src9");
    assert_eq!(params["PlaySessionId"], session_id().to_string());
    assert_eq!(params["DeviceId"], "device-1");
    assert_eq!(params["VideoStreamIndex"], "0");
    assert_eq!(params["AudioStreamIndex"], "2");
    assert_eq!(params["api_key"], "secret");
    assert!(!params.contains_key("SubtitleStreamIndex"));
    assert!(!params.contains_key("MaxStreamingBitrate"));

    let (name, value) = &handle.headers[0];
    assert_eq!(name, "X-Emby-Authorization");
    assert!(value.starts_with("MediaBrowser Client=\"finplay\""));
    assert!(value.contains("Token=\"secret\""));
}

#[test]
fn subtitles_and_bitrate_cap_add_parameters() {
    let client = JellyfinClient::new(&config("nas:8096")).unwrap();
    let request = StreamRequest {
        subtitle_track_id: Some(TrackId(5)),
        bitrate_cap_bits: Some(3_000_000),
        ..stream_request()
    };
    let handle = client.build_playback_request(&request).unwrap();

    assert_eq!(handle.url.scheme(), "http");
    let params = query(&handle.url);
    assert_eq!(params["SubtitleStreamIndex"], "5");
    assert_eq!(params["SubtitleMethod"], "Encode");
    assert_eq!(params["MaxStreamingBitrate"], "3000000");
    assert_eq!(params["VideoBitrate"], "3000000");
}

#[test]
fn missing_token_builds_no_stream() {
    let client = JellyfinClient::new(&config("http://nas:8096")).unwrap();
    let request = StreamRequest {
        access_token: String::new(),
        ..stream_request()
    };
    assert!(client.build_playback_request(&request).is_none());
}

#[test]
fn image_and_report_urls() {
    let client = JellyfinClient::new(&config("http://nas:8096")).unwrap();

    let image = client
        .image_url(ImageKind::Primary, &ItemId::new("abc123").unwrap(), 400)
        .unwrap();
    assert_eq!(
        image.as_str(),
        "http://nas:8096/Items/abc123/Images/Primary?maxWidth=400"
    );

    let progress = client.report_url(PlaybackEventKind::Paused).unwrap();
    assert_eq!(progress.path(), "/Sessions/Playing/Progress");
    let started = client.report_url(PlaybackEventKind::Started).unwrap();
    assert_eq!(started.path(), "/Sessions/Playing");
}

#[test]
fn report_body_uses_server_field_names() {
    let report = PlaybackReport {
        kind: PlaybackEventKind::Paused,
        item_id: ItemId::new("abc123").unwrap(),
        media_source_id: MediaSourceId::new("src9").unwrap(),
        audio_track_id: TrackId(2),
        subtitle_track_id: None,
        position_ticks: 12_345_000,
        play_session_id: session_id(),
        user_session_id: UserSessionId::new("user-session"),
        access_token: "secret".into(),
    };

    let body = serde_json::to_value(PlaybackReportBody::from(&report)).unwrap();
    assert_eq!(
        body,
        json!({
            "ItemId": "abc123",
            "MediaSourceId": "src9",
            "PlaySessionId": session_id().to_string(),
            "SessionId": "user-session",
            "PositionTicks": 12_345_000,
            "IsPaused": true,
            "AudioStreamIndex": 2,
            "PlayMethod": "Transcode",
            "CanSeek": true,
        })
    );

    // The token never ends up in a body or a debug dump
    assert!(!body.to_string().contains("secret"));
    assert!(!format!("{report:?}").contains("secret"));
}
