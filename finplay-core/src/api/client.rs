use crate::api::dto::PlaybackReportBody;
use crate::api::routes::{self, items, query, sessions, videos};
use crate::config::ClientConfig;
use async_trait::async_trait;
use finplay_contracts::network::{
    ImageKind, NetworkError, PlayableHandle, PlaybackEventKind, PlaybackNetwork,
    PlaybackReport, StreamRequest,
};
use finplay_model::ItemId;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tracing::{debug, trace, warn};
use url::Url;

/// Subtitles are burned into the video stream.
const SUBTITLE_METHOD_ENCODE: &str = "Encode";

/// Identifies this client to the server in every authorization header.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ClientDescriptor {
    client: String,
    device: String,
    device_id: String,
    version: String,
}

/// [`PlaybackNetwork`] backed by a Jellyfin-compatible media server.
#[derive(Clone)]
pub struct JellyfinClient {
    http: Client,
    base_url: Url,
    descriptor: ClientDescriptor,
}

impl std::fmt::Debug for JellyfinClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JellyfinClient")
            .field("base_url", &self.base_url.as_str())
            .field("device_id", &self.descriptor.device_id)
            .finish()
    }
}

/// Adds a scheme when missing and drops trailing slashes.
fn normalize_base_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        warn!(url = %trimmed, "server URL has no scheme, assuming http");
        format!("http://{trimmed}")
    }
}

impl JellyfinClient {
    pub fn new(config: &ClientConfig) -> Result<Self, NetworkError> {
        let base_url = Url::parse(&normalize_base_url(&config.server_url))
            .map_err(|err| {
                NetworkError::Encode(format!("invalid server URL: {err}"))
            })?;

        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|err| NetworkError::Transport(err.to_string()))?;

        debug!(base_url = %base_url, "created media server client");

        Ok(Self {
            http,
            base_url,
            descriptor: ClientDescriptor {
                client: config.client_name.clone(),
                device: config.device_name.clone(),
                device_id: config.device_id.clone(),
                version: config.client_version.clone(),
            },
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Value of the authorization header for `token`.
    pub fn authorization(&self, token: &str) -> String {
        let ClientDescriptor {
            client,
            device,
            device_id,
            version,
        } = &self.descriptor;
        format!(
            concat!(
                r#"MediaBrowser Client="{}", Device="{}", "#,
                r#"DeviceId="{}", Version="{}", Token="{}""#,
            ),
            client, device, device_id, version, token
        )
    }

    /// Appends path segments to the base URL, keeping any base path such as
    /// `/jellyfin`.
    fn endpoint(&self, segments: &[&str]) -> Option<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .ok()?
            .pop_if_empty()
            .extend(segments);
        Some(url)
    }

    fn report_path(kind: PlaybackEventKind) -> &'static str {
        match kind {
            PlaybackEventKind::Started => sessions::PLAYING,
            PlaybackEventKind::Progressed | PlaybackEventKind::Paused => {
                sessions::PROGRESS
            }
            PlaybackEventKind::Stopped => sessions::STOPPED,
        }
    }

    /// Where a report of `kind` is posted.
    pub fn report_url(&self, kind: PlaybackEventKind) -> Option<Url> {
        let segments: Vec<&str> = Self::report_path(kind)
            .split('/')
            .filter(|segment| !segment.is_empty())
            .collect();
        self.endpoint(&segments)
    }
}

#[async_trait]
impl PlaybackNetwork for JellyfinClient {
    fn build_playback_request(
        &self,
        request: &StreamRequest,
    ) -> Option<PlayableHandle> {
        if request.access_token.is_empty() {
            debug!(
                item = %request.item_id,
                "no access token, cannot build stream"
            );
            return None;
        }

        let mut url = self.endpoint(&[
            videos::ROOT,
            request.item_id.as_str(),
            videos::MASTER_PLAYLIST,
        ])?;

        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair(
                    query::MEDIA_SOURCE_ID,
                    request.media_source_id.as_str(),
                )
                .append_pair(
                    query::PLAY_SESSION_ID,
                    &request.play_session_id.to_string(),
                )
                .append_pair(query::DEVICE_ID, &self.descriptor.device_id)
                .append_pair(
                    query::VIDEO_STREAM_INDEX,
                    &request.video_track_id.to_string(),
                )
                .append_pair(
                    query::AUDIO_STREAM_INDEX,
                    &request.audio_track_id.to_string(),
                );
            if let Some(subtitle) = request.subtitle_track_id {
                pairs
                    .append_pair(
                        query::SUBTITLE_STREAM_INDEX,
                        &subtitle.to_string(),
                    )
                    .append_pair(
                        query::SUBTITLE_METHOD,
                        SUBTITLE_METHOD_ENCODE,
                    );
            }
            if let Some(cap) = request.bitrate_cap_bits {
                let cap = cap.to_string();
                pairs
                    .append_pair(query::MAX_STREAMING_BITRATE, &cap)
                    .append_pair(query::VIDEO_BITRATE, &cap);
            }
            pairs.append_pair(query::API_KEY, &request.access_token);
        }

        trace!(
            item = %request.item_id,
            play_session = %request.play_session_id,
            "built stream URL"
        );

        Some(PlayableHandle {
            url,
            headers: vec![(
                routes::AUTHORIZATION_HEADER.to_string(),
                self.authorization(&request.access_token),
            )],
        })
    }

    async fn report_playback_event(
        &self,
        report: &PlaybackReport,
    ) -> Result<(), NetworkError> {
        if report.access_token.is_empty() {
            return Err(NetworkError::Unauthorized);
        }
        let path = Self::report_path(report.kind);
        let url = self.report_url(report.kind).ok_or_else(|| {
            NetworkError::Encode(format!("cannot build URL for {path}"))
        })?;

        let response = self
            .http
            .post(url)
            .header(
                routes::AUTHORIZATION_HEADER,
                self.authorization(&report.access_token),
            )
            .json(&PlaybackReportBody::from(report))
            .send()
            .await
            .map_err(|err| NetworkError::Transport(err.to_string()))?;

        match response.status() {
            StatusCode::UNAUTHORIZED => Err(NetworkError::Unauthorized),
            status if status.is_success() => {
                trace!(
                    kind = %report.kind,
                    position_ticks = report.position_ticks,
                    "report accepted"
                );
                Ok(())
            }
            status => Err(NetworkError::Http {
                status: status.as_u16(),
                path: path.to_string(),
            }),
        }
    }

    fn image_url(
        &self,
        kind: ImageKind,
        id: &ItemId,
        width: u32,
    ) -> Option<Url> {
        let mut url = self.endpoint(&[
            items::ROOT,
            id.as_str(),
            items::IMAGES,
            kind.as_path_segment(),
        ])?;
        url.query_pairs_mut()
            .append_pair(query::MAX_WIDTH, &width.to_string());
        Some(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_gets_a_scheme() {
        assert_eq!(normalize_base_url("nas:8096/"), "http://nas:8096");
        assert_eq!(
            normalize_base_url(" https://media.example.org/jellyfin/ "),
            "https://media.example.org/jellyfin"
        );
    }

    #[test]
    fn report_paths_share_progress_endpoint() {
        assert_eq!(
            JellyfinClient::report_path(PlaybackEventKind::Paused),
            JellyfinClient::report_path(PlaybackEventKind::Progressed)
        );
        assert_eq!(
            JellyfinClient::report_path(PlaybackEventKind::Stopped),
            "/Sessions/Playing/Stopped"
        );
    }
}
