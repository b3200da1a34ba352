//! Media server endpoints used by the playback client

pub mod sessions {
    pub const PLAYING: &str = "/Sessions/Playing";
    pub const PROGRESS: &str = "/Sessions/Playing/Progress";
    pub const STOPPED: &str = "/Sessions/Playing/Stopped";
}

pub mod videos {
    pub const ROOT: &str = "Videos";
    pub const MASTER_PLAYLIST: &str = "master.m3u8";
}

pub mod items {
    pub const ROOT: &str = "Items";
    pub const IMAGES: &str = "Images";
}

/// Header carrying the client descriptor and access token.
pub const AUTHORIZATION_HEADER: &str = "X-Emby-Authorization";

pub mod query {
    pub const MEDIA_SOURCE_ID: &str = "MediaSourceId";
    pub const PLAY_SESSION_ID: &str = "PlaySessionId";
    pub const DEVICE_ID: &str = "DeviceId";
    pub const VIDEO_STREAM_INDEX: &str = "VideoStreamIndex";
    pub const AUDIO_STREAM_INDEX: &str = "AudioStreamIndex";
    pub const SUBTITLE_STREAM_INDEX: &str = "SubtitleStreamIndex";
    pub const SUBTITLE_METHOD: &str = "SubtitleMethod";
    pub const MAX_STREAMING_BITRATE: &str = "MaxStreamingBitrate";
    pub const VIDEO_BITRATE: &str = "VideoBitrate";
    pub const API_KEY: &str = "api_key";
    pub const MAX_WIDTH: &str = "maxWidth";
}
