use anyhow::{Context, Result};
use bytes::Bytes;
use std::sync::Arc;
use std::time::Duration;
use webrtc::api::media_engine::{MIME_TYPE_OPUS, MIME_TYPE_VP8};
use webrtc::media::Sample;
use webrtc::rtp_transceiver::rtp_codec::RTCRtpCodecCapability;
use webrtc::track::track_local::track_local_static_sample::TrackLocalStaticSample;

pub const STREAM_ID: &str = "local_stream";

/// Пара локальных треков камеры и микрофона.
/// Кадры пишет внешний конвейер захвата, сигнальный слой их не трогает.
#[derive(Clone)]
pub struct LocalTracks {
    pub video: Arc<TrackLocalStaticSample>,
    pub audio: Arc<TrackLocalStaticSample>,
}

impl LocalTracks {
    pub fn new() -> Self {
        let video = TrackLocalStaticSample::new(
            RTCRtpCodecCapability {
                mime_type: MIME_TYPE_VP8.to_owned(),
                ..Default::default()
            },
            "video_track".to_owned(),
            STREAM_ID.to_owned(),
        );
        let audio = TrackLocalStaticSample::new(
            RTCRtpCodecCapability {
                mime_type: MIME_TYPE_OPUS.to_owned(),
                ..Default::default()
            },
            "audio_track".to_owned(),
            STREAM_ID.to_owned(),
        );

        Self {
            video: Arc::new(video),
            audio: Arc::new(audio),
        }
    }

    pub async fn write_video(&self, frame: Bytes, duration: Duration) -> Result<()> {
        self.video
            .write_sample(&Sample {
                data: frame,
                duration,
                ..Default::default()
            })
            .await
            .context("Failed to write video sample")
    }

    pub async fn write_audio(&self, packet: Bytes, duration: Duration) -> Result<()> {
        self.audio
            .write_sample(&Sample {
                data: packet,
                duration,
                ..Default::default()
            })
            .await
            .context("Failed to write audio sample")
    }
}

impl Default for LocalTracks {
    fn default() -> Self {
        Self::new()
    }
}
