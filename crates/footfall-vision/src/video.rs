//! Video-file ingestion driver.
//!
//! Decodes a video with FFmpeg, samples every Nth frame, and runs each
//! sampled frame through the [`FrameAnalyzer`]. The caller appends the
//! resulting summaries to a session timeline.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use image::DynamicImage;
use serde::{Deserialize, Serialize};
use tokio::process::Command;
use tracing::{info, warn};

use footfall_models::{FrameRef, FrameSummary};

use crate::aggregator::FrameAnalyzer;
use crate::error::{VisionError, VisionResult};

/// Video stream information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoInfo {
    /// Total raw frames in the stream
    pub total_frames: u64,
    /// Duration in seconds
    pub duration: f64,
    /// Frame rate (fps)
    pub fps: f64,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

/// FFprobe JSON output format.
#[derive(Debug, Deserialize)]
struct FfprobeOutput {
    format: FfprobeFormat,
    streams: Vec<FfprobeStream>,
}

#[derive(Debug, Deserialize)]
struct FfprobeFormat {
    duration: Option<String>,
}

#[derive(Debug, Deserialize)]
struct FfprobeStream {
    codec_type: String,
    width: Option<u32>,
    height: Option<u32>,
    r_frame_rate: Option<String>,
    avg_frame_rate: Option<String>,
    nb_read_packets: Option<String>,
}

/// Probe a video file for stream information, counting raw frames.
pub async fn probe_video(path: impl AsRef<Path>) -> VisionResult<VideoInfo> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(VisionError::FileNotFound(path.to_path_buf()));
    }
    which::which("ffprobe").map_err(|_| VisionError::FfprobeNotFound)?;

    let output = Command::new("ffprobe")
        .args([
            "-v",
            "quiet",
            "-select_streams",
            "v:0",
            "-count_packets",
            "-print_format",
            "json",
            "-show_format",
            "-show_streams",
        ])
        .arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await?;

    if !output.status.success() {
        return Err(VisionError::ffmpeg_failed(
            "ffprobe failed",
            Some(String::from_utf8_lossy(&output.stderr).to_string()),
        ));
    }

    let probe: FfprobeOutput = serde_json::from_slice(&output.stdout)?;
    let video_stream = probe
        .streams
        .iter()
        .find(|s| s.codec_type == "video")
        .ok_or_else(|| VisionError::InvalidVideo("no video stream found".to_string()))?;

    let duration = probe
        .format
        .duration
        .as_ref()
        .and_then(|d| d.parse::<f64>().ok())
        .unwrap_or(0.0);

    let fps = video_stream
        .avg_frame_rate
        .as_ref()
        .or(video_stream.r_frame_rate.as_ref())
        .and_then(|r| parse_frame_rate(r))
        .unwrap_or(30.0);

    // One packet per frame for video streams; fall back to duration * fps
    // when the container does not report packet counts.
    let total_frames = video_stream
        .nb_read_packets
        .as_ref()
        .and_then(|n| n.parse::<u64>().ok())
        .filter(|n| *n > 0)
        .unwrap_or_else(|| (duration * fps).round() as u64);

    Ok(VideoInfo {
        total_frames,
        duration,
        fps,
        width: video_stream.width.unwrap_or(0),
        height: video_stream.height.unwrap_or(0),
    })
}

/// Parse frame rate string (e.g., "30/1" or "29.97").
fn parse_frame_rate(s: &str) -> Option<f64> {
    if let Some((num, den)) = s.split_once('/') {
        let num: f64 = num.parse().ok()?;
        let den: f64 = den.parse().ok()?;
        if den > 0.0 {
            return Some(num / den);
        }
    }
    s.parse().ok()
}

/// Outcome of one video ingestion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestReport {
    /// Raw frames in the source stream
    pub total_frames: u64,
    /// Frames actually sampled and analyzed
    pub processed_frames: u64,
    /// Sum of person counts over all sampled frames
    pub total_people: u64,
}

/// Decode, sample, and analyze a video file.
///
/// Every `stride`-th decoded frame is analyzed; the summaries carry the raw
/// decoder frame numbers (`0, stride, 2*stride, ..`). A detector failure on
/// one frame zero-fills that frame's summary and continues the session
/// rather than aborting it.
pub async fn ingest_video(
    path: impl AsRef<Path>,
    stride: u64,
    analyzer: &FrameAnalyzer,
) -> VisionResult<(Vec<FrameSummary>, IngestReport)> {
    let path = path.as_ref();
    let stride = stride.max(1);

    let video_info = probe_video(path).await?;
    info!(
        path = %path.display(),
        total_frames = video_info.total_frames,
        fps = video_info.fps,
        stride,
        "starting video ingestion"
    );

    let frames_dir = tempfile::tempdir()?;
    extract_sampled_frames(path, stride, frames_dir.path()).await?;

    let mut summaries = Vec::new();
    let mut total_people = 0u64;

    for (processed_index, frame_path) in sampled_frame_paths(frames_dir.path())?.iter().enumerate()
    {
        let raw_index = processed_index as u64 * stride;
        let frame_ref = FrameRef::Index(raw_index);

        let summary = match load_frame(frame_path).and_then(|f| analyzer.process_frame(&f)) {
            Ok(analysis) => analysis.into_summary(frame_ref),
            Err(e) => {
                warn!(
                    frame = raw_index,
                    error = %e,
                    "frame analysis failed, zero-filling summary"
                );
                FrameSummary::empty(frame_ref)
            }
        };

        total_people += summary.count;
        summaries.push(summary);
    }

    let report = IngestReport {
        total_frames: video_info.total_frames,
        processed_frames: summaries.len() as u64,
        total_people,
    };
    info!(
        processed_frames = report.processed_frames,
        total_people = report.total_people,
        "video ingestion complete"
    );

    Ok((summaries, report))
}

/// Dump every `stride`-th frame of the video as JPEG into `out_dir`.
async fn extract_sampled_frames(path: &Path, stride: u64, out_dir: &Path) -> VisionResult<()> {
    which::which("ffmpeg").map_err(|_| VisionError::FfmpegNotFound)?;

    let filter = format!("select='not(mod(n\\,{}))'", stride);
    let pattern = out_dir.join("frame_%06d.jpg");

    let output = Command::new("ffmpeg")
        .args(["-i"])
        .arg(path)
        .args(["-vf", &filter, "-vsync", "0", "-q:v", "2"])
        .arg(&pattern)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await?;

    if !output.status.success() {
        return Err(VisionError::ffmpeg_failed(
            "frame extraction failed",
            Some(String::from_utf8_lossy(&output.stderr).to_string()),
        ));
    }
    Ok(())
}

/// Extracted frame files in sample order.
fn sampled_frame_paths(dir: &Path) -> VisionResult<Vec<PathBuf>> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "jpg"))
        .collect();
    // frame_%06d names sort lexicographically in frame order
    paths.sort();
    Ok(paths)
}

fn load_frame(path: &Path) -> VisionResult<DynamicImage> {
    Ok(image::open(path)?)
}
