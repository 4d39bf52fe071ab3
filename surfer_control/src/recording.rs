//! NDJSON session recording.
//!
//! One [`HandFrame`] per line, so a session can be tailed while it is written
//! and replayed later through [`ReplayHandSource`](crate::source::ReplayHandSource).

use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use gesture_core::HandFrame;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecordingError {
    #[error("recording I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("bad frame on line {line}: {source}")]
    Json {
        line:   usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode frame: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Append-only frame writer.
///
/// Contract: each call writes exactly one JSON object followed by a newline.
pub struct FrameRecorder {
    w:      BufWriter<File>,
    frames: u64,
}

impl FrameRecorder {
    /// Create (or truncate) `path`.
    pub fn create(path: impl AsRef<Path>) -> Result<Self, RecordingError> {
        let f = OpenOptions::new().create(true).write(true).truncate(true).open(path)?;
        Ok(FrameRecorder { w: BufWriter::new(f), frames: 0 })
    }

    pub fn write(&mut self, frame: &HandFrame) -> Result<(), RecordingError> {
        serde_json::to_writer(&mut self.w, frame)?;
        self.w.write_all(b"\n")?;
        self.frames += 1;
        Ok(())
    }

    pub fn frames(&self) -> u64 { self.frames }

    pub fn flush(&mut self) -> Result<(), RecordingError> {
        self.w.flush()?;
        Ok(())
    }
}

impl Drop for FrameRecorder {
    fn drop(&mut self) {
        let _ = self.w.flush();
    }
}

/// Read every frame from an NDJSON file.  Blank lines are skipped.
pub fn read_frames(path: impl AsRef<Path>) -> Result<Vec<HandFrame>, RecordingError> {
    let reader = BufReader::new(File::open(path)?);
    let mut frames = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let frame = serde_json::from_str(&line)
            .map_err(|source| RecordingError::Json { line: i + 1, source })?;
        frames.push(frame);
    }
    Ok(frames)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gesture_core::synthetic::pose_at;
    use gesture_core::FingerState;

    #[test]
    fn recorded_session_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.ndjson");

        let frames = vec![
            HandFrame::single(0.0, pose_at(0.4, 0.5, FingerState::OPEN)),
            HandFrame::empty(0.033),
            HandFrame::single(0.066, pose_at(0.6, 0.5, FingerState::CLOSED).with_confidence(0.9)),
        ];
        {
            let mut rec = FrameRecorder::create(&path).unwrap();
            for f in &frames {
                rec.write(f).unwrap();
            }
            assert_eq!(rec.frames(), 3);
        }

        let back = read_frames(&path).unwrap();
        assert_eq!(back, frames);
    }

    #[test]
    fn one_object_per_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("s.ndjson");
        {
            let mut rec = FrameRecorder::create(&path).unwrap();
            rec.write(&HandFrame::empty(1.0)).unwrap();
            rec.write(&HandFrame::empty(2.0)).unwrap();
        }
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 2);
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn hand_written_frames_default_missing_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hand.ndjson");
        let pts: Vec<String> = (0..21).map(|_| r#"{"x":0.5,"y":0.5}"#.to_string()).collect();
        let body = format!(
            "{{\"timestamp\":0.0}}\n\n{{\"timestamp\":0.1,\"hands\":[{{\"points\":[{}]}}]}}\n",
            pts.join(",")
        );
        std::fs::write(&path, body).unwrap();

        let frames = read_frames(&path).unwrap();
        assert_eq!(frames.len(), 2);
        assert!(!frames[0].has_hand());
        assert_eq!(frames[1].hands[0].confidence, 1.0);
    }

    #[test]
    fn bad_line_reports_its_number() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.ndjson");
        std::fs::write(&path, "{\"timestamp\":0.0}\nnot json\n").unwrap();
        match read_frames(&path) {
            Err(RecordingError::Json { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected json error, got {other:?}"),
        }
    }
}
