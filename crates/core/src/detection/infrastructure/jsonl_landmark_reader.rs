use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::detection::domain::landmark_source::{FrameSample, LandmarkSource};
use crate::shared::error::RecordingError;

/// Replays a recorded session: one JSON [`FrameSample`] per line, e.g.
///
/// ```text
/// {"timestamp_ms": 0.0, "brightness": 0.4, "landmarks": [{"x": 0.5, "y": 0.5, "z": 0.0}, ...]}
/// {"timestamp_ms": 33.3, "landmarks": null}
/// ```
///
/// Blank lines are skipped. A line that fails to parse is reported as an
/// error item and reading continues with the next one. An I/O error is
/// reported once and ends the stream.
pub struct JsonlLandmarkReader {
    reader: Box<dyn BufRead + Send>,
    failed: bool,
}

impl JsonlLandmarkReader {
    pub fn open(path: &Path) -> Result<Self, RecordingError> {
        let file = File::open(path).map_err(|source| RecordingError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("Opened landmark recording {}", path.display());
        Ok(Self::from_reader(BufReader::new(file)))
    }

    pub fn from_reader(reader: impl BufRead + Send + 'static) -> Self {
        Self {
            reader: Box::new(reader),
            failed: false,
        }
    }
}

fn parse_line(
    line_no: usize,
    line: std::io::Result<String>,
) -> Option<Result<FrameSample, Box<dyn std::error::Error>>> {
    let line = match line {
        Ok(line) => line,
        Err(source) => {
            return Some(Err(RecordingError::Read {
                line: line_no,
                source,
            }
            .into()))
        }
    };
    if line.trim().is_empty() {
        return None;
    }
    Some(
        serde_json::from_str(&line).map_err(|source| {
            RecordingError::Parse {
                line: line_no,
                source,
            }
            .into()
        }),
    )
}

impl LandmarkSource for JsonlLandmarkReader {
    fn frames(
        &mut self,
    ) -> Box<dyn Iterator<Item = Result<FrameSample, Box<dyn std::error::Error>>> + '_> {
        let Self { reader, failed } = self;
        Box::new(
            reader
                .lines()
                .enumerate()
                .map_while(move |(i, line)| {
                    if *failed {
                        return None;
                    }
                    *failed = line.is_err();
                    Some(parse_line(i + 1, line))
                })
                .flatten(),
        )
    }
}
