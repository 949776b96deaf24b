// proxyforge-core/tests/common/mod.rs
//
// Mock prober and encoder shared by the integration tests. Neither spawns a
// real process.

#![allow(dead_code)]

use proxyforge_core::error::{CoreError, CoreResult, command_failed_error, command_start_error};
use proxyforge_core::external::{EncoderProcess, EncoderSpawner, ProbeExecutor, ProbeTool};

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{self, BufRead, Cursor};
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use std::sync::Mutex;

#[cfg(unix)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;
    ExitStatus::from_raw(code << 8)
}

#[cfg(windows)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::windows::process::ExitStatusExt;
    ExitStatus::from_raw(code as u32)
}

/// MediaInfo JSON for a clip with the given video fields and audio track count.
pub fn mediainfo_json(frame_count: u64, frame_rate: &str, timecode: &str, audio_tracks: usize) -> String {
    let mut tracks = vec![
        r#"{"@type": "General", "Duration": "40.000"}"#.to_string(),
        format!(
            r#"{{"@type": "Video", "FrameCount": "{frame_count}", "FrameRate": "{frame_rate}", "TimeCode_FirstFrame": "{timecode}"}}"#
        ),
    ];
    tracks.extend((0..audio_tracks).map(|_| r#"{"@type": "Audio"}"#.to_string()));
    format!(r#"{{"media": {{"track": [{}]}}}}"#, tracks.join(","))
}

/// Probe responses keyed by file name.
#[derive(Default)]
pub struct MockProber {
    responses: HashMap<String, Result<String, String>>,
}

impl MockProber {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, file_name: &str, json: impl Into<String>) -> Self {
        self.responses.insert(file_name.to_string(), Ok(json.into()));
        self
    }

    /// Makes the prober exit non-zero for `file_name`.
    pub fn fail(mut self, file_name: &str, stderr: &str) -> Self {
        self.responses.insert(file_name.to_string(), Err(stderr.to_string()));
        self
    }
}

impl ProbeExecutor for MockProber {
    fn tool(&self) -> ProbeTool {
        ProbeTool::MediaInfo
    }

    fn run(&self, input_path: &Path) -> CoreResult<String> {
        let name = input_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        match self.responses.get(&name) {
            Some(Ok(json)) => Ok(json.clone()),
            Some(Err(stderr)) => Err(command_failed_error("mediainfo", exit_status(1), stderr.clone())),
            None => Err(CoreError::JsonParseError(format!("no canned output for {name}"))),
        }
    }
}

/// Canned encoder run.
#[derive(Clone)]
pub struct EncoderScript {
    pub progress: String,
    pub exit_code: i32,
    pub spawn_error: bool,
}

impl EncoderScript {
    pub fn success(progress: &str) -> Self {
        Self {
            progress: progress.to_string(),
            exit_code: 0,
            spawn_error: false,
        }
    }

    pub fn failure(progress: &str, exit_code: i32) -> Self {
        Self {
            progress: progress.to_string(),
            exit_code,
            spawn_error: false,
        }
    }

    /// The encoder cannot be started at all.
    pub fn unspawnable() -> Self {
        Self {
            progress: String::new(),
            exit_code: 0,
            spawn_error: true,
        }
    }
}

pub struct MockProcess {
    stream: Option<String>,
    exit_code: i32,
    output: PathBuf,
}

impl EncoderProcess for MockProcess {
    fn take_progress_stream(&mut self) -> CoreResult<Box<dyn BufRead + Send>> {
        let text = self.stream.take().unwrap_or_default();
        Ok(Box::new(Cursor::new(text.into_bytes())))
    }

    fn wait(&mut self) -> CoreResult<ExitStatus> {
        if self.exit_code == 0 {
            File::create(&self.output)?;
        }
        Ok(exit_status(self.exit_code))
    }
}

/// Encoder scripts keyed by source file name; records every argument list.
#[derive(Default)]
pub struct MockSpawner {
    scripts: HashMap<String, EncoderScript>,
    calls: Mutex<Vec<Vec<String>>>,
}

impl MockSpawner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(mut self, file_name: &str, script: EncoderScript) -> Self {
        self.scripts.insert(file_name.to_string(), script);
        self
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }
}

impl EncoderSpawner for MockSpawner {
    type Process = MockProcess;

    fn spawn(&self, args: &[String]) -> CoreResult<Self::Process> {
        self.calls.lock().unwrap().push(args.to_vec());

        let input = args
            .iter()
            .position(|a| a == "-i")
            .and_then(|i| args.get(i + 1))
            .map(PathBuf::from)
            .unwrap_or_default();
        let name = input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let script = self
            .scripts
            .get(&name)
            .cloned()
            .unwrap_or_else(|| EncoderScript::success(""));
        if script.spawn_error {
            return Err(command_start_error(
                "ffmpeg",
                io::Error::new(io::ErrorKind::NotFound, "no such file or directory"),
            ));
        }

        let output = PathBuf::from(args.last().cloned().unwrap_or_default());
        Ok(MockProcess {
            stream: Some(script.progress),
            exit_code: script.exit_code,
            output,
        })
    }
}

/// Creates `<root>/<group>/<name>` with a few bytes of content.
pub fn create_footage(root: &Path, group: &str, name: &str) -> PathBuf {
    let dir = root.join(group);
    fs::create_dir_all(&dir).expect("Failed to create footage dir");
    let path = dir.join(name);
    fs::write(&path, b"not really video").expect("Failed to write footage file");
    path
}
