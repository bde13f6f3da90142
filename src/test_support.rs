//! Shared fixtures for unit tests: byte prefixes the format detector
//! recognises and a fake `ToolRunner` emulating cjpeg/jpegtran.

use crate::platform::{ToolOutput, ToolRunner};
use crate::tool_resolver::Toolchain;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub const JPEG_BYTES: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10, b'J', b'F', b'I', b'F', 0x00];
pub const BMP_BYTES: &[u8] = b"BM\x46\x00\x00\x00\x00\x00\x00\x00\x36\x00";

/// Files whose content contains this marker make the fake jpegtran fail
pub const BROKEN_MARKER: &[u8] = b"BROKEN";

/// A JPEG-looking file of exactly `size` bytes
pub fn jpeg_of_size(size: usize) -> Vec<u8> {
    let mut bytes = JPEG_BYTES.to_vec();
    bytes.resize(size.max(JPEG_BYTES.len()), 0xAB);
    bytes
}

/// A JPEG-looking file the fake transcoder refuses
pub fn broken_jpeg() -> Vec<u8> {
    let mut bytes = JPEG_BYTES.to_vec();
    bytes.extend_from_slice(BROKEN_MARKER);
    bytes
}

pub fn fake_toolchain() -> Toolchain {
    Toolchain {
        encoder: PathBuf::from("/fake/bin/cjpeg"),
        transcoder: PathBuf::from("/fake/bin/jpegtran"),
    }
}

/// Records every invocation and emulates the two tools.
///
/// - cjpeg writes `encoded` to the `-outfile` argument
/// - jpegtran prints `transcoded` on stdout, or fails when its input
///   contains `BROKEN_MARKER`
pub struct FakeRunner {
    calls: Mutex<Vec<(PathBuf, Vec<OsString>)>>,
    pub encoded: Vec<u8>,
    pub transcoded: Vec<u8>,
    pub encoder_fails: bool,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            encoded: jpeg_of_size(64),
            transcoded: JPEG_BYTES.to_vec(),
            encoder_fails: false,
        }
    }

    /// Raw invocations, arguments exactly as passed
    pub fn calls(&self) -> Vec<(PathBuf, Vec<OsString>)> {
        self.calls.lock().unwrap().clone()
    }

    /// Arguments of every call to `tool`, lossily converted for easy asserts
    pub fn calls_to(&self, tool: &str) -> Vec<Vec<String>> {
        self.calls()
            .into_iter()
            .filter(|(program, _)| program.file_name().map_or(false, |n| n == tool))
            .map(|(_, args)| args.iter().map(|a| a.to_string_lossy().into_owned()).collect())
            .collect()
    }
}

impl ToolRunner for FakeRunner {
    async fn run(&self, program: &Path, args: &[OsString]) -> std::io::Result<ToolOutput> {
        self.calls.lock().unwrap().push((program.to_path_buf(), args.to_vec()));

        let tool = program.file_name().and_then(|n| n.to_str()).unwrap_or_default();
        match tool {
            "cjpeg" => {
                if self.encoder_fails {
                    return Ok(ToolOutput {
                        success: false,
                        code: Some(1),
                        stdout: Vec::new(),
                        stderr: b"Unrecognized input file format".to_vec(),
                    });
                }
                let outfile = args
                    .iter()
                    .position(|a| a == "-outfile")
                    .and_then(|i| args.get(i + 1))
                    .expect("cjpeg called without -outfile");
                std::fs::write(outfile, &self.encoded)?;
                Ok(ToolOutput { success: true, code: Some(0), ..Default::default() })
            }
            "jpegtran" => {
                let input = std::fs::read(args.last().expect("jpegtran called without input"))?;
                if input.windows(BROKEN_MARKER.len()).any(|w| w == BROKEN_MARKER) {
                    return Ok(ToolOutput {
                        success: false,
                        code: Some(2),
                        stdout: Vec::new(),
                        stderr: b"Premature end of JPEG file".to_vec(),
                    });
                }
                Ok(ToolOutput {
                    success: true,
                    code: Some(0),
                    stdout: self.transcoded.clone(),
                    stderr: Vec::new(),
                })
            }
            other => Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("unexpected tool {}", other),
            )),
        }
    }
}
