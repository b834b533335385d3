//! Common test utilities for crow integration tests

#![allow(dead_code)]

pub use crow::{Config, DispatchError, Dispatcher, ExecuteError, Spawner};
use std::collections::HashMap;
use std::ffi::{OsStr, OsString};
use std::io::Write;

/// Spawner that records argv vectors and replays canned output per program
#[derive(Debug, Default)]
pub struct RecordingSpawner {
    pub outputs: HashMap<OsString, Vec<u8>>,
    pub foreground: Vec<Vec<String>>,
    pub captured: Vec<Vec<String>>,
}

impl RecordingSpawner {
    pub fn output(mut self, program: &str, bytes: &[u8]) -> Self {
        self.outputs.insert(program.into(), bytes.to_vec());
        self
    }
}

fn lossy(argv: &[&OsStr]) -> Vec<String> {
    argv.iter().map(|a| a.to_string_lossy().into_owned()).collect()
}

impl Spawner for RecordingSpawner {
    fn run_foreground(&mut self, argv: &[&OsStr]) -> Result<i32, ExecuteError> {
        self.foreground.push(lossy(argv));
        Ok(0)
    }

    fn run_captured(&mut self, argv: &[&OsStr], sink: &mut dyn Write) -> Result<i32, ExecuteError> {
        self.captured.push(lossy(argv));
        if let Some(bytes) = self.outputs.get(argv[0]) {
            sink.write_all(bytes).unwrap();
        }
        Ok(0)
    }
}

/// Split a whitespace-separated command line into tokens
pub fn tokens(line: &str) -> Vec<OsString> {
    line.split_whitespace().map(OsString::from).collect()
}

/// Run `tokens` through a dispatcher, returning the outcome and the spawner
pub fn expand(
    tokens: &[OsString],
    config: &Config,
    spawner: RecordingSpawner,
) -> (Result<i32, DispatchError>, RecordingSpawner) {
    let mut dispatcher = Dispatcher::new(config, spawner);
    let result = dispatcher
        .feed_all(tokens.iter().map(OsString::as_os_str))
        .and_then(|_| dispatcher.finish());
    (result, dispatcher.into_spawner())
}
