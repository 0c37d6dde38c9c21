#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Mutex;
use wtpgen::progress::{ProgressEvent, ProgressHandler};
use wtpgen::WorkspaceInput;

pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

pub fn load_fixture(name: &str) -> WorkspaceInput {
    WorkspaceInput::load(&fixture_path(name))
        .unwrap_or_else(|e| panic!("Failed to load fixture {}: {:#}", name, e))
}

/// Keeps every progress event for later assertions
#[derive(Default)]
pub struct RecordingHandler {
    events: Mutex<Vec<ProgressEvent>>,
}

impl RecordingHandler {
    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn resolved_projects(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                ProgressEvent::ProjectResolved { project, .. } => Some(project),
                _ => None,
            })
            .collect()
    }
}

impl ProgressHandler for RecordingHandler {
    fn on_progress(&self, event: &ProgressEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}
