//! Common test utilities and fixtures for tool testing

use std::path::PathBuf;
use tempfile::TempDir;
use websearch::config::Config;
use websearch::tool::base::ToolContext;

/// Test fixture with a temporary working directory
pub struct TestFixture {
    /// Temporary directory that gets cleaned up automatically
    pub temp_dir: TempDir,
}

impl TestFixture {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        Self { temp_dir }
    }

    pub fn path(&self) -> PathBuf {
        self.temp_dir.path().to_path_buf()
    }
}

/// Config pointed at a mock aggregator
pub fn test_config(base_url: &str) -> Config {
    Config {
        searxng_url: base_url.to_string(),
        default_timeout: 5,
        max_results: 10,
        max_content_length: 50000,
        debug: false,
        debug_log_path: None,
    }
}

/// Helper to create a tool context for testing
pub fn create_test_context(working_dir: PathBuf) -> ToolContext {
    ToolContext::new("test_session", "test_msg", "test_agent", working_dir)
}
