//! Runs the `webfont` npm package through Node.js.

use super::{FontGenerator, GenerationResult};
use crate::error::WebfontError;
use async_trait::async_trait;
use fob_webfont_config::WebfontOptions;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tokio::time::{timeout, Duration};
use tracing::debug;

/// Maximum allowed size for bridge output (64 MiB)
const MAX_OUTPUT_SIZE: usize = 64 * 1024 * 1024;

/// Default timeout for one generator run (60 seconds)
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Reads options JSON on stdin, runs `webfont`, prints one JSON document.
///
/// Buffers and strings become byte arrays. Lists of `{ name, buffer }`
/// entries (multi-file TTF) are kept as named buffers; `contents` is accepted
/// in place of `buffer`.
const BRIDGE_SCRIPT: &str = r#"
const chunks = [];
process.stdin.on("data", (chunk) => chunks.push(chunk));
process.stdin.on("end", async () => {
  let mod;
  try {
    mod = require(require.resolve("webfont", { paths: [process.cwd()] }));
  } catch (err) {
    process.stderr.write("Cannot resolve the `webfont` package: " + err.message + "\n");
    process.exit(3);
  }
  const webfont = mod.webfont || mod.default || mod;
  const bytes = (value) => Array.from(Buffer.isBuffer(value) ? value : Buffer.from(String(value)));
  const meta = new Set(["config", "usedBuildInTemplate", "usedBuildInStylesTemplate", "glyphsData", "fontsData"]);
  try {
    const options = JSON.parse(Buffer.concat(chunks).toString("utf8"));
    const result = await webfont(options);
    const outputs = {};
    for (const [key, value] of Object.entries(result)) {
      if (meta.has(key) || value === undefined || value === null) continue;
      if (Array.isArray(value)) {
        outputs[key] = value.map((entry) => ({
          name: String(entry.name),
          contents: bytes(entry.buffer !== undefined ? entry.buffer : entry.contents)
        }));
      } else if (Buffer.isBuffer(value) || typeof value === "string") {
        outputs[key] = bytes(value);
      }
    }
    const refs = (list) => (list || []).map((entry) => ({ srcPath: entry.srcPath }));
    const config = result.config || {};
    process.stdout.write(JSON.stringify({
      outputs,
      config: {
        fontName: config.fontName || options.fontName || "webfont",
        template: config.template || null,
        config: typeof config.config === "string" ? config.config : null
      },
      usedBuildInTemplate: Boolean(result.usedBuildInTemplate || result.usedBuildInStylesTemplate),
      glyphsData: refs(result.glyphsData),
      fontsData: refs(result.fontsData)
    }));
  } catch (err) {
    process.stdout.write(JSON.stringify({ error: err && err.message ? err.message : String(err) }));
  }
});
"#;

#[derive(Deserialize)]
#[serde(untagged)]
enum BridgeReply {
    Failure { error: String },
    Success(Box<GenerationResult>),
}

/// Font generator backed by the `webfont` npm package.
///
/// Spawns `node` in the project root so the package resolves from the
/// project's own `node_modules`. Options are written to stdin as JSON and the
/// result is read back from stdout.
#[derive(Debug, Clone)]
pub struct NodeGenerator {
    /// Node.js executable
    program: String,

    /// Working directory for the child process
    project_root: PathBuf,

    /// Timeout for one run in seconds
    timeout_secs: u64,
}

impl NodeGenerator {
    /// Run `node` from `project_root` with the default timeout.
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            program: "node".to_string(),
            project_root: project_root.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Use a specific Node.js executable
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Kill a run that takes longer than `timeout_secs`
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }

    fn decode(stdout: &[u8]) -> Result<GenerationResult, WebfontError> {
        if stdout.len() > MAX_OUTPUT_SIZE {
            return Err(WebfontError::output_too_large(stdout.len(), MAX_OUTPUT_SIZE));
        }

        let reply: BridgeReply = serde_json::from_slice(stdout)
            .map_err(|source| WebfontError::MalformedOutput { source })?;

        match reply {
            BridgeReply::Failure { error } => Err(WebfontError::generation(error)),
            BridgeReply::Success(result) => Ok(*result),
        }
    }
}

#[async_trait]
impl FontGenerator for NodeGenerator {
    async fn generate(&self, options: &WebfontOptions) -> Result<GenerationResult, WebfontError> {
        let payload = serde_json::to_vec(&options.to_value()?)
            .map_err(|e| WebfontError::generation(e.to_string()))?;

        debug!(
            "[fob-webfont] spawning {} in {}",
            self.program,
            self.project_root.display()
        );

        let mut cmd = Command::new(&self.program);
        cmd.arg("-e")
            .arg(BRIDGE_SCRIPT)
            .current_dir(&self.project_root)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = cmd
            .spawn()
            .map_err(|e| WebfontError::spawn_failed(&self.program, e))?;

        let mut stdin = child.stdin.take().ok_or_else(|| {
            WebfontError::spawn_failed(
                &self.program,
                std::io::Error::new(std::io::ErrorKind::BrokenPipe, "Failed to capture stdin"),
            )
        })?;

        stdin
            .write_all(&payload)
            .await
            .map_err(|e| WebfontError::spawn_failed(&self.program, e))?;
        drop(stdin);

        let output = timeout(
            Duration::from_secs(self.timeout_secs),
            child.wait_with_output(),
        )
        .await
        .map_err(|_| WebfontError::timeout(self.timeout_secs))?
        .map_err(|e| WebfontError::spawn_failed(&self.program, e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let exit_code = output.status.code().unwrap_or(-1);
            return Err(WebfontError::generator_exit(exit_code, stderr));
        }

        Self::decode(&output.stdout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let generator = NodeGenerator::new("/project");
        assert_eq!(generator.program(), "node");
        assert_eq!(generator.timeout_secs(), DEFAULT_TIMEOUT_SECS);
        assert_eq!(generator.project_root(), Path::new("/project"));

        let generator = generator.with_program("/usr/local/bin/node").with_timeout(5);
        assert_eq!(generator.program(), "/usr/local/bin/node");
        assert_eq!(generator.timeout_secs(), 5);
    }

    #[test]
    fn decode_reports_generator_failure() {
        let err = NodeGenerator::decode(br#"{"error":"Invalid SVG: icons/broken.svg"}"#).unwrap_err();
        assert!(matches!(err, WebfontError::Generation { .. }));
        assert!(err.to_string().contains("icons/broken.svg"));
    }

    #[test]
    fn decode_reads_result() {
        let result = NodeGenerator::decode(
            br#"{"outputs":{"css":[97]},"config":{"fontName":"icons"},"usedBuildInTemplate":true}"#,
        )
        .unwrap();
        assert_eq!(result.font_name(), "icons");
        assert!(result.used_builtin_template);
        assert_eq!(result.outputs.len(), 1);
    }

    #[test]
    fn decode_rejects_garbage() {
        let err = NodeGenerator::decode(b"npm WARN something").unwrap_err();
        assert!(matches!(err, WebfontError::MalformedOutput { .. }));
    }

    #[tokio::test]
    async fn missing_program_is_a_spawn_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let generator =
            NodeGenerator::new(dir.path()).with_program("fob-webfont-no-such-node-binary");
        let options = WebfontOptions::new("icons/*.svg", "out");

        let err = generator.generate(&options).await.unwrap_err();
        assert!(matches!(err, WebfontError::GeneratorSpawn { .. }));
    }
}
