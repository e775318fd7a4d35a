//! Local tier: Tesseract as a subprocess.
//!
//! The image is streamed through stdin (`tesseract stdin stdout`) so no temp
//! file is written. The binary is resolved once per call with `which` unless
//! an explicit path was configured.

use super::LocalRecognizer;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::AsyncWriteExt;

/// Upper bound for a single recognition run.
const RECOGNITION_TIMEOUT_SECS: u64 = 120;

pub struct TesseractEngine {
    binary: Option<PathBuf>,
    timeout: Duration,
}

impl TesseractEngine {
    pub fn new(binary: Option<PathBuf>) -> Self {
        Self {
            binary,
            timeout: Duration::from_secs(RECOGNITION_TIMEOUT_SECS),
        }
    }

    /// Limit for feeding the image and collecting the output together.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn resolve(&self) -> Result<PathBuf, String> {
        match &self.binary {
            Some(path) => Ok(path.clone()),
            None => which::which("tesseract").map_err(|e| format!("tesseract not found on PATH: {}", e)),
        }
    }
}

#[async_trait::async_trait]
impl LocalRecognizer for TesseractEngine {
    async fn is_available(&self) -> bool {
        let Ok(binary) = self.resolve() else {
            return false;
        };
        match tokio::process::Command::new(&binary)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await
        {
            Ok(status) => status.success(),
            Err(e) => {
                log::debug!("[OCR] {} --version failed: {}", binary.display(), e);
                false
            }
        }
    }

    async fn recognize(&self, image: &[u8], language: Option<&str>) -> Result<String, String> {
        let binary = self.resolve()?;

        let mut cmd = tokio::process::Command::new(&binary);
        cmd.args(["stdin", "stdout"]);
        if let Some(lang) = language {
            cmd.args(["-l", lang]);
        }
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let mut child = cmd
            .spawn()
            .map_err(|e| format!("failed to spawn {}: {}", binary.display(), e))?;

        let run = async move {
            let mut stdin = child.stdin.take().ok_or("no stdin for tesseract")?;
            stdin
                .write_all(image)
                .await
                .map_err(|e| format!("failed to feed image to tesseract: {}", e))?;
            drop(stdin);
            child
                .wait_with_output()
                .await
                .map_err(|e| format!("tesseract did not finish: {}", e))
        };

        // Dropping `run` on timeout drops the child, which kills it.
        let output = tokio::time::timeout(self.timeout, run)
            .await
            .map_err(|_| format!("tesseract timed out after {}ms", self.timeout.as_millis()))??;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(format!("tesseract exited with {}: {}", output.status, stderr.trim()));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
