//! Legacy `.doc` conversion through a headless LibreOffice.

use crate::error::{Error, Result};
use crossbeam_channel::bounded;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use tempfile::TempDir;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

#[cfg(not(windows))]
const CANDIDATES: &[&str] = &[
    "/usr/bin/libreoffice",
    "/usr/bin/soffice",
    "/usr/local/bin/libreoffice",
    "/usr/local/bin/soffice",
    "/Applications/LibreOffice.app/Contents/MacOS/soffice",
];

#[cfg(windows)]
const CANDIDATES: &[&str] = &[
    r"C:\Program Files\LibreOffice\program\soffice.exe",
    r"C:\Program Files (x86)\LibreOffice\program\soffice.exe",
    r"C:\Program Files\LibreOffice 7\program\soffice.exe",
];

/// A converted document, alive as long as its temporary directory.
#[derive(Debug)]
pub struct ConvertedDocument {
    path: PathBuf,
    _dir: TempDir,
}

impl ConvertedDocument {
    /// Path of the converted `.docx`.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Converts legacy Word files to DOCX with LibreOffice.
#[derive(Debug, Clone)]
pub struct LegacyConverter {
    executable: Option<PathBuf>,
    timeout: Duration,
}

impl LegacyConverter {
    /// Create a converter, preferring `explicit` over auto-discovery.
    pub fn new(explicit: Option<&Path>, timeout: Duration) -> Self {
        Self {
            executable: explicit.map(Path::to_path_buf).or_else(find_libreoffice),
            timeout,
        }
    }

    /// LibreOffice executable in use, if any was found.
    pub fn executable(&self) -> Option<&Path> {
        self.executable.as_deref()
    }

    /// Check if a LibreOffice executable is available.
    pub fn is_available(&self) -> bool {
        self.executable.is_some()
    }

    /// Convert `input` to DOCX inside a fresh temporary directory.
    pub fn convert(&self, input: &Path) -> Result<ConvertedDocument> {
        let soffice = self.executable.as_ref().ok_or_else(|| {
            Error::DependencyMissing(
                "LibreOffice is required to convert .doc files. Please install LibreOffice".into(),
            )
        })?;

        let dir = tempfile::Builder::new().prefix("unoffice-doc-").tempdir()?;
        let mut cmd = build_command(soffice, input, dir.path());
        log::info!("Converting {} with {}", input.display(), soffice.display());

        let mut child = cmd
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| Error::ExternalToolFailure(format!("failed to start LibreOffice: {}", e)))?;

        let (tx, rx) = bounded::<String>(1);
        if let Some(mut stderr) = child.stderr.take() {
            thread::spawn(move || {
                let mut buf = String::new();
                let _ = stderr.read_to_string(&mut buf);
                let _ = tx.send(buf);
            });
        }

        let start = Instant::now();
        let status = loop {
            if let Some(status) = child.try_wait()? {
                break status;
            }
            if start.elapsed() >= self.timeout {
                let _ = child.kill();
                let _ = child.wait();
                return Err(Error::ExternalToolFailure(format!(
                    "conversion timed out after {} seconds",
                    self.timeout.as_secs()
                )));
            }
            thread::sleep(POLL_INTERVAL);
        };

        let stderr = rx.recv_timeout(Duration::from_secs(1)).unwrap_or_default();
        if !status.success() {
            return Err(Error::ExternalToolFailure(format!(
                "LibreOffice exited with {}: {}",
                status,
                stderr.trim()
            )));
        }

        let stem = input
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| Error::Other("File has no name".into()))?;
        let path = dir.path().join(format!("{}.docx", stem));
        if !path.exists() {
            return Err(Error::ExternalToolFailure(format!(
                "converted file not found: {}",
                path.display()
            )));
        }

        log::debug!("Converted in {:.2?}: {}", start.elapsed(), path.display());
        Ok(ConvertedDocument { path, _dir: dir })
    }
}

/// Locate a LibreOffice executable.
pub fn find_libreoffice() -> Option<PathBuf> {
    CANDIDATES
        .iter()
        .map(PathBuf::from)
        .find(|p| p.exists())
        .or_else(|| which::which("soffice").ok())
        .or_else(|| which::which("libreoffice").ok())
}

fn build_command(soffice: &Path, input: &Path, out_dir: &Path) -> Command {
    let mut cmd = match virtual_display() {
        Some(xvfb) => {
            let mut cmd = Command::new(xvfb);
            cmd.arg("-a").arg(soffice);
            cmd
        }
        None => Command::new(soffice),
    };

    cmd.arg("--headless")
        .arg("--convert-to")
        .arg("docx")
        .arg("--outdir")
        .arg(out_dir)
        .arg(input);

    #[cfg(not(windows))]
    cmd.env("SAL_USE_VCLPLUGIN", "svp");

    cmd
}

#[cfg(not(windows))]
fn virtual_display() -> Option<PathBuf> {
    which::which("xvfb-run").ok()
}

#[cfg(windows)]
fn virtual_display() -> Option<PathBuf> {
    None
}
