//! Headless Chromium backend.
//!
//! Every print runs the browser once with `--print-to-pdf`. A context owns
//! a private profile directory that is deleted on release.

use async_trait::async_trait;
use coulage_render_core::{PageLayout, PdfOutput, PdfRenderer, RenderError, RenderingContext};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tempfile::TempDir;
use tokio::process::Command;

/// Binaries searched on `PATH` when no executable is configured.
const SYSTEM_CANDIDATES: &[&str] = &[
    "chromium",
    "chromium-browser",
    "google-chrome",
    "google-chrome-stable",
    "headless_shell",
];

const BASE_ARGS: &[&str] = &[
    "--headless=new",
    "--no-sandbox",
    "--disable-setuid-sandbox",
    "--disable-dev-shm-usage",
    "--disable-gpu",
    "--no-pdf-header-footer",
    "--run-all-compositor-stages-before-draw",
];

const DEFAULT_READY_BUDGET: Duration = Duration::from_secs(10);

/// Extra time granted on top of the content budget for process start-up and capture.
const LAUNCH_GRACE: Duration = Duration::from_secs(15);

#[derive(Debug, Clone)]
pub struct ChromeRenderer {
    executable: PathBuf,
    extra_args: Vec<String>,
}

impl ChromeRenderer {
    pub fn new(executable: PathBuf, extra_args: Vec<String>) -> Self {
        Self {
            executable,
            extra_args,
        }
    }

    /// Picks the configured binary, or the first known browser on `PATH`.
    pub fn locate(configured: Option<&Path>) -> Result<PathBuf, RenderError> {
        if let Some(path) = configured {
            return if path.is_file() {
                Ok(path.to_path_buf())
            } else {
                Err(RenderError::Launch(format!(
                    "configured browser not found: {}",
                    path.display()
                )))
            };
        }

        let search_path = std::env::var_os("PATH").unwrap_or_default();
        std::env::split_paths(&search_path)
            .flat_map(|dir| SYSTEM_CANDIDATES.iter().map(move |name| dir.join(name)))
            .find(|candidate| candidate.is_file())
            .ok_or_else(|| {
                RenderError::Launch(format!(
                    "no browser found on PATH (tried {})",
                    SYSTEM_CANDIDATES.join(", ")
                ))
            })
    }
}

#[async_trait]
impl PdfRenderer for ChromeRenderer {
    async fn acquire(&self) -> Result<Box<dyn RenderingContext>, RenderError> {
        let profile = tempfile::Builder::new()
            .prefix("coulage-chrome-")
            .tempdir()
            .map_err(|e| RenderError::Launch(format!("cannot create browser profile: {e}")))?;
        log::debug!("Acquired browser context in {}", profile.path().display());
        Ok(Box::new(ChromeContext {
            renderer: self.clone(),
            profile,
        }))
    }

    fn name(&self) -> &'static str {
        "chrome"
    }
}

struct ChromeContext {
    renderer: ChromeRenderer,
    profile: TempDir,
}

#[async_trait]
impl RenderingContext for ChromeContext {
    async fn print(
        &mut self,
        markup: &str,
        layout: &PageLayout,
        ready_timeout: Option<Duration>,
    ) -> Result<PdfOutput, RenderError> {
        let input = self.profile.path().join("document.html");
        let output = self.profile.path().join("document.pdf");
        tokio::fs::write(&input, with_layout(markup, layout)).await?;

        let budget = ready_timeout.unwrap_or(DEFAULT_READY_BUDGET);
        let mut command = Command::new(&self.renderer.executable);
        command
            .args(self.print_args(&input, &output, layout, budget))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let run = tokio::time::timeout(budget + LAUNCH_GRACE, command.output())
            .await
            .map_err(|_| RenderError::Timeout(budget + LAUNCH_GRACE))?
            .map_err(|e| {
                RenderError::Launch(format!("{}: {e}", self.renderer.executable.display()))
            })?;

        if !run.status.success() {
            return Err(RenderError::Process {
                status: run.status.to_string(),
                stderr: String::from_utf8_lossy(&run.stderr).trim().to_string(),
            });
        }

        Ok(PdfOutput::Buffer(tokio::fs::read(&output).await?))
    }

    async fn release(self: Box<Self>) -> Result<(), RenderError> {
        let path = self.profile.path().to_path_buf();
        self.profile.close()?;
        log::debug!("Released browser context {}", path.display());
        Ok(())
    }
}

impl ChromeContext {
    /// Command line of one print.
    ///
    /// With `await_fonts` the browser runs on virtual time for up to `budget`,
    /// so pending font and image loads settle before capture. Without it the
    /// page is captured as soon as it has loaded.
    fn print_args(
        &self,
        input: &Path,
        output: &Path,
        layout: &PageLayout,
        budget: Duration,
    ) -> Vec<String> {
        let mut args: Vec<String> = BASE_ARGS.iter().map(|a| a.to_string()).collect();
        args.push(format!(
            "--user-data-dir={}",
            self.profile.path().join("profile").display()
        ));
        if layout.await_fonts {
            args.push(format!("--virtual-time-budget={}", budget.as_millis()));
        }
        args.push(format!("--print-to-pdf={}", output.display()));
        args.extend(self.renderer.extra_args.iter().cloned());
        args.push(format!("file://{}", input.display()));
        args
    }
}

/// Adds the page layout as a style block at the end of the document head.
fn with_layout(markup: &str, layout: &PageLayout) -> String {
    let style = format!("<style>{}</style>", layout.to_css());
    match markup.to_ascii_lowercase().find("</head>") {
        Some(at) => format!("{}{}{}", &markup[..at], style, &markup[at..]),
        None => format!("{style}{markup}"),
    }
}
