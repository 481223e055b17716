//! Post-processing of assembled documents.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;

use log::debug;
use xmltool_xml::Document;

use crate::{Error, Result};

/// Transforms an assembled document with a stylesheet.
pub trait PostProcessor: Send + Sync {
    /// Apply `stylesheet` to `document`.
    fn transform(&self, document: &Document, stylesheet: &Path) -> Result<Document>;
}

impl<F> PostProcessor for F
where
    F: Fn(&Document, &Path) -> Result<Document> + Send + Sync,
{
    fn transform(&self, document: &Document, stylesheet: &Path) -> Result<Document> {
        self(document, stylesheet)
    }
}

/// XSLT 1.0 post-processor backed by the `xsltproc` command.
///
/// The document is written to the child's stdin and the transformed result
/// is parsed back from its stdout.
#[derive(Debug, Clone)]
pub struct XsltProcessor {
    program: PathBuf,
}

impl Default for XsltProcessor {
    fn default() -> Self {
        Self::new("xsltproc")
    }
}

impl XsltProcessor {
    /// Use a specific `xsltproc`-compatible executable.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Path of the executable.
    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl PostProcessor for XsltProcessor {
    fn transform(&self, document: &Document, stylesheet: &Path) -> Result<Document> {
        if !stylesheet.is_file() {
            return Err(Error::PostProcess(format!(
                "stylesheet not found: {}",
                stylesheet.display()
            )));
        }

        let input = document.to_xml_string(false)?;
        debug!(
            "Running {} {} on {} bytes",
            self.program.display(),
            stylesheet.display(),
            input.len()
        );

        let mut child = Command::new(&self.program)
            .arg(stylesheet)
            .arg("-")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| Error::PostProcess(format!("failed to start {}: {}", self.program.display(), e)))?;

        // Feed stdin from a second thread while stdout and stderr are drained,
        // so a child that writes before it has read everything cannot block us
        let stdin = child.stdin.take();
        let (written, output) = thread::scope(|scope| {
            let writer = scope.spawn(|| match stdin {
                // Dropping stdin closes the pipe so the child sees end of input
                Some(mut stdin) => stdin.write_all(input.as_bytes()),
                None => Ok(()),
            });
            let output = child.wait_with_output();
            let written = writer
                .join()
                .unwrap_or_else(|_| Err(io::Error::other("stdin writer panicked")));
            (written, output)
        });

        let output = output.map_err(|e| {
            Error::PostProcess(format!("failed to wait for {}: {}", self.program.display(), e))
        })?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::PostProcess(format!(
                "{} exited with {}: {}",
                self.program.display(),
                output.status,
                stderr.trim()
            )));
        }
        written.map_err(|e| Error::PostProcess(format!("failed to write document: {}", e)))?;

        Document::parse_bytes(&output.stdout)
            .map_err(|e| Error::PostProcess(format!("transformation result is not a document: {}", e)))
    }
}
