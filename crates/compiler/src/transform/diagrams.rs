//! Diagram extraction and restoration.
//!
//! Fenced diagram sources are compiled before the markdown parser runs and
//! replaced by HTML comment placeholders. The compiled markup goes back in
//! after stringification, so diagram text is never read as markdown.

use crate::error::CompileError;
use crate::renderer::DIAGRAM_MARKER_PREFIX;
use coursmd_core::code_fence::info_language;
use coursmd_core::{FenceEvent, FenceState, advance_fence_state};
use rayon::prelude::*;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::io::Write;
use std::process::{Command, Stdio};
use thiserror::Error;

/// Failure of an external diagram compiler.
#[derive(Debug, Error)]
pub enum DiagramError {
    /// The pipeline has no diagram compiler configured.
    #[error("no diagram compiler configured")]
    Unavailable,
    /// The compiler process could not be started or fed.
    #[error("failed to run `{program}`: {source}")]
    Spawn {
        /// Program name.
        program: String,
        /// Underlying IO error.
        source: std::io::Error,
    },
    /// The compiler exited with a failure status.
    #[error("`{program}` exited with {status}: {stderr}")]
    Failed {
        /// Program name.
        program: String,
        /// Exit status as printed by the OS.
        status: String,
        /// Captured standard error.
        stderr: String,
    },
    /// The compiler produced something that is not markup.
    #[error("{0}")]
    Invalid(String),
}

/// Turns diagram source into inline vector markup (usually SVG).
///
/// Implementations are called from several threads at once for the fences of
/// a single document.
pub trait DiagramCompiler: Send + Sync {
    /// Compiles one fence body.
    fn compile(&self, source: &str) -> Result<String, DiagramError>;
}

impl<F> DiagramCompiler for F
where
    F: Fn(&str) -> Result<String, DiagramError> + Send + Sync,
{
    fn compile(&self, source: &str) -> Result<String, DiagramError> {
        self(source)
    }
}

/// Rejects every diagram. Documents without diagram fences compile fine.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoDiagramCompiler;

impl DiagramCompiler for NoDiagramCompiler {
    fn compile(&self, _source: &str) -> Result<String, DiagramError> {
        Err(DiagramError::Unavailable)
    }
}

/// Runs an external program with the fence body on stdin and reads the
/// markup from stdout.
#[derive(Debug, Clone)]
pub struct CommandDiagramCompiler {
    program: String,
    args: Vec<String>,
}

impl CommandDiagramCompiler {
    /// Program to run, looked up on `PATH`.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Appends a command-line argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }
}

impl DiagramCompiler for CommandDiagramCompiler {
    fn compile(&self, source: &str) -> Result<String, DiagramError> {
        let spawn_error = |source| DiagramError::Spawn {
            program: self.program.clone(),
            source,
        };

        log::debug!("Compiling diagram with {}", self.program);
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(spawn_error)?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(source.as_bytes()).map_err(spawn_error)?;
        }
        let output = child.wait_with_output().map_err(spawn_error)?;

        if !output.status.success() {
            return Err(DiagramError::Failed {
                program: self.program.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        String::from_utf8(output.stdout)
            .map(|markup| markup.trim().to_string())
            .map_err(|err| DiagramError::Invalid(format!("output is not UTF-8: {}", err)))
    }
}

/// A placeholder and the markup it stands for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    /// HTML comment substituted into the source.
    pub marker: String,
    /// Compiled markup.
    pub markup: String,
}

/// Source with diagrams replaced, plus the mapping needed to restore them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    /// Source text handed to the markdown parser.
    pub source: String,
    /// One entry per extracted fence, in document order.
    pub placeholders: Vec<Placeholder>,
}

struct DiagramFence {
    first_line: usize,
    last_line: usize,
    body: String,
}

/// Replaces every fence tagged `language` by a placeholder after compiling
/// all of them in parallel. An empty `language` disables extraction.
pub fn extract(
    source: &str,
    language: &str,
    compiler: &dyn DiagramCompiler,
) -> Result<Extraction, CompileError> {
    let lines: Vec<&str> = source.lines().collect();
    let fences = if language.is_empty() {
        Vec::new()
    } else {
        find_fences(&lines, language)
    };
    if fences.is_empty() {
        return Ok(Extraction {
            source: source.to_string(),
            placeholders: Vec::new(),
        });
    }

    let compiled: Vec<Result<String, DiagramError>> = fences
        .par_iter()
        .map(|fence| compiler.compile(&fence.body))
        .collect();

    let nonce = source_nonce(source);
    let mut placeholders = Vec::with_capacity(fences.len());
    for (index, result) in compiled.into_iter().enumerate() {
        let markup = result.map_err(|source| CompileError::Diagram { index, source })?;
        placeholders.push(Placeholder {
            marker: format!("{}{:016x}-{}-->", DIAGRAM_MARKER_PREFIX, nonce, index),
            markup,
        });
    }

    let mut out = String::with_capacity(source.len());
    let mut next_line = 0;
    for (fence, placeholder) in fences.iter().zip(&placeholders) {
        for line in &lines[next_line..fence.first_line] {
            out.push_str(line);
            out.push('\n');
        }
        out.push('\n');
        out.push_str(&placeholder.marker);
        out.push_str("\n\n");
        next_line = fence.last_line + 1;
    }
    for line in &lines[next_line..] {
        out.push_str(line);
        out.push('\n');
    }

    log::debug!("Extracted {} diagram(s)", placeholders.len());
    Ok(Extraction {
        source: out,
        placeholders,
    })
}

/// Puts compiled markup back in place of each placeholder.
pub fn restore(html: &str, placeholders: &[Placeholder]) -> String {
    let mut html = html.to_string();
    for placeholder in placeholders {
        if !html.contains(&placeholder.marker) {
            log::warn!("Diagram placeholder missing from output: {}", placeholder.marker);
            continue;
        }
        html = html.replace(
            &placeholder.marker,
            &format!("<div class=\"diagram\">{}</div>", placeholder.markup),
        );
    }
    html
}

fn find_fences(lines: &[&str], language: &str) -> Vec<DiagramFence> {
    let mut fences = Vec::new();
    let mut state = FenceState::default();
    let mut open: Option<DiagramFence> = None;

    for (index, line) in lines.iter().enumerate() {
        let outcome = advance_fence_state(line, state);
        state = outcome.next_state;

        match outcome.event {
            FenceEvent::Opened { info } if info_language(&info) == language => {
                open = Some(DiagramFence {
                    first_line: index,
                    last_line: index,
                    body: String::new(),
                });
            }
            FenceEvent::Closed => {
                if let Some(mut fence) = open.take() {
                    fence.last_line = index;
                    fences.push(fence);
                }
            }
            _ => {
                if let Some(fence) = open.as_mut() {
                    fence.body.push_str(line);
                    fence.body.push('\n');
                }
            }
        }
    }

    if open.is_some() {
        log::warn!("Unterminated {} fence left as code", language);
    }
    fences
}

pub(crate) fn source_nonce(source: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    source.hash(&mut hasher);
    hasher.finish()
}
