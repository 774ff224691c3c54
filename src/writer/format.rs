use std::io::{ErrorKind, Write};
use std::path::Path;
use std::process::{Command, Output, Stdio};
use std::thread;

use anyhow::{bail, Context};

/// Text-in, text-out normalizer applied to every rendered file
pub trait Formatter: Send + Sync {
    /// Format `text`, `path` is the file it will be written to
    ///
    /// # Errors
    ///
    /// Returns an error if the formatter rejects the text.
    fn format(&self, text: &str, path: &Path) -> anyhow::Result<String>;

    /// Sort the import block of a Python module
    ///
    /// `module_name` is the service module, so its imports are grouped as
    /// first-party.
    ///
    /// # Errors
    ///
    /// Returns an error if the import sorter fails.
    fn sort_imports(&self, text: &str, module_name: &str, extension: &str) -> anyhow::Result<String>;
}

/// Strip trailing whitespace from every line and end with exactly one newline
pub fn normalize_text(text: &str) -> String {
    let mut normalized = text
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
        .trim_end()
        .to_string();
    if !normalized.is_empty() {
        normalized.push('\n');
    }
    normalized
}

/// Whether `path` is a Python source or stub file
pub fn is_python_path(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("py") | Some("pyi")
    )
}

/// [`Formatter`] that only normalizes whitespace
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughFormatter;

impl Formatter for PassthroughFormatter {
    fn format(&self, text: &str, _path: &Path) -> anyhow::Result<String> {
        Ok(normalize_text(text))
    }

    fn sort_imports(&self, text: &str, _module_name: &str, _extension: &str) -> anyhow::Result<String> {
        Ok(text.to_string())
    }
}

/// [`Formatter`] piping Python files through external tools
///
/// Each command reads the text on stdin and writes the result to stdout.
/// Arguments may contain `{path}`, `{module_name}` and `{extension}`
/// placeholders. An empty command leaves the text as normalized by
/// [`normalize_text`]; non-Python files are only normalized.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandFormatter {
    format_command: Vec<String>,
    sort_imports_command: Vec<String>,
}

impl CommandFormatter {
    pub fn new(format_command: Vec<String>, sort_imports_command: Vec<String>) -> Self {
        Self {
            format_command,
            sort_imports_command,
        }
    }

    fn run(command: &[String], text: &str, substitutions: &[(&str, &str)]) -> anyhow::Result<String> {
        let Some((program, args)) = command.split_first() else {
            return Ok(text.to_string());
        };
        let args: Vec<String> = args
            .iter()
            .map(|arg| {
                substitutions
                    .iter()
                    .fold(arg.clone(), |arg, (key, value)| arg.replace(key, value))
            })
            .collect();

        let mut child = Command::new(program)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("Failed to start formatter: {program}"))?;
        // Feed stdin from its own thread while stdout is drained here, so a
        // tool that streams its output never blocks on a full pipe.
        let stdin = child.stdin.take();
        let output = thread::scope(|scope| -> anyhow::Result<Output> {
            let writer = scope.spawn(move || match stdin {
                Some(mut stdin) => stdin.write_all(text.as_bytes()),
                None => Ok(()),
            });
            let output = child
                .wait_with_output()
                .with_context(|| format!("Failed to wait for formatter: {program}"))?;
            match writer.join() {
                // A tool that exits early closes the pipe; its exit status reports why.
                Ok(Err(err)) if err.kind() != ErrorKind::BrokenPipe => {
                    Err(err).with_context(|| format!("Failed to write to formatter: {program}"))
                }
                Ok(_) => Ok(output),
                Err(_) => bail!("Formatter input thread panicked: {program}"),
            }
        })?;
        if !output.status.success() {
            bail!(
                "{program} failed with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        String::from_utf8(output.stdout).with_context(|| format!("{program} produced invalid UTF-8"))
    }
}

impl Formatter for CommandFormatter {
    fn format(&self, text: &str, path: &Path) -> anyhow::Result<String> {
        let normalized = normalize_text(text);
        if !is_python_path(path) {
            return Ok(normalized);
        }
        let path_text = path.display().to_string();
        Self::run(&self.format_command, &normalized, &[("{path}", path_text.as_str())])
    }

    fn sort_imports(&self, text: &str, module_name: &str, extension: &str) -> anyhow::Result<String> {
        Self::run(
            &self.sort_imports_command,
            text,
            &[("{module_name}", module_name), ("{extension}", extension)],
        )
    }
}
