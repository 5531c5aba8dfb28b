use std::{
    fs::File,
    io::{self, BufReader, BufWriter, StdoutLock, Write},
    path::Path,
};

use anyhow::Context;
use robby_policy::Policy;

use crate::model::policy_model::PolicyFile;

/// Destination of a JSON document.
enum Output {
    Stdout(StdoutLock<'static>),
    File(BufWriter<File>),
}

impl Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Output::Stdout(writer) => writer.write(buf),
            Output::File(writer) => writer.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Output::Stdout(writer) => writer.flush(),
            Output::File(writer) => writer.flush(),
        }
    }
}

/// Writes `value` as pretty JSON to `path`, or to stdout when no path is given.
pub fn save_json<T>(value: &T, path: Option<&Path>) -> anyhow::Result<()>
where
    T: serde::Serialize,
{
    let target = path.map_or_else(|| "stdout".to_owned(), |p| p.display().to_string());
    let mut output = match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {target}"))?;
            Output::File(BufWriter::new(file))
        }
        None => Output::Stdout(io::stdout().lock()),
    };

    serde_json::to_writer_pretty(&mut output, value)
        .with_context(|| format!("Failed to write JSON to {target}"))?;
    writeln!(output)
        .and_then(|()| output.flush())
        .with_context(|| format!("Failed to flush output to {target}"))?;
    Ok(())
}

/// Reads a policy from a model file or a bare policy table.
///
/// Falls back to the built-in heuristic when no path is given.
pub fn load_policy(path: Option<&Path>) -> anyhow::Result<Policy> {
    let Some(path) = path else {
        log::info!("Using the default strategy");
        return Ok(Policy::default_strategy());
    };
    let file = File::open(path)
        .with_context(|| format!("Failed to open policy file: {}", path.display()))?;
    let policy_file: PolicyFile = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse policy JSON file: {}", path.display()))?;
    log::info!("Loaded policy from {}", path.display());
    Ok(policy_file.into_policy())
}
