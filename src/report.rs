//! Rendering of check results

use std::io::{self, Write};

use clap::ValueEnum;

use crate::checker::UpdateInfo;

/// Output format of the report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One line per image, human readable
    #[default]
    Text,
    /// Pretty printed JSON array
    Json,
}

/// Writes `results` in `format`.
///
/// Only images with an update are listed unless `show_all` is set.
pub fn write_report<W: Write>(
    writer: &mut W,
    results: &[UpdateInfo],
    format: OutputFormat,
    show_all: bool,
) -> io::Result<()> {
    let listed: Vec<&UpdateInfo> = results
        .iter()
        .filter(|info| show_all || info.has_update())
        .collect();

    match format {
        OutputFormat::Text => write_text(writer, &listed, results.len()),
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *writer, &listed)?;
            writeln!(writer)
        }
    }
}

fn write_text<W: Write>(writer: &mut W, listed: &[&UpdateInfo], checked: usize) -> io::Result<()> {
    for info in listed {
        let location = format!("{}:{}", info.file_path.display(), info.line);
        match &info.latest_tag {
            Some(latest) => writeln!(
                writer,
                "{}  {}  {} -> {}",
                location, info.image_name, info.current_tag, latest
            )?,
            None => writeln!(
                writer,
                "{}  {}  {} (no update found)",
                location, info.image_name, info.current_tag
            )?,
        }
    }

    let updates = listed.iter().filter(|info| info.has_update()).count();
    if updates == 0 {
        writeln!(writer, "No updates found ({} image(s) checked)", checked)?;
    }

    Ok(())
}
