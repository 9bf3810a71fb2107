use std::{
    fmt,
    fs::File,
    io::{self, BufWriter, StdoutLock, Write as _},
    path::PathBuf,
};

use anyhow::Context as _;
use serde::Serialize;

/// Format of reports made of flat rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ReportFormat {
    #[default]
    Json,
    Csv,
}

/// Report destination: a file if a path was given, stdout otherwise.
#[derive(Debug)]
pub enum Output {
    Stdout {
        writer: StdoutLock<'static>,
    },
    File {
        writer: BufWriter<File>,
        path: PathBuf,
    },
}

impl fmt::Display for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Output::Stdout { .. } => f.write_str("stdout"),
            Output::File { path, .. } => fmt::Display::fmt(&path.display(), f),
        }
    }
}

impl Output {
    pub fn from_output_path(output_path: Option<PathBuf>) -> anyhow::Result<Self> {
        let Some(path) = output_path else {
            return Ok(Output::Stdout {
                writer: io::stdout().lock(),
            });
        };
        let file = File::create(&path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        Ok(Output::File {
            writer: BufWriter::new(file),
            path,
        })
    }

    pub fn write_json<T>(&mut self, value: &T) -> anyhow::Result<()>
    where
        T: Serialize,
    {
        serde_json::to_writer_pretty(&mut *self, value)
            .with_context(|| format!("Failed to write JSON to {self}"))?;
        writeln!(&mut *self).with_context(|| format!("Failed to write JSON to {self}"))?;
        self.finish()
    }

    /// Writes one record per row, under a header taken from the row's field names.
    pub fn write_csv<I, T>(&mut self, rows: I) -> anyhow::Result<()>
    where
        I: IntoIterator<Item = T>,
        T: Serialize,
    {
        let mut writer = csv::Writer::from_writer(&mut *self);
        let written = rows
            .into_iter()
            .try_for_each(|row| writer.serialize(row))
            .and_then(|()| writer.flush().map_err(csv::Error::from));
        drop(writer);
        written.with_context(|| format!("Failed to write CSV to {self}"))?;
        self.finish()
    }

    fn finish(&mut self) -> anyhow::Result<()> {
        self.flush()
            .with_context(|| format!("Failed to flush output to {self}"))
    }
}

impl io::Write for Output {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Output::Stdout { writer } => writer.write(buf),
            Output::File { writer, .. } => writer.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Output::Stdout { writer } => writer.flush(),
            Output::File { writer, .. } => writer.flush(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[derive(Serialize)]
    struct Row {
        title: &'static str,
        value: i64,
        quarter: Option<&'static str>,
    }

    #[test]
    fn test_write_csv_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.csv");
        let mut output = Output::from_output_path(Some(path.clone())).unwrap();
        assert_eq!(output.to_string(), path.display().to_string());

        let rows = [
            Row {
                title: "Mine",
                value: 18,
                quarter: Some("q1"),
            },
            Row {
                title: "Comet",
                value: -3,
                quarter: None,
            },
        ];
        output.write_csv(&rows).unwrap();
        drop(output);

        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(written, "title,value,quarter\nMine,18,q1\nComet,-3,\n");
    }

    #[test]
    fn test_write_json_ends_with_newline() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        let mut output = Output::from_output_path(Some(path.clone())).unwrap();
        output.write_json(&[1, 2]).unwrap();
        drop(output);

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.ends_with("]\n"));
        assert_eq!(serde_json::from_str::<Vec<u8>>(&written).unwrap(), [1, 2]);
    }
}
