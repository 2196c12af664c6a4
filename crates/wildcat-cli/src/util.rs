use std::{
    fs::File,
    io::{self, BufWriter, StdoutLock, Write as _},
    path::PathBuf,
};

use anyhow::Context;
use rand::SeedableRng as _;
use rand_pcg::Pcg64;

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

impl Output {
    pub fn save_json<T>(value: &T, output_path: Option<PathBuf>) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        let mut output = Output::from_output_path(output_path)?;
        output.write_json(value)
    }

    pub fn from_output_path(output_path: Option<PathBuf>) -> anyhow::Result<Self> {
        match output_path {
            Some(path) => Output::open(path),
            None => Ok(Output::stdout()),
        }
    }

    pub fn stdout() -> Self {
        Output::Stdout {
            writer: io::stdout().lock(),
        }
    }

    pub fn open(path: PathBuf) -> anyhow::Result<Self> {
        let file = File::create(&path)
            .with_context(|| format!("Failed to create output file: {}", path.display()))?;
        Ok(Output::File {
            writer: BufWriter::new(file),
            path,
        })
    }

    pub fn display_path(&self) -> String {
        match self {
            Output::Stdout { .. } => "stdout".to_string(),
            Output::File { path, .. } => path.display().to_string(),
        }
    }

    pub fn write_json<T>(&mut self, value: T) -> anyhow::Result<()>
    where
        T: serde::Serialize,
    {
        serde_json::to_writer_pretty(&mut *self, &value)
            .with_context(|| format!("Failed to write JSON to {}", self.display_path()))?;
        writeln!(&mut *self).with_context(|| {
            format!(
                "Failed to write newline after JSON to {}",
                self.display_path()
            )
        })?;
        self.finish()
    }

    /// Writes one line of `values` joined by `delimiter`.
    pub fn write_row<I, T>(&mut self, values: I, delimiter: &str) -> anyhow::Result<()>
    where
        I: IntoIterator<Item = T>,
        T: std::fmt::Display,
    {
        let line = values
            .into_iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(delimiter);
        writeln!(self, "{line}")
            .with_context(|| format!("Failed to write to {}", self.display_path()))
    }

    pub fn finish(&mut self) -> anyhow::Result<()> {
        self.flush()
            .with_context(|| format!("Failed to flush output to {}", self.display_path()))
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

/// Rejects empty field dimensions before they reach the generator.
pub fn ensure_field_size(width: usize, height: usize) -> anyhow::Result<()> {
    anyhow::ensure!(
        width > 0 && height > 0,
        "field must be at least 1x1, got {width}x{height}"
    );
    Ok(())
}

/// A reproducible generator when `seed` is given, otherwise one seeded from the OS.
pub fn rng_from_seed(seed: Option<u64>) -> Pcg64 {
    match seed {
        Some(seed) => Pcg64::seed_from_u64(seed),
        None => Pcg64::from_rng(&mut rand::rng()),
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use rand::Rng as _;

    use super::*;

    #[test]
    fn test_write_row_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rows.dat");
        let mut output = Output::from_output_path(Some(path.clone())).unwrap();
        output.write_row(["PROB_0", "WET_0"], " ").unwrap();
        output.write_row([0.5_f32, 1.0], " ").unwrap();
        output.finish().unwrap();
        drop(output);

        assert_eq!(fs::read_to_string(&path).unwrap(), "PROB_0 WET_0\n0.5 1\n");
    }

    #[test]
    fn test_ensure_field_size() {
        assert!(ensure_field_size(80, 24).is_ok());
        assert!(ensure_field_size(1, 1).is_ok());
        assert!(ensure_field_size(0, 24).is_err());
        assert!(ensure_field_size(80, 0).is_err());
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let a = rng_from_seed(Some(9)).random::<u64>();
        let b = rng_from_seed(Some(9)).random::<u64>();
        assert_eq!(a, b);
    }
}
