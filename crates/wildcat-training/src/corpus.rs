//! Training corpora: delimited text files of `inputs ++ targets` rows.
//!
//! Files are written by the `field` command. Each row holds the input values followed by the
//! target values. Rows whose first token starts with a letter are column headers and are
//! skipped, as are blank lines.

use std::{
    fs::{self, File},
    io::{self, BufRead, BufReader},
    path::{Path, PathBuf},
};

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum CorpusError {
    #[display("failed to read {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },
    #[display("line {line}: `{token}` is not a number")]
    Parse { line: usize, token: String },
    #[display("line {line}: expected {expected} values, got {actual}")]
    RowLength {
        line: usize,
        expected: usize,
        actual: usize,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub inputs: Vec<f32>,
    pub targets: Vec<f32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Corpus {
    input_len: usize,
    output_len: usize,
    samples: Vec<Sample>,
}

impl Corpus {
    #[must_use]
    pub fn new(input_len: usize, output_len: usize) -> Self {
        Self {
            input_len,
            output_len,
            samples: Vec::new(),
        }
    }

    /// Parses rows split on `delimiter`, or on whitespace when it is `None`.
    pub fn parse<R>(
        reader: R,
        delimiter: Option<char>,
        input_len: usize,
        output_len: usize,
    ) -> Result<Self, CorpusError>
    where
        R: BufRead,
    {
        let mut corpus = Self::new(input_len, output_len);
        for (index, line) in reader.lines().enumerate() {
            let line_no = index + 1;
            let line = line.map_err(|source| CorpusError::Io {
                path: PathBuf::from("<reader>"),
                source,
            })?;
            let tokens: Vec<&str> = match delimiter {
                Some(d) => line.split(d).map(str::trim).filter(|t| !t.is_empty()).collect(),
                None => line.split_whitespace().collect(),
            };
            let Some(first) = tokens.first() else {
                continue;
            };
            if first.starts_with(|c: char| c.is_alphabetic()) {
                continue;
            }

            let values = tokens
                .iter()
                .map(|t| {
                    t.parse::<f32>().map_err(|_| CorpusError::Parse {
                        line: line_no,
                        token: (*t).to_owned(),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            if values.len() != input_len + output_len {
                return Err(CorpusError::RowLength {
                    line: line_no,
                    expected: input_len + output_len,
                    actual: values.len(),
                });
            }
            let (inputs, targets) = values.split_at(input_len);
            corpus.samples.push(Sample {
                inputs: inputs.to_vec(),
                targets: targets.to_vec(),
            });
        }
        Ok(corpus)
    }

    pub fn read_file(
        path: &Path,
        delimiter: Option<char>,
        input_len: usize,
        output_len: usize,
    ) -> Result<Self, CorpusError> {
        let io_error = |source| CorpusError::Io {
            path: path.to_owned(),
            source,
        };
        let file = File::open(path).map_err(io_error)?;
        Self::parse(BufReader::new(file), delimiter, input_len, output_len).map_err(|e| match e {
            CorpusError::Io { source, .. } => io_error(source),
            e => e,
        })
    }

    /// Reads every regular file in `dir`, in file name order.
    pub fn read_dir(
        dir: &Path,
        delimiter: Option<char>,
        input_len: usize,
        output_len: usize,
    ) -> Result<Self, CorpusError> {
        let io_error = |source| CorpusError::Io {
            path: dir.to_owned(),
            source,
        };
        let mut paths = fs::read_dir(dir)
            .map_err(io_error)?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<Result<Vec<_>, _>>()
            .map_err(io_error)?;
        paths.retain(|p| p.is_file());
        paths.sort();

        let mut corpus = Self::new(input_len, output_len);
        for path in paths {
            let file = Self::read_file(&path, delimiter, input_len, output_len)?;
            corpus.samples.extend(file.samples);
        }
        Ok(corpus)
    }

    #[must_use]
    pub fn input_len(&self) -> usize {
        self.input_len
    }

    #[must_use]
    pub fn output_len(&self) -> usize {
        self.output_len
    }

    #[must_use]
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// # Panics
    ///
    /// Panics if the sample does not have this corpus's shape.
    pub fn push(&mut self, sample: Sample) {
        assert_eq!(sample.inputs.len(), self.input_len);
        assert_eq!(sample.targets.len(), self.output_len);
        self.samples.push(sample);
    }
}
