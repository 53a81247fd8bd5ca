// src/corpus.rs
use flate2::read::GzDecoder;
use rayon::prelude::*;
use serde::Serialize;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use tracing::{debug, info};

use crate::character::sentence_edit_rate;
use crate::error::{Error, Result};

/// Score of one hypothesis/reference line pair, 1-based like the input files.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentenceScore {
    pub line: usize,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorpusScore {
    pub sentences: Vec<SentenceScore>,
    pub average: f64,
    pub standard_deviation: f64,
}

impl CorpusScore {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Reads every line of a UTF-8 text file, gunzipping it first if the path
/// ends with `.gz`.
pub fn load_lines(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    let io_err = |source| Error::Io { path: path.to_path_buf(), source };

    let file = File::open(path).map_err(io_err)?;
    let gzipped = path.extension().is_some_and(|ext| ext == "gz");
    let reader: Box<dyn BufRead> = if gzipped {
        debug!(path = %path.display(), "reading gzipped corpus");
        Box::new(BufReader::new(GzDecoder::new(file)))
    } else {
        Box::new(BufReader::new(file))
    };

    let lines = read_lines(reader).map_err(io_err)?;
    debug!(path = %path.display(), lines = lines.len(), "loaded corpus");
    Ok(lines)
}

/// Splits in-memory text into lines the same way [`load_lines`] does.
pub fn lines_from_reader<R: Read>(reader: R) -> std::io::Result<Vec<String>> {
    read_lines(BufReader::new(reader))
}

fn read_lines<R: BufRead>(reader: R) -> std::io::Result<Vec<String>> {
    reader.lines().collect()
}

/// Scores aligned hypothesis and reference lines with CharacTER.
///
/// Lines are scored independently and in parallel; the result keeps input
/// order. The standard deviation is the population one.
pub fn score_corpus<S: AsRef<str> + Sync>(hypotheses: &[S], references: &[S]) -> Result<CorpusScore> {
    if hypotheses.len() != references.len() {
        return Err(Error::LineCountMismatch { hypothesis: hypotheses.len(), reference: references.len() });
    }
    if hypotheses.is_empty() {
        return Err(Error::EmptyCorpus);
    }

    let sentences: Vec<SentenceScore> = hypotheses
        .par_iter()
        .zip(references.par_iter())
        .enumerate()
        .map(|(idx, (hyp, reference))| SentenceScore {
            line: idx + 1,
            score: sentence_edit_rate(hyp.as_ref(), reference.as_ref()),
        })
        .collect();

    let count = sentences.len() as f64;
    let average = sentences.iter().map(|s| s.score).sum::<f64>() / count;
    let variance = sentences.iter().map(|s| (s.score - average).powi(2)).sum::<f64>() / count;
    let standard_deviation = variance.sqrt();

    info!(sentences = sentences.len(), average, standard_deviation, "scored corpus");
    Ok(CorpusScore { sentences, average, standard_deviation })
}
