use std::collections::HashMap;
use std::path::Path;

use crate::error::PipelineError;

/// The label set the regression model was trained against: ARPAbet
/// phonemes with stress digits, the aligner's non-speech tokens and the
/// no-op boundary token. Order defines one-hot indices and must match
/// the model checkpoint.
const BUILTIN_LABELS: &[&str] = &[
    "EH2", "K", "S", "L", "AH0", "M", //
    "EY1", "SH", "N", "P", "OY2", "T", //
    "OW1", "Z", "W", "D", "AH1", "B", //
    "EH1", "V", "IH1", "AA1", "R", "AY1", //
    "ER0", "AE1", "AE2", "AO1", "NG", "G", //
    "IH0", "TH", "IY2", "F", "DH", "IY1", //
    "HH", "UH1", "IY0", "OY1", "OW2", "CH", //
    "UW1", "IH2", "EH0", "AO2", "AA0", "AA2", //
    "OW0", "EY0", "AE0", "AW2", "AW1", "EY2", //
    "UW0", "AH2", "UW2", "AO0", "JH", "Y", //
    "ZH", "AY2", "ER1", "UH2", "AY0", "ER2", //
    "OY0", "UH0", "AW0", "br", "cg", "lg", "ls", "ns", "sil", "sp", "NOP",
];

/// Fixed, ordered phoneme label set; label → one-hot index lookup.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    labels: Vec<String>,
    index: HashMap<String, usize>,
}

impl Vocabulary {
    pub fn builtin() -> Self {
        Self::from_unique_labels(BUILTIN_LABELS.iter().map(|s| (*s).to_string()).collect())
    }

    pub fn from_labels(labels: Vec<String>) -> Result<Self, PipelineError> {
        let vocab = Self::from_unique_labels(labels);
        if vocab.index.len() != vocab.labels.len() {
            return Err(PipelineError::invalid_input(
                "vocabulary contains duplicate labels",
            ));
        }
        Ok(vocab)
    }

    /// Loads a JSON array of label strings, ordered as trained.
    pub fn load(path: &Path) -> Result<Self, PipelineError> {
        let data = std::fs::read_to_string(path)
            .map_err(|e| PipelineError::io("read vocabulary file", e))?;
        let labels: Vec<String> = serde_json::from_str(&data)
            .map_err(|e| PipelineError::json("parse vocabulary file", e))?;
        Self::from_labels(labels)
    }

    fn from_unique_labels(labels: Vec<String>) -> Self {
        let index = labels
            .iter()
            .enumerate()
            .map(|(i, label)| (label.clone(), i))
            .collect();
        Self { labels, index }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.index.get(label).copied()
    }

    pub fn label(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_has_expected_size_and_tokens() {
        let vocab = Vocabulary::builtin();
        assert_eq!(vocab.len(), 77);
        assert!(vocab.index_of("NOP").is_some());
        assert!(vocab.index_of("sil").is_some());
        assert!(vocab.index_of("sp").is_some());
        assert!(vocab.index_of("AH0").is_some());
        assert!(vocab.index_of("XX").is_none());
    }

    #[test]
    fn index_label_round_trip_over_whole_vocabulary() {
        let vocab = Vocabulary::builtin();
        for i in 0..vocab.len() {
            let label = vocab.label(i).expect("index in range");
            assert_eq!(vocab.index_of(label), Some(i));
        }
    }

    #[test]
    fn duplicate_labels_rejected() {
        let labels = vec!["K".to_string(), "T".to_string(), "K".to_string()];
        let err = Vocabulary::from_labels(labels).expect_err("duplicates rejected");
        assert!(matches!(err, PipelineError::InvalidInput { .. }));
    }

    #[test]
    fn loads_json_array_file() {
        let path = std::env::temp_dir().join("phoneme2face_vocab_load.json");
        std::fs::write(&path, r#"["K", "T", "NOP"]"#).expect("write vocab");
        let vocab = Vocabulary::load(&path).expect("load should succeed");
        assert_eq!(vocab.len(), 3);
        assert_eq!(vocab.index_of("T"), Some(1));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let result = Vocabulary::load(Path::new("/nonexistent/vocab.json"));
        assert!(matches!(result, Err(PipelineError::Io { .. })));
    }
}
