//! Batch inference over the loaded fraud classifier

use crate::config::AppConfig;
use crate::models::loader::{LoadedModel, ModelLoader};
use crate::types::label::FraudLabel;
use crate::types::table::FeatureFrame;
use anyhow::{anyhow, bail, Context, Result};
use ort::memory::Allocator;
use ort::session::SessionOutputs;
use ort::value::{DowncastableTarget, DynMapValueType, DynSequenceValueType, DynValue, Tensor};
use std::sync::RwLock;
use tracing::debug;

/// Handle to the loaded classifier.
///
/// The session sits behind a lock because running the graph needs
/// exclusive access; the handle itself is never replaced after load.
pub struct FraudClassifier {
    model: RwLock<LoadedModel>,
}

impl FraudClassifier {
    /// Load the classifier named by the configuration.
    ///
    /// Runs once at process start; failure here means no upload can be
    /// served.
    pub fn load(config: &AppConfig) -> Result<Self> {
        let loader = ModelLoader::with_threads(config.model.onnx_threads)?;
        let model = loader.load(&config.model.path)?;
        Ok(Self::from_model(model))
    }

    /// Wrap an already-loaded model.
    pub fn from_model(model: LoadedModel) -> Self {
        Self {
            model: RwLock::new(model),
        }
    }

    /// Predict one label per row of an aligned batch.
    pub fn predict(&self, frame: &FeatureFrame) -> Result<Vec<FraudLabel>> {
        let rows = frame.row_count();

        // Input tensor shape [rows, num_features]
        let shape = vec![rows as i64, frame.column_count() as i64];
        let input_tensor = Tensor::from_array((shape, frame.to_input_buffer()))
            .context("Failed to create input tensor")?;

        let mut guard = self
            .model
            .write()
            .map_err(|e| anyhow!("Lock error: {}", e))?;
        let model = &mut *guard;

        let outputs = model
            .session
            .run(ort::inputs![&model.input_name => input_tensor])?;

        let labels = extract_labels(
            &outputs,
            model.label_output.as_deref(),
            model.probability_output.as_deref(),
            rows,
        )?;

        debug!(rows = rows, "Classifier inference complete");

        Ok(labels)
    }
}

/// Extract one class label per row from the session outputs.
///
/// Handles the layouts classifier exports produce: an integer label
/// tensor, a `[rows, n_classes]` probability tensor, or a
/// seq(map(int64, float)) of per-row class probabilities.
fn extract_labels(
    outputs: &SessionOutputs,
    label_output: Option<&str>,
    probability_output: Option<&str>,
    expected_rows: usize,
) -> Result<Vec<FraudLabel>> {
    // Preferred: the class-id tensor, extracted by name
    if let Some(name) = label_output {
        if let Some(output) = outputs.get(name) {
            if let Ok((_, classes)) = output.try_extract_tensor::<i64>() {
                debug!(output = %name, "Extracted class ids");
                return labels_from_classes(classes, expected_rows);
            }
        }
    }

    // Probability output: tensor argmax, or the seq(map) layout
    if let Some(name) = probability_output {
        if let Some(output) = outputs.get(name) {
            if let Ok((shape, probs)) = output.try_extract_tensor::<f32>() {
                let dims: Vec<i64> = shape.iter().copied().collect();
                debug!(output = %name, "Extracted probabilities");
                return labels_from_probabilities(&dims, probs, expected_rows);
            }

            if DynSequenceValueType::can_downcast(&output.dtype()) {
                debug!(output = %name, "Extracted from seq(map)");
                return labels_from_sequence_maps(output, expected_rows);
            }
        }
    }

    // Fallback: scan all outputs for anything usable
    for (name, output) in outputs.iter() {
        if let Ok((_, classes)) = output.try_extract_tensor::<i64>() {
            debug!(output = %name, "Extracted class ids (fallback)");
            return labels_from_classes(classes, expected_rows);
        }

        if let Ok((shape, probs)) = output.try_extract_tensor::<f32>() {
            let dims: Vec<i64> = shape.iter().copied().collect();
            debug!(output = %name, "Extracted probabilities (fallback)");
            return labels_from_probabilities(&dims, probs, expected_rows);
        }

        if DynSequenceValueType::can_downcast(&output.dtype()) {
            if let Ok(labels) = labels_from_sequence_maps(&output, expected_rows) {
                debug!(output = %name, "Extracted from seq(map) (fallback)");
                return Ok(labels);
            }
        }
    }

    bail!("no prediction output could be read from the classifier")
}

fn labels_from_classes(classes: &[i64], expected_rows: usize) -> Result<Vec<FraudLabel>> {
    if classes.len() != expected_rows {
        bail!(
            "classifier returned {} labels for {} rows",
            classes.len(),
            expected_rows
        );
    }
    Ok(classes.iter().map(|&c| FraudLabel::from_class(c)).collect())
}

fn labels_from_probabilities(
    dims: &[i64],
    probs: &[f32],
    expected_rows: usize,
) -> Result<Vec<FraudLabel>> {
    let (rows, classes) = match dims {
        [rows, classes] => (*rows as usize, *classes as usize),
        [rows] => (*rows as usize, 1),
        _ => bail!("unexpected probability tensor shape {:?}", dims),
    };

    if rows != expected_rows {
        bail!(
            "classifier returned probabilities for {} rows, expected {}",
            rows,
            expected_rows
        );
    }

    let mut labels = Vec::with_capacity(rows);
    for row in 0..rows {
        let class = if classes >= 2 {
            let row_probs = &probs[row * classes..(row + 1) * classes];
            let mut best = 0;
            for (idx, p) in row_probs.iter().enumerate() {
                if *p > row_probs[best] {
                    best = idx;
                }
            }
            best as i64
        } else {
            // Single score column: positive class at 0.5
            i64::from(probs[row] >= 0.5)
        };
        labels.push(FraudLabel::from_class(class));
    }

    Ok(labels)
}

/// Extract labels from seq(map(int64, float)) probabilities, one map per
/// row, taking the class with the highest probability.
fn labels_from_sequence_maps(output: &DynValue, expected_rows: usize) -> Result<Vec<FraudLabel>> {
    let allocator = Allocator::default();

    let sequence = output
        .downcast_ref::<DynSequenceValueType>()
        .map_err(|e| anyhow!("Failed to downcast to sequence: {}", e))?;

    let maps = sequence.try_extract_sequence::<DynMapValueType>(&allocator)?;

    if maps.len() != expected_rows {
        bail!(
            "classifier returned {} probability maps for {} rows",
            maps.len(),
            expected_rows
        );
    }

    let mut labels = Vec::with_capacity(maps.len());
    for map_value in &maps {
        let kv_pairs = map_value.try_extract_key_values::<i64, f32>()?;

        let class = kv_pairs
            .iter()
            .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(class_id, _)| *class_id)
            .ok_or_else(|| anyhow!("empty probability map in classifier output"))?;

        labels.push(FraudLabel::from_class(class));
    }

    Ok(labels)
}

#[cfg(test)]
mod tests {
    use super::*;

    // End-to-end predict() tests would require a serialized classifier
    // artifact; the extraction paths below are covered without one.

    #[test]
    fn test_labels_from_classes() {
        let labels = labels_from_classes(&[0, 1, 0], 3).expect("extract");
        assert_eq!(
            labels,
            vec![FraudLabel::NotFraud, FraudLabel::Fraud, FraudLabel::NotFraud]
        );
    }

    #[test]
    fn test_labels_from_classes_row_mismatch() {
        assert!(labels_from_classes(&[0, 1], 3).is_err());
    }

    #[test]
    fn test_labels_from_probability_matrix() {
        // Two rows, two classes: argmax picks 0 then 1
        let probs = [0.9, 0.1, 0.3, 0.7];
        let labels = labels_from_probabilities(&[2, 2], &probs, 2).expect("extract");
        assert_eq!(labels, vec![FraudLabel::NotFraud, FraudLabel::Fraud]);
    }

    #[test]
    fn test_labels_from_single_score_column() {
        let probs = [0.2, 0.8];
        let labels = labels_from_probabilities(&[2], &probs, 2).expect("extract");
        assert_eq!(labels, vec![FraudLabel::NotFraud, FraudLabel::Fraud]);
    }

    #[test]
    fn test_labels_from_probabilities_row_mismatch() {
        assert!(labels_from_probabilities(&[1, 2], &[0.5, 0.5], 4).is_err());
    }
}
