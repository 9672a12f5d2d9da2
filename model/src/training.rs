//! Supervised training of the policy network.
//!
//! A direct application of a standard classification loop: shuffle, batch,
//! cross-entropy over the 4096 move indices, AdamW. The last tenth of the
//! dataset is held out for validation and never trained on.

use crate::{ModelError, PolicyNetwork};
use candle_core::{DType, Device, Tensor, D};
use candle_nn::{loss, AdamW, Optimizer, ParamsAdamW, VarBuilder, VarMap};
use fianchetto::{TrainingSet, FEATURE_SIZE};
use rand::seq::SliceRandom;
use std::path::Path;

pub const EPOCHS: usize = 1;
pub const BATCH_SIZE: usize = 64;
pub const VALIDATION_SPLIT: f64 = 0.1;

/// Summary of a completed training run, taken from the final epoch.
#[derive(Debug, Clone)]
pub struct TrainingReport {
    pub examples: usize,
    pub train_loss: f32,
    /// `None` when the dataset was too small to hold anything out.
    pub validation_loss: Option<f32>,
    pub validation_accuracy: Option<f32>,
}

/// Fits a fresh network against the training set and returns its parameters.
pub fn train(set: &TrainingSet, device: &Device) -> Result<(VarMap, TrainingReport), ModelError> {
    let n = set.len();
    let val_len = (n as f64 * VALIDATION_SPLIT) as usize;
    let train_len = n - val_len;
    if train_len == 0 {
        return Err(ModelError::EmptyTrainingSet);
    }

    let x = Tensor::from_slice(&set.features, (n, FEATURE_SIZE), device)?;
    let y = Tensor::from_slice(&set.labels, (n,), device)?;

    // Held-out tail, matching a validation split applied before shuffling.
    let x_train = x.narrow(0, 0, train_len)?;
    let y_train = y.narrow(0, 0, train_len)?;

    let varmap = VarMap::new();
    let vb = VarBuilder::from_varmap(&varmap, DType::F32, device);
    let network = PolicyNetwork::new(vb)?;
    let mut optimizer = AdamW::new(varmap.all_vars(), ParamsAdamW::default())?;

    let mut report = TrainingReport {
        examples: n,
        train_loss: f32::INFINITY,
        validation_loss: None,
        validation_accuracy: None,
    };

    let mut indices: Vec<u32> = (0..train_len as u32).collect();
    let mut rng = rand::thread_rng();

    for epoch in 1..=EPOCHS {
        indices.shuffle(&mut rng);
        let order = Tensor::from_slice(&indices, (train_len,), device)?;
        let xs = x_train.index_select(&order, 0)?;
        let ys = y_train.index_select(&order, 0)?;

        let mut loss_sum = 0.0;
        let mut batches = 0;
        let mut start = 0;
        while start < train_len {
            let len = BATCH_SIZE.min(train_len - start);
            let logits = network.forward(&xs.narrow(0, start, len)?)?;
            let batch_loss = loss::cross_entropy(&logits, &ys.narrow(0, start, len)?)?;
            optimizer.backward_step(&batch_loss)?;
            loss_sum += batch_loss.to_scalar::<f32>()?;
            batches += 1;
            start += len;
        }
        report.train_loss = loss_sum / batches as f32;

        if val_len > 0 {
            let x_val = x.narrow(0, train_len, val_len)?;
            let y_val = y.narrow(0, train_len, val_len)?;
            let logits = network.forward(&x_val)?;
            let val_loss = loss::cross_entropy(&logits, &y_val)?.to_scalar::<f32>()?;
            let correct = logits
                .argmax(D::Minus1)?
                .eq(&y_val)?
                .to_dtype(DType::F32)?
                .mean_all()?
                .to_scalar::<f32>()?;
            report.validation_loss = Some(val_loss);
            report.validation_accuracy = Some(correct);
            log::info!(
                "Epoch {}/{}: train loss {:.4}, val loss {:.4}, val accuracy {:.3}",
                epoch,
                EPOCHS,
                report.train_loss,
                val_loss,
                correct
            );
        } else {
            log::info!(
                "Epoch {}/{}: train loss {:.4} (no validation split)",
                epoch,
                EPOCHS,
                report.train_loss
            );
        }
    }

    Ok((varmap, report))
}

/// Fits the network and persists the parameters under the given path.
pub fn train_and_save(
    set: &TrainingSet,
    path: impl AsRef<Path>,
    device: &Device,
) -> Result<TrainingReport, ModelError> {
    let (varmap, report) = train(set, device)?;
    varmap.save(path)?;
    Ok(report)
}
