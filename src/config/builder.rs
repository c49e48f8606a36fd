//! Build training components from configuration

use super::schema::TrainSpec;
use crate::compute::ComputeContext;
use crate::io::{bootstrap_generator, BootstrapOutcome};
use crate::models::{FeatureExtractor, FrameCritic, Network, ProjectionGenerator, Vgg16Features};
use crate::optim::AdamConfig;
use crate::train::{CompositeLoss, LossStrategy, ReconstructionLoss, TrainingSession};
use crate::Result;

/// Build the loss strategy selected by `model.use_l1_loss`
///
/// The composite loss gets a perceptual term only when `model.vgg_weights`
/// names a weights file.
pub fn build_loss(spec: &TrainSpec, compute: &ComputeContext) -> Result<Box<dyn LossStrategy>> {
    if spec.model.use_l1_loss {
        tracing::info!("Using L1 reconstruction loss");
        return Ok(Box::new(ReconstructionLoss));
    }

    let features: Option<Box<dyn FeatureExtractor>> = match &spec.model.vgg_weights {
        Some(path) => {
            tracing::info!("Loading VGG16 features from {}", path.display());
            Some(Box::new(Vgg16Features::load(path, compute)?))
        }
        None => {
            tracing::debug!("No VGG16 weights configured, perceptual term disabled");
            None
        }
    };
    Ok(Box::new(CompositeLoss::new(features)))
}

/// Adam settings shared by both networks
pub fn build_optimizer_config(spec: &TrainSpec) -> AdamConfig {
    AdamConfig {
        lr: spec.optimizer.lr,
        beta1: spec.optimizer.beta1,
        beta2: spec.optimizer.beta2,
        eps: spec.optimizer.eps,
    }
}

/// Build both networks, bootstrap the generator and assemble the session
///
/// The device generator is seeded before any parameter is created. A
/// configured but absent pretrained file is logged and training starts from
/// scratch.
pub fn build_session(spec: &TrainSpec, compute: ComputeContext) -> Result<TrainingSession> {
    compute.seed(spec.training.seed)?;

    let generator = ProjectionGenerator::new(spec.generator_config(), &compute)?;
    let critic = FrameCritic::new(spec.critic_config(), &compute)?;
    tracing::info!("---------- Networks architecture -------------");
    tracing::info!("Generator parameters: {}", generator.num_parameters());
    tracing::info!("Discriminator parameters: {}", critic.num_parameters());
    tracing::info!("----------------------------------------------");

    let outcome = bootstrap_generator(
        spec.checkpoint.pretrained,
        &spec.pretrained_path(),
        generator.vars(),
        &compute,
    )?;
    if let BootstrapOutcome::Loaded { tensors, .. } = outcome {
        tracing::debug!("Bootstrapped {tensors} generator tensors");
    }

    let loss = build_loss(spec, &compute)?;
    TrainingSession::new(
        Box::new(generator),
        Box::new(critic),
        loss,
        compute,
        build_optimizer_config(spec),
        spec.step_config(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SuperResolver;
    use candle_core::Tensor;
    use std::collections::HashMap;
    use std::path::Path;

    fn small_spec(save_folder: &Path) -> TrainSpec {
        let mut spec = TrainSpec::default();
        spec.model.upscale = 2;
        spec.model.features = 4;
        spec.model.hr_features = 2;
        spec.model.critic_features = 4;
        spec.model.critic_blocks = 1;
        spec.data.n_frames = 3;
        spec.training.gpu_mode = false;
        spec.checkpoint.save_folder = save_folder.to_path_buf();
        spec
    }

    fn generator_tensors(session: &TrainingSession) -> HashMap<String, Tensor> {
        let data = session.generator().vars().data().lock().unwrap();
        data.iter()
            .map(|(k, v)| (k.clone(), v.as_tensor().clone()))
            .collect()
    }

    #[test]
    fn test_loss_selection() {
        let dir = tempfile::tempdir().unwrap();
        let mut spec = small_spec(dir.path());
        let session = build_session(&spec, ComputeContext::cpu()).unwrap();
        assert_eq!(session.loss().name(), "Composite");

        spec.model.use_l1_loss = true;
        let session = build_session(&spec, ComputeContext::cpu()).unwrap();
        assert_eq!(session.loss().name(), "L1");
    }

    #[test]
    fn test_session_carries_step_config_and_rate() {
        let dir = tempfile::tempdir().unwrap();
        let mut spec = small_spec(dir.path());
        spec.model.residual = true;
        spec.optimizer.lr = 5e-4;
        let session = build_session(&spec, ComputeContext::cpu()).unwrap();
        assert!(session.step_config().residual);
        assert_eq!(session.step_config().neighbors, 2);
        assert_eq!(session.lr_g(), 5e-4);
        assert_eq!(session.lr_d(), 5e-4);
        assert!(session.generator().num_parameters() > 0);
    }

    #[test]
    fn test_missing_pretrained_trains_from_scratch() {
        let dir = tempfile::tempdir().unwrap();
        let mut spec = small_spec(dir.path());
        spec.checkpoint.pretrained = true;
        assert!(build_session(&spec, ComputeContext::cpu()).is_ok());
    }

    #[test]
    fn test_pretrained_generator_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let spec = small_spec(dir.path());
        let source = build_session(&spec, ComputeContext::cpu()).unwrap();
        let expected = generator_tensors(&source);

        let prefixed: HashMap<String, Tensor> = expected
            .iter()
            .map(|(k, t)| (format!("module.{k}"), t.clone()))
            .collect();
        candle_core::safetensors::save(&prefixed, spec.pretrained_path()).unwrap();

        let mut spec = spec;
        spec.checkpoint.pretrained = true;
        let loaded = build_session(&spec, ComputeContext::cpu()).unwrap();
        let actual = generator_tensors(&loaded);

        assert_eq!(actual.len(), expected.len());
        for (name, tensor) in &expected {
            let a = actual[name].flatten_all().unwrap().to_vec1::<f32>().unwrap();
            let e = tensor.flatten_all().unwrap().to_vec1::<f32>().unwrap();
            assert_eq!(a, e, "{name}");
        }
    }

    #[test]
    fn test_missing_vgg_weights_fail() {
        let dir = tempfile::tempdir().unwrap();
        let mut spec = small_spec(dir.path());
        spec.model.vgg_weights = Some(dir.path().join("vgg16.safetensors"));
        assert!(build_loss(&spec, &ComputeContext::cpu()).is_err());
    }

    #[test]
    fn test_built_generator_accepts_window() {
        let dir = tempfile::tempdir().unwrap();
        let spec = small_spec(dir.path());
        let session = build_session(&spec, ComputeContext::cpu()).unwrap();
        let dev = candle_core::Device::Cpu;
        let frame = Tensor::zeros((1, 3, 4, 4), candle_core::DType::F32, &dev).unwrap();
        let flow = Tensor::zeros((1, 2, 4, 4), candle_core::DType::F32, &dev).unwrap();
        let out = session
            .generator()
            .forward(&frame, &[frame.clone(), frame.clone()], &[flow.clone(), flow])
            .unwrap();
        assert_eq!(out.dims(), &[1, 3, 8, 8]);
    }
}
