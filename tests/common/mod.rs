//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::Path;

use candle_core::{DType, Device, Tensor};
use nitidez::config::TrainSpec;

pub const LR_SIZE: usize = 8;
pub const SCALE: usize = 2;

/// Write one packed sample for a centered 3-frame window
pub fn write_sample(path: &Path, seed: f32) {
    let dev = Device::Cpu;
    let hr = LR_SIZE * SCALE;
    let frame = |c: usize, size: usize, value: f32| {
        Tensor::full(value, (c, size, size), &dev).expect("tensor should build")
    };

    let mut tensors: HashMap<String, Tensor> = HashMap::new();
    tensors.insert("input".to_string(), frame(3, LR_SIZE, 0.5 * seed));
    tensors.insert("target".to_string(), frame(3, hr, seed));
    tensors.insert("bicubic".to_string(), frame(3, hr, 0.9 * seed));
    for offset in [-1i64, 1] {
        tensors.insert(format!("neighbor.{offset}"), frame(3, LR_SIZE, 0.4 * seed));
        tensors.insert(
            format!("flow.{offset}"),
            Tensor::zeros((2, LR_SIZE, LR_SIZE), DType::F32, &dev).expect("tensor should build"),
        );
    }
    candle_core::safetensors::save(&tensors, path).expect("sample should be written");
}

/// Write `count` samples plus a sample list into `dir`
pub fn write_dataset(dir: &Path, count: usize) {
    let mut list = String::new();
    for i in 0..count {
        let name = format!("{i:05}");
        write_sample(&dir.join(format!("{name}.safetensors")), 0.1 + i as f32 * 0.1);
        list.push_str(&name);
        list.push('\n');
    }
    std::fs::write(dir.join("trainlist.txt"), list).expect("list should be written");
}

/// Tiny CPU spec over a dataset in `root/data`, writing into `root`
pub fn small_spec(root: &Path) -> TrainSpec {
    let mut spec = TrainSpec::default();
    spec.model.upscale = SCALE;
    spec.model.features = 4;
    spec.model.hr_features = 2;
    spec.model.critic_features = 4;
    spec.model.critic_blocks = 1;
    spec.data.data_dir = root.join("data");
    spec.data.file_list = "trainlist.txt".into();
    spec.data.n_frames = 3;
    spec.data.patch_size = 0;
    spec.data.batch_size = 2;
    spec.data.threads = 2;
    spec.training.n_epochs = 2;
    spec.training.gpu_mode = false;
    spec.checkpoint.save_folder = root.join("weights");
    spec.checkpoint.statistics_dir = root.join("statistics");
    spec.checkpoint.prefix = "F3".to_string();
    spec
}
