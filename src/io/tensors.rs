//! Reading safetensors files into named tensors

use std::collections::BTreeMap;
use std::path::Path;

use candle_core::{DType, Device, Tensor};
use safetensors::{Dtype, SafeTensors};
use serde::Serialize;

use crate::{Error, Result};

fn dtype_of(dtype: Dtype) -> Option<DType> {
    match dtype {
        Dtype::U8 => Some(DType::U8),
        Dtype::U32 => Some(DType::U32),
        Dtype::I64 => Some(DType::I64),
        Dtype::BF16 => Some(DType::BF16),
        Dtype::F16 => Some(DType::F16),
        Dtype::F32 => Some(DType::F32),
        Dtype::F64 => Some(DType::F64),
        _ => None,
    }
}

/// Every tensor of a safetensors file, keyed by name
pub fn read_tensors(path: &Path, device: &Device) -> Result<BTreeMap<String, Tensor>> {
    let data = std::fs::read(path)?;
    let st = SafeTensors::deserialize(&data)?;

    let mut tensors = BTreeMap::new();
    for (name, view) in st.tensors() {
        let dtype = dtype_of(view.dtype()).ok_or_else(|| Error::CheckpointMismatch {
            path: path.to_path_buf(),
            message: format!("tensor `{name}` has unsupported dtype {:?}", view.dtype()),
        })?;
        let tensor = Tensor::from_raw_buffer(view.data(), dtype, view.shape(), device)?;
        tensors.insert(name, tensor);
    }
    Ok(tensors)
}

/// Name, dtype and shape of one stored tensor
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TensorSummary {
    /// Parameter name
    pub name: String,
    /// Stored element type
    pub dtype: String,
    /// Dimensions
    pub shape: Vec<usize>,
    /// Element count
    pub elements: usize,
}

/// Describe every tensor of a safetensors file without decoding it
pub fn summarize(path: &Path) -> Result<Vec<TensorSummary>> {
    let data = std::fs::read(path)?;
    let st = SafeTensors::deserialize(&data)?;

    let mut summaries: Vec<TensorSummary> = st
        .tensors()
        .into_iter()
        .map(|(name, view)| TensorSummary {
            name,
            dtype: format!("{:?}", view.dtype()),
            elements: view.shape().iter().product(),
            shape: view.shape().to_vec(),
        })
        .collect();
    summaries.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(summaries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn write(path: &Path) {
        let dev = Device::Cpu;
        let tensors = HashMap::from([
            (
                "b.bias".to_string(),
                Tensor::new(&[1.0f32, 2.0], &dev).unwrap(),
            ),
            (
                "a.weight".to_string(),
                Tensor::zeros((2, 3), DType::F64, &dev).unwrap(),
            ),
        ]);
        candle_core::safetensors::save(&tensors, path).unwrap();
    }

    #[test]
    fn test_read_tensors_keeps_dtype_and_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.safetensors");
        write(&path);

        let tensors = read_tensors(&path, &Device::Cpu).unwrap();
        assert_eq!(tensors.len(), 2);
        assert_eq!(tensors["a.weight"].dtype(), DType::F64);
        assert_eq!(tensors["b.bias"].to_vec1::<f32>().unwrap(), vec![1.0, 2.0]);
    }

    #[test]
    fn test_summarize_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.safetensors");
        write(&path);

        let summary = summarize(&path).unwrap();
        assert_eq!(summary[0].name, "a.weight");
        assert_eq!(summary[0].shape, vec![2, 3]);
        assert_eq!(summary[0].elements, 6);
        assert_eq!(summary[1].dtype, "F32");
    }

    #[test]
    fn test_garbage_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("junk.safetensors");
        std::fs::write(&path, b"not a safetensors file").unwrap();
        assert!(matches!(summarize(&path), Err(Error::SafeTensors(_))));
    }
}
