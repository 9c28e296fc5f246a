use std::{
    collections::HashMap,
    fs::{self, File},
    io::{self, Write},
    path::Path,
};

use log::info;
use safetensors::{
    SafeTensors,
    tensor::{Dtype, TensorView},
};
use tempfile::NamedTempFile;

use crate::{
    MlErr, Result,
    arch::{Model, Sequential, layers::Layer, spec::ModelSpec},
    device::Device,
    tensor::{StateDict, Tensor},
};

/// The file the trained model is written to.
pub const CHECKPOINT_FILE: &str = "model_checkpoint";

const FORMAT: &str = "ml-checkpoint-v1";
const FORMAT_KEY: &str = "format";
const SPEC_KEY: &str = "model_spec";

/// A model's architecture and parameters, as read back from disk.
#[derive(Debug, Clone)]
pub struct Checkpoint {
    spec: ModelSpec,
    state: StateDict,
}

impl Checkpoint {
    pub fn spec(&self) -> &ModelSpec {
        &self.spec
    }

    pub fn state(&self) -> &StateDict {
        &self.state
    }

    /// Rebuilds the checkpointed model on `device`.
    ///
    /// # Returns
    /// The model, with every parameter exactly as it was saved, or an error if the
    /// parameters don't fit the architecture.
    pub fn into_model(self, device: Device) -> Result<Sequential> {
        let ModelSpec::Sequential { layers } = &self.spec;

        let layers = layers
            .iter()
            .enumerate()
            .map(|(i, &spec)| Layer::from_spec(spec, i as u64))
            .collect::<Result<Vec<_>>>()?;

        let mut model = Sequential::zeroed(layers, device)?;
        model.load_state_dict(&self.state)?;
        Ok(model)
    }
}

/// Writes the model's architecture and parameters to `path` as safetensors, blocking until
/// the file is flushed to storage.
///
/// The bytes go to a temporary file next to `path` that is renamed over it once synced, so
/// `path` holds either the previous checkpoint or the new one, never a partial write.
///
/// # Arguments
/// * `model` - The model to persist.
/// * `path` - Where to write the checkpoint, any existing file is replaced.
pub fn save<M, P>(model: &M, path: P) -> Result<()>
where
    M: Model + ?Sized,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let state = model.state_dict();

    let views = state
        .iter()
        .map(|(name, tensor)| {
            let bytes = bytemuck::cast_slice(tensor.data());
            let view = TensorView::new(Dtype::F32, tensor.shape().to_vec(), bytes)?;
            Ok((name.as_str(), view))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut metadata = HashMap::new();
    metadata.insert(FORMAT_KEY.to_string(), FORMAT.to_string());
    metadata.insert(SPEC_KEY.to_string(), serde_json::to_string(&model.spec())?);

    let bytes = safetensors::serialize(views, &Some(metadata))?;

    write_atomic(path, |file| file.write_all(&bytes))?;

    info!(tensors = state.len(), bytes = bytes.len(); "saved checkpoint to {}", path.display());
    Ok(())
}

/// Fills a temporary file in the directory of `path` with `write` and renames it to `path`.
/// On error the temporary file is removed and `path` is left untouched.
fn write_atomic<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut File) -> io::Result<()>,
{
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)?;
    write(tmp.as_file_mut())?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(io::Error::from)?;

    Ok(())
}

/// Reads a checkpoint written by `save`.
///
/// # Returns
/// The checkpoint or an error if the file can't be read, isn't a checkpoint or holds
/// tensors that aren't `f32`.
pub fn load<P: AsRef<Path>>(path: P) -> Result<Checkpoint> {
    let bytes = fs::read(path)?;

    let (_, metadata) = SafeTensors::read_metadata(&bytes)?;
    let metadata = metadata
        .metadata()
        .as_ref()
        .ok_or_else(|| MlErr::Checkpoint("missing metadata".into()))?;

    match metadata.get(FORMAT_KEY) {
        Some(format) if format == FORMAT => {}
        Some(format) => {
            return Err(MlErr::Checkpoint(format!("unknown format {format}")));
        }
        None => return Err(MlErr::Checkpoint(format!("missing {FORMAT_KEY}"))),
    }

    let spec = metadata
        .get(SPEC_KEY)
        .ok_or_else(|| MlErr::Checkpoint(format!("missing {SPEC_KEY}")))?;
    let spec: ModelSpec = serde_json::from_str(spec)?;

    let tensors = SafeTensors::deserialize(&bytes)?;
    let mut state = StateDict::new();

    for (name, view) in tensors.tensors() {
        if view.dtype() != Dtype::F32 {
            return Err(MlErr::Checkpoint(format!(
                "tensor {name} has dtype {:?}, expected F32",
                view.dtype()
            )));
        }

        // the buffer offsets carry no alignment guarantee
        let data = view
            .data()
            .chunks_exact(4)
            .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
            .collect();

        state.insert(name, Tensor::new(view.shape().to_vec(), data)?);
    }

    Ok(Checkpoint { spec, state })
}

#[cfg(test)]
mod tests {
    use ndarray::array;
    use rand::{SeedableRng, rngs::StdRng};
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn save_then_load_is_bit_exact() {
        let spec = ModelSpec::feed_forward(3, 5, 2);
        let mut model =
            Sequential::from_spec(&spec, Device::Cpu, &mut StdRng::seed_from_u64(9)).unwrap();

        let dir = tempdir().unwrap();
        let path = dir.path().join(CHECKPOINT_FILE);
        save(&model, &path).unwrap();

        let checkpoint = load(&path).unwrap();
        assert_eq!(checkpoint.spec(), &spec);
        assert_eq!(checkpoint.state(), &model.state_dict());

        let mut restored = checkpoint.into_model(Device::Cpu).unwrap();
        let x = array![[0.1, -2., 3.5], [1., 1., 1.]];

        assert_eq!(
            restored.forward(x.view()).unwrap(),
            model.forward(x.view()).unwrap()
        );
    }

    #[test]
    fn failed_write_keeps_previous_checkpoint() {
        let spec = ModelSpec::feed_forward(2, 3, 2);
        let model =
            Sequential::from_spec(&spec, Device::Cpu, &mut StdRng::seed_from_u64(1)).unwrap();

        let dir = tempdir().unwrap();
        let path = dir.path().join(CHECKPOINT_FILE);
        save(&model, &path).unwrap();
        let before = fs::read(&path).unwrap();

        let res = write_atomic(&path, |file| {
            file.write_all(b"half a checkpoint")?;
            Err(io::Error::other("no space left on device"))
        });

        assert!(matches!(res, Err(MlErr::Io(_))));
        assert_eq!(fs::read(&path).unwrap(), before);
        assert_eq!(load(&path).unwrap().state(), &model.state_dict());

        // the temporary file is gone too
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn save_replaces_previous_checkpoint() {
        let spec = ModelSpec::feed_forward(2, 3, 2);
        let dir = tempdir().unwrap();
        let path = dir.path().join(CHECKPOINT_FILE);

        for seed in [1, 2] {
            let model = Sequential::from_spec(&spec, Device::Cpu, &mut StdRng::seed_from_u64(seed))
                .unwrap();
            save(&model, &path).unwrap();
            assert_eq!(load(&path).unwrap().state(), &model.state_dict());
        }

        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn rejects_foreign_safetensors() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("foreign");

        let data = [0u8; 4];
        let view = TensorView::new(Dtype::F32, vec![1], &data).unwrap();
        let bytes = safetensors::serialize([("w", view)], &None).unwrap();
        fs::write(&path, bytes).unwrap();

        assert!(matches!(load(&path), Err(MlErr::Checkpoint(_))));
    }

    #[test]
    fn rejects_non_f32_tensors() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("f64");

        let data = [0u8; 8];
        let view = TensorView::new(Dtype::F64, vec![1], &data).unwrap();
        let metadata = HashMap::from([
            (FORMAT_KEY.to_string(), FORMAT.to_string()),
            (
                SPEC_KEY.to_string(),
                serde_json::to_string(&ModelSpec::Sequential { layers: vec![] }).unwrap(),
            ),
        ]);
        let bytes = safetensors::serialize([("w", view)], &Some(metadata)).unwrap();
        fs::write(&path, bytes).unwrap();

        assert!(matches!(load(&path), Err(MlErr::Checkpoint(_))));
    }

    #[test]
    fn missing_file() {
        let dir = tempdir().unwrap();
        assert!(matches!(load(dir.path().join("nope")), Err(MlErr::Io(_))));
    }
}
