//! HDF5 containers (feature `hdf5`).
//!
//! Maps the container tree one-to-one onto HDF5 objects: groups become
//! groups, float datasets become gzip-filtered 2-D `f64` datasets, text
//! datasets and attributes become variable-length UTF-8 string arrays and
//! int datasets become `i64` arrays. The result opens directly in h5py.

use std::path::Path;

use hdf5::types::VarLenAscii;
use ndarray::Array2;

use crate::Result;
use super::{Container, ContainerWriter, Data, Dataset, Group, Node, atomic_write, persistence};

/// Writes containers as HDF5 files. Each dataset is deflated at the level
/// recorded on it by `build_container`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Hdf5Writer;

impl ContainerWriter for Hdf5Writer {
    fn write(&self, path: &Path, container: &Container) -> Result<()> {
        atomic_write(path, |tmp| {
            let file = hdf5::File::create(tmp.path()).map_err(|e| persistence(path, e))?;
            write_group(&file, &container.root).map_err(|e| persistence(path, e))?;
            file.close().map_err(|e| persistence(path, e))
        })
    }
}

fn write_group(target: &hdf5::Group, group: &Group) -> hdf5::Result<()> {
    for attr in &group.attrs {
        let values = to_ascii(&attr.values)?;
        target
            .new_attr_builder()
            .with_data(values.as_slice())
            .create(attr.name.as_str())?;
    }
    for entry in &group.entries {
        match &entry.node {
            Node::Group(child) => {
                let sub = target.create_group(&entry.name)?;
                write_group(&sub, child)?;
            }
            Node::Dataset(dataset) => write_dataset(target, &entry.name, dataset)?,
        }
    }
    Ok(())
}

fn write_dataset(target: &hdf5::Group, name: &str, dataset: &Dataset) -> hdf5::Result<()> {
    let mut builder = target.new_dataset_builder();
    if let Some(l) = dataset.compression {
        builder = builder.deflate(l.min(9) as u8);
    }
    match &dataset.data {
        Data::Float { shape, values } => {
            let array = Array2::from_shape_vec((shape[0], shape[1]), values.clone())
                .map_err(|e| hdf5::Error::from(e.to_string()))?;
            builder.with_data(&array).create(name)?;
        }
        Data::Text { values } => {
            let values = to_ascii(values)?;
            builder.with_data(values.as_slice()).create(name)?;
        }
        Data::Int { values } => {
            builder.with_data(values.as_slice()).create(name)?;
        }
    }
    Ok(())
}

fn to_ascii(values: &[String]) -> hdf5::Result<Vec<VarLenAscii>> {
    values
        .iter()
        .map(|s| {
            VarLenAscii::from_ascii(s)
                .map_err(|e| hdf5::Error::from(format!("string {s:?} is not ASCII: {e}")))
        })
        .collect()
}
