//! Reading and writing consensus objects as either SSZ or YAML, chosen by file extension.

use serde::{de::DeserializeOwned, Serialize};
use ssz::{Decode, Encode};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum ObjectFormat {
    Ssz,
    Yaml,
}

impl ObjectFormat {
    /// `.yaml` and `.yml` files are YAML, anything else is SSZ.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => ObjectFormat::Yaml,
            _ => ObjectFormat::Ssz,
        }
    }
}

pub fn load_object<T>(path: &Path) -> Result<T, String>
where
    T: Decode + DeserializeOwned,
{
    let mut file =
        File::open(path).map_err(|e| format!("Unable to open file {:?}: {:?}", path, e))?;

    match ObjectFormat::from_path(path) {
        ObjectFormat::Yaml => serde_yaml::from_reader(file)
            .map_err(|e| format!("YAML decode of {:?} failed: {:?}", path, e)),
        ObjectFormat::Ssz => {
            let mut bytes = vec![];
            file.read_to_end(&mut bytes)
                .map_err(|e| format!("Unable to read from file {:?}: {:?}", path, e))?;
            T::from_ssz_bytes(&bytes)
                .map_err(|e| format!("SSZ decode of {:?} failed: {:?}", path, e))
        }
    }
}

pub fn write_object<T>(path: &Path, object: &T) -> Result<(), String>
where
    T: Encode + Serialize,
{
    let bytes = match ObjectFormat::from_path(path) {
        ObjectFormat::Yaml => serde_yaml::to_string(object)
            .map_err(|e| format!("Unable to YAML encode object: {:?}", e))?
            .into_bytes(),
        ObjectFormat::Ssz => object.as_ssz_bytes(),
    };

    File::create(path)
        .map_err(|e| format!("Unable to create output file {:?}: {:?}", path, e))?
        .write_all(&bytes)
        .map_err(|e| format!("Unable to write to output file {:?}: {:?}", path, e))
}
