use std::{
    fs::{self, File},
    io::{Read, Write},
    path::{Path, PathBuf},
};

/// Writes `bytes` to `path` so that readers see either the old file or the complete new one.
///
/// The data goes to a sibling temporary file that is flushed, synced and renamed over `path`.
/// On any failure the temporary file is removed and `path` is left untouched.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), std::io::Error> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let tmp = temp_sibling(path);
    let result = (|| {
        let mut file = File::create(&tmp)?;
        file.write_all(bytes)?;
        file.flush()?;
        file.sync_all()?;
        fs::rename(&tmp, path)
    })();
    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    result
}

fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(format!(".tmp-{}", std::process::id()));
    path.with_file_name(name)
}

pub fn read_file(path: &Path) -> Result<Vec<u8>, std::io::Error> {
    let mut file = File::open(path)?;
    let mut contents = Vec::new();
    file.read_to_end(&mut contents)?;
    Ok(contents)
}

/// JSON persistence for any serde type.
pub trait Serializable {
    fn serialize_to_file(&self, path: &Path) -> Result<(), std::io::Error>;
    fn deserialize_from_file(path: &Path) -> Result<Self, std::io::Error>
    where
        Self: Sized;
}

impl<T> Serializable for T
where
    T: serde::Serialize + serde::de::DeserializeOwned,
{
    fn serialize_to_file(&self, path: &Path) -> Result<(), std::io::Error> {
        let serialized = serde_json::to_string_pretty(self)?;
        write_atomic(path, serialized.as_bytes())
    }

    fn deserialize_from_file(path: &Path) -> Result<Self, std::io::Error>
    where
        Self: Sized,
    {
        let contents = read_file(path)?;
        let value: T = serde_json::from_slice(&contents)?;
        Ok(value)
    }
}
