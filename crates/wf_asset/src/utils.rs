use anyhow::{Context, Result};
use std::{
    fs::File,
    io::Write,
    path::{Path, PathBuf},
};

pub fn file_name(path: &Path) -> Option<&str> {
    path.file_stem()?.to_str()
}

pub fn combine_path(directory: &Path, file_name: &str, extension: &str) -> PathBuf {
    directory.join(format!("{}.{}", file_name, extension))
}

pub fn write_file(target: &Path, data: &[u8]) -> Result<File> {
    let mut buffer = File::create(target)
        .with_context(|| format!("Could not create file: {}", target.display()))?;
    buffer
        .write_all(data)
        .with_context(|| format!("Could not write data to file: {}", target.display()))?;
    Ok(buffer)
}
