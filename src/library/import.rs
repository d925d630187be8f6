use super::LEGAL_EXTENSION;
use crate::{
    database::{DbWorker, Result},
    domain::NewSong,
};
use anyhow::Context;
use std::{
    fs,
    path::{Path, PathBuf},
};
use walkdir::WalkDir;

/// A file picked by the user.
pub struct SelectedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// Pending user selection. Importing takes the files out, leaving it empty.
#[derive(Default)]
pub struct FileSelection {
    files: Vec<SelectedFile>,
}

impl FileSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>, bytes: Vec<u8>) {
        self.files.push(SelectedFile {
            name: name.into(),
            bytes,
        });
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn take(&mut self) -> Vec<SelectedFile> {
        std::mem::take(&mut self.files)
    }

    /// Build a selection from paths on disk.
    ///
    /// Files are taken as given. Directories are walked for files with a
    /// supported audio extension.
    pub fn from_paths<P: AsRef<Path>>(paths: &[P]) -> anyhow::Result<Self> {
        let mut selection = FileSelection::new();

        for path in paths {
            let path = path.as_ref();
            let files = match path.is_dir() {
                true => collect_audio_files(path),
                false => vec![path.to_path_buf()],
            };

            for file in files {
                let bytes =
                    fs::read(&file).with_context(|| format!("Could not read {}", file.display()))?;
                let name = file
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| file.to_string_lossy().into_owned());

                selection.push(name, bytes);
            }
        }

        Ok(selection)
    }
}

fn collect_audio_files(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .path()
                .extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| LEGAL_EXTENSION.contains(ext.to_lowercase().as_str()))
                .unwrap_or(false)
        })
        .map(|entry| entry.into_path())
        .collect()
}

/// Strip the last `.ext` from a file name.
///
/// Names without an extension, or that would be left empty, are kept whole.
pub fn title_from_file_name(name: &str) -> &str {
    let Some(dot) = name.rfind('.') else {
        return name;
    };

    let ext = &name[dot + 1..];
    let stem = &name[..dot];

    // A bare `.mp3` keeps its name rather than becoming an empty title
    match ext.is_empty() || ext.contains('/') || stem.is_empty() {
        true => name,
        false => stem,
    }
}

/// Write every selected file to the store as one batch.
///
/// The selection is emptied whether or not the write succeeds.
pub fn import_files(
    store: &DbWorker,
    selection: &mut FileSelection,
    artist: &str,
    img: &str,
) -> Result<Vec<i64>> {
    let files = selection.take();
    if files.is_empty() {
        return Ok(Vec::new());
    }

    let batch = files
        .into_iter()
        .map(|file| NewSong {
            title: title_from_file_name(&file.name).to_string(),
            artist: artist.to_string(),
            audio: file.bytes,
            img: img.to_string(),
        })
        .collect::<Vec<_>>();

    let count = batch.len();
    let ids = store.add_batch(batch).wait()?;
    log::info!("Imported {count} files");

    Ok(ids)
}
