use crate::content::Format;
use regex::Regex;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

fn whitespace_regex() -> &'static Regex {
    static WHITESPACE_REGEX: OnceLock<Regex> = OnceLock::new();
    WHITESPACE_REGEX.get_or_init(|| Regex::new(r"\s+").expect("static regex"))
}

/// Lower-cases the topic and replaces each whitespace run with a hyphen.
pub fn slugify(topic: &str) -> String {
    whitespace_regex()
        .replace_all(&topic.to_lowercase(), "-")
        .into_owned()
}

/// `<slug(topic)>-<format>.txt`
pub fn export_filename(topic: &str, format: Format) -> String {
    format!("{}-{}.txt", slugify(topic), format.as_str())
}

/// Saves generated text somewhere the user can pick it up.
pub trait Exporter {
    /// Writes `text` unchanged under `filename` and returns where it went.
    fn export(&self, text: &str, filename: &str) -> io::Result<PathBuf>;
}

/// Writes exports into a directory on disk.
#[derive(Debug, Clone)]
pub struct FileExporter {
    dir: PathBuf,
}

impl FileExporter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl Exporter for FileExporter {
    fn export(&self, text: &str, filename: &str) -> io::Result<PathBuf> {
        // Only the final component is honoured so a topic cannot escape the directory.
        let name = Path::new(filename)
            .file_name()
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "empty export filename"))?;
        std::fs::create_dir_all(&self.dir)?;

        let target = self.dir.join(name);
        let temp = target.with_extension("tmp");

        let mut file = File::create(&temp)?;
        file.write_all(text.as_bytes())?;
        file.sync_all()?;
        std::fs::rename(&temp, &target)?;

        tracing::info!("Exported {} bytes to {:?}", text.len(), target);
        Ok(target)
    }
}
