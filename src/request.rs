// Upload request model: which files go into the multipart body, under which
// field name, and where the default image files live on disk.

use std::io;
use std::path::{Path, PathBuf};

/// Endpoint of the local image upload server.
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8080/upload";

/// Form field every file part is sent under.
pub const FIELD_NAME: &str = "image";

/// File uploaded by `single` when no usable path is given.
pub const DEFAULT_FILE: &str = "pic1.png";

/// Files uploaded by `batch`, with an optional content-type override.
pub const BATCH_FILES: [(&str, Option<&str>); 3] = [
    ("pic1.png", None),
    ("pic2.jpg", None),
    ("pic3.bmp", Some("image/bmp")),
];

/// One file in the multipart body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePart {
    pub field: String,
    pub path: PathBuf,
    /// Explicit MIME type. `None` lets the client infer it from the extension.
    pub content_type: Option<String>,
}

impl FilePart {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FilePart {
            field: FIELD_NAME.to_string(),
            path: path.into(),
            content_type: None,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Basename sent in the part's `Content-Disposition` header.
    pub fn file_name(&self) -> Option<&str> {
        self.path.file_name().and_then(|s| s.to_str())
    }
}

/// A multipart POST: target URL plus the ordered file parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub url: String,
    pub parts: Vec<FilePart>,
}

impl UploadRequest {
    pub fn new(url: impl Into<String>) -> Self {
        UploadRequest {
            url: url.into(),
            parts: Vec::new(),
        }
    }

    pub fn part(mut self, part: FilePart) -> Self {
        self.parts.push(part);
        self
    }

    /// The three fixed files from `base_dir`, third one forced to `image/bmp`.
    pub fn batch(url: impl Into<String>, base_dir: &Path) -> Self {
        BATCH_FILES
            .iter()
            .fold(UploadRequest::new(url), |req, (name, content_type)| {
                let part = FilePart::new(base_dir.join(name));
                match content_type {
                    Some(ct) => req.part(part.with_content_type(*ct)),
                    None => req.part(part),
                }
            })
    }

    /// A single file: `arg` when it names an existing regular file,
    /// otherwise the default file from `base_dir`.
    pub fn single(url: impl Into<String>, base_dir: &Path, arg: Option<&Path>) -> Self {
        UploadRequest::new(url).part(FilePart::new(select_file(base_dir, arg)))
    }
}

/// Pick the file `single` uploads. Anything that is not an existing regular
/// file (symlinks followed) falls back to `DEFAULT_FILE` in `base_dir`.
pub fn select_file(base_dir: &Path, arg: Option<&Path>) -> PathBuf {
    if let Some(path) = existing_file(arg) {
        return path.to_path_buf();
    }
    match arg {
        Some(path) => {
            log::debug!(
                "'{}' is not a regular file, falling back to {}",
                path.display(),
                DEFAULT_FILE
            );
            base_dir.join(DEFAULT_FILE)
        }
        None => base_dir.join(DEFAULT_FILE),
    }
}

/// `arg` when it is an existing regular file (symlinks followed).
pub fn existing_file(arg: Option<&Path>) -> Option<&Path> {
    arg.filter(|path| path.is_file())
}

/// Canonical directory containing `exe`, with every symlink resolved.
pub fn resolve_base_dir(exe: &Path) -> io::Result<PathBuf> {
    let exe = exe.canonicalize()?;
    exe.parent().map(Path::to_path_buf).ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("'{}' has no parent directory", exe.display()),
        )
    })
}

/// Directory of the running executable.
pub fn current_base_dir() -> io::Result<PathBuf> {
    resolve_base_dir(&std::env::current_exe()?)
}
