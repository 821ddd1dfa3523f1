//! Resume upload intake — multipart field validation and the disk
//! lifecycle of transient upload files.

pub mod handlers;

use std::path::{Path, PathBuf};

use uuid::Uuid;

/// Upload extensions accepted for resume documents.
pub const ALLOWED_EXTENSIONS: [&str; 4] = ["pdf", "docx", "doc", "txt"];

/// Checks whether a filename carries an allowed resume extension.
pub fn allowed_file(filename: &str) -> bool {
    file_extension(filename)
        .map(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

/// Lowercased extension after the final dot, if any.
fn file_extension(filename: &str) -> Option<String> {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty())
}

/// Strips path components and replaces anything outside `[A-Za-z0-9._-]`,
/// so client-supplied names are safe to join onto the upload directory.
pub fn sanitize_filename(filename: &str) -> String {
    let base = filename.rsplit(['/', '\\']).next().unwrap_or(filename);

    base.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Unique on-disk destination for an upload. The UUID prefix keeps
/// concurrent uploads of identically named files from colliding.
pub fn upload_destination(upload_dir: &Path, filename: &str) -> PathBuf {
    upload_dir.join(format!("{}_{}", Uuid::new_v4(), sanitize_filename(filename)))
}
