use crate::utils::error::Result;
use base64::{engine::general_purpose, Engine as _};
use std::path::Path;

/// MIME type guessed from the file extension.
pub fn mime_for_path(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        Some("bmp") => "image/bmp",
        Some("avif") => "image/avif",
        _ => "application/octet-stream",
    }
}

pub fn encode_data_url(bytes: &[u8], mime: &str) -> String {
    format!("data:{};base64,{}", mime, general_purpose::STANDARD.encode(bytes))
}

/// Reads a file into a self-contained `data:` URL. Nothing is uploaded.
pub async fn read_as_data_url(path: &Path) -> Result<String> {
    let bytes = tokio::fs::read(path).await?;
    tracing::debug!("Encoding {} ({} bytes) as data URL", path.display(), bytes.len());
    Ok(encode_data_url(&bytes, mime_for_path(path)))
}
