//! 画像 → Data URL 変換
//!
//! 長辺が上限を超える画像は縮小してJPEGに再エンコードする。
//! デコードできない画像はそのまま送り、判断はプロバイダに任せる。

use super::ImageInfo;
use crate::error::{AnalyzerError, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use image::{DynamicImage, ImageFormat, ImageReader};
use rayon::prelude::*;
use sha2::{Digest, Sha256};
use std::io::Cursor;
use std::path::Path;
use tracing::debug;

/// 複数画像を並列にData URLへ変換（入力順を保持）
pub fn encode_images(images: &[ImageInfo], max_size: u32) -> Vec<(ImageInfo, Result<String>)> {
    images
        .par_iter()
        .map(|info| (info.clone(), encode_data_uri(&info.path, max_size)))
        .collect()
}

/// 画像ファイルをData URLに変換
pub fn encode_data_uri(path: &Path, max_size: u32) -> Result<String> {
    if !path.exists() {
        return Err(AnalyzerError::FileNotFound(path.display().to_string()));
    }

    let bytes = std::fs::read(path)?;
    let mime = mime_for_path(path);

    let (mime, bytes) = match downscale(&bytes, max_size)? {
        Some(resized) => ("image/jpeg", resized),
        None => (mime, bytes),
    };

    Ok(format!("data:{};base64,{}", mime, STANDARD.encode(&bytes)))
}

/// アップロードID（Data URLのSHA-256先頭16桁）
pub fn upload_id(data_uri: &str) -> String {
    let digest = Sha256::digest(data_uri.as_bytes());
    hex::encode(digest)[..16].to_string()
}

fn mime_for_path(path: &Path) -> &'static str {
    match path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .as_deref()
    {
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        _ => "image/jpeg",
    }
}

/// 上限を超えていれば縮小したJPEGバイト列を返す
fn downscale(bytes: &[u8], max_size: u32) -> Result<Option<Vec<u8>>> {
    let reader = match ImageReader::new(Cursor::new(bytes)).with_guessed_format() {
        Ok(r) => r,
        Err(_) => return Ok(None),
    };

    let (width, height) = match reader.into_dimensions() {
        Ok(dims) => dims,
        Err(e) => {
            debug!("cannot read image dimensions, sending as-is: {}", e);
            return Ok(None);
        }
    };

    if width.max(height) <= max_size {
        return Ok(None);
    }

    let img = image::load_from_memory(bytes)
        .map_err(|e| AnalyzerError::ImageLoad(e.to_string()))?;
    let resized = DynamicImage::ImageRgb8(img.thumbnail(max_size, max_size).to_rgb8());

    let mut out = Cursor::new(Vec::new());
    resized
        .write_to(&mut out, ImageFormat::Jpeg)
        .map_err(|e| AnalyzerError::ImageLoad(e.to_string()))?;

    debug!("downscaled {}x{} -> {}x{}", width, height, resized.width(), resized.height());
    Ok(Some(out.into_inner()))
}
