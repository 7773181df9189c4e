mod encode;

pub use encode::{encode_data_uri, encode_images, upload_id};

use crate::error::{AnalyzerError, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone)]
pub struct ImageInfo {
    pub path: PathBuf,
    pub file_name: String,
}

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "gif"];

/// ファイル1枚またはフォルダ内の画像を列挙
pub fn scan_path(path: &Path, recursive: bool) -> Result<Vec<ImageInfo>> {
    if path.is_file() {
        if !is_image_path(path) {
            return Err(AnalyzerError::ImageLoad(format!(
                "unsupported image format: {}",
                path.display()
            )));
        }
        return Ok(vec![image_info(path)]);
    }

    scan_folder(path, recursive)
}

pub fn scan_folder(folder: &Path, recursive: bool) -> Result<Vec<ImageInfo>> {
    if !folder.exists() {
        return Err(AnalyzerError::FolderNotFound(folder.display().to_string()));
    }

    let max_depth = if recursive { usize::MAX } else { 1 };

    let mut images: Vec<ImageInfo> = WalkDir::new(folder)
        .max_depth(max_depth)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && is_image_path(e.path()))
        .map(|e| image_info(e.path()))
        .collect();

    // パスでソート
    images.sort_by(|a, b| a.path.cmp(&b.path));

    Ok(images)
}

fn image_info(path: &Path) -> ImageInfo {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    ImageInfo {
        path: path.to_path_buf(),
        file_name,
    }
}

fn is_image_path(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use std::io::Write;

    #[test]
    fn test_is_image_path() {
        assert!(is_image_path(Path::new("a.jpg")));
        assert!(is_image_path(Path::new("a.JPG")));
        assert!(is_image_path(Path::new("a.jpeg")));
        assert!(is_image_path(Path::new("a.png")));
        assert!(is_image_path(Path::new("a.webp")));
        assert!(!is_image_path(Path::new("a.txt")));
        assert!(!is_image_path(Path::new("a.pdf")));
        assert!(!is_image_path(Path::new("noext")));
    }

    #[test]
    fn test_scan_folder_not_found() {
        let result = scan_folder(Path::new("/nonexistent/folder"), false);
        assert!(matches!(result, Err(AnalyzerError::FolderNotFound(_))));
    }

    #[test]
    fn test_scan_folder_with_images() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();

        File::create(root.join("b.jpg")).unwrap().write_all(b"dummy").unwrap();
        File::create(root.join("a.PNG")).unwrap().write_all(b"dummy").unwrap();
        File::create(root.join("readme.txt")).unwrap().write_all(b"text").unwrap();
        fs::create_dir_all(root.join("sub")).unwrap();
        File::create(root.join("sub").join("c.jpg")).unwrap();

        let flat = scan_folder(root, false).unwrap();
        let names: Vec<&str> = flat.iter().map(|i| i.file_name.as_str()).collect();
        assert_eq!(names, vec!["a.PNG", "b.jpg"]);

        let deep = scan_folder(root, true).unwrap();
        assert_eq!(deep.len(), 3);
    }

    #[test]
    fn test_scan_single_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.jpeg");
        fs::write(&path, b"dummy").unwrap();

        let result = scan_path(&path, false).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].file_name, "photo.jpeg");
    }

    #[test]
    fn test_scan_single_unsupported_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, b"text").unwrap();

        assert!(matches!(scan_path(&path, false), Err(AnalyzerError::ImageLoad(_))));
    }
}
