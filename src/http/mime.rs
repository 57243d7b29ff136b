//! MIME type detection module
//!
//! Returns the image Content-Type for a stored object's file extension.

/// Get image Content-Type based on file extension
///
/// Returns `None` for extensions that are not known image formats, so the
/// caller can fall back to its own default.
///
/// # Examples
/// ```
/// use imgroute::http::mime::get_content_type;
/// assert_eq!(get_content_type(Some("png")), Some("image/png"));
/// assert_eq!(get_content_type(Some("JPG")), Some("image/jpeg"));
/// assert_eq!(get_content_type(Some("txt")), None);
/// assert_eq!(get_content_type(None), None);
/// ```
pub fn get_content_type(extension: Option<&str>) -> Option<&'static str> {
    let ext = extension?.to_ascii_lowercase();
    let content_type = match ext.as_str() {
        "jpg" | "jpeg" | "jpe" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "ico" => "image/x-icon",
        "bmp" => "image/bmp",
        "avif" => "image/avif",
        "tif" | "tiff" => "image/tiff",
        _ => return None,
    };
    Some(content_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_types() {
        assert_eq!(get_content_type(Some("jpg")), Some("image/jpeg"));
        assert_eq!(get_content_type(Some("jpeg")), Some("image/jpeg"));
        assert_eq!(get_content_type(Some("png")), Some("image/png"));
        assert_eq!(get_content_type(Some("gif")), Some("image/gif"));
        assert_eq!(get_content_type(Some("webp")), Some("image/webp"));
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(get_content_type(Some("PNG")), Some("image/png"));
        assert_eq!(get_content_type(Some("Gif")), Some("image/gif"));
    }

    #[test]
    fn test_unknown_extension() {
        assert_eq!(get_content_type(Some("xyz")), None);
        assert_eq!(get_content_type(Some("html")), None);
        assert_eq!(get_content_type(None), None);
    }
}
