use image::ImageFormat;
use pixel_debate_shared::analysis::DataUri;
use tracing::debug;

use crate::error::AnalysisError;

pub const SNAPSHOT_MIME: &str = "image/png";

/// A canvas snapshot checked to be a readable PNG, still base64 encoded for
/// the upstream request.
#[derive(Clone, Debug, PartialEq)]
pub struct InlineImage {
    pub mime_type: String,
    pub data: String,
    pub width: u32,
    pub height: u32,
}

impl InlineImage {
    pub fn from_data_uri(value: &str) -> Result<Self, AnalysisError> {
        let uri = DataUri::parse(value)?;
        let bytes = uri.decode_payload()?;
        let decoded = image::load_from_memory_with_format(&bytes, ImageFormat::Png)?;
        debug!(
            width = decoded.width(),
            height = decoded.height(),
            bytes = bytes.len(),
            declared = uri.mime,
            "snapshot decoded"
        );
        Ok(Self {
            mime_type: SNAPSHOT_MIME.to_string(),
            data: uri.payload.trim().to_string(),
            width: decoded.width(),
            height: decoded.height(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use image::RgbaImage;

    use super::*;

    fn png_data_uri(width: u32, height: u32) -> String {
        let mut out = Cursor::new(Vec::new());
        RgbaImage::new(width, height)
            .write_to(&mut out, ImageFormat::Png)
            .unwrap();
        format!("data:image/png;base64,{}", STANDARD.encode(out.into_inner()))
    }

    #[test]
    fn test_accepts_png_snapshot() {
        let uri = png_data_uri(80, 60);
        let image = InlineImage::from_data_uri(&uri).unwrap();
        assert_eq!((image.width, image.height), (80, 60));
        assert_eq!(image.mime_type, "image/png");
        assert!(uri.ends_with(&image.data));
    }

    #[test]
    fn test_rejects_non_png_payload() {
        let uri = format!("data:image/png;base64,{}", STANDARD.encode(b"not an image"));
        assert!(matches!(
            InlineImage::from_data_uri(&uri),
            Err(AnalysisError::Image(_))
        ));
    }

    #[test]
    fn test_rejects_bare_base64() {
        assert!(matches!(
            InlineImage::from_data_uri("iVBORw0KGgo="),
            Err(AnalysisError::DataUri(_))
        ));
    }
}
