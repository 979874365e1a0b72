//! QR encoding of response links.

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use qrcode::QrCode;
use qrcode::render::{svg, unicode};
use survey_session_types::{CollaboratorError, ShareEncoder, ShareImage};

const SVG_MEDIA_TYPE: &str = "image/svg+xml";

/// Encodes response links as SVG QR codes.
#[derive(Debug, Clone)]
pub struct QrShareEncoder {
    min_dimension: u32,
}

impl Default for QrShareEncoder {
    fn default() -> Self {
        Self { min_dimension: 200 }
    }
}

impl QrShareEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Minimum width and height of the rendered image, in pixels.
    pub fn with_min_dimension(mut self, min_dimension: u32) -> Self {
        self.min_dimension = min_dimension;
        self
    }
}

#[async_trait]
impl ShareEncoder for QrShareEncoder {
    async fn encode(&self, url: &str) -> Result<ShareImage, CollaboratorError> {
        let code = qr_code(url)?;
        let image = code
            .render::<svg::Color>()
            .min_dimensions(self.min_dimension, self.min_dimension)
            .build();
        Ok(ShareImage {
            media_type: SVG_MEDIA_TYPE.to_string(),
            data: image.into_bytes(),
        })
    }
}

/// Render `image` as a `data:` URL, embeddable wherever an image source is expected.
pub fn data_url(image: &ShareImage) -> String {
    format!("data:{};base64,{}", image.media_type, STANDARD.encode(&image.data))
}

/// Render `url` as a QR code made of unicode half blocks, for terminals.
pub fn terminal_qr(url: &str) -> Result<String, CollaboratorError> {
    let code = qr_code(url)?;
    Ok(code
        .render::<unicode::Dense1x2>()
        .dark_color(unicode::Dense1x2::Light)
        .light_color(unicode::Dense1x2::Dark)
        .build())
}

fn qr_code(url: &str) -> Result<QrCode, CollaboratorError> {
    QrCode::new(url.as_bytes())
        .map_err(|err| CollaboratorError::failed(anyhow::anyhow!("QR encoding failed: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn encodes_link_as_svg() {
        let image = QrShareEncoder::new()
            .encode("https://surveys.example.test/survey/response?slug=R9")
            .await
            .unwrap();

        assert_eq!(image.media_type, "image/svg+xml");
        let svg = String::from_utf8(image.data).unwrap();
        assert!(svg.contains("<svg"));
    }

    #[tokio::test]
    async fn oversized_link_fails() {
        let url = format!("https://surveys.example.test/?slug={}", "x".repeat(8000));
        let result = QrShareEncoder::new().encode(&url).await;

        assert!(matches!(result, Err(CollaboratorError::Failed(_))));
    }

    #[test]
    fn data_url_is_base64() {
        let image = ShareImage {
            media_type: "image/svg+xml".into(),
            data: b"<svg/>".to_vec(),
        };
        assert_eq!(data_url(&image), "data:image/svg+xml;base64,PHN2Zy8+");
    }

    #[test]
    fn terminal_rendering_is_multiline() {
        let rendered = terminal_qr("R9").unwrap();
        assert!(rendered.lines().count() > 5);
    }
}
