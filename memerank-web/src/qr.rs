//! QR code generation for the home page
//!
//! Pure derived output: encodes a URL as a black-on-white PNG and returns it
//! as a base64 data URL, so the page needs no extra image route.

use base64::{engine::general_purpose, Engine as _};
use image::{ImageBuffer, ImageFormat, Luma};
use memerank_common::{Error, Result};
use qrcode::{Color, QrCode};

/// Pixels per QR module
const BOX_SIZE: u32 = 10;
/// Quiet zone width, in modules
const BORDER: u32 = 5;

/// Render `url` as a QR code and return it as a `data:image/png;base64,` URL
pub fn data_url(url: &str) -> Result<String> {
    let code = QrCode::new(url.as_bytes())
        .map_err(|e| Error::Internal(format!("QR encoding failed: {}", e)))?;

    let modules = code.width() as u32;
    let colors = code.to_colors();
    let dim = (modules + 2 * BORDER) * BOX_SIZE;

    let img: ImageBuffer<Luma<u8>, Vec<u8>> = ImageBuffer::from_fn(dim, dim, |x, y| {
        if module_at(&colors, modules, x, y) {
            Luma([0u8])
        } else {
            Luma([255u8])
        }
    });

    let mut png = Vec::new();
    img.write_to(&mut std::io::Cursor::new(&mut png), ImageFormat::Png)
        .map_err(|e| Error::Internal(format!("QR image encoding failed: {}", e)))?;

    Ok(format!(
        "data:image/png;base64,{}",
        general_purpose::STANDARD.encode(&png)
    ))
}

/// Whether the pixel at (x, y) falls on a dark module
fn module_at(colors: &[Color], modules: u32, x: u32, y: u32) -> bool {
    let cx = x / BOX_SIZE;
    let cy = y / BOX_SIZE;
    if cx < BORDER || cy < BORDER {
        return false;
    }
    let (mx, my) = (cx - BORDER, cy - BORDER);
    if mx >= modules || my >= modules {
        return false;
    }
    colors[(my * modules + mx) as usize] == Color::Dark
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_url_is_png() {
        let url = data_url("http://localhost:8082/").unwrap();

        let payload = url
            .strip_prefix("data:image/png;base64,")
            .expect("data URL prefix");
        let bytes = general_purpose::STANDARD.decode(payload).unwrap();

        // PNG signature
        assert_eq!(&bytes[..8], &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a]);
    }

    #[test]
    fn test_longer_urls_still_encode() {
        let long = format!("http://example.com/{}", "x".repeat(200));
        assert!(data_url(&long).is_ok());
    }
}
