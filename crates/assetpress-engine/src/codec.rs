use std::io::Cursor;

use anyhow::anyhow;
use image::DynamicImage;
use image::codecs::jpeg::JpegEncoder;

use assetpress_core::{Error, ImageFormat, Result};

/// Decode image bytes, sniffing the container rather than trusting the
/// extension (a resized file keeps its original path but holds WebP bytes).
pub fn decode(bytes: &[u8]) -> Result<DynamicImage> {
    image::load_from_memory(bytes).map_err(|e| Error::Other(anyhow!("{e}")))
}

/// Cheap header probe for natural dimensions, without a full decode.
pub fn probe_dimensions(bytes: &[u8]) -> Option<(u32, u32)> {
    image::ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .ok()?
        .into_dimensions()
        .ok()
}

/// Single encode dispatch for every target codec the pipeline produces.
/// Output carries pixels only; any metadata in the source is gone.
pub fn encode(image: &DynamicImage, format: ImageFormat, quality: u8) -> Result<Vec<u8>> {
    match format {
        ImageFormat::Webp => {
            let rgba = image.to_rgba8();
            let encoder = webp::Encoder::from_rgba(rgba.as_raw(), rgba.width(), rgba.height());
            Ok(encoder.encode(quality as f32).to_vec())
        }
        ImageFormat::Avif => {
            let rgba = image.to_rgba8();
            let pixels: Vec<rgb::RGBA<u8>> = rgba
                .as_raw()
                .chunks_exact(4)
                .map(|px| rgb::RGBA::new(px[0], px[1], px[2], px[3]))
                .collect();
            let img = ravif::Img::new(
                pixels.as_slice(),
                rgba.width() as usize,
                rgba.height() as usize,
            );
            let encoded = ravif::Encoder::new()
                .with_quality(quality as f32)
                .with_speed(6)
                .encode_rgba(img)
                .map_err(|e| Error::Other(anyhow!("avif encode: {e}")))?;
            Ok(encoded.avif_file)
        }
        ImageFormat::Jpeg => {
            let mut buf = Vec::new();
            let mut cursor = Cursor::new(&mut buf);
            let encoder = JpegEncoder::new_with_quality(&mut cursor, quality);
            image
                .write_with_encoder(encoder)
                .map_err(|e| Error::Other(anyhow!("jpeg encode: {e}")))?;
            Ok(buf)
        }
        ImageFormat::Png => {
            let mut buf = Vec::new();
            image
                .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
                .map_err(|e| Error::Other(anyhow!("png encode: {e}")))?;
            Ok(buf)
        }
        ImageFormat::Svg => Err(Error::UnsupportedFormat("svg".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    fn fixture() -> DynamicImage {
        let img = RgbImage::from_fn(32, 16, |x, y| image::Rgb([x as u8 * 8, y as u8 * 16, 64]));
        DynamicImage::ImageRgb8(img)
    }

    #[test]
    fn test_webp_round_trip_dimensions() {
        let bytes = encode(&fixture(), ImageFormat::Webp, 80).unwrap();
        assert_eq!(probe_dimensions(&bytes), Some((32, 16)));
    }

    #[test]
    fn test_probe_matches_decode() {
        let mut png = Vec::new();
        fixture()
            .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
            .unwrap();
        assert_eq!(probe_dimensions(&png), Some((32, 16)));
        let decoded = decode(&png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (32, 16));
    }

    #[test]
    fn test_probe_garbage_is_none() {
        assert_eq!(probe_dimensions(b"not an image"), None);
        assert!(decode(b"not an image").is_err());
    }

    #[test]
    fn test_jpeg_and_png_arms() {
        let jpeg = encode(&fixture(), ImageFormat::Jpeg, 80).unwrap();
        assert_eq!(probe_dimensions(&jpeg), Some((32, 16)));

        let png = encode(&fixture(), ImageFormat::Png, 80).unwrap();
        assert_eq!(probe_dimensions(&png), Some((32, 16)));
    }

    #[test]
    fn test_svg_is_not_encodable() {
        assert!(matches!(
            encode(&fixture(), ImageFormat::Svg, 80),
            Err(Error::UnsupportedFormat(_))
        ));
    }
}
