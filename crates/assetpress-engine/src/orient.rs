use image::DynamicImage;
use rexif::{ExifData, ExifTag, TagValue, parse_buffer_quiet};

/// EXIF orientation value from the original file bytes, if any.
pub fn orientation_of(bytes: &[u8]) -> Option<u16> {
    parse_buffer_quiet(bytes)
        .0
        .ok()
        .as_ref()
        .and_then(exif_orientation)
}

/// Bake the EXIF orientation into the pixels. Re-encoding strips metadata,
/// so the visual rotation has to be applied before the tag is lost.
pub fn apply_orientation(image: DynamicImage, orientation: u16) -> DynamicImage {
    match orientation {
        2 => image.fliph(),
        3 => image.rotate180(),
        4 => image.flipv(),
        5 => image.rotate90().fliph(),
        6 => image.rotate90(),
        7 => image.rotate270().fliph(),
        8 => image.rotate270(),
        _ => image,
    }
}

/// Decoded image with any embedded orientation applied.
pub fn normalized(image: DynamicImage, source_bytes: &[u8]) -> DynamicImage {
    match orientation_of(source_bytes) {
        Some(orientation) => apply_orientation(image, orientation),
        None => image,
    }
}

fn exif_orientation(exif: &ExifData) -> Option<u16> {
    exif.entries
        .iter()
        .find(|entry| entry.tag == ExifTag::Orientation)
        .and_then(|entry| tag_value_to_u16(&entry.value))
}

fn tag_value_to_u16(value: &TagValue) -> Option<u16> {
    match value {
        TagValue::U16(values) => values.first().copied(),
        TagValue::U8(values) => values.first().copied().map(u16::from),
        TagValue::U32(values) => values
            .first()
            .copied()
            .map(|v| v.min(u16::MAX as u32) as u16),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    #[test]
    fn test_rotation_swaps_dimensions() {
        let img = DynamicImage::ImageRgb8(RgbImage::new(40, 20));
        let rotated = apply_orientation(img, 6);
        assert_eq!((rotated.width(), rotated.height()), (20, 40));
    }

    #[test]
    fn test_identity_orientations() {
        for orientation in [0, 1, 9] {
            let img = DynamicImage::ImageRgb8(RgbImage::new(40, 20));
            let out = apply_orientation(img, orientation);
            assert_eq!((out.width(), out.height()), (40, 20));
        }
    }

    #[test]
    fn test_no_exif_in_plain_png() {
        let mut bytes = Vec::new();
        let img = DynamicImage::ImageRgb8(RgbImage::new(4, 4));
        img.write_to(
            &mut std::io::Cursor::new(&mut bytes),
            image::ImageFormat::Png,
        )
        .unwrap();
        assert_eq!(orientation_of(&bytes), None);
    }
}
