use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{DynamicImage, ImageFormat};
use std::io::Cursor;

use crate::error::{Error, Result};

/// Decode fetched photo bytes and re-encode them as a lossless PNG at natural
/// size, returned as bare base64 (no data URI prefix).
pub fn to_png_base64(bytes: &[u8]) -> Result<String> {
    let img = image::load_from_memory(bytes)?;
    let png = encode_png(&img)?;
    Ok(STANDARD.encode(png))
}

pub fn encode_png(img: &DynamicImage) -> Result<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png)?;
    Ok(buf.into_inner())
}

/// Decode a base64 image payload from the editor. Tolerates a leading
/// `data:image/...;base64,` prefix.
pub fn decode_base64_image(payload: &str) -> Result<DynamicImage> {
    let raw = match payload.split_once(";base64,") {
        Some((head, rest)) if head.starts_with("data:") => rest,
        _ => payload,
    };
    let bytes = STANDARD
        .decode(raw.trim())
        .map_err(|e| Error::malformed(format!("image is not valid base64: {e}")))?;
    image::load_from_memory(&bytes)
        .map_err(|e| Error::malformed(format!("image payload does not decode: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn sample() -> DynamicImage {
        let mut img = RgbImage::new(3, 2);
        img.put_pixel(0, 0, Rgb([255, 0, 0]));
        img.put_pixel(2, 1, Rgb([0, 0, 255]));
        DynamicImage::ImageRgb8(img)
    }

    #[test]
    fn reencodes_at_natural_size_losslessly() {
        let png = encode_png(&sample()).unwrap();
        let b64 = to_png_base64(&png).unwrap();
        assert!(!b64.starts_with("data:"));

        let back = decode_base64_image(&b64).unwrap().to_rgb8();
        assert_eq!(back.dimensions(), (3, 2));
        assert_eq!(back.get_pixel(0, 0), &Rgb([255, 0, 0]));
        assert_eq!(back.get_pixel(2, 1), &Rgb([0, 0, 255]));
    }

    #[test]
    fn jpeg_input_comes_out_as_png() {
        let mut jpeg = Cursor::new(Vec::new());
        sample().write_to(&mut jpeg, ImageFormat::Jpeg).unwrap();

        let b64 = to_png_base64(jpeg.get_ref()).unwrap();
        let bytes = STANDARD.decode(b64).unwrap();
        assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::Png);
    }

    #[test]
    fn garbage_bytes_are_an_image_error() {
        assert!(matches!(to_png_base64(b"not an image"), Err(Error::Image(_))));
    }

    #[test]
    fn data_uri_prefix_is_accepted_on_decode() {
        let b64 = STANDARD.encode(encode_png(&sample()).unwrap());
        let uri = format!("data:image/png;base64,{b64}");
        assert_eq!(decode_base64_image(&uri).unwrap().width(), 3);
    }

    #[test]
    fn bad_base64_is_malformed() {
        assert!(matches!(
            decode_base64_image("%%%"),
            Err(Error::MalformedResponse(_))
        ));
    }
}
