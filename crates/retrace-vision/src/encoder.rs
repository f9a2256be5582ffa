//! 썸네일 인코더.
//!
//! 렌더링된 RGBA 썸네일을 PNG/JPEG/WebP 바이트로 인코딩한다.

use base64::{engine::general_purpose::STANDARD as B64, Engine};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{DynamicImage, ImageEncoder, RgbaImage};
use retrace_core::config::ThumbnailFormat;
use retrace_core::error::CoreError;
use tracing::debug;

/// 지정 포맷으로 인코딩. `quality`는 JPEG/WebP에만 적용 (1 ~ 100).
pub fn encode_thumbnail(
    image: &RgbaImage,
    format: ThumbnailFormat,
    quality: u8,
) -> Result<Vec<u8>, CoreError> {
    let (w, h) = image.dimensions();
    if w == 0 || h == 0 {
        return Err(CoreError::Encode("이미지 크기 0".to_string()));
    }
    let quality = quality.clamp(1, 100);

    let encoded = match format {
        ThumbnailFormat::Png => {
            let mut buf = Vec::new();
            PngEncoder::new(&mut buf)
                .write_image(image.as_raw(), w, h, image::ExtendedColorType::Rgba8)
                .map_err(|e| CoreError::Encode(format!("PNG: {e}")))?;
            buf
        }
        ThumbnailFormat::Jpeg => {
            // JPEG는 알파 채널 미지원
            let rgb = DynamicImage::ImageRgba8(image.clone()).to_rgb8();
            let mut buf = Vec::new();
            JpegEncoder::new_with_quality(&mut buf, quality)
                .write_image(rgb.as_raw(), w, h, image::ExtendedColorType::Rgb8)
                .map_err(|e| CoreError::Encode(format!("JPEG: {e}")))?;
            buf
        }
        ThumbnailFormat::WebP => {
            let encoder = webp::Encoder::from_rgba(image.as_raw(), w, h);
            encoder.encode(f32::from(quality)).to_vec()
        }
    };

    debug!(
        "썸네일 인코딩: {:?} {}x{}, {} bytes",
        format,
        w,
        h,
        encoded.len()
    );
    Ok(encoded)
}

/// 인코딩 후 Base64 문자열로 변환
pub fn encode_base64(
    image: &RgbaImage,
    format: ThumbnailFormat,
    quality: u8,
) -> Result<String, CoreError> {
    let bytes = encode_thumbnail(image, format, quality)?;
    Ok(B64.encode(&bytes))
}

/// 포맷의 파일 확장자
pub fn file_extension(format: ThumbnailFormat) -> &'static str {
    match format {
        ThumbnailFormat::Png => "png",
        ThumbnailFormat::Jpeg => "jpg",
        ThumbnailFormat::WebP => "webp",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn make_test_image() -> RgbaImage {
        RgbaImage::from_pixel(64, 40, Rgba([100, 150, 200, 255]))
    }

    #[test]
    fn png_signature() {
        let bytes = encode_thumbnail(&make_test_image(), ThumbnailFormat::Png, 80).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn jpeg_signature() {
        let bytes = encode_thumbnail(&make_test_image(), ThumbnailFormat::Jpeg, 80).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
    }

    #[test]
    fn webp_signature() {
        let bytes = encode_thumbnail(&make_test_image(), ThumbnailFormat::WebP, 80).unwrap();
        assert_eq!(&bytes[..4], b"RIFF");
        assert_eq!(&bytes[8..12], b"WEBP");
    }

    #[test]
    fn png_decodes_back_to_same_size() {
        let bytes = encode_thumbnail(&make_test_image(), ThumbnailFormat::Png, 80).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (64, 40));
    }

    #[test]
    fn base64_output() {
        let b64 = encode_base64(&make_test_image(), ThumbnailFormat::Png, 80).unwrap();
        assert!(!b64.is_empty());
        let decoded = B64.decode(&b64).unwrap();
        assert_eq!(&decoded[1..4], b"PNG");
    }

    #[test]
    fn empty_image_rejected() {
        let err = encode_thumbnail(&RgbaImage::new(0, 0), ThumbnailFormat::Png, 80).unwrap_err();
        assert!(matches!(err, CoreError::Encode(_)));
    }

    #[test]
    fn extensions() {
        assert_eq!(file_extension(ThumbnailFormat::Png), "png");
        assert_eq!(file_extension(ThumbnailFormat::Jpeg), "jpg");
        assert_eq!(file_extension(ThumbnailFormat::WebP), "webp");
    }
}
