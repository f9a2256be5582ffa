//! 2D 래스터 프리미티브.
//!
//! 썸네일 렌더러가 사용하는 최소 그리기 인터페이스([`Canvas`])와
//! `RgbaImage` 구현. 영역 스케일은 fast_image_resize(Bilinear),
//! 선/사각형/원은 거리 기반 안티앨리어싱으로 알파 블렌딩한다.

use fast_image_resize::images::{Image as FirImage, ImageRef};
use fast_image_resize::{FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer};
use image::{Rgba, RgbaImage};
use retrace_core::error::CoreError;

use crate::geometry::RectF;

/// 인코딩된 이미지 바이트 디코딩.
///
/// 포맷은 내용으로 추정한다. 크기가 0인 이미지는 디코딩 실패로 취급.
pub fn decode_image(bytes: &[u8]) -> Result<RgbaImage, CoreError> {
    let decoded =
        image::load_from_memory(bytes).map_err(|e| CoreError::ImageDecode(e.to_string()))?;
    let rgba = decoded.into_rgba8();
    if rgba.width() == 0 || rgba.height() == 0 {
        return Err(CoreError::ImageDecode("이미지 크기 0".to_string()));
    }
    Ok(rgba)
}

/// 썸네일 렌더링에 필요한 그리기 연산
pub trait Canvas {
    /// 전체를 단색으로 채움
    fn fill(&mut self, color: Rgba<u8>);

    /// `src`의 `src_rect` 영역을 `dest_rect`에 꽉 차게 스케일하여 그린다.
    ///
    /// `src_rect` 중 원본 밖 부분은 그리지 않으며, 해당 목적지 영역은 기존 픽셀이 남는다.
    fn draw_image(
        &mut self,
        src: &RgbaImage,
        src_rect: RectF,
        dest_rect: RectF,
    ) -> Result<(), CoreError>;

    /// 둥근 사각형 외곽선 (선 중심이 `rect` 경계에 놓임)
    fn stroke_rounded_rect(&mut self, rect: RectF, radius: f64, color: Rgba<u8>, line_width: f64);

    /// 원 외곽선
    fn stroke_circle(&mut self, center: (f64, f64), radius: f64, color: Rgba<u8>, line_width: f64);

    /// 직선
    fn draw_line(&mut self, from: (f64, f64), to: (f64, f64), color: Rgba<u8>, line_width: f64);
}

impl Canvas for RgbaImage {
    fn fill(&mut self, color: Rgba<u8>) {
        for pixel in self.pixels_mut() {
            *pixel = color;
        }
    }

    fn draw_image(
        &mut self,
        src: &RgbaImage,
        src_rect: RectF,
        dest_rect: RectF,
    ) -> Result<(), CoreError> {
        if src_rect.is_empty() || dest_rect.is_empty() {
            return Ok(());
        }

        let bounds = RectF::new(0.0, 0.0, f64::from(src.width()), f64::from(src.height()));
        let Some(visible) = src_rect.intersection(&bounds) else {
            return Ok(());
        };

        let sx = dest_rect.width / src_rect.width;
        let sy = dest_rect.height / src_rect.height;
        let target = RectF::new(
            dest_rect.x + (visible.x - src_rect.x) * sx,
            dest_rect.y + (visible.y - src_rect.y) * sy,
            visible.width * sx,
            visible.height * sy,
        );

        let x0 = target.x.round() as i64;
        let y0 = target.y.round() as i64;
        let w = target.max_x().round() as i64 - x0;
        let h = target.max_y().round() as i64 - y0;
        if w <= 0 || h <= 0 {
            return Ok(());
        }

        let patch = resize_region(src, visible, w as u32, h as u32)?;
        image::imageops::replace(self, &patch, x0, y0);
        Ok(())
    }

    fn stroke_rounded_rect(&mut self, rect: RectF, radius: f64, color: Rgba<u8>, line_width: f64) {
        if rect.is_empty() || line_width <= 0.0 {
            return;
        }
        let half = line_width / 2.0;
        let area = rect.outset_by(half + 1.0);
        paint_coverage(self, area, color, |px, py| {
            stroke_coverage(rounded_rect_distance(px, py, &rect, radius), half)
        });
    }

    fn stroke_circle(&mut self, center: (f64, f64), radius: f64, color: Rgba<u8>, line_width: f64) {
        if radius <= 0.0 || line_width <= 0.0 {
            return;
        }
        let half = line_width / 2.0;
        let reach = radius + half + 1.0;
        let area = RectF::new(center.0 - reach, center.1 - reach, reach * 2.0, reach * 2.0);
        paint_coverage(self, area, color, |px, py| {
            let d = ((px - center.0).powi(2) + (py - center.1).powi(2)).sqrt() - radius;
            stroke_coverage(d, half)
        });
    }

    fn draw_line(&mut self, from: (f64, f64), to: (f64, f64), color: Rgba<u8>, line_width: f64) {
        if line_width <= 0.0 {
            return;
        }
        let half = line_width / 2.0;
        let min_x = from.0.min(to.0) - half - 1.0;
        let min_y = from.1.min(to.1) - half - 1.0;
        let area = RectF::new(
            min_x,
            min_y,
            (from.0 - to.0).abs() + line_width + 2.0,
            (from.1 - to.1).abs() + line_width + 2.0,
        );
        paint_coverage(self, area, color, |px, py| {
            stroke_coverage(segment_distance((px, py), from, to), half)
        });
    }
}

/// 원본의 `region` 영역을 `width × height`로 리사이즈 (Bilinear)
pub(crate) fn resize_region(
    src: &RgbaImage,
    region: RectF,
    width: u32,
    height: u32,
) -> Result<RgbaImage, CoreError> {
    let src_view = ImageRef::new(src.width(), src.height(), src.as_raw(), PixelType::U8x4)
        .map_err(|e| CoreError::Internal(format!("소스 이미지 생성 실패: {e}")))?;

    let mut dst_image = FirImage::new(width, height, PixelType::U8x4);

    let mut resizer = Resizer::new();
    let options = ResizeOptions::new()
        .resize_alg(ResizeAlg::Convolution(FilterType::Bilinear))
        .crop(region.x, region.y, region.width, region.height);

    resizer
        .resize(&src_view, &mut dst_image, &options)
        .map_err(|e| CoreError::Internal(format!("리사이즈 실패: {e}")))?;

    RgbaImage::from_raw(width, height, dst_image.into_vec())
        .ok_or_else(|| CoreError::Internal("결과 이미지 생성 실패".to_string()))
}

/// 선 두께 절반 `half` 기준 경계 거리 `d`의 픽셀 커버리지 (0.0 ~ 1.0)
fn stroke_coverage(d: f64, half: f64) -> f64 {
    (half + 0.5 - d.abs()).clamp(0.0, 1.0)
}

/// 둥근 사각형 경계까지의 부호 있는 거리 (안쪽 음수)
fn rounded_rect_distance(px: f64, py: f64, rect: &RectF, radius: f64) -> f64 {
    let (cx, cy) = rect.center();
    let hw = rect.width / 2.0;
    let hh = rect.height / 2.0;
    let r = radius.min(hw).min(hh).max(0.0);

    let qx = (px - cx).abs() - (hw - r);
    let qy = (py - cy).abs() - (hh - r);
    let outside = (qx.max(0.0).powi(2) + qy.max(0.0).powi(2)).sqrt();
    let inside = qx.max(qy).min(0.0);
    outside + inside - r
}

/// 점과 선분 사이 거리
fn segment_distance(p: (f64, f64), a: (f64, f64), b: (f64, f64)) -> f64 {
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let len2 = dx * dx + dy * dy;
    let t = if len2 <= f64::EPSILON {
        0.0
    } else {
        (((p.0 - a.0) * dx + (p.1 - a.1) * dy) / len2).clamp(0.0, 1.0)
    };
    let (nx, ny) = (a.0 + dx * t, a.1 + dy * t);
    ((p.0 - nx).powi(2) + (p.1 - ny).powi(2)).sqrt()
}

/// `area` 안의 각 픽셀 중심에서 커버리지를 구해 색을 블렌딩
fn paint_coverage<F>(img: &mut RgbaImage, area: RectF, color: Rgba<u8>, coverage: F)
where
    F: Fn(f64, f64) -> f64,
{
    let (w, h) = (img.width() as i64, img.height() as i64);
    if w == 0 || h == 0 {
        return;
    }
    let x0 = (area.x.floor() as i64).clamp(0, w);
    let y0 = (area.y.floor() as i64).clamp(0, h);
    let x1 = (area.max_x().ceil() as i64).clamp(0, w);
    let y1 = (area.max_y().ceil() as i64).clamp(0, h);

    for y in y0..y1 {
        for x in x0..x1 {
            let c = coverage(x as f64 + 0.5, y as f64 + 0.5);
            if c <= 0.0 {
                continue;
            }
            let dst = *img.get_pixel(x as u32, y as u32);
            img.put_pixel(x as u32, y as u32, blend_pixel(dst, color, c));
        }
    }
}

/// source-over 알파 블렌딩 (`coverage`로 원본 알파 추가 감쇠)
fn blend_pixel(dst: Rgba<u8>, src: Rgba<u8>, coverage: f64) -> Rgba<u8> {
    let a = f64::from(src[3]) / 255.0 * coverage.clamp(0.0, 1.0);
    if a <= 0.0 {
        return dst;
    }
    let inv = 1.0 - a;
    let channel =
        |d: u8, s: u8| (f64::from(d) * inv + f64::from(s) * a).round().clamp(0.0, 255.0) as u8;
    let out_a = (a * 255.0 + f64::from(dst[3]) * inv)
        .round()
        .clamp(0.0, 255.0) as u8;
    Rgba([
        channel(dst[0], src[0]),
        channel(dst[1], src[1]),
        channel(dst[2], src[2]),
        out_a,
    ])
}
