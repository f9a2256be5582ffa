//! 검색 결과 썸네일 생성.
//!
//! 매칭 노드를 찾으면 그 주변을 줌 크롭해 하이라이트 박스를 그리고,
//! 매칭이 없으면 전체 프레임을 출력 크기로 늘려 담는다.
//! 이미지를 디코딩할 수 없으면 고정 스타일의 플레이스홀더를 만든다.
//!
//! 이 모듈의 최상위 함수 [`generate_search_thumbnail`]은 실패하지 않는다.

use image::{Rgba, RgbaImage};
use retrace_core::config::ThumbnailConfig;
use retrace_core::error::CoreError;
use retrace_core::models::ocr::OcrNode;
use serde::Serialize;
use tracing::{debug, warn};

use crate::crop::{compute_crop, node_rect_in_image, CropSpec};
use crate::geometry::{RectF, SizeF};
use crate::matcher::find_match;
use crate::raster::{decode_image, resize_region, Canvas};

/// 크롭이 원본 밖으로 넘칠 때 남는 배경색
const BACKGROUND: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// 플레이스홀더 배경 (짙은 회색)
const PLACEHOLDER_BACKGROUND: Rgba<u8> = Rgba([44, 44, 46, 255]);

/// 플레이스홀더 아이콘 선 색
const PLACEHOLDER_STROKE: Rgba<u8> = Rgba([120, 120, 124, 255]);

/// 썸네일 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ThumbnailKind {
    /// 매칭 영역 줌 + 하이라이트
    Highlighted,
    /// 전체 프레임 스케일 (매칭 없음)
    FullFrame,
    /// 이미지 디코딩 실패
    Placeholder,
}

/// 렌더링된 썸네일
#[derive(Debug, Clone)]
pub struct Thumbnail {
    /// 출력 크기와 정확히 같은 이미지
    pub image: RgbaImage,
    pub kind: ThumbnailKind,
    /// 하이라이트된 노드 (Highlighted일 때만)
    pub matched: Option<OcrNode>,
}

/// 출력 크기 (0은 1로 보정)
fn output_size(config: &ThumbnailConfig) -> (u32, u32) {
    (config.width.max(1), config.height.max(1))
}

/// 고속 리사이즈 (전체 이미지 → 목표 크기, 종횡비 무시)
pub fn fast_resize(image: &RgbaImage, width: u32, height: u32) -> Result<RgbaImage, CoreError> {
    let (src_w, src_h) = image.dimensions();

    // 동일 크기면 복제 반환
    if src_w == width && src_h == height {
        return Ok(image.clone());
    }

    if src_w == 0 || src_h == 0 {
        return Err(CoreError::Internal("소스 이미지 크기 0".to_string()));
    }
    if width == 0 || height == 0 {
        return Err(CoreError::Internal("목표 이미지 크기 0".to_string()));
    }

    let region = RectF::new(0.0, 0.0, f64::from(src_w), f64::from(src_h));
    let result = resize_region(image, region, width, height)?;

    debug!("썸네일 리사이즈: {}x{} → {}x{}", src_w, src_h, width, height);
    Ok(result)
}

/// 매칭 없음: 전체 이미지를 출력 크기에 꽉 차게 스케일 (오버레이 없음)
pub fn render_full_frame(
    image: &RgbaImage,
    config: &ThumbnailConfig,
) -> Result<RgbaImage, CoreError> {
    let (w, h) = output_size(config);
    fast_resize(image, w, h)
}

/// 크롭 영역을 출력 크기로 스케일하고, 하이라이트 박스를 그린다.
///
/// `highlight`는 원본 이미지 픽셀 좌표. 크롭과 같은 변환으로 출력 좌표에 옮긴 뒤
/// 사방으로 `highlight_padding`만큼 넓혀 둥근 사각형 외곽선을 그린다.
pub fn render_thumbnail(
    image: &RgbaImage,
    crop: &CropSpec,
    highlight: Option<RectF>,
    config: &ThumbnailConfig,
) -> Result<RgbaImage, CoreError> {
    let (w, h) = output_size(config);
    let output = SizeF::from_pixels(w, h);

    let mut canvas = RgbaImage::new(w, h);
    canvas.fill(BACKGROUND);
    canvas.draw_image(
        image,
        crop.rect(),
        RectF::new(0.0, 0.0, output.width, output.height),
    )?;

    if let Some(rect) = highlight {
        let box_in_output = crop
            .map_to_output(&rect, output)
            .outset_by(config.highlight_padding);
        canvas.stroke_rounded_rect(
            box_in_output,
            config.corner_radius,
            Rgba(config.highlight_rgba()),
            config.line_width,
        );
    }

    Ok(canvas)
}

/// 디코딩 실패용 플레이스홀더: 짙은 회색 배경 + 가운데 X 표시 원
pub fn render_placeholder(config: &ThumbnailConfig) -> RgbaImage {
    let (w, h) = output_size(config);
    let mut canvas = RgbaImage::from_pixel(w, h, PLACEHOLDER_BACKGROUND);

    let center = (f64::from(w) / 2.0, f64::from(h) / 2.0);
    let radius = f64::from(w.min(h)) * 0.18;
    let line_width = (radius / 8.0).max(1.5);
    canvas.stroke_circle(center, radius, PLACEHOLDER_STROKE, line_width);

    // 원 안쪽 대각선 두 개
    let arm = radius * std::f64::consts::FRAC_1_SQRT_2;
    canvas.draw_line(
        (center.0 - arm, center.1 - arm),
        (center.0 + arm, center.1 + arm),
        PLACEHOLDER_STROKE,
        line_width,
    );
    canvas.draw_line(
        (center.0 + arm, center.1 - arm),
        (center.0 - arm, center.1 + arm),
        PLACEHOLDER_STROKE,
        line_width,
    );
    canvas
}

/// 디코딩된 프레임에서 검색 썸네일 생성
pub fn generate_from_image(
    image: &RgbaImage,
    nodes: &[OcrNode],
    query: &str,
    config: &ThumbnailConfig,
) -> Thumbnail {
    let (w, h) = output_size(config);
    let image_size = SizeF::from_pixels(image.width(), image.height());

    if let Some(node) = find_match(query, nodes) {
        if let Some(crop) = compute_crop(
            image_size,
            node,
            SizeF::from_pixels(w, h),
            config.zoom_factor,
        ) {
            let highlight = node_rect_in_image(node, image_size);
            match render_thumbnail(image, &crop, Some(highlight), config) {
                Ok(rendered) => {
                    return Thumbnail {
                        image: rendered,
                        kind: ThumbnailKind::Highlighted,
                        matched: Some(node.clone()),
                    };
                }
                Err(e) => warn!("하이라이트 썸네일 렌더링 실패, 전체 프레임으로 대체: {e}"),
            }
        } else {
            debug!("크롭 영역 계산 불가, 전체 프레임으로 대체");
        }
    }

    match render_full_frame(image, config) {
        Ok(rendered) => Thumbnail {
            image: rendered,
            kind: ThumbnailKind::FullFrame,
            matched: None,
        },
        Err(e) => {
            warn!("전체 프레임 썸네일 렌더링 실패: {e}");
            placeholder(config)
        }
    }
}

/// 인코딩된 프레임 바이트 + OCR 노드 + 검색어 → 썸네일.
///
/// 실패하지 않는다. 디코딩이 안 되면 플레이스홀더를 반환한다.
pub fn generate_search_thumbnail(
    image_bytes: &[u8],
    nodes: &[OcrNode],
    query: &str,
    config: &ThumbnailConfig,
) -> Thumbnail {
    match decode_image(image_bytes) {
        Ok(image) => generate_from_image(&image, nodes, query, config),
        Err(e) => {
            debug!("프레임 디코딩 실패, 플레이스홀더 사용: {e}");
            placeholder(config)
        }
    }
}

/// 플레이스홀더 썸네일
pub fn placeholder(config: &ThumbnailConfig) -> Thumbnail {
    Thumbnail {
        image: render_placeholder(config),
        kind: ThumbnailKind::Placeholder,
        matched: None,
    }
}
