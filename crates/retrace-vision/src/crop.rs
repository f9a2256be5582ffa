//! 매칭 노드 중심 줌 크롭 계산.
//!
//! OCR 좌표는 좌상단 원점 비율 좌표이고 `image` 크레이트 버퍼도 좌상단 원점이므로
//! Y축 반전 없이 그대로 픽셀 좌표로 변환한다.

use retrace_core::models::ocr::OcrNode;

use crate::geometry::{RectF, SizeF};

/// 기본 줌 배율 (크롭 너비 = 원본 너비 / 3.5)
pub const DEFAULT_ZOOM_FACTOR: f64 = 3.5;

/// 원본 이미지 픽셀 좌표계의 크롭 영역
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropSpec {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl CropSpec {
    pub fn rect(&self) -> RectF {
        RectF::new(self.x, self.y, self.width, self.height)
    }

    /// 원본 이미지 좌표의 사각형을 출력 좌표로 변환.
    ///
    /// 크롭 원점만큼 평행이동한 뒤 축별로 `output / crop` 배율을 곱한다.
    pub fn map_to_output(&self, rect: &RectF, output: SizeF) -> RectF {
        let sx = output.width / self.width;
        let sy = output.height / self.height;
        RectF::new(
            (rect.x - self.x) * sx,
            (rect.y - self.y) * sy,
            rect.width * sx,
            rect.height * sy,
        )
    }
}

/// 노드의 비율 박스를 원본 이미지 픽셀 사각형으로 변환
pub fn node_rect_in_image(node: &OcrNode, image: SizeF) -> RectF {
    RectF::new(
        node.x * image.width,
        node.y * image.height,
        node.width * image.width,
        node.height * image.height,
    )
}

/// 매칭 노드를 중심으로 한 크롭 영역 계산.
///
/// - 크롭 너비 = 원본 너비 / `zoom_factor`
/// - 크롭 높이 = 크롭 너비 × (출력 높이 / 출력 너비), 원본 종횡비와 무관
/// - 원점은 축별로 `[0, max(0, 원본 - 크롭)]` 범위로 클램프
///
/// 크롭이 원본보다 크면 원점이 0으로 고정되고 크롭은 원본 밖으로 넘친다.
/// 넘친 부분은 렌더링 시 배경으로 남는다.
///
/// 이미지나 출력 크기가 비었거나 배율이 양의 유한값이 아니면 None.
pub fn compute_crop(
    image: SizeF,
    node: &OcrNode,
    output: SizeF,
    zoom_factor: f64,
) -> Option<CropSpec> {
    if image.is_empty() || output.is_empty() || !zoom_factor.is_finite() || zoom_factor <= 0.0 {
        return None;
    }

    let (center_x, center_y) = node_rect_in_image(node, image).center();

    let width = image.width / zoom_factor;
    let height = width * (output.height / output.width);

    let x = clamp_origin(center_x - width / 2.0, image.width - width);
    let y = clamp_origin(center_y - height / 2.0, image.height - height);

    Some(CropSpec {
        x,
        y,
        width,
        height,
    })
}

/// `[0, max(0, upper)]` 범위로 클램프. NaN 원점은 0.
fn clamp_origin(origin: f64, upper: f64) -> f64 {
    let upper = upper.max(0.0);
    if origin.is_nan() {
        return 0.0;
    }
    origin.clamp(0.0, upper)
}
