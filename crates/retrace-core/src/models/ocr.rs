//! OCR 텍스트 노드 모델.

use serde::{Deserialize, Serialize};

/// 캡처 프레임 위에서 인식된 텍스트 영역.
///
/// 바운딩 박스는 이미지 크기에 대한 비율(0.0 ~ 1.0)이며 원점은 좌상단이다.
/// 범위를 벗어난 값도 그대로 받아들이고, 크롭 단계에서 클램프된다.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OcrNode {
    /// 인식된 텍스트
    pub text: String,
    /// 좌상단 X (이미지 너비 대비 비율)
    pub x: f64,
    /// 좌상단 Y (이미지 높이 대비 비율)
    pub y: f64,
    /// 너비 비율
    pub width: f64,
    /// 높이 비율
    pub height: f64,
}

impl OcrNode {
    /// 새 노드 생성
    pub fn new(text: impl Into<String>, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            width,
            height,
        }
    }

    /// 정규화 좌표 기준 중심점
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}
