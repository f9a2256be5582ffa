//! 애플리케이션 설정 구조체.
//!
//! 검색 썸네일 크기/줌/하이라이트 스타일, 세션 캐시 용량 등
//! 런타임 설정을 정의한다. `ConfigManager`를 통해 JSON 파일에서 로드.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// 최상위 애플리케이션 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// 검색 썸네일 렌더링 설정
    #[serde(default)]
    pub thumbnail: ThumbnailConfig,
    /// 세션 썸네일 캐시 설정
    #[serde(default)]
    pub cache: CacheConfig,
}

// ============================================================
// 썸네일 설정
// ============================================================

/// 썸네일 출력 포맷
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThumbnailFormat {
    #[default]
    Png,
    Jpeg,
    WebP,
}

/// 검색 썸네일 렌더링 설정: 크기, 줌 배율, 하이라이트 스타일
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThumbnailConfig {
    /// 출력 너비 (픽셀)
    #[serde(default = "default_thumbnail_width")]
    pub width: u32,
    /// 출력 높이 (픽셀)
    #[serde(default = "default_thumbnail_height")]
    pub height: u32,
    /// 매칭 영역 줌 배율 (크롭 너비 = 원본 너비 / 배율)
    #[serde(default = "default_zoom_factor")]
    pub zoom_factor: f64,
    /// 하이라이트 박스 여백 (출력 픽셀)
    #[serde(default = "default_highlight_padding")]
    pub highlight_padding: f64,
    /// 하이라이트 모서리 반경 (출력 픽셀)
    #[serde(default = "default_corner_radius")]
    pub corner_radius: f64,
    /// 하이라이트 선 두께 (출력 픽셀)
    #[serde(default = "default_line_width")]
    pub line_width: f64,
    /// 하이라이트 색상 (RGB)
    #[serde(default = "default_highlight_color")]
    pub highlight_color: [u8; 3],
    /// 하이라이트 불투명도 (0.0 ~ 1.0)
    #[serde(default = "default_highlight_alpha")]
    pub highlight_alpha: f64,
    /// 인코딩 포맷
    #[serde(default)]
    pub format: ThumbnailFormat,
    /// 손실 압축 품질 (JPEG/WebP, 1 ~ 100)
    #[serde(default = "default_quality")]
    pub quality: u8,
}

impl Default for ThumbnailConfig {
    fn default() -> Self {
        Self {
            width: default_thumbnail_width(),
            height: default_thumbnail_height(),
            zoom_factor: default_zoom_factor(),
            highlight_padding: default_highlight_padding(),
            corner_radius: default_corner_radius(),
            line_width: default_line_width(),
            highlight_color: default_highlight_color(),
            highlight_alpha: default_highlight_alpha(),
            format: ThumbnailFormat::default(),
            quality: default_quality(),
        }
    }
}

impl ThumbnailConfig {
    /// 설정값 유효성 검증
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.width == 0 {
            return Err(CoreError::validation("thumbnail.width", "0보다 커야 함"));
        }
        if self.height == 0 {
            return Err(CoreError::validation("thumbnail.height", "0보다 커야 함"));
        }
        if !self.zoom_factor.is_finite() || self.zoom_factor <= 0.0 {
            return Err(CoreError::validation(
                "thumbnail.zoom_factor",
                format!("양의 유한값이어야 함: {}", self.zoom_factor),
            ));
        }
        if !(0.0..=1.0).contains(&self.highlight_alpha) {
            return Err(CoreError::validation(
                "thumbnail.highlight_alpha",
                format!("0.0 ~ 1.0 범위여야 함: {}", self.highlight_alpha),
            ));
        }
        if self.highlight_padding < 0.0 || self.corner_radius < 0.0 || self.line_width <= 0.0 {
            return Err(CoreError::validation(
                "thumbnail.highlight",
                "여백/반경은 0 이상, 선 두께는 0보다 커야 함",
            ));
        }
        if self.quality == 0 || self.quality > 100 {
            return Err(CoreError::validation(
                "thumbnail.quality",
                format!("1 ~ 100 범위여야 함: {}", self.quality),
            ));
        }
        Ok(())
    }

    /// 하이라이트 색상 (RGBA, 불투명도 반영)
    pub fn highlight_rgba(&self) -> [u8; 4] {
        let [r, g, b] = self.highlight_color;
        let a = (self.highlight_alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
        [r, g, b, a]
    }
}

// ============================================================
// 캐시 설정
// ============================================================

/// 세션 썸네일 캐시 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// 최대 썸네일 수 (LRU)
    #[serde(default = "default_cache_capacity")]
    pub capacity: usize,
    /// 완료 이벤트 브로드캐스트 채널 용량
    #[serde(default = "default_event_capacity")]
    pub event_capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: default_cache_capacity(),
            event_capacity: default_event_capacity(),
        }
    }
}

// ============================================================
// AppConfig impl
// ============================================================

impl AppConfig {
    /// 기본 설정값 반환
    pub fn default_config() -> Self {
        Self {
            thumbnail: ThumbnailConfig::default(),
            cache: CacheConfig::default(),
        }
    }

    /// 전체 설정 유효성 검증
    pub fn validate(&self) -> Result<(), CoreError> {
        self.thumbnail.validate()?;
        if self.cache.capacity == 0 {
            return Err(CoreError::validation("cache.capacity", "0보다 커야 함"));
        }
        if self.cache.event_capacity == 0 {
            return Err(CoreError::validation(
                "cache.event_capacity",
                "0보다 커야 함",
            ));
        }
        Ok(())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::default_config()
    }
}

// ============================================================
// 기본값 함수
// ============================================================

fn default_thumbnail_width() -> u32 {
    280
}
fn default_thumbnail_height() -> u32 {
    175
}
fn default_zoom_factor() -> f64 {
    3.5
}
fn default_highlight_padding() -> f64 {
    4.0
}
fn default_corner_radius() -> f64 {
    3.0
}
fn default_line_width() -> f64 {
    2.0
}
fn default_highlight_color() -> [u8; 3] {
    [255, 204, 0]
}
fn default_highlight_alpha() -> f64 {
    0.9
}
fn default_quality() -> u8 {
    80
}
fn default_cache_capacity() -> usize {
    200
}
fn default_event_capacity() -> usize {
    64
}
