//! Retrace 핵심 에러 타입.
//!
//! 모든 어댑터 crate는 이 타입을 그대로 반환하거나 `#[from] CoreError`로 래핑한다.

use thiserror::Error;

/// 코어 레이어 에러.
/// 직렬화, 설정, 유효성 검증, 이미지 디코딩/인코딩 등 도메인 공통 에러를 정의한다.
#[derive(Debug, Error)]
pub enum CoreError {
    /// JSON 직렬화/역직렬화 실패
    #[error("직렬화 에러: {0}")]
    Serialization(#[from] serde_json::Error),

    /// 설정값 오류
    #[error("설정 에러: {0}")]
    Config(String),

    /// 필드 유효성 검증 실패
    #[error("유효성 검증 실패: {field}: {message}")]
    Validation {
        /// 검증 실패한 필드명
        field: String,
        /// 실패 사유
        message: String,
    },

    /// 리소스를 찾을 수 없음
    #[error("{resource_type} 미발견: {id}")]
    NotFound {
        /// 리소스 종류 (예: "Frame", "OcrNodes")
        resource_type: String,
        /// 리소스 식별자
        id: String,
    },

    /// 내부 에러 (예상치 못한 상황)
    #[error("내부 에러: {0}")]
    Internal(String),

    /// I/O 에러
    #[error("I/O 에러: {0}")]
    Io(#[from] std::io::Error),

    /// 이미지 디코딩 실패 (손상된 바이트, 크기 0 이미지)
    #[error("이미지 디코딩 실패: {0}")]
    ImageDecode(String),

    /// 썸네일 인코딩 실패
    #[error("이미지 인코딩 실패: {0}")]
    Encode(String),
}

impl CoreError {
    /// 유효성 검증 에러 생성 헬퍼
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let e = CoreError::validation("thumbnail.width", "0보다 커야 함");
        assert!(e.to_string().contains("thumbnail.width"));

        let e = CoreError::NotFound {
            resource_type: "Frame".to_string(),
            id: "42".to_string(),
        };
        assert_eq!(e.to_string(), "Frame 미발견: 42");

        let e = CoreError::ImageDecode("bad header".to_string());
        assert!(e.to_string().contains("디코딩"));
    }

    #[test]
    fn serde_error_converts() {
        let err = serde_json::from_str::<u32>("not json").unwrap_err();
        let core: CoreError = err.into();
        assert!(matches!(core, CoreError::Serialization(_)));
    }
}
