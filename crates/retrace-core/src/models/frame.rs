//! 프레임 참조 모델.
//!
//! 녹화된 비디오 세그먼트 안의 한 프레임을 가리키는 키.
//! 실제 이미지/OCR 데이터는 `FrameRepository` 포트를 통해 가져온다.

use serde::{Deserialize, Serialize};
use std::fmt;

/// 프레임 데이터 출처
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameSource {
    /// 앱이 직접 녹화한 프레임
    #[default]
    Native,
    /// 외부 기록(다른 앱의 히스토리)에서 가져온 프레임
    Imported,
}

impl fmt::Display for FrameSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Native => write!(f, "native"),
            Self::Imported => write!(f, "imported"),
        }
    }
}

/// 프레임 이미지 조회 키: (비디오/세그먼트 ID, 프레임 인덱스, 출처)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameRef {
    /// 비디오(세그먼트) ID
    pub video_id: i64,
    /// 비디오 내 프레임 인덱스
    pub frame_index: u32,
    /// 데이터 출처
    #[serde(default)]
    pub source: FrameSource,
}

impl fmt::Display for FrameRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}#{}", self.source, self.video_id, self.frame_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_ref_display() {
        let r = FrameRef {
            video_id: 12,
            frame_index: 340,
            source: FrameSource::Imported,
        };
        assert_eq!(r.to_string(), "imported:12#340");
    }

    #[test]
    fn source_defaults_to_native() {
        let r: FrameRef = serde_json::from_str(r#"{"video_id":1,"frame_index":2}"#).unwrap();
        assert_eq!(r.source, FrameSource::Native);
    }
}
