//! 검색 결과 및 썸네일 캐시 키 모델.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::frame::FrameRef;

/// 화면에 표시되는 검색 결과 한 건의 식별 정보
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SearchResultRef {
    /// 매칭된 프레임 ID (OCR 노드 조회 키)
    pub frame_id: i64,
    /// 프레임 캡처 시각
    pub timestamp: DateTime<Utc>,
    /// 프레임 이미지 조회 키
    pub frame: FrameRef,
}

/// 썸네일 캐시 키.
///
/// 입력 중인 쿼리가 아니라 마지막으로 제출된(committed) 쿼리를 포함하므로,
/// 사용자가 새 검색어를 타이핑하는 동안에는 썸네일이 다시 생성되지 않는다.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ThumbnailKey {
    pub frame_id: i64,
    pub timestamp: DateTime<Utc>,
    pub committed_query: String,
}

impl ThumbnailKey {
    /// 검색 결과 + 제출된 쿼리로 키 생성
    pub fn new(result: &SearchResultRef, committed_query: &str) -> Self {
        Self {
            frame_id: result.frame_id,
            timestamp: result.timestamp,
            committed_query: committed_query.to_string(),
        }
    }
}
