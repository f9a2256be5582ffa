//! 프레임 저장소 포트.
//!
//! 검색 결과 썸네일 생성에 필요한 원본 프레임 이미지와 OCR 노드를 조회한다.
//! 두 조회 모두 비동기이며 실패할 수 있다.

use async_trait::async_trait;

use crate::error::CoreError;
use crate::models::frame::{FrameRef, FrameSource};
use crate::models::ocr::OcrNode;

/// 프레임 이미지/OCR 노드 조회 포트
#[async_trait]
pub trait FrameRepository: Send + Sync {
    /// 프레임 원본 이미지 바이트 조회 (PNG, JPEG 등 인코딩된 상태)
    async fn fetch_frame_image(&self, frame: &FrameRef) -> Result<Vec<u8>, CoreError>;

    /// 프레임에서 인식된 OCR 노드 목록 조회
    async fn fetch_ocr_nodes(
        &self,
        frame_id: i64,
        source: FrameSource,
    ) -> Result<Vec<OcrNode>, CoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    struct EmptyRepository;

    #[async_trait]
    impl FrameRepository for EmptyRepository {
        async fn fetch_frame_image(&self, frame: &FrameRef) -> Result<Vec<u8>, CoreError> {
            Err(CoreError::NotFound {
                resource_type: "Frame".to_string(),
                id: frame.to_string(),
            })
        }

        async fn fetch_ocr_nodes(
            &self,
            _frame_id: i64,
            _source: FrameSource,
        ) -> Result<Vec<OcrNode>, CoreError> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn trait_object_dispatch() {
        let repo: Arc<dyn FrameRepository> = Arc::new(EmptyRepository);
        let frame = FrameRef {
            video_id: 1,
            frame_index: 0,
            source: FrameSource::Native,
        };
        let err = repo.fetch_frame_image(&frame).await.unwrap_err();
        assert!(matches!(err, CoreError::NotFound { .. }));
        assert!(repo
            .fetch_ocr_nodes(1, FrameSource::Native)
            .await
            .unwrap()
            .is_empty());
    }
}
