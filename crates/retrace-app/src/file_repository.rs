//! 로컬 파일 기반 프레임 저장소 어댑터.
//!
//! 프레임 이미지 파일과 OCR 노드 JSON 파일(`[{"text", "x", "y", "width", "height"}]`)을
//! 프레임 ID에 등록해 두고 `FrameRepository` 포트로 제공한다.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use retrace_core::error::CoreError;
use retrace_core::models::frame::{FrameRef, FrameSource};
use retrace_core::models::ocr::OcrNode;
use retrace_core::ports::frame_repository::FrameRepository;
use tracing::debug;

/// 프레임 한 장의 파일 경로
#[derive(Debug, Clone)]
pub struct FrameFiles {
    pub image: PathBuf,
    /// 없으면 OCR 노드 0개로 취급
    pub ocr: Option<PathBuf>,
}

struct Entry {
    frame: FrameRef,
    files: FrameFiles,
}

/// 파일 기반 `FrameRepository`
#[derive(Default)]
pub struct FileFrameRepository {
    frames: HashMap<i64, Entry>,
}

impl FileFrameRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// 프레임 등록 (같은 ID는 덮어씀)
    pub fn insert(&mut self, frame_id: i64, frame: FrameRef, files: FrameFiles) {
        self.frames.insert(frame_id, Entry { frame, files });
    }

    fn entry_for_frame(&self, frame: &FrameRef) -> Option<&Entry> {
        self.frames.values().find(|e| e.frame == *frame)
    }
}

/// OCR 노드 JSON 파일 읽기
pub async fn load_ocr_nodes(path: &Path) -> Result<Vec<OcrNode>, CoreError> {
    let content = tokio::fs::read_to_string(path).await?;
    let nodes: Vec<OcrNode> = serde_json::from_str(&content)?;
    debug!("OCR 노드 로드: {} ({}개)", path.display(), nodes.len());
    Ok(nodes)
}

#[async_trait]
impl FrameRepository for FileFrameRepository {
    async fn fetch_frame_image(&self, frame: &FrameRef) -> Result<Vec<u8>, CoreError> {
        let entry = self
            .entry_for_frame(frame)
            .ok_or_else(|| CoreError::NotFound {
                resource_type: "Frame".to_string(),
                id: frame.to_string(),
            })?;
        Ok(tokio::fs::read(&entry.files.image).await?)
    }

    async fn fetch_ocr_nodes(
        &self,
        frame_id: i64,
        source: FrameSource,
    ) -> Result<Vec<OcrNode>, CoreError> {
        let entry = self
            .frames
            .get(&frame_id)
            .filter(|e| e.frame.source == source)
            .ok_or_else(|| CoreError::NotFound {
                resource_type: "Frame".to_string(),
                id: frame_id.to_string(),
            })?;
        match &entry.files.ocr {
            Some(path) => load_ocr_nodes(path).await,
            None => Ok(Vec::new()),
        }
    }
}
