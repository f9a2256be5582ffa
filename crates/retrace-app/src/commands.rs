//! CLI 서브커맨드 실행.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use retrace_core::config::{AppConfig, ThumbnailFormat};
use retrace_core::models::frame::{FrameRef, FrameSource};
use retrace_core::models::ocr::OcrNode;
use retrace_core::models::search::SearchResultRef;
use retrace_vision::encoder::encode_thumbnail;
use retrace_vision::loader::SearchSession;
use retrace_vision::matcher::{find_match_with_pass, MatchPass};
use retrace_vision::thumbnail::ThumbnailKind;
use serde::Serialize;
use tracing::info;

use crate::file_repository::{load_ocr_nodes, FileFrameRepository, FrameFiles};

/// CLI 프레임 한 장에 부여하는 ID
const CLI_FRAME_ID: i64 = 1;

/// 설정값 덮어쓰기
#[derive(Debug, Default, Clone)]
pub struct ThumbnailOverrides {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub zoom_factor: Option<f64>,
    pub format: Option<ThumbnailFormat>,
}

impl ThumbnailOverrides {
    /// 덮어쓴 뒤 유효성 검증
    pub fn apply(&self, config: &AppConfig) -> Result<AppConfig> {
        let mut config = config.clone();
        if let Some(width) = self.width {
            config.thumbnail.width = width;
        }
        if let Some(height) = self.height {
            config.thumbnail.height = height;
        }
        if let Some(zoom) = self.zoom_factor {
            config.thumbnail.zoom_factor = zoom;
        }
        if let Some(format) = self.format {
            config.thumbnail.format = format;
        }
        config.validate().context("잘못된 썸네일 옵션")?;
        Ok(config)
    }
}

#[derive(Debug, Clone)]
pub struct ThumbnailRequest {
    pub image: PathBuf,
    pub ocr: Option<PathBuf>,
    pub query: String,
    pub out: PathBuf,
}

/// `thumbnail` 실행 결과 요약
#[derive(Debug, Serialize)]
pub struct ThumbnailSummary {
    pub kind: ThumbnailKind,
    pub matched: Option<OcrNode>,
    pub width: u32,
    pub height: u32,
    pub bytes: usize,
    pub out: PathBuf,
}

/// `match` 실행 결과
#[derive(Debug, Serialize, PartialEq)]
pub struct MatchReport {
    pub pass: MatchPass,
    pub node: OcrNode,
}

/// 검색 세션을 거쳐 썸네일을 만들고 파일로 저장
pub async fn run_thumbnail(
    config: &AppConfig,
    overrides: &ThumbnailOverrides,
    request: &ThumbnailRequest,
) -> Result<ThumbnailSummary> {
    let config = overrides.apply(config)?;

    let frame = FrameRef {
        video_id: 0,
        frame_index: 0,
        source: FrameSource::Native,
    };
    let mut repository = FileFrameRepository::new();
    repository.insert(
        CLI_FRAME_ID,
        frame,
        FrameFiles {
            image: request.image.clone(),
            ocr: request.ocr.clone(),
        },
    );

    let session = SearchSession::new(Arc::new(repository), &config);
    session.submit(&request.query);

    let result = SearchResultRef {
        frame_id: CLI_FRAME_ID,
        timestamp: Utc::now(),
        frame,
    };
    let outcome = session
        .request(result.clone())
        .await
        .context("썸네일 작업 실행 실패")??;
    info!("썸네일 로딩 결과: {:?}", outcome);

    let thumbnail = session
        .thumbnail(&result)
        .ok_or_else(|| anyhow!("썸네일이 캐시에 없음 ({outcome:?})"))?;

    let bytes = encode_thumbnail(
        &thumbnail.image,
        config.thumbnail.format,
        config.thumbnail.quality,
    )?;
    tokio::fs::write(&request.out, &bytes)
        .await
        .with_context(|| format!("썸네일 저장 실패: {}", request.out.display()))?;
    session.end();

    Ok(ThumbnailSummary {
        kind: thumbnail.kind,
        matched: thumbnail.matched.clone(),
        width: thumbnail.image.width(),
        height: thumbnail.image.height(),
        bytes: bytes.len(),
        out: request.out.clone(),
    })
}

/// OCR 노드 파일에서 검색어 매칭 노드 찾기
pub async fn run_match(ocr: &Path, query: &str) -> Result<Option<MatchReport>> {
    let nodes = load_ocr_nodes(ocr)
        .await
        .with_context(|| format!("OCR 파일 로드 실패: {}", ocr.display()))?;
    Ok(
        find_match_with_pass(query, &nodes).map(|(node, pass)| MatchReport {
            pass,
            node: node.clone(),
        }),
    )
}
