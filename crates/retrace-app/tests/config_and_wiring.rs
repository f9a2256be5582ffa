//! 설정 및 와이어링 통합 테스트.
//!
//! ConfigManager → AppConfig → 검색 세션/캐시 생성 검증.

use std::sync::Arc;

use async_trait::async_trait;
use retrace_core::config::{AppConfig, ThumbnailFormat};
use retrace_core::config_manager::ConfigManager;
use retrace_core::error::CoreError;
use retrace_core::models::frame::{FrameRef, FrameSource};
use retrace_core::models::ocr::OcrNode;
use retrace_core::ports::frame_repository::FrameRepository;
use retrace_vision::cache::ThumbnailCache;
use retrace_vision::loader::SearchSession;
use tempfile::TempDir;

struct NullRepository;

#[async_trait]
impl FrameRepository for NullRepository {
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

#[test]
fn config_defaults_are_valid() {
    let config = AppConfig::default_config();
    assert!(config.validate().is_ok());

    // 썸네일 설정
    assert!(config.thumbnail.width > 0);
    assert!(config.thumbnail.height > 0);
    assert!(config.thumbnail.zoom_factor > 1.0);
    assert!(config.thumbnail.line_width > 0.0);

    // 캐시 설정
    assert!(config.cache.capacity > 0);
    assert!(config.cache.event_capacity > 0);
}

#[test]
fn config_serde_roundtrip() {
    let config = AppConfig::default_config();
    let json = serde_json::to_string(&config).unwrap();
    let deserialized: AppConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(config, deserialized);
}

#[test]
fn config_manager_persists_updates() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");

    let manager = ConfigManager::with_path(path.clone()).unwrap();
    manager
        .update_with(|c| {
            c.thumbnail.width = 320;
            c.thumbnail.format = ThumbnailFormat::WebP;
            c.cache.capacity = 50;
        })
        .unwrap();

    // 새 관리자로 다시 읽어도 유지
    let reopened = ConfigManager::with_path(path).unwrap();
    let config = reopened.get();
    assert_eq!(config.thumbnail.width, 320);
    assert_eq!(config.thumbnail.format, ThumbnailFormat::WebP);
    assert_eq!(config.cache.capacity, 50);
}

#[test]
fn invalid_update_is_rejected_and_not_saved() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    let manager = ConfigManager::with_path(path.clone()).unwrap();

    let result = manager.update_with(|c| c.thumbnail.zoom_factor = 0.0);
    assert!(result.is_err());
    assert_eq!(manager.get(), AppConfig::default_config());
    assert_eq!(
        ConfigManager::with_path(path).unwrap().get(),
        AppConfig::default_config()
    );
}

#[tokio::test]
async fn session_wires_from_config() {
    let mut config = AppConfig::default_config();
    config.cache.capacity = 3;

    let session = SearchSession::new(Arc::new(NullRepository), &config);
    assert_eq!(session.loader().cache().stats().capacity, 3);
    assert_eq!(session.committed_query(), "");

    let first = session.submit("hello");
    let second = session.submit("world");
    assert!(second > first);
    assert_eq!(session.committed_query(), "world");
}

#[test]
fn standalone_cache_defaults() {
    let cache = ThumbnailCache::default();
    assert_eq!(
        cache.stats().capacity,
        AppConfig::default_config().cache.capacity
    );
    assert!(cache.is_empty());
}
