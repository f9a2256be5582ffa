//! 설정 파일 관리.
//!
//! `AppConfig`를 JSON 파일 하나로 보관한다. 기본 경로 결정은 바이너리 쪽 책임이다.
//! 파일 쓰기는 같은 디렉토리의 임시 파일에 먼저 쓴 뒤 이름을 바꿔 교체한다.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info};

use crate::config::{AppConfig, ThumbnailConfig};
use crate::error::CoreError;

/// 설정 파일 이름
pub const CONFIG_FILE_NAME: &str = "config.json";

/// 설정 관리자.
///
/// 검증을 통과한 설정만 메모리와 파일에 반영된다.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    current: Arc<RwLock<AppConfig>>,
    path: PathBuf,
}

impl ConfigManager {
    /// 지정 경로의 설정을 연다. 파일이 없으면 기본 설정으로 만든다.
    pub fn with_path(path: PathBuf) -> Result<Self, CoreError> {
        ensure_parent_dir(&path)?;

        let config = if path.exists() {
            read_config(&path)?
        } else {
            let defaults = AppConfig::default_config();
            write_config(&path, &defaults)?;
            info!("기본 설정 파일 생성: {}", path.display());
            defaults
        };

        Ok(Self {
            current: Arc::new(RwLock::new(config)),
            path,
        })
    }

    /// 현재 설정 (복제본)
    pub fn get(&self) -> AppConfig {
        self.current.read().clone()
    }

    /// 썸네일 설정만 복제
    pub fn thumbnail(&self) -> ThumbnailConfig {
        self.current.read().thumbnail.clone()
    }

    /// 설정 교체. 검증 → 파일 저장 → 메모리 반영 순.
    pub fn update(&self, config: AppConfig) -> Result<(), CoreError> {
        config.validate()?;
        let mut current = self.current.write();
        write_config(&self.path, &config)?;
        *current = config;
        debug!("설정 저장: {}", self.path.display());
        Ok(())
    }

    /// 현재 설정을 고쳐서 저장
    pub fn update_with<F>(&self, edit: F) -> Result<AppConfig, CoreError>
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut config = self.get();
        edit(&mut config);
        self.update(config.clone())?;
        Ok(config)
    }

    pub fn config_path(&self) -> &Path {
        &self.path
    }

    /// 파일에서 다시 읽기. 실패하면 기존 설정 유지.
    pub fn reload(&self) -> Result<(), CoreError> {
        let config = read_config(&self.path)?;
        *self.current.write() = config;
        info!("설정 다시 로드: {}", self.path.display());
        Ok(())
    }
}

fn ensure_parent_dir(path: &Path) -> Result<(), CoreError> {
    let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) else {
        return Ok(());
    };
    if parent.exists() {
        return Ok(());
    }
    fs::create_dir_all(parent).map_err(|e| {
        CoreError::Config(format!("설정 디렉토리 생성 실패: {}: {e}", parent.display()))
    })?;
    info!("설정 디렉토리 생성: {}", parent.display());
    Ok(())
}

/// 읽기 + 파싱 + 검증
fn read_config(path: &Path) -> Result<AppConfig, CoreError> {
    let raw = fs::read_to_string(path)
        .map_err(|e| CoreError::Config(format!("설정 파일 읽기 실패: {}: {e}", path.display())))?;
    let config: AppConfig = serde_json::from_str(&raw)
        .map_err(|e| CoreError::Config(format!("설정 파일 파싱 실패: {}: {e}", path.display())))?;
    config.validate()?;
    debug!("설정 파일 로드: {}", path.display());
    Ok(config)
}

/// 임시 파일에 쓴 뒤 rename으로 교체
fn write_config(path: &Path, config: &AppConfig) -> Result<(), CoreError> {
    let json = serde_json::to_string_pretty(config)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json)
        .and_then(|()| fs::rename(&tmp, path))
        .map_err(|e| CoreError::Config(format!("설정 파일 저장 실패: {}: {e}", path.display())))
}
