//! # retrace-app
//!
//! Retrace 썸네일 CLI 바이너리 진입점.
//! 설정 로드, 로깅 초기화, 파일 저장소 → 검색 세션 와이어링.

mod commands;
mod file_repository;

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use directories::ProjectDirs;
use retrace_core::config::{AppConfig, ThumbnailFormat};
use retrace_core::config_manager::{ConfigManager, CONFIG_FILE_NAME};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Retrace 검색 썸네일 도구
///
/// 캡처 프레임과 OCR 결과로 검색어 하이라이트 썸네일을 만든다
#[derive(Parser, Debug)]
#[command(name = "retrace")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, short = 'l', default_value = "info", global = true)]
    log_level: String,

    /// 설정 파일 경로 (기본: 플랫폼별 설정 디렉토리)
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// 프레임 이미지 + OCR 노드 → 검색 썸네일 파일
    Thumbnail {
        /// 프레임 이미지 파일 (PNG, JPEG 등)
        #[arg(long)]
        image: PathBuf,
        /// OCR 노드 JSON 파일 (없으면 전체 프레임 썸네일)
        #[arg(long)]
        ocr: Option<PathBuf>,
        /// 검색어
        #[arg(long, short = 'q')]
        query: String,
        /// 출력 파일
        #[arg(long, short = 'o')]
        out: PathBuf,
        /// 출력 너비 (설정값 덮어쓰기)
        #[arg(long)]
        width: Option<u32>,
        /// 출력 높이 (설정값 덮어쓰기)
        #[arg(long)]
        height: Option<u32>,
        /// 줌 배율 (설정값 덮어쓰기)
        #[arg(long)]
        zoom: Option<f64>,
        /// 출력 포맷 (설정값 덮어쓰기)
        #[arg(long, value_enum)]
        format: Option<FormatArg>,
    },
    /// 검색어에 매칭되는 OCR 노드 출력 (JSON)
    Match {
        /// OCR 노드 JSON 파일
        #[arg(long)]
        ocr: PathBuf,
        /// 검색어
        #[arg(long, short = 'q')]
        query: String,
    },
    /// 적용 중인 설정 출력 (JSON)
    Config,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    Png,
    Jpeg,
    Webp,
}

impl From<FormatArg> for ThumbnailFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Png => ThumbnailFormat::Png,
            FormatArg::Jpeg => ThumbnailFormat::Jpeg,
            FormatArg::Webp => ThumbnailFormat::WebP,
        }
    }
}

/// 설정 파일 경로 결정 (CLI 인자 또는 플랫폼별 기본 경로)
///
/// # 플랫폼별 기본 경로:
/// - macOS: `~/Library/Application Support/app.retrace.retrace/config.json`
/// - Windows: `%APPDATA%\retrace\retrace\config\config.json`
/// - Linux: `~/.config/retrace/config.json`
fn resolve_config_path(explicit: Option<&Path>) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .or_else(|| {
            ProjectDirs::from("app", "retrace", "retrace")
                .map(|p| p.config_dir().join(CONFIG_FILE_NAME))
        })
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME))
}

/// 설정 로드. 실패하면 기본 설정으로 계속 진행.
fn load_config(path: PathBuf) -> AppConfig {
    match ConfigManager::with_path(path) {
        Ok(manager) => {
            info!("설정 파일: {:?}", manager.config_path());
            manager.get()
        }
        Err(e) => {
            warn!("설정 로드 실패, 기본 설정 사용: {e}");
            AppConfig::default_config()
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_filter = format!(
        "retrace={},retrace_app={},retrace_core={},retrace_vision={}",
        args.log_level, args.log_level, args.log_level, args.log_level
    );
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(resolve_config_path(args.config.as_deref()));

    match args.command {
        Command::Thumbnail {
            image,
            ocr,
            query,
            out,
            width,
            height,
            zoom,
            format,
        } => {
            let overrides = commands::ThumbnailOverrides {
                width,
                height,
                zoom_factor: zoom,
                format: format.map(ThumbnailFormat::from),
            };
            let request = commands::ThumbnailRequest {
                image,
                ocr,
                query,
                out,
            };
            let summary = commands::run_thumbnail(&config, &overrides, &request).await?;
            println!("{}", serde_json::to_string(&summary)?);
        }
        Command::Match { ocr, query } => {
            let report = commands::run_match(&ocr, &query).await?;
            println!("{}", serde_json::to_string(&report)?);
        }
        Command::Config => {
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }

    Ok(())
}
