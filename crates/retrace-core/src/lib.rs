//! # retrace-core
//!
//! 검색 썸네일 파이프라인의 공유 타입.
//! OCR 노드/프레임 참조 모델, 프레임 저장소 포트, 에러, 설정을 담는다.
//!
//! - [`models`]: OCR 노드, 프레임 참조, 검색 결과와 썸네일 캐시 키
//! - [`ports`]: 프레임 이미지/OCR 조회 포트 (async_trait)
//! - [`error`]: `CoreError` (thiserror)
//! - [`config`] / [`config_manager`]: 썸네일·캐시 설정과 JSON 파일 관리

pub mod config;
pub mod config_manager;
pub mod error;
pub mod models;
pub mod ports;
