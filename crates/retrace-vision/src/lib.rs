//! # retrace-vision
//!
//! 검색 결과 썸네일 크레이트.
//! OCR 노드 매칭, 매칭 영역 줌 크롭, 하이라이트 렌더링, 인코딩,
//! 그리고 검색 세대에 묶인 세션 캐시와 비동기 로더를 담당한다.

pub mod cache;
pub mod crop;
pub mod encoder;
pub mod generation;
pub mod geometry;
pub mod loader;
pub mod matcher;
pub mod raster;
pub mod thumbnail;
