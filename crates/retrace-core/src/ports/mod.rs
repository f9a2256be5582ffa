//! 포트 인터페이스 (trait).
//!
//! Hexagonal Architecture의 포트 레이어.
//! 프레임 저장소 어댑터가 이 trait를 구현하며,
//! 썸네일 로더는 `Arc<dyn T>`로 주입받는다.
//!
//! 모든 async trait은 `async_trait` 매크로를 사용하여
//! object safety를 보장한다.

pub mod frame_repository;
