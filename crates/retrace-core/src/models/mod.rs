//! Retrace 도메인 모델.
//!
//! 검색 오버레이와 썸네일 파이프라인이 공유하는 데이터 구조체를 정의한다.
//! 외부 입출력에 쓰이는 모델은 `serde` Serialize/Deserialize를 구현한다.

pub mod frame;
pub mod ocr;
pub mod search;
