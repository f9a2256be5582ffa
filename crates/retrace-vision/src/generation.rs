//! 검색 세대(generation) 카운터.
//!
//! 검색어가 새로 확정될 때마다 세대가 증가한다. 비동기 썸네일 작업은
//! 시작 시점의 [`GenerationToken`]을 들고 있다가, 완료 시 토큰이 여전히
//! 현재 세대인지 확인하고 아니면 결과를 버린다.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// 특정 세대를 가리키는 토큰
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GenerationToken(u64);

impl GenerationToken {
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for GenerationToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "gen#{}", self.0)
    }
}

/// 공유 세대 카운터 (복제 시 같은 카운터를 가리킴)
#[derive(Debug, Clone, Default)]
pub struct SearchGeneration {
    current: Arc<AtomicU64>,
}

impl SearchGeneration {
    pub fn new() -> Self {
        Self::default()
    }

    /// 세대 증가 후 새 토큰 반환
    pub fn advance(&self) -> GenerationToken {
        GenerationToken(self.current.fetch_add(1, Ordering::AcqRel) + 1)
    }

    /// 현재 세대 토큰
    pub fn current(&self) -> GenerationToken {
        GenerationToken(self.current.load(Ordering::Acquire))
    }

    /// 토큰이 현재 세대인지
    pub fn is_current(&self, token: GenerationToken) -> bool {
        self.current() == token
    }
}
