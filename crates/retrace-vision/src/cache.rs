//! 검색 세션 썸네일 캐시.
//!
//! 전역 캐시가 아니라 검색 세션이 소유하는 명시적 객체다.
//! 키에 제출된 검색어가 포함되므로 검색어가 바뀌면 이전 항목은 쓸모가 없고,
//! [`ThumbnailCache::start_generation`]에서 세대 증가와 함께 제거된다.
//!
//! 세대 증가와 커밋 시 세대 확인은 같은 락 안에서 일어난다. 그래서 이전 세대의
//! 작업이 새 검색어 제출 직후에 결과를 써넣는 일은 생기지 않는다.

use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;
use parking_lot::Mutex;
use retrace_core::models::search::ThumbnailKey;
use tracing::debug;

use crate::generation::{GenerationToken, SearchGeneration};
use crate::thumbnail::Thumbnail;

struct CacheInner {
    entries: LruCache<ThumbnailKey, Arc<Thumbnail>>,
    /// 생성 중인 키 → 작업을 시작한 세대
    loading: HashMap<ThumbnailKey, GenerationToken>,
}

/// LRU 썸네일 캐시 + 진행 중 작업 추적
pub struct ThumbnailCache {
    inner: Mutex<CacheInner>,
    capacity: usize,
}

/// 캐시 통계
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub size: usize,
    pub capacity: usize,
    pub loading: usize,
}

impl ThumbnailCache {
    /// 용량 0은 1로 보정
    pub fn new(capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: Mutex::new(CacheInner {
                entries: LruCache::new(cap),
                loading: HashMap::new(),
            }),
            capacity: cap.get(),
        }
    }

    /// 조회 (LRU 순서 갱신)
    pub fn get(&self, key: &ThumbnailKey) -> Option<Arc<Thumbnail>> {
        self.inner.lock().entries.get(key).cloned()
    }

    /// 존재 여부 (LRU 순서 유지)
    pub fn contains(&self, key: &ThumbnailKey) -> bool {
        self.inner.lock().entries.contains(key)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        let inner = self.inner.lock();
        CacheStats {
            size: inner.entries.len(),
            capacity: self.capacity,
            loading: inner.loading.len(),
        }
    }

    /// 모든 항목과 진행 중 표시 제거
    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        inner.entries.clear();
        inner.loading.clear();
    }

    /// 생성 시작 표시.
    ///
    /// 같은 세대에서 이미 생성 중이면 false. 이전 세대의 작업은 어차피 커밋되지 않으므로
    /// 새 세대가 덮어쓰고 true를 반환한다.
    pub fn begin_loading(&self, key: &ThumbnailKey, token: GenerationToken) -> bool {
        let mut inner = self.inner.lock();
        if inner.loading.get(key) == Some(&token) {
            return false;
        }
        inner.loading.insert(key.clone(), token);
        true
    }

    /// 생성 종료 표시 (같은 세대가 표시한 경우에만 제거)
    pub fn finish_loading(&self, key: &ThumbnailKey, token: GenerationToken) {
        let mut inner = self.inner.lock();
        if inner.loading.get(key) == Some(&token) {
            inner.loading.remove(key);
        }
    }

    pub fn is_loading(&self, key: &ThumbnailKey) -> bool {
        self.inner.lock().loading.contains_key(key)
    }

    /// 새 검색어 제출: 세대를 증가시키고 다른 검색어의 항목을 제거한다.
    pub fn start_generation(
        &self,
        generation: &SearchGeneration,
        committed_query: &str,
    ) -> GenerationToken {
        let mut inner = self.inner.lock();
        let token = generation.advance();

        let stale: Vec<ThumbnailKey> = inner
            .entries
            .iter()
            .filter(|(key, _)| key.committed_query != committed_query)
            .map(|(key, _)| key.clone())
            .collect();
        for key in &stale {
            inner.entries.pop(key);
        }
        inner
            .loading
            .retain(|key, _| key.committed_query == committed_query);

        debug!(
            %token,
            evicted = stale.len(),
            remaining = inner.entries.len(),
            "검색 세대 시작"
        );
        token
    }

    /// 토큰이 현재 세대일 때만 저장. 오래된 결과는 버리고 false 반환.
    pub fn commit(
        &self,
        key: ThumbnailKey,
        thumbnail: Arc<Thumbnail>,
        generation: &SearchGeneration,
        token: GenerationToken,
    ) -> bool {
        let mut inner = self.inner.lock();
        if !generation.is_current(token) {
            debug!(%token, current = %generation.current(), "오래된 세대 결과 폐기");
            return false;
        }
        inner.entries.put(key, thumbnail);
        true
    }
}

impl Default for ThumbnailCache {
    fn default() -> Self {
        Self::new(200)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::thumbnail::ThumbnailKind;
    use chrono::{TimeZone, Utc};
    use image::RgbaImage;

    fn key(frame_id: i64, query: &str) -> ThumbnailKey {
        ThumbnailKey {
            frame_id,
            timestamp: Utc.timestamp_opt(1_700_000_000 + frame_id, 0).unwrap(),
            committed_query: query.to_string(),
        }
    }

    fn thumb() -> Arc<Thumbnail> {
        Arc::new(Thumbnail {
            image: RgbaImage::new(4, 4),
            kind: ThumbnailKind::FullFrame,
            matched: None,
        })
    }

    #[test]
    fn commit_with_current_token_stores() {
        let cache = ThumbnailCache::new(10);
        let generation = SearchGeneration::new();
        let token = cache.start_generation(&generation, "invoice");

        assert!(cache.commit(key(1, "invoice"), thumb(), &generation, token));
        assert!(cache.contains(&key(1, "invoice")));
        assert!(cache.get(&key(1, "invoice")).is_some());
    }

    #[test]
    fn commit_with_stale_token_is_rejected() {
        let cache = ThumbnailCache::new(10);
        let generation = SearchGeneration::new();
        let old = cache.start_generation(&generation, "invoice");
        let _new = cache.start_generation(&generation, "receipt");

        assert!(!cache.commit(key(1, "invoice"), thumb(), &generation, old));
        assert!(cache.is_empty());
    }

    #[test]
    fn new_generation_evicts_other_queries() {
        let cache = ThumbnailCache::new(10);
        let generation = SearchGeneration::new();
        let token = cache.start_generation(&generation, "invoice");
        cache.commit(key(1, "invoice"), thumb(), &generation, token);
        cache.commit(key(2, "invoice"), thumb(), &generation, token);

        cache.start_generation(&generation, "receipt");
        assert!(cache.is_empty());
    }

    #[test]
    fn resubmitting_same_query_keeps_entries() {
        let cache = ThumbnailCache::new(10);
        let generation = SearchGeneration::new();
        let token = cache.start_generation(&generation, "invoice");
        cache.commit(key(1, "invoice"), thumb(), &generation, token);

        cache.start_generation(&generation, "invoice");
        assert!(cache.contains(&key(1, "invoice")));
    }

    #[test]
    fn lru_capacity_is_bounded() {
        let cache = ThumbnailCache::new(2);
        let generation = SearchGeneration::new();
        let token = cache.start_generation(&generation, "q");
        for id in 0..5 {
            cache.commit(key(id, "q"), thumb(), &generation, token);
        }
        assert_eq!(cache.len(), 2);
        assert!(cache.contains(&key(4, "q")));
        assert!(!cache.contains(&key(0, "q")));
    }

    #[test]
    fn loading_dedup_per_generation() {
        let cache = ThumbnailCache::new(10);
        let generation = SearchGeneration::new();
        let first = generation.advance();
        let k = key(1, "q");

        assert!(cache.begin_loading(&k, first));
        assert!(!cache.begin_loading(&k, first));

        // 새 세대는 이전 세대의 진행 중 표시를 넘겨받음
        let second = generation.advance();
        assert!(cache.begin_loading(&k, second));
        // 이전 세대의 종료 표시는 새 세대 표시를 지우지 않음
        cache.finish_loading(&k, first);
        assert!(cache.is_loading(&k));
        cache.finish_loading(&k, second);
        assert!(!cache.is_loading(&k));
    }

    #[test]
    fn zero_capacity_is_clamped() {
        let cache = ThumbnailCache::new(0);
        assert_eq!(cache.stats().capacity, 1);
    }

    #[test]
    fn clear_removes_everything() {
        let cache = ThumbnailCache::new(10);
        let generation = SearchGeneration::new();
        let token = cache.start_generation(&generation, "q");
        cache.commit(key(1, "q"), thumb(), &generation, token);
        cache.begin_loading(&key(2, "q"), token);

        cache.clear();
        assert_eq!(
            cache.stats(),
            CacheStats {
                size: 0,
                capacity: 10,
                loading: 0
            }
        );
    }
}
