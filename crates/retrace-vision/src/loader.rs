//! 비동기 썸네일 로딩 + 검색 세션.
//!
//! [`ThumbnailLoader`]는 검색 결과 한 건의 썸네일을 만든다. 프레임 이미지와 OCR 노드를
//! 동시에 가져온 뒤 렌더링은 블로킹 스레드에서 수행하고, 세대 토큰이 여전히 유효할 때만
//! 캐시에 커밋한다. 커밋되면 [`ThumbnailEvent::Ready`]가 브로드캐스트된다.
//!
//! [`SearchSession`]은 캐시, 세대 카운터, 제출된 검색어를 묶어 소유한다.

use std::sync::Arc;

use futures::future::join_all;
use parking_lot::RwLock;
use retrace_core::config::{AppConfig, ThumbnailConfig};
use retrace_core::error::CoreError;
use retrace_core::models::search::{SearchResultRef, ThumbnailKey};
use retrace_core::ports::frame_repository::FrameRepository;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::cache::ThumbnailCache;
use crate::generation::{GenerationToken, SearchGeneration};
use crate::thumbnail::{generate_search_thumbnail, placeholder, Thumbnail};

/// 썸네일 완료 이벤트
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThumbnailEvent {
    /// 캐시에 새 썸네일이 커밋됨
    Ready(ThumbnailKey),
}

/// 로딩 요청 결과
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// 이미 캐시에 있음
    Cached,
    /// 같은 세대에서 이미 생성 중
    InFlight,
    /// 생성 후 캐시에 저장됨
    Committed,
    /// 생성했지만 세대가 바뀌어 폐기됨
    Stale,
}

/// 검색 결과 썸네일 로더
#[derive(Clone)]
pub struct ThumbnailLoader {
    repository: Arc<dyn FrameRepository>,
    cache: Arc<ThumbnailCache>,
    generation: SearchGeneration,
    config: ThumbnailConfig,
    events: broadcast::Sender<ThumbnailEvent>,
}

impl ThumbnailLoader {
    pub fn new(
        repository: Arc<dyn FrameRepository>,
        cache: Arc<ThumbnailCache>,
        generation: SearchGeneration,
        config: ThumbnailConfig,
        event_capacity: usize,
    ) -> Self {
        let (events, _) = broadcast::channel(event_capacity.max(1));
        Self {
            repository,
            cache,
            generation,
            config,
            events,
        }
    }

    /// 완료 이벤트 구독
    pub fn subscribe(&self) -> broadcast::Receiver<ThumbnailEvent> {
        self.events.subscribe()
    }

    pub fn cache(&self) -> &Arc<ThumbnailCache> {
        &self.cache
    }

    pub fn generation(&self) -> &SearchGeneration {
        &self.generation
    }

    /// 검색 결과 한 건의 썸네일 로딩.
    ///
    /// 프레임/OCR 조회 실패는 플레이스홀더 또는 전체 프레임으로 흡수된다.
    /// 에러는 렌더링 태스크가 비정상 종료된 경우에만 반환.
    pub async fn load(
        &self,
        result: &SearchResultRef,
        committed_query: &str,
        token: GenerationToken,
    ) -> Result<LoadOutcome, CoreError> {
        let key = ThumbnailKey::new(result, committed_query);

        if self.cache.contains(&key) {
            return Ok(LoadOutcome::Cached);
        }
        if !self.cache.begin_loading(&key, token) {
            return Ok(LoadOutcome::InFlight);
        }
        if !self.generation.is_current(token) {
            self.cache.finish_loading(&key, token);
            return Ok(LoadOutcome::Stale);
        }

        let outcome = self.render_and_commit(result, key.clone(), token).await;
        self.cache.finish_loading(&key, token);
        outcome
    }

    async fn render_and_commit(
        &self,
        result: &SearchResultRef,
        key: ThumbnailKey,
        token: GenerationToken,
    ) -> Result<LoadOutcome, CoreError> {
        let (image, nodes) = tokio::join!(
            self.repository.fetch_frame_image(&result.frame),
            self.repository
                .fetch_ocr_nodes(result.frame_id, result.frame.source),
        );

        let image = match image {
            Ok(bytes) => Some(bytes),
            Err(e) => {
                warn!(frame = %result.frame, "프레임 이미지 조회 실패, 플레이스홀더 사용: {e}");
                None
            }
        };
        let nodes = nodes.unwrap_or_else(|e| {
            warn!(frame_id = result.frame_id, "OCR 노드 조회 실패, 전체 프레임 사용: {e}");
            Vec::new()
        });

        let config = self.config.clone();
        let query = key.committed_query.clone();
        let thumbnail = tokio::task::spawn_blocking(move || match image {
            Some(bytes) => generate_search_thumbnail(&bytes, &nodes, &query, &config),
            None => placeholder(&config),
        })
        .await
        .map_err(|e| CoreError::Internal(format!("썸네일 렌더링 태스크 실패: {e}")))?;

        debug!(
            frame_id = key.frame_id,
            kind = ?thumbnail.kind,
            %token,
            "썸네일 렌더링 완료"
        );

        if self
            .cache
            .commit(key.clone(), Arc::new(thumbnail), &self.generation, token)
        {
            // 구독자가 없으면 send 실패는 무시
            let _ = self.events.send(ThumbnailEvent::Ready(key));
            Ok(LoadOutcome::Committed)
        } else {
            Ok(LoadOutcome::Stale)
        }
    }
}

/// 검색 세션: 캐시 + 세대 + 제출된 검색어
pub struct SearchSession {
    loader: ThumbnailLoader,
    committed_query: RwLock<String>,
}

impl SearchSession {
    pub fn new(repository: Arc<dyn FrameRepository>, config: &AppConfig) -> Self {
        let loader = ThumbnailLoader::new(
            repository,
            Arc::new(ThumbnailCache::new(config.cache.capacity)),
            SearchGeneration::new(),
            config.thumbnail.clone(),
            config.cache.event_capacity,
        );
        Self {
            loader,
            committed_query: RwLock::new(String::new()),
        }
    }

    /// 검색어 제출: 새 세대 시작, 다른 검색어의 캐시 항목 제거
    pub fn submit(&self, query: &str) -> GenerationToken {
        let query = query.trim().to_string();
        let mut committed = self.committed_query.write();
        let token = self
            .loader
            .cache
            .start_generation(&self.loader.generation, &query);
        info!(%token, "검색어 제출");
        *committed = query;
        token
    }

    /// 마지막으로 제출된 검색어
    pub fn committed_query(&self) -> String {
        self.committed_query.read().clone()
    }

    /// 현재 세대 토큰
    pub fn current_token(&self) -> GenerationToken {
        self.loader.generation.current()
    }

    /// 제출된 검색어와 현재 세대를 함께 읽음
    fn snapshot(&self) -> (String, GenerationToken) {
        let committed = self.committed_query.read();
        (committed.clone(), self.loader.generation.current())
    }

    /// 화면에 보이는 결과 한 건의 썸네일 생성을 백그라운드 태스크로 시작
    pub fn request(&self, result: SearchResultRef) -> JoinHandle<Result<LoadOutcome, CoreError>> {
        let (query, token) = self.snapshot();
        let loader = self.loader.clone();
        tokio::spawn(async move { loader.load(&result, &query, token).await })
    }

    /// 여러 결과를 현재 태스크 안에서 동시에 로딩
    pub async fn load_visible(
        &self,
        results: &[SearchResultRef],
    ) -> Vec<Result<LoadOutcome, CoreError>> {
        let (query, token) = self.snapshot();
        join_all(
            results
                .iter()
                .map(|result| self.loader.load(result, &query, token)),
        )
        .await
    }

    /// 제출된 검색어 기준 캐시 조회
    pub fn thumbnail(&self, result: &SearchResultRef) -> Option<Arc<Thumbnail>> {
        let key = ThumbnailKey::new(result, &self.committed_query.read());
        self.loader.cache.get(&key)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ThumbnailEvent> {
        self.loader.subscribe()
    }

    pub fn loader(&self) -> &ThumbnailLoader {
        &self.loader
    }

    /// 세션 종료: 진행 중 작업 무효화, 캐시 비움
    pub fn end(&self) {
        let mut committed = self.committed_query.write();
        self.loader.generation.advance();
        self.loader.cache.clear();
        committed.clear();
        info!("검색 세션 종료");
    }
}
