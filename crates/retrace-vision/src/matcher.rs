//! OCR 노드 매칭.
//!
//! 검색어에 가장 잘 대응하는 OCR 노드 하나를 고른다.
//! 전문 검색 백엔드는 어간 추출(stemming)된 토큰으로 색인하므로
//! 검색어가 OCR 텍스트에 그대로 나타나지 않을 수 있다.
//! 그래서 아래 세 단계를 순서대로 시도하고, 결과가 나온 첫 단계에서 멈춘다.
//!
//! 1. 단어 경계 일치 (`\bquery\b`)
//! 2. 어간 접두사 일치 ("calling" → "call")
//! 3. 부분 문자열 일치
//!
//! 각 단계 안에서는 입력 순서상 첫 노드가 선택된다 (점수 비교 없음).

use retrace_core::models::ocr::OcrNode;
use serde::Serialize;
use tracing::debug;

/// 어간 추출 시 제거할 접미사 (우선순위 순)
pub const STEM_SUFFIXES: &[&str] = &[
    "ing", "ed", "er", "est", "ly", "tion", "sion", "ness", "ment", "able", "ible", "ful", "less",
    "ous", "ive", "al", "s",
];

/// 어간 단계가 활성화되는 최소 어간 길이
const MIN_STEM_LEN: usize = 3;

/// 매칭에 성공한 단계
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPass {
    /// 단어 경계 정확 일치
    WordBoundary,
    /// 어간 접두사 일치
    Stem,
    /// 부분 문자열 일치
    Substring,
}

impl MatchPass {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WordBoundary => "word_boundary",
            Self::Stem => "stem",
            Self::Substring => "substring",
        }
    }
}

/// 검색어에 대응하는 노드 선택 (없으면 None)
pub fn find_match<'a>(query: &str, nodes: &'a [OcrNode]) -> Option<&'a OcrNode> {
    find_match_with_pass(query, nodes).map(|(node, _)| node)
}

/// 검색어에 대응하는 노드와 매칭 단계 반환
pub fn find_match_with_pass<'a>(
    query: &str,
    nodes: &'a [OcrNode],
) -> Option<(&'a OcrNode, MatchPass)> {
    let query = query.trim().to_lowercase();
    if query.is_empty() || nodes.is_empty() {
        return None;
    }

    let lowered: Vec<String> = nodes.iter().map(|n| n.text.to_lowercase()).collect();

    let found = lowered
        .iter()
        .position(|text| contains_whole_word(text, &query))
        .map(|i| (i, MatchPass::WordBoundary))
        .or_else(|| {
            let stem = simple_stem(&query);
            if stem.chars().count() < MIN_STEM_LEN {
                return None;
            }
            lowered
                .iter()
                .position(|text| has_stem_word(text, &stem))
                .map(|i| (i, MatchPass::Stem))
        })
        .or_else(|| {
            lowered
                .iter()
                .position(|text| text.contains(&query))
                .map(|i| (i, MatchPass::Substring))
        });

    match found {
        Some((index, pass)) => {
            debug!(
                pass = pass.as_str(),
                index,
                node_count = nodes.len(),
                "OCR 노드 매칭 성공"
            );
            Some((&nodes[index], pass))
        }
        None => {
            debug!(node_count = nodes.len(), "OCR 노드 매칭 실패");
            None
        }
    }
}

/// 단순 어간 추출.
///
/// 목록 순서대로 접미사를 검사해, 단어가 그 접미사로 끝나고
/// 제거 후에도 세 글자 이상이 남는 첫 접미사 하나만 제거한다.
pub fn simple_stem(word: &str) -> String {
    let len = word.chars().count();
    for suffix in STEM_SUFFIXES {
        if word.ends_with(suffix) && len.saturating_sub(suffix.len()) > 2 {
            return word[..word.len() - suffix.len()].to_string();
        }
    }
    word.to_string()
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// 정규식 `\b` 의미의 경계: 양쪽 문자의 단어 문자 여부가 다르면 경계
fn is_boundary(left: Option<char>, right: Option<char>) -> bool {
    left.is_some_and(is_word_char) != right.is_some_and(is_word_char)
}

/// `needle`이 `haystack` 안에 단어 경계로 둘러싸여 나타나는지
fn contains_whole_word(haystack: &str, needle: &str) -> bool {
    let (Some(first), Some(last)) = (needle.chars().next(), needle.chars().next_back()) else {
        return false;
    };

    haystack
        .char_indices()
        .filter(|(start, _)| haystack[*start..].starts_with(needle))
        .any(|(start, _)| {
            let before = haystack[..start].chars().next_back();
            let after = haystack[start + needle.len()..].chars().next();
            is_boundary(before, Some(first)) && is_boundary(Some(last), after)
        })
}

/// 텍스트의 영숫자 단어 중 어간과 접두사 관계(양방향)인 단어가 있는지
fn has_stem_word(text: &str, stem: &str) -> bool {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .any(|word| word.starts_with(stem) || stem.starts_with(word))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nodes(texts: &[&str]) -> Vec<OcrNode> {
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| OcrNode::new(*t, 0.1, 0.05 * i as f64, 0.2, 0.04))
            .collect()
    }

    #[test]
    fn word_boundary_beats_earlier_substring() {
        let nodes = nodes(&["gleanings is a tool", "@glean posted"]);
        let (node, pass) = find_match_with_pass("glean", &nodes).unwrap();
        assert_eq!(node.text, "@glean posted");
        assert_eq!(pass, MatchPass::WordBoundary);
    }

    #[test]
    fn word_boundary_is_case_insensitive() {
        let nodes = nodes(&["Quarterly REPORT.pdf"]);
        let (node, pass) = find_match_with_pass("Report", &nodes).unwrap();
        assert_eq!(node.text, "Quarterly REPORT.pdf");
        assert_eq!(pass, MatchPass::WordBoundary);
    }

    #[test]
    fn word_boundary_picks_first_in_input_order() {
        let nodes = nodes(&["call me", "call you"]);
        assert_eq!(find_match("call", &nodes).unwrap().text, "call me");
    }

    #[test]
    fn underscore_is_a_word_character() {
        // '_'는 단어 문자라 경계 단계는 실패하지만, 어간 단계의 단어 분리는 영숫자 기준
        let nodes = nodes(&["my_glean"]);
        let (_, pass) = find_match_with_pass("glean", &nodes).unwrap();
        assert_eq!(pass, MatchPass::Stem);
    }

    #[test]
    fn stem_pass_matches_inflected_query() {
        let nodes = nodes(&["he will call you back"]);
        let (node, pass) = find_match_with_pass("calling", &nodes).unwrap();
        assert_eq!(node.text, "he will call you back");
        assert_eq!(pass, MatchPass::Stem);
    }

    #[test]
    fn stem_pass_matches_longer_word_with_stem_prefix() {
        let nodes = nodes(&["nothing here", "he is calling you"]);
        let (node, pass) = find_match_with_pass("called", &nodes).unwrap();
        assert_eq!(node.text, "he is calling you");
        assert_eq!(pass, MatchPass::Stem);
    }

    #[test]
    fn stem_pass_skipped_for_short_stem() {
        // "ab"는 어간 단계가 꺼지고, 부분 문자열로만 매칭
        let nodes = nodes(&["a b", "xaby"]);
        let (node, pass) = find_match_with_pass("ab", &nodes).unwrap();
        assert_eq!(node.text, "xaby");
        assert_eq!(pass, MatchPass::Substring);
    }

    #[test]
    fn substring_fallback() {
        let nodes = nodes(&["unrelated", "supercalifragilistic"]);
        let (node, pass) = find_match_with_pass("fragil", &nodes).unwrap();
        assert_eq!(node.text, "supercalifragilistic");
        assert_eq!(pass, MatchPass::Substring);
    }

    #[test]
    fn no_match_returns_none() {
        let nodes = nodes(&["alpha", "beta"]);
        assert!(find_match("gamma", &nodes).is_none());
    }

    #[test]
    fn empty_inputs_return_none() {
        assert!(find_match("", &nodes(&["anything"])).is_none());
        assert!(find_match("   ", &nodes(&["anything"])).is_none());
        assert!(find_match("query", &[]).is_none());
    }

    #[test]
    fn stem_strips_first_listed_suffix_only() {
        assert_eq!(simple_stem("calling"), "call");
        assert_eq!(simple_stem("jumped"), "jump");
        // "ness"가 "s"보다 앞 순서
        assert_eq!(simple_stem("kindness"), "kind");
        assert_eq!(simple_stem("quickly"), "quick");
        assert_eq!(simple_stem("files"), "file");
    }

    #[test]
    fn stem_keeps_short_words() {
        // 제거 후 세 글자 미만이면 유지
        assert_eq!(simple_stem("sing"), "sing");
        assert_eq!(simple_stem("bed"), "bed");
        assert_eq!(simple_stem("call"), "call");
        assert_eq!(simple_stem("bus"), "bus");
    }

    #[test]
    fn stem_tries_next_suffix_when_too_short() {
        // "wings": "ing"는 끝이 아니고 "s"로 끝남 → "wing"
        assert_eq!(simple_stem("wings"), "wing");
    }

    #[test]
    fn whole_word_respects_non_word_query_edges() {
        assert!(contains_whole_word("cost: $100 total", "100"));
        assert!(!contains_whole_word("cost: $1000 total", "100"));
        assert!(contains_whole_word("glean", "glean"));
    }

    #[test]
    fn whole_word_finds_later_occurrence() {
        // 첫 등장은 경계가 아니지만 두 번째는 경계
        assert!(contains_whole_word("gleaning glean", "glean"));
    }

    #[test]
    fn non_ascii_text_is_handled() {
        let nodes = nodes(&["Überweisung bestätigt", "Café crème"]);
        let (node, pass) = find_match_with_pass("café", &nodes).unwrap();
        assert_eq!(node.text, "Café crème");
        assert_eq!(pass, MatchPass::WordBoundary);
    }
}
