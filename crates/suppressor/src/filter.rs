//! 레이블 필터 -- 억제 규칙이 어떤 알림에 적용되는지 결정합니다.
//!
//! [`Filter`]는 (레이블명 패턴, 레이블 값 패턴) 쌍이며, 두 패턴 모두 정규식입니다.
//! 패턴은 문자열 전체에 고정(`^(?:...)$`)되어 컴파일되므로 `warn`은 `warning`에 매칭되지 않습니다.
//! [`FilterSet`]은 필터의 AND 결합입니다.

use regex::Regex;

use hush_core::event::AlertEvent;
use hush_core::types::Labels;

use crate::error::SuppressorError;

/// 단일 레이블 필터
///
/// 이벤트의 레이블 중 하나라도 이름이 `name_pattern`에, 값이 `value_pattern`에
/// 매칭되면 필터가 매칭됩니다.
#[derive(Debug, Clone)]
pub struct Filter {
    name_pattern: String,
    value_pattern: String,
    name: Regex,
    value: Regex,
}

impl Filter {
    /// 패턴을 컴파일하여 필터를 만듭니다.
    pub fn new(
        name_pattern: impl Into<String>,
        value_pattern: impl Into<String>,
    ) -> Result<Self, SuppressorError> {
        let name_pattern = name_pattern.into();
        let value_pattern = value_pattern.into();
        let name = compile_anchored(&name_pattern)?;
        let value = compile_anchored(&value_pattern)?;
        Ok(Self {
            name_pattern,
            value_pattern,
            name,
            value,
        })
    }

    /// 레이블명 패턴 원문
    pub fn name_pattern(&self) -> &str {
        &self.name_pattern
    }

    /// 레이블 값 패턴 원문
    pub fn value_pattern(&self) -> &str {
        &self.value_pattern
    }

    /// 이벤트에 매칭되는지 평가합니다.
    pub fn matches(&self, event: &AlertEvent) -> bool {
        self.matches_labels(&event.labels)
    }

    /// 레이블 집합에 매칭되는지 평가합니다.
    pub fn matches_labels(&self, labels: &Labels) -> bool {
        labels
            .iter()
            .any(|(name, value)| self.name.is_match(name) && self.value.is_match(value))
    }
}

impl PartialEq for Filter {
    fn eq(&self, other: &Self) -> bool {
        self.name_pattern == other.name_pattern && self.value_pattern == other.value_pattern
    }
}

impl Eq for Filter {}

/// 필터 집합 (AND 결합)
///
/// 비어있는 집합은 모든 이벤트에 매칭됩니다.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    filters: Vec<Filter>,
}

impl FilterSet {
    /// (레이블명 패턴, 값 패턴) 쌍 목록에서 집합을 만듭니다.
    ///
    /// 하나라도 컴파일에 실패하면 전체가 실패합니다.
    pub fn from_patterns<I, N, V>(patterns: I) -> Result<Self, SuppressorError>
    where
        I: IntoIterator<Item = (N, V)>,
        N: Into<String>,
        V: Into<String>,
    {
        let filters = patterns
            .into_iter()
            .map(|(name, value)| Filter::new(name, value))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { filters })
    }

    /// 모든 필터가 이벤트에 매칭되는지 평가합니다.
    pub fn matches_all(&self, event: &AlertEvent) -> bool {
        self.matches_all_labels(&event.labels)
    }

    /// 모든 필터가 레이블 집합에 매칭되는지 평가합니다.
    pub fn matches_all_labels(&self, labels: &Labels) -> bool {
        self.filters.iter().all(|f| f.matches_labels(labels))
    }

    /// 필터 순회
    pub fn iter(&self) -> std::slice::Iter<'_, Filter> {
        self.filters.iter()
    }

    /// 필터 개수
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// 비어있는지 여부
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

impl<'a> IntoIterator for &'a FilterSet {
    type Item = &'a Filter;
    type IntoIter = std::slice::Iter<'a, Filter>;

    fn into_iter(self) -> Self::IntoIter {
        self.filters.iter()
    }
}

fn anchor(pattern: &str) -> String {
    format!("^(?:{pattern})$")
}

fn compile_anchored(pattern: &str) -> Result<Regex, SuppressorError> {
    Regex::new(&anchor(pattern)).map_err(|e| SuppressorError::InvalidFilter {
        pattern: pattern.to_owned(),
        reason: e.to_string(),
    })
}
