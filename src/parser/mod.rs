// 子模組
pub mod rules;
pub mod utils;

pub use rules::{BLOCK_RULES, BlockRule, SectionKind};

use crate::types::MatchRecord;
use anyhow::Result;
use rules::{ElementPattern, LinkSource, NO_TITLE, ThemeSource};
use scraper::{ElementRef, Html, Selector};
use utils::{ClassMatch, stripped_text};

/// 頁面中找到的一個區塊
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultBlock {
    pub kind: SectionKind,
    /// 區塊名稱或主題
    pub theme: String,
    pub items: Vec<ResultItem>,
}

/// 區塊內的一個項目
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultItem {
    /// 區塊內的名次，從 1 開始
    pub position: usize,
    pub link: String,
    pub title: String,
}

/// 編譯後的元素定位
struct CompiledPattern {
    selector: Selector,
    class: ClassMatch,
}

impl CompiledPattern {
    fn compile(pattern: &ElementPattern) -> Result<Self> {
        let css = pattern
            .tags
            .iter()
            .map(|tag| match (pattern.class.selector_hint(), *tag) {
                (Some(class), "*") => format!(".{}", class),
                (Some(class), tag) => format!("{}.{}", tag, class),
                (None, tag) => tag.to_string(),
            })
            .collect::<Vec<_>>()
            .join(", ");

        let selector = Selector::parse(&css)
            .map_err(|e| anyhow::anyhow!("選擇器解析失敗 ({}): {:?}", css, e))?;

        Ok(Self {
            selector,
            class: pattern.class,
        })
    }

    fn anchor(class: ClassMatch) -> Result<Self> {
        Self::compile(&ElementPattern::new(&["a"], class))
    }

    /// 整份文件中符合的元素（文件順序）
    fn find_in<'a>(&self, document: &'a Html) -> Vec<ElementRef<'a>> {
        document
            .select(&self.selector)
            .filter(|el| self.class.matches(el))
            .collect()
    }

    /// scope 底下符合的子孫元素（不含 scope 本身）
    fn find_within<'a>(&self, scope: ElementRef<'a>) -> Vec<ElementRef<'a>> {
        scope
            .select(&self.selector)
            .filter(|el| *el != scope && self.class.matches(el))
            .collect()
    }
}

enum CompiledLink {
    Anchor(CompiledPattern),
    OwnHref,
}

enum CompiledTheme {
    Fixed,
    Headline(CompiledPattern),
}

struct CompiledRule {
    kind: SectionKind,
    container: CompiledPattern,
    items: Vec<CompiledPattern>,
    links: Vec<CompiledLink>,
    titles: Vec<CompiledPattern>,
    theme: CompiledTheme,
}

impl CompiledRule {
    fn compile(rule: &BlockRule) -> Result<Self> {
        let links = rule
            .links
            .iter()
            .map(|source| match source {
                LinkSource::Anchor(class) => {
                    CompiledPattern::anchor(*class).map(CompiledLink::Anchor)
                }
                LinkSource::OwnHref => Ok(CompiledLink::OwnHref),
            })
            .collect::<Result<Vec<_>>>()?;

        let theme = match &rule.theme {
            ThemeSource::Fixed => CompiledTheme::Fixed,
            ThemeSource::Headline(pattern) => {
                CompiledTheme::Headline(CompiledPattern::compile(pattern)?)
            }
        };

        Ok(Self {
            kind: rule.kind,
            container: CompiledPattern::compile(&rule.container)?,
            items: rule
                .items
                .iter()
                .map(CompiledPattern::compile)
                .collect::<Result<Vec<_>>>()?,
            links,
            titles: rule
                .titles
                .iter()
                .map(|class| CompiledPattern::anchor(*class))
                .collect::<Result<Vec<_>>>()?,
            theme,
        })
    }

    fn theme_for(&self, container: ElementRef, keyword: &str) -> String {
        let theme = match &self.theme {
            CompiledTheme::Fixed => self.kind.label().map(|s| s.to_string()),
            CompiledTheme::Headline(pattern) => pattern
                .find_within(container)
                .first()
                .map(stripped_text)
                .filter(|text| !text.is_empty()),
        };
        theme.unwrap_or_else(|| keyword.to_string())
    }

    /// 第一個找到項目的定位方式勝出
    fn items_in<'a>(&self, container: ElementRef<'a>) -> Vec<ElementRef<'a>> {
        self.items
            .iter()
            .map(|pattern| pattern.find_within(container))
            .find(|items| !items.is_empty())
            .unwrap_or_default()
    }

    fn link_for(&self, item: ElementRef) -> String {
        self.links
            .iter()
            .find_map(|source| match source {
                CompiledLink::Anchor(pattern) => pattern
                    .find_within(item)
                    .into_iter()
                    .find_map(|anchor| anchor.value().attr("href")),
                CompiledLink::OwnHref if item.value().name() == "a" => {
                    item.value().attr("href")
                }
                CompiledLink::OwnHref => None,
            })
            .map(|href| href.to_string())
            .unwrap_or_default()
    }

    fn title_for(&self, item: ElementRef) -> String {
        self.titles
            .iter()
            .find_map(|pattern| pattern.find_within(item).into_iter().next())
            .map(|anchor| stripped_text(&anchor))
            .filter(|title| !title.is_empty())
            .unwrap_or_else(|| NO_TITLE.to_string())
    }
}

/// 搜尋結果頁解析器
pub struct ResultParser {
    rules: Vec<CompiledRule>,
}

impl ResultParser {
    /// 使用內建的區塊規則
    pub fn new() -> Result<Self> {
        Self::with_rules(BLOCK_RULES)
    }

    pub fn with_rules(rules: &[BlockRule]) -> Result<Self> {
        Ok(Self {
            rules: rules
                .iter()
                .map(CompiledRule::compile)
                .collect::<Result<Vec<_>>>()?,
        })
    }

    /// 找出頁面中所有符合規則的區塊；每個區塊的名次各自從 1 開始
    pub fn parse_blocks(&self, html: &str, keyword: &str) -> Vec<ResultBlock> {
        let document = Html::parse_document(html);
        let mut blocks = Vec::new();

        for rule in &self.rules {
            for container in rule.container.find_in(&document) {
                let items = rule
                    .items_in(container)
                    .into_iter()
                    .enumerate()
                    .map(|(idx, item)| ResultItem {
                        position: idx + 1,
                        link: rule.link_for(item),
                        title: rule.title_for(item),
                    })
                    .collect();

                let block = ResultBlock {
                    kind: rule.kind,
                    theme: rule.theme_for(container, keyword),
                    items,
                };
                tracing::debug!(
                    kind = ?block.kind,
                    theme = %block.theme,
                    items = block.items.len(),
                    "找到區塊"
                );
                blocks.push(block);
            }
        }

        blocks
    }

    /// 解析頁面並比對部落格 ID
    pub fn extract(&self, html: &str, keyword: &str, blog_ids: &[String]) -> Vec<MatchRecord> {
        let blocks = self.parse_blocks(html, keyword);
        match_records(&blocks, keyword, blog_ids)
    }
}

/// 連結包含部落格 ID（區分大小寫）就產生一筆紀錄
pub fn match_records(
    blocks: &[ResultBlock],
    keyword: &str,
    blog_ids: &[String],
) -> Vec<MatchRecord> {
    let mut records = Vec::new();

    for block in blocks {
        for item in &block.items {
            for blog_id in blog_ids {
                if item.link.contains(blog_id.as_str()) {
                    records.push(MatchRecord {
                        keyword: keyword.to_string(),
                        blog_id: blog_id.clone(),
                        section: block.theme.clone(),
                        position: item.position,
                        title: item.title.clone(),
                    });
                }
            }
        }
    }

    records
}
