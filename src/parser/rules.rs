use super::utils::ClassMatch;

/// 區塊種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    /// 上方曝光區
    TopExposure,
    /// 一般搜尋結果
    GeneralResults,
    /// 部落格熱門文章
    PopularPosts,
    /// 主題面板
    ThemedPanel,
}

impl SectionKind {
    /// 固定的區塊名稱；主題面板的名稱取自頁面
    pub fn label(&self) -> Option<&'static str> {
        match self {
            SectionKind::TopExposure => Some("top exposure"),
            SectionKind::GeneralResults => Some("general results"),
            SectionKind::PopularPosts => Some("popular blog posts"),
            SectionKind::ThemedPanel => None,
        }
    }
}

/// 以標籤名稱 + class 比對定位元素
#[derive(Debug, Clone, Copy)]
pub struct ElementPattern {
    pub tags: &'static [&'static str],
    pub class: ClassMatch,
}

impl ElementPattern {
    pub const fn new(tags: &'static [&'static str], class: ClassMatch) -> Self {
        Self { tags, class }
    }
}

/// 連結來源
#[derive(Debug, Clone, Copy)]
pub enum LinkSource {
    /// 項目內第一個符合的 `<a>` 的 href
    Anchor(ClassMatch),
    /// 項目本身就是 `<a>` 時取自身的 href
    OwnHref,
}

/// 區塊名稱來源
#[derive(Debug, Clone, Copy)]
pub enum ThemeSource {
    /// 使用 [`SectionKind::label`]
    Fixed,
    /// 區塊內的標題元素，找不到時使用關鍵字
    Headline(ElementPattern),
}

/// 一種區塊的抽取規則
#[derive(Debug, Clone, Copy)]
pub struct BlockRule {
    pub kind: SectionKind,
    pub container: ElementPattern,
    /// 依序嘗試，第一個找到項目的定位方式勝出
    pub items: &'static [ElementPattern],
    pub links: &'static [LinkSource],
    /// 依序嘗試的 `<a>` 標題
    pub titles: &'static [ClassMatch],
    pub theme: ThemeSource,
}

pub const NO_TITLE: &str = "No Title";

const THUMB_LINKS: &[LinkSource] = &[
    LinkSource::Anchor(ClassMatch::Has("user_thumb")),
    LinkSource::Anchor(ClassMatch::Has("thumb")),
];

const PANEL_LINKS: &[LinkSource] = &[
    LinkSource::Anchor(ClassMatch::Has("user_thumb")),
    LinkSource::Anchor(ClassMatch::Has("thumb")),
    LinkSource::Anchor(ClassMatch::Contains("fds-thumb-anchor")),
    LinkSource::OwnHref,
];

const TITLES: &[ClassMatch] = &[ClassMatch::Has("title_link"), ClassMatch::Has("link_tit")];

const BX_ITEMS: &[ElementPattern] = &[ElementPattern::new(&["li"], ClassMatch::Sole("bx"))];

/// 搜尋結果頁的區塊規則（依此順序輸出）
pub const BLOCK_RULES: &[BlockRule] = &[
    BlockRule {
        kind: SectionKind::TopExposure,
        container: ElementPattern::new(
            &["div"],
            ClassMatch::Exact(&["spw_rerank", "type_head", "_rra_head"]),
        ),
        items: &[ElementPattern::new(
            &["section"],
            ClassMatch::Exact(&["sc_new", "sp_nreview", "_fe_view_root"]),
        )],
        links: THUMB_LINKS,
        titles: TITLES,
        theme: ThemeSource::Fixed,
    },
    BlockRule {
        kind: SectionKind::GeneralResults,
        container: ElementPattern::new(
            &["div"],
            ClassMatch::Exact(&["spw_rerank", "_rra_body"]),
        ),
        items: BX_ITEMS,
        links: THUMB_LINKS,
        titles: TITLES,
        theme: ThemeSource::Fixed,
    },
    BlockRule {
        kind: SectionKind::PopularPosts,
        container: ElementPattern::new(
            &["section"],
            ClassMatch::Exact(&["sc_new", "sp_nreview", "_fe_view_root", "_prs_ugB_bsR"]),
        ),
        items: BX_ITEMS,
        links: THUMB_LINKS,
        titles: TITLES,
        theme: ThemeSource::Fixed,
    },
    BlockRule {
        kind: SectionKind::ThemedPanel,
        container: ElementPattern::new(
            &["div", "section"],
            ClassMatch::Exact(&["sc_new", "_slog_visible"]),
        ),
        items: &[
            ElementPattern::new(&["div"], ClassMatch::Has("fds-ugc-block-mod")),
            ElementPattern::new(&["a"], ClassMatch::Contains("fds-thumb-anchor")),
        ],
        links: PANEL_LINKS,
        titles: TITLES,
        theme: ThemeSource::Headline(ElementPattern::new(
            &["*"],
            ClassMatch::Contains("fds-comps-header-headline"),
        )),
    },
    BlockRule {
        kind: SectionKind::GeneralResults,
        container: ElementPattern::new(
            &["section"],
            ClassMatch::Exact(&[
                "sc_new",
                "sp_ntotal",
                "_sp_ntotal",
                "_prs_web_gen",
                "_fe_root_web_gend",
            ]),
        ),
        items: BX_ITEMS,
        links: THUMB_LINKS,
        titles: TITLES,
        theme: ThemeSource::Fixed,
    },
];
