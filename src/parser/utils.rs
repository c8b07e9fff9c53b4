use scraper::ElementRef;

/// class 屬性的比對方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassMatch {
    /// class token 完全相同（順序也要相同）
    Exact(&'static [&'static str]),
    /// 只有這一個 class token
    Sole(&'static str),
    /// 含有這個 class token
    Has(&'static str),
    /// 任一 class token 包含這段字串
    Contains(&'static str),
}

impl ClassMatch {
    pub fn matches(&self, element: &ElementRef) -> bool {
        let mut tokens = class_tokens(element);
        match self {
            ClassMatch::Exact(expected) => tokens.eq(expected.iter().copied()),
            ClassMatch::Sole(class) => tokens.next() == Some(*class) && tokens.next().is_none(),
            ClassMatch::Has(class) => tokens.any(|t| t == *class),
            ClassMatch::Contains(pattern) => tokens.any(|t| t.contains(*pattern)),
        }
    }

    /// 可放進 CSS 選擇器的 class（作為預先篩選）
    pub fn selector_hint(&self) -> Option<&'static str> {
        match self {
            ClassMatch::Exact(expected) => expected.first().copied(),
            ClassMatch::Sole(class) | ClassMatch::Has(class) => Some(*class),
            ClassMatch::Contains(_) => None,
        }
    }
}

fn class_tokens<'a>(element: &ElementRef<'a>) -> std::str::SplitWhitespace<'a> {
    element
        .value()
        .attr("class")
        .unwrap_or("")
        .split_whitespace()
}

/// 取出元素文字：每段文字去除前後空白後串接
pub fn stripped_text(element: &ElementRef) -> String {
    element
        .text()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .concat()
}
