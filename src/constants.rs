//! Flags, tag sets and regular expressions shared by the extraction passes.

use bitflags::bitflags;
use once_cell::sync::Lazy;
use regex::Regex;

bitflags! {
    /// Heuristics active during one extraction attempt.
    ///
    /// Every attempt after the first drops one flag, in declaration order.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ParseFlags: u8 {
        const STRIP_UNLIKELYS = 0b001;
        const WEIGHT_CLASSES = 0b010;
        const CLEAN_CONDITIONALLY = 0b100;
    }
}

/// Tags whose text is scored directly.
pub const DEFAULT_TAGS_TO_SCORE: &[&str] = &["section", "h2", "h3", "h4", "h5", "h6", "p", "td", "pre"];

/// Block elements that keep a `<div>` from being turned into a `<p>`.
pub const DIV_TO_P_ELEMS: &[&str] = &[
    "blockquote", "dl", "div", "img", "ol", "p", "pre", "table", "ul",
];

/// Siblings with these tags keep their tag when pulled into the article.
pub const ALTER_TO_DIV_EXCEPTIONS: &[&str] = &["div", "article", "section", "p"];

/// Blocks removed when they hold no text.
pub const EMPTY_BLOCK_TAGS: &[&str] = &["div", "section", "header", "h1", "h2", "h3", "h4", "h5", "h6"];

pub const UNLIKELY_ROLES: &[&str] = &[
    "menu",
    "menubar",
    "complementary",
    "navigation",
    "alert",
    "alertdialog",
    "dialog",
];

pub const PRESENTATIONAL_ATTRIBUTES: &[&str] = &[
    "align",
    "background",
    "bgcolor",
    "border",
    "cellpadding",
    "cellspacing",
    "frame",
    "hspace",
    "rules",
    "style",
    "valign",
    "vspace",
];

pub const DEPRECATED_SIZE_ATTRIBUTE_ELEMS: &[&str] = &["table", "th", "td", "hr", "pre"];

pub const PHRASING_ELEMS: &[&str] = &[
    "abbr", "audio", "b", "bdo", "br", "button", "cite", "code", "data", "datalist", "dfn", "em",
    "embed", "i", "img", "input", "kbd", "label", "mark", "math", "meter", "noscript", "object",
    "output", "progress", "q", "ruby", "samp", "script", "select", "small", "span", "strong",
    "sub", "sup", "textarea", "time", "var", "wbr",
];

/// Descendants that mark a table as holding data rather than layout.
pub const DATA_TABLE_DESCENDANTS: &[&str] = &["col", "colgroup", "tfoot", "thead", "th"];

/// Tags removed outright from the article (embeds are checked against the
/// video pattern first).
pub const CLEAN_TAGS: &[&str] = &[
    "object", "embed", "iframe", "footer", "link", "input", "textarea", "select", "button",
];

pub const EMBED_TAGS: &[&str] = &["object", "embed", "iframe"];

/// Media elements whose `src`, `poster` and `srcset` are made absolute.
pub const MEDIA_TAGS: &[&str] = &["img", "picture", "figure", "video", "audio", "source"];

/// Tags whose class names are kept by default.
pub const CLASSES_TO_PRESERVE: &[&str] = &["page"];

pub const MIN_CONTENT_TEXT_LENGTH: usize = 25;

pub struct Regexps {
    pub unlikely_candidates: Regex,
    pub ok_maybe_its_a_candidate: Regex,
    pub positive: Regex,
    pub negative: Regex,
    pub byline: Regex,
    pub normalize: Regex,
    pub videos: Regex,
    pub share_elements: Regex,
    pub tokenize: Regex,
    pub hash_url: Regex,
    pub srcset_url: Regex,
    pub commas: Regex,
    pub sentence_end: Regex,
    pub ad_words: Regex,
    pub loading_words: Regex,
    pub title_separator: Regex,
    pub title_hierarchical_separator: Regex,
    pub title_leading_part: Regex,
    pub json_ld_article_types: Regex,
    pub schema_dot_org: Regex,
    pub cdata_wrapper: Regex,
    pub meta_property: Regex,
    pub meta_name: Regex,
}

fn compile(pattern: &str) -> Regex {
    match Regex::new(pattern) {
        Ok(regex) => regex,
        Err(err) => panic!("invalid built-in pattern {pattern:?}: {err}"),
    }
}

pub static REGEXPS: Lazy<Regexps> = Lazy::new(|| Regexps {
    unlikely_candidates: compile(
        r"(?i)-ad-|ai2html|banner|breadcrumbs|combx|comment|community|cover-wrap|disqus|extra|footer|gdpr|header|legends|menu|related|remark|replies|rss|shoutbox|sidebar|skyscraper|social|sponsor|supplemental|ad-break|agegate|pagination|pager|popup|yom-remote",
    ),
    ok_maybe_its_a_candidate: compile(r"(?i)and|article|body|column|content|main|shadow"),
    positive: compile(
        r"(?i)article|body|content|entry|hentry|h-entry|main|page|pagination|post|text|blog|story",
    ),
    negative: compile(
        r"(?i)-ad-|hidden|^hid$| hid$| hid |^hid |banner|combx|comment|com-|contact|foot|footer|footnote|gdpr|masthead|media|meta|outbrain|promo|related|scroll|share|shoutbox|sidebar|skyscraper|sponsor|shopping|tags|tool|widget",
    ),
    byline: compile(r"(?i)byline|author|dateline|writtenby|p-author"),
    normalize: compile(r"\s{2,}"),
    videos: compile(
        r"(?i)//(www\.)?((dailymotion|youtube|youtube-nocookie|player\.vimeo|v\.qq)\.com|(archive|upload\.wikimedia)\.org|player\.twitch\.tv)",
    ),
    share_elements: compile(r"(?i)(\b|_)(share|sharedaddy)(\b|_)"),
    tokenize: compile(r"\W+"),
    hash_url: compile(r"^#.+"),
    srcset_url: compile(r"(\S+)(\s+[\d.]+[xw])?(\s*(?:,|$))"),
    commas: compile("[\u{002C}\u{060C}\u{FE50}\u{FE10}\u{FE11}\u{2E41}\u{2E34}\u{2E32}\u{FF0C}]"),
    sentence_end: compile(r"\.( |$)"),
    ad_words: compile(r"(?i)^(ad(vertising|vertisement)?|pub(licité)?|werb(ung)?|广告|Реклама|Anuncio)$"),
    loading_words: compile(r"(?i)^((loading|正在加载|Загрузка|chargement|cargando)(…|\.\.\.)?)$"),
    title_separator: compile(r"\s[\|\-–—\\/>»]\s"),
    title_hierarchical_separator: compile(r"\s[\\/>»]\s"),
    title_leading_part: compile(r"^[^\|\-–—\\/>»]*[\|\-–—\\/>»]"),
    json_ld_article_types: compile(
        r"^Article|AdvertiserContentArticle|NewsArticle|AnalysisNewsArticle|AskPublicNewsArticle|BackgroundNewsArticle|OpinionNewsArticle|ReportageNewsArticle|ReviewNewsArticle|Report|SatiricalArticle|ScholarlyArticle|MedicalScholarlyArticle|SocialMediaPosting|BlogPosting|LiveBlogPosting|DiscussionForumPosting|TechArticle|APIReference$",
    ),
    schema_dot_org: compile(r"^https?://schema\.org/?$"),
    cdata_wrapper: compile(r"^\s*<!\[CDATA\[|\]\]>\s*$"),
    meta_property: compile(
        r"(?i)\s*(article|dc|dcterm|og|twitter)\s*:\s*(author|creator|description|published_time|title|site_name)\s*",
    ),
    meta_name: compile(
        r"(?i)^\s*(?:(dc|dcterm|og|twitter|parsely|weibo:(article|webpage))\s*[-\.:]\s*)?(author|creator|pub-date|description|title|site_name)\s*$",
    ),
});
