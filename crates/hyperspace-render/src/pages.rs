//! Locally synthesized pages
//!
//! Everything interpolated into these pages is escaped; targets come straight
//! from the address bar.

use hyperspace_navigation::{InternalPage, META_SEARCH_ADDRESS};
use url::Url;

use crate::document::{DisplayableDocument, DocumentKind};
use crate::rewrite::escape_html;

const PAGE_STYLE: &str = "body{background:linear-gradient(135deg,#0a0a0a,#1a1a1a);color:#00ff41;font-family:'Source Code Pro',monospace;margin:0;padding:20px;line-height:1.6}\
.container{max-width:900px;margin:0 auto}\
.header{text-align:center;border-bottom:2px solid #8b5dff;padding-bottom:20px;margin-bottom:30px}\
.target{border:2px solid #ff6b6b;border-radius:8px;padding:15px;word-break:break-all}\
.grid{display:grid;grid-template-columns:repeat(auto-fit,minmax(260px,1fr));gap:20px}\
.card{background:rgba(26,26,26,.9);border:2px solid #333;border-radius:12px;padding:20px;text-align:center}\
.card h3{color:#00ffff}\
.btn{display:inline-block;background:linear-gradient(135deg,#8b5dff,#00ffff);color:#000;padding:10px 16px;margin:4px;border-radius:6px;font-weight:bold;text-decoration:none;border:none}\
.content-box{border:1px solid #00ffff;border-radius:8px;padding:20px;max-height:400px;overflow-y:auto;white-space:pre-wrap;word-wrap:break-word}";

struct Link<'a> {
    label: &'a str,
    href: String,
}

fn page_shell(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"UTF-8\">\n<title>{} - HYP3RSP4C3</title>\n<style>{}</style>\n</head>\n<body>\n<div class=\"container\">\n{}\n</div>\n</body>\n</html>\n",
        escape_html(title),
        PAGE_STYLE,
        body
    )
}

fn card(heading: &str, description: &str, links: &[Link<'_>]) -> String {
    let buttons: String = links
        .iter()
        .map(|link| {
            format!(
                "<a class=\"btn\" href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">{}</a>",
                escape_html(&link.href),
                escape_html(link.label)
            )
        })
        .collect();

    format!(
        "<div class=\"card\"><h3>{}</h3><p>{}</p>{}</div>\n",
        escape_html(heading),
        escape_html(description),
        buttons
    )
}

fn domain_of(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_else(|| {
            let without_scheme = url
                .trim_start_matches("https://")
                .trim_start_matches("http://");
            without_scheme
                .split('/')
                .next()
                .unwrap_or(without_scheme)
                .to_string()
        })
}

/// Manual access options shown once every proxy attempt has failed
pub fn alternatives_page(url: &str) -> DisplayableDocument {
    let encoded = urlencoding::encode(url);
    let domain = domain_of(url);

    let cards = [
        card(
            "Web Proxy Sites",
            "Paste the URL into an external proxy website",
            &[
                Link {
                    label: "ProxySite",
                    href: format!("https://www.proxysite.com/browse/{}", encoded),
                },
                Link {
                    label: "Hide.me",
                    href: format!("https://hide.me/en/proxy/{}", encoded),
                },
                Link {
                    label: "HideMyAss",
                    href: format!("https://www.hidemyass.com/en-us/proxy/{}", encoded),
                },
            ],
        ),
        card(
            "Archive Services",
            "Open a cached copy of the page",
            &[
                Link {
                    label: "Wayback Machine",
                    href: format!("https://web.archive.org/web/*/{}", url),
                },
                Link {
                    label: "Archive.today",
                    href: format!("https://archive.today/?run=1&url={}", encoded),
                },
            ],
        ),
        card(
            "Direct Access",
            "Open the site directly in a new tab, for example over a VPN",
            &[Link {
                label: "Open Direct",
                href: url.to_string(),
            }],
        ),
        card(
            "Search Alternative",
            "Look for the content with an anonymous search engine",
            &[
                Link {
                    label: "Search DDG",
                    href: format!("https://duckduckgo.com/?q=site:{}", domain),
                },
                Link {
                    label: "StartPage",
                    href: format!("https://startpage.com/search?query=site:{}", domain),
                },
            ],
        ),
        card(
            "Tor Browser",
            "Use Tor Browser for network-level anonymity",
            &[Link {
                label: "Get Tor",
                href: "https://www.torproject.org/download/".to_string(),
            }],
        ),
        card(
            "Mobile Access",
            "Try a mobile or lite version of the site",
            &[
                Link {
                    label: "Mobile Site",
                    href: format!("https://m.{}", domain),
                },
                Link {
                    label: "Lite Version",
                    href: format!("https://lite.{}", domain),
                },
            ],
        ),
    ];

    let body = format!(
        "<div class=\"header\"><h1>DIRECT ROUTING BLOCKED</h1><div class=\"target\"><strong>Target:</strong> {}</div><p>All automated proxy routes have been blocked. Use manual alternatives below:</p></div>\n<div class=\"grid\">\n{}</div>",
        escape_html(url),
        cards.concat()
    );

    DisplayableDocument::new(
        page_shell("Proxy Alternatives", &body),
        url,
        DocumentKind::Alternatives,
    )
}

/// Search portal for a free-text query
pub fn search_page(query: &str) -> DisplayableDocument {
    let encoded = urlencoding::encode(query);

    let cards = [
        card(
            "DuckDuckGo",
            "Privacy-focused search engine",
            &[
                Link {
                    label: "Search DDG",
                    href: format!("https://duckduckgo.com/?q={}", encoded),
                },
                Link {
                    label: "DDG Lite",
                    href: format!("https://lite.duckduckgo.com/lite/?q={}", encoded),
                },
            ],
        ),
        card(
            "StartPage",
            "Google results without tracking",
            &[Link {
                label: "Search StartPage",
                href: format!("https://startpage.com/search?query={}", encoded),
            }],
        ),
        card(
            "Brave Search",
            "Independent search index",
            &[Link {
                label: "Search Brave",
                href: format!("https://search.brave.com/search?q={}", encoded),
            }],
        ),
        card(
            "SearX",
            "Open source metasearch",
            &[Link {
                label: "Search SearX",
                href: format!("https://searx.space/?q={}", encoded),
            }],
        ),
        card(
            "Wikipedia",
            "Knowledge base search",
            &[Link {
                label: "Search Wiki",
                href: format!(
                    "https://en.wikipedia.org/wiki/Special:Search?search={}",
                    encoded
                ),
            }],
        ),
        card(
            "Video Search",
            "Video content search",
            &[Link {
                label: "YouTube",
                href: format!("https://www.youtube.com/results?search_query={}", encoded),
            }],
        ),
    ];

    let body = format!(
        "<div class=\"header\"><h1>ANONYMOUS SEARCH</h1><p>Query: <strong>{}</strong></p></div>\n<div class=\"grid\">\n{}</div>",
        escape_html(query),
        cards.concat()
    );

    DisplayableDocument::new(
        page_shell(&format!("Search: {}", query), &body),
        InternalPage::Search(query.to_string()).address(),
        DocumentKind::Search,
    )
}

/// Embedded meta-search interface
pub fn meta_search_page() -> DisplayableDocument {
    let body = "<div class=\"header\"><h1>DUCKDUCKGO ANONYMOUS SEARCH</h1><p>Search the web privately</p></div>\n\
<div class=\"card\">\n\
<form action=\"https://lite.duckduckgo.com/lite/\" method=\"get\" target=\"_blank\">\n\
<input type=\"text\" name=\"q\" placeholder=\"Enter your search query...\" autofocus>\n\
<button class=\"btn\" type=\"submit\">Search</button>\n\
</form>\n\
<a class=\"btn\" href=\"https://duckduckgo.com/\" target=\"_blank\" rel=\"noopener noreferrer\">Full DDG</a>\n\
</div>";

    DisplayableDocument::new(
        page_shell("DuckDuckGo Search", body),
        META_SEARCH_ADDRESS,
        DocumentKind::MetaSearch,
    )
}

/// Escaped raw-content preview for responses too short to trust
pub fn content_preview_page(html: &str, url: &str, preview_len: usize) -> DisplayableDocument {
    let content = if html.trim().is_empty() {
        "No content received".to_string()
    } else {
        let mut preview: String = html.chars().take(preview_len).collect();
        if html.chars().count() > preview_len {
            preview.push_str("\n\n[Content truncated...]");
        }
        escape_html(&preview)
    };

    let body = format!(
        "<div class=\"header\"><h1>CONTENT PREVIEW</h1><p>Source: {}</p><p>Content received but may be blocked from full display</p></div>\n<div class=\"content-box\">{}</div>\n{}",
        escape_html(url),
        content,
        card(
            "Open Elsewhere",
            "View the original page outside the proxy",
            &[Link {
                label: "Open in New Tab",
                href: url.to_string(),
            }],
        )
    );

    DisplayableDocument::new(
        page_shell("Content Preview", &body),
        url,
        DocumentKind::Preview,
    )
}
