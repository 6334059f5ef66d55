//! Field extraction from GitHub pages.
//!
//! GitHub has no stable markup contract; these selectors follow the current
//! page layout and every field degrades to empty/`None` rather than failing
//! when the layout moves.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::utils::parse_selector_unsafe;

macro_rules! selector {
    ($name:ident, $css:expr) => {
        static $name: LazyLock<Selector> =
            LazyLock::new(|| parse_selector_unsafe($css, stringify!($name)));
    };
}

// Repository page
selector!(REPO_DESCRIPTION, "p.f4.my-3");
selector!(REPO_STARS, "#repo-stars-counter-star");
selector!(REPO_FORKS, "#repo-network-counter");
selector!(REPO_TOPICS, "a.topic-tag");
selector!(REPO_LANGUAGE, "[itemprop='programmingLanguage']");

// Trending pages
selector!(TRENDING_ROW, "article.Box-row");
selector!(TRENDING_REPO_LINK, "h2 a");
selector!(TRENDING_REPO_DESCRIPTION, "p");
selector!(TRENDING_STARS, "a[href$='/stargazers']");
selector!(TRENDING_FORKS, "a[href$='/forks']");
selector!(TRENDING_PERIOD_STARS, "span.float-sm-right");
selector!(DEVELOPER_LINK, "h1.h3 a");
selector!(DEVELOPER_LOGIN, "p.f4 a");
selector!(DEVELOPER_POPULAR_REPO, "h1.h4 a");

// Profile page
selector!(PROFILE_NAME, "span.p-name");
selector!(PROFILE_LOGIN, "span.p-nickname");
selector!(PROFILE_BIO, "div.p-note");
selector!(AVATAR, "img.avatar-user, img.avatar");
selector!(PROFILE_FOLLOWERS, "a[href$='tab=followers'] span.text-bold");
selector!(PROFILE_FOLLOWING, "a[href$='tab=following'] span.text-bold");
selector!(PROFILE_REPOSITORIES, "a[href$='tab=repositories'] span.Counter");
selector!(PROFILE_LOCATION, "li[itemprop='homeLocation'] span");
selector!(PROFILE_COMPANY, "li[itemprop='worksFor'] span");
selector!(PROFILE_WEBSITE, "li[itemprop='url'] a");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepoInfo {
    pub owner: String,
    pub repo: String,
    pub description: String,
    /// Star count without thousands separators, `"0"` when absent
    pub stars: String,
    pub forks: String,
    pub language: Option<String>,
    pub topics: Vec<String>,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendingRepo {
    pub rank: usize,
    pub owner: String,
    pub name: String,
    pub url: String,
    pub description: String,
    pub language: Option<String>,
    pub stars: String,
    pub forks: String,
    /// e.g. `"1,024 stars today"`
    pub period_stars: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendingDeveloper {
    pub rank: usize,
    pub username: String,
    pub name: String,
    pub avatar: Option<String>,
    pub url: String,
    pub popular_repo: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub username: String,
    pub name: String,
    pub bio: String,
    pub avatar: Option<String>,
    pub followers: String,
    pub following: String,
    pub repositories: String,
    pub location: Option<String>,
    pub company: Option<String>,
    pub website: Option<String>,
    pub url: String,
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn text_of(scope: ElementRef<'_>, selector: &Selector) -> Option<String> {
    scope
        .select(selector)
        .next()
        .map(|el| collapse_whitespace(&el.text().collect::<String>()))
        .filter(|t| !t.is_empty())
}

fn doc_text(document: &Html, selector: &Selector) -> Option<String> {
    text_of(document.root_element(), selector)
}

fn doc_attr(document: &Html, selector: &Selector, attr: &str) -> Option<String> {
    document
        .select(selector)
        .find_map(|el| el.value().attr(attr))
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn strip_separators(count: &str) -> String {
    count.replace(',', "").trim().to_string()
}

fn absolute(base: &Url, href: &str) -> String {
    base.join(href)
        .map(String::from)
        .unwrap_or_else(|_| href.to_string())
}

/// Parses a repository page (`/<owner>/<repo>`).
pub fn parse_repo(html: &str, owner: &str, repo: &str, page_url: &Url) -> RepoInfo {
    let document = Html::parse_document(html);

    let count = |selector: &Selector| {
        doc_attr(&document, selector, "title")
            .or_else(|| doc_text(&document, selector))
            .map(|c| strip_separators(&c))
            .unwrap_or_else(|| "0".to_string())
    };

    RepoInfo {
        owner: owner.to_string(),
        repo: repo.to_string(),
        description: doc_text(&document, &REPO_DESCRIPTION).unwrap_or_default(),
        stars: count(&*REPO_STARS),
        forks: count(&*REPO_FORKS),
        language: doc_text(&document, &REPO_LANGUAGE),
        topics: document
            .select(&REPO_TOPICS)
            .map(|el| collapse_whitespace(&el.text().collect::<String>()))
            .filter(|t| !t.is_empty())
            .collect(),
        url: page_url.to_string(),
    }
}

/// Parses the repository trending page (`/trending[/<language>]`).
pub fn parse_trending_repos(html: &str, base: &Url) -> Vec<TrendingRepo> {
    let document = Html::parse_document(html);

    document
        .select(&TRENDING_ROW)
        .filter_map(|row| {
            let href = row
                .select(&TRENDING_REPO_LINK)
                .next()?
                .value()
                .attr("href")?;
            let mut parts = href.trim_matches('/').splitn(2, '/');
            let owner = parts.next()?.to_string();
            let name = parts.next()?.to_string();

            Some(TrendingRepo {
                rank: 0,
                url: absolute(base, href),
                owner,
                name,
                description: text_of(row, &TRENDING_REPO_DESCRIPTION).unwrap_or_default(),
                language: text_of(row, &REPO_LANGUAGE),
                stars: text_of(row, &TRENDING_STARS)
                    .map(|s| strip_separators(&s))
                    .unwrap_or_else(|| "0".to_string()),
                forks: text_of(row, &TRENDING_FORKS)
                    .map(|s| strip_separators(&s))
                    .unwrap_or_else(|| "0".to_string()),
                period_stars: text_of(row, &TRENDING_PERIOD_STARS).unwrap_or_default(),
            })
        })
        .enumerate()
        .map(|(i, repo)| TrendingRepo { rank: i + 1, ..repo })
        .collect()
}

/// Parses the developer trending page (`/trending/developers[/<language>]`).
pub fn parse_trending_developers(html: &str, base: &Url) -> Vec<TrendingDeveloper> {
    let document = Html::parse_document(html);

    document
        .select(&TRENDING_ROW)
        .filter_map(|row| {
            let link = row.select(&DEVELOPER_LINK).next()?;
            let href = link.value().attr("href")?;
            let username = text_of(row, &DEVELOPER_LOGIN)
                .unwrap_or_else(|| href.trim_matches('/').to_string());
            let name = collapse_whitespace(&link.text().collect::<String>());

            Some(TrendingDeveloper {
                rank: 0,
                name: if name.is_empty() { username.clone() } else { name },
                username,
                avatar: row
                    .select(&AVATAR)
                    .next()
                    .and_then(|img| img.value().attr("src"))
                    .map(str::to_string),
                url: absolute(base, href),
                popular_repo: text_of(row, &DEVELOPER_POPULAR_REPO),
            })
        })
        .enumerate()
        .map(|(i, dev)| TrendingDeveloper { rank: i + 1, ..dev })
        .collect()
}

/// Parses a user profile page (`/<username>`).
pub fn parse_user(html: &str, username: &str, page_url: &Url) -> UserProfile {
    let document = Html::parse_document(html);
    let count = |selector: &Selector| {
        doc_attr(&document, selector, "title")
            .or_else(|| doc_text(&document, selector))
            .unwrap_or_else(|| "0".to_string())
    };

    UserProfile {
        username: doc_text(&document, &PROFILE_LOGIN).unwrap_or_else(|| username.to_string()),
        name: doc_text(&document, &PROFILE_NAME).unwrap_or_default(),
        bio: doc_attr(&document, &PROFILE_BIO, "data-bio-text")
            .or_else(|| doc_text(&document, &PROFILE_BIO))
            .unwrap_or_default(),
        avatar: doc_attr(&document, &AVATAR, "src"),
        followers: doc_text(&document, &PROFILE_FOLLOWERS).unwrap_or_else(|| "0".to_string()),
        following: doc_text(&document, &PROFILE_FOLLOWING).unwrap_or_else(|| "0".to_string()),
        repositories: count(&*PROFILE_REPOSITORIES),
        location: doc_text(&document, &PROFILE_LOCATION),
        company: doc_text(&document, &PROFILE_COMPANY),
        website: doc_attr(&document, &PROFILE_WEBSITE, "href"),
        url: page_url.to_string(),
    }
}
