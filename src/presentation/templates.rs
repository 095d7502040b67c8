use askama::Template;
use crate::domain::entities::RepositoryPage;
use crate::presentation::flash::Flash;

/// 仪表盘 - 仓库列表
#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub username: String,
    pub flashes: Vec<Flash>,
    pub repositories: Vec<RepoItem>,
    pub search: String,
    pub page: u32,
    pub total_pages: u32,
    pub total: u64,
    pub prev_href: Option<String>,
    pub next_href: Option<String>,
}

#[derive(Clone)]
pub struct RepoItem {
    pub id: i64,
    pub name: String,
    pub url: String,
    pub last_synced: String,
}

impl DashboardTemplate {
    pub fn new(username: String, page: RepositoryPage, flashes: Vec<Flash>) -> Self {
        let pagination = page.pagination;
        let repositories = page
            .items
            .into_iter()
            .map(|r| RepoItem {
                id: r.id,
                name: r.name,
                url: r.url,
                last_synced: r.synced_at.format("%Y-%m-%d %H:%M").to_string(),
            })
            .collect();

        Self {
            username,
            flashes,
            repositories,
            prev_href: pagination.prev_page().map(|p| page_href(&page.search, p)),
            next_href: pagination.next_page().map(|p| page_href(&page.search, p)),
            search: page.search,
            page: pagination.page(),
            total_pages: pagination.total_pages(),
            total: pagination.total(),
        }
    }
}

/// 翻页链接，保留搜索词
fn page_href(search: &str, page: u32) -> String {
    let mut query = url::form_urlencoded::Serializer::new(String::new());
    if !search.is_empty() {
        query.append_pair("q", search);
    }
    query.append_pair("page", &page.to_string());
    format!("/dashboard?{}", query.finish())
}

/// 登录失败 / 已退出 落地页
#[derive(Template)]
#[template(path = "landing.html")]
pub struct LandingTemplate {
    pub heading: String,
    pub flashes: Vec<Flash>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::MirroredRepository;
    use crate::domain::value_objects::Pagination;

    #[test]
    fn page_links_keep_search_term() {
        assert_eq!(page_href("", 2), "/dashboard?page=2");
        assert_eq!(page_href("my repo&x", 3), "/dashboard?q=my+repo%26x&page=3");
    }

    #[test]
    fn renders_rows_and_escapes_names() {
        let page = RepositoryPage {
            items: vec![MirroredRepository::new(
                "<script>".to_string(),
                "https://github.com/alice/x".to_string(),
            )],
            pagination: Pagination::new(2, 1, 3),
            search: "s".to_string(),
        };
        let html = DashboardTemplate::new("alice".to_string(), page, vec![])
            .render()
            .unwrap();

        assert!(!html.contains("<script>"));
        assert!(html.contains("q=s"));
        assert!(html.contains("page=1"));
        assert!(html.contains("page=3"));
        assert!(html.contains("第 2 / 3 页"));
    }
}
