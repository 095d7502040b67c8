use std::sync::Arc;
use crate::domain::entities::RepositoryPage;
use crate::domain::value_objects::Pagination;
use crate::ports::repository::MirrorPort;
use crate::shared::result::Result;

/// 仪表盘查询：按名称子串过滤后分页
pub struct DashboardQuery {
    mirror: Arc<dyn MirrorPort>,
    page_size: u32,
}

impl DashboardQuery {
    pub fn new(mirror: Arc<dyn MirrorPort>, page_size: u32) -> Self {
        Self { mirror, page_size }
    }

    pub async fn page(&self, search: &str, requested_page: u32) -> Result<RepositoryPage> {
        let total = self.mirror.count_matching(search).await?;
        let pagination = Pagination::new(requested_page, self.page_size, total);
        let items = self
            .mirror
            .list_matching(search, pagination.page_size(), pagination.offset())
            .await?;

        Ok(RepositoryPage {
            items,
            pagination,
            search: search.to_string(),
        })
    }
}
