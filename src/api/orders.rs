use super::{Auth, ApiClient, Page, PageRequest};
use crate::domain::aggregates::{OrderRecord, OrderRequest};
use crate::Result;

impl ApiClient {
    pub async fn place_order(&self, order: &OrderRequest) -> Result<OrderRecord> {
        let req = self.http.post(self.url(&["orders", "create"])).json(order);
        self.send(req, Auth::Required).await
    }

    pub async fn orders_by_user(&self, user_id: &str, page: PageRequest) -> Result<Page<OrderRecord>> {
        let req = self.http.get(self.url(&["orders", "find", "user-id", user_id])).query(&page);
        self.send(req, Auth::Required).await
    }

    pub async fn all_orders(&self, page: PageRequest) -> Result<Page<OrderRecord>> {
        let req = self.http.get(self.url(&["orders", "find", "all"])).query(&page);
        self.send(req, Auth::Required).await
    }
}
