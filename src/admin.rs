//! Admin back-office flows
//!
//! Paginated list / edit / delete cycles over users, products, categories and
//! orders. Each call is independent and goes straight to the backend.

use std::future::Future;

use tracing::info;

use crate::api::{ApiClient, Page, PageRequest, PublicationUpdate, Upload};
use crate::domain::aggregates::{Category, OrderRecord, Product, ProductQuery, SortOrder, UserSummary};
use crate::domain::value_objects::Role;
use crate::forms::CategoryForm;
use crate::Result;

/// Upper bound on pages walked by the `fetch_all_*` helpers.
const MAX_PAGES: usize = 500;

/// Walks a paginated listing from the first page until a short page.
pub async fn collect_pages<T, F, Fut>(page_size: u32, mut fetch: F) -> Result<Vec<T>>
where
    F: FnMut(PageRequest) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
{
    let mut request = PageRequest::first(page_size.max(1));
    let mut all = Vec::new();
    for _ in 0..MAX_PAGES {
        let page = fetch(request).await?;
        let last = page.is_last();
        all.extend(page.data);
        if last { break; }
        request = request.next();
    }
    Ok(all)
}

pub struct Admin<'a> {
    api: &'a ApiClient,
}

impl<'a> Admin<'a> {
    pub fn new(api: &'a ApiClient) -> Self { Self { api } }

    pub async fn list_users(&self, page: PageRequest) -> Result<Page<UserSummary>> { self.api.all_users(page).await }

    pub async fn list_products(&self, page: PageRequest) -> Result<Page<Product>> {
        let query = ProductQuery { created_at: Some(SortOrder::Desc), ..ProductQuery::page(page.limit, page.offset) };
        self.api.random_products(&query).await
    }

    pub async fn list_categories(&self) -> Result<Vec<Category>> { self.api.categories().await }

    pub async fn list_orders(&self, page: PageRequest) -> Result<Page<OrderRecord>> { self.api.all_orders(page).await }

    pub async fn fetch_all_users(&self, page_size: u32) -> Result<Vec<UserSummary>> {
        collect_pages(page_size, |page| self.list_users(page)).await
    }

    pub async fn fetch_all_orders(&self, page_size: u32) -> Result<Vec<OrderRecord>> {
        collect_pages(page_size, |page| self.list_orders(page)).await
    }

    pub async fn change_role(&self, user_id: &str, role: Role) -> Result<()> {
        self.api.change_role(user_id, role).await?;
        info!(%user_id, %role, "role changed");
        Ok(())
    }

    pub async fn authorize_user(&self, user_id: &str) -> Result<()> { self.api.authorize_user(user_id).await }

    pub async fn delete_user(&self, user_id: &str) -> Result<()> {
        self.api.delete_user(user_id).await?;
        info!(%user_id, "user deleted");
        Ok(())
    }

    pub async fn edit_product(&self, product_id: &str, update: PublicationUpdate) -> Result<Product> {
        self.api.update_product(product_id, update).await
    }

    pub async fn pause_product(&self, product_id: &str, paused: bool) -> Result<()> {
        self.api.pause_product(product_id, paused).await
    }

    pub async fn delete_product(&self, product_id: &str) -> Result<()> {
        self.api.delete_product(product_id).await?;
        info!(%product_id, "product deleted");
        Ok(())
    }

    pub async fn create_category(&self, form: &CategoryForm, image: Option<Upload>) -> Result<Category> {
        self.api.create_category(form, image).await
    }

    pub async fn edit_category(&self, category_id: &str, form: &CategoryForm) -> Result<Category> {
        self.api.update_category(category_id, form).await
    }

    pub async fn delete_category(&self, category_id: &str) -> Result<()> {
        self.api.delete_category(category_id).await?;
        info!(%category_id, "category deleted");
        Ok(())
    }
}
