use reqwest::multipart::Form;
use serde_json::json;
use validator::Validate;

use super::{Auth, ApiClient, Page, Upload};
use crate::domain::aggregates::{Product, ProductQuery};
use crate::forms::PublicationForm;
use crate::Result;

/// Listing fields plus new photos, sent as multipart.
#[derive(Clone, Debug)]
pub struct PublicationUpdate {
    pub form: PublicationForm,
    pub photos: Vec<Upload>,
}

impl PublicationUpdate {
    fn into_multipart(self) -> Result<Form> {
        let PublicationUpdate { form, photos } = self;
        let mut multipart = Form::new()
            .text("name", form.name)
            .text("description", form.description)
            .text("price", form.price.amount().to_string())
            .text("stock", form.stock.to_string())
            .text("categoryId", form.category_id);
        for photo in photos {
            multipart = multipart.part("photos", photo.into_part()?);
        }
        Ok(multipart)
    }
}

impl ApiClient {
    pub async fn random_products(&self, query: &ProductQuery) -> Result<Page<Product>> {
        let req = self.http.get(self.url(&["products", "get-all", "random"])).query(query);
        self.send(req, Auth::Optional).await
    }

    pub async fn product(&self, id: &str) -> Result<Product> {
        let req = self.http.get(self.url(&["products", "get", "id", id]));
        self.send(req, Auth::Optional).await
    }

    pub async fn products_by_category(&self, category_id: &str, query: &ProductQuery) -> Result<Page<Product>> {
        let req = self.http.get(self.url(&["products", "get-all", "category", category_id])).query(query);
        self.send(req, Auth::Optional).await
    }

    pub async fn search_products(&self, term: &str, query: &ProductQuery) -> Result<Page<Product>> {
        let req = self.http.get(self.url(&["products", "get", "name", term])).query(query);
        self.send(req, Auth::Optional).await
    }

    /// Publications owned by one seller.
    pub async fn products_by_user(&self, user_id: &str, query: &ProductQuery) -> Result<Page<Product>> {
        let req = self.http.get(self.url(&["products", "get-all", "user", user_id])).query(query);
        self.send(req, Auth::Optional).await
    }

    pub async fn create_product(&self, publication: PublicationUpdate) -> Result<Product> {
        publication.form.validate()?;
        let req = self.http.post(self.url(&["products", "create"])).multipart(publication.into_multipart()?);
        self.send(req, Auth::Required).await
    }

    pub async fn update_product(&self, id: &str, publication: PublicationUpdate) -> Result<Product> {
        publication.form.validate()?;
        let req = self.http.patch(self.url(&["products", "update", id])).multipart(publication.into_multipart()?);
        self.send(req, Auth::Required).await
    }

    pub async fn pause_product(&self, id: &str, paused: bool) -> Result<()> {
        let req = self.http.post(self.url(&["products", "update", "pause"])).json(&json!({ "id": id, "paused": paused }));
        self.send_empty(req, Auth::Required).await
    }

    pub async fn delete_product(&self, id: &str) -> Result<()> {
        let req = self.http.delete(self.url(&["products", "delete"])).json(&json!({ "id": id }));
        self.send_empty(req, Auth::Required).await
    }

    pub async fn delete_product_photo(&self, product_id: &str, photo_id: &str) -> Result<()> {
        let req = self.http.delete(self.url(&["products", "delete", product_id, "photo", photo_id]));
        self.send_empty(req, Auth::Required).await
    }
}
