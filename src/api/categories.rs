use reqwest::multipart::Form;
use serde_json::json;
use validator::Validate;

use super::{Auth, ApiClient, Upload};
use crate::domain::aggregates::Category;
use crate::forms::CategoryForm;
use crate::Result;

impl ApiClient {
    pub async fn categories(&self) -> Result<Vec<Category>> {
        let req = self.http.get(self.url(&["categories", "get", "all"]));
        self.send(req, Auth::Optional).await
    }

    pub async fn create_category(&self, form: &CategoryForm, image: Option<Upload>) -> Result<Category> {
        form.validate()?;
        let mut multipart = Form::new().text("name", form.name.clone());
        if let Some(image) = image {
            multipart = multipart.part("image", image.into_part()?);
        }
        let req = self.http.post(self.url(&["categories", "create"])).multipart(multipart);
        self.send(req, Auth::Required).await
    }

    pub async fn update_category(&self, id: &str, form: &CategoryForm) -> Result<Category> {
        form.validate()?;
        let req = self.http.patch(self.url(&["categories", "update", id])).json(&json!({ "name": form.name }));
        self.send(req, Auth::Required).await
    }

    pub async fn delete_category(&self, id: &str) -> Result<()> {
        let req = self.http.delete(self.url(&["categories", "delete", id]));
        self.send_empty(req, Auth::Required).await
    }
}
