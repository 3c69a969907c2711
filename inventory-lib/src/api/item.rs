//! Inventory item CRUD operations.
//!
//! Create and update send `multipart/form-data` so an image file can ride
//! along with the item fields.

use reqwest::Method;
use serde::Deserialize;
use serde::Serialize;
use serde_json::json;

use super::CREATED_RANGE;
use super::OK_RANGE;
use super::StatusMessage;
use super::routes;
use crate::FormField;
use crate::InventoryClient;
use crate::RequestBody;
use crate::error::Error;

/// An item stored in an inventory.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub id: i64,
    pub inventory_id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub quantity: i64,
    #[serde(default)]
    pub image: Option<String>,
}

/// Image attached to an item form.
#[derive(Debug, Clone)]
pub enum ItemImage {
    /// An already uploaded image, referenced by URL.
    Url(String),
    /// A new image upload.
    File { file_name: String, bytes: Vec<u8> },
}

/// Payload for creating or updating an item.
#[derive(Debug, Clone, Default)]
pub struct InventoryItemInput {
    pub id: Option<i64>,
    pub inventory_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub quantity: i64,
    pub image: Option<ItemImage>,
}

impl InventoryItemInput {
    pub fn new(inventory_id: i64, name: impl Into<String>, quantity: i64) -> Self {
        Self {
            inventory_id,
            name: name.into(),
            quantity,
            ..Default::default()
        }
    }

    pub fn id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn image(mut self, image: ItemImage) -> Self {
        self.image = Some(image);
        self
    }

    /// Converts the input into form fields. Absent optional fields are
    /// left out of the form.
    pub fn to_form(&self) -> Vec<FormField> {
        let mut fields = Vec::new();
        if let Some(id) = self.id {
            fields.push(FormField::text("id", id.to_string()));
        }
        fields.push(FormField::text("inventoryId", self.inventory_id.to_string()));
        fields.push(FormField::text("name", self.name.clone()));
        if let Some(description) = &self.description {
            fields.push(FormField::text("description", description.clone()));
        }
        fields.push(FormField::text("quantity", self.quantity.to_string()));
        match &self.image {
            Some(ItemImage::Url(url)) => fields.push(FormField::text("image", url.clone())),
            Some(ItemImage::File { file_name, bytes }) => {
                fields.push(FormField::file("image", file_name.clone(), bytes.clone()))
            }
            None => {}
        }
        fields
    }
}

impl InventoryClient {
    /// Lists the items of an inventory.
    pub async fn list_items(&self, user_id: i64, inventory_id: i64) -> Result<Vec<InventoryItem>, Error> {
        let body = RequestBody::Json(json!({ "userId": user_id, "inventoryId": inventory_id }));
        let envelope = self.send(Method::POST, routes::ITEM_LIST, body, true).await?;
        Ok(envelope
            .ensure(200..201, "Error fetching inventory item list")?
            .results()?)
    }

    /// Fetches one item.
    pub async fn get_item(&self, id: i64, user_id: i64) -> Result<InventoryItem, Error> {
        let body = RequestBody::Json(json!({ "userId": user_id }));
        let envelope = self
            .send(Method::POST, &routes::item_details(id), body, true)
            .await?;
        Ok(envelope
            .ensure(200..201, "Error fetching inventory item details")?
            .results()?)
    }

    /// Creates an item.
    pub async fn create_item(&self, input: &InventoryItemInput) -> Result<StatusMessage, Error> {
        let body = RequestBody::Form(input.to_form());
        let envelope = self.send(Method::POST, routes::ITEM_ADD, body, true).await?;
        Ok(envelope
            .ensure(CREATED_RANGE, "Failed to create Inventory item!")?
            .into_status_message("Inventory item created"))
    }

    /// Updates an item; `input.id` selects the record.
    pub async fn update_item(&self, input: &InventoryItemInput) -> Result<StatusMessage, Error> {
        if input.id.is_none() {
            return Err(Error::config("update_item requires an id"));
        }
        let body = RequestBody::Form(input.to_form());
        let envelope = self.send(Method::POST, routes::ITEM_UPDATE, body, true).await?;
        Ok(envelope
            .ensure(OK_RANGE, "Failed to update Inventory item!")?
            .into_status_message("Inventory item updated"))
    }

    /// Deletes an item.
    pub async fn delete_item(&self, id: i64) -> Result<StatusMessage, Error> {
        let envelope = self
            .send(Method::DELETE, &routes::item_delete(id), RequestBody::Empty, true)
            .await?;
        Ok(envelope
            .ensure(200..201, "Failed to delete Inventory item!")?
            .into_status_message("Inventory item deleted"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FormValue;

    fn names(fields: &[FormField]) -> Vec<&str> {
        fields.iter().map(|f| f.name.as_str()).collect()
    }

    #[test]
    fn test_form_skips_absent_fields() {
        let form = InventoryItemInput::new(3, "Bolts", 120).to_form();
        assert_eq!(names(&form), ["inventoryId", "name", "quantity"]);
    }

    #[test]
    fn test_form_with_file() {
        let form = InventoryItemInput::new(3, "Bolts", 120)
            .id(8)
            .description("M6")
            .image(ItemImage::File {
                file_name: "bolts.png".to_string(),
                bytes: vec![1, 2, 3],
            })
            .to_form();
        assert_eq!(names(&form), ["id", "inventoryId", "name", "description", "quantity", "image"]);
        assert!(matches!(
            &form[5].value,
            FormValue::File { file_name, .. } if file_name == "bolts.png"
        ));
    }

    #[test]
    fn test_item_deserializes_camel_case() {
        let item: InventoryItem = serde_json::from_value(json!({
            "id": 1, "inventoryId": 2, "name": "Bolts", "quantity": 5, "image": "/img/1.png"
        }))
        .unwrap();
        assert_eq!(item.inventory_id, 2);
        assert_eq!(item.description, None);
    }
}
