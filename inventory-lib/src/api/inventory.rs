//! Inventory CRUD operations.

use reqwest::Method;
use serde::Deserialize;
use serde::Serialize;
use serde_json::json;

use super::CREATED_RANGE;
use super::OK_RANGE;
use super::StatusMessage;
use super::routes;
use crate::InventoryClient;
use crate::RequestBody;
use crate::error::ApiError;
use crate::error::Error;

/// An inventory owned by a user.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Inventory {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Payload for creating or updating an inventory.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
}

impl InventoryInput {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
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

    pub fn user_id(mut self, user_id: i64) -> Self {
        self.user_id = Some(user_id);
        self
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<serde_json::Value, Error> {
    serde_json::to_value(value).map_err(|e| ApiError::parse(e.to_string()).into())
}

impl InventoryClient {
    /// Lists the inventories of `user_id`.
    pub async fn list_inventories(&self, user_id: i64) -> Result<Vec<Inventory>, Error> {
        let body = RequestBody::Json(json!({ "userId": user_id }));
        let envelope = self.send(Method::POST, routes::INVENTORY_LIST, body, true).await?;
        Ok(envelope
            .ensure(200..201, "Error fetching inventory list")?
            .results()?)
    }

    /// Fetches one inventory.
    pub async fn get_inventory(&self, id: i64) -> Result<Inventory, Error> {
        let envelope = self
            .send(Method::GET, &routes::inventory_details(id), RequestBody::Empty, true)
            .await?;
        Ok(envelope
            .ensure(200..201, "Error fetching inventory details")?
            .results()?)
    }

    /// Creates an inventory.
    pub async fn create_inventory(&self, input: &InventoryInput) -> Result<StatusMessage, Error> {
        let body = RequestBody::Json(to_json(input)?);
        let envelope = self.send(Method::POST, routes::INVENTORY_ADD, body, true).await?;
        Ok(envelope
            .ensure(CREATED_RANGE, "Failed to create Inventory!")?
            .into_status_message("Inventory created"))
    }

    /// Updates an inventory; `input.id` selects the record.
    pub async fn update_inventory(&self, input: &InventoryInput) -> Result<StatusMessage, Error> {
        if input.id.is_none() {
            return Err(Error::config("update_inventory requires an id"));
        }
        let body = RequestBody::Json(to_json(input)?);
        let envelope = self.send(Method::PUT, routes::INVENTORY_UPDATE, body, true).await?;
        Ok(envelope
            .ensure(OK_RANGE, "Failed to update Inventory!")?
            .into_status_message("Inventory updated"))
    }

    /// Deletes an inventory.
    pub async fn delete_inventory(&self, id: i64) -> Result<StatusMessage, Error> {
        let body = RequestBody::Json(json!({ "inventoryId": id }));
        let envelope = self.send(Method::POST, routes::INVENTORY_DELETE, body, true).await?;
        Ok(envelope
            .ensure(200..201, "Failed to delete Inventory!")?
            .into_status_message("Inventory deleted"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_serializes_camel_case() {
        let input = InventoryInput::new("Pantry").user_id(4).description("Dry goods");
        let value = serde_json::to_value(&input).unwrap();
        assert_eq!(
            value,
            json!({"name": "Pantry", "description": "Dry goods", "userId": 4})
        );
    }

    #[test]
    fn test_input_keeps_null_description() {
        let value = serde_json::to_value(InventoryInput::new("Pantry").id(2)).unwrap();
        assert_eq!(value, json!({"id": 2, "name": "Pantry", "description": null}));
    }
}
