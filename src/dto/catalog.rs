use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::category::Category;
use crate::domain::service::Service;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CategoryDto {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub icon: Option<String>,
}

impl From<Category> for CategoryDto {
    fn from(value: Category) -> Self {
        Self {
            id: value.id.get(),
            name: value.name.into_inner(),
            description: value.description,
            icon: value.icon,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ServiceDto {
    pub id: i32,
    pub provider_id: i32,
    pub category_id: i32,
    pub title: String,
    pub description: String,
    pub pricing_type: String,
    pub price: Decimal,
    pub duration_minutes: i32,
}

impl From<Service> for ServiceDto {
    fn from(value: Service) -> Self {
        Self {
            id: value.id.get(),
            provider_id: value.provider_id.get(),
            category_id: value.category_id.get(),
            title: value.title.into_inner(),
            description: value.description,
            pricing_type: value.pricing_type.as_str().to_string(),
            price: value.price.get(),
            duration_minutes: value.duration_minutes.get(),
        }
    }
}
