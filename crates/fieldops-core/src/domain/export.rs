//! Export request domain entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Resource an export request covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportResource {
    Customers,
    Products,
    Orders,
    Visits,
}

impl ExportResource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportResource::Customers => "customers",
            ExportResource::Products => "products",
            ExportResource::Orders => "orders",
            ExportResource::Visits => "visits",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "customers" => Some(ExportResource::Customers),
            "products" => Some(ExportResource::Products),
            "orders" => Some(ExportResource::Orders),
            "visits" => Some(ExportResource::Visits),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    Csv,
    Json,
    Xlsx,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Xlsx => "xlsx",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "csv" => Some(ExportFormat::Csv),
            "json" => Some(ExportFormat::Json),
            "xlsx" => Some(ExportFormat::Xlsx),
            _ => None,
        }
    }
}

/// Export status. A plain flag updated by whichever worker picks the job up;
/// file generation itself lives outside this service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportStatus {
    Pending,
    Completed,
    Failed,
}

impl ExportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportStatus::Pending => "pending",
            ExportStatus::Completed => "completed",
            ExportStatus::Failed => "failed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(ExportStatus::Pending),
            "completed" => Some(ExportStatus::Completed),
            "failed" => Some(ExportStatus::Failed),
            _ => None,
        }
    }
}

impl Default for ExportStatus {
    fn default() -> Self {
        ExportStatus::Pending
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportRequest {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub requested_by: Uuid,

    pub resource: ExportResource,
    pub format: ExportFormat,
    pub status: ExportStatus,
    pub file_path: Option<String>,

    // Audit fields
    pub created_at: DateTime<Utc>,
    pub modified_at: Option<DateTime<Utc>>,
}

impl ExportRequest {
    pub fn new(
        tenant_id: Uuid,
        requested_by: Uuid,
        resource: ExportResource,
        format: ExportFormat,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            tenant_id,
            requested_by,
            resource,
            format,
            status: ExportStatus::Pending,
            file_path: None,
            created_at: Utc::now(),
            modified_at: None,
        }
    }
}
