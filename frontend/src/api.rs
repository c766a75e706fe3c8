//! Calls to the `/api` endpoints used by the plan editor and the reference
//! panel. Failures are turned into a user-readable message, taken from the
//! server's `{"error"}` body when there is one.

use std::cell::Cell;
use std::rc::Rc;

use gloo_net::http::{Request, Response};
use gloo_timers::callback::Timeout;
use serde::de::DeserializeOwned;
use web_sys::AbortController;

use common::model::purchase::{Purchase, PurchaseKey};
use common::model::reference::{normalize_names, ReferenceKind, ReferenceName};
use common::model::table::PlanTable;
use common::requests::{
    DeleteTableRequest, DeleteTableRowRequest, ExportRequest, NameRequest, NewPurchaseRequest,
    SaveTablesRequest,
};
use common::responses::{ErrorBody, SaveReport, SavedTable};

/// Initial load is abandoned after this long.
pub const LOAD_TIMEOUT_MS: u32 = 30_000;

/// Reference lists the editor needs to render pickers and fill rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct References {
    pub forests: Vec<String>,
    pub products: Vec<String>,
    pub species: Vec<String>,
    pub purchases: Vec<Purchase>,
}

impl References {
    pub fn names(&self, kind: ReferenceKind) -> &[String] {
        match kind {
            ReferenceKind::Forest => &self.forests,
            ReferenceKind::Product => &self.products,
            ReferenceKind::Species => &self.species,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Workspace {
    pub tables: Vec<PlanTable>,
    pub references: References,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadError {
    TimedOut,
    Failed(String),
}

impl LoadError {
    pub fn message(&self) -> String {
        match self {
            LoadError::TimedOut => format!(
                "The server did not answer within {} seconds.",
                LOAD_TIMEOUT_MS / 1000
            ),
            LoadError::Failed(message) => format!("Loading failed: {}", message),
        }
    }
}

async fn failure(response: Response) -> String {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    match serde_json::from_str::<ErrorBody>(&text) {
        Ok(body) => body.error,
        Err(_) if text.trim().is_empty() => format!("HTTP {}", status),
        Err(_) => text,
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, String> {
    if !response.ok() {
        return Err(failure(response).await);
    }
    response.json::<T>().await.map_err(|e| e.to_string())
}

async fn expect_ok(response: Response) -> Result<(), String> {
    if response.ok() {
        Ok(())
    } else {
        Err(failure(response).await)
    }
}

/// Loads every table and reference list, aborting all requests once
/// [`LOAD_TIMEOUT_MS`] has passed.
pub async fn load_workspace() -> Result<Workspace, LoadError> {
    let controller = AbortController::new()
        .map_err(|_| LoadError::Failed("abort controller unavailable".into()))?;
    let timed_out = Rc::new(Cell::new(false));
    let timeout = {
        let controller = controller.clone();
        let timed_out = Rc::clone(&timed_out);
        Timeout::new(LOAD_TIMEOUT_MS, move || {
            timed_out.set(true);
            controller.abort();
        })
    };

    let signal = controller.signal();
    let result: Result<Workspace, String> = async {
        let tables = fetch::<Vec<PlanTable>>("/api/tables", Some(&signal)).await?;
        let references = fetch_references(Some(&signal)).await?;
        Ok(Workspace { tables, references })
    }
    .await;
    timeout.cancel();

    result.map_err(|message| {
        if timed_out.get() {
            LoadError::TimedOut
        } else {
            LoadError::Failed(message)
        }
    })
}

pub async fn load_references() -> Result<References, String> {
    fetch_references(None).await
}

async fn fetch_references(signal: Option<&web_sys::AbortSignal>) -> Result<References, String> {
    let mut lists = Vec::with_capacity(ReferenceKind::ALL.len());
    for kind in ReferenceKind::ALL {
        let entries =
            fetch::<Vec<ReferenceName>>(&format!("/api/{}", kind.collection()), signal).await?;
        lists.push(normalize_names(entries));
    }
    let purchases = fetch::<Vec<Purchase>>("/api/purchases", signal).await?;
    let mut lists = lists.into_iter();
    Ok(References {
        forests: lists.next().unwrap_or_default(),
        products: lists.next().unwrap_or_default(),
        species: lists.next().unwrap_or_default(),
        purchases,
    })
}

async fn fetch<T: DeserializeOwned>(
    url: &str,
    signal: Option<&web_sys::AbortSignal>,
) -> Result<T, String> {
    let response = Request::get(url)
        .abort_signal(signal)
        .send()
        .await
        .map_err(|e| e.to_string())?;
    read_json(response).await
}

/// A failed batch save, with the tables the server wrote before failing.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveFailed {
    pub message: String,
    pub saved: Vec<SavedTable>,
}

impl From<String> for SaveFailed {
    fn from(message: String) -> Self {
        Self {
            message,
            saved: Vec::new(),
        }
    }
}

pub async fn save_tables(tables: Vec<PlanTable>) -> Result<SaveReport, SaveFailed> {
    let body = SaveTablesRequest {
        tables: Some(tables),
    };
    let response = Request::post("/api/tables")
        .json(&body)
        .map_err(|e| e.to_string())?
        .send()
        .await
        .map_err(|e| e.to_string())?;
    if response.ok() {
        return Ok(response.json::<SaveReport>().await.map_err(|e| e.to_string())?);
    }
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    Err(match serde_json::from_str::<ErrorBody>(&text) {
        Ok(body) => SaveFailed {
            message: body.error,
            saved: body.saved,
        },
        Err(_) => SaveFailed::from(format!("HTTP {}", status)),
    })
}

pub async fn delete_table(id: i64) -> Result<(), String> {
    let response = Request::delete("/api/tables/delete")
        .json(&DeleteTableRequest { id: Some(id) })
        .map_err(|e| e.to_string())?
        .send()
        .await
        .map_err(|e| e.to_string())?;
    expect_ok(response).await
}

pub async fn delete_table_row(table_id: i64, row_id: i64) -> Result<(), String> {
    let body = DeleteTableRowRequest {
        table_id: Some(table_id),
        row_id: Some(row_id),
    };
    let response = Request::delete("/api/tables/delete-row")
        .json(&body)
        .map_err(|e| e.to_string())?
        .send()
        .await
        .map_err(|e| e.to_string())?;
    expect_ok(response).await
}

/// Returns the workbook bytes.
pub async fn export(request: &ExportRequest) -> Result<Vec<u8>, String> {
    let response = Request::post("/api/export")
        .json(request)
        .map_err(|e| e.to_string())?
        .send()
        .await
        .map_err(|e| e.to_string())?;
    if !response.ok() {
        return Err(failure(response).await);
    }
    response.binary().await.map_err(|e| e.to_string())
}

pub async fn add_name(kind: ReferenceKind, name: String) -> Result<(), String> {
    let response = Request::post(&format!("/api/{}", kind.collection()))
        .json(&NameRequest { name })
        .map_err(|e| e.to_string())?
        .send()
        .await
        .map_err(|e| e.to_string())?;
    expect_ok(response).await
}

pub async fn delete_name(kind: ReferenceKind, name: String) -> Result<(), String> {
    let response = Request::delete(&format!("/api/{}", kind.collection()))
        .json(&NameRequest { name })
        .map_err(|e| e.to_string())?
        .send()
        .await
        .map_err(|e| e.to_string())?;
    expect_ok(response).await
}

pub async fn add_purchase(purchase: NewPurchaseRequest) -> Result<(), String> {
    let response = Request::post("/api/purchases")
        .json(&purchase)
        .map_err(|e| e.to_string())?
        .send()
        .await
        .map_err(|e| e.to_string())?;
    expect_ok(response).await
}

pub async fn delete_purchase(key: PurchaseKey) -> Result<(), String> {
    let response = Request::delete("/api/purchases")
        .json(&key)
        .map_err(|e| e.to_string())?
        .send()
        .await
        .map_err(|e| e.to_string())?;
    expect_ok(response).await
}
