use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType};
use actix_web::{web, HttpResponse};
use common::requests::{export_file_name, ExportRequest};
use common::view;
use log::info;

use super::workbook::{self, PlanSheet};
use crate::error::ApiError;

const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// `POST /api/export`: `200` with the workbook as an attachment.
pub async fn process(payload: web::Json<ExportRequest>) -> Result<HttpResponse, ApiError> {
    let request = payload.into_inner();
    let (table, rows) = match (request.table_data, request.filtered_and_sorted_rows) {
        (Some(table), Some(rows)) => (table, rows),
        _ => {
            return Err(ApiError::Validation(
                "tableData and filteredAndSortedRows are required".to_string(),
            ))
        }
    };
    let (volume, amount) = view::totals(&rows);
    let total_volume = request.total_volume.unwrap_or(volume);
    let total_amount = request.total_amount.unwrap_or(amount);

    let file_name = export_file_name(&table.date);
    let row_count = rows.len();
    let date = table.date;
    let bytes = tokio::task::spawn_blocking(move || {
        workbook::build(&PlanSheet {
            date: &date,
            rows: &rows,
            total_volume,
            total_amount,
        })
    })
    .await
    .map_err(|e| ApiError::Internal(format!("export task failed: {}", e)))??;

    info!("Exported {} rows as {} ({} bytes)", row_count, file_name, bytes.len());
    Ok(HttpResponse::Ok()
        .content_type(XLSX_MIME)
        .insert_header(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(file_name)],
        })
        .body(bytes))
}
