//! Layout of the exported plan:
//!
//! | row    | content                                                       |
//! |--------|---------------------------------------------------------------|
//! | 1      | title merged across A..G                                      |
//! | 2      | column headers                                                |
//! | 3..    | one line per row: index, text fields, rounded volume/amount   |
//! | last   | `Total:` with the rounded totals                              |

use common::date;
use common::model::row::Row;
use common::view::display_round;
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook, XlsxError};

pub const SHEET_NAME: &str = "Plan";

pub const HEADERS: [&str; 7] = [
    "No.",
    "Forest unit",
    "Buyer",
    "Product",
    "Species",
    "Estimated volume (m³)",
    "Estimated amount excl. VAT (UAH)",
];

pub const TOTAL_LABEL: &str = "Total:";

const COLUMN_WIDTHS: [f64; 7] = [8.0, 15.0, 35.0, 25.0, 15.0, 25.0, 30.0];

const TITLE_FILL: u32 = 0x2DDB2D;
const HEADER_FILL: u32 = 0x00B047;
const DATA_FILL: u32 = 0xEFF700;

pub struct PlanSheet<'a> {
    pub date: &'a str,
    pub rows: &'a [Row],
    pub total_volume: f64,
    pub total_amount: f64,
}

pub fn title(date: &str) -> String {
    if date.trim().is_empty() {
        "Estimated sales plan".to_string()
    } else {
        format!("Estimated sales plan for {}", date::display(date))
    }
}

fn cell_format(fill: u32) -> Format {
    Format::new()
        .set_background_color(Color::RGB(fill))
        .set_border(FormatBorder::Thin)
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
}

/// Renders the sheet and returns the finished file.
pub fn build(sheet: &PlanSheet<'_>) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;
    for (col, width) in COLUMN_WIDTHS.iter().enumerate() {
        worksheet.set_column_width(col as u16, *width)?;
    }

    let title_format = Format::new()
        .set_bold()
        .set_font_size(22)
        .set_background_color(Color::RGB(TITLE_FILL))
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter);
    worksheet.set_row_height(0, 36)?;
    worksheet.merge_range(0, 0, 0, 6, &title(sheet.date), &title_format)?;

    let header_format = cell_format(HEADER_FILL).set_bold().set_text_wrap();
    for (col, label) in HEADERS.iter().enumerate() {
        worksheet.write_string_with_format(1, col as u16, *label, &header_format)?;
    }

    let data_format = cell_format(DATA_FILL);
    for (index, row) in sheet.rows.iter().enumerate() {
        let line = 2 + index as u32;
        worksheet.write_number_with_format(line, 0, (index + 1) as f64, &data_format)?;
        worksheet.write_string_with_format(line, 1, &row.forest, &data_format)?;
        worksheet.write_string_with_format(line, 2, &row.buyer, &data_format)?;
        worksheet.write_string_with_format(line, 3, &row.product, &data_format)?;
        worksheet.write_string_with_format(line, 4, &row.species, &data_format)?;
        worksheet.write_number_with_format(line, 5, display_round(row.volume), &data_format)?;
        worksheet.write_number_with_format(line, 6, display_round(row.amount), &data_format)?;
    }

    let totals_format = cell_format(HEADER_FILL).set_bold();
    let totals = 2 + sheet.rows.len() as u32;
    for col in 0..4 {
        worksheet.write_blank(totals, col, &totals_format)?;
    }
    worksheet.write_string_with_format(totals, 4, TOTAL_LABEL, &totals_format)?;
    worksheet.write_number_with_format(totals, 5, display_round(sheet.total_volume), &totals_format)?;
    worksheet.write_number_with_format(totals, 6, display_round(sheet.total_amount), &totals_format)?;

    workbook.save_to_buffer()
}
