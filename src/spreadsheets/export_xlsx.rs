use crate::domain::PredictionRecord;
use crate::errors::ServerError;
use rust_xlsxwriter::{Format, Workbook, XlsxError};

const HEADERS: [&str; 11] = [
    "Created (UTC)",
    "Property Type",
    "Location",
    "City",
    "Area (sqft)",
    "Beds",
    "Baths",
    "Furnishing",
    "Age of Listing (days)",
    "Predicted Rent (AED)",
    "Id",
];

fn xlsx_err(what: &str) -> impl Fn(XlsxError) -> ServerError + '_ {
    move |e| ServerError::XlsxError(format!("Failed to write {what}: {e}"))
}

/// Workbook bytes with one row per record, in the given order.
pub fn predictions_workbook(records: &[PredictionRecord]) -> Result<Vec<u8>, ServerError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    let bold = Format::new().set_bold();
    let money = Format::new().set_num_format("#,##0.00");

    for (col, header) in HEADERS.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, *header, &bold)
            .map_err(xlsx_err("header"))?;
    }

    for (i, rec) in records.iter().enumerate() {
        let r = (i + 1) as u32;

        worksheet
            .write_string(r, 0, rec.created_label())
            .map_err(xlsx_err("created date"))?;
        worksheet
            .write_string(r, 1, &rec.property_type)
            .map_err(xlsx_err("property type"))?;
        worksheet
            .write_string(r, 2, &rec.location)
            .map_err(xlsx_err("location"))?;
        worksheet
            .write_string(r, 3, &rec.city)
            .map_err(xlsx_err("city"))?;
        worksheet
            .write_number(r, 4, rec.area)
            .map_err(xlsx_err("area"))?;
        worksheet
            .write_number(r, 5, rec.bedrooms as f64)
            .map_err(xlsx_err("bedrooms"))?;
        worksheet
            .write_number(r, 6, rec.bathrooms as f64)
            .map_err(xlsx_err("bathrooms"))?;
        worksheet
            .write_string(r, 7, &rec.furnishing)
            .map_err(xlsx_err("furnishing"))?;
        worksheet
            .write_number(r, 8, rec.age_of_listing as f64)
            .map_err(xlsx_err("listing age"))?;
        worksheet
            .write_number_with_format(r, 9, rec.predicted_rent, &money)
            .map_err(xlsx_err("predicted rent"))?;
        worksheet
            .write_number(r, 10, rec.id as f64)
            .map_err(xlsx_err("id"))?;
    }

    worksheet.autofit();

    workbook
        .save_to_buffer()
        .map_err(|e| ServerError::XlsxError(format!("Failed to save workbook: {e}")))
}
