pub mod export_xlsx;

pub use export_xlsx::predictions_workbook;
