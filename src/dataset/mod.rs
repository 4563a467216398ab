// Dataset loading for OpenFace Action Unit output
//
// Reads the CSV written by OpenFace FeatureExtraction, keeps the continuous AU
// intensity channels (`AUxx_r`), labels each row from its filename and reduces
// the table to the happy/sad comparison set with per-column mean imputation.

mod csv_input;
mod loader;
mod table;

pub use csv_input::{parse_records, CsvRecord, CsvSyntaxError};
pub use loader::{
    is_intensity_feature, load, load_from_str, LoadDiagnostic, LoadError, LoadedDataset,
};
pub use table::{Imputation, MeasurementRow, MeasurementTable};
