use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, AsArray, Float64Array, StringArray};
use arrow::compute::cast;
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use super::model::{Dataset, OceanProximity, Record};
use crate::error::DashboardError;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the housing dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, one block group per line (the public file)
/// * `.json`    – `[{ "longitude": ..., "ocean_proximity": "...", ... }, ...]`
/// * `.parquet` – one column per field, numeric columns of any int/float type
///
/// Fails with [`DashboardError::Load`] on any read/parse problem, a missing
/// column or a non-finite value, and with [`DashboardError::EmptyDataset`]
/// when the file holds no rows.
pub fn load(path: &Path) -> crate::error::Result<Dataset> {
    let records = read_records(path).map_err(|e| {
        log::error!("Failed to load {}: {e:#}", path.display());
        DashboardError::load(path, e)
    })?;

    let dataset = Dataset::from_records(records, path.display().to_string())?;
    log::info!(
        "Loaded {} records from {} ({} location types)",
        dataset.len(),
        path.display(),
        dataset.proximities().len()
    );
    Ok(dataset)
}

fn read_records(path: &Path) -> Result<Vec<Record>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

/// Every column of the public file. `total_bedrooms` may hold blanks but the
/// column itself must be present.
const REQUIRED_COLUMNS: [&str; 10] = [
    "longitude",
    "latitude",
    "housing_median_age",
    "total_rooms",
    "total_bedrooms",
    "population",
    "households",
    "median_income",
    "median_house_value",
    "ocean_proximity",
];

/// Reject a header that lacks any required column, before any row is read.
fn check_columns<'a>(present: impl IntoIterator<Item = &'a str>) -> Result<()> {
    let present: Vec<&str> = present.into_iter().collect();
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|name| !present.contains(name))
        .collect();
    if !missing.is_empty() {
        bail!("missing column(s): {}", missing.join(", "));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Columns are matched by header name, so order does not matter and extra
/// columns are ignored.  A blank `total_bedrooms` cell becomes `None`.
fn load_csv(path: &Path) -> Result<Vec<Record>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .context("opening CSV")?;
    check_columns(reader.headers().context("reading CSV header")?.iter())?;

    let mut records = Vec::new();
    for (row_no, result) in reader.deserialize::<Record>().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        records.push(record);
    }
    Ok(records)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, as written by `df.to_json(orient='records')`.
/// Missing values appear as `null`.
fn load_json(path: &Path) -> Result<Vec<Record>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    serde_json::from_str(&text).context("parsing JSON records")
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one column per housing field.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`): integer and float columns are cast to
/// Float64, the category column may be Utf8 or LargeUtf8.
fn load_parquet(path: &Path) -> Result<Vec<Record>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    check_columns(builder.schema().fields().iter().map(|f| f.name().as_str()))?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;

        let longitude = float_column(&batch, "longitude")?;
        let latitude = float_column(&batch, "latitude")?;
        let housing_median_age = float_column(&batch, "housing_median_age")?;
        let total_rooms = float_column(&batch, "total_rooms")?;
        let total_bedrooms = float_column(&batch, "total_bedrooms")?;
        let population = float_column(&batch, "population")?;
        let households = float_column(&batch, "households")?;
        let median_income = float_column(&batch, "median_income")?;
        let median_house_value = float_column(&batch, "median_house_value")?;
        let ocean_proximity = string_column(&batch, "ocean_proximity")?;

        let offset = records.len();
        for row in 0..batch.num_rows() {
            let required = |col: &Float64Array, name: &str| -> Result<f64> {
                if col.is_null(row) {
                    bail!("Row {}: null '{name}'", offset + row);
                }
                Ok(col.value(row))
            };
            if ocean_proximity.is_null(row) {
                bail!("Row {}: null 'ocean_proximity'", offset + row);
            }

            records.push(Record {
                longitude: required(&longitude, "longitude")?,
                latitude: required(&latitude, "latitude")?,
                housing_median_age: required(&housing_median_age, "housing_median_age")?,
                total_rooms: required(&total_rooms, "total_rooms")?,
                total_bedrooms: (!total_bedrooms.is_null(row)).then(|| total_bedrooms.value(row)),
                population: required(&population, "population")?,
                households: required(&households, "households")?,
                median_income: required(&median_income, "median_income")?,
                median_house_value: required(&median_house_value, "median_house_value")?,
                ocean_proximity: OceanProximity::from(ocean_proximity.value(row)),
            });
        }
    }

    Ok(records)
}

// -- Parquet / Arrow helpers --

fn column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a Arc<dyn Array>> {
    let idx = batch
        .schema()
        .index_of(name)
        .map_err(|_| anyhow::anyhow!("Parquet file missing '{name}' column"))?;
    Ok(batch.column(idx))
}

/// Read any integer/float column as `Float64Array`.
fn float_column(batch: &RecordBatch, name: &str) -> Result<Float64Array> {
    let col = column(batch, name)?;
    if !col.data_type().is_numeric() {
        bail!("Column '{name}' is {:?}, expected a numeric type", col.data_type());
    }
    let casted = cast(col.as_ref(), &DataType::Float64)
        .with_context(|| format!("casting '{name}' to Float64"))?;
    Ok(casted.as_primitive::<arrow::datatypes::Float64Type>().clone())
}

fn string_column(batch: &RecordBatch, name: &str) -> Result<StringArray> {
    let col = column(batch, name)?;
    match col.data_type() {
        DataType::Utf8 | DataType::LargeUtf8 => {
            let casted = cast(col.as_ref(), &DataType::Utf8)
                .with_context(|| format!("casting '{name}' to Utf8"))?;
            Ok(casted.as_string::<i32>().clone())
        }
        other => bail!("Column '{name}' is {other:?}, expected a string type"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    const HEADER: &str = "longitude,latitude,housing_median_age,total_rooms,total_bedrooms,\
                          population,households,median_income,median_house_value,ocean_proximity";

    fn write_file(dir: &Path, name: &str, body: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(body.as_bytes()).unwrap();
        path
    }

    #[test]
    fn loads_public_csv_layout() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            dir.path(),
            "housing.csv",
            &format!(
                "{HEADER}\n\
                 -122.23,37.88,41.0,880.0,129.0,322.0,126.0,8.3252,452600.0,NEAR BAY\n\
                 -121.97,37.64,32.0,1283.0,,1015.0,313.0,3.1307,1.734e5,<1H OCEAN\n\
                 -117.03, 32.71 ,33,3126,627,2300,623,3.2596,106700,NEAR OCEAN\n"
            ),
        );

        let ds = load(&path).unwrap();
        assert_eq!(ds.len(), 3);
        let recs = ds.records();
        assert_eq!(recs[0].ocean_proximity, OceanProximity::NearBay);
        assert_eq!(recs[1].total_bedrooms, None);
        assert_eq!(recs[1].median_house_value, 173_400.0);
        assert_eq!(recs[2].latitude, 32.71);
        assert_eq!(recs[2].housing_median_age, 33.0);
    }

    #[test]
    fn column_order_does_not_matter() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            dir.path(),
            "reordered.csv",
            "ocean_proximity,median_house_value,median_income,latitude,longitude,\
             households,population,total_bedrooms,total_rooms,housing_median_age,extra\n\
             INLAND,61000,1.9,36.7,-119.8,120,400,90,500,20,x\n",
        );
        let ds = load(&path).unwrap();
        assert_eq!(ds.records()[0].ocean_proximity, OceanProximity::Inland);
        assert_eq!(ds.records()[0].longitude, -119.8);
    }

    #[test]
    fn missing_column_is_a_load_error() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            dir.path(),
            "broken.csv",
            "longitude,latitude\n-122.0,37.0\n",
        );
        assert!(matches!(load(&path), Err(DashboardError::Load { .. })));
    }

    #[test]
    fn header_without_required_columns_is_a_load_error() {
        let dir = TempDir::new().unwrap();
        let path = write_file(dir.path(), "short.csv", "longitude,latitude\n");
        let err = load(&path).unwrap_err();
        assert!(matches!(err, DashboardError::Load { .. }), "{err:?}");
        assert!(err.to_string().contains("median_income"));
    }

    #[test]
    fn non_numeric_value_is_a_load_error() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            dir.path(),
            "bad.csv",
            &format!("{HEADER}\n-122.23,37.88,41,880,129,322,126,lots,452600,NEAR BAY\n"),
        );
        let err = load(&path).unwrap_err();
        assert!(matches!(err, DashboardError::Load { .. }));
        assert!(err.to_string().contains("CSV row 0"));
    }

    #[test]
    fn nan_in_filter_column_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            dir.path(),
            "nan.csv",
            &format!("{HEADER}\n-122.23,37.88,41,880,129,322,126,NaN,452600,NEAR BAY\n"),
        );
        let err = load(&path).unwrap_err();
        assert!(matches!(err, DashboardError::Load { .. }));
        assert!(err.to_string().contains("median_income"));
    }

    #[test]
    fn header_only_csv_is_empty_dataset() {
        let dir = TempDir::new().unwrap();
        let path = write_file(dir.path(), "empty.csv", &format!("{HEADER}\n"));
        assert!(matches!(load(&path), Err(DashboardError::EmptyDataset { .. })));
    }

    #[test]
    fn missing_file_and_unknown_extension_fail() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            load(&dir.path().join("nope.csv")),
            Err(DashboardError::Load { .. })
        ));
        let path = write_file(dir.path(), "housing.xlsx", "");
        let err = load(&path).unwrap_err();
        assert!(err.to_string().contains("Unsupported file extension"));
    }

    #[test]
    fn loads_json_records() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            dir.path(),
            "housing.json",
            r#"[
                {"longitude": -122.25, "latitude": 37.85, "housing_median_age": 52,
                 "total_rooms": 1467, "total_bedrooms": null, "population": 496,
                 "households": 177, "median_income": 7.2574,
                 "median_house_value": 352100, "ocean_proximity": "NEAR BAY"}
            ]"#,
        );
        let ds = load(&path).unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.records()[0].total_bedrooms, None);
        assert_eq!(ds.records()[0].median_house_value, 352_100.0);
    }

    #[test]
    fn loads_parquet_with_integer_columns() {
        use arrow::array::Int64Array;
        use arrow::datatypes::{Field, Schema};
        use parquet::arrow::ArrowWriter;

        let schema = Arc::new(Schema::new(vec![
            Field::new("longitude", DataType::Float64, false),
            Field::new("latitude", DataType::Float64, false),
            Field::new("housing_median_age", DataType::Int64, false),
            Field::new("total_rooms", DataType::Int64, false),
            Field::new("total_bedrooms", DataType::Float64, true),
            Field::new("population", DataType::Int64, false),
            Field::new("households", DataType::Int64, false),
            Field::new("median_income", DataType::Float64, false),
            Field::new("median_house_value", DataType::Int64, false),
            Field::new("ocean_proximity", DataType::Utf8, false),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(Float64Array::from(vec![-122.23, -119.8])),
                Arc::new(Float64Array::from(vec![37.88, 36.7])),
                Arc::new(Int64Array::from(vec![41, 20])),
                Arc::new(Int64Array::from(vec![880, 500])),
                Arc::new(Float64Array::from(vec![Some(129.0), None])),
                Arc::new(Int64Array::from(vec![322, 400])),
                Arc::new(Int64Array::from(vec![126, 120])),
                Arc::new(Float64Array::from(vec![8.3252, 1.9])),
                Arc::new(Int64Array::from(vec![452_600, 61_000])),
                Arc::new(StringArray::from(vec!["NEAR BAY", "INLAND"])),
            ],
        )
        .unwrap();

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("housing.parquet");
        let file = File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load(&path).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.records()[0].median_house_value, 452_600.0);
        assert_eq!(ds.records()[1].total_bedrooms, None);
        assert_eq!(ds.records()[1].ocean_proximity, OceanProximity::Inland);
    }
}
