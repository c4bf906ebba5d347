use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{
    Array, AsArray, BooleanArray, Date32Array, Float32Array, Float64Array, Int32Array,
    Int64Array, StringArray, TimestampMicrosecondArray, TimestampMillisecondArray,
    TimestampNanosecondArray, TimestampSecondArray,
};
use arrow::datatypes::{DataType, TimeUnit};
use arrow::record_batch::RecordBatch;
use chrono::NaiveDate;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use super::model::{AthleteDataset, AthleteRecord, Gender};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load athlete records from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.parquet` / `.pq` – flat Parquet export, one row per athlete
/// * `.json`    – `[{ "athlete_id": "A001", ... }, ...]`
/// * `.csv`     – header row naming the record fields, one row per athlete
pub fn load_file(path: &Path) -> Result<AthleteDataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "parquet" | "pq" => load_parquet(path),
        "json" => load_json(path),
        "csv" => load_csv(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   {
///     "athlete_id": "A001",
///     "name": "Athlete_1",
///     "age": 16,
///     "gender": "M",
///     "sport": "Sprinting",
///     "state": "Kerala",
///     "score": 78.0,
///     "lat": 10.1234,
///     "lon": 76.5,
///     "date": "2025-07-15",
///     "verified": true,
///     "video_url": "",
///     "photo_url": "https://randomuser.me/api/portraits/men/0.jpg"
///   },
///   ...
/// ]
/// ```
///
/// `lat`, `lon`, `video_url` and `photo_url` may be omitted.
fn load_json(path: &Path) -> Result<AthleteDataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    read_json(&text)
}

fn read_json(text: &str) -> Result<AthleteDataset> {
    let rows: Vec<serde_json::Value> =
        serde_json::from_str(text).context("Expected a top-level JSON array of records")?;

    let mut records = Vec::with_capacity(rows.len());
    for (row, value) in rows.into_iter().enumerate() {
        let record: AthleteRecord = serde_json::from_value(value)
            .with_context(|| format!("Row {row}: invalid athlete record"))?;
        records.push(record);
    }

    Ok(AthleteDataset::from_records(records)?)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout:  header row naming the columns, one athlete per row.
/// `lat`, `lon`, `video_url` and `photo_url` columns may be absent or empty;
/// everything else is required.  Booleans accept the spreadsheet spellings
/// `True`/`False` as well as `true`/`false`.
fn load_csv(path: &Path) -> Result<AthleteDataset> {
    let reader = csv::Reader::from_path(path).context("opening CSV")?;
    read_csv(reader)
}

fn read_csv<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<AthleteDataset> {
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let col = |name: &str| -> Result<usize> {
        headers
            .iter()
            .position(|h| h == name)
            .with_context(|| format!("CSV missing '{name}' column"))
    };

    let id_idx = col("athlete_id")?;
    let name_idx = col("name")?;
    let age_idx = col("age")?;
    let gender_idx = col("gender")?;
    let sport_idx = col("sport")?;
    let state_idx = col("state")?;
    let score_idx = col("score")?;
    let date_idx = col("date")?;
    let verified_idx = col("verified")?;
    let lat_idx = headers.iter().position(|h| h == "lat");
    let lon_idx = headers.iter().position(|h| h == "lon");
    let video_idx = headers.iter().position(|h| h == "video_url");
    let photo_idx = headers.iter().position(|h| h == "photo_url");

    let mut records = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let get = |idx: usize| record.get(idx).unwrap_or("");

        records.push(AthleteRecord {
            athlete_id: get(id_idx).trim().to_string(),
            name: get(name_idx).trim().to_string(),
            age: parse_num::<u8>(get(age_idx), row_no, "age")?,
            gender: get(gender_idx).parse().unwrap_or(Gender::Other),
            sport: get(sport_idx).trim().to_string(),
            state: get(state_idx).trim().to_string(),
            score: parse_num::<f64>(get(score_idx), row_no, "score")?,
            lat: parse_opt_f64(opt_field(&record, lat_idx), row_no, "lat")?,
            lon: parse_opt_f64(opt_field(&record, lon_idx), row_no, "lon")?,
            date: parse_date(get(date_idx), row_no)?,
            verified: parse_bool(get(verified_idx), row_no, "verified")?,
            video_url: opt_field(&record, video_idx).trim().to_string(),
            photo_url: opt_field(&record, photo_idx).trim().to_string(),
        });
    }

    Ok(AthleteDataset::from_records(records)?)
}

fn opt_field<'r>(record: &'r csv::StringRecord, idx: Option<usize>) -> &'r str {
    idx.and_then(|i| record.get(i)).unwrap_or("")
}

fn parse_num<T: std::str::FromStr>(s: &str, row: usize, col: &str) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    s.trim()
        .parse::<T>()
        .with_context(|| format!("Row {row}, {col}: '{s}' is not a number"))
}

fn parse_opt_f64(s: &str, row: usize, col: &str) -> Result<Option<f64>> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(None);
    }
    parse_num::<f64>(s, row, col).map(Some)
}

fn parse_bool(s: &str, row: usize, col: &str) -> Result<bool> {
    match s.trim() {
        "true" | "True" | "TRUE" | "1" => Ok(true),
        "false" | "False" | "FALSE" | "0" => Ok(false),
        other => bail!("Row {row}, {col}: '{other}' is not a boolean"),
    }
}

/// Accepts plain `YYYY-MM-DD` as well as datetime strings whose date part
/// leads (`2025-07-15 00:00:00`, `2025-07-15T00:00:00`).
fn parse_date(s: &str, row: usize) -> Result<NaiveDate> {
    let token = s.trim().split(['T', ' ']).next().unwrap_or("");
    NaiveDate::parse_from_str(token, "%Y-%m-%d")
        .with_context(|| format!("Row {row}, date: '{s}' is not a YYYY-MM-DD date"))
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file of athlete records.
///
/// Expected schema: flat scalar columns named after the record fields.
/// Dates may arrive as `Utf8` strings, `Date32` or any `Timestamp` unit,
/// which covers files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<AthleteDataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut records = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        records.extend(batch_to_records(&batch)?);
    }

    Ok(AthleteDataset::from_records(records)?)
}

// -- Parquet / Arrow helpers --

fn batch_to_records(batch: &RecordBatch) -> Result<Vec<AthleteRecord>> {
    let id_col = required_column(batch, "athlete_id")?;
    let name_col = required_column(batch, "name")?;
    let age_col = required_column(batch, "age")?;
    let gender_col = required_column(batch, "gender")?;
    let sport_col = required_column(batch, "sport")?;
    let state_col = required_column(batch, "state")?;
    let score_col = required_column(batch, "score")?;
    let date_col = required_column(batch, "date")?;
    let verified_col = required_column(batch, "verified")?;
    let lat_col = optional_column(batch, "lat");
    let lon_col = optional_column(batch, "lon");
    let video_col = optional_column(batch, "video_url");
    let photo_col = optional_column(batch, "photo_url");

    let mut records = Vec::with_capacity(batch.num_rows());

    for row in 0..batch.num_rows() {
        let age_raw = int_value(age_col, row)
            .with_context(|| format!("Row {row}: reading 'age'"))?;
        let age = u8::try_from(age_raw)
            .with_context(|| format!("Row {row}: age {age_raw} out of range"))?;

        records.push(AthleteRecord {
            athlete_id: str_value(id_col, row)
                .with_context(|| format!("Row {row}: reading 'athlete_id'"))?
                .to_string(),
            name: str_value(name_col, row)
                .with_context(|| format!("Row {row}: reading 'name'"))?
                .to_string(),
            age,
            gender: str_value(gender_col, row)
                .with_context(|| format!("Row {row}: reading 'gender'"))?
                .parse()
                .unwrap_or(Gender::Other),
            sport: str_value(sport_col, row)
                .with_context(|| format!("Row {row}: reading 'sport'"))?
                .to_string(),
            state: str_value(state_col, row)
                .with_context(|| format!("Row {row}: reading 'state'"))?
                .to_string(),
            score: f64_value(score_col, row)
                .with_context(|| format!("Row {row}: reading 'score'"))?,
            lat: opt_f64_value(lat_col, row)
                .with_context(|| format!("Row {row}: reading 'lat'"))?,
            lon: opt_f64_value(lon_col, row)
                .with_context(|| format!("Row {row}: reading 'lon'"))?,
            date: date_value(date_col, row)
                .with_context(|| format!("Row {row}: reading 'date'"))?,
            verified: bool_value(verified_col, row)
                .with_context(|| format!("Row {row}: reading 'verified'"))?,
            video_url: opt_str_value(video_col, row)
                .with_context(|| format!("Row {row}: reading 'video_url'"))?,
            photo_url: opt_str_value(photo_col, row)
                .with_context(|| format!("Row {row}: reading 'photo_url'"))?,
        });
    }

    Ok(records)
}

fn required_column<'a>(batch: &'a RecordBatch, name: &str) -> Result<&'a Arc<dyn Array>> {
    let idx = batch
        .schema()
        .index_of(name)
        .map_err(|_| anyhow::anyhow!("Parquet file missing '{name}' column"))?;
    Ok(batch.column(idx))
}

fn optional_column<'a>(batch: &'a RecordBatch, name: &str) -> Option<&'a Arc<dyn Array>> {
    batch.schema().index_of(name).ok().map(|idx| batch.column(idx))
}

fn str_value<'a>(col: &'a Arc<dyn Array>, row: usize) -> Result<&'a str> {
    if col.is_null(row) {
        bail!("null value in string column");
    }
    match col.data_type() {
        DataType::Utf8 => {
            let arr = col
                .as_any()
                .downcast_ref::<StringArray>()
                .context("expected StringArray")?;
            Ok(arr.value(row))
        }
        DataType::LargeUtf8 => Ok(col.as_string::<i64>().value(row)),
        other => bail!("expected string column, got {other:?}"),
    }
}

fn int_value(col: &Arc<dyn Array>, row: usize) -> Result<i64> {
    if col.is_null(row) {
        bail!("null value in integer column");
    }
    match col.data_type() {
        DataType::Int32 => {
            let arr = col.as_any().downcast_ref::<Int32Array>().unwrap();
            Ok(i64::from(arr.value(row)))
        }
        DataType::Int64 => {
            let arr = col.as_any().downcast_ref::<Int64Array>().unwrap();
            Ok(arr.value(row))
        }
        other => bail!("expected integer column, got {other:?}"),
    }
}

fn f64_value(col: &Arc<dyn Array>, row: usize) -> Result<f64> {
    if col.is_null(row) {
        bail!("null value in numeric column");
    }
    match col.data_type() {
        DataType::Float64 => {
            let arr = col.as_any().downcast_ref::<Float64Array>().unwrap();
            Ok(arr.value(row))
        }
        DataType::Float32 => {
            let arr = col.as_any().downcast_ref::<Float32Array>().unwrap();
            Ok(f64::from(arr.value(row)))
        }
        DataType::Int32 | DataType::Int64 => int_value(col, row).map(|v| v as f64),
        other => bail!("expected numeric column, got {other:?}"),
    }
}

fn bool_value(col: &Arc<dyn Array>, row: usize) -> Result<bool> {
    if col.is_null(row) {
        bail!("null value in boolean column");
    }
    match col.data_type() {
        DataType::Boolean => {
            let arr = col.as_any().downcast_ref::<BooleanArray>().unwrap();
            Ok(arr.value(row))
        }
        other => bail!("expected boolean column, got {other:?}"),
    }
}

fn date_value(col: &Arc<dyn Array>, row: usize) -> Result<NaiveDate> {
    if col.is_null(row) {
        bail!("null value in date column");
    }
    match col.data_type() {
        DataType::Utf8 | DataType::LargeUtf8 => {
            let s = str_value(col, row)?;
            let token = s.split(['T', ' ']).next().unwrap_or("");
            NaiveDate::parse_from_str(token, "%Y-%m-%d")
                .with_context(|| format!("'{s}' is not a YYYY-MM-DD date"))
        }
        DataType::Date32 => {
            let days = col.as_any().downcast_ref::<Date32Array>().unwrap().value(row);
            // Date32 counts days from the Unix epoch; chrono counts from 0001-01-01.
            NaiveDate::from_num_days_from_ce_opt(days + 719_163)
                .context("Date32 value out of range")
        }
        DataType::Timestamp(unit, _) => {
            let raw = match unit {
                TimeUnit::Second => col
                    .as_any()
                    .downcast_ref::<TimestampSecondArray>()
                    .unwrap()
                    .value(row),
                TimeUnit::Millisecond => col
                    .as_any()
                    .downcast_ref::<TimestampMillisecondArray>()
                    .unwrap()
                    .value(row),
                TimeUnit::Microsecond => col
                    .as_any()
                    .downcast_ref::<TimestampMicrosecondArray>()
                    .unwrap()
                    .value(row),
                TimeUnit::Nanosecond => col
                    .as_any()
                    .downcast_ref::<TimestampNanosecondArray>()
                    .unwrap()
                    .value(row),
            };
            let secs = match unit {
                TimeUnit::Second => raw,
                TimeUnit::Millisecond => raw.div_euclid(1_000),
                TimeUnit::Microsecond => raw.div_euclid(1_000_000),
                TimeUnit::Nanosecond => raw.div_euclid(1_000_000_000),
            };
            chrono::DateTime::from_timestamp(secs, 0)
                .map(|dt| dt.date_naive())
                .context("timestamp out of range")
        }
        other => bail!("expected date column, got {other:?}"),
    }
}

/// Pandas exports missing coordinates as NaN rather than null.
fn opt_f64_value(col: Option<&Arc<dyn Array>>, row: usize) -> Result<Option<f64>> {
    let Some(col) = col else {
        return Ok(None);
    };
    if col.is_null(row) {
        return Ok(None);
    }
    let v = f64_value(col, row)?;
    Ok((!v.is_nan()).then_some(v))
}

fn opt_str_value(col: Option<&Arc<dyn Array>>, row: usize) -> Result<String> {
    let Some(col) = col else {
        return Ok(String::new());
    };
    if col.is_null(row) {
        return Ok(String::new());
    }
    Ok(str_value(col, row)?.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::ArrayRef;
    use arrow::datatypes::{Field, Schema};
    use pretty_assertions::assert_eq;

    #[test]
    fn rejects_unknown_extensions() {
        let err = load_file(Path::new("athletes.xlsx")).unwrap_err();
        assert!(err.to_string().contains("Unsupported file extension"));
    }

    #[test]
    fn reads_a_json_export() {
        let text = r#"[
            {
                "athlete_id": "A001",
                "name": "Athlete_1",
                "age": 16,
                "gender": "M",
                "sport": "Sprinting",
                "state": "Kerala",
                "score": 78.0,
                "lat": 10.1234,
                "lon": 76.5,
                "date": "2025-07-15",
                "verified": true,
                "video_url": "",
                "photo_url": "https://example.com/p/1.jpg"
            },
            {
                "athlete_id": "A002",
                "name": "Athlete_2",
                "age": 17,
                "gender": "NB",
                "sport": "Swimming",
                "state": "Goa",
                "score": 84.5,
                "date": "2025-08-01",
                "verified": false
            }
        ]"#;
        let ds = read_json(text).unwrap();
        assert_eq!(ds.len(), 2);

        let a1 = ds.get("A001").unwrap();
        assert_eq!(a1.score, 78.0);
        assert_eq!(a1.gender, Gender::Male);
        assert_eq!(a1.photo(), Some("https://example.com/p/1.jpg"));

        // Unrecognized gender codes load as `Other`, same as the CSV path.
        let a2 = ds.get("A002").unwrap();
        assert_eq!(a2.gender, Gender::Other);
        assert_eq!(a2.lat, None);
        assert_eq!(a2.date, NaiveDate::from_ymd_opt(2025, 8, 1).unwrap());
        assert_eq!(a2.video(), None);
    }

    #[test]
    fn json_with_a_malformed_row_fails_with_row_context() {
        let text = r#"[
            {"athlete_id": "A001", "name": "Athlete_1", "age": 16, "gender": "M",
             "sport": "Sprinting", "state": "Kerala", "score": 78.0,
             "date": "2025-07-15", "verified": true},
            {"athlete_id": "A002", "name": "Athlete_2", "age": "seventeen"}
        ]"#;
        let err = read_json(text).unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("Row 1"), "{msg}");
        assert!(msg.contains("invalid athlete record"), "{msg}");
    }

    #[test]
    fn json_must_be_a_top_level_array() {
        let err = read_json(r#"{"athlete_id": "A001"}"#).unwrap_err();
        assert!(format!("{err:#}").contains("top-level JSON array"));
    }

    #[test]
    fn reads_a_csv_export() {
        let text = "\
athlete_id,name,age,gender,sport,state,score,lat,lon,date,verified,video_url,photo_url
A001,Athlete_1,16,M,Sprinting,Kerala,78,10.1234,76.5,2025-07-15,True,,https://example.com/p/1.jpg
A002,Athlete_2,17,F,Swimming,Goa,84.5,,,2025-08-01 00:00:00,False,,
";
        let ds = read_csv(csv::Reader::from_reader(text.as_bytes())).unwrap();
        assert_eq!(ds.len(), 2);

        let a1 = ds.get("A001").unwrap();
        assert_eq!(a1.score, 78.0);
        assert_eq!(a1.lat, Some(10.1234));
        assert_eq!(a1.gender, Gender::Male);
        assert!(a1.verified);
        assert_eq!(a1.photo(), Some("https://example.com/p/1.jpg"));

        let a2 = ds.get("A002").unwrap();
        assert_eq!(a2.lat, None);
        assert_eq!(a2.date, NaiveDate::from_ymd_opt(2025, 8, 1).unwrap());
        assert_eq!(a2.video(), None);
    }

    #[test]
    fn csv_without_a_required_column_fails() {
        let text = "athlete_id,name\nA001,Athlete_1\n";
        let err = read_csv(csv::Reader::from_reader(text.as_bytes())).unwrap_err();
        assert!(err.to_string().contains("missing 'age'"));
    }

    #[test]
    fn csv_with_a_bad_boolean_fails_with_row_context() {
        let text = "\
athlete_id,name,age,gender,sport,state,score,date,verified
A001,Athlete_1,16,M,Sprinting,Kerala,78,2025-07-15,yes
";
        let err = read_csv(csv::Reader::from_reader(text.as_bytes())).unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("Row 0"), "{msg}");
        assert!(msg.contains("not a boolean"), "{msg}");
    }

    fn days_since_epoch(date: NaiveDate) -> i32 {
        let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
        (date - epoch).num_days() as i32
    }

    #[test]
    fn decodes_an_arrow_batch() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("athlete_id", DataType::Utf8, false),
            Field::new("name", DataType::Utf8, false),
            Field::new("age", DataType::Int64, false),
            Field::new("gender", DataType::Utf8, false),
            Field::new("sport", DataType::Utf8, false),
            Field::new("state", DataType::Utf8, false),
            Field::new("score", DataType::Int64, false),
            Field::new("lat", DataType::Float64, true),
            Field::new("lon", DataType::Float64, true),
            Field::new("date", DataType::Date32, false),
            Field::new("verified", DataType::Boolean, false),
        ]));
        let date = NaiveDate::from_ymd_opt(2025, 8, 15).unwrap();
        let batch = RecordBatch::try_new(
            schema,
            vec![
                Arc::new(StringArray::from(vec!["A001", "A002"])) as ArrayRef,
                Arc::new(StringArray::from(vec!["Athlete_1", "Athlete_2"])),
                Arc::new(Int64Array::from(vec![16, 17])),
                Arc::new(StringArray::from(vec!["M", "unknown"])),
                Arc::new(StringArray::from(vec!["Sprinting", "Swimming"])),
                Arc::new(StringArray::from(vec!["Kerala", "Goa"])),
                Arc::new(Int64Array::from(vec![78, 84])),
                Arc::new(Float64Array::from(vec![Some(10.1), None])),
                Arc::new(Float64Array::from(vec![Some(76.5), None])),
                Arc::new(Date32Array::from(vec![days_since_epoch(date); 2])),
                Arc::new(BooleanArray::from(vec![true, false])),
            ],
        )
        .unwrap();

        let records = batch_to_records(&batch).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].score, 78.0);
        assert_eq!(records[0].date, date);
        assert_eq!(records[0].gender, Gender::Male);
        assert_eq!(records[1].gender, Gender::Other);
        assert_eq!(records[1].lat, None);
        // Optional url columns absent from the schema entirely.
        assert_eq!(records[0].video(), None);
        assert_eq!(records[0].photo(), None);
    }

    #[test]
    fn decodes_string_dates_in_a_batch() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("athlete_id", DataType::Utf8, false),
            Field::new("name", DataType::Utf8, false),
            Field::new("age", DataType::Int32, false),
            Field::new("gender", DataType::Utf8, false),
            Field::new("sport", DataType::Utf8, false),
            Field::new("state", DataType::Utf8, false),
            Field::new("score", DataType::Float64, false),
            Field::new("date", DataType::Utf8, false),
            Field::new("verified", DataType::Boolean, false),
        ]));
        let batch = RecordBatch::try_new(
            schema,
            vec![
                Arc::new(StringArray::from(vec!["A001"])) as ArrayRef,
                Arc::new(StringArray::from(vec!["Athlete_1"])),
                Arc::new(Int32Array::from(vec![19])),
                Arc::new(StringArray::from(vec!["F"])),
                Arc::new(StringArray::from(vec!["Javelin"])),
                Arc::new(StringArray::from(vec!["Punjab"])),
                Arc::new(Float64Array::from(vec![91.0])),
                Arc::new(StringArray::from(vec!["2025-09-12T00:00:00"])),
                Arc::new(BooleanArray::from(vec![true])),
            ],
        )
        .unwrap();

        let records = batch_to_records(&batch).unwrap();
        assert_eq!(records[0].date, NaiveDate::from_ymd_opt(2025, 9, 12).unwrap());
    }

    #[test]
    fn batch_missing_a_required_column_fails() {
        let schema = Arc::new(Schema::new(vec![Field::new(
            "athlete_id",
            DataType::Utf8,
            false,
        )]));
        let batch = RecordBatch::try_new(
            schema,
            vec![Arc::new(StringArray::from(vec!["A001"])) as ArrayRef],
        )
        .unwrap();

        let err = batch_to_records(&batch).unwrap_err();
        assert!(err.to_string().contains("missing 'name'"));
    }
}
