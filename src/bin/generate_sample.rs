use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use arrow::array::{
    ArrayRef, BooleanArray, Date32Array, Float64Array, Int64Array, StringArray,
};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::NaiveDate;
use parquet::arrow::ArrowWriter;

use athlete_dash::AthleteRecord;
use athlete_dash::data::sample;

/// Write the built-in sample cohort to a file.
///
/// Usage: `generate_sample [output] [count]`
/// The output format follows the extension (`.json`, `.csv`, `.parquet`);
/// the default is `athletes.json` with the default cohort size.
fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let output = args.next().unwrap_or_else(|| "athletes.json".to_string());
    let count = match args.next() {
        Some(arg) => arg
            .parse::<usize>()
            .with_context(|| format!("invalid count '{arg}'"))?,
        None => sample::DEFAULT_COUNT,
    };

    let records = sample::generate(count, sample::DEFAULT_SEED);
    let path = Path::new(&output);
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "json" => write_json(path, &records)?,
        "csv" => write_csv(path, &records)?,
        "parquet" | "pq" => write_parquet(path, &records)?,
        other => bail!("Unsupported output extension: .{other}"),
    }

    println!("Wrote {} athletes to {}", records.len(), path.display());
    Ok(())
}

fn write_json(path: &Path, records: &[AthleteRecord]) -> Result<()> {
    let text = serde_json::to_string_pretty(records).context("serializing records")?;
    std::fs::write(path, text).context("writing JSON file")?;
    Ok(())
}

fn write_csv(path: &Path, records: &[AthleteRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV file")?;
    for rec in records {
        writer.serialize(rec).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn write_parquet(path: &Path, records: &[AthleteRecord]) -> Result<()> {
    let epoch = NaiveDate::default();

    let ids = StringArray::from(records.iter().map(|r| r.athlete_id.as_str()).collect::<Vec<_>>());
    let names = StringArray::from(records.iter().map(|r| r.name.as_str()).collect::<Vec<_>>());
    let ages = Int64Array::from(records.iter().map(|r| i64::from(r.age)).collect::<Vec<_>>());
    let genders = StringArray::from(records.iter().map(|r| r.gender.to_string()).collect::<Vec<_>>());
    let sports = StringArray::from(records.iter().map(|r| r.sport.as_str()).collect::<Vec<_>>());
    let states = StringArray::from(records.iter().map(|r| r.state.as_str()).collect::<Vec<_>>());
    let scores = Float64Array::from(records.iter().map(|r| r.score).collect::<Vec<_>>());
    let lats = Float64Array::from(records.iter().map(|r| r.lat).collect::<Vec<_>>());
    let lons = Float64Array::from(records.iter().map(|r| r.lon).collect::<Vec<_>>());
    let dates = Date32Array::from(
        records
            .iter()
            .map(|r| (r.date - epoch).num_days() as i32)
            .collect::<Vec<_>>(),
    );
    let verified = BooleanArray::from(records.iter().map(|r| r.verified).collect::<Vec<_>>());
    let videos = StringArray::from(records.iter().map(|r| r.video_url.as_str()).collect::<Vec<_>>());
    let photos = StringArray::from(records.iter().map(|r| r.photo_url.as_str()).collect::<Vec<_>>());

    let schema = Arc::new(Schema::new(vec![
        Field::new("athlete_id", DataType::Utf8, false),
        Field::new("name", DataType::Utf8, false),
        Field::new("age", DataType::Int64, false),
        Field::new("gender", DataType::Utf8, false),
        Field::new("sport", DataType::Utf8, false),
        Field::new("state", DataType::Utf8, false),
        Field::new("score", DataType::Float64, false),
        Field::new("lat", DataType::Float64, true),
        Field::new("lon", DataType::Float64, true),
        Field::new("date", DataType::Date32, false),
        Field::new("verified", DataType::Boolean, false),
        Field::new("video_url", DataType::Utf8, false),
        Field::new("photo_url", DataType::Utf8, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(ids) as ArrayRef,
            Arc::new(names),
            Arc::new(ages),
            Arc::new(genders),
            Arc::new(sports),
            Arc::new(states),
            Arc::new(scores),
            Arc::new(lats),
            Arc::new(lons),
            Arc::new(dates),
            Arc::new(verified),
            Arc::new(videos),
            Arc::new(photos),
        ],
    )
    .context("creating record batch")?;

    let file = std::fs::File::create(path).context("creating output file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}
