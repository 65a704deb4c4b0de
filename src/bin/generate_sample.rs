use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int64Array, ListBuilder, StringArray, StringBuilder};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use syft_filter::{DatasetFilter, Record, Value};

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn below(&mut self, n: u64) -> u64 {
        self.next_u64() % n
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[self.below(items.len() as u64) as usize]
    }
}

/// One generated catalogue row.
struct Item {
    id: i64,
    name: String,
    category: &'static str,
    price: f64,
    stock: i64,
    tags: Vec<String>,
}

impl Item {
    fn to_record(&self) -> Record {
        Record::new()
            .with("id", self.id)
            .with("name", self.name.as_str())
            .with("category", self.category)
            .with("price", self.price)
            .with("stock", self.stock)
            .with("tags", Value::List(self.tags.clone()))
    }
}

fn generate_items(count: usize, rng: &mut SimpleRng) -> Vec<Item> {
    let categories = ["fruit", "vegetable", "bakery", "dairy"];
    let adjectives = ["Fresh", "Organic", "Local", "Golden", "Wild"];
    let nouns = ["Apple", "Carrot", "Loaf", "Cheese", "Berry", "Pie", "Melon"];
    let tags = ["seasonal", "vegan", "imported", "sale", "new"];

    (0..count)
        .map(|i| {
            let category = categories[i % categories.len()];
            let mut item_tags: Vec<String> = (0..1 + rng.below(3))
                .map(|_| rng.pick(&tags).to_string())
                .collect();
            item_tags.sort();
            item_tags.dedup();
            Item {
                id: i as i64 + 1,
                name: format!("{} {}", rng.pick(&adjectives), rng.pick(&nouns)),
                category,
                price: (50 + rng.below(2000)) as f64 / 100.0,
                stock: rng.below(120) as i64,
                tags: item_tags,
            }
        })
        .collect()
}

fn write_json(items: &[Item], path: &Path) -> Result<()> {
    let records: Vec<Record> = items.iter().map(Item::to_record).collect();
    let file = std::fs::File::create(path).context("creating JSON output")?;
    serde_json::to_writer_pretty(file, &records).context("writing JSON")?;
    Ok(())
}

fn write_csv(items: &[Item], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV output")?;
    writer.write_record(["id", "name", "category", "price", "stock", "tags[]"])?;
    for item in items {
        writer.write_record([
            item.id.to_string(),
            item.name.clone(),
            item.category.to_string(),
            item.price.to_string(),
            item.stock.to_string(),
            item.tags.join(";"),
        ])?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn write_parquet(items: &[Item], path: &Path) -> Result<()> {
    let mut tags_builder = ListBuilder::new(StringBuilder::new());
    for item in items {
        let values = tags_builder.values();
        for tag in &item.tags {
            values.append_value(tag);
        }
        tags_builder.append(true);
    }
    let tags_array = tags_builder.finish();

    let schema = Arc::new(Schema::new(vec![
        Field::new("id", DataType::Int64, false),
        Field::new("name", DataType::Utf8, false),
        Field::new("category", DataType::Utf8, false),
        Field::new("price", DataType::Float64, false),
        Field::new("stock", DataType::Int64, false),
        Field::new("tags", DataType::List(Arc::new(Field::new("item", DataType::Utf8, true))), false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from(items.iter().map(|i| i.id).collect::<Vec<_>>())),
            Arc::new(StringArray::from(
                items.iter().map(|i| i.name.as_str()).collect::<Vec<_>>(),
            )),
            Arc::new(StringArray::from(
                items.iter().map(|i| i.category).collect::<Vec<_>>(),
            )),
            Arc::new(Float64Array::from(items.iter().map(|i| i.price).collect::<Vec<_>>())),
            Arc::new(Int64Array::from(items.iter().map(|i| i.stock).collect::<Vec<_>>())),
            Arc::new(tags_array),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).context("creating parquet output")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing record batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();

    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    let mut rng = SimpleRng::new(42);
    let items = generate_items(48, &mut rng);

    let json_path = out_dir.join("sample_records.json");
    write_json(&items, &json_path)?;
    write_csv(&items, &out_dir.join("sample_records.csv"))?;
    write_parquet(&items, &out_dir.join("sample_records.parquet"))?;

    // Sanity pass through the filter so a broken writer shows up here.
    let mut filter = DatasetFilter::new();
    filter.load(json_path.as_path())?;
    filter.contains_filter("category", "fruit", true)?;
    filter.sort_descending("price")?;
    log::info!(
        "{} fruit records across {} pages",
        filter.len(),
        filter.paginate(10)?.len()
    );

    println!(
        "Wrote {} records to sample_records.{{json,csv,parquet}} in {}",
        items.len(),
        out_dir.display()
    );
    Ok(())
}
