use crate::error::SilverError;
use crate::quality::FillCounts;
use core_types::{SalesRecord, parse_source_timestamp};
use csv::ByteRecord;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Placeholders written for blank descriptive fields. Every substitution is
/// counted and surfaced in the quality report.
pub const FALLBACK_CATEGORY: &str = "Uncategorized";
pub const FALLBACK_PRODUCT: &str = "Unknown Product";
pub const FALLBACK_COUNTRY: &str = "Unknown";
pub const FALLBACK_STATE: &str = "N/A";

/// The source export is Latin-1: every byte maps to the code point of the
/// same value, so decoding cannot fail.
pub(crate) fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

/// Resolved positions of every source column the canonical schema needs.
/// Construction fails when the export lacks one, which aborts the silver
/// build before any row is parsed.
#[derive(Debug, Clone)]
pub(crate) struct ColumnIndex {
    category: usize,
    product_name: usize,
    customer_city: usize,
    customer_state: usize,
    customer_country: usize,
    order_city: usize,
    order_state: usize,
    order_country: usize,
    order_region: usize,
    delivery_status: usize,
    shipping_mode: usize,
    shipping_days_actual: usize,
    shipping_days_scheduled: usize,
    order_date: usize,
    shipping_date: usize,
    sale_amount: usize,
    order_profit: usize,
    sales_per_customer: usize,
    benefit_per_order: usize,
    source_order_id: usize,
    source_product_id: usize,
    source_customer_id: usize,
}

impl ColumnIndex {
    pub(crate) fn from_headers(headers: &[String]) -> Result<Self, SilverError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|header| header == name)
                .ok_or_else(|| SilverError::MissingColumn(name.to_string()))
        };

        Ok(Self {
            category: find("Category Name")?,
            product_name: find("Product Name")?,
            customer_city: find("Customer City")?,
            customer_state: find("Customer State")?,
            customer_country: find("Customer Country")?,
            order_city: find("Order City")?,
            order_state: find("Order State")?,
            order_country: find("Order Country")?,
            order_region: find("Market")?,
            delivery_status: find("Delivery Status")?,
            shipping_mode: find("Shipping Mode")?,
            shipping_days_actual: find("Days for shipping (real)")?,
            shipping_days_scheduled: find("Days for shipment (scheduled)")?,
            order_date: find("order date (DateOrders)")?,
            shipping_date: find("shipping date (DateOrders)")?,
            sale_amount: find("Order Item Total")?,
            order_profit: find("Order Profit Per Order")?,
            sales_per_customer: find("Sales per customer")?,
            benefit_per_order: find("Benefit per order")?,
            source_order_id: find("Order Id")?,
            source_product_id: find("Product Card Id")?,
            source_customer_id: find("Customer Id")?,
        })
    }
}

/// Decoded, trimmed field text; blanks and missing trailing fields read as
/// `None`.
fn field(record: &ByteRecord, index: usize) -> Option<String> {
    let raw = record.get(index)?;
    let text = decode_latin1(raw);
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn money(record: &ByteRecord, index: usize) -> Option<f64> {
    field(record, index).and_then(|value| value.parse::<f64>().ok())
}

/// Shipping-day columns default to zero when blank or unparseable.
fn shipping_days(record: &ByteRecord, index: usize) -> i64 {
    field(record, index)
        .and_then(|value| value.parse::<f64>().ok())
        .map(|value| value as i64)
        .unwrap_or(0)
}

/// Source identifiers occasionally arrive float-formatted ("75139.0").
fn source_id(record: &ByteRecord, index: usize) -> Option<i64> {
    let value = field(record, index)?;
    value
        .parse::<i64>()
        .ok()
        .or_else(|| value.parse::<f64>().ok().map(|v| v as i64))
}

/// Maps one raw CSV record onto the canonical schema, applying placeholder
/// fills and the commodity enrichment.
///
/// An unparseable sale amount becomes NaN: it fails the survival filter's
/// `>= 0` check downstream without counting as a negative amount.
pub(crate) fn canonicalize(
    record: &ByteRecord,
    columns: &ColumnIndex,
    brent_price: f64,
    fills: &mut FillCounts,
) -> SalesRecord {
    let category = field(record, columns.category).unwrap_or_else(|| {
        fills.category += 1;
        FALLBACK_CATEGORY.to_string()
    });
    let product_name = field(record, columns.product_name).unwrap_or_else(|| {
        fills.product_name += 1;
        FALLBACK_PRODUCT.to_string()
    });
    let customer_country = field(record, columns.customer_country).unwrap_or_else(|| {
        fills.customer_country += 1;
        FALLBACK_COUNTRY.to_string()
    });
    let customer_state = field(record, columns.customer_state).unwrap_or_else(|| {
        fills.customer_state += 1;
        FALLBACK_STATE.to_string()
    });

    SalesRecord {
        category,
        product_name,
        customer_city: field(record, columns.customer_city),
        customer_state,
        customer_country,
        order_city: field(record, columns.order_city),
        order_state: field(record, columns.order_state),
        order_country: field(record, columns.order_country),
        order_region: field(record, columns.order_region),
        delivery_status: field(record, columns.delivery_status),
        shipping_mode: field(record, columns.shipping_mode),
        shipping_days_actual: shipping_days(record, columns.shipping_days_actual),
        shipping_days_scheduled: shipping_days(record, columns.shipping_days_scheduled),
        order_date: field(record, columns.order_date)
            .and_then(|value| parse_source_timestamp(&value)),
        shipping_date: field(record, columns.shipping_date)
            .and_then(|value| parse_source_timestamp(&value)),
        sale_amount: money(record, columns.sale_amount).unwrap_or(f64::NAN),
        order_profit: money(record, columns.order_profit),
        sales_per_customer: money(record, columns.sales_per_customer),
        benefit_per_order: money(record, columns.benefit_per_order),
        brent_price,
        source_order_id: source_id(record, columns.source_order_id),
        source_product_id: source_id(record, columns.source_product_id),
        source_customer_id: source_id(record, columns.source_customer_id),
    }
}

/// Everything `parse_dataset` learned about the raw snapshot.
pub(crate) struct ParseOutcome {
    pub records: Vec<SalesRecord>,
    pub scanned: usize,
    pub skipped_malformed: usize,
    pub fills: FillCounts,
}

/// Streams the bronze CSV snapshot into canonical rows.
///
/// Records with surplus fields are skipped and counted; records with missing
/// trailing fields parse with blanks, matching how the source export was
/// consumed historically. `on_record` fires once per raw record for progress
/// reporting.
pub(crate) fn parse_dataset(
    path: &Path,
    brent_price: f64,
    on_record: &mut dyn FnMut(usize),
) -> Result<ParseOutcome, SilverError> {
    let file = File::open(path)?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(BufReader::new(file));

    let headers: Vec<String> = reader
        .byte_headers()?
        .iter()
        .map(|header| decode_latin1(header).trim().to_string())
        .collect();
    let columns = ColumnIndex::from_headers(&headers)?;
    let expected_fields = headers.len();

    let mut outcome = ParseOutcome {
        records: Vec::new(),
        scanned: 0,
        skipped_malformed: 0,
        fills: FillCounts::default(),
    };

    let mut raw = ByteRecord::new();
    while reader.read_byte_record(&mut raw)? {
        outcome.scanned += 1;
        on_record(outcome.scanned);

        if raw.len() > expected_fields {
            outcome.skipped_malformed += 1;
            continue;
        }
        let record = canonicalize(&raw, &columns, brent_price, &mut outcome.fills);
        outcome.records.push(record);
    }

    Ok(outcome)
}
