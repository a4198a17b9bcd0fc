//! The SQL statements that rebuild the gold layer from `silver_sales`.
//!
//! Every build is a full rebuild: each table is cleared and repopulated by a
//! standalone statement pair, with no transaction spanning the whole set.
//! Surrogate keys are assigned with `ROW_NUMBER()` at build time.

/// Gold tables in build (and clear) order: dimensions first, then the fact.
pub const GOLD_TABLES: [&str; 6] = [
    "dim_time",
    "dim_logistics",
    "dim_product",
    "dim_customer",
    "dim_context",
    "fact_sales",
];

/// The time key is the distinct order timestamp itself, not a generated
/// integer; weekday is strftime's 0 = Sunday convention and quarter is
/// derived from the month.
pub const BUILD_DIM_TIME: &str = r#"
INSERT INTO dim_time (time_key, full_date, year, month, day, weekday, quarter)
SELECT DISTINCT
    order_date,
    order_date,
    CAST(strftime('%Y', order_date) AS INTEGER),
    CAST(strftime('%m', order_date) AS INTEGER),
    CAST(strftime('%d', order_date) AS INTEGER),
    CAST(strftime('%w', order_date) AS INTEGER),
    (CAST(strftime('%m', order_date) AS INTEGER) + 2) / 3
FROM silver_sales
WHERE order_date IS NOT NULL
ORDER BY order_date
"#;

/// Average shipping days are computed over the distinct
/// (status, mode, actual, scheduled) tuples, not over order volume, so a
/// combination occurring in thousands of orders weighs the same as a rare one.
pub const BUILD_DIM_LOGISTICS: &str = r#"
INSERT INTO dim_logistics (
    logistics_key, delivery_status, shipping_mode,
    avg_shipping_days_actual, avg_shipping_days_scheduled
)
SELECT
    ROW_NUMBER() OVER (),
    delivery_status,
    shipping_mode,
    AVG(shipping_days_actual),
    AVG(shipping_days_scheduled)
FROM (
    SELECT DISTINCT
        delivery_status, shipping_mode,
        shipping_days_actual, shipping_days_scheduled
    FROM silver_sales
)
GROUP BY delivery_status, shipping_mode
"#;

pub const BUILD_DIM_PRODUCT: &str = r#"
INSERT INTO dim_product (product_key, category, product_name)
SELECT
    ROW_NUMBER() OVER (ORDER BY category, product_name),
    category,
    product_name
FROM (
    SELECT DISTINCT category, product_name
    FROM silver_sales
    WHERE category IS NOT NULL
)
"#;

pub const BUILD_DIM_CUSTOMER: &str = r#"
INSERT INTO dim_customer (customer_key, customer_city, customer_state, customer_country)
SELECT
    ROW_NUMBER() OVER (ORDER BY customer_country, customer_state, customer_city),
    customer_city,
    customer_state,
    customer_country
FROM (
    SELECT DISTINCT customer_city, customer_state, customer_country
    FROM silver_sales
    WHERE customer_city IS NOT NULL
)
"#;

/// Daily macro context: rows without an order date fall into one NULL bucket.
pub const BUILD_DIM_CONTEXT: &str = r#"
INSERT INTO dim_context (reference_date, avg_brent_price)
SELECT order_date, AVG(brent_price)
FROM silver_sales
GROUP BY order_date
"#;

/// Customers are matched on city and state only; country stays descriptive.
/// Rows that miss a dimension keep a NULL key (LEFT JOIN).
pub const BUILD_FACT_SALES: &str = r#"
INSERT INTO fact_sales (
    time_key, full_date, product_key, customer_key, logistics_key,
    brent_price, sale_amount, order_profit, sales_per_customer,
    shipping_days_actual
)
SELECT
    s.order_date,
    s.order_date,
    p.product_key,
    c.customer_key,
    l.logistics_key,
    s.brent_price,
    s.sale_amount,
    s.order_profit,
    s.sales_per_customer,
    s.shipping_days_actual
FROM silver_sales s
LEFT JOIN dim_product p
    ON s.category = p.category AND s.product_name = p.product_name
LEFT JOIN dim_customer c
    ON s.customer_city = c.customer_city AND s.customer_state = c.customer_state
LEFT JOIN dim_logistics l
    ON s.delivery_status = l.delivery_status AND s.shipping_mode = l.shipping_mode
"#;

/// (table, build statement) pairs in execution order.
pub const GOLD_BUILDS: [(&str, &str); 6] = [
    ("dim_time", BUILD_DIM_TIME),
    ("dim_logistics", BUILD_DIM_LOGISTICS),
    ("dim_product", BUILD_DIM_PRODUCT),
    ("dim_customer", BUILD_DIM_CUSTOMER),
    ("dim_context", BUILD_DIM_CONTEXT),
    ("fact_sales", BUILD_FACT_SALES),
];
